use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::OnceCell;
use tracing::{debug, info, instrument, warn};

use crate::error::{SourceError, SyncError, SyncResult};
use crate::ids::DirectoryId;
use crate::model::DirectoryPerson;
use crate::normalize::{normalize_username, strip_profile_prefix};
use crate::traits::DirectorySource;

type LoadOutcome = Result<Arc<DirectoryIndex>, Arc<SourceError>>;

/// Lookup tables built from one full directory load.
#[derive(Debug, Default)]
struct DirectoryIndex {
    by_username: HashMap<String, DirectoryPerson>,
    by_id: HashMap<DirectoryId, DirectoryPerson>,
}

impl DirectoryIndex {
    fn build(persons: Vec<DirectoryPerson>) -> Self {
        let mut index = Self::default();

        for person in persons {
            let key = normalize_username(&person.external_username);
            if key.is_empty() {
                debug!(directory_id = %person.directory_id, "skipping directory entry without username");
                continue;
            }

            let person = DirectoryPerson {
                external_username: strip_profile_prefix(&person.external_username).to_string(),
                directory_id: person.directory_id,
            };

            if index.by_username.contains_key(&key) {
                warn!(username = %key, "duplicate username in directory, keeping first entry");
            } else {
                index.by_username.insert(key, person.clone());
            }
            index.by_id.entry(person.directory_id.clone()).or_insert(person);
        }

        index
    }
}

/// Memoized view of the person directory.
///
/// The directory is loaded at most once, on the first lookup. A failed load
/// is memoized too, so every later lookup of the run reports the same cause.
pub struct DirectoryCache {
    source: Arc<dyn DirectorySource>,
    index: OnceCell<LoadOutcome>,
}

impl std::fmt::Debug for DirectoryCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirectoryCache")
            .field("loaded", &self.is_loaded())
            .finish()
    }
}

impl DirectoryCache {
    pub fn new(source: Arc<dyn DirectorySource>) -> Self {
        Self {
            source,
            index: OnceCell::new(),
        }
    }

    /// Whether the load has been attempted.
    pub fn is_loaded(&self) -> bool {
        self.index.initialized()
    }

    /// Look a person up by external username (case-insensitive, URL prefix ignored).
    pub async fn resolve_by_username(&self, username: &str) -> SyncResult<Option<DirectoryPerson>> {
        let index = self.index().await?;
        Ok(index.by_username.get(&normalize_username(username)).cloned())
    }

    /// Look a person up by directory id.
    pub async fn resolve_by_id(&self, id: &DirectoryId) -> SyncResult<Option<DirectoryPerson>> {
        let index = self.index().await?;
        Ok(index.by_id.get(id).cloned())
    }

    async fn index(&self) -> SyncResult<Arc<DirectoryIndex>> {
        let outcome = self.index.get_or_init(|| self.load()).await;
        outcome
            .clone()
            .map_err(|cause| SyncError::DirectoryLoad { cause })
    }

    #[instrument(skip(self))]
    async fn load(&self) -> LoadOutcome {
        match self.source.load_all_persons().await {
            Ok(persons) => {
                let index = DirectoryIndex::build(persons);
                info!(people = index.by_id.len(), "directory loaded");
                Ok(Arc::new(index))
            }
            Err(e) => {
                warn!(error = %e, "directory load failed");
                Err(Arc::new(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SourceResult;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StaticDirectory {
        persons: Vec<DirectoryPerson>,
        fail: bool,
        loads: AtomicUsize,
    }

    impl StaticDirectory {
        fn new(persons: Vec<DirectoryPerson>) -> Self {
            Self {
                persons,
                fail: false,
                loads: AtomicUsize::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                persons: Vec::new(),
                fail: true,
                loads: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl DirectorySource for StaticDirectory {
        async fn load_all_persons(&self) -> SourceResult<Vec<DirectoryPerson>> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(SourceError::connection_failed("directory down"));
            }
            Ok(self.persons.clone())
        }
    }

    #[tokio::test]
    async fn test_lookup_is_case_insensitive_and_strips_urls() {
        let source = Arc::new(StaticDirectory::new(vec![
            DirectoryPerson::new("1", "https://github.com/Alice"),
            DirectoryPerson::new("2", "bob"),
        ]));
        let cache = DirectoryCache::new(source);

        let alice = cache.resolve_by_username("ALICE").await.unwrap().unwrap();
        assert_eq!(alice.directory_id, DirectoryId::new("1"));
        assert_eq!(alice.external_username, "Alice");

        let bob = cache.resolve_by_id(&DirectoryId::new("2")).await.unwrap();
        assert_eq!(bob.unwrap().external_username, "bob");

        assert!(cache.resolve_by_username("carol").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_directory_loaded_once() {
        let source = Arc::new(StaticDirectory::new(vec![DirectoryPerson::new("1", "alice")]));
        let cache = DirectoryCache::new(source.clone());
        assert!(!cache.is_loaded());

        cache.resolve_by_username("alice").await.unwrap();
        cache.resolve_by_id(&DirectoryId::new("1")).await.unwrap();
        cache.resolve_by_username("bob").await.unwrap();

        assert!(cache.is_loaded());
        assert_eq!(source.loads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failed_load_is_memoized() {
        let source = Arc::new(StaticDirectory::failing());
        let cache = DirectoryCache::new(source.clone());

        let first = cache.resolve_by_username("alice").await.unwrap_err();
        let second = cache.resolve_by_id(&DirectoryId::new("1")).await.unwrap_err();

        assert!(first.aborts_run());
        assert_eq!(first.to_string(), second.to_string());
        assert_eq!(source.loads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_duplicate_username_keeps_first() {
        let source = Arc::new(StaticDirectory::new(vec![
            DirectoryPerson::new("1", "alice"),
            DirectoryPerson::new("2", "Alice"),
        ]));
        let cache = DirectoryCache::new(source);

        let alice = cache.resolve_by_username("alice").await.unwrap().unwrap();
        assert_eq!(alice.directory_id, DirectoryId::new("1"));
        assert!(cache.resolve_by_id(&DirectoryId::new("2")).await.unwrap().is_some());
    }
}
