use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, instrument, warn};

use crate::error::{SourceError, SyncError, SyncResult};
use crate::model::RemoteGroup;
use crate::traits::GroupSource;

type ListOutcome = Result<Arc<[RemoteGroup]>, Arc<SourceError>>;

/// Memoized list of the remote groups this system may manage.
///
/// External groups are dropped at load time. The memo (success or failure)
/// lives until [`GroupCache::invalidate`] is called.
pub struct GroupCache {
    source: Arc<dyn GroupSource>,
    groups: Mutex<Option<ListOutcome>>,
    fetches: AtomicUsize,
}

impl std::fmt::Debug for GroupCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GroupCache")
            .field("fetches", &self.fetch_count())
            .finish()
    }
}

impl GroupCache {
    pub fn new(source: Arc<dyn GroupSource>) -> Self {
        Self {
            source,
            groups: Mutex::new(None),
            fetches: AtomicUsize::new(0),
        }
    }

    /// Number of times the remote list has been fetched.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::Relaxed)
    }

    /// All managed groups, fetched on first use.
    pub async fn list_groups(&self) -> SyncResult<Arc<[RemoteGroup]>> {
        let mut slot = self.groups.lock().await;
        let outcome = match slot.as_ref() {
            Some(outcome) => outcome.clone(),
            None => {
                let outcome = self.fetch().await;
                *slot = Some(outcome.clone());
                outcome
            }
        };

        outcome.map_err(|cause| SyncError::GroupList { cause })
    }

    /// Find a managed group by exact (case-sensitive) handle.
    pub async fn find_by_handle(&self, handle: &str) -> SyncResult<Option<RemoteGroup>> {
        let groups = self.list_groups().await?;
        Ok(groups.iter().find(|g| g.handle == handle).cloned())
    }

    /// Store the state of a group after one of our own writes.
    ///
    /// Replaces the entry with the same handle, or appends it. Nothing is
    /// stored while no successful list is memoized; the next fetch then
    /// reads the remote state.
    pub async fn record(&self, group: RemoteGroup) {
        let mut slot = self.groups.lock().await;
        if let Some(Ok(groups)) = slot.as_ref() {
            let mut updated: Vec<RemoteGroup> = groups
                .iter()
                .filter(|g| g.handle != group.handle)
                .cloned()
                .collect();
            debug!(handle = %group.handle, "recording group state");
            updated.push(group);
            *slot = Some(Ok(Arc::from(updated)));
        }
    }

    /// Drop the memoized list so the next read fetches again.
    pub async fn invalidate(&self) {
        debug!("invalidating group cache");
        *self.groups.lock().await = None;
    }

    #[instrument(skip(self))]
    async fn fetch(&self) -> ListOutcome {
        self.fetches.fetch_add(1, Ordering::Relaxed);
        match self.source.list_groups().await {
            Ok(groups) => {
                let total = groups.len();
                let managed: Vec<RemoteGroup> = groups.into_iter().filter(|g| !g.external).collect();
                debug!(total, managed = managed.len(), "fetched remote groups");
                Ok(Arc::from(managed))
            }
            Err(e) => {
                warn!(error = %e, "listing remote groups failed");
                Err(Arc::new(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SourceResult;
    use crate::ids::{DirectoryId, GroupId};
    use async_trait::async_trait;
    use std::collections::BTreeSet;
    use std::sync::atomic::AtomicBool;

    struct StaticGroups {
        groups: std::sync::Mutex<Vec<RemoteGroup>>,
        fail: AtomicBool,
    }

    impl StaticGroups {
        fn new(groups: Vec<RemoteGroup>) -> Self {
            Self {
                groups: std::sync::Mutex::new(groups),
                fail: AtomicBool::new(false),
            }
        }
    }

    #[async_trait]
    impl GroupSource for StaticGroups {
        async fn list_groups(&self) -> SourceResult<Vec<RemoteGroup>> {
            if self.fail.load(Ordering::SeqCst) {
                return Err(SourceError::Unavailable {
                    message: "503".into(),
                });
            }
            Ok(self.groups.lock().unwrap().clone())
        }

        async fn create_group(&self, handle: &str, display_name: &str) -> SourceResult<RemoteGroup> {
            let group = RemoteGroup::new("new", handle, display_name);
            self.groups.lock().unwrap().push(group.clone());
            Ok(group)
        }

        async fn rename_group(&self, _id: &GroupId, _display_name: &str) -> SourceResult<()> {
            Ok(())
        }

        async fn set_members(
            &self,
            _id: &GroupId,
            _member_ids: &BTreeSet<DirectoryId>,
        ) -> SourceResult<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_external_groups_are_filtered() {
        let source = Arc::new(StaticGroups::new(vec![
            RemoteGroup::new("1", "infra", "infra"),
            RemoteGroup::new("2", "partners", "partners").external(),
        ]));
        let cache = GroupCache::new(source);

        let groups = cache.list_groups().await.unwrap();
        assert_eq!(groups.len(), 1);
        assert!(cache.find_by_handle("partners").await.unwrap().is_none());
        assert!(cache.find_by_handle("infra").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_handle_match_is_case_sensitive() {
        let source = Arc::new(StaticGroups::new(vec![RemoteGroup::new("1", "infra", "infra")]));
        let cache = GroupCache::new(source);
        assert!(cache.find_by_handle("Infra").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_is_memoized_until_invalidated() {
        let source = Arc::new(StaticGroups::new(vec![RemoteGroup::new("1", "infra", "infra")]));
        let cache = GroupCache::new(source.clone());

        cache.list_groups().await.unwrap();
        cache.list_groups().await.unwrap();
        assert_eq!(cache.fetch_count(), 1);

        source.create_group("docs", "Docs").await.unwrap();
        assert!(cache.find_by_handle("docs").await.unwrap().is_none());

        cache.invalidate().await;
        assert!(cache.find_by_handle("docs").await.unwrap().is_some());
        assert_eq!(cache.fetch_count(), 2);
    }

    #[tokio::test]
    async fn test_failure_is_memoized() {
        let source = Arc::new(StaticGroups::new(Vec::new()));
        source.fail.store(true, Ordering::SeqCst);
        let cache = GroupCache::new(source.clone());

        let err = cache.list_groups().await.unwrap_err();
        assert!(err.aborts_run());

        source.fail.store(false, Ordering::SeqCst);
        assert!(cache.list_groups().await.is_err());
        assert_eq!(cache.fetch_count(), 1);
    }

    #[tokio::test]
    async fn test_record_replaces_and_appends() {
        let source = Arc::new(StaticGroups::new(vec![RemoteGroup::new("1", "infra", "infra")]));
        let cache = GroupCache::new(source);
        cache.list_groups().await.unwrap();

        cache
            .record(RemoteGroup::new("1", "infra", "Infrastructure").with_members(["7"]))
            .await;
        cache
            .record(RemoteGroup::new(GroupId::placeholder("docs"), "docs", "docs"))
            .await;

        let infra = cache.find_by_handle("infra").await.unwrap().unwrap();
        assert_eq!(infra.display_name, "Infrastructure");
        assert!(infra.member_ids.contains(&DirectoryId::new("7")));
        assert!(cache.find_by_handle("docs").await.unwrap().is_some());
        assert_eq!(cache.list_groups().await.unwrap().len(), 2);
        assert_eq!(cache.fetch_count(), 1);
    }

    #[tokio::test]
    async fn test_record_before_first_fetch_is_ignored() {
        let source = Arc::new(StaticGroups::new(vec![RemoteGroup::new("1", "infra", "infra")]));
        let cache = GroupCache::new(source);

        cache
            .record(RemoteGroup::new("1", "infra", "Renamed"))
            .await;

        let infra = cache.find_by_handle("infra").await.unwrap().unwrap();
        assert_eq!(infra.display_name, "infra");
    }
}
