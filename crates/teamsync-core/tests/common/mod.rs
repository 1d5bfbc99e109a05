//! In-memory collaborators for reconciliation tests.

#![allow(dead_code)]

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, Once};

use teamsync_core::prelude::*;
use teamsync_core::async_trait;

static INIT: Once = Once::new();

/// Initialize logging for tests (once).
pub fn init_test_logging() {
    INIT.call_once(|| {
        if std::env::var("RUST_LOG").is_ok() {
            tracing_subscriber::fmt()
                .with_test_writer()
                .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
                .try_init()
                .ok();
        }
    });
}

// =============================================================================
// Directory
// =============================================================================

/// Directory backed by a fixed list of people.
pub struct FakeDirectory {
    persons: Vec<DirectoryPerson>,
    fail: AtomicBool,
    loads: AtomicUsize,
}

impl FakeDirectory {
    pub fn new(entries: &[(&str, &str)]) -> Self {
        Self {
            persons: entries
                .iter()
                .map(|(id, username)| DirectoryPerson::new(*id, *username))
                .collect(),
            fail: AtomicBool::new(false),
            loads: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        let directory = Self::new(&[]);
        directory.fail.store(true, Ordering::SeqCst);
        directory
    }

    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DirectorySource for FakeDirectory {
    async fn load_all_persons(&self) -> SourceResult<Vec<DirectoryPerson>> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(SourceError::connection_failed("directory unreachable"));
        }
        Ok(self.persons.clone())
    }
}

// =============================================================================
// Group API
// =============================================================================

/// A mutating call received by [`FakeGroupApi`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupCall {
    Create { handle: String, display_name: String },
    Rename { id: GroupId, display_name: String },
    SetMembers { id: GroupId, members: Vec<String> },
}

/// Group API keeping its state in memory.
pub struct FakeGroupApi {
    groups: Mutex<Vec<RemoteGroup>>,
    calls: Mutex<Vec<GroupCall>>,
    lists: AtomicUsize,
    next_id: AtomicUsize,
    fail_list: AtomicBool,
    fail_create: AtomicBool,
    fail_rename: AtomicBool,
    fail_set_members_for: Mutex<Option<String>>,
}

impl FakeGroupApi {
    pub fn new(groups: Vec<RemoteGroup>) -> Self {
        Self {
            groups: Mutex::new(groups),
            calls: Mutex::new(Vec::new()),
            lists: AtomicUsize::new(0),
            next_id: AtomicUsize::new(100),
            fail_list: AtomicBool::new(false),
            fail_create: AtomicBool::new(false),
            fail_rename: AtomicBool::new(false),
            fail_set_members_for: Mutex::new(None),
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn with_list_error(self) -> Self {
        self.fail_list.store(true, Ordering::SeqCst);
        self
    }

    pub fn with_create_error(self) -> Self {
        self.fail_create.store(true, Ordering::SeqCst);
        self
    }

    pub fn with_rename_error(self) -> Self {
        self.fail_rename.store(true, Ordering::SeqCst);
        self
    }

    /// Make `set_members` fail for the group with this handle.
    pub fn with_set_members_error(self, handle: &str) -> Self {
        *self.fail_set_members_for.lock().unwrap() = Some(handle.to_string());
        self
    }

    pub fn calls(&self) -> Vec<GroupCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn list_count(&self) -> usize {
        self.lists.load(Ordering::SeqCst)
    }

    pub fn group(&self, handle: &str) -> Option<RemoteGroup> {
        self.groups
            .lock()
            .unwrap()
            .iter()
            .find(|g| g.handle == handle)
            .cloned()
    }

    pub fn group_count(&self) -> usize {
        self.groups.lock().unwrap().len()
    }
}

#[async_trait]
impl GroupSource for FakeGroupApi {
    async fn list_groups(&self) -> SourceResult<Vec<RemoteGroup>> {
        self.lists.fetch_add(1, Ordering::SeqCst);
        if self.fail_list.load(Ordering::SeqCst) {
            return Err(SourceError::Unavailable {
                message: "HTTP 503".into(),
            });
        }
        Ok(self.groups.lock().unwrap().clone())
    }

    async fn create_group(&self, handle: &str, display_name: &str) -> SourceResult<RemoteGroup> {
        self.calls.lock().unwrap().push(GroupCall::Create {
            handle: handle.to_string(),
            display_name: display_name.to_string(),
        });
        if self.fail_create.load(Ordering::SeqCst) {
            return Err(SourceError::AuthorizationFailed {
                operation: "create group".into(),
            });
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst) as u64;
        let group = RemoteGroup::new(id, handle, display_name);
        self.groups.lock().unwrap().push(group.clone());
        Ok(group)
    }

    async fn rename_group(&self, id: &GroupId, display_name: &str) -> SourceResult<()> {
        self.calls.lock().unwrap().push(GroupCall::Rename {
            id: id.clone(),
            display_name: display_name.to_string(),
        });
        if self.fail_rename.load(Ordering::SeqCst) {
            return Err(SourceError::operation_failed("rename rejected"));
        }

        let mut groups = self.groups.lock().unwrap();
        let group = groups
            .iter_mut()
            .find(|g| &g.id == id)
            .ok_or_else(|| SourceError::NotFound {
                identifier: id.to_string(),
            })?;
        group.display_name = display_name.to_string();
        Ok(())
    }

    async fn set_members(
        &self,
        id: &GroupId,
        member_ids: &BTreeSet<DirectoryId>,
    ) -> SourceResult<()> {
        self.calls.lock().unwrap().push(GroupCall::SetMembers {
            id: id.clone(),
            members: member_ids.iter().map(ToString::to_string).collect(),
        });

        let mut groups = self.groups.lock().unwrap();
        let group = groups
            .iter_mut()
            .find(|g| &g.id == id)
            .ok_or_else(|| SourceError::NotFound {
                identifier: id.to_string(),
            })?;

        if self.fail_set_members_for.lock().unwrap().as_deref() == Some(group.handle.as_str()) {
            return Err(SourceError::operation_failed("membership update rejected"));
        }

        group.member_ids = member_ids.clone();
        Ok(())
    }
}

/// Team synced under its own name.
pub fn synced_team(name: &str, members: &[&str]) -> Team {
    Team::new(name)
        .with_group(GroupHandle::Flag(true))
        .with_members(members.iter().copied())
}
