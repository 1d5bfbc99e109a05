//! Collaborator and target traits
//!
//! The reconciler only talks to the outside world through these seams;
//! concrete transports live in connector crates.

use async_trait::async_trait;
use std::collections::BTreeSet;

use crate::error::{SourceResult, SyncResult};
use crate::events::ChangeEvent;
use crate::ids::{DirectoryId, GroupId};
use crate::model::{DirectoryPerson, ExecutionMode, RemoteGroup, Team};
use crate::reconciler::TeamOutcome;

/// Read-only access to the external person directory.
#[async_trait]
pub trait DirectorySource: Send + Sync {
    /// Fetch every person in the directory in one shot.
    async fn load_all_persons(&self) -> SourceResult<Vec<DirectoryPerson>>;
}

/// Access to the remote group-management system.
#[async_trait]
pub trait GroupSource: Send + Sync {
    /// List all groups, including external ones.
    async fn list_groups(&self) -> SourceResult<Vec<RemoteGroup>>;

    /// Create a group. The remote system assigns the id.
    async fn create_group(&self, handle: &str, display_name: &str) -> SourceResult<RemoteGroup>;

    /// Change the display name of a group.
    async fn rename_group(&self, id: &GroupId, display_name: &str) -> SourceResult<()>;

    /// Replace the full membership of a group.
    async fn set_members(&self, id: &GroupId, member_ids: &BTreeSet<DirectoryId>)
        -> SourceResult<()>;
}

/// Receiver of change events.
pub trait ChangeSink: Send + Sync {
    fn emit(&self, event: ChangeEvent);
}

/// A reconciliation target: one remote system kept in sync with the teams.
///
/// Each target owns its caches; targets share no mutable state.
#[async_trait]
pub trait SyncTarget: Send + Sync {
    /// Short name used in reports and logs.
    fn name(&self) -> &str;

    /// Whether this target applies its changes.
    fn mode(&self) -> ExecutionMode;

    /// Reconcile one team.
    async fn reconcile(&self, team: &Team, sink: &dyn ChangeSink) -> SyncResult<TeamOutcome>;
}
