//! Mutation executor bound to an execution mode.

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::{debug, info};

use crate::error::SourceResult;
use crate::ids::{DirectoryId, GroupId};
use crate::model::{ExecutionMode, RemoteGroup};
use crate::traits::GroupSource;

/// Issues group mutations in live mode and turns them into no-ops in dry-run.
pub struct MutationExecutor {
    source: Arc<dyn GroupSource>,
    mode: ExecutionMode,
}

impl MutationExecutor {
    pub fn new(source: Arc<dyn GroupSource>, mode: ExecutionMode) -> Self {
        Self { source, mode }
    }

    pub fn mode(&self) -> ExecutionMode {
        self.mode
    }

    /// Create a group; in dry-run returns a placeholder with no members.
    pub async fn create_group(&self, handle: &str, display_name: &str) -> SourceResult<RemoteGroup> {
        if self.mode.is_dry_run() {
            debug!(handle, "dry-run: skipping group creation");
            return Ok(RemoteGroup::new(
                GroupId::placeholder(handle),
                handle,
                display_name,
            ));
        }

        let group = self.source.create_group(handle, display_name).await?;
        info!(handle, id = %group.id, "created group");
        Ok(group)
    }

    pub async fn rename_group(&self, id: &GroupId, display_name: &str) -> SourceResult<()> {
        if self.mode.is_dry_run() {
            debug!(%id, display_name, "dry-run: skipping rename");
            return Ok(());
        }

        self.source.rename_group(id, display_name).await?;
        info!(%id, display_name, "renamed group");
        Ok(())
    }

    pub async fn set_members(
        &self,
        id: &GroupId,
        member_ids: &BTreeSet<DirectoryId>,
    ) -> SourceResult<()> {
        if self.mode.is_dry_run() {
            debug!(%id, members = member_ids.len(), "dry-run: skipping membership update");
            return Ok(());
        }

        self.source.set_members(id, member_ids).await?;
        info!(%id, members = member_ids.len(), "updated group membership");
        Ok(())
    }
}
