//! Per-team group reconciliation.
//!
//! For one team the reconciler makes sure the remote group exists, carries
//! the desired display name and has exactly the desired members. Every
//! difference is reported as a [`ChangeEvent`] before it is applied; in
//! dry-run mode the events are emitted and nothing is mutated.
//!
//! Membership is written with a single `set_members` call carrying the full
//! desired set, so re-running after a partial failure always converges.
//! Every successful write (or its dry-run stand-in) is recorded in the group
//! cache, so later teams and repeated passes see the state this reconciler
//! produced.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

use crate::cache::{DirectoryCache, GroupCache};
use crate::error::{GroupOperation, SyncError, SyncResult};
use crate::events::ChangeEvent;
use crate::executor::MutationExecutor;
use crate::ids::DirectoryId;
use crate::model::{ExecutionMode, RemoteGroup, Team};
use crate::traits::{ChangeSink, DirectorySource, GroupSource, SyncTarget};

/// Result of reconciling one team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TeamOutcome {
    /// The team declares no group.
    Skipped,
    /// The group already matched; nothing was emitted.
    Converged { handle: String },
    /// At least one change was emitted (and applied in live mode).
    Changed {
        handle: String,
        events: Vec<ChangeEvent>,
    },
}

impl TeamOutcome {
    pub fn events(&self) -> &[ChangeEvent] {
        match self {
            TeamOutcome::Changed { events, .. } => events,
            TeamOutcome::Skipped | TeamOutcome::Converged { .. } => &[],
        }
    }
}

/// Events emitted for the team being reconciled.
struct ChangeLog<'a> {
    sink: &'a dyn ChangeSink,
    events: Vec<ChangeEvent>,
}

impl<'a> ChangeLog<'a> {
    fn new(sink: &'a dyn ChangeSink) -> Self {
        Self {
            sink,
            events: Vec::new(),
        }
    }

    fn emit(&mut self, event: ChangeEvent) {
        self.sink.emit(event.clone());
        self.events.push(event);
    }

    fn into_outcome(self, handle: &str) -> TeamOutcome {
        if self.events.is_empty() {
            TeamOutcome::Converged {
                handle: handle.to_string(),
            }
        } else {
            TeamOutcome::Changed {
                handle: handle.to_string(),
                events: self.events,
            }
        }
    }
}

/// Reconciles teams against one group-management system.
///
/// Owns the per-run caches; create a new reconciler for every run.
pub struct GroupReconciler {
    name: String,
    directory: DirectoryCache,
    groups: GroupCache,
    executor: MutationExecutor,
}

impl GroupReconciler {
    pub fn new(
        directory: Arc<dyn DirectorySource>,
        groups: Arc<dyn GroupSource>,
        mode: ExecutionMode,
    ) -> Self {
        Self {
            name: "groups".to_string(),
            directory: DirectoryCache::new(directory),
            groups: GroupCache::new(Arc::clone(&groups)),
            executor: MutationExecutor::new(groups, mode),
        }
    }

    /// Override the target name used in reports.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn mode(&self) -> ExecutionMode {
        self.executor.mode()
    }

    pub fn directory(&self) -> &DirectoryCache {
        &self.directory
    }

    pub fn groups(&self) -> &GroupCache {
        &self.groups
    }

    /// Reconcile one team, emitting every change to `sink`.
    #[instrument(skip(self, team, sink), fields(team = %team.name))]
    pub async fn reconcile_team(
        &self,
        team: &Team,
        sink: &dyn ChangeSink,
    ) -> SyncResult<TeamOutcome> {
        let Some(handle) = team.handle() else {
            debug!("team declares no group, skipping");
            return Ok(TeamOutcome::Skipped);
        };

        let mut log = ChangeLog::new(sink);

        let mut group = self.ensure_exists(team, handle, &mut log).await?;
        self.ensure_name(team, &mut group, &mut log).await?;
        self.ensure_members(team, &mut group, &mut log).await?;

        Ok(log.into_outcome(handle))
    }

    async fn ensure_exists(
        &self,
        team: &Team,
        handle: &str,
        log: &mut ChangeLog<'_>,
    ) -> SyncResult<RemoteGroup> {
        if let Some(group) = self.groups.find_by_handle(handle).await? {
            return Ok(group);
        }

        log.emit(ChangeEvent::GroupCreated {
            handle: handle.to_string(),
        });

        let created = self
            .executor
            .create_group(handle, team.desired_display_name())
            .await
            .map_err(|e| SyncError::mutation(&team.name, handle, GroupOperation::Create, e))?;

        if self.mode().is_dry_run() {
            self.groups.record(created.clone()).await;
            return Ok(created);
        }

        self.groups.invalidate().await;
        match self.groups.find_by_handle(handle).await? {
            Some(group) => Ok(group),
            None => {
                warn!(handle, "created group not listed yet, using create response");
                self.groups.record(created.clone()).await;
                Ok(created)
            }
        }
    }

    async fn ensure_name(
        &self,
        team: &Team,
        group: &mut RemoteGroup,
        log: &mut ChangeLog<'_>,
    ) -> SyncResult<()> {
        let desired = team.desired_display_name();
        if group.display_name == desired {
            return Ok(());
        }

        log.emit(ChangeEvent::GroupRenamed {
            handle: group.handle.clone(),
            from: group.display_name.clone(),
            to: desired.to_string(),
        });

        self.executor
            .rename_group(&group.id, desired)
            .await
            .map_err(|e| SyncError::mutation(&team.name, &group.handle, GroupOperation::Rename, e))?;

        group.display_name = desired.to_string();
        self.groups.record(group.clone()).await;
        Ok(())
    }

    async fn ensure_members(
        &self,
        team: &Team,
        group: &mut RemoteGroup,
        log: &mut ChangeLog<'_>,
    ) -> SyncResult<()> {
        let desired = self.desired_member_ids(team).await?;
        let current = &group.member_ids;

        if desired == *current {
            debug!(handle = %group.handle, members = desired.len(), "membership up to date");
            return Ok(());
        }

        let mut added = Vec::new();
        for id in desired.difference(current) {
            added.push(self.identity_for(id).await?);
        }

        let mut removed = Vec::new();
        for id in current.difference(&desired) {
            removed.push(self.identity_for(id).await?);
        }

        if !added.is_empty() {
            log.emit(ChangeEvent::MembersAdded {
                handle: group.handle.clone(),
                identities: added,
            });
        }
        if !removed.is_empty() {
            log.emit(ChangeEvent::MembersRemoved {
                handle: group.handle.clone(),
                identities: removed,
            });
        }

        self.executor
            .set_members(&group.id, &desired)
            .await
            .map_err(|e| {
                SyncError::mutation(&team.name, &group.handle, GroupOperation::SetMembers, e)
            })?;

        group.member_ids = desired;
        self.groups.record(group.clone()).await;
        Ok(())
    }

    /// Directory ids of every declared username that exists in the directory.
    async fn desired_member_ids(&self, team: &Team) -> SyncResult<BTreeSet<DirectoryId>> {
        let mut ids = BTreeSet::new();
        for username in team.desired_usernames() {
            match self.directory.resolve_by_username(&username).await? {
                Some(person) => {
                    ids.insert(person.directory_id);
                }
                None => debug!(%username, "no directory entry, dropping from desired members"),
            }
        }
        Ok(ids)
    }

    /// Username for reporting, or the bare id when the person is gone.
    async fn identity_for(&self, id: &DirectoryId) -> SyncResult<String> {
        Ok(self
            .directory
            .resolve_by_id(id)
            .await?
            .map_or_else(|| id.to_string(), |person| person.external_username))
    }
}

#[async_trait]
impl SyncTarget for GroupReconciler {
    fn name(&self) -> &str {
        &self.name
    }

    fn mode(&self) -> ExecutionMode {
        self.executor.mode()
    }

    async fn reconcile(&self, team: &Team, sink: &dyn ChangeSink) -> SyncResult<TeamOutcome> {
        self.reconcile_team(team, sink).await
    }
}
