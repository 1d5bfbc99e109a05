//! Data model: desired teams, directory people and remote groups.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::ids::{DirectoryId, GroupId};
use crate::normalize::normalize_username;

/// Group handle declaration of a team.
///
/// `true` uses the team name as handle, a string overrides it, `false`
/// opts the team out of group sync.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GroupHandle {
    Flag(bool),
    Named(String),
}

/// A team as declared in configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    /// Unique team name.
    pub name: String,
    /// Human label for the remote group, defaults to `name`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Group handle declaration; absent means the team is skipped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<GroupHandle>,
    #[serde(default)]
    pub maintainers: BTreeSet<String>,
    #[serde(default)]
    pub members: BTreeSet<String>,
}

impl Team {
    /// Create a team with no group handle and no members.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            display_name: None,
            group: None,
            maintainers: BTreeSet::new(),
            members: BTreeSet::new(),
        }
    }

    /// Set the group handle declaration.
    #[must_use]
    pub fn with_group(mut self, group: GroupHandle) -> Self {
        self.group = Some(group);
        self
    }

    /// Set the display name.
    #[must_use]
    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    /// Add maintainers.
    #[must_use]
    pub fn with_maintainers<I, S>(mut self, usernames: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.maintainers.extend(usernames.into_iter().map(Into::into));
        self
    }

    /// Add members.
    #[must_use]
    pub fn with_members<I, S>(mut self, usernames: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.members.extend(usernames.into_iter().map(Into::into));
        self
    }

    /// Resolved group handle, or `None` when the team is not synced.
    pub fn handle(&self) -> Option<&str> {
        match &self.group {
            Some(GroupHandle::Flag(true)) => Some(&self.name),
            Some(GroupHandle::Named(handle)) => Some(handle),
            Some(GroupHandle::Flag(false)) | None => None,
        }
    }

    /// Display name the remote group should carry.
    pub fn desired_display_name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.name)
    }

    /// Normalized usernames of `maintainers ∪ members`.
    pub fn desired_usernames(&self) -> BTreeSet<String> {
        self.maintainers
            .iter()
            .chain(&self.members)
            .map(|u| normalize_username(u))
            .filter(|u| !u.is_empty())
            .collect()
    }
}

/// A person in the external directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryPerson {
    /// Identifier used by the group-management system.
    pub directory_id: DirectoryId,
    /// Username matched against team declarations.
    pub external_username: String,
}

impl DirectoryPerson {
    pub fn new(directory_id: impl Into<DirectoryId>, external_username: impl Into<String>) -> Self {
        Self {
            directory_id: directory_id.into(),
            external_username: external_username.into(),
        }
    }
}

/// A group in the remote group-management system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteGroup {
    pub id: GroupId,
    /// Immutable lookup key.
    pub handle: String,
    pub display_name: String,
    #[serde(default)]
    pub member_ids: BTreeSet<DirectoryId>,
    /// Federated / externally managed group, never touched by sync.
    #[serde(default)]
    pub external: bool,
}

impl RemoteGroup {
    pub fn new(
        id: impl Into<GroupId>,
        handle: impl Into<String>,
        display_name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            handle: handle.into(),
            display_name: display_name.into(),
            member_ids: BTreeSet::new(),
            external: false,
        }
    }

    #[must_use]
    pub fn with_members<I, D>(mut self, member_ids: I) -> Self
    where
        I: IntoIterator<Item = D>,
        D: Into<DirectoryId>,
    {
        self.member_ids = member_ids.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn external(mut self) -> Self {
        self.external = true;
        self
    }
}

/// Whether mutating calls are issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionMode {
    /// Report every change without calling any mutating operation.
    DryRun,
    /// Apply changes to the remote system.
    Live,
}

impl ExecutionMode {
    pub fn from_dry_run(dry_run: bool) -> Self {
        if dry_run {
            ExecutionMode::DryRun
        } else {
            ExecutionMode::Live
        }
    }

    pub fn is_dry_run(&self) -> bool {
        matches!(self, ExecutionMode::DryRun)
    }
}
