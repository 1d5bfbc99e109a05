//! Identifier newtypes
//!
//! Remote systems assign their own opaque identifiers; they are kept as
//! strings so numeric and GUID-style ids are handled the same way.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a person in the external directory.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DirectoryId(String);

impl DirectoryId {
    /// Create a DirectoryId from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DirectoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DirectoryId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for DirectoryId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<u64> for DirectoryId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

/// Identifier assigned to a group by the remote system.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(String);

impl GroupId {
    const PLACEHOLDER_PREFIX: &'static str = "dry-run:";

    /// Create a GroupId from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Synthetic id standing in for a group that dry-run mode did not create.
    pub fn placeholder(handle: &str) -> Self {
        Self(format!("{}{handle}", Self::PLACEHOLDER_PREFIX))
    }

    /// Whether this id was produced by [`GroupId::placeholder`].
    pub fn is_placeholder(&self) -> bool {
        self.0.starts_with(Self::PLACEHOLDER_PREFIX)
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for GroupId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for GroupId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<u64> for GroupId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}
