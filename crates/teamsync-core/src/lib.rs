//! # Team Sync Core
//!
//! Reconciles declared team membership with groups in an external
//! group-management system.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐     ┌─────────────────┐     ┌──────────────────┐
//! │  SyncRunner  │────►│ GroupReconciler │────►│ MutationExecutor │
//! │ (all teams)  │     │   (one team)    │     │ (dry-run / live) │
//! └──────────────┘     └───────┬─────────┘     └────────┬─────────┘
//!                              │                        │
//!                 ┌────────────┴───────────┐            ▼
//!                 ▼                        ▼      ┌─────────────┐
//!         ┌───────────────┐       ┌─────────────┐ │ GroupSource │
//!         │DirectoryCache │       │ GroupCache  │─►             │
//!         └──────┬────────┘       └─────────────┘ └─────────────┘
//!                ▼
//!        ┌─────────────────┐
//!        │ DirectorySource │
//!        └─────────────────┘
//! ```
//!
//! Every difference found is emitted to a [`ChangeSink`] as a
//! [`ChangeEvent`]; the same events are produced in dry-run and live mode.
//!
//! ## Example
//!
//! ```ignore
//! use teamsync_core::prelude::*;
//!
//! let reconciler = GroupReconciler::new(directory, groups, ExecutionMode::DryRun);
//! let runner = SyncRunner::new().with_target(Box::new(reconciler));
//!
//! let report = runner.run(&teams, &TracingSink).await;
//! for event in report.events() {
//!     println!("{}", describe_event(event));
//! }
//! ```

pub mod cache;
pub mod error;
pub mod events;
pub mod executor;
pub mod ids;
pub mod model;
pub mod normalize;
pub mod reconciler;
pub mod report;
pub mod runner;
pub mod traits;

pub use error::{GroupOperation, SourceError, SourceResult, SyncError, SyncResult};
pub use events::{ChangeEvent, FanoutSink, RecordingSink, TracingSink};
pub use ids::{DirectoryId, GroupId};
pub use model::{DirectoryPerson, ExecutionMode, GroupHandle, RemoteGroup, Team};
pub use reconciler::{GroupReconciler, TeamOutcome};
pub use report::{describe_event, join_identities, RunReport, RunSummary};
pub use runner::SyncRunner;
pub use traits::{ChangeSink, DirectorySource, GroupSource, SyncTarget};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::cache::{DirectoryCache, GroupCache};
    pub use crate::error::{SourceError, SourceResult, SyncError, SyncResult};
    pub use crate::events::{ChangeEvent, RecordingSink, TracingSink};
    pub use crate::ids::{DirectoryId, GroupId};
    pub use crate::model::{DirectoryPerson, ExecutionMode, GroupHandle, RemoteGroup, Team};
    pub use crate::reconciler::{GroupReconciler, TeamOutcome};
    pub use crate::report::{describe_event, join_identities, RunReport};
    pub use crate::runner::SyncRunner;
    pub use crate::traits::{ChangeSink, DirectorySource, GroupSource, SyncTarget};
}

// Re-export async_trait for collaborator implementors
pub use async_trait::async_trait;
