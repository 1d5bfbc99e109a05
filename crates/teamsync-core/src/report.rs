//! Run reports and human-readable change descriptions.

use serde::{Deserialize, Serialize};

use crate::events::ChangeEvent;
use crate::reconciler::TeamOutcome;

/// Join identities as prose: `a`, `a and b`, `a, b and c`.
pub fn join_identities<S: AsRef<str>>(items: &[S]) -> String {
    match items {
        [] => String::new(),
        [only] => only.as_ref().to_string(),
        [init @ .., last] => {
            let head: Vec<&str> = init.iter().map(|s| s.as_ref()).collect();
            format!("{} and {}", head.join(", "), last.as_ref())
        }
    }
}

/// One-line description of a change event.
pub fn describe_event(event: &ChangeEvent) -> String {
    match event {
        ChangeEvent::GroupCreated { handle } => format!("created group `{handle}`"),
        ChangeEvent::GroupRenamed { handle, from, to } => {
            format!("renamed group `{handle}` from `{from}` to `{to}`")
        }
        ChangeEvent::MembersAdded { handle, identities } => {
            format!(
                "added {} to group `{handle}`",
                join_identities(identities.as_slice())
            )
        }
        ChangeEvent::MembersRemoved { handle, identities } => {
            format!(
                "removed {} from group `{handle}`",
                join_identities(identities.as_slice())
            )
        }
    }
}

/// Outcome of one team on one target.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamReport {
    pub team: String,
    #[serde(flatten)]
    pub outcome: TeamOutcome,
}

/// A team whose reconciliation was aborted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamFailure {
    pub team: String,
    pub error_code: String,
    pub error: String,
}

/// Results of one target across all teams.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetReport {
    pub target: String,
    /// Whether this target ran without applying changes.
    pub dry_run: bool,
    pub teams: Vec<TeamReport>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<TeamFailure>,
    /// Cause of a run-fatal error, if one stopped this target early.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aborted: Option<String>,
}

impl TargetReport {
    pub fn new(target: impl Into<String>, dry_run: bool) -> Self {
        Self {
            target: target.into(),
            dry_run,
            teams: Vec::new(),
            failures: Vec::new(),
            aborted: None,
        }
    }
}

/// Counts across every target of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub changed: usize,
    pub converged: usize,
    pub skipped: usize,
    pub failed: usize,
    pub changes: usize,
}

/// Full result of a reconciliation pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// True when every target ran in dry-run mode.
    pub dry_run: bool,
    pub targets: Vec<TargetReport>,
    pub summary: RunSummary,
}

impl RunReport {
    pub fn new(targets: Vec<TargetReport>) -> Self {
        let dry_run = !targets.is_empty() && targets.iter().all(|t| t.dry_run);
        let mut summary = RunSummary::default();
        for target in &targets {
            for team in &target.teams {
                match &team.outcome {
                    TeamOutcome::Skipped => summary.skipped += 1,
                    TeamOutcome::Converged { .. } => summary.converged += 1,
                    TeamOutcome::Changed { events, .. } => {
                        summary.changed += 1;
                        summary.changes += events.len();
                    }
                }
            }
            summary.failed += target.failures.len();
        }

        Self {
            dry_run,
            targets,
            summary,
        }
    }

    pub fn has_failures(&self) -> bool {
        self.summary.failed > 0
    }

    /// Every emitted event in run order.
    pub fn events(&self) -> impl Iterator<Item = &ChangeEvent> {
        self.targets
            .iter()
            .flat_map(|t| t.teams.iter())
            .flat_map(|t| t.outcome.events())
    }
}
