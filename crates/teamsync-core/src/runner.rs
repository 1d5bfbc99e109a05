//! Reconciliation pass over every team and every enabled target.

use tracing::{error, info, instrument, warn};

use crate::model::Team;
use crate::report::{RunReport, TargetReport, TeamFailure, TeamReport};
use crate::traits::{ChangeSink, SyncTarget};

/// Runs the enabled targets over the team list.
///
/// Teams are processed strictly one after another so a group created for
/// one team is visible (through the group cache) before the next team is
/// looked at. Targets are independent of each other; each one carries its
/// own execution mode.
#[derive(Default)]
pub struct SyncRunner {
    targets: Vec<Box<dyn SyncTarget>>,
}

impl SyncRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable a target.
    #[must_use]
    pub fn with_target(mut self, target: Box<dyn SyncTarget>) -> Self {
        self.targets.push(target);
        self
    }

    pub fn target_names(&self) -> Vec<&str> {
        self.targets.iter().map(|t| t.name()).collect()
    }

    /// Reconcile every team against every target.
    #[instrument(skip_all, fields(teams = teams.len(), targets = self.targets.len()))]
    pub async fn run(&self, teams: &[Team], sink: &dyn ChangeSink) -> RunReport {
        let mut reports = Vec::with_capacity(self.targets.len());
        for target in &self.targets {
            reports.push(Self::run_target(target.as_ref(), teams, sink).await);
        }

        let report = RunReport::new(reports);
        info!(
            dry_run = report.dry_run,
            changed = report.summary.changed,
            converged = report.summary.converged,
            skipped = report.summary.skipped,
            failed = report.summary.failed,
            "reconciliation pass finished"
        );
        report
    }

    async fn run_target(
        target: &dyn SyncTarget,
        teams: &[Team],
        sink: &dyn ChangeSink,
    ) -> TargetReport {
        let mut report = TargetReport::new(target.name(), target.mode().is_dry_run());

        for team in teams {
            // Once the directory or group list is known to be unavailable,
            // every remaining synced team fails with the same cause.
            if let Some(cause) = &report.aborted {
                if team.handle().is_some() {
                    report.failures.push(TeamFailure {
                        team: team.name.clone(),
                        error_code: "RUN_ABORTED".to_string(),
                        error: cause.clone(),
                    });
                    continue;
                }
            }

            match target.reconcile(team, sink).await {
                Ok(outcome) => report.teams.push(TeamReport {
                    team: team.name.clone(),
                    outcome,
                }),
                Err(e) => {
                    if e.aborts_run() {
                        error!(target = target.name(), team = %team.name, error = %e, "run aborted");
                        report.aborted = Some(e.to_string());
                    } else {
                        warn!(target = target.name(), team = %team.name, error = %e, "team reconciliation failed");
                    }
                    report.failures.push(TeamFailure {
                        team: team.name.clone(),
                        error_code: e.error_code().to_string(),
                        error: e.to_string(),
                    });
                }
            }
        }

        report
    }
}
