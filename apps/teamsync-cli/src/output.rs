//! Human-readable rendering of run reports.

use std::fmt::Write as _;

use teamsync_core::model::Team;
use teamsync_core::{describe_event, RunReport, TeamOutcome};

const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const RESET: &str = "\x1b[0m";

fn use_color() -> bool {
    std::env::var("NO_COLOR").is_err()
}

fn paint(text: &str, color: &str, enabled: bool) -> String {
    if enabled {
        format!("{color}{text}{RESET}")
    } else {
        text.to_string()
    }
}

/// Render a run report as text.
pub fn render_report(report: &RunReport, color: bool) -> String {
    let mut out = String::new();

    if report.dry_run {
        let _ = writeln!(out, "Dry run - no changes will be made.");
        let _ = writeln!(out);
    }

    for target in &report.targets {
        let _ = writeln!(out, "Target: {}", target.target);
        let prefix = if target.dry_run { "[dry-run] " } else { "" };

        for team in &target.teams {
            if let TeamOutcome::Changed { events, .. } = &team.outcome {
                for event in events {
                    let _ = writeln!(
                        out,
                        "  {}{prefix}{}",
                        paint("~ ", YELLOW, color),
                        describe_event(event)
                    );
                }
            }
        }

        for failure in &target.failures {
            let _ = writeln!(
                out,
                "  {} {}: {}",
                paint("✗", RED, color),
                failure.team,
                failure.error
            );
        }

        if let Some(cause) = &target.aborted {
            let _ = writeln!(out, "  {} {cause}", paint("aborted:", RED, color));
        }
    }

    let summary = &report.summary;
    let status = if summary.failed > 0 {
        paint("✗", RED, color)
    } else {
        paint("✓", GREEN, color)
    };
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "{status} {} changed, {} converged, {} skipped, {} failed ({} change(s))",
        summary.changed, summary.converged, summary.skipped, summary.failed, summary.changes
    );

    out
}

/// Print a run report to stdout.
pub fn print_report(report: &RunReport) {
    print!("{}", render_report(report, use_color()));
}

/// Render the team list shown by `validate`.
pub fn render_team_list(teams: &[Team]) -> String {
    let mut out = String::new();
    for team in teams {
        match team.handle() {
            Some(handle) => {
                let _ = writeln!(
                    out,
                    "  {} -> group `{handle}` ({} member(s))",
                    team.name,
                    team.desired_usernames().len()
                );
            }
            None => {
                let _ = writeln!(out, "  {} (not synced)", team.name);
            }
        }
    }
    out
}
