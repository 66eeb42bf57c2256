//! Terminal output
//!
//! Rendering of run summaries, override pass results and task listings.

use crate::graph::{ExecutionPlan, Origin};
use crate::runner::{Outcome, RunReport, Verbosity};
use colored::{ColoredString, Colorize};

/// Colored label for an outcome
pub fn outcome_label(outcome: &Outcome) -> ColoredString {
    let label = outcome.label();
    match outcome {
        Outcome::Succeeded => label.green(),
        Outcome::Skipped => label.yellow(),
        Outcome::Failed(_) => label.red().bold(),
        Outcome::Blocked(_) => label.red(),
        Outcome::NotRun => label.dimmed(),
    }
}

/// Print what each override pass disabled
pub fn print_overrides(plan: &ExecutionPlan, verbosity: Verbosity) {
    if verbosity < Verbosity::Verbose {
        return;
    }

    let passes = [
        ("after-evaluate", plan.after_evaluate_report()),
        ("graph-ready", plan.graph_ready_report()),
    ];
    for (name, report) in passes {
        if report.is_empty() {
            eprintln!("[DEBUG] {} pass disabled nothing", name);
        } else {
            eprintln!(
                "[DEBUG] {} pass disabled: {}",
                name,
                report.disabled.join(", ")
            );
        }
    }
}

/// Print the per-task summary of a run
pub fn print_report(report: &RunReport, verbosity: Verbosity) {
    if verbosity < Verbosity::Normal && report.is_success() {
        return;
    }
    if verbosity == Verbosity::Silent {
        return;
    }

    eprintln!();
    for (id, outcome) in report.outcomes() {
        match outcome {
            Outcome::Failed(reason) => eprintln!("{:>8} {} ({})", outcome_label(outcome), id, reason),
            Outcome::Blocked(dep) => {
                eprintln!("{:>8} {} (dependency '{}' failed)", outcome_label(outcome), id, dep)
            }
            _ => eprintln!("{:>8} {}", outcome_label(outcome), id),
        }
    }

    let ok = report.with_label(Outcome::Succeeded.label()).len();
    let skipped = report.with_label(Outcome::Skipped.label()).len();
    let failed = report.with_label("FAILED").len();
    let summary = format!("{} succeeded, {} skipped, {} failed", ok, skipped, failed);

    if report.is_success() {
        eprintln!("{} {}", "BUILD SUCCESSFUL".green().bold(), summary);
    } else {
        eprintln!("{} {}", "BUILD FAILED".red().bold(), summary);
    }
}

/// Print a task listing in execution order
///
/// Tasks materialized by task rules are only shown with `show_all`.
pub fn print_task_list(plan: &ExecutionPlan, show_all: bool) {
    for task in plan.tasks() {
        if !show_all && task.origin() == Origin::Rule {
            continue;
        }

        let state = if task.is_enabled() {
            "enabled".green()
        } else {
            "disabled".yellow()
        };

        let mut line = format!("{} [{}]", task.id().bold(), state);
        if let Some(desc) = &task.description {
            line.push_str(&format!(" - {}", desc));
        }
        if !task.dependencies().is_empty() {
            line.push_str(&format!(" (after: {})", task.dependencies().join(", ")));
        }
        if task.origin() == Origin::Rule {
            line.push_str(" (from rule)");
        }
        println!("{}", line);
    }
}
