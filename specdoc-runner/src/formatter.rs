//! Plain-text reports for summaries, outcomes and suite runs.

use crate::assertion::Outcome;
use crate::evaluator::RecordedOutcome;
use crate::failures::HarnessResult;
use crate::summary::{ChildResult, Counts, ResultSummary};
use specdoc::Resource;

/// Format a summary and its link results as an indented tree.
pub fn format_summary(summary: &ResultSummary) -> String {
    let status = if summary.is_satisfied() { "PASS" } else { "FAIL" };
    let mut output = format!("{}: {}\n", status, summary.resource());
    output.push_str(&format!("  {}\n", format_counts(&summary.totals())));
    push_children(&mut output, summary, 1);
    output
}

fn push_children(output: &mut String, summary: &ResultSummary, depth: usize) {
    let indent = "  ".repeat(depth);
    for child in summary.children() {
        let line = match &child.result {
            ChildResult::Processed(nested) => format_counts(&nested.totals()),
            ChildResult::Revisited => "revisited".to_string(),
            ChildResult::Unresolved => "unresolved (no fixture)".to_string(),
            ChildResult::Failed { message } => format!("failed: {}", message),
        };
        output.push_str(&format!("{}-> {}: {}\n", indent, child.resource, line));
        if let ChildResult::Processed(nested) = &child.result {
            push_children(output, nested, depth + 1);
        }
    }
}

fn format_counts(counts: &Counts) -> String {
    format!(
        "{} passed, {} failed, {} exceptions",
        counts.successes, counts.failures, counts.exceptions
    )
}

/// Format one recorded outcome with its location in the document.
pub fn format_failure(resource: &Resource, recorded: &RecordedOutcome) -> String {
    let location = recorded
        .path
        .iter()
        .map(|i| i.to_string())
        .collect::<Vec<_>>()
        .join(".");
    let label = match &recorded.outcome {
        Outcome::Success => "PASS",
        Outcome::Failure { .. } => "FAIL",
        Outcome::Exception(_) => "ERROR",
    };

    let mut output = format!("{}: {} [{}]\n", label, resource, location);
    output.push_str(&format!("  {}: {}\n", recorded.command, recorded.expression));
    match &recorded.outcome {
        Outcome::Success => {}
        Outcome::Failure { expected, actual } => {
            output.push_str(&format!("    expected `{}`, found `{}`\n", expected, actual));
        }
        Outcome::Exception(cause) => {
            output.push_str(&format!("    {}\n", cause.message));
            for line in &cause.context {
                output.push_str(&format!("    {}\n", line));
            }
        }
    }
    output
}

/// Format the totals of a suite run.
pub fn format_harness(result: &HarnessResult) -> String {
    let status = if result.success() { "PASS" } else { "FAIL" };
    let failed = result.total.saturating_sub(result.passed);
    format!(
        "{}: {} documents\n  {} passed, {} failed ({} expected, {} regressions)\n",
        status, result.total, result.passed, failed, result.expected_failures, result.regressions
    )
}
