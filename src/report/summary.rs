//! Plain-text summary of a run outcome.

use crate::compliance::ScanResult;
use crate::monitor::RunOutcome;

/// Renders the plain-text summary printed when Markdown output is off.
#[must_use]
pub fn render_summary(outcome: &RunOutcome) -> String {
    let mut summary = String::new();

    match outcome.pull_requests.as_deref() {
        Some(results) => push_pull_request_summary(&mut summary, results),
        None => summary.push_str("PR Checker monitor is disabled in configuration\n"),
    }

    match outcome.recently_public.as_deref() {
        Some([]) => summary.push_str("\nNo organization repositories were recently made public\n"),
        Some(repositories) => {
            summary.push_str("\nWARNING: The following repositories were recently made public:\n");
            for repository in repositories {
                summary.push_str(&format!("  - {repository}\n"));
            }
        }
        None => summary.push_str("\nRepository Visibility monitor is disabled in configuration\n"),
    }

    if outcome.has_errors() {
        summary.push_str("\nOne or more monitors encountered processing errors\n");
    } else if !outcome.has_findings() {
        summary.push_str("\nAll monitors completed successfully\n");
    }
    summary
}

fn push_pull_request_summary(summary: &mut String, results: &[ScanResult]) {
    let errors: Vec<&ScanResult> = results.iter().filter(|r| r.error.is_some()).collect();
    let unapproved: Vec<&ScanResult> = results
        .iter()
        .filter(|r| r.error.is_none() && !r.unapproved.is_empty())
        .collect();
    let approved: Vec<&str> = results
        .iter()
        .filter(|r| r.is_compliant())
        .map(|r| r.repository.as_str())
        .collect();

    if !errors.is_empty() {
        summary.push_str("ERRORS ENCOUNTERED:\n");
        for result in &errors {
            if let Some(error) = &result.error {
                summary.push_str(&format!("  {}: {error}\n", result.repository));
            }
        }
        summary.push('\n');
    }

    if !unapproved.is_empty() {
        summary.push_str("UNAPPROVED PULL REQUESTS:\n");
        for result in &unapproved {
            for pr in &result.unapproved {
                summary.push_str(&format!(
                    "- {} #{}: {} (created by {}) {}\n",
                    result.repository, pr.number, pr.title, pr.author, pr.url
                ));
            }
        }
        summary.push('\n');
    }

    summary.push_str("SUMMARY:\n");
    if !errors.is_empty() {
        summary.push_str(&format!("  Repositories with errors: {}\n", errors.len()));
    }
    if !unapproved.is_empty() {
        summary.push_str(&format!(
            "  Repositories with unapproved PRs: {}\n",
            unapproved.len()
        ));
    }
    summary.push_str(&format!(
        "  Repositories with all PRs approved: {}\n",
        approved.len()
    ));
    summary.push_str(&format!("  Total repositories checked: {}\n", results.len()));

    if !approved.is_empty() {
        summary.push_str("\nREPOSITORIES WITH ALL PRS APPROVED:\n");
        summary.push_str(&format!("  {}\n", approved.join(", ")));
    }
}
