//! Markdown rendering of a run outcome.

use crate::compliance::ScanResult;
use crate::monitor::RunOutcome;

/// Report body used when nothing needs attention.
pub const NO_ISSUES_MARKDOWN: &str =
    "## :white_check_mark: No Issues Found\n\nAll repositories are compliant with policies.\n";

/// Renders the Markdown report.
///
/// Sections appear only when they have content: unapproved pull requests,
/// scan errors, then recently public repositories. An outcome with none of
/// these renders [`NO_ISSUES_MARKDOWN`].
#[must_use]
pub fn render_markdown(outcome: &RunOutcome) -> String {
    let mut report = String::new();
    let results = outcome.pull_requests.as_deref().unwrap_or_default();

    push_unapproved(&mut report, results);
    push_errors(&mut report, results);
    push_recently_public(
        &mut report,
        outcome.recently_public.as_deref().unwrap_or_default(),
    );

    if report.is_empty() {
        NO_ISSUES_MARKDOWN.to_owned()
    } else {
        report
    }
}

fn push_unapproved(report: &mut String, results: &[ScanResult]) {
    let mut rows = results
        .iter()
        .filter(|result| result.error.is_none())
        .flat_map(|result| {
            result
                .unapproved
                .iter()
                .map(move |pr| (result.repository.as_str(), pr))
        })
        .peekable();
    if rows.peek().is_none() {
        return;
    }

    report.push_str("## :x: Unapproved Pull Requests\n\n");
    report.push_str("| Repository | Pull Request | Title | Author |\n");
    report.push_str("|------------|--------------|-------|--------|\n");
    for (repository, pr) in rows {
        report.push_str(&format!(
            "| {repository} | [#{number}]({url}) | {title} | {author} |\n",
            number = pr.number,
            url = pr.url,
            title = escape_cell(&pr.title),
            author = escape_cell(&pr.author),
        ));
    }
    report.push('\n');
}

fn push_errors(report: &mut String, results: &[ScanResult]) {
    let mut failures = results
        .iter()
        .filter_map(|result| result.error.as_ref().map(|error| (&result.repository, error)))
        .peekable();
    if failures.peek().is_none() {
        return;
    }

    report.push_str("## :warning: Errors\n\n");
    for (repository, error) in failures {
        report.push_str(&format!("- `{repository}`: {error}\n"));
    }
    report.push('\n');
}

fn push_recently_public(report: &mut String, repositories: &[String]) {
    if repositories.is_empty() {
        return;
    }

    report.push_str("## :warning: Recently Public Repositories\n\n");
    report.push_str("| Repository | Action Needed |\n");
    report.push_str("|------------|---------------|\n");
    for repository in repositories {
        report.push_str(&format!("| {repository} | Review visibility settings |\n"));
    }
    report.push('\n');
}

fn escape_cell(value: &str) -> String {
    value.replace('|', "\\|").replace('\n', " ")
}
