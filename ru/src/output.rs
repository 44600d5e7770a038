//! Human-readable report rendering.

use ru_common::report::AggregateReport;
use std::io::Write;

/// Render the categorized report, omitting empty categories.
pub fn render(
    out: &mut impl Write,
    branch: &str,
    report: &AggregateReport,
) -> std::io::Result<()> {
    section(
        out,
        &format!("Repositories not on branch {branch}, skipping:"),
        &report.not_on_branch,
    )?;
    section(
        out,
        "Repositories with uncommitted changes, skipping:",
        &report.uncommitted_changes,
    )?;
    section(
        out,
        "Repositories with unpushed commits, skipping:",
        &report.unpushed_commits,
    )?;
    section(
        out,
        "Repositories with no updates remotely, skipping:",
        &report.no_remote_updates,
    )?;
    section(
        out,
        "Repositories with a failed update:",
        &report.update_failed,
    )?;
    section(
        out,
        "Repositories successfully updated:",
        &report.updated,
    )?;
    Ok(())
}

fn section(out: &mut impl Write, header: &str, names: &[String]) -> std::io::Result<()> {
    if names.is_empty() {
        return Ok(());
    }
    writeln!(out, "\n{header}\n- {}", names.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_report_renders_nothing() {
        let mut buf = Vec::new();
        render(&mut buf, "master", &AggregateReport::default()).unwrap();
        assert!(buf.is_empty());
    }

    #[test]
    fn populated_categories_render_with_headers() {
        let report = AggregateReport {
            not_on_branch: vec!["a".into()],
            updated: vec!["b".into(), "c".into()],
            ..AggregateReport::default()
        };
        let mut buf = Vec::new();
        render(&mut buf, "master", &report).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert!(text.contains("Repositories not on branch master, skipping:\n- a"));
        assert!(text.contains("Repositories successfully updated:\n- b, c"));
        assert!(!text.contains("uncommitted"));
    }
}
