//! Report rendering and exit status

use std::fmt::Write as _;

use crate::error::Result;
use crate::types::{AnalysisResult, AnalysisRun, IssueSeverity};

/// Which issue severity makes the run fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailOn {
    #[default]
    Error,
    Warning,
}

/// Process exit code for a finished run.
///
/// `0` means OK, `1` warnings (only with [`FailOn::Warning`]), `2` errors.
/// Routes that could not be analyzed count as errors.
pub fn exit_code(run: &AnalysisRun, fail_on: FailOn) -> i32 {
    let has_errors = !run.failures.is_empty()
        || run
            .results
            .iter()
            .any(|result| result.has_severity(IssueSeverity::Error));
    let has_warnings = run
        .results
        .iter()
        .any(|result| result.has_severity(IssueSeverity::Warning));

    match fail_on {
        _ if has_errors => 2,
        FailOn::Warning if has_warnings => 1,
        _ => 0,
    }
}

/// Mean route score rounded to the nearest integer, 0 when nothing was analyzed
pub fn overall_score(results: &[AnalysisResult]) -> u8 {
    if results.is_empty() {
        return 0;
    }
    let total: u32 = results.iter().map(|result| u32::from(result.score)).sum();
    (f64::from(total) / results.len() as f64).round() as u8
}

fn status_marker(score: u8) -> &'static str {
    match score {
        90..=u8::MAX => "🟢",
        70..=89 => "🟡",
        _ => "🔴",
    }
}

fn severity_marker(severity: IssueSeverity) -> &'static str {
    match severity {
        IssueSeverity::Error => "❌",
        IssueSeverity::Warning => "⚠️",
    }
}

/// Render a run as a Markdown report
pub fn render_markdown(run: &AnalysisRun) -> String {
    let mut md = String::from("# SEO Analysis Report\n\n");

    let _ = writeln!(md, "**Overall Score**: {}/100", overall_score(&run.results));
    let _ = writeln!(md, "**Pages Analyzed**: {}", run.results.len());
    if run.skipped_dynamic > 0 {
        let _ = writeln!(md, "**Dynamic Routes Skipped**: {}", run.skipped_dynamic);
    }
    if run.excluded > 0 {
        let _ = writeln!(md, "**Routes Excluded**: {}", run.excluded);
    }
    md.push('\n');

    for result in &run.results {
        let _ = writeln!(
            md,
            "## {} {} (Score: {})",
            status_marker(result.score),
            result.route,
            result.score
        );

        if result.issues.is_empty() {
            md.push_str("✅ No issues found.\n");
        }
        for issue in &result.issues {
            let _ = write!(
                md,
                "- {} **{}**: {}",
                severity_marker(issue.severity),
                issue.rule,
                issue.message
            );
            if let Some(value) = &issue.value {
                let _ = write!(md, " (Value: {value})");
            }
            md.push('\n');
        }
        md.push('\n');
    }

    if !run.failures.is_empty() {
        md.push_str("## Failed Routes\n\n");
        for failure in &run.failures {
            let _ = writeln!(
                md,
                "- ❌ {} (`{}`): {}",
                failure.route,
                failure.source.display(),
                failure.reason
            );
        }
        md.push('\n');
    }

    md
}

/// Render a run as pretty-printed JSON
pub fn render_json(run: &AnalysisRun) -> Result<String> {
    Ok(serde_json::to_string_pretty(run)?)
}
