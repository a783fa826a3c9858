//! SEO rule evaluation and scoring
//!
//! Every page starts at 100 and loses a fixed number of points for each
//! triggered rule. Per-page evaluation covers the H1, thin content and text
//! density checks; duplicate titles and descriptions need the whole route
//! set and are flagged in a second pass by [`flag_duplicates`].

use std::collections::HashMap;

use crate::config::{RuleSettings, SeoRules};
use crate::types::{
    AnalysisResult, ContentMetrics, Issue, IssueSeverity, IssueValue, PageHead, RuleId,
};

const MAX_SCORE: u32 = 100;

/// Pages below this word count are reported as thin content
pub const THIN_CONTENT_WORDS: usize = 200;
/// Pages below this text-to-markup ratio are reported as markup heavy
pub const LOW_TEXT_RATIO: f64 = 0.1;

const MISSING_H1_ERROR_DEDUCTION: u32 = 20;
const MISSING_H1_WARNING_DEDUCTION: u32 = 10;
const MULTIPLE_H1_DEDUCTION: u32 = 5;
const THIN_CONTENT_DEDUCTION: u32 = 15;

/// Issues and the deductions they carry, in rule order
#[derive(Debug, Default)]
struct Findings {
    issues: Vec<Issue>,
    deductions: Vec<u32>,
}

impl Findings {
    fn push(&mut self, issue: Issue, deduction: Option<u32>) {
        self.issues.push(issue);
        if let Some(points) = deduction {
            self.deductions.push(points);
        }
    }

    fn score(&self) -> u8 {
        let total: u32 = self.deductions.iter().sum();
        MAX_SCORE.saturating_sub(total) as u8
    }
}

/// Evaluate one page's metrics against the rule configuration.
///
/// Pure function of its inputs: the same route, metrics and rules always
/// yield the same result.
pub fn evaluate(route: &str, metrics: &ContentMetrics, rules: &SeoRules) -> AnalysisResult {
    let mut findings = Findings::default();

    check_h1(metrics, &rules.has_h1, &mut findings);
    check_thin_content(metrics, &mut findings);
    check_text_ratio(metrics, &mut findings);

    AnalysisResult {
        route: route.to_string(),
        score: findings.score(),
        issues: findings.issues,
    }
}

fn check_h1(metrics: &ContentMetrics, rule: &RuleSettings, findings: &mut Findings) {
    let Some(severity) = rule.active_severity() else {
        return;
    };

    if metrics.h1_count == 0 {
        let deduction = match severity {
            IssueSeverity::Error => MISSING_H1_ERROR_DEDUCTION,
            IssueSeverity::Warning => MISSING_H1_WARNING_DEDUCTION,
        };
        findings.push(
            Issue {
                rule: RuleId::HasH1,
                message: "Page is missing Level 1 Heading (<h1>)".to_string(),
                severity,
                value: None,
            },
            Some(deduction),
        );
    } else if metrics.h1_count > 1 {
        // Always a warning, whatever severity the rule is configured with
        findings.push(
            Issue {
                rule: RuleId::HasH1,
                message: "Page has multiple H1 tags. Use only one per page.".to_string(),
                severity: IssueSeverity::Warning,
                value: Some(IssueValue::Count(metrics.h1_count)),
            },
            Some(MULTIPLE_H1_DEDUCTION),
        );
    }
}

fn check_thin_content(metrics: &ContentMetrics, findings: &mut Findings) {
    if metrics.word_count < THIN_CONTENT_WORDS {
        findings.push(
            Issue {
                rule: RuleId::ThinContent,
                message: format!("Thin content detected: Only {} words.", metrics.word_count),
                severity: IssueSeverity::Warning,
                value: Some(IssueValue::Count(metrics.word_count)),
            },
            Some(THIN_CONTENT_DEDUCTION),
        );
    }
}

fn check_text_ratio(metrics: &ContentMetrics, findings: &mut Findings) {
    if metrics.text_to_markup_ratio < LOW_TEXT_RATIO {
        // Informational: reported without a deduction
        findings.push(
            Issue {
                rule: RuleId::LowTextRatio,
                message: "Low Text-to-HTML ratio. This might indicate code bloat.".to_string(),
                severity: IssueSeverity::Warning,
                value: Some(IssueValue::Text(format!(
                    "{:.2}",
                    metrics.text_to_markup_ratio
                ))),
            },
            None,
        );
    }
}

/// Flag routes sharing a title or description with an earlier route.
///
/// `results` and `heads` are parallel slices. Routes are compared in
/// `results` order; the first route of each group is left alone and every
/// later one gets a `noDuplicateTitle` / `noDuplicateDescription` issue.
/// Scores are not changed.
pub fn flag_duplicates(results: &mut [AnalysisResult], heads: &[PageHead], rules: &SeoRules) {
    debug_assert_eq!(results.len(), heads.len());

    flag_duplicate_field(
        results,
        heads,
        &rules.no_duplicate_title,
        RuleId::NoDuplicateTitle,
        "title",
        |head| head.title.as_deref(),
    );
    flag_duplicate_field(
        results,
        heads,
        &rules.no_duplicate_description,
        RuleId::NoDuplicateDescription,
        "description",
        |head| head.description.as_deref(),
    );
}

fn flag_duplicate_field(
    results: &mut [AnalysisResult],
    heads: &[PageHead],
    rule: &RuleSettings,
    rule_id: RuleId,
    label: &str,
    field: impl Fn(&PageHead) -> Option<&str>,
) {
    let Some(severity) = rule.active_severity() else {
        return;
    };

    let mut first_seen: HashMap<String, usize> = HashMap::new();
    for (index, head) in heads.iter().enumerate() {
        let Some(raw) = field(head) else {
            continue;
        };
        let key = normalize(raw);
        if key.is_empty() {
            continue;
        }

        match first_seen.get(&key) {
            Some(&original) => {
                let original_route = results[original].route.clone();
                results[index].issues.push(Issue {
                    rule: rule_id,
                    message: format!("Duplicate {label}: same as {original_route}"),
                    severity,
                    value: Some(IssueValue::Text(raw.trim().to_string())),
                });
            }
            None => {
                first_seen.insert(key, index);
            }
        }
    }
}

fn normalize(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
