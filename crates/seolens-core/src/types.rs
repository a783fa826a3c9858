//! Common types used across seolens

use std::fmt;
use std::path::PathBuf;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static RE_PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[.*\]").expect("invalid placeholder regex"));

/// Routing convention a project uses to map source files to URLs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouterKind {
    /// Segment router: one directory per URL segment, `page`/`route` leaf files (`app/`)
    App,
    /// File router: one file per URL (`pages/`)
    Pages,
}

impl fmt::Display for RouterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::App => f.write_str("app"),
            Self::Pages => f.write_str("pages"),
        }
    }
}

/// Whether a route can be analyzed from its source text alone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteKind {
    Static,
    /// Path carries a bracketed parameter placeholder such as `[slug]`
    Dynamic,
}

impl RouteKind {
    /// Classify a URL path.
    pub fn of_path(path: &str) -> Self {
        if RE_PLACEHOLDER.is_match(path) {
            Self::Dynamic
        } else {
            Self::Static
        }
    }
}

/// A page discovered in the project's routing directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Route {
    pub path: String,
    pub kind: RouteKind,
    pub source: PathBuf,
}

impl Route {
    pub fn new(path: impl Into<String>, source: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let kind = RouteKind::of_path(&path);
        Self {
            path,
            kind,
            source: source.into(),
        }
    }

    pub fn is_dynamic(&self) -> bool {
        self.kind == RouteKind::Dynamic
    }

    /// Whether the page's content depends on request-time data.
    ///
    /// Derived from the route kind so the two can never disagree.
    pub fn is_content_dependent(&self) -> bool {
        self.is_dynamic()
    }
}

/// Structural signals computed from a page's raw markup
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentMetrics {
    pub h1_count: usize,
    pub word_count: usize,
    /// Plain-text length over raw length, in `[0, 1]`
    pub text_to_markup_ratio: f64,
    /// `true` iff there is exactly one `<h1>`; heading order is not checked
    pub has_valid_heading_hierarchy: bool,
    /// Reserved for keyword extraction, always empty
    pub keywords: Vec<String>,
}

/// Head metadata declared by a page source
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageHead {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Identifier of the rule that produced an issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RuleId {
    TitleLength,
    DescriptionLength,
    HasH1,
    NoDuplicateTitle,
    NoDuplicateDescription,
    CanonicalExists,
    OgImageExists,
    ThinContent,
    LowTextRatio,
}

impl RuleId {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TitleLength => "titleLength",
            Self::DescriptionLength => "descriptionLength",
            Self::HasH1 => "hasH1",
            Self::NoDuplicateTitle => "noDuplicateTitle",
            Self::NoDuplicateDescription => "noDuplicateDescription",
            Self::CanonicalExists => "canonicalExists",
            Self::OgImageExists => "ogImageExists",
            Self::ThinContent => "thinContent",
            Self::LowTextRatio => "lowTextRatio",
        }
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Severity attached to an emitted issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueSeverity {
    Warning,
    Error,
}

/// Value observed on the page that triggered an issue
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum IssueValue {
    Count(usize),
    Text(String),
}

impl fmt::Display for IssueValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Count(count) => write!(f, "{count}"),
            Self::Text(text) => f.write_str(text),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issue {
    pub rule: RuleId,
    pub message: String,
    pub severity: IssueSeverity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<IssueValue>,
}

/// Score and issues for a single analyzed route
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisResult {
    pub route: String,
    /// 0-100, starting at 100 and reduced by rule deductions
    pub score: u8,
    pub issues: Vec<Issue>,
}

impl AnalysisResult {
    pub fn has_severity(&self, severity: IssueSeverity) -> bool {
        self.issues.iter().any(|issue| issue.severity == severity)
    }
}

/// A route whose source could not be analyzed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteFailure {
    pub route: String,
    pub source: PathBuf,
    pub reason: String,
}

/// Everything produced by one pipeline run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRun {
    pub results: Vec<AnalysisResult>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<RouteFailure>,
    pub skipped_dynamic: usize,
    pub excluded: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Framework {
    Next,
    React,
    Unknown,
}

impl fmt::Display for Framework {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Next => f.write_str("next"),
            Self::React => f.write_str("react"),
            Self::Unknown => f.write_str("unknown"),
        }
    }
}

/// What project detection learned about the analyzed project
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectInfo {
    pub framework: Framework,
    /// Routing conventions present, segment router first
    pub routers: Vec<RouterKind>,
    pub has_i18n: bool,
    pub is_monorepo: bool,
    pub root: PathBuf,
}

impl ProjectInfo {
    /// Primary routing convention, if any.
    pub fn router(&self) -> Option<RouterKind> {
        self.routers.first().copied()
    }
}
