//! # seolens-core
//!
//! Core library for scoring the pages of a Next.js or React project against
//! on-page SEO rules, straight from their source files.
//!
//! This library provides:
//! - Route discovery for the `app/` (segment) and `pages/` (file) routers
//! - Content metrics from page markup (H1 count, word count, text density)
//! - Rule evaluation with a 0-100 score per page
//! - Duplicate title/description detection across routes
//!
//! Nothing is rendered or executed: dynamic routes such as `/blog/[slug]`
//! need request-time data and are skipped.
//!
//! ## Example
//!
//! ```no_run
//! use seolens_core::{SeoConfig, pipeline, project};
//!
//! # async fn example() -> seolens_core::Result<()> {
//! let root = std::path::Path::new(".");
//! let info = project::detect(root)?;
//! let config = SeoConfig::load_or_default(root)?;
//!
//! let run = pipeline::run(&info, &config).await?;
//! for result in &run.results {
//!     println!("{} scored {}", result.route, result.score);
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod parser;
pub mod pipeline;
pub mod project;
pub mod report;
pub mod routes;
pub mod rules;
pub mod types;

// Re-export commonly used types
pub use types::{
    AnalysisResult, AnalysisRun, ContentMetrics, Framework, Issue, IssueSeverity, IssueValue,
    PageHead, ProjectInfo, Route, RouteFailure, RouteKind, RouterKind, RuleId,
};

pub use config::{CONFIG_FILE_NAME, LengthRuleSettings, RuleSettings, SeoConfig, SeoRules, Severity};
pub use error::{Result, SeoError};
pub use parser::{extract_head, extract_metrics, extract_metrics_from_file, sanitize_html};
pub use pipeline::analyze_source;
pub use report::{FailOn, exit_code, render_json, render_markdown};
pub use routes::{resolve, resolve_all};
pub use rules::{evaluate, flag_duplicates};
