//! Analysis pipeline: resolve routes, extract metrics, score pages

use std::path::PathBuf;
use std::sync::Arc;

use tokio::task::JoinSet;

use crate::config::{SeoConfig, SeoRules};
use crate::error::Result;
use crate::parser::{extract_head, extract_metrics};
use crate::routes::resolve_all;
use crate::rules::{evaluate, flag_duplicates};
use crate::types::{AnalysisResult, AnalysisRun, PageHead, ProjectInfo, Route, RouteFailure};

struct AnalyzedPage {
    source: PathBuf,
    result: AnalysisResult,
    head: PageHead,
}

/// Extract metrics from one page source and evaluate them.
pub fn analyze_source(route: &str, raw: &str, rules: &SeoRules) -> AnalysisResult {
    evaluate(route, &extract_metrics(raw), rules)
}

/// Analyze every static route of the project.
///
/// Dynamic routes and routes matching an `exclude` glob are counted but not
/// analyzed. A page whose source cannot be read is reported as a
/// [`RouteFailure`] and the run continues. Results are sorted by route path
/// before the duplicate title/description pass.
pub async fn run(project: &ProjectInfo, config: &SeoConfig) -> Result<AnalysisRun> {
    let excludes = config.exclude_set()?;
    let routes = resolve_all(&project.root, &project.routers);
    tracing::info!(count = routes.len(), "found routes");

    let rules = Arc::new(config.rules.clone());
    let mut outcome = AnalysisRun::default();
    let mut tasks = JoinSet::new();

    for route in routes {
        if excludes.is_match(&route.path) {
            tracing::debug!(route = %route.path, "excluded by configuration");
            outcome.excluded += 1;
            continue;
        }
        if route.is_dynamic() {
            tracing::debug!(route = %route.path, "skipping dynamic route");
            outcome.skipped_dynamic += 1;
            continue;
        }

        let rules = Arc::clone(&rules);
        tasks.spawn(async move { analyze_route(route, &rules).await });
    }

    let mut pages = Vec::new();
    while let Some(joined) = tasks.join_next().await {
        match joined? {
            Ok(page) => pages.push(page),
            Err(failure) => {
                tracing::warn!(
                    route = %failure.route,
                    source = %failure.source.display(),
                    reason = %failure.reason,
                    "failed to analyze route"
                );
                outcome.failures.push(failure);
            }
        }
    }

    pages.sort_by(|a, b| {
        a.result
            .route
            .cmp(&b.result.route)
            .then_with(|| a.source.cmp(&b.source))
    });
    outcome.failures
        .sort_by(|a, b| a.route.cmp(&b.route).then_with(|| a.source.cmp(&b.source)));

    let (mut results, heads): (Vec<_>, Vec<_>) =
        pages.into_iter().map(|page| (page.result, page.head)).unzip();
    flag_duplicates(&mut results, &heads, &config.rules);
    outcome.results = results;

    tracing::info!(
        analyzed = outcome.results.len(),
        failed = outcome.failures.len(),
        dynamic = outcome.skipped_dynamic,
        excluded = outcome.excluded,
        "analysis finished"
    );
    Ok(outcome)
}

async fn analyze_route(
    route: Route,
    rules: &SeoRules,
) -> std::result::Result<AnalyzedPage, RouteFailure> {
    let raw = tokio::fs::read_to_string(&route.source)
        .await
        .map_err(|err| RouteFailure {
            route: route.path.clone(),
            source: route.source.clone(),
            reason: err.to_string(),
        })?;

    Ok(AnalyzedPage {
        result: analyze_source(&route.path, &raw, rules),
        head: extract_head(&raw),
        source: route.source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Framework, IssueSeverity, RouterKind, RuleId};
    use std::fs;
    use std::path::Path;

    fn write(root: &Path, relative: &str, contents: impl AsRef<[u8]>) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    fn good_page(title: &str) -> String {
        format!(
            "<html><head><title>{title}</title></head><body><h1>{title}</h1><p>{}</p></body></html>",
            vec!["content"; 220].join(" ")
        )
    }

    fn next_project(root: &Path, routers: &[RouterKind]) -> ProjectInfo {
        ProjectInfo {
            framework: Framework::Next,
            routers: routers.to_vec(),
            has_i18n: false,
            is_monorepo: false,
            root: root.to_path_buf(),
        }
    }

    #[test]
    fn analyze_source_scores_a_good_page() {
        let result = analyze_source("/", &good_page("Home"), &SeoRules::default());
        assert_eq!(result.score, 100);
        assert!(result.issues.is_empty());
    }

    #[tokio::test]
    async fn skips_dynamic_routes() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "pages/index.tsx", good_page("Home"));
        write(dir.path(), "pages/blog/[slug].tsx", good_page("Post"));

        let project = next_project(dir.path(), &[RouterKind::Pages]);
        let outcome = run(&project, &SeoConfig::default()).await.unwrap();

        assert_eq!(outcome.results.len(), 1);
        assert_eq!(outcome.results[0].route, "/");
        assert_eq!(outcome.skipped_dynamic, 1);
        assert!(outcome.failures.is_empty());
    }

    #[tokio::test]
    async fn excluded_routes_are_not_analyzed() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "app/page.tsx", good_page("Home"));
        write(dir.path(), "app/api/health/route.ts", "export function GET() {}");

        let project = next_project(dir.path(), &[RouterKind::App]);
        let outcome = run(&project, &SeoConfig::default()).await.unwrap();

        assert_eq!(outcome.excluded, 1);
        let routes: Vec<&str> = outcome.results.iter().map(|r| r.route.as_str()).collect();
        assert_eq!(routes, vec!["/"]);
    }

    #[tokio::test]
    async fn unreadable_source_becomes_a_failure() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "app/page.tsx", good_page("Home"));
        write(dir.path(), "app/broken/page.tsx", [0xff_u8, 0xfe, 0x00, 0xc3]);

        let project = next_project(dir.path(), &[RouterKind::App]);
        let outcome = run(&project, &SeoConfig::default()).await.unwrap();

        assert_eq!(outcome.results.len(), 1);
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].route, "/broken");
        assert_eq!(outcome.failures[0].source, dir.path().join("app/broken/page.tsx"));
    }

    #[tokio::test]
    async fn flags_duplicate_titles_across_routes() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "app/page.tsx", good_page("Acme"));
        write(dir.path(), "app/about/page.tsx", good_page("Acme"));
        write(dir.path(), "app/contact/page.tsx", good_page("Contact"));

        let project = next_project(dir.path(), &[RouterKind::App]);
        let outcome = run(&project, &SeoConfig::default()).await.unwrap();

        let routes: Vec<&str> = outcome.results.iter().map(|r| r.route.as_str()).collect();
        assert_eq!(routes, vec!["/", "/about", "/contact"]);
        assert!(outcome.results[0].issues.is_empty());
        assert!(outcome.results[2].issues.is_empty());

        let about = &outcome.results[1];
        assert_eq!(about.issues.len(), 1);
        assert_eq!(about.issues[0].rule, RuleId::NoDuplicateTitle);
        assert_eq!(about.issues[0].severity, IssueSeverity::Error);
        assert_eq!(about.score, 100);
    }

    #[tokio::test]
    async fn project_without_routers_yields_empty_run() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "app/page.tsx", good_page("Home"));

        let project = next_project(dir.path(), &[]);
        let outcome = run(&project, &SeoConfig::default()).await.unwrap();
        assert_eq!(outcome, AnalysisRun::default());
    }

    #[tokio::test]
    async fn repeated_runs_are_identical() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "app/page.tsx", "<h1>Short</h1>");
        write(dir.path(), "app/docs/page.tsx", good_page("Docs"));
        write(dir.path(), "pages/legacy.tsx", "<div><h1>A</h1><h1>B</h1></div>");

        let project = next_project(dir.path(), &[RouterKind::App, RouterKind::Pages]);
        let config = SeoConfig::default();
        let first = run(&project, &config).await.unwrap();
        let second = run(&project, &config).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(first.results.len(), 3);
    }
}
