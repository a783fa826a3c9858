//! Route discovery over Next.js routing directories
//!
//! Two conventions are supported:
//!
//! - the segment router (`app/`), where every directory is a URL segment and
//!   a `page` or `route` file marks the directory as routable;
//! - the file router (`pages/`), where every source file is a route.
//!
//! A project that does not use a convention simply has no routing directory
//! for it; resolution then yields no routes rather than an error.

use std::path::{Component, Path, PathBuf};

use once_cell::sync::Lazy;
use url::Url;
use walkdir::WalkDir;

use crate::types::{Route, RouterKind};

const SOURCE_EXTENSIONS: [&str; 4] = ["js", "jsx", "ts", "tsx"];
const SEGMENT_LEAVES: [&str; 2] = ["page", "route"];
/// Top-level `pages/` files that wrap every page instead of being one
const FILE_ROUTER_SHELLS: [&str; 2] = ["_app", "_document"];
const FILE_ROUTER_API_DIR: &str = "api";

static PATH_BASE: Lazy<Url> =
    Lazy::new(|| Url::parse("http://localhost/").expect("invalid base URL"));

/// Locate the routing directory for a convention.
///
/// `{root}/app` is preferred over `{root}/src/app` (likewise for `pages`).
pub fn source_root(root: &Path, convention: RouterKind) -> Option<PathBuf> {
    let dir = match convention {
        RouterKind::App => "app",
        RouterKind::Pages => "pages",
    };

    [root.join(dir), root.join("src").join(dir)]
        .into_iter()
        .find(|candidate| candidate.is_dir())
}

/// Discover every route of one convention, sorted by path.
pub fn resolve(root: &Path, convention: RouterKind) -> Vec<Route> {
    let Some(source_root) = source_root(root, convention) else {
        tracing::debug!(root = %root.display(), %convention, "no routing directory");
        return Vec::new();
    };

    let mut routes: Vec<Route> = source_files(&source_root)
        .into_iter()
        .filter_map(|relative| {
            let path = match convention {
                RouterKind::App => segment_route_path(&relative),
                RouterKind::Pages => file_route_path(&relative),
            }?;
            Some(Route::new(path, source_root.join(relative)))
        })
        .collect();

    routes.sort_by(|a, b| a.path.cmp(&b.path));
    tracing::debug!(
        source_root = %source_root.display(),
        %convention,
        count = routes.len(),
        "resolved routes"
    );
    routes
}

/// Discover routes for several conventions and concatenate them.
pub fn resolve_all(root: &Path, conventions: &[RouterKind]) -> Vec<Route> {
    conventions
        .iter()
        .flat_map(|&convention| resolve(root, convention))
        .collect()
}

/// Route path of a segment-router file, `None` unless it is a `page`/`route` leaf.
///
/// `relative` is the file path relative to the routing directory.
pub fn segment_route_path(relative: &Path) -> Option<String> {
    if !has_source_extension(relative) {
        return None;
    }
    let stem = relative.file_stem()?.to_str()?;
    if !SEGMENT_LEAVES.contains(&stem) {
        return None;
    }

    let directory = relative.parent().unwrap_or_else(|| Path::new(""));
    Some(encode_path(&format!("/{}", join_segments(directory))))
}

/// Route path of a file-router file, `None` for app/document shells and API
/// handlers.
///
/// `relative` is the file path relative to the routing directory.
pub fn file_route_path(relative: &Path) -> Option<String> {
    if !has_source_extension(relative) {
        return None;
    }

    let segments = segments(relative);
    match segments.as_slice() {
        [] => return None,
        [first, ..] if first == FILE_ROUTER_API_DIR && segments.len() > 1 => return None,
        [only] => {
            let stem = Path::new(only).file_stem()?.to_str()?;
            if FILE_ROUTER_SHELLS.contains(&stem) {
                return None;
            }
        }
        _ => {}
    }

    let path = format!("/{}", join_segments(&relative.with_extension("")));
    let path = if path == "/index" {
        "/".to_string()
    } else if let Some(parent) = path.strip_suffix("/index") {
        parent.to_string()
    } else {
        path
    };

    Some(encode_path(&path))
}

fn source_files(source_root: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for entry in WalkDir::new(source_root)
        .follow_links(false)
        .sort_by_file_name()
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                tracing::warn!(error = %err, "skipping unreadable entry");
                continue;
            }
        };
        if !entry.file_type().is_file() || !has_source_extension(entry.path()) {
            continue;
        }
        if let Ok(relative) = entry.path().strip_prefix(source_root) {
            files.push(relative.to_path_buf());
        }
    }

    files
}

fn has_source_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| SOURCE_EXTENSIONS.contains(&ext))
        .unwrap_or(false)
}

fn segments(path: &Path) -> Vec<String> {
    path.components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect()
}

fn join_segments(path: &Path) -> String {
    segments(path).join("/")
}

/// Percent-encode a URL path; brackets and parentheses are left intact.
fn encode_path(path: &str) -> String {
    let mut url = PATH_BASE.clone();
    url.set_path(path);
    url.path().to_string()
}
