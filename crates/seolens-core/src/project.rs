//! Project detection from `package.json` and filesystem markers

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{Result, SeoError};
use crate::routes::source_root;
use crate::types::{Framework, ProjectInfo, RouterKind};

const MANIFEST: &str = "package.json";
const I18N_PACKAGES: [&str; 3] = ["next-i18next", "react-i18next", "next-intl"];
const MONOREPO_MARKERS: [&str; 4] = ["turbo.json", "nx.json", "pnpm-workspace.yaml", "lerna.json"];

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PackageManifest {
    #[serde(default)]
    dependencies: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    dev_dependencies: BTreeMap<String, serde_json::Value>,
}

impl PackageManifest {
    fn depends_on(&self, name: &str) -> bool {
        self.dependencies.contains_key(name) || self.dev_dependencies.contains_key(name)
    }
}

/// Detect framework, routing conventions and project shape at `root`.
pub fn detect(root: &Path) -> Result<ProjectInfo> {
    let manifest_path = root.join(MANIFEST);
    if !manifest_path.is_file() {
        return Err(SeoError::MissingManifest(root.to_path_buf()));
    }

    let text =
        fs::read_to_string(&manifest_path).map_err(|source| SeoError::io(&manifest_path, source))?;
    let manifest: PackageManifest =
        serde_json::from_str(&text).map_err(|source| SeoError::Manifest {
            path: manifest_path.clone(),
            source,
        })?;

    let framework = if manifest.depends_on("next") {
        Framework::Next
    } else if manifest.depends_on("react") {
        Framework::React
    } else {
        Framework::Unknown
    };

    let routers = match framework {
        Framework::Next => [RouterKind::App, RouterKind::Pages]
            .into_iter()
            .filter(|&kind| source_root(root, kind).is_some())
            .collect(),
        _ => Vec::new(),
    };

    let info = ProjectInfo {
        framework,
        routers,
        has_i18n: I18N_PACKAGES.iter().any(|name| manifest.depends_on(name)),
        is_monorepo: MONOREPO_MARKERS
            .iter()
            .any(|marker| root.join(marker).exists()),
        root: root.to_path_buf(),
    };

    tracing::info!(
        framework = %info.framework,
        router = ?info.router(),
        i18n = info.has_i18n,
        monorepo = info.is_monorepo,
        "detected project"
    );
    Ok(info)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(manifest: &str, dirs: &[&str], files: &[&str]) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(MANIFEST), manifest).unwrap();
        for sub in dirs {
            fs::create_dir_all(dir.path().join(sub)).unwrap();
        }
        for file in files {
            fs::write(dir.path().join(file), "").unwrap();
        }
        dir
    }

    #[test]
    fn detects_next_app_router() {
        let dir = project(
            r#"{"dependencies": {"next": "14.1.0", "react": "18.2.0"}}"#,
            &["app"],
            &[],
        );

        let info = detect(dir.path()).unwrap();
        assert_eq!(info.framework, Framework::Next);
        assert_eq!(info.router(), Some(RouterKind::App));
        assert_eq!(info.routers, vec![RouterKind::App]);
        assert!(!info.has_i18n);
        assert!(!info.is_monorepo);
    }

    #[test]
    fn lists_both_conventions_app_first() {
        let dir = project(
            r#"{"devDependencies": {"next": "13.0.0"}}"#,
            &["src/pages", "src/app"],
            &[],
        );

        let info = detect(dir.path()).unwrap();
        assert_eq!(info.routers, vec![RouterKind::App, RouterKind::Pages]);
    }

    #[test]
    fn react_projects_have_no_router() {
        let dir = project(
            r#"{"dependencies": {"react": "18.2.0", "react-i18next": "13.0.0"}}"#,
            &["pages"],
            &["turbo.json"],
        );

        let info = detect(dir.path()).unwrap();
        assert_eq!(info.framework, Framework::React);
        assert_eq!(info.router(), None);
        assert!(info.has_i18n);
        assert!(info.is_monorepo);
    }

    #[test]
    fn unknown_framework_without_dependencies() {
        let dir = project(r#"{"name": "static-site"}"#, &[], &[]);
        assert_eq!(detect(dir.path()).unwrap().framework, Framework::Unknown);
    }

    #[test]
    fn missing_manifest_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            detect(dir.path()),
            Err(SeoError::MissingManifest(_))
        ));
    }

    #[test]
    fn malformed_manifest_is_an_error() {
        let dir = project("{ not json", &[], &[]);
        assert!(matches!(detect(dir.path()), Err(SeoError::Manifest { .. })));
    }
}
