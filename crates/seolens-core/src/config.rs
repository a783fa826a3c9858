//! Rule configuration and `seo.config.json` loading

use std::fs;
use std::path::Path;

use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Result, SeoError};
use crate::types::IssueSeverity;

/// File name looked up in the project root
pub const CONFIG_FILE_NAME: &str = "seo.config.json";

/// Configured severity of a rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
    Off,
}

impl Severity {
    /// Severity an emitted issue carries, `None` when the rule is switched off.
    pub fn issue_severity(self) -> Option<IssueSeverity> {
        match self {
            Self::Warning => Some(IssueSeverity::Warning),
            Self::Error => Some(IssueSeverity::Error),
            Self::Off => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RuleSettings {
    pub enabled: bool,
    pub severity: Severity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threshold: Option<f64>,
}

impl Default for RuleSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            severity: Severity::Warning,
            threshold: None,
        }
    }
}

impl RuleSettings {
    fn with_severity(severity: Severity) -> Self {
        Self {
            severity,
            ..Self::default()
        }
    }

    /// Issue severity when the rule is enabled and not switched off.
    pub fn active_severity(&self) -> Option<IssueSeverity> {
        if self.enabled {
            self.severity.issue_severity()
        } else {
            None
        }
    }
}

/// Settings for rules bounded by a character length range
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LengthRuleSettings {
    pub enabled: bool,
    pub severity: Severity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threshold: Option<f64>,
    pub min: usize,
    pub max: usize,
}

impl Default for LengthRuleSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            severity: Severity::Warning,
            threshold: None,
            min: 30,
            max: 60,
        }
    }
}

impl LengthRuleSettings {
    fn bounded(min: usize, max: usize) -> Self {
        Self {
            min,
            max,
            ..Self::default()
        }
    }
}

/// The fully resolved rule configuration consumed by the rule engine.
///
/// A rule block missing from the file takes the value from
/// [`SeoRules::default`]; a partially specified block fills the rest with
/// the per-type defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct SeoRules {
    pub title_length: LengthRuleSettings,
    pub description_length: LengthRuleSettings,
    pub has_h1: RuleSettings,
    pub no_duplicate_title: RuleSettings,
    pub no_duplicate_description: RuleSettings,
    pub canonical_exists: RuleSettings,
    pub og_image_exists: RuleSettings,
}

impl Default for SeoRules {
    fn default() -> Self {
        Self {
            // Google typically truncates titles after 60 characters
            title_length: LengthRuleSettings::bounded(40, 60),
            description_length: LengthRuleSettings::bounded(120, 160),
            has_h1: RuleSettings::with_severity(Severity::Error),
            no_duplicate_title: RuleSettings::with_severity(Severity::Error),
            no_duplicate_description: RuleSettings::with_severity(Severity::Error),
            canonical_exists: RuleSettings::with_severity(Severity::Warning),
            og_image_exists: RuleSettings::with_severity(Severity::Warning),
        }
    }
}

fn default_locale() -> String {
    "en-US".to_string()
}

fn default_exclude() -> Vec<String> {
    vec!["/api/**/*".to_string(), "/_next/**/*".to_string()]
}

/// Project-level SEO configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SeoConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(default = "default_locale")]
    pub locale: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter_handle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_image: Option<String>,
    #[serde(default)]
    pub rules: SeoRules,
    /// Route path globs left out of the analysis
    #[serde(default = "default_exclude")]
    pub exclude: Vec<String>,
}

impl Default for SeoConfig {
    fn default() -> Self {
        Self {
            site_name: None,
            base_url: None,
            locale: default_locale(),
            twitter_handle: None,
            default_title: None,
            default_description: None,
            default_image: None,
            rules: SeoRules::default(),
            exclude: default_exclude(),
        }
    }
}

impl SeoConfig {
    /// Configuration written by `seolens init`.
    pub fn starter() -> Self {
        Self {
            site_name: Some("My Awesome App".to_string()),
            base_url: Some("https://example.com".to_string()),
            ..Self::default()
        }
    }

    /// Parse and validate a configuration from JSON text.
    pub fn from_json(path: &Path, text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text).map_err(|source| SeoError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate the configuration file at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| SeoError::io(path, source))?;
        Self::from_json(path, &text)
    }

    /// Load `seo.config.json` from the project root, falling back to the
    /// default configuration when the file does not exist.
    pub fn load_or_default(root: &Path) -> Result<Self> {
        let path = root.join(CONFIG_FILE_NAME);
        if path.is_file() {
            tracing::debug!(path = %path.display(), "loading configuration");
            Self::load(&path)
        } else {
            tracing::debug!(root = %root.display(), "no configuration file, using defaults");
            Ok(Self::default())
        }
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(site_name) = &self.site_name
            && site_name.trim().is_empty()
        {
            return Err(SeoError::Config("siteName must not be empty".to_string()));
        }

        if let Some(base_url) = &self.base_url {
            Url::parse(base_url)
                .map_err(|e| SeoError::Config(format!("baseUrl {base_url:?} is not a URL: {e}")))?;
        }

        if let Some(image) = &self.default_image {
            Url::parse(image).map_err(|e| {
                SeoError::Config(format!("defaultImage {image:?} is not a URL: {e}"))
            })?;
        }

        for (name, rule) in [
            ("titleLength", &self.rules.title_length),
            ("descriptionLength", &self.rules.description_length),
        ] {
            if rule.min > rule.max {
                return Err(SeoError::Config(format!(
                    "{name}.min ({}) must not exceed {name}.max ({})",
                    rule.min, rule.max
                )));
            }
        }

        self.exclude_set().map(|_| ())
    }

    /// Compile the `exclude` globs.
    pub fn exclude_set(&self) -> Result<GlobSet> {
        let mut builder = GlobSetBuilder::new();
        for pattern in &self.exclude {
            let glob = Glob::new(pattern)
                .map_err(|e| SeoError::Config(format!("invalid exclude pattern {pattern:?}: {e}")))?;
            builder.add(glob);
        }
        builder
            .build()
            .map_err(|e| SeoError::Config(format!("invalid exclude patterns: {e}")))
    }
}
