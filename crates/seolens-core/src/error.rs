//! Error types for seolens-core

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while detecting a project, loading configuration or
/// running the analysis pipeline.
///
/// Missing routing directories are not errors; the resolver returns an
/// empty route set for them.
#[derive(Debug, Error)]
pub enum SeoError {
    #[error("no package.json found at {}", .0.display())]
    MissingManifest(PathBuf),

    #[error("failed to parse manifest {}: {source}", path.display())]
    Manifest {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse configuration {}: {source}", path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("failed to serialize report: {0}")]
    Report(#[from] serde_json::Error),

    #[error("analysis task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl SeoError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Convenience result type for seolens-core.
pub type Result<T> = std::result::Result<T, SeoError>;
