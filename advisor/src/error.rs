//! Startup-fatal errors.

use std::path::PathBuf;

use northstar_pipeline::PipelineError;
use thiserror::Error;

use crate::config::ConfigError;

/// Errors that stop the advisor before the form is shown.
#[derive(Debug, Error)]
pub enum StartupError {
    /// The media asset does not exist.
    #[error("media asset not found: {}", path.display())]
    MediaMissing {
        /// Configured video path.
        path: PathBuf,
    },
    /// The media asset exists but cannot be read.
    #[error("cannot read media asset {}: {source}", path.display())]
    MediaUnreadable {
        /// Configured video path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The model artifact is missing or corrupt.
    #[error(transparent)]
    Model(#[from] PipelineError),
    /// The config file is unreadable or invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl StartupError {
    /// The file the error refers to, if any.
    #[must_use]
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            StartupError::MediaMissing { path } | StartupError::MediaUnreadable { path, .. } => {
                Some(path.as_path())
            }
            StartupError::Model(
                PipelineError::ArtifactMissing { path }
                | PipelineError::ArtifactUnreadable { path, .. }
                | PipelineError::ArtifactCorrupt { path, .. },
            ) => Some(path.as_path()),
            StartupError::Config(
                ConfigError::Unreadable { path, .. } | ConfigError::Invalid { path, .. },
            ) => Some(path.as_path()),
            StartupError::Model(_) => None,
        }
    }
}
