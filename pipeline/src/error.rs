//! Pipeline error taxonomy.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading or running the trained pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The artifact file does not exist.
    #[error("model artifact not found: {}", path.display())]
    ArtifactMissing {
        /// Path that was looked up.
        path: PathBuf,
    },

    /// The artifact exists but cannot be read.
    #[error("cannot read model artifact {}: {source}", path.display())]
    ArtifactUnreadable {
        /// Artifact path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The artifact is not a valid pipeline.
    #[error("corrupt model artifact {}: {reason}", path.display())]
    ArtifactCorrupt {
        /// Artifact path.
        path: PathBuf,
        /// What failed to parse or validate.
        reason: String,
    },

    /// The record's columns differ from the ones the pipeline was fitted on.
    #[error("feature names do not match the fitted pipeline: {detail}")]
    SchemaMismatch {
        /// Description of the first difference.
        detail: String,
    },

    /// A column holds a value of the wrong type.
    #[error("column `{column}` expects {expected} values, got {found}")]
    WrongType {
        /// Column key.
        column: String,
        /// Expected kind (`numeric` or `text`).
        expected: &'static str,
        /// Type found in the record.
        found: &'static str,
    },

    /// A categorical value was not seen during fitting.
    #[error("column `{column}` has unknown category `{value}`")]
    UnknownCategory {
        /// Column key.
        column: String,
        /// Offending value.
        value: String,
    },

    /// The transformed vector has the wrong width for the classifier.
    #[error("classifier expects {expected} features, got {found}")]
    Dimension {
        /// Width the classifier was fitted on.
        expected: usize,
        /// Width produced by preprocessing.
        found: usize,
    },
}

impl PipelineError {
    pub(crate) fn corrupt(path: &std::path::Path, reason: impl Into<String>) -> Self {
        PipelineError::ArtifactCorrupt {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }

    /// Returns true for errors raised at load time.
    #[must_use]
    pub fn is_load_error(&self) -> bool {
        matches!(
            self,
            PipelineError::ArtifactMissing { .. }
                | PipelineError::ArtifactUnreadable { .. }
                | PipelineError::ArtifactCorrupt { .. }
        )
    }
}
