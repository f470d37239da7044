//! On-disk pipeline artifact and the loaded [`TrainedPipeline`].

use std::fs;
use std::path::{Path, PathBuf};

use northstar_params::PredictionRecord;
use serde::{Deserialize, Serialize};

use crate::classifier::{Classifier, Label};
use crate::error::PipelineError;
use crate::estimator::Estimator;
use crate::prep::Preprocessor;

/// Format tag every artifact must carry.
pub const FORMAT: &str = "northstar-pipeline";

/// Artifact schema version understood by this crate.
pub const VERSION: u32 = 1;

/// The serialized pipeline document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Artifact {
    /// Format tag, always [`FORMAT`].
    pub format: String,
    /// Schema version, always [`VERSION`].
    pub version: u32,
    /// The two named stages.
    pub steps: Steps,
}

/// Named pipeline stages.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Steps {
    /// Preprocessing transform.
    pub prep: Preprocessor,
    /// Classifier.
    pub model: Estimator,
}

/// A loaded, validated two-stage pipeline.
///
/// Immutable after load; safe to share across threads and reuse for any
/// number of predictions.
#[derive(Debug, Clone)]
pub struct TrainedPipeline {
    prep: Preprocessor,
    model: Estimator,
    source: PathBuf,
}

impl TrainedPipeline {
    /// Loads and validates the artifact at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::ArtifactMissing`] if the file does not exist,
    /// [`PipelineError::ArtifactUnreadable`] if it cannot be read, and
    /// [`PipelineError::ArtifactCorrupt`] if it does not parse or validate.
    pub fn load(path: &Path) -> Result<Self, PipelineError> {
        if !path.exists() {
            return Err(PipelineError::ArtifactMissing {
                path: path.to_path_buf(),
            });
        }
        let json = fs::read_to_string(path).map_err(|source| PipelineError::ArtifactUnreadable {
            path: path.to_path_buf(),
            source,
        })?;
        let pipeline = Self::from_json(&json, path)?;
        log::info!(
            "loaded pipeline from {} ({} columns -> {} features, {})",
            path.display(),
            pipeline.prep.feature_names_in.len(),
            pipeline.model.n_features(),
            pipeline.model.kind()
        );
        Ok(pipeline)
    }

    /// Parses and validates an artifact document. `path` is only used in
    /// error messages.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::ArtifactCorrupt`] if the document does not
    /// parse, carries the wrong format tag or version, or fails validation.
    pub fn from_json(json: &str, path: &Path) -> Result<Self, PipelineError> {
        let artifact: Artifact =
            serde_json::from_str(json).map_err(|e| PipelineError::corrupt(path, e.to_string()))?;
        Self::from_artifact(artifact, path)
    }

    /// Validates an in-memory artifact.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::ArtifactCorrupt`] on any inconsistency,
    /// including a `prep` output width that differs from the `model` input
    /// width.
    pub fn from_artifact(artifact: Artifact, path: &Path) -> Result<Self, PipelineError> {
        if artifact.format != FORMAT {
            return Err(PipelineError::corrupt(
                path,
                format!("format is `{}`, expected `{}`", artifact.format, FORMAT),
            ));
        }
        if artifact.version != VERSION {
            return Err(PipelineError::corrupt(
                path,
                format!("unsupported version {}", artifact.version),
            ));
        }
        let Steps { prep, model } = artifact.steps;
        prep.validate(path)?;
        model.validate(path)?;
        if prep.output_width() != model.n_features() {
            return Err(PipelineError::corrupt(
                path,
                format!(
                    "prep produces {} features but model expects {}",
                    prep.output_width(),
                    model.n_features()
                ),
            ));
        }
        Ok(Self {
            prep,
            model,
            source: path.to_path_buf(),
        })
    }

    /// The `prep` stage.
    #[must_use]
    pub fn prep(&self) -> &Preprocessor {
        &self.prep
    }

    /// The `model` stage.
    #[must_use]
    pub fn model(&self) -> &Estimator {
        &self.model
    }

    /// Path the pipeline was loaded from.
    #[must_use]
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Class probabilities `[p_fail, p_success]` for `record`.
    ///
    /// # Errors
    ///
    /// Returns a schema error if `record` does not fit the `prep` stage.
    pub fn predict_proba(&self, record: &PredictionRecord) -> Result<[f64; 2], PipelineError> {
        let x = self.prep.transform(record)?;
        self.model.predict_proba(&x)
    }
}

impl Classifier for TrainedPipeline {
    fn predict(&self, record: &PredictionRecord) -> Result<Label, PipelineError> {
        let x = self.prep.transform(record)?;
        self.model.predict(&x).map(Label::from_index)
    }

    fn predict_probability(&self, record: &PredictionRecord) -> Result<f64, PipelineError> {
        self.predict_proba(record).map(|[_, p1]| p1)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use northstar_params::{Catalog, FormState};
    use northstar_test_helpers::{forest_pipeline_json, logistic_pipeline_json, write_pipeline};

    #[test]
    fn loads_from_disk_and_remembers_the_source() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_pipeline(dir.path(), &forest_pipeline_json()).unwrap();
        let pipeline = TrainedPipeline::load(&path).unwrap();
        assert_eq!(pipeline.source(), path.as_path());
        assert_eq!(pipeline.model().kind(), "random_forest");
        let record = FormState::defaults(Catalog::full()).to_record();
        let [p0, p1] = pipeline.predict_proba(&record).unwrap();
        assert!((p1 - 0.625).abs() < 1e-12);
        assert!((p0 + p1 - 1.0).abs() < 1e-12);
    }

    #[test]
    fn missing_file_is_reported_with_its_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("best_model_smote.json");
        let err = TrainedPipeline::load(&path).unwrap_err();
        assert!(matches!(err, PipelineError::ArtifactMissing { .. }));
        assert!(err.to_string().contains("best_model_smote.json"));
    }

    #[test]
    fn width_mismatch_between_stages_is_corrupt() {
        let json = logistic_pipeline_json();
        let mut artifact: Artifact = serde_json::from_str(&json).unwrap();
        if let Estimator::LogisticRegression { coef, .. } = &mut artifact.steps.model {
            coef.pop();
        }
        let err = TrainedPipeline::from_artifact(artifact, Path::new("m.json")).unwrap_err();
        assert!(err.to_string().contains("prep produces 24 features but model expects 23"));
    }

    #[test]
    fn unknown_stage_is_rejected() {
        let mut value: serde_json::Value = serde_json::from_str(&logistic_pipeline_json()).unwrap();
        value["steps"]["smote"] = serde_json::json!({});
        let err = TrainedPipeline::from_json(&value.to_string(), Path::new("m.json")).unwrap_err();
        assert!(matches!(err, PipelineError::ArtifactCorrupt { .. }));
    }
}
