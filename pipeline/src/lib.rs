//! NorthStar trained pipeline.
//!
//! Loads the pre-fit two-stage pipeline (`prep` transform, then `model`
//! classifier) from its JSON artifact and exposes it through the
//! [`Classifier`] capability: `predict` and `predict_probability` over a
//! [`PredictionRecord`](northstar_params::PredictionRecord).
//!
//! # Entry Point
//!
//! ```no_run
//! use std::path::Path;
//! use northstar_params::{Catalog, FormState};
//! use northstar_pipeline::{Classifier, TrainedPipeline};
//!
//! let pipeline = TrainedPipeline::load(Path::new("best_model_smote.json"))?;
//! let record = FormState::defaults(Catalog::full()).to_record();
//! let label = pipeline.predict(&record)?;
//! let probability = pipeline.predict_probability(&record)?;
//! println!("{} ({:.5})", label.as_str(), probability);
//! # Ok::<(), northstar_pipeline::PipelineError>(())
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod artifact;
pub mod classifier;
pub mod error;
pub mod estimator;
pub mod prep;

pub use artifact::{Artifact, Steps, TrainedPipeline, FORMAT, VERSION};
pub use classifier::{Classifier, Label};
pub use error::PipelineError;
pub use estimator::{DecisionTree, Estimator};
pub use prep::{HandleUnknown, Preprocessor, Transformer};

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use northstar_params::{Catalog, FeatureValue, FormState};
    use std::path::Path;

    fn fixture() -> TrainedPipeline {
        let json = northstar_test_helpers::logistic_pipeline_json();
        TrainedPipeline::from_json(&json, Path::new("fixture.json")).unwrap()
    }

    #[test]
    fn defaults_produce_a_binary_label_and_unit_probability() {
        let pipeline = fixture();
        let record = FormState::defaults(Catalog::full()).to_record();
        let label = pipeline.predict(&record).unwrap();
        let p = pipeline.predict_probability(&record).unwrap();
        assert!(label.index() <= 1);
        assert!((0.0..=1.0).contains(&p));
    }

    #[test]
    fn prediction_is_idempotent() {
        let pipeline = fixture();
        let record = FormState::defaults(Catalog::full()).to_record();
        let first_label = pipeline.predict(&record).unwrap();
        let first_p = pipeline.predict_probability(&record).unwrap();
        let second_label = pipeline.predict(&record).unwrap();
        let second_p = pipeline.predict_probability(&record).unwrap();
        assert_eq!(first_label, second_label);
        assert_eq!(first_p.to_bits(), second_p.to_bits());
    }

    #[test]
    fn changed_vocabulary_is_a_schema_error() {
        let pipeline = fixture();
        let mut record = FormState::defaults(Catalog::full()).to_record();
        record.remove("Build Direction [degrees]");
        record.push("Build Direction [degrees]", FeatureValue::Int(90));
        assert!(matches!(
            pipeline.predict(&record),
            Err(PipelineError::WrongType { .. })
        ));
    }

    #[test]
    fn format_tag_and_version_are_checked() {
        let json = northstar_test_helpers::logistic_pipeline_json();
        let wrong_format = json.replacen(FORMAT, "other-format", 1);
        let err = TrainedPipeline::from_json(&wrong_format, Path::new("x.json")).unwrap_err();
        assert!(err.to_string().contains("other-format"));
        assert!(err.is_load_error());

        let garbage = TrainedPipeline::from_json("{not json", Path::new("x.json")).unwrap_err();
        assert!(matches!(garbage, PipelineError::ArtifactCorrupt { .. }));
    }
}
