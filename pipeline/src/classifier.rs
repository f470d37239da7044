//! The capability interface the advisor sees.

use northstar_params::PredictionRecord;
use serde::Serialize;

use crate::error::PipelineError;

/// Binary print outcome. The success class has index 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Label {
    /// Class 0.
    Fail,
    /// Class 1.
    Success,
}

impl Label {
    /// Maps a class index to a label. Any non-zero index is success.
    #[must_use]
    pub fn from_index(index: usize) -> Self {
        if index == 0 {
            Label::Fail
        } else {
            Label::Success
        }
    }

    /// Class index (`0` or `1`).
    #[must_use]
    pub fn index(self) -> u8 {
        match self {
            Label::Fail => 0,
            Label::Success => 1,
        }
    }

    /// Badge text.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Label::Fail => "FAIL",
            Label::Success => "SUCCESS",
        }
    }
}

/// A fitted success/fail classifier over prediction records.
///
/// Implementations must be stateless for inference: the same record always
/// yields the same label and probability. The two operations are not
/// required to agree with each other beyond what the model itself provides.
pub trait Classifier {
    /// Predicts the class label for `record`.
    ///
    /// # Errors
    ///
    /// Returns a [`PipelineError`] if the record does not match the schema
    /// the classifier was fitted on.
    fn predict(&self, record: &PredictionRecord) -> Result<Label, PipelineError>;

    /// Returns the probability of the success class (index 1), in `[0, 1]`.
    ///
    /// # Errors
    ///
    /// Returns a [`PipelineError`] if the record does not match the schema
    /// the classifier was fitted on.
    fn predict_probability(&self, record: &PredictionRecord) -> Result<f64, PipelineError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_indices() {
        assert_eq!(Label::from_index(0), Label::Fail);
        assert_eq!(Label::from_index(1), Label::Success);
        assert_eq!(Label::Success.index(), 1);
        assert_eq!(Label::Fail.as_str(), "FAIL");
    }
}
