//! The `prep` stage: a column transformer over named record columns.
//!
//! Transformers run in artifact order and their outputs are concatenated
//! into one dense feature vector.

use std::path::Path;

use northstar_params::PredictionRecord;
use serde::{Deserialize, Serialize};

use crate::error::PipelineError;

/// What the one-hot encoder does with a category it was not fitted on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandleUnknown {
    /// Fail the prediction.
    #[default]
    Error,
    /// Emit an all-zero block for the column.
    Ignore,
}

/// A single fitted column transform.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Transformer {
    /// `(x - mean) / scale` per column.
    StandardScaler {
        /// Input columns.
        columns: Vec<String>,
        /// Per-column mean.
        mean: Vec<f64>,
        /// Per-column scale (standard deviation).
        scale: Vec<f64>,
    },
    /// One indicator per fitted category per column.
    OneHot {
        /// Input columns.
        columns: Vec<String>,
        /// Fitted categories per column.
        categories: Vec<Vec<String>>,
        /// Unknown-category behavior.
        #[serde(default)]
        handle_unknown: HandleUnknown,
    },
    /// Numeric columns copied unchanged.
    Passthrough {
        /// Input columns.
        columns: Vec<String>,
    },
}

impl Transformer {
    /// Input columns consumed by this transform.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        match self {
            Transformer::StandardScaler { columns, .. }
            | Transformer::OneHot { columns, .. }
            | Transformer::Passthrough { columns } => columns,
        }
    }

    /// Number of output features.
    #[must_use]
    pub fn output_width(&self) -> usize {
        match self {
            Transformer::OneHot { categories, .. } => categories.iter().map(Vec::len).sum(),
            other => other.columns().len(),
        }
    }

    fn validate(&self) -> Result<(), String> {
        if self.columns().is_empty() {
            return Err("transformer with no columns".to_string());
        }
        match self {
            Transformer::StandardScaler { columns, mean, scale } => {
                if mean.len() != columns.len() || scale.len() != columns.len() {
                    return Err(format!(
                        "standard_scaler has {} columns but {} means and {} scales",
                        columns.len(),
                        mean.len(),
                        scale.len()
                    ));
                }
                if let Some(bad) = scale.iter().position(|s| !s.is_finite() || *s <= 0.0) {
                    return Err(format!(
                        "standard_scaler scale for `{}` is not positive",
                        columns[bad]
                    ));
                }
                if mean.iter().any(|m| !m.is_finite()) {
                    return Err("standard_scaler mean is not finite".to_string());
                }
            }
            Transformer::OneHot { columns, categories, .. } => {
                if categories.len() != columns.len() {
                    return Err(format!(
                        "one_hot has {} columns but {} category lists",
                        columns.len(),
                        categories.len()
                    ));
                }
                if let Some(bad) = categories.iter().position(Vec::is_empty) {
                    return Err(format!("one_hot column `{}` has no categories", columns[bad]));
                }
            }
            Transformer::Passthrough { .. } => {}
        }
        Ok(())
    }

    fn apply(&self, record: &PredictionRecord, out: &mut Vec<f64>) -> Result<(), PipelineError> {
        match self {
            Transformer::StandardScaler { columns, mean, scale } => {
                for ((column, m), s) in columns.iter().zip(mean).zip(scale) {
                    out.push((numeric(record, column)? - m) / s);
                }
            }
            Transformer::Passthrough { columns } => {
                for column in columns {
                    out.push(numeric(record, column)?);
                }
            }
            Transformer::OneHot { columns, categories, handle_unknown } => {
                for (column, cats) in columns.iter().zip(categories) {
                    let value = text(record, column)?;
                    let hit = cats.iter().position(|c| c == value);
                    if hit.is_none() && *handle_unknown == HandleUnknown::Error {
                        return Err(PipelineError::UnknownCategory {
                            column: column.clone(),
                            value: value.to_string(),
                        });
                    }
                    out.extend((0..cats.len()).map(|i| if Some(i) == hit { 1.0 } else { 0.0 }));
                }
            }
        }
        Ok(())
    }
}

fn numeric(record: &PredictionRecord, column: &str) -> Result<f64, PipelineError> {
    let value = record.get(column).ok_or_else(|| PipelineError::SchemaMismatch {
        detail: format!("missing column `{}`", column),
    })?;
    value.as_f64().ok_or_else(|| PipelineError::WrongType {
        column: column.to_string(),
        expected: "numeric",
        found: value.type_name(),
    })
}

fn text<'r>(record: &'r PredictionRecord, column: &str) -> Result<&'r str, PipelineError> {
    let value = record.get(column).ok_or_else(|| PipelineError::SchemaMismatch {
        detail: format!("missing column `{}`", column),
    })?;
    value.as_text().ok_or_else(|| PipelineError::WrongType {
        column: column.to_string(),
        expected: "text",
        found: value.type_name(),
    })
}

/// The fitted preprocessing stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Preprocessor {
    /// Column keys, in order, that the stage was fitted on.
    pub feature_names_in: Vec<String>,
    /// Column transforms applied in order.
    pub transformers: Vec<Transformer>,
}

impl Preprocessor {
    /// Width of the transformed feature vector.
    #[must_use]
    pub fn output_width(&self) -> usize {
        self.transformers.iter().map(Transformer::output_width).sum()
    }

    /// Checks internal consistency of the fitted parameters.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::ArtifactCorrupt`] naming `path` if a
    /// transformer is malformed or references an unknown column.
    pub fn validate(&self, path: &Path) -> Result<(), PipelineError> {
        if self.feature_names_in.is_empty() {
            return Err(PipelineError::corrupt(path, "prep: empty feature_names_in"));
        }
        for transformer in &self.transformers {
            transformer
                .validate()
                .map_err(|reason| PipelineError::corrupt(path, format!("prep: {}", reason)))?;
            if let Some(column) = transformer
                .columns()
                .iter()
                .find(|c| !self.feature_names_in.contains(c))
            {
                return Err(PipelineError::corrupt(
                    path,
                    format!("prep: transformer column `{}` is not in feature_names_in", column),
                ));
            }
        }
        if self.output_width() == 0 {
            return Err(PipelineError::corrupt(path, "prep: produces no features"));
        }
        Ok(())
    }

    /// Checks that `record` carries exactly the fitted columns, in order.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::SchemaMismatch`] describing the first
    /// missing, unexpected or misplaced column.
    pub fn check_columns(&self, record: &PredictionRecord) -> Result<(), PipelineError> {
        let found: Vec<&str> = record.keys().collect();
        if found.iter().copied().eq(self.feature_names_in.iter().map(String::as_str)) {
            return Ok(());
        }
        let detail = if let Some(missing) = self
            .feature_names_in
            .iter()
            .find(|name| !found.contains(&name.as_str()))
        {
            format!("missing column `{}`", missing)
        } else if let Some(extra) = found
            .iter()
            .find(|key| !self.feature_names_in.iter().any(|n| n == *key))
        {
            format!("unexpected column `{}`", extra)
        } else if let Some((pos, (want, got))) = self
            .feature_names_in
            .iter()
            .zip(&found)
            .enumerate()
            .find(|(_, (want, got))| want.as_str() != **got)
        {
            format!("column {} should be `{}`, got `{}`", pos, want, got)
        } else {
            format!(
                "expected {} columns, got {}",
                self.feature_names_in.len(),
                found.len()
            )
        };
        Err(PipelineError::SchemaMismatch { detail })
    }

    /// Transforms `record` into the classifier's dense input vector.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::SchemaMismatch`], [`PipelineError::WrongType`]
    /// or [`PipelineError::UnknownCategory`] when the record does not fit.
    pub fn transform(&self, record: &PredictionRecord) -> Result<Vec<f64>, PipelineError> {
        self.check_columns(record)?;
        let mut out = Vec::with_capacity(self.output_width());
        for transformer in &self.transformers {
            transformer.apply(record, &mut out)?;
        }
        Ok(out)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use northstar_params::FeatureValue;

    fn prep() -> Preprocessor {
        Preprocessor {
            feature_names_in: vec!["a".into(), "b".into(), "c".into()],
            transformers: vec![
                Transformer::StandardScaler {
                    columns: vec!["a".into()],
                    mean: vec![10.0],
                    scale: vec![2.0],
                },
                Transformer::OneHot {
                    columns: vec!["b".into()],
                    categories: vec![vec!["x".into(), "y".into()]],
                    handle_unknown: HandleUnknown::Error,
                },
                Transformer::Passthrough {
                    columns: vec!["c".into()],
                },
            ],
        }
    }

    fn record(b: &str) -> PredictionRecord {
        let mut r = PredictionRecord::new();
        r.push("a", FeatureValue::Int(14));
        r.push("b", FeatureValue::Text(b.into()));
        r.push("c", FeatureValue::Float(0.25));
        r
    }

    #[test]
    fn transforms_in_order() {
        let out = prep().transform(&record("y")).unwrap();
        assert_eq!(out, vec![2.0, 0.0, 1.0, 0.25]);
        assert_eq!(prep().output_width(), 4);
    }

    #[test]
    fn unknown_category_errors_or_zeros() {
        let err = prep().transform(&record("z")).unwrap_err();
        assert!(matches!(err, PipelineError::UnknownCategory { ref value, .. } if value == "z"));

        let mut lenient = prep();
        if let Transformer::OneHot { handle_unknown, .. } = &mut lenient.transformers[1] {
            *handle_unknown = HandleUnknown::Ignore;
        }
        assert_eq!(lenient.transform(&record("z")).unwrap(), vec![2.0, 0.0, 0.0, 0.25]);
    }

    #[test]
    fn missing_extra_and_reordered_columns() {
        let p = prep();

        let mut missing = record("x");
        missing.remove("c");
        let err = p.transform(&missing).unwrap_err().to_string();
        assert!(err.contains("missing column `c`"), "{}", err);

        let mut extra = record("x");
        extra.push("d", FeatureValue::Int(1));
        let err = p.transform(&extra).unwrap_err().to_string();
        assert!(err.contains("unexpected column `d`"), "{}", err);

        let mut reordered = PredictionRecord::new();
        reordered.push("b", FeatureValue::Text("x".into()));
        reordered.push("a", FeatureValue::Int(1));
        reordered.push("c", FeatureValue::Int(1));
        let err = p.transform(&reordered).unwrap_err().to_string();
        assert!(err.contains("column 0 should be `a`"), "{}", err);
    }

    #[test]
    fn duplicated_trailing_column_reports_the_count() {
        let mut duplicated = record("x");
        duplicated.push("c", FeatureValue::Float(0.5));
        let err = prep().check_columns(&duplicated).unwrap_err().to_string();
        assert!(err.contains("expected 3 columns, got 4"), "{}", err);
        assert!(prep().check_columns(&record("x")).is_ok());
    }

    #[test]
    fn wrong_types_are_reported() {
        let mut r = PredictionRecord::new();
        r.push("a", FeatureValue::Text("14".into()));
        r.push("b", FeatureValue::Text("x".into()));
        r.push("c", FeatureValue::Float(0.0));
        assert!(matches!(
            prep().transform(&r),
            Err(PipelineError::WrongType { expected: "numeric", found: "text", .. })
        ));

        let mut r = record("x");
        r.remove("b");
        r.remove("c");
        r.push("b", FeatureValue::Int(3));
        r.push("c", FeatureValue::Float(0.0));
        assert!(matches!(
            prep().transform(&r),
            Err(PipelineError::WrongType { expected: "text", found: "int", .. })
        ));
    }

    #[test]
    fn validation_rejects_bad_parameters() {
        let path = Path::new("model.json");
        assert!(prep().validate(path).is_ok());

        let mut p = prep();
        p.transformers[0] = Transformer::StandardScaler {
            columns: vec!["a".into()],
            mean: vec![0.0],
            scale: vec![0.0],
        };
        assert!(p.validate(path).unwrap_err().to_string().contains("not positive"));

        let mut p = prep();
        p.transformers.push(Transformer::Passthrough {
            columns: vec!["zz".into()],
        });
        assert!(p.validate(path).unwrap_err().to_string().contains("`zz`"));
    }
}
