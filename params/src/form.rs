//! Live form values for one user session.
//!
//! Numeric values are held alongside the catalog's field order and
//! categorical values as option indices, so an out-of-vocabulary category
//! cannot be represented.

use serde::Deserialize;
use thiserror::Error;

use crate::model::{Catalog, NumericKind};
use crate::record::{FeatureValue, PredictionRecord};

/// What the numeric widgets do with out-of-range input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RangePolicy {
    /// Refuse the value and keep the previous one.
    #[default]
    Reject,
    /// Accept the value clamped into the declared range.
    Clamp,
}

/// Errors raised when editing a form field.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormError {
    /// No field with this id exists.
    #[error("unknown field `{0}`")]
    UnknownField(String),
    /// The submitted text is not a finite number.
    #[error("`{field}` expects a number, got `{raw}`")]
    NotANumber {
        /// Field id.
        field: &'static str,
        /// Submitted text.
        raw: String,
    },
    /// The value lies outside the field's inclusive range.
    #[error("`{field}` must be between {min} and {max}, got {value}")]
    OutOfRange {
        /// Field id.
        field: &'static str,
        /// Submitted value.
        value: f64,
        /// Inclusive lower bound.
        min: f64,
        /// Inclusive upper bound.
        max: f64,
    },
    /// The option is not part of the field's enumeration.
    #[error("`{field}` must be one of {options:?}, got `{value}`")]
    UnknownOption {
        /// Field id.
        field: &'static str,
        /// Submitted option.
        value: String,
        /// Allowed options.
        options: &'static [&'static str],
    },
}

/// Current widget values.
#[derive(Debug, Clone)]
pub struct FormState {
    catalog: &'static Catalog,
    numeric: Vec<f64>,
    selected: Vec<usize>,
}

impl FormState {
    /// Creates a form holding every field's default.
    #[must_use]
    pub fn defaults(catalog: &'static Catalog) -> Self {
        Self {
            catalog,
            numeric: catalog.numeric.iter().map(|f| f.default).collect(),
            selected: vec![0; catalog.categorical.len()],
        }
    }

    /// The catalog this form is bound to.
    #[must_use]
    pub fn catalog(&self) -> &'static Catalog {
        self.catalog
    }

    /// Restores every field to its default.
    pub fn reset(&mut self) {
        *self = Self::defaults(self.catalog);
    }

    /// Sets a numeric field and returns the value actually stored.
    ///
    /// Under [`RangePolicy::Reject`] the submitted value must lie in
    /// `[min, max]` as given; integer fields then snap to the nearest whole
    /// number. Under [`RangePolicy::Clamp`] the value is snapped, then
    /// clamped into range.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::UnknownField`] for an unknown id,
    /// [`FormError::NotANumber`] for non-finite input, and
    /// [`FormError::OutOfRange`] when the policy is `Reject` and the value
    /// lies outside `[min, max]`.
    pub fn set_numeric(
        &mut self,
        id: &str,
        value: f64,
        policy: RangePolicy,
    ) -> Result<f64, FormError> {
        let (idx, field) = self
            .catalog
            .numeric_field(id)
            .ok_or_else(|| FormError::UnknownField(id.to_string()))?;
        if !value.is_finite() {
            return Err(FormError::NotANumber {
                field: field.id,
                raw: value.to_string(),
            });
        }
        let accepted = match policy {
            RangePolicy::Reject if !field.contains(value) => {
                return Err(FormError::OutOfRange {
                    field: field.id,
                    value,
                    min: field.min,
                    max: field.max,
                });
            }
            RangePolicy::Reject => field.snap(value),
            RangePolicy::Clamp => field.clamp(field.snap(value)),
        };
        log::debug!("form: {} = {}", field.id, accepted);
        self.numeric[idx] = accepted;
        Ok(accepted)
    }

    /// Selects an option for a categorical field.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::UnknownField`] for an unknown id and
    /// [`FormError::UnknownOption`] if `option` is not enumerated.
    pub fn select(&mut self, id: &str, option: &str) -> Result<(), FormError> {
        let (idx, field) = self
            .catalog
            .categorical_field(id)
            .ok_or_else(|| FormError::UnknownField(id.to_string()))?;
        let position = field.position(option).ok_or_else(|| FormError::UnknownOption {
            field: field.id,
            value: option.to_string(),
            options: field.options,
        })?;
        log::debug!("form: {} = {}", field.id, option);
        self.selected[idx] = position;
        Ok(())
    }

    /// Sets any field from text, dispatching on the field's type.
    ///
    /// # Errors
    ///
    /// Propagates the errors of [`FormState::set_numeric`] and
    /// [`FormState::select`]; returns [`FormError::NotANumber`] when a
    /// numeric field receives unparsable text.
    pub fn set_from_str(
        &mut self,
        id: &str,
        raw: &str,
        policy: RangePolicy,
    ) -> Result<(), FormError> {
        if let Some((_, field)) = self.catalog.numeric_field(id) {
            let value: f64 = raw.trim().parse().map_err(|_| FormError::NotANumber {
                field: field.id,
                raw: raw.to_string(),
            })?;
            self.set_numeric(id, value, policy).map(|_| ())
        } else {
            self.select(id, raw.trim())
        }
    }

    /// Current value of a numeric field.
    #[must_use]
    pub fn numeric(&self, id: &str) -> Option<f64> {
        let (idx, _) = self.catalog.numeric_field(id)?;
        self.numeric.get(idx).copied()
    }

    /// Current option of a categorical field.
    #[must_use]
    pub fn category(&self, id: &str) -> Option<&'static str> {
        let (idx, field) = self.catalog.categorical_field(id)?;
        field.options.get(*self.selected.get(idx)?).copied()
    }

    /// Builds the prediction record: form values merged with the constant
    /// columns, in catalog order.
    #[must_use]
    pub fn to_record(&self) -> PredictionRecord {
        let mut record = PredictionRecord::new();
        for (field, value) in self.catalog.numeric.iter().zip(&self.numeric) {
            let cell = match field.kind {
                NumericKind::Integer => FeatureValue::Int(*value as i64),
                NumericKind::Float => FeatureValue::Float(*value),
            };
            record.push(field.key, cell);
        }
        for (field, idx) in self.catalog.categorical.iter().zip(&self.selected) {
            let option = field.options.get(*idx).copied().unwrap_or_default();
            record.push(field.key, FeatureValue::Text(option.to_string()));
        }
        for constant in &self.catalog.constants {
            record.push(constant.key, constant.value.into());
        }
        record
    }
}

impl PartialEq for FormState {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.catalog, other.catalog)
            && self.numeric == other.numeric
            && self.selected == other.selected
    }
}
