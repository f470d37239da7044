//! Core catalog model types.
//!
//! These types describe the advisor's input vocabulary as typed Rust data:
//! user-facing numeric and categorical fields, plus the constant columns that
//! are appended to every request. All instances are `'static` and reached
//! through [`Catalog::full()`](crate::Catalog::full).

/// Whether a numeric field behaves like an integer or a decimal stepper.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericKind {
    /// Whole numbers only; submitted values snap to the nearest integer.
    Integer,
    /// Decimal values with a fractional step.
    Float,
}

impl NumericKind {
    /// Returns the kind name used in rendered widgets and JSON output.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            NumericKind::Integer => "integer",
            NumericKind::Float => "float",
        }
    }
}

/// A numeric process parameter with an inclusive valid range.
#[derive(Debug, Clone)]
pub struct NumericField {
    /// Short identifier used by the console and CLI (e.g. `"power"`).
    pub id: &'static str,
    /// Column key expected by the preprocessing stage (e.g. `"Power [W]"`).
    pub key: &'static str,
    /// Human-readable widget label.
    pub label: &'static str,
    /// Explanatory caption shown under the widget.
    pub caption: &'static str,
    /// Integer or decimal stepper.
    pub kind: NumericKind,
    /// Inclusive lower bound.
    pub min: f64,
    /// Inclusive upper bound.
    pub max: f64,
    /// Value shown when a session starts.
    pub default: f64,
    /// Widget step.
    pub step: f64,
}

impl NumericField {
    /// Returns true if `value` lies inside `[min, max]`.
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Snaps `value` to the field's kind (rounds integer fields).
    #[must_use]
    pub fn snap(&self, value: f64) -> f64 {
        match self.kind {
            NumericKind::Integer => value.round(),
            NumericKind::Float => value,
        }
    }

    /// Clamps `value` into `[min, max]`.
    #[must_use]
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }
}

/// A categorical parameter drawn from a fixed option set.
#[derive(Debug, Clone)]
pub struct CategoricalField {
    /// Short identifier used by the console and CLI (e.g. `"atmosphere"`).
    pub id: &'static str,
    /// Column key expected by the preprocessing stage.
    pub key: &'static str,
    /// Human-readable widget label.
    pub label: &'static str,
    /// Explanatory caption shown under the widget.
    pub caption: &'static str,
    /// Enumerated options, in display order. The first one is the default.
    pub options: &'static [&'static str],
}

impl CategoricalField {
    /// Returns the default option (the first one listed).
    #[must_use]
    pub fn default_option(&self) -> &'static str {
        self.options.first().copied().unwrap_or_default()
    }

    /// Returns the index of `option`, or `None` if it is not enumerated.
    #[must_use]
    pub fn position(&self, option: &str) -> Option<usize> {
        self.options.iter().position(|o| *o == option)
    }
}

/// A literal value attached to a constant column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConstantValue {
    /// An integer literal.
    Int(i64),
    /// A decimal literal.
    Float(f64),
    /// A string literal (fed to the categorical encoder).
    Str(&'static str),
}

/// A column that is not exposed to the user and carries the same value on
/// every request.
#[derive(Debug, Clone)]
pub struct ConstantField {
    /// Column key expected by the preprocessing stage.
    pub key: &'static str,
    /// The fixed value.
    pub value: ConstantValue,
}

/// Page copy shown above the form.
#[derive(Debug, Clone)]
pub struct PageCopy {
    /// Page title.
    pub title: &'static str,
    /// Subtitle under the title.
    pub subtitle: &'static str,
    /// One-line description.
    pub description: &'static str,
    /// Heading above the numeric fields.
    pub numeric_heading: &'static str,
    /// Heading above the categorical fields.
    pub categorical_heading: &'static str,
    /// Label of the trigger control.
    pub trigger_label: &'static str,
}

/// The complete advisor input catalog.
#[derive(Debug, Clone)]
pub struct Catalog {
    /// Page copy.
    pub copy: PageCopy,
    /// User-facing numeric fields, in record order.
    pub numeric: Vec<NumericField>,
    /// User-facing categorical fields, in record order.
    pub categorical: Vec<CategoricalField>,
    /// Hidden constant columns, in record order.
    pub constants: Vec<ConstantField>,
}

impl Catalog {
    /// Returns every column key in record order: numeric fields, then
    /// categorical fields, then constants.
    #[must_use]
    pub fn feature_order(&self) -> Vec<&'static str> {
        self.numeric
            .iter()
            .map(|f| f.key)
            .chain(self.categorical.iter().map(|f| f.key))
            .chain(self.constants.iter().map(|f| f.key))
            .collect()
    }

    /// Looks up a numeric field by id.
    #[must_use]
    pub fn numeric_field(&self, id: &str) -> Option<(usize, &NumericField)> {
        self.numeric.iter().enumerate().find(|(_, f)| f.id == id)
    }

    /// Looks up a categorical field by id.
    #[must_use]
    pub fn categorical_field(&self, id: &str) -> Option<(usize, &CategoricalField)> {
        self.categorical.iter().enumerate().find(|(_, f)| f.id == id)
    }

    /// Returns the ids of all user-facing fields, numeric first.
    #[must_use]
    pub fn field_ids(&self) -> Vec<&'static str> {
        self.numeric
            .iter()
            .map(|f| f.id)
            .chain(self.categorical.iter().map(|f| f.id))
            .collect()
    }

    /// Total number of columns in a prediction record.
    #[must_use]
    pub fn column_count(&self) -> usize {
        self.numeric.len() + self.categorical.len() + self.constants.len()
    }
}
