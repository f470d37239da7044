//! NorthStar process parameters encoded as typed Rust data.
//!
//! The `northstar-params` crate holds the advisor's complete input
//! vocabulary: six numeric L-PBF process parameters, four categorical
//! material/process settings, and eight constant columns that every
//! prediction request carries. It also provides the session-scoped
//! [`FormState`] and the [`PredictionRecord`] built from it.
//!
//! # Entry Point
//!
//! ```
//! let catalog = northstar_params::Catalog::full();
//! assert_eq!(catalog.column_count(), 18);
//!
//! let form = northstar_params::FormState::defaults(catalog);
//! let record = form.to_record();
//! assert_eq!(record.len(), 18);
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod fields;
pub mod form;
pub mod model;
pub mod record;

pub use form::{FormError, FormState, RangePolicy};
pub use model::{
    Catalog, CategoricalField, ConstantField, ConstantValue, NumericField, NumericKind, PageCopy,
};
pub use record::{FeatureValue, PredictionRecord};

impl Catalog {
    /// Returns the complete advisor catalog.
    ///
    /// Record order is fixed: the six numeric fields, the four categorical
    /// fields, then the eight constants.
    #[must_use]
    pub fn full() -> &'static Catalog {
        static CATALOG: std::sync::OnceLock<Catalog> = std::sync::OnceLock::new();
        CATALOG.get_or_init(|| Catalog {
            copy: fields::copy(),
            numeric: fields::numeric_fields(),
            categorical: fields::categorical_fields(),
            constants: fields::constant_fields(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn field_counts() {
        let catalog = Catalog::full();
        assert_eq!(catalog.numeric.len(), 6);
        assert_eq!(catalog.categorical.len(), 4);
        assert_eq!(catalog.constants.len(), 8);
    }

    #[test]
    fn keys_and_ids_are_unique() {
        let catalog = Catalog::full();
        let keys: HashSet<_> = catalog.feature_order().into_iter().collect();
        assert_eq!(keys.len(), catalog.column_count());
        let ids: HashSet<_> = catalog.field_ids().into_iter().collect();
        assert_eq!(ids.len(), 10);
    }

    #[test]
    fn defaults_lie_inside_ranges() {
        for field in &Catalog::full().numeric {
            assert!(field.min < field.max, "{}: empty range", field.id);
            assert!(field.contains(field.default), "{}: default out of range", field.id);
            assert_eq!(field.snap(field.default), field.default, "{}", field.id);
        }
    }

    #[test]
    fn categorical_defaults_are_first_option() {
        let catalog = Catalog::full();
        let defaults: Vec<_> = catalog
            .categorical
            .iter()
            .map(|f| f.default_option())
            .collect();
        assert_eq!(defaults, vec!["Argon", "N11", "Gas", "0"]);
    }

    #[test]
    fn record_order_starts_with_power_and_ends_with_build_direction() {
        let order = Catalog::full().feature_order();
        assert_eq!(order.first(), Some(&"Power [W]"));
        assert_eq!(order.last(), Some(&"Build Direction [degrees]"));
        assert_eq!(order[6], "Atomosphere of build");
    }
}
