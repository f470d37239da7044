//! The L-PBF field definitions.
//!
//! Column keys keep the exact spelling used when the pipeline was fitted,
//! including "Atomosphere". Renaming any of them breaks inference.

use crate::model::{
    CategoricalField, ConstantField, ConstantValue, NumericField, NumericKind, PageCopy,
};

/// Returns the page copy.
#[must_use]
pub fn copy() -> PageCopy {
    PageCopy {
        title: "NorthStar — Process Advisor",
        subtitle: "Laser Powder Bed Fusion (L-PBF) Optimization",
        description: "AI-driven guidance for predicting and optimizing print success \
                      in L-PBF systems.",
        numeric_heading: "Process Parameters",
        categorical_heading: "Material & Process Settings",
        trigger_label: "Predict",
    }
}

/// Returns the six user-facing numeric process parameters.
#[must_use]
pub fn numeric_fields() -> Vec<NumericField> {
    vec![
        NumericField {
            id: "power",
            key: "Power [W]",
            label: "Power [W]",
            caption: "Laser energy delivered to the powder bed.",
            kind: NumericKind::Integer,
            min: 50.0,
            max: 500.0,
            default: 180.0,
            step: 1.0,
        },
        NumericField {
            id: "velocity",
            key: "Velocity [m/s]",
            label: "Velocity [m/s]",
            caption: "Laser scan speed across the powder bed.",
            kind: NumericKind::Float,
            min: 0.1,
            max: 3.0,
            default: 0.9,
            step: 0.01,
        },
        NumericField {
            id: "hatch",
            key: "Hatch Spacing [μm]",
            label: "Hatch Spacing [μm]",
            caption: "Distance between scan tracks.",
            kind: NumericKind::Integer,
            min: 10.0,
            max: 200.0,
            default: 90.0,
            step: 1.0,
        },
        NumericField {
            id: "beam",
            key: "Beam Diameter [μm]",
            label: "Beam Diameter [μm]",
            caption: "Effective beam spot size.",
            kind: NumericKind::Integer,
            min: 20.0,
            max: 200.0,
            default: 78.0,
            step: 1.0,
        },
        NumericField {
            id: "layer",
            key: "Powder Layer Thickness [μm]",
            label: "Powder Layer Thickness [μm]",
            caption: "Thickness of each powder layer.",
            kind: NumericKind::Integer,
            min: 10.0,
            max: 200.0,
            default: 50.0,
            step: 1.0,
        },
        NumericField {
            id: "d90",
            key: "d90 [um]",
            label: "d90 [μm]",
            caption: "Powder particle coarse fraction (90th percentile).",
            kind: NumericKind::Integer,
            min: 1.0,
            max: 60.0,
            default: 15.0,
            step: 1.0,
        },
    ]
}

/// Returns the four user-facing categorical parameters.
#[must_use]
pub fn categorical_fields() -> Vec<CategoricalField> {
    vec![
        CategoricalField {
            id: "atmosphere",
            key: "Atomosphere of build",
            label: "Atmosphere of Build",
            caption: "Protective gas used during printing.",
            options: &["Argon", "Nitrogen"],
        },
        CategoricalField {
            id: "nucleants",
            key: "Nucleants",
            label: "Nucleants",
            caption: "Powder additive to promote solidification.",
            options: &["N11", "N12", "N13"],
        },
        CategoricalField {
            id: "atomization",
            key: "Atomization Atomosphere",
            label: "Atomization Atmosphere",
            caption: "Powder production method.",
            options: &["Gas", "Water"],
        },
        CategoricalField {
            id: "same-layer",
            key: "Same Layer Scanned?",
            label: "Same Layer Scanned?",
            caption: "Laser rescans same layer.",
            options: &["0", "1"],
        },
    ]
}

/// Returns the eight hidden constant columns.
///
/// These literals are not checked against the units or ranges the model was
/// trained on.
#[must_use]
pub fn constant_fields() -> Vec<ConstantField> {
    vec![
        ConstantField {
            key: "Initial Powder Bed Temperature [K]",
            value: ConstantValue::Int(300),
        },
        ConstantField {
            key: "Substrate/Platform Temperature [K]",
            value: ConstantValue::Int(100),
        },
        ConstantField {
            key: "Surface Energy Density [J/mm2]",
            value: ConstantValue::Float(2.5),
        },
        ConstantField {
            key: "Linear Energy Density [J/mm]",
            value: ConstantValue::Float(3.5),
        },
        ConstantField {
            key: "Volume Energy Density [J/mm3]",
            value: ConstantValue::Int(30),
        },
        ConstantField {
            key: "Powder Recycled How Many Times?",
            value: ConstantValue::Int(0),
        },
        ConstantField {
            key: "Powder Shape [0-1]",
            value: ConstantValue::Float(1.0),
        },
        ConstantField {
            key: "Build Direction [degrees]",
            value: ConstantValue::Str("90"),
        },
    ]
}
