//! Test-only fixtures for NorthStar.
//!
//! Builds small, hand-fitted pipeline artifacts over the real catalog so
//! that tests exercise the same record layout the advisor sends in
//! production. Not published.

#![allow(missing_docs)]

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use northstar_params::{Catalog, ConstantValue};
use serde_json::{json, Value};

/// Categories the fixture build-direction encoder was fitted on.
pub const BUILD_DIRECTIONS: [&str; 2] = ["45", "90"];

/// Bytes standing in for the embedded video.
pub const VIDEO_BYTES: &[u8] = b"\x00\x00\x00\x18ftypmp42\x00\x00\x00\x00mp42isom";

fn numeric_keys(catalog: &Catalog) -> Vec<&'static str> {
    catalog.numeric.iter().map(|f| f.key).collect()
}

fn numeric_constant_keys(catalog: &Catalog) -> Vec<&'static str> {
    catalog
        .constants
        .iter()
        .filter(|c| !matches!(c.value, ConstantValue::Str(_)))
        .map(|c| c.key)
        .collect()
}

fn categorical_keys(catalog: &Catalog) -> Vec<&'static str> {
    catalog
        .categorical
        .iter()
        .map(|f| f.key)
        .chain(
            catalog
                .constants
                .iter()
                .filter(|c| matches!(c.value, ConstantValue::Str(_)))
                .map(|c| c.key),
        )
        .collect()
}

fn categories(catalog: &Catalog) -> Vec<Vec<&'static str>> {
    catalog
        .categorical
        .iter()
        .map(|f| f.options.to_vec())
        .chain(std::iter::once(BUILD_DIRECTIONS.to_vec()))
        .collect()
}

/// The `prep` stage fitted on `feature_names_in`.
///
/// Output layout: 6 scaled form numerics, 7 passthrough numeric constants,
/// then 11 one-hot indicators (2 + 3 + 2 + 2 + 2).
pub fn prep_json(feature_names_in: &[&str]) -> Value {
    let catalog = Catalog::full();
    json!({
        "feature_names_in": feature_names_in,
        "transformers": [
            {
                "kind": "standard_scaler",
                "columns": numeric_keys(catalog),
                "mean": [200.0, 1.0, 100.0, 80.0, 50.0, 20.0],
                "scale": [80.0, 0.5, 40.0, 30.0, 25.0, 10.0]
            },
            {
                "kind": "passthrough",
                "columns": numeric_constant_keys(catalog)
            },
            {
                "kind": "one_hot",
                "columns": categorical_keys(catalog),
                "categories": categories(catalog),
                "handle_unknown": "error"
            }
        ]
    })
}

/// Width of the fixture `prep` output.
pub const FEATURE_WIDTH: usize = 24;

/// Logistic coefficients, in `prep` output order.
pub const LOGISTIC_COEF: [f64; FEATURE_WIDTH] = [
    0.8, -0.6, -0.3, 0.2, -0.4, -0.1, // scaled numerics
    0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, // constants
    0.3, -0.3, // atmosphere
    0.2, 0.0, -0.2, // nucleants
    0.1, -0.1, // atomization
    0.0, -0.25, // same layer
    0.0, 0.05, // build direction
];

/// Logistic intercept.
pub const LOGISTIC_INTERCEPT: f64 = 0.1;

fn document(prep: Value, model: Value) -> String {
    json!({
        "format": "northstar-pipeline",
        "version": 1,
        "steps": { "prep": prep, "model": model }
    })
    .to_string()
}

/// A logistic-regression pipeline over the full catalog.
///
/// With the form defaults it predicts SUCCESS with p ≈ 0.686.
pub fn logistic_pipeline_json() -> String {
    let order = Catalog::full().feature_order();
    document(
        prep_json(&order),
        json!({
            "kind": "logistic_regression",
            "classes": [0, 1],
            "coef": LOGISTIC_COEF,
            "intercept": LOGISTIC_INTERCEPT
        }),
    )
}

/// A two-stump random forest over the full catalog.
///
/// Tree 1 splits on scaled power, tree 2 on scaled velocity. With the form
/// defaults it predicts SUCCESS with p = 0.625.
pub fn forest_pipeline_json() -> String {
    let order = Catalog::full().feature_order();
    let stump = |feature: i64, left: [f64; 2], right: [f64; 2]| {
        json!({
            "children_left": [1, -1, -1],
            "children_right": [2, -1, -1],
            "feature": [feature, -2, -2],
            "threshold": [0.0, -2.0, -2.0],
            "value": [[1.0, 1.0], left, right]
        })
    };
    document(
        prep_json(&order),
        json!({
            "kind": "random_forest",
            "classes": [0, 1],
            "n_features": FEATURE_WIDTH,
            "trees": [stump(0, [1.0, 3.0], [3.0, 1.0]), stump(1, [2.0, 2.0], [4.0, 0.0])]
        }),
    )
}

/// A pipeline fitted on a column name the catalog does not send
/// (`"Atmosphere of build"` instead of `"Atomosphere of build"`). It loads
/// fine and fails every prediction with a schema mismatch.
pub fn drifted_pipeline_json() -> String {
    let order: Vec<&str> = Catalog::full()
        .feature_order()
        .into_iter()
        .map(|k| if k == "Atomosphere of build" { "Atmosphere of build" } else { k })
        .collect();
    let mut prep = prep_json(&order);
    if let Some(columns) = prep["transformers"][2]["columns"].as_array_mut() {
        for column in columns.iter_mut() {
            if *column == "Atomosphere of build" {
                *column = json!("Atmosphere of build");
            }
        }
    }
    document(
        prep,
        json!({
            "kind": "logistic_regression",
            "classes": [0, 1],
            "coef": LOGISTIC_COEF,
            "intercept": LOGISTIC_INTERCEPT
        }),
    )
}

/// Writes `json` to `dir/best_model_smote.json` and returns the path.
pub fn write_pipeline(dir: &Path, json: &str) -> io::Result<PathBuf> {
    let path = dir.join("best_model_smote.json");
    fs::write(&path, json)?;
    Ok(path)
}

/// Writes [`VIDEO_BYTES`] to `dir/static/Video.mp4` and returns the path.
pub fn write_video(dir: &Path) -> io::Result<PathBuf> {
    let path = dir.join("static").join("Video.mp4");
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, VIDEO_BYTES)?;
    Ok(path)
}
