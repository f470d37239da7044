//! The `model` stage: binary classifiers over the dense feature vector.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::PipelineError;

/// Class labels every estimator must be fitted with.
const BINARY_CLASSES: [i64; 2] = [0, 1];

/// Marker used for leaf children in fitted trees.
const TREE_LEAF: i64 = -1;

/// A fitted CART tree in flat array layout.
///
/// Node `i` is a leaf when `children_left[i] == -1`; otherwise samples with
/// `x[feature[i]] <= threshold[i]` go left.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTree {
    /// Left child per node.
    pub children_left: Vec<i64>,
    /// Right child per node.
    pub children_right: Vec<i64>,
    /// Split feature per node (ignored at leaves).
    pub feature: Vec<i64>,
    /// Split threshold per node (ignored at leaves).
    pub threshold: Vec<f64>,
    /// Per-node class weights `[w0, w1]`.
    pub value: Vec<Vec<f64>>,
}

impl DecisionTree {
    fn validate(&self, n_features: usize) -> Result<(), String> {
        let n = self.children_left.len();
        if n == 0 {
            return Err("tree has no nodes".to_string());
        }
        if [self.children_right.len(), self.feature.len(), self.threshold.len(), self.value.len()]
            .iter()
            .any(|len| *len != n)
        {
            return Err("tree arrays have different lengths".to_string());
        }
        for node in 0..n {
            let (left, right) = (self.children_left[node], self.children_right[node]);
            if left == TREE_LEAF {
                let weights = &self.value[node];
                if weights.len() != BINARY_CLASSES.len()
                    || weights.iter().any(|w| !w.is_finite() || *w < 0.0)
                    || weights.iter().sum::<f64>() <= 0.0
                {
                    return Err(format!("leaf {} has invalid class weights", node));
                }
                continue;
            }
            // Children always follow their parent, which also rules out cycles.
            let in_bounds = |child: i64| child > node as i64 && (child as usize) < n;
            if !in_bounds(left) || !in_bounds(right) {
                return Err(format!("node {} has out-of-range children", node));
            }
            let feature = self.feature[node];
            if feature < 0 || feature as usize >= n_features {
                return Err(format!("node {} splits on unknown feature {}", node, feature));
            }
            if self.threshold[node].is_nan() {
                return Err(format!("node {} has a NaN threshold", node));
            }
        }
        Ok(())
    }

    /// Class distribution of the leaf reached by `x`.
    fn leaf_distribution(&self, x: &[f64]) -> [f64; 2] {
        let mut node = 0usize;
        while self.children_left[node] != TREE_LEAF {
            let f = self.feature[node] as usize;
            node = if x[f] <= self.threshold[node] {
                self.children_left[node] as usize
            } else {
                self.children_right[node] as usize
            };
        }
        let weights = &self.value[node];
        let total: f64 = weights.iter().sum();
        [weights[0] / total, weights[1] / total]
    }
}

/// The fitted classifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Estimator {
    /// Binary logistic regression.
    LogisticRegression {
        /// Class labels, must be `[0, 1]`.
        classes: Vec<i64>,
        /// One coefficient per input feature.
        coef: Vec<f64>,
        /// Intercept term.
        intercept: f64,
    },
    /// Averaged ensemble of decision trees.
    RandomForest {
        /// Class labels, must be `[0, 1]`.
        classes: Vec<i64>,
        /// Input width the trees were fitted on.
        n_features: usize,
        /// Member trees.
        trees: Vec<DecisionTree>,
    },
}

impl Estimator {
    /// Input width the estimator was fitted on.
    #[must_use]
    pub fn n_features(&self) -> usize {
        match self {
            Estimator::LogisticRegression { coef, .. } => coef.len(),
            Estimator::RandomForest { n_features, .. } => *n_features,
        }
    }

    /// Short name for logs.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Estimator::LogisticRegression { .. } => "logistic_regression",
            Estimator::RandomForest { .. } => "random_forest",
        }
    }

    /// Checks internal consistency of the fitted parameters.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::ArtifactCorrupt`] naming `path` when the
    /// classes are not `[0, 1]` or the parameters are malformed.
    pub fn validate(&self, path: &Path) -> Result<(), PipelineError> {
        let corrupt = |reason: String| PipelineError::corrupt(path, format!("model: {}", reason));
        let classes = match self {
            Estimator::LogisticRegression { classes, .. }
            | Estimator::RandomForest { classes, .. } => classes,
        };
        if classes.as_slice() != BINARY_CLASSES.as_slice() {
            return Err(corrupt(format!("classes must be [0, 1], got {:?}", classes)));
        }
        if self.n_features() == 0 {
            return Err(corrupt("fitted on zero features".to_string()));
        }
        match self {
            Estimator::LogisticRegression { coef, intercept, .. } => {
                if coef.iter().any(|c| !c.is_finite()) || !intercept.is_finite() {
                    return Err(corrupt("non-finite coefficient".to_string()));
                }
            }
            Estimator::RandomForest { n_features, trees, .. } => {
                if trees.is_empty() {
                    return Err(corrupt("forest has no trees".to_string()));
                }
                for (i, tree) in trees.iter().enumerate() {
                    tree.validate(*n_features)
                        .map_err(|reason| corrupt(format!("tree {}: {}", i, reason)))?;
                }
            }
        }
        Ok(())
    }

    fn check_width(&self, x: &[f64]) -> Result<(), PipelineError> {
        if x.len() == self.n_features() {
            Ok(())
        } else {
            Err(PipelineError::Dimension {
                expected: self.n_features(),
                found: x.len(),
            })
        }
    }

    /// Class probabilities `[p_fail, p_success]`.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Dimension`] if `x` has the wrong width.
    pub fn predict_proba(&self, x: &[f64]) -> Result<[f64; 2], PipelineError> {
        self.check_width(x)?;
        let proba = match self {
            Estimator::LogisticRegression { .. } => {
                let p1 = sigmoid(self.decision(x));
                [1.0 - p1, p1]
            }
            Estimator::RandomForest { trees, .. } => {
                let mut sum = [0.0, 0.0];
                for tree in trees {
                    let d = tree.leaf_distribution(x);
                    sum[0] += d[0];
                    sum[1] += d[1];
                }
                let n = trees.len() as f64;
                [sum[0] / n, sum[1] / n]
            }
        };
        Ok(proba)
    }

    /// Predicted class index (`0` or `1`).
    ///
    /// Logistic regression thresholds the decision value at zero; forests
    /// take the argmax of the averaged distribution, ties going to class 0.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Dimension`] if `x` has the wrong width.
    pub fn predict(&self, x: &[f64]) -> Result<usize, PipelineError> {
        self.check_width(x)?;
        let class = match self {
            Estimator::LogisticRegression { .. } => usize::from(self.decision(x) > 0.0),
            Estimator::RandomForest { .. } => {
                let [p0, p1] = self.predict_proba(x)?;
                usize::from(p1 > p0)
            }
        };
        Ok(class)
    }

    fn decision(&self, x: &[f64]) -> f64 {
        match self {
            Estimator::LogisticRegression { coef, intercept, .. } => {
                coef.iter().zip(x).map(|(c, v)| c * v).sum::<f64>() + intercept
            }
            Estimator::RandomForest { .. } => 0.0,
        }
    }
}

fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}
