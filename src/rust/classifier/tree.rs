use ndarray::ArrayView1;

use super::error::ClassifierError;
use super::utils::{argmax, check_width};
use super::Classifier;

/// Child index marking a leaf node.
pub const TREE_LEAF: i64 = -1;

/// A fitted binary decision tree stored as parallel node arrays.
///
/// Node `i` splits on `feature[i]`: samples with `x[feature] <= threshold[i]`
/// go to `children_left[i]`, the rest to `children_right[i]`. Leaves carry
/// per-class sample counts in `value[i]`. Inputs are rounded to `f32` before
/// each comparison, matching trees fitted on single-precision features.
#[derive(Debug, Clone)]
pub struct DecisionTree {
    n_features: usize,
    children_left: Vec<i64>,
    children_right: Vec<i64>,
    feature: Vec<i64>,
    threshold: Vec<f64>,
    value: Vec<Vec<f64>>,
    classes: Vec<i64>,
}

#[derive(Debug, Clone, Default)]
pub struct TreeNodes {
    pub children_left: Vec<i64>,
    pub children_right: Vec<i64>,
    pub feature: Vec<i64>,
    pub threshold: Vec<f64>,
    pub value: Vec<Vec<f64>>,
}

impl DecisionTree {
    pub fn new(n_features: usize, nodes: TreeNodes, classes: Vec<i64>) -> Result<Self, ClassifierError> {
        let TreeNodes { children_left, children_right, feature, threshold, value } = nodes;
        let n_nodes = children_left.len();
        if n_nodes == 0 {
            return Err(ClassifierError::InvalidModel("tree has no nodes".into()));
        }
        if classes.is_empty() {
            return Err(ClassifierError::InvalidModel("tree has no classes".into()));
        }
        if n_features == 0 {
            return Err(ClassifierError::InvalidModel("tree has no input features".into()));
        }
        for (name, len) in [
            ("children_right", children_right.len()),
            ("feature", feature.len()),
            ("threshold", threshold.len()),
            ("value", value.len()),
        ] {
            if len != n_nodes {
                return Err(ClassifierError::InvalidModel(format!(
                    "{} has {} entries, expected {}",
                    name, len, n_nodes
                )));
            }
        }

        for node in 0..n_nodes {
            if value[node].len() != classes.len() {
                return Err(ClassifierError::InvalidModel(format!(
                    "node {} has {} class counts, expected {}",
                    node,
                    value[node].len(),
                    classes.len()
                )));
            }
            let (left, right) = (children_left[node], children_right[node]);
            if left == TREE_LEAF && right == TREE_LEAF {
                continue;
            }
            // children always follow their parent in depth-first order, which also rules out cycles
            let valid_child = |c: i64| c > node as i64 && (c as usize) < n_nodes;
            if !valid_child(left) || !valid_child(right) {
                return Err(ClassifierError::InvalidModel(format!(
                    "node {} has invalid children ({}, {})",
                    node, left, right
                )));
            }
            let f = feature[node];
            if f < 0 || f as usize >= n_features {
                return Err(ClassifierError::InvalidModel(format!(
                    "node {} splits on feature {} outside 0..{}",
                    node, f, n_features
                )));
            }
            if !threshold[node].is_finite() {
                return Err(ClassifierError::InvalidModel(format!("node {} has a non-finite threshold", node)));
            }
        }

        Ok(Self {
            n_features,
            children_left,
            children_right,
            feature,
            threshold,
            value,
            classes,
        })
    }

    /// Index of the leaf reached by `x`.
    pub fn apply(&self, x: &ArrayView1<f64>) -> usize {
        let mut node = 0usize;
        while self.children_left[node] != TREE_LEAF {
            let f = self.feature[node] as usize;
            node = if (x[f] as f32 as f64) <= self.threshold[node] {
                self.children_left[node] as usize
            } else {
                self.children_right[node] as usize
            };
        }
        node
    }

    pub fn node_count(&self) -> usize {
        self.children_left.len()
    }
}

impl Classifier for DecisionTree {
    fn kind(&self) -> &'static str {
        "decision_tree"
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    fn predict(&self, x: ArrayView1<f64>) -> Result<i64, ClassifierError> {
        check_width(&x, self.n_features)?;
        if x.iter().any(|v| !v.is_finite()) {
            return Err(ClassifierError::PredictionError("input contains non-finite values".into()));
        }
        let leaf = self.apply(&x);
        argmax(&self.value[leaf])
            .map(|i| self.classes[i])
            .ok_or_else(|| ClassifierError::PredictionError(format!("leaf {} has no class counts", leaf)))
    }
}
