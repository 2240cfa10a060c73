//! Sell-through model
//!
//! A trained regression-tree ensemble stored as YAML. Each tree is a flat list of nodes with
//! the root at index zero; a split node sends features less than or equal to its threshold to
//! the left child and everything else to the right. The ensemble prediction is the mean of the
//! leaf values reached in every tree.
//!
//! ```yaml
//! name: sell-through
//! trees:
//!   - nodes:
//!       - { feature: days_until_expiry, threshold: 2.5, left: 1, right: 2 }
//!       - { value: 0.15 }
//!       - { value: 0.70 }
//! ```

use std::{fs, io, path::Path};

use serde::Deserialize;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::predictor::{SellThroughPredictor, TacticalFeatures};

/// Model Loading Errors
#[derive(Debug, Error)]
pub enum ModelError {
    /// IO error reading the model artifact
    #[error("failed to read model file: {0}")]
    Io(#[from] io::Error),

    /// YAML parsing error
    #[error("failed to parse model YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// The ensemble has no trees
    #[error("model contains no trees")]
    NoTrees,

    /// A tree has no nodes
    #[error("tree {tree} has no nodes")]
    EmptyTree {
        /// Index of the offending tree
        tree: usize,
    },

    /// A split refers to a child that is out of range or not after its parent
    #[error("tree {tree} node {node} has invalid child index {child}")]
    InvalidChild {
        /// Index of the offending tree
        tree: usize,
        /// Index of the split node
        node: usize,
        /// The child index that was rejected
        child: usize,
    },

    /// A threshold or leaf value is NaN or infinite
    #[error("tree {tree} node {node} holds a non-finite value")]
    NonFinite {
        /// Index of the offending tree
        tree: usize,
        /// Index of the offending node
        node: usize,
    },
}

/// Model input feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    /// [`TacticalFeatures::days_until_expiry`]
    DaysUntilExpiry,

    /// [`TacticalFeatures::stock_to_sales_ratio`]
    StockToSalesRatio,
}

impl Feature {
    fn value(self, features: TacticalFeatures) -> f64 {
        match self {
            Self::DaysUntilExpiry => f64::from(features.days_until_expiry),
            Self::StockToSalesRatio => features.stock_to_sales_ratio,
        }
    }
}

/// A single tree node.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Node {
    /// Internal node.
    Split {
        /// Feature compared at this node
        feature: Feature,
        /// Values at or below this go left
        threshold: f64,
        /// Index of the left child
        left: usize,
        /// Index of the right child
        right: usize,
    },

    /// Terminal node.
    Leaf {
        /// Predicted sell-through
        value: f64,
    },
}

/// A single regression tree.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    /// Create a tree from its nodes, root first.
    pub fn new(nodes: Vec<Node>) -> Self {
        Self { nodes }
    }

    fn validate(&self, tree: usize) -> Result<(), ModelError> {
        if self.nodes.is_empty() {
            return Err(ModelError::EmptyTree { tree });
        }

        for (node, entry) in self.nodes.iter().enumerate() {
            match *entry {
                Node::Split {
                    threshold,
                    left,
                    right,
                    ..
                } => {
                    if !threshold.is_finite() {
                        return Err(ModelError::NonFinite { tree, node });
                    }

                    // Children strictly after the parent keeps every walk finite.
                    for child in [left, right] {
                        if child <= node || child >= self.nodes.len() {
                            return Err(ModelError::InvalidChild { tree, node, child });
                        }
                    }
                }
                Node::Leaf { value } => {
                    if !value.is_finite() {
                        return Err(ModelError::NonFinite { tree, node });
                    }
                }
            }
        }

        Ok(())
    }

    fn predict(&self, features: TacticalFeatures) -> f64 {
        let mut index = 0;

        while let Some(node) = self.nodes.get(index) {
            match *node {
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    index = if feature.value(features) <= threshold {
                        left
                    } else {
                        right
                    };
                }
                Node::Leaf { value } => return value,
            }
        }

        0.0
    }
}

/// A validated regression-tree ensemble predicting sell-through.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "ForestArtifact")]
pub struct ForestModel {
    name: String,
    trees: Vec<Tree>,
}

#[derive(Deserialize)]
struct ForestArtifact {
    #[serde(default)]
    name: String,
    trees: Vec<Tree>,
}

impl TryFrom<ForestArtifact> for ForestModel {
    type Error = ModelError;

    fn try_from(artifact: ForestArtifact) -> Result<Self, Self::Error> {
        Self::new(artifact.name, artifact.trees)
    }
}

impl ForestModel {
    /// Build a model from trees, validating their structure.
    ///
    /// # Errors
    ///
    /// Returns an error if there are no trees, a tree is empty, a split points at a child that
    /// does not come after it, or any value is not finite.
    pub fn new(name: impl Into<String>, trees: Vec<Tree>) -> Result<Self, ModelError> {
        if trees.is_empty() {
            return Err(ModelError::NoTrees);
        }

        for (index, tree) in trees.iter().enumerate() {
            tree.validate(index)?;
        }

        Ok(Self {
            name: name.into(),
            trees,
        })
    }

    /// Parse a model from YAML.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is malformed or the trees fail validation.
    pub fn from_yaml(contents: &str) -> Result<Self, ModelError> {
        let artifact: ForestArtifact = serde_norway::from_str(contents)?;

        artifact.try_into()
    }

    /// Read and parse a model artifact.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a valid model.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ModelError> {
        let contents = fs::read_to_string(path)?;

        Self::from_yaml(&contents)
    }

    /// Model name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of trees in the ensemble
    pub fn len(&self) -> usize {
        self.trees.len()
    }

    /// Always false for a validated model
    pub fn is_empty(&self) -> bool {
        self.trees.is_empty()
    }
}

impl SellThroughPredictor for ForestModel {
    fn predict_sell_through(&self, features: TacticalFeatures) -> f64 {
        let total: f64 = self.trees.iter().map(|tree| tree.predict(features)).sum();

        #[expect(
            clippy::cast_precision_loss,
            reason = "tree counts are far below f64's exact integer range"
        )]
        let count = self.trees.len() as f64;

        total / count
    }
}

/// Load the sell-through model, treating any failure as "no model available".
///
/// A missing artifact is expected before the first training run and is logged as a warning;
/// an artifact that exists but cannot be used is logged as an error.
pub fn load_sell_through_model(path: impl AsRef<Path>) -> Option<ForestModel> {
    let path = path.as_ref();

    match ForestModel::from_path(path) {
        Ok(model) => {
            info!(
                path = %path.display(),
                name = model.name(),
                trees = model.len(),
                "loaded sell-through model"
            );

            Some(model)
        }
        Err(ModelError::Io(source)) if source.kind() == io::ErrorKind::NotFound => {
            warn!(path = %path.display(), "sell-through model not found; discounts disabled");

            None
        }
        Err(source) => {
            error!(
                path = %path.display(),
                "sell-through model unusable; discounts disabled: {source}"
            );

            None
        }
    }
}
