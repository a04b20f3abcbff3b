//! Recognized CSS transform functions.
//!
//! Properties whose name is registered here are merged into one composite
//! `transform` value per element instead of being written individually.
//! Each entry carries the function's identity value, used by
//! [`crate::FallbackPolicy::Identity`] when an endpoint cannot be inferred.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

const DEFAULT_FUNCTIONS: [(&str, f64); 9] = [
    ("scale", 1.0),
    ("scaleX", 1.0),
    ("scaleY", 1.0),
    ("rotate", 0.0),
    ("rotateX", 0.0),
    ("rotateY", 0.0),
    ("rotateZ", 0.0),
    ("translateX", 0.0),
    ("translateY", 0.0),
];

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransformRegistry {
    functions: HashMap<String, f64>,
}

impl Default for TransformRegistry {
    fn default() -> Self {
        Self {
            functions: DEFAULT_FUNCTIONS
                .iter()
                .map(|(name, identity)| (name.to_string(), *identity))
                .collect(),
        }
    }
}

impl TransformRegistry {
    /// Registry with no transform functions at all.
    pub fn empty() -> Self {
        Self {
            functions: HashMap::new(),
        }
    }

    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    /// Identity value of a registered function (`1` for scales, `0` otherwise).
    pub fn identity(&self, name: &str) -> Option<f64> {
        self.functions.get(name).copied()
    }

    /// Register (or overwrite) a transform function.
    pub fn register(&mut self, name: impl Into<String>, identity: f64) -> &mut Self {
        self.functions.insert(name.into(), identity);
        self
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}
