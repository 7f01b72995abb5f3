//! Symmetric pairwise coupling weights between classes

use crate::coupling::{ClassId, ClassPair};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Canonical index key: lower class index first
pub(crate) fn index_key(a: u32, b: u32) -> (u32, u32) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// One entry of the matrix, resolved to class names
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairCoupling {
    pub pair: ClassPair,

    /// Invocations observed between the two classes, both directions combined
    pub invocations: u64,

    /// `invocations / total_invocations`
    pub weight: f64,
}

/// Normalized coupling weights for every class pair with at least one
/// observed invocation.
///
/// Classes are numbered by name, so two matrices built from the same
/// events in any order compare equal. Lookups are symmetric and pairs without observed
/// invocations are absent rather than stored as zero.
#[derive(Debug, Clone, PartialEq)]
pub struct CouplingMatrix {
    /// Class names indexed by internal class index
    pub(crate) classes: Vec<ClassId>,

    /// Mapping from class names to internal indices
    pub(crate) class_index: HashMap<ClassId, u32>,

    /// Undirected invocation counts keyed by canonical index pair
    pub(crate) pair_counts: HashMap<(u32, u32), u64>,

    /// Directed invocation counts keyed by (caller, callee)
    pub(crate) directed_counts: HashMap<(u32, u32), u64>,

    /// Normalized weights keyed by canonical index pair
    pub(crate) weights: HashMap<(u32, u32), f64>,

    /// Sum of all cross-class invocations
    pub(crate) total_invocations: u64,
}

impl CouplingMatrix {
    /// Matrix with no classes and no invocations
    pub fn empty() -> Self {
        Self {
            classes: Vec::new(),
            class_index: HashMap::new(),
            pair_counts: HashMap::new(),
            directed_counts: HashMap::new(),
            weights: HashMap::new(),
            total_invocations: 0,
        }
    }

    pub fn total_invocations(&self) -> u64 {
        self.total_invocations
    }

    /// Distinct classes in lexicographic order
    pub fn classes(&self) -> &[ClassId] {
        &self.classes
    }

    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    /// Number of class pairs with a recorded weight
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    pub fn index_of(&self, class: &str) -> Option<u32> {
        self.class_index.get(class).copied()
    }

    /// Class name for an internal index
    pub fn class(&self, index: u32) -> &ClassId {
        &self.classes[index as usize]
    }

    /// Coupling weight between two classes; `None` when no invocation was
    /// observed between them or when `a == b`
    pub fn weight(&self, a: &str, b: &str) -> Option<f64> {
        let a = self.index_of(a)?;
        let b = self.index_of(b)?;
        self.weight_by_index(a, b)
    }

    pub fn weight_by_index(&self, a: u32, b: u32) -> Option<f64> {
        if a == b {
            return None;
        }
        self.weights.get(&index_key(a, b)).copied()
    }

    /// Invocations between two classes in either direction
    pub fn pair_count(&self, a: &str, b: &str) -> u64 {
        match (self.index_of(a), self.index_of(b)) {
            (Some(a), Some(b)) if a != b => {
                self.pair_counts.get(&index_key(a, b)).copied().unwrap_or(0)
            }
            _ => 0,
        }
    }

    /// Invocations from `caller` to `callee` only
    pub fn directed_count(&self, caller: &str, callee: &str) -> u64 {
        match (self.index_of(caller), self.index_of(callee)) {
            (Some(a), Some(b)) => self.directed_counts.get(&(a, b)).copied().unwrap_or(0),
            _ => 0,
        }
    }

    /// Iterate over all directed counts as `(caller, callee, count)`
    pub fn directed_counts(&self) -> impl Iterator<Item = (&ClassId, &ClassId, u64)> + '_ {
        self.directed_counts
            .iter()
            .map(move |(&(a, b), &count)| (self.class(a), self.class(b), count))
    }

    /// All recorded pairs, sorted by pair key
    pub fn pairs(&self) -> Vec<PairCoupling> {
        let mut pairs: Vec<PairCoupling> = self
            .weights
            .iter()
            .filter_map(|(&(a, b), &weight)| {
                let pair = ClassPair::new(self.class(a).clone(), self.class(b).clone())?;
                Some(PairCoupling {
                    pair,
                    invocations: self.pair_counts.get(&(a, b)).copied().unwrap_or(0),
                    weight,
                })
            })
            .collect();

        pairs.sort_by(|x, y| x.pair.cmp(&y.pair));
        pairs
    }

    /// The `n` most strongly coupled pairs, strongest first
    pub fn strongest_pairs(&self, n: usize) -> Vec<PairCoupling> {
        let mut pairs = self.pairs();
        // Stable sort keeps pair-key order among equal weights
        pairs.sort_by(|x, y| y.weight.total_cmp(&x.weight));
        pairs.truncate(n);
        pairs
    }
}

impl Default for CouplingMatrix {
    fn default() -> Self {
        Self::empty()
    }
}
