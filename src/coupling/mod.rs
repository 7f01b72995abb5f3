//! Class coupling model: invocation events, pair keys and the coupling matrix

pub mod aggregator;
pub mod matrix;

pub use aggregator::{aggregate, CouplingAggregator};
pub use matrix::{CouplingMatrix, PairCoupling};

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Identifier of a project class as reported by the source analyzer.
///
/// Equality is literal string equality; two classes sharing a simple name
/// in different packages are the same `ClassId`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClassId(String);

impl ClassId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for ClassId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ClassId {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl From<String> for ClassId {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// One resolved cross-class call site: `caller` invokes a method of `callee`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InvocationEvent {
    pub caller: ClassId,
    pub callee: ClassId,
}

impl InvocationEvent {
    pub fn new(caller: impl Into<ClassId>, callee: impl Into<ClassId>) -> Self {
        Self {
            caller: caller.into(),
            callee: callee.into(),
        }
    }

    /// A class calling itself carries no coupling information
    pub fn is_self_invocation(&self) -> bool {
        self.caller == self.callee
    }
}

/// Unordered pair of distinct classes.
///
/// The members are stored in lexicographic order, so `{A,B}` and `{B,A}`
/// produce the same key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ClassPair {
    first: ClassId,
    second: ClassId,
}

impl ClassPair {
    /// Build the canonical pair, or `None` for a self-pair
    pub fn new(a: impl Into<ClassId>, b: impl Into<ClassId>) -> Option<Self> {
        let (a, b) = (a.into(), b.into());
        match a.cmp(&b) {
            std::cmp::Ordering::Less => Some(Self { first: a, second: b }),
            std::cmp::Ordering::Greater => Some(Self { first: b, second: a }),
            std::cmp::Ordering::Equal => None,
        }
    }

    pub fn first(&self) -> &ClassId {
        &self.first
    }

    pub fn second(&self) -> &ClassId {
        &self.second
    }
}

impl fmt::Display for ClassPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}, {}}}", self.first, self.second)
    }
}
