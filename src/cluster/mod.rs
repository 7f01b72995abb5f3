//! Cluster analysis module

pub mod hierarchical;
pub mod metrics;

pub use hierarchical::{average_coupling, cluster, HierarchicalClusterer};
pub use metrics::PartitionSummary;

use crate::coupling::ClassId;
use serde::{Deserialize, Serialize};

/// A candidate module: a group of classes merged by the clusterer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cluster {
    /// Position of this cluster in the final partition
    pub id: u32,

    /// Member classes, in the order they joined the cluster
    pub members: Vec<ClassId>,

    /// Number of member classes
    pub size: usize,

    /// Average coupling over the member pairs that have a recorded weight
    pub cohesion: f64,

    /// Members with the highest summed coupling to the rest of the cluster
    pub central_classes: Vec<ClassId>,
}

impl Cluster {
    pub fn contains(&self, class: &str) -> bool {
        self.members.iter().any(|m| m.as_str() == class)
    }

    pub fn is_singleton(&self) -> bool {
        self.size == 1
    }
}

/// Which stopping policy drove a merge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergePhase {
    /// Best average coupling exceeded the threshold
    Threshold,

    /// Forced merge to bring the cluster count down to the module cap
    Cardinality,
}

/// One merge performed by the clusterer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergeStep {
    /// 1-based position in the overall merge sequence
    pub step: usize,

    pub phase: MergePhase,

    /// Members of the surviving cluster before the merge
    pub absorbed_into: Vec<ClassId>,

    /// Members of the cluster that was merged away
    pub absorbed: Vec<ClassId>,

    /// Average coupling between the two clusters at merge time
    pub coupling: f64,
}

/// Final partition together with the merge history that produced it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusteringOutcome {
    pub clusters: Vec<Cluster>,

    pub steps: Vec<MergeStep>,

    /// Threshold used for the first phase
    pub threshold: f64,

    /// Number of classes in the matrix (M)
    pub class_count: usize,

    /// Module cap enforced by the second phase (M / 2)
    pub max_modules: usize,
}

impl ClusteringOutcome {
    pub fn merges_in(&self, phase: MergePhase) -> usize {
        self.steps.iter().filter(|s| s.phase == phase).count()
    }

    /// Cluster holding `class`, if the class was part of the input
    pub fn cluster_of(&self, class: &str) -> Option<&Cluster> {
        self.clusters.iter().find(|c| c.contains(class))
    }
}
