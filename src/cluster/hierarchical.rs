//! Greedy agglomerative clustering over class coupling weights
//!
//! Every class starts in its own cluster. The two clusters with the highest
//! average coupling are merged repeatedly, in two phases:
//!
//! 1. **Threshold**: merge while the best average coupling is strictly
//!    greater than the threshold.
//! 2. **Cardinality**: merge unconditionally until at most `M / 2` clusters
//!    remain, where `M` is the number of classes in the matrix.
//!
//! Candidate pairs are scanned in collection order (`i < j`) and the first
//! strict maximum wins. Merging keeps the surviving cluster at its position
//! and removes the absorbed one, so ties always resolve the same way for the
//! same input.

use crate::cluster::metrics;
use crate::cluster::{Cluster, ClusteringOutcome, MergePhase, MergeStep};
use crate::coupling::{ClassId, CouplingMatrix};
use itertools::Itertools;
use rayon::prelude::*;

/// Default number of central classes reported per cluster
pub const DEFAULT_CENTRAL_CLASS_COUNT: usize = 5;

/// Working cluster: member class indices into the coupling matrix
#[derive(Debug, Clone)]
struct Group {
    members: Vec<u32>,
}

impl Group {
    fn singleton(class: u32) -> Self {
        Self {
            members: vec![class],
        }
    }

    /// Union another group into this one. Groups are disjoint, so this is
    /// a plain append.
    fn merge(&mut self, other: Group) {
        self.members.extend(other.members);
    }

    fn names(&self, matrix: &CouplingMatrix) -> Vec<ClassId> {
        self.members
            .iter()
            .map(|&idx| matrix.class(idx).clone())
            .collect()
    }
}

/// Average linkage between two sets of class indices.
///
/// Only member pairs with a recorded weight contribute. Pairs absent from
/// the matrix add nothing to the sum or the denominator. Returns 0 when no
/// member pair is recorded.
pub(crate) fn average_linkage(a: &[u32], b: &[u32], matrix: &CouplingMatrix) -> f64 {
    let mut total = 0.0;
    let mut count = 0usize;

    for &x in a {
        for &y in b {
            if let Some(weight) = matrix.weight_by_index(x, y) {
                total += weight;
                count += 1;
            }
        }
    }

    if count > 0 {
        total / count as f64
    } else {
        0.0
    }
}

/// Average coupling between two clusters of named classes.
///
/// Classes not present in the matrix are ignored.
pub fn average_coupling(a: &[ClassId], b: &[ClassId], matrix: &CouplingMatrix) -> f64 {
    let a: Vec<u32> = a.iter().filter_map(|c| matrix.index_of(c.as_str())).collect();
    let b: Vec<u32> = b.iter().filter_map(|c| matrix.index_of(c.as_str())).collect();
    average_linkage(&a, &b, matrix)
}

/// Find the pair of groups with the highest average coupling.
///
/// Scans `i = 0..k-1`, `j = i+1..k` and keeps the first strict improvement.
fn most_coupled_pair(groups: &[Group], matrix: &CouplingMatrix) -> Option<(usize, usize, f64)> {
    let mut best: Option<(usize, usize, f64)> = None;

    for i in 0..groups.len() {
        for j in (i + 1)..groups.len() {
            let coupling = average_linkage(&groups[i].members, &groups[j].members, matrix);
            if best.map_or(true, |(_, _, max)| coupling > max) {
                best = Some((i, j, coupling));
            }
        }
    }

    best
}

/// Agglomerative clusterer with a threshold phase and a module-cap phase
#[derive(Debug, Clone)]
pub struct HierarchicalClusterer {
    /// Phase 1 merges only while the best average coupling exceeds this
    threshold: f64,

    /// Central classes reported per resulting cluster
    central_class_count: usize,
}

impl HierarchicalClusterer {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            central_class_count: DEFAULT_CENTRAL_CLASS_COUNT,
        }
    }

    pub fn with_central_class_count(mut self, count: usize) -> Self {
        self.central_class_count = count;
        self
    }

    /// Partition the classes of `matrix` into clusters
    pub fn cluster(&self, matrix: &CouplingMatrix) -> Vec<Cluster> {
        self.run(matrix).clusters
    }

    /// Partition the classes of `matrix` and keep the merge history
    pub fn run(&self, matrix: &CouplingMatrix) -> ClusteringOutcome {
        let class_count = matrix.class_count();
        let max_modules = class_count / 2;

        log::info!(
            "Clustering {} classes (threshold {}, module cap {})",
            class_count,
            self.threshold,
            max_modules
        );

        // Each invocation owns its working collection
        let mut groups: Vec<Group> = (0..class_count as u32).map(Group::singleton).collect();
        let mut steps = Vec::new();

        // Phase 1: merge while the best pair clears the threshold
        while groups.len() > 1 {
            let Some((i, j, coupling)) = most_coupled_pair(&groups, matrix) else {
                break;
            };
            if coupling <= self.threshold {
                log::debug!(
                    "Best average coupling {:.4} does not exceed threshold {}",
                    coupling,
                    self.threshold
                );
                break;
            }
            let step = steps.len() + 1;
            steps.push(merge_groups(
                &mut groups,
                (i, j),
                coupling,
                MergePhase::Threshold,
                step,
                matrix,
            ));
        }

        log::info!(
            "Threshold phase finished with {} clusters after {} merges",
            groups.len(),
            steps.len()
        );

        // Phase 2: force merges down to the module cap
        if max_modules > 0 {
            while groups.len() > max_modules {
                let Some((i, j, coupling)) = most_coupled_pair(&groups, matrix) else {
                    break;
                };
                let step = steps.len() + 1;
                steps.push(merge_groups(
                    &mut groups,
                    (i, j),
                    coupling,
                    MergePhase::Cardinality,
                    step,
                    matrix,
                ));
            }
        }

        let forced = steps
            .iter()
            .filter(|s| s.phase == MergePhase::Cardinality)
            .count();
        log::info!(
            "Cardinality phase finished with {} clusters after {} forced merges",
            groups.len(),
            forced
        );

        let clusters = self.build_clusters(groups, matrix);

        ClusteringOutcome {
            clusters,
            steps,
            threshold: self.threshold,
            class_count,
            max_modules,
        }
    }

    /// Resolve working groups into named clusters with metrics
    fn build_clusters(&self, groups: Vec<Group>, matrix: &CouplingMatrix) -> Vec<Cluster> {
        groups
            .into_par_iter()
            .enumerate()
            .map(|(id, group)| {
                let cohesion = metrics::cohesion(&group.members, matrix);
                let central_classes =
                    metrics::central_classes(&group.members, matrix, self.central_class_count)
                        .into_iter()
                        .map(|idx| matrix.class(idx).clone())
                        .collect();
                Cluster {
                    id: id as u32,
                    size: group.members.len(),
                    members: group.names(matrix),
                    cohesion,
                    central_classes,
                }
            })
            .collect()
    }
}

/// Merge group `j` into group `i` (`i < j`) and record the step
fn merge_groups(
    groups: &mut Vec<Group>,
    (i, j): (usize, usize),
    coupling: f64,
    phase: MergePhase,
    step: usize,
    matrix: &CouplingMatrix,
) -> MergeStep {
    let absorbed = groups.remove(j);
    let record = MergeStep {
        step,
        phase,
        absorbed_into: groups[i].names(matrix),
        absorbed: absorbed.names(matrix),
        coupling,
    };

    log::debug!(
        "Step {}: merging [{}] and [{}] (coupling = {:.4}, {:?})",
        step,
        record.absorbed_into.iter().join(", "),
        record.absorbed.iter().join(", "),
        coupling,
        phase
    );

    groups[i].merge(absorbed);
    record
}

/// Cluster `matrix` with the given threshold and default settings
pub fn cluster(matrix: &CouplingMatrix, threshold: f64) -> Vec<Cluster> {
    HierarchicalClusterer::new(threshold).cluster(matrix)
}
