//! Cluster statistics and metrics

use crate::cluster::hierarchical::average_linkage;
use crate::cluster::Cluster;
use crate::coupling::CouplingMatrix;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Average coupling over member pairs with a recorded weight.
///
/// Singletons and clusters without any recorded internal pair score 0.
pub fn cohesion(members: &[u32], matrix: &CouplingMatrix) -> f64 {
    let n = members.len();
    if n <= 1 {
        return 0.0;
    }

    let mut total = 0.0;
    let mut count = 0usize;

    for i in 0..n {
        for j in (i + 1)..n {
            if let Some(weight) = matrix.weight_by_index(members[i], members[j]) {
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

/// Top `n` members by summed coupling to the rest of the cluster.
///
/// Ties keep member order.
pub fn central_classes(members: &[u32], matrix: &CouplingMatrix, n: usize) -> Vec<u32> {
    let mut strengths: Vec<(u32, f64)> = members
        .iter()
        .map(|&member| {
            let strength: f64 = members
                .iter()
                .filter_map(|&other| matrix.weight_by_index(member, other))
                .sum();
            (member, strength)
        })
        .collect();

    // Sort by strength (highest first)
    strengths.sort_by(|a, b| b.1.total_cmp(&a.1));

    strengths.into_iter().take(n).map(|(member, _)| member).collect()
}

/// Resolve a named cluster back to matrix indices
fn member_indices(cluster: &Cluster, matrix: &CouplingMatrix) -> Vec<u32> {
    cluster
        .members
        .iter()
        .filter_map(|m| matrix.index_of(m.as_str()))
        .collect()
}

/// Summary statistics for a final partition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartitionSummary {
    pub cluster_count: usize,
    pub class_count: usize,
    pub singleton_count: usize,
    pub largest_cluster_size: usize,
    pub smallest_cluster_size: usize,
    pub avg_cluster_size: f64,
    pub avg_cohesion: f64,

    /// Share of the total coupling weight that falls inside clusters
    pub intra_cluster_weight: f64,

    /// Mean average coupling between distinct clusters that share at least
    /// one recorded pair
    pub avg_inter_cluster_coupling: f64,
}

impl PartitionSummary {
    pub fn from_clusters(clusters: &[Cluster], matrix: &CouplingMatrix) -> Self {
        let cluster_count = clusters.len();
        let class_count: usize = clusters.iter().map(|c| c.size).sum();
        let divisor = if clusters.is_empty() {
            1.0
        } else {
            cluster_count as f64
        };

        let indices: Vec<Vec<u32>> = clusters
            .par_iter()
            .map(|c| member_indices(c, matrix))
            .collect();

        // Weight of every recorded pair whose classes share a cluster
        let intra: f64 = indices
            .par_iter()
            .map(|members| {
                let mut sum = 0.0;
                for (i, &a) in members.iter().enumerate() {
                    for &b in &members[i + 1..] {
                        if let Some(weight) = matrix.weight_by_index(a, b) {
                            sum += weight;
                        }
                    }
                }
                sum
            })
            .sum();
        let total_weight: f64 = matrix.pairs().iter().map(|p| p.weight).sum();

        let groups = &indices;
        let inter: Vec<f64> = (0..groups.len())
            .into_par_iter()
            .flat_map_iter(move |i| {
                ((i + 1)..groups.len())
                    .map(move |j| average_linkage(&groups[i], &groups[j], matrix))
            })
            .filter(|&avg| avg > 0.0)
            .collect();

        Self {
            cluster_count,
            class_count,
            singleton_count: clusters.iter().filter(|c| c.is_singleton()).count(),
            largest_cluster_size: clusters.iter().map(|c| c.size).max().unwrap_or(0),
            smallest_cluster_size: clusters.iter().map(|c| c.size).min().unwrap_or(0),
            avg_cluster_size: class_count as f64 / divisor,
            avg_cohesion: clusters.iter().map(|c| c.cohesion).sum::<f64>() / divisor,
            intra_cluster_weight: if total_weight > 0.0 {
                intra / total_weight
            } else {
                0.0
            },
            avg_inter_cluster_coupling: if inter.is_empty() {
                0.0
            } else {
                inter.iter().sum::<f64>() / inter.len() as f64
            },
        }
    }
}
