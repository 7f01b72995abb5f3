//! End-to-end analysis: filtered events to coupling matrix to modules

use crate::cluster::{ClusteringOutcome, HierarchicalClusterer, PartitionSummary};
use crate::config::Config;
use crate::coupling::{CouplingAggregator, CouplingMatrix, InvocationEvent};

/// Everything produced by one analysis run
#[derive(Debug, Clone)]
pub struct Analysis {
    pub matrix: CouplingMatrix,
    pub outcome: ClusteringOutcome,
    pub summary: PartitionSummary,

    /// Self-invocations dropped during aggregation
    pub self_invocations: u64,
}

/// Aggregate `events` and cluster the resulting classes.
///
/// Events are expected to be filtered to project classes already.
pub fn analyze(events: Vec<InvocationEvent>, config: &Config) -> Analysis {
    let mut aggregator = CouplingAggregator::new();
    aggregator.extend(events);
    let self_invocations = aggregator.self_invocations();
    let matrix = aggregator.build();

    log::info!(
        "Coupling matrix: {} classes, {} coupled pairs, {} invocations",
        matrix.class_count(),
        matrix.len(),
        matrix.total_invocations()
    );

    let outcome = HierarchicalClusterer::new(config.threshold)
        .with_central_class_count(config.central_class_count)
        .run(&matrix);
    let summary = PartitionSummary::from_clusters(&outcome.clusters, &matrix);

    Analysis {
        matrix,
        outcome,
        summary,
        self_invocations,
    }
}
