//! Results persistence module

use crate::cluster::{ClusteringOutcome, MergePhase, PartitionSummary};
use crate::coupling::CouplingMatrix;
use crate::data::FilterStats;
use crate::error::AnalyzerResult;
use serde::Serialize;
use serde_json::{json, to_string_pretty};
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

/// Save analysis results to `output_dir`
pub fn save_results(
    matrix: &CouplingMatrix,
    outcome: &ClusteringOutcome,
    summary: &PartitionSummary,
    filter_stats: &FilterStats,
    top_pairs: usize,
    output_dir: &Path,
) -> AnalyzerResult<()> {
    log::info!(
        "Saving {} clusters to {}",
        outcome.clusters.len(),
        output_dir.display()
    );

    // Ensure output directory exists
    fs::create_dir_all(output_dir)?;

    save_summary(matrix, outcome, summary, filter_stats, top_pairs, output_dir)?;
    save_matrix(matrix, output_dir)?;
    write_json(&output_dir.join("clusters.json"), &json!({ "clusters": outcome.clusters }))?;
    write_json(&output_dir.join("merge_steps.json"), &json!({ "steps": outcome.steps }))?;

    log::info!("Results saved successfully");

    Ok(())
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> AnalyzerResult<()> {
    let mut file = File::create(path)?;
    file.write_all(to_string_pretty(value)?.as_bytes())?;
    Ok(())
}

/// Save summary information
fn save_summary(
    matrix: &CouplingMatrix,
    outcome: &ClusteringOutcome,
    summary: &PartitionSummary,
    filter_stats: &FilterStats,
    top_pairs: usize,
    output_dir: &Path,
) -> AnalyzerResult<()> {
    log::info!("Saving summary information");

    let summary = json!({
        "filtering": filter_stats,
        "coupling_stats": {
            "class_count": matrix.class_count(),
            "coupled_pair_count": matrix.len(),
            "total_invocations": matrix.total_invocations(),
            "strongest_pairs": matrix.strongest_pairs(top_pairs),
        },
        "clustering": {
            "threshold": outcome.threshold,
            "max_modules": outcome.max_modules,
            "threshold_merges": outcome.merges_in(MergePhase::Threshold),
            "forced_merges": outcome.merges_in(MergePhase::Cardinality),
        },
        "cluster_stats": summary,
    });

    write_json(&output_dir.join("summary.json"), &summary)
}

/// Save the full coupling matrix as a pair list
fn save_matrix(matrix: &CouplingMatrix, output_dir: &Path) -> AnalyzerResult<()> {
    log::info!("Saving coupling matrix with {} pairs", matrix.len());

    let matrix_json = json!({
        "total_invocations": matrix.total_invocations(),
        "classes": matrix.classes(),
        "pairs": matrix.pairs(),
    });

    write_json(&output_dir.join("coupling_matrix.json"), &matrix_json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::HierarchicalClusterer;
    use crate::coupling::{aggregate, InvocationEvent};
    use tempfile::TempDir;

    #[test]
    fn test_writes_all_result_files() {
        let matrix = aggregate(vec![
            InvocationEvent::new("A", "B"),
            InvocationEvent::new("A", "B"),
            InvocationEvent::new("C", "D"),
        ]);
        let outcome = HierarchicalClusterer::new(0.4).run(&matrix);
        let summary = PartitionSummary::from_clusters(&outcome.clusters, &matrix);

        let dir = TempDir::new().unwrap();
        let out = dir.path().join("results");
        let filter_stats = FilterStats {
            kept: 3,
            excluded: 2,
            ..FilterStats::default()
        };
        save_results(&matrix, &outcome, &summary, &filter_stats, 3, &out).unwrap();

        for name in ["summary.json", "coupling_matrix.json", "clusters.json", "merge_steps.json"] {
            assert!(out.join(name).exists(), "{name} missing");
        }

        let matrix_json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(out.join("coupling_matrix.json")).unwrap())
                .unwrap();
        assert_eq!(matrix_json["total_invocations"], 3);
        assert_eq!(matrix_json["pairs"].as_array().unwrap().len(), 2);
        assert_eq!(matrix_json["pairs"][0]["pair"]["first"], "A");

        let summary_json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(out.join("summary.json")).unwrap()).unwrap();
        assert_eq!(summary_json["filtering"]["kept"], 3);
        assert_eq!(summary_json["filtering"]["excluded"], 2);
        assert_eq!(summary_json["filtering"]["unknown"], 0);

        let steps: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(out.join("merge_steps.json")).unwrap())
                .unwrap();
        assert_eq!(steps["steps"][0]["phase"], "threshold");
    }
}
