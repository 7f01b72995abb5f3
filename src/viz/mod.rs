//! Export of the coupling graph for external viewers

use crate::cluster::Cluster;
use crate::coupling::CouplingMatrix;
use crate::error::AnalyzerResult;
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

/// Write graph exports for the final partition into `output_dir/graph`
pub fn export_graph(
    matrix: &CouplingMatrix,
    clusters: &[Cluster],
    output_dir: &Path,
) -> AnalyzerResult<()> {
    log::info!("Exporting coupling graph for {} clusters", clusters.len());

    let graph_dir = output_dir.join("graph");
    fs::create_dir_all(&graph_dir)?;

    let assignments: HashMap<&str, u32> = clusters
        .iter()
        .flat_map(|c| c.members.iter().map(move |m| (m.as_str(), c.id)))
        .collect();

    write_graphml(matrix, &assignments, &graph_dir.join("coupling_graph.graphml"))?;
    write_assignments(clusters, &graph_dir.join("class_assignments.csv"))?;

    log::info!("Graph exports written to {}", graph_dir.display());

    Ok(())
}

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Undirected GraphML: one node per class, one edge per coupled pair
fn write_graphml(
    matrix: &CouplingMatrix,
    assignments: &HashMap<&str, u32>,
    path: &Path,
) -> AnalyzerResult<()> {
    let mut file = BufWriter::new(File::create(path)?);

    writeln!(file, "<?xml version=\"1.0\" encoding=\"UTF-8\"?>")?;
    writeln!(file, "<graphml xmlns=\"http://graphml.graphdrawing.org/xmlns\">")?;
    writeln!(file, "  <key id=\"label\" for=\"node\" attr.name=\"label\" attr.type=\"string\"/>")?;
    writeln!(file, "  <key id=\"cluster\" for=\"node\" attr.name=\"cluster\" attr.type=\"int\"/>")?;
    writeln!(file, "  <key id=\"weight\" for=\"edge\" attr.name=\"weight\" attr.type=\"double\"/>")?;
    writeln!(file, "  <key id=\"elabel\" for=\"edge\" attr.name=\"label\" attr.type=\"string\"/>")?;
    writeln!(file, "  <graph id=\"G\" edgedefault=\"undirected\">")?;

    for (idx, class) in matrix.classes().iter().enumerate() {
        writeln!(file, "    <node id=\"n{}\">", idx)?;
        writeln!(file, "      <data key=\"label\">{}</data>", escape_xml(class.as_str()))?;
        if let Some(cluster_id) = assignments.get(class.as_str()) {
            writeln!(file, "      <data key=\"cluster\">{}</data>", cluster_id)?;
        }
        writeln!(file, "    </node>")?;
    }

    for (edge_id, pair) in matrix.pairs().iter().enumerate() {
        let (Some(src), Some(dst)) = (
            matrix.index_of(pair.pair.first().as_str()),
            matrix.index_of(pair.pair.second().as_str()),
        ) else {
            continue;
        };
        writeln!(
            file,
            "    <edge id=\"e{}\" source=\"n{}\" target=\"n{}\">",
            edge_id, src, dst
        )?;
        writeln!(file, "      <data key=\"weight\">{}</data>", pair.weight)?;
        writeln!(file, "      <data key=\"elabel\">{:.2}</data>", pair.weight)?;
        writeln!(file, "    </edge>")?;
    }

    writeln!(file, "  </graph>")?;
    writeln!(file, "</graphml>")?;
    file.flush()?;

    Ok(())
}

/// CSV of `class,cluster_id` rows
fn write_assignments(clusters: &[Cluster], path: &Path) -> AnalyzerResult<()> {
    let mut file = BufWriter::new(File::create(path)?);

    writeln!(file, "class,cluster_id")?;
    for cluster in clusters {
        for member in &cluster.members {
            writeln!(file, "{},{}", member, cluster.id)?;
        }
    }
    file.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::cluster;
    use crate::coupling::{aggregate, InvocationEvent};
    use tempfile::TempDir;

    #[test]
    fn test_exports_graphml_and_assignments() {
        let matrix = aggregate(vec![
            InvocationEvent::new("A", "B"),
            InvocationEvent::new("A", "B"),
            InvocationEvent::new("C", "D"),
        ]);
        let clusters = cluster(&matrix, 0.4);

        let dir = TempDir::new().unwrap();
        export_graph(&matrix, &clusters, dir.path()).unwrap();

        let graphml = fs::read_to_string(dir.path().join("graph/coupling_graph.graphml")).unwrap();
        assert_eq!(graphml.matches("<node ").count(), 4);
        assert_eq!(graphml.matches("<edge ").count(), 2);
        assert!(graphml.contains("<data key=\"elabel\">0.67</data>"));

        let csv = fs::read_to_string(dir.path().join("graph/class_assignments.csv")).unwrap();
        let rows: Vec<&str> = csv.lines().collect();
        assert_eq!(rows[0], "class,cluster_id");
        assert_eq!(rows.len(), 5);
    }

    #[test]
    fn test_escapes_class_names() {
        assert_eq!(escape_xml("Box<T>&"), "Box&lt;T&gt;&amp;");
    }
}
