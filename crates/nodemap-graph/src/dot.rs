//! Graphviz DOT output.

use crate::edge::EdgeKind;
use crate::graph::{MapNode, NodeId, NodeMap};
use nodemap_core::GraphStyle;
use std::fmt::Write;

/// Renders the map as a DOT digraph.
///
/// Nodes are identified as `n<index>` and carry their label as an
/// attribute, so labels never have to double as identifiers.
pub fn to_dot(map: &NodeMap, style: &GraphStyle) -> String {
    let mut out = String::new();
    out.push_str("digraph node_map {\n");

    for cluster in map.clusters() {
        let _ = writeln!(
            out,
            "  subgraph \"cluster_{}\" {{",
            escape_dot(&cluster.name)
        );
        let _ = writeln!(
            out,
            "    label=\"{}\";\n    color=\"{}\";\n    fontsize={};",
            escape_dot(&cluster.name),
            escape_dot(&cluster.color),
            style.cluster_fontsize
        );
        for &idx in cluster.members() {
            if let Some(node) = map.get(idx) {
                write_node(&mut out, "    ", idx, node, style);
            }
        }
        out.push_str("  }\n");
    }

    for idx in map.top_level() {
        if let Some(node) = map.get(idx) {
            write_node(&mut out, "  ", idx, node, style);
        }
    }

    for (from, to, edge) in map.edges() {
        let (fontsize, line) = match edge.kind {
            EdgeKind::Serves => (style.serves_fontsize, String::new()),
            EdgeKind::Depends => (
                style.depends_fontsize,
                format!(", style=\"{}\"", escape_dot(&style.depends_style)),
            ),
        };
        let _ = writeln!(
            out,
            "  n{} -> n{} [label=\"{}\", fontsize={}, arrowsize={}{}];",
            from.index(),
            to.index(),
            escape_dot(&edge.label),
            fontsize,
            style.arrow_size,
            line
        );
    }

    out.push_str("}\n");
    out
}

fn write_node(out: &mut String, indent: &str, idx: NodeId, node: &MapNode, style: &GraphStyle) {
    let _ = writeln!(
        out,
        "{}n{} [label=\"{}\", shape=\"{}\", style=\"filled\", fillcolor=\"{}\", fontsize={}];",
        indent,
        idx.index(),
        escape_dot(&node.label),
        escape_dot(&style.node_shape),
        escape_dot(&node.fill),
        style.node_fontsize
    );
}

/// Escape a string for a quoted DOT attribute.
fn escape_dot(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edge::Edge;
    use crate::graph::Cluster;

    fn map_node(name: &str, label: &str, cluster: Option<&str>) -> MapNode {
        MapNode {
            name: name.to_string(),
            label: label.to_string(),
            fill: "lightyellow".to_string(),
            cluster: cluster.map(str::to_string),
        }
    }

    #[test]
    fn test_empty_map() {
        let dot = to_dot(&NodeMap::new(), &GraphStyle::default());
        assert_eq!(dot, "digraph node_map {\n}\n");
    }

    #[test]
    fn test_clusters_nodes_and_edges() {
        let mut map = NodeMap::new();
        map.add_cluster(Cluster::new("db", "#FCD975"));
        map.add_node(map_node("db1", "db_master", Some("db")));
        map.add_node(map_node("web1", "web_front\nmonitoring", None));
        map.connect("web1", "db1", Edge::depends("web_front"));
        map.connect("web1", "db1", Edge::serves("backup"));

        let dot = to_dot(&map, &GraphStyle::default());

        assert!(dot.contains("subgraph \"cluster_db\" {"));
        assert!(dot.contains("color=\"#FCD975\";"));
        assert!(dot.contains("fontsize=12;"));
        assert!(dot.contains(
            "    n0 [label=\"db_master\", shape=\"box\", style=\"filled\", fillcolor=\"lightyellow\", fontsize=9];"
        ));
        assert!(dot.contains("  n1 [label=\"web_front\\nmonitoring\""));
        assert!(dot.contains(
            "n1 -> n0 [label=\"web_front\", fontsize=7, arrowsize=0.6, style=\"dashed\"];"
        ));
        assert!(dot.contains("n1 -> n0 [label=\"backup\", fontsize=8, arrowsize=0.6];"));
    }

    #[test]
    fn test_escapes_quotes() {
        assert_eq!(escape_dot("say \"hi\"\\"), "say \\\"hi\\\"\\\\");
    }
}
