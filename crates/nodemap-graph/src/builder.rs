//! Graph builder for constructing the node map from inventory nodes.
//!
//! The builder works in two passes:
//! 1. Add clusters and nodes, with colors and labels resolved up front
//! 2. Infer links and turn them into edges

use crate::colors::assign_colors;
use crate::edge::Edge;
use crate::graph::{Cluster, MapNode, NodeMap};
use crate::labels::assign_labels;
use crate::links::{infer_links, LinkMap};
use nodemap_core::{role_groups, role_prefix, Node, Role, Settings};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Builds a NodeMap from inventory nodes and roles.
pub struct GraphBuilder<'a> {
    settings: &'a Settings,
    show_hostnames: bool,
}

impl<'a> GraphBuilder<'a> {
    /// Creates a builder. Hostnames are hidden unless enabled.
    pub fn new(settings: &'a Settings) -> Self {
        Self {
            settings,
            show_hostnames: false,
        }
    }

    /// Shows each node's name above its roles.
    pub fn show_hostnames(mut self, show: bool) -> Self {
        self.show_hostnames = show;
        self
    }

    /// Builds the map. Links are inferred from `nodes`.
    pub fn build(&self, nodes: &[Node], roles: &[Role]) -> NodeMap {
        self.build_with_links(nodes, roles, &infer_links(nodes))
    }

    /// Builds the map from links inferred beforehand.
    pub fn build_with_links(&self, nodes: &[Node], roles: &[Role], links: &LinkMap) -> NodeMap {
        let exclude = self.settings.exclude_role_prefix.as_str();
        let mut map = NodeMap::new();

        let groups = role_groups(roles, exclude);
        let colors = assign_colors(&groups, &self.settings.colors);
        for group in &groups {
            if let Some(color) = colors.get(group) {
                map.add_cluster(Cluster::new(group.clone(), color.clone()));
            }
        }

        let labels = assign_labels(nodes, exclude, self.show_hostnames);
        for (node, label) in nodes.iter().zip(labels) {
            let cluster = resolve_group(&node.role, exclude, &colors);
            let fill = cluster
                .and_then(|group| colors.get(group))
                .cloned()
                .unwrap_or_else(|| self.settings.default_fill.clone());

            map.add_node(MapNode {
                name: node.name.clone(),
                label,
                fill,
                cluster: cluster.map(str::to_string),
            });
        }

        for (name, node_links) in links {
            for client in &node_links.client_nodes {
                if !map.connect(&client.node, name, Edge::serves(client.attribute.clone())) {
                    warn!("Dropping link {} -> {}: unknown node", client.node, name);
                }
            }
            for needed in &node_links.needs_nodes {
                if !map.connect(name, &needed.node, Edge::depends(needed.attribute.clone())) {
                    warn!("Dropping link {} -> {}: unknown node", name, needed.node);
                }
            }
        }

        debug!(
            "Built node map: {} clusters, {} nodes, {} edges",
            map.clusters().len(),
            map.node_count(),
            map.edge_count()
        );

        map
    }
}

/// Picks the role group a node is drawn in.
///
/// The primary role decides, unless it has the excluded prefix, in which
/// case the second role decides. No group is returned when that role is
/// excluded too, when the role is missing, or when the group has no color.
fn resolve_group<'r>(
    role: &'r [String],
    exclude_prefix: &str,
    colors: &BTreeMap<String, String>,
) -> Option<&'r str> {
    let mut prefix = role_prefix(role.first()?);
    if prefix == exclude_prefix {
        prefix = role_prefix(role.get(1)?);
        if prefix == exclude_prefix {
            return None;
        }
    }
    colors.contains_key(prefix).then_some(prefix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edge::EdgeKind;
    use nodemap_core::RoleLinks;
    use std::collections::HashSet;

    fn settings() -> Settings {
        Settings {
            colors: vec!["red".into(), "green".into()],
            ..Settings::default()
        }
    }

    fn node(name: &str, roles: &[&str]) -> Node {
        Node::new(name, roles.iter().map(|r| r.to_string()).collect())
    }

    fn roles(names: &[&str]) -> Vec<Role> {
        names.iter().map(|n| Role::new(*n)).collect()
    }

    #[test]
    fn test_builder_database_scenario() {
        let nodes = vec![
            node("db1", &["db_master"]),
            node("web1", &["web_front"]).with_links(
                "web_front",
                RoleLinks {
                    needs_roles: vec!["db_master".into()],
                    ..Default::default()
                },
            ),
        ];
        let settings = settings();

        let map = GraphBuilder::new(&settings).build(&nodes, &roles(&["db_master", "web_front"]));

        assert_eq!(map.node_count(), 2);
        let edges = map.export_edges();
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].source, "web1");
        assert_eq!(edges[0].target, "db1");
        assert_eq!(edges[0].kind, EdgeKind::Depends);
        assert_eq!(edges[0].label, "web_front");
    }

    #[test]
    fn test_client_edges_point_at_the_server() {
        let nodes = vec![
            node("lb1", &["lb_haproxy"]),
            node("web1", &["web_front"]).with_links(
                "haproxy",
                RoleLinks {
                    client_roles: vec!["lb_haproxy".into()],
                    ..Default::default()
                },
            ),
        ];
        let settings = settings();

        let map = GraphBuilder::new(&settings).build(&nodes, &[]);

        let edges = map.export_edges();
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].source, "lb1");
        assert_eq!(edges[0].target, "web1");
        assert_eq!(edges[0].kind, EdgeKind::Serves);
    }

    #[test]
    fn test_clusters_and_colors() {
        let nodes = vec![
            node("app1", &["app_worker"]),
            node("db1", &["env_prod", "db_master"]),
            node("x1", &["env_prod", "env_eu"]),
            node("x2", &["env_prod"]),
            node("x3", &[]),
            node("mon1", &["monitoring"]),
        ];
        let settings = settings();

        let map = GraphBuilder::new(&settings).build(
            &nodes,
            &roles(&["app_worker", "db_master", "env_prod", "web_front"]),
        );

        let names: Vec<_> = map.clusters().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["app", "db", "web"]);
        assert_eq!(map.cluster("app").unwrap().color, "red");
        assert_eq!(map.cluster("db").unwrap().color, "green");
        assert_eq!(map.cluster("web").unwrap().color, "red");

        let db = map.get_by_name("db1").unwrap();
        assert_eq!(db.cluster.as_deref(), Some("db"));
        assert_eq!(db.fill, "green");
        assert_eq!(db.label, "db_master");

        for name in ["x1", "x2", "x3", "mon1"] {
            let node = map.get_by_name(name).unwrap();
            assert_eq!(node.cluster, None, "{name} should be unclustered");
            assert_eq!(node.fill, "lightyellow");
        }
        assert_eq!(map.top_level().count(), 4);
        assert!(map.cluster("web").unwrap().members().is_empty());
    }

    #[test]
    fn test_labels_unique_across_map() {
        let nodes = vec![
            node("web1", &["web_front"]),
            node("web2", &["web_front"]),
            node("x1", &["env_prod"]),
            node("x2", &[]),
        ];
        let settings = settings();

        let map = GraphBuilder::new(&settings).build(&nodes, &roles(&["web_front"]));

        assert_eq!(map.get_by_name("web1").unwrap().label, "web_front (1)");
        assert_eq!(map.get_by_name("web2").unwrap().label, "web_front (2)");
        assert_eq!(map.get_by_name("x2").unwrap().label, "norole (2)");
        let labels: HashSet<_> = map.nodes().map(|n| n.label.clone()).collect();
        assert_eq!(labels.len(), 4);
    }

    #[test]
    fn test_hostnames() {
        let nodes = vec![node("web1", &["env_prod", "web_front"])];
        let settings = settings();

        let map = GraphBuilder::new(&settings)
            .show_hostnames(true)
            .build(&nodes, &roles(&["web_front"]));

        assert_eq!(map.get_by_name("web1").unwrap().label, "web1\nweb_front");
    }

    #[test]
    fn test_empty_input() {
        let settings = settings();
        let map = GraphBuilder::new(&settings).build(&[], &[]);

        assert_eq!(map.node_count(), 0);
        assert_eq!(map.edge_count(), 0);
        assert!(map.clusters().is_empty());
    }

    #[test]
    fn test_resolve_group() {
        let colors: BTreeMap<String, String> =
            [("db".to_string(), "red".to_string())].into_iter().collect();
        let role = |names: &[&str]| names.iter().map(|n| n.to_string()).collect::<Vec<_>>();

        assert_eq!(resolve_group(&role(&["db_master"]), "env", &colors), Some("db"));
        assert_eq!(resolve_group(&role(&["env_x", "db_slave"]), "env", &colors), Some("db"));
        assert_eq!(resolve_group(&role(&["env_x", "env_y", "db_slave"]), "env", &colors), None);
        assert_eq!(resolve_group(&role(&["env_x"]), "env", &colors), None);
        assert_eq!(resolve_group(&role(&["cache_redis"]), "env", &colors), None);
        assert_eq!(resolve_group(&[], "env", &colors), None);
    }
}
