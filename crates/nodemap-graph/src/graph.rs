//! Core node map structure.
//!
//! The NodeMap wraps petgraph and adds the cluster layout and a name index.
//! It lives only for the length of one render.

use crate::edge::{Edge, GraphEdge};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use std::collections::HashMap;

/// Unique identifier for a node in the map.
pub type NodeId = NodeIndex;

/// A drawn node.
#[derive(Debug, Clone, PartialEq)]
pub struct MapNode {
    /// Inventory name of the node.
    pub name: String,

    /// Text shown in the box.
    pub label: String,

    /// Fill color.
    pub fill: String,

    /// Role group the node is drawn in, if any.
    pub cluster: Option<String>,
}

/// A colored group of nodes sharing a role prefix.
#[derive(Debug, Clone, PartialEq)]
pub struct Cluster {
    pub name: String,
    pub color: String,
    members: Vec<NodeId>,
}

impl Cluster {
    pub fn new(name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: color.into(),
            members: Vec::new(),
        }
    }

    /// Nodes placed in this cluster, in insertion order.
    pub fn members(&self) -> &[NodeId] {
        &self.members
    }
}

/// The node relationship map.
#[derive(Debug, Default)]
pub struct NodeMap {
    graph: DiGraph<MapNode, Edge>,

    /// Clusters in creation order.
    clusters: Vec<Cluster>,

    /// Maps cluster names to positions in `clusters`.
    cluster_index: HashMap<String, usize>,

    /// Maps inventory names to node IDs.
    name_index: HashMap<String, NodeId>,
}

impl NodeMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a cluster. A cluster with the same name replaces the color of
    /// the existing one.
    pub fn add_cluster(&mut self, cluster: Cluster) {
        match self.cluster_index.get(&cluster.name) {
            Some(&pos) => self.clusters[pos].color = cluster.color,
            None => {
                self.cluster_index
                    .insert(cluster.name.clone(), self.clusters.len());
                self.clusters.push(cluster);
            }
        }
    }

    /// Adds a node, placing it in its cluster when that cluster exists.
    ///
    /// A node naming an unknown cluster is kept at the top level.
    pub fn add_node(&mut self, mut node: MapNode) -> NodeId {
        let pos = node
            .cluster
            .as_ref()
            .and_then(|name| self.cluster_index.get(name).copied());
        if pos.is_none() {
            node.cluster = None;
        }

        let name = node.name.clone();
        let index = self.graph.add_node(node);
        if let Some(pos) = pos {
            self.clusters[pos].members.push(index);
        }
        self.name_index.insert(name, index);
        index
    }

    /// Adds an edge between two nodes.
    pub fn add_edge(&mut self, from: NodeId, to: NodeId, edge: Edge) {
        self.graph.add_edge(from, to, edge);
    }

    /// Adds an edge between two nodes given by name.
    ///
    /// Returns false if either name is unknown.
    pub fn connect(&mut self, from: &str, to: &str, edge: Edge) -> bool {
        match (self.get_index(from), self.get_index(to)) {
            (Some(from), Some(to)) => {
                self.add_edge(from, to, edge);
                true
            }
            _ => false,
        }
    }

    /// Gets a node by its graph index.
    pub fn get(&self, index: NodeId) -> Option<&MapNode> {
        self.graph.node_weight(index)
    }

    /// Gets a node by inventory name.
    pub fn get_by_name(&self, name: &str) -> Option<&MapNode> {
        self.get(self.get_index(name)?)
    }

    /// Gets the node index for an inventory name.
    pub fn get_index(&self, name: &str) -> Option<NodeId> {
        self.name_index.get(name).copied()
    }

    /// Gets a cluster by name.
    pub fn cluster(&self, name: &str) -> Option<&Cluster> {
        self.cluster_index.get(name).map(|&pos| &self.clusters[pos])
    }

    /// All clusters in creation order.
    pub fn clusters(&self) -> &[Cluster] {
        &self.clusters
    }

    /// Nodes drawn outside any cluster, in insertion order.
    pub fn top_level(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.graph
            .node_indices()
            .filter(|&idx| self.graph[idx].cluster.is_none())
    }

    /// Returns the number of nodes.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Returns the number of edges.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Iterates over all nodes.
    pub fn nodes(&self) -> impl Iterator<Item = &MapNode> {
        self.graph.node_weights()
    }

    /// Iterates over edges as `(from, to, edge)`, in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = (NodeId, NodeId, &Edge)> {
        self.graph
            .edge_references()
            .map(|edge_ref| (edge_ref.source(), edge_ref.target(), edge_ref.weight()))
    }

    /// Returns all edges with node names for export.
    pub fn export_edges(&self) -> Vec<GraphEdge> {
        self.edges()
            .filter_map(|(from, to, edge)| {
                Some(GraphEdge {
                    source: self.get(from)?.name.clone(),
                    target: self.get(to)?.name.clone(),
                    kind: edge.kind,
                    label: edge.label.clone(),
                })
            })
            .collect()
    }
}
