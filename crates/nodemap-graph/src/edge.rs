//! Edge types for the node map.
//!
//! Every edge comes from one inferred link and carries the name of the
//! attribute that declared it.

/// The type of relationship between two nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeKind {
    /// The source node is a client of the target.
    Serves,

    /// The source node needs the target.
    Depends,
}

/// An edge in the node map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    /// The kind of relationship.
    pub kind: EdgeKind,

    /// Attribute that declared the relationship, shown on the edge.
    pub label: String,
}

impl Edge {
    /// Creates a new edge.
    pub fn new(kind: EdgeKind, label: impl Into<String>) -> Self {
        Self {
            kind,
            label: label.into(),
        }
    }

    pub fn serves(label: impl Into<String>) -> Self {
        Self::new(EdgeKind::Serves, label)
    }

    pub fn depends(label: impl Into<String>) -> Self {
        Self::new(EdgeKind::Depends, label)
    }
}

/// An edge with its endpoints resolved to node names, for export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphEdge {
    pub source: String,
    pub target: String,
    pub kind: EdgeKind,
    pub label: String,
}
