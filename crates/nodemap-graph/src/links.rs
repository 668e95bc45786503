//! Relationship inference between nodes.
//!
//! A node declares, per attribute, the roles it serves (`client_roles`) and
//! the roles it needs (`needs_roles`). Any node whose role set shares at
//! least one role with those lists is linked to it.

use nodemap_core::Node;
use serde::Serialize;
use std::collections::BTreeMap;

/// One inferred relationship: the other node and the attribute that
/// declared it.
///
/// Serialized as a `[node, attribute]` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(into = "(String, String)")]
pub struct Link {
    pub node: String,
    pub attribute: String,
}

impl Link {
    pub fn new(node: impl Into<String>, attribute: impl Into<String>) -> Self {
        Self {
            node: node.into(),
            attribute: attribute.into(),
        }
    }
}

impl From<Link> for (String, String) {
    fn from(link: Link) -> Self {
        (link.node, link.attribute)
    }
}

/// Links found for a single node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NodeLinks {
    /// Nodes consuming a role this node serves.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub client_nodes: Vec<Link>,

    /// Nodes this node depends on.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub needs_nodes: Vec<Link>,
}

impl NodeLinks {
    pub fn is_empty(&self) -> bool {
        self.client_nodes.is_empty() && self.needs_nodes.is_empty()
    }
}

/// Links keyed by node name. Nodes without links have no entry.
pub type LinkMap = BTreeMap<String, NodeLinks>;

/// Finds every client and needs relationship in the collection.
///
/// Every node is tested against every other node, itself included, so a
/// node that serves or needs one of its own roles gets a self link.
pub fn infer_links(nodes: &[Node]) -> LinkMap {
    let mut linked = LinkMap::new();

    for node in nodes {
        let mut links = NodeLinks::default();

        for (attribute, record) in &node.attributes {
            for other in nodes {
                if shares_role(&record.client_roles, other) {
                    links
                        .client_nodes
                        .push(Link::new(other.name.clone(), attribute.clone()));
                }
            }
            for other in nodes {
                if shares_role(&record.needs_roles, other) {
                    links
                        .needs_nodes
                        .push(Link::new(other.name.clone(), attribute.clone()));
                }
            }
        }

        if !links.is_empty() {
            linked.insert(node.name.clone(), links);
        }
    }

    linked
}

fn shares_role(wanted: &[String], node: &Node) -> bool {
    wanted.iter().any(|role| node.roles.contains(role))
}
