//! Nodemap Graph - Node relationship maps
//!
//! This crate turns a set of inventory nodes into a clustered, labeled,
//! edge-annotated graph and hands it to Graphviz for layout.
//!
//! # Pipeline
//!
//! 1. [`infer_links`] matches every node's client/needs roles against every
//!    other node's role set.
//! 2. [`GraphBuilder`] groups nodes into colored clusters by role prefix,
//!    gives each node a unique label and adds the inferred edges.
//! 3. [`render_node_map`] writes the result out as SVG through a
//!    [`LayoutEngine`].
//!
//! # Example
//!
//! ```no_run
//! use nodemap_core::{Node, RoleLinks, Settings};
//! use nodemap_graph::{render_node_map, Graphviz};
//!
//! let db = Node::new("db1", vec!["db_master".into()]);
//! let web = Node::new("web1", vec!["web_front".into()]).with_links(
//!     "web_front",
//!     RoleLinks {
//!         needs_roles: vec!["db_master".into()],
//!         ..Default::default()
//!     },
//! );
//!
//! let outcome = render_node_map(&[db, web], &[], false, &Settings::default(), &Graphviz::default());
//! let (ok, path_or_error) = outcome.into_parts();
//! ```

mod builder;
mod colors;
mod dot;
mod edge;
mod graph;
mod labels;
mod links;
mod render;

pub use builder::GraphBuilder;
pub use colors::assign_colors;
pub use dot::to_dot;
pub use edge::{Edge, EdgeKind, GraphEdge};
pub use graph::{Cluster, MapNode, NodeId, NodeMap};
pub use labels::{assign_labels, display_roles};
pub use links::{infer_links, Link, LinkMap, NodeLinks};
pub use render::{render_node_map, Graphviz, LayoutEngine, LayoutError, RenderOutcome};
