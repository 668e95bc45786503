//! Nodemap Core - Inventory model and settings
//!
//! This crate holds the data the rest of nodemap works with: the nodes of a
//! configuration-management inventory, the roles they carry, and the
//! settings that decide how a node map is drawn.
//!
//! # Example
//!
//! ```
//! use nodemap_core::Node;
//! use serde_json::json;
//!
//! let node = Node::from_value(&json!({
//!     "name": "web1",
//!     "role": ["web_front"],
//!     "web_front": { "needs_roles": ["db_master"] }
//! }))
//! .unwrap();
//!
//! assert!(node.roles.contains("web_front"));
//! assert_eq!(node.links("web_front").needs_roles, vec!["db_master"]);
//! ```

mod error;
mod inventory;
mod node;
mod role;
mod settings;

pub use error::{InventoryError, Result, SettingsError};
pub use inventory::Inventory;
pub use node::{Node, RoleLinks};
pub use role::{role_groups, role_prefix, Role};
pub use settings::{GraphStyle, RepoSettings, ServerSettings, Settings};
