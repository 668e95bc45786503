//! Roles and role groups.

use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::BTreeSet;

/// A role definition from the inventory.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Role {
    pub name: String,

    #[serde(default)]
    pub description: Option<String>,

    /// Everything else in the role file, kept as-is.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Role {
    /// Creates a role with just a name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            extra: Map::new(),
        }
    }

    /// The group this role belongs to.
    pub fn group(&self) -> &str {
        role_prefix(&self.name)
    }
}

/// Returns the text before the first underscore of a role name.
///
/// A name without underscores is its own prefix.
pub fn role_prefix(role: &str) -> &str {
    role.split('_').next().unwrap_or(role)
}

/// Returns the distinct role groups, sorted, without the excluded prefix.
pub fn role_groups(roles: &[Role], exclude_prefix: &str) -> Vec<String> {
    roles
        .iter()
        .map(Role::group)
        .filter(|group| *group != exclude_prefix)
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
