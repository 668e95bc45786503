//! Inventory nodes.
//!
//! Node records arrive as loose JSON. Everything the graph code needs is
//! pulled out here into typed fields, so nothing downstream has to look
//! up arbitrary keys.

use crate::error::{InventoryError, Result};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet};

/// Relationship record attached to one attribute of a node.
///
/// An attribute without a record is the same as `RoleLinks::default()`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleLinks {
    /// Roles this node serves.
    pub client_roles: Vec<String>,

    /// Roles this node depends on.
    pub needs_roles: Vec<String>,
}

impl RoleLinks {
    /// Returns true when neither list has any role.
    pub fn is_empty(&self) -> bool {
        self.client_roles.is_empty() && self.needs_roles.is_empty()
    }

    fn from_object(object: &Map<String, Value>) -> Self {
        Self {
            client_roles: string_list(object.get("client_roles")),
            needs_roles: string_list(object.get("needs_roles")),
        }
    }
}

/// A machine in the inventory.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// Unique node name (usually the host name).
    pub name: String,

    /// Ordered role list. The first entry is the primary role.
    pub role: Vec<String>,

    /// Role set used for relationship matching.
    pub roles: BTreeSet<String>,

    /// Relationship records keyed by attribute name.
    pub attributes: BTreeMap<String, RoleLinks>,
}

impl Node {
    /// Creates a node whose role set is derived from its role list.
    pub fn new(name: impl Into<String>, role: Vec<String>) -> Self {
        let roles = role.iter().cloned().collect();
        Self {
            name: name.into(),
            role,
            roles,
            attributes: BTreeMap::new(),
        }
    }

    /// Attaches a relationship record to an attribute.
    pub fn with_links(mut self, attribute: impl Into<String>, links: RoleLinks) -> Self {
        self.attributes.insert(attribute.into(), links);
        self
    }

    /// Overrides the matching role set.
    pub fn with_roles<I, S>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.roles = roles.into_iter().map(Into::into).collect();
        self
    }

    /// Returns the relationship record for an attribute, or an empty one.
    pub fn links(&self, attribute: &str) -> RoleLinks {
        self.attributes.get(attribute).cloned().unwrap_or_default()
    }

    /// Builds a node from a raw inventory record.
    ///
    /// Only `name` is required. A missing `role` falls back to the
    /// `role[...]` entries of `run_list`, and a missing `roles` falls back
    /// to `role`. Any other key holding an object is read as a
    /// relationship record.
    pub fn from_value(value: &Value) -> Result<Self> {
        let object = value.as_object().ok_or(InventoryError::MissingName)?;
        let name = object
            .get("name")
            .and_then(Value::as_str)
            .filter(|name| !name.is_empty())
            .ok_or(InventoryError::MissingName)?
            .to_string();

        let role = match object.get("role") {
            Some(role) => string_list(Some(role)),
            None => run_list_roles(object.get("run_list")),
        };

        let roles = match object.get("roles") {
            Some(roles) => string_list(Some(roles)).into_iter().collect(),
            None => role.iter().cloned().collect(),
        };

        let attributes = object
            .iter()
            .filter_map(|(key, value)| {
                value
                    .as_object()
                    .map(|record| (key.clone(), RoleLinks::from_object(record)))
            })
            .collect();

        Ok(Self {
            name,
            role,
            roles,
            attributes,
        })
    }
}

/// Reads a JSON array of strings. Anything else counts as empty.
fn string_list(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Extracts role names from run list entries such as `role[db_master]`.
fn run_list_roles(value: Option<&Value>) -> Vec<String> {
    string_list(value)
        .iter()
        .filter_map(|entry| {
            entry
                .strip_prefix("role[")
                .and_then(|rest| rest.strip_suffix(']'))
                .map(str::to_string)
        })
        .collect()
}
