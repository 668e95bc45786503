//! On-disk inventory loading.
//!
//! The inventory is two directories of JSON files, one record per file:
//! `nodes/` and `roles/`. Raw records are kept so the API can hand them
//! out unchanged; typed views are built on demand.

use crate::error::{InventoryError, Result};
use crate::node::Node;
use crate::role::Role;
use crate::settings::RepoSettings;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// A snapshot of the node and role records.
#[derive(Debug, Clone, Default)]
pub struct Inventory {
    nodes: Vec<Value>,
    roles: Vec<Value>,
}

impl Inventory {
    /// Creates an inventory from records already in memory.
    pub fn from_values(nodes: Vec<Value>, roles: Vec<Value>) -> Self {
        Self { nodes, roles }
    }

    /// Reads all node and role files.
    ///
    /// A missing directory counts as empty. Files that aren't valid JSON are
    /// skipped with a warning.
    pub fn load(repo: &RepoSettings) -> Result<Self> {
        let nodes = read_json_dir(&repo.nodes_dir)?;
        let roles = read_json_dir(&repo.roles_dir)?;
        debug!("Loaded {} node and {} role records", nodes.len(), roles.len());
        Ok(Self { nodes, roles })
    }

    /// Raw node records.
    pub fn raw_nodes(&self) -> &[Value] {
        &self.nodes
    }

    /// Raw role records.
    pub fn raw_roles(&self) -> &[Value] {
        &self.roles
    }

    /// Typed nodes. Records without a name are skipped.
    pub fn nodes(&self) -> Vec<Node> {
        self.nodes
            .iter()
            .filter_map(|value| match Node::from_value(value) {
                Ok(node) => Some(node),
                Err(e) => {
                    warn!("Skipping node record: {}", e);
                    None
                }
            })
            .collect()
    }

    /// Typed roles. Records that don't parse are skipped.
    pub fn roles(&self) -> Vec<Role> {
        self.roles
            .iter()
            .filter_map(|value| match serde_json::from_value(value.clone()) {
                Ok(role) => Some(role),
                Err(e) => {
                    warn!("Skipping role record: {}", e);
                    None
                }
            })
            .collect()
    }

    /// Keeps only the nodes in the given environment. Roles are untouched.
    pub fn filter_env(&self, env: &str) -> Self {
        let nodes = self
            .nodes
            .iter()
            .filter(|node| node.get("chef_environment").and_then(Value::as_str) == Some(env))
            .cloned()
            .collect();
        Self {
            nodes,
            roles: self.roles.clone(),
        }
    }
}

/// Reads every `*.json` file directly inside `dir`, in file name order.
fn read_json_dir(dir: &Path) -> Result<Vec<Value>> {
    if !dir.is_dir() {
        debug!("Inventory directory {} does not exist", dir.display());
        return Ok(Vec::new());
    }

    let mut paths: Vec<PathBuf> = fs::read_dir(dir)
        .map_err(|e| InventoryError::io(dir, e))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "json"))
        .collect();
    paths.sort();

    let mut values = Vec::with_capacity(paths.len());
    for path in paths {
        match read_json_file(&path) {
            Ok(value) => values.push(value),
            Err(e) => warn!("{}", e),
        }
    }
    Ok(values)
}

fn read_json_file(path: &Path) -> Result<Value> {
    let text = fs::read_to_string(path).map_err(|e| InventoryError::io(path, e))?;
    serde_json::from_str(&text).map_err(|e| InventoryError::json(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    fn repo_in(dir: &Path) -> RepoSettings {
        RepoSettings {
            nodes_dir: dir.join("nodes"),
            roles_dir: dir.join("roles"),
        }
    }

    #[test]
    fn test_load_reads_sorted_and_skips_bad_files() {
        let dir = tempdir().unwrap();
        let repo = repo_in(dir.path());
        fs::create_dir_all(&repo.nodes_dir).unwrap();
        fs::create_dir_all(&repo.roles_dir).unwrap();

        fs::write(
            repo.nodes_dir.join("web1.json"),
            r#"{"name": "web1", "role": ["web_front"]}"#,
        )
        .unwrap();
        fs::write(
            repo.nodes_dir.join("db1.json"),
            r#"{"name": "db1", "role": ["db_master"]}"#,
        )
        .unwrap();
        fs::write(repo.nodes_dir.join("broken.json"), "{ not json").unwrap();
        fs::write(repo.nodes_dir.join("notes.txt"), "ignored").unwrap();
        fs::write(repo.roles_dir.join("db_master.json"), r#"{"name": "db_master"}"#).unwrap();

        let inventory = Inventory::load(&repo).unwrap();
        let names: Vec<_> = inventory.nodes().into_iter().map(|n| n.name).collect();
        assert_eq!(names, vec!["db1", "web1"]);
        assert_eq!(inventory.roles().len(), 1);
    }

    #[test]
    fn test_load_missing_dirs_is_empty() {
        let dir = tempdir().unwrap();
        let inventory = Inventory::load(&repo_in(dir.path())).unwrap();
        assert!(inventory.raw_nodes().is_empty());
        assert!(inventory.raw_roles().is_empty());
    }

    #[test]
    fn test_nodes_skips_nameless_records() {
        let inventory = Inventory::from_values(
            vec![json!({"name": "db1"}), json!({"role": ["web_front"]})],
            vec![json!({"name": "db_master"}), json!({"description": "no name"})],
        );
        assert_eq!(inventory.nodes().len(), 1);
        assert_eq!(inventory.roles().len(), 1);
    }

    #[test]
    fn test_filter_env() {
        let inventory = Inventory::from_values(
            vec![
                json!({"name": "db1", "chef_environment": "production"}),
                json!({"name": "db2", "chef_environment": "staging"}),
                json!({"name": "db3"}),
            ],
            vec![json!({"name": "db_master"})],
        );

        let production = inventory.filter_env("production");
        assert_eq!(production.raw_nodes().len(), 1);
        assert_eq!(production.nodes()[0].name, "db1");
        assert_eq!(production.raw_roles().len(), 1);
    }
}
