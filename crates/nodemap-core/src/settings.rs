//! Settings for rendering and serving node maps.
//!
//! Settings are read from a YAML file. Every field has a default, so an
//! empty file (or no file at all) gives a working configuration.

use crate::error::SettingsError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

/// Palette used when the settings don't provide one.
const DEFAULT_COLORS: [&str; 10] = [
    "#FCD975", "#9ACEEB", "#DEB887", "#C5E384", "#EE9090", "#B0A0E0", "#F5B7D0", "#A8E4D0",
    "#E0C9A6", "#B8C8E8",
];

/// Top-level settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Root of the static file tree. Rendered maps go under `img/`.
    pub static_root: PathBuf,

    /// Roles starting with this prefix are hidden from labels and never
    /// pick a node's cluster.
    pub exclude_role_prefix: String,

    /// Cluster colors, handed out in order and reused when exhausted.
    pub colors: Vec<String>,

    /// Fill color for nodes outside any cluster.
    pub default_fill: String,

    pub graph_style: GraphStyle,
    pub repo: RepoSettings,
    pub server: ServerSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            static_root: PathBuf::from("static"),
            exclude_role_prefix: "env".to_string(),
            colors: DEFAULT_COLORS.iter().map(|c| c.to_string()).collect(),
            default_fill: "lightyellow".to_string(),
            graph_style: GraphStyle::default(),
            repo: RepoSettings::default(),
            server: ServerSettings::default(),
        }
    }
}

impl Settings {
    /// Loads and validates settings from a YAML file.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let text = fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings: Settings = if text.trim().is_empty() {
            Settings::default()
        } else {
            serde_yaml::from_str(&text).map_err(|source| SettingsError::Yaml {
                path: path.to_path_buf(),
                source,
            })?
        };
        settings.validate()?;
        Ok(settings)
    }

    /// Checks the invariants the renderer relies on.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.colors.is_empty() {
            return Err(SettingsError::Invalid("colors must not be empty".into()));
        }
        if self.exclude_role_prefix.is_empty() {
            return Err(SettingsError::Invalid(
                "exclude_role_prefix must not be empty".into(),
            ));
        }
        Ok(())
    }

    /// Where the rendered node map is written.
    pub fn node_map_path(&self) -> PathBuf {
        self.static_root.join("img").join("node_map.svg")
    }
}

/// Cosmetic attributes for the rendered graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphStyle {
    pub node_shape: String,
    pub node_fontsize: f32,
    pub cluster_fontsize: f32,
    pub serves_fontsize: f32,
    pub depends_fontsize: f32,
    /// Line style of edges to needed nodes.
    pub depends_style: String,
    pub arrow_size: f32,
}

impl Default for GraphStyle {
    fn default() -> Self {
        Self {
            node_shape: "box".to_string(),
            node_fontsize: 9.0,
            cluster_fontsize: 12.0,
            serves_fontsize: 8.0,
            depends_fontsize: 7.0,
            depends_style: "dashed".to_string(),
            arrow_size: 0.6,
        }
    }
}

/// Location of the on-disk inventory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepoSettings {
    pub nodes_dir: PathBuf,
    pub roles_dir: PathBuf,
}

impl Default for RepoSettings {
    fn default() -> Self {
        Self {
            nodes_dir: PathBuf::from("nodes"),
            roles_dir: PathBuf::from("roles"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Address the web front end binds to.
    pub addr: SocketAddr,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([127, 0, 0, 1], 8000)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(
            settings.node_map_path(),
            PathBuf::from("static/img/node_map.svg")
        );
    }

    #[test]
    fn test_load_partial_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nodemap.yaml");
        fs::write(
            &path,
            "exclude_role_prefix: site\ncolors: [red, blue]\ngraph_style:\n  arrow_size: 1.0\n",
        )
        .unwrap();

        let settings = Settings::load(&path).unwrap();
        assert_eq!(settings.exclude_role_prefix, "site");
        assert_eq!(settings.colors, vec!["red", "blue"]);
        assert_eq!(settings.graph_style.arrow_size, 1.0);
        assert_eq!(settings.graph_style.depends_style, "dashed");
        assert_eq!(settings.default_fill, "lightyellow");
    }

    #[test]
    fn test_load_rejects_empty_palette() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nodemap.yaml");
        fs::write(&path, "colors: []\n").unwrap();

        assert!(matches!(
            Settings::load(&path),
            Err(SettingsError::Invalid(_))
        ));
    }

    #[test]
    fn test_load_empty_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nodemap.yaml");
        fs::write(&path, "").unwrap();

        assert_eq!(Settings::load(&path).unwrap(), Settings::default());
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempdir().unwrap();
        assert!(matches!(
            Settings::load(&dir.path().join("absent.yaml")),
            Err(SettingsError::Io { .. })
        ));
    }
}
