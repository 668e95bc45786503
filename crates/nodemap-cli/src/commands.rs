//! CLI command implementations.

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use nodemap_core::{Inventory, Settings};
use nodemap_graph::{infer_links, render_node_map, Graphviz, RenderOutcome};
use nodemap_server::NodemapServer;
use std::net::{IpAddr, Ipv4Addr};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

const SETTINGS_FILE: &str = "nodemap.yaml";

/// Picks the settings file to use, if any.
///
/// An explicit path always wins. Otherwise `nodemap.yaml` in the working
/// directory, then `nodemap/config.yaml` in the user config directory.
fn find_settings(explicit: Option<&Path>, cwd: &Path, config_dir: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    let local = cwd.join(SETTINGS_FILE);
    if local.is_file() {
        return Some(local);
    }
    config_dir
        .map(|dir| dir.join("nodemap").join("config.yaml"))
        .filter(|path| path.is_file())
}

fn load_settings(explicit: Option<&Path>) -> Result<Settings> {
    let cwd = std::env::current_dir()?;
    let config_dir = dirs::config_dir();
    match find_settings(explicit, &cwd, config_dir.as_deref()) {
        Some(path) => {
            debug!("Using settings from {}", path.display());
            Ok(Settings::load(&path)?)
        }
        None => {
            debug!("No settings file found, using defaults");
            Ok(Settings::default())
        }
    }
}

fn load_inventory(settings: &Settings, env: Option<&str>) -> Result<Inventory> {
    let inventory = Inventory::load(&settings.repo)?;
    Ok(match env {
        Some(env) => inventory.filter_env(env),
        None => inventory,
    })
}

/// Render the node map once.
pub fn render(config: Option<&Path>, hostnames: bool, env: Option<&str>) -> Result<()> {
    let settings = load_settings(config)?;
    let inventory = load_inventory(&settings, env)?;

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}")?);
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner.set_message("Rendering node map...");

    let nodes = inventory.nodes();
    let outcome = render_node_map(
        &nodes,
        &inventory.roles(),
        hostnames,
        &settings,
        &Graphviz::default(),
    );

    spinner.finish_and_clear();

    match outcome {
        RenderOutcome::Rendered(path) => {
            println!(
                "{} Rendered {} nodes to {}",
                "✓".green(),
                nodes.len().to_string().cyan(),
                path.display()
            );
            Ok(())
        }
        RenderOutcome::Failed(message) => Err(message.into()),
    }
}

/// Print inferred relationships.
pub fn links(config: Option<&Path>, env: Option<&str>, json: bool) -> Result<()> {
    let settings = load_settings(config)?;
    let inventory = load_inventory(&settings, env)?;
    let links = infer_links(&inventory.nodes());

    if json {
        println!("{}", serde_json::to_string_pretty(&links)?);
        return Ok(());
    }

    if links.is_empty() {
        println!("No relationships found");
        return Ok(());
    }

    for (name, node_links) in &links {
        println!("{}", name.cyan().bold());
        for client in &node_links.client_nodes {
            println!(
                "  {} {} {}",
                "serves".green(),
                client.node,
                format!("({})", client.attribute).dimmed()
            );
        }
        for needed in &node_links.needs_nodes {
            println!(
                "  {} {} {}",
                "needs".yellow(),
                needed.node,
                format!("({})", needed.attribute).dimmed()
            );
        }
    }

    Ok(())
}

/// Start the web front end.
pub async fn serve(config: Option<&Path>, port: Option<u16>, headless: bool) -> Result<()> {
    let mut settings = load_settings(config)?;
    if let Some(port) = port {
        settings.server.addr.set_port(port);
    }
    if headless {
        settings.server.addr.set_ip(IpAddr::V4(Ipv4Addr::UNSPECIFIED));
        println!("{}", "Starting nodemap server in headless mode...".cyan());
    } else {
        println!("{}", "Starting nodemap server...".cyan());
    }

    println!(
        "{} Listening on http://{}",
        "✓".green(),
        settings.server.addr
    );
    println!("  Press {} to stop", "Ctrl+C".cyan());

    NodemapServer::new(settings)
        .run()
        .await
        .map_err(|e| e.to_string())?;

    Ok(())
}

/// Check that everything a render needs is in place.
pub fn check_health(config: Option<&Path>) -> Result<()> {
    println!("{}", "Checking nodemap health...".cyan());
    let mut healthy = true;

    let settings = match load_settings(config) {
        Ok(settings) => {
            println!("  {} Settings", "✓".green());
            settings
        }
        Err(e) => {
            println!("  {} Settings: {}", "✗".red(), e);
            return Err("health check failed".into());
        }
    };

    for (label, dir) in [
        ("Nodes directory", &settings.repo.nodes_dir),
        ("Roles directory", &settings.repo.roles_dir),
    ] {
        if dir.is_dir() {
            println!("  {} {} {}", "✓".green(), label, dir.display());
        } else {
            println!("  {} {} {} is missing", "⚠".yellow(), label, dir.display());
        }
    }

    match Graphviz::default().version() {
        Ok(version) => println!("  {} Graphviz: {}", "✓".green(), version),
        Err(e) => {
            println!("  {} Graphviz: {}", "✗".red(), e);
            healthy = false;
        }
    }

    if healthy {
        println!("{} All checks passed", "✓".green());
        Ok(())
    } else {
        Err("health check failed".into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_find_settings_prefers_explicit() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(SETTINGS_FILE), "").unwrap();
        let explicit = dir.path().join("other.yaml");

        assert_eq!(
            find_settings(Some(&explicit), dir.path(), None),
            Some(explicit)
        );
    }

    #[test]
    fn test_find_settings_local_then_config_dir() {
        let cwd = tempdir().unwrap();
        let config = tempdir().unwrap();
        let user_file = config.path().join("nodemap").join("config.yaml");
        fs::create_dir_all(user_file.parent().unwrap()).unwrap();
        fs::write(&user_file, "").unwrap();

        assert_eq!(
            find_settings(None, cwd.path(), Some(config.path())),
            Some(user_file)
        );

        let local = cwd.path().join(SETTINGS_FILE);
        fs::write(&local, "").unwrap();
        assert_eq!(
            find_settings(None, cwd.path(), Some(config.path())),
            Some(local)
        );
    }

    #[test]
    fn test_find_settings_none() {
        let cwd = tempdir().unwrap();
        assert_eq!(find_settings(None, cwd.path(), None), None);
    }
}
