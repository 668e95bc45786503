//! Nodemap CLI - Command-line interface for nodemap
//!
//! Renders inventory node maps, prints inferred relationships and runs the
//! web front end.

use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "nodemap")]
#[command(author = "Nodemap Contributors")]
#[command(version)]
#[command(about = "Relationship maps for configuration-management inventories", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Settings file (defaults to ./nodemap.yaml, then the user config dir)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the node map to SVG
    Render {
        /// Put each node's hostname above its roles
        #[arg(long)]
        hostnames: bool,

        /// Only include nodes from this environment
        #[arg(short, long)]
        env: Option<String>,
    },

    /// Print the relationships inferred between nodes
    Links {
        /// Only include nodes from this environment
        #[arg(short, long)]
        env: Option<String>,

        /// Output as JSON instead of formatted text
        #[arg(long)]
        json: bool,
    },

    /// Start the web front end
    Serve {
        /// Port to listen on (overrides the settings file)
        #[arg(short, long)]
        port: Option<u16>,

        /// Bind to 0.0.0.0 for remote access
        #[arg(long)]
        headless: bool,
    },

    /// Check settings, inventory and Graphviz
    #[command(hide = true)]
    CheckHealth,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(tracing_subscriber::EnvFilter::new(filter))
        .init();

    let config = cli.config.as_deref();
    let result = match cli.command {
        Commands::Render { hostnames, env } => commands::render(config, hostnames, env.as_deref()),
        Commands::Links { env, json } => commands::links(config, env.as_deref(), json),
        Commands::Serve { port, headless } => commands::serve(config, port, headless).await,
        Commands::CheckHealth => commands::check_health(config),
    };

    if let Err(e) = result {
        eprintln!("{} {}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}
