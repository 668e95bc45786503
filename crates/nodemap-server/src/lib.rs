//! Nodemap Server - Web front end for node maps
//!
//! Serves the rendered node map along with the raw inventory:
//! - `/` summary page
//! - `/graph/` renders the map and shows it
//! - `/api/nodes` and `/api/roles` return inventory JSON
//! - `/static/` serves the static root, including the rendered SVG

use axum::routing::get;
use axum::Router;
use nodemap_core::Settings;
use nodemap_graph::{Graphviz, LayoutEngine};
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

mod handlers;
mod views;

pub use handlers::AppError;

/// State shared by all handlers.
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub engine: Arc<dyn LayoutEngine + Send + Sync>,
}

impl AppState {
    /// State rendering through Graphviz.
    pub fn new(settings: Settings) -> Self {
        Self::with_engine(settings, Graphviz::default())
    }

    pub fn with_engine(settings: Settings, engine: impl LayoutEngine + Send + Sync + 'static) -> Self {
        Self {
            settings: Arc::new(settings),
            engine: Arc::new(engine),
        }
    }
}

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    let static_files = ServeDir::new(&state.settings.static_root);

    Router::new()
        .route("/", get(handlers::index))
        .route("/graph/", get(handlers::graph))
        .route("/api/nodes", get(handlers::api_nodes))
        .route("/api/roles", get(handlers::api_roles))
        .nest_service("/static", static_files)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// The nodemap web server.
pub struct NodemapServer {
    state: AppState,
}

impl NodemapServer {
    /// Creates a server from settings.
    pub fn new(settings: Settings) -> Self {
        Self {
            state: AppState::new(settings),
        }
    }

    /// Runs the server until the process stops.
    pub async fn run(self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let addr = self.state.settings.server.addr;
        let listener = tokio::net::TcpListener::bind(addr).await?;
        info!("Nodemap server listening on {}", addr);

        axum::serve(listener, router(self.state)).await?;
        Ok(())
    }
}
