//! Request handlers.
//!
//! Every request reads the inventory fresh from disk. Loading and rendering
//! are blocking, so they run on the blocking thread pool.

use crate::views;
use crate::AppState;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use nodemap_core::{Inventory, InventoryError};
use nodemap_graph::{render_node_map, RenderOutcome};
use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::path::Path;
use std::time::UNIX_EPOCH;
use thiserror::Error;
use tokio::task::JoinError;
use tracing::{debug, error};

/// Errors turned into a JSON 500 response.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("failed to load inventory: {0}")]
    Inventory(#[from] InventoryError),

    #[error("background task failed: {0}")]
    Task(#[from] JoinError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        error!("{}", self);
        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct GraphQuery {
    #[serde(default)]
    pub hostnames: bool,
    pub env: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct EnvQuery {
    pub env: Option<String>,
}

async fn load_inventory(state: &AppState, env: Option<String>) -> Result<Inventory, AppError> {
    let settings = state.settings.clone();
    let inventory = tokio::task::spawn_blocking(move || Inventory::load(&settings.repo)).await??;
    Ok(match env {
        Some(env) => inventory.filter_env(&env),
        None => inventory,
    })
}

/// Handles `GET /`.
pub async fn index(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let inventory = load_inventory(&state, None).await?;
    Ok(Html(views::index_page(
        inventory.raw_nodes().len(),
        inventory.raw_roles().len(),
    )))
}

/// Handles `GET /graph/`.
pub async fn graph(
    State(state): State<AppState>,
    Query(params): Query<GraphQuery>,
) -> Result<Response, AppError> {
    debug!(
        "Graph request: hostnames={} env={:?}",
        params.hostnames, params.env
    );
    let inventory = load_inventory(&state, params.env.clone()).await?;

    let settings = state.settings.clone();
    let engine = state.engine.clone();
    let show_hostnames = params.hostnames;
    let outcome = tokio::task::spawn_blocking(move || {
        let outcome = render_node_map(
            &inventory.nodes(),
            &inventory.roles(),
            show_hostnames,
            &settings,
            engine.as_ref(),
        );
        let version = match &outcome {
            RenderOutcome::Rendered(path) => render_version(path),
            RenderOutcome::Failed(_) => 0,
        };
        (outcome, version)
    })
    .await?;

    let response = match outcome {
        (RenderOutcome::Rendered(_), version) => Html(views::graph_page(
            show_hostnames,
            params.env.as_deref(),
            version,
        ))
        .into_response(),
        (RenderOutcome::Failed(message), _) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Html(views::graph_error_page(&message)),
        )
            .into_response(),
    };
    Ok(response)
}

/// Modification time of a rendered image in nanoseconds, or 0 if unknown.
fn render_version(path: &Path) -> u128 {
    fs::metadata(path)
        .and_then(|meta| meta.modified())
        .ok()
        .and_then(|modified| modified.duration_since(UNIX_EPOCH).ok())
        .map_or(0, |age| age.as_nanos())
}

/// Handles `GET /api/nodes`.
pub async fn api_nodes(
    State(state): State<AppState>,
    Query(params): Query<EnvQuery>,
) -> Result<Json<Vec<Value>>, AppError> {
    let inventory = load_inventory(&state, params.env).await?;
    Ok(Json(inventory.raw_nodes().to_vec()))
}

/// Handles `GET /api/roles`.
pub async fn api_roles(State(state): State<AppState>) -> Result<Json<Vec<Value>>, AppError> {
    let inventory = load_inventory(&state, None).await?;
    Ok(Json(inventory.raw_roles().to_vec()))
}
