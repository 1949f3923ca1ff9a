//! Process entry point plumbing for LightBnB.
//!
//! Owns the lifetime of the store: the binary loads [`config::Config`], opens
//! the database pool once, wraps it in a [`Store`] and hands it to the router
//! through [`AppState`]. Listing routes live in the web application; this
//! crate only exposes the health check.

pub mod config;

use axum::{http::StatusCode, routing::get, Extension, Json, Router};
use lightbnb_store::Store;
use serde_json::{json, Value};
use std::sync::Arc;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// The data-access handle, backed by the process-wide pool.
    pub store: Store,
}

/// Health check handler.
///
/// Reports `200 OK` when a pooled connection answers, `503` otherwise.
async fn health(Extension(state): Extension<Arc<AppState>>) -> (StatusCode, Json<Value>) {
    let store = state.store.clone();
    let reachable = match tokio::task::spawn_blocking(move || store.ping()).await {
        Ok(Ok(())) => true,
        Ok(Err(_)) => false,
        Err(e) => {
            tracing::error!(error = %e, "health check task failed");
            false
        }
    };

    let (status, label) = if reachable {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "unavailable")
    };

    (
        status,
        Json(json!({
            "status": if reachable { "ok" } else { "degraded" },
            "database": label,
            "version": env!("CARGO_PKG_VERSION")
        })),
    )
}

/// Builds the application router with all routes.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .layer(Extension(Arc::new(state)))
}
