//! HTTP server for the cooking workflow
//!
//! This module is split into several submodules:
//! - `handlers`: JSON API for recipes, to-cook and to-buy lists
//! - `static_files`: frontend page and recipe images
//! - `error`: error type rendered as `{"error": ...}` responses
//!
//! Routes:
//! - GET /api/rezepte - Recipe catalog
//! - GET, POST /api/to-be-cooked - To-cook list, add a recipe
//! - DELETE /api/to-be-cooked/{id} - Remove a recipe
//! - GET, POST /api/to-be-bought - To-buy list, add an item
//! - DELETE, PUT /api/to-be-bought/{index} - Delete or rename an item
//! - GET /, /index.html, /images/{file} - Static frontend
//! - OPTIONS on any path - 204 with CORS headers

pub mod error;
pub mod handlers;
pub mod static_files;

use anyhow::{Context, Result};
use axum::extract::Request;
use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get};
use axum::Router;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::config::AppConfig;
use crate::kitchen::Kitchen;
use crate::storage::{open_store, BlobStore};

pub use error::ApiError;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub kitchen: Kitchen,
    /// Directory holding `index.html` and `images/`
    pub static_dir: Arc<PathBuf>,
}

impl AppState {
    pub fn new(kitchen: Kitchen, static_dir: impl Into<PathBuf>) -> Self {
        Self {
            kitchen,
            static_dir: Arc::new(static_dir.into()),
        }
    }
}

/// Any origin may call the API from a browser
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE])
}

/// Answer `OPTIONS` on any path with 204
///
/// Runs inside the CORS layer, so only requests that are not full preflights
/// reach it. The CORS layer still adds the allowed origin.
async fn answer_options(request: Request, next: Next) -> Response {
    if request.method() != Method::OPTIONS {
        return next.run(request).await;
    }

    let mut response = StatusCode::NO_CONTENT.into_response();
    let headers = response.headers_mut();
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET, POST, PUT, DELETE, OPTIONS"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type"),
    );
    response
}

/// Create the application router
pub fn router(state: AppState) -> Router {
    use handlers::*;

    Router::new()
        // Static frontend
        .route("/", get(static_files::index).fallback(not_found))
        .route("/index.html", get(static_files::index).fallback(not_found))
        .route("/images/{file}", get(static_files::image).fallback(not_found))
        // Recipe catalog
        .route("/api/rezepte", get(list_recipes).fallback(not_found))
        // To-cook list
        .route(
            "/api/to-be-cooked",
            get(list_to_cook).post(add_to_cook).fallback(not_found),
        )
        .route(
            "/api/to-be-cooked/{id}",
            delete(remove_from_cook).fallback(not_found),
        )
        // To-buy list
        .route(
            "/api/to-be-bought",
            get(list_to_buy).post(add_to_buy).fallback(not_found),
        )
        .route(
            "/api/to-be-bought/{index}",
            delete(delete_to_buy)
                .put(rename_to_buy)
                .fallback(not_found),
        )
        .fallback(not_found)
        .layer(middleware::from_fn(answer_options))
        .layer(cors_layer())
        .with_state(state)
}

/// Open the configured store and serve until Ctrl-C
pub async fn serve(config: &AppConfig) -> Result<()> {
    let store = open_store(&config.storage)
        .await
        .context("Failed to open document store")?;
    info!(backend = store.backend_name(), "Document store ready");

    let state = AppState::new(Kitchen::new(store), config.static_dir.clone());
    let app = router(state);

    let address = config.listen_address();
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {address}"))?;
    info!(address = %address, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Shutdown requested");
            }
        })
        .await
        .context("Server error")?;

    Ok(())
}
