use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use axum::Router;
use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

mod app;
mod classifier;
mod config;
mod endpoint;
mod error;
mod forward;

pub use classifier::{classify, strip_comments, Classification};
pub use config::{EndpointBinding, ServerConfig, HTTP_TIMEOUT, MAX_SPARQL_BODY_SIZE};
pub use error::{SparqlGatewayError, UPDATE_REJECTED_MESSAGE};
pub use forward::{BackendResponse, ForwardMethod, DEFAULT_ACCEPT};

use crate::app::{handle_favicon, handle_home};
use crate::endpoint::{handle_sparql_get, handle_sparql_post};

/// Serves the gateway until the process is terminated.
pub async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    let addr = SocketAddr::from_str(&config.bind)?;
    let app = create_app(config)?;

    tracing::info!(%addr, "listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    Ok(axum::serve(listener, app).await?)
}

/// Builds the gateway router.
///
/// Separate from [`serve`] so tests can drive the router in-process.
pub fn create_app(config: ServerConfig) -> anyhow::Result<Router> {
    let client = reqwest::Client::builder()
        .timeout(config::HTTP_TIMEOUT)
        .build()?;
    let static_dir = config.static_dir.clone();
    let state = AppState {
        config: Arc::new(config),
        client,
    };

    Ok(Router::new()
        .route("/", get(handle_home))
        .route("/favicon.ico", get(handle_favicon))
        .nest_service("/static", ServeDir::new(static_dir))
        .route("/{endpoint}", get(handle_sparql_get).post(handle_sparql_post))
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(config::MAX_SPARQL_BODY_SIZE))
        .with_state(state))
}

/// Shared request-handling state.
///
/// The binding table is immutable after startup; the only other shared
/// resource is the connection-pooling HTTP client.
#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) config: Arc<ServerConfig>,
    pub(crate) client: reqwest::Client,
}
