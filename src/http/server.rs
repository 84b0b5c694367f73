//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (request ID, tracing, CORS, timeout)
//! - Bind server to listener
//! - Stop on the shutdown broadcast

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::{HeaderValue, Method, Request},
    routing::get,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::{CorsConfig, ExplorerConfig, TokenRegistry};
use crate::http::handlers;
use crate::http::request::{request_id, UuidRequestId};
use crate::upstream::{UpstreamClient, UpstreamResult};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub client: UpstreamClient,
    pub tokens: Arc<TokenRegistry>,
}

/// HTTP server for the explorer API.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a server with an upstream client built from `config`.
    pub fn new(config: ExplorerConfig) -> UpstreamResult<Self> {
        let client = UpstreamClient::new(&config.upstream)?;
        Ok(Self::with_client(config, client))
    }

    /// Create a server around an existing upstream client.
    pub fn with_client(config: ExplorerConfig, client: UpstreamClient) -> Self {
        let state = AppState {
            client,
            tokens: Arc::new(config.tokens.clone()),
        };
        Self {
            router: Self::build_router(&config, state),
        }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ExplorerConfig, state: AppState) -> Router {
        Router::new()
            .route("/", get(handlers::health))
            .route("/api/wallet/{address}", get(handlers::wallet_lookup))
            .route("/api/transaction/{hash}", get(handlers::transaction_lookup))
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::x_request_id(UuidRequestId))
                    .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                        tracing::info_span!(
                            "request",
                            method = %request.method(),
                            path = %request.uri().path(),
                            request_id = %request_id(request),
                        )
                    }))
                    .layer(PropagateRequestIdLayer::x_request_id())
                    .layer(cors_layer(&config.cors))
                    .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs))),
            )
    }

    /// Router with all layers applied, for serving or in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Cross-origin policy: `*` allows any origin, otherwise an explicit list.
fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers(Any);

    if config.allows_any() {
        layer.allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        layer.allow_origin(origins)
    }
}
