//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with the health handler
//! - Wire up middleware (tracing, timeout, request ID)
//! - Forward hot-reloaded configuration to the orchestrator
//! - Stop gracefully on the shutdown broadcast

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::State,
    http::{HeaderName, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::backends::Backends;
use crate::config::HealthConfig;
use crate::orchestrator::Orchestrator;
use crate::report::to_machine_readable;

pub const X_REQUEST_ID: &str = "x-request-id";

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<Orchestrator>,
}

/// Serves the health report on the configured path.
pub struct HttpServer {
    router: Router,
    orchestrator: Arc<Orchestrator>,
}

impl HttpServer {
    /// Route and timeout come from the orchestrator's configuration at
    /// construction time.
    pub fn new(orchestrator: Arc<Orchestrator>) -> Self {
        let config = orchestrator.config();
        let state = AppState {
            orchestrator: orchestrator.clone(),
        };
        let router = Self::build_router(&config, state);
        Self {
            router,
            orchestrator,
        }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &HealthConfig, state: AppState) -> Router {
        let request_id = HeaderName::from_static(X_REQUEST_ID);

        Router::new()
            .route(&config.server.path, get(health_handler))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.server.request_timeout_secs,
            )))
            .layer(PropagateRequestIdLayer::new(request_id.clone()))
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::new(request_id, MakeRequestUuid))
    }

    /// The router, for serving elsewhere or driving directly in tests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires.
    ///
    /// Configurations received on `config_updates` are swapped into the
    /// orchestrator. Route, timeout and backend wiring changes need a restart.
    pub async fn run(
        self,
        listener: TcpListener,
        mut config_updates: mpsc::UnboundedReceiver<HealthConfig>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        let path = self.orchestrator.config().server.path.clone();
        tracing::info!(address = %addr, path = %path, "HTTP server starting");

        let orchestrator = self.orchestrator.clone();
        let reloads = tokio::spawn(async move {
            while let Some(config) = config_updates.recv().await {
                let current = orchestrator.config();
                if config.server != current.server {
                    tracing::warn!("Server settings changed; restart to apply them");
                }
                if Backends::wiring_changed(&current, &config) {
                    tracing::warn!("Backend settings changed; restart to apply them");
                }
                orchestrator.update_config(config);
            }
        });

        let result = axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await;

        reloads.abort();
        tracing::info!("HTTP server stopped");
        result
    }
}

/// Runs every enabled probe and answers with the machine-readable report.
async fn health_handler(State(state): State<AppState>) -> Response {
    let report = state.orchestrator.run().await;
    let status = if report.is_healthy() {
        StatusCode::OK
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };

    tracing::debug!(
        status = %report.status,
        probes = report.checks.len(),
        "Health report served"
    );
    (status, Json(to_machine_readable(&report))).into_response()
}
