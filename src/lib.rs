//! CloudIQ Remediator
//!
//! Receives monitoring alerts, extracts a CPU signal, decides whether to
//! remediate, and scales the target deployment.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                      CLOUDIQ REMEDIATOR                      │
//! ├──────────────────────────────────────────────────────────────┤
//! │  POST /remediate                                             │
//! │       │                                                      │
//! │       ▼                                                      │
//! │  ┌────────────┐   ┌──────────┐   ┌──────────┐   ┌─────────┐  │
//! │  │ Normalizer │──▶│ Features │──▶│ Decision │──▶│Dispatch │  │
//! │  └────────────┘   └──────────┘   └────┬─────┘   └────┬────┘  │
//! │                                       │              │       │
//! │                              ┌────────▼───┐     ┌────▼────┐  │
//! │                              │ Classifier │     │ kubectl │  │
//! │                              │  (ONNX,    │     └─────────┘  │
//! │                              │  optional) │                  │
//! │                              └────────────┘                  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # API Routes
//!
//! | Method | Path | Description |
//! |---|---|---|
//! | GET | `/` | Liveness message |
//! | GET | `/health` | Version and timestamp |
//! | GET | `/status` | Classifier mode and inference stats |
//! | POST | `/remediate` | Ingest an alert |

pub mod config;
pub mod constants;
pub mod error;
pub mod handlers;
pub mod logic;
pub mod models;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use config::Config;
use logic::{ClassifierHandle, DecisionEngine, Dispatcher, Policy};
use models::ScaleTarget;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub engine: Arc<DecisionEngine>,
    pub dispatcher: Arc<dyn Dispatcher>,
    pub target: ScaleTarget,
}

impl AppState {
    pub fn new(config: Config, classifier: ClassifierHandle, dispatcher: Arc<dyn Dispatcher>) -> Self {
        let engine = DecisionEngine::new(classifier, Policy::from_config(&config));
        Self {
            target: config.scale_target(),
            config: Arc::new(config),
            engine: Arc::new(engine),
            dispatcher,
        }
    }
}

/// Create the main router with all routes
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::health::root))
        .route("/health", get(handlers::health::check))
        .route("/status", get(handlers::health::status))
        .route("/remediate", post(handlers::remediate::remediate))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
