//! Documentation of a student feedback collection service.
//!
//!
//!
//! # General Infrastructure
//! - Browser form posts a name and a comment to the backend
//! - Backend validates, stores the entry in MongoDB and echoes it back for display
//! - Second endpoint lists every stored entry, newest first
//! - Like/delete buttons on the page are local only, there are no endpoints behind them
//!
//!
//!
//! # Endpoints
//!
//! | Method | Path | Success | Failure |
//! |---|---|---|---|
//! | GET | `/` | 200 `{ status, message, uptime }` | |
//! | GET | `/db-status` | 200 `{ database }` | |
//! | POST | `/api/feedback` | 201 `{ success, message, data }` | 400 bad input, 500 store |
//! | GET | `/api/feedback` | 200 `{ success, count, data }` | 500 store |
//!
//! Every failure body is `{ success: false, message }`. Store errors are logged, never returned.
//!
//!
//!
//! # Notes
//!
//! ## No pagination
//! The list endpoint returns the whole collection. Fine for a classroom, not for anything larger.
//!
//! ## Timestamps
//! `createdAt` is stamped by the server at request time, truncated to milliseconds since that is all a
//! BSON date keeps. Entries sharing a millisecond are ordered by `_id`, later insert first.
//!
//!
//!
//! # Setup
//!
//! Environment, a `.env` file in the working directory is also read.
//! ```sh
//! MONGO_URI=mongodb://localhost:27017/feedback
//! PORT=3000
//! APP_ENV=development
//! RUST_LOG=info
//! ```
//!
//! Run the server.
//! ```sh
//! cargo run -p feedback
//! ```
//!
//! Smoke test a running server.
//! ```sh
//! cargo run -p tester -- http://localhost:3000/api/feedback
//! ```
//!
//! View current docs.
//! ```sh
//! cargo doc --open
//! ```
use std::{env, future::pending, sync::Arc, time::Duration};

use axum::{Router, middleware, routing::get};

use signal::{
    ctrl_c,
    unix::{SignalKind, signal},
};
use tokio::{net::TcpListener, signal};
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt};

pub mod config;
pub mod database;
pub mod error;
#[cfg(any(test, feature = "test-util"))]
pub mod memory;
pub mod models;
pub mod routes;
pub mod state;
pub mod utils;

use config::Config;
use error::StartupError;
use routes::{create_feedback_handler, db_status_handler, health_handler, list_feedback_handler};
use state::AppState;
use utils::log_request;

const DEFAULT_LOG_FILTER: &str = "info";

pub async fn start_server() -> Result<(), StartupError> {
    let dotenv = dotenvy::dotenv();

    fmt().with_env_filter(log_filter(env::var("RUST_LOG").ok())).init();

    if let Ok(path) = dotenv {
        info!("Loaded environment from {}", path.display());
    }

    run().await.inspect_err(|e| error!("{e}"))
}

/// `RUST_LOG` when it parses, otherwise info so requests and the startup banner are visible.
fn log_filter(directives: Option<String>) -> EnvFilter {
    directives
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER))
}

async fn run() -> Result<(), StartupError> {
    let config = Config::load()?;

    info!("Initializing state...");
    let state = AppState::new(config).await?;

    info!("Starting server...");
    let app = app(state.clone());

    let address = format!("0.0.0.0:{}", state.config.port);
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address)
        .await
        .map_err(|source| StartupError::Bind {
            address: address.clone(),
            source,
        })?;

    info!(
        "Server running on http://localhost:{} (environment: {})",
        state.config.port, state.config.environment
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(StartupError::Serve)?;

    info!("Server shutting down...");

    Ok(())
}

pub fn app(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .max_age(Duration::from_secs(60 * 60));

    let feedback = Router::new().route("/", get(list_feedback_handler).post(create_feedback_handler));

    Router::new()
        .route("/", get(health_handler))
        .route("/db-status", get(db_status_handler))
        .nest("/api/feedback", feedback)
        .layer(middleware::from_fn(log_request))
        .layer(cors)
        .with_state(state)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                error!("Failed to install Ctrl+C handler: {e}");
                pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal(SignalKind::terminate()) {
            Ok(mut terminate) => {
                terminate.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!("Failed to install signal handler: {e}");
                pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
