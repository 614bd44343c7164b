//! roomboard HTTP server.
//!
//! A thin axum layer over the provider gateway and the occupancy engine:
//!
//! - [`config`] - TOML file plus CLI/environment overrides
//! - [`routes`] - `/api` handlers
//! - [`notice`] - In-memory notice board
//! - [`error`] - API and startup error types
//!
//! Requests are traced with `tower-http` and CORS is limited to the
//! configured front-end origin.

pub mod config;
pub mod error;
pub mod notice;
pub mod routes;
pub mod state;

use axum::Router;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderValue, Method};
use chrono::Local;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{Level, info, warn};

use roomboard_providers::{FixtureProvider, Gateway};

pub use config::{AppConfig, Cli, ConfigError};
pub use error::{ApiError, ServerError, ServerResult};
pub use notice::NoticeStore;
pub use state::AppState;

/// Builds the full application router.
pub fn app(state: AppState, frontend_url: &str) -> Router {
    routes::router()
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors_layer(frontend_url))
        .with_state(state)
}

/// CORS for the single front-end origin, with credentials.
fn cors_layer(frontend_url: &str) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
        .allow_credentials(true);

    match HeaderValue::from_str(frontend_url.trim_end_matches('/')) {
        Ok(origin) => layer.allow_origin(origin),
        Err(e) => {
            warn!("invalid front-end origin {:?}: {}, CORS disabled", frontend_url, e);
            layer
        }
    }
}

/// Builds the state for `config`, with fixtures laid out on the current week.
pub fn build_state(config: &AppConfig) -> ServerResult<AppState> {
    let fixtures = FixtureProvider::for_week_of(&Local::now());
    let gateway = Gateway::new(config.graph_enabled, fixtures, config.graph.clone())?;
    Ok(AppState::new(gateway, config.notice.clone(), config.occupancy))
}

/// Runs the server until Ctrl+C or SIGTERM.
pub async fn run(config: AppConfig) -> ServerResult<()> {
    let state = build_state(&config)?;

    if state.gateway.is_enabled() {
        let missing = state.gateway.missing_settings();
        if missing.is_empty() {
            info!("serving rooms from Microsoft Graph");
        } else {
            warn!(missing = ?missing, "Microsoft Graph enabled with missing settings");
        }
    } else {
        info!("Microsoft Graph disabled, serving fixture data");
    }

    let app = app(state, &config.frontend_url);
    let listener = TcpListener::bind(config.addr).await?;
    info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("received Ctrl+C, shutting down"),
        () = terminate => info!("received SIGTERM, shutting down"),
    }
}
