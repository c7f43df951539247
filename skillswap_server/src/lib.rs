//! REST surface of the skill-swap service.
//!
//! All API routes live under `/api`; every route except register, login and
//! health expects `Authorization: Bearer <token>`. Uploaded photos are served
//! from `/uploads`.

use std::{sync::Arc, time::Duration};

use anyhow::Context;
use axum::{
    extract::DefaultBodyLimit,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    routing::{get, post},
    Router,
};
use tokio::{net::TcpListener, signal};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use tracing::info;

pub mod config;
pub mod error;
pub mod extract;
pub mod form;
pub mod routes;
pub mod state;

use config::Config;
use routes::*;
use state::State;

/// Multipart bodies may carry a photo.
pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// All routes, without CORS; [`start_server`] adds that from the config.
pub fn router(state: Arc<State>) -> Router {
    let auth = Router::new()
        .route("/register", post(register_handler))
        .route("/login", post(login_handler));

    let profile = Router::new()
        .route("/all", get(all_profiles_handler))
        .route(
            "/",
            get(own_profile_handler)
                .post(upsert_profile_handler)
                .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .route("/requests", get(requests_handler))
        .route("/request/:profile_id", post(request_connection_handler))
        .route("/handle-request/:requester_id", post(handle_request_handler));

    let api = Router::new()
        .nest("/auth", auth)
        .nest("/profile", profile)
        .route("/dashboard", get(dashboard_handler));

    Router::new()
        .nest("/api", api)
        .route("/health", get(health_handler))
        .nest_service("/uploads", ServeDir::new(&state.uploads_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn start_server(config: Config) -> anyhow::Result<()> {
    info!("Initializing state...");
    let state = State::from_config(&config)?;

    let origin: HeaderValue = config
        .cors_origin
        .parse()
        .with_context(|| format!("Invalid CORS origin {}", config.cors_origin))?;
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
        .allow_credentials(true)
        .max_age(Duration::from_secs(60 * 60));

    let app = router(state).layer(cors);

    let address = format!("0.0.0.0:{}", config.port);
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {address}"))?;
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if signal::ctrl_c().await.is_ok() {
            info!("Received Ctrl+C, shutting down");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
