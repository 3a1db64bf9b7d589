pub mod request_id;

pub use request_id::{request_id_middleware, RequestId, X_REQUEST_ID};

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::app::AppState;
use crate::controllers::{health, stt::SttController, translate::TranslateController, tts::TtsController};
use crate::infrastructure::config::Config;

/// Room for multipart boundaries and the `lang` field on top of the audio itself
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Build the router with all routes configured
pub fn build_router(state: &AppState) -> Router {
    let translate_routes = Router::new()
        .route("/translate", post(TranslateController::translate))
        .with_state(state.translate_controller.clone());

    let tts_routes = Router::new()
        .route("/speak", post(TtsController::speak))
        .route("/tts", post(TtsController::speak))
        .with_state(state.tts_controller.clone());

    // Uploads over the limit are refused by the upload store itself; the body
    // limit only has to stop runaway requests
    let stt_routes = Router::new()
        .route("/recognize", post(SttController::recognize))
        .with_state(state.stt_controller.clone())
        .layer(DefaultBodyLimit::max(
            state.max_upload_bytes.saturating_add(MULTIPART_OVERHEAD_BYTES),
        ));

    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::health_ready))
        .with_state(state.language_table.clone())
        .merge(translate_routes)
        .merge(tts_routes)
        .merge(stt_routes)
        .layer(middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Start the HTTP server and serve until ctrl-c
pub async fn start_http_server(
    config: Arc<Config>,
    state: AppState,
) -> Result<(), Box<dyn std::error::Error>> {
    let app = build_router(&state);

    let listener =
        tokio::net::TcpListener::bind(format!("{}:{}", config.host, config.port)).await?;

    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
