//! Route table and handlers

use anyhow::{Context, Result};
use axum::extract::State;
use axum::http::HeaderValue;
use axum::routing::{get, post};
use axum::{Json, Router};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::conversation::{chat_turn, process_video};
use crate::server::extract::ApiJson;
use crate::server::models::{timestamp, ChatRequest, ChatResponse, HealthResponse, VideoRequest};
use crate::server::state::AppState;
use crate::DeepvistaError;

/// Build the application router.
pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/chat", post(chat))
        .route("/process-youtube-video", post(process_youtube_video))
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// CORS for the configured origins; an empty list or a `*` entry allows any origin.
pub fn cors_layer(origins: &[String]) -> Result<CorsLayer> {
    let allow_origin = if origins.is_empty() || origins.iter().any(|o| o.trim() == "*") {
        AllowOrigin::from(Any)
    } else {
        let origins = origins
            .iter()
            .map(|o| {
                HeaderValue::from_str(o.trim())
                    .with_context(|| format!("Invalid CORS origin: {}", o))
            })
            .collect::<Result<Vec<_>>>()?;
        AllowOrigin::list(origins)
    };

    Ok(CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any))
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    info!("Health check endpoint called");

    let status = if state.completion.is_enabled() {
        "healthy"
    } else {
        "unhealthy"
    };

    Json(HealthResponse {
        status: status.to_string(),
        timestamp: timestamp(),
        ai_provider: state.completion.provider_name().to_string(),
    })
}

async fn chat(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<ChatRequest>,
) -> Result<Json<ChatResponse>, DeepvistaError> {
    let message = request.validated_message()?;
    info!(
        "Received chat request: {}...",
        message.chars().take(50).collect::<String>()
    );

    let response = chat_turn(message, &state.context, &state.completion).await?;
    Ok(Json(ChatResponse::now(response)))
}

async fn process_youtube_video(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<VideoRequest>,
) -> Result<Json<ChatResponse>, DeepvistaError> {
    info!("Received video request: {}", request.url);

    let response = process_video(
        &request.url,
        state.transcripts.as_ref(),
        &state.completion,
        &state.context,
        state.summary_char_limit,
    )
    .await?;
    Ok(Json(ChatResponse::now(response)))
}
