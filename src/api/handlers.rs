//! HTTP request handlers.

use axum::{extract::State, Json};

use crate::api::types::*;
use crate::error::{GuardrailError, GuardrailResult};
use crate::AppState;

/// Run a prompt through the guarded pipeline.
///
/// POST /v1/guarded-chat
#[utoipa::path(
    post,
    path = "/v1/guarded-chat",
    request_body = GuardedChatRequest,
    responses(
        (status = 200, description = "Pipeline complete", body = GuardedChatResponse),
        (status = 400, description = "Invalid request"),
        (status = 500, description = "Pipeline failure"),
        (status = 502, description = "Backend failure"),
        (status = 504, description = "Backend timeout")
    ),
    tag = "chat"
)]
pub async fn guarded_chat(
    State(state): State<AppState>,
    Json(request): Json<GuardedChatRequest>,
) -> GuardrailResult<Json<GuardedChatResponse>> {
    if request.prompt.trim().is_empty() {
        return Err(GuardrailError::BadRequest(
            "prompt must not be empty".to_string(),
        ));
    }

    tracing::info!(prompt_len = request.prompt.len(), "Running guarded chat");

    // Rules and the backend call are synchronous, keep them off the reactor
    let pipeline = state.pipeline.clone();
    let result = tokio::task::spawn_blocking(move || {
        pipeline.run(&request.prompt, request.context.as_ref())
    })
    .await
    .map_err(|e| GuardrailError::Internal(format!("pipeline task failed: {}", e)))??;

    tracing::info!(
        run_id = %result.run_id,
        stage = %result.stage,
        status = %result.status(),
        final_directive = %result.final_directive,
        confidence = result.confidence,
        "Guarded chat complete"
    );

    Ok(Json(GuardedChatResponse::from(result)))
}

/// Liveness check. Does not touch the pipeline.
///
/// GET /v1/health
#[utoipa::path(
    get,
    path = "/v1/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    ),
    tag = "health"
)]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}
