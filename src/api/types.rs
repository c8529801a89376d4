//! API request and response types.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{Directive, PipelineResult, PipelineStatus, Stage};
use crate::engine::RuleContext;

// ==================== Guarded Chat ====================

/// Request to run a prompt through the guarded pipeline.
#[derive(Debug, Deserialize, ToSchema)]
pub struct GuardedChatRequest {
    /// The user prompt.
    pub prompt: String,
    /// Optional context passed to every rule.
    #[serde(default)]
    #[schema(value_type = Option<Object>)]
    pub context: Option<RuleContext>,
}

/// Response from the guarded pipeline.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct GuardedChatResponse {
    /// Identifier of this pipeline run.
    pub run_id: Uuid,
    /// OK or BLOCKED.
    pub status: PipelineStatus,
    /// Stage that finalized the decision.
    pub stage: Stage,
    pub final_directive: Directive,
    pub confidence: f64,
    /// Released text. Absent when the exchange was blocked.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
    /// Explanation for blocked exchanges.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Human-readable rendering of every verdict.
    pub details: Vec<String>,
}

impl From<PipelineResult> for GuardedChatResponse {
    fn from(result: PipelineResult) -> Self {
        Self {
            run_id: result.run_id,
            status: result.status(),
            stage: result.stage,
            final_directive: result.final_directive,
            confidence: result.confidence,
            message: result.message(),
            details: result.verdicts.iter().map(|v| v.to_string()).collect(),
            response: result.response_text,
        }
    }
}

// ==================== Health ====================

/// Health check response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
    /// Service version.
    pub version: String,
    /// Timestamp.
    pub timestamp: String,
}
