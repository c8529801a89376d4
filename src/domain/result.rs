//! Aggregate and pipeline result types.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::{Directive, Verdict};

/// Reduced outcome of running a set of rules over one text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AggregateResult {
    /// Highest-priority directive among all verdicts.
    pub final_directive: Directive,
    /// Original or remediated text.
    pub final_text: String,
    /// Confidence in [0.0, 1.0], rounded to two decimals.
    pub confidence: f64,
    /// Verdicts in rule evaluation order.
    pub verdicts: Vec<Verdict>,
}

/// Where the pipeline decision was finalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Input,
    Output,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::Input => write!(f, "input"),
            Stage::Output => write!(f, "output"),
        }
    }
}

/// Coarse status of a pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PipelineStatus {
    Ok,
    Blocked,
}

impl std::fmt::Display for PipelineStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelineStatus::Ok => write!(f, "OK"),
            PipelineStatus::Blocked => write!(f, "BLOCKED"),
        }
    }
}

/// Top-level output of one guarded pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PipelineResult {
    /// Identifier used to correlate log lines of one run.
    pub run_id: Uuid,
    pub stage: Stage,
    pub final_directive: Directive,
    pub confidence: f64,
    /// Released text. Absent whenever the run was blocked.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_text: Option<String>,
    /// Verdicts of the stage that finalized the decision.
    pub verdicts: Vec<Verdict>,
}

impl PipelineResult {
    /// Result for input that was blocked before reaching the backend.
    pub fn input_blocked(run_id: Uuid, verdicts: Vec<Verdict>) -> Self {
        Self {
            run_id,
            stage: Stage::Input,
            final_directive: Directive::Block,
            confidence: 0.0,
            response_text: None,
            verdicts,
        }
    }

    pub fn status(&self) -> PipelineStatus {
        if self.final_directive.is_block() {
            PipelineStatus::Blocked
        } else {
            PipelineStatus::Ok
        }
    }

    /// Human-readable message for blocked runs.
    pub fn message(&self) -> Option<String> {
        match (self.status(), self.stage) {
            (PipelineStatus::Blocked, Stage::Input) => {
                Some("Input blocked by safety guardrails".to_string())
            }
            (PipelineStatus::Blocked, Stage::Output) => {
                Some("Output blocked by safety guardrails".to_string())
            }
            (PipelineStatus::Ok, _) => None,
        }
    }
}
