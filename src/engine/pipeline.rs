//! Guarded Pipeline - screens a prompt, calls the backend, screens the
//! response.
//!
//! Run order:
//! 1. Input rules over the raw prompt. BLOCK stops here.
//! 2. One backend call with the original prompt.
//! 3. Output rules over the raw backend response.

use uuid::Uuid;

use crate::domain::{PipelineResult, Stage};
use crate::engine::backend::Backend;
use crate::engine::rule::{Phase, Rule, RuleContext};
use crate::engine::ruleset::RuleSetEvaluator;
use crate::error::GuardrailResult;

/// Orchestrates the input and output rule sets around one backend call.
pub struct GuardedPipeline {
    input: RuleSetEvaluator,
    output: RuleSetEvaluator,
    backend: Box<dyn Backend>,
}

impl GuardedPipeline {
    /// Create a pipeline. Rules and backend are fixed for its lifetime.
    pub fn new(
        input_rules: Vec<Box<dyn Rule>>,
        output_rules: Vec<Box<dyn Rule>>,
        backend: Box<dyn Backend>,
    ) -> Self {
        let input = RuleSetEvaluator::new(Phase::Input, input_rules);
        let output = RuleSetEvaluator::new(Phase::Output, output_rules);
        if input.is_empty() && output.is_empty() {
            tracing::warn!("Pipeline has no rules, every run will be allowed");
        }

        Self {
            input,
            output,
            backend,
        }
    }

    /// Number of configured (input, output) rules.
    pub fn rule_counts(&self) -> (usize, usize) {
        (self.input.len(), self.output.len())
    }

    /// Run the full input → backend → output pipeline.
    ///
    /// Backend failures are returned as errors, never as an ALLOW result.
    pub fn run(
        &self,
        prompt: &str,
        context: Option<&RuleContext>,
    ) -> GuardrailResult<PipelineResult> {
        let run_id = Uuid::new_v4();

        // Stage 1: input rules
        let input_eval = self.input.evaluate_set(prompt, context);
        tracing::info!(
            run_id = %run_id,
            stage = %Stage::Input,
            final_directive = %input_eval.final_directive,
            confidence = input_eval.confidence,
            "Input evaluation complete"
        );

        if input_eval.final_directive.is_block() {
            return Ok(PipelineResult::input_blocked(run_id, input_eval.verdicts));
        }

        // Stage 2: backend call with the original prompt. Any input-stage
        // remediation is discarded.
        let raw_output = self.backend.generate(prompt).map_err(|e| {
            tracing::warn!(run_id = %run_id, error = %e, "Backend call failed");
            e
        })?;

        // Stage 3: output rules
        let output_eval = self.output.evaluate_set(&raw_output, context);
        tracing::info!(
            run_id = %run_id,
            stage = %Stage::Output,
            final_directive = %output_eval.final_directive,
            confidence = output_eval.confidence,
            "Output evaluation complete"
        );

        // Blocked output is withheld, same as blocked input.
        let response_text = if output_eval.final_directive.is_block() {
            None
        } else {
            Some(output_eval.final_text)
        };

        Ok(PipelineResult {
            run_id,
            stage: Stage::Output,
            final_directive: output_eval.final_directive,
            confidence: output_eval.confidence,
            response_text,
            verdicts: output_eval.verdicts,
        })
    }
}
