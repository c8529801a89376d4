//! Rule set evaluator - runs an ordered list of rules and reduces their
//! verdicts to one aggregate decision.

use std::panic::{self, AssertUnwindSafe};

use crate::domain::{AggregateResult, Directive, Verdict};
use crate::engine::remediation::Remediator;
use crate::engine::rule::{Phase, Rule, RuleContext};

/// Runs rules sequentially and resolves their verdicts.
pub struct RuleSetEvaluator {
    phase: Phase,
    rules: Vec<Box<dyn Rule>>,
    remediator: Remediator,
}

impl RuleSetEvaluator {
    /// Create an evaluator for the given phase.
    ///
    /// Rules built for the other phase are accepted but logged.
    pub fn new(phase: Phase, rules: Vec<Box<dyn Rule>>) -> Self {
        for rule in rules.iter().filter(|r| r.phase() != phase) {
            tracing::warn!(
                rule = rule.identifier(),
                rule_phase = %rule.phase(),
                placed_in = %phase,
                "Rule placed in a different phase than it was designed for"
            );
        }

        Self {
            phase,
            rules,
            remediator: Remediator::default(),
        }
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Run every rule over `text` and reduce the verdicts.
    ///
    /// All rules run to completion on every call. Verdicts keep rule order.
    pub fn evaluate_set(&self, text: &str, context: Option<&RuleContext>) -> AggregateResult {
        let verdicts: Vec<Verdict> = self
            .rules
            .iter()
            .map(|rule| self.run_rule(rule.as_ref(), text, context))
            .collect();

        let final_directive = resolve_directive(&verdicts);
        let confidence = compute_confidence(&verdicts);
        let final_text = self.remediator.apply(text, final_directive);

        tracing::debug!(
            phase = %self.phase,
            rule_count = verdicts.len(),
            final_directive = %final_directive,
            confidence,
            "Rule set evaluation complete"
        );

        AggregateResult {
            final_directive,
            final_text,
            confidence,
            verdicts,
        }
    }

    /// Run one rule, converting a panic into a diagnostic ALLOW verdict.
    fn run_rule(&self, rule: &dyn Rule, text: &str, context: Option<&RuleContext>) -> Verdict {
        match panic::catch_unwind(AssertUnwindSafe(|| rule.evaluate(text, context))) {
            Ok(verdict) => {
                tracing::debug!(
                    phase = %self.phase,
                    rule = rule.identifier(),
                    directive = %verdict.directive,
                    outcome = %verdict.outcome,
                    "Rule evaluated"
                );
                verdict
            }
            Err(payload) => {
                let reason = panic_reason(payload.as_ref());
                tracing::warn!(
                    phase = %self.phase,
                    rule = rule.identifier(),
                    error = %reason,
                    "Rule evaluation failed, treating as allow"
                );
                Verdict::allow(
                    rule.identifier(),
                    format!("Rule could not be evaluated: {}", reason),
                )
                .with_evidence(serde_json::json!({ "fault": reason }))
            }
        }
    }
}

/// Highest-priority directive, or ALLOW for no verdicts.
pub fn resolve_directive(verdicts: &[Verdict]) -> Directive {
    verdicts
        .iter()
        .map(|v| v.directive)
        .max()
        .unwrap_or(Directive::Allow)
}

/// 1.0 minus the summed penalty of every verdict, clamped at 0.0 and
/// rounded to two decimals.
pub fn compute_confidence(verdicts: &[Verdict]) -> f64 {
    let penalty: f64 = verdicts
        .iter()
        .map(|v| v.directive.confidence_penalty())
        .sum();
    let confidence = ((1.0 - penalty) * 100.0).round() / 100.0;
    confidence.max(0.0)
}

fn panic_reason(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
