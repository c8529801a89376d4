//! Evaluation engine for Guardrail Core.
//!
//! This module contains the guarded pipeline and its building blocks:
//! - Rule: contract every detection check implements
//! - Rule Set Evaluator: resolves verdicts into one decision and confidence
//! - Remediation: disclaimer and softening for WARN / REWRITE results
//! - Detection rules: injection, unsafe content, hallucination signals
//! - Backend: the text-generation collaborator
//! - Guarded Pipeline: input rules → backend → output rules

mod backend;
mod hallucination;
mod injection;
mod patterns;
mod pipeline;
mod remediation;
mod rule;
mod ruleset;
mod safety;

pub use backend::*;
pub use hallucination::*;
pub use injection::*;
pub use patterns::*;
pub use pipeline::*;
pub use remediation::*;
pub use rule::*;
pub use ruleset::*;
pub use safety::*;

use crate::config::RulesConfig;
use crate::error::GuardrailResult;

/// Compile one configured pattern table.
fn compile_table(table: &'static str, patterns: &[String]) -> GuardrailResult<PatternSet> {
    let set = PatternSet::compile(patterns)?;
    if set.is_empty() {
        tracing::warn!(table, "Pattern table is empty, its signal never fires");
    } else {
        tracing::debug!(table, patterns = set.len(), "Pattern table compiled");
    }
    Ok(set)
}

/// Build the input rules described by the configuration.
pub fn input_rules(config: &RulesConfig) -> GuardrailResult<Vec<Box<dyn Rule>>> {
    let injection = compile_table("injection_patterns", &config.injection_patterns)?;
    let unsafe_content = compile_table("unsafe_patterns", &config.unsafe_patterns)?;

    let rules: Vec<Box<dyn Rule>> = vec![
        Box::new(InjectionRule::new(injection)),
        Box::new(SafetyPolicyRule::new(unsafe_content)),
    ];
    Ok(rules)
}

/// Build the output rules described by the configuration.
pub fn output_rules(config: &RulesConfig) -> GuardrailResult<Vec<Box<dyn Rule>>> {
    let hallucination = HallucinationRule::new(
        compile_table("absolute_claim_patterns", &config.absolute_claim_patterns)?,
        compile_table("citation_patterns", &config.citation_patterns)?,
        compile_table("statistic_patterns", &config.statistic_patterns)?,
    )
    .with_thresholds(config.rewrite_threshold, config.warn_threshold);

    let rules: Vec<Box<dyn Rule>> = vec![Box::new(hallucination)];
    Ok(rules)
}
