//! Unsafe content policy.
//!
//! Input-phase rule that blocks requests for violence, weapons, illegal
//! activity or self-harm.

use crate::domain::Verdict;
use crate::engine::patterns::{PatternSet, DEFAULT_UNSAFE};
use crate::engine::rule::{Phase, Rule, RuleContext};

/// Blocks prompts asking for harmful content.
#[derive(Debug, Clone)]
pub struct SafetyPolicyRule {
    name: String,
    patterns: PatternSet,
}

impl SafetyPolicyRule {
    pub const IDENTIFIER: &'static str = "SafetyPolicyRule";

    pub fn new(patterns: PatternSet) -> Self {
        Self {
            name: Self::IDENTIFIER.to_string(),
            patterns,
        }
    }

    /// Give this instance its own identifier in verdicts.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

impl Default for SafetyPolicyRule {
    fn default() -> Self {
        Self::new(DEFAULT_UNSAFE.clone())
    }
}

impl Rule for SafetyPolicyRule {
    fn identifier(&self) -> &str {
        &self.name
    }

    fn phase(&self) -> Phase {
        Phase::Input
    }

    fn evaluate(&self, text: &str, _context: Option<&RuleContext>) -> Verdict {
        match self.patterns.first_match(text) {
            Some(pattern) => Verdict::block(
                self.name.as_str(),
                format!("Unsafe content detected: pattern '{}'", pattern),
            )
            .with_evidence(serde_json::json!({ "matched_pattern": pattern })),
            None => Verdict::allow(self.name.as_str(), "No unsafe content detected"),
        }
    }
}
