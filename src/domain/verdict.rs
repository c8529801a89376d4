//! Verdict-related domain types.
//!
//! A verdict is the outcome of one rule evaluating one block of text.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Whether a rule found a problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Outcome {
    /// Nothing of concern was found.
    Pass,
    /// Something questionable was found.
    Warning,
    /// The text violates the rule.
    Failure,
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Pass => write!(f, "PASS"),
            Outcome::Warning => write!(f, "WARNING"),
            Outcome::Failure => write!(f, "FAILURE"),
        }
    }
}

/// Severity of a finding. Informational only; control flow uses [`Directive`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Low => write!(f, "LOW"),
            Severity::Medium => write!(f, "MEDIUM"),
            Severity::High => write!(f, "HIGH"),
            Severity::Critical => write!(f, "CRITICAL"),
        }
    }
}

/// What the pipeline should do with the text.
///
/// Directives are totally ordered: `Block > Rewrite > Warn > Allow`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Directive {
    /// Let the text through unchanged.
    Allow,
    /// Let the text through with a disclaimer.
    Warn,
    /// Soften the text before releasing it.
    Rewrite,
    /// Stop processing.
    Block,
}

impl Directive {
    /// Resolution priority. Higher wins.
    pub fn priority(self) -> u8 {
        match self {
            Directive::Allow => 1,
            Directive::Warn => 2,
            Directive::Rewrite => 3,
            Directive::Block => 4,
        }
    }

    /// Amount subtracted from the aggregate confidence for one verdict
    /// carrying this directive.
    pub fn confidence_penalty(self) -> f64 {
        match self {
            Directive::Allow => 0.0,
            Directive::Warn => 0.2,
            Directive::Rewrite => 0.4,
            Directive::Block => 1.0,
        }
    }

    /// Whether the text must be remediated before release.
    pub fn requires_remediation(self) -> bool {
        match self {
            Directive::Warn | Directive::Rewrite => true,
            Directive::Allow | Directive::Block => false,
        }
    }

    pub fn is_block(self) -> bool {
        matches!(self, Directive::Block)
    }
}

impl PartialOrd for Directive {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Directive {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.priority().cmp(&other.priority())
    }
}

impl std::fmt::Display for Directive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Directive::Allow => write!(f, "ALLOW"),
            Directive::Warn => write!(f, "WARN"),
            Directive::Rewrite => write!(f, "REWRITE"),
            Directive::Block => write!(f, "BLOCK"),
        }
    }
}

impl std::str::FromStr for Directive {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "ALLOW" => Ok(Directive::Allow),
            "WARN" => Ok(Directive::Warn),
            "REWRITE" => Ok(Directive::Rewrite),
            "BLOCK" => Ok(Directive::Block),
            _ => Err(format!("Unknown directive: {}", s)),
        }
    }
}

/// Result of one rule evaluating one text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Verdict {
    /// Identifier of the rule that produced this verdict.
    pub rule_identifier: String,
    pub outcome: Outcome,
    pub severity: Severity,
    pub directive: Directive,
    /// Human-readable explanation.
    pub explanation: String,
    /// Structured supporting data, e.g. the matched pattern.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub evidence: Option<serde_json::Value>,
}

impl Verdict {
    /// Create a verdict without evidence.
    pub fn new(
        rule_identifier: impl Into<String>,
        outcome: Outcome,
        severity: Severity,
        directive: Directive,
        explanation: impl Into<String>,
    ) -> Self {
        Self {
            rule_identifier: rule_identifier.into(),
            outcome,
            severity,
            directive,
            explanation: explanation.into(),
            evidence: None,
        }
    }

    /// A clean PASS/LOW/ALLOW verdict.
    pub fn allow(rule_identifier: impl Into<String>, explanation: impl Into<String>) -> Self {
        Self::new(
            rule_identifier,
            Outcome::Pass,
            Severity::Low,
            Directive::Allow,
            explanation,
        )
    }

    /// A FAILURE/CRITICAL/BLOCK verdict.
    pub fn block(rule_identifier: impl Into<String>, explanation: impl Into<String>) -> Self {
        Self::new(
            rule_identifier,
            Outcome::Failure,
            Severity::Critical,
            Directive::Block,
            explanation,
        )
    }

    /// Attach structured evidence.
    pub fn with_evidence(mut self, evidence: serde_json::Value) -> Self {
        self.evidence = Some(evidence);
        self
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Verdict(rule_identifier='{}', outcome={}, severity={}, directive={}, explanation='{}'",
            self.rule_identifier, self.outcome, self.severity, self.directive, self.explanation
        )?;
        match &self.evidence {
            Some(evidence) => write!(f, ", evidence={})", evidence),
            None => write!(f, ", evidence=None)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directive_ordering() {
        assert!(Directive::Block > Directive::Rewrite);
        assert!(Directive::Rewrite > Directive::Warn);
        assert!(Directive::Warn > Directive::Allow);
        assert_eq!(
            [Directive::Warn, Directive::Block, Directive::Allow].iter().max(),
            Some(&Directive::Block)
        );
    }

    #[test]
    fn test_directive_serialization() {
        let json = serde_json::to_string(&Directive::Rewrite).unwrap();
        assert_eq!(json, "\"REWRITE\"");
        assert_eq!("block".parse::<Directive>().unwrap(), Directive::Block);
        assert!("deny".parse::<Directive>().is_err());
    }

    #[test]
    fn test_verdict_display_names_all_fields() {
        let verdict = Verdict::block("injection", "Prompt injection attempt detected")
            .with_evidence(serde_json::json!({"matched_pattern": "jailbreak"}));

        let rendered = verdict.to_string();
        assert!(rendered.contains("rule_identifier='injection'"));
        assert!(rendered.contains("outcome=FAILURE"));
        assert!(rendered.contains("severity=CRITICAL"));
        assert!(rendered.contains("directive=BLOCK"));
        assert!(rendered.contains("jailbreak"));
    }

    #[test]
    fn test_allow_verdict_has_no_evidence() {
        let verdict = Verdict::allow("safety", "No unsafe content detected");
        assert_eq!(verdict.directive, Directive::Allow);
        assert_eq!(verdict.outcome, Outcome::Pass);
        assert!(verdict.to_string().ends_with("evidence=None)"));
    }
}
