//! Hallucination signal scoring for model output.
//!
//! Output-phase rule that scores risk signals:
//! - absolute / overconfident language: +1 per pattern
//! - unverifiable citations: +2 per pattern
//! - statistics without a source: +1 per pattern
//!
//! A score at or above the rewrite threshold asks for a rewrite, a score at
//! or above the warn threshold asks for a disclaimer.

use crate::domain::{Directive, Outcome, Severity, Verdict};
use crate::engine::patterns::{
    PatternSet, DEFAULT_ABSOLUTE_CLAIMS, DEFAULT_CITATIONS, DEFAULT_STATISTICS,
};
use crate::engine::rule::{Phase, Rule, RuleContext};

const ABSOLUTE_CLAIM_WEIGHT: u32 = 1;
const CITATION_WEIGHT: u32 = 2;
const STATISTIC_WEIGHT: u32 = 1;

pub const DEFAULT_REWRITE_THRESHOLD: u32 = 3;
pub const DEFAULT_WARN_THRESHOLD: u32 = 1;

/// Scores model output for hallucination risk.
#[derive(Debug, Clone)]
pub struct HallucinationRule {
    name: String,
    absolute_claims: PatternSet,
    citations: PatternSet,
    statistics: PatternSet,
    rewrite_threshold: u32,
    warn_threshold: u32,
}

impl HallucinationRule {
    pub const IDENTIFIER: &'static str = "HallucinationDetectionRule";

    pub fn new(absolute_claims: PatternSet, citations: PatternSet, statistics: PatternSet) -> Self {
        Self {
            name: Self::IDENTIFIER.to_string(),
            absolute_claims,
            citations,
            statistics,
            rewrite_threshold: DEFAULT_REWRITE_THRESHOLD,
            warn_threshold: DEFAULT_WARN_THRESHOLD,
        }
    }

    /// Give this instance its own identifier in verdicts.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_thresholds(mut self, rewrite_threshold: u32, warn_threshold: u32) -> Self {
        self.rewrite_threshold = rewrite_threshold;
        self.warn_threshold = warn_threshold;
        self
    }

    /// Total risk score and the reason for every signal that fired.
    fn score(&self, text: &str) -> (u32, Vec<String>) {
        let mut score = 0;
        let mut reasons = Vec::new();

        for pattern in self.absolute_claims.matching(text) {
            score += ABSOLUTE_CLAIM_WEIGHT;
            reasons.push(format!("Absolute claim detected ({})", pattern));
        }
        for _ in self.citations.matching(text) {
            score += CITATION_WEIGHT;
            reasons.push("Unverifiable citation detected".to_string());
        }
        for _ in self.statistics.matching(text) {
            score += STATISTIC_WEIGHT;
            reasons.push("Statistic mentioned without source".to_string());
        }

        (score, reasons)
    }
}

impl Default for HallucinationRule {
    fn default() -> Self {
        Self::new(
            DEFAULT_ABSOLUTE_CLAIMS.clone(),
            DEFAULT_CITATIONS.clone(),
            DEFAULT_STATISTICS.clone(),
        )
    }
}

impl Rule for HallucinationRule {
    fn identifier(&self) -> &str {
        &self.name
    }

    fn phase(&self) -> Phase {
        Phase::Output
    }

    fn evaluate(&self, text: &str, _context: Option<&RuleContext>) -> Verdict {
        let (risk_score, reasons) = self.score(text);

        let (severity, directive, explanation) = if risk_score >= self.rewrite_threshold {
            (
                Severity::High,
                Directive::Rewrite,
                "High hallucination risk detected",
            )
        } else if risk_score >= self.warn_threshold {
            (
                Severity::Medium,
                Directive::Warn,
                "Moderate hallucination risk detected",
            )
        } else {
            return Verdict::allow(self.name.as_str(), "Low hallucination risk");
        };

        Verdict::new(
            self.name.as_str(),
            Outcome::Warning,
            severity,
            directive,
            explanation,
        )
        .with_evidence(serde_json::json!({
            "risk_score": risk_score,
            "reasons": reasons,
        }))
    }
}
