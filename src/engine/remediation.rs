//! Text remediation applied to WARN and REWRITE results.
//!
//! Remediation wraps the text in a disclaimer and a verification suffix and
//! softens absolute language. Substitution is plain, case-sensitive and
//! applied in table order. Applying it twice is not idempotent: a softened
//! word may itself contain a trigger ("not guaranteed").

use crate::domain::Directive;

/// Disclaimer prefixed to remediated text.
pub const DISCLAIMER: &str = "Note: I may be mistaken, but based on general knowledge:\n\n";

/// Suffix appended to remediated text.
pub const VERIFICATION_SUFFIX: &str =
    "\n\nIt's a good idea to verify this information using reliable or official sources.";

/// Absolute-language substitutions, in application order.
pub const SOFTENING_TABLE: &[(&str, &str)] = &[
    ("definitely", "likely"),
    ("always", "often"),
    ("never", "rarely"),
    ("100%", "very likely"),
    ("guaranteed", "not guaranteed"),
];

/// Applies disclaimer, softening and verification suffix.
#[derive(Debug, Clone)]
pub struct Remediator {
    disclaimer: &'static str,
    suffix: &'static str,
    substitutions: &'static [(&'static str, &'static str)],
}

impl Default for Remediator {
    fn default() -> Self {
        Self {
            disclaimer: DISCLAIMER,
            suffix: VERIFICATION_SUFFIX,
            substitutions: SOFTENING_TABLE,
        }
    }
}

impl Remediator {
    /// Produce the released text for a resolved directive.
    ///
    /// ALLOW and BLOCK leave the text untouched.
    pub fn apply(&self, text: &str, directive: Directive) -> String {
        if !directive.requires_remediation() {
            return text.to_string();
        }

        let mut remediated =
            String::with_capacity(self.disclaimer.len() + text.len() + self.suffix.len());
        remediated.push_str(self.disclaimer);
        remediated.push_str(&self.soften(text));
        remediated.push_str(self.suffix);
        remediated
    }

    /// Replace absolute-language tokens with softer equivalents.
    pub fn soften(&self, text: &str) -> String {
        self.substitutions
            .iter()
            .fold(text.to_string(), |acc, (hard, soft)| acc.replace(hard, soft))
    }
}
