//! Rule contract - the capability every detection check implements.
//!
//! Rules are stateless and shared across concurrent pipeline runs, so
//! implementations must be `Send + Sync` and must not mutate themselves
//! during evaluation.

use crate::domain::Verdict;

/// Optional caller-supplied context shared by every rule in one evaluation.
pub type RuleContext = serde_json::Map<String, serde_json::Value>;

/// Evaluation phase a rule is intended for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Screens user text before it reaches the backend.
    Input,
    /// Screens backend text before it reaches the user.
    Output,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Input => write!(f, "input"),
            Phase::Output => write!(f, "output"),
        }
    }
}

/// Trait for detection rules.
///
/// `evaluate` must be a pure function of its inputs and must always return
/// exactly one verdict. "Nothing found" is an ALLOW verdict, never an error.
pub trait Rule: Send + Sync {
    /// Identifier reported in every verdict this rule produces.
    fn identifier(&self) -> &str;

    /// Phase this rule is designed for.
    fn phase(&self) -> Phase;

    /// Evaluate one block of text.
    fn evaluate(&self, text: &str, context: Option<&RuleContext>) -> Verdict;
}
