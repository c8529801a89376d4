//! Detection pattern tables shared by the built-in rules.
//!
//! Tables are plain strings so they can be overridden from configuration.
//! Every pattern is compiled case-insensitively.

use lazy_static::lazy_static;
use regex::{Regex, RegexBuilder};

/// Prompt injection phrases.
pub const INJECTION_PATTERNS: &[&str] = &[
    r"ignore\s+previous\s+instructions",
    r"forget\s+all\s+rules",
    r"you\s+are\s+now",
    r"act\s+as",
    r"system\s*:",
    r"developer\s*:",
    r"jailbreak",
    r"do\s+anything\s+now",
];

/// Requests for harmful content.
pub const UNSAFE_PATTERNS: &[&str] = &[
    // Violence / weapons
    r"make\s+a\s+bomb",
    r"build\s+a\s+gun",
    r"kill\s+someone",
    r"how\s+to\s+shoot",
    // Illegal activities
    r"hack\s+into",
    r"steal\s+credit\s+card",
    r"bypass\s+security",
    // Self-harm
    r"how\s+to\s+kill\s+myself",
    r"suicide\s+method",
];

/// Overconfident language.
pub const ABSOLUTE_CLAIM_PATTERNS: &[&str] = &[
    r"\balways\b",
    r"\bnever\b",
    r"\bdefinitely\b",
    r"\bguaranteed\b",
    r"\b100%\b",
];

/// Citations that cannot be verified.
pub const CITATION_PATTERNS: &[&str] = &[
    r"according to a study",
    r"research shows that",
    r"study from .* university",
    r"report from .* institute",
];

/// Statistics stated without a source.
pub const STATISTIC_PATTERNS: &[&str] = &[r"\d+(\.\d+)?%", r"\d+\s+million", r"\d+\s+billion"];

lazy_static! {
    pub static ref DEFAULT_INJECTION: PatternSet = PatternSet::compile(INJECTION_PATTERNS).unwrap();
    pub static ref DEFAULT_UNSAFE: PatternSet = PatternSet::compile(UNSAFE_PATTERNS).unwrap();
    pub static ref DEFAULT_ABSOLUTE_CLAIMS: PatternSet =
        PatternSet::compile(ABSOLUTE_CLAIM_PATTERNS).unwrap();
    pub static ref DEFAULT_CITATIONS: PatternSet = PatternSet::compile(CITATION_PATTERNS).unwrap();
    pub static ref DEFAULT_STATISTICS: PatternSet =
        PatternSet::compile(STATISTIC_PATTERNS).unwrap();
}

/// An ordered list of compiled patterns that remembers their source text.
#[derive(Debug, Clone)]
pub struct PatternSet {
    patterns: Vec<(String, Regex)>,
}

impl PatternSet {
    /// Compile every pattern case-insensitively.
    pub fn compile<S: AsRef<str>>(patterns: &[S]) -> Result<Self, regex::Error> {
        let patterns = patterns
            .iter()
            .map(|p| {
                let source = p.as_ref();
                RegexBuilder::new(source)
                    .case_insensitive(true)
                    .build()
                    .map(|re| (source.to_string(), re))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { patterns })
    }

    /// Source of the first pattern (in table order) found in `text`.
    pub fn first_match(&self, text: &str) -> Option<&str> {
        self.patterns
            .iter()
            .find(|(_, re)| re.is_match(text))
            .map(|(source, _)| source.as_str())
    }

    /// Sources of every pattern found in `text`, in table order.
    pub fn matching<'a>(&'a self, text: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.patterns
            .iter()
            .filter(move |(_, re)| re.is_match(text))
            .map(|(source, _)| source.as_str())
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}
