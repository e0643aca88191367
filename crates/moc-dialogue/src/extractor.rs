//! Text → slot extractor.
//!
//! Pure function of the input text and the fixed tables in [`crate::tables`]:
//! no session state, no randomness.

use std::sync::LazyLock;

use moc_protocol::{Problem, System};
use regex::Regex;

use crate::tables::{
    GENERIC_FAILURE_WORDS, INSPECTION_WORDS, PROBLEM_PHRASES, SYSTEM_KEYWORDS, matches_any,
};

// Tail-number spellings, in priority order. Input is upper-cased first.
static RE_TAIL_HYPHEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\bCC-[A-Z]{3}\b").unwrap());
static RE_TAIL_SPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\bCC\s+[A-Z]{3}\b").unwrap());
static RE_TAIL_BARE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\bCC[A-Z]{3}\b").unwrap());
static RE_WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Slots found in a single message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    pub system: Option<System>,
    pub problem: Option<Problem>,
    pub tail_number: Option<String>,
}

impl Extraction {
    /// Neither a system nor a problem was detected.
    pub fn is_unclassified(&self) -> bool {
        self.system.is_none() && self.problem.is_none()
    }
}

/// Classify a message into (system, problem, tail number).
pub fn extract(text: &str) -> Extraction {
    let lower = text.to_lowercase();
    let extraction = Extraction {
        system: detect_system(&lower),
        problem: detect_problem(&lower),
        tail_number: detect_tail_number(text),
    };
    tracing::debug!(
        system = ?extraction.system,
        problem = ?extraction.problem,
        tail_number = ?extraction.tail_number,
        "extraction"
    );
    extraction
}

/// First system whose keyword list matches, in table order.
pub fn detect_system(lower: &str) -> Option<System> {
    SYSTEM_KEYWORDS
        .iter()
        .find(|(_, keywords)| matches_any(lower, keywords))
        .map(|(system, _)| system.clone())
}

/// First problem whose phrase list matches, then the inspection and
/// generic-failure overrides.
pub fn detect_problem(lower: &str) -> Option<Problem> {
    let mut problem = PROBLEM_PHRASES
        .iter()
        .find(|(_, phrases)| matches_any(lower, phrases))
        .map(|(problem, _)| problem.clone());

    if matches_any(lower, INSPECTION_WORDS) {
        problem = Some(Problem::Inspect);
    }
    if problem.is_none() && matches_any(lower, GENERIC_FAILURE_WORDS) {
        problem = Some(Problem::NotWorking);
    }
    problem
}

/// Find a `CC-XXX` tail number, accepting `CC XXX` and `CCXXX` spellings.
pub fn detect_tail_number(text: &str) -> Option<String> {
    let upper = text.to_uppercase();

    if let Some(m) = RE_TAIL_HYPHEN.find(&upper) {
        return Some(m.as_str().to_string());
    }
    if let Some(m) = RE_TAIL_SPACE.find(&upper) {
        return Some(RE_WHITESPACE.replace(m.as_str(), "-").into_owned());
    }
    RE_TAIL_BARE
        .find(&upper)
        .map(|m| format!("{}-{}", &m.as_str()[..2], &m.as_str()[2..]))
}
