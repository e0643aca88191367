//! Manual knowledge table: (system, problem) → manual sections.
//!
//! The table is produced offline from the maintenance manual and only read
//! by the dialogue engine. An absent table behaves as an empty one.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::LazyLock;

use moc_protocol::{Problem, System};
use regex::Regex;

use crate::error::DialogueResult;
use crate::tables::{PROBLEM_PHRASES, SYSTEM_KEYWORDS, matches_any};

static RE_PARAGRAPH_BREAK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n\s*\n").unwrap());

/// Read access to pre-built manual knowledge.
pub trait KnowledgeLookup: Send + Sync {
    /// Manual text for the pair, or `None` when the table has nothing.
    fn lookup(&self, system: &System, problem: &Problem) -> DialogueResult<Option<String>>;
}

/// Knowledge table keyed by system tag, then problem tag.
#[derive(Debug, Clone, Default)]
pub struct ManualKnowledge {
    table: BTreeMap<String, BTreeMap<String, Vec<String>>>,
}

impl ManualKnowledge {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load a JSON table `{ "APU": { "NO_ARRANCA": ["..."] } }`.
    pub fn load(path: impl AsRef<Path>) -> DialogueResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let table = serde_json::from_str(&contents)?;
        Ok(Self { table })
    }

    /// Load the table, falling back to an empty one when it is missing or invalid.
    pub fn load_or_empty(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(knowledge) => {
                tracing::info!(path = %path.display(), sections = knowledge.len(), "knowledge table loaded");
                knowledge
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "knowledge table unavailable, using canned answers only");
                Self::empty()
            }
        }
    }

    /// Classify plain-text manual content into the table.
    ///
    /// Paragraphs are separated by blank lines. A paragraph mentioning at
    /// least one system and one problem is filed under every matching pair.
    pub fn from_manual_text(text: &str) -> Self {
        let mut knowledge = Self::empty();
        for paragraph in RE_PARAGRAPH_BREAK.split(text) {
            let section = paragraph.trim();
            if section.is_empty() {
                continue;
            }
            let lower = section.to_lowercase();
            let systems: Vec<&System> = SYSTEM_KEYWORDS
                .iter()
                .filter(|(_, keywords)| matches_any(&lower, keywords))
                .map(|(system, _)| system)
                .collect();
            let problems: Vec<&Problem> = PROBLEM_PHRASES
                .iter()
                .filter(|(_, phrases)| matches_any(&lower, phrases))
                .map(|(problem, _)| problem)
                .collect();

            for system in &systems {
                for problem in &problems {
                    knowledge.insert(system, problem, section);
                }
            }
        }
        knowledge
    }

    /// Append a section under (system, problem).
    pub fn insert(&mut self, system: &System, problem: &Problem, section: impl Into<String>) {
        self.table
            .entry(system.tag().to_string())
            .or_default()
            .entry(problem.tag().to_string())
            .or_default()
            .push(section.into());
    }

    /// All sections filed under (system, problem).
    pub fn sections(&self, system: &System, problem: &Problem) -> &[String] {
        self.table
            .get(system.tag())
            .and_then(|problems| problems.get(problem.tag()))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Total number of stored sections.
    pub fn len(&self) -> usize {
        self.table
            .values()
            .flat_map(BTreeMap::values)
            .map(Vec::len)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Write the table as pretty JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> DialogueResult<()> {
        let json = serde_json::to_string_pretty(&self.table)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

impl KnowledgeLookup for ManualKnowledge {
    fn lookup(&self, system: &System, problem: &Problem) -> DialogueResult<Option<String>> {
        Ok(self.sections(system, problem).first().cloned())
    }
}
