//! Per-session conversation context.

use std::collections::VecDeque;

use moc_protocol::{Flow, HandoffStep, Problem, System};
use serde::{Deserialize, Serialize};

use crate::extractor::Extraction;

/// Structured facts gathered so far in the conversation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slots {
    pub system: Option<System>,
    pub problem: Option<Problem>,
    pub tail_number: Option<String>,
    pub error_text: Option<String>,
    pub flight_phase: Option<String>,
    pub location: Option<String>,
}

impl Slots {
    /// Whether the slot asked for by a hand-off step is already filled.
    pub fn has(&self, step: HandoffStep) -> bool {
        match step {
            HandoffStep::System => self.system.is_some(),
            HandoffStep::Problem => self.problem.is_some(),
            HandoffStep::TailNumber => self.tail_number.is_some(),
            HandoffStep::Error => self.error_text.is_some(),
            HandoffStep::FlightPhase => self.flight_phase.is_some(),
            HandoffStep::Location => self.location.is_some(),
            HandoffStep::Done => true,
        }
    }
}

/// Most recent resolved topic, used for follow-up questions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "topic", content = "system", rename_all = "snake_case")]
pub enum Topic {
    Reset(System),
}

/// Mutable state of one session, owned by the [`crate::store::SessionStore`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionContext {
    pub slots: Slots,
    pub flow: Flow,
    /// Sticky: once set, the survey is never offered again in this session.
    pub survey_answered: bool,
    pub last_topic: Option<Topic>,
    /// Prior user utterances, oldest first.
    pub history: VecDeque<String>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fill slots from an extraction. A missing value never erases a known one.
    /// A new system or problem ends any pending reset follow-up.
    pub fn merge(&mut self, extraction: &Extraction) {
        if extraction.system.is_some() || extraction.problem.is_some() {
            self.last_topic = None;
        }
        if let Some(system) = &extraction.system {
            self.slots.system = Some(system.clone());
        }
        if let Some(problem) = &extraction.problem {
            self.slots.problem = Some(problem.clone());
        }
        if let Some(tail) = &extraction.tail_number {
            self.slots.tail_number = Some(tail.clone());
        }
    }

    /// Forget the current topic: slots, flow and last topic.
    /// `survey_answered` and the utterance history survive.
    pub fn reset_topic(&mut self) {
        self.slots = Slots::default();
        self.flow = Flow::Normal;
        self.last_topic = None;
    }

    /// Record a user utterance, dropping the oldest beyond `limit`.
    pub fn push_history(&mut self, message: &str, limit: usize) {
        self.history.push_back(message.to_string());
        while self.history.len() > limit.max(2) {
            self.history.pop_front();
        }
    }

    /// The last two recorded utterances, most recent first.
    pub fn last_two_utterances(&self) -> (Option<&str>, Option<&str>) {
        let mut recent = self.history.iter().rev().map(String::as_str);
        (recent.next(), recent.next())
    }

    /// True before any utterance has been recorded.
    pub fn is_first_turn(&self) -> bool {
        self.history.is_empty()
    }
}
