use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::slots::{Problem, System};

/// Answer given to the satisfaction survey.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurveyOutcome {
    Satisfied,
    Unsatisfied,
}

/// One processed message, handed to the stats sink after the turn completes.
///
/// Never read back by the dialogue controller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnRecord {
    /// Unique record ID (UUIDv7 for time-sortability).
    pub id: Uuid,
    /// Session / user identifier the message came from.
    pub user_id: String,
    /// Raw user message.
    pub message: String,
    /// Reply sent back to the user.
    pub response: String,
    /// Time spent processing the turn, in milliseconds.
    pub latency_ms: f64,
    /// System classified for this turn, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<System>,
    /// Problem classified for this turn, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub problem: Option<Problem>,
    /// Tail number known at the end of the turn.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tail_number: Option<String>,
    /// First message of its session.
    #[serde(default)]
    pub opens_conversation: bool,
    /// The user flagged the case as urgent.
    #[serde(default)]
    pub urgent: bool,
    /// A hand-off interview was completed in this turn.
    #[serde(default)]
    pub handoff: bool,
    /// The reply was an automated answer (procedure or canned answer).
    #[serde(default)]
    pub automated: bool,
    /// Survey answer given in this turn.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub survey: Option<SurveyOutcome>,
    /// When the turn finished.
    pub timestamp: DateTime<Utc>,
}

impl TurnRecord {
    pub fn new(
        user_id: impl Into<String>,
        message: impl Into<String>,
        response: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            user_id: user_id.into(),
            message: message.into(),
            response: response.into(),
            latency_ms: 0.0,
            system: None,
            problem: None,
            tail_number: None,
            opens_conversation: false,
            urgent: false,
            handoff: false,
            automated: false,
            survey: None,
            timestamp: Utc::now(),
        }
    }
}
