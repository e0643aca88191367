use serde::{Deserialize, Serialize};

/// Field requested next by the agent hand-off interview.
///
/// Variants are declared in the fixed forward order of the interview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandoffStep {
    System,
    Problem,
    TailNumber,
    Error,
    FlightPhase,
    Location,
    Done,
}

impl HandoffStep {
    /// All steps in forward order.
    pub const ORDER: [HandoffStep; 7] = [
        Self::System,
        Self::Problem,
        Self::TailNumber,
        Self::Error,
        Self::FlightPhase,
        Self::Location,
        Self::Done,
    ];

    /// The following step; `Done` is terminal.
    pub fn next(self) -> Self {
        match self {
            Self::System => Self::Problem,
            Self::Problem => Self::TailNumber,
            Self::TailNumber => Self::Error,
            Self::Error => Self::FlightPhase,
            Self::FlightPhase => Self::Location,
            Self::Location | Self::Done => Self::Done,
        }
    }
}

/// Active top-level sub-dialogue of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "flow", rename_all = "snake_case")]
pub enum Flow {
    /// Regular question answering.
    #[default]
    Normal,
    /// Waiting for a yes/no answer to the satisfaction survey.
    InSurvey,
    /// Gathering incident details for a human specialist.
    CollectingHandoff { step: HandoffStep },
}

impl Flow {
    /// Current hand-off step, only while the interview is active.
    pub fn handoff_step(&self) -> Option<HandoffStep> {
        match self {
            Self::CollectingHandoff { step } => Some(*step),
            _ => None,
        }
    }
}
