use std::fmt;

use serde::{Deserialize, Serialize};

/// Aircraft subsystem a conversation is about.
///
/// Serialized as its upper-case tag (`"APU"`, `"TREN"`, ...). `Other` carries
/// free text reported during the hand-off interview when extraction fails.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum System {
    /// APU: auxiliary power unit.
    Apu,
    /// MOTOR: engines / powerplant.
    Engine,
    /// TREN: landing gear.
    LandingGear,
    /// HIDRAULICO: hydraulic system.
    Hydraulic,
    /// ELECTRICO: electrical system.
    Electrical,
    /// CABINA: cockpit, panels and instruments.
    Cabin,
    /// GALLEY: galley and catering equipment.
    Galley,
    /// Unrecognized system as typed by the user (upper-cased).
    Other(String),
}

impl System {
    /// Wire tag used in stats, knowledge tables and hand-off summaries.
    pub fn tag(&self) -> &str {
        match self {
            Self::Apu => "APU",
            Self::Engine => "MOTOR",
            Self::LandingGear => "TREN",
            Self::Hydraulic => "HIDRAULICO",
            Self::Electrical => "ELECTRICO",
            Self::Cabin => "CABINA",
            Self::Galley => "GALLEY",
            Self::Other(s) => s,
        }
    }

    /// Human-readable name used inside replies.
    pub fn label(&self) -> &str {
        match self {
            Self::Apu => "APU",
            Self::Engine => "engine",
            Self::LandingGear => "landing gear",
            Self::Hydraulic => "hydraulic system",
            Self::Electrical => "electrical system",
            Self::Cabin => "cockpit",
            Self::Galley => "galley",
            Self::Other(s) => s,
        }
    }

    /// Parse a wire tag. Unknown tags become `Other`.
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_uppercase().as_str() {
            "APU" => Self::Apu,
            "MOTOR" => Self::Engine,
            "TREN" => Self::LandingGear,
            "HIDRAULICO" => Self::Hydraulic,
            "ELECTRICO" => Self::Electrical,
            "CABINA" => Self::Cabin,
            "GALLEY" => Self::Galley,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for System {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl From<String> for System {
    fn from(s: String) -> Self {
        Self::from_tag(&s)
    }
}

impl From<System> for String {
    fn from(s: System) -> Self {
        s.tag().to_string()
    }
}

/// Problem category reported for a system.
///
/// Serialized as its tag (`"NO_ARRANCA"`, `"REVISAR"`, ...). `Other` keeps a
/// verbatim description collected during the hand-off interview.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Problem {
    /// NO_ARRANCA: does not start.
    NoStart,
    /// NO_FUNCIONA: not working / inoperative.
    NotWorking,
    /// ERROR: warning, caution or error indication.
    Error,
    /// REVISAR: inspect / verify request.
    Inspect,
    /// RESET: reset or restart request.
    Reset,
    /// Free-text description as typed by the user.
    Other(String),
}

impl Problem {
    pub fn tag(&self) -> &str {
        match self {
            Self::NoStart => "NO_ARRANCA",
            Self::NotWorking => "NO_FUNCIONA",
            Self::Error => "ERROR",
            Self::Inspect => "REVISAR",
            Self::Reset => "RESET",
            Self::Other(s) => s,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::NoStart => "does not start",
            Self::NotWorking => "not working",
            Self::Error => "error indication",
            Self::Inspect => "inspection",
            Self::Reset => "reset",
            Self::Other(s) => s,
        }
    }

    /// Parse a wire tag. Unknown tags are kept verbatim as `Other`.
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim() {
            "NO_ARRANCA" => Self::NoStart,
            "NO_FUNCIONA" => Self::NotWorking,
            "ERROR" => Self::Error,
            "REVISAR" => Self::Inspect,
            "RESET" => Self::Reset,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl From<String> for Problem {
    fn from(s: String) -> Self {
        Self::from_tag(&s)
    }
}

impl From<Problem> for String {
    fn from(p: Problem) -> Self {
        p.tag().to_string()
    }
}
