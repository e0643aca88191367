//! Keyword and phrase tables driving extraction and the dialogue cascade.
//!
//! Order inside the system and problem tables is significant: the first
//! entry with a matching keyword wins. Bump [`TABLES_VERSION`] whenever a
//! table changes meaning.

use moc_protocol::{Problem, System};

pub const TABLES_VERSION: u32 = 3;

/// Ordered (system, keywords) table.
pub const SYSTEM_KEYWORDS: &[(System, &[&str])] = &[
    (System::Apu, &["apu", "auxiliary power unit", "unidad auxiliar"]),
    (System::Engine, &["motor", "engine", "turbina", "propulsor"]),
    (
        System::LandingGear,
        &["tren", "landing gear", "ruedas", "aterrizaje", "landing"],
    ),
    (
        System::Hydraulic,
        &["hidraulico", "hidráulico", "hydraulic", "fluido"],
    ),
    (
        System::Electrical,
        &["electrico", "eléctrico", "electric", "sistema eléctrico"],
    ),
    (
        System::Cabin,
        &["cabina", "cockpit", "panel", "instrumentos", "instruments"],
    ),
    (System::Galley, &["galley", "cocina", "catering"]),
];

/// Ordered (problem, phrases) table.
pub const PROBLEM_PHRASES: &[(Problem, &[&str])] = &[
    (
        Problem::NoStart,
        &[
            "no arranca",
            "no enciende",
            "no prende",
            "won't start",
            "wont start",
            "doesn't start",
            "does not start",
            "will not start",
            "not starting",
            "no start",
            "failed to start",
            "fails to start",
        ],
    ),
    (
        Problem::NotWorking,
        &[
            "no funciona",
            "no opera",
            "inoperativo",
            "falla",
            "fallo",
            "not working",
            "doesn't work",
            "does not work",
            "inoperative",
            "malfunction",
            "broken",
        ],
    ),
    (
        Problem::Error,
        &[
            "error",
            "warning",
            "alerta",
            "alert",
            "mensaje",
            "message",
            "indicador",
            "caution",
            "luz",
        ],
    ),
    (
        Problem::Inspect,
        &[
            "revisar",
            "verificar",
            "check",
            "inspeccionar",
            "comprobar",
            "verificación",
            "inspect",
            "verify",
        ],
    ),
    (
        Problem::Reset,
        &["reset", "reinicio", "reiniciar", "resetear", "restart"],
    ),
];

/// Forces the problem to `REVISAR` whenever present.
pub const INSPECTION_WORDS: &[&str] = &["check", "verify", "inspect", "verificar", "revisar"];

/// Fallback to `NO_FUNCIONA` when no other problem was found.
pub const GENERIC_FAILURE_WORDS: &[&str] = &["problem", "issue", "fault", "problema", "falla"];

/// Farewell replies that only count when they are the whole message.
pub const FAREWELL_EXACT: &[&str] = &["no", "n", "nope"];

/// Farewell / "nothing else" phrases, matched as whole words anywhere.
pub const FAREWELL_PHRASES: &[&str] = &[
    "no thanks",
    "no thank you",
    "nothing else",
    "nothing more",
    "that's all",
    "thats all",
    "that is all",
    "that's it",
    "all done",
    "thanks",
    "thank you",
    "goodbye",
    "bye",
    "no gracias",
    "no necesito más ayuda",
    "no hay más",
    "no hay nada más",
    "no hay nada mas",
    "nada más",
    "nada mas",
    "es todo",
    "eso es todo",
    "eso sería todo",
    "listo",
    "terminamos",
    "gracias",
    "muchas gracias",
];

/// Whole-message keywords requesting a human agent.
pub const AGENT_KEYWORDS: &[&str] = &["agent", "agente"];

/// Substrings requesting contact with a human agent.
pub const AGENT_REQUEST_PHRASES: &[&str] = &[
    "contact",
    "talk to agent",
    "talk to an agent",
    "hablar con agente",
    "hablar con un agente",
];

/// Whole-message commands starting a new inquiry.
pub const NEW_INQUIRY_COMMANDS: &[&str] = &[
    "new inquiry",
    "new query",
    "new problem",
    "nueva consulta",
    "nuevo problema",
    "otra consulta",
    "reiniciar",
];

pub const HELP_COMMANDS: &[&str] = &["help", "ayuda"];
pub const EXAMPLES_COMMANDS: &[&str] = &["examples", "ejemplos"];
pub const URGENT_COMMANDS: &[&str] = &["urgent", "urgente"];

/// Substrings marking a question about resetting a system.
pub const RESET_QUESTION_WORDS: &[&str] = &["reset", "restart", "reinicio", "reiniciar", "resetear"];

/// Systems with a dedicated reset procedure, and how they are named in a question.
pub const RESET_SYSTEM_HINTS: &[(System, &[&str])] = &[
    (System::Apu, &["apu"]),
    (
        System::Electrical,
        &["electrico", "eléctrico", "electric"],
    ),
    (
        System::LandingGear,
        &["tren", "aterrizaje", "landing gear", "gear"],
    ),
];

/// Words asking "how" about the previous topic.
pub const HOW_WORDS: &[&str] = &["how", "como", "cómo"];

pub const SURVEY_YES: &[&str] = &[
    "yes",
    "y",
    "yep",
    "sure",
    "correct",
    "si",
    "sí",
    "s",
    "claro",
    "por supuesto",
    "afirmativo",
    "correcto",
];

pub const SURVEY_NO: &[&str] = &[
    "no",
    "n",
    "not",
    "nope",
    "negativo",
    "incorrecto",
    "para nada",
];

/// Replies to the hand-off "specific error" question meaning "none".
pub const NO_ERROR_REPLIES: &[&str] = &["none", "no", "n/a", "ninguno", "nada"];

/// Phrases marking a reply as a completed solution.
///
/// Approximate on purpose: a false positive offers the survey one turn
/// early, a false negative delays it by one turn.
pub const FINAL_ANSWER_PHRASES: &[&str] = &[
    "follow these steps",
    "should resolve",
    "solution",
    "procedure",
    "check the following",
    "verify",
    "if the problem persists",
    "if you need more help",
    "i hope this helps",
    "is there anything else",
];

/// Lower-case, trim and drop trailing punctuation from a whole-message reply.
pub fn normalize(text: &str) -> String {
    text.trim()
        .trim_end_matches(['.', '!', '?'])
        .trim()
        .to_lowercase()
}

/// True when `text` contains any pattern as a plain substring.
pub fn matches_any(text: &str, patterns: &[&str]) -> bool {
    patterns.iter().any(|p| text.contains(p))
}

/// True when the normalized message equals one of `options`.
pub fn is_one_of(text: &str, options: &[&str]) -> bool {
    let normalized = normalize(text);
    options.iter().any(|o| normalized == *o)
}

/// True when `phrase` occurs in `text` delimited by non-alphanumeric characters.
pub fn contains_phrase(text: &str, phrase: &str) -> bool {
    text.match_indices(phrase).any(|(start, _)| {
        let end = start + phrase.len();
        let before = text[..start].chars().next_back();
        let after = text[end..].chars().next();
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}

/// True when any phrase occurs in `text` as whole words.
pub fn matches_any_phrase(text: &str, phrases: &[&str]) -> bool {
    phrases.iter().any(|p| contains_phrase(text, p))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_case_space_and_punctuation() {
        assert_eq!(normalize("  Sí!  "), "sí");
        assert_eq!(normalize("YES."), "yes");
    }

    #[test]
    fn phrase_requires_word_boundaries() {
        assert!(contains_phrase("ok thanks!", "thanks"));
        assert!(contains_phrase("listo", "listo"));
        assert!(!contains_phrase("goodbye", "bye"));
        assert!(!contains_phrase("the apu does not start", "no"));
    }

    #[test]
    fn is_one_of_is_exact() {
        assert!(is_one_of("Ayuda", HELP_COMMANDS));
        assert!(!is_one_of("ayuda por favor", HELP_COMMANDS));
    }

    #[test]
    fn tables_have_no_empty_keywords() {
        for (_, words) in SYSTEM_KEYWORDS {
            assert!(words.iter().all(|w| !w.is_empty() && *w == w.to_lowercase()));
        }
        for (_, words) in PROBLEM_PHRASES {
            assert!(words.iter().all(|w| !w.is_empty() && *w == w.to_lowercase()));
        }
    }

    #[test]
    fn yes_and_no_sets_are_disjoint() {
        assert!(SURVEY_YES.iter().all(|y| !SURVEY_NO.contains(y)));
    }
}
