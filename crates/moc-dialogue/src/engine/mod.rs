//! Turn-processing state machine.
//!
//! A turn runs an ordered list of guarded handlers over the session
//! context. The first handler that produces a reply ends the turn. The
//! order is significant: survey and hand-off flows take precedence over
//! commands, commands over extraction, and extraction-driven fast paths
//! over generic slot filling.

mod handoff;
mod procedures;
mod responses;
mod survey;

use std::sync::Arc;

use moc_protocol::{Flow, Problem, SurveyOutcome, System};

use crate::chooser::{Chooser, RandomChoice};
use crate::config::BotConfig;
use crate::context::{SessionContext, Topic};
use crate::extractor::{Extraction, extract};
use crate::knowledge::{KnowledgeLookup, ManualKnowledge};
use crate::tables::{
    AGENT_KEYWORDS, AGENT_REQUEST_PHRASES, EXAMPLES_COMMANDS, FAREWELL_EXACT, FAREWELL_PHRASES,
    HELP_COMMANDS, HOW_WORDS, NEW_INQUIRY_COMMANDS, RESET_QUESTION_WORDS, RESET_SYSTEM_HINTS,
    URGENT_COMMANDS, is_one_of, matches_any, matches_any_phrase,
};

pub use survey::{SURVEY_PROMPT, looks_final};

const CLOSING: &str = "Thank you for using our maintenance assistance service. Have a good day!";
const NEW_INQUIRY: &str = "Sure, let's start a new inquiry. Which aircraft system is affected and what problem are you seeing?";
const URGENT_ACK: &str = "I have marked your inquiry as URGENT. Please describe the problem, the affected system and the aircraft tail number so it can be handled right away.";
const ASK_RESET_SYSTEM: &str = "Which system do you need to reset? (APU, electrical system, landing gear, etc.)";
const ASK_TAIL: &str = "Could you tell me the aircraft tail number? (for example CC-AWN)";
const ASK_DETAILS: &str = "I need more information to help you. Please tell me which system is affected, what problem you see and the aircraft tail number.";
const NOT_UNDERSTOOD: &str = "I could not identify the system or the problem. Could you describe it in more detail? For example: \"The APU of CC-AWN does not start\". Type 'help' to see what I can do.";
const REPEAT_GENERIC: &str = "It looks like you sent the same message several times. Could you rephrase it or add more detail, such as the affected system, the problem and the tail number?";

/// A guarded step of the cascade. Returns a reply when it handles the turn.
type Handler = fn(&DialogueEngine, &mut Turn<'_>) -> Option<String>;

/// Cascade order, first match wins.
const CASCADE: &[(&str, Handler)] = &[
    ("survey", survey::answer),
    ("handoff", handoff::continue_interview),
    ("post_survey_agent", post_survey_agent),
    ("farewell", farewell),
    ("agent_request", agent_request),
    ("repeat", repeat),
    ("new_inquiry", new_inquiry),
    ("command", command),
    ("reset_question", reset_question),
    ("apu_no_start", apu_no_start),
    ("landing_gear", landing_gear),
    ("electrical", electrical),
    ("short_message", short_message),
    ("topic_change", topic_change),
    ("slot_filling", slot_filling),
];

/// Result of one turn, consumed by the service to build the turn record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnOutcome {
    pub reply: String,
    /// Name of the cascade step that produced the reply.
    pub handler: &'static str,
    pub system: Option<System>,
    pub problem: Option<Problem>,
    pub tail_number: Option<String>,
    pub urgent: bool,
    pub handoff_completed: bool,
    /// A procedure or solution was given without a human.
    pub automated: bool,
    pub survey: Option<SurveyOutcome>,
}

/// Working state of a single turn.
pub(crate) struct Turn<'a> {
    pub ctx: &'a mut SessionContext,
    pub message: &'a str,
    pub lower: String,
    extraction: Option<Extraction>,
    pub urgent: bool,
    pub handoff_completed: bool,
    pub automated: bool,
    pub survey: Option<SurveyOutcome>,
}

impl<'a> Turn<'a> {
    fn new(ctx: &'a mut SessionContext, message: &'a str) -> Self {
        Self {
            ctx,
            message,
            lower: message.to_lowercase(),
            extraction: None,
            urgent: false,
            handoff_completed: false,
            automated: false,
            survey: None,
        }
    }

    /// Extraction of the current message, computed once.
    pub fn extraction(&mut self) -> Extraction {
        let message = self.message;
        self.extraction
            .get_or_insert_with(|| extract(message))
            .clone()
    }

    /// Append the survey prompt and enter the survey, unless already answered.
    pub fn offer_survey(&mut self, reply: String) -> String {
        if self.ctx.survey_answered {
            return reply;
        }
        self.ctx.flow = Flow::InSurvey;
        format!("{reply}\n\n{SURVEY_PROMPT}")
    }
}

/// The dialogue controller. Stateless between turns; all session state
/// lives in the [`SessionContext`] passed to [`DialogueEngine::handle`].
pub struct DialogueEngine {
    knowledge: Arc<dyn KnowledgeLookup>,
    chooser: Arc<dyn Chooser>,
    history_limit: usize,
    final_answer_min_len: usize,
    short_message_max_len: usize,
}

impl DialogueEngine {
    pub fn new(knowledge: Arc<dyn KnowledgeLookup>, chooser: Arc<dyn Chooser>) -> Self {
        let defaults = BotConfig::default();
        Self {
            knowledge,
            chooser,
            history_limit: defaults.history_limit,
            final_answer_min_len: defaults.final_answer_min_len,
            short_message_max_len: defaults.short_message_max_len,
        }
    }

    /// Apply the tunables from `config`.
    pub fn with_config(mut self, config: &BotConfig) -> Self {
        self.history_limit = config.history_limit;
        self.final_answer_min_len = config.final_answer_min_len;
        self.short_message_max_len = config.short_message_max_len;
        self
    }

    /// Process one user message against the session context.
    ///
    /// Always returns a reply. The message is appended to the session
    /// history after the cascade, whichever step handled it.
    pub fn handle(&self, ctx: &mut SessionContext, message: &str) -> TurnOutcome {
        let mut turn = Turn::new(ctx, message);

        let (handler, reply) = CASCADE
            .iter()
            .find_map(|(name, step)| step(self, &mut turn).map(|reply| (*name, reply)))
            .unwrap_or(("fallback", NOT_UNDERSTOOD.to_string()));

        let answered_topic = turn.automated || turn.handoff_completed;
        let (system, problem) = match &turn.extraction {
            Some(e) if answered_topic => (
                e.system.clone().or_else(|| turn.ctx.slots.system.clone()),
                e.problem.clone().or_else(|| turn.ctx.slots.problem.clone()),
            ),
            Some(e) => (e.system.clone(), e.problem.clone()),
            None if answered_topic => (
                turn.ctx.slots.system.clone(),
                turn.ctx.slots.problem.clone(),
            ),
            None => (None, None),
        };

        turn.ctx.push_history(message, self.history_limit);
        tracing::debug!(handler, flow = ?turn.ctx.flow, "turn handled");

        TurnOutcome {
            reply,
            handler,
            system,
            problem,
            tail_number: turn.ctx.slots.tail_number.clone(),
            urgent: turn.urgent,
            handoff_completed: turn.handoff_completed,
            automated: turn.automated,
            survey: turn.survey,
        }
    }
}

impl Default for DialogueEngine {
    fn default() -> Self {
        Self::new(Arc::new(ManualKnowledge::empty()), Arc::new(RandomChoice))
    }
}

fn is_farewell(message: &str, lower: &str) -> bool {
    is_one_of(message, FAREWELL_EXACT) || matches_any_phrase(lower, FAREWELL_PHRASES)
}

fn farewell_reply(turn: &mut Turn<'_>) -> String {
    if turn.ctx.survey_answered {
        CLOSING.to_string()
    } else {
        turn.ctx.flow = Flow::InSurvey;
        SURVEY_PROMPT.to_string()
    }
}

// ── Commands ────────────────────────────────────────────────────

fn post_survey_agent(_engine: &DialogueEngine, turn: &mut Turn<'_>) -> Option<String> {
    (turn.ctx.survey_answered && is_one_of(turn.message, AGENT_KEYWORDS))
        .then(|| handoff::start(turn))
}

fn farewell(_engine: &DialogueEngine, turn: &mut Turn<'_>) -> Option<String> {
    is_farewell(turn.message, &turn.lower).then(|| farewell_reply(turn))
}

fn agent_request(_engine: &DialogueEngine, turn: &mut Turn<'_>) -> Option<String> {
    let requested = is_one_of(turn.message, AGENT_KEYWORDS)
        || matches_any(&turn.lower, AGENT_REQUEST_PHRASES);
    requested.then(|| handoff::start(turn))
}

fn repeat(_engine: &DialogueEngine, turn: &mut Turn<'_>) -> Option<String> {
    let (last, before) = turn.ctx.last_two_utterances();
    let repeated = [last, before]
        .iter()
        .all(|prev| prev.is_some_and(|p| p.to_lowercase() == turn.lower));
    if !repeated {
        return None;
    }

    tracing::debug!("repeated message");
    let extraction = turn.extraction();
    Some(match (extraction.system, extraction.problem) {
        (Some(system), Some(problem)) => format!(
            "I see you keep asking about the {} ({}). Could you give me more specific details, \
             such as error messages, when it started or what has already been tried?",
            system.label(),
            problem.label()
        ),
        _ => REPEAT_GENERIC.to_string(),
    })
}

fn new_inquiry(_engine: &DialogueEngine, turn: &mut Turn<'_>) -> Option<String> {
    if !is_one_of(turn.message, NEW_INQUIRY_COMMANDS) {
        return None;
    }
    tracing::info!("session topic reset on request");
    turn.ctx.reset_topic();
    Some(NEW_INQUIRY.to_string())
}

fn command(_engine: &DialogueEngine, turn: &mut Turn<'_>) -> Option<String> {
    if is_one_of(turn.message, HELP_COMMANDS) {
        Some(responses::HELP.to_string())
    } else if is_one_of(turn.message, EXAMPLES_COMMANDS) {
        Some(responses::EXAMPLES.to_string())
    } else if is_one_of(turn.message, URGENT_COMMANDS) {
        tracing::info!("inquiry marked urgent");
        turn.urgent = true;
        Some(URGENT_ACK.to_string())
    } else {
        None
    }
}

fn reset_question(_engine: &DialogueEngine, turn: &mut Turn<'_>) -> Option<String> {
    if !matches_any(&turn.lower, RESET_QUESTION_WORDS) {
        return None;
    }

    let hinted = RESET_SYSTEM_HINTS
        .iter()
        .find(|(_, words)| matches_any(&turn.lower, words))
        .map(|(system, _)| system.clone());
    let Some(system) = hinted.or_else(|| turn.ctx.slots.system.clone()) else {
        return Some(ASK_RESET_SYSTEM.to_string());
    };

    turn.ctx.last_topic = Some(Topic::Reset(system.clone()));
    turn.automated = true;
    let reply = procedures::reset_procedure(&system);
    Some(turn.offer_survey(reply))
}

// ── Fast paths ──────────────────────────────────────────────────

/// A tail-number-only reply continuing a stored topic about `system`.
fn continues(turn: &Turn<'_>, extraction: &Extraction, system: &System) -> bool {
    extraction.is_unclassified()
        && extraction.tail_number.is_some()
        && turn.ctx.slots.system.as_ref() == Some(system)
}

/// Store the fast-path topic, then either give the procedure or ask for the tail.
///
/// The survey is offered only when the tail number came with this message;
/// a procedure built from a stored tail is sent as is.
fn run_fast_path(
    turn: &mut Turn<'_>,
    extraction: Extraction,
    system: System,
    problem: Problem,
    procedure: fn(&Problem, &str) -> String,
) -> String {
    turn.ctx.slots.system = Some(system.clone());
    turn.ctx.slots.problem = Some(problem.clone());
    turn.ctx.last_topic = None;
    let tail_in_message = extraction.tail_number.is_some();
    if let Some(tail) = extraction.tail_number {
        turn.ctx.slots.tail_number = Some(tail);
    }

    match turn.ctx.slots.tail_number.clone() {
        Some(tail) => {
            tracing::info!(system = %system, problem = %problem, tail, "fast-path procedure");
            turn.automated = true;
            let reply = procedure(&problem, &tail);
            if tail_in_message {
                turn.offer_survey(reply)
            } else {
                reply
            }
        }
        None => format!(
            "I understand the {} has a \"{}\" problem. {ASK_TAIL}",
            system.label(),
            problem.label()
        ),
    }
}

fn apu_no_start(_engine: &DialogueEngine, turn: &mut Turn<'_>) -> Option<String> {
    let e = turn.extraction();
    let direct = e.system == Some(System::Apu) && e.problem == Some(Problem::NoStart);
    let continued =
        continues(turn, &e, &System::Apu) && turn.ctx.slots.problem == Some(Problem::NoStart);
    if !(direct || continued) {
        return None;
    }
    Some(run_fast_path(
        turn,
        e,
        System::Apu,
        Problem::NoStart,
        |_, tail| procedures::apu_start_procedure(tail),
    ))
}

fn landing_gear(_engine: &DialogueEngine, turn: &mut Turn<'_>) -> Option<String> {
    system_fast_path(turn, System::LandingGear, procedures::landing_gear_procedure)
}

fn electrical(_engine: &DialogueEngine, turn: &mut Turn<'_>) -> Option<String> {
    system_fast_path(turn, System::Electrical, procedures::electrical_procedure)
}

/// Any-problem fast path for `system`; an unknown problem means inspection.
fn system_fast_path(
    turn: &mut Turn<'_>,
    system: System,
    procedure: fn(&Problem, &str) -> String,
) -> Option<String> {
    let e = turn.extraction();
    let problem = if e.system.as_ref() == Some(&system) {
        e.problem.clone()
    } else if continues(turn, &e, &system) {
        turn.ctx.slots.problem.clone()
    } else {
        return None;
    };
    let problem = problem.unwrap_or(Problem::Inspect);
    Some(run_fast_path(turn, e, system, problem, procedure))
}

// ── Fallbacks ───────────────────────────────────────────────────

fn short_message(engine: &DialogueEngine, turn: &mut Turn<'_>) -> Option<String> {
    if turn.message.trim().chars().count() > engine.short_message_max_len {
        return None;
    }

    let slots = &turn.ctx.slots;
    let reply = match (
        slots.system.clone(),
        slots.problem.clone(),
        slots.tail_number.clone(),
    ) {
        (Some(system), Some(problem), Some(tail)) => {
            turn.automated = true;
            match (&system, &problem) {
                (System::Apu, Problem::NoStart) => procedures::apu_start_procedure(&tail),
                (System::LandingGear, _) => procedures::landing_gear_procedure(&problem, &tail),
                (System::Electrical, _) => procedures::electrical_procedure(&problem, &tail),
                _ => answer_with_offer(engine, turn, &system, &problem),
            }
        }
        (Some(system), Some(problem), None) => ask_tail(&system, &problem),
        (Some(system), None, _) => ask_problem(&system),
        (None, Some(problem), _) => ask_system(&problem),
        (None, None, _) => ASK_DETAILS.to_string(),
    };
    Some(reply)
}

fn topic_change(_engine: &DialogueEngine, turn: &mut Turn<'_>) -> Option<String> {
    let e = turn.extraction();
    let slots = &turn.ctx.slots;
    let system_changed = e.system.is_some() && slots.system.is_some() && e.system != slots.system;
    let problem_changed =
        e.problem.is_some() && slots.problem.is_some() && e.problem != slots.problem;

    if system_changed || problem_changed {
        tracing::info!(
            from_system = ?slots.system,
            to_system = ?e.system,
            from_problem = ?slots.problem,
            to_problem = ?e.problem,
            "topic changed, clearing slots"
        );
        turn.ctx.reset_topic();
    }
    None
}

fn slot_filling(engine: &DialogueEngine, turn: &mut Turn<'_>) -> Option<String> {
    let e = turn.extraction();
    if let Some(Topic::Reset(system)) = turn.ctx.last_topic.clone()
        && e.is_unclassified()
        && matches_any_phrase(&turn.lower, HOW_WORDS)
    {
        turn.automated = true;
        return Some(procedures::reset_procedure(&system));
    }

    turn.ctx.merge(&e);

    if let Some(alert) = procedures::known_alert(&turn.lower) {
        turn.automated = true;
        return Some(finalize(engine, turn, alert.to_string()));
    }

    let slots = &turn.ctx.slots;
    let reply = match (
        slots.system.clone(),
        slots.problem.clone(),
        slots.tail_number.is_some(),
    ) {
        (Some(system), Some(problem), true) => {
            turn.automated = true;
            answer_with_offer(engine, turn, &system, &problem)
        }
        (Some(system), Some(problem), false) => ask_tail(&system, &problem),
        (Some(system), None, _) => ask_problem(&system),
        (None, Some(problem), _) => ask_system(&problem),
        (None, None, _) => NOT_UNDERSTOOD.to_string(),
    };
    Some(reply)
}

/// Generated answer plus the escalation offer, then the survey check.
fn answer_with_offer(
    engine: &DialogueEngine,
    turn: &mut Turn<'_>,
    system: &System,
    problem: &Problem,
) -> String {
    let answer = responses::generate_answer(engine, system, problem);
    let answer = format!("{answer}\n\n{}", responses::ESCALATION_OFFER);
    finalize(engine, turn, answer)
}

/// Offer the survey after a reply that reads as a completed solution.
fn finalize(engine: &DialogueEngine, turn: &mut Turn<'_>, reply: String) -> String {
    if looks_final(&reply, engine.final_answer_min_len) && !turn.ctx.is_first_turn() {
        turn.offer_survey(reply)
    } else {
        reply
    }
}

fn ask_tail(system: &System, problem: &Problem) -> String {
    format!(
        "I detect a \"{}\" problem on the {}. {ASK_TAIL}",
        problem.label(),
        system.label()
    )
}

fn ask_problem(system: &System) -> String {
    format!(
        "You mention the {}. What specific problem are you seeing?",
        system.label()
    )
}

fn ask_system(problem: &Problem) -> String {
    format!(
        "I understand there is a \"{}\" problem. Which aircraft system is affected?",
        problem.label()
    )
}
