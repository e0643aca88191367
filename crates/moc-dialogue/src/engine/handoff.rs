//! Agent hand-off interview.
//!
//! Collects six incident fields in fixed order, skipping the ones already
//! known, then emits a summary for the human specialist:
//!
//! `System → Problem → TailNumber → Error → FlightPhase → Location → Done`

use std::sync::LazyLock;

use moc_protocol::{Flow, HandoffStep, Problem, System};
use regex::Regex;

use super::{DialogueEngine, Turn};
use crate::context::Slots;
use crate::extractor::extract;
use crate::tables::{NO_ERROR_REPLIES, is_one_of};

/// Stored for the error field when the user reports no error message.
pub const NO_ERROR_REPORTED: &str = "None reported";

const NOT_SPECIFIED: &str = "Not specified";

static RE_LOOSE_TAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z]{2}[A-Za-z0-9]{3}$").unwrap());

fn question(step: HandoffStep) -> &'static str {
    match step {
        HandoffStep::System => {
            "Which system is affected? (APU, engine, landing gear, hydraulic, electrical, cockpit, galley)"
        }
        HandoffStep::Problem => "Please describe the specific problem you are seeing.",
        HandoffStep::TailNumber => "What is the aircraft tail number? (format CC-XXX)",
        HandoffStep::Error => {
            "Is there a specific error message on the display? Describe it, or reply 'none'."
        }
        HandoffStep::FlightPhase => {
            "In which phase did the problem appear? (takeoff, climb, cruise, descent, landing, taxi, ground)"
        }
        HandoffStep::Location => "Where is the aircraft right now? (airport or location)",
        HandoffStep::Done => "",
    }
}

/// First step from `from` onwards whose slot is still empty.
fn first_missing(slots: &Slots, from: HandoffStep) -> HandoffStep {
    HandoffStep::ORDER
        .into_iter()
        .filter(|step| *step >= from)
        .find(|step| !slots.has(*step))
        .unwrap_or(HandoffStep::Done)
}

/// Open the interview, listing what is already known.
pub(super) fn start(turn: &mut Turn<'_>) -> String {
    tracing::info!("agent hand-off started");
    let slots = &turn.ctx.slots;

    let mut reply =
        String::from("I'll gather the details so a maintenance specialist can contact you.\n");
    let known: Vec<String> = [
        ("System", slots.system.as_ref().map(|s| s.label().to_string())),
        ("Problem", slots.problem.as_ref().map(|p| p.label().to_string())),
        ("Tail number", slots.tail_number.clone()),
        ("Specific error", slots.error_text.clone()),
        ("Flight phase", slots.flight_phase.clone()),
        ("Current location", slots.location.clone()),
    ]
    .into_iter()
    .filter_map(|(label, value)| value.map(|v| format!("- {label}: {v}")))
    .collect();
    if !known.is_empty() {
        reply.push_str("\nWhat I already have:\n");
        reply.push_str(&known.join("\n"));
        reply.push('\n');
    }

    match first_missing(slots, HandoffStep::System) {
        HandoffStep::Done => finish(turn),
        step => {
            turn.ctx.flow = Flow::CollectingHandoff { step };
            reply.push('\n');
            reply.push_str(question(step));
            reply
        }
    }
}

/// Consume a reply while the interview is active.
pub(super) fn continue_interview(_engine: &DialogueEngine, turn: &mut Turn<'_>) -> Option<String> {
    let step = turn.ctx.flow.handoff_step()?;
    let message = turn.message;
    let answer = message.trim();

    if step == HandoffStep::Done {
        tracing::warn!("hand-off interview in terminal step, restarting");
        turn.ctx.flow = Flow::Normal;
        return Some(start(turn));
    }
    if answer.is_empty() {
        return Some(question(step).to_string());
    }

    let slots = &mut turn.ctx.slots;
    match step {
        HandoffStep::System => {
            slots.system = Some(
                extract(answer)
                    .system
                    .unwrap_or_else(|| System::Other(answer.to_uppercase())),
            );
        }
        HandoffStep::Problem => {
            slots.problem = Some(
                extract(answer)
                    .problem
                    .unwrap_or_else(|| Problem::Other(answer.to_string())),
            );
        }
        HandoffStep::TailNumber => slots.tail_number = Some(normalize_tail(answer)),
        HandoffStep::Error => {
            slots.error_text = Some(if is_one_of(answer, NO_ERROR_REPLIES) {
                NO_ERROR_REPORTED.to_string()
            } else {
                answer.to_string()
            });
        }
        HandoffStep::FlightPhase => slots.flight_phase = Some(answer.to_string()),
        HandoffStep::Location => slots.location = Some(answer.to_string()),
        HandoffStep::Done => {}
    }

    Some(match first_missing(&turn.ctx.slots, step.next()) {
        HandoffStep::Done => finish(turn),
        next => {
            turn.ctx.flow = Flow::CollectingHandoff { step: next };
            question(next).to_string()
        }
    })
}

/// Canonical `CC-XXX` when recognizable, otherwise the raw reply upper-cased.
fn normalize_tail(answer: &str) -> String {
    if let Some(tail) = extract(answer).tail_number {
        return tail;
    }
    let upper = answer.to_uppercase();
    if RE_LOOSE_TAIL.is_match(answer) {
        format!("{}-{}", &upper[..2], &upper[2..])
    } else {
        upper
    }
}

/// Close the interview with the summary of all six fields.
fn finish(turn: &mut Turn<'_>) -> String {
    let slots = &turn.ctx.slots;
    let field = |value: Option<String>| value.unwrap_or_else(|| NOT_SPECIFIED.to_string());

    let summary = format!(
        "Thank you. This is the summary passed to the maintenance specialist:\n\n\
         - System: {}\n\
         - Problem: {}\n\
         - Tail number: {}\n\
         - Specific error: {}\n\
         - Flight phase: {}\n\
         - Current location: {}\n\n\
         A specialist will contact you shortly.",
        field(slots.system.as_ref().map(|s| s.label().to_string())),
        field(slots.problem.as_ref().map(|p| p.label().to_string())),
        field(slots.tail_number.clone()),
        field(slots.error_text.clone()),
        field(slots.flight_phase.clone()),
        field(slots.location.clone()),
    );

    tracing::info!(tail_number = ?slots.tail_number, "agent hand-off completed");
    turn.ctx.flow = Flow::Normal;
    turn.handoff_completed = true;
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chooser::FirstChoice;
    use crate::context::SessionContext;
    use crate::knowledge::ManualKnowledge;
    use std::sync::Arc;

    const LABELS: [&str; 6] = [
        "System:",
        "Problem:",
        "Tail number:",
        "Specific error:",
        "Flight phase:",
        "Current location:",
    ];

    fn engine() -> DialogueEngine {
        DialogueEngine::new(Arc::new(ManualKnowledge::empty()), Arc::new(FirstChoice))
    }

    fn collecting(step: HandoffStep) -> Flow {
        Flow::CollectingHandoff { step }
    }

    #[test]
    fn full_interview_from_scratch() {
        let engine = engine();
        let mut ctx = SessionContext::new();

        engine.handle(&mut ctx, "agent");
        assert_eq!(ctx.flow, collecting(HandoffStep::System));

        engine.handle(&mut ctx, "the cargo loader");
        assert_eq!(ctx.slots.system, Some(System::Other("THE CARGO LOADER".into())));
        assert_eq!(ctx.flow, collecting(HandoffStep::Problem));

        engine.handle(&mut ctx, "makes a strange noise");
        assert_eq!(
            ctx.slots.problem,
            Some(Problem::Other("makes a strange noise".into()))
        );

        engine.handle(&mut ctx, "ccawn");
        assert_eq!(ctx.slots.tail_number.as_deref(), Some("CC-AWN"));

        engine.handle(&mut ctx, "none");
        assert_eq!(ctx.slots.error_text.as_deref(), Some(NO_ERROR_REPORTED));

        engine.handle(&mut ctx, "taxi");
        let out = engine.handle(&mut ctx, "SCL gate 12");

        assert!(out.handoff_completed);
        assert_eq!(ctx.flow, Flow::Normal);
        let positions: Vec<usize> = LABELS
            .iter()
            .map(|label| out.reply.find(label).expect(label))
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        assert!(out.reply.contains("SCL gate 12"));
    }

    #[test]
    fn known_slots_are_skipped() {
        let engine = engine();
        let mut ctx = SessionContext::new();
        ctx.slots.system = Some(System::Apu);
        ctx.slots.problem = Some(Problem::NoStart);
        ctx.slots.tail_number = Some("CC-AWN".into());

        let out = engine.handle(&mut ctx, "talk to an agent");
        assert!(out.reply.contains("- System: APU"));
        assert!(out.reply.contains("- Tail number: CC-AWN"));
        assert!(out.reply.ends_with(question(HandoffStep::Error)));
        assert_eq!(ctx.flow, collecting(HandoffStep::Error));
    }

    #[test]
    fn system_reply_is_normalized_through_extractor() {
        let engine = engine();
        let mut ctx = SessionContext::new();
        ctx.flow = collecting(HandoffStep::System);
        engine.handle(&mut ctx, "the landing gear");
        assert_eq!(ctx.slots.system, Some(System::LandingGear));
    }

    #[test]
    fn odd_tail_reply_is_kept_uppercased() {
        assert_eq!(normalize_tail("CC BAW"), "CC-BAW");
        assert_eq!(normalize_tail("lv1ab"), "LV-1AB");
        assert_eq!(normalize_tail("unknown tail"), "UNKNOWN TAIL");
    }

    #[test]
    fn empty_reply_repeats_question() {
        let engine = engine();
        let mut ctx = SessionContext::new();
        ctx.flow = collecting(HandoffStep::Location);
        let out = engine.handle(&mut ctx, "   ");
        assert_eq!(out.reply, question(HandoffStep::Location));
        assert_eq!(ctx.flow, collecting(HandoffStep::Location));
    }

    #[test]
    fn terminal_step_restarts_interview() {
        let engine = engine();
        let mut ctx = SessionContext::new();
        ctx.flow = collecting(HandoffStep::Done);
        let out = engine.handle(&mut ctx, "hello?");
        assert!(!out.handoff_completed);
        assert_eq!(ctx.flow, collecting(HandoffStep::System));
    }

    #[test]
    fn handoff_completion_is_reported_once() {
        let engine = engine();
        let mut ctx = SessionContext::new();
        ctx.slots.system = Some(System::Galley);
        ctx.slots.problem = Some(Problem::NotWorking);
        ctx.slots.tail_number = Some("CC-COP".into());

        let outcomes: Vec<_> = ["agent", "no", "cruise", "SCL"]
            .into_iter()
            .map(|m| engine.handle(&mut ctx, m))
            .collect();
        assert_eq!(outcomes.iter().filter(|o| o.handoff_completed).count(), 1);
        assert!(outcomes[3].handoff_completed);
        assert_eq!(ctx.slots.error_text.as_deref(), Some(NO_ERROR_REPORTED));
    }
}
