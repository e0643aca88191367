//! Satisfaction survey.

use moc_protocol::{Flow, SurveyOutcome};

use super::{DialogueEngine, Turn, handoff};
use crate::tables::{AGENT_KEYWORDS, FINAL_ANSWER_PHRASES, SURVEY_NO, SURVEY_YES, is_one_of, matches_any};

pub const SURVEY_PROMPT: &str = "Was your problem or question resolved? Please answer Yes or No.";

const SURVEY_REASK: &str = "Please answer Yes or No: was your problem or question resolved?";
const SURVEY_THANKS: &str = "Thank you for your feedback! We're glad we could help. If you need help with another issue, just type 'new inquiry'.";
const SURVEY_SORRY: &str = "We're sorry we could not resolve your question. Would you like a maintenance specialist to contact you? Type 'agent' to start, or 'new inquiry' to try another problem.";

/// Answer to the survey prompt. Only active while the survey is open.
pub(super) fn answer(_engine: &DialogueEngine, turn: &mut Turn<'_>) -> Option<String> {
    if turn.ctx.flow != Flow::InSurvey {
        return None;
    }

    let reply = if is_one_of(turn.message, SURVEY_YES) {
        close(turn, SurveyOutcome::Satisfied);
        SURVEY_THANKS.to_string()
    } else if is_one_of(turn.message, SURVEY_NO) {
        close(turn, SurveyOutcome::Unsatisfied);
        SURVEY_SORRY.to_string()
    } else if is_one_of(turn.message, AGENT_KEYWORDS) {
        turn.ctx.flow = Flow::Normal;
        turn.ctx.survey_answered = true;
        handoff::start(turn)
    } else {
        SURVEY_REASK.to_string()
    };
    Some(reply)
}

fn close(turn: &mut Turn<'_>, outcome: SurveyOutcome) {
    tracing::info!(?outcome, "survey answered");
    turn.ctx.flow = Flow::Normal;
    turn.ctx.survey_answered = true;
    turn.survey = Some(outcome);
}

/// Whether a reply reads as a completed solution.
///
/// True when it contains a closing phrase or is longer than `min_len`
/// characters. Approximate: short solutions without a closing phrase
/// are missed, long clarifying questions are not.
pub fn looks_final(reply: &str, min_len: usize) -> bool {
    matches_any(&reply.to_lowercase(), FINAL_ANSWER_PHRASES) || reply.chars().count() > min_len
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chooser::FirstChoice;
    use crate::context::SessionContext;
    use crate::knowledge::ManualKnowledge;
    use moc_protocol::HandoffStep;
    use std::sync::Arc;

    fn in_survey() -> SessionContext {
        let mut ctx = SessionContext::new();
        ctx.flow = Flow::InSurvey;
        ctx
    }

    fn engine() -> DialogueEngine {
        DialogueEngine::new(Arc::new(ManualKnowledge::empty()), Arc::new(FirstChoice))
    }

    #[test]
    fn yes_closes_survey_satisfied() {
        let mut ctx = in_survey();
        let out = engine().handle(&mut ctx, " Sí ");
        assert_eq!(out.reply, SURVEY_THANKS);
        assert_eq!(out.survey, Some(SurveyOutcome::Satisfied));
        assert!(ctx.survey_answered);
        assert_eq!(ctx.flow, Flow::Normal);
    }

    #[test]
    fn no_closes_survey_unsatisfied() {
        let mut ctx = in_survey();
        let out = engine().handle(&mut ctx, "No.");
        assert_eq!(out.reply, SURVEY_SORRY);
        assert_eq!(out.survey, Some(SurveyOutcome::Unsatisfied));
        assert!(ctx.survey_answered);
    }

    #[test]
    fn unrecognized_reply_reasks_without_state_change() {
        let mut ctx = in_survey();
        let engine = engine();
        for _ in 0..3 {
            let out = engine.handle(&mut ctx, "maybe later");
            assert_eq!(out.reply, SURVEY_REASK);
            assert_eq!(out.survey, None);
        }
        assert_eq!(ctx.flow, Flow::InSurvey);
        assert!(!ctx.survey_answered);
    }

    #[test]
    fn agent_reply_starts_handoff_without_outcome() {
        let mut ctx = in_survey();
        let out = engine().handle(&mut ctx, "agent");
        assert_eq!(out.survey, None);
        assert!(ctx.survey_answered);
        assert_eq!(
            ctx.flow,
            Flow::CollectingHandoff {
                step: HandoffStep::System
            }
        );
    }

    #[test]
    fn looks_final_by_phrase_or_length() {
        assert!(looks_final("Follow these steps: 1. ...", 200));
        assert!(looks_final(&"x".repeat(201), 200));
        assert!(!looks_final("Which system is affected?", 200));
    }
}
