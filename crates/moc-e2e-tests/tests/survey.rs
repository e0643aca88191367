//! E2E tests for the satisfaction survey.

mod helpers;

use helpers::TestHarness;
use moc_dialogue::SURVEY_PROMPT;
use moc_protocol::{Flow, HandoffStep, SurveyOutcome};

async fn answered_apu(h: &TestHarness, user: &str) {
    let reply = h.say(user, "The APU of CC-AWN does not start").await;
    assert!(reply.ends_with(SURVEY_PROMPT));
}

#[tokio::test]
async fn e2e_positive_survey() {
    let h = TestHarness::new();
    answered_apu(&h, "tech-1").await;

    let reply = h.say("tech-1", "Yes").await;
    assert!(reply.contains("Thank you for your feedback"));

    let stats = h.stats().await;
    assert_eq!(stats["total_surveys"], 1);
    assert_eq!(stats["satisfied_surveys"], 1);
}

#[tokio::test]
async fn e2e_negative_survey_offers_agent() {
    let h = TestHarness::new();
    answered_apu(&h, "tech-1").await;

    let reply = h.say("tech-1", "no").await;
    assert!(reply.contains("'agent'"));

    let turns = h.sink.turns().await;
    assert_eq!(turns.last().unwrap().survey, Some(SurveyOutcome::Unsatisfied));
    assert_eq!(h.stats().await["satisfied_surveys"], 0);
}

/// Anything but yes/no/agent re-asks and changes nothing.
#[tokio::test]
async fn e2e_unclear_answer_reasks() {
    let h = TestHarness::new();
    answered_apu(&h, "tech-1").await;

    for _ in 0..4 {
        let reply = h.say("tech-1", "the engine also makes noise").await;
        assert!(reply.contains("Yes or No"));
    }
    let ctx = h.session("tech-1").await;
    assert_eq!(ctx.flow, Flow::InSurvey);
    assert!(!ctx.survey_answered);
}

/// "agent" during the survey starts the interview without a survey outcome.
#[tokio::test]
async fn e2e_agent_during_survey() {
    let h = TestHarness::new();
    answered_apu(&h, "tech-1").await;

    let reply = h.say("tech-1", "agent").await;
    assert!(reply.contains("specific error message"));

    let ctx = h.session("tech-1").await;
    assert!(ctx.survey_answered);
    assert_eq!(
        ctx.flow,
        Flow::CollectingHandoff {
            step: HandoffStep::Error
        }
    );
    assert_eq!(h.stats().await["total_surveys"], 0);
}

/// Once answered, the survey is never offered again in the session.
#[tokio::test]
async fn e2e_survey_offered_once() {
    let h = TestHarness::new();
    answered_apu(&h, "tech-1").await;
    h.say("tech-1", "yes").await;

    let replies = [
        h.say("tech-1", "landing gear not working on CC-COP").await,
        h.say("tech-1", "reset the landing gear").await,
        h.say("tech-1", "thanks").await,
    ];
    for reply in &replies {
        assert!(!reply.contains(SURVEY_PROMPT), "survey repeated: {reply}");
    }
}

/// A farewell before any survey opens it.
#[tokio::test]
async fn e2e_farewell_opens_survey() {
    let h = TestHarness::new();
    h.say("tech-1", "galley not working").await;

    let reply = h.say("tech-1", "that's all, thank you").await;
    assert_eq!(reply, SURVEY_PROMPT);
    assert_eq!(h.session("tech-1").await.flow, Flow::InSurvey);
}
