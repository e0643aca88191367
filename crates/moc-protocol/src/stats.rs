use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::turn::{SurveyOutcome, TurnRecord};

/// Aggregate counters for the maintenance dashboard.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatsSnapshot {
    /// Distinct sessions seen.
    pub total_conversations: u64,
    pub total_turns: u64,
    /// Running mean of turn latency in milliseconds.
    pub average_latency_ms: f64,
    pub by_system: BTreeMap<String, u64>,
    pub by_problem: BTreeMap<String, u64>,
    pub urgent: u64,
    pub handoffs: u64,
    pub automated_answers: u64,
    pub total_surveys: u64,
    pub satisfied_surveys: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_activity: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_activity: Option<DateTime<Utc>>,
}

impl StatsSnapshot {
    /// Fold one finished turn into the counters.
    pub fn record(&mut self, turn: &TurnRecord) {
        let previous = self.total_turns as f64;
        self.total_turns += 1;
        self.average_latency_ms =
            (self.average_latency_ms * previous + turn.latency_ms) / self.total_turns as f64;

        if turn.opens_conversation {
            self.total_conversations += 1;
        }
        if let Some(system) = &turn.system {
            *self.by_system.entry(system.tag().to_string()).or_default() += 1;
        }
        if let Some(problem) = &turn.problem {
            *self.by_problem.entry(problem.tag().to_string()).or_default() += 1;
        }
        if turn.urgent {
            self.urgent += 1;
        }
        if turn.handoff {
            self.handoffs += 1;
        }
        if turn.automated {
            self.automated_answers += 1;
        }
        match turn.survey {
            Some(SurveyOutcome::Satisfied) => {
                self.total_surveys += 1;
                self.satisfied_surveys += 1;
            }
            Some(SurveyOutcome::Unsatisfied) => self.total_surveys += 1,
            None => {}
        }

        self.first_activity.get_or_insert(turn.timestamp);
        self.last_activity = Some(turn.timestamp);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slots::{Problem, System};

    #[test]
    fn running_mean_latency() {
        let mut stats = StatsSnapshot::default();
        for latency in [2.0, 4.0, 6.0] {
            let mut turn = TurnRecord::new("u", "m", "r");
            turn.latency_ms = latency;
            stats.record(&turn);
        }
        assert_eq!(stats.total_turns, 3);
        assert!((stats.average_latency_ms - 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn counters_by_classification() {
        let mut stats = StatsSnapshot::default();
        let mut turn = TurnRecord::new("u", "APU no arranca", "r");
        turn.system = Some(System::Apu);
        turn.problem = Some(Problem::NoStart);
        turn.automated = true;
        stats.record(&turn);
        stats.record(&turn);

        assert_eq!(stats.by_system["APU"], 2);
        assert_eq!(stats.by_problem["NO_ARRANCA"], 2);
        assert_eq!(stats.automated_answers, 2);
        assert_eq!(stats.handoffs, 0);
    }

    #[test]
    fn conversations_counted_on_first_turn_only() {
        let mut stats = StatsSnapshot::default();
        let mut opening = TurnRecord::new("u1", "hello", "r");
        opening.opens_conversation = true;
        stats.record(&opening);
        stats.record(&TurnRecord::new("u1", "APU", "r"));

        assert_eq!(stats.total_conversations, 1);
        assert_eq!(stats.total_turns, 2);
    }

    #[test]
    fn survey_outcomes() {
        let mut stats = StatsSnapshot::default();
        let mut yes = TurnRecord::new("u", "yes", "r");
        yes.survey = Some(SurveyOutcome::Satisfied);
        let mut no = TurnRecord::new("u", "no", "r");
        no.survey = Some(SurveyOutcome::Unsatisfied);
        stats.record(&yes);
        stats.record(&no);

        assert_eq!(stats.total_surveys, 2);
        assert_eq!(stats.satisfied_surveys, 1);
        assert!(stats.first_activity.is_some());
    }
}
