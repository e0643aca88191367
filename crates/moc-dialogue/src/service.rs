//! `process_turn`: the single entry point used by the front ends.

use std::sync::Arc;
use std::time::Instant;

use moc_protocol::{StatsSnapshot, TurnRecord};

use crate::chooser::RandomChoice;
use crate::config::BotConfig;
use crate::context::SessionContext;
use crate::engine::DialogueEngine;
use crate::knowledge::ManualKnowledge;
use crate::stats::{JsonFileStatsSink, MemoryStatsSink, StatsSink};
use crate::store::SessionStore;

/// Dialogue engine wired to the session store and the stats sink.
pub struct ChatService {
    engine: DialogueEngine,
    store: SessionStore,
    sink: Arc<dyn StatsSink>,
}

impl ChatService {
    pub fn new(engine: DialogueEngine, sink: Arc<dyn StatsSink>) -> Self {
        Self {
            engine,
            store: SessionStore::new(),
            sink,
        }
    }

    /// Build the production service: manual knowledge from disk (empty when
    /// absent), random phrasing, and a file or in-memory stats sink.
    pub fn from_config(config: &BotConfig) -> Self {
        let knowledge = ManualKnowledge::load_or_empty(config.knowledge_path());
        let engine = DialogueEngine::new(Arc::new(knowledge), Arc::new(RandomChoice))
            .with_config(config);

        let sink: Arc<dyn StatsSink> = if config.persist_stats {
            let path = config.stats_path();
            tracing::info!(path = %path.display(), "stats persisted to file");
            Arc::new(JsonFileStatsSink::open(path))
        } else {
            Arc::new(MemoryStatsSink::new())
        };

        Self::new(engine, sink)
    }

    /// Process one message for a session and return the reply.
    ///
    /// Turns for the same session are serialized by the session lock.
    /// A stats sink failure is logged and never reaches the caller.
    pub async fn process_turn(&self, message: &str, session_id: &str) -> String {
        let started = Instant::now();
        let handle = self.store.get_or_create(session_id).await;
        let (outcome, opens_conversation) = {
            let mut ctx = handle.lock().await;
            let opens = ctx.is_first_turn();
            (self.engine.handle(&mut ctx, message), opens)
        };
        let latency_ms = started.elapsed().as_secs_f64() * 1000.0;

        tracing::info!(
            session_id,
            handler = outcome.handler,
            latency_ms,
            "turn processed"
        );

        let mut record = TurnRecord::new(session_id, message, outcome.reply.as_str());
        record.latency_ms = latency_ms;
        record.system = outcome.system;
        record.problem = outcome.problem;
        record.tail_number = outcome.tail_number;
        record.opens_conversation = opens_conversation;
        record.urgent = outcome.urgent;
        record.handoff = outcome.handoff_completed;
        record.automated = outcome.automated;
        record.survey = outcome.survey;

        if let Err(e) = self.sink.record(&record).await {
            tracing::warn!(session_id, error = %e, "failed to record turn");
        }

        outcome.reply
    }

    /// Current counters from the stats sink.
    pub async fn stats(&self) -> StatsSnapshot {
        self.sink.snapshot().await
    }

    /// Copy of a session's context, if the session exists.
    pub async fn session(&self, session_id: &str) -> Option<SessionContext> {
        self.store.snapshot(session_id).await
    }
}
