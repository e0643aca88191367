//! MOC maintenance assistant: dialogue control engine.
//!
//! Maps free-text maintenance messages to a small vocabulary of aircraft
//! systems, problem categories and tail numbers, and drives the multi-turn
//! conversation around them: slot filling, canned procedures, the
//! satisfaction survey and the agent hand-off interview.
//!
//! - [`extractor`]: pure text → (system, problem, tail number) classifier.
//! - [`store`]: per-session [`context::SessionContext`] storage.
//! - [`engine`]: the turn-processing state machine.
//! - [`service`]: [`service::ChatService`], the `process_turn` entry point
//!   wiring the engine to the store, knowledge table and stats sink.

pub mod chooser;
pub mod config;
pub mod context;
pub mod engine;
pub mod error;
pub mod extractor;
pub mod knowledge;
pub mod service;
pub mod stats;
pub mod store;
pub mod tables;

pub use chooser::{Chooser, FirstChoice, RandomChoice};
pub use config::BotConfig;
pub use context::{SessionContext, Slots};
pub use engine::{DialogueEngine, SURVEY_PROMPT, TurnOutcome, looks_final};
pub use error::{DialogueError, DialogueResult};
pub use extractor::{Extraction, extract};
pub use knowledge::{KnowledgeLookup, ManualKnowledge};
pub use service::ChatService;
pub use stats::{JsonFileStatsSink, MemoryStatsSink, StatsSink};
pub use store::SessionStore;
