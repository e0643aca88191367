//! End-to-end conversation tests for the MOC maintenance assistant.
//!
//! The tests live under `tests/` and drive the HTTP router and the chat
//! service with real dialogue, knowledge and stats components.
