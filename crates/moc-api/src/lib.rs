//! MOC maintenance assistant: HTTP front end.
//!
//! Library half of the server so the binary (`main.rs`) and
//! `moc-e2e-tests` share `AppState` and `build_router`.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;
