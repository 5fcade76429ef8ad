//! Fleet telemetry correlation engine.
//!
//! Loads equipment metadata, position history, the state catalog and state
//! history, then answers latest-position, latest-state and history queries
//! per equipment unit from an immutable in-memory index.

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod presentation;
