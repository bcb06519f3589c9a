//! Core types and logic for rategate.
//!
//! This module contains the persisted review counters, the eligibility
//! policy, and the engine that ties them to a counter store.

pub mod engine;
pub mod policy;
pub mod state;

pub use engine::ReviewEngine;
pub use policy::{evaluate, happiness_gate, time_gate, version_gate, Evaluation};
pub use state::{AskOutcome, Eligibility, HappinessOutcome, LaunchOutcome, ReviewState};
