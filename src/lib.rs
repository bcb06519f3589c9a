//! rategate - eligibility gate for in-app store review prompts
//!
//! rategate decides when an application may show the platform's rating
//! prompt. It persists a few counters (first launch, a happiness index,
//! the dates of past asks, and the version last asked in) and opens the
//! gate only when enough time has passed, the yearly budget is not spent,
//! the user has had a multiple of the configured number of happy moments,
//! and the running version has not been asked before.

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod host;
pub mod storage;

pub use config::{AskTrigger, Config};
pub use core::{
    AskOutcome, Eligibility, Evaluation, HappinessOutcome, LaunchOutcome, ReviewEngine,
    ReviewState,
};
pub use error::{RateGateError, Result};
pub use host::{
    AppVersion, Clock, CommandPrompt, EnvVersion, ManualClock, PromptRequester, RecordingPrompt,
    ReviewLogger, StaticVersion, StderrPrompt, SystemClock, TracingLogger, VersionProvider,
};
pub use storage::{CounterStore, FileCounterStore, MemoryCounterStore};

// CLI commands
pub use cli::{AskCommand, ClearCommand, HappinessCommand, LaunchCommand, StatusCommand};
