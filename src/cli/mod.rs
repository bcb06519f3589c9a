//! CLI commands for rategate.
//!
//! Each command wraps one engine operation and renders its result as
//! human-readable text or JSON:
//! - **Lifecycle**: launch, clear
//! - **Signals**: happy, unhappy, reset-happiness
//! - **Decisions**: status, ask

// Lifecycle
pub mod clear;
pub mod launch;

// Signals
pub mod happiness;

// Decisions
pub mod ask;
pub mod status;

pub use ask::AskCommand;
pub use clear::ClearCommand;
pub use happiness::HappinessCommand;
pub use launch::LaunchCommand;
pub use status::StatusCommand;
