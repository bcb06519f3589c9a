//! Launch command for rategate.
//!
//! Records an app launch, setting the first-launch date on the first run.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::core::{LaunchOutcome, ReviewEngine};
use crate::storage::CounterStore;

/// Options for the launch command.
#[derive(Debug, Clone, Default)]
pub struct LaunchOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
}

/// Output format for the launch command.
#[derive(Debug, Clone, Serialize)]
pub struct LaunchOutput {
    /// Whether the launch was recorded.
    pub success: bool,
    /// Whether this was the first launch since install or the last clear.
    pub first_launch: bool,
    /// Stored first-launch date.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_launch_date: Option<DateTime<Utc>>,
    /// Eligibility right after the launch.
    pub eligible: bool,
    /// Error message if the launch failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl LaunchOutput {
    /// Create a successful output.
    pub fn success(outcome: &LaunchOutcome) -> Self {
        Self {
            success: true,
            first_launch: outcome.first_launch,
            first_launch_date: Some(outcome.first_launch_date),
            eligible: outcome.eligibility.is_eligible(),
            error: None,
        }
    }

    /// Create a failed output.
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            first_launch: false,
            first_launch_date: None,
            eligible: false,
            error: Some(error.into()),
        }
    }
}

/// The launch command implementation.
pub struct LaunchCommand<'a, S: CounterStore> {
    engine: &'a ReviewEngine<S>,
}

impl<'a, S: CounterStore> LaunchCommand<'a, S> {
    /// Create a new launch command.
    pub fn new(engine: &'a ReviewEngine<S>) -> Self {
        Self { engine }
    }

    /// Run the launch command.
    pub fn run(&self, _options: &LaunchOptions) -> LaunchOutput {
        match self.engine.start() {
            Ok(outcome) => LaunchOutput::success(&outcome),
            Err(e) => LaunchOutput::failure(e.to_string()),
        }
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &LaunchOutput, options: &LaunchOptions) -> String {
        if options.quiet {
            return String::new();
        }

        if options.json {
            format!(
                "{}\n",
                serde_json::to_string_pretty(output).unwrap_or_else(|_| "{}".to_string())
            )
        } else {
            self.format_human_readable(output)
        }
    }

    fn format_human_readable(&self, output: &LaunchOutput) -> String {
        if !output.success {
            return format!(
                "Launch failed: {}\n",
                output.error.as_deref().unwrap_or("unknown error")
            );
        }

        let date = output
            .first_launch_date
            .map(|d| d.format("%Y-%m-%d %H:%M:%S UTC").to_string())
            .unwrap_or_default();

        if output.first_launch {
            format!("First launch recorded at {}.\n", date)
        } else {
            format!("Launch recorded. First launched at {}.\n", date)
        }
    }
}
