//! Happiness commands for rategate.
//!
//! `happy`, `unhappy` and `reset-happiness` adjust the happiness index and
//! report the resulting eligibility.

use std::fmt;

use serde::Serialize;

use crate::core::{AskOutcome, HappinessOutcome, ReviewEngine};
use crate::storage::CounterStore;

/// Which way to move the happiness index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HappinessAction {
    /// Add one.
    Increment,
    /// Subtract one.
    Decrement,
    /// Set to zero.
    Reset,
}

impl fmt::Display for HappinessAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HappinessAction::Increment => write!(f, "increment"),
            HappinessAction::Decrement => write!(f, "decrement"),
            HappinessAction::Reset => write!(f, "reset"),
        }
    }
}

/// Options for the happiness commands.
#[derive(Debug, Clone, Default)]
pub struct HappinessOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
}

/// Output format for the happiness commands.
#[derive(Debug, Clone, Serialize)]
pub struct HappinessOutput {
    /// Whether the change was stored.
    pub success: bool,
    /// What was done.
    pub action: HappinessAction,
    /// Happiness index after the change.
    pub happiness_index: i64,
    /// Eligibility after the change.
    pub eligible: bool,
    /// Result of the automatic ask, when the `on_threshold` trigger fired.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_ask: Option<AskOutcome>,
    /// Error message if the change failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl HappinessOutput {
    /// Create a successful output.
    pub fn success(action: HappinessAction, outcome: &HappinessOutcome) -> Self {
        Self {
            success: true,
            action,
            happiness_index: outcome.happiness_index,
            eligible: outcome.eligibility.is_eligible(),
            auto_ask: outcome.auto_ask,
            error: None,
        }
    }

    /// Create a failed output.
    pub fn failure(action: HappinessAction, error: impl Into<String>) -> Self {
        Self {
            success: false,
            action,
            happiness_index: 0,
            eligible: false,
            auto_ask: None,
            error: Some(error.into()),
        }
    }
}

/// The happiness command implementation.
pub struct HappinessCommand<'a, S: CounterStore> {
    engine: &'a ReviewEngine<S>,
}

impl<'a, S: CounterStore> HappinessCommand<'a, S> {
    /// Create a new happiness command.
    pub fn new(engine: &'a ReviewEngine<S>) -> Self {
        Self { engine }
    }

    /// Apply `action` to the happiness index.
    pub fn run(&self, action: HappinessAction, _options: &HappinessOptions) -> HappinessOutput {
        let result = match action {
            HappinessAction::Increment => self.engine.increment_happiness(),
            HappinessAction::Decrement => self.engine.decrement_happiness(),
            HappinessAction::Reset => self.engine.reset_happiness(),
        };

        match result {
            Ok(outcome) => HappinessOutput::success(action, &outcome),
            Err(e) => HappinessOutput::failure(action, e.to_string()),
        }
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &HappinessOutput, options: &HappinessOptions) -> String {
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

    fn format_human_readable(&self, output: &HappinessOutput) -> String {
        if !output.success {
            return format!(
                "Happiness {} failed: {}\n",
                output.action,
                output.error.as_deref().unwrap_or("unknown error")
            );
        }

        let mut out = format!(
            "Happiness index: {} ({})\n",
            output.happiness_index,
            if output.eligible {
                "eligible for review"
            } else {
                "not eligible for review"
            }
        );

        if output.auto_ask.is_some_and(|o| o.asked()) {
            out.push_str("Review prompt requested.\n");
        }

        out
    }
}
