//! Clear command for rategate.
//!
//! Erases every stored counter. Requires explicit confirmation.

use serde::Serialize;

use crate::core::ReviewEngine;
use crate::storage::CounterStore;

/// Options for the clear command.
#[derive(Debug, Clone, Default)]
pub struct ClearOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
    /// Confirm the erase.
    pub yes: bool,
}

/// Output format for the clear command.
#[derive(Debug, Clone, Serialize)]
pub struct ClearOutput {
    /// Whether the data was cleared.
    pub success: bool,
    /// Error message if clearing failed or was refused.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ClearOutput {
    /// Create a successful output.
    pub fn success() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    /// Create a failed output.
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
        }
    }
}

/// The clear command implementation.
pub struct ClearCommand<'a, S: CounterStore> {
    engine: &'a ReviewEngine<S>,
}

impl<'a, S: CounterStore> ClearCommand<'a, S> {
    /// Create a new clear command.
    pub fn new(engine: &'a ReviewEngine<S>) -> Self {
        Self { engine }
    }

    /// Run the clear command.
    pub fn run(&self, options: &ClearOptions) -> ClearOutput {
        if !options.yes {
            return ClearOutput::failure("refusing to clear review data without --yes");
        }

        match self.engine.clear_all_data() {
            Ok(_) => ClearOutput::success(),
            Err(e) => ClearOutput::failure(e.to_string()),
        }
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &ClearOutput, options: &ClearOptions) -> String {
        if options.quiet {
            return String::new();
        }

        if options.json {
            format!(
                "{}\n",
                serde_json::to_string_pretty(output).unwrap_or_else(|_| "{}".to_string())
            )
        } else if output.success {
            "Review data cleared.\n".to_string()
        } else {
            format!(
                "Clear failed: {}\n",
                output.error.as_deref().unwrap_or("unknown error")
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::core::ReviewState;
    use crate::host::RecordingPrompt;
    use crate::storage::MemoryCounterStore;

    fn engine() -> ReviewEngine<MemoryCounterStore> {
        let engine = ReviewEngine::new(
            MemoryCounterStore::new(),
            Config::default(),
            RecordingPrompt::new(),
        );
        engine.start().unwrap();
        engine.increment_happiness().unwrap();
        engine
    }

    #[test]
    fn test_clear_requires_yes() {
        let engine = engine();
        let cmd = ClearCommand::new(&engine);
        let options = ClearOptions::default();

        let output = cmd.run(&options);

        assert!(!output.success);
        assert!(output.error.as_deref().unwrap().contains("--yes"));
        assert_eq!(engine.happiness_index().unwrap(), 1);
        assert!(engine.first_launch_date().unwrap().is_some());
    }

    #[test]
    fn test_clear_with_yes() {
        let engine = engine();
        let cmd = ClearCommand::new(&engine);
        let options = ClearOptions {
            yes: true,
            ..Default::default()
        };

        let output = cmd.run(&options);

        assert!(output.success);
        assert_eq!(engine.state().unwrap(), ReviewState::default());
        assert!(!engine.can_ask_for_review().unwrap());
        assert_eq!(cmd.format_output(&output, &options), "Review data cleared.\n");
    }

    #[test]
    fn test_format_output_json() {
        let engine = engine();
        let cmd = ClearCommand::new(&engine);
        let options = ClearOptions {
            json: true,
            ..Default::default()
        };

        let formatted = cmd.format_output(&cmd.run(&options), &options);
        assert!(formatted.contains("\"success\": false"));
        assert!(formatted.contains("--yes"));
    }

    #[test]
    fn test_format_output_quiet() {
        let engine = engine();
        let cmd = ClearCommand::new(&engine);
        let options = ClearOptions {
            quiet: true,
            yes: true,
            ..Default::default()
        };

        assert!(cmd.format_output(&cmd.run(&options), &options).is_empty());
    }
}
