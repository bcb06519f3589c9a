//! Ask command for rategate.
//!
//! Runs the ask flow and reports whether a review prompt was requested.

use serde::Serialize;

use crate::core::{AskOutcome, ReviewEngine};
use crate::storage::CounterStore;

/// Options for the ask command.
#[derive(Debug, Clone, Default)]
pub struct AskOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
    /// Skip the time, annual-cap and happiness gates.
    pub force: bool,
}

/// Output format for the ask command.
#[derive(Debug, Clone, Serialize)]
pub struct AskOutput {
    /// Whether the ask flow completed without error.
    pub success: bool,
    /// What the ask flow decided.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<AskOutcome>,
    /// Whether the ask was forced.
    pub forced: bool,
    /// Error message if the ask flow failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AskOutput {
    /// Create a successful output.
    pub fn success(outcome: AskOutcome, forced: bool) -> Self {
        Self {
            success: true,
            outcome: Some(outcome),
            forced,
            error: None,
        }
    }

    /// Create a failed output.
    pub fn failure(error: impl Into<String>, forced: bool) -> Self {
        Self {
            success: false,
            outcome: None,
            forced,
            error: Some(error.into()),
        }
    }

    /// Whether a prompt was requested.
    pub fn asked(&self) -> bool {
        self.outcome.is_some_and(|o| o.asked())
    }
}

/// The ask command implementation.
pub struct AskCommand<'a, S: CounterStore> {
    engine: &'a ReviewEngine<S>,
}

impl<'a, S: CounterStore> AskCommand<'a, S> {
    /// Create a new ask command.
    pub fn new(engine: &'a ReviewEngine<S>) -> Self {
        Self { engine }
    }

    /// Run the ask flow.
    ///
    /// Declining to ask is a successful run; only storage failures are
    /// reported as errors.
    pub fn run(&self, options: &AskOptions) -> AskOutput {
        match self.engine.ask_for_review(options.force) {
            Ok(outcome) => AskOutput::success(outcome, options.force),
            Err(e) => AskOutput::failure(e.to_string(), options.force),
        }
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &AskOutput, options: &AskOptions) -> String {
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

    fn format_human_readable(&self, output: &AskOutput) -> String {
        match output.outcome {
            Some(AskOutcome::Asked) if output.forced => {
                "Review prompt requested (forced).\n".to_string()
            }
            Some(AskOutcome::Asked) => "Review prompt requested.\n".to_string(),
            Some(AskOutcome::NotEligible) => {
                "Not asking: not eligible for a review right now.\n".to_string()
            }
            Some(AskOutcome::AlreadyAskedThisVersion) => {
                "Not asking: already asked for a review in this version.\n".to_string()
            }
            None => format!(
                "Ask failed: {}\n",
                output.error.as_deref().unwrap_or("unknown error")
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::host::{AppVersion, ManualClock, RecordingPrompt, StaticVersion};
    use crate::storage::MemoryCounterStore;
    use chrono::{Duration, TimeZone, Utc};
    use std::sync::Arc;

    struct Setup {
        engine: ReviewEngine<MemoryCounterStore>,
        prompt: Arc<RecordingPrompt>,
        clock: Arc<ManualClock>,
    }

    fn setup() -> Setup {
        let prompt = Arc::new(RecordingPrompt::new());
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2026, 9, 1, 18, 0, 0).unwrap(),
        ));
        let engine = ReviewEngine::new(
            MemoryCounterStore::new(),
            Config::default(),
            Arc::clone(&prompt),
        )
        .with_version_provider(StaticVersion::new(AppVersion::new("3.0.0")))
        .with_clock(Arc::clone(&clock));
        engine.start().unwrap();
        Setup {
            engine,
            prompt,
            clock,
        }
    }

    #[test]
    fn test_ask_not_eligible() {
        let s = setup();
        let cmd = AskCommand::new(&s.engine);
        let options = AskOptions::default();

        let output = cmd.run(&options);

        assert!(output.success);
        assert_eq!(output.outcome, Some(AskOutcome::NotEligible));
        assert!(!output.asked());
        assert_eq!(s.prompt.requests(), 0);
        assert_eq!(
            cmd.format_output(&output, &options),
            "Not asking: not eligible for a review right now.\n"
        );
    }

    #[test]
    fn test_ask_when_eligible() {
        let s = setup();
        s.clock.advance(Duration::days(8));
        for _ in 0..5 {
            s.engine.increment_happiness().unwrap();
        }

        let cmd = AskCommand::new(&s.engine);
        let options = AskOptions::default();
        let output = cmd.run(&options);

        assert!(output.asked());
        assert_eq!(s.prompt.requests(), 1);
        assert_eq!(
            cmd.format_output(&output, &options),
            "Review prompt requested.\n"
        );
    }

    #[test]
    fn test_forced_ask_once_per_version() {
        let s = setup();
        let cmd = AskCommand::new(&s.engine);
        let options = AskOptions {
            force: true,
            ..Default::default()
        };

        let first = cmd.run(&options);
        assert!(first.asked());
        assert!(first.forced);
        assert_eq!(
            cmd.format_output(&first, &options),
            "Review prompt requested (forced).\n"
        );

        let second = cmd.run(&options);
        assert_eq!(second.outcome, Some(AskOutcome::AlreadyAskedThisVersion));
        assert!(cmd
            .format_output(&second, &options)
            .contains("already asked"));
        assert_eq!(s.prompt.requests(), 1);
    }

    #[test]
    fn test_format_output_json() {
        let s = setup();
        let cmd = AskCommand::new(&s.engine);
        let options = AskOptions {
            json: true,
            force: true,
            ..Default::default()
        };

        let formatted = cmd.format_output(&cmd.run(&options), &options);
        assert!(formatted.ends_with("}\n"));

        let value: serde_json::Value = serde_json::from_str(&formatted).unwrap();
        assert_eq!(value["outcome"], "asked");
        assert_eq!(value["forced"], true);
    }

    #[test]
    fn test_format_output_quiet() {
        let s = setup();
        let cmd = AskCommand::new(&s.engine);
        let options = AskOptions {
            quiet: true,
            ..Default::default()
        };

        assert!(cmd.format_output(&cmd.run(&options), &options).is_empty());
    }

    #[test]
    fn test_ask_output_failure() {
        let output = AskOutput::failure("state file is corrupt", false);
        assert!(!output.success);
        assert!(!output.asked());
        assert_eq!(output.error.as_deref(), Some("state file is corrupt"));
    }
}
