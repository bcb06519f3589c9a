//! Status command for rategate.
//!
//! Shows the stored counters and explains the current decision gate by gate.

use serde::Serialize;

use crate::config::PolicyConfig;
use crate::core::{Evaluation, ReviewEngine, ReviewState};
use crate::error::Result;
use crate::storage::CounterStore;

/// Options for the status command.
#[derive(Debug, Clone, Default)]
pub struct StatusOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
}

/// Output format for the status command.
#[derive(Debug, Clone, Serialize)]
pub struct StatusOutput {
    /// Whether the status could be read.
    pub success: bool,
    /// Gate-by-gate decision.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evaluation: Option<Evaluation>,
    /// Stored counters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<ReviewState>,
    /// Thresholds the decision was made with.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub policy: Option<PolicyConfig>,
    /// Error message if reading failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StatusOutput {
    /// Create a successful output.
    pub fn success(evaluation: Evaluation, state: ReviewState, policy: PolicyConfig) -> Self {
        Self {
            success: true,
            evaluation: Some(evaluation),
            state: Some(state),
            policy: Some(policy),
            error: None,
        }
    }

    /// Create a failed output.
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            evaluation: None,
            state: None,
            policy: None,
            error: Some(error.into()),
        }
    }
}

/// The status command implementation.
pub struct StatusCommand<'a, S: CounterStore> {
    engine: &'a ReviewEngine<S>,
}

impl<'a, S: CounterStore> StatusCommand<'a, S> {
    /// Create a new status command.
    pub fn new(engine: &'a ReviewEngine<S>) -> Self {
        Self { engine }
    }

    /// Run the status command.
    pub fn run(&self, _options: &StatusOptions) -> StatusOutput {
        match self.collect() {
            Ok((evaluation, state, policy)) => StatusOutput::success(evaluation, state, policy),
            Err(e) => StatusOutput::failure(e.to_string()),
        }
    }

    fn collect(&self) -> Result<(Evaluation, ReviewState, PolicyConfig)> {
        let evaluation = self.engine.evaluate()?;
        let state = self.engine.state()?;
        let policy = self.engine.config()?.policy;
        Ok((evaluation, state, policy))
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &StatusOutput, options: &StatusOptions) -> String {
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

    fn format_human_readable(&self, output: &StatusOutput) -> String {
        let (evaluation, state, policy) =
            match (&output.evaluation, &output.state, &output.policy) {
                (Some(e), Some(s), Some(p)) => (e, s, p),
                _ => {
                    return format!(
                        "Status failed: {}\n",
                        output.error.as_deref().unwrap_or("unknown error")
                    )
                }
            };

        let mut out = String::new();

        out.push_str(&format!(
            "Review prompt: {}\n\n",
            if evaluation.can_ask() {
                "eligible"
            } else {
                "not eligible"
            }
        ));

        let first_launch = state
            .first_launch_date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "never".to_string());
        out.push_str(&format!(
            "  {:<10} {}  first launch {}, wait {} days\n",
            "time",
            gate_label(evaluation.time_gate),
            first_launch,
            policy.days_after_first_launch
        ));
        out.push_str(&format!(
            "  {:<10} {}  {} of {} asks this year\n",
            "cap",
            gate_label(evaluation.annual_cap_gate),
            evaluation.asks_this_year,
            policy.max_asks_per_year
        ));
        out.push_str(&format!(
            "  {:<10} {}  index {}, threshold {}\n",
            "happiness",
            gate_label(evaluation.happiness_gate),
            state.happiness_index,
            policy.effective_happiness_threshold()
        ));
        out.push_str(&format!(
            "  {:<10} {}  current {}, last asked {}\n",
            "version",
            gate_label(evaluation.version_gate),
            evaluation.current_version.as_deref().unwrap_or("unknown"),
            state.last_asked_version.as_deref().unwrap_or("never")
        ));

        if let Some(last) = state.last_asked_at() {
            out.push_str(&format!(
                "\nLast asked: {} ({} total)\n",
                last.format("%Y-%m-%d %H:%M:%S UTC"),
                state.dates_asked_for_review.len()
            ));
        }

        out
    }
}

fn gate_label(open: bool) -> &'static str {
    if open {
        "pass"
    } else {
        "FAIL"
    }
}
