//! Eligibility policy for review prompts.
//!
//! `evaluate` is a pure function of the stored counters, the configuration,
//! the current time and the running app version. The engine calls it after
//! every mutation; nothing here touches storage.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::core::state::{Eligibility, ReviewState};

/// Outcome of one eligibility recomputation, gate by gate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evaluation {
    /// Enough time has passed since first launch.
    pub time_gate: bool,
    /// The yearly ask budget is not exhausted.
    pub annual_cap_gate: bool,
    /// Happiness sits on a non-zero multiple of the threshold.
    pub happiness_gate: bool,
    /// No ask has been recorded for the running version.
    pub version_gate: bool,
    /// Asks recorded in the current calendar year.
    pub asks_this_year: u32,
    /// Happiness index the decision was made with.
    pub happiness_index: i64,
    /// Version the decision was made with, if one could be resolved.
    pub current_version: Option<String>,
    /// Final decision.
    pub eligibility: Eligibility,
}

impl Evaluation {
    /// Whether a non-forced ask may proceed.
    pub fn can_ask(&self) -> bool {
        self.eligibility.is_eligible()
    }

    /// Whether a forced ask may proceed (only the version gate applies).
    pub fn can_force_ask(&self) -> bool {
        self.version_gate
    }

    /// One-line summary for the logging adapter.
    pub fn summary(&self) -> String {
        format!(
            "happiness {} | asks this year {} | time {} | cap {} | happiness gate {} | version {} => can ask for review: {}",
            self.happiness_index,
            self.asks_this_year,
            self.time_gate,
            self.annual_cap_gate,
            self.happiness_gate,
            self.version_gate,
            self.can_ask()
        )
    }
}

/// Compute eligibility for `state` at `now`.
///
/// `current_version` is the identifier the version gate compares against;
/// `None` disables the version gate.
pub fn evaluate(
    state: &ReviewState,
    config: &Config,
    now: DateTime<Utc>,
    current_version: Option<&str>,
) -> Evaluation {
    let asks_this_year = state.asks_in_year_of(now);

    let time_gate = time_gate(
        state.first_launch_date,
        config.policy.days_after_first_launch,
        now,
    );
    let annual_cap_gate = asks_this_year < config.policy.max_asks_per_year;
    let happiness_gate = happiness_gate(
        state.happiness_index,
        config.policy.effective_happiness_threshold(),
    );
    let version_gate = version_gate(state.last_asked_version.as_deref(), current_version);

    let eligible = version_gate && time_gate && annual_cap_gate && happiness_gate;

    Evaluation {
        time_gate,
        annual_cap_gate,
        happiness_gate,
        version_gate,
        asks_this_year,
        happiness_index: state.happiness_index,
        current_version: current_version.map(str::to_string),
        eligibility: Eligibility::from(eligible),
    }
}

/// `now` is strictly after first launch plus the waiting period.
pub fn time_gate(
    first_launch_date: Option<DateTime<Utc>>,
    days_after_first_launch: u32,
    now: DateTime<Utc>,
) -> bool {
    match first_launch_date {
        Some(first) => now > first + Duration::days(i64::from(days_after_first_launch)),
        None => false,
    }
}

/// Happiness is non-zero and divisible by the threshold.
///
/// A zero threshold is treated as 1.
pub fn happiness_gate(happiness_index: i64, threshold: u32) -> bool {
    let divisor = i64::from(threshold.max(1));
    happiness_index != 0 && happiness_index.rem_euclid(divisor) == 0
}

/// No ask recorded for the running version.
pub fn version_gate(last_asked_version: Option<&str>, current_version: Option<&str>) -> bool {
    match (last_asked_version, current_version) {
        (Some(last), Some(current)) => last != current,
        _ => true,
    }
}
