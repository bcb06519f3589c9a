//! Persisted review counters and derived eligibility types.
//!
//! `ReviewState` is the full set of facts the policy reads. Everything else
//! in this module is derived from it and never persisted.

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

/// The four persisted review counters.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ReviewState {
    /// When the engine first started on this install.
    pub first_launch_date: Option<DateTime<Utc>>,
    /// Net happiness signal reported by the host.
    pub happiness_index: i64,
    /// Every recorded ask, oldest first.
    pub dates_asked_for_review: Vec<DateTime<Utc>>,
    /// Application version at the most recent ask.
    pub last_asked_version: Option<String>,
}

impl ReviewState {
    /// Number of recorded asks that fall in the same UTC calendar year as `now`.
    pub fn asks_in_year_of(&self, now: DateTime<Utc>) -> u32 {
        let year = now.year();
        let count = self
            .dates_asked_for_review
            .iter()
            .filter(|date| date.year() == year)
            .count();
        u32::try_from(count).unwrap_or(u32::MAX)
    }

    /// Most recent ask, if any.
    pub fn last_asked_at(&self) -> Option<DateTime<Utc>> {
        self.dates_asked_for_review.last().copied()
    }
}

/// Two-state view of `can_ask_for_review`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Eligibility {
    /// A review prompt may be requested now.
    Eligible,
    /// At least one gate is closed.
    #[default]
    NotEligible,
}

impl Eligibility {
    /// Check if a prompt may be requested.
    pub fn is_eligible(&self) -> bool {
        matches!(self, Eligibility::Eligible)
    }
}

impl From<bool> for Eligibility {
    fn from(value: bool) -> Self {
        if value {
            Eligibility::Eligible
        } else {
            Eligibility::NotEligible
        }
    }
}

/// Result of `ask_for_review`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AskOutcome {
    /// The ask was recorded and the prompt requested.
    Asked,
    /// Gates 1-3 were closed and the ask was not forced.
    NotEligible,
    /// An ask was already recorded for the current version.
    AlreadyAskedThisVersion,
}

impl AskOutcome {
    /// Whether the prompt was requested.
    pub fn asked(&self) -> bool {
        matches!(self, AskOutcome::Asked)
    }
}

/// Result of a happiness mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HappinessOutcome {
    /// Happiness index after the mutation.
    pub happiness_index: i64,
    /// Eligibility after the mutation (and after any automatic ask).
    pub eligibility: Eligibility,
    /// Automatic ask result, when the `on_threshold` trigger fired.
    pub auto_ask: Option<AskOutcome>,
}

impl HappinessOutcome {
    /// Whether the mutation ended in a recorded ask.
    pub fn asked(&self) -> bool {
        self.auto_ask.map(|outcome| outcome.asked()).unwrap_or(false)
    }
}

/// Result of `start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaunchOutcome {
    /// True when no first-launch date was stored and one was just set.
    pub first_launch: bool,
    /// The stored first-launch date after start.
    pub first_launch_date: DateTime<Utc>,
    /// Eligibility right after start.
    pub eligibility: Eligibility,
}
