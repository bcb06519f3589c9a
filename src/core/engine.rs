//! Review prompt engine.
//!
//! `ReviewEngine` owns a counter store and decides, through
//! [`evaluate`](crate::core::policy::evaluate), whether the host may show a
//! rating prompt. Every public operation takes the engine lock for its whole
//! read-modify-write cycle, so an ask decision always sees every earlier
//! mutation.

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};

use crate::config::{AskTrigger, Config};
use crate::core::policy::{evaluate, Evaluation};
use crate::core::state::{AskOutcome, HappinessOutcome, LaunchOutcome, ReviewState};
use crate::error::{RateGateError, Result};
use crate::host::{
    Clock, PromptRequester, ReviewLogger, StaticVersion, SystemClock, VersionProvider,
};
use crate::storage::CounterStore;

/// Decides when to ask for a store review and records each ask.
pub struct ReviewEngine<S: CounterStore> {
    store: S,
    /// Current configuration; the mutex also serializes every operation.
    config: Mutex<Config>,
    prompt: Arc<dyn PromptRequester>,
    version: Arc<dyn VersionProvider>,
    logger: Option<Arc<dyn ReviewLogger>>,
    clock: Arc<dyn Clock>,
}

impl<S: CounterStore> ReviewEngine<S> {
    /// Create an engine over `store`.
    ///
    /// Defaults: wall-clock time, no logging adapter, and no version
    /// provider (which disables the version gate until one is set).
    pub fn new(store: S, config: Config, prompt: impl PromptRequester + 'static) -> Self {
        Self {
            store,
            config: Mutex::new(config),
            prompt: Arc::new(prompt),
            version: Arc::new(StaticVersion::unknown()),
            logger: None,
            clock: Arc::new(SystemClock),
        }
    }

    /// Use `provider` to resolve the running app version.
    pub fn with_version_provider(mut self, provider: impl VersionProvider + 'static) -> Self {
        self.version = Arc::new(provider);
        self
    }

    /// Send human-readable events to `logger`.
    pub fn with_logger(mut self, logger: impl ReviewLogger + 'static) -> Self {
        self.logger = Some(Arc::new(logger));
        self
    }

    /// Read the time from `clock`.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    // =========================================================================
    // Operations
    // =========================================================================

    /// Record the app launch.
    ///
    /// Stores the first-launch date if none exists, then recomputes.
    pub fn start(&self) -> Result<LaunchOutcome> {
        let config = self.lock()?;
        let now = self.clock.now();

        let (first_launch, first_launch_date) = match self.store.first_launch_date()? {
            Some(date) => {
                self.log(&format!(
                    "Review engine started. First launched at {}",
                    date.format("%Y-%m-%d")
                ));
                (false, date)
            }
            None => {
                self.store.set_first_launch_date(Some(now))?;
                self.log("Review engine started for the first time. Setting first launch date to now.");
                (true, now)
            }
        };

        let evaluation = self.recompute(&config, now)?;
        Ok(LaunchOutcome {
            first_launch,
            first_launch_date,
            eligibility: evaluation.eligibility,
        })
    }

    /// Add one to the happiness index.
    ///
    /// With the `on_threshold` ask trigger, an increment that makes the user
    /// eligible records an ask and requests the prompt before returning.
    pub fn increment_happiness(&self) -> Result<HappinessOutcome> {
        let config = self.lock()?;
        let now = self.clock.now();

        let happiness_index = self.store.happiness_index()?.saturating_add(1);
        self.store.set_happiness_index(happiness_index)?;
        self.log(&format!(
            "Incrementing happiness, index is now: {}",
            happiness_index
        ));

        let mut evaluation = self.recompute(&config, now)?;
        let mut auto_ask = None;

        if config.ask.trigger == AskTrigger::OnThreshold && evaluation.can_ask() {
            auto_ask = Some(self.record_ask(&evaluation, now)?);
            evaluation = self.recompute(&config, now)?;
        }

        Ok(HappinessOutcome {
            happiness_index,
            eligibility: evaluation.eligibility,
            auto_ask,
        })
    }

    /// Subtract one from the happiness index.
    ///
    /// When `happiness.floor_at_zero` is set, a decrement at or below zero
    /// leaves the index unchanged.
    pub fn decrement_happiness(&self) -> Result<HappinessOutcome> {
        let config = self.lock()?;
        let now = self.clock.now();

        let current = self.store.happiness_index()?;
        let happiness_index = if config.happiness.floor_at_zero && current <= 0 {
            self.log(&format!(
                "Happiness is already at {}, not decrementing",
                current
            ));
            current
        } else {
            let next = current.saturating_sub(1);
            self.store.set_happiness_index(next)?;
            self.log(&format!("Decrementing happiness, index is now: {}", next));
            next
        };

        let evaluation = self.recompute(&config, now)?;
        Ok(HappinessOutcome {
            happiness_index,
            eligibility: evaluation.eligibility,
            auto_ask: None,
        })
    }

    /// Set the happiness index back to zero.
    pub fn reset_happiness(&self) -> Result<HappinessOutcome> {
        let config = self.lock()?;
        let now = self.clock.now();

        self.store.set_happiness_index(0)?;
        self.log("Resetting happiness, index is now: 0");

        let evaluation = self.recompute(&config, now)?;
        Ok(HappinessOutcome {
            happiness_index: 0,
            eligibility: evaluation.eligibility,
            auto_ask: None,
        })
    }

    /// Ask for a review if allowed.
    ///
    /// `force` skips the time, annual-cap and happiness gates. The version
    /// gate always applies: one ask per shipped version, forced or not.
    pub fn ask_for_review(&self, force: bool) -> Result<AskOutcome> {
        let config = self.lock()?;
        let now = self.clock.now();
        let evaluation = self.recompute(&config, now)?;

        if !evaluation.can_force_ask() {
            return Ok(AskOutcome::AlreadyAskedThisVersion);
        }

        if !force && !evaluation.can_ask() {
            self.log("Not asking for review: not eligible right now");
            return Ok(AskOutcome::NotEligible);
        }

        let outcome = self.record_ask(&evaluation, now)?;
        self.recompute(&config, now)?;
        Ok(outcome)
    }

    /// Erase every counter.
    ///
    /// The first-launch date becomes absent, so the time gate stays closed
    /// until the next `start`.
    pub fn clear_all_data(&self) -> Result<Evaluation> {
        let config = self.lock()?;
        let now = self.clock.now();

        self.store.clear()?;
        self.log("Cleared all review data");

        self.recompute(&config, now)
    }

    /// Replace the configuration and recompute.
    pub fn set_config(&self, config: Config) -> Result<Evaluation> {
        let mut guard = self.lock()?;
        let now = self.clock.now();

        *guard = config;
        tracing::debug!("review engine config replaced");

        self.recompute(&guard, now)
    }

    /// Recompute eligibility at the current time.
    pub fn evaluate(&self) -> Result<Evaluation> {
        let config = self.lock()?;
        let now = self.clock.now();
        self.recompute(&config, now)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Whether a prompt may be requested now.
    pub fn can_ask_for_review(&self) -> Result<bool> {
        Ok(self.evaluate()?.can_ask())
    }

    /// Current happiness index.
    pub fn happiness_index(&self) -> Result<i64> {
        let _guard = self.lock()?;
        self.store.happiness_index()
    }

    /// Recorded asks, oldest first.
    pub fn dates_asked_for_review(&self) -> Result<Vec<DateTime<Utc>>> {
        let _guard = self.lock()?;
        self.store.dates_asked_for_review()
    }

    /// First-launch date, if `start` has run since the last clear.
    pub fn first_launch_date(&self) -> Result<Option<DateTime<Utc>>> {
        let _guard = self.lock()?;
        self.store.first_launch_date()
    }

    /// Version recorded with the most recent ask.
    pub fn last_asked_version(&self) -> Result<Option<String>> {
        let _guard = self.lock()?;
        self.store.last_asked_version()
    }

    /// All stored counters at once.
    pub fn state(&self) -> Result<ReviewState> {
        let _guard = self.lock()?;
        self.store.snapshot()
    }

    /// Copy of the current configuration.
    pub fn config(&self) -> Result<Config> {
        Ok(self.lock()?.clone())
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn lock(&self) -> Result<MutexGuard<'_, Config>> {
        self.config
            .lock()
            .map_err(|_| RateGateError::invalid_state("review engine lock poisoned"))
    }

    fn log(&self, message: &str) {
        tracing::debug!(target: "rategate::engine", "{}", message);
        if let Some(logger) = &self.logger {
            logger.log(message);
        }
    }

    /// Resolve the version identifier the version gate compares.
    fn current_version(&self, config: &Config) -> Option<String> {
        match self.version.current_version() {
            Some(version) => Some(version.identifier(config.version.include_build)),
            None => {
                self.log("App version could not be determined; version gating is disabled");
                None
            }
        }
    }

    /// Evaluate all gates and log the decision. Caller holds the lock.
    fn recompute(&self, config: &Config, now: DateTime<Utc>) -> Result<Evaluation> {
        let state = self.store.snapshot()?;
        let current_version = self.current_version(config);
        let evaluation = evaluate(&state, config, now, current_version.as_deref());

        if let (Some(last), Some(current)) = (&state.last_asked_version, &current_version) {
            if !evaluation.version_gate {
                self.log(&format!(
                    "Already asked for a review in version {}, current version is {}",
                    last, current
                ));
            }
        }

        self.log(&evaluation.summary());
        Ok(evaluation)
    }

    /// Persist an ask and request the prompt. Caller holds the lock.
    ///
    /// History and version are written before the prompt is requested. If
    /// the version write fails the history is rolled back and no prompt is
    /// requested.
    fn record_ask(&self, evaluation: &Evaluation, now: DateTime<Utc>) -> Result<AskOutcome> {
        let previous = self.store.dates_asked_for_review()?;
        let mut dates = previous.clone();
        dates.push(now);
        self.store.set_dates_asked_for_review(&dates)?;

        if let Some(version) = &evaluation.current_version {
            if let Err(err) = self.store.set_last_asked_version(Some(version)) {
                if let Err(rollback) = self.store.set_dates_asked_for_review(&previous) {
                    tracing::warn!(
                        error = %rollback,
                        "failed to roll back ask history after version write failure"
                    );
                }
                return Err(err);
            }
        }

        self.log("Asking for review now");
        self.prompt.request_prompt();
        Ok(AskOutcome::Asked)
    }
}
