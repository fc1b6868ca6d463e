//! Run poller.
//!
//! Waits for a run to reach a state by re-fetching it with `GET /runs/:id`.
//!
//! - The first delay is `poll_interval`, doubled after every attempt and
//!   capped at `poll_max_interval`. Both are at least [`MIN_POLL_INTERVAL`].
//! - Once `poll_timeout` has elapsed the wait fails with
//!   [`TfcError::PollTimeout`] instead of spinning forever.
//!
//! Every check re-reads the service; nothing is cached between attempts.

use std::time::Duration;

use tokio::time::Instant;
use tracing::debug;

use crate::tfc_config::TfcConfig;
use crate::tfc_document::ResourceDocument;
use crate::tfc_error::{TfcError, TfcResult};
use crate::tfc_runs::{RunAttributes, RunTimestamp, TfcRuns};

/// Smallest delay between two polls.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Result of a successful wait.
#[derive(Debug, Clone)]
pub struct PolledRun {
    /// The last document fetched, verbatim.
    pub document: ResourceDocument,
    /// Typed view of that document.
    pub attributes: RunAttributes,
    /// Number of `show` calls made.
    pub attempts: u32,
}

/// Polls a run until a condition holds, with backoff and a deadline.
#[derive(Clone)]
pub struct RunPoller {
    runs: TfcRuns,
    interval: Duration,
    max_interval: Duration,
    timeout: Duration,
}

impl RunPoller {
    /// Create a poller using the cadence from the configuration.
    #[must_use]
    pub const fn new(runs: TfcRuns, cfg: &TfcConfig) -> Self {
        let interval = at_least(Duration::from_millis(cfg.poll_interval_ms), MIN_POLL_INTERVAL);
        Self {
            runs,
            interval,
            max_interval: at_least(Duration::from_millis(cfg.poll_max_interval_ms), interval),
            timeout: Duration::from_millis(cfg.poll_timeout_ms),
        }
    }

    /// Override the cadence.
    ///
    /// `interval` is raised to [`MIN_POLL_INTERVAL`] and `max_interval` to `interval`.
    #[must_use]
    pub const fn with_timing(
        mut self,
        interval: Duration,
        max_interval: Duration,
        timeout: Duration,
    ) -> Self {
        self.interval = at_least(interval, MIN_POLL_INTERVAL);
        self.max_interval = at_least(max_interval, self.interval);
        self.timeout = timeout;
        self
    }

    /// Re-fetch the run until `predicate` holds.
    ///
    /// `waiting_for` describes the condition in logs and timeout errors.
    ///
    /// # Errors
    ///
    /// Returns an error if a `show` call fails, the run cannot be decoded, or
    /// the deadline passes first.
    pub async fn wait_until<F>(
        &self,
        run_id: &str,
        waiting_for: &str,
        mut predicate: F,
    ) -> TfcResult<PolledRun>
    where
        F: FnMut(&RunAttributes) -> bool,
    {
        let start = Instant::now();
        let mut delay = self.interval;
        let mut attempts: u32 = 0;

        loop {
            attempts = attempts.saturating_add(1);

            let document = self.runs.show(run_id).await?;
            let attributes = RunAttributes::from_document(&document)?;

            if predicate(&attributes) {
                debug!(run_id, waiting_for, attempts, "run reached awaited state");
                return Ok(PolledRun {
                    document,
                    attributes,
                    attempts,
                });
            }

            let elapsed = start.elapsed();
            if elapsed >= self.timeout {
                return Err(TfcError::PollTimeout {
                    run_id: run_id.to_string(),
                    waiting_for: waiting_for.to_string(),
                    elapsed,
                });
            }

            debug!(
                run_id,
                waiting_for,
                attempts,
                status = attributes.status.as_deref().unwrap_or("unknown"),
                "waiting on run"
            );

            let remaining = self.timeout.saturating_sub(elapsed);
            tokio::time::sleep(delay.min(remaining)).await;
            delay = next_backoff(delay, self.max_interval);
        }
    }

    /// Wait until planning finished and the run can be applied.
    ///
    /// # Errors
    ///
    /// See [`Self::wait_until`].
    pub async fn wait_until_confirmable(&self, run_id: &str) -> TfcResult<PolledRun> {
        self.wait_until(run_id, "actions.is-confirmable", |run| {
            run.actions.is_confirmable
        })
        .await
    }

    /// Wait until `status-timestamps` records the transition and return its time.
    ///
    /// # Errors
    ///
    /// See [`Self::wait_until`].
    pub async fn wait_for_timestamp(&self, run_id: &str, key: RunTimestamp) -> TfcResult<String> {
        let polled = self
            .wait_until(run_id, key.as_str(), |run| run.status_timestamps.contains(key))
            .await?;

        polled
            .attributes
            .status_timestamps
            .get(key)
            .map(ToString::to_string)
            .ok_or_else(|| TfcError::UnexpectedShape(format!("run {run_id} lost {key}")))
    }
}

const fn at_least(value: Duration, floor: Duration) -> Duration {
    if value.as_nanos() < floor.as_nanos() {
        floor
    } else {
        value
    }
}

#[inline]
fn next_backoff(current: Duration, cap: Duration) -> Duration {
    current.saturating_mul(2).min(cap)
}
