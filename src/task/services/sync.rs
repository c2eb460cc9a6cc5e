//! Debounced, hydration-guarded synchronization with the remote store.
//!
//! Nothing is written until one load has succeeded. After that every state
//! change restarts a quiet-period timer and only the last snapshot of a burst
//! is written, as a full overwrite. A failed save is logged and left for the
//! next debounce cycle to reconcile.

use crate::task::{
    domain::{Task, reset_stale_in_place},
    ports::{RemoteStore, RemoteStoreError},
};
use chrono::NaiveDate;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::task::JoinHandle;

/// Bounded retry with exponential backoff for remote loads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    initial_backoff: Duration,
}

impl RetryPolicy {
    /// Creates a policy. `max_attempts` is clamped to at least one.
    #[must_use]
    pub fn new(max_attempts: u32, initial_backoff: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            initial_backoff,
        }
    }

    /// A policy that tries exactly once.
    #[must_use]
    pub const fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            initial_backoff: Duration::ZERO,
        }
    }

    /// Returns the maximum number of attempts.
    #[must_use]
    pub const fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Returns the delay before the first retry.
    #[must_use]
    pub const fn initial_backoff(&self) -> Duration {
        self.initial_backoff
    }

    /// Delay after the `failed_attempts`-th failure (1-based), doubling each
    /// time.
    #[must_use]
    pub fn backoff_after(&self, failed_attempts: u32) -> Duration {
        let factor = 1_u32
            .checked_shl(failed_attempts.saturating_sub(1))
            .unwrap_or(u32::MAX);
        self.initial_backoff.saturating_mul(factor)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_millis(500))
    }
}

/// Timing parameters of the coordinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncConfig {
    /// Quiet period after the last change before a save is issued.
    pub quiet_period: Duration,
    /// Retry policy for loads.
    pub retry: RetryPolicy,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            quiet_period: Duration::from_secs(2),
            retry: RetryPolicy::default(),
        }
    }
}

/// Synchronization failures.
#[derive(Debug, Clone, Error)]
pub enum SyncError {
    /// A save was requested before any load succeeded.
    #[error("task list has not been loaded from the remote store yet")]
    NotHydrated,

    /// The remote store failed.
    #[error(transparent)]
    Remote(#[from] RemoteStoreError),
}

impl SyncError {
    /// Returns `true` when an explicit retry may succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::NotHydrated => false,
            Self::Remote(err) => err.is_retryable(),
        }
    }
}

/// Result of a successful load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadOutcome {
    /// The remote set after rollover.
    pub tasks: Vec<Task>,
    /// How many tasks rolled over during the load.
    pub rolled_over: usize,
}

/// Cancelable handle to a pending debounced save.
#[derive(Debug)]
pub struct ScheduledSave {
    timer: JoinHandle<()>,
    snapshot: Vec<Task>,
}

impl ScheduledSave {
    /// Returns `true` once the timer has fired or been cancelled.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.timer.is_finished()
    }

    /// Returns the snapshot the save will write.
    #[must_use]
    pub fn snapshot(&self) -> &[Task] {
        &self.snapshot
    }

    fn cancel(&self) {
        self.timer.abort();
    }
}

/// Reconciles the local task set with a remote store.
#[derive(Debug)]
pub struct SyncCoordinator<S>
where
    S: RemoteStore + 'static,
{
    store: Arc<S>,
    config: SyncConfig,
    hydrated: bool,
    scheduled: Option<ScheduledSave>,
}

impl<S> SyncCoordinator<S>
where
    S: RemoteStore + 'static,
{
    /// Creates an unhydrated coordinator.
    #[must_use]
    pub const fn new(store: Arc<S>, config: SyncConfig) -> Self {
        Self {
            store,
            config,
            hydrated: false,
            scheduled: None,
        }
    }

    /// Returns `true` once a load has succeeded.
    #[must_use]
    pub const fn is_hydrated(&self) -> bool {
        self.hydrated
    }

    /// Returns the timing configuration.
    #[must_use]
    pub const fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Returns the pending save, if the timer has not fired yet.
    #[must_use]
    pub fn scheduled(&self) -> Option<&ScheduledSave> {
        self.scheduled.as_ref().filter(|save| !save.is_finished())
    }

    /// Loads the remote set and rolls stale tasks over to `today`.
    ///
    /// Connection failures are retried per the [`RetryPolicy`]; other
    /// failures return at once. Success marks the coordinator hydrated and
    /// drops any pending save, since the caller replaces its state wholesale.
    /// Failure never hydrates.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Remote`] with the last remote failure.
    pub async fn load(&mut self, today: NaiveDate) -> Result<LoadOutcome, SyncError> {
        let max_attempts = self.config.retry.max_attempts();
        let mut attempt: u32 = 1;
        loop {
            match self.store.load().await {
                Ok(mut tasks) => {
                    let rolled_over = reset_stale_in_place(&mut tasks, today);
                    if let Some(pending) = self.scheduled.take() {
                        pending.cancel();
                    }
                    self.hydrated = true;
                    tracing::info!(count = tasks.len(), rolled_over, attempt, "hydrated task list");
                    return Ok(LoadOutcome { tasks, rolled_over });
                }
                Err(err) if err.is_retryable() && attempt < max_attempts => {
                    let delay = self.config.retry.backoff_after(attempt);
                    tracing::warn!(error = %err, attempt, ?delay, "task load failed; retrying");
                    tokio::time::sleep(delay).await;
                    attempt = attempt.saturating_add(1);
                }
                Err(err) => {
                    tracing::warn!(error = %err, attempt, hydrated = self.hydrated, "task load failed");
                    return Err(err.into());
                }
            }
        }
    }

    /// Re-attempts [`load`](Self::load) on explicit request.
    ///
    /// # Errors
    ///
    /// As for [`load`](Self::load).
    pub async fn retry(&mut self, today: NaiveDate) -> Result<LoadOutcome, SyncError> {
        self.load(today).await
    }

    /// Records a state change and (re)starts the debounce timer.
    ///
    /// Ignored until hydrated. Returns `true` when a save was scheduled.
    /// Must be called from within a Tokio runtime.
    pub fn on_state_change(&mut self, tasks: &[Task]) -> bool {
        if !self.hydrated {
            tracing::debug!("ignoring state change before hydration");
            return false;
        }
        if let Some(previous) = self.scheduled.take() {
            previous.cancel();
        }
        let store = Arc::clone(&self.store);
        let payload = tasks.to_vec();
        let quiet_period = self.config.quiet_period;
        let timer = tokio::spawn(async move {
            tokio::time::sleep(quiet_period).await;
            // Detached so cancelling a later timer never aborts this write.
            tokio::spawn(save_snapshot(store, payload));
        });
        tracing::debug!(count = tasks.len(), ?quiet_period, "scheduled debounced save");
        self.scheduled = Some(ScheduledSave {
            timer,
            snapshot: tasks.to_vec(),
        });
        true
    }

    /// Cancels the pending timer and writes its snapshot immediately.
    ///
    /// Returns `true` when a save was performed.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Remote`] when the write fails.
    pub async fn flush(&mut self) -> Result<bool, SyncError> {
        let Some(pending) = self.scheduled.take() else {
            return Ok(false);
        };
        if pending.is_finished() {
            return Ok(false);
        }
        pending.cancel();
        self.store.save(&pending.snapshot).await?;
        tracing::info!(count = pending.snapshot.len(), "flushed pending save");
        Ok(true)
    }

    /// Writes `tasks` immediately, bypassing the debounce timer.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::NotHydrated`] before the first successful load,
    /// or [`SyncError::Remote`] when the write fails.
    pub async fn save_now(&mut self, tasks: &[Task]) -> Result<(), SyncError> {
        if !self.hydrated {
            return Err(SyncError::NotHydrated);
        }
        if let Some(pending) = self.scheduled.take() {
            pending.cancel();
        }
        self.store.save(tasks).await?;
        Ok(())
    }
}

impl<S> Drop for SyncCoordinator<S>
where
    S: RemoteStore + 'static,
{
    fn drop(&mut self) {
        if let Some(pending) = self.scheduled.take() {
            pending.cancel();
        }
    }
}

async fn save_snapshot<S>(store: Arc<S>, tasks: Vec<Task>)
where
    S: RemoteStore + 'static,
{
    match store.save(&tasks).await {
        Ok(()) => tracing::debug!(count = tasks.len(), "debounced save completed"),
        Err(err) => tracing::warn!(
            error = %err,
            count = tasks.len(),
            "debounced save failed; the next change will retry"
        ),
    }
}
