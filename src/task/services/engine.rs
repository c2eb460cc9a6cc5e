//! Controller that owns the task list and wires reducer and sync together.

use super::sync::{SyncConfig, SyncCoordinator, SyncError};
use crate::task::{
    commands::{Action, ActionEnvelope, CommandError, TaskList, apply},
    domain::{Task, TaskId, due_today, pending_count, reset_stale_in_place, visible_tasks},
    ports::{CommandInterpreter, InterpreterError, RemoteStore},
};
use chrono::NaiveDate;
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Engine-level errors.
#[derive(Debug, Clone, Error)]
pub enum EngineError {
    /// The reducer rejected the action.
    #[error(transparent)]
    Command(#[from] CommandError),
    /// The interpreter failed or reported an error.
    #[error(transparent)]
    Interpreter(#[from] InterpreterError),
    /// Loading or saving failed.
    #[error(transparent)]
    Sync(#[from] SyncError),
}

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Single owner of the task state.
///
/// Every mutation goes through [`dispatch`](Self::dispatch), which applies the
/// action atomically and then hands the new task set to the sync coordinator.
/// Construct with [`new`](Self::new), call [`load`](Self::load), and end with
/// [`shutdown`](Self::shutdown) to write any pending change.
#[derive(Debug)]
pub struct TaskEngine<S, C>
where
    S: RemoteStore + 'static,
    C: Clock + Send + Sync,
{
    list: TaskList,
    sync: SyncCoordinator<S>,
    clock: Arc<C>,
}

impl<S, C> TaskEngine<S, C>
where
    S: RemoteStore + 'static,
    C: Clock + Send + Sync,
{
    /// Creates an empty, unhydrated engine.
    #[must_use]
    pub fn new(store: Arc<S>, clock: Arc<C>, config: SyncConfig) -> Self {
        Self {
            list: TaskList::default(),
            sync: SyncCoordinator::new(store, config),
            clock,
        }
    }

    /// Returns the user's current calendar date.
    #[must_use]
    pub fn today(&self) -> NaiveDate {
        self.clock.local().date_naive()
    }

    /// Returns the task list and view state.
    #[must_use]
    pub const fn list(&self) -> &TaskList {
        &self.list
    }

    /// Returns the tasks in insertion order.
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        self.list.tasks()
    }

    /// Returns the sync coordinator.
    #[must_use]
    pub const fn sync(&self) -> &SyncCoordinator<S> {
        &self.sync
    }

    /// Returns `true` once a load has succeeded.
    #[must_use]
    pub const fn is_hydrated(&self) -> bool {
        self.sync.is_hydrated()
    }

    /// Loads the remote set, rolls stale tasks over, and replaces local state.
    ///
    /// A rollover is itself a change and schedules a save. Returns how many
    /// tasks rolled over.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Sync`] when the load fails; local state is left
    /// as it was.
    pub async fn load(&mut self) -> EngineResult<usize> {
        let today = self.today();
        let outcome = self.sync.load(today).await?;
        self.list = self.list.with_tasks(outcome.tasks);
        if outcome.rolled_over > 0 {
            self.sync.on_state_change(self.list.tasks());
        }
        Ok(outcome.rolled_over)
    }

    /// Explicit user retry after a failed load.
    ///
    /// # Errors
    ///
    /// As for [`load`](Self::load).
    pub async fn retry(&mut self) -> EngineResult<usize> {
        self.load().await
    }

    /// Re-runs rollover when the application becomes visible again.
    ///
    /// Returns how many tasks rolled over.
    pub fn on_foreground(&mut self) -> usize {
        let mut tasks = self.list.tasks().to_vec();
        let rolled_over = reset_stale_in_place(&mut tasks, self.today());
        if rolled_over > 0 {
            tracing::debug!(rolled_over, "rolled tasks over on foreground");
            self.list = self.list.with_tasks(tasks);
            self.sync.on_state_change(self.list.tasks());
        }
        rolled_over
    }

    /// Applies a typed action.
    ///
    /// Create actions without an id get a fresh one first. A save is
    /// scheduled only when the task set actually changed.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError`] from the reducer; state is unchanged.
    pub fn dispatch(&mut self, mut action: Action) -> Result<(), CommandError> {
        if let Action::Create(new_task) = &mut action {
            new_task.ensure_id(TaskId::generate);
        }
        let next = apply(&self.list, &action, self.today())?;
        let changed = next.tasks() != self.list.tasks();
        self.list = next;
        tracing::debug!(kind = action.kind(), changed, "applied action");
        if changed {
            self.sync.on_state_change(self.list.tasks());
        }
        Ok(())
    }

    /// Validates an interpreter envelope and applies it.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Interpreter`] when the envelope carries an
    /// error string and [`EngineError::Command`] when it fails validation or
    /// targets an absent task.
    pub fn dispatch_envelope(&mut self, mut envelope: ActionEnvelope) -> EngineResult<()> {
        if let Some(message) = envelope.error.take() {
            return Err(InterpreterError::Reported(message).into());
        }
        let action = envelope.into_action().map_err(CommandError::from)?;
        self.dispatch(action)?;
        Ok(())
    }

    /// Sends free text through `interpreter` and applies the result.
    ///
    /// The interpreter sees the current snapshot and the active type filter.
    ///
    /// # Errors
    ///
    /// As for [`dispatch_envelope`](Self::dispatch_envelope), plus
    /// interpreter failures.
    pub async fn interpret<I>(&mut self, interpreter: &I, text: &str) -> EngineResult<()>
    where
        I: CommandInterpreter + ?Sized,
    {
        let envelope = interpreter
            .interpret(text, self.list.tasks(), self.list.view().active_type())
            .await?;
        self.dispatch_envelope(envelope)
    }

    /// Returns the filtered, sorted view.
    #[must_use]
    pub fn visible_tasks(&self) -> Vec<&Task> {
        visible_tasks(self.list.tasks(), self.list.view(), self.today())
    }

    /// Returns the pending tasks due today.
    #[must_use]
    pub fn due_today(&self) -> Vec<&Task> {
        due_today(self.list.tasks(), self.today())
    }

    /// Counts pending tasks.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        pending_count(self.list.tasks())
    }

    /// Writes the current task set immediately.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::NotHydrated`] before the first successful load.
    pub async fn save_now(&mut self) -> EngineResult<()> {
        self.sync.save_now(self.list.tasks()).await?;
        Ok(())
    }

    /// Ends the engine's lifecycle, writing any pending debounced change.
    ///
    /// Returns `true` when a pending save was written.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Sync`] when the final write fails.
    pub async fn shutdown(mut self) -> EngineResult<bool> {
        Ok(self.sync.flush().await?)
    }
}
