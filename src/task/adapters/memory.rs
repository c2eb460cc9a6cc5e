//! In-memory remote store for tests and offline runs.

use async_trait::async_trait;
use std::sync::{Arc, RwLock};

use crate::task::{
    domain::Task,
    ports::{RemoteStore, RemoteStoreError, RemoteStoreResult},
};

/// Thread-safe in-memory remote mirror.
///
/// Failures can be injected to exercise hydration and save error paths.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRemoteStore {
    state: Arc<RwLock<InMemoryRemoteState>>,
}

#[derive(Debug, Default)]
struct InMemoryRemoteState {
    tasks: Vec<Task>,
    saves: Vec<Vec<Task>>,
    load_calls: usize,
    failing_loads: usize,
    failing_saves: usize,
}

/// Error used for injected failures.
#[derive(Debug, Clone, thiserror::Error)]
#[error("simulated outage")]
pub struct SimulatedOutage;

impl InMemoryRemoteStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with `tasks`.
    #[must_use]
    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        let store = Self::default();
        store.set_tasks(tasks);
        store
    }

    /// Replaces the remote mirror without recording a save.
    ///
    /// Clones share state, so this is visible to every handle.
    pub fn set_tasks(&self, tasks: Vec<Task>) {
        if let Ok(mut state) = self.state.write() {
            state.tasks = tasks;
        }
    }

    /// Makes the next `count` loads fail with a connection error. Zero
    /// clears any pending failures.
    pub fn fail_next_loads(&self, count: usize) {
        if let Ok(mut state) = self.state.write() {
            state.failing_loads = count;
        }
    }

    /// Makes the next `count` saves fail with a connection error.
    pub fn fail_next_saves(&self, count: usize) {
        if let Ok(mut state) = self.state.write() {
            state.failing_saves = count;
        }
    }

    /// Returns the current remote mirror.
    #[must_use]
    pub fn tasks(&self) -> Vec<Task> {
        self.state
            .read()
            .map(|state| state.tasks.clone())
            .unwrap_or_default()
    }

    /// Returns every successfully saved snapshot, oldest first.
    #[must_use]
    pub fn saves(&self) -> Vec<Vec<Task>> {
        self.state
            .read()
            .map(|state| state.saves.clone())
            .unwrap_or_default()
    }

    /// Returns how many loads were attempted, failed ones included.
    #[must_use]
    pub fn load_calls(&self) -> usize {
        self.state.read().map(|state| state.load_calls).unwrap_or(0)
    }
}

fn poisoned(err: impl std::fmt::Display) -> RemoteStoreError {
    RemoteStoreError::connection(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl RemoteStore for InMemoryRemoteStore {
    async fn load(&self) -> RemoteStoreResult<Vec<Task>> {
        let mut state = self.state.write().map_err(poisoned)?;
        state.load_calls = state.load_calls.saturating_add(1);
        if state.failing_loads > 0 {
            state.failing_loads = state.failing_loads.saturating_sub(1);
            return Err(RemoteStoreError::connection(SimulatedOutage));
        }
        Ok(state.tasks.clone())
    }

    async fn save(&self, tasks: &[Task]) -> RemoteStoreResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        if state.failing_saves > 0 {
            state.failing_saves = state.failing_saves.saturating_sub(1);
            return Err(RemoteStoreError::connection(SimulatedOutage));
        }
        state.tasks = tasks.to_vec();
        state.saves.push(tasks.to_vec());
        Ok(())
    }
}
