//! Application services for the task state engine.

mod engine;
mod sync;

pub use engine::{EngineError, EngineResult, TaskEngine};
pub use sync::{LoadOutcome, RetryPolicy, ScheduledSave, SyncConfig, SyncCoordinator, SyncError};
