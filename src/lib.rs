//! Taskmind: a task state engine for a voice-driven daily planner.
//!
//! The crate keeps a flat list of tasks consistent across days and
//! devices. Recurring tasks roll over when their period starts, the visible
//! list follows a fixed precedence of keys, and every change is written back
//! to a remote spreadsheet as a debounced full overwrite.
//!
//! # Architecture
//!
//! The [`task`] module follows hexagonal architecture principles:
//!
//! - **Domain**: recurrence, ordering and view rules with no I/O
//! - **Commands**: the validated action reducer
//! - **Ports**: the remote store and command interpreter seams
//! - **Adapters**: the sheet HTTP client and an in-memory store
//! - **Services**: the sync coordinator and the engine that owns the state
//!
//! [`config`] layers defaults, an optional TOML file and environment
//! variables.

pub mod config;
pub mod task;
