//! Port contracts for the task state engine.
//!
//! Ports define infrastructure-agnostic interfaces to the two external
//! collaborators: the remote store and the natural-language interpreter.

pub mod interpreter;
pub mod remote_store;

pub use interpreter::{CommandInterpreter, InterpreterError};
pub use remote_store::{RemoteStore, RemoteStoreError, RemoteStoreResult};

#[cfg(test)]
pub use interpreter::MockCommandInterpreter;
