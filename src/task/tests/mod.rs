//! Unit tests for the task module.
//!
//! Tests are organised by concern: rollover, ordering and views in the
//! domain, the reducer and its wire envelope, remote records, and the engine
//! that ties them together.

mod ordering_tests;
mod support;
