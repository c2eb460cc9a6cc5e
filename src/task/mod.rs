//! Task state engine.
//!
//! Tasks live in one owned list. Every mutation is expressed as an
//! [`commands::Action`] and applied by a pure reducer; the
//! [`services::TaskEngine`] then hands the result to the sync coordinator,
//! which writes it to the remote store after a quiet period.
//!
//! - Domain types and rules in [`domain`]
//! - Actions, wire envelopes and the reducer in [`commands`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod commands;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
