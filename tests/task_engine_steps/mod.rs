//! Step definitions for task engine BDD scenarios.

mod given;
mod then;
mod when;
pub mod world;
