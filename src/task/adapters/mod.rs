//! Adapter implementations of the task ports.

pub mod memory;
pub mod records;
pub mod sheet;

pub use memory::InMemoryRemoteStore;
pub use sheet::SheetStore;
