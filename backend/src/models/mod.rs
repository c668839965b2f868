//! Domain models for the task service.

pub mod macros;
pub mod patch;
pub mod task;

pub use patch::Patch;
pub use task::*;
