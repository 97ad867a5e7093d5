//! Background tasks module
//!
//! The tick schedule and the task that follows timer updates.

pub mod label;
pub mod ticker;

// Re-export main items
pub use label::label_task;
pub use ticker::RepeatingTimer;
