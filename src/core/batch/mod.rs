//! Batch dispatch engine
//!
//! Data model, the deadline-bounded per-item client and the grouped
//! scheduler that drives it.

mod client;
mod scheduler;
mod types;


pub use client::TransformationClient;
pub use scheduler::{BatchScheduler, SchedulerConfig};
pub use types::{
    BatchOutcome, BatchRequest, BatchState, GeneratedImage, Item, ItemInput, ItemOutcome,
};
