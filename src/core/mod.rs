//! Core functionality for the Gateway
//!
//! Instruction building, item encoding, the upstream seam and the batch
//! engine. Nothing here knows about HTTP.

pub mod batch;
pub mod encoder;
pub mod instruction;
pub mod providers;
pub mod traits;

pub use batch::{
    BatchOutcome, BatchRequest, BatchScheduler, BatchState, GeneratedImage, ItemInput,
    ItemOutcome, SchedulerConfig, TransformationClient,
};
pub use encoder::{EncodedImage, encode};
pub use instruction::{TransformSpec, build_instruction};
pub use traits::{ImageTransformer, TransformFailure};
