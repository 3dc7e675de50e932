//! HTTP route modules

pub mod looks;

pub use looks::{LooksResponse, SingleLookRequest};
