//! Error handling utilities
//!
//! Gateway-wide error type and its HTTP representation.

pub mod error;

pub use error::*;
