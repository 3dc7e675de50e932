//! Core traits module
//!
//! Seams between the batch engine and the upstream image service

pub mod transformer;

pub use transformer::*;
