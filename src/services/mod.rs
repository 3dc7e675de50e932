//! Services module
//!
//! Request-level orchestration on top of the core engine

pub mod dispatch;

pub use dispatch::LookDispatcher;
