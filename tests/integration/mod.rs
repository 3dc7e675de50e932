//! Integration tests for looks-gateway
//!
//! These tests drive the public API with a scripted upstream; no test here
//! reaches the real Gemini service.

pub mod dispatch_tests;
pub mod gemini_tests;
