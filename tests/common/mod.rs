//! Common test utilities for looks-gateway
//!
//! - [`upstream`]: a scripted [`ImageTransformer`](looks_gateway::ImageTransformer)
//! - [`fixtures`]: tokens, images and configuration
//!
//! # Usage
//!
//! ```rust,ignore
//! use crate::common::{fixtures, upstream::ScriptedUpstream};
//!
//! #[tokio::test]
//! async fn my_test() {
//!     let upstream = ScriptedUpstream::new();
//!     let token = fixtures::token_for("user-1");
//!     // ...
//! }
//! ```

pub mod fixtures;
pub mod upstream;

pub use fixtures::{TEST_JWT_SECRET, TEST_USER, test_config, token_for};
pub use upstream::ScriptedUpstream;
