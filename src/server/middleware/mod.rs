//! HTTP middleware implementations
//!
//! - Request ID tracking
//! - Bearer token extraction helpers

mod helpers;
mod request_id;


pub use helpers::extract_bearer_token;
pub use request_id::{REQUEST_ID_HEADER, RequestId, RequestIdMiddleware, RequestIdMiddlewareService};
