//! Google Gemini image editing
//!
//! Implements [`ImageTransformer`](crate::core::traits::ImageTransformer)
//! on top of the `generateContent` REST operation.

pub mod client;
pub mod error;
pub mod models;

pub use client::GeminiClient;
pub use error::GeminiErrorMapper;
pub use models::{GenerateContentRequest, GenerateContentResponse, ImagePayload};
