//! Gemini Client
//!
//! Calls `models/{model}:generateContent` with the caller's API key in the
//! `x-goog-api-key` header. The per-item deadline is applied by the caller;
//! the HTTP client itself only bounds connection setup.

use super::error::GeminiErrorMapper;
use super::models::{GenerateContentRequest, GenerateContentResponse, ImagePayload};
use crate::auth::Credential;
use crate::config::GeminiConfig;
use crate::core::batch::GeneratedImage;
use crate::core::encoder::EncodedImage;
use crate::core::traits::{ImageTransformer, TransformFailure};
use crate::utils::error::{GatewayError, Result};
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder, Response};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Gemini API client
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http_client: Client,
    endpoint: String,
}

impl GeminiClient {
    pub fn new(config: &GeminiConfig) -> Result<Self> {
        let http_client = ClientBuilder::new()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()
            .map_err(|e| GatewayError::config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            endpoint: config.endpoint(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn post<B: serde::Serialize + ?Sized>(
        &self,
        credential: &Credential,
        body: &B,
    ) -> std::result::Result<Response, TransformFailure> {
        let response = self
            .http_client
            .post(&self.endpoint)
            .header(API_KEY_HEADER, credential.expose())
            .json(body)
            .send()
            .await
            .map_err(GeminiErrorMapper::from_reqwest)?;

        let status = response.status();
        debug!(status = status.as_u16(), "Gemini responded");
        if status.is_success() {
            return Ok(response);
        }

        let error_text = response.text().await.unwrap_or_default();
        Err(GeminiErrorMapper::from_http_status(
            status.as_u16(),
            &error_text,
        ))
    }
}

#[async_trait]
impl ImageTransformer for GeminiClient {
    fn name(&self) -> &'static str {
        "gemini"
    }

    async fn transform(
        &self,
        credential: &Credential,
        image: &EncodedImage,
        instruction: &str,
    ) -> std::result::Result<GeneratedImage, TransformFailure> {
        let request =
            GenerateContentRequest::image_edit(instruction, &image.bytes, &image.media_type);
        let response = self.post(credential, &request).await?;

        let body = response
            .bytes()
            .await
            .map_err(GeminiErrorMapper::from_reqwest)?;
        let parsed: GenerateContentResponse = serde_json::from_slice(&body)
            .map_err(|e| TransformFailure::Malformed(format!("response is not valid JSON: {}", e)))?;

        match parsed.image_payload() {
            ImagePayload::Found { bytes, media_type } => Ok(GeneratedImage {
                mime_type: media_type,
                bytes,
            }),
            ImagePayload::NotFound { reason } => Err(TransformFailure::Malformed(reason)),
        }
    }

    async fn forward(
        &self,
        credential: &Credential,
        body: Value,
    ) -> std::result::Result<Value, TransformFailure> {
        let response = self.post(credential, &body).await?;
        response
            .json::<Value>()
            .await
            .map_err(|e| TransformFailure::Malformed(format!("response is not valid JSON: {}", e)))
    }
}
