//! Look generation endpoints
//!
//! - `POST /v1/looks`: multipart batch (`body_type` + repeated `files`)
//! - `POST /v1/looks/single`: one base64 image as JSON
//! - `POST /v1/generate-content`: raw `generateContent` passthrough

use crate::core::batch::{BatchOutcome, ItemInput, ItemOutcome};
use crate::server::middleware::extract_bearer_token;
use crate::server::state::AppState;
use crate::utils::error::{GatewayError, Result};
use actix_multipart::Multipart;
use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, web};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use futures::TryStreamExt;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{debug, info};

const BODY_TYPE_FIELDS: &[&str] = &["body_type", "bodyType"];
const FILE_FIELDS: &[&str] = &["files", "files[]", "file"];

/// Configure look generation routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/v1")
            .route("/looks", web::post().to(generate_looks))
            .route("/looks/single", web::post().to(generate_single))
            .route("/generate-content", web::post().to(generate_content)),
    );
}

/// Batch response body
#[derive(Debug, Serialize)]
pub struct LooksResponse {
    pub success: bool,
    pub success_count: usize,
    pub failure_count: usize,
    pub results: Vec<ItemOutcome>,
}

impl From<BatchOutcome> for LooksResponse {
    fn from(outcome: BatchOutcome) -> Self {
        Self {
            success: true,
            success_count: outcome.success_count(),
            failure_count: outcome.failure_count(),
            results: outcome.into_outcomes(),
        }
    }
}

/// Single-image request body
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SingleLookRequest {
    #[serde(default)]
    pub image_base64: Option<String>,
    #[serde(default)]
    pub mime_type: Option<String>,
    #[serde(default)]
    pub body_type: Option<String>,
}

async fn generate_looks(
    state: web::Data<AppState>,
    req: HttpRequest,
    payload: Multipart,
) -> Result<HttpResponse> {
    // Reject the caller before buffering any upload
    let identity = state
        .dispatcher
        .authenticate(extract_bearer_token(req.headers()))
        .await?;

    let limit = state.config.server().max_body_size;
    let (body_type, items) = read_form(payload, limit).await?;
    debug!(files = items.len(), body_type = ?body_type, "Multipart form read");

    let outcome = state
        .dispatcher
        .submit_for(identity, items, body_type.as_deref())
        .await?;

    info!(
        succeeded = outcome.success_count(),
        total = outcome.len(),
        "Looks generated"
    );
    Ok(HttpResponse::Ok().json(LooksResponse::from(outcome)))
}

async fn generate_single(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: web::Json<SingleLookRequest>,
) -> Result<HttpResponse> {
    let body = body.into_inner();

    // Reject the caller before looking at the payload
    let identity = state
        .dispatcher
        .authenticate(extract_bearer_token(req.headers()))
        .await?;

    let (Some(image), Some(mime_type)) = (body.image_base64, body.mime_type) else {
        return Err(GatewayError::validation(
            "Missing required fields (imageBase64, mimeType, bodyType)",
        ));
    };
    let bytes = decode_image_base64(&image)?;

    let outcome = state
        .dispatcher
        .submit_for(
            identity,
            vec![ItemInput::new(bytes, mime_type)],
            body.body_type.as_deref(),
        )
        .await?;

    let item = outcome
        .into_outcomes()
        .into_iter()
        .next()
        .ok_or_else(|| GatewayError::internal("batch produced no outcome"))?;
    Ok(single_response(item))
}

async fn generate_content(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: web::Json<Value>,
) -> Result<HttpResponse> {
    let answer = state
        .dispatcher
        .forward(extract_bearer_token(req.headers()), body.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(answer))
}

/// Map a single item outcome onto an HTTP answer
fn single_response(outcome: ItemOutcome) -> HttpResponse {
    match outcome {
        ItemOutcome::Success { image, .. } => HttpResponse::Ok().json(json!({
            "success": true,
            "image": image,
        })),
        ItemOutcome::RateLimited {
            retry_after_secs, ..
        } => HttpResponse::TooManyRequests()
            .insert_header(("Retry-After", retry_after_secs.to_string()))
            .json(json!({
                "error": "Rate limit exceeded",
                "retryAfter": retry_after_secs,
                "message": "Too many requests. Please wait a moment and try again.",
            })),
        ItemOutcome::UpstreamError { status, detail, .. } => {
            HttpResponse::build(StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY))
                .json(json!({
                    "error": "Gemini API error",
                    "status": status,
                    "message": detail,
                }))
        }
        ItemOutcome::Timeout { detail, .. } => HttpResponse::GatewayTimeout().json(json!({
            "error": "Upstream timeout",
            "message": detail,
        })),
        ItemOutcome::MalformedResponse { detail, .. } => HttpResponse::BadGateway().json(json!({
            "error": "No image generated",
            "message": detail,
        })),
    }
}

/// Accepts raw base64 or a `data:` URL
fn decode_image_base64(value: &str) -> Result<Vec<u8>> {
    let data = match value.split_once(";base64,") {
        Some((prefix, data)) if prefix.starts_with("data:") => data,
        _ => value,
    };
    STANDARD
        .decode(data.trim())
        .map_err(|e| GatewayError::validation(format!("imageBase64 is not valid base64: {}", e)))
}

/// Read `body_type` and every file part, bounded by `limit` total bytes
async fn read_form(mut payload: Multipart, limit: usize) -> Result<(Option<String>, Vec<ItemInput>)> {
    let mut body_type = None;
    let mut items = Vec::new();
    let mut total = 0usize;

    while let Some(mut field) = payload.try_next().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();
        let media_type = field
            .content_type()
            .map(|mime| mime.essence_str().to_string())
            .unwrap_or_default();

        let mut bytes = Vec::new();
        while let Some(chunk) = field.try_next().await.map_err(multipart_error)? {
            total += chunk.len();
            if total > limit {
                return Err(GatewayError::validation(format!(
                    "Upload exceeds {} bytes",
                    limit
                )));
            }
            bytes.extend_from_slice(&chunk);
        }

        if BODY_TYPE_FIELDS.contains(&name.as_str()) {
            body_type = Some(String::from_utf8_lossy(&bytes).into_owned());
        } else if FILE_FIELDS.contains(&name.as_str()) {
            items.push(ItemInput::new(bytes, media_type));
        } else {
            debug!(field = %name, "Ignoring unknown form field");
        }
    }

    Ok((body_type, items))
}

fn multipart_error(error: actix_multipart::MultipartError) -> GatewayError {
    GatewayError::validation(format!("Invalid multipart payload: {}", error))
}
