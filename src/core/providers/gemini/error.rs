//! Gemini Error Handling

use crate::core::traits::TransformFailure;
use serde_json::Value;

/// Maps Gemini HTTP failures onto [`TransformFailure`]
pub struct GeminiErrorMapper;

impl GeminiErrorMapper {
    pub fn from_http_status(status: u16, body: &str) -> TransformFailure {
        let json = serde_json::from_str::<Value>(body).ok();
        let detail = json
            .as_ref()
            .and_then(Self::error_message)
            .unwrap_or_else(|| Self::fallback_detail(status, body));

        match status {
            429 => TransformFailure::RateLimited {
                detail,
                retry_after: json.as_ref().and_then(Self::extract_retry_after),
            },
            _ => TransformFailure::Upstream { status, detail },
        }
    }

    /// Transport failure from `reqwest`
    pub fn from_reqwest(error: reqwest::Error) -> TransformFailure {
        if error.is_timeout() {
            TransformFailure::Timeout(format!("request timed out: {}", error))
        } else if error.is_decode() {
            TransformFailure::Malformed(format!("unreadable response body: {}", error))
        } else {
            TransformFailure::Network(error.to_string())
        }
    }

    fn error_message(json: &Value) -> Option<String> {
        let error = json.get("error")?;
        let message = error
            .get("message")
            .and_then(|m| m.as_str())
            .or_else(|| error.as_str())?;
        match error.get("status").and_then(|s| s.as_str()) {
            Some(status) => Some(format!("{} ({})", message, status)),
            None => Some(message.to_string()),
        }
    }

    fn fallback_detail(status: u16, body: &str) -> String {
        let body = body.trim();
        if body.is_empty() {
            return format!("HTTP {}", status);
        }
        match body.char_indices().nth(300) {
            Some((idx, _)) => format!("{}…", &body[..idx]),
            None => body.to_string(),
        }
    }

    /// Seconds to wait, from `retry_after` or a `RetryInfo.retryDelay` detail
    fn extract_retry_after(json: &Value) -> Option<u64> {
        if let Some(retry_after) = json.get("retry_after").and_then(|r| r.as_u64()) {
            return Some(retry_after);
        }

        let error = json.get("error")?;
        if let Some(retry_after) = error.get("retry_after").and_then(|r| r.as_u64()) {
            return Some(retry_after);
        }

        error
            .get("details")?
            .as_array()?
            .iter()
            .find_map(|detail| detail.get("retryDelay").and_then(|d| d.as_str()))
            .and_then(parse_duration_secs)
    }
}

/// Parse protobuf JSON durations such as `"37s"` or `"1.5s"`, rounding up
fn parse_duration_secs(value: &str) -> Option<u64> {
    let secs: f64 = value.trim().strip_suffix('s')?.parse().ok()?;
    (secs.is_finite() && secs >= 0.0).then(|| secs.ceil() as u64)
}
