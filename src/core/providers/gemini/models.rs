//! Gemini `generateContent` wire models
//!
//! Only the fields the image edit flow reads or writes are modelled.
//! Unknown fields are ignored on decode.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

/// Default media type when the response omits one
pub const DEFAULT_RESPONSE_MEDIA_TYPE: &str = "image/png";

/// Request body
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct GenerateContentRequest {
    pub contents: Vec<RequestContent>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RequestContent {
    pub parts: Vec<RequestPart>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum RequestPart {
    Text { text: String },
    InlineData { inline_data: RequestBlob },
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RequestBlob {
    pub mime_type: String,
    /// Base64 image bytes
    pub data: String,
}

impl GenerateContentRequest {
    /// One user turn: the instruction followed by the image
    pub fn image_edit(instruction: &str, image_bytes: &[u8], media_type: &str) -> Self {
        Self {
            contents: vec![RequestContent {
                parts: vec![
                    RequestPart::Text {
                        text: instruction.to_string(),
                    },
                    RequestPart::InlineData {
                        inline_data: RequestBlob {
                            mime_type: media_type.to_string(),
                            data: STANDARD.encode(image_bytes),
                        },
                    },
                ],
            }],
        }
    }
}

/// Response body
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<ResponseContent>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResponseContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResponsePart {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default, rename = "inlineData", alias = "inline_data")]
    pub inline_data: Option<ResponseBlob>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResponseBlob {
    #[serde(default, rename = "mimeType", alias = "mime_type")]
    pub mime_type: Option<String>,
    #[serde(default)]
    pub data: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    #[serde(default)]
    pub block_reason: Option<String>,
}

/// Result of looking for the generated image in a response
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImagePayload {
    Found { bytes: Vec<u8>, media_type: String },
    NotFound { reason: String },
}

impl GenerateContentResponse {
    /// Take the first inline image of the first candidate
    pub fn image_payload(&self) -> ImagePayload {
        let Some(candidate) = self.candidates.first() else {
            let reason = match self
                .prompt_feedback
                .as_ref()
                .and_then(|f| f.block_reason.as_deref())
            {
                Some(block) => format!("prompt blocked: {}", block),
                None => "response has no candidates".to_string(),
            };
            return ImagePayload::NotFound { reason };
        };

        let parts = candidate
            .content
            .as_ref()
            .map(|c| c.parts.as_slice())
            .unwrap_or_default();

        let blob = parts.iter().find_map(|part| {
            part.inline_data
                .as_ref()
                .and_then(|blob| blob.data.as_deref().map(|data| (blob, data)))
                .filter(|(_, data)| !data.is_empty())
        });

        let Some((blob, data)) = blob else {
            let text = parts.iter().find_map(|p| p.text.as_deref());
            let reason = match (candidate.finish_reason.as_deref(), text) {
                (_, Some(text)) => format!("no image in response, model said: {}", truncate(text)),
                (Some(finish), None) => format!("no image in response (finish reason {})", finish),
                (None, None) => "no image in response".to_string(),
            };
            return ImagePayload::NotFound { reason };
        };

        match STANDARD.decode(data) {
            Ok(bytes) => ImagePayload::Found {
                bytes,
                media_type: blob
                    .mime_type
                    .clone()
                    .filter(|m| !m.is_empty())
                    .unwrap_or_else(|| DEFAULT_RESPONSE_MEDIA_TYPE.to_string()),
            },
            Err(e) => ImagePayload::NotFound {
                reason: format!("image data is not valid base64: {}", e),
            },
        }
    }
}

fn truncate(text: &str) -> String {
    const MAX: usize = 200;
    match text.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}…", &text[..idx]),
        None => text.to_string(),
    }
}
