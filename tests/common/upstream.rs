//! Scripted stand-in for the Gemini image service
//!
//! Behavior is chosen by the first byte of each image:
//!
//! | byte  | answer                         |
//! |-------|--------------------------------|
//! | `R`   | rate limited, no retry hint    |
//! | `F`   | upstream 500                   |
//! | `M`   | 200 without an image part      |
//! | `H`   | never answers                  |
//! | other | success, echoing the input     |

use async_trait::async_trait;
use looks_gateway::core::encoder::EncodedImage;
use looks_gateway::{Credential, GeneratedImage, ImageTransformer, TransformFailure};
use serde_json::{Value, json};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// One observed upstream call
#[derive(Debug, Clone)]
pub struct SeenCall {
    pub api_key: String,
    pub media_type: String,
    pub instruction: String,
    pub first_byte: Option<u8>,
}

#[derive(Default)]
pub struct ScriptedUpstream {
    calls: Mutex<Vec<SeenCall>>,
    forwards: AtomicUsize,
}

impl ScriptedUpstream {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<SeenCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn forward_count(&self) -> usize {
        self.forwards.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ImageTransformer for ScriptedUpstream {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn transform(
        &self,
        credential: &Credential,
        image: &EncodedImage,
        instruction: &str,
    ) -> Result<GeneratedImage, TransformFailure> {
        let first_byte = image.bytes.first().copied();
        self.calls.lock().unwrap().push(SeenCall {
            api_key: credential.expose().to_string(),
            media_type: image.media_type.clone(),
            instruction: instruction.to_string(),
            first_byte,
        });

        match first_byte {
            Some(b'R') => Err(TransformFailure::RateLimited {
                detail: "Resource has been exhausted".to_string(),
                retry_after: None,
            }),
            Some(b'F') => Err(TransformFailure::Upstream {
                status: 500,
                detail: "Internal error".to_string(),
            }),
            Some(b'M') => Err(TransformFailure::Malformed(
                "response has no image part".to_string(),
            )),
            Some(b'H') => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Err(TransformFailure::Network("unreachable".to_string()))
            }
            _ => Ok(GeneratedImage {
                mime_type: "image/png".to_string(),
                bytes: image.bytes.clone(),
            }),
        }
    }

    async fn forward(&self, credential: &Credential, body: Value) -> Result<Value, TransformFailure> {
        self.forwards.fetch_add(1, Ordering::SeqCst);
        if body.get("fail").is_some() {
            return Err(TransformFailure::Upstream {
                status: 403,
                detail: "API key not valid".to_string(),
            });
        }
        Ok(json!({
            "echo": body,
            "keyLength": credential.len(),
        }))
    }
}
