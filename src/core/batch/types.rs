//! Batch data model
//!
//! Everything here is immutable once built. Positions are assigned when a
//! [`BatchRequest`] is created and follow each item through to its outcome.

use crate::auth::Identity;
use crate::core::instruction::TransformSpec;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize, Serializer};

/// One uploaded image, before positions are assigned
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemInput {
    pub bytes: Vec<u8>,
    /// Declared media type, if the caller sent one
    pub media_type: Option<String>,
}

impl ItemInput {
    pub fn new(bytes: impl Into<Vec<u8>>, media_type: impl Into<String>) -> Self {
        let media_type = media_type.into();
        Self {
            bytes: bytes.into(),
            media_type: (!media_type.trim().is_empty()).then_some(media_type),
        }
    }
}

/// One image within a batch, tagged with its zero-based position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    position: usize,
    bytes: Vec<u8>,
    media_type: Option<String>,
}

impl Item {
    pub(crate) fn new(position: usize, input: ItemInput) -> Self {
        Self {
            position,
            bytes: input.bytes,
            media_type: input.media_type,
        }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn media_type(&self) -> Option<&str> {
        self.media_type.as_deref()
    }

    pub(crate) fn into_parts(self) -> (Vec<u8>, Option<String>) {
        (self.bytes, self.media_type)
    }
}

/// Accepted batch: caller, size class and positioned items
#[derive(Debug, Clone)]
pub struct BatchRequest {
    identity: Identity,
    spec: TransformSpec,
    items: Vec<Item>,
}

impl BatchRequest {
    /// Assign positions `0..n` in input order
    pub fn new(identity: Identity, spec: TransformSpec, inputs: Vec<ItemInput>) -> Self {
        let items = inputs
            .into_iter()
            .enumerate()
            .map(|(position, input)| Item::new(position, input))
            .collect();
        Self {
            identity,
            spec,
            items,
        }
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn spec(&self) -> &TransformSpec {
        &self.spec
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub(crate) fn into_parts(self) -> (Identity, TransformSpec, Vec<Item>) {
        (self.identity, self.spec, self.items)
    }
}

/// Image returned by the upstream service
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedImage {
    pub mime_type: String,
    #[serde(rename = "data", serialize_with = "serialize_base64")]
    pub bytes: Vec<u8>,
}

fn serialize_base64<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&STANDARD.encode(bytes))
}

/// Terminal result of one item
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ItemOutcome {
    Success {
        position: usize,
        image: GeneratedImage,
    },
    /// Non-success upstream status other than 429
    UpstreamError {
        position: usize,
        status: u16,
        detail: String,
    },
    /// Upstream answered 429
    RateLimited {
        position: usize,
        detail: String,
        retry_after_secs: u64,
    },
    Timeout {
        position: usize,
        detail: String,
    },
    /// No usable image in an otherwise successful response, or an
    /// undecodable input image
    MalformedResponse {
        position: usize,
        detail: String,
    },
}

impl ItemOutcome {
    pub fn position(&self) -> usize {
        match self {
            ItemOutcome::Success { position, .. }
            | ItemOutcome::UpstreamError { position, .. }
            | ItemOutcome::RateLimited { position, .. }
            | ItemOutcome::Timeout { position, .. }
            | ItemOutcome::MalformedResponse { position, .. } => *position,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ItemOutcome::Success { .. })
    }

    /// Stable tag, matching the serialized `outcome` field
    pub fn kind(&self) -> &'static str {
        match self {
            ItemOutcome::Success { .. } => "success",
            ItemOutcome::UpstreamError { .. } => "upstream_error",
            ItemOutcome::RateLimited { .. } => "rate_limited",
            ItemOutcome::Timeout { .. } => "timeout",
            ItemOutcome::MalformedResponse { .. } => "malformed_response",
        }
    }

    /// Human-readable failure detail; `None` on success
    pub fn detail(&self) -> Option<&str> {
        match self {
            ItemOutcome::Success { .. } => None,
            ItemOutcome::UpstreamError { detail, .. }
            | ItemOutcome::RateLimited { detail, .. }
            | ItemOutcome::Timeout { detail, .. }
            | ItemOutcome::MalformedResponse { detail, .. } => Some(detail),
        }
    }

    pub fn image(&self) -> Option<&GeneratedImage> {
        match self {
            ItemOutcome::Success { image, .. } => Some(image),
            _ => None,
        }
    }

    pub(crate) fn malformed(position: usize, detail: impl Into<String>) -> Self {
        ItemOutcome::MalformedResponse {
            position,
            detail: detail.into(),
        }
    }
}

/// Batch lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchState {
    Pending,
    Running,
    Completed,
}

/// Aggregated result of a completed batch, ordered by position
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchOutcome {
    state: BatchState,
    success_count: usize,
    #[serde(rename = "results")]
    outcomes: Vec<ItemOutcome>,
}

impl BatchOutcome {
    /// Build a completed outcome; entries are re-ordered by position
    pub fn completed(mut outcomes: Vec<ItemOutcome>) -> Self {
        outcomes.sort_by_key(ItemOutcome::position);
        let success_count = outcomes.iter().filter(|o| o.is_success()).count();
        Self {
            state: BatchState::Completed,
            success_count,
            outcomes,
        }
    }

    pub fn state(&self) -> BatchState {
        self.state
    }

    pub fn success_count(&self) -> usize {
        self.success_count
    }

    pub fn failure_count(&self) -> usize {
        self.outcomes.len() - self.success_count
    }

    pub fn outcomes(&self) -> &[ItemOutcome] {
        &self.outcomes
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn into_outcomes(self) -> Vec<ItemOutcome> {
        self.outcomes
    }
}
