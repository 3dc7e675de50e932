//! Batch scheduler
//!
//! Runs a batch as consecutive groups of at most `concurrency` items. All
//! calls in a group are in flight together; the next group starts only after
//! every call of the previous one has settled and the pacing delay elapsed.

use super::client::TransformationClient;
use super::types::{BatchOutcome, BatchRequest, BatchState, Item, ItemOutcome};
use crate::auth::Credential;
use crate::config::BatchConfig;
use crate::core::encoder::{self, EncodedImage};
use crate::core::instruction::build_instruction;
use futures::future::join_all;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};

/// Scheduling parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulerConfig {
    /// Group size K
    pub concurrency: usize,
    /// Pause between groups
    pub group_delay: Duration,
    /// Per-item deadline
    pub item_timeout: Duration,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self::from(&BatchConfig::default())
    }
}

impl From<&BatchConfig> for SchedulerConfig {
    fn from(config: &BatchConfig) -> Self {
        Self {
            concurrency: config.concurrency.max(1),
            group_delay: config.group_delay(),
            item_timeout: config.item_timeout(),
        }
    }
}

impl SchedulerConfig {
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn with_group_delay(mut self, group_delay: Duration) -> Self {
        self.group_delay = group_delay;
        self
    }

    pub fn with_item_timeout(mut self, item_timeout: Duration) -> Self {
        self.item_timeout = item_timeout;
        self
    }

    /// Number of groups needed for `items` items
    pub fn group_count(&self, items: usize) -> usize {
        items.div_ceil(self.concurrency.max(1))
    }
}

/// Grouped, paced executor for one batch at a time
#[derive(Clone)]
pub struct BatchScheduler {
    client: TransformationClient,
    config: SchedulerConfig,
}

impl BatchScheduler {
    pub fn new(client: TransformationClient, config: SchedulerConfig) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    pub fn client(&self) -> &TransformationClient {
        &self.client
    }

    /// Execute every item of `request` and collect outcomes by position.
    ///
    /// Item failures are recorded in the outcome; this never fails as a
    /// whole. The credential is shared read-only by all calls.
    #[instrument(
        skip_all,
        fields(
            user_id = %request.identity().user_id,
            items = request.len(),
            spec = %request.spec(),
        )
    )]
    pub async fn run(&self, request: BatchRequest, credential: &Credential) -> BatchOutcome {
        let started = Instant::now();
        let total = request.len();
        let groups = self.config.group_count(total);
        let (_identity, spec, items) = request.into_parts();
        let instruction = build_instruction(&spec);

        debug!(state = ?BatchState::Pending, groups, "Batch accepted");
        info!(
            state = ?BatchState::Running,
            total,
            groups,
            concurrency = self.config.concurrency,
            "Batch started"
        );

        let mut slots: Vec<Option<ItemOutcome>> = vec![None; total];
        let mut remaining = items.into_iter();
        let mut group_index = 0usize;

        loop {
            let group: Vec<Item> = remaining.by_ref().take(self.config.concurrency).collect();
            if group.is_empty() {
                break;
            }
            if group_index > 0 {
                debug!(delay_ms = self.config.group_delay.as_millis() as u64, "Pacing");
                tokio::time::sleep(self.config.group_delay).await;
            }

            debug!(group = group_index, size = group.len(), "Dispatching group");
            let calls = group
                .into_iter()
                .map(|item| self.process(item, credential, &instruction));

            for outcome in join_all(calls).await {
                let position = outcome.position();
                if let Some(slot) = slots.get_mut(position) {
                    *slot = Some(outcome);
                }
            }
            group_index += 1;
        }

        let outcomes: Vec<ItemOutcome> = slots
            .into_iter()
            .enumerate()
            .map(|(position, slot)| {
                slot.unwrap_or_else(|| ItemOutcome::malformed(position, "item was not processed"))
            })
            .collect();
        let outcome = BatchOutcome::completed(outcomes);

        info!(
            state = ?outcome.state(),
            succeeded = outcome.success_count(),
            failed = outcome.failure_count(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Batch completed"
        );
        outcome
    }

    /// Encode one item and issue its upstream call
    async fn process(&self, item: Item, credential: &Credential, instruction: &str) -> ItemOutcome {
        let position = item.position();
        match encode_off_thread(item).await {
            Ok(image) => {
                self.client
                    .call(
                        position,
                        credential,
                        &image,
                        instruction,
                        self.config.item_timeout,
                    )
                    .await
            }
            Err(detail) => {
                warn!(position, detail = %detail, "Item could not be encoded");
                ItemOutcome::malformed(position, detail)
            }
        }
    }
}

/// Image decoding is CPU-bound; keep it off the async workers
async fn encode_off_thread(item: Item) -> Result<EncodedImage, String> {
    tokio::task::spawn_blocking(move || encoder::encode(item))
        .await
        .map_err(|e| format!("encoder task failed: {}", e))?
        .map_err(|e| e.to_string())
}
