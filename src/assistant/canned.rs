//! Canned reply source: the stand-in for a real assistant backend.
//!
//! Waits a fixed delay, then answers with a uniformly random pick from a
//! small pool of stock responses. The delay runs on the tokio timer, so the
//! task driving `reply` can be aborted mid-wait — that is what makes
//! switching conversations cancel an outstanding reply.

use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use rand::seq::IndexedRandom;

use crate::assistant::provider::{AssistantProvider, ProviderError};
use crate::core::state::Message;

/// Stock responses used when no pool is configured.
pub const DEFAULT_REPLIES: &[&str] = &[
    "I understand your question. Let me help you with that.",
    "That's a great question! Here's what I think about it...",
    "Of course! I can explain that for you.",
    "Interesting! I'll put together a detailed answer.",
    "Sure! Here's a complete explanation of the topic.",
];

/// The built-in pool as owned strings, for config resolution.
pub fn default_reply_pool() -> Vec<String> {
    DEFAULT_REPLIES.iter().map(|s| s.to_string()).collect()
}

pub struct CannedResponder {
    delay: Duration,
    pool: Vec<String>,
}

impl CannedResponder {
    /// An empty pool would leave `pick` with nothing to choose from, so it
    /// falls back to the built-in set.
    pub fn new(delay: Duration, pool: Vec<String>) -> Self {
        let pool = if pool.is_empty() {
            default_reply_pool()
        } else {
            pool
        };
        Self { delay, pool }
    }

    fn pick(&self) -> &str {
        self.pool
            .choose(&mut rand::rng())
            .expect("pool is never empty")
    }
}

#[async_trait]
impl AssistantProvider for CannedResponder {
    fn name(&self) -> &str {
        "canned"
    }

    async fn reply(&self, history: &[Message]) -> Result<String, ProviderError> {
        debug!(
            "Simulating reply after {:?} ({} messages of history)",
            self.delay,
            history.len()
        );
        tokio::time::sleep(self.delay).await;
        Ok(self.pick().to_string())
    }
}
