//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::sync::Arc;

use async_trait::async_trait;

use crate::assistant::{AssistantProvider, ProviderError};
use crate::core::config::ResolvedConfig;
use crate::core::state::{App, Message};

/// A provider that answers immediately, for tests that don't need the timer.
pub struct InstantResponder;

#[async_trait]
impl AssistantProvider for InstantResponder {
    fn name(&self) -> &str {
        "instant"
    }

    async fn reply(&self, _history: &[Message]) -> Result<String, ProviderError> {
        Ok("ok".to_string())
    }
}

/// Creates a test App with an InstantResponder and default config.
pub fn test_app() -> App {
    App::new(Arc::new(InstantResponder), &ResolvedConfig::default())
}
