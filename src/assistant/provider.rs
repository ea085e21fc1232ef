use std::fmt;

use async_trait::async_trait;

use crate::core::state::Message;

/// Errors a reply provider can surface.
/// The canned responder never fails; a real backend behind this seam would.
#[derive(Debug)]
pub enum ProviderError {
    /// Provider misconfigured. Not retryable.
    Config(String),
    /// The backing service failed to produce a reply.
    Backend(String),
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderError::Config(msg) => write!(f, "config error: {msg}"),
            ProviderError::Backend(msg) => write!(f, "backend error: {msg}"),
        }
    }
}

impl std::error::Error for ProviderError {}

/// Source of assistant replies.
///
/// The reducer and TUI only see this trait. Swapping the canned responder
/// for a real assistant service means implementing `reply` against that
/// service's API; the request is the conversation so far, the response is
/// the next assistant message or a failure.
#[async_trait]
pub trait AssistantProvider: Send + Sync {
    /// Returns the name of the provider.
    fn name(&self) -> &str;

    /// Produce the next assistant message for the given history.
    async fn reply(&self, history: &[Message]) -> Result<String, ProviderError>;
}
