//! # Application State
//!
//! Core business state for banter. This module contains domain logic only -
//! no TUI-specific types. Presentation state (scroll offsets, the composer
//! buffer, sidebar selection) lives in the `tui` module.
//!
//! ```text
//! App
//! ├── provider: Arc<dyn AssistantProvider>  // reply generator
//! ├── conversations: Vec<Conversation>      // never empty
//! ├── active_id: ConversationId             // always names an existing conversation
//! ├── next_id: ConversationId               // monotonic, never reused
//! ├── pending: bool                         // an assistant reply is outstanding
//! ├── sidebar_open: bool
//! ├── status_message: String                // title bar text
//! ├── greeting: String                      // first assistant message of every conversation
//! └── default_title: String
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.
//! This keeps things predictable, so no surprise mutations.

use std::sync::Arc;

use crate::assistant::AssistantProvider;
use crate::core::config::ResolvedConfig;

/// Conversation identifier. Allocated from a monotonic counter so ids are
/// never reused, even after deletions.
pub type ConversationId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

/// A single chat message. Immutable once appended.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// A conversation stub plus its own message history, in display order.
#[derive(Debug, Clone, PartialEq)]
pub struct Conversation {
    pub id: ConversationId,
    pub title: String,
    pub messages: Vec<Message>,
}

impl Conversation {
    /// True until the user has sent something — used to decide when the
    /// default title gets replaced by the first user message.
    pub fn is_untitled(&self) -> bool {
        self.messages.iter().all(|m| m.role != Role::User)
    }
}

pub struct App {
    pub provider: Arc<dyn AssistantProvider>,
    pub conversations: Vec<Conversation>,
    pub active_id: ConversationId,
    pub next_id: ConversationId,
    pub pending: bool,
    pub sidebar_open: bool,
    pub status_message: String,
    pub greeting: String,
    pub default_title: String,
}

impl App {
    /// Build the initial state: one conversation holding the greeting.
    pub fn new(provider: Arc<dyn AssistantProvider>, config: &ResolvedConfig) -> Self {
        let first = Conversation {
            id: 1,
            title: config.default_title.clone(),
            messages: vec![Message::assistant(config.greeting.clone())],
        };
        Self {
            provider,
            conversations: vec![first],
            active_id: 1,
            next_id: 2,
            pending: false,
            sidebar_open: config.sidebar_open,
            status_message: String::new(),
            greeting: config.greeting.clone(),
            default_title: config.default_title.clone(),
        }
    }

    pub fn active_conversation(&self) -> &Conversation {
        self.conversations
            .iter()
            .find(|c| c.id == self.active_id)
            .expect("active_id always names an existing conversation")
    }

    pub fn active_conversation_mut(&mut self) -> &mut Conversation {
        let active_id = self.active_id;
        self.conversations
            .iter_mut()
            .find(|c| c.id == active_id)
            .expect("active_id always names an existing conversation")
    }
}
