//! # Actions
//!
//! Everything that can happen in banter becomes an `Action`.
//! User presses Enter? That's `Action::SubmitDraft`.
//! The reply task finishes? That's `Action::ReplyArrived`.
//!
//! The `update()` function takes the current state and an action, mutates
//! the state, and returns an `Effect` describing the I/O the caller must
//! perform. No side effects here. Spawning and aborting tasks happens in
//! the TUI event loop.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//! ```
//!
//! This makes everything testable: feed actions, assert on state.

use log::debug;

use crate::core::state::{App, ConversationId, Conversation, Message};

/// Longest title derived from a first user message before truncation.
const TITLE_MAX_CHARS: usize = 40;

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// The composer submitted its draft.
    SubmitDraft(String),
    /// The reply task delivered an assistant message for `conversation_id`.
    ReplyArrived {
        conversation_id: ConversationId,
        content: String,
    },
    /// The reply task failed (only possible with a real backend behind the
    /// provider seam; the canned responder never fails).
    ReplyFailed {
        conversation_id: ConversationId,
        message: String,
    },
    NewConversation,
    SelectConversation(ConversationId),
    DeleteConversation(ConversationId),
    ToggleSidebar,
    Quit,
}

/// I/O the event loop must perform after an `update()` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    None,
    /// Spawn the provider task for the active conversation.
    SpawnReply,
    /// Abort the in-flight provider task; `pending` has already been cleared.
    CancelReply,
    Quit,
}

pub fn update(app: &mut App, action: Action) -> Effect {
    match action {
        Action::SubmitDraft(text) => {
            let text = text.trim();
            // Guard: empty drafts and double-sends are silent no-ops.
            if text.is_empty() || app.pending {
                return Effect::None;
            }
            let conversation = app.active_conversation_mut();
            if conversation.is_untitled() {
                conversation.title = derive_title(text);
            }
            conversation.messages.push(Message::user(text));
            app.pending = true;
            app.status_message.clear();
            Effect::SpawnReply
        }
        Action::ReplyArrived {
            conversation_id,
            content,
        } => {
            if !app.pending || conversation_id != app.active_id {
                debug!("Dropping stale reply for conversation {conversation_id}");
                return Effect::None;
            }
            app.active_conversation_mut()
                .messages
                .push(Message::assistant(content));
            app.pending = false;
            Effect::None
        }
        Action::ReplyFailed {
            conversation_id,
            message,
        } => {
            if !app.pending || conversation_id != app.active_id {
                debug!("Dropping stale failure for conversation {conversation_id}");
                return Effect::None;
            }
            app.pending = false;
            app.status_message = format!("Reply failed: {message}");
            Effect::None
        }
        Action::NewConversation => {
            let cancelled = clear_pending(app);
            let id = app.next_id;
            app.next_id += 1;
            app.conversations.push(Conversation {
                id,
                title: app.default_title.clone(),
                messages: vec![Message::assistant(app.greeting.clone())],
            });
            app.active_id = id;
            if cancelled { Effect::CancelReply } else { Effect::None }
        }
        Action::SelectConversation(id) => {
            if id == app.active_id || !app.conversations.iter().any(|c| c.id == id) {
                return Effect::None;
            }
            let cancelled = clear_pending(app);
            app.active_id = id;
            if cancelled { Effect::CancelReply } else { Effect::None }
        }
        Action::DeleteConversation(id) => {
            // Guard: the last remaining conversation cannot be deleted.
            if app.conversations.len() == 1 {
                return Effect::None;
            }
            let Some(pos) = app.conversations.iter().position(|c| c.id == id) else {
                return Effect::None;
            };
            app.conversations.remove(pos);
            if id != app.active_id {
                return Effect::None;
            }
            // The active conversation was deleted: activate the nearest
            // surviving neighbour and drop any in-flight reply.
            let neighbour = app
                .conversations
                .get(pos)
                .or_else(|| app.conversations.last())
                .expect("guarded above: at least one conversation survives");
            app.active_id = neighbour.id;
            let cancelled = clear_pending(app);
            if cancelled { Effect::CancelReply } else { Effect::None }
        }
        Action::ToggleSidebar => {
            app.sidebar_open = !app.sidebar_open;
            Effect::None
        }
        Action::Quit => Effect::Quit,
    }
}

/// Clear the pending flag, returning whether a reply was actually in flight.
fn clear_pending(app: &mut App) -> bool {
    let was_pending = app.pending;
    app.pending = false;
    app.status_message.clear();
    was_pending
}

/// Title for a conversation, taken from the first line of its first user
/// message and truncated on a char boundary.
fn derive_title(text: &str) -> String {
    let line = text.lines().next().unwrap_or("");
    let mut title: String = line.chars().take(TITLE_MAX_CHARS).collect();
    if line.chars().count() > TITLE_MAX_CHARS {
        title.push_str("...");
    }
    title
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::state::Role;
    use crate::test_support::test_app;

    fn message_count(app: &App) -> usize {
        app.active_conversation().messages.len()
    }

    #[test]
    fn whitespace_draft_is_a_no_op() {
        let mut app = test_app();
        for draft in ["", "   ", " \t ", "\n\n"] {
            let effect = update(&mut app, Action::SubmitDraft(draft.to_string()));
            assert_eq!(effect, Effect::None);
            assert_eq!(message_count(&app), 1, "no message appended for {draft:?}");
            assert!(!app.pending);
        }
    }

    #[test]
    fn submit_appends_trimmed_user_message_and_sets_pending() {
        let mut app = test_app();
        let effect = update(&mut app, Action::SubmitDraft("  Hello  ".to_string()));
        assert_eq!(effect, Effect::SpawnReply);
        assert!(app.pending);
        let messages = &app.active_conversation().messages;
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[1].role, Role::User);
        assert_eq!(messages[1].content, "Hello");
    }

    #[test]
    fn second_submit_while_pending_is_a_no_op() {
        let mut app = test_app();
        update(&mut app, Action::SubmitDraft("first".to_string()));
        let effect = update(&mut app, Action::SubmitDraft("second".to_string()));
        assert_eq!(effect, Effect::None);
        assert_eq!(message_count(&app), 2);
        assert!(app.pending);
    }

    #[test]
    fn reply_clears_pending_and_appends_assistant_message() {
        let mut app = test_app();
        update(&mut app, Action::SubmitDraft("Hello".to_string()));
        let active_id = app.active_id;
        let effect = update(
            &mut app,
            Action::ReplyArrived {
                conversation_id: active_id,
                content: "Hi there".to_string(),
            },
        );
        assert_eq!(effect, Effect::None);
        assert!(!app.pending);
        let messages = &app.active_conversation().messages;
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[2].role, Role::Assistant);
        assert_eq!(messages[2].content, "Hi there");
    }

    #[test]
    fn stale_reply_for_another_conversation_is_dropped() {
        let mut app = test_app();
        update(&mut app, Action::SubmitDraft("Hello".to_string()));
        let stale_id = app.active_id;
        let effect = update(&mut app, Action::NewConversation);
        assert_eq!(effect, Effect::CancelReply);
        assert!(!app.pending);

        // The aborted task may still have sent its action before dying.
        let effect = update(
            &mut app,
            Action::ReplyArrived {
                conversation_id: stale_id,
                content: "too late".to_string(),
            },
        );
        assert_eq!(effect, Effect::None);
        assert_eq!(message_count(&app), 1, "only the greeting");
        let stale = app.conversations.iter().find(|c| c.id == stale_id).unwrap();
        assert!(
            stale.messages.iter().all(|m| m.content != "too late"),
            "stale reply must not land in the conversation the user left"
        );
    }

    #[test]
    fn reply_while_not_pending_is_dropped() {
        let mut app = test_app();
        let active_id = app.active_id;
        let effect = update(
            &mut app,
            Action::ReplyArrived {
                conversation_id: active_id,
                content: "unsolicited".to_string(),
            },
        );
        assert_eq!(effect, Effect::None);
        assert_eq!(message_count(&app), 1);
    }

    #[test]
    fn failed_reply_clears_pending_and_sets_status() {
        let mut app = test_app();
        update(&mut app, Action::SubmitDraft("Hello".to_string()));
        let active_id = app.active_id;
        update(
            &mut app,
            Action::ReplyFailed {
                conversation_id: active_id,
                message: "backend offline".to_string(),
            },
        );
        assert!(!app.pending);
        assert_eq!(app.status_message, "Reply failed: backend offline");
        assert_eq!(message_count(&app), 2, "no assistant message appended");
    }

    #[test]
    fn new_conversation_resets_to_single_greeting() {
        let mut app = test_app();
        update(&mut app, Action::SubmitDraft("Hello".to_string()));
        update(&mut app, Action::NewConversation);

        assert_eq!(app.conversations.len(), 2);
        assert_eq!(app.active_id, 2);
        let messages = &app.active_conversation().messages;
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].role, Role::Assistant);
        assert_eq!(messages[0].content, app.greeting);
    }

    #[test]
    fn delete_last_conversation_is_a_no_op() {
        let mut app = test_app();
        let active_id = app.active_id;
        let effect = update(&mut app, Action::DeleteConversation(active_id));
        assert_eq!(effect, Effect::None);
        assert_eq!(app.conversations.len(), 1);
    }

    #[test]
    fn delete_inactive_conversation_keeps_active() {
        let mut app = test_app();
        update(&mut app, Action::NewConversation);
        let effect = update(&mut app, Action::DeleteConversation(1));
        assert_eq!(effect, Effect::None);
        assert_eq!(app.conversations.len(), 1);
        assert_eq!(app.active_id, 2);
    }

    #[test]
    fn delete_active_conversation_activates_neighbour() {
        let mut app = test_app();
        update(&mut app, Action::NewConversation); // id 2
        update(&mut app, Action::NewConversation); // id 3
        update(&mut app, Action::SelectConversation(2));
        update(&mut app, Action::DeleteConversation(2));
        // The conversation after the deleted one takes over.
        assert_eq!(app.active_id, 3);
        assert_eq!(app.conversations.len(), 2);
    }

    #[test]
    fn delete_active_tail_conversation_falls_back_to_previous() {
        let mut app = test_app();
        update(&mut app, Action::NewConversation); // id 2, active
        update(&mut app, Action::DeleteConversation(2));
        assert_eq!(app.active_id, 1);
    }

    #[test]
    fn ids_are_never_reused_after_deletion() {
        let mut app = test_app();
        update(&mut app, Action::NewConversation); // id 2
        update(&mut app, Action::DeleteConversation(1));
        update(&mut app, Action::NewConversation); // must be id 3, not 2
        let ids: Vec<_> = app.conversations.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![2, 3]);
    }

    #[test]
    fn select_cancels_in_flight_reply() {
        let mut app = test_app();
        update(&mut app, Action::NewConversation); // id 2, active
        update(&mut app, Action::SubmitDraft("Hello".to_string()));
        assert!(app.pending);
        let effect = update(&mut app, Action::SelectConversation(1));
        assert_eq!(effect, Effect::CancelReply);
        assert!(!app.pending);
        assert_eq!(app.active_id, 1);
    }

    #[test]
    fn select_active_or_unknown_is_a_no_op() {
        let mut app = test_app();
        let active_id = app.active_id;
        assert_eq!(
            update(&mut app, Action::SelectConversation(active_id)),
            Effect::None
        );
        assert_eq!(update(&mut app, Action::SelectConversation(99)), Effect::None);
        assert_eq!(app.active_id, 1);
    }

    #[test]
    fn delete_active_conversation_cancels_in_flight_reply() {
        let mut app = test_app();
        update(&mut app, Action::NewConversation); // id 2, active
        update(&mut app, Action::SubmitDraft("Hello".to_string()));
        let effect = update(&mut app, Action::DeleteConversation(2));
        assert_eq!(effect, Effect::CancelReply);
        assert!(!app.pending);
        assert_eq!(app.active_id, 1);
    }

    #[test]
    fn first_user_message_retitles_the_conversation() {
        let mut app = test_app();
        update(&mut app, Action::SubmitDraft("How do tides work?".to_string()));
        assert_eq!(app.active_conversation().title, "How do tides work?");

        // Later messages leave the title alone.
        let active_id = app.active_id;
        update(
            &mut app,
            Action::ReplyArrived {
                conversation_id: active_id,
                content: "ok".to_string(),
            },
        );
        update(&mut app, Action::SubmitDraft("And the moon?".to_string()));
        assert_eq!(app.active_conversation().title, "How do tides work?");
    }

    #[test]
    fn toggle_sidebar_flips_flag() {
        let mut app = test_app();
        let open = app.sidebar_open;
        update(&mut app, Action::ToggleSidebar);
        assert_eq!(app.sidebar_open, !open);
    }

    #[test]
    fn derive_title_truncates_on_char_boundary() {
        assert_eq!(derive_title("short"), "short");
        assert_eq!(derive_title("first line\nsecond"), "first line");
        let long = "é".repeat(50);
        let title = derive_title(&long);
        assert_eq!(title.chars().count(), TITLE_MAX_CHARS + 3);
        assert!(title.ends_with("..."));
    }
}
