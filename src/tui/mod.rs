//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI,
//! and translates keyboard events into core::Action values.
//!
//! This is the only module that knows about ratatui and crossterm. The core
//! reducer could be driven by a different adapter without changes.
//!
//! ## Redraw Strategy
//!
//! The event loop uses conditional redraw to avoid unnecessary work:
//!
//! - **Animating** (typing indicator): draws every ~80ms for smooth animation.
//! - **Idle**: sleeps up to 500ms, only redraws on events or terminal resize.
//!
//! A `SteadyBlock` cursor style is used instead of a blinking cursor because
//! ratatui's `set_cursor_position` resets the terminal's blink timer on every
//! `draw()` call, making blinking cursors appear erratic during continuous
//! redraws.

mod component;
pub mod components;
pub mod event;
mod ui;

use log::{debug, info, warn};
use std::io::stdout;
use std::sync::{Arc, mpsc};
use std::time::Duration;

use crossterm::cursor::{Hide, SetCursorStyle, Show};
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
    KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;

use crate::assistant::{AssistantProvider, CannedResponder};
use crate::core::action::{Action, Effect, update};
use crate::core::config::ResolvedConfig;
use crate::core::state::App;
use crate::tui::component::EventHandler;
use crate::tui::components::{InputBox, InputEvent, MessageListState, SidebarEvent, SidebarState};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

/// Which region keyboard input is routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    /// Text editing in the composer. Tab or Esc switches to the sidebar.
    Composer,
    /// Navigating the conversation list. Esc returns to the composer.
    Sidebar,
}

/// TUI-specific presentation state (not part of core business logic)
pub struct TuiState {
    // Persistent component states
    pub message_list: MessageListState,
    pub input_box: InputBox,
    pub sidebar: SidebarState,
    // Input routing
    pub focus: Focus,
}

impl Default for TuiState {
    fn default() -> Self {
        Self::new()
    }
}

impl TuiState {
    pub fn new() -> Self {
        Self {
            message_list: MessageListState::new(),
            input_box: InputBox::new(),
            sidebar: SidebarState::new(),
            focus: Focus::Composer, // User expects to type immediately
        }
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        // Enable Kitty keyboard protocol unconditionally (allows Shift+Enter
        // detection). The protocol is harmlessly ignored by terminals that
        // don't support it.
        execute!(
            stdout(),
            EnableMouseCapture,
            EnableBracketedPaste,
            Show,                        // Show cursor for input editing
            SetCursorStyle::SteadyBlock, // Non-blinking: avoids blink timer reset from continuous redraws
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
            )
        )?;
        info!(
            "Terminal modes enabled (mouse, bracketed paste, steady block cursor, keyboard enhancement)"
        );
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(
            stdout(),
            PopKeyboardEnhancementFlags,
            DisableMouseCapture,
            DisableBracketedPaste,
            Hide // Hide cursor on exit
        );
    }
}

pub fn run(config: ResolvedConfig) -> std::io::Result<()> {
    let provider: Arc<dyn AssistantProvider> = Arc::new(CannedResponder::new(
        Duration::from_millis(config.reply_delay_ms),
        config.replies.clone(),
    ));
    let mut app = App::new(provider, &config);
    let mut tui = TuiState::new();

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new()?;

    // Channel for actions from the background reply task
    let (tx, rx) = mpsc::channel();

    // Abort handle for the in-flight reply task (cancelled when the user
    // leaves the conversation the reply belongs to)
    let mut active_reply: Option<tokio::task::AbortHandle> = None;

    // Animation timer
    let start_time = std::time::Instant::now();
    let mut needs_redraw = true; // Force first frame

    loop {
        // Sync sidebar selection and focus with App state
        tui.sidebar.sync(app.conversations.len());
        if !app.sidebar_open && tui.focus == Focus::Sidebar {
            tui.focus = Focus::Composer;
        }

        // The typing indicator is the only animation
        let animating = app.pending;
        if animating {
            needs_redraw = true;
        }

        // Only draw when something changed
        if needs_redraw {
            let elapsed = start_time.elapsed().as_secs_f32();
            let spinner_frame = (elapsed * 4.0) as usize;
            terminal.draw(|f| ui::draw_ui(f, &app, &mut tui, spinner_frame))?;
            needs_redraw = false;
        }

        // Dynamic poll timeout: short when animating (~12fps), long when idle
        let timeout = if animating {
            Duration::from_millis(80)
        } else {
            Duration::from_millis(500)
        };
        let first_event = poll_event_timeout(timeout);

        // Process first event + drain ALL pending events before next draw
        let mut should_quit = false;
        if first_event.is_some() {
            needs_redraw = true;
        }
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            // Resize just needs a redraw (already flagged above)
            if matches!(event, TuiEvent::Resize) {
                continue;
            }

            // Ctrl+C always quits regardless of focus
            if matches!(event, TuiEvent::ForceQuit) {
                should_quit |= apply_action(&mut app, &mut tui, Action::Quit, &tx, &mut active_reply);
                continue;
            }

            // Ctrl+N creates a conversation from anywhere
            if matches!(event, TuiEvent::NewConversation) {
                should_quit |=
                    apply_action(&mut app, &mut tui, Action::NewConversation, &tx, &mut active_reply);
                tui.focus = Focus::Composer;
                continue;
            }

            // Ctrl+B toggles the sidebar from anywhere
            if matches!(event, TuiEvent::ToggleSidebar) {
                should_quit |=
                    apply_action(&mut app, &mut tui, Action::ToggleSidebar, &tx, &mut active_reply);
                continue;
            }

            // Tab moves focus between composer and sidebar
            if matches!(event, TuiEvent::FocusNext) {
                if app.sidebar_open {
                    tui.focus = match tui.focus {
                        Focus::Composer => Focus::Sidebar,
                        Focus::Sidebar => Focus::Composer,
                    };
                }
                continue;
            }

            // Scroll events always go to the MessageList regardless of focus
            if matches!(
                event,
                TuiEvent::ScrollUp
                    | TuiEvent::ScrollDown
                    | TuiEvent::ScrollPageUp
                    | TuiEvent::ScrollPageDown
            ) {
                tui.message_list.handle_event(&event);
                continue;
            }

            // Focus-dependent dispatch
            match tui.focus {
                Focus::Sidebar => {
                    if let Some(sidebar_event) = tui.sidebar.handle_event(&event, &app.conversations)
                    {
                        match sidebar_event {
                            SidebarEvent::Open(id) => {
                                should_quit |= apply_action(
                                    &mut app,
                                    &mut tui,
                                    Action::SelectConversation(id),
                                    &tx,
                                    &mut active_reply,
                                );
                                tui.focus = Focus::Composer;
                            }
                            SidebarEvent::CreateNew => {
                                should_quit |= apply_action(
                                    &mut app,
                                    &mut tui,
                                    Action::NewConversation,
                                    &tx,
                                    &mut active_reply,
                                );
                                tui.focus = Focus::Composer;
                            }
                            SidebarEvent::Delete(id) => {
                                should_quit |= apply_action(
                                    &mut app,
                                    &mut tui,
                                    Action::DeleteConversation(id),
                                    &tx,
                                    &mut active_reply,
                                );
                            }
                            SidebarEvent::Dismiss => {
                                tui.focus = Focus::Composer;
                            }
                        }
                    }
                }
                Focus::Composer => {
                    // Esc moves focus to the sidebar (when it is open)
                    if matches!(event, TuiEvent::Escape) {
                        if app.sidebar_open {
                            tui.focus = Focus::Sidebar;
                        }
                        continue;
                    }

                    // One outstanding reply at a time: swallow Submit here so
                    // the input box keeps the draft instead of clearing it.
                    if matches!(event, TuiEvent::Submit) && app.pending {
                        continue;
                    }

                    if let Some(InputEvent::Submit(text)) = tui.input_box.handle_event(&event) {
                        should_quit |= apply_action(
                            &mut app,
                            &mut tui,
                            Action::SubmitDraft(text),
                            &tx,
                            &mut active_reply,
                        );
                    }
                }
            }
        }

        if should_quit {
            break;
        }

        // Handle actions from the background reply task
        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            debug!("Event loop received: {:?}", action);
            if apply_action(&mut app, &mut tui, action, &tx, &mut active_reply) {
                should_quit = true;
            }
        }
        if should_quit {
            break;
        }
    }

    ratatui::restore();
    Ok(())
}

/// Run an action through the reducer and perform the resulting effect.
/// Returns true when the app should quit.
fn apply_action(
    app: &mut App,
    tui: &mut TuiState,
    action: Action,
    tx: &mpsc::Sender<Action>,
    active_reply: &mut Option<tokio::task::AbortHandle>,
) -> bool {
    let before = (app.active_id, app.active_conversation().messages.len());
    let effect = update(app, action);
    let after = (app.active_id, app.active_conversation().messages.len());

    // Auto-scroll: any change to the message sequence reveals the newest
    // message; a conversation switch rebuilds the layout from scratch.
    if before.0 != after.0 {
        tui.message_list = MessageListState::new();
    } else if before.1 != after.1 {
        tui.message_list.follow();
    }

    match effect {
        Effect::Quit => return true,
        Effect::SpawnReply => {
            *active_reply = Some(spawn_reply(app, tx.clone()));
        }
        Effect::CancelReply => {
            if let Some(handle) = active_reply.take() {
                handle.abort();
            }
        }
        Effect::None => {}
    }
    false
}

/// Spawn the provider task for the active conversation and return its abort
/// handle so leaving the conversation can cancel the stale completion.
fn spawn_reply(app: &App, tx: mpsc::Sender<Action>) -> tokio::task::AbortHandle {
    info!("Spawning reply task for conversation {}", app.active_id);

    // Clone what we need for the async task
    let provider = app.provider.clone();
    let history = app.active_conversation().messages.clone();
    let conversation_id = app.active_id;

    let handle = tokio::spawn(async move {
        let action = match provider.reply(&history).await {
            Ok(content) => Action::ReplyArrived {
                conversation_id,
                content,
            },
            Err(e) => {
                warn!("Reply task failed: {e}");
                Action::ReplyFailed {
                    conversation_id,
                    message: e.to_string(),
                }
            }
        };
        if tx.send(action).is_err() {
            warn!("Failed to send reply action: receiver dropped");
        }
    });
    handle.abort_handle()
}
