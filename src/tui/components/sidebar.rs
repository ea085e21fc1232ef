//! # Conversation Sidebar
//!
//! Left-hand panel listing conversations. Create with `n`, delete with a
//! double-press of `d`, open with Enter. Toggled with Ctrl+B; Tab moves
//! focus between the composer and the sidebar.
//!
//! Follows the persistent state + transient wrapper pattern:
//! - `SidebarState` lives in `TuiState`
//! - `Sidebar` is created each frame with borrowed state and props

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Padding};

use crate::core::state::{Conversation, ConversationId};
use crate::tui::event::TuiEvent;

/// Columns the sidebar occupies when open.
pub const SIDEBAR_WIDTH: u16 = 28;

/// Persistent state for the sidebar.
pub struct SidebarState {
    pub selected: usize,
    pub confirm_delete: bool,
    pub list_state: ListState,
}

impl Default for SidebarState {
    fn default() -> Self {
        Self::new()
    }
}

impl SidebarState {
    pub fn new() -> Self {
        let mut list_state = ListState::default();
        list_state.select(Some(0));
        Self {
            selected: 0,
            confirm_delete: false,
            list_state,
        }
    }

    /// Clamp the selection after the conversation list changed.
    /// Called once per frame before rendering.
    pub fn sync(&mut self, conversation_count: usize) {
        self.selected = self.selected.min(conversation_count.saturating_sub(1));
        self.list_state.select(Some(self.selected));
    }

    /// Handle a key event, returning a SidebarEvent if the parent should act.
    pub fn handle_event(
        &mut self,
        event: &TuiEvent,
        conversations: &[Conversation],
    ) -> Option<SidebarEvent> {
        // Reset delete confirmation on any non-delete key
        let is_delete_key = matches!(event, TuiEvent::InputChar('d'));
        if !is_delete_key {
            self.confirm_delete = false;
        }

        match event {
            TuiEvent::Escape => Some(SidebarEvent::Dismiss),
            TuiEvent::CursorUp => {
                self.selected = self.selected.saturating_sub(1);
                self.list_state.select(Some(self.selected));
                None
            }
            TuiEvent::CursorDown => {
                if !conversations.is_empty() {
                    self.selected = (self.selected + 1).min(conversations.len() - 1);
                    self.list_state.select(Some(self.selected));
                }
                None
            }
            TuiEvent::Submit => conversations
                .get(self.selected)
                .map(|conversation| SidebarEvent::Open(conversation.id)),
            TuiEvent::InputChar('n') => Some(SidebarEvent::CreateNew),
            TuiEvent::InputChar('d') => {
                let conversation = conversations.get(self.selected)?;
                if self.confirm_delete {
                    self.confirm_delete = false;
                    Some(SidebarEvent::Delete(conversation.id))
                } else {
                    self.confirm_delete = true;
                    None
                }
            }
            _ => None,
        }
    }
}

/// Events emitted by the sidebar.
pub enum SidebarEvent {
    Open(ConversationId),
    CreateNew,
    Delete(ConversationId),
    Dismiss,
}

/// Transient render wrapper for the sidebar panel.
pub struct Sidebar<'a> {
    state: &'a mut SidebarState,
    conversations: &'a [Conversation],
    active_id: ConversationId,
    focused: bool,
}

impl<'a> Sidebar<'a> {
    pub fn new(
        state: &'a mut SidebarState,
        conversations: &'a [Conversation],
        active_id: ConversationId,
        focused: bool,
    ) -> Self {
        Self {
            state,
            conversations,
            active_id,
            focused,
        }
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect) {
        let help_text = if self.state.confirm_delete {
            " d again to delete | Esc cancel "
        } else {
            " n New  d Delete  Enter Open "
        };

        let border_style = if self.focused {
            Style::default().fg(Color::White)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(" Conversations ")
            .title_bottom(Line::from(help_text).centered().style(
                Style::default().fg(Color::DarkGray),
            ))
            .padding(Padding::horizontal(1));

        // Build list items: active marker, padded title, message count
        let items: Vec<ListItem> = self
            .conversations
            .iter()
            .enumerate()
            .map(|(i, conversation)| {
                let marker = if conversation.id == self.active_id {
                    "▌"
                } else {
                    " "
                };
                let count = format!("{}", conversation.messages.len());

                let inner_width = area.width.saturating_sub(4) as usize; // borders + padding
                let fixed_width = 1 + 1 + count.len() + 1; // marker + gaps + count
                let title_width = inner_width.saturating_sub(fixed_width);
                let title = truncate_str(&conversation.title, title_width);
                let padded_title = format!("{:<width$}", title, width = title_width);

                let style = if self.focused && i == self.state.selected {
                    if self.state.confirm_delete {
                        Style::default()
                            .fg(Color::Red)
                            .add_modifier(Modifier::BOLD | Modifier::REVERSED)
                    } else {
                        Style::default()
                            .fg(Color::White)
                            .add_modifier(Modifier::BOLD | Modifier::REVERSED)
                    }
                } else if conversation.id == self.active_id {
                    Style::default().fg(Color::White)
                } else {
                    Style::default().fg(Color::Gray)
                };

                let line = Line::from(vec![
                    Span::styled(marker, style),
                    Span::styled(" ", style),
                    Span::styled(padded_title, style),
                    Span::styled(" ", style),
                    Span::styled(count, style),
                ]);

                ListItem::new(line)
            })
            .collect();

        let list = List::new(items).block(block);

        frame.render_stateful_widget(list, area, &mut self.state.list_state);
    }
}

/// Truncate a string to fit within `max_width` chars, adding "..." if needed.
fn truncate_str(s: &str, max_width: usize) -> String {
    if s.chars().count() <= max_width {
        s.to_string()
    } else if max_width <= 3 {
        ".".repeat(max_width)
    } else {
        let kept: String = s.chars().take(max_width - 3).collect();
        format!("{}...", kept)
    }
}
