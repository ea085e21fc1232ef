//! # MessageList Component
//!
//! Scrollable view of the active conversation.
//!
//! ## Responsibilities
//!
//! - Display the message history plus the typing indicator
//! - Stick to the bottom so new messages are always revealed
//! - Perform efficient layout caching (message heights)
//!
//! ## Architecture
//!
//! `MessageList` is a transient component (created each frame) that wraps
//! `&'a mut MessageListState` (persistent state) and the active
//! conversation's messages (props).
//!
//! Since `Component::render` takes `&mut self`, we can safely mutate the
//! state (including layout cache and scroll state) during the render pass,
//! aligning with Ratatui's `StatefulWidget` pattern.

use ratatui::Frame;
use ratatui::layout::{Position, Rect, Size};
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};

use crate::core::state::Message;
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::message::MessageView;
use crate::tui::components::typing_indicator::{self, TypingIndicator};
use crate::tui::event::TuiEvent;

/// Widest a typing indicator bubble gets; narrower terminals clamp it.
const TYPING_INDICATOR_WIDTH: u16 = 15;

/// Layout and scroll state for the message list.
/// Must be persisted in the parent TuiState.
pub struct MessageListState {
    /// Scroll offset and view state
    pub scroll_state: ScrollViewState,
    /// Cached layout measurements
    pub layout: LayoutCache,
    /// When true, auto-scroll to bottom on new content
    pub stick_to_bottom: bool,
    /// Last known viewport height (for scroll clamping between frames)
    pub viewport_height: u16,
}

impl Default for MessageListState {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageListState {
    pub fn new() -> Self {
        Self {
            scroll_state: ScrollViewState::default(),
            layout: LayoutCache::new(),
            stick_to_bottom: true, // Start attached to bottom
            viewport_height: 0,
        }
    }

    /// Re-attach to the bottom so the next render reveals the newest message.
    /// Called after every append to the message sequence.
    pub fn follow(&mut self) {
        self.stick_to_bottom = true;
    }

    /// Clamp scroll offset so it never exceeds the content bounds.
    /// Prevents overscrolling past the last message.
    pub fn clamp_scroll(&mut self) {
        let total_content_height: u16 = self.layout.heights.iter().sum();
        let max_y = total_content_height.saturating_sub(self.viewport_height);
        let current = self.scroll_state.offset();
        if current.y > max_y {
            self.scroll_state.set_offset(Position {
                x: current.x,
                y: max_y,
            });
        }
    }

    /// Clamp scroll and re-engage auto-scroll if the user has reached the bottom.
    /// Called on scroll-down events so that scrolling past the end re-pins to bottom.
    pub fn repin_if_at_bottom(&mut self) {
        let total_content_height: u16 = self.layout.heights.iter().sum();
        let max_y = total_content_height.saturating_sub(self.viewport_height);
        let current = self.scroll_state.offset();
        if current.y >= max_y {
            self.stick_to_bottom = true;
            self.scroll_state.set_offset(Position {
                x: current.x,
                y: max_y,
            });
        }
    }
}

/// Scrollable conversation view component.
/// Created fresh each frame with references to state and data.
pub struct MessageList<'a> {
    // Mutable reference to persistent state
    pub state: &'a mut MessageListState,
    pub messages: &'a [Message],
    pub pending: bool,
    pub spinner_frame: usize,
}

impl<'a> MessageList<'a> {
    pub fn new(
        state: &'a mut MessageListState,
        messages: &'a [Message],
        pending: bool,
        spinner_frame: usize,
    ) -> Self {
        Self {
            state,
            messages,
            pending,
            spinner_frame,
        }
    }
}

impl<'a> Component for MessageList<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let content_width = area.width.saturating_sub(1); // -1 for scrollbar safe area
        let num_messages = self.messages.len();

        // 1. Update Layout Cache (Internal Mutation)
        let layout = &mut self.state.layout;
        let reusable = layout.reusable_count(num_messages, content_width);
        layout.heights.truncate(reusable.min(layout.heights.len()));

        for message in self.messages.iter().skip(layout.heights.len()) {
            layout
                .heights
                .push(MessageView::calculate_height(message, content_width));
        }
        layout.rebuild_prefix_heights();
        layout.update_metadata(num_messages, content_width);

        let total_height: u16 = self.state.layout.heights.iter().sum();

        // The typing indicator lives inside the canvas so it scrolls with
        // the messages and stick-to-bottom reveals it.
        let typing_height = if self.pending { typing_indicator::HEIGHT } else { 0 };
        let canvas_height = total_height + typing_height;

        // 2. Clamp scroll offset to prevent overscrolling past content.
        // Skip when auto-scrolling: scroll_to_bottom targets canvas_height.
        self.state.viewport_height = area.height;
        if !self.state.stick_to_bottom {
            self.state.clamp_scroll();
        }

        let scroll_offset = self.state.scroll_state.offset().y;
        let visible_range = self.state.layout.visible_range(scroll_offset, area.height);

        // 3. Render visible messages into a ScrollView
        let mut scroll_view = ScrollView::new(Size::new(content_width, canvas_height))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Always)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);

        let mut y_offset: u16 = if visible_range.start > 0 {
            self.state.layout.prefix_heights[visible_range.start - 1]
        } else {
            0
        };

        for i in visible_range {
            let height = self.state.layout.heights[i];
            let segment_rect = Rect::new(0, y_offset, content_width, height);
            scroll_view.render_widget(MessageView::new(&self.messages[i]), segment_rect);
            y_offset += height;
        }

        if self.pending {
            let indicator_rect = Rect::new(
                0,
                total_height,
                TYPING_INDICATOR_WIDTH.min(content_width),
                typing_height,
            );
            scroll_view.render_widget(
                TypingIndicator {
                    frame: self.spinner_frame,
                },
                indicator_rect,
            );
        }

        // Auto-scroll logic (Mutation)
        if self.state.stick_to_bottom {
            self.state.scroll_state.scroll_to_bottom();
        }

        // Render the ScrollView into the full viewport area
        frame.render_stateful_widget(scroll_view, area, &mut self.state.scroll_state);
    }
}

/// EventHandler is implemented on `MessageListState` rather than `MessageList`
/// because event handling requires persistent state (scroll position,
/// stick_to_bottom flag) and `MessageList` is recreated each frame.
impl EventHandler for MessageListState {
    type Event = (); // MessageList currently emits no events (scroll handled internally)

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::ScrollUp => {
                self.scroll_state.scroll_up();
                self.stick_to_bottom = false;
                None
            }
            TuiEvent::ScrollDown => {
                self.scroll_state.scroll_down();
                self.repin_if_at_bottom();
                None
            }
            TuiEvent::ScrollPageUp => {
                self.scroll_state.scroll_page_up();
                self.stick_to_bottom = false;
                None
            }
            TuiEvent::ScrollPageDown => {
                self.scroll_state.scroll_page_down();
                self.repin_if_at_bottom();
                None
            }
            _ => None,
        }
    }
}

/// Cached layout measurements.
///
/// Messages are append-only and immutable, so cached heights stay valid
/// until the width changes or the list is reset (conversation switch).
pub struct LayoutCache {
    pub heights: Vec<u16>,
    pub prefix_heights: Vec<u16>,
    message_count: usize,
    content_width: u16,
}

impl Default for LayoutCache {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutCache {
    pub fn new() -> Self {
        Self {
            heights: Vec::new(),
            prefix_heights: Vec::new(),
            message_count: 0,
            content_width: 0,
        }
    }

    pub fn reusable_count(&self, message_count: usize, content_width: u16) -> usize {
        if self.content_width != content_width || self.heights.is_empty() {
            return 0;
        }

        // Fewer messages than cached means the list was reset -> invalid
        if message_count < self.message_count {
            return 0;
        }

        self.heights.len()
    }

    pub fn update_metadata(&mut self, message_count: usize, content_width: u16) {
        self.message_count = message_count;
        self.content_width = content_width;
    }

    pub fn rebuild_prefix_heights(&mut self) {
        self.prefix_heights = self
            .heights
            .iter()
            .scan(0u16, |acc, &h| {
                *acc += h;
                Some(*acc)
            })
            .collect();
    }

    pub fn visible_range(
        &self,
        scroll_offset: u16,
        viewport_height: u16,
    ) -> std::ops::Range<usize> {
        let buffer = viewport_height / 2;
        let buffered_start = scroll_offset.saturating_sub(buffer);
        let buffered_end = scroll_offset
            .saturating_add(viewport_height)
            .saturating_add(buffer);

        let start = self
            .prefix_heights
            .partition_point(|&end| end <= buffered_start);
        let end = self
            .prefix_heights
            .partition_point(|&end| end < buffered_end)
            .saturating_add(1)
            .min(self.prefix_heights.len());

        start..end
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::state::Message;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    #[test]
    fn test_layout_cache_reusable() {
        let mut cache = LayoutCache::new();
        cache.update_metadata(5, 80);
        cache.heights = vec![3; 5]; // Simulating 5 messages of height 3

        // Case 1: Same everything -> All reusable
        assert_eq!(cache.reusable_count(5, 80), 5);

        // Case 2: New message appended -> cached prefix still valid
        assert_eq!(cache.reusable_count(6, 80), 5);

        // Case 3: Width changed -> 0 reusable
        assert_eq!(cache.reusable_count(5, 40), 0);

        // Case 4: List reset (conversation switch) -> 0 reusable
        assert_eq!(cache.reusable_count(1, 80), 0);
    }

    #[test]
    fn test_prefix_heights_accumulate() {
        let mut cache = LayoutCache::new();
        cache.heights = vec![3, 5, 4];
        cache.rebuild_prefix_heights();
        assert_eq!(cache.prefix_heights, vec![3, 8, 12]);
    }

    #[test]
    fn test_visible_range_bounds() {
        let mut cache = LayoutCache::new();
        cache.heights = vec![4; 20];
        cache.rebuild_prefix_heights();

        // Top of the list
        let range = cache.visible_range(0, 10);
        assert_eq!(range.start, 0);
        assert!(range.end < 20, "far messages are culled");

        // Scrolled into the middle
        let range = cache.visible_range(40, 10);
        assert!(range.start > 0);
        assert!(range.end <= 20);
    }

    #[test]
    fn test_repin_at_bottom() {
        let mut state = MessageListState::new();
        state.layout.heights = vec![3; 10];
        state.viewport_height = 10;
        state.stick_to_bottom = false;

        // Far from the bottom: stays detached
        state
            .scroll_state
            .set_offset(Position { x: 0, y: 0 });
        state.repin_if_at_bottom();
        assert!(!state.stick_to_bottom);

        // At the bottom: re-pins
        state
            .scroll_state
            .set_offset(Position { x: 0, y: 30 });
        state.repin_if_at_bottom();
        assert!(state.stick_to_bottom);
    }

    #[test]
    fn test_scroll_up_detaches_from_bottom() {
        let mut state = MessageListState::new();
        assert!(state.stick_to_bottom);
        state.handle_event(&TuiEvent::ScrollUp);
        assert!(!state.stick_to_bottom);
        state.follow();
        assert!(state.stick_to_bottom);
    }

    #[test]
    fn test_render_populates_layout_cache() {
        let backend = TestBackend::new(40, 12);
        let mut terminal = Terminal::new(backend).unwrap();
        let mut state = MessageListState::new();
        let messages = vec![Message::assistant("hello"), Message::user("hi")];

        terminal
            .draw(|f| {
                MessageList::new(&mut state, &messages, false, 0).render(f, f.area());
            })
            .unwrap();

        assert_eq!(state.layout.heights.len(), 2);
        assert!(state.layout.heights.iter().all(|&h| h >= 3));
    }

    #[test]
    fn test_render_with_typing_indicator() {
        let backend = TestBackend::new(40, 12);
        let mut terminal = Terminal::new(backend).unwrap();
        let mut state = MessageListState::new();
        let messages = vec![Message::user("hi")];

        terminal
            .draw(|f| {
                MessageList::new(&mut state, &messages, true, 1).render(f, f.area());
            })
            .unwrap();

        let buffer = terminal.backend().buffer();
        let text = buffer.content().iter().map(|c| c.symbol()).collect::<String>();
        assert!(text.contains("assistant"));
    }
}
