use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, Padding, Paragraph, Widget, Wrap};

use crate::core::state::{Message, Role};
use crate::tui::component::Component;

/// Horizontal padding (per side) between the border and text content.
const CONTENT_PAD_H: u16 = 1;
/// Total horizontal space consumed by borders (1 left + 1 right) and padding.
const HORIZONTAL_OVERHEAD: u16 = 2 + CONTENT_PAD_H * 2;
/// Total vertical space consumed by borders (1 top + 1 bottom).
pub(super) const VERTICAL_OVERHEAD: u16 = 2;

/// A stateless component that renders a single chat message with role-based
/// styling.
///
/// `MessageView` is a **transient component**: it's created fresh each frame
/// with the data it needs to render and holds no mutable state.
///
/// # Height Calculation
///
/// [`calculate_height`](Self::calculate_height) predicts rendered height
/// using `textwrap` with options that match Ratatui's `Paragraph` wrapping
/// behavior. This lets the parent `MessageList` compute scroll positions
/// without rendering each message first.
#[derive(Clone, Copy)]
pub struct MessageView<'a> {
    pub message: &'a Message,
}

impl<'a> MessageView<'a> {
    pub fn new(message: &'a Message) -> Self {
        Self { message }
    }

    /// Calculate the height required for this message given a width.
    ///
    /// The wrapping options must match the Ratatui default for `Paragraph`
    /// to ensure 1:1 mapping between calculated and actual height.
    pub fn calculate_height(message: &Message, width: u16) -> u16 {
        let content_width = width.saturating_sub(HORIZONTAL_OVERHEAD);
        if content_width == 0 {
            // Degenerate case: terminal too narrow for borders + padding.
            // Return 1 row so the message still occupies space in the layout.
            return 1;
        }

        let content = message.content.trim();
        if content.is_empty() {
            return VERTICAL_OVERHEAD;
        }

        let options = textwrap::Options::new(content_width as usize)
            .break_words(true)
            .word_separator(textwrap::WordSeparator::AsciiSpace);

        let lines = textwrap::wrap(content, options);
        // Ensure at least 1 content line even if textwrap returns empty
        (lines.len() as u16).max(1) + VERTICAL_OVERHEAD
    }
}

fn role_label(role: Role) -> &'static str {
    match role {
        Role::User => "you",
        Role::Assistant => "assistant",
    }
}

fn role_style(role: Role) -> Style {
    match role {
        Role::User => Style::default().fg(Color::Cyan),
        Role::Assistant => Style::default().fg(Color::Green),
    }
}

impl<'a> Widget for MessageView<'a> {
    fn render(self, area: Rect, buf: &mut ratatui::buffer::Buffer) {
        let style = role_style(self.message.role);
        let border_style = style.add_modifier(ratatui::style::Modifier::DIM);

        let content = self.message.content.trim();

        let block = Block::bordered()
            .title(role_label(self.message.role))
            .border_type(ratatui::widgets::BorderType::Rounded)
            .border_style(border_style)
            .title_style(border_style)
            .padding(Padding::horizontal(CONTENT_PAD_H));

        let inner_area = block.inner(area);
        block.render(area, buf);

        let paragraph = Paragraph::new(content)
            .style(style)
            .wrap(Wrap { trim: true });

        paragraph.render(inner_area, buf);
    }
}

/// `MessageView` is stateless, so the `&mut self` required by the trait is a
/// no-op; rendering is delegated to the [`Widget`] implementation.
impl<'a> Component for MessageView<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        frame.render_widget(*self, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_message(role: Role, content: &str) -> Message {
        Message {
            role,
            content: content.to_string(),
        }
    }

    // ==========================================================================
    // calculate_height tests
    // ==========================================================================

    #[test]
    fn calculate_height_empty_content_returns_border_height() {
        let message = make_message(Role::User, "");
        assert_eq!(MessageView::calculate_height(&message, 80), VERTICAL_OVERHEAD);
    }

    #[test]
    fn calculate_height_whitespace_only_treated_as_empty() {
        let message = make_message(Role::User, "   \n\t  ");
        assert_eq!(MessageView::calculate_height(&message, 80), VERTICAL_OVERHEAD);
    }

    #[test]
    fn calculate_height_zero_width_returns_minimum() {
        let message = make_message(Role::User, "Hello world");
        assert_eq!(MessageView::calculate_height(&message, 0), 1);
    }

    #[test]
    fn calculate_height_width_equals_overhead_returns_minimum() {
        let message = make_message(Role::User, "Hello world");
        assert_eq!(
            MessageView::calculate_height(&message, HORIZONTAL_OVERHEAD),
            1
        );
    }

    #[test]
    fn calculate_height_single_line_fits() {
        let message = make_message(Role::User, "Hello");
        // "Hello" (5 chars) fits in width 80 - HORIZONTAL_OVERHEAD = 76
        assert_eq!(
            MessageView::calculate_height(&message, 80),
            1 + VERTICAL_OVERHEAD
        );
    }

    #[test]
    fn calculate_height_wraps_at_width_boundary() {
        let message = make_message(Role::User, "Hello world");
        // "Hello world" = 11 chars, width 9 → content_width = 5
        // Wraps to: "Hello" | "world" = 2 lines
        assert_eq!(
            MessageView::calculate_height(&message, 9),
            2 + VERTICAL_OVERHEAD
        );
    }

    #[test]
    fn calculate_height_breaks_long_words() {
        let message = make_message(Role::User, "abcdefghij");
        // "abcdefghij" = 10 chars, width 8 → content_width = 4
        // Breaks to: "abcd" | "efgh" | "ij" = 3 lines
        assert_eq!(
            MessageView::calculate_height(&message, 8),
            3 + VERTICAL_OVERHEAD
        );
    }

    // ==========================================================================
    // Style tests
    // ==========================================================================

    #[test]
    fn style_user_is_cyan() {
        assert_eq!(role_style(Role::User).fg, Some(Color::Cyan));
    }

    #[test]
    fn style_assistant_is_green() {
        assert_eq!(role_style(Role::Assistant).fg, Some(Color::Green));
    }

    #[test]
    fn test_role_labels() {
        assert_eq!(role_label(Role::User), "you");
        assert_eq!(role_label(Role::Assistant), "assistant");
    }
}
