//! # TitleBar Component
//!
//! Single-line header above the message pane: application name, active
//! conversation title, and the transient status message (reply failures).
//!
//! Purely presentational — all fields are props from parent state.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::Span;

use crate::tui::component::Component;

pub struct TitleBar {
    /// Title of the active conversation
    pub conversation_title: String,
    /// Transient status text (empty when there is nothing to report)
    pub status_message: String,
}

impl TitleBar {
    pub fn new(conversation_title: String, status_message: String) -> Self {
        Self {
            conversation_title,
            status_message,
        }
    }
}

impl Component for TitleBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let text = if self.status_message.is_empty() {
            format!("banter | {}", self.conversation_title)
        } else {
            format!("banter | {} | {}", self.conversation_title, self.status_message)
        };
        frame.render_widget(Span::raw(text), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn rendered_text(title_bar: &mut TitleBar) -> String {
        let backend = TestBackend::new(60, 1);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| {
                title_bar.render(f, f.area());
            })
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn shows_conversation_title() {
        let mut title_bar = TitleBar::new("New conversation".to_string(), String::new());
        let text = rendered_text(&mut title_bar);
        assert!(text.contains("banter | New conversation"));
        assert!(!text.contains("Reply failed"));
    }

    #[test]
    fn appends_status_message_when_present() {
        let mut title_bar =
            TitleBar::new("New conversation".to_string(), "Reply failed: oops".to_string());
        let text = rendered_text(&mut title_bar);
        assert!(text.contains("| Reply failed: oops"));
    }
}
