//! Animated "assistant is typing" row shown below the newest message while a
//! reply is outstanding.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Padding, Paragraph, Widget};

use super::message::VERTICAL_OVERHEAD;

/// Rows the indicator occupies in the message canvas.
pub const HEIGHT: u16 = 1 + VERTICAL_OVERHEAD;

/// Dot frames cycled by the event loop's animation clock.
const FRAMES: [&str; 4] = ["·", "··", "···", "··"];

/// Transient widget; the animation frame is a prop from the event loop.
#[derive(Clone, Copy)]
pub struct TypingIndicator {
    pub frame: usize,
}

impl Widget for TypingIndicator {
    fn render(self, area: Rect, buf: &mut ratatui::buffer::Buffer) {
        let style = Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::ITALIC);

        let block = Block::bordered()
            .title("assistant")
            .border_type(ratatui::widgets::BorderType::Rounded)
            .border_style(style)
            .title_style(style)
            .padding(Padding::horizontal(1));

        let inner_area = block.inner(area);
        block.render(area, buf);

        let dots = FRAMES[self.frame % FRAMES.len()];
        Paragraph::new(dots).style(style).render(inner_area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    #[test]
    fn frames_cycle_without_panicking() {
        let backend = TestBackend::new(20, 3);
        let mut terminal = Terminal::new(backend).unwrap();
        for frame in 0..10 {
            terminal
                .draw(|f| {
                    f.render_widget(TypingIndicator { frame }, f.area());
                })
                .unwrap();
        }
    }

    #[test]
    fn renders_assistant_label() {
        let backend = TestBackend::new(20, 3);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| {
                f.render_widget(TypingIndicator { frame: 0 }, f.area());
            })
            .unwrap();
        let buffer = terminal.backend().buffer();
        let text = buffer.content().iter().map(|c| c.symbol()).collect::<String>();
        assert!(text.contains("assistant"));
    }
}
