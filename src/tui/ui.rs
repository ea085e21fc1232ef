//! Frame layout: sidebar on the left (when open), then header, message pane,
//! and composer stacked vertically. The composer row grows with its content.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};

use crate::core::state::App;
use crate::tui::component::Component;
use crate::tui::components::sidebar::SIDEBAR_WIDTH;
use crate::tui::components::{MessageList, Sidebar, TitleBar};
use crate::tui::{Focus, TuiState};

pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState, spinner_frame: usize) {
    use Constraint::{Length, Min};

    // Sync render-time props with App state
    tui.input_box.pending = app.pending;

    let area = frame.area();
    let (sidebar_area, content_area) = if app.sidebar_open {
        let [sidebar_area, content_area] =
            Layout::horizontal([Length(SIDEBAR_WIDTH), Min(0)]).areas(area);
        (Some(sidebar_area), content_area)
    } else {
        (None, area)
    };

    let input_height = tui.input_box.calculate_height(content_area.width);
    let [title_area, messages_area, input_area] =
        Layout::vertical([Length(1), Min(0), Length(input_height)]).areas(content_area);

    if let Some(sidebar_area) = sidebar_area {
        Sidebar::new(
            &mut tui.sidebar,
            &app.conversations,
            app.active_id,
            tui.focus == Focus::Sidebar,
        )
        .render(frame, sidebar_area);
    }

    let conversation = app.active_conversation();

    TitleBar::new(conversation.title.clone(), app.status_message.clone())
        .render(frame, title_area);

    MessageList::new(
        &mut tui.message_list,
        &conversation.messages,
        app.pending,
        spinner_frame,
    )
    .render(frame, messages_area);

    tui.input_box.render(frame, input_area);
}
