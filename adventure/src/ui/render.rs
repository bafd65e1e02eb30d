//! Render orchestration for the adventure TUI

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::{App, Screen};
use crate::ui::widgets::{FragmentPreviewWidget, LibraryWidget, ReaderWidget, TreeViewWidget};

/// Main render function
pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(frame.area());

    render_title_bar(frame, app, chunks[0]);

    match app.screen {
        Screen::Library => {
            let widget = LibraryWidget::new(&app.stories, app.library_index, &app.theme);
            frame.render_widget(widget, chunks[1]);
        }
        Screen::Tree => render_tree_screen(frame, app, chunks[1]),
        Screen::Reader => match app.session() {
            Some(session) => frame.render_widget(ReaderWidget::new(session, &app.theme), chunks[1]),
            None => render_tree_screen(frame, app, chunks[1]),
        },
    }

    render_status_bar(frame, app, chunks[2]);
}

/// Tree on the left, the selected fragment's full text on the right
fn render_tree_screen(frame: &mut Frame, app: &App, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
        .split(area);

    // Camera works in the block's inner area
    let inner_width = columns[0].width.saturating_sub(2);
    let inner_height = columns[0].height.saturating_sub(2);
    let camera = app.camera(inner_width, inner_height);

    let title = match app.session() {
        Some(session) => format!(
            " {} [arrows pan, Tab select, Enter read from here] ",
            session.story().title()
        ),
        None => " Story Tree ".to_string(),
    };
    let tree = TreeViewWidget::new(app.layout(), camera, &app.theme)
        .title(&title)
        .focused(app.screen == Screen::Tree);
    frame.render_widget(tree, columns[0]);

    if let Some(fragment) = app.selected_fragment() {
        let choices = fragment.choices.iter().map(|c| c.text.as_str()).collect();
        let preview = FragmentPreviewWidget::new(fragment.story_text(), choices, &app.theme);
        frame.render_widget(preview, columns[1]);
    }
}

fn render_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let user = app.user_name().unwrap_or("guest");
    let line = Line::from(vec![
        Span::styled(" Adventure ", app.theme.title_style()),
        Span::styled(format!("| {user} "), app.theme.text_style()),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let hint = match app.screen {
        Screen::Library => "u: refresh user  Esc: quit",
        Screen::Tree => "Esc: library",
        Screen::Reader => "1-9: choose  b: back  r: restart  Esc: tree",
    };
    let text = app.status().unwrap_or(hint);
    let line = Line::from(Span::styled(format!(" {text}"), app.theme.system_style()));
    frame.render_widget(Paragraph::new(line), area);
}
