//! Reader widget: the current fragment and its choices

use adventure_core::ReadingSession;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

use crate::ui::theme::AdventureTheme;

/// Widget showing a reading session's current fragment
pub struct ReaderWidget<'a> {
    session: &'a ReadingSession,
    theme: &'a AdventureTheme,
}

impl<'a> ReaderWidget<'a> {
    pub fn new(session: &'a ReadingSession, theme: &'a AdventureTheme) -> Self {
        Self { session, theme }
    }
}

impl Widget for ReaderWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let title = format!(" {} ", self.session.story().title());
        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(self.theme.border_style(true));

        let fragment = self.session.current();
        let mut lines: Vec<Line> = fragment
            .story_text()
            .lines()
            .map(|l| Line::from(Span::styled(l.to_string(), self.theme.story_style())))
            .collect();
        lines.push(Line::from(""));

        if fragment.is_ending() {
            lines.push(Line::from(Span::styled(
                "[ The End. b to go back, r to restart ]",
                self.theme.system_style(),
            )));
        } else {
            for (i, choice) in fragment.choices.iter().enumerate() {
                lines.push(Line::from(Span::styled(
                    format!("{}. {}", i + 1, choice.text),
                    self.theme.choice_style(),
                )));
            }
        }

        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false })
            .render(area, buf);
    }
}

/// Full text of one fragment, for the tree view's side panel
pub struct FragmentPreviewWidget<'a> {
    text: &'a str,
    choices: Vec<&'a str>,
    theme: &'a AdventureTheme,
}

impl<'a> FragmentPreviewWidget<'a> {
    pub fn new(text: &'a str, choices: Vec<&'a str>, theme: &'a AdventureTheme) -> Self {
        Self {
            text,
            choices,
            theme,
        }
    }
}

impl Widget for FragmentPreviewWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(" Fragment ")
            .borders(Borders::ALL)
            .border_style(self.theme.border_style(false));

        let mut lines = vec![
            Line::from(Span::styled(self.text, self.theme.story_style())),
            Line::from(""),
        ];
        for choice in self.choices {
            lines.push(Line::from(Span::styled(
                format!("-> {choice}"),
                self.theme.choice_style(),
            )));
        }

        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: true })
            .render(area, buf);
    }
}
