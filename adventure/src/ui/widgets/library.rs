//! Story list widget

use adventure_core::persist::StoryInfo;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, StatefulWidget, Widget},
};

use crate::ui::theme::AdventureTheme;

/// Widget listing the stories in the library
pub struct LibraryWidget<'a> {
    stories: &'a [StoryInfo],
    selected: usize,
    theme: &'a AdventureTheme,
}

impl<'a> LibraryWidget<'a> {
    pub fn new(stories: &'a [StoryInfo], selected: usize, theme: &'a AdventureTheme) -> Self {
        Self {
            stories,
            selected,
            theme,
        }
    }

    fn item(&self, info: &'a StoryInfo) -> ListItem<'a> {
        let meta = &info.metadata;
        let author = if meta.author.is_empty() {
            "anonymous"
        } else {
            meta.author.as_str()
        };

        let mut header = vec![
            Span::styled(meta.title.as_str(), self.theme.title_style()),
            Span::styled(format!("  by {author}"), self.theme.text_style()),
            Span::styled(
                format!("  {}", meta.formatted_timestamp()),
                self.theme.system_style(),
            ),
        ];
        for tag in &meta.tags {
            header.push(Span::styled(format!("  #{tag}"), self.theme.tag_style()));
        }

        let synopsis = Line::from(Span::styled(
            format!("    {}", meta.synopsis),
            self.theme.story_style(),
        ));

        ListItem::new(vec![Line::from(header), synopsis])
    }
}

impl Widget for LibraryWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(" Library [j/k move, Enter open, r reload, q quit] ")
            .borders(Borders::ALL)
            .border_style(self.theme.border_style(true));

        if self.stories.is_empty() {
            let inner = block.inner(area);
            block.render(area, buf);
            Line::from(Span::styled(
                "No stories yet. Run with --demo to add one.",
                self.theme.system_style(),
            ))
            .render(inner, buf);
            return;
        }

        let items: Vec<ListItem> = self.stories.iter().map(|s| self.item(s)).collect();
        let list = List::new(items)
            .block(block)
            .highlight_style(ratatui::style::Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");

        let mut state = ListState::default().with_selected(Some(self.selected));
        StatefulWidget::render(list, area, buf, &mut state);
    }
}
