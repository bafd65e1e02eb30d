//! Color theme and styling for the adventure TUI

use ratatui::style::{Color, Modifier, Style};

/// Reader UI color theme
#[derive(Debug, Clone)]
pub struct AdventureTheme {
    // Base colors
    pub foreground: Color,
    pub border: Color,
    pub border_focused: Color,

    // Tree view
    pub node: Color,
    pub node_selected: Color,
    pub node_text: Color,

    // Text colors
    pub title_text: Color,
    pub story_text: Color,
    pub choice_text: Color,
    pub tag_text: Color,
    pub system_text: Color,
}

impl Default for AdventureTheme {
    fn default() -> Self {
        Self {
            foreground: Color::White,
            border: Color::DarkGray,
            border_focused: Color::Cyan,

            node: Color::Gray,
            node_selected: Color::Yellow,
            node_text: Color::White,

            title_text: Color::LightCyan,
            story_text: Color::White,
            choice_text: Color::LightGreen,
            tag_text: Color::Magenta,
            system_text: Color::DarkGray,
        }
    }
}

impl AdventureTheme {
    pub fn text_style(&self) -> Style {
        Style::default().fg(self.foreground)
    }

    pub fn title_style(&self) -> Style {
        Style::default()
            .fg(self.title_text)
            .add_modifier(Modifier::BOLD)
    }

    pub fn story_style(&self) -> Style {
        Style::default().fg(self.story_text)
    }

    pub fn choice_style(&self) -> Style {
        Style::default().fg(self.choice_text)
    }

    pub fn tag_style(&self) -> Style {
        Style::default()
            .fg(self.tag_text)
            .add_modifier(Modifier::ITALIC)
    }

    /// Get style for system messages
    pub fn system_style(&self) -> Style {
        Style::default()
            .fg(self.system_text)
            .add_modifier(Modifier::DIM)
    }

    /// Style for a node background, keyed by its image name
    pub fn node_style(&self, image_key: &str) -> Style {
        if image_key.contains("selected") {
            Style::default()
                .fg(self.node_selected)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(self.node)
        }
    }

    pub fn node_text_style(&self) -> Style {
        Style::default().fg(self.node_text)
    }

    /// Get border style
    pub fn border_style(&self, focused: bool) -> Style {
        Style::default().fg(if focused {
            self.border_focused
        } else {
            self.border
        })
    }
}
