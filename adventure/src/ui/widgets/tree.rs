//! Tree view widget: draws fragment nodes onto the terminal buffer

use adventure_core::tree_view::{Camera, NodeImage, Paint, Surface, TreeLayout};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    widgets::{Block, Borders, Widget},
};

use crate::ui::theme::AdventureTheme;

/// A [`Surface`] backed by a region of a ratatui buffer.
///
/// Local coordinates are cells relative to the top-left of `area`; anything
/// outside `area` is clipped.
pub struct BufferSurface<'a> {
    buf: &'a mut Buffer,
    area: Rect,
    theme: &'a AdventureTheme,
}

impl<'a> BufferSurface<'a> {
    pub fn new(buf: &'a mut Buffer, area: Rect, theme: &'a AdventureTheme) -> Self {
        Self { buf, area, theme }
    }

    fn put(&mut self, x: i32, y: i32, ch: char, style: Style) {
        if x < 0 || y < 0 || x >= self.area.width as i32 || y >= self.area.height as i32 {
            return;
        }
        let pos = (self.area.x + x as u16, self.area.y + y as u16);
        if let Some(cell) = self.buf.cell_mut(pos) {
            cell.set_char(ch).set_style(style);
        }
    }
}

impl Surface for BufferSurface<'_> {
    fn draw_image(&mut self, _paint: Paint, image: &NodeImage, x: i32, y: i32) {
        let style = self.theme.node_style(&image.key);
        let (right, bottom) = (image.width - 1, image.height - 1);

        for dy in 0..image.height {
            for dx in 0..image.width {
                let ch = match (dx, dy) {
                    (0, 0) => '┌',
                    (dx, 0) if dx == right => '┐',
                    (0, dy) if dy == bottom => '└',
                    (dx, dy) if dx == right && dy == bottom => '┘',
                    (_, 0) => '─',
                    (_, dy) if dy == bottom => '─',
                    (0, _) => '│',
                    (dx, _) if dx == right => '│',
                    _ => ' ',
                };
                self.put(x + dx, y + dy, ch, style);
            }
        }
    }

    fn draw_text(&mut self, paint: Paint, text: &str, x: i32, y: i32) {
        let width = text.chars().count() as i32;
        let start = match paint {
            Paint::CenteredText => x - width / 2,
            Paint::Background => x,
        };
        let style = self.theme.node_text_style();
        for (i, ch) in text.chars().enumerate() {
            self.put(start + i as i32, y, ch, style);
        }
    }
}

/// Widget drawing a laid-out story tree through a camera.
pub struct TreeViewWidget<'a> {
    layout: &'a TreeLayout,
    camera: Camera,
    theme: &'a AdventureTheme,
    title: &'a str,
    focused: bool,
}

impl<'a> TreeViewWidget<'a> {
    pub fn new(layout: &'a TreeLayout, camera: Camera, theme: &'a AdventureTheme) -> Self {
        Self {
            layout,
            camera,
            theme,
            title: " Story Tree ",
            focused: true,
        }
    }

    pub fn title(mut self, title: &'a str) -> Self {
        self.title = title;
        self
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }
}

impl Widget for TreeViewWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(self.title)
            .borders(Borders::ALL)
            .border_style(self.theme.border_style(self.focused));

        let inner = block.inner(area);
        block.render(area, buf);

        let mut surface = BufferSurface::new(buf, inner, self.theme);
        self.layout.draw(&mut surface, &self.camera);
    }
}
