//! Drawing primitives shared by the tree view.

use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle in world coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Region {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Region {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Check if a world point falls inside this region.
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.x + self.width && y >= self.y && y < self.y + self.height
    }

    pub fn center(&self) -> (i32, i32) {
        (self.x + self.width / 2, self.y + self.height / 2)
    }
}

/// How a primitive should be painted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Paint {
    /// Plain image blit.
    Background,
    /// Text centred horizontally on its anchor.
    CenteredText,
}

/// A background image handle. The surface decides what the key looks like.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeImage {
    pub key: String,
    pub width: i32,
    pub height: i32,
}

impl NodeImage {
    pub fn new(key: impl Into<String>, width: i32, height: i32) -> Self {
        Self {
            key: key.into(),
            width,
            height,
        }
    }
}

/// Something the tree view can be drawn onto.
pub trait Surface {
    /// Draw `image` with its top-left corner at local (x, y).
    fn draw_image(&mut self, paint: Paint, image: &NodeImage, x: i32, y: i32);

    /// Draw `text` anchored at local (x, y).
    fn draw_text(&mut self, paint: Paint, text: &str, x: i32, y: i32);
}

/// A viewport onto world space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Camera {
    /// World coordinate shown at the surface's origin.
    pub x: i32,
    pub y: i32,
}

impl Camera {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn pan(&mut self, dx: i32, dy: i32) {
        self.x += dx;
        self.y += dy;
    }

    /// Move so that `region` sits in the middle of a `width` x `height` view.
    pub fn center_on(&mut self, region: &Region, width: i32, height: i32) {
        let (cx, cy) = region.center();
        self.x = cx - width / 2;
        self.y = cy - height / 2;
    }

    /// Translate a world point into surface coordinates.
    pub fn to_local(&self, x: i32, y: i32) -> (i32, i32) {
        (x - self.x, y - self.y)
    }

    pub fn draw_local_image<S: Surface + ?Sized>(
        &self,
        surface: &mut S,
        paint: Paint,
        image: &NodeImage,
        x: i32,
        y: i32,
    ) {
        let (lx, ly) = self.to_local(x, y);
        surface.draw_image(paint, image, lx, ly);
    }

    pub fn draw_local_text<S: Surface + ?Sized>(
        &self,
        surface: &mut S,
        paint: Paint,
        text: &str,
        x: i32,
        y: i32,
    ) {
        let (lx, ly) = self.to_local(x, y);
        surface.draw_text(paint, text, lx, ly);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_contains() {
        let region = Region::new(10, 10, 20, 6);
        assert!(region.contains(10, 10));
        assert!(region.contains(29, 15));
        assert!(!region.contains(30, 15));
        assert!(!region.contains(9, 12));
        assert_eq!(region.center(), (20, 13));
    }

    #[test]
    fn test_camera_translation() {
        let mut camera = Camera::new(5, -3);
        assert_eq!(camera.to_local(10, 10), (5, 13));

        camera.pan(-5, 3);
        assert_eq!(camera.to_local(10, 10), (10, 10));
    }

    #[test]
    fn test_center_on() {
        let mut camera = Camera::default();
        camera.center_on(&Region::new(100, 50, 20, 10), 80, 24);
        assert_eq!(camera.to_local(110, 55), (40, 12));
    }
}
