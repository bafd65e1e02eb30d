//! Testing utilities.
//!
//! This module provides:
//! - `sample_story` for a small branching story with its fragments
//! - `RecordingSurface` for asserting on what the tree view draws
//! - `StaticProfile` re-exported for profile lookups with a fixed answer

use crate::fragment::StoryFragment;
use crate::story::Story;
use crate::tree_view::{NodeImage, Paint, Surface};

pub use crate::account::StaticProfile;

/// A drawing primitive captured by [`RecordingSurface`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawCall {
    Image { key: String, x: i32, y: i32 },
    Text { text: String, x: i32, y: i32 },
}

/// A surface that records draw calls in order instead of drawing.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub calls: Vec<DrawCall>,
}

impl RecordingSurface {
    /// Text drawn so far, in order.
    pub fn texts(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                DrawCall::Text { text, .. } => Some(text.as_str()),
                DrawCall::Image { .. } => None,
            })
            .collect()
    }
}

impl Surface for RecordingSurface {
    fn draw_image(&mut self, _paint: Paint, image: &NodeImage, x: i32, y: i32) {
        self.calls.push(DrawCall::Image {
            key: image.key.clone(),
            x,
            y,
        });
    }

    fn draw_text(&mut self, _paint: Paint, text: &str, x: i32, y: i32) {
        self.calls.push(DrawCall::Text {
            text: text.to_string(),
            x,
            y,
        });
    }
}

/// A four-fragment story. The first fragment returned is the head; two paths
/// lead from it and rejoin in the hallway.
pub fn sample_story() -> (Story, Vec<StoryFragment>) {
    let mut story = Story::create(
        "Ann",
        "The Locked Room",
        "Find a way out before the candle burns down.",
    );
    story.add_tag("mystery");

    let hallway = StoryFragment::new(
        story.id(),
        "The hallway stretches into darkness. You are free, for now.",
    );
    let garden = StoryFragment::new(story.id(), "You drop into an overgrown garden.")
        .with_choice("Climb back inside through the hallway window", hallway.id);
    let door = StoryFragment::new(story.id(), "The door is locked.")
        .with_choice("Force it open", hallway.id);
    let start = StoryFragment::new(
        story.id(),
        "You wake up in a dark room with a single candle.",
    )
    .with_choice("Try the door", door.id)
    .with_choice("Climb out the window", garden.id);

    let fragments = vec![start, door, garden, hallway];
    for fragment in &fragments {
        story.add_fragment(fragment.id);
    }

    (story, fragments)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_story_shape() {
        let (story, fragments) = sample_story();
        assert_eq!(story.head_fragment_id(), Some(fragments[0].id));
        assert_eq!(story.fragment_ids().len(), fragments.len());
        assert!(fragments.iter().all(|f| f.story_id == story.id()));
        assert!(fragments.last().unwrap().is_ending());
    }
}
