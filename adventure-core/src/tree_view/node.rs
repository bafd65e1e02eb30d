//! A story fragment drawn as a node of the tree view.

use serde::{Deserialize, Serialize};

use super::camera::{Camera, NodeImage, Paint, Region, Surface};
use crate::fragment::StoryFragment;
use crate::id::FragmentId;

/// Appended to the second line when the text does not fit.
pub const ELLIPSIS: &str = "...";

/// Character budget for the two preview lines of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineBudget {
    pub first_line: usize,
    pub second_line: usize,
}

impl LineBudget {
    pub fn new(first_line: usize, second_line: usize) -> Self {
        Self {
            first_line,
            second_line,
        }
    }
}

impl Default for LineBudget {
    fn default() -> Self {
        Self {
            first_line: 18,
            second_line: 14,
        }
    }
}

/// Take `length` characters from `start`, then back off to the last space in
/// that window so a word is not split. A window with no usable space is
/// returned whole.
fn chop(chars: &[char], length: usize, start: usize) -> &[char] {
    let end = (start + length).min(chars.len());
    let window = &chars[start.min(end)..end];

    match window.iter().rposition(|c| *c == ' ') {
        Some(cut) if cut > 0 => &window[..cut],
        _ => window,
    }
}

fn trimmed(chars: &[char]) -> String {
    chars.iter().collect::<String>().trim().to_string()
}

/// Split narrative text into the two preview lines shown on a node.
///
/// Lengths are counted in characters. Text longer than both budgets combined
/// gets an ellipsis on the second line.
pub fn split_preview(text: &str, budget: LineBudget) -> (String, String) {
    let chars: Vec<char> = text.chars().collect();
    let LineBudget {
        first_line,
        second_line,
    } = budget;

    if chars.len() > first_line + second_line {
        let first = chop(&chars, first_line, 0);
        let second = chop(&chars, second_line, first.len());
        (trimmed(first), format!("{}{ELLIPSIS}", trimmed(second)))
    } else if chars.len() > first_line {
        let first = chop(&chars, first_line, 0);
        (trimmed(first), trimmed(&chars[first.len()..]))
    } else {
        (text.to_string(), String::new())
    }
}

/// The two backgrounds a node switches between.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeImages {
    pub normal: NodeImage,
    pub selected: NodeImage,
}

impl Default for NodeImages {
    fn default() -> Self {
        Self {
            normal: NodeImage::new("fragment_node", 24, 6),
            selected: NodeImage::new("fragment_selected_node", 24, 6),
        }
    }
}

/// A fragment rendered as a box with a two-line preview of its text.
///
/// The node does not own its fragment; call [`FragmentNode::refresh_contents`]
/// with the fragment whenever its text changes.
#[derive(Debug, Clone)]
pub struct FragmentNode {
    fragment_id: FragmentId,
    region: Region,
    images: NodeImages,
    budget: LineBudget,
    selected: bool,
    line_one: String,
    line_two: String,
}

impl FragmentNode {
    /// Create a node at the origin, sized to the normal background.
    pub fn new(fragment: &StoryFragment, images: NodeImages, budget: LineBudget) -> Self {
        let region = Region::new(0, 0, images.normal.width, images.normal.height);
        let mut node = Self {
            fragment_id: fragment.id,
            region,
            images,
            budget,
            selected: false,
            line_one: String::new(),
            line_two: String::new(),
        };
        node.refresh_contents(fragment);
        node
    }

    pub fn fragment_id(&self) -> FragmentId {
        self.fragment_id
    }

    pub fn region(&self) -> Region {
        self.region
    }

    pub fn move_to(&mut self, x: i32, y: i32) {
        self.region.x = x;
        self.region.y = y;
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }

    /// Recompute the preview lines from the fragment's current text.
    pub fn refresh_contents(&mut self, fragment: &StoryFragment) {
        debug_assert_eq!(fragment.id, self.fragment_id);
        let (line_one, line_two) = split_preview(fragment.story_text(), self.budget);
        self.line_one = line_one;
        self.line_two = line_two;
    }

    pub fn line_one(&self) -> &str {
        &self.line_one
    }

    pub fn line_two(&self) -> &str {
        &self.line_two
    }

    fn current_background(&self) -> &NodeImage {
        if self.selected {
            &self.images.selected
        } else {
            &self.images.normal
        }
    }

    /// Draw the background, then both lines centred at one and two thirds of
    /// the node's height.
    pub fn draw<S: Surface + ?Sized>(&self, surface: &mut S, camera: &Camera) {
        let Region {
            x,
            y,
            width,
            height,
        } = self.region;

        camera.draw_local_image(surface, Paint::Background, self.current_background(), x, y);
        camera.draw_local_text(
            surface,
            Paint::CenteredText,
            &self.line_one,
            x + width / 2,
            y + height / 3,
        );
        camera.draw_local_text(
            surface,
            Paint::CenteredText,
            &self.line_two,
            x + width / 2,
            y + height * 2 / 3,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::StoryId;
    use crate::testing::{DrawCall, RecordingSurface};

    fn split(text: &str) -> (String, String) {
        split_preview(text, LineBudget::default())
    }

    #[test]
    fn test_short_text_fits_first_line() {
        for text in ["", "A short tale", "The cave is dark", "exactly 18 chars!!"] {
            let (one, two) = split(text);
            assert_eq!(one, text);
            assert_eq!(two, "");
        }
    }

    #[test]
    fn test_medium_text_wraps_onto_second_line() {
        let (one, two) = split("You wake up in a dark room.");
        assert_eq!(one, "You wake up in a");
        assert_eq!(two, "dark room.");
    }

    #[test]
    fn test_medium_text_reconstructs_original() {
        let samples = [
            "You wake up in a dark room.",
            "Nineteen characters",
            "The door creaks open slowly",
            "Onewordthatiswaytoolong!",
        ];
        for text in samples {
            let (one, two) = split(text);
            assert!(one.chars().count() <= 18, "{one:?}");
            assert!(!two.ends_with(ELLIPSIS));
            let rebuilt: String = format!("{one}{two}").split_whitespace().collect();
            let original: String = text.split_whitespace().collect();
            assert_eq!(rebuilt, original);
        }
    }

    #[test]
    fn test_long_text_gets_ellipsis() {
        let (one, two) = split("The quick brown fox jumps over the lazy dog and keeps running");
        assert_eq!(one, "The quick brown");
        assert_eq!(two, "fox jumps...");
    }

    #[test]
    fn test_long_text_without_spaces_splits_words() {
        let (one, two) = split("Supercalifragilisticexpialidociousandmorewordsherewow");
        assert_eq!(one, "Supercalifragilist");
        assert_eq!(two, "icexpialidocio...");
    }

    #[test]
    fn test_space_at_window_start_is_not_a_cut() {
        let (one, two) = split(" Supercalifragilisticexpialidocious");
        assert_eq!(one, "Supercalifragilis");
        assert_eq!(two, "ticexpialidoci...");
    }

    #[test]
    fn test_counts_characters_not_bytes() {
        let text = "Über café naïve façade résumé";
        let (one, two) = split(text);
        assert_eq!(one, "Über café naïve");
        assert_eq!(two, "façade résumé");
    }

    #[test]
    fn test_custom_budget() {
        let (one, two) = split_preview("one two three four", LineBudget::new(5, 5));
        assert_eq!(one, "one");
        assert_eq!(two, "two...");
    }

    #[test]
    fn test_node_takes_size_from_background() {
        let fragment = StoryFragment::new(StoryId::new(), "Hello");
        let node = FragmentNode::new(&fragment, NodeImages::default(), LineBudget::default());
        assert_eq!(node.region(), Region::new(0, 0, 24, 6));
        assert_eq!(node.fragment_id(), fragment.id);
        assert_eq!(node.line_one(), "Hello");
        assert_eq!(node.line_two(), "");
    }

    #[test]
    fn test_refresh_contents_picks_up_new_text() {
        let mut fragment = StoryFragment::new(StoryId::new(), "Hello");
        let mut node = FragmentNode::new(&fragment, NodeImages::default(), LineBudget::default());

        fragment.set_story_text("You wake up in a dark room.");
        assert_eq!(node.line_one(), "Hello");

        node.refresh_contents(&fragment);
        assert_eq!(node.line_one(), "You wake up in a");
        assert_eq!(node.line_two(), "dark room.");
    }

    #[test]
    fn test_draw_positions() {
        let fragment = StoryFragment::new(StoryId::new(), "You wake up in a dark room.");
        let mut node = FragmentNode::new(&fragment, NodeImages::default(), LineBudget::default());
        node.move_to(30, 12);

        let mut surface = RecordingSurface::default();
        node.draw(&mut surface, &Camera::new(10, 2));

        assert_eq!(
            surface.calls,
            vec![
                DrawCall::Image {
                    key: "fragment_node".to_string(),
                    x: 20,
                    y: 10,
                },
                DrawCall::Text {
                    text: "You wake up in a".to_string(),
                    x: 32,
                    y: 12,
                },
                DrawCall::Text {
                    text: "dark room.".to_string(),
                    x: 32,
                    y: 14,
                },
            ]
        );
    }

    #[test]
    fn test_selection_switches_background_only() {
        let fragment = StoryFragment::new(StoryId::new(), "Hello");
        let mut node = FragmentNode::new(&fragment, NodeImages::default(), LineBudget::default());

        node.set_selected(true);
        assert!(node.is_selected());

        let mut surface = RecordingSurface::default();
        node.draw(&mut surface, &Camera::default());

        assert!(matches!(
            &surface.calls[0],
            DrawCall::Image { key, .. } if key == "fragment_selected_node"
        ));
        assert!(matches!(
            &surface.calls[1],
            DrawCall::Text { text, .. } if text == "Hello"
        ));
    }
}
