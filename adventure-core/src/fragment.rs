//! Story fragments: the individual narrative units of a story.

use serde::{Deserialize, Serialize};

use crate::id::{FragmentId, StoryId};

/// A choice offered at the end of a fragment, leading to another fragment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    /// Text shown to the reader.
    pub text: String,
    /// Fragment this choice leads to.
    pub target: FragmentId,
}

/// One node of a branching story.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryFragment {
    pub id: FragmentId,
    pub story_id: StoryId,
    pub story_text: String,
    #[serde(default)]
    pub choices: Vec<Choice>,
}

impl StoryFragment {
    /// Create a fragment with a fresh id and no choices.
    pub fn new(story_id: StoryId, story_text: impl Into<String>) -> Self {
        Self {
            id: FragmentId::new(),
            story_id,
            story_text: story_text.into(),
            choices: Vec::new(),
        }
    }

    /// Add a choice leading to `target`.
    pub fn with_choice(mut self, text: impl Into<String>, target: FragmentId) -> Self {
        self.choices.push(Choice {
            text: text.into(),
            target,
        });
        self
    }

    pub fn story_text(&self) -> &str {
        &self.story_text
    }

    pub fn set_story_text(&mut self, text: impl Into<String>) {
        self.story_text = text.into();
    }

    /// Fragments reachable in one step from this one, in choice order.
    pub fn targets(&self) -> impl Iterator<Item = FragmentId> + '_ {
        self.choices.iter().map(|c| c.target)
    }

    /// True when the fragment has no way forward.
    pub fn is_ending(&self) -> bool {
        self.choices.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fragment_choices() {
        let story = StoryId::new();
        let left = StoryFragment::new(story, "You go left.");
        let right = StoryFragment::new(story, "You go right.");
        let start = StoryFragment::new(story, "A fork in the road.")
            .with_choice("Go left", left.id)
            .with_choice("Go right", right.id);

        assert_eq!(start.targets().collect::<Vec<_>>(), vec![left.id, right.id]);
        assert!(!start.is_ending());
        assert!(left.is_ending());
    }

    #[test]
    fn test_set_story_text() {
        let mut fragment = StoryFragment::new(StoryId::new(), "Draft");
        fragment.set_story_text("Final text");
        assert_eq!(fragment.story_text(), "Final text");
    }
}
