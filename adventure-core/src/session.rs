//! ReadingSession - playing through a story one fragment at a time.
//!
//! Wraps a story, its fragments, and the reader's path through them. The
//! session starts at the head fragment and follows choices; it can step back
//! and restart.

use crate::fragment::{Choice, StoryFragment};
use crate::id::FragmentId;
use crate::persist::{self, PersistError};
use crate::story::Story;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Errors from ReadingSession operations.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Story '{0}' has no fragments to read")]
    EmptyStory(String),

    #[error("Fragment {0} is part of the story but was not loaded")]
    MissingFragment(FragmentId),

    #[error("No choice {index}: this fragment offers {available}")]
    NoSuchChoice { index: usize, available: usize },

    #[error("Persistence error: {0}")]
    Persist(#[from] PersistError),
}

/// A reader's progress through one story.
#[derive(Debug, Clone)]
pub struct ReadingSession {
    story: Story,
    fragments: HashMap<FragmentId, StoryFragment>,
    head: FragmentId,
    steps: Vec<FragmentId>,
}

impl ReadingSession {
    /// Start reading at the story's head fragment.
    pub fn new(story: Story, fragments: Vec<StoryFragment>) -> Result<Self, SessionError> {
        let head = story
            .head_fragment_id()
            .ok_or_else(|| SessionError::EmptyStory(story.title().to_string()))?;

        let fragments: HashMap<FragmentId, StoryFragment> = fragments
            .into_iter()
            .filter(|f| story.contains_fragment(f.id))
            .map(|f| (f.id, f))
            .collect();

        if !fragments.contains_key(&head) {
            return Err(SessionError::MissingFragment(head));
        }

        Ok(Self {
            story,
            fragments,
            head,
            steps: Vec::new(),
        })
    }

    /// Load a story file and start reading it.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, SessionError> {
        let (story, fragments) = persist::load_story(path).await?;
        Self::new(story, fragments)
    }

    pub fn story(&self) -> &Story {
        &self.story
    }

    /// All loaded fragments, in no particular order.
    pub fn fragments(&self) -> impl Iterator<Item = &StoryFragment> {
        self.fragments.values()
    }

    pub fn fragment(&self, id: FragmentId) -> Option<&StoryFragment> {
        self.fragments.get(&id)
    }

    /// The fragment currently being read.
    pub fn current(&self) -> &StoryFragment {
        // only loaded fragment ids are ever stepped into
        let id = self.steps.last().copied().unwrap_or(self.head);
        &self.fragments[&id]
    }

    pub fn choices(&self) -> &[Choice] {
        &self.current().choices
    }

    /// True when the current fragment has no choices left.
    pub fn is_finished(&self) -> bool {
        self.current().is_ending()
    }

    /// Fragments visited so far, starting with the head.
    pub fn path(&self) -> Vec<FragmentId> {
        std::iter::once(self.head)
            .chain(self.steps.iter().copied())
            .collect()
    }

    /// Follow choice `index` (zero-based) from the current fragment.
    pub fn choose(&mut self, index: usize) -> Result<&StoryFragment, SessionError> {
        let choices = self.choices();
        let choice = choices.get(index).ok_or(SessionError::NoSuchChoice {
            index,
            available: choices.len(),
        })?;
        let target = choice.target;

        if !self.fragments.contains_key(&target) {
            return Err(SessionError::MissingFragment(target));
        }

        debug!(from = %self.current().id, to = %target, "followed choice");
        self.steps.push(target);
        Ok(self.current())
    }

    /// Continue reading from any loaded fragment, as if a choice led there.
    ///
    /// The fragment is added to the path so [`ReadingSession::back`] returns
    /// to where the reader was. Jumping to the current fragment is a no-op.
    pub fn jump_to(&mut self, fragment_id: FragmentId) -> Result<&StoryFragment, SessionError> {
        if !self.fragments.contains_key(&fragment_id) {
            return Err(SessionError::MissingFragment(fragment_id));
        }

        if self.current().id != fragment_id {
            debug!(from = %self.current().id, to = %fragment_id, "jumped to fragment");
            self.steps.push(fragment_id);
        }
        Ok(self.current())
    }

    /// Step back to the previous fragment. Returns false at the head.
    pub fn back(&mut self) -> bool {
        self.steps.pop().is_some()
    }

    /// Return to the head fragment.
    pub fn restart(&mut self) {
        self.steps.clear();
    }

    /// Hand back the story and fragments, e.g. for saving.
    pub fn into_parts(self) -> (Story, Vec<StoryFragment>) {
        (self.story, self.fragments.into_values().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::sample_story;

    fn session() -> ReadingSession {
        let (story, fragments) = sample_story();
        ReadingSession::new(story, fragments).unwrap()
    }

    #[test]
    fn test_starts_at_head() {
        let session = session();
        assert_eq!(Some(session.current().id), session.story().head_fragment_id());
        assert_eq!(session.choices().len(), 2);
        assert!(!session.is_finished());
    }

    #[test]
    fn test_choose_and_finish() {
        let mut session = session();

        let door = session.choose(0).unwrap();
        assert_eq!(door.story_text(), "The door is locked.");

        session.choose(0).unwrap();
        assert!(session.is_finished());
        assert_eq!(session.path().len(), 3);
    }

    #[test]
    fn test_invalid_choice() {
        let mut session = session();
        assert!(matches!(
            session.choose(5),
            Err(SessionError::NoSuchChoice {
                index: 5,
                available: 2
            })
        ));
        assert_eq!(session.path().len(), 1);
    }

    #[test]
    fn test_back_and_restart() {
        let mut session = session();
        assert!(!session.back());

        session.choose(1).unwrap();
        session.choose(0).unwrap();
        assert!(session.back());
        assert_eq!(session.current().story_text(), "You drop into an overgrown garden.");

        session.restart();
        assert_eq!(session.path().len(), 1);
    }

    #[test]
    fn test_jump_to_records_path() {
        let (story, fragments) = sample_story();
        let garden = fragments[2].id;
        let mut session = ReadingSession::new(story, fragments).unwrap();

        let current = session.jump_to(garden).unwrap();
        assert_eq!(current.story_text(), "You drop into an overgrown garden.");
        assert_eq!(session.path().len(), 2);

        session.jump_to(garden).unwrap();
        assert_eq!(session.path().len(), 2);

        assert!(session.back());
        assert_eq!(Some(session.current().id), session.story().head_fragment_id());
    }

    #[test]
    fn test_jump_to_unloaded_fragment() {
        let mut session = session();
        assert!(matches!(
            session.jump_to(FragmentId::new()),
            Err(SessionError::MissingFragment(_))
        ));
        assert_eq!(session.path().len(), 1);
    }

    #[test]
    fn test_empty_story_cannot_be_read() {
        let story = Story::create("Ann", "Blank", "");
        assert!(matches!(
            ReadingSession::new(story, vec![]),
            Err(SessionError::EmptyStory(_))
        ));
    }

    #[test]
    fn test_missing_head_fragment() {
        let (story, mut fragments) = sample_story();
        fragments.remove(0);
        assert!(matches!(
            ReadingSession::new(story, fragments),
            Err(SessionError::MissingFragment(_))
        ));
    }

    #[test]
    fn test_choice_into_unloaded_fragment() {
        let (story, mut fragments) = sample_story();
        // drop the hallway; the door's only choice leads there
        fragments.pop();
        let mut session = ReadingSession::new(story, fragments).unwrap();
        session.choose(0).unwrap();
        assert!(matches!(
            session.choose(0),
            Err(SessionError::MissingFragment(_))
        ));
        assert_eq!(session.path().len(), 2);
    }
}
