//! Story library persistence.
//!
//! Each story is stored as one JSON file holding the story record, its
//! fragments and a small metadata block that can be read without loading
//! the rest.

use crate::fragment::StoryFragment;
use crate::story::{format_timestamp, Story, StoryError, StoryRecord};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tracing::{debug, warn};

/// Errors from persistence operations.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid story: {0}")]
    Story(#[from] StoryError),

    #[error("Version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u32, found: u32 },
}

/// Current story file version.
const SAVE_VERSION: u32 = 1;

/// A story with its fragments, as written to disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedStory {
    /// Save format version for compatibility checking.
    pub version: u32,

    /// When the file was written, in seconds since the epoch.
    pub saved_at: i64,

    pub story: StoryRecord,

    pub fragments: Vec<StoryFragment>,

    pub metadata: StoryMetadata,
}

/// Summary of a saved story for list screens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoryMetadata {
    pub id: String,
    pub title: String,
    pub author: String,
    pub synopsis: String,
    pub timestamp: i64,
    pub tags: Vec<String>,
    pub fragment_count: usize,
}

impl StoryMetadata {
    /// Last update as `M/D/YYYY` in the local time zone.
    pub fn formatted_timestamp(&self) -> String {
        format_timestamp(self.timestamp, &chrono::Local)
    }
}

impl SavedStory {
    pub fn new(story: &Story, fragments: Vec<StoryFragment>) -> Self {
        let metadata = StoryMetadata {
            id: story.id().to_string(),
            title: story.title().to_string(),
            author: story.author().to_string(),
            synopsis: story.synopsis().to_string(),
            timestamp: story.timestamp(),
            tags: story.tags().iter().cloned().collect(),
            fragment_count: story.fragment_ids().len(),
        };

        Self {
            version: SAVE_VERSION,
            saved_at: chrono::Utc::now().timestamp(),
            story: story.to_record(),
            fragments,
            metadata,
        }
    }

    /// Rebuild the story and hand back its fragments.
    pub fn into_parts(self) -> Result<(Story, Vec<StoryFragment>), PersistError> {
        let story = Story::from_record(self.story)?;

        let (fragments, strays): (Vec<_>, Vec<_>) = self
            .fragments
            .into_iter()
            .partition(|f| story.contains_fragment(f.id));
        if !strays.is_empty() {
            warn!(
                story = %story.id(),
                dropped = strays.len(),
                "saved fragments not listed in story"
            );
        }

        Ok((story, fragments))
    }

    /// Save to a JSON file.
    pub async fn save_json(&self, path: impl AsRef<Path>) -> Result<(), PersistError> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path.as_ref(), content).await?;
        debug!(path = %path.as_ref().display(), title = %self.metadata.title, "story saved");
        Ok(())
    }

    /// Load from a JSON file.
    pub async fn load_json(path: impl AsRef<Path>) -> Result<Self, PersistError> {
        let content = fs::read_to_string(path).await?;
        let saved: Self = serde_json::from_str(&content)?;

        if saved.version != SAVE_VERSION {
            return Err(PersistError::VersionMismatch {
                expected: SAVE_VERSION,
                found: saved.version,
            });
        }

        Ok(saved)
    }

    /// Read only the metadata block of a story file.
    pub async fn peek_metadata(path: impl AsRef<Path>) -> Result<StoryMetadata, PersistError> {
        let content = fs::read_to_string(path).await?;

        #[derive(Deserialize)]
        struct Partial {
            version: u32,
            metadata: StoryMetadata,
        }

        let partial: Partial = serde_json::from_str(&content)?;

        if partial.version != SAVE_VERSION {
            return Err(PersistError::VersionMismatch {
                expected: SAVE_VERSION,
                found: partial.version,
            });
        }

        Ok(partial.metadata)
    }
}

/// A story file found in the library.
#[derive(Debug, Clone)]
pub struct StoryInfo {
    pub path: PathBuf,
    pub metadata: StoryMetadata,
}

/// List all story files in a directory, sorted by title.
///
/// The directory is created if it does not exist. Files that fail to parse
/// are skipped.
pub async fn list_stories(dir: impl AsRef<Path>) -> Result<Vec<StoryInfo>, PersistError> {
    let mut stories = Vec::new();

    let dir_path = dir.as_ref();
    if !dir_path.exists() {
        fs::create_dir_all(dir_path).await?;
        return Ok(stories);
    }

    let mut entries = fs::read_dir(dir_path).await?;

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.extension().map(|e| e == "json").unwrap_or(false) {
            match SavedStory::peek_metadata(&path).await {
                Ok(metadata) => stories.push(StoryInfo { path, metadata }),
                Err(e) => warn!(path = %path.display(), error = %e, "skipping unreadable story"),
            }
        }
    }

    stories.sort_by(|a, b| {
        a.metadata
            .title
            .to_lowercase()
            .cmp(&b.metadata.title.to_lowercase())
    });
    Ok(stories)
}

/// Save a story into the library directory, creating it if needed.
///
/// Files saved for the same story under an earlier title are removed, so the
/// library holds one file per story id.
pub async fn save_story(
    dir: impl AsRef<Path>,
    story: &Story,
    fragments: Vec<StoryFragment>,
) -> Result<PathBuf, PersistError> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir).await?;
    let path = story_save_path(dir, story);
    SavedStory::new(story, fragments).save_json(&path).await?;

    let suffix = format!("_{}.json", story.id());
    let mut entries = fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let stale = entry.path();
        let same_story = stale
            .file_name()
            .map(|name| name.to_string_lossy().ends_with(&suffix))
            .unwrap_or(false);
        if same_story && stale != path {
            fs::remove_file(&stale).await?;
            debug!(path = %stale.display(), "removed file from earlier title");
        }
    }

    Ok(path)
}

/// Load a story and its fragments from a file.
pub async fn load_story(
    path: impl AsRef<Path>,
) -> Result<(Story, Vec<StoryFragment>), PersistError> {
    SavedStory::load_json(path).await?.into_parts()
}

/// File name for a story: the sanitized title followed by the story id.
pub fn story_save_path(dir: impl AsRef<Path>, story: &Story) -> PathBuf {
    let sanitized = story
        .title()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect::<String>();
    dir.as_ref().join(format!("{sanitized}_{}.json", story.id()))
}
