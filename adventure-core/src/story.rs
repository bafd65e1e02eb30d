//! The Story aggregate.
//!
//! A story owns the set of fragment ids that make it up, a designated head
//! fragment where reading starts, and its descriptive metadata. Whenever the
//! membership set is non-empty the head is one of its members.

use chrono::{Datelike, Local, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;
use tracing::{debug, warn};

use crate::id::{FragmentId, StoryId};
use crate::thumbnail::Thumbnail;

/// Tag given to every freshly created story.
pub const NEW_TAG: &str = "new";

/// Title used when a story is created without one.
pub const UNTITLED: &str = "Untitled";

/// Errors from building a story out of persisted fields.
#[derive(Debug, Error)]
pub enum StoryError {
    #[error("Invalid {field} identifier '{value}': {source}")]
    InvalidId {
        field: &'static str,
        value: String,
        #[source]
        source: uuid::Error,
    },

    #[error("Story {0} has fragments but no head fragment")]
    MissingHead(String),
}

/// A branching choose-your-own-adventure story.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Story {
    id: StoryId,
    head_fragment_id: Option<FragmentId>,
    timestamp: i64,
    author: String,
    title: String,
    synopsis: String,
    thumbnail: Option<Thumbnail>,
    tags: BTreeSet<String>,
    fragment_ids: BTreeSet<FragmentId>,
}

impl Story {
    /// Create a brand new story with a random id, tagged `"new"`.
    pub fn create(
        author: impl Into<String>,
        title: impl Into<String>,
        synopsis: impl Into<String>,
    ) -> Self {
        let mut tags = BTreeSet::new();
        tags.insert(NEW_TAG.to_string());

        Self {
            id: StoryId::new(),
            head_fragment_id: None,
            timestamp: now_secs(),
            author: author.into(),
            title: title.into(),
            synopsis: synopsis.into(),
            thumbnail: None,
            tags,
            fragment_ids: BTreeSet::new(),
        }
    }

    /// Create an empty story titled "Untitled".
    pub fn untitled() -> Self {
        Self::create("", UNTITLED, "")
    }

    /// Restore a previously persisted story.
    ///
    /// The membership set starts out containing exactly the head fragment;
    /// tags start empty.
    pub fn reconstruct(
        head_fragment_id: FragmentId,
        id: StoryId,
        author: impl Into<String>,
        timestamp: i64,
        synopsis: impl Into<String>,
        thumbnail: Option<Thumbnail>,
        title: impl Into<String>,
    ) -> Self {
        let mut fragment_ids = BTreeSet::new();
        fragment_ids.insert(head_fragment_id);

        Self {
            id,
            head_fragment_id: Some(head_fragment_id),
            timestamp,
            author: author.into(),
            title: title.into(),
            synopsis: synopsis.into(),
            thumbnail,
            tags: BTreeSet::new(),
            fragment_ids,
        }
    }

    /// [`Story::reconstruct`] from the string form of the identifiers.
    pub fn parse_persisted(
        head_fragment_id: &str,
        id: &str,
        author: impl Into<String>,
        timestamp: i64,
        synopsis: impl Into<String>,
        thumbnail: Option<Thumbnail>,
        title: impl Into<String>,
    ) -> Result<Self, StoryError> {
        let head = parse_id("head fragment", head_fragment_id)?;
        let id = parse_id("story", id)?;
        Ok(Self::reconstruct(
            head, id, author, timestamp, synopsis, thumbnail, title,
        ))
    }

    pub fn id(&self) -> StoryId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn synopsis(&self) -> &str {
        &self.synopsis
    }

    pub fn set_synopsis(&mut self, synopsis: impl Into<String>) {
        self.synopsis = synopsis.into();
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn set_author(&mut self, author: impl Into<String>) {
        self.author = author.into();
    }

    pub fn thumbnail(&self) -> Option<&Thumbnail> {
        self.thumbnail.as_ref()
    }

    pub fn set_thumbnail(&mut self, thumbnail: Option<Thumbnail>) {
        self.thumbnail = thumbnail;
    }

    /// The fragment where reading starts, if the story has any fragments.
    pub fn head_fragment_id(&self) -> Option<FragmentId> {
        self.head_fragment_id
    }

    /// Make `fragment_id` the head, adding it to the story if needed.
    pub fn set_head_fragment_id(&mut self, fragment_id: FragmentId) {
        self.head_fragment_id = Some(fragment_id);
        self.add_fragment(fragment_id);
    }

    pub fn fragment_ids(&self) -> &BTreeSet<FragmentId> {
        &self.fragment_ids
    }

    pub fn contains_fragment(&self, fragment_id: FragmentId) -> bool {
        self.fragment_ids.contains(&fragment_id)
    }

    /// Add a fragment to the story. The first fragment added becomes the head.
    pub fn add_fragment(&mut self, fragment_id: FragmentId) {
        if self.fragment_ids.is_empty() {
            self.head_fragment_id = Some(fragment_id);
        }
        self.fragment_ids.insert(fragment_id);
    }

    /// Remove a fragment, returning whether it was part of the story.
    ///
    /// Removing the head hands the role to the smallest remaining fragment id,
    /// or clears the head when nothing is left.
    pub fn remove_fragment(&mut self, fragment_id: FragmentId) -> bool {
        if !self.fragment_ids.remove(&fragment_id) {
            return false;
        }

        if self.head_fragment_id == Some(fragment_id) {
            self.head_fragment_id = self.fragment_ids.first().copied();
            debug!(
                story = %self.id,
                removed = %fragment_id,
                head = ?self.head_fragment_id,
                "head fragment removed, reassigned head"
            );
        }

        true
    }

    pub fn tags(&self) -> &BTreeSet<String> {
        &self.tags
    }

    pub fn add_tag(&mut self, tag: impl Into<String>) {
        self.tags.insert(tag.into());
    }

    pub fn remove_tag(&mut self, tag: &str) {
        self.tags.remove(tag);
    }

    /// Seconds since the Unix epoch of the last update.
    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    pub fn set_timestamp(&mut self, timestamp: i64) {
        self.timestamp = timestamp;
    }

    /// Set the timestamp to the current time.
    pub fn update_timestamp(&mut self) {
        self.timestamp = now_secs();
    }

    /// The timestamp as `M/D/YYYY` in the local time zone.
    pub fn formatted_timestamp(&self) -> String {
        self.formatted_timestamp_in(&Local)
    }

    /// The timestamp as `M/D/YYYY` in the given time zone, without zero padding.
    pub fn formatted_timestamp_in<Tz: TimeZone>(&self, tz: &Tz) -> String {
        format_timestamp(self.timestamp, tz)
    }

    /// Convert to the persisted form, with identifiers as strings.
    pub fn to_record(&self) -> StoryRecord {
        StoryRecord {
            id: self.id.to_string(),
            head_fragment_id: self.head_fragment_id.map(|id| id.to_string()),
            timestamp: self.timestamp,
            author: self.author.clone(),
            title: self.title.clone(),
            synopsis: self.synopsis.clone(),
            thumbnail: self.thumbnail.clone(),
            tags: self.tags.iter().cloned().collect(),
            fragment_ids: self.fragment_ids.iter().map(|id| id.to_string()).collect(),
        }
    }

    /// Rebuild a story from its persisted form.
    pub fn from_record(record: StoryRecord) -> Result<Self, StoryError> {
        let id = parse_id("story", &record.id)?;

        let mut fragment_ids: BTreeSet<FragmentId> = BTreeSet::new();
        for raw in &record.fragment_ids {
            fragment_ids.insert(parse_id("fragment", raw)?);
        }

        let mut story = match record.head_fragment_id.as_deref() {
            Some(head) => Self::reconstruct(
                parse_id("head fragment", head)?,
                id,
                record.author,
                record.timestamp,
                record.synopsis,
                record.thumbnail,
                record.title,
            ),
            None if fragment_ids.is_empty() => Self {
                id,
                head_fragment_id: None,
                timestamp: record.timestamp,
                author: record.author,
                title: record.title,
                synopsis: record.synopsis,
                thumbnail: record.thumbnail,
                tags: BTreeSet::new(),
                fragment_ids: BTreeSet::new(),
            },
            None => return Err(StoryError::MissingHead(record.id)),
        };

        story.fragment_ids.extend(fragment_ids);
        story.tags.extend(record.tags);
        Ok(story)
    }
}

impl Default for Story {
    fn default() -> Self {
        Self::untitled()
    }
}

/// Serialized fields of a story, as stored by the persistence layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryRecord {
    pub id: String,
    pub head_fragment_id: Option<String>,
    pub timestamp: i64,
    pub author: String,
    pub title: String,
    pub synopsis: String,
    #[serde(default)]
    pub thumbnail: Option<Thumbnail>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub fragment_ids: Vec<String>,
}

fn parse_id<T>(field: &'static str, value: &str) -> Result<T, StoryError>
where
    T: std::str::FromStr<Err = uuid::Error>,
{
    value.parse().map_err(|source| StoryError::InvalidId {
        field,
        value: value.to_string(),
        source,
    })
}

/// Render seconds since the epoch as `M/D/YYYY` in `tz`.
///
/// A timestamp outside chrono's supported range renders as the epoch,
/// `1/1/1970` in UTC, and logs a warning.
pub fn format_timestamp<Tz: TimeZone>(timestamp: i64, tz: &Tz) -> String {
    let utc = match Utc.timestamp_opt(timestamp, 0).single() {
        Some(utc) => utc,
        None => {
            warn!(timestamp, "timestamp out of range, formatting as the epoch");
            chrono::DateTime::<Utc>::UNIX_EPOCH
        }
    };
    let date = utc.with_timezone(tz).date_naive();
    format!("{}/{}/{}", date.month(), date.day(), date.year())
}

fn now_secs() -> i64 {
    Utc::now().timestamp()
}
