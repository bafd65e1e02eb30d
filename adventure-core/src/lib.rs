//! Choose-your-own-adventure story engine.
//!
//! This crate provides:
//! - The `Story` aggregate: identity, fragment membership, head fragment, metadata
//! - Story fragments and the choices linking them
//! - A tree view of fragment nodes with two-line text previews
//! - Lookup of the current user's display name
//! - A JSON story library on disk
//! - Reading sessions that follow choices through a story
//!
//! # Quick Start
//!
//! ```ignore
//! use adventure_core::{Story, StoryFragment, TreeLayout, LineBudget, NodeImages};
//!
//! let mut story = Story::create("Ann", "My Tale", "A tale");
//! let start = StoryFragment::new(story.id(), "You wake up in a dark room.");
//! story.add_fragment(start.id);
//!
//! let layout = TreeLayout::compute(&story, &[start], &NodeImages::default(), LineBudget::default());
//! assert_eq!(layout.nodes()[0].line_one(), "You wake up in a");
//! ```

pub mod account;
pub mod config;
pub mod fragment;
pub mod id;
pub mod persist;
pub mod session;
pub mod story;
pub mod testing;
pub mod thumbnail;
pub mod tree_view;

// Primary public API
pub use account::{EnvProfile, ProfileError, ProfileSource, StaticProfile, UserProfileLookup};
pub use config::{AdventureConfig, ConfigError};
pub use fragment::{Choice, StoryFragment};
pub use id::{FragmentId, StoryId};
pub use persist::{PersistError, SavedStory, StoryInfo, StoryMetadata};
pub use session::{ReadingSession, SessionError};
pub use story::{Story, StoryError, StoryRecord};
pub use thumbnail::Thumbnail;
pub use tree_view::{
    split_preview, Camera, FragmentNode, LineBudget, NodeImage, NodeImages, Paint, Region, Surface,
    TreeLayout,
};
