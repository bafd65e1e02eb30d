//! TUI widgets for the adventure reader

pub mod library;
pub mod reader;
pub mod tree;

pub use library::LibraryWidget;
pub use reader::{FragmentPreviewWidget, ReaderWidget};
pub use tree::TreeViewWidget;
