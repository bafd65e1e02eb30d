//! Visual tree of a story's fragments.
//!
//! ```text
//!   world space            Camera              Surface
//!  ┌──────────────┐   draw_local_image   ┌──────────────────┐
//!  │ FragmentNode │ ───────────────────▶ │ terminal / image │
//!  │ (Region)     │   draw_local_text    │ backend          │
//!  └──────────────┘                      └──────────────────┘
//! ```
//!
//! Nodes live in world coordinates. The [`Camera`] translates them into the
//! surface's local coordinates, so panning never touches node positions.

mod camera;
mod layout;
mod node;

pub use camera::{Camera, NodeImage, Paint, Region, Surface};
pub use layout::{TreeLayout, COLUMN_GAP, ROW_GAP};
pub use node::{split_preview, FragmentNode, LineBudget, NodeImages, ELLIPSIS};
