//! SVG processing for server resources.
//!
//! This crate provides the vector-image side of the resource system:
//!
//! - **XML tree**: an ordered element tree for parsing and re-serializing SVG
//! - **Recoloring**: deterministic conversion of light-skin icons to the dark
//!   skin, driven by a configurable [`RecolorPalette`]
//! - **Themed images**: per-image caching of the materialization for the
//!   current [`ColorScheme`]
//! - **Composition**: placing several icons on one square canvas
//!
//! # Example
//!
//! ```
//! use server_resources_svg::prelude::*;
//!
//! let icon = VectorImage::from_text(
//!     "icons/open.svg",
//!     r##"<svg width="16" height="16"><g><path fill="#212121" d="M0 0h16v16H0z"/></g></svg>"##,
//! );
//! let dark = recolor(&icon, None, &RecolorPalette::default());
//! assert!(dark.text().contains(r##"fill="#d6d6d6""##));
//! ```

pub mod compose;
pub mod geometry;
pub mod image;
pub mod palette;
pub mod recolor;
pub mod themed;
pub mod xml;

mod error;

pub use compose::{CompositionDescriptor, Placement, PlacementTransform, VectorImageProvider, compose};
pub use error::{Result, SvgError};
pub use geometry::{Point, Rect, Size, SvgMetrics};
pub use image::VectorImage;
pub use palette::RecolorPalette;
pub use recolor::{recolor, recolor_text};
pub use themed::{ColorScheme, ThemedVectorImage};

/// Prelude module with commonly used types.
pub mod prelude {
    pub use crate::compose::{CompositionDescriptor, VectorImageProvider, compose};
    pub use crate::geometry::{Point, Rect, Size};
    pub use crate::image::VectorImage;
    pub use crate::palette::RecolorPalette;
    pub use crate::recolor::recolor;
    pub use crate::themed::{ColorScheme, ThemedVectorImage};
}
