//! Resource service for application servers.
//!
//! Resources are images, icons, documents and media clips addressed by
//! case-insensitive names such as `Icons/Open.svg`. They come from
//! `ServerResources.bin` containers and loose-file directories, and are
//! resolved either exactly or through a *pack*: the size and type variants of
//! one logical icon (`icons/open-16x16.svg`, `icons/open-32x32.png`, ...).
//!
//! On top of the index the service renders vector icons for the current
//! [`ColorScheme`], recoloring light-skin artwork for the dark skin, and
//! composes several icons into one.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use server_resources::prelude::*;
//!
//! let mut writer = ContainerWriter::new();
//! writer.add(
//!     "icons/open-16x16.svg",
//!     br##"<svg width="16" height="16"><g><path fill="#212121" d="M0 0h16v16H0z"/></g></svg>"##.to_vec(),
//! );
//! let source = ArchiveBytesSource::new("memory", writer.to_bytes().unwrap());
//! let service = ResourceService::with_sources(ResourceConfig::default(), vec![Arc::new(source)]).unwrap();
//!
//! assert!(service.contains_resource("Icons/Open.svg", false));
//!
//! service.set_color_scheme(ColorScheme::Dark);
//! let icon = service.vector_image("icons/open", Some(16)).unwrap().unwrap();
//! assert!(icon.text().contains(r##"fill="#d6d6d6""##));
//! ```
//!
//! # Features
//!
//! - `system-theme`: detect the desktop colour scheme with
//!   [`system_color_scheme`] and [`ResourceService::follow_system_theme`]

pub mod config;
pub mod service;
pub mod system_theme;

mod error;

pub use config::ResourceConfig;
pub use error::{Error, Result};
pub use service::ResourceService;
pub use system_theme::system_color_scheme;

pub use server_resources_core::{
    ContentType, ItemContent, ResourceError, ResourceIndex, ResourceItem, ResourcePack,
    ResourceSource, Resolved, RetryPolicy, SizeType,
};
pub use server_resources_svg::{
    ColorScheme, CompositionDescriptor, RecolorPalette, SvgError, VectorImage,
};

/// Prelude module with commonly used types.
pub mod prelude {
    pub use crate::config::ResourceConfig;
    pub use crate::service::ResourceService;
    pub use server_resources_core::prelude::*;
    pub use server_resources_svg::geometry::Rect;
    pub use server_resources_svg::{ColorScheme, CompositionDescriptor, VectorImage};
}
