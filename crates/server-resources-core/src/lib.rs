//! Server resource archives, the resource index and name resolution.
//!
//! This crate provides the storage side of the resource system:
//!
//! - **Container format**: parse and write `ServerResources.bin` archives
//! - **Naming**: normalize names into item keys and pack keys, classify
//!   content type and size tier
//! - **Sources**: archives on disk or in memory, loose-file directories and
//!   embedded directories
//! - **Index**: items keyed by item key and packs keyed by pack key
//! - **Resolution**: exact and pack lookups with size tier fallback
//! - **Loading**: archive content held in memory, file content read lazily
//!   with bounded retries
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use server_resources_core::prelude::*;
//!
//! let mut writer = ContainerWriter::new();
//! writer
//!     .add("icons/open-16x16.png", b"small".to_vec())
//!     .add("icons/open-32x32.png", b"large".to_vec());
//!
//! let sources: Vec<Arc<dyn ResourceSource>> =
//!     vec![Arc::new(ArchiveBytesSource::new("memory", writer.to_bytes().unwrap()))];
//! let index = ResourceIndex::build(&sources, &RetryPolicy::default());
//!
//! let item = index
//!     .find_item("Icons\\Open.png", false, None, Some(SizeType::Medium))
//!     .unwrap();
//! assert_eq!(item.item_key(), "icons/open-32x32.png");
//! ```

pub mod container;
pub mod index;
pub mod item;
pub mod loader;
pub mod logging;
pub mod naming;
pub mod reader;
pub mod resolve;
pub mod source;

mod error;

pub use container::{ContainerRecord, ContainerWriter};
pub use error::{ResourceError, Result};
pub use index::ResourceIndex;
pub use item::{ResourceItem, ResourcePack};
pub use loader::{ItemContent, LoadState};
pub use naming::{ContentType, ResourceName, SizeType, normalize_name};
pub use reader::RetryPolicy;
pub use resolve::{Resolved, select_from_pack};
pub use source::{
    ArchiveBytesSource, ArchiveFileSource, DirectorySource, EmbeddedSource, RawContent,
    RawResource, ResourceSource,
};

/// Prelude module with commonly used types.
pub mod prelude {
    pub use crate::container::ContainerWriter;
    pub use crate::index::ResourceIndex;
    pub use crate::item::{ResourceItem, ResourcePack};
    pub use crate::naming::{ContentType, SizeType};
    pub use crate::reader::RetryPolicy;
    pub use crate::resolve::Resolved;
    pub use crate::source::{
        ArchiveBytesSource, ArchiveFileSource, DirectorySource, EmbeddedSource, ResourceSource,
    };
}
