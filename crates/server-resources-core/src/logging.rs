//! Logging facilities for the resource system.
//!
//! The resource crates use the `tracing` crate for instrumentation. No
//! subscriber is installed by the library; applications install their own:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("server_resources=debug")
//!     .init();
//! ```

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Container format parsing and writing.
    pub const CONTAINER: &str = "server_resources::container";
    /// Index construction and reloads.
    pub const INDEX: &str = "server_resources::index";
    /// Lazy content loading.
    pub const LOADER: &str = "server_resources::loader";
    /// Resource source enumeration.
    pub const SOURCE: &str = "server_resources::source";
    /// Name resolution and size fallback.
    pub const RESOLVE: &str = "server_resources::resolve";
    /// Dark-skin recoloring of vector images.
    pub const RECOLOR: &str = "server_resources::recolor";
    /// Vector image composition.
    pub const COMPOSE: &str = "server_resources::compose";
    /// The resource service facade.
    pub const SERVICE: &str = "server_resources::service";
}

/// A guard that keeps a tracing span entered until dropped.
///
/// This is useful for tracking the duration of operations such as index
/// builds.
#[derive(Debug)]
pub struct PerfSpan {
    #[allow(dead_code)]
    span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    /// Create a new performance span.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::info_span!(target: "server_resources::perf", "perf", operation = name);
        Self {
            span: span.entered(),
        }
    }
}
