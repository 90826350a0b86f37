//! Detection of the desktop colour scheme.

use server_resources_core::logging::targets;
use server_resources_svg::ColorScheme;

use crate::service::ResourceService;

/// The colour scheme the desktop currently prefers.
///
/// Returns `None` when the platform reports no preference, or when the
/// `system-theme` feature is disabled.
#[cfg(feature = "system-theme")]
pub fn system_color_scheme() -> Option<ColorScheme> {
    match dark_light::detect() {
        dark_light::Mode::Dark => Some(ColorScheme::Dark),
        dark_light::Mode::Light => Some(ColorScheme::Light),
        dark_light::Mode::Default => None,
    }
}

#[cfg(not(feature = "system-theme"))]
pub fn system_color_scheme() -> Option<ColorScheme> {
    None
}

impl ResourceService {
    /// Switch to the desktop colour scheme, if it reports one.
    ///
    /// Returns the scheme in effect afterwards.
    pub fn follow_system_theme(&self) -> ColorScheme {
        match system_color_scheme() {
            Some(scheme) => self.set_color_scheme(scheme),
            None => tracing::debug!(
                target: targets::SERVICE,
                "no system colour scheme, keeping current"
            ),
        }
        self.color_scheme()
    }
}
