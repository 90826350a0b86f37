//! Geometry types and SVG size metrics.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SvgError};
use crate::xml::XmlElement;

/// A point in 2D space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// The origin point (0, 0).
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };
}

impl From<(f32, f32)> for Point {
    fn from((x, y): (f32, f32)) -> Self {
        Self { x, y }
    }
}

/// A size in 2D space (width and height).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Returns true if both dimensions are strictly positive.
    #[inline]
    pub fn is_positive(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }
}

/// An axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub origin: Point,
    pub size: Size,
}

impl Rect {
    /// Create a new rectangle from origin and size.
    #[inline]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            origin: Point { x, y },
            size: Size { width, height },
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.origin.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.origin.y
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.origin.x + self.size.width
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.origin.y + self.size.height
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.size.width
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.size.height
    }
}

/// Natural size and content origin of an SVG image.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SvgMetrics {
    /// Top-left corner of the content in user units.
    pub origin: Point,
    /// Natural width and height in user units.
    pub size: Size,
}

impl SvgMetrics {
    /// Read the metrics of an `<svg>` root element.
    ///
    /// The `viewBox` provides both origin and size when present; otherwise the
    /// `width`/`height` attributes give the size and the origin is zero. Both
    /// dimensions must be positive.
    pub fn from_root(root: &XmlElement, image: &str) -> Result<Self> {
        let metrics = match root.attribute("viewBox") {
            Some(view_box) => {
                let values = parse_number_list(view_box)
                    .ok_or_else(|| SvgError::invalid_dimensions(image, format!("bad viewBox '{view_box}'")))?;
                let [x, y, width, height] = values[..] else {
                    return Err(SvgError::invalid_dimensions(
                        image,
                        format!("viewBox '{view_box}' needs four numbers"),
                    ));
                };
                Self {
                    origin: Point::new(x, y),
                    size: Size::new(width, height),
                }
            }
            None => {
                let width = length_attribute(root, "width", image)?;
                let height = length_attribute(root, "height", image)?;
                Self {
                    origin: Point::ZERO,
                    size: Size::new(width, height),
                }
            }
        };

        if !metrics.size.is_positive() {
            return Err(SvgError::invalid_dimensions(
                image,
                format!("{} x {} is not a positive size", metrics.size.width, metrics.size.height),
            ));
        }
        Ok(metrics)
    }
}

fn parse_number_list(text: &str) -> Option<Vec<f32>> {
    text.split(|c: char| c.is_whitespace() || c == ',')
        .filter(|part| !part.is_empty())
        .map(|part| part.parse().ok())
        .collect()
}

fn length_attribute(root: &XmlElement, name: &str, image: &str) -> Result<f32> {
    let raw = root
        .attribute(name)
        .ok_or_else(|| SvgError::invalid_dimensions(image, format!("missing {name}")))?;
    let number = raw.trim().strip_suffix("px").unwrap_or(raw.trim());
    number
        .parse()
        .map_err(|_| SvgError::invalid_dimensions(image, format!("bad {name} '{raw}'")))
}

/// Format a number for an SVG attribute.
///
/// Uses the shortest representation that round-trips, and never emits `-0`.
pub fn format_number(value: f32) -> String {
    if value == 0.0 {
        "0".to_string()
    } else {
        value.to_string()
    }
}
