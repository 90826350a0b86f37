//! Composition of several vector images into one.
//!
//! Children are placed on a square canvas of side `base_size`. Each child
//! is scaled uniformly to fit its target bounds, then positioned so that its
//! footprint sits in the canvas where the bounds sit, proportionally:
//!
//! ```text
//! relative = bounds.origin / (base - bounds.size)     (0 if bounds.size >= base)
//! offset   = relative * (base - scale * child.size)
//! ```
//!
//! A child point `p` maps to `scale * (p - child.origin) + offset`.

use serde::{Deserialize, Serialize};
use server_resources_core::logging::targets;

use crate::error::{Result, SvgError};
use crate::geometry::{Point, Rect, Size, SvgMetrics, format_number};
use crate::image::VectorImage;
use crate::xml::{XmlElement, XmlNode};

/// Default canvas side length.
pub const DEFAULT_BASE_SIZE: f32 = 120.0;

const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";

/// One child image and its target bounds on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub name: String,
    pub bounds: Rect,
}

/// An ordered list of placements on a square canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositionDescriptor {
    pub base_size: f32,
    pub placements: Vec<Placement>,
}

impl Default for CompositionDescriptor {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_SIZE)
    }
}

impl CompositionDescriptor {
    /// An empty descriptor for a canvas of side `base_size`.
    pub fn new(base_size: f32) -> Self {
        Self {
            base_size,
            placements: Vec::new(),
        }
    }

    /// Append a placement.
    pub fn place(mut self, name: impl Into<String>, bounds: Rect) -> Self {
        self.placements.push(Placement {
            name: name.into(),
            bounds,
        });
        self
    }

    /// A name for the composed image, derived from the child names.
    pub fn composite_name(&self) -> String {
        let names: Vec<&str> = self.placements.iter().map(|p| p.name.as_str()).collect();
        format!("composite({})", names.join("+"))
    }
}

/// Supplies child images to the composition engine.
pub trait VectorImageProvider {
    /// Resolve a child image by name.
    fn vector_image(&self, name: &str) -> Option<VectorImage>;
}

impl<F> VectorImageProvider for F
where
    F: Fn(&str) -> Option<VectorImage>,
{
    fn vector_image(&self, name: &str) -> Option<VectorImage> {
        self(name)
    }
}

/// Scale and offset of one placed child.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementTransform {
    /// Uniform scale factor.
    pub scale: f32,
    /// Child size after scaling.
    pub footprint: Size,
    /// Canvas position of the child's content origin.
    pub offset: Point,
    /// The child's own content origin, subtracted before scaling.
    pub origin: Point,
}

fn axis_offset(base: f32, bounds_origin: f32, bounds_size: f32, footprint: f32) -> f32 {
    let relative = if bounds_size >= base {
        0.0
    } else {
        bounds_origin / (base - bounds_size)
    };
    relative * (base - footprint)
}

impl PlacementTransform {
    /// Compute the transform placing a child with `metrics` into `bounds`.
    pub fn compute(base_size: f32, bounds: Rect, metrics: SvgMetrics, image: &str) -> Result<Self> {
        if !metrics.size.is_positive() {
            return Err(SvgError::invalid_dimensions(image, "natural size must be positive"));
        }

        let scale = (bounds.width() / metrics.size.width).min(bounds.height() / metrics.size.height);
        let footprint = Size::new(metrics.size.width * scale, metrics.size.height * scale);
        let offset = Point::new(
            axis_offset(base_size, bounds.left(), bounds.width(), footprint.width),
            axis_offset(base_size, bounds.top(), bounds.height(), footprint.height),
        );

        Ok(Self {
            scale,
            footprint,
            offset,
            origin: metrics.origin,
        })
    }

    /// Map a point in child coordinates to canvas coordinates.
    pub fn apply(&self, point: Point) -> Point {
        Point::new(
            self.scale * (point.x - self.origin.x) + self.offset.x,
            self.scale * (point.y - self.origin.y) + self.offset.y,
        )
    }

    /// The SVG `transform` attribute value.
    pub fn to_svg_transform(&self) -> String {
        let mut value = format!(
            "translate({},{}) scale({})",
            format_number(self.offset.x),
            format_number(self.offset.y),
            format_number(self.scale)
        );
        if self.origin != Point::ZERO {
            value.push_str(&format!(
                " translate({},{})",
                format_number(-self.origin.x),
                format_number(-self.origin.y)
            ));
        }
        value
    }
}

/// Compose the children of `descriptor` into one vector image.
///
/// Fails if a child cannot be resolved, is not an SVG document, or has no
/// positive natural size.
pub fn compose(
    descriptor: &CompositionDescriptor,
    provider: &dyn VectorImageProvider,
) -> Result<VectorImage> {
    let base = format_number(descriptor.base_size);
    let mut canvas = XmlElement::new("svg");
    canvas.set_attribute("xmlns", SVG_NAMESPACE);
    canvas.set_attribute("width", base.as_str());
    canvas.set_attribute("height", base.as_str());
    canvas.set_attribute("viewBox", format!("0 0 {base} {base}"));

    for placement in &descriptor.placements {
        let child = provider
            .vector_image(&placement.name)
            .ok_or_else(|| SvgError::missing_image(&placement.name))?;
        let root = child.parse_root()?;
        let metrics = SvgMetrics::from_root(&root, child.name())?;
        let transform =
            PlacementTransform::compute(descriptor.base_size, placement.bounds, metrics, child.name())?;

        for (key, value) in root.attributes() {
            if key.starts_with("xmlns:") && canvas.attribute(key).is_none() {
                canvas.set_attribute(key, value);
            }
        }

        let mut group = XmlElement::new("g");
        group.set_attribute("transform", transform.to_svg_transform());
        for node in root.children() {
            group.add_child(node.clone());
        }
        canvas.add_child(XmlNode::Element(group));

        tracing::trace!(
            target: targets::COMPOSE,
            child = child.name(),
            scale = transform.scale,
            x = transform.offset.x,
            y = transform.offset.y,
            "placed child"
        );
    }

    tracing::debug!(
        target: targets::COMPOSE,
        children = descriptor.placements.len(),
        base_size = descriptor.base_size,
        "composed vector image"
    );
    VectorImage::from_root(descriptor.composite_name(), &canvas)
}
