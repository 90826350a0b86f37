//! Tests for recoloring and composing SVG icons.

use server_resources_svg::prelude::*;
use server_resources_svg::{PlacementTransform, SvgError, recolor_text};

const FORM_ICON: &str = r##"<?xml version="1.0" encoding="utf-8"?>
<svg xmlns="http://www.w3.org/2000/svg" width="24" height="24" viewBox="0 0 24 24">
  <g>
    <path opacity="0.4" fill="#e8f3fc" stroke="#605e5c" d="M4 4h16v16H4z"/>
    <g>
      <polygon fill="#212121" points="6,6 18,6 12,18"/>
    </g>
  </g>
</svg>
"##;

#[test]
fn test_recolor_is_byte_identical_across_runs() {
    let palette = RecolorPalette::default();
    let outputs: Vec<String> = (0..3)
        .map(|_| recolor_text(FORM_ICON, "Forms/Form-Colour-3-24x24.svg", Some(24), &palette))
        .collect();
    assert_eq!(outputs[0], outputs[1]);
    assert_eq!(outputs[1], outputs[2]);
}

#[test]
fn test_recolor_full_pipeline_at_24() {
    let palette = RecolorPalette::default();
    let out = recolor_text(FORM_ICON, "Forms/Form-Colour-3-24x24.svg", Some(24), &palette);

    // Tree pass: light fill and near-black fill.
    assert!(out.contains(r##"fill="#0c3b5e""##));
    assert!(out.contains(r##"<polygon fill="#d6d6d6""##));
    // Size pass for the form-colour family.
    assert!(out.contains(r#"opacity="0.6""#));
    assert!(out.contains("M4.5 4.5h15v15h-15z"));
    assert!(!out.contains("<?xml"));
}

#[test]
fn test_recolor_without_size_keeps_path_data() {
    let palette = RecolorPalette::default();
    let out = recolor_text(FORM_ICON, "Forms/Form-Colour-3-24x24.svg", None, &palette);
    assert!(out.contains("M4 4h16v16H4z"));
    assert!(out.contains(r#"opacity="0.4""#));
}

#[test]
fn test_custom_palette_from_toml() {
    let palette = RecolorPalette::from_toml_str(
        r##"
        near_black = "#000000"
        near_black_replacement = "#ffffff"
        fills = []
        name_rules = []
        extra_replacements = []
        size_rules = []
        "##,
    )
    .unwrap();
    let icon = VectorImage::from_text(
        "a.svg",
        r##"<svg><g><path fill="#000000" d="M0 0"/><path fill="#e8f3fc" d="M1 1"/></g></svg>"##,
    );
    let dark = recolor(&icon, None, &palette);
    assert_eq!(
        dark.text(),
        r##"<svg><g><path fill="#ffffff" d="M0 0"/><path fill="#e8f3fc" d="M1 1"/></g></svg>"##
    );
}

#[test]
fn test_composition_centering_end_to_end() {
    let provider = |name: &str| {
        (name == "child").then(|| {
            VectorImage::from_text(
                "child",
                r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 32 32"><rect width="32" height="32"/></svg>"#,
            )
        })
    };

    let bounds = Rect::new(30.0, 30.0, 60.0, 60.0);
    let child = provider("child").unwrap();
    let transform = PlacementTransform::compute(120.0, bounds, child.metrics().unwrap(), "child").unwrap();
    assert_eq!(transform.scale, 1.875);
    assert_eq!(transform.footprint, Size::new(60.0, 60.0));
    assert_eq!(transform.offset, Point::new(30.0, 30.0));

    let descriptor = CompositionDescriptor::new(120.0).place("child", bounds);
    let image = compose(&descriptor, &provider).unwrap();
    assert!(image.text().contains(r#"<g transform="translate(30,30) scale(1.875)">"#));

    let metrics = image.metrics().unwrap();
    assert_eq!(metrics.size, Size::new(120.0, 120.0));
}

#[test]
fn test_composition_rejects_flat_child() {
    let provider = |_: &str| Some(VectorImage::from_text("flat", r#"<svg width="0" height="16"/>"#));
    let descriptor = CompositionDescriptor::default().place("flat", Rect::new(0.0, 0.0, 60.0, 60.0));
    assert!(matches!(
        compose(&descriptor, &provider),
        Err(SvgError::InvalidDimensions { .. })
    ));
}

#[test]
fn test_themed_image_switches_schemes() {
    let palette = RecolorPalette::default();
    let themed = ThemedVectorImage::new(VectorImage::from_text("form-colour-3.svg", FORM_ICON));

    let dark = themed.image(ColorScheme::Dark, Some(24), &palette);
    let light = themed.image(ColorScheme::Light, Some(24), &palette);
    assert_ne!(dark.text(), light.text());
    assert_eq!(light.text(), FORM_ICON);
    assert_eq!(themed.cached_scheme(), Some(ColorScheme::Light));
}

#[test]
fn test_recolor_keeps_label_spacing() {
    let palette = RecolorPalette::default();
    let icon = r##"<svg><g><path fill="#212121" d="M0 0h8v8H0z"/><text x="1">Save <tspan>As</tspan></text></g></svg>"##;
    let out = recolor_text(icon, "labels/save-as.svg", None, &palette);
    assert_eq!(
        out,
        r##"<svg><g><path fill="#d6d6d6" d="M0 0h8v8H0z"/><text x="1">Save <tspan>As</tspan></text></g></svg>"##
    );
}
