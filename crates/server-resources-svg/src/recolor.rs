//! Dark-skin recoloring of SVG images.
//!
//! Recoloring runs three passes over the image text:
//!
//! 1. **Tree pass**: `fill` attributes of `<path>` and `<polygon>` elements
//!    inside `<g>` groups of the `<svg>` root are mapped through the
//!    palette's near-black and fill tables.
//! 2. **Text pass**: the first name rule matching the image name is applied;
//!    if none matches, the generic fill, stroke and single-colour swaps are.
//! 3. **Size pass**: at specific pixel sizes, path data and opacity tuned for
//!    that size are substituted for matching names.
//!
//! The result depends only on the text, the name, the target size and the
//! palette.

use server_resources_core::logging::targets;

use crate::image::VectorImage;
use crate::palette::{RecolorPalette, Replacement};
use crate::xml::{XmlElement, parse_xml};

/// Map the fills of a parsed `<svg>` tree to the dark palette.
///
/// Returns a new tree; the input is not modified.
pub fn recolor_tree(root: &XmlElement, palette: &RecolorPalette) -> XmlElement {
    let mut root = root.clone();
    if root.local_name() == "svg" {
        for child in root.child_elements_mut() {
            if child.local_name() == "g" {
                recolor_group(child, palette);
            }
        }
    }
    root
}

fn recolor_group(group: &mut XmlElement, palette: &RecolorPalette) {
    for child in group.child_elements_mut() {
        match child.local_name() {
            "g" => recolor_group(child, palette),
            "path" | "polygon" => {
                let replacement = child
                    .attribute("fill")
                    .and_then(|fill| palette.tree_fill(fill))
                    .map(str::to_string);
                if let Some(replacement) = replacement {
                    child.set_attribute("fill", replacement);
                }
            }
            _ => {}
        }
    }
}

fn has_filled_shapes(text: &str) -> bool {
    text.contains("fill") && (text.contains("path") || text.contains("polygon"))
}

fn apply_all(text: String, replacements: &[Replacement]) -> String {
    replacements
        .iter()
        .fold(text, |text, replacement| replacement.apply(&text))
}

/// Recolor SVG text for the dark skin.
///
/// `target_size` is the square pixel size the image will be drawn at.
pub fn recolor_text(
    text: &str,
    name: &str,
    target_size: Option<u32>,
    palette: &RecolorPalette,
) -> String {
    let mut output = text.to_string();

    if has_filled_shapes(text) {
        match parse_xml(text).and_then(|root| recolor_tree(&root, palette).to_xml_string()) {
            Ok(serialized) => output = serialized,
            Err(e) => tracing::debug!(
                target: targets::RECOLOR,
                image = name,
                error = %e,
                "skipping tree pass"
            ),
        }
    }

    let lower_name = name.to_lowercase();
    output = match palette.name_rule(&lower_name) {
        Some(rule) => apply_all(output, &rule.replacements),
        None => apply_all(output, &palette.generic_replacements()),
    };

    if let Some(pixels) = target_size
        && let Some(rule) = palette.size_rule(&lower_name, pixels)
    {
        output = apply_all(output, &rule.replacements);
    }

    output
}

/// Recolor a vector image for the dark skin.
///
/// The result is tagged as light/dark customizable.
pub fn recolor(image: &VectorImage, target_size: Option<u32>, palette: &RecolorPalette) -> VectorImage {
    let text = recolor_text(image.text(), image.name(), target_size, palette);
    tracing::trace!(
        target: targets::RECOLOR,
        image = image.name(),
        ?target_size,
        "recolored image"
    );
    VectorImage::from_text(image.name(), text).into_light_dark_customizable()
}

#[cfg(test)]
mod tests {
    use super::*;

    const ICON: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="16" height="16"><g><path fill="#212121" d="M1 1h14v14H1z"/><g><polygon fill="#E8F3FC" points="0,0 4,0 4,4"/></g><path fill="#123456" d="M0 0"/></g><path fill="#212121" d="M2 2"/></svg>"##;

    #[test]
    fn test_tree_pass_scope() {
        let palette = RecolorPalette::default();
        let root = parse_xml(ICON).unwrap();
        let out = recolor_tree(&root, &palette).to_xml_string().unwrap();
        assert!(out.contains(r##"<path fill="#d6d6d6" d="M1 1h14v14H1z"/>"##));
        assert!(out.contains(r##"<polygon fill="#0c3b5e""##));
        assert!(out.contains(r##"<path fill="#123456""##));
        // Outside any group: untouched.
        assert!(out.contains(r##"<path fill="#212121" d="M2 2"/>"##));
        // The input tree is not modified.
        assert_eq!(root.to_xml_string().unwrap(), ICON);
    }

    #[test]
    fn test_generic_text_pass() {
        let palette = RecolorPalette::default();
        let text = r##"<svg><rect fill="#ffffff" stroke="#212121"/><rect stroke="#0c3b5e"/><rect fill="#0078d4" stroke="#0078d4"/><rect fill="#107c10"/></svg>"##;
        let out = recolor_text(text, "icons/shape.svg", None, &palette);
        assert_eq!(
            out,
            r##"<svg><rect fill="#2b2b2b" stroke="#d6d6d6"/><rect stroke="#e8f3fc"/><rect fill="#2899f5" stroke="#2899f5"/><rect fill="#54b054"/></svg>"##
        );
    }

    #[test]
    fn test_name_rule_replaces_generic_pass() {
        let palette = RecolorPalette::default();
        let text = r##"<svg><rect fill="#ffffff" stroke="#0078d4"/><rect fill="#e8f3fc"/></svg>"##;
        let out = recolor_text(text, "Docs/Rel1ExtDoc.svg", None, &palette);
        assert_eq!(
            out,
            r##"<svg><rect fill="#1b1a19" stroke="#2899f5"/><rect fill="#e8f3fc"/></svg>"##
        );
    }

    #[test]
    fn test_size_pass_only_at_24() {
        let palette = RecolorPalette::default();
        let text = r#"<svg><rect opacity="0.3" d="M3 7h18v13H3z"/></svg>"#;

        let at_24 = recolor_text(text, "shapes/RelArch-24x24.svg", Some(24), &palette);
        assert_eq!(at_24, r#"<svg><rect opacity="0.55" d="M3.5 7.5h17v12h-17z"/></svg>"#);

        let at_16 = recolor_text(text, "shapes/RelArch-24x24.svg", Some(16), &palette);
        assert_eq!(at_16, text);
    }

    #[test]
    fn test_malformed_xml_skips_tree_pass() {
        let palette = RecolorPalette::default();
        let text = r##"<svg><g><path fill="#212121" stroke="#000000"></g>"##;
        let out = recolor_text(text, "broken.svg", None, &palette);
        assert_eq!(out, r##"<svg><g><path fill="#212121" stroke="#d6d6d6"></g>"##);
    }

    #[test]
    fn test_deterministic() {
        let palette = RecolorPalette::default();
        let image = VectorImage::from_text("forms/form-colour-10-24x24.svg", ICON);
        let a = recolor(&image, Some(24), &palette);
        let b = recolor(&image, Some(24), &palette);
        assert_eq!(a.text(), b.text());
        assert!(a.is_light_dark_customizable());
        assert_eq!(image.text(), ICON);
    }
}
