//! Recolor palette configuration.
//!
//! The palette holds every colour table and text rule used by the dark-skin
//! recolor pass. [`RecolorPalette::default`] carries the built-in tables; a
//! TOML document can replace any of them:
//!
//! ```toml
//! near_black = "#212121"
//! near_black_replacement = "#d6d6d6"
//!
//! [[fills]]
//! light = "#e8f3fc"
//! dark = "#0c3b5e"
//!
//! [[name_rules]]
//! patterns = ["rel1extdoc", "relnextdoc"]
//! replacements = [
//!     { from = 'fill="#ffffff" stroke="#0078d4"', to = 'fill="#1b1a19" stroke="#2899f5"' },
//! ]
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SvgError};

/// A light-skin colour and its dark-skin counterpart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorPair {
    pub light: String,
    pub dark: String,
}

/// A literal text substitution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Replacement {
    pub from: String,
    pub to: String,
}

impl Replacement {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }

    /// Apply the substitution to every occurrence in `text`.
    pub fn apply(&self, text: &str) -> String {
        if self.from.is_empty() {
            return text.to_string();
        }
        text.replace(&self.from, &self.to)
    }
}

/// Replacements applied to images whose name contains one of the patterns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameRule {
    /// Lower-case substrings matched against the lower-cased image name.
    pub patterns: Vec<String>,
    pub replacements: Vec<Replacement>,
}

impl NameRule {
    /// Whether the rule applies to a lower-cased image name.
    pub fn matches(&self, lower_name: &str) -> bool {
        self.patterns
            .iter()
            .any(|pattern| lower_name.contains(&pattern.to_lowercase()))
    }
}

/// A name rule that only applies at one square pixel size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeRule {
    pub pixels: u32,
    /// Lower-case substrings matched against the lower-cased image name.
    pub patterns: Vec<String>,
    pub replacements: Vec<Replacement>,
}

impl SizeRule {
    fn new(pixels: u32, patterns: &[&str], replacements: Vec<Replacement>) -> Self {
        Self {
            pixels,
            patterns: patterns.iter().map(|p| p.to_string()).collect(),
            replacements,
        }
    }

    /// Whether the rule applies to a lower-cased image name at `pixels`.
    pub fn matches(&self, lower_name: &str, pixels: u32) -> bool {
        self.pixels == pixels
            && self
                .patterns
                .iter()
                .any(|pattern| lower_name.contains(&pattern.to_lowercase()))
    }
}

/// Colour tables and text rules for the dark-skin recolor pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecolorPalette {
    /// Fill treated as "near black" in the tree pass.
    pub near_black: String,
    /// Replacement for [`near_black`](Self::near_black) fills.
    pub near_black_replacement: String,
    /// Light fills and their dark replacements.
    pub fills: Vec<ColorPair>,
    /// Name-specific rules; the first matching rule replaces the generic pass.
    pub name_rules: Vec<NameRule>,
    /// Single-colour swaps applied after the fill table in the generic pass.
    pub extra_replacements: Vec<Replacement>,
    /// Pixel-size specific rules; the first matching rule is applied.
    pub size_rules: Vec<SizeRule>,
}

fn pair(light: &str, dark: &str) -> ColorPair {
    ColorPair {
        light: light.to_string(),
        dark: dark.to_string(),
    }
}

fn rule(patterns: &[&str], replacements: Vec<Replacement>) -> NameRule {
    NameRule {
        patterns: patterns.iter().map(|p| p.to_string()).collect(),
        replacements,
    }
}

impl Default for RecolorPalette {
    fn default() -> Self {
        Self {
            near_black: "#212121".to_string(),
            near_black_replacement: "#d6d6d6".to_string(),
            fills: vec![
                pair("#e8f3fc", "#0c3b5e"),
                pair("#dff6dd", "#0b4a09"),
                pair("#fde7e9", "#6e0811"),
                pair("#fff4ce", "#5c4700"),
                pair("#efe9f7", "#3b2866"),
                pair("#ffe9d9", "#6b2e00"),
                pair("#e1f5f3", "#00474a"),
                pair("#f3f2f1", "#3b3a39"),
                pair("#fce8f3", "#5c0f3a"),
            ],
            name_rules: vec![
                rule(
                    &["class-colour-10", "form-colour-10", "tag-filled-grey", "button-grey-filled"],
                    vec![
                        Replacement::new(
                            r##"fill="#f3f2f1" stroke="#605e5c""##,
                            r##"fill="#3b3a39" stroke="#c8c6c4""##,
                        ),
                        Replacement::new(
                            r##"fill="#c8c6c4" stroke="#605e5c""##,
                            r##"fill="#605e5c" stroke="#c8c6c4""##,
                        ),
                    ],
                ),
                rule(
                    &["rel1extdoc", "relnextdoc"],
                    vec![
                        Replacement::new(
                            r##"fill="#ffffff" stroke="#0078d4""##,
                            r##"fill="#1b1a19" stroke="#2899f5""##,
                        ),
                        Replacement::new(
                            r##"stroke="#0078d4" fill="#ffffff""##,
                            r##"stroke="#2899f5" fill="#1b1a19""##,
                        ),
                    ],
                ),
            ],
            extra_replacements: vec![
                Replacement::new(
                    r##"fill="#0078d4" stroke="#0078d4""##,
                    r##"fill="#2899f5" stroke="#2899f5""##,
                ),
                Replacement::new(r##"fill="#107c10""##, r##"fill="#54b054""##),
                Replacement::new(r##"fill="#ffffff""##, r##"fill="#2b2b2b""##),
                Replacement::new(r#"fill="white""#, r##"fill="#2b2b2b""##),
                Replacement::new(r##"stroke="#000000""##, r##"stroke="#d6d6d6""##),
                Replacement::new(r#"stroke="black""#, r##"stroke="#d6d6d6""##),
                Replacement::new(r##"stroke="#212121""##, r##"stroke="#d6d6d6""##),
                Replacement::new(r##"stroke="#424242""##, r##"stroke="#d6d6d6""##),
            ],
            size_rules: vec![
                SizeRule::new(
                    24,
                    &["form-colour", "rel1"],
                    vec![
                        Replacement::new(r#"opacity="0.4""#, r#"opacity="0.6""#),
                        Replacement::new("M4 4h16v16H4z", "M4.5 4.5h15v15h-15z"),
                    ],
                ),
                SizeRule::new(
                    24,
                    &["relarch"],
                    vec![
                        Replacement::new(r#"opacity="0.3""#, r#"opacity="0.55""#),
                        Replacement::new("M3 7h18v13H3z", "M3.5 7.5h17v12h-17z"),
                    ],
                ),
                SizeRule::new(
                    24,
                    &["reln"],
                    vec![
                        Replacement::new(r#"opacity="0.4""#, r#"opacity="0.65""#),
                        Replacement::new("M6 2h14v16H6z", "M6.5 2.5h13v15h-13z"),
                    ],
                ),
            ],
        }
    }
}

impl RecolorPalette {
    /// Parse a palette from TOML text. Missing tables keep their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| SvgError::config(e.to_string()))
    }

    /// Read a palette from a TOML file.
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| SvgError::config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    /// Serialize the palette as TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| SvgError::config(e.to_string()))
    }

    /// The dark replacement for a fill value in the tree pass, if any.
    ///
    /// Colour values are compared case-insensitively.
    pub fn tree_fill(&self, value: &str) -> Option<&str> {
        let value = value.trim();
        if value.eq_ignore_ascii_case(&self.near_black) {
            return Some(&self.near_black_replacement);
        }
        self.fills
            .iter()
            .find(|pair| value.eq_ignore_ascii_case(&pair.light))
            .map(|pair| pair.dark.as_str())
    }

    /// The first name rule matching a lower-cased image name.
    pub fn name_rule(&self, lower_name: &str) -> Option<&NameRule> {
        self.name_rules.iter().find(|rule| rule.matches(lower_name))
    }

    /// The first size rule for `pixels` matching a lower-cased image name.
    pub fn size_rule(&self, lower_name: &str, pixels: u32) -> Option<&SizeRule> {
        self.size_rules
            .iter()
            .find(|rule| rule.matches(lower_name, pixels))
    }

    /// Substitutions of the generic pass, in application order.
    ///
    /// Light fills become dark, strokes in a table dark colour become the
    /// light colour, then the extra replacements follow.
    pub fn generic_replacements(&self) -> Vec<Replacement> {
        let fills = self.fills.iter().map(|pair| {
            Replacement::new(format!(r#"fill="{}""#, pair.light), format!(r#"fill="{}""#, pair.dark))
        });
        let strokes = self.fills.iter().map(|pair| {
            Replacement::new(
                format!(r#"stroke="{}""#, pair.dark),
                format!(r#"stroke="{}""#, pair.light),
            )
        });
        fills
            .chain(strokes)
            .chain(self.extra_replacements.iter().cloned())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tree_fill_lookup() {
        let palette = RecolorPalette::default();
        assert_eq!(palette.tree_fill("#212121"), Some("#d6d6d6"));
        assert_eq!(palette.tree_fill("#E8F3FC"), Some("#0c3b5e"));
        assert_eq!(palette.tree_fill("#fce8f3"), Some("#5c0f3a"));
        assert_eq!(palette.tree_fill("#123456"), None);
        assert_eq!(palette.fills.len(), 9);
    }

    #[test]
    fn test_name_rules() {
        let palette = RecolorPalette::default();
        assert!(palette.name_rule("icons/form-colour-10-24x24.svg").is_some());
        assert!(palette.name_rule("docs/relnextdoc.svg").is_some());
        assert!(palette.name_rule("icons/save.svg").is_none());
    }

    #[test]
    fn test_size_rules_first_match() {
        let palette = RecolorPalette::default();
        let rule = palette.size_rule("shapes/relarch-24x24.svg", 24).unwrap();
        assert!(rule.patterns.contains(&"relarch".to_string()));
        assert!(palette.size_rule("shapes/relarch-24x24.svg", 16).is_none());
        let rule = palette.size_rule("shapes/reln.svg", 24).unwrap();
        assert_eq!(rule.replacements[0].to, r#"opacity="0.65""#);
    }

    #[test]
    fn test_generic_replacements_order() {
        let palette = RecolorPalette::default();
        let generic = palette.generic_replacements();
        assert_eq!(generic.len(), 9 + 9 + palette.extra_replacements.len());
        assert_eq!(generic[0].from, r##"fill="#e8f3fc""##);
        assert_eq!(generic[9].from, r##"stroke="#0c3b5e""##);
        assert_eq!(generic[9].to, r##"stroke="#e8f3fc""##);
    }

    #[test]
    fn test_partial_toml_override() {
        let palette = RecolorPalette::from_toml_str(
            r##"
            near_black_replacement = "#eeeeee"

            [[fills]]
            light = "#ffffff"
            dark = "#000000"
            "##,
        )
        .unwrap();
        assert_eq!(palette.near_black, "#212121");
        assert_eq!(palette.near_black_replacement, "#eeeeee");
        assert_eq!(palette.fills, vec![pair("#ffffff", "#000000")]);
        assert_eq!(palette.name_rules, RecolorPalette::default().name_rules);
    }

    #[test]
    fn test_default_survives_toml() {
        let palette = RecolorPalette::default();
        let text = palette.to_toml_string().unwrap();
        assert_eq!(RecolorPalette::from_toml_str(&text).unwrap(), palette);
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(
            RecolorPalette::from_toml_str("fills = 3"),
            Err(SvgError::Config { .. })
        ));
    }
}
