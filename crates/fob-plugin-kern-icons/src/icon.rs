//! Icon references and the extractor that finds them in source text
//!
//! An icon is referenced through a class-like token:
//!
//! ```text
//! kern-icon--home          → IconRef { name: "home", style: None }
//! kern-icon-fill--star     → IconRef { name: "star", style: Some(Fill) }
//! ```

use indexmap::IndexSet;
use once_cell::sync::Lazy;
use regex::Regex;
use rustc_hash::FxBuildHasher;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Marker every icon class starts with
pub const ICON_CLASS_PREFIX: &str = "kern-icon";

/// Insertion-ordered set of icon references
pub type IconSet = IndexSet<IconRef, FxBuildHasher>;

/// Style variant of an icon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IconStyle {
    /// Filled variant
    Fill,
}

impl IconStyle {
    /// Every known style, in pattern order
    pub const ALL: &'static [IconStyle] = &[IconStyle::Fill];

    /// Keyword used in class names and asset file names
    pub fn as_str(&self) -> &'static str {
        match self {
            IconStyle::Fill => "fill",
        }
    }
}

impl fmt::Display for IconStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IconStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        IconStyle::ALL
            .iter()
            .copied()
            .find(|style| style.as_str() == s)
            .ok_or_else(|| format!("Unknown icon style: {}", s))
    }
}

/// A single referenced icon, identified by name and optional style
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct IconRef {
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    style: Option<IconStyle>,
}

impl IconRef {
    pub fn new(name: impl Into<String>, style: Option<IconStyle>) -> Self {
        Self {
            name: name.into(),
            style,
        }
    }

    /// Bare icon name as written in source
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn style(&self) -> Option<IconStyle> {
        self.style
    }

    /// Class name used at the use-site, e.g. `kern-icon-fill--star`
    pub fn class_name(&self) -> String {
        match self.style {
            Some(style) => format!("{}-{}--{}", ICON_CLASS_PREFIX, style, self.name),
            None => format!("{}--{}", ICON_CLASS_PREFIX, self.name),
        }
    }

    /// CSS selector for this icon's rule
    pub fn selector(&self) -> String {
        format!(".{}", self.class_name())
    }

    /// File name of the SVG asset inside the icon collection
    ///
    /// Hyphens in the name become underscores; the style is appended as `-<style>`.
    pub fn asset_file_name(&self) -> String {
        let base = self.name.replace('-', "_");
        match self.style {
            Some(style) => format!("{}-{}.svg", base, style),
            None => format!("{}.svg", base),
        }
    }
}

impl fmt::Display for IconRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.class_name())
    }
}

static ICON_PATTERN: Lazy<Regex> = Lazy::new(|| {
    let styles = IconStyle::ALL
        .iter()
        .map(|style| regex::escape(style.as_str()))
        .collect::<Vec<_>>()
        .join("|");
    let pattern = format!(
        r"{}(?:-(?P<style>{}))?--(?P<name>[a-zA-Z0-9-]+)",
        regex::escape(ICON_CLASS_PREFIX),
        styles
    );
    Regex::new(&pattern).expect("icon pattern is a valid regex")
});

/// Extract every distinct icon referenced in `text`
///
/// Order follows first occurrence. Any input is valid; text without a
/// matching token yields an empty set.
pub fn extract_icons(text: &str) -> IconSet {
    let mut icons = IconSet::default();
    for captures in ICON_PATTERN.captures_iter(text) {
        let Some(name) = captures.name("name") else {
            continue;
        };
        let style = captures
            .name("style")
            .and_then(|m| m.as_str().parse::<IconStyle>().ok());
        icons.insert(IconRef::new(name.as_str(), style));
    }
    icons
}
