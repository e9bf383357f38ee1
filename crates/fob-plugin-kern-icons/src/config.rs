//! Configuration options for the KERN icons plugin

use crate::error::{KernIconsError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Default location of the SVG icon collection, relative to the project root
pub const DEFAULT_ICONS_DIR: &str = "node_modules/@material-symbols/svg-400/rounded";

/// Predicate deciding whether a file id is excluded from scanning
pub type IgnoreFilename = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// Configuration for the KERN icons plugin
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct KernIconsConfig {
    /// CSS layer to wrap every generated rule in
    ///
    /// `None` emits the rules unlayered.
    pub css_layer: Option<String>,

    /// Excludes otherwise-eligible files from tracking
    ///
    /// Receives the file id with its query string stripped.
    #[serde(skip)]
    pub ignore_filename: Option<IgnoreFilename>,

    /// Directory holding the SVG assets, one file per icon and style
    pub icons_dir: PathBuf,

    /// Source file extensions (without the dot) that are scanned for icons
    pub extensions: Vec<String>,
}

impl Default for KernIconsConfig {
    fn default() -> Self {
        Self {
            css_layer: None,
            ignore_filename: None,
            icons_dir: PathBuf::from(DEFAULT_ICONS_DIR),
            extensions: ["vue", "ts", "js", "css"]
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
        }
    }
}

impl fmt::Debug for KernIconsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KernIconsConfig")
            .field("css_layer", &self.css_layer)
            .field("ignore_filename", &self.ignore_filename.is_some())
            .field("icons_dir", &self.icons_dir)
            .field("extensions", &self.extensions)
            .finish()
    }
}

impl KernIconsConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap all generated rules in `@layer <layer> { ... }`
    pub fn with_css_layer(mut self, layer: impl Into<String>) -> Self {
        self.css_layer = Some(layer.into());
        self
    }

    /// Exclude files for which `predicate` returns true
    pub fn with_ignore_filename<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        self.ignore_filename = Some(Arc::new(predicate));
        self
    }

    /// Set the icon collection directory
    pub fn with_icons_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.icons_dir = dir.into();
        self
    }

    /// Replace the list of scanned extensions
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = extensions
            .into_iter()
            .map(|ext| ext.into().trim_start_matches('.').to_string())
            .collect();
        self
    }

    /// Check that the options can be embedded in the generated module
    pub fn validate(&self) -> Result<()> {
        if let Some(layer) = &self.css_layer {
            if !is_valid_layer_name(layer) {
                return Err(KernIconsError::invalid_css_layer(layer));
            }
        }
        Ok(())
    }

    pub(crate) fn is_ignored(&self, id: &str) -> bool {
        self.ignore_filename
            .as_ref()
            .is_some_and(|predicate| predicate(id))
    }
}

/// Layer names end up inside a JS template literal, so only plain
/// (optionally dotted) CSS identifiers are accepted.
fn is_valid_layer_name(layer: &str) -> bool {
    let mut chars = layer.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '-' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = KernIconsConfig::default();
        assert!(config.css_layer.is_none());
        assert!(config.ignore_filename.is_none());
        assert_eq!(config.icons_dir, PathBuf::from(DEFAULT_ICONS_DIR));
        assert_eq!(config.extensions, vec!["vue", "ts", "js", "css"]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_deserialize_camel_case() {
        let config: KernIconsConfig =
            serde_json::from_str(r#"{ "cssLayer": "kern.icons", "iconsDir": "assets/icons" }"#)
                .unwrap();
        assert_eq!(config.css_layer.as_deref(), Some("kern.icons"));
        assert_eq!(config.icons_dir, PathBuf::from("assets/icons"));
        assert_eq!(config.extensions.len(), 4);
    }

    #[test]
    fn test_layer_validation() {
        assert!(KernIconsConfig::new().with_css_layer("kern").validate().is_ok());
        assert!(KernIconsConfig::new()
            .with_css_layer("base.icons-v2")
            .validate()
            .is_ok());

        for bad in ["", "2col", "a b", "x`}${alert(1)}", "layer;"] {
            let err = KernIconsConfig::new().with_css_layer(bad).validate();
            assert!(
                matches!(err, Err(KernIconsError::InvalidCssLayer { .. })),
                "expected {:?} to be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_ignore_filename_predicate() {
        let config = KernIconsConfig::new().with_ignore_filename(|id| id.ends_with(".stories.ts"));
        assert!(config.is_ignored("/src/Button.stories.ts"));
        assert!(!config.is_ignored("/src/Button.ts"));
        assert!(!KernIconsConfig::new().is_ignored("/src/Button.stories.ts"));
    }

    #[test]
    fn test_with_extensions_strips_dots() {
        let config = KernIconsConfig::new().with_extensions([".tsx", "svelte"]);
        assert_eq!(config.extensions, vec!["tsx", "svelte"]);
    }
}
