//! Icon asset resolution and CSS rule synthesis
//!
//! ```text
//! IconRef → <icons_dir>/<name>[-<style>].svg → strip fixed size → base64 data URI → CSS rule
//! ```

use crate::error::{KernIconsError, Result};
use crate::icon::IconRef;
use crate::runtime::{Runtime, RuntimeError};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use futures::future::try_join_all;
use std::path::PathBuf;
use std::sync::Arc;

/// Custom property the icon color is read from
pub const ICON_COLOR_VAR: &str = "--kern-color-layout-text-default";

/// Color used when the custom property is not defined
pub const ICON_COLOR_FALLBACK: &str = "#171a2b";

/// Fixed pixel size the collection's SVGs are exported with
const FIXED_DIMENSIONS: [(&str, &str); 2] = [
    (r#"width="48""#, r#"width="""#),
    (r#"height="48""#, r#"height="""#),
];

/// Resolves icons to CSS rules by reading their SVG assets
#[derive(Debug, Clone)]
pub struct IconResolver {
    runtime: Arc<dyn Runtime>,
    icons_dir: PathBuf,
}

impl IconResolver {
    pub fn new(runtime: Arc<dyn Runtime>, icons_dir: impl Into<PathBuf>) -> Self {
        Self {
            runtime,
            icons_dir: icons_dir.into(),
        }
    }

    /// Location of the asset backing `icon`
    pub fn asset_path(&self, icon: &IconRef) -> PathBuf {
        self.icons_dir.join(icon.asset_file_name())
    }

    /// Read the icon's asset and render its CSS rule
    ///
    /// A missing asset is an error; there is no fallback icon.
    pub async fn resolve_css(&self, icon: &IconRef) -> Result<String> {
        let path = self.asset_path(icon);
        let bytes = self.runtime.read_file(&path).await.map_err(|e| match e {
            RuntimeError::FileNotFound(_) => KernIconsError::MissingAsset {
                icon: icon.class_name(),
                path: path.clone(),
            },
            source => KernIconsError::AssetRead {
                icon: icon.class_name(),
                source,
            },
        })?;
        let svg = String::from_utf8(bytes).map_err(|_| KernIconsError::invalid_utf8(&path))?;

        Ok(render_rule(icon, &svg))
    }

    /// Resolve many icons concurrently
    ///
    /// Output order matches `icons`; the first failure aborts the whole batch.
    pub async fn resolve_all(&self, icons: &[IconRef]) -> Result<Vec<String>> {
        try_join_all(icons.iter().map(|icon| self.resolve_css(icon))).await
    }
}

/// Drop the collection's fixed pixel size so the use-site controls it
pub fn strip_fixed_dimensions(svg: &str) -> String {
    FIXED_DIMENSIONS
        .iter()
        .fold(svg.to_string(), |markup, (fixed, empty)| {
            markup.replace(*fixed, empty)
        })
}

/// Encode SVG markup as a base64 data URI
pub fn svg_data_uri(svg: &str) -> String {
    format!("data:image/svg+xml;base64,{}", STANDARD.encode(svg))
}

/// Render the mask rule for `icon` from its raw SVG markup
pub fn render_rule(icon: &IconRef, svg: &str) -> String {
    let uri = svg_data_uri(&strip_fixed_dimensions(svg));
    format!(
        "{} {{\n\tmask: url(\"{}\");\n\tbackground-color: var({}, {});\n}}",
        icon.selector(),
        uri,
        ICON_COLOR_VAR,
        ICON_COLOR_FALLBACK
    )
}
