//! Error types for icon discovery and stylesheet generation

use crate::runtime::RuntimeError;
use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while generating or pushing icon CSS
#[derive(Error, Debug, Diagnostic)]
pub enum KernIconsError {
    /// No SVG asset exists for the requested icon name/style
    #[error("No icon asset for '{icon}' at {}", .path.display())]
    #[diagnostic(
        code(fob::kern_icons::missing_asset),
        help("Check the icon name against the Material Symbols collection, or fix the class name in your source")
    )]
    MissingAsset { icon: String, path: PathBuf },

    /// The asset exists but could not be read
    #[error("Failed to read icon asset for '{icon}': {source}")]
    #[diagnostic(code(fob::kern_icons::asset_read))]
    AssetRead {
        icon: String,
        #[source]
        source: RuntimeError,
    },

    /// A tracked source file could not be read
    #[error("Failed to read source file {}: {source}", .path.display())]
    #[diagnostic(code(fob::kern_icons::source_read))]
    SourceRead {
        path: PathBuf,
        #[source]
        source: RuntimeError,
    },

    /// A file was read but is not valid UTF-8
    #[error("File {} is not valid UTF-8", .path.display())]
    #[diagnostic(code(fob::kern_icons::invalid_utf8))]
    InvalidUtf8 { path: PathBuf },

    /// The configured CSS layer name cannot be embedded safely
    #[error("Invalid CSS layer name: {layer:?}")]
    #[diagnostic(
        code(fob::kern_icons::invalid_css_layer),
        help("Use letters, digits, '-', '_' or '.' and do not start with a digit")
    )]
    InvalidCssLayer { layer: String },

    /// The live-update client went away before the message was delivered
    #[error("Live-update client disconnected before '{event}' was delivered")]
    #[diagnostic(code(fob::kern_icons::client_disconnected))]
    ClientDisconnected { event: String },
}

impl KernIconsError {
    pub fn source_read(path: impl Into<PathBuf>, source: RuntimeError) -> Self {
        Self::SourceRead {
            path: path.into(),
            source,
        }
    }

    pub fn invalid_utf8(path: impl Into<PathBuf>) -> Self {
        Self::InvalidUtf8 { path: path.into() }
    }

    pub fn invalid_css_layer(layer: impl Into<String>) -> Self {
        Self::InvalidCssLayer {
            layer: layer.into(),
        }
    }

    pub fn client_disconnected(event: impl Into<String>) -> Self {
        Self::ClientDisconnected {
            event: event.into(),
        }
    }
}

/// Result alias used throughout the plugin
pub type Result<T, E = KernIconsError> = std::result::Result<T, E>;
