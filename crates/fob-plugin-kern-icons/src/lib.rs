//! Rolldown plugin that generates CSS for the KERN icons a project uses
//!
//! Source files are scanned for icon classes such as `kern-icon--home` or
//! `kern-icon-fill--star`. Every referenced icon is resolved to its Material
//! Symbols SVG and exposed as a mask-based rule in a generated
//! `CSSStyleSheet` module.
//!
//! ## Architecture
//!
//! ```text
//! Source files → load() → record eligible file ids in the registry
//!                              ↓
//! virtual:kern-extra-icons → resolve_id() → load() template → transform():
//!     re-scan tracked files → current icon set → resolve SVGs → splice CSS
//!
//! File change → handle_hot_update() → diff vs. current set → push new rules
//! ```
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use fob_plugin_kern_icons::{FobKernIconsPlugin, KernIconsConfig};
//! use std::path::PathBuf;
//! use std::sync::Arc;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = KernIconsConfig::new()
//!     .with_css_layer("kern")
//!     .with_ignore_filename(|id| id.ends_with(".stories.ts"));
//! let plugin = Arc::new(FobKernIconsPlugin::with_config(config, PathBuf::from("."))?);
//! // Add to your Rolldown bundler configuration
//! # Ok(())
//! # }
//! ```
//!
//! In application code:
//!
//! ```js
//! import kernIcons from 'virtual:kern-extra-icons'
//! document.adoptedStyleSheets.push(kernIcons)
//! ```

use anyhow::Context;
use rolldown_common::ModuleType;
use rolldown_plugin::{
    HookLoadArgs, HookLoadOutput, HookLoadReturn, HookResolveIdArgs, HookResolveIdOutput,
    HookResolveIdReturn, HookTransformArgs, HookTransformOutput, HookTransformReturn, HookUsage,
    Plugin, PluginContext, SharedTransformPluginContext,
};
use std::borrow::Cow;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

mod config;
mod error;
mod hmr;
mod icon;
mod module;
mod registry;
mod resolver;
pub mod runtime;

#[cfg(feature = "logging")]
pub mod logging;

pub use config::{DEFAULT_ICONS_DIR, IgnoreFilename, KernIconsConfig};
pub use error::{KernIconsError, Result};
pub use hmr::{HMR_EVENT, HmrClient, HmrMessage, IconUpdatePayload};
pub use icon::{ICON_CLASS_PREFIX, IconRef, IconSet, IconStyle, extract_icons};
pub use module::{CSS_PLACEHOLDER, RESOLVED_VIRTUAL_MODULE_ID, VIRTUAL_MODULE_ID};
pub use registry::{IconRegistry, normalize_id};
pub use resolver::{ICON_COLOR_FALLBACK, ICON_COLOR_VAR, IconResolver};
pub use runtime::{PluginRuntime, Runtime, RuntimeError};

/// Rolldown plugin that builds the KERN icon stylesheet
///
/// One instance lives for the whole build session. The tracked files and the
/// current icon set are shared between clones, so the instance registered with
/// Rolldown and the one the dev server calls into for hot updates stay in sync.
#[derive(Clone, Debug)]
pub struct FobKernIconsPlugin {
    config: Arc<KernIconsConfig>,
    registry: Arc<IconRegistry>,
    resolver: IconResolver,
    runtime: Arc<dyn Runtime>,
}

impl FobKernIconsPlugin {
    /// Create a plugin with default options, reading files relative to `project_root`
    pub fn new(project_root: PathBuf) -> Self {
        Self::build(
            KernIconsConfig::default(),
            Arc::new(PluginRuntime::new(project_root)),
        )
    }

    /// Create a plugin with custom options
    ///
    /// Fails if the options cannot be embedded in the generated module.
    pub fn with_config(config: KernIconsConfig, project_root: PathBuf) -> Result<Self> {
        Self::with_runtime(config, Arc::new(PluginRuntime::new(project_root)))
    }

    /// Create a plugin that reads sources and assets through `runtime`
    pub fn with_runtime(config: KernIconsConfig, runtime: Arc<dyn Runtime>) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config, runtime))
    }

    fn build(config: KernIconsConfig, runtime: Arc<dyn Runtime>) -> Self {
        let resolver = IconResolver::new(Arc::clone(&runtime), config.icons_dir.clone());
        let config = Arc::new(config);
        Self {
            registry: Arc::new(IconRegistry::new(Arc::clone(&config))),
            config,
            resolver,
            runtime,
        }
    }

    pub fn config(&self) -> &KernIconsConfig {
        &self.config
    }

    pub fn registry(&self) -> &IconRegistry {
        &self.registry
    }

    /// Claim the virtual module specifier
    pub fn resolve_virtual_id(&self, specifier: &str) -> Option<&'static str> {
        (specifier == VIRTUAL_MODULE_ID).then_some(RESOLVED_VIRTUAL_MODULE_ID)
    }

    /// Template source of the virtual module
    pub fn virtual_module_source(&self) -> String {
        module::module_template(self.config.css_layer.as_deref())
    }

    /// Rebuild the current icon set and resolve a CSS rule for every icon
    pub async fn generate_rules(&self) -> Result<Vec<String>> {
        let icons = self.registry.rebuild_current_set(&*self.runtime).await?;
        let icons: Vec<IconRef> = icons.into_iter().collect();
        self.resolver.resolve_all(&icons).await
    }

    /// Splice the full stylesheet into the virtual module's source
    pub async fn render_virtual_module(&self, code: &str) -> Result<String> {
        let rules = self.generate_rules().await?;
        info!("[fob-kern-icons] Generated stylesheet with {} icons", rules.len());
        Ok(module::inject_rules(code, &rules))
    }

    /// Push rules for icons a changed file introduced
    ///
    /// Nothing is sent for files that aren't tracked. Otherwise the client
    /// always gets a message, even when no icon is new. Returns the rules sent.
    /// The current icon set is not updated; the next full rebuild does that.
    pub async fn handle_hot_update<C>(&self, file: &str, client: &C) -> Result<Option<Vec<String>>>
    where
        C: HmrClient + ?Sized,
    {
        if !self.registry.is_eligible(file) || !self.registry.is_tracked(file) {
            debug!("[fob-kern-icons] Ignoring change to untracked file: {}", file);
            return Ok(None);
        }

        let path = normalize_id(file);
        let text = registry::read_source(&*self.runtime, path).await?;
        let new_icons = self.registry.diff_on_change(&text);
        let rules = self.resolver.resolve_all(&new_icons).await?;

        debug!(
            "[fob-kern-icons] Pushing {} new icons from {}",
            rules.len(),
            path
        );

        client.send(&HmrMessage::icons(rules.clone())).await?;
        Ok(Some(rules))
    }
}

impl Default for FobKernIconsPlugin {
    fn default() -> Self {
        Self::new(PathBuf::from("."))
    }
}

impl Plugin for FobKernIconsPlugin {
    fn name(&self) -> Cow<'static, str> {
        "fob-kern-icons".into()
    }

    fn register_hook_usage(&self) -> HookUsage {
        HookUsage::ResolveId | HookUsage::Load | HookUsage::Transform
    }

    fn resolve_id(
        &self,
        _ctx: &PluginContext,
        args: &HookResolveIdArgs,
    ) -> impl std::future::Future<Output = HookResolveIdReturn> + Send {
        let specifier = args.specifier.to_string();
        let resolved = self.resolve_virtual_id(&specifier);

        async move {
            Ok(resolved.map(|id| HookResolveIdOutput {
                id: id.to_string().into(),
                ..Default::default()
            }))
        }
    }

    /// Serves the virtual module; every other id is only observed
    fn load(
        &self,
        _ctx: &PluginContext,
        args: &HookLoadArgs<'_>,
    ) -> impl std::future::Future<Output = HookLoadReturn> + Send {
        let id = args.id.to_string();
        let plugin = self.clone();

        async move {
            if id == RESOLVED_VIRTUAL_MODULE_ID {
                return Ok(Some(HookLoadOutput {
                    code: plugin.virtual_module_source().into(),
                    module_type: Some(ModuleType::Js),
                    ..Default::default()
                }));
            }

            plugin.registry.record_file(&id);
            Ok(None)
        }
    }

    fn transform(
        &self,
        _ctx: SharedTransformPluginContext,
        args: &HookTransformArgs<'_>,
    ) -> impl std::future::Future<Output = HookTransformReturn> + Send {
        let id = args.id.to_string();
        let code = args.code.to_string();
        let plugin = self.clone();

        async move {
            if id != RESOLVED_VIRTUAL_MODULE_ID {
                return Ok(None);
            }

            let rendered = plugin
                .render_virtual_module(&code)
                .await
                .with_context(|| format!("Failed to generate {}", VIRTUAL_MODULE_ID))?;

            Ok(Some(HookTransformOutput {
                code: Some(rendered),
                map: None,
                side_effects: None,
                module_type: None,
            }))
        }
    }
}
