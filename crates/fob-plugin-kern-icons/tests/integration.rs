//! Integration tests for fob-plugin-kern-icons
//!
//! These tests lay out a small project on disk (sources plus a fake icon
//! collection) and drive the plugin through Rolldown's hooks and the hot
//! update entry point.

use fob_plugin_kern_icons::{
    FobKernIconsPlugin, IconRef, IconStyle, KernIconsConfig, KernIconsError,
    RESOLVED_VIRTUAL_MODULE_ID,
};
use rolldown_plugin::{HookLoadArgs, Plugin, PluginContext};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tokio::sync::mpsc;

const ICONS_DIR: &str = "node_modules/@material-symbols/svg-400/rounded";

fn svg(path_data: &str) -> String {
    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" height="48" viewBox="0 -960 960 960" width="48"><path d="{}"/></svg>"#,
        path_data
    )
}

/// Temporary project with an icon collection containing `icons`
fn create_project(icons: &[&str]) -> TempDir {
    let dir = TempDir::new().unwrap();
    let icons_dir = dir.path().join(ICONS_DIR);
    fs::create_dir_all(&icons_dir).unwrap();
    for icon in icons {
        fs::write(icons_dir.join(format!("{}.svg", icon)), svg(icon)).unwrap();
    }
    fs::create_dir_all(dir.path().join("src")).unwrap();
    dir
}

fn write_source(dir: &TempDir, name: &str, content: &str) -> String {
    let path = dir.path().join("src").join(name);
    fs::write(&path, content).expect("Failed to write test file");
    path.to_str().unwrap().to_string()
}

fn plugin_for(dir: &TempDir, config: KernIconsConfig) -> FobKernIconsPlugin {
    FobKernIconsPlugin::with_config(config, dir.path().to_path_buf()).unwrap()
}

/// Run the `load` hook the way Rolldown would
async fn load(plugin: &FobKernIconsPlugin, id: &str) -> Option<String> {
    let ctx = PluginContext::new_napi_context();
    let args = HookLoadArgs { id };
    plugin
        .load(&ctx, &args)
        .await
        .unwrap()
        .map(|output| output.code.to_string())
}

/// Load and render the virtual module
async fn build_stylesheet(plugin: &FobKernIconsPlugin) -> Result<String, KernIconsError> {
    let template = load(plugin, RESOLVED_VIRTUAL_MODULE_ID)
        .await
        .expect("virtual module should be served");
    plugin.render_virtual_module(&template).await
}

#[tokio::test]
async fn test_full_build_embeds_used_icons() {
    let dir = create_project(&["home", "star-fill", "unused"]);
    let app = write_source(
        &dir,
        "App.vue",
        r#"<template><i class="kern-icon--home" /><i class="kern-icon-fill--star" /></template>"#,
    );
    let main = write_source(&dir, "main.ts", "document.body.className = 'kern-icon--home'");

    let plugin = plugin_for(&dir, KernIconsConfig::default());
    assert!(load(&plugin, &app).await.is_none());
    assert!(load(&plugin, &format!("{}?t=123", main)).await.is_none());
    assert_eq!(plugin.registry().tracked_files().len(), 2);

    let code = build_stylesheet(&plugin).await.unwrap();

    assert!(code.starts_with("const sheet = new CSSStyleSheet()"));
    assert!(code.contains(".kern-icon--home {"));
    assert!(code.contains(".kern-icon-fill--star {"));
    assert!(!code.contains("kern-icon--unused"));
    assert!(!code.contains("import.meta.kernExtraIcons"));
    assert!(code.contains("data:image/svg+xml;base64,"));

    let current = plugin.registry().current_icons();
    assert_eq!(current.len(), 2);
    assert!(current.contains(&IconRef::new("star", Some(IconStyle::Fill))));
}

#[tokio::test]
async fn test_css_layer_wraps_rules() {
    let dir = create_project(&["home"]);
    let app = write_source(&dir, "App.vue", "kern-icon--home");

    let plugin = plugin_for(&dir, KernIconsConfig::new().with_css_layer("kern"));
    load(&plugin, &app).await;

    let code = build_stylesheet(&plugin).await.unwrap();
    assert!(code.contains("sheet.replaceSync(`@layer kern {\n\t${\".kern-icon--home {"));
}

#[tokio::test]
async fn test_ineligible_files_are_not_scanned() {
    let dir = create_project(&["home"]);
    let json = write_source(&dir, "icons.json", r#"{ "icon": "kern-icon--nope" }"#);
    let ignored = write_source(&dir, "Demo.stories.ts", "kern-icon--nope");
    let app = write_source(&dir, "App.vue", "kern-icon--home");

    let config = KernIconsConfig::new().with_ignore_filename(|id| id.contains(".stories."));
    let plugin = plugin_for(&dir, config);
    for id in [&json, &ignored, &app] {
        load(&plugin, id).await;
    }
    load(&plugin, "\0some-other-virtual").await;

    assert_eq!(plugin.registry().tracked_files(), vec![app]);

    // Would fail with a missing asset if either ineligible file had been scanned
    let code = build_stylesheet(&plugin).await.unwrap();
    assert!(code.contains(".kern-icon--home"));
}

#[tokio::test]
async fn test_missing_asset_fails_the_build() {
    let dir = create_project(&["home"]);
    let app = write_source(&dir, "App.vue", "kern-icon--home kern-icon--not-an-icon");

    let plugin = plugin_for(&dir, KernIconsConfig::default());
    load(&plugin, &app).await;

    let err = build_stylesheet(&plugin).await.unwrap_err();
    match err {
        KernIconsError::MissingAsset { icon, path } => {
            assert_eq!(icon, "kern-icon--not-an-icon");
            assert!(path.ends_with("not_an_icon.svg"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_hot_update_pushes_only_new_icons() {
    let dir = create_project(&["home", "star-fill"]);
    let app = write_source(&dir, "App.vue", "kern-icon--home");

    let plugin = plugin_for(&dir, KernIconsConfig::default());
    load(&plugin, &app).await;
    build_stylesheet(&plugin).await.unwrap();

    write_source(&dir, "App.vue", "kern-icon--home kern-icon-fill--star");

    let (tx, mut rx) = mpsc::channel(8);
    let sent = plugin.handle_hot_update(&app, &tx).await.unwrap().unwrap();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].starts_with(".kern-icon-fill--star {"));

    let message: serde_json::Value = serde_json::from_str(&rx.recv().await.unwrap()).unwrap();
    assert_eq!(message["type"], "custom");
    assert_eq!(message["event"], "kern-extra-icons");
    assert_eq!(message["data"]["icons"], serde_json::json!(sent));

    // The current set only changes on a full rebuild
    let current: Vec<_> = plugin.registry().current_icons().into_iter().collect();
    assert_eq!(current, vec![IconRef::new("home", None)]);

    build_stylesheet(&plugin).await.unwrap();
    assert_eq!(plugin.registry().current_icons().len(), 2);
}

#[tokio::test]
async fn test_hot_update_without_new_icons_still_notifies() {
    let dir = create_project(&["home"]);
    let app = write_source(&dir, "App.vue", "kern-icon--home");

    let plugin = plugin_for(&dir, KernIconsConfig::default());
    load(&plugin, &app).await;
    build_stylesheet(&plugin).await.unwrap();

    let (tx, mut rx) = mpsc::channel(8);
    let sent = plugin
        .handle_hot_update(&format!("{}?t=1", app), &tx)
        .await
        .unwrap();
    assert_eq!(sent, Some(Vec::new()));

    let message: serde_json::Value = serde_json::from_str(&rx.recv().await.unwrap()).unwrap();
    assert_eq!(message["data"]["icons"], serde_json::json!([]));
}

#[tokio::test]
async fn test_hot_update_ignores_untracked_files() {
    let dir = create_project(&["home"]);
    let never_loaded = write_source(&dir, "Later.vue", "kern-icon--home");
    let data = write_source(&dir, "data.json", "kern-icon--home");

    let plugin = plugin_for(&dir, KernIconsConfig::default());
    let (tx, mut rx) = mpsc::channel(8);

    assert_eq!(plugin.handle_hot_update(&never_loaded, &tx).await.unwrap(), None);
    assert_eq!(plugin.handle_hot_update(&data, &tx).await.unwrap(), None);
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn test_failed_hot_update_sends_nothing() {
    let dir = create_project(&["home"]);
    let app = write_source(&dir, "App.vue", "kern-icon--home");

    let plugin = plugin_for(&dir, KernIconsConfig::default());
    load(&plugin, &app).await;
    build_stylesheet(&plugin).await.unwrap();

    write_source(&dir, "App.vue", "kern-icon--home kern-icon--add kern-icon--missing");

    let (tx, mut rx) = mpsc::channel(8);
    let err = plugin.handle_hot_update(&app, &tx).await.unwrap_err();
    assert!(matches!(err, KernIconsError::MissingAsset { .. }));
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn test_custom_icons_dir() {
    let dir = create_project(&[]);
    let custom: PathBuf = dir.path().join("assets/icons");
    fs::create_dir_all(&custom).unwrap();
    fs::write(custom.join("arrow_back.svg"), svg("M1")).unwrap();
    let app = write_source(&dir, "App.vue", "kern-icon--arrow-back");

    let plugin = plugin_for(&dir, KernIconsConfig::new().with_icons_dir(Path::new("assets/icons")));
    load(&plugin, &app).await;

    let code = build_stylesheet(&plugin).await.unwrap();
    assert!(code.contains(".kern-icon--arrow-back {"));
}
