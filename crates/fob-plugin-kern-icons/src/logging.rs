//! Logging setup for hosts that don't install their own subscriber
//!
//! This module is only available with the `logging` feature. Without it the
//! plugin only emits `tracing` events.

use std::sync::Once;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

static INIT: Once = Once::new();

/// Environment variable read by [`init_logging_from_env`]
pub const LOG_ENV_VAR: &str = "FOB_KERN_ICONS_LOG";

const TARGET: &str = "fob_plugin_kern_icons";

/// Verbosity of the plugin's own events
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogLevel {
    Silent,
    Error,
    Warn,
    #[default]
    Info,
    /// Includes every tracked file and rebuild
    Debug,
}

impl LogLevel {
    fn as_filter(&self) -> &'static str {
        match self {
            LogLevel::Silent => "off",
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
        }
    }

    fn directive(&self) -> String {
        format!("{}={}", TARGET, self.as_filter())
    }
}

impl std::str::FromStr for LogLevel {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "silent" | "off" => Ok(LogLevel::Silent),
            "error" => Ok(LogLevel::Error),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" | "trace" => Ok(LogLevel::Debug),
            other => Err(format!("Invalid log level: {}", other)),
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_filter())
    }
}

fn install(filter: EnvFilter) {
    // A host may already have set a global subscriber
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_target(false).without_time())
        .try_init();
}

/// Install a global subscriber showing the plugin's events at `level`
///
/// Only the first call in a process takes effect.
pub fn init_logging(level: LogLevel) {
    INIT.call_once(|| install(EnvFilter::new(level.directive())));
}

/// Install a global subscriber configured from `FOB_KERN_ICONS_LOG`
///
/// Accepts full `EnvFilter` syntax; falls back to Info for this crate when
/// the variable is unset or invalid.
pub fn init_logging_from_env() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
            .unwrap_or_else(|_| EnvFilter::new(LogLevel::Info.directive()));
        install(filter);
    });
}
