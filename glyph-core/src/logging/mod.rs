//! Structured logging via `tracing`.
//!
//! Frontends call [`init_tracing`] once at startup. Output goes to stderr so a
//! terminal view can own stdout. `RUST_LOG` overrides the configured filter.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Once;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            other => Err(format!("unknown log level: {other}")),
        }
    }
}

/// Configuration for tracing initialization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TracingConfig {
    pub default_level: LogLevel,
    pub module_filters: Vec<(String, LogLevel)>,
    pub show_targets: bool,
    pub show_file_line: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            default_level: LogLevel::Warn,
            module_filters: vec![
                ("glyph_core::session".to_string(), LogLevel::Info),
                ("glyph_core::encounter".to_string(), LogLevel::Info),
                ("glyph_core::generation".to_string(), LogLevel::Warn),
            ],
            show_targets: true,
            show_file_line: false,
        }
    }
}

impl TracingConfig {
    /// Quiet everything except errors; used by full-screen frontends.
    pub fn quiet() -> Self {
        Self {
            default_level: LogLevel::Error,
            module_filters: Vec::new(),
            ..Default::default()
        }
    }

    pub fn with_level(level: LogLevel) -> Self {
        Self {
            default_level: level,
            module_filters: Vec::new(),
            ..Default::default()
        }
    }

    pub fn to_env_filter_string(&self) -> String {
        let mut parts = vec![self.default_level.as_str().to_string()];
        for (module, level) in &self.module_filters {
            parts.push(format!("{}={}", module, level.as_str()));
        }
        parts.join(",")
    }
}

static TRACING_INIT: Once = Once::new();

/// Initialize tracing (idempotent, first call wins)
pub fn init_tracing(config: &TracingConfig) {
    let filter_str = config.to_env_filter_string();
    let show_targets = config.show_targets;
    let show_file_line = config.show_file_line;
    TRACING_INIT.call_once(move || {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&filter_str));

        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(show_targets)
            .with_file(show_file_line)
            .with_line_number(show_file_line)
            .compact();

        // Another subscriber may already be installed (tests, embedding apps)
        let _ = subscriber.try_init();
    });
}

pub fn init_tracing_default() {
    init_tracing(&TracingConfig::default());
}
