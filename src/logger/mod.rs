//! Logger Module - file + console logging on `tracing`
//!
//! - `format`: the single-line [`LineFormatter`] and [`LineFields`]
//! - `rotate`: size-based [`RotatingFile`] writer
//!
//! [`init_logger`] installs both as the global subscriber. Per-request
//! fields ride on spans: enter [`RequestContext::span`] and every event
//! inside it carries `trace_id` and `user_id`.

mod format;
mod rotate;

pub use format::{LineFields, LineFormatter};
pub use rotate::{RotatingFile, RotatingWriter};

use serde::{Deserialize, Serialize};
use tracing::Span;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer, Registry};

use crate::error::{KitError, Result};
use crate::idutil;

pub const DEFAULT_APP_NAME: &str = "myapp";

/// Console output style
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsoleFormat {
    /// tracing-subscriber's default human-readable output
    #[default]
    Development,
    /// Same single-line layout as the log file
    Line,
}

/// Logger settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub file_dir: String,
    /// Rotate once the live file reaches this size
    pub max_size_mb: u64,
    /// Rotated files to keep
    pub max_backups: usize,
    /// `EnvFilter` directive, e.g. `info` or `kitbag=debug,warn`
    pub level: String,
    pub enable_console: bool,
    pub app_name: String,
    pub console_format: ConsoleFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            file_dir: "logs".to_string(),
            max_size_mb: 100,
            max_backups: 30,
            level: "info".to_string(),
            enable_console: true,
            app_name: DEFAULT_APP_NAME.to_string(),
            console_format: ConsoleFormat::Development,
        }
    }
}

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Install the global subscriber: rotating file in line format, plus an
/// optional console layer. Fails if a global subscriber is already set.
pub fn init_logger(config: &LogConfig) -> Result<()> {
    let filter = EnvFilter::try_new(&config.level).map_err(|e| KitError::Logger {
        reason: format!("invalid level '{}': {e}", config.level),
    })?;

    let file = RotatingFile::for_app(
        &config.file_dir,
        &config.app_name,
        config.max_size_mb,
        config.max_backups,
    )?;

    let mut layers: Vec<BoxedLayer> = vec![fmt::layer()
        .event_format(LineFormatter::new(&config.app_name))
        .fmt_fields(LineFields)
        .with_ansi(false)
        .with_writer(file)
        .boxed()];

    if config.enable_console {
        let console = match config.console_format {
            ConsoleFormat::Development => fmt::layer().with_writer(std::io::stdout).boxed(),
            ConsoleFormat::Line => fmt::layer()
                .event_format(LineFormatter::new(&config.app_name))
                .fmt_fields(LineFields)
                .with_writer(std::io::stdout)
                .boxed(),
        };
        layers.push(console);
    }

    tracing_subscriber::registry()
        .with(layers)
        .with(filter)
        .try_init()
        .map_err(|e| KitError::Logger {
            reason: e.to_string(),
        })?;

    tracing::debug!(dir = %config.file_dir, app = %config.app_name, "logger initialized");
    Ok(())
}

/// Per-request identifiers attached to log lines through a span
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestContext {
    pub trace_id: String,
    pub user_id: String,
}

impl RequestContext {
    pub fn new(trace_id: impl Into<String>) -> Self {
        Self {
            trace_id: trace_id.into(),
            user_id: String::new(),
        }
    }

    /// Context with a fresh random trace id
    pub fn generate() -> Self {
        Self::new(idutil::nano_id())
    }

    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = user_id.into();
        self
    }

    /// `request` span carrying `trace_id` and `user_id`
    pub fn span(&self) -> Span {
        tracing::info_span!("request", trace_id = %self.trace_id, user_id = %self.user_id)
    }
}
