use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// How the server reports what it does: resolved GraphQL parameters, discarded
/// executor errors and unreadable request bodies all go through `tracing`.
#[derive(Debug, Deserialize, Serialize, JsonSchema, Default)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Most verbose level that gets written. Request resolution details are only
    /// visible at `trace`.
    ///
    /// Overridden by `LOG_LEVEL`.
    #[serde(default)]
    pub level: LogLevel,

    /// Layout of every written line.
    ///
    /// Overridden by `LOG_FORMAT`.
    #[serde(default)]
    pub format: LogFormat,

    /// A `tracing` filter directive (for example `graphql_handler=trace,info`), takes
    /// precedence over `level`.
    ///
    /// Overridden by `LOG_FILTER`.
    #[serde(default)]
    pub filter: Option<String>,
}

impl LoggingConfig {
    /// Directive handed to the `EnvFilter` of the subscriber.
    pub fn env_filter_str(&self) -> &str {
        self.filter.as_deref().unwrap_or(self.level.as_str())
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    const ALL: [LogLevel; 5] = [
        LogLevel::Trace,
        LogLevel::Debug,
        LogLevel::Info,
        LogLevel::Warn,
        LogLevel::Error,
    ];

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

/// `debug` for development builds, `info` for release builds.
impl Default for LogLevel {
    fn default() -> Self {
        if cfg!(debug_assertions) {
            LogLevel::Debug
        } else {
            LogLevel::Info
        }
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LogLevel::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("Unknown log level '{}'", s))
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, JsonSchema, PartialEq)]
pub enum LogFormat {
    /// Nested spans, rendered with `tracing-tree`.
    #[serde(rename = "pretty-tree")]
    PrettyTree,
    /// One human readable line per event.
    #[serde(rename = "pretty-compact")]
    PrettyCompact,
    /// One JSON object per event.
    #[serde(rename = "json")]
    Json,
}

impl LogFormat {
    const ALL: [LogFormat; 3] = [LogFormat::PrettyTree, LogFormat::PrettyCompact, LogFormat::Json];

    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::PrettyTree => "pretty-tree",
            LogFormat::PrettyCompact => "pretty-compact",
            LogFormat::Json => "json",
        }
    }
}

/// Human readable lines for development builds, JSON for release builds.
impl Default for LogFormat {
    fn default() -> Self {
        if cfg!(debug_assertions) {
            LogFormat::PrettyCompact
        } else {
            LogFormat::Json
        }
    }
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LogFormat::ALL
            .into_iter()
            .find(|format| format.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("Unknown log format '{}'", s))
    }
}
