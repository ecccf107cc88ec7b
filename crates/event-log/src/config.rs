//! Logger configuration.

use serde::{Deserialize, Serialize};

use crate::caller::CallerLookup;
use crate::record::{LogLevel, LoggerIdentity};

/// Output stream for the default JSON sink.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogTarget {
    /// Log to stdout (default).
    #[default]
    Stdout,
    /// Log to stderr.
    Stderr,
}

/// Event logger configuration.
///
/// Deserializes from `snake_case` keys; `appName` is accepted as an alias for
/// `app_name`. Unknown level labels are rejected here, unlike in
/// [`EventLogger::log_event`](crate::EventLogger::log_event).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggerConfig {
    /// Application name written into every record.
    #[serde(alias = "appName")]
    pub app_name: String,
    /// Application version written into every record.
    pub version: String,
    /// Minimum severity the default sink writes.
    #[serde(default)]
    pub level: LogLevel,
    /// Output stream of the default sink.
    #[serde(default)]
    pub target: LogTarget,
    /// How the `caller` field is resolved.
    #[serde(default)]
    pub caller: CallerLookup,
}

impl LoggerConfig {
    /// Create a config with the default level, target and caller lookup.
    #[must_use]
    pub fn new(app_name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
            version: version.into(),
            level: LogLevel::default(),
            target: LogTarget::default(),
            caller: CallerLookup::default(),
        }
    }

    /// Set the minimum severity.
    #[must_use]
    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    /// Set the output stream.
    #[must_use]
    pub fn with_target(mut self, target: LogTarget) -> Self {
        self.target = target;
        self
    }

    /// Set the caller lookup strategy.
    #[must_use]
    pub fn with_caller_lookup(mut self, caller: CallerLookup) -> Self {
        self.caller = caller;
        self
    }

    /// The identity records will carry.
    #[must_use]
    pub fn identity(&self) -> LoggerIdentity {
        LoggerIdentity::new(self.app_name.clone(), self.version.clone())
    }
}
