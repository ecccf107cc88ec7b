//! Record model: levels, correlation ids, event payloads and the emitted record.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::{EventLogError, EventLogResult};

/// Value of the `alert` field on every record.
pub const ALERT_NONE: u8 = 0;

/// Value of the `log_type` field on every record.
pub const LOG_TYPE_EVENT: &str = "event";

/// Severity of an event record.
///
/// Variants are ordered by severity, so `LogLevel::Debug < LogLevel::Error`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Diagnostic detail.
    Debug,
    /// Normal operation (default).
    #[default]
    Info,
    /// Something unexpected that did not stop the operation.
    Warn,
    /// A failed operation.
    Error,
}

impl LogLevel {
    /// All levels, least severe first.
    pub const ALL: [LogLevel; 4] = [Self::Debug, Self::Info, Self::Warn, Self::Error];

    /// The label written into the `level` field.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }

    /// Parse a level label, falling back to [`LogLevel::Info`] for anything
    /// unrecognized.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        label.parse().unwrap_or_default()
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = EventLogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let label = s.trim();
        Self::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(label))
            .ok_or_else(|| EventLogError::UnknownLevel(s.to_string()))
    }
}

impl From<&str> for LogLevel {
    fn from(label: &str) -> Self {
        Self::from_label(label)
    }
}

impl From<String> for LogLevel {
    fn from(label: String) -> Self {
        Self::from_label(&label)
    }
}

/// Application identity stamped onto every record.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LoggerIdentity {
    app_name: String,
    version: String,
}

impl LoggerIdentity {
    /// Create an identity.
    #[must_use]
    pub fn new(app_name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
            version: version.into(),
        }
    }

    /// Application name, written as `app_name`.
    #[must_use]
    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    /// Application version, written as `version`.
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }
}

/// Distributed-tracing correlation ids.
///
/// The default value is the empty-string triple, which is what records carry
/// when the caller supplies no context.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TracingContext {
    /// Trace identifier shared by every span of a request.
    pub tracing_id: String,
    /// Identifier of the current span.
    pub span_id: String,
    /// Identifier of the originating request.
    pub request_id: String,
}

impl TracingContext {
    /// Create a context from existing ids.
    #[must_use]
    pub fn new(
        tracing_id: impl Into<String>,
        span_id: impl Into<String>,
        request_id: impl Into<String>,
    ) -> Self {
        Self {
            tracing_id: tracing_id.into(),
            span_id: span_id.into(),
            request_id: request_id.into(),
        }
    }

    /// Create a root context with freshly generated ids.
    #[must_use]
    pub fn generate() -> Self {
        Self::new(
            Uuid::new_v4().to_string(),
            Uuid::new_v4().to_string(),
            Uuid::new_v4().to_string(),
        )
    }

    /// Create a context for a child span: same trace and request, new span id.
    #[must_use]
    pub fn child_span(&self) -> Self {
        Self {
            tracing_id: self.tracing_id.clone(),
            span_id: Uuid::new_v4().to_string(),
            request_id: self.request_id.clone(),
        }
    }

    /// Whether all three ids are empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tracing_id.is_empty() && self.span_id.is_empty() && self.request_id.is_empty()
    }
}

/// Business event fields, passed through to the record verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventPayload {
    /// Kind of entity the event concerns (e.g. `order`).
    pub entity: String,
    /// What happened to it (e.g. `create`).
    pub action: String,
    /// Outcome (e.g. `success`).
    pub result: String,
    /// Identifier of the entity instance.
    pub reference_id: String,
    /// Free-form data, usually a JSON document encoded as a string.
    pub data: String,
}

impl EventPayload {
    /// Create a payload with empty `data`.
    #[must_use]
    pub fn new(
        entity: impl Into<String>,
        action: impl Into<String>,
        result: impl Into<String>,
        reference_id: impl Into<String>,
    ) -> Self {
        Self {
            entity: entity.into(),
            action: action.into(),
            result: result.into(),
            reference_id: reference_id.into(),
            data: String::new(),
        }
    }

    /// Set the `data` string.
    #[must_use]
    pub fn with_data(mut self, data: impl Into<String>) -> Self {
        self.data = data.into();
        self
    }

    /// Set `data` to the JSON encoding of `value`.
    ///
    /// # Errors
    ///
    /// Returns an error if `value` cannot be serialized.
    pub fn with_json_data<T: Serialize + ?Sized>(mut self, value: &T) -> EventLogResult<Self> {
        self.data = serde_json::to_string(value)?;
        Ok(self)
    }
}

/// The `data` object of a record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordData {
    /// Correlation ids.
    pub tracing: TracingContext,
    /// Business event fields.
    pub event: EventPayload,
}

/// One structured record, as handed to a sink.
///
/// Field order matches the serialized JSON line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRecord {
    /// Severity label.
    pub level: LogLevel,
    /// Always [`ALERT_NONE`].
    pub alert: u8,
    /// ISO-8601 UTC timestamp with millisecond precision.
    pub timestamp: String,
    /// Application name from the logger identity.
    pub app_name: String,
    /// Application version from the logger identity.
    pub version: String,
    /// `directory/file:line` of the call site, omitted when unknown.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caller: Option<String>,
    /// Free-form message.
    pub message: String,
    /// Always [`LOG_TYPE_EVENT`].
    pub log_type: String,
    /// Tracing and event fields.
    pub data: RecordData,
}

/// Current UTC time as `YYYY-MM-DDTHH:MM:SS.mmmZ`.
pub(crate) fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
