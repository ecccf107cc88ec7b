//! The event logger.

use std::fmt;
use std::sync::Arc;

use crate::caller::{CallerLocation, CallerLookup};
use crate::config::{LogTarget, LoggerConfig};
use crate::record::{
    ALERT_NONE, EventPayload, LOG_TYPE_EVENT, LogLevel, LogRecord, LoggerIdentity, RecordData,
    TracingContext, now_timestamp,
};
use crate::sink::{EventSink, JsonSink};

/// Formats business events into fixed-shape records and hands them to a sink.
///
/// Logging never fails and never panics: an unknown level becomes `info`,
/// missing tracing ids become empty strings, an unresolvable caller is
/// omitted, and sink errors stay inside the sink.
pub struct EventLogger {
    identity: LoggerIdentity,
    min_level: LogLevel,
    caller_lookup: CallerLookup,
    sink: Arc<dyn EventSink>,
}

impl EventLogger {
    /// Create a logger writing JSON lines to the configured stream.
    #[must_use]
    pub fn new(config: LoggerConfig) -> Self {
        let sink: Arc<dyn EventSink> = match config.target {
            LogTarget::Stdout => Arc::new(JsonSink::stdout(config.level)),
            LogTarget::Stderr => Arc::new(JsonSink::stderr(config.level)),
        };
        Self::from_parts(config, sink)
    }

    /// Create a logger with a custom sink.
    ///
    /// Records below `config.level` are dropped before they reach the sink;
    /// the sink's own threshold applies on top.
    #[must_use]
    pub fn with_sink(config: LoggerConfig, sink: impl EventSink + 'static) -> Self {
        Self::from_parts(config, Arc::new(sink))
    }

    fn from_parts(config: LoggerConfig, sink: Arc<dyn EventSink>) -> Self {
        Self {
            identity: LoggerIdentity::new(config.app_name, config.version),
            min_level: config.level,
            caller_lookup: config.caller,
            sink,
        }
    }

    /// The identity stamped onto every record.
    #[must_use]
    pub fn identity(&self) -> &LoggerIdentity {
        &self.identity
    }

    /// Records below this level are not emitted.
    #[must_use]
    pub fn min_level(&self) -> LogLevel {
        self.min_level
    }

    /// Log one event.
    ///
    /// `level` accepts a [`LogLevel`] or a label; unrecognized labels are
    /// logged as `info`. Without a tracing context the record carries empty
    /// ids. Events below [`EventLogger::min_level`] are dropped.
    #[track_caller]
    pub fn log_event(
        &self,
        level: impl Into<LogLevel>,
        message: &str,
        event: EventPayload,
        tracing_context: Option<TracingContext>,
    ) {
        let level = level.into();
        if level < self.min_level {
            return;
        }

        let caller = self.caller_lookup.resolve();
        if caller.is_none() && self.caller_lookup != CallerLookup::Disabled {
            tracing::debug!(
                target: "event_log",
                lookup = ?self.caller_lookup,
                "caller location unavailable"
            );
        }

        let record = self.build_record(
            level,
            message,
            event,
            tracing_context,
            caller.as_ref(),
        );
        self.sink.emit(&record);
    }

    /// Log an event at `debug`.
    #[track_caller]
    pub fn debug(
        &self,
        message: &str,
        event: EventPayload,
        tracing_context: Option<TracingContext>,
    ) {
        self.log_event(LogLevel::Debug, message, event, tracing_context);
    }

    /// Log an event at `info`.
    #[track_caller]
    pub fn info(
        &self,
        message: &str,
        event: EventPayload,
        tracing_context: Option<TracingContext>,
    ) {
        self.log_event(LogLevel::Info, message, event, tracing_context);
    }

    /// Log an event at `warn`.
    #[track_caller]
    pub fn warn(
        &self,
        message: &str,
        event: EventPayload,
        tracing_context: Option<TracingContext>,
    ) {
        self.log_event(LogLevel::Warn, message, event, tracing_context);
    }

    /// Log an event at `error`.
    #[track_caller]
    pub fn error(
        &self,
        message: &str,
        event: EventPayload,
        tracing_context: Option<TracingContext>,
    ) {
        self.log_event(LogLevel::Error, message, event, tracing_context);
    }

    /// Assemble a record without emitting it.
    #[must_use]
    pub fn build_record(
        &self,
        level: LogLevel,
        message: &str,
        event: EventPayload,
        tracing_context: Option<TracingContext>,
        caller: Option<&CallerLocation>,
    ) -> LogRecord {
        LogRecord {
            level,
            alert: ALERT_NONE,
            timestamp: now_timestamp(),
            app_name: self.identity.app_name().to_string(),
            version: self.identity.version().to_string(),
            caller: caller.map(ToString::to_string),
            message: message.to_string(),
            log_type: LOG_TYPE_EVENT.to_string(),
            data: RecordData {
                tracing: tracing_context.unwrap_or_default(),
                event,
            },
        }
    }
}

impl fmt::Debug for EventLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventLogger")
            .field("identity", &self.identity)
            .field("min_level", &self.min_level)
            .field("caller_lookup", &self.caller_lookup)
            .finish_non_exhaustive()
    }
}
