//! Event Log - Fixed-schema structured event logging.
//!
//! This crate provides:
//! - An [`EventLogger`] that turns business events into fixed-shape JSON records
//! - Caller location (`directory/file:line`) from compiler tracking or a backtrace
//! - Tracing correlation ids carried in every record
//! - Sinks for JSON lines, the `tracing` ecosystem, and in-memory capture
//!
//! Every record has the same shape:
//!
//! ```text
//! {"level":"info","alert":0,"timestamp":"2024-01-15T10:30:00.123Z",
//!  "app_name":"orders","version":"1.4.2","caller":"src/main.rs:18",
//!  "message":"order created","log_type":"event",
//!  "data":{"tracing":{"tracing_id":"","span_id":"","request_id":""},
//!          "event":{"entity":"order","action":"create","result":"success",
//!                   "reference_id":"O-123","data":"{}"}}}
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use event_log::{EventLogger, EventPayload, LogLevel, LoggerConfig, TracingContext};
//!
//! let logger = EventLogger::new(LoggerConfig::new("orders", "1.4.2"));
//!
//! let event = EventPayload::new("order", "create", "success", "O-123").with_data("{}");
//! logger.log_event(LogLevel::Info, "order created", event, None);
//!
//! // Labels work too; anything unrecognized is logged as info
//! let ctx = TracingContext::new("t1", "s1", "r1");
//! let event = EventPayload::new("order", "pay", "failed", "O-123");
//! logger.log_event("error", "payment declined", event, Some(ctx));
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

mod caller;
mod config;
mod error;
mod logger;
mod record;
mod sink;

pub use caller::{
    CallerLocation, CallerLookup, FrameSkip, StackFrame, parse_backtrace, select_caller,
};
pub use config::{LogTarget, LoggerConfig};
pub use error::{EventLogError, EventLogResult};
pub use logger::EventLogger;
pub use record::{
    ALERT_NONE, EventPayload, LOG_TYPE_EVENT, LogLevel, LogRecord, LoggerIdentity, RecordData,
    TracingContext,
};
pub use sink::{EventSink, JsonSink, MemorySink, RECORD_TARGET, TracingSink};
