//! Prelude module - commonly used types for convenient import.
//!
//! Use `use event_log::prelude::*;` to import all essential types.
//!
//! # Example
//!
//! ```rust,no_run
//! use event_log::prelude::*;
//!
//! let logger = EventLogger::new(LoggerConfig::new("orders", "1.4.2").with_level(LogLevel::Debug));
//! let ctx = TracingContext::generate();
//!
//! logger.debug(
//!     "order created",
//!     EventPayload::new("order", "create", "success", "O-123"),
//!     Some(ctx.child_span()),
//! );
//! ```

// Errors
pub use crate::{EventLogError, EventLogResult};

// Configuration
pub use crate::{CallerLookup, FrameSkip, LogTarget, LoggerConfig};

// Logger and record model
pub use crate::{EventLogger, EventPayload, LogLevel, LogRecord, TracingContext};

// Sinks
pub use crate::{EventSink, JsonSink, MemorySink, TracingSink};
