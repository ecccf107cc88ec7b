//! Record sinks.
//!
//! A sink receives finished [`LogRecord`]s, applies its minimum severity and
//! writes them somewhere. Sinks never fail towards the logger: write errors
//! are reported through `tracing` under the `event_log` target and dropped.

use std::io::{self, Write};
use std::sync::{Arc, Mutex, PoisonError};
use tracing_subscriber::fmt::MakeWriter;

use crate::error::EventLogResult;
use crate::record::{LogLevel, LogRecord};

/// Target of the `tracing` events emitted by [`TracingSink`].
pub const RECORD_TARGET: &str = "event_log::record";

/// Destination for event records.
///
/// Implementations must be safe to call from several threads at once.
pub trait EventSink: Send + Sync {
    /// Write one record, or drop it if it is below the sink's threshold.
    fn emit(&self, record: &LogRecord);
}

impl<S: EventSink + ?Sized> EventSink for Arc<S> {
    fn emit(&self, record: &LogRecord) {
        (**self).emit(record);
    }
}

impl<S: EventSink + ?Sized> EventSink for Box<S> {
    fn emit(&self, record: &LogRecord) {
        (**self).emit(record);
    }
}

/// Writes each record as one JSON line.
///
/// The level is written as its label and no timestamp is added; the record
/// already carries one.
#[derive(Debug)]
pub struct JsonSink<W> {
    make_writer: W,
    min_level: LogLevel,
}

impl JsonSink<fn() -> io::Stdout> {
    /// JSON lines on stdout.
    #[must_use]
    pub fn stdout(min_level: LogLevel) -> Self {
        Self::new(io::stdout, min_level)
    }
}

impl JsonSink<fn() -> io::Stderr> {
    /// JSON lines on stderr.
    #[must_use]
    pub fn stderr(min_level: LogLevel) -> Self {
        Self::new(io::stderr, min_level)
    }
}

impl<W> JsonSink<W>
where
    W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    /// JSON lines on any writer.
    #[must_use]
    pub fn new(make_writer: W, min_level: LogLevel) -> Self {
        Self {
            make_writer,
            min_level,
        }
    }

    /// Records below this level are dropped.
    #[must_use]
    pub fn min_level(&self) -> LogLevel {
        self.min_level
    }

    /// Write one record, returning any serialization or IO error.
    ///
    /// The whole line goes out in a single `write_all`, so concurrent records
    /// do not interleave.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be serialized or written.
    pub fn try_emit(&self, record: &LogRecord) -> EventLogResult<()> {
        if record.level < self.min_level {
            return Ok(());
        }

        let mut line = serde_json::to_vec(record)?;
        line.push(b'\n');

        let mut writer = self.make_writer.make_writer();
        writer.write_all(&line)?;
        writer.flush()?;
        Ok(())
    }
}

impl<W> EventSink for JsonSink<W>
where
    W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    fn emit(&self, record: &LogRecord) {
        if let Err(e) = self.try_emit(record) {
            tracing::warn!(target: "event_log", error = %e, "failed to write event record");
        }
    }
}

/// Forwards records into the `tracing` ecosystem.
///
/// Each record becomes one event at the matching `tracing` level, with target
/// [`RECORD_TARGET`], the record's message as the event message and the full
/// JSON record in the `record` field.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink {
    min_level: LogLevel,
}

impl TracingSink {
    /// Create a sink with the given threshold.
    #[must_use]
    pub fn new(min_level: LogLevel) -> Self {
        Self { min_level }
    }
}

impl EventSink for TracingSink {
    fn emit(&self, record: &LogRecord) {
        if record.level < self.min_level {
            return;
        }

        let json = match serde_json::to_string(record) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!(target: "event_log", error = %e, "failed to serialize event record");
                return;
            },
        };

        let message = record.message.as_str();
        match record.level {
            LogLevel::Debug => tracing::debug!(target: RECORD_TARGET, record = %json, "{message}"),
            LogLevel::Info => tracing::info!(target: RECORD_TARGET, record = %json, "{message}"),
            LogLevel::Warn => tracing::warn!(target: RECORD_TARGET, record = %json, "{message}"),
            LogLevel::Error => tracing::error!(target: RECORD_TARGET, record = %json, "{message}"),
        }
    }
}

/// Keeps records in memory. Intended for tests.
#[derive(Debug)]
pub struct MemorySink {
    records: Mutex<Vec<LogRecord>>,
    min_level: LogLevel,
}

impl MemorySink {
    /// Capture every record.
    #[must_use]
    pub fn new() -> Self {
        Self::with_min_level(LogLevel::Debug)
    }

    /// Capture records at or above `min_level`.
    #[must_use]
    pub fn with_min_level(min_level: LogLevel) -> Self {
        Self {
            records: Mutex::new(Vec::new()),
            min_level,
        }
    }

    /// Copy of the captured records, oldest first.
    #[must_use]
    pub fn records(&self) -> Vec<LogRecord> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Remove and return the captured records.
    pub fn take(&self) -> Vec<LogRecord> {
        std::mem::take(&mut *self.records.lock().unwrap_or_else(PoisonError::into_inner))
    }

    /// Number of captured records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether nothing has been captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MemorySink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for MemorySink {
    fn emit(&self, record: &LogRecord) {
        if record.level < self.min_level {
            return;
        }
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(record.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{EventPayload, LOG_TYPE_EVENT, RecordData, TracingContext};

    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl SharedBuffer {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for SharedBuffer {
        type Writer = SharedBuffer;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn record(level: LogLevel, message: &str) -> LogRecord {
        LogRecord {
            level,
            alert: 0,
            timestamp: "2024-01-15T10:30:00.123Z".to_string(),
            app_name: "orders".to_string(),
            version: "1.0.0".to_string(),
            caller: None,
            message: message.to_string(),
            log_type: LOG_TYPE_EVENT.to_string(),
            data: RecordData {
                tracing: TracingContext::default(),
                event: EventPayload::new("order", "create", "success", "O-1"),
            },
        }
    }

    #[test]
    fn test_json_sink_writes_one_line_per_record() {
        let buffer = SharedBuffer::default();
        let sink = JsonSink::new(buffer.clone(), LogLevel::Info);

        sink.emit(&record(LogLevel::Info, "first"));
        sink.emit(&record(LogLevel::Error, "second"));

        let output = buffer.contents();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with(r#"{"level":"info","alert":0,"timestamp":"#));
        assert!(lines[1].contains(r#""message":"second""#));
        assert!(!lines[0].contains("caller"));
    }

    #[test]
    fn test_json_sink_drops_below_threshold() {
        let buffer = SharedBuffer::default();
        let sink = JsonSink::new(buffer.clone(), LogLevel::Warn);
        assert_eq!(sink.min_level(), LogLevel::Warn);

        sink.emit(&record(LogLevel::Debug, "debug"));
        sink.emit(&record(LogLevel::Info, "info"));
        sink.emit(&record(LogLevel::Warn, "warn"));

        let output = buffer.contents();
        assert_eq!(output.lines().count(), 1);
        assert!(output.contains(r#""level":"warn""#));
    }

    #[test]
    fn test_json_sink_write_error() {
        let sink = JsonSink::new(|| FailingWriter, LogLevel::Info);

        let err = sink.try_emit(&record(LogLevel::Info, "lost")).unwrap_err();
        assert!(matches!(err, crate::EventLogError::Io(_)));

        // emit swallows the same failure
        sink.emit(&record(LogLevel::Info, "lost"));
    }

    #[test]
    fn test_memory_sink() {
        let sink = MemorySink::with_min_level(LogLevel::Info);
        assert!(sink.is_empty());

        sink.emit(&record(LogLevel::Debug, "dropped"));
        sink.emit(&record(LogLevel::Info, "kept"));
        assert_eq!(sink.len(), 1);
        assert_eq!(sink.records()[0].message, "kept");

        let taken = sink.take();
        assert_eq!(taken.len(), 1);
        assert!(sink.is_empty());
    }

    #[test]
    fn test_shared_sink() {
        let sink = Arc::new(MemorySink::new());
        let shared: Box<dyn EventSink> = Box::new(Arc::clone(&sink));

        shared.emit(&record(LogLevel::Debug, "through the box"));
        assert_eq!(sink.len(), 1);
    }

    #[test]
    fn test_tracing_sink_forwards_record() {
        let buffer = SharedBuffer::default();
        let subscriber = tracing_subscriber::fmt()
            .json()
            .with_writer(buffer.clone())
            .with_max_level(tracing::Level::DEBUG)
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            let sink = TracingSink::new(LogLevel::Info);
            sink.emit(&record(LogLevel::Debug, "too quiet"));
            sink.emit(&record(LogLevel::Warn, "order created"));
        });

        let output = buffer.contents();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 1);

        let event: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(event["level"], "WARN");
        assert_eq!(event["target"], RECORD_TARGET);
        assert_eq!(event["fields"]["message"], "order created");

        let forwarded: LogRecord =
            serde_json::from_str(event["fields"]["record"].as_str().unwrap()).unwrap();
        assert_eq!(forwarded, record(LogLevel::Warn, "order created"));
    }
}
