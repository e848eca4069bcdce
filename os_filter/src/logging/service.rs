//! Logging service and logger implementations

use super::codes::Code;
use super::events::{LogEvent, LogLevel};
use crate::config::runtime::LoggingPreferences;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};

/// Simple logger trait
pub trait Logger: Send + Sync {
    fn log(&self, event: &LogEvent);
}

/// Logging service that filters events by minimum level before handing them on
pub struct LoggingService {
    logger: Arc<dyn Logger>,
    min_level: LogLevel,
}

impl LoggingService {
    pub fn new(logger: Arc<dyn Logger>, min_level: LogLevel) -> Self {
        Self { logger, min_level }
    }

    /// Create a service from runtime preferences
    pub fn with_preferences(preferences: &LoggingPreferences) -> Self {
        let min_level = preferences.min_log_level;
        let logger: Arc<dyn Logger> = if preferences.use_structured_logging {
            Arc::new(StructuredLogger::new())
        } else {
            Arc::new(ConsoleLogger::new())
        };

        Self::new(logger, min_level)
    }

    pub fn min_level(&self) -> LogLevel {
        self.min_level
    }

    pub fn should_log(&self, level: LogLevel) -> bool {
        level <= self.min_level
    }

    pub fn log_event(&self, event: LogEvent) {
        if self.should_log(event.level) {
            self.logger.log(&event);
        }
    }

    pub fn log_error(&self, code: Code, message: &str) {
        self.log_event(LogEvent::error(code, message));
    }

    pub fn log_warning_with_code(&self, code: Code, message: &str) {
        self.log_event(LogEvent::warning_with_code(code, message));
    }

    pub fn log_info(&self, message: &str) {
        self.log_event(LogEvent::info(message));
    }

    pub fn log_debug(&self, message: &str) {
        self.log_event(LogEvent::debug(message));
    }
}

/// Destination for formatted log lines; stderr unless a writer is given,
/// so stdout stays free for command output
struct LineSink {
    writer: Mutex<Box<dyn Write + Send>>,
}

impl LineSink {
    fn new(writer: impl Write + Send + 'static) -> Self {
        Self {
            writer: Mutex::new(Box::new(writer)),
        }
    }

    fn write_line(&self, line: &str) {
        let mut writer = self.writer.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        // A log line that cannot be written is dropped
        let _ = writeln!(writer, "{}", line);
    }
}

/// Plain text logger
pub struct ConsoleLogger {
    sink: LineSink,
}

impl ConsoleLogger {
    pub fn new() -> Self {
        Self::with_writer(io::stderr())
    }

    pub fn with_writer(writer: impl Write + Send + 'static) -> Self {
        Self {
            sink: LineSink::new(writer),
        }
    }
}

impl Default for ConsoleLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl Logger for ConsoleLogger {
    fn log(&self, event: &LogEvent) {
        self.sink.write_line(&event.format());
    }
}

/// JSON-lines logger for tooling integration
pub struct StructuredLogger {
    sink: LineSink,
}

impl StructuredLogger {
    pub fn new() -> Self {
        Self::with_writer(io::stderr())
    }

    pub fn with_writer(writer: impl Write + Send + 'static) -> Self {
        Self {
            sink: LineSink::new(writer),
        }
    }
}

impl Default for StructuredLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl Logger for StructuredLogger {
    fn log(&self, event: &LogEvent) {
        let line = event.format_json().unwrap_or_else(|_| event.format());
        self.sink.write_line(&line);
    }
}

/// Memory logger for testing
#[derive(Default)]
pub struct MemoryLogger {
    events: Mutex<Vec<LogEvent>>,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self::default()
    }

    fn events_guard(&self) -> std::sync::MutexGuard<'_, Vec<LogEvent>> {
        // A panic while holding the lock leaves the vector intact
        self.events.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn get_events(&self) -> Vec<LogEvent> {
        self.events_guard().clone()
    }

    pub fn clear(&self) {
        self.events_guard().clear();
    }

    pub fn event_count(&self) -> usize {
        self.events_guard().len()
    }

    pub fn get_warnings(&self) -> Vec<LogEvent> {
        self.events_guard()
            .iter()
            .filter(|e| e.is_warning())
            .cloned()
            .collect()
    }

    pub fn has_event_with_code(&self, code: Code) -> bool {
        self.events_guard().iter().any(|e| e.code == code)
    }
}

impl Logger for MemoryLogger {
    fn log(&self, event: &LogEvent) {
        self.events_guard().push(event.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::codes;

    #[test]
    fn test_service_filters_by_level() {
        let memory = Arc::new(MemoryLogger::new());
        let service = LoggingService::new(memory.clone(), LogLevel::Warning);

        service.log_debug("hidden");
        service.log_info("hidden");
        service.log_warning_with_code(codes::action::ENTRY_SKIPPED, "shown");
        service.log_error(codes::xml::MALFORMED_DOCUMENT, "shown");

        assert_eq!(memory.event_count(), 2);
        assert_eq!(memory.get_warnings().len(), 1);
        assert!(memory.has_event_with_code(codes::xml::MALFORMED_DOCUMENT));
    }

    #[test]
    fn test_memory_logger_clear() {
        let memory = MemoryLogger::new();
        memory.log(&LogEvent::info("one"));
        memory.log(&LogEvent::debug("two"));
        assert_eq!(memory.event_count(), 2);

        memory.clear();
        assert_eq!(memory.event_count(), 0);
    }

    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl SharedBuffer {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    #[test]
    fn test_loggers_write_every_level_to_their_sink() {
        let console_out = SharedBuffer::default();
        let console = ConsoleLogger::with_writer(console_out.clone());
        console.log(&LogEvent::warning_with_code(codes::action::ENTRY_SKIPPED, "no filter"));
        console.log(&LogEvent::info("starting"));
        console.log(&LogEvent::error(codes::xml::MALFORMED_DOCUMENT, "bad"));

        let lines: Vec<String> = console_out.contents().lines().map(str::to_string).collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("[WARN] W030"));

        let structured_out = SharedBuffer::default();
        let structured = StructuredLogger::with_writer(structured_out.clone());
        structured.log(&LogEvent::success(codes::success::ENTRIES_PARSED, "parsed"));

        let line: serde_json::Value = serde_json::from_str(structured_out.contents().trim()).unwrap();
        assert_eq!(line["code"], "I002");
    }

    #[test]
    fn test_service_from_preferences() {
        let preferences = LoggingPreferences {
            use_structured_logging: true,
            min_log_level: LogLevel::Debug,
        };
        let service = LoggingService::with_preferences(&preferences);
        assert!(service.should_log(LogLevel::Debug));
        assert_eq!(service.min_level(), LogLevel::Debug);
    }
}
