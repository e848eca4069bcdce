//! Global logging module for the filter and histogram crates
//!
//! Provides a process-wide logging service with coded events and a macro
//! interface. Nothing is emitted until `init_global_logging` has been called,
//! so library consumers that never initialize it get a silent core.

pub mod codes;
pub mod events;
#[macro_use]
pub mod macros;
pub mod service;

use std::sync::{Arc, OnceLock};

pub use codes::Code;
pub use events::{LogEvent, LogLevel};
pub use service::{ConsoleLogger, Logger, LoggingService, MemoryLogger, StructuredLogger};

use crate::config::runtime::LoggingPreferences;

static GLOBAL_LOGGER: OnceLock<Arc<LoggingService>> = OnceLock::new();

// ============================================================================
// INITIALIZATION
// ============================================================================

/// Initialize global logging from environment preferences
pub fn init_global_logging() -> Result<(), String> {
    init_global_logging_with_preferences(&LoggingPreferences::default())
}

/// Initialize global logging from explicit preferences
pub fn init_global_logging_with_preferences(
    preferences: &LoggingPreferences,
) -> Result<(), String> {
    let service = Arc::new(LoggingService::with_preferences(preferences));
    init_global_logging_with_service(service.clone())?;

    service.log_event(LogEvent::success(
        codes::success::LOGGING_INITIALIZED,
        "Global logging initialized",
    ));

    Ok(())
}

/// Initialize with a custom service (primarily for testing)
pub fn init_global_logging_with_service(service: Arc<LoggingService>) -> Result<(), String> {
    GLOBAL_LOGGER
        .set(service)
        .map_err(|_| "Global logger already initialized".to_string())
}

pub fn is_initialized() -> bool {
    GLOBAL_LOGGER.get().is_some()
}

pub fn try_get_global_logger() -> Option<&'static LoggingService> {
    GLOBAL_LOGGER.get().map(|service| service.as_ref())
}

/// Whether debug events would reach a logger
pub fn debug_enabled() -> bool {
    try_get_global_logger()
        .map(|logger| logger.should_log(LogLevel::Debug))
        .unwrap_or(false)
}

// ============================================================================
// MACRO SUPPORT
// ============================================================================

/// Attach context to an event and hand it to the global logger (used by the macros)
pub fn log_with_context(mut event: LogEvent, context: Vec<(&str, String)>) {
    let Some(logger) = try_get_global_logger() else {
        return;
    };

    for (key, value) in context {
        event = event.with_context(key, &value);
    }

    logger.log_event(event);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_with_context_never_panics() {
        log_with_context(LogEvent::info("nothing"), vec![("k", "v".to_string())]);
    }

    #[test]
    fn test_second_initialization_fails() {
        let memory = Arc::new(MemoryLogger::new());
        let _ = init_global_logging_with_service(Arc::new(LoggingService::new(
            memory,
            LogLevel::Debug,
        )));
        let second = init_global_logging_with_service(Arc::new(LoggingService::new(
            Arc::new(MemoryLogger::new()),
            LogLevel::Debug,
        )));

        // Whichever call ran first in this process, the later one must be refused
        assert!(second.is_err());
        assert!(is_initialized());
    }
}
