use std::sync::atomic::{AtomicU8, Ordering};

use crate::bindings::{jsLog, LogLevel};

static MAX_LOG_LEVEL: AtomicU8 = AtomicU8::new(LoggerLevel::Info as u8);

/// Levels the `Logger` can be configured with.
///
/// Logs with a higher level than the configured one are discarded before
/// crossing the JavaScript boundary.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub enum LoggerLevel {
    None = 0,
    Error = 1,
    Warn = 2,
    Info = 3,
    Debug = 4,
}

/// Logging facade forwarding to the page's console through the `jsLog`
/// binding.
pub struct Logger {}

impl Logger {
    pub fn set_logger_level(new_level: LoggerLevel) {
        MAX_LOG_LEVEL.store(new_level as u8, Ordering::Relaxed);
    }

    pub fn error(text: &str) {
        if MAX_LOG_LEVEL.load(Ordering::Relaxed) >= LoggerLevel::Error as u8 {
            jsLog(LogLevel::Error, text);
        }
    }

    pub fn warn(text: &str) {
        if MAX_LOG_LEVEL.load(Ordering::Relaxed) >= LoggerLevel::Warn as u8 {
            jsLog(LogLevel::Warn, text);
        }
    }

    pub fn info(text: &str) {
        if MAX_LOG_LEVEL.load(Ordering::Relaxed) >= LoggerLevel::Info as u8 {
            jsLog(LogLevel::Info, text);
        }
    }

    pub fn debug(text: &str) {
        if MAX_LOG_LEVEL.load(Ordering::Relaxed) >= LoggerLevel::Debug as u8 {
            jsLog(LogLevel::Debug, text);
        }
    }
}
