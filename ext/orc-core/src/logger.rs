// Logger module for ORC core
// Level-gated, lazily formatted events routed through the `log` facade

use std::str::FromStr;
use std::sync::OnceLock;

use crate::error::OrcError;

/// Target used for every event emitted by this crate.
pub const LOG_TARGET: &str = "orc_core";

/// Environment variable holding the default level.
pub const LOG_LEVEL_ENV: &str = "ORC_CORE_LOG_LEVEL";

/// Severity levels, ordered from most to least verbose
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl FromStr for LogLevel {
    type Err = OrcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_ascii_lowercase().as_str() {
            "trace" => LogLevel::Trace,
            "debug" => LogLevel::Debug,
            "info" => LogLevel::Info,
            "warn" => LogLevel::Warn,
            "error" => LogLevel::Error,
            _ => return Err(OrcError::value(format!("Invalid log level: {}", s))),
        })
    }
}

impl From<LogLevel> for log::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => log::Level::Trace,
            LogLevel::Debug => log::Level::Debug,
            LogLevel::Info => log::Level::Info,
            LogLevel::Warn => log::Level::Warn,
            LogLevel::Error => log::Level::Error,
        }
    }
}

/// A level-gated handle over the `log` facade
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Logger {
    level: LogLevel,
}

impl Default for Logger {
    fn default() -> Self {
        Self::from_env()
    }
}

impl Logger {
    /// Create a logger with an explicit level, falling back to the environment
    pub fn new(level: Option<LogLevel>) -> Self {
        match level {
            Some(level) => Self { level },
            None => Self::from_env(),
        }
    }

    /// Read the level from `ORC_CORE_LOG_LEVEL`, defaulting to `warn`
    pub fn from_env() -> Self {
        let level = std::env::var(LOG_LEVEL_ENV)
            .ok()
            .and_then(|s| s.parse::<LogLevel>().ok())
            .unwrap_or(LogLevel::Warn);
        Self { level }
    }

    /// Process wide logger, reading the environment once
    pub fn global() -> &'static Logger {
        static GLOBAL: OnceLock<Logger> = OnceLock::new();
        GLOBAL.get_or_init(Logger::from_env)
    }

    pub fn level(&self) -> LogLevel {
        self.level
    }

    pub fn enabled(&self, level: LogLevel) -> bool {
        self.level <= level && log::log_enabled!(target: LOG_TARGET, log::Level::from(level))
    }

    /// Log a message at the given level
    pub fn log(&self, level: LogLevel, message: &str) {
        log::log!(target: LOG_TARGET, log::Level::from(level), "{}", message);
    }

    fn log_with<F, S>(&self, level: LogLevel, message_fn: F)
    where
        F: FnOnce() -> S,
        S: AsRef<str>,
    {
        if self.enabled(level) {
            let message = message_fn();
            self.log(level, message.as_ref());
        }
    }

    /// Log a trace message
    pub fn trace<F, S>(&self, message_fn: F)
    where
        F: FnOnce() -> S,
        S: AsRef<str>,
    {
        self.log_with(LogLevel::Trace, message_fn)
    }

    /// Log a debug message
    pub fn debug<F, S>(&self, message_fn: F)
    where
        F: FnOnce() -> S,
        S: AsRef<str>,
    {
        self.log_with(LogLevel::Debug, message_fn)
    }

    /// Log an info message
    pub fn info<F, S>(&self, message_fn: F)
    where
        F: FnOnce() -> S,
        S: AsRef<str>,
    {
        self.log_with(LogLevel::Info, message_fn)
    }

    /// Log a warning message
    pub fn warn<F, S>(&self, message_fn: F)
    where
        F: FnOnce() -> S,
        S: AsRef<str>,
    {
        self.log_with(LogLevel::Warn, message_fn)
    }

    /// Log an error message
    pub fn error<F, S>(&self, message_fn: F)
    where
        F: FnOnce() -> S,
        S: AsRef<str>,
    {
        self.log_with(LogLevel::Error, message_fn)
    }
}
