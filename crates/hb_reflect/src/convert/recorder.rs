use alloc::string::{String, ToString};

use super::stack;
use crate::error::ReflectError;
use crate::logs::{LogEntry, LogLevel, LogSink, Logs};

// -----------------------------------------------------------------------------
// Recorder

/// Collects the log of one call, forwarding each entry to the host sink.
///
/// Tracks the success flag: any error the walk cannot recover from clears it.
pub(crate) struct Recorder<'a> {
    logs: Logs,
    sink: Option<&'a dyn LogSink>,
    success: bool,
}

impl<'a> Recorder<'a> {
    pub fn new(sink: Option<&'a dyn LogSink>) -> Self {
        Self {
            logs: Logs::new(),
            sink,
            success: true,
        }
    }

    fn push(&mut self, entry: LogEntry) {
        if let Some(sink) = self.sink {
            sink.log(&entry);
        }
        self.logs.push(entry);
    }

    pub fn info(&mut self, depth: usize, message: impl Into<String>) {
        self.push(LogEntry {
            level: LogLevel::Info,
            depth,
            message: message.into(),
            kind: None,
        });
    }

    pub fn warning(&mut self, depth: usize, message: impl Into<String>) {
        let message = message.into();
        log::warn!("{message}");
        self.push(LogEntry {
            level: LogLevel::Warning,
            depth,
            message,
            kind: None,
        });
    }

    /// Records an error without a taxonomy kind. Clears the success flag.
    pub fn error(&mut self, depth: usize, message: impl Into<String>) {
        let message = stack::describe(message.into());
        log::error!("{message}");
        self.success = false;
        self.push(LogEntry {
            level: LogLevel::Error,
            depth,
            message,
            kind: None,
        });
    }

    /// Records `err`, as a warning when its kind is recoverable.
    pub fn reflect_error(&mut self, depth: usize, err: &ReflectError) {
        let kind = err.kind();
        let level = if kind.is_recoverable() {
            log::debug!("{err}");
            LogLevel::Warning
        } else {
            log::error!("{err}");
            self.success = false;
            LogLevel::Error
        };
        let message = match level {
            LogLevel::Error => stack::describe(err.to_string()),
            _ => err.to_string(),
        };
        self.push(LogEntry {
            level,
            depth,
            message,
            kind: Some(kind),
        });
    }

    #[inline]
    pub fn finish(self) -> (bool, Logs) {
        (self.success, self.logs)
    }
}
