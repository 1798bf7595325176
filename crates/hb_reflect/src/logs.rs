use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use crate::error::{ReflectError, ReflectErrorKind};

// -----------------------------------------------------------------------------
// LogLevel

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LogLevel {
    Info,
    Warning,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Info => "Info",
            Self::Warning => "Warning",
            Self::Error => "Error",
        })
    }
}

// -----------------------------------------------------------------------------
// LogEntry

/// One member-level outcome of a populate call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub level: LogLevel,
    /// Nesting depth of the member, `0` for the root object.
    pub depth: usize,
    pub message: String,
    /// Set when the entry reports a [`ReflectError`].
    pub kind: Option<ReflectErrorKind>,
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:pad$}[{}] {}",
            "",
            self.level,
            self.message,
            pad = self.depth * 2
        )
    }
}

// -----------------------------------------------------------------------------
// LogSink

/// Host-side receiver of log entries, notified as each entry is recorded.
pub trait LogSink {
    fn log(&self, entry: &LogEntry);
}

impl<F: Fn(&LogEntry)> LogSink for F {
    #[inline]
    fn log(&self, entry: &LogEntry) {
        self(entry)
    }
}

// -----------------------------------------------------------------------------
// Logs

/// Ordered, human-readable record of every member outcome.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Logs {
    entries: Vec<LogEntry>,
}

impl Logs {
    #[inline]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    #[inline]
    pub fn push(&mut self, entry: LogEntry) {
        self.entries.push(entry);
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
        self.push(LogEntry {
            level: LogLevel::Warning,
            depth,
            message: message.into(),
            kind: None,
        });
    }

    pub fn error(&mut self, depth: usize, message: impl Into<String>) {
        self.push(LogEntry {
            level: LogLevel::Error,
            depth,
            message: message.into(),
            kind: None,
        });
    }

    /// Records an error, as a warning when the populator recovers from its kind.
    pub fn reflect_error(&mut self, depth: usize, err: &ReflectError) {
        let kind = err.kind();
        let level = if kind.is_recoverable() {
            LogLevel::Warning
        } else {
            LogLevel::Error
        };
        self.push(LogEntry {
            level,
            depth,
            message: err.to_string(),
            kind: Some(kind),
        });
    }

    #[inline]
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    #[inline]
    pub fn iter(&self) -> core::slice::Iter<'_, LogEntry> {
        self.entries.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries reporting the given error kind.
    pub fn count_kind(&self, kind: ReflectErrorKind) -> usize {
        self.entries.iter().filter(|e| e.kind == Some(kind)).count()
    }

    pub fn has_errors(&self) -> bool {
        self.entries.iter().any(|e| e.level == LogLevel::Error)
    }

    #[inline]
    pub fn into_entries(self) -> Vec<LogEntry> {
        self.entries
    }
}

impl<'a> IntoIterator for &'a Logs {
    type Item = &'a LogEntry;
    type IntoIter = core::slice::Iter<'a, LogEntry>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl fmt::Display for Logs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.entries {
            writeln!(f, "{entry}")?;
        }
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::{LogLevel, Logs};
    use crate::error::{ReflectError, ReflectErrorKind};

    #[test]
    fn render_with_depth_padding() {
        let mut logs = Logs::new();
        logs.info(0, "root");
        logs.warning(2, "nested");
        assert_eq!(logs.to_string(), "[Info] root\n    [Warning] nested\n");
    }

    #[test]
    fn recoverable_errors_are_warnings() {
        let mut logs = Logs::new();
        logs.reflect_error(
            1,
            &ReflectError::TypeNotFound {
                type_name: "Missing".into(),
            },
        );
        logs.reflect_error(
            1,
            &ReflectError::ConversionException {
                target: "hp".into(),
                reason: "boom".into(),
            },
        );
        assert_eq!(logs.entries()[0].level, LogLevel::Warning);
        assert_eq!(logs.entries()[1].level, LogLevel::Error);
        assert_eq!(logs.count_kind(ReflectErrorKind::TypeNotFound), 1);
        assert!(logs.has_errors());
    }
}
