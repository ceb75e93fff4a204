//! User-facing status lines
//!
//! Success lines are green with a `[HH:MM:SS]` stamp, warnings yellow,
//! errors red. Diagnostics go through `tracing` instead.

use std::io::Write;
use std::sync::Mutex;

const GREEN: &str = "\x1b[0;32m";
const YELLOW: &str = "\x1b[1;33m";
const RED: &str = "\x1b[0;31m";
const CYAN: &str = "\x1b[0;36m";
const RESET: &str = "\x1b[0m";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Success,
    Info,
    Warn,
    Error,
    Raw,
}

pub trait Reporter {
    fn emit(&self, level: Level, message: &str);

    fn success(&self, message: &str) {
        self.emit(Level::Success, message);
    }

    fn info(&self, message: &str) {
        self.emit(Level::Info, message);
    }

    fn warn(&self, message: &str) {
        self.emit(Level::Warn, message);
    }

    fn error(&self, message: &str) {
        self.emit(Level::Error, message);
    }

    /// Unformatted output such as command results and listings
    fn raw(&self, message: &str) {
        self.emit(Level::Raw, message);
    }
}

/// Terminal reporter: stdout for normal lines, stderr for errors
#[derive(Debug, Clone, Copy)]
pub struct ConsoleReporter {
    color: bool,
}

impl ConsoleReporter {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    fn paint(&self, color: &str, text: &str) -> String {
        if self.color {
            format!("{}{}{}", color, text, RESET)
        } else {
            text.to_string()
        }
    }

    fn format(&self, level: Level, message: &str) -> String {
        match level {
            Level::Success => {
                let stamp = chrono::Local::now().format("%H:%M:%S");
                self.paint(GREEN, &format!("[{}] {}", stamp, message))
            }
            Level::Info => self.paint(CYAN, message),
            Level::Warn => self.paint(YELLOW, &format!("Warning: {}", message)),
            Level::Error => self.paint(RED, &format!("Error: {}", message)),
            Level::Raw => message.to_string(),
        }
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Reporter for ConsoleReporter {
    fn emit(&self, level: Level, message: &str) {
        let line = self.format(level, message);
        // a closed pipe is not worth failing a command over
        let _ = if level == Level::Error {
            writeln!(std::io::stderr(), "{}", line)
        } else {
            writeln!(std::io::stdout(), "{}", line)
        };
    }
}

/// Collects lines for assertions
#[derive(Debug, Default)]
pub struct MemoryReporter {
    lines: Mutex<Vec<(Level, String)>>,
}

impl MemoryReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<(Level, String)> {
        self.lines.lock().map(|l| l.clone()).unwrap_or_default()
    }

    pub fn messages(&self, level: Level) -> Vec<String> {
        self.lines()
            .into_iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m)
            .collect()
    }

    pub fn contains(&self, level: Level, needle: &str) -> bool {
        self.messages(level).iter().any(|m| m.contains(needle))
    }
}

impl Reporter for MemoryReporter {
    fn emit(&self, level: Level, message: &str) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.push((level, message.to_string()));
        }
    }
}
