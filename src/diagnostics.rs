//! Diagnostics sink
//!
//! Line-oriented channel for everything the variable store reports to its
//! user: not-found lookups, usage errors and the output of `log`. Nothing
//! written here interrupts the caller.

use std::io::Write;

use log::Level;

/// Log target used by [`LogSink`]
pub const LOG_TARGET: &str = "cssvar";

/// Receiver of user facing messages
pub trait DiagnosticSink {
    fn emit(&mut self, level: Level, message: &str);
}

/// Forwards messages to the `log` facade
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn emit(&mut self, level: Level, message: &str) {
        log::log!(target: LOG_TARGET, level, "{}", message);
    }
}

/// Writes one line per message, the console equivalent
#[derive(Debug)]
pub struct ConsoleSink<W: Write> {
    out: W,
}

impl<W: Write> ConsoleSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl ConsoleSink<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> DiagnosticSink for ConsoleSink<W> {
    fn emit(&mut self, level: Level, message: &str) {
        // A broken console must not turn into a fault for the caller
        let _ = writeln!(self.out, "{}", message);
        let _ = self.out.flush();
        log::log!(target: LOG_TARGET, Level::Trace, "[{}] {}", level, message);
    }
}

/// Keeps every message in memory
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    messages: Vec<(Level, String)>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[(Level, String)] {
        &self.messages
    }

    /// Most recent message, if any
    pub fn last(&self) -> Option<&str> {
        self.messages.last().map(|(_, message)| message.as_str())
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }
}

impl DiagnosticSink for MemorySink {
    fn emit(&mut self, level: Level, message: &str) {
        self.messages.push((level, message.to_string()));
    }
}

impl<D: DiagnosticSink + ?Sized> DiagnosticSink for &mut D {
    fn emit(&mut self, level: Level, message: &str) {
        (**self).emit(level, message);
    }
}
