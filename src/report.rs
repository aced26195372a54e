use std::io::Write;

/// Receives diagnostics about malformed input or unrecognized nodes.
///
/// Reporting never stops a conversion. Closures taking `&str` implement this
/// trait, as does `Vec<String>` which collects every message.
pub trait ErrorReporter {
    fn report(&mut self, message: &str);
}

/// Writes `Error: <message>` lines to standard error.
#[derive(Debug, Default, Clone, Copy)]
pub struct StderrReporter;

impl ErrorReporter for StderrReporter {
    fn report(&mut self, message: &str) {
        let _ = writeln!(std::io::stderr(), "Error: {}", message);
    }
}

/// Drops every message.
#[derive(Debug, Default, Clone, Copy)]
pub struct IgnoreReporter;

impl ErrorReporter for IgnoreReporter {
    fn report(&mut self, _message: &str) {}
}

impl ErrorReporter for Vec<String> {
    fn report(&mut self, message: &str) {
        self.push(message.to_string());
    }
}

impl<F: FnMut(&str)> ErrorReporter for F {
    fn report(&mut self, message: &str) {
        self(message)
    }
}
