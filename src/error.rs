use std::fmt::{Display, Formatter};

pub type Result<T> = std::result::Result<T, Error>;

/// Failures that abort a conversion call.
///
/// Malformed XML is never one of them: it is surfaced as a [Diagnostic]
/// through an [ErrorReporter](crate::report::ErrorReporter) while the
/// conversion carries on.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Reading an input file failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A JSON tree or option map could not be read or written
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A profile name other than strict, simple or compact
    #[error("Unknown profile: {0}")]
    UnknownProfile(String),
}

/// 1-based row and column of a position in the XML input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextPos {
    pub row: u32,
    pub col: u32,
}

impl TextPos {
    /// Locate a byte offset in `text`. Columns count characters, not bytes.
    pub fn of(text: &str, offset: usize) -> TextPos {
        let mut offset = offset.min(text.len());
        while !text.is_char_boundary(offset) {
            offset -= 1;
        }
        let before = &text[..offset];
        let row = before.matches('\n').count() + 1;
        let line_start = before.rfind('\n').map_or(0, |i| i + 1);
        let col = before[line_start..].chars().count() + 1;
        TextPos { row: row as u32, col: col as u32 }
    }
}

impl Display for TextPos {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "{}:{}", self.row, self.col)
    }
}

/// A recoverable problem found while reading a document.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub message: String,
    pub pos: Option<TextPos>,
}

impl Diagnostic {
    pub fn new<S: Into<String>>(message: S) -> Self {
        Diagnostic { message: message.into(), pos: None }
    }

    pub fn at<S: Into<String>>(message: S, pos: TextPos) -> Self {
        Diagnostic { message: message.into(), pos: Some(pos) }
    }
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self.pos {
            Some(pos) => write!(f, "{} at {}", self.message, pos),
            None => write!(f, "{}", self.message),
        }
    }
}
