//! Character source shared by the lexer.
//!
//! Raw input goes through two independent views before any token is built:
//! a case-folding view used only for keyword comparison and a cursor that
//! normalises `\r\n`, `\r` and `\n` into single logical line breaks while
//! keeping the original text untouched for literal extraction.

use std::fmt;

use thiserror::Error;

const BYTE_ORDER_MARK: char = '\u{feff}';

/// Failure to interpret raw bytes as feature-file text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EncodingError {
    /// The input is not well-formed UTF-8.
    #[error("input is not valid UTF-8 (first invalid byte at offset {valid_up_to})")]
    InvalidUtf8 {
        /// Number of leading bytes that decoded cleanly.
        valid_up_to: usize,
    },
}

/// Decode raw bytes as UTF-8 and strip a leading byte-order mark.
///
/// # Errors
///
/// Returns [`EncodingError::InvalidUtf8`] when `bytes` is not well-formed
/// UTF-8.
///
/// # Examples
///
/// ```
/// use turbo_gherkin_lexer::decode;
///
/// assert_eq!(decode(b"\xEF\xBB\xBFFeature:").ok(), Some("Feature:"));
/// assert!(decode(&[0xff, 0xfe]).is_err());
/// ```
pub fn decode(bytes: &[u8]) -> Result<&str, EncodingError> {
    from_utf8(bytes).map(strip_bom)
}

/// Interpret raw bytes as UTF-8 without touching a byte-order mark.
///
/// # Errors
///
/// Returns [`EncodingError::InvalidUtf8`] when `bytes` is not well-formed
/// UTF-8.
pub fn from_utf8(bytes: &[u8]) -> Result<&str, EncodingError> {
    std::str::from_utf8(bytes).map_err(|err| EncodingError::InvalidUtf8 {
        valid_up_to: err.valid_up_to(),
    })
}

/// Remove a single leading byte-order mark, if present.
#[must_use]
pub fn strip_bom(text: &str) -> &str {
    text.strip_prefix(BYTE_ORDER_MARK).unwrap_or(text)
}

/// Case-fold one character for keyword comparison.
///
/// Characters whose lowercase form expands to several characters are returned
/// unchanged so that folding never alters the character count of a phrase.
#[must_use]
pub fn fold_case(ch: char) -> char {
    let mut lower = ch.to_lowercase();
    match (lower.next(), lower.next()) {
        (Some(folded), None) => folded,
        _ => ch,
    }
}

/// Case-folded view over `text`.
pub fn folded(text: &str) -> impl Iterator<Item = char> + '_ {
    text.chars().map(fold_case)
}

/// Line and column of a character in the source.
///
/// Lines start at 1; columns start at 0 and count Unicode scalar values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    /// One-based line number.
    pub line: u32,
    /// Zero-based column measured in characters.
    pub column: u32,
}

impl Position {
    /// Position of the first character of any input.
    pub const START: Self = Self { line: 1, column: 0 };

    /// Construct a position from its parts.
    #[must_use]
    pub const fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::START
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Length in bytes of the line break at the start of `text`, if any.
pub(crate) fn line_break_len(text: &str) -> Option<usize> {
    let mut chars = text.chars();
    match chars.next() {
        Some('\r') if chars.next() == Some('\n') => Some(2),
        Some('\r' | '\n') => Some(1),
        _ => None,
    }
}

/// Forward-only cursor over the original text tracking byte offset and
/// logical position.
///
/// A leading byte-order mark is stepped over on creation, so offsets stay
/// relative to the full input while the mark itself is never scanned.
#[derive(Debug, Clone)]
pub(crate) struct Cursor<'a> {
    src: &'a str,
    offset: usize,
    position: Position,
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(src: &'a str) -> Self {
        Self {
            src,
            offset: src.len() - strip_bom(src).len(),
            position: Position::START,
        }
    }

    pub(crate) fn offset(&self) -> usize {
        self.offset
    }

    pub(crate) fn position(&self) -> Position {
        self.position
    }

    pub(crate) fn rest(&self) -> &'a str {
        self.src.get(self.offset..).unwrap_or_default()
    }

    pub(crate) fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    pub(crate) fn previous(&self) -> Option<char> {
        self.src
            .get(..self.offset)
            .and_then(|before| before.chars().next_back())
    }

    pub(crate) fn is_eof(&self) -> bool {
        self.offset >= self.src.len()
    }

    pub(crate) fn line_break_len(&self) -> Option<usize> {
        line_break_len(self.rest())
    }

    /// Advance over `len` bytes that contain no line break.
    pub(crate) fn advance(&mut self, len: usize) -> &'a str {
        let taken = self.rest().get(..len).unwrap_or_default();
        let width = u32::try_from(taken.chars().count()).unwrap_or(u32::MAX);
        self.position.column = self.position.column.saturating_add(width);
        self.offset += taken.len();
        taken
    }

    /// Advance over one logical line break of `len` bytes.
    pub(crate) fn advance_line(&mut self, len: usize) -> &'a str {
        let taken = self.rest().get(..len).unwrap_or_default();
        self.offset += taken.len();
        self.position.line = self.position.line.saturating_add(1);
        self.position.column = 0;
        taken
    }
}
