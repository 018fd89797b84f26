//! Lexical diagnostics.

use std::ops::Range;

use thiserror::Error;

use crate::source::Position;

/// Kind of problem found while scanning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum LexErrorKind {
    /// A quote opened a string that is not closed on the same line by the
    /// same quote character.
    #[error("unterminated quoted string")]
    UnterminatedString,
    /// A doc-string fence was never closed.
    #[error("unterminated doc string block")]
    UnterminatedDocStrings,
}

/// A lexical problem together with its location.
///
/// The lexer never aborts: the offending text is still covered by fallback
/// tokens and the diagnostic only records where scanning had to degrade.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} at {position}")]
pub struct LexDiagnostic {
    /// What went wrong.
    pub kind: LexErrorKind,
    /// Byte range of the offending construct.
    pub span: Range<usize>,
    /// Position where the offending construct starts.
    pub position: Position,
}
