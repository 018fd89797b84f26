//! Diagnostics reported while parsing.

use std::fmt;
use std::ops::Range;

use turbo_gherkin_lexer::{LexDiagnostic, LexErrorKind, Position, TokenKind};

use crate::localization;
use crate::syntax::RuleKind;

/// How serious a diagnostic is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    /// The tree does not conform to the grammar here.
    Error,
    /// The input conforms but looks suspicious.
    Warning,
}

impl Severity {
    fn message_id(self) -> &'static str {
        match self {
            Self::Error => "severity-error",
            Self::Warning => "severity-warning",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&localization::message(self.message_id()))
    }
}

/// What a diagnostic is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum DiagnosticKind {
    /// Problem found by the lexer.
    Lexical(LexErrorKind),
    /// Content appeared where a `Feature:` header was required.
    MissingFeature {
        /// Kind of the first token found instead.
        found: TokenKind,
    },
    /// A line that does not belong where it appears.
    UnexpectedContent {
        /// Kind of the first significant token on the line.
        found: TokenKind,
        /// Construct that consumed the line.
        context: RuleKind,
    },
    /// `Examples:` after a plain scenario.
    MisplacedExamples,
    /// Scenario outline without any `Examples:` section.
    MissingExamples,
    /// `Examples:` section without a table.
    MissingTable,
    /// `@` not followed by a tag name.
    EmptyTag,
    /// Table row whose cell count differs from the head.
    UnevenTableRow {
        /// One-based index of the row below the head.
        row: usize,
        /// Cells in the head.
        expected: usize,
        /// Cells in the row.
        actual: usize,
    },
}

impl DiagnosticKind {
    /// Severity diagnostics of this kind are reported with.
    #[must_use]
    pub const fn severity(self) -> Severity {
        match self {
            Self::UnevenTableRow { .. } => Severity::Warning,
            _ => Severity::Error,
        }
    }

    /// Localised description without location.
    #[must_use]
    pub fn message(self) -> String {
        let text = match self {
            Self::Lexical(LexErrorKind::UnterminatedString) => {
                localization::message("diagnostic-unterminated-string")
            }
            Self::Lexical(LexErrorKind::UnterminatedDocStrings) => {
                localization::message("diagnostic-unterminated-doc-strings")
            }
            Self::MissingFeature { found } => {
                localization::message_with_args("diagnostic-missing-feature", |args| {
                    args.set("found", found.name());
                })
            }
            Self::UnexpectedContent { found, context } => {
                localization::message_with_args("diagnostic-unexpected-content", |args| {
                    args.set("found", found.name());
                    args.set("context", context.name());
                })
            }
            Self::MisplacedExamples => localization::message("diagnostic-misplaced-examples"),
            Self::MissingExamples => localization::message("diagnostic-missing-examples"),
            Self::MissingTable => localization::message("diagnostic-missing-table"),
            Self::EmptyTag => localization::message("diagnostic-empty-tag"),
            Self::UnevenTableRow {
                row,
                expected,
                actual,
            } => localization::message_with_args("diagnostic-uneven-table-row", |args| {
                args.set("row", row.to_string());
                args.set("expected", expected.to_string());
                args.set("actual", actual.to_string());
            }),
        };
        localization::strip_directional_isolates(&text)
    }
}

/// A located parse or lexical problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// What the diagnostic is about.
    pub kind: DiagnosticKind,
    /// Error or warning.
    pub severity: Severity,
    /// Byte range of the offending input.
    pub span: Range<usize>,
    /// Position where the offending input starts.
    pub position: Position,
}

impl Diagnostic {
    pub(crate) fn new(kind: DiagnosticKind, span: Range<usize>, position: Position) -> Self {
        Self {
            kind,
            severity: kind.severity(),
            span,
            position,
        }
    }

    /// Whether this is an error rather than a warning.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl From<LexDiagnostic> for Diagnostic {
    fn from(diagnostic: LexDiagnostic) -> Self {
        Self::new(
            DiagnosticKind::Lexical(diagnostic.kind),
            diagnostic.span,
            diagnostic.position,
        )
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = localization::message_with_args("diagnostic-located", |args| {
            args.set("line", self.position.line.to_string());
            args.set("column", self.position.column.to_string());
            args.set("severity", self.severity.to_string());
            args.set("message", self.kind.message());
        });
        f.write_str(&localization::strip_directional_isolates(&rendered))
    }
}

impl std::error::Error for Diagnostic {}
