//! Mode-aware scanner turning feature-file text into tokens.
//!
//! Keywords, comments, tags, table rows and doc-string fences are only
//! recognised at the first non-layout column of a line. Everything else is
//! free text with embedded literals.

use crate::errors::{LexDiagnostic, LexErrorKind};
use crate::keywords;
use crate::parameters::{is_quote, scan_angle_parameter, scan_number, scan_string};
use crate::source::{self, Cursor, EncodingError, Position};
use crate::token::{Token, TokenKind, TokenStream};

/// Tokenize feature-file text.
///
/// A leading byte-order mark is skipped; spans still count from the start
/// of `text`. Scanning never fails: malformed
/// input degrades to [`TokenKind::AnySymbol`] and is reported through
/// [`TokenStream::diagnostics`].
///
/// # Examples
///
/// ```
/// use turbo_gherkin_lexer::{TokenKind, tokenize};
///
/// let stream = tokenize("Функционал: x");
/// let kinds: Vec<_> = stream.kinds().collect();
/// assert_eq!(
///     kinds,
///     [
///         TokenKind::Feature,
///         TokenKind::Colon,
///         TokenKind::Space,
///         TokenKind::AnySymbol,
///         TokenKind::Eof,
///     ]
/// );
/// ```
#[must_use]
pub fn tokenize(text: &str) -> TokenStream<'_> {
    Lexer::new(text).run()
}

/// Decode raw bytes and tokenize them.
///
/// # Errors
///
/// Returns [`EncodingError`] when `bytes` is not valid UTF-8.
pub fn tokenize_bytes(bytes: &[u8]) -> Result<TokenStream<'_>, EncodingError> {
    source::from_utf8(bytes).map(|text| Lexer::new(text).run())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Fence {
    Quotes,
    Backticks,
}

impl Fence {
    const LEN: usize = 3;

    fn marker(self) -> &'static str {
        match self {
            Self::Quotes => "\"\"\"",
            Self::Backticks => "```",
        }
    }

    fn at(text: &str) -> Option<Self> {
        [Self::Quotes, Self::Backticks]
            .into_iter()
            .find(|fence| text.starts_with(fence.marker()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Default,
    DocStrings {
        fence: Fence,
        offset: usize,
        position: Position,
    },
}

/// What the current line has shown so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Line {
    Start,
    AfterStepKeyword,
    Tags,
    Table,
    Text,
}

struct Lexer<'a> {
    cursor: Cursor<'a>,
    tokens: Vec<Token<'a>>,
    diagnostics: Vec<LexDiagnostic>,
    mode: Mode,
    line: Line,
}

impl<'a> Lexer<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            cursor: Cursor::new(text),
            tokens: Vec::new(),
            diagnostics: Vec::new(),
            mode: Mode::Default,
            line: Line::Start,
        }
    }

    fn run(mut self) -> TokenStream<'a> {
        while !self.cursor.is_eof() {
            self.scan_next();
        }
        if let Mode::DocStrings {
            offset, position, ..
        } = self.mode
        {
            self.report(LexErrorKind::UnterminatedDocStrings, offset, position, Fence::LEN);
        }
        self.emit(TokenKind::Eof, 0);
        log::trace!(
            "tokenized {} tokens with {} diagnostics",
            self.tokens.len(),
            self.diagnostics.len()
        );
        TokenStream::new(self.tokens, self.diagnostics)
    }

    fn scan_next(&mut self) {
        if let Some(len) = self.cursor.line_break_len() {
            let offset = self.cursor.offset();
            let start = self.cursor.position();
            let text = self.cursor.advance_line(len);
            self.push(TokenKind::Eol, text, offset, start);
            self.line = Line::Start;
            return;
        }
        let layout = match self.cursor.peek() {
            Some(' ') => Some(TokenKind::Space),
            Some('\t') => Some(TokenKind::Tab),
            _ => None,
        };
        if let Some(kind) = layout {
            self.emit(kind, 1);
            if self.line == Line::AfterStepKeyword {
                self.line = Line::Text;
            }
            return;
        }
        match self.mode {
            Mode::DocStrings { fence, .. } => self.scan_doc_strings(fence),
            Mode::Default => match self.line {
                Line::Start => self.scan_line_start(),
                Line::Tags => self.scan_tag_line(),
                Line::Table => self.scan_table_line(),
                Line::AfterStepKeyword if self.cursor.peek() == Some('#') => self.scan_comment(),
                Line::AfterStepKeyword | Line::Text => self.scan_text(),
            },
        }
    }

    fn scan_line_start(&mut self) {
        let rest = self.cursor.rest();
        match rest.chars().next() {
            Some('#') => return self.scan_comment(),
            Some('|') => {
                self.line = Line::Table;
                return self.emit(TokenKind::Pipe, 1);
            }
            Some('@') => {
                self.line = Line::Tags;
                return self.scan_tag();
            }
            _ => {}
        }
        if let Some(fence) = Fence::at(rest) {
            return self.open_doc_strings(fence);
        }
        if let Some(keyword) = keywords::table().match_at(rest) {
            self.emit(keyword.kind, keyword.len);
            if keyword.kind.is_structural_keyword() {
                self.emit(TokenKind::Colon, 1);
                self.line = Line::Text;
            } else {
                self.line = Line::AfterStepKeyword;
            }
            return;
        }
        self.line = Line::Text;
        self.scan_text();
    }

    fn scan_comment(&mut self) {
        let rest = self.cursor.rest();
        let len = rest.find(['\r', '\n']).unwrap_or(rest.len());
        self.emit(TokenKind::Comment, len);
        self.line = Line::Text;
    }

    fn scan_tag_line(&mut self) {
        match self.cursor.peek() {
            Some('@') => self.scan_tag(),
            Some('#') => self.scan_comment(),
            _ => {
                let len = text_run_len(self.cursor.rest());
                self.emit(TokenKind::AnySymbol, len);
            }
        }
    }

    fn scan_tag(&mut self) {
        self.emit(TokenKind::At, 1);
        let name: usize = self
            .cursor
            .rest()
            .chars()
            .take_while(|c| !c.is_whitespace() && *c != '@')
            .map(char::len_utf8)
            .sum();
        if name > 0 {
            self.emit(TokenKind::AnySymbol, name);
        }
    }

    fn scan_table_line(&mut self) {
        let rest = self.cursor.rest();
        if rest.starts_with('|') {
            self.emit(TokenKind::Pipe, 1);
        } else {
            self.emit(TokenKind::TableCell, cell_len(rest));
        }
    }

    fn open_doc_strings(&mut self, fence: Fence) {
        let offset = self.cursor.offset();
        let position = self.cursor.position();
        log::trace!("doc string opened at {position}");
        self.emit(TokenKind::DocStrings, Fence::LEN);
        self.mode = Mode::DocStrings {
            fence,
            offset,
            position,
        };
        self.line = Line::Text;
    }

    fn scan_doc_strings(&mut self, fence: Fence) {
        let rest = self.cursor.rest();
        if self.line == Line::Start && rest.starts_with(fence.marker()) {
            log::trace!("doc string closed at {}", self.cursor.position());
            self.emit(TokenKind::DocStrings, Fence::LEN);
            self.mode = Mode::Default;
        } else {
            let len = rest.find(is_layout_char).unwrap_or(rest.len());
            self.emit(TokenKind::AnySymbol, len);
        }
        self.line = Line::Text;
    }

    fn scan_text(&mut self) {
        let rest = self.cursor.rest();
        let Some(first) = rest.chars().next() else {
            return;
        };
        if self.at_word_start() {
            if is_quote(first) {
                if let Some(len) = scan_string(rest) {
                    return self.emit(TokenKind::String, len);
                }
                let len = rest.find(['\r', '\n']).unwrap_or(rest.len());
                let (offset, position) = (self.cursor.offset(), self.cursor.position());
                self.report(LexErrorKind::UnterminatedString, offset, position, len);
            } else if first == '<' {
                if let Some(len) = scan_angle_parameter(rest) {
                    return self.emit(TokenKind::AngleParameter, len);
                }
            } else if first.is_ascii_digit() {
                if let Some((kind, len)) = scan_number(rest) {
                    return self.emit(kind, len);
                }
            }
        }
        self.emit(TokenKind::AnySymbol, text_run_len(rest));
    }

    fn at_word_start(&self) -> bool {
        self.cursor.previous().is_none_or(|c| !c.is_alphanumeric())
    }

    fn report(&mut self, kind: LexErrorKind, offset: usize, position: Position, len: usize) {
        log::debug!("{kind} at {position}");
        self.diagnostics.push(LexDiagnostic {
            kind,
            span: offset..offset + len,
            position,
        });
    }

    fn emit(&mut self, kind: TokenKind, len: usize) {
        let offset = self.cursor.offset();
        let start = self.cursor.position();
        let text = self.cursor.advance(len);
        self.push(kind, text, offset, start);
    }

    fn push(&mut self, kind: TokenKind, text: &'a str, offset: usize, start: Position) {
        self.tokens.push(Token {
            kind,
            text,
            span: offset..offset + text.len(),
            start,
            end: self.cursor.position(),
            channel: kind.channel(),
        });
    }
}

fn is_layout_char(ch: char) -> bool {
    matches!(ch, ' ' | '\t' | '\r' | '\n')
}

/// Whether `ch` may open a literal after `previous` inside a text run.
fn opens_literal(previous: char, ch: char) -> bool {
    if previous.is_alphanumeric() {
        return false;
    }
    is_quote(ch) || ch == '<' || (ch.is_ascii_digit() && !matches!(previous, '.' | '_'))
}

/// Byte length of the free-text run at the start of `text`.
///
/// A run always covers at least one character and stops at layout or where
/// a literal could start.
fn text_run_len(text: &str) -> usize {
    let mut previous = None;
    for (index, ch) in text.char_indices() {
        if let Some(prev) = previous {
            if is_layout_char(ch) || opens_literal(prev, ch) {
                return index;
            }
        }
        previous = Some(ch);
    }
    text.len()
}

/// Byte length of trimmed cell content at the start of `text`.
///
/// Backslash escapes keep an escaped `|` inside the cell.
fn cell_len(text: &str) -> usize {
    let mut end = text.len();
    let mut escaped = false;
    for (index, ch) in text.char_indices() {
        if matches!(ch, '\r' | '\n') || (ch == '|' && !escaped) {
            end = index;
            break;
        }
        escaped = ch == '\\' && !escaped;
    }
    text.get(..end)
        .map_or(end, |cell| cell.trim_end_matches([' ', '\t']).len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn kinds(text: &str) -> Vec<TokenKind> {
        tokenize(text).kinds().collect()
    }

    #[rstest]
    #[case("abc def", 3)]
    #[case("что-то", 11)]
    #[case("№1", 3)]
    #[case("v1.2", 4)]
    #[case("x-\"y\"", 2)]
    #[case("1.2.3", 5)]
    fn text_runs_stop_at_layout_and_literals(#[case] text: &str, #[case] len: usize) {
        assert_eq!(text_run_len(text), len);
    }

    #[rstest]
    #[case("abc |", 3)]
    #[case("a\\|b|", 4)]
    #[case("a\\\\|b", 3)]
    #[case("tail  \n", 4)]
    fn cells_are_trimmed_and_honour_escapes(#[case] text: &str, #[case] len: usize) {
        assert_eq!(cell_len(text), len);
    }

    #[test]
    fn hash_after_step_keyword_is_a_comment() {
        assert_eq!(
            kinds("Дано#мир"),
            [TokenKind::Given, TokenKind::Comment, TokenKind::Eof]
        );
    }

    #[test]
    fn hash_after_step_text_is_text() {
        assert_eq!(
            kinds("Дано #1"),
            [
                TokenKind::Given,
                TokenKind::Space,
                TokenKind::AnySymbol,
                TokenKind::Decimal,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn keywords_are_not_matched_mid_line() {
        assert_eq!(
            kinds("x Given y"),
            [
                TokenKind::AnySymbol,
                TokenKind::Space,
                TokenKind::AnySymbol,
                TokenKind::Space,
                TokenKind::AnySymbol,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn closing_fence_must_match_opening_fence() {
        let stream = tokenize("```\n\"\"\"\n```");
        let fences = stream
            .iter()
            .filter(|token| token.kind == TokenKind::DocStrings)
            .count();
        assert_eq!(fences, 2);
        assert!(stream.diagnostics().is_empty());
    }

    #[test]
    fn unterminated_doc_strings_are_reported() {
        let stream = tokenize("\"\"\"\ntext");
        let kinds: Vec<_> = stream.diagnostics().iter().map(|d| d.kind).collect();
        assert_eq!(kinds, [LexErrorKind::UnterminatedDocStrings]);
    }
}
