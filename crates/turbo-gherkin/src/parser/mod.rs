//! Recursive-descent parser over the lexer's token stream.
//!
//! Each production owns a recovery loop: lines it cannot place are consumed
//! as error tokens of the innermost open node, while constructs that belong
//! to an enclosing production end the loop. Parsing therefore always
//! finishes with a complete tree and never aborts.

mod sections;
mod steps;
mod table;

use turbo_gherkin_lexer::{EncodingError, Position, Token, TokenKind, from_utf8, tokenize};

use crate::ast::Feature;
use crate::config::ParseOptions;
use crate::diagnostics::{Diagnostic, DiagnosticKind};
use crate::syntax::{NodeBuilder, RuleKind, SyntaxNode};

/// Result of parsing one feature file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxTree<'a> {
    root: SyntaxNode<'a>,
    tokens: Vec<Token<'a>>,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> SyntaxTree<'a> {
    /// Root node; always of kind [`RuleKind::Feature`].
    #[must_use]
    pub fn root(&self) -> &SyntaxNode<'a> {
        &self.root
    }

    /// Typed view of the root.
    #[must_use]
    pub fn feature(&self) -> Feature<'_, 'a> {
        Feature::from_root(&self.root)
    }

    /// Every token of the input, layout and comments included.
    #[must_use]
    pub fn tokens(&self) -> &[Token<'a>] {
        &self.tokens
    }

    /// Lexical and structural diagnostics ordered by position.
    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Whether any part of the tree needed recovery.
    #[must_use]
    pub fn has_error(&self) -> bool {
        self.root.has_error()
    }

    /// Diagnostics of error severity.
    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> + '_ {
        self.diagnostics.iter().filter(|d| d.is_error())
    }
}

/// Parse feature-file text using the process configuration.
///
/// # Examples
///
/// ```
/// let tree = turbo_gherkin::parse("Функционал: пример\nСценарий: x\nДано шаг 1\n");
/// assert!(!tree.has_error());
/// assert_eq!(tree.feature().name().text(), "пример");
/// ```
#[must_use]
pub fn parse(text: &str) -> SyntaxTree<'_> {
    parse_with_options(text, &ParseOptions::current())
}

/// Parse feature-file text with explicit options.
#[must_use]
pub fn parse_with_options<'a>(text: &'a str, options: &ParseOptions) -> SyntaxTree<'a> {
    let (tokens, lexical) = tokenize(text).into_parts();
    let mut parser = Parser::new(&tokens, *options);
    parser
        .diagnostics
        .extend(lexical.into_iter().map(Diagnostic::from));
    let root = parser.feature();
    let mut diagnostics = parser.diagnostics;
    diagnostics.sort_by_key(|diagnostic| diagnostic.span.start);
    log::debug!(
        "parsed {} tokens with {} diagnostics",
        tokens.len(),
        diagnostics.len()
    );
    SyntaxTree {
        root,
        tokens,
        diagnostics,
    }
}

/// Decode raw bytes and parse them.
///
/// A leading byte-order mark is skipped once, as for [`parse`].
///
/// # Errors
///
/// Returns [`EncodingError`] when `bytes` is not valid UTF-8.
pub fn parse_bytes(bytes: &[u8]) -> Result<SyntaxTree<'_>, EncodingError> {
    from_utf8(bytes).map(parse)
}

fn is_trivia(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Space | TokenKind::Tab | TokenKind::Eol | TokenKind::Comment
    )
}

pub(crate) struct Parser<'t, 'a> {
    tokens: &'t [Token<'a>],
    pos: usize,
    options: ParseOptions,
    diagnostics: Vec<Diagnostic>,
}

impl<'t, 'a> Parser<'t, 'a> {
    fn new(tokens: &'t [Token<'a>], options: ParseOptions) -> Self {
        Self {
            tokens,
            pos: 0,
            options,
            diagnostics: Vec::new(),
        }
    }

    fn current(&self) -> Option<&'t Token<'a>> {
        self.tokens.get(self.pos)
    }

    fn current_kind(&self) -> TokenKind {
        self.current().map_or(TokenKind::Eof, |token| token.kind)
    }

    fn remaining(&self) -> &'t [Token<'a>] {
        self.tokens.get(self.pos..).unwrap_or_default()
    }

    /// Take the current token unless input is exhausted.
    fn bump(&mut self) -> Option<Token<'a>> {
        let token = self.current().filter(|token| token.kind != TokenKind::Eof)?;
        self.pos += 1;
        Some(token.clone())
    }

    fn skip_trivia(&mut self) {
        while is_trivia(self.current_kind()) {
            self.pos += 1;
        }
    }

    fn skip_inline_layout(&mut self) {
        while matches!(self.current_kind(), TokenKind::Space | TokenKind::Tab) {
            self.pos += 1;
        }
    }

    /// Skip inline layout and the line break ending the current line.
    fn finish_line(&mut self) {
        self.skip_inline_layout();
        if self.current_kind() == TokenKind::Eol {
            self.pos += 1;
        }
    }

    fn next_significant(&self) -> Option<&'t Token<'a>> {
        self.remaining().iter().find(|token| !is_trivia(token.kind))
    }

    /// Kind of the next token that is not layout or a comment.
    fn peek_significant(&self) -> TokenKind {
        self.next_significant().map_or(TokenKind::Eof, |token| token.kind)
    }

    /// Kind of the next significant token once tag lines are skipped.
    fn peek_after_tags(&self) -> TokenKind {
        let mut in_tag_line = false;
        for token in self.remaining() {
            match token.kind {
                TokenKind::Eol => in_tag_line = false,
                TokenKind::At => in_tag_line = true,
                kind if in_tag_line || is_trivia(kind) => {}
                kind => return kind,
            }
        }
        TokenKind::Eof
    }

    /// Open a node anchored at the current token.
    fn open(&self, kind: RuleKind) -> NodeBuilder<'a> {
        let (offset, position) = self.current().map_or((0, Position::START), |token| {
            (token.span.start, token.start)
        });
        NodeBuilder::new(kind, offset, position)
    }

    fn report(&mut self, kind: DiagnosticKind, token: &Token<'a>) {
        log::debug!("{} at {}", kind.message(), token.start);
        self.diagnostics
            .push(Diagnostic::new(kind, token.span.clone(), token.start));
    }

    fn report_node(&mut self, kind: DiagnosticKind, node: &SyntaxNode<'a>) {
        log::debug!("{} at {}", kind.message(), node.start());
        self.diagnostics
            .push(Diagnostic::new(kind, node.span(), node.start()));
    }

    /// Report `kind` at the next significant token.
    fn report_next(&mut self, kind: DiagnosticKind) {
        if let Some(token) = self.next_significant() {
            self.report(kind, token);
        }
    }

    /// Move the rest of the current line into `node`, line break included.
    fn take_line(&mut self, node: &mut NodeBuilder<'a>) {
        while let Some(token) = self.bump() {
            let end_of_line = token.kind == TokenKind::Eol;
            node.token(token);
            if end_of_line {
                break;
            }
        }
    }

    /// Consume the next line, or a whole doc-string block, as unexpected
    /// content of `node`.
    fn recover_line(&mut self, node: &mut NodeBuilder<'a>) {
        self.skip_trivia();
        let Some(first) = self.current().filter(|token| token.kind != TokenKind::Eof) else {
            return;
        };
        self.report(
            DiagnosticKind::UnexpectedContent {
                found: first.kind,
                context: node.kind(),
            },
            first,
        );
        node.mark_recovered();
        if first.kind == TokenKind::DocStrings {
            self.take_doc_strings_block(node);
        } else {
            self.take_line(node);
        }
    }

    fn take_doc_strings_block(&mut self, node: &mut NodeBuilder<'a>) {
        if let Some(fence) = self.bump() {
            node.token(fence);
        }
        while let Some(token) = self.bump() {
            let closing = token.kind == TokenKind::DocStrings;
            node.token(token);
            if closing {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_lines_are_transparent_to_lookahead() {
        let tokens = tokenize("@a b @c\n\n# note\n@d\nСценарий: x").into_parts().0;
        let parser = Parser::new(&tokens, ParseOptions::default());
        assert_eq!(parser.peek_after_tags(), TokenKind::Scenario);
        assert_eq!(parser.peek_significant(), TokenKind::At);
    }

    #[test]
    fn bump_never_moves_past_the_end() {
        let tokens = tokenize("x").into_parts().0;
        let mut parser = Parser::new(&tokens, ParseOptions::default());
        assert!(parser.bump().is_some());
        assert!(parser.bump().is_none());
        assert_eq!(parser.current_kind(), TokenKind::Eof);
    }
}
