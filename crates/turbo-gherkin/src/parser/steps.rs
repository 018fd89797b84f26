//! Steps, names with parameters and doc strings.

use turbo_gherkin_lexer::{Token, TokenKind};

use super::Parser;
use crate::syntax::{NodeBuilder, RuleKind, SyntaxNode};

fn parameter(token: Token<'_>) -> SyntaxNode<'_> {
    let mut parameter = NodeBuilder::new(RuleKind::Parameter, token.span.start, token.start);
    parameter.token(token);
    parameter.finish()
}

impl<'a> Parser<'_, 'a> {
    pub(super) fn steps(&mut self) -> SyntaxNode<'a> {
        self.skip_trivia();
        let mut steps = self.open(RuleKind::Steps);
        loop {
            let kind = self.peek_significant();
            if kind.is_step_keyword() {
                self.skip_trivia();
                steps.node(self.step());
            } else if kind == TokenKind::Eof || kind == TokenKind::At || kind.is_structural_keyword()
            {
                break;
            } else {
                self.recover_line(&mut steps);
            }
        }
        steps.finish()
    }

    fn step(&mut self) -> SyntaxNode<'a> {
        let mut step = self.open(RuleKind::Step);
        if let Some(keyword) = self.bump() {
            step.token(keyword);
        }
        step.node(self.name());
        if self.peek_significant() == TokenKind::DocStrings {
            self.skip_trivia();
            step.node(self.doc_strings());
        }
        if self.peek_significant() == TokenKind::Pipe {
            step.node(self.table());
        }
        step.finish()
    }

    /// Rest of the current line without surrounding layout.
    ///
    /// Literals become [`RuleKind::Parameter`] nodes in place.
    pub(super) fn name(&mut self) -> SyntaxNode<'a> {
        self.skip_inline_layout();
        let mut name = self.open(RuleKind::Name);
        let mut layout = Vec::new();
        while !matches!(self.current_kind(), TokenKind::Eol | TokenKind::Eof) {
            let Some(token) = self.bump() else {
                break;
            };
            match token.kind {
                TokenKind::Space | TokenKind::Tab => layout.push(token),
                TokenKind::Comment => {}
                kind => {
                    for pending in layout.drain(..) {
                        name.token(pending);
                    }
                    if kind.is_literal() {
                        name.node(parameter(token));
                    } else {
                        name.token(token);
                    }
                }
            }
        }
        self.finish_line();
        name.finish()
    }

    fn doc_strings(&mut self) -> SyntaxNode<'a> {
        let mut block = self.open(RuleKind::DocStrings);
        self.take_line(&mut block);
        let mut value = self.open(RuleKind::DocStringsValue);
        let mut content = Vec::new();
        let mut closing = None;
        while let Some(token) = self.bump() {
            if token.kind == TokenKind::DocStrings {
                closing = Some(token);
                break;
            }
            content.push(token);
        }
        let indentation = if closing.is_some() {
            let indent = content
                .iter()
                .rev()
                .take_while(|token| matches!(token.kind, TokenKind::Space | TokenKind::Tab))
                .count();
            content.split_off(content.len() - indent)
        } else {
            Vec::new()
        };
        for token in content {
            value.token(token);
        }
        block.node(value.finish());
        match closing {
            Some(fence) => {
                for token in indentation {
                    block.token(token);
                }
                block.token(fence);
                self.finish_line();
            }
            None => {
                log::debug!("doc string block runs to the end of input");
                block.mark_recovered();
            }
        }
        block.finish()
    }
}
