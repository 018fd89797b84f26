//! Data tables.

use turbo_gherkin_lexer::{Position, Token, TokenKind};

use super::Parser;
use crate::diagnostics::DiagnosticKind;
use crate::syntax::{NodeBuilder, RuleKind, SyntaxNode};

/// Build a cell from a pipe and whatever follows it up to the next pipe.
fn cell(tokens: Vec<Token<'_>>) -> SyntaxNode<'_> {
    let (offset, position) = tokens
        .first()
        .map_or((0, Position::START), |pipe| (pipe.span.start, pipe.start));
    let mut builder = NodeBuilder::new(RuleKind::TableCell, offset, position);
    for token in tokens {
        if token.kind == TokenKind::TableCell {
            let mut value =
                NodeBuilder::new(RuleKind::TableCellValue, token.span.start, token.start);
            value.token(token);
            builder.node(value.finish());
        } else {
            builder.token(token);
        }
    }
    builder.finish()
}

fn cell_count(row: &SyntaxNode<'_>) -> usize {
    row.children_of(RuleKind::TableCell).count()
}

impl<'a> Parser<'_, 'a> {
    pub(super) fn table(&mut self) -> SyntaxNode<'a> {
        self.skip_trivia();
        let mut table = self.open(RuleKind::Table);
        let mut head = self.open(RuleKind::TableHead);
        let first = self.table_row();
        let expected = cell_count(&first);
        head.node(first);
        table.node(head.finish());

        let mut rows = self.open(RuleKind::TableRows);
        let mut index = 0;
        while self.peek_significant() == TokenKind::Pipe {
            self.skip_trivia();
            let row = self.table_row();
            index += 1;
            let actual = cell_count(&row);
            if self.options.warn_on_uneven_tables && actual != expected {
                self.report_node(
                    DiagnosticKind::UnevenTableRow {
                        row: index,
                        expected,
                        actual,
                    },
                    &row,
                );
            }
            rows.node(row);
        }
        table.node(rows.finish());
        table.finish()
    }

    /// One `|`-delimited line. A trailing pipe with nothing after it closes
    /// the row and is not a cell.
    fn table_row(&mut self) -> SyntaxNode<'a> {
        let mut row = self.open(RuleKind::TableRow);
        let mut pending: Option<Vec<Token<'a>>> = None;
        while !matches!(self.current_kind(), TokenKind::Eol | TokenKind::Eof) {
            let Some(token) = self.bump() else {
                break;
            };
            if token.kind == TokenKind::Pipe {
                if let Some(done) = pending.take() {
                    row.node(cell(done));
                }
                pending = Some(vec![token]);
            } else if let Some(open) = pending.as_mut() {
                open.push(token);
            } else {
                row.token(token);
            }
        }
        if let Some(last) = pending {
            if last.iter().any(|token| token.kind == TokenKind::TableCell) {
                row.node(cell(last));
            } else {
                for token in last {
                    row.token(token);
                }
            }
        }
        self.finish_line();
        row.finish()
    }
}
