//! Untyped syntax tree.
//!
//! Nodes own their children, which are either nested nodes or tokens in
//! source order. Layout between constructs is not attached to the tree; the
//! full token list lives on [`crate::SyntaxTree`].

use std::fmt;
use std::ops::Range;

use turbo_gherkin_lexer::{Position, Token};

/// Grammar rule a node was built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleKind {
    /// Root of a feature file.
    Feature,
    /// Tags attached to one construct.
    Tags,
    /// A single `@name` tag.
    Tag,
    /// Everything after the feature header.
    FeatureBody,
    /// Background section.
    Background,
    /// Sequence of business rules.
    BusinessRules,
    /// A `Rule:` section.
    BusinessRule,
    /// Sequence of scenarios and outlines.
    Scenarios,
    /// A plain scenario.
    Scenario,
    /// A scenario outline.
    ScenarioOutline,
    /// Steps of a scenario or background.
    Steps,
    /// A single step.
    Step,
    /// Header or step text.
    Name,
    /// Literal parameter inside a name.
    Parameter,
    /// Free-text lines under a header.
    Description,
    /// Doc-string block attached to a step.
    DocStrings,
    /// Content lines of a doc-string block.
    DocStringsValue,
    /// `Examples:` section of an outline.
    Examples,
    /// A data table.
    Table,
    /// First row of a table.
    TableHead,
    /// Rows after the head.
    TableRows,
    /// One table row.
    TableRow,
    /// One table cell.
    TableCell,
    /// Content of a table cell.
    TableCellValue,
}

impl RuleKind {
    /// Stable rule identifier.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Feature => "feature",
            Self::Tags => "tags",
            Self::Tag => "tag",
            Self::FeatureBody => "featureBody",
            Self::Background => "background",
            Self::BusinessRules => "businessRules",
            Self::BusinessRule => "businessRule",
            Self::Scenarios => "scenarios",
            Self::Scenario => "scenario",
            Self::ScenarioOutline => "scenarioOutline",
            Self::Steps => "steps",
            Self::Step => "step",
            Self::Name => "name",
            Self::Parameter => "parameter",
            Self::Description => "description",
            Self::DocStrings => "docStrings",
            Self::DocStringsValue => "docStringsValue",
            Self::Examples => "examples",
            Self::Table => "table",
            Self::TableHead => "tableHead",
            Self::TableRows => "tableRows",
            Self::TableRow => "tableRow",
            Self::TableCell => "tableCell",
            Self::TableCellValue => "tableCellValue",
        }
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Child of a syntax node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyntaxElement<'a> {
    /// Nested node.
    Node(SyntaxNode<'a>),
    /// Token owned directly by the parent.
    Token(Token<'a>),
}

impl<'a> SyntaxElement<'a> {
    fn span(&self) -> (Range<usize>, Position, Position) {
        match self {
            Self::Node(node) => (node.span.clone(), node.start, node.end),
            Self::Token(token) => (token.span.clone(), token.start, token.end),
        }
    }

    /// The nested node, if this element is one.
    #[must_use]
    pub fn as_node(&self) -> Option<&SyntaxNode<'a>> {
        match self {
            Self::Node(node) => Some(node),
            Self::Token(_) => None,
        }
    }

    /// The token, if this element is one.
    #[must_use]
    pub fn as_token(&self) -> Option<&Token<'a>> {
        match self {
            Self::Token(token) => Some(token),
            Self::Node(_) => None,
        }
    }
}

/// Immutable node of the syntax tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxNode<'a> {
    kind: RuleKind,
    children: Vec<SyntaxElement<'a>>,
    span: Range<usize>,
    start: Position,
    end: Position,
    recovered: bool,
    erroneous: bool,
}

impl<'a> SyntaxNode<'a> {
    pub(crate) const fn empty(kind: RuleKind) -> Self {
        Self {
            kind,
            children: Vec::new(),
            span: 0..0,
            start: Position::START,
            end: Position::START,
            recovered: false,
            erroneous: false,
        }
    }

    /// Rule the node was built from.
    #[must_use]
    pub fn kind(&self) -> RuleKind {
        self.kind
    }

    /// Children in source order.
    #[must_use]
    pub fn children(&self) -> &[SyntaxElement<'a>] {
        &self.children
    }

    /// Byte range covered by the node.
    ///
    /// Empty nodes have a zero-width span where they were opened.
    #[must_use]
    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }

    /// Position of the first character.
    #[must_use]
    pub fn start(&self) -> Position {
        self.start
    }

    /// Position just past the last character.
    #[must_use]
    pub fn end(&self) -> Position {
        self.end
    }

    /// Whether recovery happened in this node or any descendant.
    #[must_use]
    pub fn has_error(&self) -> bool {
        self.erroneous
    }

    /// Whether recovery happened in this node itself.
    #[must_use]
    pub fn is_recovery_site(&self) -> bool {
        self.recovered
    }

    /// Whether the node has no children.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Concatenated text of every token below the node.
    #[must_use]
    pub fn text(&self) -> String {
        let mut text = String::new();
        self.write_text(&mut text);
        text
    }

    fn write_text(&self, out: &mut String) {
        for child in &self.children {
            match child {
                SyntaxElement::Node(node) => node.write_text(out),
                SyntaxElement::Token(token) => out.push_str(token.text),
            }
        }
    }

    /// Direct child nodes.
    pub fn child_nodes(&self) -> impl Iterator<Item = &SyntaxNode<'a>> + '_ {
        self.children.iter().filter_map(SyntaxElement::as_node)
    }

    /// Tokens owned directly by the node.
    pub fn tokens(&self) -> impl Iterator<Item = &Token<'a>> + '_ {
        self.children.iter().filter_map(SyntaxElement::as_token)
    }

    /// First direct child node of `kind`.
    #[must_use]
    pub fn child(&self, kind: RuleKind) -> Option<&SyntaxNode<'a>> {
        self.child_nodes().find(|node| node.kind == kind)
    }

    /// Direct child nodes of `kind`.
    pub fn children_of(&self, kind: RuleKind) -> impl Iterator<Item = &SyntaxNode<'a>> + '_ {
        self.child_nodes().filter(move |node| node.kind == kind)
    }

    /// All nodes below this one in pre-order, excluding the node itself.
    #[must_use]
    pub fn descendants(&self) -> Vec<&SyntaxNode<'a>> {
        let mut found = Vec::new();
        let mut stack: Vec<&SyntaxNode<'a>> = self.child_nodes().collect();
        stack.reverse();
        while let Some(node) = stack.pop() {
            found.push(node);
            let mut nested: Vec<_> = node.child_nodes().collect();
            nested.reverse();
            stack.extend(nested);
        }
        found
    }
}

/// Incrementally assembles a [`SyntaxNode`].
#[derive(Debug)]
pub(crate) struct NodeBuilder<'a> {
    kind: RuleKind,
    children: Vec<SyntaxElement<'a>>,
    recovered: bool,
    anchor: (usize, Position),
}

impl<'a> NodeBuilder<'a> {
    /// Open a node at `offset`, used as its span when it stays empty.
    pub(crate) fn new(kind: RuleKind, offset: usize, position: Position) -> Self {
        Self {
            kind,
            children: Vec::new(),
            recovered: false,
            anchor: (offset, position),
        }
    }

    pub(crate) fn kind(&self) -> RuleKind {
        self.kind
    }

    pub(crate) fn token(&mut self, token: Token<'a>) {
        self.children.push(SyntaxElement::Token(token));
    }

    pub(crate) fn node(&mut self, node: SyntaxNode<'a>) {
        self.children.push(SyntaxElement::Node(node));
    }

    pub(crate) fn mark_recovered(&mut self) {
        self.recovered = true;
    }

    pub(crate) fn finish(self) -> SyntaxNode<'a> {
        let (offset, position) = self.anchor;
        let first = self.children.first().map(SyntaxElement::span);
        let last = self.children.last().map(SyntaxElement::span);
        let (span, start, end) = match (first, last) {
            (Some((first, start, _)), Some((last, _, end))) => (first.start..last.end, start, end),
            _ => (offset..offset, position, position),
        };
        let erroneous = self.recovered
            || self
                .children
                .iter()
                .filter_map(SyntaxElement::as_node)
                .any(SyntaxNode::has_error);
        SyntaxNode {
            kind: self.kind,
            children: self.children,
            span,
            start,
            end,
            recovered: self.recovered,
            erroneous,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use turbo_gherkin_lexer::tokenize;

    #[test]
    fn empty_nodes_are_zero_width_at_their_anchor() {
        let node = NodeBuilder::new(RuleKind::Description, 7, Position::new(2, 3)).finish();
        assert_eq!(node.span(), 7..7);
        assert_eq!(node.start(), Position::new(2, 3));
        assert!(node.text().is_empty());
        assert!(!node.has_error());
    }

    #[test]
    fn errors_propagate_to_ancestors() {
        let stream = tokenize("x y");
        let mut inner = NodeBuilder::new(RuleKind::Name, 0, Position::START);
        for token in stream.iter().take(3).cloned() {
            inner.token(token);
        }
        inner.mark_recovered();
        let mut outer = NodeBuilder::new(RuleKind::Step, 0, Position::START);
        outer.node(inner.finish());
        let outer = outer.finish();
        assert!(outer.has_error());
        assert!(!outer.is_recovery_site());
        assert_eq!(outer.span(), 0..3);
        assert_eq!(outer.text(), "x y");
        assert_eq!(outer.descendants().len(), 1);
    }
}
