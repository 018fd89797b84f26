//! Token model produced by the lexer.

use std::fmt;
use std::ops::Range;

use derive_more::Deref;

use crate::errors::LexDiagnostic;
use crate::source::Position;

/// Kind of a lexical token.
///
/// The set is closed and its names are stable, so consumers may match on
/// kinds rather than on token positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// `Feature` header keyword.
    Feature,
    /// `Background` header keyword.
    Background,
    /// `Rule` header keyword.
    Rule,
    /// `Scenario` header keyword.
    Scenario,
    /// `Example` header keyword, a synonym of `Scenario`.
    Example,
    /// `Scenario Outline` header keyword.
    ScenarioOutline,
    /// `Examples` header keyword.
    Examples,
    /// `Scenarios` header keyword, a synonym of `Examples`.
    Scenarios,
    /// `Given` step keyword.
    Given,
    /// `When` step keyword.
    When,
    /// `If` step keyword.
    If,
    /// `Then` step keyword.
    Then,
    /// `And` step keyword.
    And,
    /// `But` step keyword.
    But,
    /// Colon terminating a header keyword.
    Colon,
    /// `@` introducing a tag.
    At,
    /// `|` delimiting table cells.
    Pipe,
    /// `<name>` placeholder referring to an examples column.
    AngleParameter,
    /// Quoted string literal, quotes included.
    String,
    /// Integer literal.
    Decimal,
    /// Floating-point literal.
    Float,
    /// A single space.
    Space,
    /// A single tab.
    Tab,
    /// One logical line break (`\r\n`, `\r` or `\n`).
    Eol,
    /// Run of free text.
    AnySymbol,
    /// Doc-string fence.
    DocStrings,
    /// Trimmed content of one table cell.
    TableCell,
    /// `#` comment up to the end of the line.
    Comment,
    /// End of input.
    Eof,
}

impl TokenKind {
    /// Stable upper-case identifier of the kind.
    ///
    /// # Examples
    ///
    /// ```
    /// use turbo_gherkin_lexer::TokenKind;
    ///
    /// assert_eq!(TokenKind::ScenarioOutline.name(), "SCENARIO_OUTLINE_KEYWORD");
    /// assert_eq!(TokenKind::Float.name(), "FLOAT");
    /// ```
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Feature => "FEATURE_KEYWORD",
            Self::Background => "BACKGROUND_KEYWORD",
            Self::Rule => "RULE_KEYWORD",
            Self::Scenario => "SCENARIO_KEYWORD",
            Self::Example => "EXAMPLE_KEYWORD",
            Self::ScenarioOutline => "SCENARIO_OUTLINE_KEYWORD",
            Self::Examples => "EXAMPLES_KEYWORD",
            Self::Scenarios => "SCENARIOS_KEYWORD",
            Self::Given => "GIVEN_KEYWORD",
            Self::When => "WHEN_KEYWORD",
            Self::If => "IF_KEYWORD",
            Self::Then => "THEN_KEYWORD",
            Self::And => "AND_KEYWORD",
            Self::But => "BUT_KEYWORD",
            Self::Colon => "COLON",
            Self::At => "AT",
            Self::Pipe => "PIPE",
            Self::AngleParameter => "ANGLE_PARAMETER",
            Self::String => "STRING",
            Self::Decimal => "DECIMAL",
            Self::Float => "FLOAT",
            Self::Space => "SPACE",
            Self::Tab => "TAB",
            Self::Eol => "EOL",
            Self::AnySymbol => "ANYSYMBOL",
            Self::DocStrings => "DOC_STRINGS",
            Self::TableCell => "TABLE_CELL",
            Self::Comment => "COMMENT",
            Self::Eof => "EOF",
        }
    }

    /// Header keywords that must be followed by a colon.
    #[must_use]
    pub const fn is_structural_keyword(self) -> bool {
        matches!(
            self,
            Self::Feature
                | Self::Background
                | Self::Rule
                | Self::Scenario
                | Self::Example
                | Self::ScenarioOutline
                | Self::Examples
                | Self::Scenarios
        )
    }

    /// Keywords that open a step.
    #[must_use]
    pub const fn is_step_keyword(self) -> bool {
        matches!(
            self,
            Self::Given | Self::When | Self::If | Self::Then | Self::And | Self::But
        )
    }

    /// Any keyword, structural or step.
    #[must_use]
    pub const fn is_keyword(self) -> bool {
        self.is_structural_keyword() || self.is_step_keyword()
    }

    /// Space, tab and line break.
    #[must_use]
    pub const fn is_layout(self) -> bool {
        matches!(self, Self::Space | Self::Tab | Self::Eol)
    }

    /// Literals that become step or name parameters.
    #[must_use]
    pub const fn is_literal(self) -> bool {
        matches!(self, Self::String | Self::Decimal | Self::Float)
    }

    /// Channel tokens of this kind are emitted on.
    #[must_use]
    pub const fn channel(self) -> Channel {
        match self {
            Self::Space | Self::Tab | Self::Eol | Self::Comment => Channel::Hidden,
            _ => Channel::Default,
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Separates structurally significant tokens from layout and comments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    /// Content consumed by the parser.
    Default,
    /// Layout and comments kept for lossless reconstruction.
    Hidden,
}

/// A token borrowing its text from the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    /// Token classification.
    pub kind: TokenKind,
    /// Original-case text covered by the token.
    pub text: &'a str,
    /// Byte range of the token within the input.
    pub span: Range<usize>,
    /// Position of the first character.
    pub start: Position,
    /// Position just past the last character.
    pub end: Position,
    /// Channel the token belongs to.
    pub channel: Channel,
}

impl Token<'_> {
    /// Whether the token carries no text.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:?} at {}", self.kind, self.text, self.start)
    }
}

/// Ordered tokens of one input together with its lexical diagnostics.
///
/// The stream dereferences to the token vector; the last token is always
/// [`TokenKind::Eof`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deref)]
pub struct TokenStream<'a> {
    #[deref]
    tokens: Vec<Token<'a>>,
    diagnostics: Vec<LexDiagnostic>,
}

impl<'a> TokenStream<'a> {
    pub(crate) fn new(tokens: Vec<Token<'a>>, diagnostics: Vec<LexDiagnostic>) -> Self {
        Self {
            tokens,
            diagnostics,
        }
    }

    /// Lexical problems found during the scan.
    #[must_use]
    pub fn diagnostics(&self) -> &[LexDiagnostic] {
        &self.diagnostics
    }

    /// Kinds of all tokens in order.
    pub fn kinds(&self) -> impl Iterator<Item = TokenKind> + '_ {
        self.tokens.iter().map(|token| token.kind)
    }

    /// Tokens on the default channel.
    pub fn significant(&self) -> impl Iterator<Item = &Token<'a>> + '_ {
        self.tokens
            .iter()
            .filter(|token| token.channel == Channel::Default)
    }

    /// Concatenate every token's text, reproducing the input without a
    /// leading byte-order mark.
    #[must_use]
    pub fn reconstruct(&self) -> String {
        self.tokens.iter().map(|token| token.text).collect()
    }

    /// Split the stream into its tokens and diagnostics.
    #[must_use]
    pub fn into_parts(self) -> (Vec<Token<'a>>, Vec<LexDiagnostic>) {
        (self.tokens, self.diagnostics)
    }
}
