//! Typed views over the syntax tree.
//!
//! Each view wraps a [`SyntaxNode`] of one rule kind and exposes its
//! children by role. Alternatives in the grammar are tagged variants such as
//! [`BodyContent`] and [`ScenarioItem`].

use turbo_gherkin_lexer::{ParameterKind, ParameterValue, Token, TokenKind};

use crate::syntax::{RuleKind, SyntaxNode};

macro_rules! syntax_view {
    ($(#[$meta:meta])* $name:ident => $kind:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy)]
        pub struct $name<'t, 'a>(&'t SyntaxNode<'a>);

        impl<'t, 'a> $name<'t, 'a> {
            /// Wrap `node` when it was built from the matching rule.
            #[must_use]
            pub fn cast(node: &'t SyntaxNode<'a>) -> Option<Self> {
                (node.kind() == RuleKind::$kind).then_some(Self(node))
            }

            /// Underlying syntax node.
            #[must_use]
            pub fn syntax(self) -> &'t SyntaxNode<'a> {
                self.0
            }

            /// Concatenated token text.
            #[must_use]
            pub fn text(self) -> String {
                self.0.text()
            }

            /// Whether recovery happened in this node or below.
            #[must_use]
            pub fn has_error(self) -> bool {
                self.0.has_error()
            }
        }
    };
}

fn child<'t, 'a, T>(
    node: &'t SyntaxNode<'a>,
    kind: RuleKind,
    cast: fn(&'t SyntaxNode<'a>) -> Option<T>,
) -> Option<T> {
    node.child(kind).and_then(cast)
}

fn children<'t, 'a, T>(
    node: &'t SyntaxNode<'a>,
    kind: RuleKind,
    cast: fn(&'t SyntaxNode<'a>) -> Option<T>,
) -> impl Iterator<Item = T> + 't
where
    T: 't,
{
    node.children_of(kind).filter_map(cast)
}

syntax_view!(
    /// Root of a feature file.
    Feature => Feature
);
syntax_view!(
    /// Tags attached to one construct.
    Tags => Tags
);
syntax_view!(
    /// A single `@name` tag.
    Tag => Tag
);
syntax_view!(
    /// Everything after the feature header.
    FeatureBody => FeatureBody
);
syntax_view!(
    /// Background section of a feature or rule.
    Background => Background
);
syntax_view!(
    /// Business rules of a feature body.
    BusinessRules => BusinessRules
);
syntax_view!(
    /// A `Rule:` section.
    BusinessRule => BusinessRule
);
syntax_view!(
    /// Scenarios and outlines of a feature body or rule.
    Scenarios => Scenarios
);
syntax_view!(
    /// A plain scenario.
    Scenario => Scenario
);
syntax_view!(
    /// A scenario outline.
    ScenarioOutline => ScenarioOutline
);
syntax_view!(
    /// Steps of a scenario or background.
    Steps => Steps
);
syntax_view!(
    /// One step.
    Step => Step
);
syntax_view!(
    /// Header or step text.
    Name => Name
);
syntax_view!(
    /// Literal embedded in a name.
    Parameter => Parameter
);
syntax_view!(
    /// Free-text lines under a header.
    Description => Description
);
syntax_view!(
    /// Doc-string block attached to a step.
    DocStrings => DocStrings
);
syntax_view!(
    /// `Examples:` section.
    Examples => Examples
);
syntax_view!(
    /// Data table.
    Table => Table
);
syntax_view!(
    /// One table row.
    TableRow => TableRow
);
syntax_view!(
    /// One table cell.
    TableCell => TableCell
);

/// Content of a feature body.
#[derive(Debug, Clone, Copy)]
pub enum BodyContent<'t, 'a> {
    /// Scenarios directly under the feature.
    Scenarios(Scenarios<'t, 'a>),
    /// Scenarios grouped into business rules.
    BusinessRules(BusinessRules<'t, 'a>),
}

/// Entry of a scenarios section.
#[derive(Debug, Clone, Copy)]
pub enum ScenarioItem<'t, 'a> {
    /// Plain scenario.
    Scenario(Scenario<'t, 'a>),
    /// Scenario outline.
    Outline(ScenarioOutline<'t, 'a>),
}

/// Implemented by sections that carry a header.
macro_rules! header_accessors {
    ($($name:ident),*) => {
        $(
            impl<'t, 'a> $name<'t, 'a> {
                /// Text after the header keyword.
                #[must_use]
                pub fn name(self) -> Name<'t, 'a> {
                    child(self.0, RuleKind::Name, Name::cast).unwrap_or(Name(&EMPTY_NAME))
                }

                /// Free-text lines under the header.
                #[must_use]
                pub fn description(self) -> Description<'t, 'a> {
                    child(self.0, RuleKind::Description, Description::cast)
                        .unwrap_or(Description(&EMPTY_DESCRIPTION))
                }

                /// Header keyword token.
                #[must_use]
                pub fn keyword(self) -> Option<&'t Token<'a>> {
                    self.0.tokens().find(|token| token.kind.is_structural_keyword())
                }
            }
        )*
    };
}

macro_rules! tagged {
    ($($name:ident),*) => {
        $(
            impl<'t, 'a> $name<'t, 'a> {
                /// Tags written above the construct.
                #[must_use]
                pub fn tags(self) -> Option<Tags<'t, 'a>> {
                    child(self.0, RuleKind::Tags, Tags::cast)
                }
            }
        )*
    };
}

header_accessors!(Feature, Background, BusinessRule, Scenario, ScenarioOutline, Examples);
tagged!(Feature, BusinessRule, Scenario, ScenarioOutline, Examples);

static EMPTY_NAME: SyntaxNode<'static> = SyntaxNode::empty(RuleKind::Name);
static EMPTY_DESCRIPTION: SyntaxNode<'static> = SyntaxNode::empty(RuleKind::Description);

impl<'t, 'a> Feature<'t, 'a> {
    pub(crate) fn from_root(root: &'t SyntaxNode<'a>) -> Self {
        Self(root)
    }

    /// Body with background and scenarios or rules.
    #[must_use]
    pub fn body(self) -> Option<FeatureBody<'t, 'a>> {
        child(self.0, RuleKind::FeatureBody, FeatureBody::cast)
    }
}

impl<'t, 'a> Tags<'t, 'a> {
    /// Individual tags in source order.
    pub fn tags(self) -> impl Iterator<Item = Tag<'t, 'a>> + 't {
        children(self.0, RuleKind::Tag, Tag::cast)
    }

    /// Tag names without the leading `@`.
    #[must_use]
    pub fn names(self) -> Vec<&'a str> {
        self.tags().filter_map(Tag::name).collect()
    }
}

impl<'t, 'a> Tag<'t, 'a> {
    /// Tag name without the leading `@`.
    #[must_use]
    pub fn name(self) -> Option<&'a str> {
        self.0
            .tokens()
            .find(|token| token.kind == TokenKind::AnySymbol)
            .map(|token| token.text)
    }
}

impl<'t, 'a> FeatureBody<'t, 'a> {
    /// Feature-level background.
    #[must_use]
    pub fn background(self) -> Option<Background<'t, 'a>> {
        child(self.0, RuleKind::Background, Background::cast)
    }

    /// Either the scenarios or the business rules of the feature.
    #[must_use]
    pub fn content(self) -> Option<BodyContent<'t, 'a>> {
        self.0.child_nodes().find_map(|node| match node.kind() {
            RuleKind::Scenarios => Some(BodyContent::Scenarios(Scenarios(node))),
            RuleKind::BusinessRules => Some(BodyContent::BusinessRules(BusinessRules(node))),
            _ => None,
        })
    }

    /// Scenarios directly under the feature.
    #[must_use]
    pub fn scenarios(self) -> Option<Scenarios<'t, 'a>> {
        child(self.0, RuleKind::Scenarios, Scenarios::cast)
    }

    /// Business rules of the feature.
    #[must_use]
    pub fn business_rules(self) -> Option<BusinessRules<'t, 'a>> {
        child(self.0, RuleKind::BusinessRules, BusinessRules::cast)
    }
}

impl<'t, 'a> BusinessRules<'t, 'a> {
    /// Rules in source order.
    pub fn rules(self) -> impl Iterator<Item = BusinessRule<'t, 'a>> + 't {
        children(self.0, RuleKind::BusinessRule, BusinessRule::cast)
    }
}

impl<'t, 'a> BusinessRule<'t, 'a> {
    /// Background scoped to this rule.
    #[must_use]
    pub fn background(self) -> Option<Background<'t, 'a>> {
        child(self.0, RuleKind::Background, Background::cast)
    }

    /// Scenarios of the rule.
    #[must_use]
    pub fn scenarios(self) -> Option<Scenarios<'t, 'a>> {
        child(self.0, RuleKind::Scenarios, Scenarios::cast)
    }
}

impl<'t, 'a> Scenarios<'t, 'a> {
    /// Scenarios and outlines in source order.
    pub fn items(self) -> impl Iterator<Item = ScenarioItem<'t, 'a>> + 't {
        self.0.child_nodes().filter_map(|node| match node.kind() {
            RuleKind::Scenario => Some(ScenarioItem::Scenario(Scenario(node))),
            RuleKind::ScenarioOutline => Some(ScenarioItem::Outline(ScenarioOutline(node))),
            _ => None,
        })
    }

    /// Plain scenarios only.
    pub fn scenarios(self) -> impl Iterator<Item = Scenario<'t, 'a>> + 't {
        children(self.0, RuleKind::Scenario, Scenario::cast)
    }

    /// Scenario outlines only.
    pub fn outlines(self) -> impl Iterator<Item = ScenarioOutline<'t, 'a>> + 't {
        children(self.0, RuleKind::ScenarioOutline, ScenarioOutline::cast)
    }
}

impl<'t, 'a> ScenarioItem<'t, 'a> {
    /// Underlying syntax node.
    #[must_use]
    pub fn syntax(self) -> &'t SyntaxNode<'a> {
        match self {
            Self::Scenario(scenario) => scenario.syntax(),
            Self::Outline(outline) => outline.syntax(),
        }
    }

    /// Steps of the scenario or outline.
    #[must_use]
    pub fn steps(self) -> Option<Steps<'t, 'a>> {
        child(self.syntax(), RuleKind::Steps, Steps::cast)
    }
}

impl<'t, 'a> Background<'t, 'a> {
    /// Steps of the background.
    #[must_use]
    pub fn steps(self) -> Option<Steps<'t, 'a>> {
        child(self.0, RuleKind::Steps, Steps::cast)
    }
}

impl<'t, 'a> Scenario<'t, 'a> {
    /// Steps of the scenario.
    #[must_use]
    pub fn steps(self) -> Option<Steps<'t, 'a>> {
        child(self.0, RuleKind::Steps, Steps::cast)
    }
}

impl<'t, 'a> ScenarioOutline<'t, 'a> {
    /// Steps of the outline.
    #[must_use]
    pub fn steps(self) -> Option<Steps<'t, 'a>> {
        child(self.0, RuleKind::Steps, Steps::cast)
    }

    /// Examples sections in source order.
    pub fn examples(self) -> impl Iterator<Item = Examples<'t, 'a>> + 't {
        children(self.0, RuleKind::Examples, Examples::cast)
    }
}

impl<'t, 'a> Examples<'t, 'a> {
    /// Table of example values.
    #[must_use]
    pub fn table(self) -> Option<Table<'t, 'a>> {
        child(self.0, RuleKind::Table, Table::cast)
    }
}

impl<'t, 'a> Steps<'t, 'a> {
    /// Steps in source order.
    pub fn steps(self) -> impl Iterator<Item = Step<'t, 'a>> + 't {
        children(self.0, RuleKind::Step, Step::cast)
    }

    /// Number of steps.
    #[must_use]
    pub fn len(self) -> usize {
        self.steps().count()
    }

    /// Whether there are no steps.
    #[must_use]
    pub fn is_empty(self) -> bool {
        self.steps().next().is_none()
    }
}

impl<'t, 'a> Step<'t, 'a> {
    /// Step keyword token.
    #[must_use]
    pub fn keyword(self) -> Option<&'t Token<'a>> {
        self.0.tokens().find(|token| token.kind.is_step_keyword())
    }

    /// Step text.
    #[must_use]
    pub fn name(self) -> Name<'t, 'a> {
        child(self.0, RuleKind::Name, Name::cast).unwrap_or(Name(&EMPTY_NAME))
    }

    /// Doc string attached to the step.
    #[must_use]
    pub fn doc_strings(self) -> Option<DocStrings<'t, 'a>> {
        child(self.0, RuleKind::DocStrings, DocStrings::cast)
    }

    /// Table attached to the step.
    #[must_use]
    pub fn table(self) -> Option<Table<'t, 'a>> {
        child(self.0, RuleKind::Table, Table::cast)
    }
}

impl<'t, 'a> Name<'t, 'a> {
    /// Literal parameters in source order.
    pub fn parameters(self) -> impl Iterator<Item = Parameter<'t, 'a>> + 't {
        children(self.0, RuleKind::Parameter, Parameter::cast)
    }
}

impl<'t, 'a> Parameter<'t, 'a> {
    /// Literal token.
    #[must_use]
    pub fn token(self) -> Option<&'t Token<'a>> {
        self.0.tokens().next()
    }

    /// Literal kind.
    #[must_use]
    pub fn kind(self) -> Option<ParameterKind> {
        self.token()
            .and_then(|token| ParameterKind::from_token(token.kind))
    }

    /// Interpreted literal value.
    #[must_use]
    pub fn value(self) -> Option<ParameterValue<'a>> {
        let token = self.token()?;
        ParameterValue::parse(self.kind()?, token.text)
    }
}

impl<'t, 'a> DocStrings<'t, 'a> {
    /// Content lines, verbatim.
    #[must_use]
    pub fn value(self) -> String {
        self.0
            .child(RuleKind::DocStringsValue)
            .map(SyntaxNode::text)
            .unwrap_or_default()
    }

    /// Text after the opening fence, such as `json`.
    #[must_use]
    pub fn media_type(self) -> Option<String> {
        let media: String = self
            .0
            .tokens()
            .skip(1)
            .take_while(|token| token.kind != TokenKind::Eol && token.kind != TokenKind::DocStrings)
            .map(|token| token.text)
            .collect();
        let media = media.trim();
        (!media.is_empty()).then(|| media.to_string())
    }
}

impl<'t, 'a> Table<'t, 'a> {
    /// First row.
    #[must_use]
    pub fn head(self) -> Option<TableRow<'t, 'a>> {
        self.0
            .child(RuleKind::TableHead)
            .and_then(|head| child(head, RuleKind::TableRow, TableRow::cast))
    }

    /// Rows after the head.
    pub fn rows(self) -> impl Iterator<Item = TableRow<'t, 'a>> + 't {
        self.0
            .child(RuleKind::TableRows)
            .into_iter()
            .flat_map(|rows| children(rows, RuleKind::TableRow, TableRow::cast))
    }
}

impl<'t, 'a> TableRow<'t, 'a> {
    /// Cells in source order.
    pub fn cells(self) -> impl Iterator<Item = TableCell<'t, 'a>> + 't {
        children(self.0, RuleKind::TableCell, TableCell::cast)
    }

    /// Cell values; empty cells yield an empty string.
    #[must_use]
    pub fn values(self) -> Vec<String> {
        self.cells().map(TableCell::value).collect()
    }
}

impl<'t, 'a> TableCell<'t, 'a> {
    /// Cell content with `\|`, `\\` and `\n` escapes resolved.
    #[must_use]
    pub fn value(self) -> String {
        self.raw_value().map(unescape_cell).unwrap_or_default()
    }

    /// Cell content as written.
    #[must_use]
    pub fn raw_value(self) -> Option<&'a str> {
        self.0
            .child(RuleKind::TableCellValue)
            .and_then(|value| value.tokens().next())
            .map(|token| token.text)
    }
}

fn unescape_cell(raw: &str) -> String {
    let mut value = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            value.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => value.push('\n'),
            Some(escaped @ ('|' | '\\')) => value.push(escaped),
            Some(other) => {
                value.push('\\');
                value.push(other);
            }
            None => value.push('\\'),
        }
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("a\\|b", "a|b")]
    #[case("a\\\\b", "a\\b")]
    #[case("line\\nnext", "line\nnext")]
    #[case("keep\\x", "keep\\x")]
    #[case("tail\\", "tail\\")]
    fn resolves_cell_escapes(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(unescape_cell(raw), expected);
    }
}
