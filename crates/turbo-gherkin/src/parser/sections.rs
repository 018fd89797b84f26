//! Feature, rule, scenario and examples sections.

use turbo_gherkin_lexer::TokenKind;

use super::Parser;
use crate::diagnostics::DiagnosticKind;
use crate::syntax::{NodeBuilder, RuleKind, SyntaxNode};

/// Where a scenarios section sits, which decides what ends it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    Feature,
    Rule,
}

fn is_examples(kind: TokenKind) -> bool {
    matches!(kind, TokenKind::Examples | TokenKind::Scenarios)
}

impl<'a> Parser<'_, 'a> {
    pub(super) fn feature(&mut self) -> SyntaxNode<'a> {
        self.skip_trivia();
        let mut feature = self.open(RuleKind::Feature);
        if self.peek_after_tags() == TokenKind::Feature {
            self.tags_into(&mut feature);
            self.header(&mut feature);
        } else {
            self.missing_feature(&mut feature);
        }
        feature.node(self.feature_body());
        feature.finish()
    }

    /// Skip content up to the first construct a feature can continue with.
    fn missing_feature(&mut self, feature: &mut NodeBuilder<'a>) {
        self.report_next(DiagnosticKind::MissingFeature {
            found: self.peek_after_tags(),
        });
        feature.mark_recovered();
        loop {
            match self.peek_after_tags() {
                TokenKind::Feature => {
                    self.tags_into(feature);
                    return self.header(feature);
                }
                TokenKind::Eof
                | TokenKind::Background
                | TokenKind::Rule
                | TokenKind::Scenario
                | TokenKind::Example
                | TokenKind::ScenarioOutline => break,
                _ => {
                    self.skip_trivia();
                    self.take_line(feature);
                }
            }
        }
        feature.node(self.open(RuleKind::Name).finish());
        feature.node(self.open(RuleKind::Description).finish());
    }

    /// Keyword, colon, name and description of a section header.
    fn header(&mut self, node: &mut NodeBuilder<'a>) {
        self.skip_trivia();
        if let Some(keyword) = self.bump() {
            node.token(keyword);
        }
        if self.current_kind() == TokenKind::Colon {
            if let Some(colon) = self.bump() {
                node.token(colon);
            }
        }
        node.node(self.name());
        node.node(self.description());
    }

    fn tags_into(&mut self, node: &mut NodeBuilder<'a>) {
        if self.peek_significant() == TokenKind::At {
            node.node(self.tags());
        }
    }

    /// Free-text lines up to the first line a section can continue with.
    pub(super) fn description(&mut self) -> SyntaxNode<'a> {
        let mut description = self.open(RuleKind::Description);
        loop {
            let kind = self.peek_significant();
            if kind == TokenKind::Eof
                || kind.is_keyword()
                || matches!(kind, TokenKind::At | TokenKind::Pipe | TokenKind::DocStrings)
            {
                break;
            }
            self.skip_trivia();
            self.take_line(&mut description);
        }
        description.finish()
    }

    fn tags(&mut self) -> SyntaxNode<'a> {
        self.skip_trivia();
        let mut tags = self.open(RuleKind::Tags);
        while self.peek_significant() == TokenKind::At {
            self.skip_trivia();
            let mut reported = false;
            loop {
                match self.current_kind() {
                    TokenKind::At => tags.node(self.tag()),
                    TokenKind::Space | TokenKind::Tab | TokenKind::Comment => self.pos += 1,
                    TokenKind::Eol | TokenKind::Eof => break,
                    found => {
                        if !reported {
                            self.report_next(DiagnosticKind::UnexpectedContent {
                                found,
                                context: RuleKind::Tags,
                            });
                            tags.mark_recovered();
                            reported = true;
                        }
                        if let Some(token) = self.bump() {
                            tags.token(token);
                        }
                    }
                }
            }
        }
        tags.finish()
    }

    fn tag(&mut self) -> SyntaxNode<'a> {
        let mut tag = self.open(RuleKind::Tag);
        let Some(at) = self.bump() else {
            return tag.finish();
        };
        if self.current_kind() == TokenKind::AnySymbol {
            tag.token(at);
            if let Some(name) = self.bump() {
                tag.token(name);
            }
        } else {
            self.report(DiagnosticKind::EmptyTag, &at);
            tag.token(at);
            tag.mark_recovered();
        }
        tag.finish()
    }

    fn feature_body(&mut self) -> SyntaxNode<'a> {
        self.skip_trivia();
        let mut body = self.open(RuleKind::FeatureBody);
        if self.peek_significant() == TokenKind::Background {
            body.node(self.background());
        }
        if self.peek_after_tags() == TokenKind::Rule {
            body.node(self.business_rules());
        } else {
            body.node(self.scenarios(Scope::Feature));
        }
        body.finish()
    }

    fn background(&mut self) -> SyntaxNode<'a> {
        self.skip_trivia();
        let mut background = self.open(RuleKind::Background);
        self.header(&mut background);
        background.node(self.steps());
        background.finish()
    }

    fn business_rules(&mut self) -> SyntaxNode<'a> {
        self.skip_trivia();
        let mut rules = self.open(RuleKind::BusinessRules);
        loop {
            match self.peek_after_tags() {
                TokenKind::Rule => rules.node(self.business_rule()),
                TokenKind::Eof => break,
                _ => self.recover_line(&mut rules),
            }
        }
        rules.finish()
    }

    fn business_rule(&mut self) -> SyntaxNode<'a> {
        self.skip_trivia();
        let mut rule = self.open(RuleKind::BusinessRule);
        self.tags_into(&mut rule);
        self.header(&mut rule);
        if self.peek_significant() == TokenKind::Background {
            rule.node(self.background());
        }
        rule.node(self.scenarios(Scope::Rule));
        rule.finish()
    }

    /// Scenarios and outlines up to the end of input, or up to the next rule
    /// inside a rule. Tag lines with nothing left to tag are unexpected.
    fn scenarios(&mut self, scope: Scope) -> SyntaxNode<'a> {
        self.skip_trivia();
        let mut scenarios = self.open(RuleKind::Scenarios);
        loop {
            match self.peek_after_tags() {
                TokenKind::Scenario | TokenKind::Example => scenarios.node(self.scenario()),
                TokenKind::ScenarioOutline => scenarios.node(self.scenario_outline()),
                TokenKind::Eof if self.peek_significant() == TokenKind::At => {
                    self.recover_line(&mut scenarios);
                }
                TokenKind::Eof => break,
                TokenKind::Rule if scope == Scope::Rule => break,
                _ => self.recover_line(&mut scenarios),
            }
        }
        scenarios.finish()
    }

    fn scenario(&mut self) -> SyntaxNode<'a> {
        self.skip_trivia();
        let mut scenario = self.open(RuleKind::Scenario);
        self.tags_into(&mut scenario);
        self.header(&mut scenario);
        scenario.node(self.steps());
        while is_examples(self.peek_after_tags()) {
            self.report_next(DiagnosticKind::MisplacedExamples);
            scenario.mark_recovered();
            scenario.node(self.examples());
        }
        scenario.finish()
    }

    fn scenario_outline(&mut self) -> SyntaxNode<'a> {
        self.skip_trivia();
        let mut outline = self.open(RuleKind::ScenarioOutline);
        self.tags_into(&mut outline);
        self.skip_trivia();
        let keyword = self.current().cloned();
        self.header(&mut outline);
        outline.node(self.steps());
        let mut found = false;
        while is_examples(self.peek_after_tags()) {
            outline.node(self.examples());
            found = true;
        }
        if !found {
            if let Some(keyword) = keyword {
                self.report(DiagnosticKind::MissingExamples, &keyword);
            }
            outline.mark_recovered();
        }
        outline.finish()
    }

    fn examples(&mut self) -> SyntaxNode<'a> {
        self.skip_trivia();
        let mut examples = self.open(RuleKind::Examples);
        self.tags_into(&mut examples);
        self.skip_trivia();
        let keyword = self.current().cloned();
        self.header(&mut examples);
        if self.peek_significant() == TokenKind::Pipe {
            examples.node(self.table());
        } else {
            if let Some(keyword) = keyword {
                self.report(DiagnosticKind::MissingTable, &keyword);
            }
            examples.mark_recovered();
        }
        examples.finish()
    }
}
