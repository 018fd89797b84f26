//! Multi-language keyword dictionary.
//!
//! The dictionary is built once per process and never mutated. Phrases are
//! stored case-folded and ordered longest first, so the first entry that
//! matches and is properly terminated is the longest match.

use std::sync::LazyLock;

use crate::source::{fold_case, folded};
use crate::token::TokenKind;

const SYNONYMS: &[(TokenKind, &[&str])] = &[
    (
        TokenKind::Feature,
        &[
            "Feature",
            "Функция",
            "Функционал",
            "Функциональность",
            "Свойство",
        ],
    ),
    (
        TokenKind::Background,
        &["Background", "Контекст", "Предыстория"],
    ),
    (TokenKind::Rule, &["Rule", "Правило"]),
    (TokenKind::Scenario, &["Scenario", "Сценарий"]),
    (TokenKind::Example, &["Example", "Пример"]),
    (
        TokenKind::ScenarioOutline,
        &[
            "Scenario outline",
            "Scenario template",
            "Структура сценария",
            "Шаблон сценария",
        ],
    ),
    (TokenKind::Examples, &["Examples", "Примеры"]),
    (TokenKind::Scenarios, &["Scenarios", "Сценарии"]),
    (
        TokenKind::Given,
        &["Given", "Дано", "Допустим", "Пусть", "Ну и пусть"],
    ),
    (TokenKind::When, &["When", "Когда"]),
    (TokenKind::If, &["If", "Если"]),
    (TokenKind::Then, &["Then", "Тогда", "То", "Затем"]),
    (
        TokenKind::And,
        &["And", "И", "К тому же", "Также", "Но и"],
    ),
    (TokenKind::But, &["But", "Но", "А", "Иначе"]),
];

/// Synonyms recognised for `kind`, in their canonical spelling.
///
/// Returns an empty slice for kinds that are not keywords.
///
/// # Examples
///
/// ```
/// use turbo_gherkin_lexer::{TokenKind, synonyms};
///
/// assert!(synonyms(TokenKind::Given).contains(&"Ну и пусть"));
/// assert!(synonyms(TokenKind::Pipe).is_empty());
/// ```
#[must_use]
pub fn synonyms(kind: TokenKind) -> &'static [&'static str] {
    SYNONYMS
        .iter()
        .find(|(candidate, _)| *candidate == kind)
        .map_or(&[][..], |&(_, phrases)| phrases)
}

/// A keyword recognised at the start of some text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct KeywordMatch {
    pub(crate) kind: TokenKind,
    /// Length in bytes of the phrase in the original text.
    pub(crate) len: usize,
}

#[derive(Debug)]
struct Entry {
    phrase: Vec<char>,
    kind: TokenKind,
}

#[derive(Debug)]
pub(crate) struct KeywordTable {
    entries: Vec<Entry>,
}

static TABLE: LazyLock<KeywordTable> = LazyLock::new(KeywordTable::build);

pub(crate) fn table() -> &'static KeywordTable {
    &TABLE
}

impl KeywordTable {
    fn build() -> Self {
        let mut entries: Vec<Entry> = SYNONYMS
            .iter()
            .flat_map(|(kind, phrases)| {
                phrases.iter().map(|phrase| Entry {
                    phrase: folded(phrase).collect(),
                    kind: *kind,
                })
            })
            .collect();
        entries.sort_by(|a, b| b.phrase.len().cmp(&a.phrase.len()));
        log::trace!("keyword table built with {} phrases", entries.len());
        Self { entries }
    }

    /// Match the longest properly terminated keyword at the start of `text`.
    pub(crate) fn match_at(&self, text: &str) -> Option<KeywordMatch> {
        self.entries.iter().find_map(|entry| {
            let len = phrase_len(&entry.phrase, text)?;
            let next = text.get(len..).and_then(|rest| rest.chars().next());
            is_terminated(entry.kind, next).then_some(KeywordMatch {
                kind: entry.kind,
                len,
            })
        })
    }
}

/// Byte length of `text`'s prefix that folds to `phrase`.
fn phrase_len(phrase: &[char], text: &str) -> Option<usize> {
    let mut chars = text.char_indices();
    let mut len = 0;
    for expected in phrase {
        let (index, actual) = chars.next()?;
        if fold_case(actual) != *expected {
            return None;
        }
        len = index + actual.len_utf8();
    }
    Some(len)
}

fn is_terminated(kind: TokenKind, next: Option<char>) -> bool {
    if kind.is_structural_keyword() {
        next == Some(':')
    } else {
        matches!(next, None | Some(' ' | '\t' | '\r' | '\n' | '#'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Scenario outline: x", TokenKind::ScenarioOutline, 16)]
    #[case("Scenario: x", TokenKind::Scenario, 8)]
    #[case("Тогда да", TokenKind::Then, 10)]
    #[case("То да", TokenKind::Then, 4)]
    #[case("Но и всё", TokenKind::And, 7)]
    #[case("Но всё", TokenKind::But, 4)]
    #[case("Ну и пусть", TokenKind::Given, 18)]
    #[case("ДАНО#c", TokenKind::Given, 8)]
    fn prefers_longest_terminated_phrase(
        #[case] text: &str,
        #[case] kind: TokenKind,
        #[case] len: usize,
    ) {
        assert_eq!(table().match_at(text), Some(KeywordMatch { kind, len }));
    }

    #[rstest]
    #[case("Feature")]
    #[case("Feature :")]
    #[case("Данo")]
    #[case("Иногда")]
    #[case("Scenarios")]
    #[case("")]
    fn rejects_unterminated_phrases(#[case] text: &str) {
        assert_eq!(table().match_at(text), None);
    }

    #[test]
    fn every_keyword_has_synonyms() {
        let keywords = SYNONYMS.iter().map(|(kind, _)| *kind);
        for kind in keywords {
            assert!(kind.is_keyword(), "{kind} listed as keyword");
            assert!(!synonyms(kind).is_empty());
        }
    }
}
