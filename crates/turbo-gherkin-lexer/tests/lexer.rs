//! Behavioural tests for keyword recognition, layout and literal scanning.

use rstest::rstest;
use turbo_gherkin_lexer::{LexErrorKind, Position, TokenKind, synonyms, tokenize, tokenize_bytes};

fn kinds(text: &str) -> Vec<TokenKind> {
    tokenize(text).kinds().collect()
}

fn contains(text: &str, kind: TokenKind) -> bool {
    tokenize(text).kinds().any(|candidate| candidate == kind)
}

#[test]
fn every_space_and_tab_is_its_own_token() {
    use TokenKind::{AnySymbol, At, Eof, Space, Tab};
    assert_eq!(
        kinds("  @А\t\t"),
        [Space, Space, At, AnySymbol, Tab, Tab, Eof]
    );
}

#[test]
fn quoted_text_is_a_single_string() {
    use TokenKind::{Eof, Space, String};
    assert_eq!(kinds("  \"@А\t\t\""), [Space, Space, String, Eof]);
}

#[test]
fn byte_order_mark_is_skipped() {
    use TokenKind::{Colon, Eof, Feature};
    assert_eq!(kinds("\u{feff}Feature:"), [Feature, Colon, Eof]);
    let Ok(stream) = tokenize_bytes(b"\xEF\xBB\xBFFeature:") else {
        panic!("valid UTF-8 input");
    };
    assert_eq!(stream.first().map(|token| token.span.clone()), Some(3..10));
}

#[test]
fn only_one_byte_order_mark_is_skipped() {
    let text = "\u{feff}\u{feff}Feature: x\n";
    let Ok(stream) = tokenize_bytes(text.as_bytes()) else {
        panic!("valid UTF-8 input");
    };
    assert_eq!(stream.reconstruct(), "\u{feff}Feature: x\n");
    assert_eq!(tokenize(text).reconstruct(), stream.reconstruct());
    assert_eq!(stream.first().map(|token| token.kind), Some(TokenKind::AnySymbol));
}

#[test]
fn invalid_utf8_is_an_encoding_error() {
    assert!(tokenize_bytes(b"Feature: \xC3\x28").is_err());
}

#[rstest]
#[case(TokenKind::Feature)]
#[case(TokenKind::Background)]
#[case(TokenKind::Rule)]
#[case(TokenKind::Scenario)]
#[case(TokenKind::Example)]
#[case(TokenKind::ScenarioOutline)]
#[case(TokenKind::Examples)]
#[case(TokenKind::Scenarios)]
fn structural_keywords_require_an_adjacent_colon(#[case] kind: TokenKind) {
    for phrase in synonyms(kind) {
        for spelling in [phrase.to_string(), phrase.to_uppercase(), phrase.to_lowercase()] {
            let text = format!("{spelling}: имя");
            let stream = tokenize(&text);
            let found: Vec<_> = stream.iter().filter(|t| t.kind.is_keyword()).collect();
            assert_eq!(found.len(), 1, "{text}");
            assert_eq!(found.first().map(|t| t.kind), Some(kind), "{text}");
            for separated in [
                spelling.clone(),
                format!("{spelling} :"),
                format!("{spelling}\t:"),
                format!("{spelling}\n:"),
                format!("{spelling}#:"),
            ] {
                assert!(
                    !tokenize(&separated).kinds().any(TokenKind::is_keyword),
                    "{separated:?} must not contain a keyword"
                );
            }
        }
    }
}

#[rstest]
#[case(TokenKind::Given)]
#[case(TokenKind::When)]
#[case(TokenKind::If)]
#[case(TokenKind::Then)]
#[case(TokenKind::And)]
#[case(TokenKind::But)]
fn step_keywords_require_a_word_boundary(#[case] kind: TokenKind) {
    for phrase in synonyms(kind) {
        for terminator in ["", " шаг", "\tшаг", "\n", "\r\n", "#комментарий"] {
            let text = format!("{phrase}{terminator}");
            assert_eq!(
                tokenize(&text).first().map(|t| t.kind),
                Some(kind),
                "{text:?}"
            );
        }
        let fused = format!("{phrase}ь");
        assert_ne!(
            tokenize(&fused).first().map(|t| t.kind),
            Some(kind),
            "{fused:?}"
        );
    }
}

#[rstest]
#[case("Функциональность:", TokenKind::Feature, true)]
#[case("Функциональность\n:", TokenKind::Feature, false)]
#[case("Свойство:", TokenKind::Feature, true)]
#[case("Структура Сценария:", TokenKind::ScenarioOutline, true)]
#[case("Scenario  outline:", TokenKind::ScenarioOutline, false)]
#[case("Scenario\toutline:", TokenKind::ScenarioOutline, false)]
#[case("Scenariooutline:", TokenKind::ScenarioOutline, false)]
#[case("Примеры:", TokenKind::Example, false)]
#[case("Пример:", TokenKind::Examples, false)]
#[case("Scenari:", TokenKind::Scenarios, false)]
#[case("Правила:", TokenKind::Rule, false)]
#[case("Пусть\t Будет \n #Мир", TokenKind::Given, true)]
#[case("#Пусть:", TokenKind::Given, false)]
#[case("Данo", TokenKind::Given, false)]
#[case("Ну и пусть", TokenKind::Given, true)]
#[case("КОгда нибудь", TokenKind::When, true)]
#[case("#КОгда:", TokenKind::When, false)]
#[case("Если мы будем", TokenKind::If, true)]
#[case("Тогда или не тогда", TokenKind::Then, true)]
#[case("#Потому", TokenKind::Then, false)]
#[case("К тому же", TokenKind::And, true)]
#[case("К тому\tже", TokenKind::And, false)]
#[case("И так", TokenKind::And, true)]
#[case("Также", TokenKind::And, true)]
#[case("не", TokenKind::But, false)]
#[case("Иначе", TokenKind::But, true)]
fn recognises_keyword_spellings(
    #[case] text: &str,
    #[case] kind: TokenKind,
    #[case] expected: bool,
) {
    assert_eq!(contains(text, kind), expected, "{text:?}");
}

#[rstest]
#[case("'Строка в одинарных кавычках'", true)]
#[case("\"Строка в двойных кавычках\"", true)]
#[case("\"abc'", false)]
#[case("'abc\"", false)]
fn strings_close_with_their_opening_quote(#[case] text: &str, #[case] expected: bool) {
    let stream = tokenize(text);
    assert_eq!(
        stream.kinds().any(|kind| kind == TokenKind::String),
        expected
    );
    assert_eq!(
        stream
            .diagnostics()
            .iter()
            .any(|d| d.kind == LexErrorKind::UnterminatedString),
        !expected
    );
}

#[test]
fn doc_string_content_is_not_interpreted() {
    use TokenKind::{AnySymbol, DocStrings, Eof, Eol, Space};
    assert_eq!(
        kinds(" \"\"\"\n bb \"бла\" bb\n\"\"\""),
        [
            Space, DocStrings, Eol, Space, AnySymbol, Space, AnySymbol, Space, AnySymbol, Eol,
            DocStrings, Eof,
        ]
    );
    assert!(!contains("\"\"\"\nДано 1\n\"\"\"", TokenKind::Given));
    assert!(!contains("\"\"\"\nДано 1\n\"\"\"", TokenKind::Decimal));
}

#[test]
fn table_rows_split_into_cells() {
    use TokenKind::{Eof, Eol, Pipe, Space, TableCell};
    assert_eq!(
        kinds("| Парам 1 |  |\\|x|\n"),
        [
            Pipe, Space, TableCell, Space, Pipe, Space, Space, Pipe, TableCell, Pipe, Eol, Eof,
        ]
    );
    let stream = tokenize("|a b|\\|x|");
    let cells: Vec<_> = stream
        .iter()
        .filter(|t| t.kind == TokenKind::TableCell)
        .map(|t| t.text)
        .collect();
    assert_eq!(cells, ["a b", "\\|x"]);
}

#[test]
fn tag_lines_hold_several_tags() {
    use TokenKind::{AnySymbol, At, Comment, Eof, Eol, Feature, Space, Colon};
    assert_eq!(
        kinds("@fast @Тег2 # note\nFeature:"),
        [
            At, AnySymbol, Space, At, AnySymbol, Space, Comment, Eol, Feature, Colon, Eof,
        ]
    );
}

#[test]
fn step_text_embeds_literals() {
    let stream = tokenize("Тогда Значение больше 1.23 но меньше 0.99 и <Парам> 'x'");
    let literals: Vec<_> = stream
        .iter()
        .filter(|t| t.kind.is_literal() || t.kind == TokenKind::AngleParameter)
        .map(|t| (t.kind, t.text))
        .collect();
    assert_eq!(
        literals,
        [
            (TokenKind::Float, "1.23"),
            (TokenKind::Float, "0.99"),
            (TokenKind::AngleParameter, "<Парам>"),
            (TokenKind::String, "'x'"),
        ]
    );
}

#[test]
fn positions_follow_logical_lines() {
    let stream = tokenize("a\r\nb\rc\nd");
    let starts: Vec<_> = stream.iter().map(|t| (t.kind, t.start)).collect();
    assert_eq!(
        starts,
        [
            (TokenKind::AnySymbol, Position::new(1, 0)),
            (TokenKind::Eol, Position::new(1, 1)),
            (TokenKind::AnySymbol, Position::new(2, 0)),
            (TokenKind::Eol, Position::new(2, 1)),
            (TokenKind::AnySymbol, Position::new(3, 0)),
            (TokenKind::Eol, Position::new(3, 1)),
            (TokenKind::AnySymbol, Position::new(4, 0)),
            (TokenKind::Eof, Position::new(4, 1)),
        ]
    );
}

#[test]
fn reconstruction_is_lossless() {
    let text = "@tag\r\nФункционал: x\n  Дано 'a' 1\r    | a | b |\n\"\"\"\n text\n\"\"\"";
    assert_eq!(tokenize(text).reconstruct(), text);
}
