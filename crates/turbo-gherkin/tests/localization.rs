//! Localised diagnostic messages.
#![expect(clippy::expect_used, reason = "tests fail fast on localization setup errors")]

use rstest::rstest;
use serial_test::serial;
use turbo_gherkin::localization::{
    ScopedLocalization, current_languages, message, select_localizations,
    strip_directional_isolates,
};
use turbo_gherkin::{DiagnosticKind, RuleKind, Severity, TokenKind, parse};
use unic_langid::langid;

#[test]
#[serial]
fn english_is_the_default() {
    let tree = parse("Сценарий: s\n");
    let diagnostic = tree.diagnostics().first().expect("diagnostic");
    assert_eq!(
        diagnostic.to_string(),
        "1:0: error: expected a Feature header before SCENARIO_KEYWORD"
    );
    assert_eq!(Severity::Warning.to_string(), "warning");
}

#[test]
#[serial]
fn scoped_russian_messages() {
    let guard = ScopedLocalization::new(&[langid!("ru")]).expect("russian loader");
    let languages = current_languages().expect("languages");
    assert!(languages.contains(&langid!("ru")));
    assert_eq!(message("severity-error"), "ошибка");

    let tree = parse("Функционал: f\nСтруктура сценария: o\nДано x\n");
    let diagnostic = tree.diagnostics().first().expect("diagnostic");
    assert_eq!(
        diagnostic.to_string(),
        "2:0: ошибка: у структуры сценария нет примеров"
    );
    drop(guard);
    assert_eq!(message("severity-error"), "error");
}

#[test]
#[serial]
fn selection_switches_the_scoped_loader_only() {
    let guard = ScopedLocalization::new(&[langid!("en-US")]).expect("english loader");
    assert_eq!(message("severity-warning"), "warning");
    let selected = select_localizations(&[langid!("ru")]).expect("select russian");
    assert!(selected.contains(&langid!("ru")));
    assert_eq!(message("severity-warning"), "предупреждение");
    assert_eq!(DiagnosticKind::EmptyTag.message(), "у тега нет имени");
    drop(guard);
    assert_eq!(message("severity-warning"), "warning");
}

#[rstest]
#[case(DiagnosticKind::MissingTable, "Examples section has no table")]
#[case(DiagnosticKind::EmptyTag, "tag has no name")]
#[case(
    DiagnosticKind::UnexpectedContent { found: TokenKind::Pipe, context: RuleKind::Steps },
    "unexpected PIPE in steps"
)]
#[case(
    DiagnosticKind::UnevenTableRow { row: 2, expected: 3, actual: 1 },
    "table row 2 has 1 cells but the header has 3"
)]
#[serial]
fn messages_interpolate_arguments(#[case] kind: DiagnosticKind, #[case] expected: &str) {
    assert_eq!(kind.message(), expected);
}

#[test]
fn isolates_are_removed() {
    assert_eq!(
        strip_directional_isolates("\u{2068}steps\u{2069} and \u{2066}x\u{2069}"),
        "steps and x"
    );
}
