//! Process configuration flowing into `parse`.

use serial_test::serial;
use turbo_gherkin::config::{clear_warn_on_uneven_tables_override, set_warn_on_uneven_tables};
use turbo_gherkin::{Severity, parse};

const UNEVEN: &str = "Функционал: f\n\
    Сценарий: s\n\
    Дано таблица\n\
    | a | b |\n\
    | 1 |\n\
    | 1 | 2 |\n";

#[test]
#[serial]
fn override_enables_uneven_row_warnings() {
    set_warn_on_uneven_tables(true);
    let tree = parse(UNEVEN);
    clear_warn_on_uneven_tables_override();

    assert!(!tree.has_error());
    let severities: Vec<_> = tree.diagnostics().iter().map(|d| d.severity).collect();
    assert_eq!(severities, [Severity::Warning]);
    assert_eq!(
        tree.diagnostics().first().map(|d| d.position.line),
        Some(5)
    );
}

#[test]
#[serial]
fn override_disables_uneven_row_warnings() {
    set_warn_on_uneven_tables(false);
    let tree = parse(UNEVEN);
    clear_warn_on_uneven_tables_override();
    assert!(tree.diagnostics().is_empty());
}
