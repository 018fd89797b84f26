//! Process-wide defaults for [`ParseOptions`].
//!
//! [`crate::parse`] takes its options from [`ParseOptions::current`], which
//! resolves each setting at call time: an in-process override wins, then the
//! environment, then the built-in default. Callers that need a fixed setting
//! regardless of the process state use [`crate::parse_with_options`].
//!
//! The only setting so far controls uneven table rows. When enabled, every
//! data row of a table whose cell count differs from the head row is reported
//! as a [`crate::Severity::Warning`]; the tree keeps the row as written and
//! no error flag is raised.

use std::sync::atomic::{AtomicU8, Ordering};

/// Environment variable consulted when no in-process override is set.
///
/// Accepts `1`, `true`, `yes` or `on` to enable the warnings and `0`,
/// `false`, `no` or `off` to disable them, in any ASCII case. Other values
/// are ignored.
pub const WARN_ON_UNEVEN_TABLES_ENV: &str = "TURBO_GHERKIN_WARN_UNEVEN_TABLES";

// 0 = unset, 1 = off, 2 = on
static UNEVEN_TABLES_OVERRIDE: AtomicU8 = AtomicU8::new(0);

fn encode(setting: Option<bool>) -> u8 {
    match setting {
        None => 0,
        Some(false) => 1,
        Some(true) => 2,
    }
}

fn decode(raw: u8) -> Option<bool> {
    match raw {
        1 => Some(false),
        2 => Some(true),
        _ => None,
    }
}

fn switch_value(value: &str) -> Option<bool> {
    const ON: [&str; 4] = ["1", "true", "yes", "on"];
    const OFF: [&str; 4] = ["0", "false", "no", "off"];
    let value = value.trim();
    if ON.iter().any(|word| value.eq_ignore_ascii_case(word)) {
        Some(true)
    } else if OFF.iter().any(|word| value.eq_ignore_ascii_case(word)) {
        Some(false)
    } else {
        None
    }
}

fn resolve(override_setting: Option<bool>, env_value: Option<&str>) -> bool {
    override_setting
        .or_else(|| env_value.and_then(switch_value))
        .unwrap_or(false)
}

/// Whether [`crate::parse`] currently reports uneven table rows.
#[must_use]
pub fn warn_on_uneven_tables() -> bool {
    let env = std::env::var(WARN_ON_UNEVEN_TABLES_ENV).ok();
    resolve(
        decode(UNEVEN_TABLES_OVERRIDE.load(Ordering::Relaxed)),
        env.as_deref(),
    )
}

/// Force uneven-row warnings on or off for the whole process, ignoring
/// [`WARN_ON_UNEVEN_TABLES_ENV`].
pub fn set_warn_on_uneven_tables(enabled: bool) {
    UNEVEN_TABLES_OVERRIDE.store(encode(Some(enabled)), Ordering::Relaxed);
}

/// Drop the override set by [`set_warn_on_uneven_tables`] so the environment
/// decides again.
pub fn clear_warn_on_uneven_tables_override() {
    UNEVEN_TABLES_OVERRIDE.store(encode(None), Ordering::Relaxed);
}

/// Options for a single parse call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseOptions {
    /// Report rows whose cell count differs from the table head.
    pub warn_on_uneven_tables: bool,
}

impl ParseOptions {
    /// Snapshot the process configuration.
    #[must_use]
    pub fn current() -> Self {
        Self {
            warn_on_uneven_tables: warn_on_uneven_tables(),
        }
    }
}
