//! Localization of diagnostic messages.
//!
//! Messages are Fluent resources embedded in the binary. A process-wide
//! loader defaults to English; [`ScopedLocalization`] installs a different
//! loader for the current thread only.

use std::cell::RefCell;
use std::sync::{LazyLock, RwLock};

use fluent::FluentArgs;
use i18n_embed::I18nEmbedError;
use i18n_embed::fluent::{FluentLanguageLoader, fluent_language_loader};
use rust_embed::RustEmbed;
use thiserror::Error;
use unic_langid::LanguageIdentifier;

/// Embedded Fluent resources shipped with the crate.
///
/// # Examples
/// ```
/// # use turbo_gherkin::localization::Localizations;
/// # use i18n_embed::fluent::fluent_language_loader;
/// # use unic_langid::langid;
/// let loader = fluent_language_loader!();
/// let selected = i18n_embed::select(&loader, &Localizations, &[langid!("ru")]).unwrap();
/// assert!(selected.contains(&langid!("ru")));
/// ```
#[derive(RustEmbed)]
#[folder = "i18n"]
pub struct Localizations;

static LANGUAGE_LOADER: LazyLock<RwLock<FluentLanguageLoader>> = LazyLock::new(|| {
    let loader = fluent_language_loader!();
    if let Err(error) =
        i18n_embed::select(&loader, &Localizations, &[unic_langid::langid!("en-US")])
    {
        log::warn!("failed to load default English messages: {error}");
    }
    RwLock::new(loader)
});

thread_local! {
    static OVERRIDE_LOADER: RefCell<Option<FluentLanguageLoader>> = const { RefCell::new(None) };
}

/// Errors from localization setup and queries.
#[derive(Debug, Error)]
pub enum LocalizationError {
    /// The global loader lock was poisoned.
    #[error("localization state is poisoned")]
    Poisoned,
    /// Loading or selecting Fluent resources failed.
    #[error("failed to load localization resources: {0}")]
    Loader(#[from] I18nEmbedError),
}

/// RAII guard that makes a dedicated loader active on the current thread.
#[must_use]
pub struct ScopedLocalization {
    previous: Option<FluentLanguageLoader>,
}

impl ScopedLocalization {
    /// Load the requested locales and activate them for the current thread.
    ///
    /// # Errors
    ///
    /// Returns [`LocalizationError::Loader`] if the resources cannot be
    /// loaded for the requested languages.
    pub fn new(requested: &[LanguageIdentifier]) -> Result<Self, LocalizationError> {
        let loader = fluent_language_loader!();
        i18n_embed::select(&loader, &Localizations, requested)?;
        let previous = OVERRIDE_LOADER.with(|cell| cell.replace(Some(loader)));
        Ok(Self { previous })
    }
}

impl Drop for ScopedLocalization {
    fn drop(&mut self) {
        let previous = self.previous.take();
        OVERRIDE_LOADER.with(|cell| {
            *cell.borrow_mut() = previous;
        });
    }
}

/// Activate the best matching localizations for the provided languages.
///
/// Affects the thread-scoped loader when one is installed, the process-wide
/// loader otherwise.
///
/// # Errors
///
/// Returns [`LocalizationError::Poisoned`] if the global loader lock is
/// poisoned or [`LocalizationError::Loader`] when resource selection fails.
pub fn select_localizations(
    requested: &[LanguageIdentifier],
) -> Result<Vec<LanguageIdentifier>, LocalizationError> {
    OVERRIDE_LOADER.with(|cell| -> Result<_, LocalizationError> {
        if let Some(loader) = cell.borrow().as_ref() {
            return Ok(i18n_embed::select(loader, &Localizations, requested)?);
        }
        let guard = LANGUAGE_LOADER
            .read()
            .map_err(|_| LocalizationError::Poisoned)?;
        Ok(i18n_embed::select(&*guard, &Localizations, requested)?)
    })
}

/// Languages of the loader active on the current thread.
///
/// # Errors
///
/// Returns [`LocalizationError::Poisoned`] if the global loader lock is
/// poisoned.
pub fn current_languages() -> Result<Vec<LanguageIdentifier>, LocalizationError> {
    OVERRIDE_LOADER.with(|cell| -> Result<_, LocalizationError> {
        if let Some(loader) = cell.borrow().as_ref() {
            return Ok(loader.current_languages());
        }
        let guard = LANGUAGE_LOADER
            .read()
            .map_err(|_| LocalizationError::Poisoned)?;
        Ok(guard.current_languages())
    })
}

/// Retrieve a localised string without arguments.
///
/// # Examples
/// ```
/// # use turbo_gherkin::localization;
/// assert_eq!(localization::message("severity-error"), "error");
/// ```
#[must_use]
pub fn message(id: &str) -> String {
    with_loader(|loader| loader.get(id))
}

/// Retrieve a localised string with arguments supplied through a closure.
///
/// Fluent wraps interpolated values in directional isolates; see
/// [`strip_directional_isolates`].
#[must_use]
pub fn message_with_args<F>(id: &str, configure: F) -> String
where
    F: FnOnce(&mut FluentArgs<'static>),
{
    with_loader(|loader| {
        let mut args: FluentArgs<'static> = FluentArgs::new();
        configure(&mut args);
        loader.get_args_fluent(id, Some(&args))
    })
}

fn with_loader<R>(callback: impl FnOnce(&FluentLanguageLoader) -> R) -> R {
    OVERRIDE_LOADER.with(|cell| {
        let borrow = cell.borrow();
        if let Some(loader) = borrow.as_ref() {
            return callback(loader);
        }
        drop(borrow);
        let guard = LANGUAGE_LOADER
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        callback(&guard)
    })
}

/// Remove Unicode directional isolates inserted by Fluent during
/// interpolation.
#[must_use]
pub fn strip_directional_isolates(text: &str) -> String {
    text.chars()
        .filter(|c| !matches!(*c, '\u{2066}' | '\u{2067}' | '\u{2068}' | '\u{2069}'))
        .collect()
}
