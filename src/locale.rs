//! Process-wide locale identifier.
//!
//! The widget does not localize anything itself; a locale change is only a
//! reason to re-evaluate the view, the same as a new anchor date.

use lazy_static::lazy_static;
use std::sync::RwLock;

pub const DEFAULT_LOCALE: &str = "en";

lazy_static! {
    static ref CURRENT_LOCALE: RwLock<String> = RwLock::new(DEFAULT_LOCALE.to_string());
}

pub fn current_locale() -> String {
    match CURRENT_LOCALE.read() {
        Ok(locale) => locale.clone(),
        Err(poisoned) => poisoned.into_inner().clone(),
    }
}

/// Replaces the locale identifier. Widgets notice on their next digest.
pub fn set_locale(id: impl Into<String>) {
    let id = id.into();
    log::info!("Locale changed to '{}'", id);
    match CURRENT_LOCALE.write() {
        Ok(mut locale) => *locale = id,
        Err(poisoned) => *poisoned.into_inner() = id,
    }
}
