//! Locale switching
//!
//! Observable current-locale setting and the language dropdown that drives it.

pub mod option;
pub mod settings;

pub use option::{DropdownState, LanguageOption, Locale, SELECTED_LANGUAGE_PREF};
pub use settings::{LocaleSettings, SubscriptionId};
