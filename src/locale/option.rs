//! Language dropdown model
//!
//! Mirrors what the options screen shows: a placeholder while locales
//! load, then one entry per locale. Picking an entry persists the
//! choice and publishes it through [`LocaleSettings`].

use crate::save::{Prefs, PrefsError};
use super::settings::LocaleSettings;

/// Prefs key holding the chosen locale code
pub const SELECTED_LANGUAGE_PREF: &str = "SelectedLanguage";

pub const LOADING_LABEL: &str = "Loading...";
pub const NO_LOCALES_LABEL: &str = "No Locales Available";

/// An available locale
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locale {
    /// Identifier code, e.g. "en" or "ko-KR"
    pub code: String,
    /// Name in its own language, shown in the dropdown
    pub native_name: String,
}

impl Locale {
    pub fn new(code: &str, native_name: &str) -> Self {
        Self {
            code: code.to_string(),
            native_name: native_name.to_string(),
        }
    }
}

/// Dropdown display state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropdownState {
    /// Waiting for the locale list
    Loading,
    /// Loaded, but nothing to choose
    Empty,
    /// Options listed and selectable
    Ready,
}

/// Language selection dropdown
#[derive(Debug, Clone)]
pub struct LanguageOption {
    state: DropdownState,
    locales: Vec<Locale>,
    options: Vec<String>,
    selected: usize,
}

impl Default for LanguageOption {
    fn default() -> Self {
        Self::new()
    }
}

impl LanguageOption {
    /// Dropdown in its loading state
    pub fn new() -> Self {
        Self {
            state: DropdownState::Loading,
            locales: Vec::new(),
            options: vec![LOADING_LABEL.to_string()],
            selected: 0,
        }
    }

    /// Fill the dropdown once locales are available
    ///
    /// Preselects the entry matching `selected_code`, or the first one.
    /// Nothing is published.
    pub fn populate(&mut self, locales: Vec<Locale>, selected_code: Option<&str>) {
        if locales.is_empty() {
            self.state = DropdownState::Empty;
            self.options = vec![NO_LOCALES_LABEL.to_string()];
            self.locales.clear();
            self.selected = 0;
            return;
        }

        self.selected = selected_code
            .and_then(|code| locales.iter().position(|l| l.code == code))
            .unwrap_or(0);
        self.options = locales.iter().map(|l| l.native_name.clone()).collect();
        self.locales = locales;
        self.state = DropdownState::Ready;
    }

    /// Handle the user picking entry `index`
    ///
    /// Out-of-range picks are ignored. Otherwise the locale code is saved
    /// to prefs and set on `settings`, which notifies its listeners.
    pub fn select(
        &mut self,
        index: usize,
        settings: &mut LocaleSettings,
        prefs: &mut dyn Prefs,
    ) -> Result<Option<&Locale>, PrefsError> {
        if self.state != DropdownState::Ready || index >= self.locales.len() {
            log::debug!("Ignoring language selection {}", index);
            return Ok(None);
        }

        let code = self.locales[index].code.clone();
        prefs.commit(&[(SELECTED_LANGUAGE_PREF, code.as_str())])?;

        settings.set_current(&code);
        self.selected = index;
        Ok(self.locales.get(index))
    }

    /// Locale code saved by a previous selection
    pub fn restore_code(prefs: &dyn Prefs) -> Option<String> {
        prefs.get_string(SELECTED_LANGUAGE_PREF)
    }

    pub fn state(&self) -> DropdownState {
        self.state
    }

    pub fn is_interactable(&self) -> bool {
        self.state == DropdownState::Ready
    }

    /// Labels as shown in the dropdown
    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn selected_locale(&self) -> Option<&Locale> {
        self.locales.get(self.selected)
    }
}
