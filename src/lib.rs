//! Fosterkit - game client subsystems
//!
//! Encrypted save slots, a UI window stack and locale switching
//! for the Foster The Monster client.

pub mod save;
pub mod ui;
pub mod locale;

// Re-export commonly used types
pub use save::{KeyMaterial, Prefs, SaveError, SecureStore, StoreConfig};
pub use ui::UiStack;
pub use locale::{LanguageOption, LocaleSettings};
