//! User interface
//!
//! Window stack bookkeeping; drawing and layout belong to the host.

pub mod stack;

pub use stack::{DEFAULT_UI_PATH, StackEntry, UiStack, Window, WindowFactory};
