//! Window stack
//!
//! Tracks which windows are open, in what order, and hands out a
//! strictly increasing sorting order each time a window comes to front.

use std::collections::HashMap;

/// Default resource folder for window prefabs
pub const DEFAULT_UI_PATH: &str = "UI";

/// A window the stack can show, hide and reorder
pub trait Window {
    fn set_active(&mut self, active: bool);

    fn set_sorting_order(&mut self, order: i32);
}

/// Builds windows the first time they are opened
pub trait WindowFactory<W> {
    /// `path` is the resource folder, `name` the window name
    fn create(&mut self, path: &str, name: &str) -> Option<W>;
}

impl<W, F> WindowFactory<W> for F
where
    F: FnMut(&str, &str) -> Option<W>,
{
    fn create(&mut self, path: &str, name: &str) -> Option<W> {
        self(path, name)
    }
}

/// One entry on the stack
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackEntry {
    pub name: String,
    pub sorting_order: i32,
}

/// Ordered window stack with lazily created windows
pub struct UiStack<W, F> {
    factory: F,
    base_path: String,
    custom_paths: HashMap<String, String>,
    /// Every window created so far, open or hidden
    windows: HashMap<String, W>,
    stack: Vec<StackEntry>,
    current_sorting_order: i32,
}

impl<W: Window, F: WindowFactory<W>> UiStack<W, F> {
    pub fn new(factory: F) -> Self {
        Self {
            factory,
            base_path: DEFAULT_UI_PATH.to_string(),
            custom_paths: HashMap::new(),
            windows: HashMap::new(),
            stack: Vec::new(),
            current_sorting_order: 0,
        }
    }

    /// Load `name` from `path` instead of the default folder
    pub fn set_path(&mut self, name: &str, path: &str) {
        self.custom_paths.insert(name.to_string(), path.to_string());
    }

    /// Resource path the factory receives for `name`
    pub fn resource_path(&self, name: &str) -> String {
        let folder = self
            .custom_paths
            .get(name)
            .map(String::as_str)
            .unwrap_or(self.base_path.as_str());
        format!("{}/{}", folder, name)
    }

    /// Open `name`, creating it on first use, and bring it to front
    ///
    /// Returns `None` if the factory could not build the window.
    pub fn open(&mut self, name: &str) -> Option<&mut W> {
        if self.windows.contains_key(name) {
            // Reopening the top window replaces its entry
            if self.top().is_some_and(|top| top.name == name) {
                self.stack.pop();
            }
        } else {
            let path = self.resource_path(name);
            let Some(window) = self.factory.create(&path, name) else {
                log::warn!("Failed to create window {} from {}", name, path);
                return None;
            };
            self.windows.insert(name.to_string(), window);
            log::debug!("Created window {}", name);
        }

        self.current_sorting_order += 1;
        let order = self.current_sorting_order;
        self.stack.push(StackEntry {
            name: name.to_string(),
            sorting_order: order,
        });

        let window = self.windows.get_mut(name)?;
        window.set_active(true);
        window.set_sorting_order(order);
        Some(window)
    }

    /// Hide `name`; it leaves the stack only if it is on top
    ///
    /// Returns false if the window was never created.
    pub fn close(&mut self, name: &str) -> bool {
        let Some(window) = self.windows.get_mut(name) else {
            return false;
        };
        window.set_active(false);

        if self.top().is_some_and(|top| top.name == name) {
            self.stack.pop();
        }
        true
    }

    /// Destroy `name` and forget every stack entry for it
    pub fn clear(&mut self, name: &str) -> Option<W> {
        let window = self.windows.remove(name)?;
        self.stack.retain(|entry| entry.name != name);
        log::debug!("Cleared window {}", name);
        Some(window)
    }

    /// Destroy all windows and start the sorting order over
    pub fn reset(&mut self) {
        self.windows.clear();
        self.stack.clear();
        self.current_sorting_order = 0;
        log::debug!("UI stack reset");
    }

    pub fn top(&self) -> Option<&StackEntry> {
        self.stack.last()
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn entries(&self) -> &[StackEntry] {
        &self.stack
    }

    pub fn get(&self, name: &str) -> Option<&W> {
        self.windows.get(name)
    }

    /// Check if `name` has been created (open or hidden)
    pub fn contains(&self, name: &str) -> bool {
        self.windows.contains_key(name)
    }

    /// Check if `name` has an entry on the stack
    pub fn is_open(&self, name: &str) -> bool {
        self.stack.iter().any(|entry| entry.name == name)
    }

    pub fn current_sorting_order(&self) -> i32 {
        self.current_sorting_order
    }
}
