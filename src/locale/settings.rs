//! Current locale with change notification

/// Handle returned by [`LocaleSettings::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&str)>;

/// Application-wide locale setting
///
/// Listeners hear about a new locale code only when it actually changes.
#[derive(Default)]
pub struct LocaleSettings {
    current: Option<String>,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_id: u64,
}

impl LocaleSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with `code` selected, without notifying anyone
    pub fn with_locale(code: &str) -> Self {
        Self {
            current: Some(code.to_string()),
            ..Self::default()
        }
    }

    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Set the current locale code, returning true if it changed
    pub fn set_current(&mut self, code: &str) -> bool {
        if self.current.as_deref() == Some(code) {
            return false;
        }

        self.current = Some(code.to_string());
        log::info!("Locale changed to {}", code);
        for (_, listener) in &mut self.listeners {
            listener(code);
        }
        true
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&str) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl std::fmt::Debug for LocaleSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocaleSettings")
            .field("current", &self.current)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recorder(settings: &mut LocaleSettings) -> (SubscriptionId, Rc<RefCell<Vec<String>>>) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let id = settings.subscribe(move |code| sink.borrow_mut().push(code.to_string()));
        (id, seen)
    }

    #[test]
    fn test_notifies_only_on_change() {
        let mut settings = LocaleSettings::new();
        let (_, seen) = recorder(&mut settings);

        assert!(settings.set_current("en"));
        assert!(!settings.set_current("en"));
        assert!(settings.set_current("ko"));

        assert_eq!(*seen.borrow(), vec!["en", "ko"]);
        assert_eq!(settings.current(), Some("ko"));
    }

    #[test]
    fn test_unsubscribe() {
        let mut settings = LocaleSettings::new();
        let (first, first_seen) = recorder(&mut settings);
        let (_, second_seen) = recorder(&mut settings);

        assert!(settings.unsubscribe(first));
        assert!(!settings.unsubscribe(first));
        settings.set_current("ja");

        assert!(first_seen.borrow().is_empty());
        assert_eq!(*second_seen.borrow(), vec!["ja"]);
        assert_eq!(settings.listener_count(), 1);
    }

    #[test]
    fn test_initial_locale_is_silent() {
        let mut settings = LocaleSettings::with_locale("en");
        let (_, seen) = recorder(&mut settings);

        assert!(!settings.set_current("en"));
        assert!(seen.borrow().is_empty());
    }
}
