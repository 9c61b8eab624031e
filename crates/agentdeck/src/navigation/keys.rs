use eframe::egui;

use super::Navigator;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavAction {
    Next,
    Prev,
    First,
    Last,
}

/// Map a key to a navigation action; keys without one return `None`.
pub fn action_for_key(key: egui::Key) -> Option<NavAction> {
    match key {
        egui::Key::ArrowRight | egui::Key::ArrowDown | egui::Key::Space | egui::Key::N => {
            Some(NavAction::Next)
        }
        egui::Key::ArrowLeft | egui::Key::ArrowUp | egui::Key::P => Some(NavAction::Prev),
        egui::Key::Home => Some(NavAction::First),
        egui::Key::End => Some(NavAction::Last),
        _ => None,
    }
}

/// Apply `action` if it would move the cursor. Returns whether it moved.
pub fn apply(nav: &mut Navigator, action: NavAction) -> bool {
    match action {
        NavAction::Next if !nav.is_last() => nav.next(),
        NavAction::Prev if !nav.is_first() => nav.prev(),
        NavAction::First if !nav.is_first() => nav.go_to(0),
        NavAction::Last if !nav.is_last() => nav.go_to(nav.last_index()),
        _ => false,
    }
}

/// Keyboard navigation for the presentation view.
///
/// Suspended while a text field owns the keyboard, so typing into the
/// tokenizer does not turn slides.
#[derive(Debug, Clone)]
pub struct KeyBinding {
    enabled: bool,
}

impl Default for KeyBinding {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyBinding {
    pub fn new() -> Self {
        Self { enabled: true }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Feed a sequence of pressed keys through the binding.
    /// Returns whether the cursor changed.
    pub fn handle_keys(
        &self,
        keys: impl IntoIterator<Item = egui::Key>,
        nav: &mut Navigator,
    ) -> bool {
        if !self.enabled {
            return false;
        }
        let mut changed = false;
        for action in keys.into_iter().filter_map(action_for_key) {
            changed |= apply(nav, action);
        }
        changed
    }

    /// Keys pressed this frame without Ctrl/Cmd/Alt held.
    pub fn pressed_keys(input: &egui::InputState) -> Vec<egui::Key> {
        input
            .events
            .iter()
            .filter_map(|event| match event {
                egui::Event::Key {
                    key,
                    pressed: true,
                    modifiers,
                    ..
                } if !modifiers.command && !modifiers.alt => Some(*key),
                _ => None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::num::NonZeroUsize;

    fn nav(total: usize) -> Navigator {
        Navigator::new(NonZeroUsize::new(total).unwrap())
    }

    #[test]
    fn test_key_mapping() {
        for key in [
            egui::Key::ArrowRight,
            egui::Key::ArrowDown,
            egui::Key::Space,
            egui::Key::N,
        ] {
            assert_eq!(action_for_key(key), Some(NavAction::Next), "{key:?}");
        }
        for key in [egui::Key::ArrowLeft, egui::Key::ArrowUp, egui::Key::P] {
            assert_eq!(action_for_key(key), Some(NavAction::Prev), "{key:?}");
        }
        assert_eq!(action_for_key(egui::Key::Home), Some(NavAction::First));
        assert_eq!(action_for_key(egui::Key::End), Some(NavAction::Last));
        assert_eq!(action_for_key(egui::Key::A), None);
        assert_eq!(action_for_key(egui::Key::Enter), None);
    }

    #[test]
    fn test_apply_at_boundaries_signals_nothing() {
        let mut n = nav(3);
        assert!(!apply(&mut n, NavAction::Prev));
        assert!(!apply(&mut n, NavAction::First));
        assert!(apply(&mut n, NavAction::Last));
        assert_eq!(n.current(), 2);
        assert!(!apply(&mut n, NavAction::Next));
        assert!(!apply(&mut n, NavAction::Last));
        assert!(apply(&mut n, NavAction::First));
        assert_eq!(n.current(), 0);
    }

    #[test]
    fn test_five_slide_walkthrough() {
        let binding = KeyBinding::new();
        let mut n = nav(5);
        assert_eq!(n.current(), 0);

        for _ in 0..4 {
            assert!(binding.handle_keys([egui::Key::ArrowRight], &mut n));
        }
        assert_eq!(n.current(), 4);

        assert!(!binding.handle_keys([egui::Key::ArrowRight], &mut n));
        assert_eq!(n.current(), 4);

        assert!(binding.handle_keys([egui::Key::ArrowLeft], &mut n));
        assert_eq!(n.current(), 3);

        n.go_to(0);
        assert_eq!(n.current(), 0);
    }

    #[test]
    fn test_unbound_keys_are_ignored() {
        let binding = KeyBinding::new();
        let mut n = nav(5);
        assert!(!binding.handle_keys([egui::Key::A, egui::Key::Enter], &mut n));
        assert_eq!(n.current(), 0);
    }

    #[test]
    fn test_disabled_binding() {
        let mut binding = KeyBinding::new();
        binding.set_enabled(false);
        assert!(!binding.is_enabled());
        let mut n = nav(5);
        assert!(!binding.handle_keys([egui::Key::Space, egui::Key::End], &mut n));
        assert_eq!(n.current(), 0);

        binding.set_enabled(true);
        assert!(binding.handle_keys([egui::Key::End], &mut n));
        assert_eq!(n.current(), 4);
    }

    #[test]
    fn test_several_keys_in_one_frame() {
        let binding = KeyBinding::new();
        let mut n = nav(5);
        binding.handle_keys([egui::Key::Space, egui::Key::N, egui::Key::P], &mut n);
        assert_eq!(n.current(), 1);
    }
}
