//! Keyboard input state tracking.

use hashbrown::HashMap;
use winit::keyboard::KeyCode;

use crate::button_state::ButtonState;
use crate::event::RawEvent;
use crate::modifiers::Modifiers;

/// Keyboard input state.
///
/// Tracks per-key edge/level flags and the modifier keys last reported by the
/// platform.
#[derive(Debug, Default)]
pub struct KeyboardState {
    /// Keys that are held or changed this frame.
    keys: HashMap<KeyCode, ButtonState>,
    /// Current modifier key state.
    modifiers: Modifiers,
}

impl KeyboardState {
    /// Create a new keyboard state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a raw event. Returns `true` if it was a keyboard event.
    pub fn process_event(&mut self, event: &RawEvent) -> bool {
        match *event {
            RawEvent::KeyPressed { key, modifiers } => {
                self.keys.entry(key).or_default().press();
                self.modifiers = modifiers;
                true
            }
            RawEvent::KeyReleased { key, modifiers } => {
                if let Some(state) = self.keys.get_mut(&key) {
                    state.release();
                }
                self.modifiers = modifiers;
                true
            }
            _ => false,
        }
    }

    /// Update modifier key state.
    pub fn set_modifiers(&mut self, modifiers: Modifiers) {
        self.modifiers = modifiers;
    }

    /// Returns `true` if the key went down this frame.
    #[must_use]
    pub fn is_pressed(&self, key: KeyCode) -> bool {
        self.keys.get(&key).is_some_and(|s| s.is_pressed())
    }

    /// Returns `true` while the key is held.
    #[must_use]
    pub fn is_down(&self, key: KeyCode) -> bool {
        self.keys.get(&key).is_some_and(|s| s.is_down())
    }

    /// Returns `true` if the key went up this frame.
    #[must_use]
    pub fn is_released(&self, key: KeyCode) -> bool {
        self.keys.get(&key).is_some_and(|s| s.is_released())
    }

    /// Get the current modifier key state.
    #[must_use]
    pub const fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    /// Called at the start of a frame to clear edges.
    pub fn begin_frame(&mut self) {
        self.keys.retain(|_, state| {
            state.begin_frame();
            !state.is_idle()
        });
    }

    /// Clear all key states.
    pub fn clear(&mut self) {
        self.keys.clear();
        self.modifiers = Modifiers::empty();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(keyboard: &mut KeyboardState, key: KeyCode) {
        keyboard.process_event(&RawEvent::KeyPressed {
            key,
            modifiers: Modifiers::empty(),
        });
    }

    fn release(keyboard: &mut KeyboardState, key: KeyCode) {
        keyboard.process_event(&RawEvent::KeyReleased {
            key,
            modifiers: Modifiers::empty(),
        });
    }

    #[test]
    fn key_press_and_release() {
        let mut keyboard = KeyboardState::new();
        assert!(!keyboard.is_down(KeyCode::KeyW));

        keyboard.begin_frame();
        press(&mut keyboard, KeyCode::KeyW);
        assert!(keyboard.is_pressed(KeyCode::KeyW));
        assert!(keyboard.is_down(KeyCode::KeyW));
        assert!(!keyboard.is_released(KeyCode::KeyW));

        keyboard.begin_frame();
        assert!(!keyboard.is_pressed(KeyCode::KeyW));
        assert!(keyboard.is_down(KeyCode::KeyW));

        keyboard.begin_frame();
        release(&mut keyboard, KeyCode::KeyW);
        assert!(!keyboard.is_down(KeyCode::KeyW));
        assert!(keyboard.is_released(KeyCode::KeyW));

        keyboard.begin_frame();
        assert!(!keyboard.is_pressed(KeyCode::KeyW));
        assert!(!keyboard.is_down(KeyCode::KeyW));
        assert!(!keyboard.is_released(KeyCode::KeyW));
    }

    #[test]
    fn idle_keys_are_pruned() {
        let mut keyboard = KeyboardState::new();
        press(&mut keyboard, KeyCode::KeyA);
        release(&mut keyboard, KeyCode::KeyA);
        keyboard.begin_frame();
        assert!(keyboard.keys.is_empty());
    }

    #[test]
    fn release_of_unknown_key_is_ignored() {
        let mut keyboard = KeyboardState::new();
        release(&mut keyboard, KeyCode::KeyQ);
        assert!(!keyboard.is_released(KeyCode::KeyQ));
    }

    #[test]
    fn key_events_carry_modifiers() {
        let mut keyboard = KeyboardState::new();
        keyboard.process_event(&RawEvent::KeyPressed {
            key: KeyCode::KeyS,
            modifiers: Modifiers::CTRL,
        });
        assert!(keyboard.modifiers().contains(Modifiers::CTRL));

        keyboard.set_modifiers(Modifiers::empty());
        assert!(keyboard.modifiers().is_empty());
    }

    #[test]
    fn non_keyboard_events_ignored() {
        let mut keyboard = KeyboardState::new();
        assert!(!keyboard.process_event(&RawEvent::MouseEntered));
    }
}
