//! Joystick input state tracking.

use hashbrown::HashMap;
use tracing::debug;

use crate::button_state::ButtonState;
use crate::event::{JoystickAxis, RawEvent};

/// Joystick input state for every joystick seen so far.
///
/// Presence follows the same edge/level model as buttons: *connected* is the
/// edge raised on plug-in, *active* is the level while plugged in, and
/// *disconnected* is the edge raised on unplug.
#[derive(Debug, Default)]
pub struct JoystickState {
    /// Presence by joystick id.
    presence: HashMap<u32, ButtonState>,
    /// Button states by (joystick, button).
    buttons: HashMap<(u32, u32), ButtonState>,
    /// Last reported axis positions.
    axes: HashMap<(u32, JoystickAxis), f32>,
}

impl JoystickState {
    /// Create a new joystick state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a raw event. Returns `true` if it was a joystick event.
    pub fn process_event(&mut self, event: &RawEvent) -> bool {
        match *event {
            RawEvent::JoystickConnected { joystick } => {
                debug!(joystick, "Joystick connected");
                self.presence.entry(joystick).or_default().press();
            }
            RawEvent::JoystickDisconnected { joystick } => {
                debug!(joystick, "Joystick disconnected");
                if let Some(presence) = self.presence.get_mut(&joystick) {
                    presence.release();
                }
                self.buttons.retain(|(id, _), _| *id != joystick);
                self.axes.retain(|(id, _), _| *id != joystick);
            }
            RawEvent::JoystickButtonPressed { joystick, button } => {
                self.buttons.entry((joystick, button)).or_default().press();
            }
            RawEvent::JoystickButtonReleased { joystick, button } => {
                if let Some(state) = self.buttons.get_mut(&(joystick, button)) {
                    state.release();
                }
            }
            RawEvent::JoystickMoved {
                joystick,
                axis,
                position,
            } => {
                self.axes.insert((joystick, axis), position);
            }
            _ => return false,
        }
        true
    }

    /// Returns `true` if the joystick was plugged in this frame.
    #[must_use]
    pub fn is_connected(&self, joystick: u32) -> bool {
        self.presence.get(&joystick).is_some_and(|s| s.is_pressed())
    }

    /// Returns `true` while the joystick is plugged in.
    #[must_use]
    pub fn is_active(&self, joystick: u32) -> bool {
        self.presence.get(&joystick).is_some_and(|s| s.is_down())
    }

    /// Returns `true` if the joystick was unplugged this frame.
    #[must_use]
    pub fn is_disconnected(&self, joystick: u32) -> bool {
        self.presence.get(&joystick).is_some_and(|s| s.is_released())
    }

    /// Returns `true` if the button went down this frame.
    #[must_use]
    pub fn is_button_pressed(&self, joystick: u32, button: u32) -> bool {
        self.buttons
            .get(&(joystick, button))
            .is_some_and(|s| s.is_pressed())
    }

    /// Returns `true` while the button is held.
    #[must_use]
    pub fn is_button_down(&self, joystick: u32, button: u32) -> bool {
        self.buttons
            .get(&(joystick, button))
            .is_some_and(|s| s.is_down())
    }

    /// Returns `true` if the button went up this frame.
    #[must_use]
    pub fn is_button_released(&self, joystick: u32, button: u32) -> bool {
        self.buttons
            .get(&(joystick, button))
            .is_some_and(|s| s.is_released())
    }

    /// Last reported axis position, `0.0` if never reported.
    #[must_use]
    pub fn axis_position(&self, joystick: u32, axis: JoystickAxis) -> f32 {
        self.axes.get(&(joystick, axis)).copied().unwrap_or(0.0)
    }

    /// Called at the start of a frame to clear edges.
    pub fn begin_frame(&mut self) {
        self.presence.retain(|_, state| {
            state.begin_frame();
            !state.is_idle()
        });
        self.buttons.retain(|_, state| {
            state.begin_frame();
            !state.is_idle()
        });
    }

    /// Clear all joystick state.
    pub fn clear(&mut self) {
        self.presence.clear();
        self.buttons.clear();
        self.axes.clear();
    }
}
