//! Gamepad source wrapping [`gilrs`].
//!
//! [`GamepadSource`] drains gilrs once per frame and turns its events into
//! joystick [`RawEvent`]s, so gamepads flow through the same trackers and
//! action mappers as every other device.
//!
//! Buttons are numbered in the order of [`BUTTONS`]; sticks, triggers and the
//! d-pad map onto [`JoystickAxis`] the usual way (left stick X/Y, triggers Z/R,
//! right stick U/V, d-pad PovX/PovY).

use gilrs::{Axis, Button, EventType, Gilrs};
use tracing::{debug, info};

use crate::error::{InputError, Result};
use crate::event::{JoystickAxis, RawEvent};

/// gilrs buttons in index order.
pub const BUTTONS: [Button; 19] = [
    Button::South,
    Button::East,
    Button::North,
    Button::West,
    Button::C,
    Button::Z,
    Button::LeftTrigger,
    Button::LeftTrigger2,
    Button::RightTrigger,
    Button::RightTrigger2,
    Button::Select,
    Button::Start,
    Button::Mode,
    Button::LeftThumb,
    Button::RightThumb,
    Button::DPadUp,
    Button::DPadDown,
    Button::DPadLeft,
    Button::DPadRight,
];

/// Index of a gilrs button, `None` for unknown buttons.
#[must_use]
pub fn button_index(button: Button) -> Option<u32> {
    BUTTONS
        .iter()
        .position(|&b| b == button)
        .and_then(|index| u32::try_from(index).ok())
}

/// Joystick axis for a gilrs axis, `None` for unknown axes.
#[must_use]
pub const fn axis_of(axis: Axis) -> Option<JoystickAxis> {
    match axis {
        Axis::LeftStickX => Some(JoystickAxis::X),
        Axis::LeftStickY => Some(JoystickAxis::Y),
        Axis::LeftZ => Some(JoystickAxis::Z),
        Axis::RightZ => Some(JoystickAxis::R),
        Axis::RightStickX => Some(JoystickAxis::U),
        Axis::RightStickY => Some(JoystickAxis::V),
        Axis::DPadX => Some(JoystickAxis::PovX),
        Axis::DPadY => Some(JoystickAxis::PovY),
        _ => None,
    }
}

/// Translate one gilrs event for `joystick`. Events without a raw counterpart yield `None`.
#[must_use]
pub fn translate(joystick: u32, event: EventType) -> Option<RawEvent> {
    match event {
        EventType::Connected => Some(RawEvent::JoystickConnected { joystick }),
        EventType::Disconnected => Some(RawEvent::JoystickDisconnected { joystick }),
        EventType::ButtonPressed(button, _) => translate_button(joystick, button, true),
        EventType::ButtonReleased(button, _) => translate_button(joystick, button, false),
        EventType::AxisChanged(axis, value, _) => translate_axis(joystick, axis, value),
        _ => None,
    }
}

fn translate_button(joystick: u32, button: Button, pressed: bool) -> Option<RawEvent> {
    let button = button_index(button)?;
    Some(if pressed {
        RawEvent::JoystickButtonPressed { joystick, button }
    } else {
        RawEvent::JoystickButtonReleased { joystick, button }
    })
}

fn translate_axis(joystick: u32, axis: Axis, value: f32) -> Option<RawEvent> {
    axis_of(axis).map(|axis| RawEvent::JoystickMoved {
        joystick,
        axis,
        position: value.clamp(-1.0, 1.0),
    })
}

/// Polls connected gamepads through gilrs.
pub struct GamepadSource {
    gilrs: Gilrs,
}

impl GamepadSource {
    /// Initialise gilrs.
    pub fn new() -> Result<Self> {
        let gilrs = Gilrs::new().map_err(|e| InputError::Gamepad(e.to_string()))?;
        let connected = gilrs.gamepads().count();
        info!(connected, "Gamepad source initialized");
        Ok(Self { gilrs })
    }

    /// Drain pending gilrs events. Call once per frame.
    pub fn poll(&mut self) -> Vec<RawEvent> {
        let mut events = Vec::new();
        while let Some(event) = self.gilrs.next_event() {
            let Ok(joystick) = u32::try_from(usize::from(event.id)) else {
                continue;
            };
            if let Some(raw) = translate(joystick, event.event) {
                debug!(?raw, "Gamepad event");
                events.push(raw);
            }
        }
        events
    }
}

impl std::fmt::Debug for GamepadSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GamepadSource")
            .field("connected", &self.gilrs.gamepads().count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buttons_have_stable_indices() {
        assert_eq!(button_index(Button::South), Some(0));
        assert_eq!(button_index(Button::Start), Some(11));
        assert_eq!(button_index(Button::DPadRight), Some(18));
        assert_eq!(button_index(Button::Unknown), None);
    }

    #[test]
    fn axes_map_to_joystick_axes() {
        assert_eq!(axis_of(Axis::LeftStickX), Some(JoystickAxis::X));
        assert_eq!(axis_of(Axis::RightStickY), Some(JoystickAxis::V));
        assert_eq!(axis_of(Axis::DPadY), Some(JoystickAxis::PovY));
        assert_eq!(axis_of(Axis::Unknown), None);
    }

    #[test]
    fn presence_events_translate() {
        assert_eq!(
            translate(2, EventType::Connected),
            Some(RawEvent::JoystickConnected { joystick: 2 })
        );
        assert_eq!(
            translate(2, EventType::Disconnected),
            Some(RawEvent::JoystickDisconnected { joystick: 2 })
        );
        assert_eq!(translate(2, EventType::Dropped), None);
    }

    #[test]
    fn buttons_translate_to_indices() {
        assert_eq!(
            translate_button(1, Button::North, true),
            Some(RawEvent::JoystickButtonPressed {
                joystick: 1,
                button: 2
            })
        );
        assert_eq!(
            translate_button(1, Button::RightTrigger, false),
            Some(RawEvent::JoystickButtonReleased {
                joystick: 1,
                button: 8
            })
        );
        assert_eq!(translate_button(1, Button::Unknown, true), None);
        assert_eq!(translate_button(1, Button::Unknown, false), None);
    }

    #[test]
    fn axes_translate_and_clamp() {
        assert_eq!(
            translate_axis(0, Axis::LeftZ, 0.25),
            Some(RawEvent::JoystickMoved {
                joystick: 0,
                axis: JoystickAxis::Z,
                position: 0.25
            })
        );
        assert_eq!(
            translate_axis(0, Axis::RightStickX, 1.7),
            Some(RawEvent::JoystickMoved {
                joystick: 0,
                axis: JoystickAxis::U,
                position: 1.0
            })
        );
        assert_eq!(
            translate_axis(0, Axis::DPadX, -3.0),
            Some(RawEvent::JoystickMoved {
                joystick: 0,
                axis: JoystickAxis::PovX,
                position: -1.0
            })
        );
        assert_eq!(translate_axis(0, Axis::Unknown, 0.5), None);
    }

    #[test]
    fn every_listed_button_has_its_position() {
        for (index, button) in BUTTONS.into_iter().enumerate() {
            assert_eq!(button_index(button), u32::try_from(index).ok());
        }
    }
}
