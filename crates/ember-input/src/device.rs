//! Device class tags.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The device family that produced a matched action.
///
/// Listeners are keyed by action name *and* device class, so the same action
/// name bound to the keyboard and to a joystick button reaches two distinct
/// listener lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceClass {
    /// Keyboard keys.
    Keyboard,
    /// Mouse buttons.
    MouseButton,
    /// Mouse wheel scrolling.
    MouseWheel,
    /// Touch fingers.
    Touch,
    /// Joystick / gamepad buttons.
    JoystickButton,
    /// Any event, matched by its kind alone.
    Event,
}

impl DeviceClass {
    /// All device classes, in dispatch order.
    pub const ALL: [Self; 6] = [
        Self::Keyboard,
        Self::MouseButton,
        Self::MouseWheel,
        Self::Touch,
        Self::JoystickButton,
        Self::Event,
    ];

    /// Name used in bindings files.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Keyboard => "keyboard",
            Self::MouseButton => "mouse_button",
            Self::MouseWheel => "mouse_wheel",
            Self::Touch => "touch",
            Self::JoystickButton => "joystick_button",
            Self::Event => "event",
        }
    }
}

impl fmt::Display for DeviceClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DeviceClass {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|class| class.name() == s)
            .ok_or(())
    }
}
