//! Raw device events.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use winit::keyboard::KeyCode;

use crate::modifiers::Modifiers;
use crate::mouse::MouseButton;

/// Which physical wheel produced a scroll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MouseWheel {
    /// The usual scroll wheel.
    Vertical,
    /// Tilt wheel or horizontal touchpad scrolling.
    Horizontal,
}

/// Joystick axis identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JoystickAxis {
    X,
    Y,
    Z,
    R,
    U,
    V,
    PovX,
    PovY,
}

/// A single occurrence reported by the platform.
///
/// Positions are in window coordinates. Joystick axis positions are
/// normalized to `[-1, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RawEvent {
    /// The window was asked to close.
    Closed,
    /// The window was resized.
    Resized { width: u32, height: u32 },
    /// The window lost keyboard focus.
    FocusLost,
    /// The window gained keyboard focus.
    FocusGained,
    /// A character was typed.
    TextEntered(char),
    /// A key went down.
    KeyPressed { key: KeyCode, modifiers: Modifiers },
    /// A key went up.
    KeyReleased { key: KeyCode, modifiers: Modifiers },
    /// A mouse wheel moved. Positive is up / right.
    MouseWheelScrolled {
        wheel: MouseWheel,
        delta: f32,
        position: Vec2,
    },
    /// A mouse button went down.
    MouseButtonPressed { button: MouseButton, position: Vec2 },
    /// A mouse button went up.
    MouseButtonReleased { button: MouseButton, position: Vec2 },
    /// The cursor moved.
    MouseMoved { position: Vec2 },
    /// The cursor entered the window.
    MouseEntered,
    /// The cursor left the window.
    MouseLeft,
    /// A joystick button went down.
    JoystickButtonPressed { joystick: u32, button: u32 },
    /// A joystick button went up.
    JoystickButtonReleased { joystick: u32, button: u32 },
    /// A joystick axis changed.
    JoystickMoved {
        joystick: u32,
        axis: JoystickAxis,
        position: f32,
    },
    /// A joystick was plugged in.
    JoystickConnected { joystick: u32 },
    /// A joystick was unplugged.
    JoystickDisconnected { joystick: u32 },
    /// A finger touched the surface.
    TouchBegan { finger: u64, position: Vec2 },
    /// A finger moved on the surface.
    TouchMoved { finger: u64, position: Vec2 },
    /// A finger left the surface.
    TouchEnded { finger: u64, position: Vec2 },
}

/// Payload-free discriminant of a [`RawEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Closed,
    Resized,
    FocusLost,
    FocusGained,
    TextEntered,
    KeyPressed,
    KeyReleased,
    MouseWheelScrolled,
    MouseButtonPressed,
    MouseButtonReleased,
    MouseMoved,
    MouseEntered,
    MouseLeft,
    JoystickButtonPressed,
    JoystickButtonReleased,
    JoystickMoved,
    JoystickConnected,
    JoystickDisconnected,
    TouchBegan,
    TouchMoved,
    TouchEnded,
}

impl RawEvent {
    /// The kind of this event.
    #[must_use]
    pub const fn kind(&self) -> EventKind {
        match self {
            Self::Closed => EventKind::Closed,
            Self::Resized { .. } => EventKind::Resized,
            Self::FocusLost => EventKind::FocusLost,
            Self::FocusGained => EventKind::FocusGained,
            Self::TextEntered(_) => EventKind::TextEntered,
            Self::KeyPressed { .. } => EventKind::KeyPressed,
            Self::KeyReleased { .. } => EventKind::KeyReleased,
            Self::MouseWheelScrolled { .. } => EventKind::MouseWheelScrolled,
            Self::MouseButtonPressed { .. } => EventKind::MouseButtonPressed,
            Self::MouseButtonReleased { .. } => EventKind::MouseButtonReleased,
            Self::MouseMoved { .. } => EventKind::MouseMoved,
            Self::MouseEntered => EventKind::MouseEntered,
            Self::MouseLeft => EventKind::MouseLeft,
            Self::JoystickButtonPressed { .. } => EventKind::JoystickButtonPressed,
            Self::JoystickButtonReleased { .. } => EventKind::JoystickButtonReleased,
            Self::JoystickMoved { .. } => EventKind::JoystickMoved,
            Self::JoystickConnected { .. } => EventKind::JoystickConnected,
            Self::JoystickDisconnected { .. } => EventKind::JoystickDisconnected,
            Self::TouchBegan { .. } => EventKind::TouchBegan,
            Self::TouchMoved { .. } => EventKind::TouchMoved,
            Self::TouchEnded { .. } => EventKind::TouchEnded,
        }
    }
}
