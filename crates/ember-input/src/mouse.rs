//! Mouse input state tracking.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use winit::event::MouseButton as WinitMouseButton;

use crate::button_state::ButtonState;
use crate::event::{MouseWheel, RawEvent};

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Back,
    Forward,
}

impl TryFrom<WinitMouseButton> for MouseButton {
    type Error = ();

    fn try_from(button: WinitMouseButton) -> Result<Self, Self::Error> {
        match button {
            WinitMouseButton::Left => Ok(Self::Left),
            WinitMouseButton::Right => Ok(Self::Right),
            WinitMouseButton::Middle => Ok(Self::Middle),
            WinitMouseButton::Back => Ok(Self::Back),
            WinitMouseButton::Forward => Ok(Self::Forward),
            WinitMouseButton::Other(_) => Err(()),
        }
    }
}

/// Mouse input state.
///
/// Tracks cursor position, per-frame movement, button states, and the wheel.
#[derive(Debug, Default)]
pub struct MouseState {
    /// Current cursor position in window coordinates.
    position: Vec2,
    /// Cursor position at the start of the frame.
    last_position: Vec2,
    /// Whether the cursor moved this frame.
    moved: bool,
    /// Whether any wheel scrolled this frame.
    wheel_scrolled: bool,
    /// Scroll accumulated this frame (x = horizontal, y = vertical).
    scroll_delta: Vec2,
    /// Button states.
    buttons: [ButtonState; 5],
}

impl MouseState {
    /// Create a new mouse state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a raw event. Returns `true` if it was a mouse event.
    pub fn process_event(&mut self, event: &RawEvent) -> bool {
        match *event {
            RawEvent::MouseMoved { position } => {
                self.position = position;
                self.moved = true;
            }
            RawEvent::MouseButtonPressed { button, position } => {
                self.position = position;
                self.buttons[button as usize].press();
            }
            RawEvent::MouseButtonReleased { button, position } => {
                self.position = position;
                self.buttons[button as usize].release();
            }
            RawEvent::MouseWheelScrolled { wheel, delta, .. } => {
                self.wheel_scrolled = true;
                match wheel {
                    MouseWheel::Vertical => self.scroll_delta.y += delta,
                    MouseWheel::Horizontal => self.scroll_delta.x += delta,
                }
            }
            RawEvent::MouseEntered | RawEvent::MouseLeft => {}
            _ => return false,
        }
        true
    }

    /// Get current cursor position in window coordinates.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Get the cursor position at the start of the frame.
    #[must_use]
    pub const fn last_position(&self) -> Vec2 {
        self.last_position
    }

    /// Get cursor movement since the start of the frame.
    #[must_use]
    pub fn delta(&self) -> Vec2 {
        self.position - self.last_position
    }

    /// Returns `true` if the cursor moved this frame.
    #[must_use]
    pub const fn moved(&self) -> bool {
        self.moved
    }

    /// Returns `true` if a wheel scrolled this frame.
    #[must_use]
    pub const fn wheel_scrolled(&self) -> bool {
        self.wheel_scrolled
    }

    /// Get scroll delta (x = horizontal, y = vertical).
    #[must_use]
    pub const fn scroll_delta(&self) -> Vec2 {
        self.scroll_delta
    }

    /// Returns `true` if the button went down this frame.
    #[must_use]
    pub const fn is_pressed(&self, button: MouseButton) -> bool {
        self.buttons[button as usize].is_pressed()
    }

    /// Returns `true` while the button is held.
    #[must_use]
    pub const fn is_down(&self, button: MouseButton) -> bool {
        self.buttons[button as usize].is_down()
    }

    /// Returns `true` if the button went up this frame.
    #[must_use]
    pub const fn is_released(&self, button: MouseButton) -> bool {
        self.buttons[button as usize].is_released()
    }

    /// Called at the start of a frame to clear edges and per-frame deltas.
    pub fn begin_frame(&mut self) {
        for button in &mut self.buttons {
            button.begin_frame();
        }
        self.last_position = self.position;
        self.moved = false;
        self.wheel_scrolled = false;
        self.scroll_delta = Vec2::ZERO;
    }

    /// Clear all mouse state.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
