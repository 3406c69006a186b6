//! Input handling for the Ember engine.
//!
//! This crate turns raw device events into named actions and tracks
//! per-frame device state for polling.
//!
//! # Core Types
//!
//! - [`InputSystem`]: Main entry point combining device trackers and dispatch
//! - [`ActionMapper`]: Maps raw events to actions and invokes listeners
//! - [`MappingTable`]: One [`InputMapper`] per [`DeviceClass`]
//! - [`BindingConfig`]: Bindings loaded from a RON file
//! - [`KeyboardState`], [`MouseState`], [`JoystickState`]: Edge/level trackers
//!
//! # Usage
//!
//! ```ignore
//! use ember_input::{ActionMapper, DeviceClass, InputSystem, KeyCode, MouseButton};
//!
//! let actions = ActionMapper::builder()
//!     .bind_key("jump", KeyCode::Space)
//!     .bind_mouse_button("select", MouseButton::Left)
//!     .build();
//! let mut input = InputSystem::with_actions(actions);
//!
//! input
//!     .actions_mut()
//!     .connect("jump", DeviceClass::Keyboard, |event| println!("jump: {event:?}"));
//!
//! // Each frame
//! input.update();
//! for event in window_events {
//!     input.process_window_event(&event);
//! }
//! if input.is_key_down(KeyCode::KeyW) {
//!     // Move forward
//! }
//! ```
//!
//! # Dispatch Order
//!
//! One event can trigger actions in several device classes. Mappers are
//! consulted keyboard, mouse button, mouse wheel, touch, joystick button, then
//! generic event; within a class, actions come out in binding order and each
//! action's listeners run in registration order.
//!
//! # Gamepads
//!
//! With the `gamepad` feature, `GamepadSource` polls gilrs and yields joystick
//! [`RawEvent`]s to feed through [`InputSystem::handle_event`].

mod action;
mod button_state;
mod config;
mod device;
mod error;
mod event;
#[cfg(feature = "gamepad")]
mod gamepad;
mod input;
mod joystick;
mod keyboard;
mod mapper;
mod modifiers;
mod mouse;
mod registry;
mod table;

pub use action::{ActionMapper, ActionMapperBuilder};
pub use button_state::ButtonState;
pub use config::{BindingConfig, BindingEntry};
pub use device::DeviceClass;
pub use error::{InputError, Result};
pub use event::{EventKind, JoystickAxis, MouseWheel, RawEvent};
#[cfg(feature = "gamepad")]
pub use gamepad::{axis_of, button_index, translate as translate_gamepad_event, GamepadSource, BUTTONS};
pub use input::InputSystem;
pub use joystick::JoystickState;
pub use keyboard::KeyboardState;
pub use mapper::{
    ButtonPhase, GenericEventMapper, InputMapper, JoystickButtonMapper, KeyboardMapper, Mapping,
    MouseButtonMapper, MouseWheelMapper, TouchFingerMapper, TouchPhase, WheelDirection,
};
pub use modifiers::Modifiers;
pub use mouse::{MouseButton, MouseState};
pub use registry::{ActionKey, Callback, CallbackRegistry, ListenerId};
pub use table::MappingTable;

// Re-export winit types commonly used with input
pub use winit::event::WindowEvent;
pub use winit::keyboard::KeyCode;
