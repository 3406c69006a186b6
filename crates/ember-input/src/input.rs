//! Main input system combining device trackers and action dispatch.

use glam::Vec2;
use hashbrown::HashMap;
use tracing::warn;
use winit::event::{ElementState, MouseScrollDelta, TouchPhase as WinitTouchPhase, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

use crate::action::ActionMapper;
use crate::event::{JoystickAxis, MouseWheel, RawEvent};
use crate::joystick::JoystickState;
use crate::keyboard::KeyboardState;
use crate::modifiers::Modifiers;
use crate::mouse::{MouseButton, MouseState};

/// Pixels of touchpad scrolling that count as one wheel notch.
const PIXELS_PER_LINE: f64 = 100.0;

/// Input system combining keyboard, mouse, joystick tracking and action dispatch.
///
/// # Usage
///
/// ```ignore
/// let mut input = InputSystem::with_actions(
///     ActionMapper::builder().bind_key("jump", KeyCode::Space).build(),
/// );
/// input.actions_mut().connect("jump", DeviceClass::Keyboard, |_| println!("jump"));
///
/// // Once per frame, before the frame's events
/// input.update();
///
/// // For every window event
/// input.process_window_event(&event);
///
/// // Anywhere in the frame
/// if input.is_key_down(KeyCode::KeyW) {
///     // Move forward
/// }
/// ```
#[derive(Debug, Default)]
pub struct InputSystem {
    /// Keyboard input state.
    keyboard: KeyboardState,
    /// Mouse input state.
    mouse: MouseState,
    /// Joystick input state.
    joysticks: JoystickState,
    /// Action bindings and listeners.
    actions: ActionMapper,
    /// Finger index of each active touch, keyed by platform touch id.
    fingers: HashMap<u64, u64>,
}

impl InputSystem {
    /// Create a new input system with no bindings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new input system with a pre-configured action mapper.
    #[must_use]
    pub fn with_actions(actions: ActionMapper) -> Self {
        Self {
            keyboard: KeyboardState::new(),
            mouse: MouseState::new(),
            joysticks: JoystickState::new(),
            actions,
            fingers: HashMap::new(),
        }
    }

    /// Get a reference to the keyboard state.
    #[must_use]
    pub const fn keyboard(&self) -> &KeyboardState {
        &self.keyboard
    }

    /// Get a reference to the mouse state.
    #[must_use]
    pub const fn mouse(&self) -> &MouseState {
        &self.mouse
    }

    /// Get a reference to the joystick state.
    #[must_use]
    pub const fn joysticks(&self) -> &JoystickState {
        &self.joysticks
    }

    /// Get the action mapper.
    #[must_use]
    pub const fn actions(&self) -> &ActionMapper {
        &self.actions
    }

    /// Get a mutable reference to the action mapper for listeners and rebinding.
    pub fn actions_mut(&mut self) -> &mut ActionMapper {
        &mut self.actions
    }

    /// Start a new frame: clear last frame's edges and per-frame deltas.
    ///
    /// **IMPORTANT**: Call this once per frame BEFORE feeding the frame's events.
    pub fn update(&mut self) {
        self.keyboard.begin_frame();
        self.mouse.begin_frame();
        self.joysticks.begin_frame();
    }

    /// Feed one raw event: trackers first, then action dispatch.
    ///
    /// Returns the number of listener invocations.
    pub fn handle_event(&mut self, event: &RawEvent) -> usize {
        self.keyboard.process_event(event);
        self.mouse.process_event(event);
        self.joysticks.process_event(event);
        self.actions.handle_event(event)
    }

    /// Translate a winit window event and feed the result.
    ///
    /// Returns `true` if the event produced any raw event.
    pub fn process_window_event(&mut self, event: &WindowEvent) -> bool {
        let events = self.translate(event);
        for raw in &events {
            self.handle_event(raw);
        }
        !events.is_empty()
    }

    fn translate(&mut self, event: &WindowEvent) -> Vec<RawEvent> {
        let position = self.mouse.position();
        match event {
            WindowEvent::CloseRequested => vec![RawEvent::Closed],
            WindowEvent::Resized(size) => vec![RawEvent::Resized {
                width: size.width,
                height: size.height,
            }],
            WindowEvent::Focused(true) => vec![RawEvent::FocusGained],
            WindowEvent::Focused(false) => vec![RawEvent::FocusLost],
            WindowEvent::ModifiersChanged(modifiers) => {
                self.keyboard
                    .set_modifiers(Modifiers::from(modifiers.state()));
                Vec::new()
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if event.repeat {
                    return Vec::new();
                }
                let mut events = Vec::new();
                if let PhysicalKey::Code(key) = event.physical_key {
                    let modifiers = self.keyboard.modifiers();
                    events.push(match event.state {
                        ElementState::Pressed => RawEvent::KeyPressed { key, modifiers },
                        ElementState::Released => RawEvent::KeyReleased { key, modifiers },
                    });
                }
                if event.state == ElementState::Pressed {
                    if let Some(text) = &event.text {
                        events.extend(text.chars().map(RawEvent::TextEntered));
                    }
                }
                events
            }
            WindowEvent::CursorMoved { position, .. } => vec![RawEvent::MouseMoved {
                position: Vec2::new(position.x as f32, position.y as f32),
            }],
            WindowEvent::CursorEntered { .. } => vec![RawEvent::MouseEntered],
            WindowEvent::CursorLeft { .. } => vec![RawEvent::MouseLeft],
            WindowEvent::MouseInput { state, button, .. } => {
                let Ok(button) = MouseButton::try_from(*button) else {
                    warn!(?button, "Ignoring unsupported mouse button");
                    return Vec::new();
                };
                vec![match state {
                    ElementState::Pressed => RawEvent::MouseButtonPressed { button, position },
                    ElementState::Released => RawEvent::MouseButtonReleased { button, position },
                }]
            }
            WindowEvent::MouseWheel { delta, .. } => wheel_events(*delta, position),
            WindowEvent::Touch(touch) => {
                let finger = self.finger_slot(touch.id, touch.phase);
                let position = Vec2::new(touch.location.x as f32, touch.location.y as f32);
                vec![match touch.phase {
                    WinitTouchPhase::Started => RawEvent::TouchBegan { finger, position },
                    WinitTouchPhase::Moved => RawEvent::TouchMoved { finger, position },
                    WinitTouchPhase::Ended | WinitTouchPhase::Cancelled => {
                        RawEvent::TouchEnded { finger, position }
                    }
                }]
            }
            _ => Vec::new(),
        }
    }

    /// Finger index for a platform touch id.
    ///
    /// A new touch takes the lowest free index; the index is freed when the
    /// touch ends or is cancelled.
    fn finger_slot(&mut self, id: u64, phase: WinitTouchPhase) -> u64 {
        let finger = self
            .fingers
            .get(&id)
            .copied()
            .unwrap_or_else(|| lowest_free_finger(&self.fingers));
        match phase {
            WinitTouchPhase::Started | WinitTouchPhase::Moved => {
                self.fingers.insert(id, finger);
            }
            WinitTouchPhase::Ended | WinitTouchPhase::Cancelled => {
                self.fingers.remove(&id);
            }
        }
        finger
    }

    // ===== Keyboard shortcuts =====

    /// Returns `true` if the key went down this frame.
    #[must_use]
    pub fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.keyboard.is_pressed(key)
    }

    /// Returns `true` while the key is held.
    #[must_use]
    pub fn is_key_down(&self, key: KeyCode) -> bool {
        self.keyboard.is_down(key)
    }

    /// Returns `true` if the key went up this frame.
    #[must_use]
    pub fn is_key_released(&self, key: KeyCode) -> bool {
        self.keyboard.is_released(key)
    }

    /// Get the current modifier key state.
    #[must_use]
    pub const fn modifiers(&self) -> Modifiers {
        self.keyboard.modifiers()
    }

    // ===== Mouse shortcuts =====

    /// Returns `true` if the mouse button went down this frame.
    #[must_use]
    pub const fn is_mouse_button_pressed(&self, button: MouseButton) -> bool {
        self.mouse.is_pressed(button)
    }

    /// Returns `true` while the mouse button is held.
    #[must_use]
    pub const fn is_mouse_button_down(&self, button: MouseButton) -> bool {
        self.mouse.is_down(button)
    }

    /// Returns `true` if the mouse button went up this frame.
    #[must_use]
    pub const fn is_mouse_button_released(&self, button: MouseButton) -> bool {
        self.mouse.is_released(button)
    }

    /// Returns `true` if the cursor moved this frame.
    #[must_use]
    pub const fn mouse_moved(&self) -> bool {
        self.mouse.moved()
    }

    /// Current cursor position in window coordinates.
    #[must_use]
    pub const fn current_cursor_position(&self) -> Vec2 {
        self.mouse.position()
    }

    /// Cursor position at the start of this frame.
    #[must_use]
    pub const fn last_cursor_position(&self) -> Vec2 {
        self.mouse.last_position()
    }

    /// Cursor movement during this frame.
    #[must_use]
    pub fn cursor_delta(&self) -> Vec2 {
        self.mouse.delta()
    }

    /// Returns `true` if any wheel scrolled this frame.
    #[must_use]
    pub const fn is_mouse_wheel_scrolled(&self) -> bool {
        self.mouse.wheel_scrolled()
    }

    /// Scroll accumulated this frame on `wheel`.
    #[must_use]
    pub const fn mouse_wheel_delta(&self, wheel: MouseWheel) -> f32 {
        let delta = self.mouse.scroll_delta();
        match wheel {
            MouseWheel::Vertical => delta.y,
            MouseWheel::Horizontal => delta.x,
        }
    }

    // ===== Joystick shortcuts =====

    /// Returns `true` if the joystick was plugged in this frame.
    #[must_use]
    pub fn is_joystick_connected(&self, joystick: u32) -> bool {
        self.joysticks.is_connected(joystick)
    }

    /// Returns `true` while the joystick is plugged in.
    #[must_use]
    pub fn is_joystick_active(&self, joystick: u32) -> bool {
        self.joysticks.is_active(joystick)
    }

    /// Returns `true` if the joystick was unplugged this frame.
    #[must_use]
    pub fn is_joystick_disconnected(&self, joystick: u32) -> bool {
        self.joysticks.is_disconnected(joystick)
    }

    /// Returns `true` if the joystick button went down this frame.
    #[must_use]
    pub fn is_joystick_button_pressed(&self, joystick: u32, button: u32) -> bool {
        self.joysticks.is_button_pressed(joystick, button)
    }

    /// Returns `true` while the joystick button is held.
    #[must_use]
    pub fn is_joystick_button_down(&self, joystick: u32, button: u32) -> bool {
        self.joysticks.is_button_down(joystick, button)
    }

    /// Returns `true` if the joystick button went up this frame.
    #[must_use]
    pub fn is_joystick_button_released(&self, joystick: u32, button: u32) -> bool {
        self.joysticks.is_button_released(joystick, button)
    }

    /// Last reported position of a joystick axis, `0.0` if never reported.
    #[must_use]
    pub fn joystick_axis_position(&self, joystick: u32, axis: JoystickAxis) -> f32 {
        self.joysticks.axis_position(joystick, axis)
    }

    /// Clear all device state. Bindings and listeners are kept.
    pub fn clear(&mut self) {
        self.keyboard.clear();
        self.mouse.clear();
        self.joysticks.clear();
        self.fingers.clear();
    }
}

fn lowest_free_finger(fingers: &HashMap<u64, u64>) -> u64 {
    (0..)
        .find(|slot| !fingers.values().any(|finger| finger == slot))
        .unwrap_or_default()
}

/// Split a winit scroll into per-wheel raw events, skipping zero axes.
fn wheel_events(delta: MouseScrollDelta, position: Vec2) -> Vec<RawEvent> {
    let (horizontal, vertical) = match delta {
        MouseScrollDelta::LineDelta(x, y) => (x, y),
        MouseScrollDelta::PixelDelta(pixels) => (
            (pixels.x / PIXELS_PER_LINE) as f32,
            (pixels.y / PIXELS_PER_LINE) as f32,
        ),
    };
    [(MouseWheel::Vertical, vertical), (MouseWheel::Horizontal, horizontal)]
        .into_iter()
        .filter(|&(_, delta)| delta != 0.0)
        .map(|(wheel, delta)| RawEvent::MouseWheelScrolled {
            wheel,
            delta,
            position,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use approx::assert_relative_eq;
    use winit::dpi::{PhysicalPosition, PhysicalSize};
    use winit::event::{DeviceId, Touch};

    use super::*;
    use crate::device::DeviceClass;
    use crate::event::EventKind;

    fn key(key: KeyCode, pressed: bool) -> RawEvent {
        let modifiers = Modifiers::empty();
        if pressed {
            RawEvent::KeyPressed { key, modifiers }
        } else {
            RawEvent::KeyReleased { key, modifiers }
        }
    }

    #[test]
    fn input_system_creation() {
        let input = InputSystem::new();
        assert!(!input.is_key_down(KeyCode::KeyW));
        assert_eq!(input.current_cursor_position(), Vec2::ZERO);
        assert!(!input.is_joystick_active(0));
    }

    #[test]
    fn key_state_follows_frames() {
        let mut input = InputSystem::new();

        input.update();
        input.handle_event(&key(KeyCode::KeyW, true));
        assert!(input.is_key_pressed(KeyCode::KeyW));
        assert!(input.is_key_down(KeyCode::KeyW));
        assert!(!input.is_key_released(KeyCode::KeyW));

        input.update();
        assert!(!input.is_key_pressed(KeyCode::KeyW));
        assert!(input.is_key_down(KeyCode::KeyW));

        input.handle_event(&key(KeyCode::KeyW, false));
        assert!(input.is_key_released(KeyCode::KeyW));
        assert!(!input.is_key_down(KeyCode::KeyW));

        input.update();
        assert!(!input.is_key_released(KeyCode::KeyW));
    }

    #[test]
    fn released_implies_not_down_and_pressed_implies_down() {
        let mut input = InputSystem::new();
        let script = [
            (KeyCode::KeyA, true),
            (KeyCode::KeyB, true),
            (KeyCode::KeyA, false),
            (KeyCode::KeyA, true),
            (KeyCode::KeyB, false),
            (KeyCode::KeyB, false),
        ];
        for (frame, &(code, pressed)) in script.iter().enumerate() {
            if frame % 2 == 0 {
                input.update();
            }
            input.handle_event(&key(code, pressed));
            for code in [KeyCode::KeyA, KeyCode::KeyB] {
                if input.is_key_released(code) && !input.is_key_pressed(code) {
                    assert!(!input.is_key_down(code));
                }
                if input.is_key_pressed(code) && !input.is_key_released(code) {
                    assert!(input.is_key_down(code));
                }
            }
        }
    }

    #[test]
    fn cursor_tracks_position_and_delta() {
        let mut input = InputSystem::new();
        input.update();
        input.handle_event(&RawEvent::MouseMoved {
            position: Vec2::new(10.0, 20.0),
        });

        input.update();
        assert!(!input.mouse_moved());
        input.handle_event(&RawEvent::MouseMoved {
            position: Vec2::new(15.0, 18.0),
        });
        assert!(input.mouse_moved());
        assert_eq!(input.last_cursor_position(), Vec2::new(10.0, 20.0));
        assert_eq!(input.current_cursor_position(), Vec2::new(15.0, 18.0));
        assert_relative_eq!(input.cursor_delta().x, 5.0);
        assert_relative_eq!(input.cursor_delta().y, -2.0);
    }

    #[test]
    fn wheel_delta_is_per_frame() {
        let mut input = InputSystem::new();
        input.update();
        for delta in [1.0, 0.5] {
            input.handle_event(&RawEvent::MouseWheelScrolled {
                wheel: MouseWheel::Vertical,
                delta,
                position: Vec2::ZERO,
            });
        }
        assert!(input.is_mouse_wheel_scrolled());
        assert_relative_eq!(input.mouse_wheel_delta(MouseWheel::Vertical), 1.5);
        assert_relative_eq!(input.mouse_wheel_delta(MouseWheel::Horizontal), 0.0);

        input.update();
        assert!(!input.is_mouse_wheel_scrolled());
        assert_relative_eq!(input.mouse_wheel_delta(MouseWheel::Vertical), 0.0);
    }

    #[test]
    fn joystick_presence_and_buttons() {
        let mut input = InputSystem::new();
        input.update();
        input.handle_event(&RawEvent::JoystickConnected { joystick: 1 });
        input.handle_event(&RawEvent::JoystickButtonPressed {
            joystick: 1,
            button: 3,
        });
        input.handle_event(&RawEvent::JoystickMoved {
            joystick: 1,
            axis: JoystickAxis::X,
            position: -0.5,
        });
        assert!(input.is_joystick_connected(1));
        assert!(input.is_joystick_active(1));
        assert!(input.is_joystick_button_pressed(1, 3));
        assert_relative_eq!(input.joystick_axis_position(1, JoystickAxis::X), -0.5);

        input.update();
        assert!(!input.is_joystick_connected(1));
        assert!(input.is_joystick_button_down(1, 3));

        input.handle_event(&RawEvent::JoystickDisconnected { joystick: 1 });
        assert!(input.is_joystick_disconnected(1));
        assert!(!input.is_joystick_active(1));
        assert!(!input.is_joystick_button_down(1, 3));
        assert_relative_eq!(input.joystick_axis_position(1, JoystickAxis::X), 0.0);
    }

    #[test]
    fn listeners_see_updated_state() {
        let mut input = InputSystem::with_actions(
            ActionMapper::builder()
                .bind_key("jump", KeyCode::Space)
                .build(),
        );
        let count = Rc::new(Cell::new(0));
        let seen = Rc::clone(&count);
        input
            .actions_mut()
            .connect("jump", DeviceClass::Keyboard, move |_| seen.set(seen.get() + 1));

        input.update();
        assert_eq!(input.handle_event(&key(KeyCode::Space, true)), 1);
        assert_eq!(count.get(), 1);
        assert!(input.is_key_down(KeyCode::Space));
    }

    #[test]
    fn window_events_are_translated() {
        let mut input = InputSystem::with_actions(
            ActionMapper::builder()
                .bind_event("quit", EventKind::Closed)
                .bind_event("resize", EventKind::Resized)
                .bind_event("blur", EventKind::FocusLost)
                .build(),
        );
        let count = Rc::new(Cell::new(0));
        for action in ["quit", "resize", "blur"] {
            let seen = Rc::clone(&count);
            input
                .actions_mut()
                .connect(action, DeviceClass::Event, move |_| seen.set(seen.get() + 1));
        }

        assert!(input.process_window_event(&WindowEvent::CloseRequested));
        assert!(input.process_window_event(&WindowEvent::Resized(PhysicalSize::new(800, 600))));
        assert!(input.process_window_event(&WindowEvent::Focused(false)));
        assert!(input.process_window_event(&WindowEvent::Focused(true)));
        assert!(!input.process_window_event(&WindowEvent::RedrawRequested));
        assert_eq!(count.get(), 3);
    }

    fn touch(id: u64, phase: WinitTouchPhase) -> WindowEvent {
        WindowEvent::Touch(Touch {
            device_id: DeviceId::dummy(),
            phase,
            location: PhysicalPosition::new(5.0, 6.0),
            force: None,
            id,
        })
    }

    #[test]
    fn touch_ids_become_finger_indices() {
        let mut input = InputSystem::with_actions(
            ActionMapper::builder().bind_touch("tap", 0).build(),
        );
        let taps = Rc::new(Cell::new(0));
        let seen = Rc::clone(&taps);
        input
            .actions_mut()
            .connect("tap", DeviceClass::Touch, move |_| seen.set(seen.get() + 1));

        input.process_window_event(&touch(140_234_567, WinitTouchPhase::Started));
        assert_eq!(taps.get(), 1);

        // Second finger down takes the next index and does not fire "tap".
        input.process_window_event(&touch(140_234_999, WinitTouchPhase::Started));
        assert_eq!(taps.get(), 1);
        assert_eq!(input.fingers.get(&140_234_999), Some(&1));

        // Lifting the first finger frees index 0 for the next touch.
        input.process_window_event(&touch(140_234_567, WinitTouchPhase::Ended));
        input.process_window_event(&touch(7, WinitTouchPhase::Started));
        assert_eq!(taps.get(), 2);
        assert_eq!(input.fingers.get(&7), Some(&0));

        input.process_window_event(&touch(7, WinitTouchPhase::Cancelled));
        input.process_window_event(&touch(140_234_999, WinitTouchPhase::Ended));
        assert!(input.fingers.is_empty());
    }

    #[test]
    fn line_scroll_splits_by_wheel() {
        let events = wheel_events(MouseScrollDelta::LineDelta(0.0, -2.0), Vec2::ONE);
        assert_eq!(
            events,
            vec![RawEvent::MouseWheelScrolled {
                wheel: MouseWheel::Vertical,
                delta: -2.0,
                position: Vec2::ONE,
            }]
        );

        let both = wheel_events(MouseScrollDelta::LineDelta(1.0, 1.0), Vec2::ZERO);
        assert_eq!(both.len(), 2);
    }

    #[test]
    fn pixel_scroll_is_scaled() {
        let events = wheel_events(
            MouseScrollDelta::PixelDelta(PhysicalPosition::new(50.0, 0.0)),
            Vec2::ZERO,
        );
        assert_eq!(events.len(), 1);
        let RawEvent::MouseWheelScrolled { wheel, delta, .. } = events[0] else {
            panic!("expected a wheel event");
        };
        assert_eq!(wheel, MouseWheel::Horizontal);
        assert_relative_eq!(delta, 0.5);
    }

    #[test]
    fn clear_keeps_bindings() {
        let mut input = InputSystem::with_actions(
            ActionMapper::builder()
                .bind_key("jump", KeyCode::Space)
                .build(),
        );
        input.handle_event(&key(KeyCode::Space, true));
        input.clear();
        assert!(!input.is_key_down(KeyCode::Space));
        assert_eq!(input.actions().table().len(), 1);
    }
}
