//! Per-device-class mappers from raw events to action names.
//!
//! Each mapper owns the bindings of one [`DeviceClass`] and answers a single
//! question: which actions does this event trigger? Events from other devices
//! simply produce no actions.

use std::hash::Hash;

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use winit::keyboard::KeyCode;

use crate::device::DeviceClass;
use crate::event::{EventKind, MouseWheel, RawEvent};
use crate::modifiers::Modifiers;
use crate::mouse::MouseButton;

/// Edge of a digital input a binding reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ButtonPhase {
    #[default]
    Pressed,
    Released,
}

/// Stage of a touch a binding reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TouchPhase {
    #[default]
    Began,
    Moved,
    Ended,
}

/// Direction of a wheel scroll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WheelDirection {
    Up,
    Down,
    Left,
    Right,
}

impl WheelDirection {
    /// Direction of a scroll, `None` for a zero delta.
    #[must_use]
    pub fn of(wheel: MouseWheel, delta: f32) -> Option<Self> {
        if delta == 0.0 || delta.is_nan() {
            return None;
        }
        Some(match (wheel, delta > 0.0) {
            (MouseWheel::Vertical, true) => Self::Up,
            (MouseWheel::Vertical, false) => Self::Down,
            (MouseWheel::Horizontal, true) => Self::Right,
            (MouseWheel::Horizontal, false) => Self::Left,
        })
    }
}

/// Result of running one event through one mapper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mapping<'a> {
    /// Device class of the mapper that produced this result.
    pub class: DeviceClass,
    /// Matched actions in binding order, without duplicates.
    pub actions: Vec<&'a str>,
}

impl Mapping<'_> {
    /// Returns `true` if no action matched.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

/// Shared interface of the per-device-class mappers.
pub trait InputMapper {
    /// The device class this mapper tags its results with.
    fn device_class(&self) -> DeviceClass;

    /// Actions triggered by `event`, in binding order.
    fn actions<'a>(&'a self, event: &RawEvent) -> Vec<&'a str>;

    /// Remove every binding of `action`. Returns how many were removed.
    fn remove_action(&mut self, action: &str) -> usize;

    /// Number of bindings.
    fn len(&self) -> usize;

    /// Remove all bindings.
    fn clear(&mut self);

    /// Returns `true` if the mapper has no bindings.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Map an event to its tagged action set.
    fn map<'a>(&'a self, event: &RawEvent) -> Mapping<'a> {
        Mapping {
            class: self.device_class(),
            actions: self.actions(event),
        }
    }
}

/// An action bound to a trigger, with an extra per-binding filter.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Entry<F> {
    filter: F,
    action: String,
}

/// Trigger → ordered action list.
#[derive(Debug, Clone)]
struct Bindings<T, F = ()> {
    by_trigger: HashMap<T, Vec<Entry<F>>>,
}

impl<T, F> Default for Bindings<T, F> {
    fn default() -> Self {
        Self {
            by_trigger: HashMap::new(),
        }
    }
}

impl<T: Eq + Hash, F: PartialEq> Bindings<T, F> {
    fn bind(&mut self, trigger: T, filter: F, action: String) -> bool {
        let entries = self.by_trigger.entry(trigger).or_default();
        if entries
            .iter()
            .any(|e| e.action == action && e.filter == filter)
        {
            return false;
        }
        entries.push(Entry { filter, action });
        true
    }

    fn unbind(&mut self, trigger: &T, action: &str) -> usize {
        let Some(entries) = self.by_trigger.get_mut(trigger) else {
            return 0;
        };
        let before = entries.len();
        entries.retain(|e| e.action != action);
        let removed = before - entries.len();
        if entries.is_empty() {
            self.by_trigger.remove(trigger);
        }
        removed
    }

    fn matching(&self, trigger: &T, accept: impl Fn(&F) -> bool) -> Vec<&str> {
        let mut actions: Vec<&str> = Vec::new();
        if let Some(entries) = self.by_trigger.get(trigger) {
            for entry in entries.iter().filter(|e| accept(&e.filter)) {
                if !actions.contains(&entry.action.as_str()) {
                    actions.push(&entry.action);
                }
            }
        }
        actions
    }

    fn remove_action(&mut self, action: &str) -> usize {
        let mut removed = 0;
        self.by_trigger.retain(|_, entries| {
            let before = entries.len();
            entries.retain(|e| e.action != action);
            removed += before - entries.len();
            !entries.is_empty()
        });
        removed
    }

    fn len(&self) -> usize {
        self.by_trigger.values().map(Vec::len).sum()
    }

    fn clear(&mut self) {
        self.by_trigger.clear();
    }
}

/// Maps key presses and releases to actions.
///
/// A binding with modifiers matches only when the event carries at least
/// those modifiers.
#[derive(Debug, Clone, Default)]
pub struct KeyboardMapper {
    bindings: Bindings<(KeyCode, ButtonPhase), Modifiers>,
}

impl KeyboardMapper {
    /// Bind `action` to a key edge with required modifiers.
    /// Returns `false` if the binding already existed.
    pub fn bind(
        &mut self,
        action: impl Into<String>,
        key: KeyCode,
        modifiers: Modifiers,
        phase: ButtonPhase,
    ) -> bool {
        self.bindings.bind((key, phase), modifiers, action.into())
    }

    /// Remove `action` from a key edge.
    pub fn unbind(&mut self, action: &str, key: KeyCode, phase: ButtonPhase) -> usize {
        self.bindings.unbind(&(key, phase), action)
    }
}

impl InputMapper for KeyboardMapper {
    fn device_class(&self) -> DeviceClass {
        DeviceClass::Keyboard
    }

    fn actions<'a>(&'a self, event: &RawEvent) -> Vec<&'a str> {
        let (key, held, phase) = match *event {
            RawEvent::KeyPressed { key, modifiers } => (key, modifiers, ButtonPhase::Pressed),
            RawEvent::KeyReleased { key, modifiers } => (key, modifiers, ButtonPhase::Released),
            _ => return Vec::new(),
        };
        self.bindings
            .matching(&(key, phase), |required| held.contains(*required))
    }

    fn remove_action(&mut self, action: &str) -> usize {
        self.bindings.remove_action(action)
    }

    fn len(&self) -> usize {
        self.bindings.len()
    }

    fn clear(&mut self) {
        self.bindings.clear();
    }
}

/// Maps mouse button presses and releases to actions.
#[derive(Debug, Clone, Default)]
pub struct MouseButtonMapper {
    bindings: Bindings<(MouseButton, ButtonPhase)>,
}

impl MouseButtonMapper {
    /// Bind `action` to a button edge.
    pub fn bind(&mut self, action: impl Into<String>, button: MouseButton, phase: ButtonPhase) -> bool {
        self.bindings.bind((button, phase), (), action.into())
    }

    /// Remove `action` from a button edge.
    pub fn unbind(&mut self, action: &str, button: MouseButton, phase: ButtonPhase) -> usize {
        self.bindings.unbind(&(button, phase), action)
    }
}

impl InputMapper for MouseButtonMapper {
    fn device_class(&self) -> DeviceClass {
        DeviceClass::MouseButton
    }

    fn actions<'a>(&'a self, event: &RawEvent) -> Vec<&'a str> {
        let trigger = match *event {
            RawEvent::MouseButtonPressed { button, .. } => (button, ButtonPhase::Pressed),
            RawEvent::MouseButtonReleased { button, .. } => (button, ButtonPhase::Released),
            _ => return Vec::new(),
        };
        self.bindings.matching(&trigger, |_| true)
    }

    fn remove_action(&mut self, action: &str) -> usize {
        self.bindings.remove_action(action)
    }

    fn len(&self) -> usize {
        self.bindings.len()
    }

    fn clear(&mut self) {
        self.bindings.clear();
    }
}

/// Maps wheel scroll directions to actions.
#[derive(Debug, Clone, Default)]
pub struct MouseWheelMapper {
    bindings: Bindings<WheelDirection>,
}

impl MouseWheelMapper {
    /// Bind `action` to a scroll direction.
    pub fn bind(&mut self, action: impl Into<String>, direction: WheelDirection) -> bool {
        self.bindings.bind(direction, (), action.into())
    }

    /// Remove `action` from a scroll direction.
    pub fn unbind(&mut self, action: &str, direction: WheelDirection) -> usize {
        self.bindings.unbind(&direction, action)
    }
}

impl InputMapper for MouseWheelMapper {
    fn device_class(&self) -> DeviceClass {
        DeviceClass::MouseWheel
    }

    fn actions<'a>(&'a self, event: &RawEvent) -> Vec<&'a str> {
        let RawEvent::MouseWheelScrolled { wheel, delta, .. } = *event else {
            return Vec::new();
        };
        WheelDirection::of(wheel, delta)
            .map_or_else(Vec::new, |direction| self.bindings.matching(&direction, |_| true))
    }

    fn remove_action(&mut self, action: &str) -> usize {
        self.bindings.remove_action(action)
    }

    fn len(&self) -> usize {
        self.bindings.len()
    }

    fn clear(&mut self) {
        self.bindings.clear();
    }
}

/// Maps touch stages of a given finger to actions.
#[derive(Debug, Clone, Default)]
pub struct TouchFingerMapper {
    bindings: Bindings<(u64, TouchPhase)>,
}

impl TouchFingerMapper {
    /// Bind `action` to a touch stage of `finger`.
    pub fn bind(&mut self, action: impl Into<String>, finger: u64, phase: TouchPhase) -> bool {
        self.bindings.bind((finger, phase), (), action.into())
    }

    /// Remove `action` from a touch stage of `finger`.
    pub fn unbind(&mut self, action: &str, finger: u64, phase: TouchPhase) -> usize {
        self.bindings.unbind(&(finger, phase), action)
    }
}

impl InputMapper for TouchFingerMapper {
    fn device_class(&self) -> DeviceClass {
        DeviceClass::Touch
    }

    fn actions<'a>(&'a self, event: &RawEvent) -> Vec<&'a str> {
        let trigger = match *event {
            RawEvent::TouchBegan { finger, .. } => (finger, TouchPhase::Began),
            RawEvent::TouchMoved { finger, .. } => (finger, TouchPhase::Moved),
            RawEvent::TouchEnded { finger, .. } => (finger, TouchPhase::Ended),
            _ => return Vec::new(),
        };
        self.bindings.matching(&trigger, |_| true)
    }

    fn remove_action(&mut self, action: &str) -> usize {
        self.bindings.remove_action(action)
    }

    fn len(&self) -> usize {
        self.bindings.len()
    }

    fn clear(&mut self) {
        self.bindings.clear();
    }
}

/// Maps joystick button edges to actions.
///
/// A binding may be restricted to one joystick id; unrestricted bindings
/// match every joystick.
#[derive(Debug, Clone, Default)]
pub struct JoystickButtonMapper {
    bindings: Bindings<(u32, ButtonPhase), Option<u32>>,
}

impl JoystickButtonMapper {
    /// Bind `action` to a button edge on `joystick` (`None` = any joystick).
    pub fn bind(
        &mut self,
        action: impl Into<String>,
        joystick: Option<u32>,
        button: u32,
        phase: ButtonPhase,
    ) -> bool {
        self.bindings.bind((button, phase), joystick, action.into())
    }

    /// Remove `action` from a button edge, on every joystick filter.
    pub fn unbind(&mut self, action: &str, button: u32, phase: ButtonPhase) -> usize {
        self.bindings.unbind(&(button, phase), action)
    }
}

impl InputMapper for JoystickButtonMapper {
    fn device_class(&self) -> DeviceClass {
        DeviceClass::JoystickButton
    }

    fn actions<'a>(&'a self, event: &RawEvent) -> Vec<&'a str> {
        let (joystick, trigger) = match *event {
            RawEvent::JoystickButtonPressed { joystick, button } => {
                (joystick, (button, ButtonPhase::Pressed))
            }
            RawEvent::JoystickButtonReleased { joystick, button } => {
                (joystick, (button, ButtonPhase::Released))
            }
            _ => return Vec::new(),
        };
        self.bindings
            .matching(&trigger, |only| only.map_or(true, |id| id == joystick))
    }

    fn remove_action(&mut self, action: &str) -> usize {
        self.bindings.remove_action(action)
    }

    fn len(&self) -> usize {
        self.bindings.len()
    }

    fn clear(&mut self) {
        self.bindings.clear();
    }
}

/// Maps any event to actions by its [`EventKind`] alone.
#[derive(Debug, Clone, Default)]
pub struct GenericEventMapper {
    bindings: Bindings<EventKind>,
}

impl GenericEventMapper {
    /// Bind `action` to every event of `kind`.
    pub fn bind(&mut self, action: impl Into<String>, kind: EventKind) -> bool {
        self.bindings.bind(kind, (), action.into())
    }

    /// Remove `action` from `kind`.
    pub fn unbind(&mut self, action: &str, kind: EventKind) -> usize {
        self.bindings.unbind(&kind, action)
    }
}

impl InputMapper for GenericEventMapper {
    fn device_class(&self) -> DeviceClass {
        DeviceClass::Event
    }

    fn actions<'a>(&'a self, event: &RawEvent) -> Vec<&'a str> {
        self.bindings.matching(&event.kind(), |_| true)
    }

    fn remove_action(&mut self, action: &str) -> usize {
        self.bindings.remove_action(action)
    }

    fn len(&self) -> usize {
        self.bindings.len()
    }

    fn clear(&mut self) {
        self.bindings.clear();
    }
}
