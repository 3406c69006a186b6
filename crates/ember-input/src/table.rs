//! The full set of per-device-class mappers.

use winit::keyboard::KeyCode;

use crate::device::DeviceClass;
use crate::event::{EventKind, RawEvent};
use crate::mapper::{
    ButtonPhase, GenericEventMapper, InputMapper, JoystickButtonMapper, KeyboardMapper, Mapping,
    MouseButtonMapper, MouseWheelMapper, TouchFingerMapper, TouchPhase, WheelDirection,
};
use crate::modifiers::Modifiers;
use crate::mouse::MouseButton;

/// One mapper per device class, consulted in a fixed order:
/// keyboard, mouse button, mouse wheel, touch, joystick, generic event.
#[derive(Debug, Clone, Default)]
pub struct MappingTable {
    pub keyboard: KeyboardMapper,
    pub mouse_button: MouseButtonMapper,
    pub mouse_wheel: MouseWheelMapper,
    pub touch: TouchFingerMapper,
    pub joystick: JoystickButtonMapper,
    pub event: GenericEventMapper,
}

impl MappingTable {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The mappers in dispatch order.
    #[must_use]
    pub fn mappers(&self) -> [&dyn InputMapper; 6] {
        [
            &self.keyboard,
            &self.mouse_button,
            &self.mouse_wheel,
            &self.touch,
            &self.joystick,
            &self.event,
        ]
    }

    /// The mapper for one device class.
    #[must_use]
    pub fn mapper(&self, class: DeviceClass) -> &dyn InputMapper {
        match class {
            DeviceClass::Keyboard => &self.keyboard,
            DeviceClass::MouseButton => &self.mouse_button,
            DeviceClass::MouseWheel => &self.mouse_wheel,
            DeviceClass::Touch => &self.touch,
            DeviceClass::JoystickButton => &self.joystick,
            DeviceClass::Event => &self.event,
        }
    }

    fn mapper_mut(&mut self, class: DeviceClass) -> &mut dyn InputMapper {
        match class {
            DeviceClass::Keyboard => &mut self.keyboard,
            DeviceClass::MouseButton => &mut self.mouse_button,
            DeviceClass::MouseWheel => &mut self.mouse_wheel,
            DeviceClass::Touch => &mut self.touch,
            DeviceClass::JoystickButton => &mut self.joystick,
            DeviceClass::Event => &mut self.event,
        }
    }

    /// Run `event` through every mapper, keeping only non-empty results.
    #[must_use]
    pub fn resolve(&self, event: &RawEvent) -> Vec<Mapping<'_>> {
        self.mappers()
            .into_iter()
            .map(|mapper| mapper.map(event))
            .filter(|mapping| !mapping.is_empty())
            .collect()
    }

    /// Bind `action` to a key press without modifiers.
    pub fn bind_key(&mut self, action: impl Into<String>, key: KeyCode) -> bool {
        self.keyboard
            .bind(action, key, Modifiers::empty(), ButtonPhase::Pressed)
    }

    /// Bind `action` to a key press with required modifiers.
    pub fn bind_key_with_modifiers(
        &mut self,
        action: impl Into<String>,
        key: KeyCode,
        modifiers: Modifiers,
    ) -> bool {
        self.keyboard.bind(action, key, modifiers, ButtonPhase::Pressed)
    }

    /// Bind `action` to a mouse button press.
    pub fn bind_mouse_button(&mut self, action: impl Into<String>, button: MouseButton) -> bool {
        self.mouse_button.bind(action, button, ButtonPhase::Pressed)
    }

    /// Bind `action` to a wheel direction.
    pub fn bind_wheel(&mut self, action: impl Into<String>, direction: WheelDirection) -> bool {
        self.mouse_wheel.bind(action, direction)
    }

    /// Bind `action` to a finger touching down.
    pub fn bind_touch(&mut self, action: impl Into<String>, finger: u64) -> bool {
        self.touch.bind(action, finger, TouchPhase::Began)
    }

    /// Bind `action` to a button press on any joystick.
    pub fn bind_joystick_button(&mut self, action: impl Into<String>, button: u32) -> bool {
        self.joystick.bind(action, None, button, ButtonPhase::Pressed)
    }

    /// Bind `action` to every event of `kind`.
    pub fn bind_event(&mut self, action: impl Into<String>, kind: EventKind) -> bool {
        self.event.bind(action, kind)
    }

    /// Remove every binding of `action` in `class`.
    pub fn remove_action(&mut self, action: &str, class: DeviceClass) -> usize {
        self.mapper_mut(class).remove_action(action)
    }

    /// Total number of bindings across all mappers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.mappers().iter().map(|mapper| mapper.len()).sum()
    }

    /// Returns `true` if no mapper has bindings.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.mappers().iter().all(|mapper| mapper.is_empty())
    }

    /// Remove all bindings.
    pub fn clear(&mut self) {
        for class in DeviceClass::ALL {
            self.mapper_mut(class).clear();
        }
    }
}
