//! Modifier key flags.

use bitflags::bitflags;
use winit::keyboard::ModifiersState;

bitflags! {
    /// Modifier keys held while a key event was produced.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b0000_0001;
        const CTRL  = 0b0000_0010;
        const ALT   = 0b0000_0100;
        /// Windows / Command key.
        const SUPER = 0b0000_1000;
    }
}

impl Modifiers {
    /// Look up a single modifier by its bindings-file name
    /// (`shift`, `ctrl`, `alt`, `super`).
    ///
    /// Distinct from the generated `from_name`, which takes flag names.
    #[must_use]
    pub fn from_binding_name(name: &str) -> Option<Self> {
        match name {
            "shift" => Some(Self::SHIFT),
            "ctrl" | "control" => Some(Self::CTRL),
            "alt" => Some(Self::ALT),
            "super" | "cmd" => Some(Self::SUPER),
            _ => None,
        }
    }
}

impl From<ModifiersState> for Modifiers {
    fn from(state: ModifiersState) -> Self {
        let mut modifiers = Self::empty();
        modifiers.set(Self::SHIFT, state.shift_key());
        modifiers.set(Self::CTRL, state.control_key());
        modifiers.set(Self::ALT, state.alt_key());
        modifiers.set(Self::SUPER, state.super_key());
        modifiers
    }
}
