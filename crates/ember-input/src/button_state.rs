//! Per-frame state of a single digital input.

/// Edge and level flags of a key, button, or joystick presence.
///
/// - `pressed`: went down during the current frame (edge)
/// - `down`: is held (level)
/// - `released`: went up during the current frame (edge)
///
/// Edges are raised by [`press`](Self::press) / [`release`](Self::release)
/// and cleared by [`begin_frame`](Self::begin_frame), which runs once at the
/// start of every frame before that frame's events arrive. A press and a
/// release inside one frame leave both edges set and `down` cleared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ButtonState {
    pressed: bool,
    down: bool,
    released: bool,
}

impl ButtonState {
    /// Returns `true` if the input went down this frame.
    #[inline]
    #[must_use]
    pub const fn is_pressed(self) -> bool {
        self.pressed
    }

    /// Returns `true` while the input is held.
    #[inline]
    #[must_use]
    pub const fn is_down(self) -> bool {
        self.down
    }

    /// Returns `true` if the input went up this frame.
    #[inline]
    #[must_use]
    pub const fn is_released(self) -> bool {
        self.released
    }

    /// Returns `true` if no flag is set.
    #[inline]
    #[must_use]
    pub const fn is_idle(self) -> bool {
        !self.pressed && !self.down && !self.released
    }

    /// Record a down transition. Repeats while held are ignored.
    #[inline]
    pub fn press(&mut self) {
        if !self.down {
            self.pressed = true;
            self.down = true;
        }
    }

    /// Record an up transition. Ignored if not held.
    #[inline]
    pub fn release(&mut self) {
        if self.down {
            self.released = true;
            self.down = false;
        }
    }

    /// Clear the edge flags at the start of a frame.
    #[inline]
    pub fn begin_frame(&mut self) {
        self.pressed = false;
        self.released = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flags(state: ButtonState) -> (bool, bool, bool) {
        (state.is_pressed(), state.is_down(), state.is_released())
    }

    #[test]
    fn press_hold_release() {
        let mut state = ButtonState::default();
        assert_eq!(flags(state), (false, false, false));

        state.press();
        assert_eq!(flags(state), (true, true, false));

        state.begin_frame();
        assert_eq!(flags(state), (false, true, false));

        state.begin_frame();
        assert_eq!(flags(state), (false, true, false));

        state.release();
        assert_eq!(flags(state), (false, false, true));

        state.begin_frame();
        assert_eq!(flags(state), (false, false, false));
        assert!(state.is_idle());
    }

    #[test]
    fn repeat_press_ignored() {
        let mut state = ButtonState::default();
        state.press();
        state.begin_frame();
        state.press();
        assert_eq!(flags(state), (false, true, false));
    }

    #[test]
    fn release_without_press_ignored() {
        let mut state = ButtonState::default();
        state.release();
        assert!(state.is_idle());
    }

    #[test]
    fn tap_within_one_frame() {
        let mut state = ButtonState::default();
        state.press();
        state.release();
        assert_eq!(flags(state), (true, false, true));

        state.begin_frame();
        assert!(state.is_idle());
    }
}
