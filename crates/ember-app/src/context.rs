//! Application context.

use std::sync::Arc;

use ember_input::InputSystem;
use winit::window::Window;

/// Application context shared across all app methods.
#[derive(Debug)]
pub struct AppContext {
    /// The window handle.
    pub window: Arc<Window>,
    /// Device state and action dispatch.
    pub input: InputSystem,
    /// Total frames updated.
    pub frame_count: u64,
    /// Seconds between the last two frames.
    pub(crate) delta_time: f32,
    exit_requested: bool,
}

impl AppContext {
    pub(crate) fn new(window: Arc<Window>, input: InputSystem) -> Self {
        Self {
            window,
            input,
            frame_count: 0,
            delta_time: 0.0,
            exit_requested: false,
        }
    }

    /// Seconds between the last two frames.
    #[must_use]
    pub const fn delta_time(&self) -> f32 {
        self.delta_time
    }

    /// Ask the runner to shut down after the current frame.
    pub fn request_exit(&mut self) {
        self.exit_requested = true;
    }

    /// Returns `true` once [`Self::request_exit`] has been called.
    #[must_use]
    pub const fn exit_requested(&self) -> bool {
        self.exit_requested
    }
}
