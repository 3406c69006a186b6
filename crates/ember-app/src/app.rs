//! `EmberApp` trait definition.

use winit::event::WindowEvent;

use crate::context::AppContext;

/// Trait for Ember applications.
///
/// Implement this trait to create a new application on top of the Ember input
/// stack. The framework handles window creation, bindings loading, per-frame
/// input bookkeeping and event loop handling.
pub trait EmberApp: Sized {
    /// Initialize the application.
    ///
    /// Called once after the window has been created and the bindings file
    /// (if any) has been loaded into `ctx.input`. This is the place to attach
    /// action listeners.
    fn init(ctx: &mut AppContext) -> anyhow::Result<Self>;

    /// Update application state.
    ///
    /// Called once per frame after all of the frame's events have been
    /// dispatched, so device queries reflect the whole frame.
    ///
    /// # Arguments
    /// * `ctx` - Application context with window and input access
    /// * `dt` - Delta time in seconds since last frame
    fn update(&mut self, ctx: &mut AppContext, dt: f32);

    /// Handle window events.
    ///
    /// Called for each window event before the input system sees it. Return
    /// `true` to consume the event and keep it away from the input system.
    ///
    /// Default implementation does nothing and returns `false`.
    #[allow(unused_variables)]
    fn on_event(&mut self, ctx: &mut AppContext, event: &WindowEvent) -> bool {
        false
    }

    /// Cleanup before shutdown.
    ///
    /// Default implementation does nothing.
    #[allow(unused_variables)]
    fn cleanup(&mut self, ctx: &mut AppContext) {}
}
