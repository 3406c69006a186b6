//! Application framework for the Ember engine.
//!
//! This crate provides a trait-based application framework that handles
//! common boilerplate like:
//! - Window creation and management
//! - Loading action bindings from a RON file
//! - Per-frame input bookkeeping and event dispatch
//! - Gamepad polling (with the `gamepad` feature)
//! - Frame pacing and event loop handling
//!
//! # Example
//!
//! ```no_run
//! use ember_app::{run_app, AppConfig, AppContext, EmberApp};
//! use ember_app::input::{DeviceClass, KeyCode};
//!
//! struct MyApp;
//!
//! impl EmberApp for MyApp {
//!     fn init(ctx: &mut AppContext) -> anyhow::Result<Self> {
//!         ctx.input.actions_mut().table_mut().bind_key("jump", KeyCode::Space);
//!         ctx.input
//!             .actions_mut()
//!             .connect("jump", DeviceClass::Keyboard, |_| println!("jump"));
//!         Ok(MyApp)
//!     }
//!
//!     fn update(&mut self, ctx: &mut AppContext, dt: f32) {
//!         if ctx.input.is_key_pressed(KeyCode::Escape) {
//!             ctx.request_exit();
//!         }
//!     }
//! }
//!
//! fn main() -> anyhow::Result<()> {
//!     run_app::<MyApp>(AppConfig::new("My App").with_bindings("bindings.ron"))
//! }
//! ```

mod app;
mod context;
mod frame;
mod runner;

pub use app::EmberApp;
pub use context::AppContext;
pub use frame::FpsStats;
pub use runner::{run_app, run_app_with, AppConfig};

// Re-export commonly used types for convenience
pub use ember_input as input;
pub use winit::event::WindowEvent;
