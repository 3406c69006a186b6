//! Application runner and event loop.

use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::Instant;

use anyhow::Context as _;
use ember_input::{ActionMapper, BindingConfig, InputSystem};
#[cfg(feature = "gamepad")]
use ember_input::GamepadSource;
use tracing::{error, info};
#[cfg(feature = "gamepad")]
use tracing::warn;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{StartCause, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::app::EmberApp;
use crate::context::AppContext;
use crate::frame::FrameClock;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Window title.
    pub title: String,
    /// Initial window width.
    pub width: u32,
    /// Initial window height.
    pub height: u32,
    /// Target frames per second (None for unlimited).
    pub target_fps: Option<u32>,
    /// RON bindings file loaded before the app starts.
    pub bindings: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "Ember".to_string(),
            width: 1280,
            height: 720,
            target_fps: Some(60),
            bindings: None,
        }
    }
}

impl AppConfig {
    /// Create a new config with the given title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    /// Set the window dimensions.
    #[must_use]
    pub const fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Set the target FPS.
    #[must_use]
    pub const fn with_target_fps(mut self, fps: u32) -> Self {
        self.target_fps = Some(fps);
        self
    }

    /// Load bindings from a RON file at startup.
    #[must_use]
    pub fn with_bindings(mut self, path: impl Into<PathBuf>) -> Self {
        self.bindings = Some(path.into());
        self
    }

    /// Build the action mapper described by this config.
    fn load_actions(&self) -> anyhow::Result<ActionMapper> {
        let Some(path) = &self.bindings else {
            return Ok(ActionMapper::new());
        };
        let config = BindingConfig::load(path)
            .with_context(|| format!("failed to load bindings from {}", path.display()))?;
        ActionMapper::from_config(&config)
            .with_context(|| format!("invalid bindings in {}", path.display()))
    }
}

/// Run an `EmberApp` with the given configuration.
///
/// This function initializes logging, loads the bindings file, creates the
/// window and runs the event loop until the application exits. A bindings
/// file that fails to load aborts startup before any window is opened.
pub fn run_app<A: EmberApp + 'static>(config: AppConfig) -> anyhow::Result<()> {
    run_app_with(config, A::init)
}

/// Run an `EmberApp` built by `init` instead of [`EmberApp::init`].
///
/// Use this when the application needs values from outside the context,
/// such as parsed command line options.
pub fn run_app_with<A, F>(config: AppConfig, init: F) -> anyhow::Result<()>
where
    A: EmberApp + 'static,
    F: FnOnce(&mut AppContext) -> anyhow::Result<A>,
{
    // Initialize logging; a subscriber installed by the host wins.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .try_init();

    info!("{} starting...", config.title);

    let actions = config.load_actions()?;
    info!(bindings = actions.table().len(), "Action bindings ready");

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut runner = AppRunner::<A, F> {
        config,
        init: Some(init),
        actions: Some(actions),
        state: None,
        init_error: None,
    };

    event_loop.run_app(&mut runner)?;

    match runner.init_error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

/// Internal application runner that implements winit's ApplicationHandler.
struct AppRunner<A: EmberApp, F> {
    config: AppConfig,
    /// Builds the application once the window exists.
    init: Option<F>,
    /// Handed to the input system when the window is created.
    actions: Option<ActionMapper>,
    state: Option<AppState<A>>,
    init_error: Option<anyhow::Error>,
}

/// Internal application state.
struct AppState<A: EmberApp> {
    ctx: AppContext,
    app: A,
    clock: FrameClock,
    #[cfg(feature = "gamepad")]
    gamepad: Option<GamepadSource>,
}

impl<A, F> ApplicationHandler for AppRunner<A, F>
where
    A: EmberApp + 'static,
    F: FnOnce(&mut AppContext) -> anyhow::Result<A>,
{
    fn new_events(&mut self, _event_loop: &ActiveEventLoop, _cause: StartCause) {
        if let Some(state) = &mut self.state {
            state.ctx.input.update();
        }
    }

    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }

        info!("Creating application state...");

        match self.create_state(event_loop) {
            Ok(state) => {
                self.state = Some(state);
                info!("Application ready!");
            }
            Err(e) => {
                error!("Failed to initialize application: {e:#}");
                self.init_error = Some(e);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let Some(state) = &mut self.state else {
            return;
        };

        // Let the app handle the event first
        if !state.app.on_event(&mut state.ctx, &event) {
            state.ctx.input.process_window_event(&event);
        }

        if matches!(event, WindowEvent::CloseRequested) {
            info!("Close requested");
            event_loop.exit();
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let Some(state) = &mut self.state else {
            return;
        };

        state.frame();

        if state.ctx.exit_requested() {
            info!("Exit requested");
            event_loop.exit();
        } else if let Some(left) = state.clock.remaining(Instant::now()) {
            thread::sleep(left);
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(mut state) = self.state.take() {
            state.cleanup();
        }
    }
}

impl<A, F> AppRunner<A, F>
where
    A: EmberApp + 'static,
    F: FnOnce(&mut AppContext) -> anyhow::Result<A>,
{
    fn create_state(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<AppState<A>> {
        let window_attrs = Window::default_attributes()
            .with_title(&self.config.title)
            .with_inner_size(PhysicalSize::new(self.config.width, self.config.height));

        let window = Arc::new(event_loop.create_window(window_attrs)?);

        let actions = self.actions.take().unwrap_or_default();
        let mut ctx = AppContext::new(window, InputSystem::with_actions(actions));

        #[cfg(feature = "gamepad")]
        let gamepad = match GamepadSource::new() {
            Ok(source) => Some(source),
            Err(e) => {
                warn!("Gamepads unavailable: {e}");
                None
            }
        };

        // Initialize the application
        let init = self.init.take().context("application already initialized")?;
        let app = init(&mut ctx)?;

        Ok(AppState {
            ctx,
            app,
            clock: FrameClock::new(self.config.target_fps, Instant::now()),
            #[cfg(feature = "gamepad")]
            gamepad,
        })
    }
}

impl<A: EmberApp> AppState<A> {
    fn frame(&mut self) {
        #[cfg(feature = "gamepad")]
        if let Some(gamepad) = &mut self.gamepad {
            for event in gamepad.poll() {
                self.ctx.input.handle_event(&event);
            }
        }

        let dt = self.clock.tick(Instant::now());
        self.ctx.delta_time = dt;
        self.app.update(&mut self.ctx, dt);
        self.ctx.frame_count += 1;
    }

    fn cleanup(&mut self) {
        if let Some(stats) = self.clock.stats() {
            info!("FPS Statistics:");
            info!("  Min: {:.1}", stats.min);
            info!("  Max: {:.1}", stats.max);
            info!("  Avg: {:.1}", stats.avg);
            info!("  Total frames: {}", stats.frames);
        }

        info!("Starting cleanup...");
        self.app.cleanup(&mut self.ctx);
        info!("Cleanup complete");
    }
}
