//! Ember scene editor.
//!
//! A small 2D scene editor whose every control is an action loaded from a
//! RON bindings file. Listeners forward actions over a channel and the editor
//! applies them once per frame.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p ember-editor -- [OPTIONS]
//! ```
//!
//! ## Options
//!
//! - `-b, --bindings <PATH>`: Bindings file (default: the shipped `bindings.ron`)
//! - `-s, --scene <PATH>`: Scene file to edit (default: `scene.ron`)
//! - `-h, --help`: Print help message
//!
//! ## Environment Variables
//!
//! - `RUST_LOG`: Set log level (e.g., info, debug, trace)

mod app;
mod options;
mod scene;

use ember_app::{run_app_with, AppConfig};

use crate::app::EditorApp;
use crate::options::EditorOptions;

const WIDTH: u32 = 1280;
const HEIGHT: u32 = 720;
const TARGET_FPS: u32 = 60;

fn main() -> anyhow::Result<()> {
    let options = EditorOptions::from_args();
    if options.help {
        print_help();
        return Ok(());
    }

    let scene = options.scene;
    run_app_with(
        AppConfig::new("Ember Editor")
            .with_size(WIDTH, HEIGHT)
            .with_target_fps(TARGET_FPS)
            .with_bindings(options.bindings),
        move |ctx| EditorApp::open(ctx, scene),
    )
}

fn print_help() {
    eprintln!(
        "Ember scene editor

USAGE:
    cargo run -p ember-editor -- [OPTIONS]

OPTIONS:
    -b, --bindings <PATH>   Bindings file
                            Default: {}
    -s, --scene <PATH>      Scene file to edit (created on first save)
                            Default: scene.ron
    -h, --help              Print this help message

DEFAULT CONTROLS:
    Left click / tap        Select
    Right click             Spawn entity
    Middle drag             Pan
    Wheel                   Zoom
    [ / ]                   Previous / next entity
    Delete, Backspace       Delete selection
    Ctrl+D                  Duplicate selection
    Home                    Reset view
    Ctrl+S                  Save
    Escape                  Quit

ENVIRONMENT VARIABLES:
    RUST_LOG                Set log level (e.g., info, debug, trace)",
        options::DEFAULT_BINDINGS
    );
}
