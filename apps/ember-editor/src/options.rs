//! Command line options.

use std::path::PathBuf;

/// Bindings shipped with the editor.
pub const DEFAULT_BINDINGS: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/bindings.ron");
const DEFAULT_SCENE: &str = "scene.ron";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorOptions {
    pub bindings: PathBuf,
    pub scene: PathBuf,
    pub help: bool,
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self {
            bindings: PathBuf::from(DEFAULT_BINDINGS),
            scene: PathBuf::from(DEFAULT_SCENE),
            help: false,
        }
    }
}

impl EditorOptions {
    /// Parse options from the process arguments.
    pub fn from_args() -> Self {
        Self::parse(std::env::args().skip(1))
    }

    /// Parse options, ignoring anything unrecognized.
    pub fn parse(args: impl IntoIterator<Item = String>) -> Self {
        let mut options = Self::default();
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "-b" | "--bindings" => {
                    if let Some(path) = args.next() {
                        options.bindings = PathBuf::from(path);
                    }
                }
                "-s" | "--scene" => {
                    if let Some(path) = args.next() {
                        options.scene = PathBuf::from(path);
                    }
                }
                "-h" | "--help" => options.help = true,
                _ => {}
            }
        }
        options
    }
}
