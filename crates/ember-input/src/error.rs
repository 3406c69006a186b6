//! Input error types.

use thiserror::Error;

use crate::device::DeviceClass;

/// Errors raised while building the mapping table or opening device backends.
///
/// Dispatch itself never fails: unmatched events and actions without
/// listeners are silent no-ops.
#[derive(Error, Debug)]
pub enum InputError {
    /// A binding names a device class that does not exist.
    #[error("action '{action}' is bound to unknown device class '{device}'")]
    UnknownDeviceClass {
        /// Action the binding belongs to.
        action: String,
        /// Device name as written in the configuration.
        device: String,
    },

    /// A binding names an input the device class cannot produce.
    #[error("action '{action}' uses unknown {class} input '{input}'")]
    UnknownInput {
        /// Action the binding belongs to.
        action: String,
        /// Device class of the binding.
        class: DeviceClass,
        /// Input name as written in the configuration.
        input: String,
    },

    /// A binding is structurally invalid.
    #[error("invalid binding for action '{action}': {reason}")]
    InvalidBinding {
        /// Action the binding belongs to.
        action: String,
        /// What is wrong with it.
        reason: String,
    },

    /// Bindings file is not valid RON.
    #[error("Bindings parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),

    /// Bindings could not be serialized.
    #[error("Bindings serialization error: {0}")]
    Serialize(#[from] ron::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Gamepad backend could not be initialised.
    #[error("Gamepad backend error: {0}")]
    Gamepad(String),
}

/// Result type alias.
pub type Result<T> = std::result::Result<T, InputError>;
