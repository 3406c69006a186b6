//! Bindings configuration loaded from RON.
//!
//! A bindings file is a list of entries, each tying an action name to one
//! input of one device class:
//!
//! ```ron
//! (
//!     bindings: [
//!         (action: "jump", device: "keyboard", input: "Space"),
//!         (action: "save", device: "keyboard", input: "KeyS", modifiers: ["ctrl"]),
//!         (action: "zoom_in", device: "mouse_wheel", input: "up"),
//!         (action: "drop", device: "mouse_button", input: "left", phase: "released"),
//!         (action: "confirm", device: "joystick_button", input: "0", joystick: 1),
//!         (action: "quit", device: "event", input: "closed"),
//!     ],
//! )
//! ```
//!
//! Optional fields may be written bare (`phase: "released"`) or wrapped
//! (`phase: Some("released")`).
//!
//! Every entry is validated when the table is built; a malformed entry fails
//! the whole load instead of surfacing later as a dispatch that never fires.

use std::path::Path;

use ron::extensions::Extensions;
use serde::de::value::{Error as ValueError, StrDeserializer};
use serde::de::{DeserializeOwned, IntoDeserializer};
use serde::{Deserialize, Serialize};
use tracing::info;
use winit::keyboard::KeyCode;

use crate::device::DeviceClass;
use crate::error::{InputError, Result};
use crate::event::EventKind;
use crate::mapper::{ButtonPhase, TouchPhase, WheelDirection};
use crate::modifiers::Modifiers;
use crate::mouse::MouseButton;
use crate::table::MappingTable;

/// One binding as written in a bindings file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindingEntry {
    /// Action name.
    pub action: String,
    /// Device class name (`keyboard`, `mouse_button`, `mouse_wheel`, `touch`,
    /// `joystick_button`, `event`).
    pub device: String,
    /// Input within the device: key name, button name, wheel direction,
    /// finger or button index, or event kind.
    pub input: String,
    /// Edge or touch stage; defaults to `pressed` / `began`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase: Option<String>,
    /// Restrict a joystick binding to one joystick id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub joystick: Option<u32>,
    /// Required modifier keys for keyboard bindings.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub modifiers: Vec<String>,
}

impl BindingEntry {
    /// Entry for `action` on `device`/`input` with default phase.
    pub fn new(
        action: impl Into<String>,
        device: DeviceClass,
        input: impl Into<String>,
    ) -> Self {
        Self {
            action: action.into(),
            device: device.name().to_string(),
            input: input.into(),
            phase: None,
            joystick: None,
            modifiers: Vec::new(),
        }
    }

    /// Set the phase name.
    #[must_use]
    pub fn with_phase(mut self, phase: impl Into<String>) -> Self {
        self.phase = Some(phase.into());
        self
    }

    /// Add required modifier names.
    #[must_use]
    pub fn with_modifiers<I, S>(mut self, modifiers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.modifiers.extend(modifiers.into_iter().map(Into::into));
        self
    }

    /// Restrict to one joystick.
    #[must_use]
    pub const fn with_joystick(mut self, joystick: u32) -> Self {
        self.joystick = Some(joystick);
        self
    }
}

/// A bindings file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindingConfig {
    #[serde(default)]
    pub bindings: Vec<BindingEntry>,
}

impl BindingConfig {
    /// Parse a bindings file from a RON string.
    pub fn from_ron(source: &str) -> Result<Self> {
        Ok(ron_options().from_str(source)?)
    }

    /// Serialize to pretty RON.
    pub fn to_ron(&self) -> Result<String> {
        let pretty = ron::ser::PrettyConfig::new().depth_limit(3);
        Ok(ron::ser::to_string_pretty(self, pretty)?)
    }

    /// Read and parse a bindings file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config = Self::from_ron(&contents)?;
        info!(
            path = %path.display(),
            bindings = config.bindings.len(),
            "Loaded input bindings"
        );
        Ok(config)
    }

    /// Write the bindings file, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_ron()?)?;
        Ok(())
    }
}

/// RON options for bindings files: optional fields accept bare values.
fn ron_options() -> ron::Options {
    ron::Options::default().with_default_extension(Extensions::IMPLICIT_SOME)
}

/// Parse a unit-variant name through the type's serde representation.
fn parse_variant<T: DeserializeOwned>(name: &str) -> Option<T> {
    let deserializer: StrDeserializer<'_, ValueError> = name.into_deserializer();
    T::deserialize(deserializer).ok()
}

impl MappingTable {
    /// Build a table from a bindings file.
    pub fn from_config(config: &BindingConfig) -> Result<Self> {
        let mut table = Self::new();
        table.apply_config(config)?;
        Ok(table)
    }

    /// Add every entry of `config`.
    ///
    /// Entries are validated first; on error the table is left unchanged.
    pub fn apply_config(&mut self, config: &BindingConfig) -> Result<()> {
        let mut staged = self.clone();
        for entry in &config.bindings {
            staged.apply_entry(entry)?;
        }
        *self = staged;
        Ok(())
    }

    fn apply_entry(&mut self, entry: &BindingEntry) -> Result<()> {
        let action = entry.action.trim();
        if action.is_empty() {
            return Err(InputError::InvalidBinding {
                action: entry.action.clone(),
                reason: "action name is empty".to_string(),
            });
        }

        let class: DeviceClass =
            entry
                .device
                .parse()
                .map_err(|()| InputError::UnknownDeviceClass {
                    action: action.to_string(),
                    device: entry.device.clone(),
                })?;

        let invalid = |reason: String| InputError::InvalidBinding {
            action: action.to_string(),
            reason,
        };
        let unknown_input = || InputError::UnknownInput {
            action: action.to_string(),
            class,
            input: entry.input.clone(),
        };

        if class != DeviceClass::Keyboard && !entry.modifiers.is_empty() {
            return Err(invalid(format!("modifiers are only valid on keyboard bindings, not {class}")));
        }
        if class != DeviceClass::JoystickButton && entry.joystick.is_some() {
            return Err(invalid(format!("joystick id is only valid on joystick_button bindings, not {class}")));
        }
        if matches!(class, DeviceClass::MouseWheel | DeviceClass::Event) && entry.phase.is_some() {
            return Err(invalid(format!("{class} bindings take no phase")));
        }

        let button_phase = || -> Result<ButtonPhase> {
            entry.phase.as_deref().map_or(Ok(ButtonPhase::Pressed), |name| {
                parse_variant(name).ok_or_else(|| invalid(format!("unknown phase '{name}' for {class}")))
            })
        };

        let input = entry.input.trim();
        match class {
            DeviceClass::Keyboard => {
                let key: KeyCode = parse_variant(input).ok_or_else(unknown_input)?;
                let mut modifiers = Modifiers::empty();
                for name in &entry.modifiers {
                    modifiers |= Modifiers::from_binding_name(name)
                        .ok_or_else(|| invalid(format!("unknown modifier '{name}'")))?;
                }
                self.keyboard.bind(action, key, modifiers, button_phase()?);
            }
            DeviceClass::MouseButton => {
                let button: MouseButton = parse_variant(input).ok_or_else(unknown_input)?;
                self.mouse_button.bind(action, button, button_phase()?);
            }
            DeviceClass::MouseWheel => {
                let direction: WheelDirection = parse_variant(input).ok_or_else(unknown_input)?;
                self.mouse_wheel.bind(action, direction);
            }
            DeviceClass::Touch => {
                let finger: u64 = input.parse().map_err(|_| unknown_input())?;
                let phase = entry.phase.as_deref().map_or(Ok(TouchPhase::Began), |name| {
                    parse_variant(name)
                        .ok_or_else(|| invalid(format!("unknown phase '{name}' for {class}")))
                })?;
                self.touch.bind(action, finger, phase);
            }
            DeviceClass::JoystickButton => {
                let button: u32 = input.parse().map_err(|_| unknown_input())?;
                self.joystick
                    .bind(action, entry.joystick, button, button_phase()?);
            }
            DeviceClass::Event => {
                let kind: EventKind = parse_variant(input).ok_or_else(unknown_input)?;
                self.event.bind(action, kind);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;
    use crate::event::RawEvent;
    use crate::mapper::InputMapper;

    const EDITOR_BINDINGS: &str = r#"
        (
            bindings: [
                (action: "jump", device: "keyboard", input: "Space"),
                (action: "save", device: "keyboard", input: "KeyS", modifiers: ["ctrl"]),
                (action: "zoom_in", device: "mouse_wheel", input: "up"),
                (action: "drop", device: "mouse_button", input: "left", phase: "released"),
                (action: "tap", device: "touch", input: "0"),
                (action: "confirm", device: "joystick_button", input: "0", joystick: 1),
                (action: "quit", device: "event", input: "closed"),
            ],
        )
    "#;

    fn single(entry: BindingEntry) -> BindingConfig {
        BindingConfig {
            bindings: vec![entry],
        }
    }

    #[test]
    fn parses_every_device_class() {
        let config = BindingConfig::from_ron(EDITOR_BINDINGS).expect("parse");
        let table = MappingTable::from_config(&config).expect("valid bindings");
        assert_eq!(table.len(), 7);

        let jump = RawEvent::KeyPressed {
            key: KeyCode::Space,
            modifiers: Modifiers::empty(),
        };
        assert_eq!(table.keyboard.actions(&jump), vec!["jump"]);

        let save = RawEvent::KeyPressed {
            key: KeyCode::KeyS,
            modifiers: Modifiers::CTRL,
        };
        assert_eq!(table.keyboard.actions(&save), vec!["save"]);

        let drop = RawEvent::MouseButtonReleased {
            button: MouseButton::Left,
            position: Vec2::ZERO,
        };
        assert_eq!(table.mouse_button.actions(&drop), vec!["drop"]);

        let pad0 = RawEvent::JoystickButtonPressed {
            joystick: 0,
            button: 0,
        };
        assert!(table.joystick.actions(&pad0).is_empty());

        assert_eq!(table.event.actions(&RawEvent::Closed), vec!["quit"]);
    }

    #[test]
    fn optional_fields_accept_bare_and_wrapped_values() {
        let bare = BindingConfig::from_ron(
            r#"(bindings: [
                (action: "drop", device: "mouse_button", input: "left", phase: "released"),
                (action: "confirm", device: "joystick_button", input: "0", joystick: 1),
            ])"#,
        )
        .expect("bare optionals");
        let wrapped = BindingConfig::from_ron(
            r#"(bindings: [
                (action: "drop", device: "mouse_button", input: "left", phase: Some("released")),
                (action: "confirm", device: "joystick_button", input: "0", joystick: Some(1)),
            ])"#,
        )
        .expect("wrapped optionals");
        assert_eq!(bare, wrapped);
        assert_eq!(bare.bindings[0].phase.as_deref(), Some("released"));
        assert_eq!(bare.bindings[1].joystick, Some(1));

        let pad1 = RawEvent::JoystickButtonPressed {
            joystick: 1,
            button: 0,
        };
        let table = MappingTable::from_config(&bare).expect("valid bindings");
        assert_eq!(table.joystick.actions(&pad1), vec!["confirm"]);
    }

    #[test]
    fn saved_file_parses_back() {
        let config = BindingConfig {
            bindings: vec![
                BindingEntry::new("drop", DeviceClass::MouseButton, "left").with_phase("released"),
                BindingEntry::new("confirm", DeviceClass::JoystickButton, "0").with_joystick(1),
            ],
        };
        let text = config.to_ron().expect("serialize");
        assert_eq!(BindingConfig::from_ron(&text).expect("parse"), config);
    }

    #[test]
    fn unknown_device_class_is_rejected() {
        let config = single(BindingEntry {
            device: "steering_wheel".to_string(),
            ..BindingEntry::new("jump", DeviceClass::Keyboard, "Space")
        });
        let err = MappingTable::from_config(&config).unwrap_err();
        match err {
            InputError::UnknownDeviceClass { action, device } => {
                assert_eq!(action, "jump");
                assert_eq!(device, "steering_wheel");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn unknown_inputs_are_rejected() {
        let cases = [
            BindingEntry::new("a", DeviceClass::Keyboard, "NotAKey"),
            BindingEntry::new("a", DeviceClass::MouseButton, "thumb"),
            BindingEntry::new("a", DeviceClass::MouseWheel, "sideways"),
            BindingEntry::new("a", DeviceClass::Touch, "first"),
            BindingEntry::new("a", DeviceClass::JoystickButton, "-1"),
            BindingEntry::new("a", DeviceClass::Event, "exploded"),
        ];
        for entry in cases {
            let class = entry.device.clone();
            let err = MappingTable::from_config(&single(entry)).unwrap_err();
            assert!(
                matches!(err, InputError::UnknownInput { .. }),
                "{class}: unexpected error {err}"
            );
        }
    }

    #[test]
    fn structural_errors_are_rejected() {
        let cases = [
            BindingEntry::new("  ", DeviceClass::Keyboard, "Space"),
            BindingEntry::new("a", DeviceClass::Keyboard, "Space").with_modifiers(["hyper"]),
            BindingEntry::new("a", DeviceClass::Keyboard, "Space").with_phase("held"),
            BindingEntry::new("a", DeviceClass::MouseButton, "left").with_modifiers(["ctrl"]),
            BindingEntry::new("a", DeviceClass::MouseWheel, "up").with_phase("pressed"),
            BindingEntry::new("a", DeviceClass::Keyboard, "Space").with_joystick(0),
            BindingEntry::new("a", DeviceClass::Touch, "0").with_phase("pressed"),
        ];
        for entry in cases {
            let err = MappingTable::from_config(&single(entry.clone())).unwrap_err();
            assert!(
                matches!(err, InputError::InvalidBinding { .. }),
                "{entry:?}: unexpected error {err}"
            );
        }
    }

    #[test]
    fn failed_apply_leaves_table_unchanged() {
        let mut table = MappingTable::new();
        table.bind_key("existing", KeyCode::KeyE);

        let config = BindingConfig {
            bindings: vec![
                BindingEntry::new("jump", DeviceClass::Keyboard, "Space"),
                BindingEntry::new("broken", DeviceClass::Keyboard, "NotAKey"),
            ],
        };
        assert!(table.apply_config(&config).is_err());
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn malformed_ron_is_a_parse_error() {
        let err = BindingConfig::from_ron("not valid ron {{{").unwrap_err();
        assert!(matches!(err, InputError::Parse(_)));
    }

    #[test]
    fn save_and_load() {
        let dir = std::env::temp_dir().join(format!("ember_bindings_{}", std::process::id()));
        let path = dir.join("bindings.ron");

        let config = BindingConfig {
            bindings: vec![
                BindingEntry::new("save", DeviceClass::Keyboard, "KeyS").with_modifiers(["ctrl"]),
                BindingEntry::new("confirm", DeviceClass::JoystickButton, "0").with_joystick(2),
            ],
        };
        config.save(&path).expect("save");
        let loaded = BindingConfig::load(&path).expect("load");
        assert_eq!(loaded, config);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = BindingConfig::load(Path::new("/definitely/not/here/bindings.ron")).unwrap_err();
        assert!(matches!(err, InputError::Io(_)));
    }
}
