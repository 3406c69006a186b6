//! Editor application: action listeners feed a command queue drained each frame.

use std::path::PathBuf;

use crossbeam::channel::{self, Receiver, Sender};
use ember_app::input::{DeviceClass, JoystickAxis, MouseButton, RawEvent};
use ember_app::{AppContext, EmberApp};
use glam::Vec2;
use tracing::{error, info, warn};

use crate::options::EditorOptions;
use crate::scene::{Editor, EditorCommand, Scene};

/// Actions the editor listens to.
pub const ACTIONS: [&str; 11] = [
    "select",
    "next",
    "previous",
    "delete",
    "duplicate",
    "spawn",
    "zoom_in",
    "zoom_out",
    "reset_view",
    "save",
    "quit",
];

/// World units per second at full stick deflection, before zoom.
const STICK_PAN_SPEED: f32 = 400.0;
/// Stick values below this are treated as rest.
const STICK_DEADZONE: f32 = 0.15;

/// Translate an action and its triggering event into an editor command.
pub fn command_for(action: &str, event: &RawEvent) -> Option<EditorCommand> {
    let command = match action {
        "select" => EditorCommand::Select(event_position(event)?),
        "spawn" => EditorCommand::Spawn(event_position(event).unwrap_or_default()),
        "next" => EditorCommand::Next,
        "previous" => EditorCommand::Previous,
        "delete" => EditorCommand::Delete,
        "duplicate" => EditorCommand::Duplicate,
        "zoom_in" => EditorCommand::Zoom(wheel_steps(event)),
        "zoom_out" => EditorCommand::Zoom(-wheel_steps(event)),
        "reset_view" => EditorCommand::ResetView,
        "save" => EditorCommand::Save,
        "quit" => EditorCommand::Quit,
        _ => return None,
    };
    Some(command)
}

fn event_position(event: &RawEvent) -> Option<Vec2> {
    match *event {
        RawEvent::MouseButtonPressed { position, .. }
        | RawEvent::MouseButtonReleased { position, .. }
        | RawEvent::TouchBegan { position, .. }
        | RawEvent::TouchMoved { position, .. }
        | RawEvent::TouchEnded { position, .. } => Some(position),
        _ => None,
    }
}

/// Notches carried by a wheel event; other triggers count as one.
fn wheel_steps(event: &RawEvent) -> f32 {
    match *event {
        RawEvent::MouseWheelScrolled { delta, .. } => delta.abs(),
        _ => 1.0,
    }
}

/// Editor application state.
pub struct EditorApp {
    editor: Editor,
    commands: Receiver<EditorCommand>,
    scene_path: PathBuf,
    title: String,
}

impl EditorApp {
    /// Open the scene at `scene_path` (empty if the file does not exist yet)
    /// and attach the editor's listeners.
    pub fn open(ctx: &mut AppContext, scene_path: PathBuf) -> anyhow::Result<Self> {
        let scene = Scene::load_or_default(&scene_path)?;

        let (sender, commands) = channel::unbounded();
        Self::connect_actions(ctx, &sender);
        info!(
            listeners = ctx.input.actions().listeners().len(),
            "Editor listeners attached"
        );

        Ok(Self {
            editor: Editor::new(scene),
            commands,
            scene_path,
            title: String::new(),
        })
    }

    fn connect_actions(ctx: &mut AppContext, sender: &Sender<EditorCommand>) {
        let actions = ctx.input.actions_mut();
        for class in DeviceClass::ALL {
            for action in ACTIONS {
                let sender = sender.clone();
                actions.connect(action, class, move |event| {
                    if let Some(command) = command_for(action, event) {
                        if let Err(e) = sender.send(command) {
                            warn!("Editor command dropped: {e}");
                        }
                    }
                });
            }
        }
    }

    fn run_command(&mut self, ctx: &mut AppContext, command: EditorCommand, viewport: Vec2) {
        match command {
            EditorCommand::Save => match self.editor.scene.save(&self.scene_path) {
                Ok(()) => self.editor.mark_saved(),
                Err(e) => error!("Save failed: {e:#}"),
            },
            EditorCommand::Quit => {
                if self.editor.is_dirty() {
                    warn!("Quitting with unsaved changes");
                }
                ctx.request_exit();
            }
            other => self.editor.apply(other, viewport),
        }
    }

    /// Pan with a middle-button drag or the first joystick's left stick.
    fn pan(&mut self, ctx: &AppContext, dt: f32) {
        let input = &ctx.input;
        if input.is_mouse_button_down(MouseButton::Middle) && input.mouse_moved() {
            self.editor.view.drag(input.cursor_delta());
        }

        let stick = Vec2::new(
            input.joystick_axis_position(0, JoystickAxis::X),
            input.joystick_axis_position(0, JoystickAxis::Y),
        );
        if stick.length() > STICK_DEADZONE {
            let zoom = self.editor.view.zoom;
            self.editor.view.center += stick * STICK_PAN_SPEED * dt / zoom;
        }
    }

    fn refresh_title(&mut self, ctx: &AppContext) {
        let selection = self
            .editor
            .selected()
            .and_then(|index| self.editor.scene.entities.get(index))
            .map_or("nothing selected", |entity| entity.name.as_str());
        let title = format!(
            "Ember Editor - {}{} - {} entities - {} - {:.0}%",
            self.scene_path.display(),
            if self.editor.is_dirty() { "*" } else { "" },
            self.editor.scene.entities.len(),
            selection,
            self.editor.view.zoom * 100.0,
        );
        if title != self.title {
            ctx.window.set_title(&title);
            self.title = title;
        }
    }
}

impl EmberApp for EditorApp {
    fn init(ctx: &mut AppContext) -> anyhow::Result<Self> {
        Self::open(ctx, EditorOptions::default().scene)
    }

    fn update(&mut self, ctx: &mut AppContext, dt: f32) {
        let size = ctx.window.inner_size();
        let viewport = Vec2::new(size.width as f32, size.height as f32);

        while let Ok(command) = self.commands.try_recv() {
            self.run_command(ctx, command, viewport);
        }

        self.pan(ctx, dt);
        self.refresh_title(ctx);
    }

    fn cleanup(&mut self, _ctx: &mut AppContext) {
        if self.editor.is_dirty() {
            warn!(path = %self.scene_path.display(), "Unsaved scene changes discarded");
        }
    }
}

#[cfg(test)]
mod tests {
    use ember_app::input::{KeyCode, Modifiers, MouseWheel};

    use super::*;

    #[test]
    fn pointer_actions_carry_position() {
        let click = RawEvent::MouseButtonPressed {
            button: MouseButton::Left,
            position: Vec2::new(3.0, 4.0),
        };
        assert_eq!(
            command_for("select", &click),
            Some(EditorCommand::Select(Vec2::new(3.0, 4.0)))
        );

        let tap = RawEvent::TouchBegan {
            finger: 0,
            position: Vec2::new(7.0, 8.0),
        };
        assert_eq!(
            command_for("spawn", &tap),
            Some(EditorCommand::Spawn(Vec2::new(7.0, 8.0)))
        );
    }

    #[test]
    fn select_needs_a_position() {
        let pad = RawEvent::JoystickButtonPressed {
            joystick: 0,
            button: 0,
        };
        assert_eq!(command_for("select", &pad), None);
        assert_eq!(
            command_for("spawn", &pad),
            Some(EditorCommand::Spawn(Vec2::ZERO))
        );
    }

    #[test]
    fn wheel_zoom_uses_delta() {
        let scroll = RawEvent::MouseWheelScrolled {
            wheel: MouseWheel::Vertical,
            delta: -2.0,
            position: Vec2::ZERO,
        };
        assert_eq!(command_for("zoom_out", &scroll), Some(EditorCommand::Zoom(-2.0)));

        let key = RawEvent::KeyPressed {
            key: KeyCode::Equal,
            modifiers: Modifiers::empty(),
        };
        assert_eq!(command_for("zoom_in", &key), Some(EditorCommand::Zoom(1.0)));
    }

    #[test]
    fn every_listened_action_has_a_command() {
        for action in ACTIONS {
            let event = RawEvent::MouseButtonPressed {
                button: MouseButton::Left,
                position: Vec2::ZERO,
            };
            assert!(command_for(action, &event).is_some(), "{action}");
        }
        assert_eq!(command_for("jump", &RawEvent::Closed), None);
    }
}
