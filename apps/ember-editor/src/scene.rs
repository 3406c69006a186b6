//! Editable 2D scene and the commands that change it.

use std::path::Path;

use anyhow::Context as _;
use glam::Vec2;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Radius given to newly spawned entities, in world units.
const DEFAULT_RADIUS: f32 = 16.0;
/// Zoom factor applied per wheel notch.
const ZOOM_STEP: f32 = 1.1;
const MIN_ZOOM: f32 = 0.1;
const MAX_ZOOM: f32 = 10.0;

/// A circle in the scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub name: String,
    pub position: Vec2,
    pub radius: f32,
}

impl Entity {
    fn contains(&self, point: Vec2) -> bool {
        self.position.distance_squared(point) <= self.radius * self.radius
    }
}

/// Scene file contents.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    #[serde(default)]
    pub entities: Vec<Entity>,
}

impl Scene {
    /// Load a scene, or start empty if the file does not exist yet.
    pub fn load_or_default(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            info!(path = %path.display(), "Starting new scene");
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read scene {}", path.display()))?;
        let scene: Self = ron::from_str(&contents)
            .with_context(|| format!("failed to parse scene {}", path.display()))?;
        info!(path = %path.display(), entities = scene.entities.len(), "Loaded scene");
        Ok(scene)
    }

    /// Write the scene as pretty RON.
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let contents = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::new())?;
        std::fs::write(path, contents)
            .with_context(|| format!("failed to write scene {}", path.display()))?;
        info!(path = %path.display(), entities = self.entities.len(), "Saved scene");
        Ok(())
    }
}

/// Pan and zoom of the editor view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct View {
    /// World position at the center of the viewport.
    pub center: Vec2,
    pub zoom: f32,
}

impl Default for View {
    fn default() -> Self {
        Self {
            center: Vec2::ZERO,
            zoom: 1.0,
        }
    }
}

impl View {
    /// Convert a window position to world coordinates.
    #[must_use]
    pub fn screen_to_world(&self, screen: Vec2, viewport: Vec2) -> Vec2 {
        (screen - viewport * 0.5) / self.zoom + self.center
    }

    /// Move the view so the world follows a cursor drag of `screen_delta`.
    pub fn drag(&mut self, screen_delta: Vec2) {
        self.center -= screen_delta / self.zoom;
    }

    /// Zoom by `steps` wheel notches; positive zooms in.
    pub fn zoom_by(&mut self, steps: f32) {
        self.zoom = (self.zoom * ZOOM_STEP.powf(steps)).clamp(MIN_ZOOM, MAX_ZOOM);
    }
}

/// Something the user asked the editor to do.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EditorCommand {
    /// Select the entity under a window position.
    Select(Vec2),
    /// Select the next entity.
    Next,
    /// Select the previous entity.
    Previous,
    /// Delete the selection.
    Delete,
    /// Copy the selection next to itself.
    Duplicate,
    /// Add an entity at a window position.
    Spawn(Vec2),
    /// Zoom by wheel notches.
    Zoom(f32),
    /// Recenter and reset zoom.
    ResetView,
    /// Write the scene file.
    Save,
    /// Leave the editor.
    Quit,
}

/// Scene plus view and selection state.
#[derive(Debug, Default)]
pub struct Editor {
    pub scene: Scene,
    pub view: View,
    selected: Option<usize>,
    dirty: bool,
    spawned: usize,
}

impl Editor {
    #[must_use]
    pub fn new(scene: Scene) -> Self {
        Self {
            spawned: scene.entities.len(),
            scene,
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// Returns `true` if the scene changed since the last save.
    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_saved(&mut self) {
        self.dirty = false;
    }

    /// Apply a scene or view command. `Save` and `Quit` are left to the caller.
    pub fn apply(&mut self, command: EditorCommand, viewport: Vec2) {
        debug!(?command, "Applying editor command");
        match command {
            EditorCommand::Select(screen) => {
                let point = self.view.screen_to_world(screen, viewport);
                // Topmost first: later entities draw over earlier ones.
                self.selected = self.scene.entities.iter().rposition(|e| e.contains(point));
            }
            EditorCommand::Next => self.cycle(true),
            EditorCommand::Previous => self.cycle(false),
            EditorCommand::Delete => {
                if let Some(index) = self.selected.take() {
                    let removed = self.scene.entities.remove(index);
                    info!(name = %removed.name, "Deleted entity");
                    self.dirty = true;
                }
            }
            EditorCommand::Duplicate => {
                if let Some(index) = self.selected {
                    let mut copy = self.scene.entities[index].clone();
                    copy.name = format!("{} copy", copy.name);
                    copy.position += Vec2::splat(copy.radius);
                    self.scene.entities.push(copy);
                    self.selected = Some(self.scene.entities.len() - 1);
                    self.dirty = true;
                }
            }
            EditorCommand::Spawn(screen) => {
                self.spawned += 1;
                self.scene.entities.push(Entity {
                    name: format!("entity_{}", self.spawned),
                    position: self.view.screen_to_world(screen, viewport),
                    radius: DEFAULT_RADIUS,
                });
                self.selected = Some(self.scene.entities.len() - 1);
                self.dirty = true;
            }
            EditorCommand::Zoom(steps) => self.view.zoom_by(steps),
            EditorCommand::ResetView => self.view = View::default(),
            EditorCommand::Save | EditorCommand::Quit => {}
        }
    }

    fn cycle(&mut self, forward: bool) {
        let count = self.scene.entities.len();
        if count == 0 {
            self.selected = None;
            return;
        }
        self.selected = Some(match (self.selected, forward) {
            (None, true) => 0,
            (None, false) => count - 1,
            (Some(index), true) => (index + 1) % count,
            (Some(index), false) => (index + count - 1) % count,
        });
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    const VIEWPORT: Vec2 = Vec2::new(800.0, 600.0);

    fn entity(name: &str, x: f32, y: f32) -> Entity {
        Entity {
            name: name.to_string(),
            position: Vec2::new(x, y),
            radius: 10.0,
        }
    }

    fn editor() -> Editor {
        Editor::new(Scene {
            entities: vec![entity("a", 0.0, 0.0), entity("b", 100.0, 0.0)],
        })
    }

    #[test]
    fn screen_center_maps_to_view_center() {
        let mut view = View::default();
        assert_eq!(view.screen_to_world(VIEWPORT * 0.5, VIEWPORT), Vec2::ZERO);

        view.zoom = 2.0;
        view.center = Vec2::new(10.0, 0.0);
        let world = view.screen_to_world(Vec2::new(500.0, 300.0), VIEWPORT);
        assert_relative_eq!(world.x, 60.0);
        assert_relative_eq!(world.y, 0.0);
    }

    #[test]
    fn drag_moves_world_with_cursor() {
        let mut view = View {
            center: Vec2::ZERO,
            zoom: 2.0,
        };
        view.drag(Vec2::new(20.0, -10.0));
        assert_relative_eq!(view.center.x, -10.0);
        assert_relative_eq!(view.center.y, 5.0);
    }

    #[test]
    fn zoom_is_clamped() {
        let mut view = View::default();
        view.zoom_by(1.0);
        assert_relative_eq!(view.zoom, 1.1);
        view.zoom_by(1000.0);
        assert_relative_eq!(view.zoom, MAX_ZOOM);
        view.zoom_by(-1000.0);
        assert_relative_eq!(view.zoom, MIN_ZOOM);
    }

    #[test]
    fn select_hits_entity_under_cursor() {
        let mut editor = editor();
        editor.apply(EditorCommand::Select(Vec2::new(505.0, 300.0)), VIEWPORT);
        assert_eq!(editor.selected(), Some(1));

        editor.apply(EditorCommand::Select(Vec2::new(0.0, 0.0)), VIEWPORT);
        assert_eq!(editor.selected(), None);
    }

    #[test]
    fn cycling_wraps() {
        let mut editor = editor();
        editor.apply(EditorCommand::Previous, VIEWPORT);
        assert_eq!(editor.selected(), Some(1));
        editor.apply(EditorCommand::Next, VIEWPORT);
        assert_eq!(editor.selected(), Some(0));

        let mut empty = Editor::default();
        empty.apply(EditorCommand::Next, VIEWPORT);
        assert_eq!(empty.selected(), None);
    }

    #[test]
    fn delete_and_duplicate_mark_dirty() {
        let mut editor = editor();
        editor.apply(EditorCommand::Delete, VIEWPORT);
        assert!(!editor.is_dirty());

        editor.apply(EditorCommand::Next, VIEWPORT);
        editor.apply(EditorCommand::Duplicate, VIEWPORT);
        assert_eq!(editor.scene.entities.len(), 3);
        assert_eq!(editor.scene.entities[2].name, "a copy");
        assert_eq!(editor.selected(), Some(2));
        assert!(editor.is_dirty());

        editor.apply(EditorCommand::Delete, VIEWPORT);
        assert_eq!(editor.scene.entities.len(), 2);
        assert_eq!(editor.selected(), None);

        editor.mark_saved();
        assert!(!editor.is_dirty());
    }

    #[test]
    fn spawn_places_entity_in_world() {
        let mut editor = editor();
        editor.view.center = Vec2::new(50.0, 50.0);
        editor.apply(EditorCommand::Spawn(VIEWPORT * 0.5), VIEWPORT);
        let spawned = &editor.scene.entities[2];
        assert_eq!(spawned.name, "entity_3");
        assert_eq!(spawned.position, Vec2::new(50.0, 50.0));
        assert_eq!(editor.selected(), Some(2));
    }

    #[test]
    fn scene_file_round_trip() {
        let dir = std::env::temp_dir().join(format!("ember_scene_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("scene.ron");

        let missing = Scene::load_or_default(&path).unwrap();
        assert!(missing.entities.is_empty());

        let scene = editor().scene;
        scene.save(&path).unwrap();
        assert_eq!(Scene::load_or_default(&path).unwrap(), scene);

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
