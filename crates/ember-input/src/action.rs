//! Action dispatch: raw events in, listener invocations out.

use tracing::trace;
use winit::keyboard::KeyCode;

use crate::config::BindingConfig;
use crate::device::DeviceClass;
use crate::error::Result;
use crate::event::{EventKind, RawEvent};
use crate::mapper::{Mapping, WheelDirection};
use crate::modifiers::Modifiers;
use crate::mouse::MouseButton;
use crate::registry::{CallbackRegistry, ListenerId};
use crate::table::MappingTable;

/// Translates raw events into named actions and invokes their listeners.
///
/// Every event runs through the mapping table's mappers in their fixed order;
/// each action a mapper reports is dispatched to the listeners registered for
/// (action, that mapper's device class), in registration order. Events that
/// match nothing and actions nobody listens to are silently dropped.
///
/// Listeners cannot reach the mapper while it dispatches, so the table and
/// registry never change mid-dispatch.
#[derive(Debug, Default)]
pub struct ActionMapper {
    table: MappingTable,
    listeners: CallbackRegistry,
}

impl ActionMapper {
    /// Create a mapper with no bindings and no listeners.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mapper over a pre-built table.
    #[must_use]
    pub fn with_table(table: MappingTable) -> Self {
        Self {
            table,
            listeners: CallbackRegistry::new(),
        }
    }

    /// Create a mapper from a bindings file.
    pub fn from_config(config: &BindingConfig) -> Result<Self> {
        MappingTable::from_config(config).map(Self::with_table)
    }

    /// Start a fluent builder.
    #[must_use]
    pub fn builder() -> ActionMapperBuilder {
        ActionMapperBuilder::new()
    }

    /// The mapping table.
    #[must_use]
    pub const fn table(&self) -> &MappingTable {
        &self.table
    }

    /// Mutable access to the mapping table for (re)binding.
    pub fn table_mut(&mut self) -> &mut MappingTable {
        &mut self.table
    }

    /// The listener registry.
    #[must_use]
    pub const fn listeners(&self) -> &CallbackRegistry {
        &self.listeners
    }

    /// Attach `callback` to (`action`, `class`).
    pub fn connect(
        &mut self,
        action: impl Into<String>,
        class: DeviceClass,
        callback: impl FnMut(&RawEvent) + 'static,
    ) -> ListenerId {
        self.listeners.connect(action, class, callback)
    }

    /// Detach a listener. Returns `false` if it was not attached.
    pub fn disconnect(&mut self, id: ListenerId) -> bool {
        self.listeners.disconnect(id)
    }

    /// Detach every listener on (`action`, `class`).
    pub fn disconnect_all(&mut self, action: &str, class: DeviceClass) -> usize {
        self.listeners.disconnect_all(action, class)
    }

    /// Number of listeners on (`action`, `class`).
    #[must_use]
    pub fn listener_count(&self, action: &str, class: DeviceClass) -> usize {
        self.listeners.listener_count(action, class)
    }

    /// Map `event` without invoking anything.
    #[must_use]
    pub fn resolve(&self, event: &RawEvent) -> Vec<Mapping<'_>> {
        self.table.resolve(event)
    }

    /// Dispatch `event`. Returns the number of listener invocations.
    pub fn handle_event(&mut self, event: &RawEvent) -> usize {
        let mut invoked = 0;
        for mapper in self.table.mappers() {
            let mapping = mapper.map(event);
            for action in mapping.actions {
                let ran = self.listeners.emit(action, mapping.class, event);
                trace!(action, class = %mapping.class, listeners = ran, "Action dispatched");
                invoked += ran;
            }
        }
        invoked
    }
}

/// Builder for an [`ActionMapper`] with a fluent API.
#[derive(Debug, Default)]
pub struct ActionMapperBuilder {
    table: MappingTable,
}

impl ActionMapperBuilder {
    /// Create a new builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `action` to a key press.
    #[must_use]
    pub fn bind_key(mut self, action: impl Into<String>, key: KeyCode) -> Self {
        self.table.bind_key(action, key);
        self
    }

    /// Bind `action` to a key press with required modifiers.
    #[must_use]
    pub fn bind_key_with_modifiers(
        mut self,
        action: impl Into<String>,
        key: KeyCode,
        modifiers: Modifiers,
    ) -> Self {
        self.table.bind_key_with_modifiers(action, key, modifiers);
        self
    }

    /// Bind `action` to several key presses.
    #[must_use]
    pub fn bind_keys(
        mut self,
        action: impl Into<String>,
        keys: impl IntoIterator<Item = KeyCode>,
    ) -> Self {
        let action = action.into();
        for key in keys {
            self.table.bind_key(action.clone(), key);
        }
        self
    }

    /// Bind `action` to a mouse button press.
    #[must_use]
    pub fn bind_mouse_button(mut self, action: impl Into<String>, button: MouseButton) -> Self {
        self.table.bind_mouse_button(action, button);
        self
    }

    /// Bind `action` to a wheel direction.
    #[must_use]
    pub fn bind_wheel(mut self, action: impl Into<String>, direction: WheelDirection) -> Self {
        self.table.bind_wheel(action, direction);
        self
    }

    /// Bind `action` to a finger touching down.
    #[must_use]
    pub fn bind_touch(mut self, action: impl Into<String>, finger: u64) -> Self {
        self.table.bind_touch(action, finger);
        self
    }

    /// Bind `action` to a button press on any joystick.
    #[must_use]
    pub fn bind_joystick_button(mut self, action: impl Into<String>, button: u32) -> Self {
        self.table.bind_joystick_button(action, button);
        self
    }

    /// Bind `action` to every event of `kind`.
    #[must_use]
    pub fn bind_event(mut self, action: impl Into<String>, kind: EventKind) -> Self {
        self.table.bind_event(action, kind);
        self
    }

    /// Add the entries of a bindings file.
    pub fn with_config(mut self, config: &BindingConfig) -> Result<Self> {
        self.table.apply_config(config)?;
        Ok(self)
    }

    /// Build the action mapper.
    #[must_use]
    pub fn build(self) -> ActionMapper {
        ActionMapper::with_table(self.table)
    }
}
