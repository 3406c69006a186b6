//! Listener registry keyed by (action, device class).

use std::fmt;

use hashbrown::{Equivalent, HashMap};
use tracing::debug;

use crate::device::DeviceClass;
use crate::event::RawEvent;

/// Handle returned when a listener is attached, used to detach it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

/// Owned registry key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ActionKey {
    pub action: String,
    pub class: DeviceClass,
}

impl ActionKey {
    #[must_use]
    pub fn new(action: impl Into<String>, class: DeviceClass) -> Self {
        Self {
            action: action.into(),
            class,
        }
    }
}

/// Borrowed form of [`ActionKey`] for allocation-free lookups.
///
/// Field order and types hash identically to [`ActionKey`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct ActionKeyRef<'a> {
    action: &'a str,
    class: DeviceClass,
}

impl Equivalent<ActionKey> for ActionKeyRef<'_> {
    fn equivalent(&self, key: &ActionKey) -> bool {
        self.class == key.class && self.action == key.action
    }
}

/// A callback invoked with the event that triggered its action.
pub type Callback = Box<dyn FnMut(&RawEvent)>;

struct Listener {
    id: ListenerId,
    callback: Callback,
}

/// Multicast callback lists keyed by (action, device class).
///
/// Listeners on one key run in registration order.
#[derive(Default)]
pub struct CallbackRegistry {
    listeners: HashMap<ActionKey, Vec<Listener>>,
    keys: HashMap<ListenerId, ActionKey>,
    next_id: u64,
}

impl CallbackRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a listener to (`action`, `class`).
    pub fn connect(
        &mut self,
        action: impl Into<String>,
        class: DeviceClass,
        callback: impl FnMut(&RawEvent) + 'static,
    ) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;

        let key = ActionKey::new(action, class);
        debug!(action = %key.action, %class, ?id, "Listener attached");
        self.listeners.entry(key.clone()).or_default().push(Listener {
            id,
            callback: Box::new(callback),
        });
        self.keys.insert(id, key);
        id
    }

    /// Detach a listener. Returns `false` if it was not attached.
    pub fn disconnect(&mut self, id: ListenerId) -> bool {
        let Some(key) = self.keys.remove(&id) else {
            return false;
        };
        if let Some(list) = self.listeners.get_mut(&key) {
            list.retain(|l| l.id != id);
            if list.is_empty() {
                self.listeners.remove(&key);
            }
        }
        debug!(action = %key.action, class = %key.class, ?id, "Listener detached");
        true
    }

    /// Detach every listener on (`action`, `class`). Returns how many were removed.
    pub fn disconnect_all(&mut self, action: &str, class: DeviceClass) -> usize {
        let Some(list) = self.listeners.remove(&ActionKeyRef { action, class }) else {
            return 0;
        };
        for listener in &list {
            self.keys.remove(&listener.id);
        }
        list.len()
    }

    /// Number of listeners on (`action`, `class`).
    #[must_use]
    pub fn listener_count(&self, action: &str, class: DeviceClass) -> usize {
        self.listeners
            .get(&ActionKeyRef { action, class })
            .map_or(0, Vec::len)
    }

    /// Total number of attached listeners.
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns `true` if no listener is attached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Invoke every listener on (`action`, `class`) with `event`.
    /// Returns how many ran; a key without listeners is a no-op.
    pub fn emit(&mut self, action: &str, class: DeviceClass, event: &RawEvent) -> usize {
        let Some(list) = self.listeners.get_mut(&ActionKeyRef { action, class }) else {
            return 0;
        };
        for listener in list.iter_mut() {
            (listener.callback)(event);
        }
        list.len()
    }

    /// Detach everything.
    pub fn clear(&mut self) {
        self.listeners.clear();
        self.keys.clear();
    }
}

impl fmt::Debug for CallbackRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<_> = self
            .listeners
            .iter()
            .map(|(key, list)| (key.action.as_str(), key.class, list.len()))
            .collect();
        keys.sort_unstable();
        f.debug_struct("CallbackRegistry")
            .field("listeners", &keys)
            .finish_non_exhaustive()
    }
}
