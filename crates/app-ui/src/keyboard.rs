//! Keyboard bindings for the open viewer
//!
//! Arrow keys step through the group and Escape closes. The global listener
//! exists only while a viewer is interactive; [`KeyBindings::sync`] registers
//! and unregisters it as the viewer opens and closes.

use serde::{Deserialize, Serialize};

/// Keys the viewer reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    /// Left arrow
    ArrowLeft,
    /// Right arrow
    ArrowRight,
    /// Escape
    Escape,
    /// Anything else
    Other,
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value
    pub fn from_dom(key: &str) -> Self {
        match key {
            "ArrowLeft" | "Left" => Key::ArrowLeft,
            "ArrowRight" | "Right" => Key::ArrowRight,
            "Escape" | "Esc" => Key::Escape,
            _ => Key::Other,
        }
    }
}

/// Action requested from the navigator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GalleryCommand {
    /// Previous item
    Previous,
    /// Next item
    Next,
    /// Close the viewer
    Close,
}

/// Handle of a registered listener
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// Host registry of global key listeners
#[cfg_attr(test, mockall::automock)]
pub trait KeyboardHost {
    /// Register the viewer's key listener
    fn add_listener(&mut self) -> ListenerId;

    /// Unregister a listener
    fn remove_listener(&mut self, id: ListenerId);
}

/// Tracks the viewer's listener registration
#[derive(Debug, Clone, Default)]
pub struct KeyBindings {
    listener: Option<ListenerId>,
}

impl KeyBindings {
    /// Create unbound key bindings
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a listener is registered
    pub fn is_bound(&self) -> bool {
        self.listener.is_some()
    }

    /// Register or unregister the listener to match `active`
    pub fn sync<K: KeyboardHost + ?Sized>(&mut self, host: &mut K, active: bool) {
        match (active, self.listener) {
            (true, None) => {
                let id = host.add_listener();
                tracing::trace!(listener = id.0, "bound viewer keys");
                self.listener = Some(id);
            }
            (false, Some(_)) => self.release(host),
            _ => {}
        }
    }

    /// Unregister the listener if one is registered
    pub fn release<K: KeyboardHost + ?Sized>(&mut self, host: &mut K) {
        if let Some(id) = self.listener.take() {
            tracing::trace!(listener = id.0, "released viewer keys");
            host.remove_listener(id);
        }
    }

    /// Command for a key press, `None` when unbound or unmapped
    pub fn dispatch(&self, key: Key) -> Option<GalleryCommand> {
        self.listener?;
        match key {
            Key::ArrowLeft => Some(GalleryCommand::Previous),
            Key::ArrowRight => Some(GalleryCommand::Next),
            Key::Escape => Some(GalleryCommand::Close),
            Key::Other => None,
        }
    }
}
