//! Pointer behaviors attached to elements.
//!
//! Each behavior registers ordinary listeners on the document tree. A
//! gesture (drag or resize) starts with a press on its handle, registers
//! move and release listeners on the document node for its duration, and
//! removes them again on release.

pub(crate) mod drag;
pub(crate) mod front;
pub(crate) mod resize;

use dom::events::{MOUSE_MOVE, MOUSE_UP};
use dom::{Document, Event, ListenerId, ListenerOptions, NodeId, PointerButton};
use log::warn;

/// Document-level listeners of one open gesture.
#[derive(Clone, Copy, Debug)]
pub(crate) struct GestureListeners {
    root: NodeId,
    on_move: ListenerId,
    on_release: ListenerId,
}

impl GestureListeners {
    pub(crate) fn register<M, R>(document: &Document, on_move: M, on_release: R) -> Self
    where
        M: Fn(&Document, &mut Event) + 'static,
        R: Fn(&Document, &mut Event) + 'static,
    {
        let root = document.root();
        Self {
            root,
            on_move: document.add_event_listener(root, MOUSE_MOVE, ListenerOptions::BUBBLE, on_move),
            on_release: document.add_event_listener(root, MOUSE_UP, ListenerOptions::BUBBLE, on_release),
        }
    }

    pub(crate) fn remove(self, document: &Document) {
        document.remove_event_listener(self.root, MOUSE_MOVE, self.on_move);
        document.remove_event_listener(self.root, MOUSE_UP, self.on_release);
    }
}

pub(crate) fn is_primary_press(event: &Event) -> bool {
    event.button() == Some(PointerButton::Primary)
}

pub(crate) fn px(value: i32) -> String {
    format!("{value}px")
}

/// Style write from inside a listener, where there is no caller to
/// report a failure to.
pub(crate) fn set_style(document: &Document, node: NodeId, name: &str, value: &str) {
    if let Err(error) = document.set_style_property(node, name, value) {
        warn!(target: "domkit::behavior", "cannot set {name} on {node}: {error}");
    }
}
