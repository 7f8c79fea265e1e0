//! DOM-style event dispatch.
//!
//! Listeners are registered per node and event type. Dispatch walks the
//! target's ancestor path: capture listeners from the document down, then the
//! target's own listeners, then bubble listeners back up. The listener list of
//! each node is snapshotted before it runs, and no tree borrow is held while a
//! callback executes.

use alloc::rc::Rc;

use indextree::NodeId;
use log::{trace, warn};

use crate::Document;

pub const MOUSE_DOWN: &str = "mousedown";
pub const MOUSE_MOVE: &str = "mousemove";
pub const MOUSE_UP: &str = "mouseup";
pub const CLICK: &str = "click";

/// Mouse button, numbered as `MouseEvent.button`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PointerButton {
    #[default]
    Primary,
    Auxiliary,
    Secondary,
    Other(u8),
}

impl PointerButton {
    pub const fn from_code(code: u8) -> Self {
        match code {
            0 => Self::Primary,
            1 => Self::Auxiliary,
            2 => Self::Secondary,
            other => Self::Other(other),
        }
    }
}

/// Pointer payload in client (viewport) pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PointerData {
    pub client_x: i32,
    pub client_y: i32,
    pub button: PointerButton,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EventPhase {
    #[default]
    None,
    Capturing,
    AtTarget,
    Bubbling,
}

#[derive(Clone, Debug)]
pub struct Event {
    event_type: String,
    bubbles: bool,
    pointer: Option<PointerData>,
    target: Option<NodeId>,
    current_target: Option<NodeId>,
    phase: EventPhase,
    default_prevented: bool,
    propagation_stopped: bool,
    immediate_propagation_stopped: bool,
}

impl Event {
    /// A bubbling event without payload.
    pub fn new(event_type: &str) -> Self {
        Self {
            event_type: event_type.to_owned(),
            bubbles: true,
            pointer: None,
            target: None,
            current_target: None,
            phase: EventPhase::None,
            default_prevented: false,
            propagation_stopped: false,
            immediate_propagation_stopped: false,
        }
    }

    /// A bubbling pointer event at client coordinates `(x, y)`.
    pub fn pointer(event_type: &str, client_x: i32, client_y: i32, button: PointerButton) -> Self {
        let mut event = Self::new(event_type);
        event.pointer = Some(PointerData {
            client_x,
            client_y,
            button,
        });
        event
    }

    #[must_use]
    pub const fn with_bubbles(mut self, bubbles: bool) -> Self {
        self.bubbles = bubbles;
        self
    }

    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    pub const fn bubbles(&self) -> bool {
        self.bubbles
    }

    pub const fn pointer_data(&self) -> Option<PointerData> {
        self.pointer
    }

    /// Client coordinates, `(0, 0)` for events without a pointer payload.
    pub fn client_position(&self) -> (i32, i32) {
        self.pointer
            .map_or((0, 0), |data| (data.client_x, data.client_y))
    }

    pub fn button(&self) -> Option<PointerButton> {
        self.pointer.map(|data| data.button)
    }

    pub const fn target(&self) -> Option<NodeId> {
        self.target
    }

    pub const fn current_target(&self) -> Option<NodeId> {
        self.current_target
    }

    pub const fn phase(&self) -> EventPhase {
        self.phase
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub const fn default_prevented(&self) -> bool {
        self.default_prevented
    }

    /// Finish the current node, then stop.
    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    /// Stop before the next listener, even on the current node.
    pub fn stop_immediate_propagation(&mut self) {
        self.propagation_stopped = true;
        self.immediate_propagation_stopped = true;
    }

    pub const fn propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }
}

pub type ListenerCallback = Rc<dyn Fn(&Document, &mut Event)>;

/// Handle returned at registration; needed to unregister.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ListenerOptions {
    /// Run during the capture phase instead of the bubble phase.
    pub capture: bool,
}

impl ListenerOptions {
    pub const CAPTURE: Self = Self { capture: true };
    pub const BUBBLE: Self = Self { capture: false };
}

pub(crate) struct Listener {
    id: ListenerId,
    event_type: String,
    capture: bool,
    callback: ListenerCallback,
}

impl Document {
    /// Register `callback` for `event_type` events reaching `node`.
    pub fn add_event_listener<F>(
        &self,
        node: NodeId,
        event_type: &str,
        options: ListenerOptions,
        callback: F,
    ) -> ListenerId
    where
        F: Fn(&Self, &mut Event) + 'static,
    {
        let mut state = self.state_mut();
        let id = ListenerId(state.next_listener_id);
        state.next_listener_id = state.next_listener_id.wrapping_add(1);
        if state.node(node).is_none() {
            warn!(target: "dom::events", "{node} is not part of this document; {event_type} listener dropped");
            return id;
        }
        state.listeners.entry(node).or_default().push(Listener {
            id,
            event_type: event_type.to_owned(),
            capture: options.capture,
            callback: Rc::new(callback),
        });
        trace!(target: "dom::events", "listener {id:?} added for {event_type} on {node}");
        id
    }

    /// Unregister a listener. Returns false when it was not registered for
    /// this node and event type.
    pub fn remove_event_listener(&self, node: NodeId, event_type: &str, id: ListenerId) -> bool {
        let mut state = self.state_mut();
        let Some(list) = state.listeners.get_mut(&node) else {
            return false;
        };
        let before = list.len();
        list.retain(|listener| !(listener.id == id && listener.event_type == event_type));
        let removed = list.len() != before;
        if list.is_empty() {
            state.listeners.remove(&node);
        }
        if removed {
            trace!(target: "dom::events", "listener {id:?} removed for {event_type} on {node}");
        }
        removed
    }

    /// Listeners registered on `node` for `event_type`, both phases.
    pub fn listener_count(&self, node: NodeId, event_type: &str) -> usize {
        self.state().listeners.get(&node).map_or(0, |list| {
            list.iter()
                .filter(|listener| listener.event_type == event_type)
                .count()
        })
    }

    /// Listeners registered anywhere in this document for `event_type`.
    pub fn total_listener_count(&self, event_type: &str) -> usize {
        self.state()
            .listeners
            .values()
            .flatten()
            .filter(|listener| listener.event_type == event_type)
            .count()
    }

    fn is_registered(&self, node: NodeId, id: ListenerId) -> bool {
        self.state()
            .listeners
            .get(&node)
            .is_some_and(|list| list.iter().any(|listener| listener.id == id))
    }

    fn snapshot(&self, node: NodeId, event_type: &str, capture: bool) -> Vec<(ListenerId, ListenerCallback)> {
        self.state().listeners.get(&node).map_or_else(Vec::new, |list| {
            list.iter()
                .filter(|listener| listener.capture == capture && listener.event_type == event_type)
                .map(|listener| (listener.id, Rc::clone(&listener.callback)))
                .collect()
        })
    }

    fn invoke(&self, node: NodeId, event: &mut Event, phase: EventPhase, capture: bool) {
        event.current_target = Some(node);
        event.phase = phase;
        let event_type = event.event_type.clone();
        for (id, callback) in self.snapshot(node, &event_type, capture) {
            if event.immediate_propagation_stopped {
                return;
            }
            // Removed by an earlier listener of this dispatch.
            if !self.is_registered(node, id) {
                continue;
            }
            callback(self, event);
        }
    }

    /// Dispatch `event` at `target`. Returns false when a listener called
    /// `prevent_default`.
    pub fn dispatch_event(&self, target: NodeId, event: &mut Event) -> bool {
        let path: Vec<NodeId> = {
            let state = self.state();
            if state.node(target).is_none() {
                return true;
            }
            target.ancestors(&state.arena).collect()
        };
        event.target = Some(target);
        event.propagation_stopped = false;
        event.immediate_propagation_stopped = false;

        let ancestors = path.get(1..).unwrap_or_default();
        for &node in ancestors.iter().rev() {
            self.invoke(node, event, EventPhase::Capturing, true);
            if event.propagation_stopped {
                return self.finish(event);
            }
        }

        self.invoke(target, event, EventPhase::AtTarget, true);
        if !event.immediate_propagation_stopped {
            self.invoke(target, event, EventPhase::AtTarget, false);
        }
        if event.propagation_stopped || !event.bubbles {
            return self.finish(event);
        }

        for &node in ancestors {
            self.invoke(node, event, EventPhase::Bubbling, false);
            if event.propagation_stopped {
                break;
            }
        }
        self.finish(event)
    }

    fn finish(&self, event: &mut Event) -> bool {
        event.current_target = None;
        event.phase = EventPhase::None;
        trace!(
            target: "dom::events",
            "dispatched {} at {:?} (default prevented: {})",
            event.event_type,
            event.target,
            event.default_prevented
        );
        !event.default_prevented
    }

    /// Build and dispatch a pointer event; returns it for inspection.
    pub fn dispatch_pointer(
        &self,
        target: NodeId,
        event_type: &str,
        client_x: i32,
        client_y: i32,
        button: PointerButton,
    ) -> Event {
        let mut event = Event::pointer(event_type, client_x, client_y, button);
        self.dispatch_event(target, &mut event);
        event
    }
}
