use alloc::rc::Rc;
use core::cell::RefCell;

use dom::events::MOUSE_DOWN;
use dom::{Document, Event, ListenerOptions, NodeId};
use log::{debug, trace, warn};

use super::{GestureListeners, is_primary_press, px, set_style};
use crate::context::{Behavior, KitContext};

#[derive(Debug, Default)]
struct DragGesture {
    /// Pointer position relative to the owner's top-left at press time.
    offset: (i32, i32),
    listeners: Option<GestureListeners>,
}

/// True when `target` carries `class` or sits inside an element that does,
/// looking no further up than `boundary`.
fn within_class(document: &Document, target: NodeId, boundary: NodeId, class: &str) -> bool {
    let mut current = Some(target);
    while let Some(node) = current {
        if document.has_class(node, class) {
            return true;
        }
        if node == boundary {
            break;
        }
        current = document.parent_element(node);
    }
    false
}

fn resolve_handle(document: &Document, owner: NodeId, selector: Option<&str>) -> Option<NodeId> {
    let Some(selector) = selector else {
        return Some(owner);
    };
    match document.query_selector(owner, selector) {
        Ok(Some(handle)) => Some(handle),
        Ok(None) => {
            warn!(target: "domkit::drag", "selector {selector:?} not found inside element {owner}");
            None
        }
        Err(error) => {
            warn!(target: "domkit::drag", "invalid drag handle selector {selector:?}: {error}");
            None
        }
    }
}

/// Make `owner` draggable by a press on `handle_selector` (the owner itself
/// when `None`). Returns false when nothing was attached: the owner is
/// already draggable, is not an element, or the handle does not resolve.
pub(crate) fn enable_drag(context: &KitContext, owner: NodeId, handle_selector: Option<&str>) -> bool {
    let document = &context.document;
    if !document.is_element(owner) {
        warn!(target: "domkit::drag", "drag needs an element, got {owner}");
        return false;
    }
    if context.is_bound(owner, Behavior::Drag) {
        debug!(target: "domkit::drag", "{owner} is already draggable");
        return false;
    }
    let Some(handle) = resolve_handle(document, owner, handle_selector) else {
        return false;
    };
    if !context.claim(owner, Behavior::Drag) {
        return false;
    }

    set_style(document, owner, "position", "absolute");
    set_style(document, owner, "user-select", "none");
    set_style(document, owner, "transition", &context.config.drag.transition);

    let gesture = Rc::new(RefCell::new(DragGesture::default()));
    let allocator = Rc::clone(&context.allocator);
    let resize_class = context.config.resize_handle.class.clone();
    let lifted_shadow = context.config.drag.lifted_shadow.clone();

    document.add_event_listener(
        handle,
        MOUSE_DOWN,
        ListenerOptions::BUBBLE,
        move |document: &Document, event: &mut Event| {
            if !is_primary_press(event) {
                return;
            }
            if event
                .target()
                .is_some_and(|target| within_class(document, target, owner, &resize_class))
            {
                return;
            }
            event.prevent_default();

            let stale = gesture.borrow_mut().listeners.take();
            if let Some(stale) = stale {
                stale.remove(document);
            }

            let origin = document.bounding_client_rect(owner);
            let (x, y) = event.client_position();
            gesture.borrow_mut().offset = (x.saturating_sub(origin.left), y.saturating_sub(origin.top));

            set_style(document, owner, "z-index", &allocator.next_z_index().to_string());
            set_style(document, owner, "box-shadow", &lifted_shadow);

            let moving = Rc::clone(&gesture);
            let on_move = move |doc: &Document, moved: &mut Event| {
                let (offset_x, offset_y) = moving.borrow().offset;
                let (pointer_x, pointer_y) = moved.client_position();
                set_style(doc, owner, "left", &px(pointer_x.saturating_sub(offset_x)));
                set_style(doc, owner, "top", &px(pointer_y.saturating_sub(offset_y)));
            };
            let releasing = Rc::clone(&gesture);
            let on_release = move |doc: &Document, _released: &mut Event| {
                let open = releasing.borrow_mut().listeners.take();
                if let Some(open) = open {
                    open.remove(doc);
                }
                set_style(doc, owner, "box-shadow", "none");
                trace!(target: "domkit::drag", "drag of {owner} released");
            };
            let listeners = GestureListeners::register(document, on_move, on_release);
            gesture.borrow_mut().listeners = Some(listeners);
            trace!(target: "domkit::drag", "drag of {owner} started at ({x}, {y})");
        },
    );
    debug!(target: "domkit::drag", "{owner} draggable by {handle}");
    true
}
