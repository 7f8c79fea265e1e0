use alloc::rc::Rc;
use core::cell::RefCell;

use dom::events::MOUSE_DOWN;
use dom::{Document, Event, ListenerOptions, NodeId};
use log::{debug, trace, warn};

use super::{GestureListeners, is_primary_press, px, set_style};
use crate::config::ResizeHandleConfig;
use crate::context::{Behavior, KitContext};

#[derive(Debug, Default)]
struct ResizeGesture {
    start_pointer: (i32, i32),
    start_size: (i32, i32),
    listeners: Option<GestureListeners>,
}

fn create_handle(document: &Document, config: &ResizeHandleConfig) -> NodeId {
    let handle = document.create_element("div");
    if let Err(error) = document.add_class(handle, &config.class) {
        warn!(target: "domkit::resize", "cannot mark resize handle: {error}");
    }
    let size = px(i32::try_from(config.size_px).unwrap_or(i32::MAX));
    set_style(document, handle, "position", "absolute");
    set_style(document, handle, "width", &size);
    set_style(document, handle, "height", &size);
    set_style(document, handle, "right", "0");
    set_style(document, handle, "bottom", "0");
    set_style(document, handle, "cursor", &config.cursor);
    set_style(document, handle, "background", "transparent");
    set_style(document, handle, "z-index", &config.z_index.to_string());
    handle
}

/// Give `owner` a bottom-right corner handle that resizes it. Returns the
/// handle, or `None` when the owner is not an element or already has one.
pub(crate) fn enable_resize(context: &KitContext, owner: NodeId) -> Option<NodeId> {
    let document = &context.document;
    if !document.is_element(owner) {
        warn!(target: "domkit::resize", "resize needs an element, got {owner}");
        return None;
    }
    if context.is_bound(owner, Behavior::Resize) {
        debug!(target: "domkit::resize", "{owner} is already resizable");
        return None;
    }

    let handle = create_handle(document, &context.config.resize_handle);
    if let Err(error) = document.append_child(owner, handle) {
        warn!(target: "domkit::resize", "cannot attach resize handle to {owner}: {error}");
        if let Err(cleanup) = document.remove_subtree(handle) {
            trace!(target: "domkit::resize", "unattached handle {handle} not removed: {cleanup}");
        }
        return None;
    }
    if !context.claim(owner, Behavior::Resize) {
        return None;
    }
    set_style(document, owner, "position", "absolute");

    let gesture = Rc::new(RefCell::new(ResizeGesture::default()));
    document.add_event_listener(
        handle,
        MOUSE_DOWN,
        ListenerOptions::BUBBLE,
        move |document: &Document, event: &mut Event| {
            if !is_primary_press(event) {
                return;
            }
            event.prevent_default();
            event.stop_propagation();

            let stale = gesture.borrow_mut().listeners.take();
            if let Some(stale) = stale {
                stale.remove(document);
            }

            let size = document
                .computed_style(owner)
                .map_or((0, 0), |style| (style.width, style.height));
            {
                let mut state = gesture.borrow_mut();
                state.start_pointer = event.client_position();
                state.start_size = size;
            }

            let resizing = Rc::clone(&gesture);
            let on_move = move |doc: &Document, moved: &mut Event| {
                let ((start_x, start_y), (width, height)) = {
                    let state = resizing.borrow();
                    (state.start_pointer, state.start_size)
                };
                let (pointer_x, pointer_y) = moved.client_position();
                let new_width = width.saturating_add(pointer_x.saturating_sub(start_x));
                let new_height = height.saturating_add(pointer_y.saturating_sub(start_y));
                set_style(doc, owner, "width", &px(new_width));
                set_style(doc, owner, "height", &px(new_height));
            };
            let releasing = Rc::clone(&gesture);
            let on_release = move |doc: &Document, _released: &mut Event| {
                let open = releasing.borrow_mut().listeners.take();
                if let Some(open) = open {
                    open.remove(doc);
                }
                trace!(target: "domkit::resize", "resize of {owner} released");
            };
            let listeners = GestureListeners::register(document, on_move, on_release);
            gesture.borrow_mut().listeners = Some(listeners);
            trace!(target: "domkit::resize", "resize of {owner} started from {size:?}");
        },
    );
    debug!(target: "domkit::resize", "{owner} resizable through {handle}");
    Some(handle)
}
