use alloc::rc::Rc;

use dom::events::MOUSE_DOWN;
use dom::{Document, Event, ListenerOptions, NodeId};
use log::{trace, warn};

use super::{is_primary_press, set_style};
use crate::context::{Behavior, KitContext};

/// Raise `owner` above everything else whenever it is pressed.
///
/// Runs in the capture phase so a press on a descendant that stops
/// propagation (the resize handle) still brings the owner forward.
pub(crate) fn enable_front_bring(context: &KitContext, owner: NodeId) -> bool {
    let document = &context.document;
    if !document.is_element(owner) {
        warn!(target: "domkit::front", "front-bring needs an element, got {owner}");
        return false;
    }
    if !context.claim(owner, Behavior::FrontBring) {
        return false;
    }
    let allocator = Rc::clone(&context.allocator);
    document.add_event_listener(
        owner,
        MOUSE_DOWN,
        ListenerOptions::CAPTURE,
        move |document: &Document, event: &mut Event| {
            if !is_primary_press(event) {
                return;
            }
            let z_index = allocator.next_z_index();
            set_style(document, owner, "z-index", &z_index.to_string());
            trace!(target: "domkit::front", "{owner} raised to {z_index}");
        },
    );
    true
}
