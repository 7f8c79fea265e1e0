//! Chainable facade over one element of a kit's document.
//!
//! Mutators take `&self` and return `&Self`, so calls can be chained.
//! A mutation the tree rejects (a cyclic insertion, a missing parent, a
//! target selector that matches nothing) is logged and leaves the facade
//! unchanged; it never panics and never interrupts the chain.

use alloc::rc::Rc;
use core::fmt;

use dom::{Document, DomError, Event, ListenerId, ListenerOptions, NodeId};
use log::warn;

use crate::behavior::drag::enable_drag;
use crate::behavior::resize::enable_resize;
use crate::context::{Behavior, KitContext};
use crate::styler::{StyleConfig, apply_styles};

/// A node to insert, or to insert next to.
#[derive(Clone, Copy, Debug)]
pub enum NodeRef<'node> {
    Element(&'node Element),
    Node(NodeId),
}

impl<'node> From<&'node Element> for NodeRef<'node> {
    fn from(element: &'node Element) -> Self {
        Self::Element(element)
    }
}

impl From<NodeId> for NodeRef<'_> {
    fn from(node: NodeId) -> Self {
        Self::Node(node)
    }
}

/// Where `append_to` and `prepend_to` put an element.
#[derive(Clone, Copy, Debug)]
pub enum Target<'node> {
    Element(&'node Element),
    Node(NodeId),
    /// First element of the document matching the selector.
    Selector(&'node str),
}

impl<'node> From<&'node Element> for Target<'node> {
    fn from(element: &'node Element) -> Self {
        Self::Element(element)
    }
}

impl From<NodeId> for Target<'_> {
    fn from(node: NodeId) -> Self {
        Self::Node(node)
    }
}

impl<'node> From<&'node str> for Target<'node> {
    fn from(selector: &'node str) -> Self {
        Self::Selector(selector)
    }
}

#[derive(Clone)]
pub struct Element {
    node: NodeId,
    context: Rc<KitContext>,
}

impl Element {
    pub(crate) fn new(node: NodeId, context: Rc<KitContext>) -> Self {
        Self { node, context }
    }

    fn wrap(&self, node: NodeId) -> Self {
        Self::new(node, Rc::clone(&self.context))
    }

    fn document(&self) -> &Document {
        &self.context.document
    }

    fn report(&self, operation: &str, result: Result<(), DomError>) -> &Self {
        if let Err(error) = result {
            warn!(target: "domkit::element", "{operation} on {} failed: {error}", self.node);
        }
        self
    }

    /// Node of `reference`, if it lives in this element's document.
    fn resolve(&self, reference: NodeRef<'_>) -> Option<NodeId> {
        match reference {
            NodeRef::Node(node) => Some(node),
            NodeRef::Element(element) if element.document().same_document(self.document()) => {
                Some(element.node)
            }
            NodeRef::Element(element) => {
                warn!(
                    target: "domkit::element",
                    "{} belongs to another document than {}",
                    element.node,
                    self.node
                );
                None
            }
        }
    }

    fn resolve_target(&self, target: Target<'_>) -> Option<NodeId> {
        match target {
            Target::Element(element) => self.resolve(NodeRef::Element(element)),
            Target::Node(node) => Some(node),
            Target::Selector(selector) => {
                let document = self.document();
                match document.query_selector(document.root(), selector) {
                    Ok(Some(node)) => Some(node),
                    Ok(None) => {
                        warn!(target: "domkit::element", "no element matches {selector:?}");
                        None
                    }
                    Err(error) => {
                        warn!(target: "domkit::element", "invalid selector {selector:?}: {error}");
                        None
                    }
                }
            }
        }
    }

    /// The wrapped node.
    pub const fn node(&self) -> NodeId {
        self.node
    }

    pub fn tag_name(&self) -> Option<String> {
        self.document().tag_name(self.node)
    }

    pub fn text(&self) -> String {
        self.document().text_content(self.node)
    }

    pub fn set_text(&self, text: &str) -> &Self {
        self.report("set_text", self.document().set_text_content(self.node, text))
    }

    pub fn html(&self) -> String {
        self.document().inner_html(self.node)
    }

    pub fn set_html(&self, markup: &str) -> &Self {
        self.report("set_html", self.document().set_inner_html(self.node, markup))
    }

    /// Apply a style configuration, including the `drag` and `resize`
    /// directives, and make the element come to the front when pressed.
    pub fn styles(&self, config: &StyleConfig) -> &Self {
        apply_styles(&self.context, self.node, config);
        self
    }

    /// Alias of [`Element::styles`].
    pub fn css(&self, config: &StyleConfig) -> &Self {
        self.styles(config)
    }

    /// One inline style property.
    pub fn style(&self, property: &str) -> Option<String> {
        self.document().style_property(self.node, property)
    }

    pub fn attr(&self, name: &str) -> Option<String> {
        self.document().get_attribute(self.node, name)
    }

    pub fn set_attr(&self, name: &str, value: &str) -> &Self {
        self.report("set_attr", self.document().set_attribute(self.node, name, value))
    }

    /// Custom data field (`data-*` attribute).
    pub fn data(&self, key: &str) -> Option<String> {
        self.document().data(self.node, key)
    }

    pub fn set_data(&self, key: &str, value: &str) -> &Self {
        self.report("set_data", self.document().set_data(self.node, key, value))
    }

    /// Add space-separated class names.
    pub fn add_class(&self, classes: &str) -> &Self {
        self.report("add_class", self.document().add_class(self.node, classes))
    }

    /// Remove space-separated class names.
    pub fn remove_class(&self, classes: &str) -> &Self {
        self.report("remove_class", self.document().remove_class(self.node, classes))
    }

    pub fn toggle_class(&self, class: &str) -> &Self {
        let result = self.document().toggle_class(self.node, class).map(|_| ());
        self.report("toggle_class", result)
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.document().has_class(self.node, class)
    }

    /// Append a child; an attached child is moved.
    pub fn append<'node>(&self, child: impl Into<NodeRef<'node>>) -> &Self {
        let Some(child) = self.resolve(child.into()) else {
            return self;
        };
        self.report("append", self.document().append_child(self.node, child))
    }

    pub fn append_to<'node>(&self, target: impl Into<Target<'node>>) -> &Self {
        let Some(parent) = self.resolve_target(target.into()) else {
            return self;
        };
        self.report("append_to", self.document().append_child(parent, self.node))
    }

    pub fn prepend_to<'node>(&self, target: impl Into<Target<'node>>) -> &Self {
        let Some(parent) = self.resolve_target(target.into()) else {
            return self;
        };
        self.report("prepend_to", self.document().prepend_child(parent, self.node))
    }

    /// Take the element out of the tree. It can be inserted again later.
    pub fn remove(&self) -> &Self {
        self.document().detach(self.node);
        self
    }

    /// Remove the element and its descendants for good, with their
    /// listeners and behaviors. Other facades of these nodes go dead.
    pub fn dispose(self) {
        match self.document().remove_subtree(self.node) {
            Ok(removed) => self.context.forget(&removed),
            Err(error) => {
                warn!(target: "domkit::element", "dispose of {} failed: {error}", self.node);
            }
        }
    }

    /// Detached copy (with descendants when `deep`). Listeners and
    /// behaviors are not copied.
    pub fn clone_node(&self, deep: bool) -> Option<Self> {
        match self.document().clone_node(self.node, deep) {
            Ok(copy) => Some(self.wrap(copy)),
            Err(error) => {
                warn!(target: "domkit::element", "clone of {} failed: {error}", self.node);
                None
            }
        }
    }

    /// Remove every child.
    pub fn clear(&self) -> &Self {
        self.document().clear_children(self.node);
        self
    }

    /// Register a bubble-phase listener and return its id for [`Element::off`].
    pub fn listen<F>(&self, event_type: &str, handler: F) -> ListenerId
    where
        F: Fn(&Self, &mut Event) + 'static,
    {
        let context = Rc::downgrade(&self.context);
        let node = self.node;
        self.document().add_event_listener(
            node,
            event_type,
            ListenerOptions::BUBBLE,
            move |_document: &Document, event: &mut Event| {
                if let Some(context) = context.upgrade() {
                    handler(&Self::new(node, context), event);
                }
            },
        )
    }

    /// Chainable form of [`Element::listen`].
    pub fn on<F>(&self, event_type: &str, handler: F) -> &Self
    where
        F: Fn(&Self, &mut Event) + 'static,
    {
        self.listen(event_type, handler);
        self
    }

    pub fn off(&self, event_type: &str, listener: ListenerId) -> &Self {
        if !self.document().remove_event_listener(self.node, event_type, listener) {
            warn!(
                target: "domkit::element",
                "listener {listener:?} for {event_type} is not registered on {}",
                self.node
            );
        }
        self
    }

    /// First descendant matching `selector`.
    pub fn find(&self, selector: &str) -> Option<Self> {
        match self.document().query_selector(self.node, selector) {
            Ok(found) => found.map(|node| self.wrap(node)),
            Err(error) => {
                warn!(target: "domkit::element", "invalid selector {selector:?}: {error}");
                None
            }
        }
    }

    /// Every descendant matching `selector`, in tree order.
    pub fn find_all(&self, selector: &str) -> Vec<Self> {
        match self.document().query_selector_all(self.node, selector) {
            Ok(found) => found.into_iter().map(|node| self.wrap(node)).collect(),
            Err(error) => {
                warn!(target: "domkit::element", "invalid selector {selector:?}: {error}");
                Vec::new()
            }
        }
    }

    pub fn parent(&self) -> Option<Self> {
        self.document()
            .parent_element(self.node)
            .map(|node| self.wrap(node))
    }

    pub fn next(&self) -> Option<Self> {
        self.document()
            .next_element_sibling(self.node)
            .map(|node| self.wrap(node))
    }

    pub fn prev(&self) -> Option<Self> {
        self.document()
            .previous_element_sibling(self.node)
            .map(|node| self.wrap(node))
    }

    pub fn children(&self) -> Vec<Self> {
        self.document()
            .element_children(self.node)
            .into_iter()
            .map(|node| self.wrap(node))
            .collect()
    }

    /// Move this element right before `reference`.
    pub fn insert_before<'node>(&self, reference: impl Into<NodeRef<'node>>) -> &Self {
        let Some(reference) = self.resolve(reference.into()) else {
            return self;
        };
        self.report("insert_before", self.document().insert_before(self.node, reference))
    }

    /// Same as [`Element::insert_before`].
    pub fn before<'node>(&self, reference: impl Into<NodeRef<'node>>) -> &Self {
        self.insert_before(reference)
    }

    /// Move this element right after `reference`.
    pub fn after<'node>(&self, reference: impl Into<NodeRef<'node>>) -> &Self {
        let Some(reference) = self.resolve(reference.into()) else {
            return self;
        };
        self.report("after", self.document().insert_after(self.node, reference))
    }

    /// Make the element draggable, by the first descendant matching
    /// `handle_selector` or by the whole element.
    pub fn enable_drag(&self, handle_selector: Option<&str>) -> &Self {
        enable_drag(&self.context, self.node, handle_selector);
        self
    }

    /// Add a corner handle that resizes the element.
    pub fn enable_resize(&self) -> &Self {
        enable_resize(&self.context, self.node);
        self
    }

    pub fn is_draggable(&self) -> bool {
        self.context.is_bound(self.node, Behavior::Drag)
    }

    pub fn is_resizable(&self) -> bool {
        self.context.is_bound(self.node, Behavior::Resize)
    }
}

impl PartialEq for Element {
    fn eq(&self, other: &Self) -> bool {
        self.node == other.node && self.document().same_document(other.document())
    }
}

impl Eq for Element {}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f
            .debug_struct("Element")
            .field("node", &self.node)
            .field("tag", &self.tag_name())
            .finish_non_exhaustive()
    }
}
