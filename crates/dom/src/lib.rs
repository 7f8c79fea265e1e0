#![allow(
    clippy::missing_inline_in_public_items,
    reason = "Inlining decisions left to compiler for this crate"
)]
//! In-process document tree.
//!
//! A [`Document`] is a cheap, clonable handle to one arena-backed node tree.
//! It provides the element operations a browser exposes to scripts: node
//! creation and insertion, attributes, inline style, class lists, data
//! fields, inner markup, selector queries and DOM-style event dispatch.
//!
//! No borrow of the tree is held while event listeners run, so listeners may
//! freely call back into the document.

extern crate alloc;

use core::cell::{Ref, RefCell, RefMut};
use core::error::Error;
use core::fmt;
use std::collections::HashMap;

use alloc::rc::Rc;
use indextree::{Arena, Node, NodeError};

pub mod events;
pub mod geometry;
mod mutation;
pub mod node;
mod parser;
mod printing;
mod query;

pub use css_selectors::SelectorError;
pub use css_style_attr::StyleDeclarations;
pub use events::{
    Event, EventPhase, ListenerCallback, ListenerId, ListenerOptions, PointerButton, PointerData,
};
pub use geometry::{ComputedStyle, Rect, parse_px};
pub use indextree::NodeId;
pub use node::{DomNode, ElementData, NodeKind};

/// Failure of a tree or element operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DomError {
    /// The insertion would make a node its own ancestor (or sibling of itself).
    HierarchyRequest(&'static str),
    /// The operation needs a parent and the reference node has none.
    NoParent(NodeId),
    /// The operation needs an element and the node is text, comment or the document.
    NotAnElement(NodeId),
    /// The node handle does not belong to a live node of this document.
    UnknownNode(NodeId),
}

impl fmt::Display for DomError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HierarchyRequest(reason) => write!(f, "HierarchyRequestError: {reason}"),
            Self::NoParent(node) => write!(f, "node {node} has no parent"),
            Self::NotAnElement(node) => write!(f, "node {node} is not an element"),
            Self::UnknownNode(node) => write!(f, "node {node} is not part of this document"),
        }
    }
}

impl Error for DomError {}

impl From<NodeError> for DomError {
    fn from(error: NodeError) -> Self {
        match error {
            NodeError::AppendSelf | NodeError::PrependSelf => {
                Self::HierarchyRequest("a node cannot contain itself")
            }
            NodeError::InsertBeforeSelf | NodeError::InsertAfterSelf => {
                Self::HierarchyRequest("a node cannot be its own sibling")
            }
            NodeError::AppendAncestor | NodeError::PrependAncestor => {
                Self::HierarchyRequest("a node cannot contain its ancestor")
            }
            _ => Self::HierarchyRequest("node was removed from the arena"),
        }
    }
}

/// Tree storage and listener registry behind a [`Document`] handle.
pub struct DocumentState {
    pub(crate) arena: Arena<DomNode>,
    pub(crate) root: NodeId,
    pub(crate) document_element: NodeId,
    pub(crate) head: NodeId,
    pub(crate) body: NodeId,
    pub(crate) listeners: HashMap<NodeId, Vec<events::Listener>>,
    pub(crate) next_listener_id: u64,
}

impl DocumentState {
    pub(crate) fn node(&self, node: NodeId) -> Option<&DomNode> {
        if node.is_removed(&self.arena) {
            return None;
        }
        self.arena.get(node).map(Node::get)
    }

    pub(crate) fn element(&self, node: NodeId) -> Option<&ElementData> {
        match &self.node(node)?.kind {
            NodeKind::Element(data) => Some(data),
            NodeKind::Document | NodeKind::Text(_) | NodeKind::Comment(_) => None,
        }
    }

    pub(crate) fn element_mut(&mut self, node: NodeId) -> Result<&mut ElementData, DomError> {
        if node.is_removed(&self.arena) {
            return Err(DomError::UnknownNode(node));
        }
        let entry = self.arena.get_mut(node).ok_or(DomError::UnknownNode(node))?;
        match &mut entry.get_mut().kind {
            NodeKind::Element(data) => Ok(data),
            NodeKind::Document | NodeKind::Text(_) | NodeKind::Comment(_) => {
                Err(DomError::NotAnElement(node))
            }
        }
    }

    pub(crate) fn new_node(&mut self, kind: NodeKind) -> NodeId {
        self.arena.new_node(DomNode { kind })
    }
}

/// Shared handle to one document tree. Clones refer to the same tree.
///
/// Replacing or clearing children (`set_inner_html`, `set_text_content`,
/// `clear_children`) and `detach` only unlink nodes: they stay in the arena
/// with their listeners so handles to them remain usable and can be inserted
/// again. [`Document::remove_subtree`] drops nodes and their listeners for good.
#[derive(Clone)]
pub struct Document {
    state: Rc<RefCell<DocumentState>>,
}

impl Document {
    /// Create a document holding `<html><head></head><body></body></html>`.
    pub fn new() -> Self {
        let mut arena = Arena::new();
        let root = arena.new_node(DomNode {
            kind: NodeKind::Document,
        });
        let document_element = arena.new_node(DomNode::element("html"));
        let head = arena.new_node(DomNode::element("head"));
        let body = arena.new_node(DomNode::element("body"));
        root.append(document_element, &mut arena);
        document_element.append(head, &mut arena);
        document_element.append(body, &mut arena);
        Self {
            state: Rc::new(RefCell::new(DocumentState {
                arena,
                root,
                document_element,
                head,
                body,
                listeners: HashMap::new(),
                next_listener_id: 1,
            })),
        }
    }

    /// Borrow the tree immutably. Never hold this across a call that
    /// dispatches events.
    pub fn state(&self) -> Ref<'_, DocumentState> {
        self.state.borrow()
    }

    pub(crate) fn state_mut(&self) -> RefMut<'_, DocumentState> {
        self.state.borrow_mut()
    }

    /// The document node itself; the target for document-level listeners.
    pub fn root(&self) -> NodeId {
        self.state().root
    }

    /// The `<html>` element.
    pub fn document_element(&self) -> NodeId {
        self.state().document_element
    }

    pub fn head(&self) -> NodeId {
        self.state().head
    }

    pub fn body(&self) -> NodeId {
        self.state().body
    }

    /// True when both handles refer to the same tree.
    pub fn same_document(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.state, &other.state)
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}
