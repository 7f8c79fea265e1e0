//! Tree navigation and selector lookups.

use css_selectors::{ElementAdapter, SelectorError, matches_selector_list, parse_selector_list};
use indextree::NodeId;

use crate::{Document, DocumentState};

impl ElementAdapter for DocumentState {
    type Handle = NodeId;

    fn parent(&self, element: NodeId) -> Option<NodeId> {
        self.arena
            .get(element)?
            .parent()
            .filter(|parent| self.element(*parent).is_some())
    }

    fn previous_sibling_element(&self, element: NodeId) -> Option<NodeId> {
        element
            .preceding_siblings(&self.arena)
            .skip(1)
            .find(|sibling| self.element(*sibling).is_some())
    }

    fn tag_name(&self, element: NodeId) -> &str {
        self.element(element).map_or("", |data| data.tag.as_str())
    }

    fn element_id(&self, element: NodeId) -> Option<&str> {
        self.element(element)?.id()
    }

    fn has_class(&self, element: NodeId, class: &str) -> bool {
        self.element(element)
            .is_some_and(|data| data.has_class(class))
    }

    fn attr(&self, element: NodeId, name: &str) -> Option<&str> {
        self.element(element)?.attr(name)
    }
}

impl DocumentState {
    /// Element descendants of `scope` (excluding `scope`) in tree order.
    fn descendant_elements(&self, scope: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let live = self.node(scope).is_some();
        scope
            .descendants(&self.arena)
            .take_while(move |_| live)
            .skip(1)
            .filter(|node| self.element(*node).is_some())
    }
}

impl Document {
    pub fn parent_node(&self, node: NodeId) -> Option<NodeId> {
        let state = self.state();
        state.node(node)?;
        state.arena.get(node)?.parent()
    }

    /// Parent, if it is an element (the `<html>` element's parent is the
    /// document node, which does not count).
    pub fn parent_element(&self, node: NodeId) -> Option<NodeId> {
        let state = self.state();
        state.node(node)?;
        let parent = state.arena.get(node)?.parent()?;
        state.element(parent).map(|_| parent)
    }

    pub fn child_nodes(&self, node: NodeId) -> Vec<NodeId> {
        let state = self.state();
        if state.node(node).is_none() {
            return Vec::new();
        }
        node.children(&state.arena).collect()
    }

    pub fn element_children(&self, node: NodeId) -> Vec<NodeId> {
        let state = self.state();
        if state.node(node).is_none() {
            return Vec::new();
        }
        node.children(&state.arena)
            .filter(|child| state.element(*child).is_some())
            .collect()
    }

    pub fn next_element_sibling(&self, node: NodeId) -> Option<NodeId> {
        let state = self.state();
        state.node(node)?;
        node.following_siblings(&state.arena)
            .skip(1)
            .find(|sibling| state.element(*sibling).is_some())
    }

    pub fn previous_element_sibling(&self, node: NodeId) -> Option<NodeId> {
        let state = self.state();
        state.node(node)?;
        state.previous_sibling_element(node)
    }

    /// True when `node` is `ancestor` or lies inside it.
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let state = self.state();
        state.node(node).is_some() && node.ancestors(&state.arena).any(|each| each == ancestor)
    }

    /// True when `node` is attached to this document's tree.
    pub fn is_connected(&self, node: NodeId) -> bool {
        self.contains(self.root(), node)
    }

    /// First connected element whose id is `id`, in tree order.
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        if id.is_empty() {
            return None;
        }
        let state = self.state();
        state
            .descendant_elements(state.root)
            .find(|node| state.element_id(*node) == Some(id))
    }

    /// First element inside `scope` matching `selectors`.
    ///
    /// # Errors
    /// Returns the parse error for an invalid selector.
    pub fn query_selector(&self, scope: NodeId, selectors: &str) -> Result<Option<NodeId>, SelectorError> {
        let list = parse_selector_list(selectors)?;
        let state = self.state();
        Ok(state
            .descendant_elements(scope)
            .find(|node| matches_selector_list(&*state, *node, &list)))
    }

    /// Every element inside `scope` matching `selectors`, in tree order.
    ///
    /// # Errors
    /// Returns the parse error for an invalid selector.
    pub fn query_selector_all(&self, scope: NodeId, selectors: &str) -> Result<Vec<NodeId>, SelectorError> {
        let list = parse_selector_list(selectors)?;
        let state = self.state();
        Ok(state
            .descendant_elements(scope)
            .filter(|node| matches_selector_list(&*state, *node, &list))
            .collect())
    }

    /// Whether `node` itself matches `selectors`.
    ///
    /// # Errors
    /// Returns the parse error for an invalid selector.
    pub fn matches(&self, node: NodeId, selectors: &str) -> Result<bool, SelectorError> {
        let list = parse_selector_list(selectors)?;
        let state = self.state();
        Ok(state.element(node).is_some() && matches_selector_list(&*state, node, &list))
    }
}
