//! Node creation, insertion and element data writes.

use css_style_attr::StyleDeclarations;
use indextree::NodeId;
use log::trace;

use crate::node::{ElementData, NodeKind, data_attribute_name};
use crate::parser::{ParsedNode, parse_fragment};
use crate::{Document, DocumentState, DomError};

impl DocumentState {
    fn ensure_live(&self, node: NodeId) -> Result<(), DomError> {
        self.node(node)
            .map(|_| ())
            .ok_or(DomError::UnknownNode(node))
    }

    /// Text and comment nodes cannot hold children; neither can anything be
    /// placed next to the document node.
    fn ensure_container(&self, parent: NodeId) -> Result<(), DomError> {
        match self.node(parent).map(|entry| &entry.kind) {
            Some(NodeKind::Element(_) | NodeKind::Document) => Ok(()),
            Some(NodeKind::Text(_) | NodeKind::Comment(_)) => {
                Err(DomError::HierarchyRequest("text and comment nodes have no children"))
            }
            None => Err(DomError::UnknownNode(parent)),
        }
    }

    fn parent_of(&self, node: NodeId) -> Option<NodeId> {
        self.node(node)?;
        self.arena.get(node)?.parent()
    }

    fn clone_subtree(&mut self, node: NodeId, deep: bool) -> Result<NodeId, DomError> {
        let kind = self
            .node(node)
            .ok_or(DomError::UnknownNode(node))?
            .kind
            .clone();
        let copy = self.new_node(kind);
        if deep {
            let children: Vec<NodeId> = node.children(&self.arena).collect();
            for child in children {
                let child_copy = self.clone_subtree(child, true)?;
                copy.checked_append(child_copy, &mut self.arena)?;
            }
        }
        Ok(copy)
    }

    fn build_parsed(&mut self, parent: NodeId, parsed: Vec<ParsedNode>) -> Result<(), DomError> {
        for item in parsed {
            match item {
                ParsedNode::Text(text) => {
                    let node = self.new_node(NodeKind::Text(text));
                    parent.checked_append(node, &mut self.arena)?;
                }
                ParsedNode::Comment(text) => {
                    let node = self.new_node(NodeKind::Comment(text));
                    parent.checked_append(node, &mut self.arena)?;
                }
                ParsedNode::Element {
                    tag,
                    attrs,
                    children,
                } => {
                    let mut data = ElementData::new(&tag);
                    for (name, value) in &attrs {
                        data.set_attr(name, value);
                    }
                    let node = self.new_node(NodeKind::Element(data));
                    parent.checked_append(node, &mut self.arena)?;
                    self.build_parsed(node, children)?;
                }
            }
        }
        Ok(())
    }

    fn detach_children(&mut self, node: NodeId) {
        if self.node(node).is_none() {
            return;
        }
        let children: Vec<NodeId> = node.children(&self.arena).collect();
        for child in children {
            child.detach(&mut self.arena);
        }
    }
}

impl Document {
    /// Create a detached element. The tag is stored in ASCII lowercase.
    pub fn create_element(&self, tag: &str) -> NodeId {
        self.state_mut()
            .new_node(NodeKind::Element(ElementData::new(tag)))
    }

    pub fn create_text_node(&self, text: &str) -> NodeId {
        self.state_mut().new_node(NodeKind::Text(text.to_owned()))
    }

    pub fn create_comment(&self, text: &str) -> NodeId {
        self.state_mut().new_node(NodeKind::Comment(text.to_owned()))
    }

    /// Append `child` as the last child of `parent`, moving it from its
    /// current position if it is already in a tree.
    ///
    /// # Errors
    /// Fails when `parent` cannot hold children or the move would create a cycle.
    pub fn append_child(&self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        let mut state = self.state_mut();
        state.ensure_container(parent)?;
        state.ensure_live(child)?;
        parent.checked_append(child, &mut state.arena)?;
        Ok(())
    }

    /// Insert `child` as the first child of `parent`.
    ///
    /// # Errors
    /// Same conditions as [`Document::append_child`].
    pub fn prepend_child(&self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        let mut state = self.state_mut();
        state.ensure_container(parent)?;
        state.ensure_live(child)?;
        parent.checked_prepend(child, &mut state.arena)?;
        Ok(())
    }

    /// Insert `node` immediately before `reference` under the same parent.
    ///
    /// # Errors
    /// Fails when `reference` has no parent or the move would create a cycle.
    pub fn insert_before(&self, node: NodeId, reference: NodeId) -> Result<(), DomError> {
        let mut state = self.state_mut();
        state.ensure_live(node)?;
        let parent = state
            .parent_of(reference)
            .ok_or(DomError::NoParent(reference))?;
        if parent.ancestors(&state.arena).any(|ancestor| ancestor == node) {
            return Err(DomError::HierarchyRequest("a node cannot contain its ancestor"));
        }
        reference.checked_insert_before(node, &mut state.arena)?;
        Ok(())
    }

    /// Insert `node` immediately after `reference` under the same parent.
    ///
    /// # Errors
    /// Same conditions as [`Document::insert_before`].
    pub fn insert_after(&self, node: NodeId, reference: NodeId) -> Result<(), DomError> {
        let mut state = self.state_mut();
        state.ensure_live(node)?;
        let parent = state
            .parent_of(reference)
            .ok_or(DomError::NoParent(reference))?;
        if parent.ancestors(&state.arena).any(|ancestor| ancestor == node) {
            return Err(DomError::HierarchyRequest("a node cannot contain its ancestor"));
        }
        reference.checked_insert_after(node, &mut state.arena)?;
        Ok(())
    }

    /// Take `node` out of its parent. The node and its subtree stay usable
    /// and can be inserted again.
    pub fn detach(&self, node: NodeId) {
        let mut state = self.state_mut();
        if state.node(node).is_some() {
            node.detach(&mut state.arena);
        }
    }

    /// Copy a node (and its subtree when `deep`). Listeners are not copied.
    ///
    /// # Errors
    /// Fails for unknown nodes.
    pub fn clone_node(&self, node: NodeId, deep: bool) -> Result<NodeId, DomError> {
        self.state_mut().clone_subtree(node, deep)
    }

    /// Detach every child of `node`.
    pub fn clear_children(&self, node: NodeId) {
        self.state_mut().detach_children(node);
    }

    /// Remove `node` and its descendants from the document for good, along
    /// with their listeners. Returns the removed nodes, in tree order; their
    /// handles are dead afterwards.
    ///
    /// # Errors
    /// Fails for unknown nodes and for the document, `<html>`, `<head>` and
    /// `<body>` nodes.
    pub fn remove_subtree(&self, node: NodeId) -> Result<Vec<NodeId>, DomError> {
        let mut state = self.state_mut();
        state.ensure_live(node)?;
        if [state.root, state.document_element, state.head, state.body].contains(&node) {
            return Err(DomError::HierarchyRequest("the document skeleton cannot be removed"));
        }
        let removed: Vec<NodeId> = node.descendants(&state.arena).collect();
        for gone in &removed {
            state.listeners.remove(gone);
        }
        node.remove_subtree(&mut state.arena);
        trace!(target: "dom::mutation", "removed {} nodes under {node}", removed.len());
        Ok(removed)
    }

    /// Remove every child of `node` for good. See [`Document::remove_subtree`].
    pub fn remove_children(&self, node: NodeId) -> Vec<NodeId> {
        let children = self.child_nodes(node);
        let mut removed = Vec::new();
        for child in children {
            if let Ok(mut gone) = self.remove_subtree(child) {
                removed.append(&mut gone);
            }
        }
        removed
    }

    /// Concatenated text of all descendant text nodes, in tree order.
    pub fn text_content(&self, node: NodeId) -> String {
        let state = self.state();
        if state.node(node).is_none() {
            return String::new();
        }
        let mut out = String::new();
        for descendant in node.descendants(&state.arena) {
            if let Some(NodeKind::Text(text)) = state.node(descendant).map(|entry| &entry.kind) {
                out.push_str(text);
            }
        }
        out
    }

    /// Replace the children of an element with a single text node (none for
    /// empty text). On a text or comment node the node's own data is replaced.
    ///
    /// # Errors
    /// Fails for unknown nodes.
    pub fn set_text_content(&self, node: NodeId, text: &str) -> Result<(), DomError> {
        let mut state = self.state_mut();
        if node.is_removed(&state.arena) {
            return Err(DomError::UnknownNode(node));
        }
        let entry = state.arena.get_mut(node).ok_or(DomError::UnknownNode(node))?;
        match &mut entry.get_mut().kind {
            NodeKind::Text(data) | NodeKind::Comment(data) => {
                text.clone_into(data);
                return Ok(());
            }
            NodeKind::Element(_) | NodeKind::Document => {}
        }
        state.detach_children(node);
        if !text.is_empty() {
            let text_node = state.new_node(NodeKind::Text(text.to_owned()));
            node.checked_append(text_node, &mut state.arena)?;
        }
        Ok(())
    }

    /// Replace the children of an element with nodes parsed from `markup`.
    ///
    /// # Errors
    /// Fails when `node` is not an element.
    pub fn set_inner_html(&self, node: NodeId, markup: &str) -> Result<(), DomError> {
        let context_tag = self.tag_name(node).ok_or(DomError::NotAnElement(node))?;
        let parsed = parse_fragment(&context_tag, markup);
        trace!(target: "dom::mutation", "inner html on {node}: {} top-level nodes", parsed.len());
        let mut state = self.state_mut();
        state.detach_children(node);
        state.build_parsed(node, parsed)
    }

    pub fn tag_name(&self, node: NodeId) -> Option<String> {
        self.state().element(node).map(|data| data.tag.clone())
    }

    pub fn is_element(&self, node: NodeId) -> bool {
        self.state().element(node).is_some()
    }

    pub fn get_attribute(&self, node: NodeId, name: &str) -> Option<String> {
        self.state()
            .element(node)?
            .attr(name)
            .map(str::to_owned)
    }

    /// # Errors
    /// Fails when `node` is not an element.
    pub fn set_attribute(&self, node: NodeId, name: &str, value: &str) -> Result<(), DomError> {
        self.state_mut().element_mut(node)?.set_attr(name, value);
        Ok(())
    }

    /// # Errors
    /// Fails when `node` is not an element.
    pub fn remove_attribute(&self, node: NodeId, name: &str) -> Result<Option<String>, DomError> {
        Ok(self.state_mut().element_mut(node)?.remove_attr(name))
    }

    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.state()
            .element(node)
            .is_some_and(|data| data.has_class(class))
    }

    /// Add every whitespace-separated token of `classes`.
    ///
    /// # Errors
    /// Fails when `node` is not an element.
    pub fn add_class(&self, node: NodeId, classes: &str) -> Result<(), DomError> {
        let mut state = self.state_mut();
        let data = state.element_mut(node)?;
        let mut tokens: Vec<String> = data.classes().map(str::to_owned).collect();
        tokens.extend(classes.split_ascii_whitespace().map(str::to_owned));
        data.set_classes(&tokens);
        Ok(())
    }

    /// Remove every whitespace-separated token of `classes`.
    ///
    /// # Errors
    /// Fails when `node` is not an element.
    pub fn remove_class(&self, node: NodeId, classes: &str) -> Result<(), DomError> {
        let mut state = self.state_mut();
        let data = state.element_mut(node)?;
        let removed: Vec<&str> = classes.split_ascii_whitespace().collect();
        let tokens: Vec<String> = data
            .classes()
            .filter(|token| !removed.contains(token))
            .map(str::to_owned)
            .collect();
        data.set_classes(&tokens);
        Ok(())
    }

    /// Flip one class token; returns whether it is present afterwards.
    ///
    /// # Errors
    /// Fails when `node` is not an element.
    pub fn toggle_class(&self, node: NodeId, class: &str) -> Result<bool, DomError> {
        let token = class.trim();
        let mut state = self.state_mut();
        let data = state.element_mut(node)?;
        if token.is_empty() {
            return Ok(false);
        }
        let mut tokens: Vec<String> = data.classes().map(str::to_owned).collect();
        let position = tokens.iter().position(|existing| existing == token);
        if let Some(index) = position {
            tokens.remove(index);
        }
        let present = position.is_none();
        if present {
            tokens.push(token.to_owned());
        }
        data.set_classes(&tokens);
        Ok(present)
    }

    /// Inline style value of one property (`zIndex` and `z-index` are the same property).
    pub fn style_property(&self, node: NodeId, name: &str) -> Option<String> {
        self.state()
            .element(node)?
            .style()
            .get(name)
            .map(str::to_owned)
    }

    /// Set an inline style property; an empty value removes it.
    ///
    /// # Errors
    /// Fails when `node` is not an element.
    pub fn set_style_property(&self, node: NodeId, name: &str, value: &str) -> Result<(), DomError> {
        let mut state = self.state_mut();
        let data = state.element_mut(node)?;
        let mut block = data.style();
        block.set(name, value);
        data.set_style(&block);
        Ok(())
    }

    /// # Errors
    /// Fails when `node` is not an element.
    pub fn remove_style_property(&self, node: NodeId, name: &str) -> Result<Option<String>, DomError> {
        let mut state = self.state_mut();
        let data = state.element_mut(node)?;
        let mut block = data.style();
        let previous = block.remove(name);
        data.set_style(&block);
        Ok(previous)
    }

    /// The whole inline style block.
    pub fn inline_style(&self, node: NodeId) -> StyleDeclarations {
        self.state()
            .element(node)
            .map(ElementData::style)
            .unwrap_or_default()
    }

    /// Custom data field `key`, stored as a `data-*` attribute.
    pub fn data(&self, node: NodeId, key: &str) -> Option<String> {
        self.get_attribute(node, &data_attribute_name(key))
    }

    /// # Errors
    /// Fails when `node` is not an element.
    pub fn set_data(&self, node: NodeId, key: &str, value: &str) -> Result<(), DomError> {
        self.set_attribute(node, &data_attribute_name(key), value)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, reason = "tests")]

    use super::*;
    use crate::events::ListenerOptions;

    #[test]
    fn append_moves_and_rejects_cycles() {
        let doc = Document::new();
        let outer = doc.create_element("div");
        let inner = doc.create_element("span");
        doc.append_child(doc.body(), outer).unwrap();
        doc.append_child(outer, inner).unwrap();
        assert_eq!(
            doc.append_child(inner, outer),
            Err(DomError::HierarchyRequest("a node cannot contain its ancestor"))
        );
        doc.append_child(doc.body(), inner).unwrap();
        assert_eq!(doc.parent_node(inner), Some(doc.body()));
        assert!(doc.element_children(outer).is_empty());
    }

    #[test]
    fn insert_before_needs_a_parent() {
        let doc = Document::new();
        let loose = doc.create_element("p");
        let other = doc.create_element("p");
        assert_eq!(doc.insert_before(other, loose), Err(DomError::NoParent(loose)));
    }

    #[test]
    fn text_nodes_cannot_hold_children() {
        let doc = Document::new();
        let text = doc.create_text_node("x");
        let child = doc.create_element("b");
        assert!(matches!(
            doc.append_child(text, child),
            Err(DomError::HierarchyRequest(_))
        ));
    }

    #[test]
    fn deep_clone_copies_subtree_but_shallow_does_not() {
        let doc = Document::new();
        let list = doc.create_element("ul");
        doc.set_inner_html(list, "<li class=\"a\">one</li><li>two</li>").unwrap();
        let deep = doc.clone_node(list, true).unwrap();
        let shallow = doc.clone_node(list, false).unwrap();
        assert_eq!(doc.inner_html(deep), doc.inner_html(list));
        assert_eq!(doc.inner_html(shallow), "");
        assert_eq!(doc.parent_node(deep), None);
    }

    #[test]
    fn class_tokens_round_trip() {
        let doc = Document::new();
        let node = doc.create_element("div");
        doc.add_class(node, "card  open").unwrap();
        doc.add_class(node, "open").unwrap();
        assert_eq!(doc.get_attribute(node, "class").as_deref(), Some("card open"));
        doc.remove_class(node, "card missing").unwrap();
        assert_eq!(doc.get_attribute(node, "class").as_deref(), Some("open"));
        assert!(!doc.toggle_class(node, "open").unwrap());
        assert!(doc.toggle_class(node, "open").unwrap());
    }

    #[test]
    fn style_properties_share_the_style_attribute() {
        let doc = Document::new();
        let node = doc.create_element("div");
        doc.set_attribute(node, "style", "color: red").unwrap();
        doc.set_style_property(node, "zIndex", "1001").unwrap();
        assert_eq!(doc.style_property(node, "z-index").as_deref(), Some("1001"));
        assert_eq!(
            doc.get_attribute(node, "style").as_deref(),
            Some("color: red; z-index: 1001;")
        );
        assert_eq!(doc.remove_style_property(node, "color").unwrap().as_deref(), Some("red"));
        assert_eq!(doc.style_property(node, "color"), None);
    }

    #[test]
    fn text_content_replaces_children() {
        let doc = Document::new();
        let node = doc.create_element("p");
        doc.set_inner_html(node, "a<b>b</b>c").unwrap();
        assert_eq!(doc.text_content(node), "abc");
        doc.set_text_content(node, "<plain>").unwrap();
        assert_eq!(doc.inner_html(node), "&lt;plain&gt;");
        doc.set_text_content(node, "").unwrap();
        assert!(doc.child_nodes(node).is_empty());
    }

    #[test]
    fn remove_subtree_drops_nodes_and_listeners() {
        let doc = Document::new();
        let panel = doc.create_element("div");
        doc.append_child(doc.body(), panel).unwrap();
        doc.set_inner_html(panel, "<p><b>x</b></p>").unwrap();
        let para = doc.element_children(panel)[0];
        doc.add_event_listener(para, "click", ListenerOptions::BUBBLE, |_, _| {});
        doc.add_event_listener(panel, "click", ListenerOptions::BUBBLE, |_, _| {});

        let removed = doc.remove_subtree(panel).unwrap();
        assert_eq!(removed.len(), 4);
        assert_eq!(removed[0], panel);
        assert_eq!(doc.total_listener_count("click"), 0);
        assert!(doc.child_nodes(doc.body()).is_empty());
        assert!(!doc.is_element(para));
        assert_eq!(doc.set_attribute(panel, "id", "x"), Err(DomError::UnknownNode(panel)));

        // A reused arena slot does not bring the old handle back.
        let fresh = doc.create_element("span");
        assert!(doc.is_element(fresh));
        assert!(!doc.is_element(panel));
        assert_eq!(doc.remove_subtree(panel), Err(DomError::UnknownNode(panel)));
    }

    #[test]
    fn document_skeleton_cannot_be_removed() {
        let doc = Document::new();
        for node in [doc.root(), doc.document_element(), doc.head(), doc.body()] {
            assert!(matches!(doc.remove_subtree(node), Err(DomError::HierarchyRequest(_))));
        }
        assert!(doc.is_element(doc.body()));
    }

    #[test]
    fn remove_children_keeps_the_parent() {
        let doc = Document::new();
        let list = doc.create_element("ul");
        doc.set_inner_html(list, "<li>1</li><li>2</li>").unwrap();
        let items = doc.element_children(list);
        assert_eq!(doc.remove_children(list).len(), 4);
        assert!(doc.child_nodes(list).is_empty());
        assert!(doc.is_element(list));
        assert!(items.iter().all(|item| !doc.is_element(*item)));
    }

    #[test]
    fn inner_html_uses_the_element_as_parsing_context() {
        let doc = Document::new();
        let row = doc.create_element("tr");
        doc.set_inner_html(row, "<td>1</td><td>2</td>").unwrap();
        assert_eq!(doc.inner_html(row), "<td>1</td><td>2</td>");
        let para = doc.create_element("p");
        doc.set_inner_html(para, "  <b>x</b>").unwrap();
        assert_eq!(doc.inner_html(para), "  <b>x</b>");
    }
}
