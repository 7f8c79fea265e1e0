use alloc::rc::Rc;
use core::cell::RefCell;
use std::collections::HashMap;

use dom::{Document, NodeId};
use log::debug;

use crate::config::KitConfig;
use crate::zindex::ZIndexAllocator;

/// A behavior that can be attached to an element at most once.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Behavior {
    FrontBring,
    Drag,
    Resize,
}

#[derive(Clone, Copy, Debug, Default)]
struct Bindings {
    front_bring: bool,
    drag: bool,
    resize: bool,
}

impl Bindings {
    fn slot(&mut self, behavior: Behavior) -> &mut bool {
        match behavior {
            Behavior::FrontBring => &mut self.front_bring,
            Behavior::Drag => &mut self.drag,
            Behavior::Resize => &mut self.resize,
        }
    }

    const fn get(self, behavior: Behavior) -> bool {
        match behavior {
            Behavior::FrontBring => self.front_bring,
            Behavior::Drag => self.drag,
            Behavior::Resize => self.resize,
        }
    }
}

/// State shared by a kit and every element facade it hands out.
pub(crate) struct KitContext {
    pub(crate) document: Document,
    pub(crate) allocator: Rc<dyn ZIndexAllocator>,
    pub(crate) config: KitConfig,
    bindings: RefCell<HashMap<NodeId, Bindings>>,
}

impl KitContext {
    pub(crate) fn new(
        document: Document,
        allocator: Rc<dyn ZIndexAllocator>,
        config: KitConfig,
    ) -> Self {
        Self {
            document,
            allocator,
            config,
            bindings: RefCell::new(HashMap::new()),
        }
    }

    pub(crate) fn is_bound(&self, node: NodeId, behavior: Behavior) -> bool {
        self.bindings
            .borrow()
            .get(&node)
            .is_some_and(|bindings| bindings.get(behavior))
    }

    /// Record `behavior` on `node`. Returns false, and logs, when it was
    /// already attached.
    pub(crate) fn claim(&self, node: NodeId, behavior: Behavior) -> bool {
        let mut registry = self.bindings.borrow_mut();
        let slot = registry.entry(node).or_default().slot(behavior);
        if *slot {
            debug!(target: "domkit::behavior", "{behavior:?} already attached to {node}");
            return false;
        }
        *slot = true;
        true
    }

    /// Drop the bindings of nodes that left the document for good.
    pub(crate) fn forget(&self, nodes: &[NodeId]) {
        let mut registry = self.bindings.borrow_mut();
        for node in nodes {
            registry.remove(node);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zindex::CounterZIndex;

    #[test]
    fn behaviors_are_claimed_once_per_node() {
        let document = Document::new();
        let first = document.create_element("div");
        let second = document.create_element("div");
        let context = KitContext::new(document, Rc::new(CounterZIndex::default()), KitConfig::default());

        assert!(!context.is_bound(first, Behavior::Drag));
        assert!(context.claim(first, Behavior::Drag));
        assert!(!context.claim(first, Behavior::Drag));
        assert!(context.is_bound(first, Behavior::Drag));
        assert!(!context.is_bound(first, Behavior::Resize));
        assert!(context.claim(first, Behavior::Resize));
        assert!(context.claim(second, Behavior::Drag));

        context.forget(&[first]);
        assert!(!context.is_bound(first, Behavior::Drag));
        assert!(context.is_bound(second, Behavior::Drag));
    }
}
