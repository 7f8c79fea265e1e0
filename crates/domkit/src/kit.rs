use alloc::rc::Rc;

use dom::{Document, NodeId};
use log::warn;

use crate::config::KitConfig;
use crate::context::KitContext;
use crate::element::Element;
use crate::error::NotFound;
use crate::zindex::{CounterZIndex, GlobalZIndex, ZIndexAllocator};

/// Entry point: looks elements up in one document and wraps them.
#[derive(Clone)]
pub struct Kit {
    context: Rc<KitContext>,
}

impl Kit {
    /// Kit with the default configuration and the process-wide z-index counter.
    pub fn new(document: Document) -> Self {
        Self::with_config(document, KitConfig::default())
    }

    /// A configured `z_index_base` gives the kit its own counter; otherwise
    /// the process-wide one is shared.
    pub fn with_config(document: Document, config: KitConfig) -> Self {
        let allocator = config.z_index_base.map_or_else(
            || Rc::new(GlobalZIndex) as Rc<dyn ZIndexAllocator>,
            |base| Rc::new(CounterZIndex::new(base)) as Rc<dyn ZIndexAllocator>,
        );
        Self::with_allocator(document, config, allocator)
    }

    pub fn with_allocator(
        document: Document,
        config: KitConfig,
        allocator: Rc<dyn ZIndexAllocator>,
    ) -> Self {
        Self {
            context: Rc::new(KitContext::new(document, allocator, config)),
        }
    }

    pub fn document(&self) -> &Document {
        &self.context.document
    }

    pub fn config(&self) -> &KitConfig {
        &self.context.config
    }

    /// Wrap an existing node of this kit's document.
    pub fn wrap(&self, node: NodeId) -> Element {
        Element::new(node, Rc::clone(&self.context))
    }

    pub fn body(&self) -> Element {
        self.wrap(self.document().body())
    }

    /// # Errors
    /// [`NotFound::Id`] when no connected element has this id.
    pub fn by_id(&self, id: &str) -> Result<Element, NotFound> {
        self.document()
            .get_element_by_id(id)
            .map(|node| self.wrap(node))
            .ok_or_else(|| NotFound::Id(id.to_owned()))
    }

    /// First element of the document matching `selector`.
    ///
    /// # Errors
    /// [`NotFound::Selector`] on no match, [`NotFound::InvalidSelector`]
    /// when the selector does not parse.
    pub fn query(&self, selector: &str) -> Result<Element, NotFound> {
        let document = self.document();
        match document.query_selector(document.root(), selector) {
            Ok(Some(node)) => Ok(self.wrap(node)),
            Ok(None) => Err(NotFound::Selector(selector.to_owned())),
            Err(error) => Err(NotFound::InvalidSelector {
                selector: selector.to_owned(),
                error,
            }),
        }
    }

    /// Every matching element in tree order. An invalid selector matches
    /// nothing.
    pub fn query_all(&self, selector: &str) -> Vec<Element> {
        let document = self.document();
        match document.query_selector_all(document.root(), selector) {
            Ok(nodes) => nodes.into_iter().map(|node| self.wrap(node)).collect(),
            Err(error) => {
                warn!(target: "domkit::kit", "invalid selector {selector:?}: {error}");
                Vec::new()
            }
        }
    }

    /// New detached element.
    pub fn create(&self, tag: &str) -> Element {
        self.wrap(self.document().create_element(tag))
    }

    /// New detached text node, ready for [`Element::append`].
    pub fn text_node(&self, text: &str) -> NodeId {
        self.document().create_text_node(text)
    }

    /// Empty the first element matching `selector`.
    ///
    /// # Errors
    /// Same as [`Kit::query`].
    pub fn clear(&self, selector: &str) -> Result<Element, NotFound> {
        let element = self.query(selector)?;
        element.clear();
        Ok(element)
    }
}

impl Default for Kit {
    fn default() -> Self {
        Self::new(Document::new())
    }
}
