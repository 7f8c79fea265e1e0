//! Markup fragments through html5ever.
//!
//! Inner markup is parsed with the HTML fragment algorithm in the context of
//! the element receiving it, so table rows, cells and list items land where
//! a browser would put them and leading whitespace is kept.

use html5ever::tendril::TendrilSink as _;
use html5ever::{LocalName, ParseOpts, QualName, ns, parse_fragment as parse_html_fragment};
use markup5ever_rcdom::{Handle, NodeData, RcDom};

/// Owned, arena-independent result of parsing a fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ParsedNode {
    Element {
        tag: String,
        attrs: Vec<(String, String)>,
        children: Vec<ParsedNode>,
    },
    Text(String),
    Comment(String),
}

/// Parse `markup` as the children of a `context_tag` element.
pub(crate) fn parse_fragment(context_tag: &str, markup: &str) -> Vec<ParsedNode> {
    if markup.is_empty() {
        return Vec::new();
    }
    let context = QualName::new(None, ns!(html), LocalName::from(context_tag));
    let dom: RcDom =
        parse_html_fragment(RcDom::default(), ParseOpts::default(), context, Vec::new(), false)
            .one(markup);
    // The fragment algorithm puts everything under a synthetic <html> root.
    let Some(root) = dom.document.children.borrow().first().cloned() else {
        return Vec::new();
    };
    let children = root.children.borrow();
    children.iter().filter_map(convert).collect()
}

fn convert(handle: &Handle) -> Option<ParsedNode> {
    match &handle.data {
        NodeData::Element { name, attrs, .. } => {
            let attrs = attrs
                .borrow()
                .iter()
                .map(|attr| (attr.name.local.to_string(), attr.value.to_string()))
                .collect();
            let children = handle.children.borrow().iter().filter_map(convert).collect();
            Some(ParsedNode::Element {
                tag: name.local.to_string(),
                attrs,
                children,
            })
        }
        NodeData::Text { contents } => Some(ParsedNode::Text(contents.borrow().to_string())),
        NodeData::Comment { contents } => Some(ParsedNode::Comment(contents.to_string())),
        NodeData::Document | NodeData::Doctype { .. } | NodeData::ProcessingInstruction { .. } => {
            None
        }
    }
}
