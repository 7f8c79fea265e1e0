use core::fmt;

use indextree::NodeId;

use crate::node::NodeKind;
use crate::{Document, DocumentState};

/// Elements serialized without an end tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

fn escape_text(text: &str, out: &mut String) {
    for character in text.chars() {
        match character {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            _ => out.push(character),
        }
    }
}

fn escape_attr(value: &str, out: &mut String) {
    for character in value.chars() {
        match character {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            _ => out.push(character),
        }
    }
}

fn serialize_node(state: &DocumentState, node: NodeId, out: &mut String) {
    let Some(entry) = state.node(node) else {
        return;
    };
    match &entry.kind {
        NodeKind::Document => serialize_children(state, node, out),
        NodeKind::Text(text) => escape_text(text, out),
        NodeKind::Comment(text) => {
            out.push_str("<!--");
            out.push_str(text);
            out.push_str("-->");
        }
        NodeKind::Element(data) => {
            out.push('<');
            out.push_str(&data.tag);
            for (name, value) in &data.attrs {
                out.push(' ');
                out.push_str(name);
                out.push_str("=\"");
                escape_attr(value, out);
                out.push('"');
            }
            out.push('>');
            if VOID_ELEMENTS.contains(&data.tag.as_str()) {
                return;
            }
            serialize_children(state, node, out);
            out.push_str("</");
            out.push_str(&data.tag);
            out.push('>');
        }
    }
}

fn serialize_children(state: &DocumentState, node: NodeId, out: &mut String) {
    for child in node.children(&state.arena) {
        serialize_node(state, child, out);
    }
}

impl Document {
    /// Markup of the children of `node`.
    pub fn inner_html(&self, node: NodeId) -> String {
        let state = self.state();
        let mut out = String::new();
        if state.node(node).is_some() {
            serialize_children(&state, node, &mut out);
        }
        out
    }

    /// Markup of `node` including its own tag.
    pub fn outer_html(&self, node: NodeId) -> String {
        let state = self.state();
        let mut out = String::new();
        serialize_node(&state, node, &mut out);
        out
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn write_indent(out: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
            for _ in 0..depth {
                out.write_str("  ")?;
            }
            Ok(())
        }

        fn fmt_node(
            state: &DocumentState,
            id: NodeId,
            out: &mut fmt::Formatter<'_>,
            depth: usize,
        ) -> fmt::Result {
            let Some(entry) = state.node(id) else {
                return Ok(());
            };
            write_indent(out, depth)?;
            match &entry.kind {
                NodeKind::Document => writeln!(out, "#document")?,
                NodeKind::Element(data) => {
                    write!(out, "<{}", data.tag)?;
                    for (name, value) in &data.attrs {
                        write!(out, " {name}={value:?}")?;
                    }
                    writeln!(out, ">")?;
                }
                NodeKind::Text(text) => writeln!(out, "{text:?}")?,
                NodeKind::Comment(text) => writeln!(out, "<!--{text}-->")?,
            }
            for child in id.children(&state.arena) {
                fmt_node(state, child, out, depth.saturating_add(1))?;
            }
            Ok(())
        }

        let Ok(state) = self.state.try_borrow() else {
            return f.write_str("Document { <borrowed> }");
        };
        fmt_node(&state, state.root, f, 0)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, reason = "tests")]

    use super::*;

    #[test]
    fn escapes_text_and_attributes() {
        let doc = Document::new();
        let node = doc.create_element("a");
        doc.set_attribute(node, "title", "say \"hi\" & go").unwrap();
        let text = doc.create_text_node("1 < 2 & 3");
        doc.append_child(node, text).unwrap();
        assert_eq!(
            doc.outer_html(node),
            "<a title=\"say &quot;hi&quot; &amp; go\">1 &lt; 2 &amp; 3</a>"
        );
    }

    #[test]
    fn void_elements_have_no_end_tag() {
        let doc = Document::new();
        let node = doc.create_element("div");
        doc.set_inner_html(node, "a<br>b").unwrap();
        assert_eq!(doc.inner_html(node), "a<br>b");
    }

    #[test]
    fn debug_prints_tree() {
        let doc = Document::new();
        let printed = format!("{doc:?}");
        assert!(printed.starts_with("#document\n  <html>\n    <head>\n    <body>\n"));
    }
}
