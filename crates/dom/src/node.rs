//! Node payloads stored in the document arena.

use css_style_attr::StyleDeclarations;
use smallvec::SmallVec;

#[derive(Debug, Clone, Default)]
pub enum NodeKind {
    #[default]
    Document,
    Element(ElementData),
    Text(String),
    Comment(String),
}

#[derive(Debug, Clone, Default)]
pub struct DomNode {
    pub kind: NodeKind,
}

impl DomNode {
    pub(crate) fn element(tag: &str) -> Self {
        Self {
            kind: NodeKind::Element(ElementData::new(tag)),
        }
    }

    pub const fn is_element(&self) -> bool {
        matches!(self.kind, NodeKind::Element(_))
    }
}

/// Tag and attributes of one element. The inline style and the class list
/// live in the `style` and `class` attributes so every view of them agrees.
#[derive(Debug, Clone, Default)]
pub struct ElementData {
    pub tag: String,
    pub attrs: SmallVec<(String, String), 4>,
}

impl ElementData {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            attrs: SmallVec::new(),
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        let name_lc = name.to_ascii_lowercase();
        self.attrs
            .iter()
            .find(|(key, _)| *key == name_lc)
            .map(|(_, value)| value.as_str())
    }

    pub fn set_attr(&mut self, name: &str, value: &str) {
        let name_lc = name.to_ascii_lowercase();
        if let Some(slot) = self.attrs.iter_mut().find(|(key, _)| *key == name_lc) {
            value.clone_into(&mut slot.1);
            return;
        }
        self.attrs.push((name_lc, value.to_owned()));
    }

    pub fn remove_attr(&mut self, name: &str) -> Option<String> {
        let name_lc = name.to_ascii_lowercase();
        let index = self.attrs.iter().position(|(key, _)| *key == name_lc)?;
        Some(self.attrs.remove(index).1)
    }

    pub fn id(&self) -> Option<&str> {
        self.attr("id").filter(|value| !value.is_empty())
    }

    /// Class tokens in attribute order.
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.attr("class")
            .unwrap_or_default()
            .split_ascii_whitespace()
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes().any(|token| token == class)
    }

    /// Rewrite the class attribute from a token list, dropping duplicates.
    pub(crate) fn set_classes(&mut self, tokens: &[String]) {
        let mut unique: Vec<&str> = Vec::with_capacity(tokens.len());
        for token in tokens {
            if !unique.contains(&token.as_str()) {
                unique.push(token);
            }
        }
        self.set_attr("class", &unique.join(" "));
    }

    pub fn style(&self) -> StyleDeclarations {
        self.attr("style")
            .map(StyleDeclarations::parse)
            .unwrap_or_default()
    }

    pub(crate) fn set_style(&mut self, block: &StyleDeclarations) {
        self.set_attr("style", &block.to_string());
    }
}

/// Attribute backing a data field: `userId` is stored as `data-user-id`.
pub fn data_attribute_name(key: &str) -> String {
    let mut out = String::from("data-");
    for character in key.chars() {
        if character.is_ascii_uppercase() {
            out.push('-');
            out.push(character.to_ascii_lowercase());
        } else {
            out.push(character);
        }
    }
    out
}
