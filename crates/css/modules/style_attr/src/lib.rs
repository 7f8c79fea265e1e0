//! CSS Style Attributes: inline `style="..."` declaration blocks.
//! Reference: <https://www.w3.org/TR/css-style-attr/>
//!
//! Holds the declarations of one element's inline style in source order and
//! converts between the attribute text and individual property writes.

#![forbid(unsafe_code)]

use core::fmt;

/// A single CSS declaration.
///
/// See <https://www.w3.org/TR/css-style-attr/#interpreting>
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Declaration {
    /// Property name in CSS (kebab-case, ASCII lowercase) form.
    pub property: String,
    /// Raw value trimmed of surrounding ASCII whitespace. May contain spaces.
    pub value: String,
}

/// Parse the value of a `style` attribute into a list of declarations.
///
/// - Splits on semicolons (`;`) into declaration items.
/// - Splits each item on the first colon (`:`) into property and value.
/// - Trims ASCII whitespace and lowercases the property name.
/// - Skips items without a colon, with an empty property or an empty value.
///
/// See <https://www.w3.org/TR/css-style-attr/#interpreting>
pub fn parse_style_attribute(input: &str) -> Vec<Declaration> {
    if input.is_empty() {
        return Vec::new();
    }
    let mut out: Vec<Declaration> = Vec::new();
    for raw_item in input.split(';') {
        let item = raw_item.trim_matches(is_ascii_whitespace);
        if item.is_empty() {
            continue;
        }
        let Some((raw_prop, raw_value)) = item.split_once(':') else {
            continue;
        };
        let property_text = raw_prop.trim_matches(is_ascii_whitespace);
        let value_text = raw_value.trim_matches(is_ascii_whitespace);
        if property_text.is_empty() || value_text.is_empty() {
            continue;
        }
        out.push(Declaration {
            property: property_text.to_ascii_lowercase(),
            value: value_text.to_owned(),
        });
    }
    out
}

/// Map a scripting-style property name to its CSS form.
///
/// `backgroundColor` becomes `background-color`, `zIndex` becomes `z-index`.
/// Names already in kebab-case pass through lowercased; custom properties
/// (`--accent`) keep their case.
pub fn css_property_name(name: &str) -> String {
    let trimmed = name.trim_matches(is_ascii_whitespace);
    if trimmed.starts_with("--") {
        return trimmed.to_owned();
    }
    let mut out = String::with_capacity(trimmed.len().saturating_add(4));
    for character in trimmed.chars() {
        if character.is_ascii_uppercase() {
            if !out.is_empty() {
                out.push('-');
            }
            out.push(character.to_ascii_lowercase());
        } else {
            out.push(character);
        }
    }
    out
}

/// The inline style of one element: an ordered declaration block where each
/// property appears at most once.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StyleDeclarations {
    declarations: Vec<Declaration>,
}

impl StyleDeclarations {
    /// Create an empty block.
    pub const fn new() -> Self {
        Self {
            declarations: Vec::new(),
        }
    }

    /// Build a block from attribute text. Later duplicates replace earlier ones
    /// but keep the position of the first occurrence.
    pub fn parse(input: &str) -> Self {
        let mut block = Self::new();
        for decl in parse_style_attribute(input) {
            block.set(&decl.property, &decl.value);
        }
        block
    }

    /// Set a property. An empty value removes the property, mirroring
    /// assignment of `""` through a CSSOM style object.
    pub fn set(&mut self, name: &str, value: &str) {
        let property = css_property_name(name);
        let value_text = value.trim_matches(is_ascii_whitespace);
        if value_text.is_empty() {
            self.remove(&property);
            return;
        }
        let Some(existing) = self
            .declarations
            .iter_mut()
            .find(|decl| decl.property == property)
        else {
            self.declarations.push(Declaration {
                property,
                value: value_text.to_owned(),
            });
            return;
        };
        value_text.clone_into(&mut existing.value);
    }

    /// Value of a property, if declared.
    pub fn get(&self, name: &str) -> Option<&str> {
        let property = css_property_name(name);
        self.declarations
            .iter()
            .find(|decl| decl.property == property)
            .map(|decl| decl.value.as_str())
    }

    /// Remove a property, returning its previous value.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        let property = css_property_name(name);
        let index = self
            .declarations
            .iter()
            .position(|decl| decl.property == property)?;
        Some(self.declarations.remove(index).value)
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Declaration> {
        self.declarations.iter()
    }

    pub fn clear(&mut self) {
        self.declarations.clear();
    }
}

impl fmt::Display for StyleDeclarations {
    /// Serialize as attribute text: `color: red; z-index: 4;`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for decl in &self.declarations {
            if !first {
                f.write_str(" ")?;
            }
            first = false;
            write!(f, "{}: {};", decl.property, decl.value)?;
        }
        Ok(())
    }
}

/// ASCII whitespace per CSS Syntax (TAB, LF, FF, CR, SPACE).
///
/// See <https://www.w3.org/TR/css-syntax-3/#whitespace>
const fn is_ascii_whitespace(character: char) -> bool {
    matches!(
        character,
        '\u{0009}' | '\u{000A}' | '\u{000C}' | '\u{000D}' | '\u{0020}'
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_skips_invalid_items() {
        let decls = parse_style_attribute("color: red; ; bogus; width:; HEIGHT : 4px");
        assert_eq!(decls.len(), 2);
        assert_eq!(decls[0].property, "color");
        assert_eq!(decls[1].property, "height");
        assert_eq!(decls[1].value, "4px");
    }

    #[test]
    fn camel_case_names_become_kebab_case() {
        assert_eq!(css_property_name("zIndex"), "z-index");
        assert_eq!(css_property_name("backgroundColor"), "background-color");
        assert_eq!(css_property_name("user-select"), "user-select");
        assert_eq!(css_property_name("--Accent"), "--Accent");
    }

    #[test]
    fn set_replaces_in_place_and_empty_removes() {
        let mut block = StyleDeclarations::parse("color: red; left: 1px");
        block.set("color", "blue");
        block.set("zIndex", "1001");
        assert_eq!(block.to_string(), "color: blue; left: 1px; z-index: 1001;");
        block.set("left", "");
        assert_eq!(block.get("left"), None);
        assert_eq!(block.len(), 2);
    }

    #[test]
    fn duplicates_in_source_keep_last_value() {
        let block = StyleDeclarations::parse("top: 1px; top: 9px");
        assert_eq!(block.get("top"), Some("9px"));
        assert_eq!(block.len(), 1);
    }
}
