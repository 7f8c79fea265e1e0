//! Box geometry derived from inline style.
//!
//! There is no layout engine. A box's size is its inline `width`/`height`
//! and its position is the sum of inline `left`/`top` offsets along the
//! element ancestor chain. Anything that is not a pixel length counts as 0.

use indextree::NodeId;

use crate::Document;

/// Axis-aligned box in client pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(left: i32, top: i32, width: i32, height: i32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub const fn right(&self) -> i32 {
        self.left.saturating_add(self.width)
    }

    pub const fn bottom(&self) -> i32 {
        self.top.saturating_add(self.height)
    }

    pub const fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.left && x < self.right() && y >= self.top && y < self.bottom()
    }
}

/// Resolved positioning values of one element.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ComputedStyle {
    pub position: String,
    pub left: i32,
    pub top: i32,
    pub width: i32,
    pub height: i32,
}

/// Integer pixel value of a CSS length: `"12px"` and `"12.9px"` give 12,
/// `"-3px"` gives -3. Other units, keywords and garbage give 0.
pub fn parse_px(value: &str) -> i32 {
    let trimmed = value.trim();
    let number = trimmed.strip_suffix("px").unwrap_or(trimmed).trim_end();
    if number.is_empty()
        || !number
            .chars()
            .all(|character| character.is_ascii_digit() || matches!(character, '-' | '+' | '.'))
    {
        return 0;
    }
    let (negative, digits) = match number.as_bytes().first() {
        Some(b'-') => (true, number.get(1..).unwrap_or_default()),
        Some(b'+') => (false, number.get(1..).unwrap_or_default()),
        _ => (false, number),
    };
    let mut magnitude: i32 = 0;
    for byte in digits.bytes().take_while(u8::is_ascii_digit) {
        magnitude = magnitude
            .saturating_mul(10)
            .saturating_add(i32::from(byte - b'0'));
    }
    if negative { magnitude.saturating_neg() } else { magnitude }
}

impl Document {
    /// Positioning values from the inline style of `node`; `None` for
    /// non-elements. `position` falls back to `static`.
    pub fn computed_style(&self, node: NodeId) -> Option<ComputedStyle> {
        let state = self.state();
        let style = state.element(node)?.style();
        let length = |name: &str| style.get(name).map_or(0, parse_px);
        Some(ComputedStyle {
            position: style
                .get("position")
                .filter(|value| !value.is_empty())
                .unwrap_or("static")
                .to_owned(),
            left: length("left"),
            top: length("top"),
            width: length("width"),
            height: length("height"),
        })
    }

    /// Client box of `node`: its own size, offset by the `left`/`top` of it
    /// and every element ancestor.
    pub fn bounding_client_rect(&self, node: NodeId) -> Rect {
        let Some(own) = self.computed_style(node) else {
            return Rect::default();
        };
        let mut rect = Rect::new(own.left, own.top, own.width, own.height);
        let mut current = self.parent_element(node);
        while let Some(ancestor) = current {
            if let Some(style) = self.computed_style(ancestor) {
                rect.left = rect.left.saturating_add(style.left);
                rect.top = rect.top.saturating_add(style.top);
            }
            current = self.parent_element(ancestor);
        }
        rect
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, reason = "tests")]

    use super::*;

    #[test]
    fn px_values_follow_integer_prefix() {
        assert_eq!(parse_px("120px"), 120);
        assert_eq!(parse_px(" 12.9px "), 12);
        assert_eq!(parse_px("-40px"), -40);
        assert_eq!(parse_px("15"), 15);
        assert_eq!(parse_px("auto"), 0);
        assert_eq!(parse_px("50%"), 0);
        assert_eq!(parse_px("2em"), 0);
        assert_eq!(parse_px(""), 0);
    }

    #[test]
    fn computed_style_defaults() {
        let doc = Document::new();
        let node = doc.create_element("div");
        doc.set_attribute(node, "style", "width: 200px; height: auto").unwrap();
        let style = doc.computed_style(node).unwrap();
        assert_eq!(style.position, "static");
        assert_eq!((style.width, style.height, style.left), (200, 0, 0));
        assert!(doc.computed_style(doc.create_text_node("x")).is_none());
    }

    #[test]
    fn bounding_rect_accumulates_ancestor_offsets() {
        let doc = Document::new();
        let outer = doc.create_element("div");
        let inner = doc.create_element("div");
        doc.append_child(doc.body(), outer).unwrap();
        doc.append_child(outer, inner).unwrap();
        doc.set_attribute(outer, "style", "position: absolute; left: 100px; top: 50px").unwrap();
        doc.set_attribute(inner, "style", "left: 10px; top: 5px; width: 30px; height: 20px")
            .unwrap();
        let rect = doc.bounding_client_rect(inner);
        assert_eq!(rect, Rect::new(110, 55, 30, 20));
        assert!(rect.contains(110, 55));
        assert!(!rect.contains(140, 55));
    }
}
