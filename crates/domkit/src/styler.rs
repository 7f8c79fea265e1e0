//! Style configuration: literal style properties mixed with behavior
//! directives.
//!
//! Two keys are reserved. `drag` set to `true` makes the element draggable
//! by its whole box, set to a string it makes it draggable by the first
//! descendant matching that selector. `resize` set to `true` adds a corner
//! resize handle. Other values of the reserved keys are ignored. Every
//! other key is written to the inline style as is.

use core::fmt;

use anyhow::Context as _;
use dom::NodeId;
use log::{debug, warn};
use serde::de::{self, Deserialize, Deserializer, MapAccess, Visitor};

use crate::behavior::drag::enable_drag;
use crate::behavior::front::enable_front_bring;
use crate::behavior::resize::enable_resize;
use crate::context::KitContext;

const DRAG_KEY: &str = "drag";
const RESIZE_KEY: &str = "resize";

/// Value of one configuration entry.
#[derive(Clone, Debug, PartialEq)]
pub enum StyleValue {
    Flag(bool),
    Text(String),
    Number(f64),
}

impl StyleValue {
    /// The value as written into a style declaration.
    pub fn to_css(&self) -> String {
        match self {
            Self::Flag(flag) => flag.to_string(),
            Self::Text(text) => text.clone(),
            Self::Number(number) => number.to_string(),
        }
    }
}

impl From<bool> for StyleValue {
    fn from(flag: bool) -> Self {
        Self::Flag(flag)
    }
}

impl From<&str> for StyleValue {
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

impl From<String> for StyleValue {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<f64> for StyleValue {
    fn from(number: f64) -> Self {
        Self::Number(number)
    }
}

impl From<i32> for StyleValue {
    fn from(number: i32) -> Self {
        Self::Number(f64::from(number))
    }
}

/// Ordered property-to-value mapping. Entries are applied in insertion
/// order; inserting an existing key replaces its value in place.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StyleConfig {
    entries: Vec<(String, StyleValue)>,
}

impl StyleConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`StyleConfig::insert`].
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<StyleValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<StyleValue>) {
        let key = key.into();
        let value = value.into();
        let Some(entry) = self.entries.iter_mut().find(|(existing, _)| *existing == key) else {
            self.entries.push((key, value));
            return;
        };
        entry.1 = value;
    }

    pub fn get(&self, key: &str) -> Option<&StyleValue> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &StyleValue)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Parse a JSON object such as `{"color": "red", "drag": true}`.
    ///
    /// # Errors
    /// Returns an error when the text is not a JSON object of booleans,
    /// strings and numbers.
    pub fn from_json(text: &str) -> anyhow::Result<Self> {
        serde_json::from_str(text).context("invalid style configuration")
    }
}

impl<K, V> FromIterator<(K, V)> for StyleConfig
where
    K: Into<String>,
    V: Into<StyleValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut config = Self::new();
        for (key, value) in iter {
            config.insert(key, value);
        }
        config
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for StyleConfig
where
    K: Into<String>,
    V: Into<StyleValue>,
{
    fn from(entries: [(K, V); N]) -> Self {
        entries.into_iter().collect()
    }
}

struct StyleValueVisitor;

impl Visitor<'_> for StyleValueVisitor {
    type Value = StyleValue;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a boolean, string or number")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<StyleValue, E> {
        Ok(StyleValue::Flag(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<StyleValue, E> {
        Ok(StyleValue::Number(v as f64))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<StyleValue, E> {
        Ok(StyleValue::Number(v as f64))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<StyleValue, E> {
        Ok(StyleValue::Number(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<StyleValue, E> {
        Ok(StyleValue::Text(v.to_owned()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<StyleValue, E> {
        Ok(StyleValue::Text(v))
    }
}

impl<'de> Deserialize<'de> for StyleValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(StyleValueVisitor)
    }
}

struct StyleConfigVisitor;

impl<'de> Visitor<'de> for StyleConfigVisitor {
    type Value = StyleConfig;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a map of style properties")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<StyleConfig, A::Error> {
        let mut config = StyleConfig::new();
        while let Some((key, value)) = map.next_entry::<String, StyleValue>()? {
            config.insert(key, value);
        }
        Ok(config)
    }
}

impl<'de> Deserialize<'de> for StyleConfig {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(StyleConfigVisitor)
    }
}

/// Apply `config` to `owner`, then attach front-bring.
pub(crate) fn apply_styles(context: &KitContext, owner: NodeId, config: &StyleConfig) {
    let document = &context.document;
    for (key, value) in config.iter() {
        match (key, value) {
            (DRAG_KEY, StyleValue::Flag(true)) => {
                enable_drag(context, owner, None);
            }
            (DRAG_KEY, StyleValue::Text(selector)) => {
                enable_drag(context, owner, Some(selector.as_str()));
            }
            (RESIZE_KEY, StyleValue::Flag(true)) => {
                enable_resize(context, owner);
            }
            (DRAG_KEY | RESIZE_KEY, ignored) => {
                debug!(target: "domkit::styler", "ignoring {key} = {ignored:?}");
            }
            (property, literal) => {
                if let Err(error) = document.set_style_property(owner, property, &literal.to_css()) {
                    warn!(target: "domkit::styler", "cannot set {property} on {owner}: {error}");
                }
            }
        }
    }
    enable_front_bring(context, owner);
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, reason = "tests")]
    #![allow(clippy::assertions_on_result_states, reason = "tests")]

    use super::*;

    #[test]
    fn json_keeps_document_order() {
        let config =
            StyleConfig::from_json(r#"{"zIndex": 3, "drag": ".title", "color": "red", "resize": true}"#)
                .unwrap();
        let keys: Vec<&str> = config.iter().map(|(key, _)| key).collect();
        assert_eq!(keys, ["zIndex", "drag", "color", "resize"]);
        assert_eq!(config.get("zIndex"), Some(&StyleValue::Number(3.0)));
        assert_eq!(config.get("drag"), Some(&StyleValue::Text(".title".to_owned())));
    }

    #[test]
    fn json_rejects_nested_values() {
        assert!(StyleConfig::from_json(r#"{"color": {"r": 1}}"#).is_err());
        assert!(StyleConfig::from_json("[1, 2]").is_err());
    }

    #[test]
    fn insert_replaces_in_place() {
        let mut config = StyleConfig::from([("color", "red"), ("left", "1px")]);
        config.insert("color", "blue");
        assert_eq!(config.len(), 2);
        assert_eq!(config.iter().next(), Some(("color", &StyleValue::from("blue"))));
    }

    #[test]
    fn numbers_render_like_script_numbers() {
        assert_eq!(StyleValue::from(3).to_css(), "3");
        assert_eq!(StyleValue::from(0.5).to_css(), "0.5");
        assert_eq!(StyleValue::from(true).to_css(), "true");
    }
}
