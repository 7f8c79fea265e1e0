//! Kit configuration.
//!
//! Every field has a default matching the stock look of the behaviors, so a
//! configuration file only needs the keys it changes:
//!
//! ```json
//! { "z_index_base": 5000, "resize_handle": { "size_px": 16 } }
//! ```

use std::fs;
use std::path::Path;

use anyhow::{Context as _, Result};
use serde::Deserialize;

/// Settings shared by every element of one kit.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct KitConfig {
    /// Start a kit-local z-index counter at this value instead of sharing
    /// the process-wide one.
    pub z_index_base: Option<i64>,
    pub resize_handle: ResizeHandleConfig,
    pub drag: DragConfig,
}

/// Look of the generated corner handle.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResizeHandleConfig {
    /// Class marking the handle; drag never starts from inside it.
    pub class: String,
    /// Edge length in px.
    pub size_px: u32,
    pub z_index: i32,
    pub cursor: String,
}

/// Styles applied by the drag behavior.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DragConfig {
    /// `box-shadow` while a drag is in progress.
    pub lifted_shadow: String,
    pub transition: String,
}

impl Default for ResizeHandleConfig {
    fn default() -> Self {
        Self {
            class: "styler-resize-handle".to_owned(),
            size_px: 10,
            z_index: 10,
            cursor: "nwse-resize".to_owned(),
        }
    }
}

impl Default for DragConfig {
    fn default() -> Self {
        Self {
            lifted_shadow: "0 4px 12px rgba(0, 0, 0, 0.2)".to_owned(),
            transition: "box-shadow 0.2s ease".to_owned(),
        }
    }
}

impl Default for KitConfig {
    fn default() -> Self {
        Self {
            z_index_base: None,
            resize_handle: ResizeHandleConfig::default(),
            drag: DragConfig::default(),
        }
    }
}

impl KitConfig {
    /// Parse a JSON configuration; missing keys keep their defaults.
    ///
    /// # Errors
    /// Returns an error for malformed JSON or unknown keys.
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("invalid kit configuration")
    }

    /// Read and parse a JSON configuration file.
    ///
    /// # Errors
    /// Returns an error when the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read kit configuration {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("in {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, reason = "tests")]

    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config =
            KitConfig::from_json(r#"{ "z_index_base": 5000, "resize_handle": { "size_px": 16 } }"#)
                .unwrap();
        assert_eq!(config.z_index_base, Some(5000));
        assert_eq!(config.resize_handle.size_px, 16);
        assert_eq!(config.resize_handle.class, "styler-resize-handle");
        assert_eq!(config.drag, DragConfig::default());
    }

    #[test]
    fn empty_object_is_default() {
        assert_eq!(KitConfig::from_json("{}").unwrap(), KitConfig::default());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let error = KitConfig::from_json(r#"{ "zindex": 1 }"#).unwrap_err();
        assert!(format!("{error:#}").contains("unknown field"));
    }

    #[test]
    fn missing_file_reports_path() {
        let error = KitConfig::load("/nonexistent/domkit.json").unwrap_err();
        assert!(error.to_string().contains("/nonexistent/domkit.json"));
    }
}
