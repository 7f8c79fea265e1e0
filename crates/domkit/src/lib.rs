#![allow(
    clippy::missing_inline_in_public_items,
    reason = "Inlining decisions left to compiler for this crate"
)]
//! Convenience layer over a [`dom::Document`]: element lookup, a chainable
//! element facade, and pointer-driven drag and resize behaviors.
//!
//! ```no_run
//! use domkit::{Kit, StyleConfig};
//!
//! let kit = Kit::default();
//! let window = kit.create("div");
//! window
//!     .set_html("<div class=\"title\">Notes</div><p>...</p>")
//!     .append_to(&kit.body())
//!     .styles(
//!         &StyleConfig::new()
//!             .with("left", "40px")
//!             .with("width", "200px")
//!             .with("drag", ".title")
//!             .with("resize", true),
//!     );
//! ```

extern crate alloc;

mod behavior;
mod config;
mod context;
mod element;
mod error;
mod kit;
mod styler;
mod zindex;

pub use config::{DragConfig, KitConfig, ResizeHandleConfig};
pub use element::{Element, NodeRef, Target};
pub use error::NotFound;
pub use kit::Kit;
pub use styler::{StyleConfig, StyleValue};
pub use zindex::{CounterZIndex, DEFAULT_Z_INDEX_BASE, GlobalZIndex, ZIndexAllocator};
