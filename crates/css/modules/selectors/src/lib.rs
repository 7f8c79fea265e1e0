//! Selectors Level 3: element matching.
//! Reference: <https://www.w3.org/TR/selectors-3/>
//!
//! The subset needed by element lookups:
//! - Type, class, id, attribute presence and attribute equals selectors
//! - Combinators: descendant, child, adjacent sibling, general sibling
//! - Comma-separated selector lists
//!
//! Pseudo-classes and pseudo-elements are rejected at parse time.

use core::error::Error;
use core::fmt;

mod matcher;
mod parser;

pub use matcher::{matches_complex, matches_compound, matches_selector_list};
pub use parser::{parse_complex_selector, parse_selector_list};

/// An adapter that abstracts DOM access for selector matching.
///
/// Selectors 3 references:
/// - Section 3: Selectors overview and element matching
pub trait ElementAdapter {
    type Handle: Copy + Eq;

    /// Parent element if any. Non-element parents (the document) yield `None`.
    /// Selectors 3, section 11: Combinators (for tree relationships)
    fn parent(&self, element: Self::Handle) -> Option<Self::Handle>;

    /// Previous sibling element, skipping text and comment nodes.
    /// Selectors 3, section 11: Sibling combinators
    fn previous_sibling_element(&self, element: Self::Handle) -> Option<Self::Handle>;

    /// Tag name in ASCII lowercase.
    /// Selectors 3, section 5: Type selectors
    fn tag_name(&self, element: Self::Handle) -> &str;

    /// Returns Some(id) if the element has an id attribute.
    /// Selectors 3, section 7: ID selectors
    fn element_id(&self, element: Self::Handle) -> Option<&str>;

    /// True if the element has the given class token.
    /// Selectors 3, section 6: Class selectors
    fn has_class(&self, element: Self::Handle, class: &str) -> bool;

    /// Returns the attribute value if present.
    /// Selectors 3, section 8: Attribute selectors
    fn attr(&self, element: Self::Handle, name: &str) -> Option<&str>;
}

/// Simple selectors (subset).
/// Selectors 3, section 5, 6, 7, 8
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum SimpleSelector {
    /// Selectors 3, section 5: Type selectors
    Type(String),
    /// Selectors 3, section 6: Class selectors
    Class(String),
    /// Selectors 3, section 7: ID selectors
    IdSelector(String),
    /// Selectors 3, section 8: `[attr]`
    AttrExists(String),
    /// Selectors 3, section 8: `[attr=value]`
    AttrEquals { name: String, value: String },
    /// Selectors 3, section 5: Universal selector
    Universal,
}

/// A sequence of simple selectors with no combinators.
/// Selectors 3, section 5: Simple selector sequences
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct CompoundSelector {
    pub simples: Vec<SimpleSelector>,
}

/// Selectors 3, section 11: Combinators
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Combinator {
    Descendant,
    Child,
    AdjacentSibling,
    GeneralSibling,
}

/// One or more compounds separated by combinators, written left to right.
/// Each entry of `rest` carries the combinator that joins it to the
/// compound on its left.
/// Selectors 3, section 3, 11
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct ComplexSelector {
    pub first: CompoundSelector,
    pub rest: Vec<(Combinator, CompoundSelector)>,
}

/// Selectors 3, section 4: Groups of selectors
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct SelectorList {
    pub selectors: Vec<ComplexSelector>,
}

/// Reason a selector string was rejected.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SelectorError {
    /// The input (or one list item) was empty.
    Empty,
    /// A byte the parser does not understand, with its offset.
    UnexpectedChar { offset: usize, found: char },
    /// A combinator with nothing on one side.
    DanglingCombinator,
    /// `[` without a closing `]`, or an empty attribute name.
    MalformedAttribute,
}

impl fmt::Display for SelectorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "empty selector"),
            Self::UnexpectedChar { offset, found } => {
                write!(f, "unexpected '{found}' at offset {offset}")
            }
            Self::DanglingCombinator => write!(f, "combinator without operand"),
            Self::MalformedAttribute => write!(f, "malformed attribute selector"),
        }
    }
}

impl Error for SelectorError {}
