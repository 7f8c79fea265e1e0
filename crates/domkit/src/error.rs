use core::error::Error;
use core::fmt;

use dom::SelectorError;

/// A single-element lookup came back empty.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NotFound {
    /// No connected element carries this id.
    Id(String),
    /// The selector is valid but matched nothing.
    Selector(String),
    /// The selector could not be parsed, so nothing can match it.
    InvalidSelector {
        selector: String,
        error: SelectorError,
    },
}

impl fmt::Display for NotFound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "no element with id {id:?}"),
            Self::Selector(selector) => write!(f, "no element matches {selector:?}"),
            Self::InvalidSelector { selector, error } => {
                write!(f, "invalid selector {selector:?}: {error}")
            }
        }
    }
}

impl Error for NotFound {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidSelector { error, .. } => Some(error),
            Self::Id(_) | Self::Selector(_) => None,
        }
    }
}
