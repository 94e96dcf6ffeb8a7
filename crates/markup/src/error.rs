use thiserror::Error;

/// Structural problems found while building the element tree. None of them
/// stop parsing; the affected markup is kept verbatim.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MarkupError {
    #[error("<{name}> opened at byte {offset} has no matching end tag")]
    UnclosedElement { name: String, offset: usize },

    #[error("End tag </{name}> at byte {offset} does not close any open element")]
    StrayEndTag { name: String, offset: usize },

    #[error("<{name}> at byte {offset} is nested deeper than {limit} elements; deeper tags are kept as text")]
    TooDeep {
        name: String,
        offset: usize,
        limit: usize,
    },
}
