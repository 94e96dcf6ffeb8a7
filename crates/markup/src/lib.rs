//! Lossless parsing of HTML-like template markup into an element tree.
//!
//! The tree keeps the source text of every tag and attribute, so directive
//! passes can edit individual elements and attributes while everything they
//! do not touch renders back byte-for-byte.

pub mod error;
pub mod node;
pub mod tokenizer;
pub mod tree;

pub use error::MarkupError;
pub use node::{Attribute, Element, Node, render_nodes};
pub use tokenizer::{Token, tokenize};
pub use tree::{Document, MAX_DEPTH};
