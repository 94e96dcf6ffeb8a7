//! Builds an element tree from the token stream.
//!
//! End tags are matched structurally: `</div>` closes the innermost open
//! `<div>`, however deeply elements of the same name are nested. Elements
//! left open by a mismatched or missing end tag stay in the tree without an
//! end tag and are reported in [`Document::problems`].
//!
//! At most [`MAX_DEPTH`] elements are open at once. Tags nested deeper are
//! kept verbatim as [`Node::Raw`] and their content is attached to the
//! deepest open element.
use crate::error::MarkupError;
use crate::node::{Element, Node, render_nodes};
use crate::tokenizer::{Token, tokenize};

pub const MAX_DEPTH: usize = 256;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    pub nodes: Vec<Node>,
    pub problems: Vec<MarkupError>,
}

impl Document {
    pub fn parse(source: &str) -> Self {
        let mut builder = TreeBuilder::default();
        for token in tokenize(source) {
            builder.push(token);
        }
        builder.finish()
    }

    pub fn render(&self) -> String {
        render_nodes(&self.nodes)
    }
}

#[derive(Default)]
struct TreeBuilder {
    root: Vec<Node>,
    open: Vec<Element>,
    /// Names of start tags past the depth limit that are still awaiting their end tag.
    overflow: Vec<String>,
    problems: Vec<MarkupError>,
}

impl TreeBuilder {
    fn append(&mut self, node: Node) {
        match self.open.last_mut() {
            Some(parent) => parent.children.push(node),
            None => self.root.push(node),
        }
    }

    /// Pops the innermost open element into its parent without an end tag.
    fn close_unmatched(&mut self) {
        if let Some(el) = self.open.pop() {
            self.problems.push(MarkupError::UnclosedElement {
                name: el.name.clone(),
                offset: el.offset,
            });
            self.append(Node::Element(el));
        }
    }

    fn push(&mut self, token: Token) {
        match token {
            Token::StartTag {
                name,
                attributes,
                tail,
                self_closing,
                offset,
            } => {
                let el = Element {
                    name,
                    attributes,
                    tail,
                    self_closing,
                    children: Vec::new(),
                    end_tag: None,
                    offset,
                };
                if el.is_void() || el.self_closing {
                    self.append(Node::Element(el));
                } else if self.open.len() >= MAX_DEPTH {
                    self.overflow_start(el);
                } else {
                    self.open.push(el);
                }
            }
            Token::EndTag { name, raw, .. }
                if self
                    .overflow
                    .last()
                    .is_some_and(|open| open.eq_ignore_ascii_case(&name)) =>
            {
                self.overflow.pop();
                self.append(Node::Raw(raw));
            }
            Token::EndTag { name, raw, offset } => {
                let matching = self.open.iter().rposition(|el| el.is_named(&name));
                match matching {
                    Some(idx) => {
                        while self.open.len() > idx + 1 {
                            self.close_unmatched();
                        }
                        if let Some(mut el) = self.open.pop() {
                            el.end_tag = Some(raw);
                            self.append(Node::Element(el));
                        }
                    }
                    None => {
                        self.problems.push(MarkupError::StrayEndTag { name, offset });
                        self.append(Node::Raw(raw));
                    }
                }
            }
            Token::Text(text) => self.append(Node::Text(text)),
            Token::Raw(raw) => self.append(Node::Raw(raw)),
        }
    }

    fn overflow_start(&mut self, el: Element) {
        if self.overflow.is_empty() {
            self.problems.push(MarkupError::TooDeep {
                name: el.name.clone(),
                offset: el.offset,
                limit: MAX_DEPTH,
            });
        }
        let mut start_tag = String::new();
        el.render_start_tag(&mut start_tag);
        self.overflow.push(el.name);
        self.append(Node::Raw(start_tag));
    }

    fn finish(mut self) -> Document {
        while !self.open.is_empty() {
            self.close_unmatched();
        }
        Document {
            nodes: self.root,
            problems: self.problems,
        }
    }
}
