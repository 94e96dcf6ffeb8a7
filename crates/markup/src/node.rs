//! The element tree. Every node keeps enough of its source text that
//! rendering an untouched tree reproduces the input exactly.

/// Elements that never have children or an end tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Elements whose content is text up to the matching end tag.
pub(crate) const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style", "textarea", "title"];

pub(crate) fn is_void(name: &str) -> bool {
    VOID_ELEMENTS.iter().any(|v| v.eq_ignore_ascii_case(name))
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
    /// Markup that is emitted as-is and never processed again: comments,
    /// declarations, stray end tags, or output that is already rendered.
    Raw(String),
}

impl Node {
    pub fn render(&self, out: &mut String) {
        match self {
            Node::Element(el) => el.render(out),
            Node::Text(text) | Node::Raw(text) => out.push_str(text),
        }
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(el) => Some(el),
            _ => None,
        }
    }
}

/// Renders a sequence of sibling nodes.
pub fn render_nodes(nodes: &[Node]) -> String {
    let mut out = String::new();
    for node in nodes {
        node.render(&mut out);
    }
    out
}

/// A single attribute of a start tag, split into the pieces needed to write
/// it back unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Whitespace preceding the name.
    pub leading: String,
    pub name: String,
    /// Text between the name and the value, e.g. `=` or ` = `.
    pub assign: String,
    pub quote: Option<char>,
    pub value: Option<String>,
}

impl Attribute {
    /// A double-quoted `name="value"` attribute. `value` is written as given.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            leading: " ".to_string(),
            name: name.into(),
            assign: "=".to_string(),
            quote: Some('"'),
            value: Some(value.into()),
        }
    }

    pub fn render(&self, out: &mut String) {
        out.push_str(&self.leading);
        out.push_str(&self.name);
        if let Some(value) = &self.value {
            out.push_str(&self.assign);
            if let Some(q) = self.quote {
                out.push(q);
            }
            out.push_str(value);
            if let Some(q) = self.quote {
                out.push(q);
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    /// Tag name as written in the source.
    pub name: String,
    pub attributes: Vec<Attribute>,
    /// Whitespace between the last attribute and the closing `>` or `/>`.
    pub tail: String,
    pub self_closing: bool,
    pub children: Vec<Node>,
    /// The end tag as written, if one was found.
    pub end_tag: Option<String>,
    /// Byte offset of the start tag in the parsed source.
    pub offset: usize,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            tail: String::new(),
            self_closing: false,
            children: Vec::new(),
            end_tag: None,
            offset: 0,
        }
    }

    pub fn is_void(&self) -> bool {
        is_void(&self.name)
    }

    /// True if the element is structurally complete: a void or self-closing
    /// element, or one whose end tag was found.
    pub fn is_complete(&self) -> bool {
        self.is_void() || self.self_closing || self.end_tag.is_some()
    }

    pub fn is_named(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }

    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attribute(name).is_some()
    }

    /// Removes the first attribute called `name`, keeping the others in order.
    pub fn remove_attribute(&mut self, name: &str) -> Option<Attribute> {
        let idx = self.attributes.iter().position(|a| a.name == name)?;
        Some(self.attributes.remove(idx))
    }

    pub fn push_attribute(&mut self, attribute: Attribute) {
        self.attributes.push(attribute);
    }

    pub fn render_start_tag(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.name);
        for attr in &self.attributes {
            attr.render(out);
        }
        out.push_str(&self.tail);
        if self.self_closing {
            out.push('/');
        }
        out.push('>');
    }

    pub fn render(&self, out: &mut String) {
        self.render_start_tag(out);
        for child in &self.children {
            child.render(out);
        }
        if let Some(end_tag) = &self.end_tag {
            out.push_str(end_tag);
        }
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.render(&mut out);
        out
    }
}
