//! `{$expr}` placeholders in text and attribute values.
use crate::context::Context;
use crate::escape::escape_html;
use crate::render::Renderer;
use cash_markup::Node;

const OPEN: &str = "{$";

impl Renderer<'_> {
    /// Substitutes placeholders throughout the tree. Comments and other
    /// [`Node::Raw`] content are left untouched.
    pub fn interpolate(&self, nodes: &mut [Node], ctx: &Context) {
        for node in nodes {
            match node {
                Node::Text(text) => {
                    if let Some(rendered) = self.interpolate_text(text, ctx) {
                        *text = rendered;
                    }
                }
                Node::Element(el) => {
                    for attr in &mut el.attributes {
                        let Some(value) = &attr.value else { continue };
                        if let Some(rendered) = self.interpolate_text(value, ctx) {
                            // A substituted value may contain spaces.
                            if attr.quote.is_none() {
                                attr.quote = Some('"');
                            }
                            attr.value = Some(rendered);
                        }
                    }
                    self.interpolate(&mut el.children, ctx);
                }
                Node::Raw(_) => {}
            }
        }
    }

    /// Returns the text with every placeholder replaced, or `None` if it
    /// contains none.
    pub fn interpolate_text(&self, text: &str, ctx: &Context) -> Option<String> {
        if !text.contains(OPEN) {
            return None;
        }

        let mut out = String::with_capacity(text.len());
        let mut rest = text;
        while let Some(start) = rest.find(OPEN) {
            let body_start = start + OPEN.len();
            let Some(len) = rest[body_start..].find('}') else {
                break;
            };
            out.push_str(&rest[..start]);
            let body = &rest[body_start..body_start + len];
            if body.is_empty() {
                out.push_str("{$}");
            } else {
                out.push_str(&self.placeholder(body.trim(), ctx));
            }
            rest = &rest[body_start + len + 1..];
        }
        out.push_str(rest);
        Some(out)
    }

    fn placeholder(&self, expr: &str, ctx: &Context) -> String {
        match self.evaluate(expr, ctx) {
            Ok(value) => escape_html(&value),
            Err(e) => {
                log::debug!("{{${}}} rendered empty: {}", expr, e);
                String::new()
            }
        }
    }
}
