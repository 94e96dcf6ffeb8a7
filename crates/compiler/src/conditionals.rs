//! `$if="<expr>"`: keeps an element when its condition is truthy.
use crate::context::Context;
use crate::render::Renderer;
use cash_expr::is_truthy;
use cash_markup::Node;

pub const IF: &str = "$if";

impl Renderer<'_> {
    /// Resolves every complete element carrying `$if`. A falsy condition drops
    /// the element with all of its content; a truthy one keeps it without the
    /// directive. Children are expanded recursively either way.
    ///
    /// Elements missing their end tag keep the directive as written.
    pub fn expand_conditionals(&self, nodes: Vec<Node>, ctx: &Context) -> Vec<Node> {
        let mut out = Vec::with_capacity(nodes.len());
        for node in nodes {
            let Node::Element(mut el) = node else {
                out.push(node);
                continue;
            };

            if el.has_attribute(IF) {
                if el.is_complete() {
                    let condition = el
                        .remove_attribute(IF)
                        .and_then(|attr| attr.value)
                        .unwrap_or_default();
                    if !self.condition(&condition, ctx) {
                        continue;
                    }
                } else {
                    log::debug!("<{}> has no end tag; leaving its $if in place", el.name);
                }
            }

            el.children = self.expand_conditionals(std::mem::take(&mut el.children), ctx);
            out.push(Node::Element(el));
        }
        out
    }

    fn condition(&self, expr: &str, ctx: &Context) -> bool {
        match self.evaluate(expr, ctx) {
            Ok(value) => is_truthy(&value),
            Err(e) => {
                log::debug!("$if=\"{}\" treated as false: {}", expr, e);
                false
            }
        }
    }
}
