//! `$for="$item in <expr>"`: repeats an element once per item.
use crate::context::Context;
use crate::error::CompileError;
use crate::render::Renderer;
use cash_markup::{Element, Node};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

pub const FOR: &str = "$for";

static LOOP_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*\$([A-Za-z_]\w*)(?:\s*,\s*\$([A-Za-z_]\w*))?\s+in\s+([\s\S]+)$")
        .expect("valid loop directive regex")
});

/// A parsed `$for` directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoopDirective {
    /// Name bound to the current item.
    pub item: String,
    /// Optional name bound to the zero-based position.
    pub index: Option<String>,
    /// The iterable expression, still carrying its sigils.
    pub source: String,
}

impl LoopDirective {
    pub fn parse(directive: &str) -> Result<Self, CompileError> {
        let caps = LOOP_RE
            .captures(directive)
            .ok_or_else(|| CompileError::InvalidLoop(directive.to_string()))?;
        Ok(Self {
            item: caps[1].to_string(),
            index: caps.get(2).map(|m| m.as_str().to_string()),
            source: caps[3].trim().to_string(),
        })
    }
}

impl Renderer<'_> {
    /// Replaces every complete element carrying a valid `$for` with its
    /// rendered repetitions.
    ///
    /// Each repetition renders a copy of the element (directive removed) with
    /// the full pass sequence in a scope binding the loop variable: loops
    /// nested in the body expand too, and a `$if` on the element itself
    /// filters individual items. The output replaces the element as
    /// [`Node::Raw`], so later passes leave it alone.
    pub fn expand_loops(&self, nodes: Vec<Node>, ctx: &Context) -> Vec<Node> {
        let mut out = Vec::with_capacity(nodes.len());
        for node in nodes {
            let Node::Element(mut el) = node else {
                out.push(node);
                continue;
            };

            if let Some(directive) = el.attribute(FOR).and_then(|a| a.value.clone()) {
                match LoopDirective::parse(&directive) {
                    Ok(parsed) if el.is_complete() => {
                        el.remove_attribute(FOR);
                        out.push(Node::Raw(self.render_loop(&el, &parsed, ctx)));
                        continue;
                    }
                    Ok(_) => {
                        log::debug!("<{}> has no end tag; leaving its $for in place", el.name);
                    }
                    Err(e) => log::warn!("{}", e),
                }
            }

            el.children = self.expand_loops(std::mem::take(&mut el.children), ctx);
            out.push(Node::Element(el));
        }
        out
    }

    fn render_loop(&self, el: &Element, directive: &LoopDirective, ctx: &Context) -> String {
        let mut out = String::new();
        for (position, item) in self.iterable(&directive.source, ctx).iter().enumerate() {
            let item_ctx = ctx.bind(&directive.item, item);
            let body = vec![Node::Element(el.clone())];
            let rendered = match &directive.index {
                Some(index_name) => {
                    let index = Value::from(position);
                    let index_ctx = item_ctx.bind(index_name, &index);
                    self.render_to_string(body, &index_ctx)
                }
                None => self.render_to_string(body, &item_ctx),
            };
            out.push_str(&rendered);
        }
        out
    }

    /// Evaluates a loop source into its items. Lists iterate their elements
    /// and strings their characters; anything else, or a failed evaluation,
    /// iterates nothing.
    fn iterable(&self, source: &str, ctx: &Context) -> Vec<Value> {
        match self.evaluate(source, ctx) {
            Ok(Value::Array(items)) => items,
            Ok(Value::String(s)) => s.chars().map(|c| Value::String(c.to_string())).collect(),
            Ok(other) => {
                log::debug!("$for source '{}' is not iterable: {}", source, other);
                Vec::new()
            }
            Err(e) => {
                log::debug!("$for source '{}' treated as empty: {}", source, e);
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cash_expr::FunctionRegistry;
    use cash_markup::{Document, render_nodes};
    use serde_json::json;

    fn expand(source: &str, data: Value) -> String {
        let functions = FunctionRegistry::default();
        let renderer = Renderer::new(&functions);
        let bindings = data.as_object().cloned().unwrap_or_default();
        let ctx = Context::new(&bindings);
        render_nodes(&renderer.expand_loops(Document::parse(source).nodes, &ctx))
    }

    #[test]
    fn test_parse_directive() {
        assert_eq!(
            LoopDirective::parse("$row in $table.rows").unwrap(),
            LoopDirective {
                item: "row".into(),
                index: None,
                source: "$table.rows".into(),
            }
        );
        let with_index = LoopDirective::parse(" $x, $i in items ").unwrap();
        assert_eq!(with_index.index.as_deref(), Some("i"));
        assert_eq!(with_index.source, "items");
        assert!(LoopDirective::parse("x in items").is_err());
        assert!(LoopDirective::parse("$x of items").is_err());
    }

    #[test]
    fn test_repeats_in_order() {
        assert_eq!(
            expand(r#"<li $for="$x in items">{$x}</li>"#, json!({ "items": ["a", "b"] })),
            "<li>a</li><li>b</li>"
        );
    }

    #[test]
    fn test_loop_variable_reaches_attributes_and_conditionals() {
        let source = r#"<li $for="$t in $todos" class="{$t.state}"><s $if="$t.done">{$t.name}</s></li>"#;
        let data = json!({ "todos": [
            { "name": "a", "state": "open", "done": false },
            { "name": "b", "state": "closed", "done": true },
        ]});
        assert_eq!(
            expand(source, data),
            r#"<li class="open"></li><li class="closed"><s>b</s></li>"#
        );
    }

    #[test]
    fn test_if_on_loop_element_filters_items() {
        let source = r#"<i $for="$n in nums" $if="$n % 2 == 0">{$n}</i>"#;
        assert_eq!(
            expand(source, json!({ "nums": [1, 2, 3, 4] })),
            "<i>2</i><i>4</i>"
        );
    }

    #[test]
    fn test_nested_loops_expand_fully() {
        let source = r#"<tr $for="$row in rows"><td $for="$cell in $row">{$cell}</td></tr>"#;
        assert_eq!(
            expand(source, json!({ "rows": [[1, 2], [3]] })),
            "<tr><td>1</td><td>2</td></tr><tr><td>3</td></tr>"
        );
    }

    #[test]
    fn test_index_binding_and_shadowing() {
        let source = r#"<b $for="$name, $i in names">{$i}:{$name} </b>"#;
        assert_eq!(
            expand(source, json!({ "names": ["x", "y"], "name": "outer" })),
            "<b>0:x </b><b>1:y </b>"
        );
    }

    #[test]
    fn test_strings_iterate_characters_other_values_iterate_nothing() {
        assert_eq!(
            expand(r#"<b $for="$c in word">{$c}</b>"#, json!({ "word": "hi" })),
            "<b>h</b><b>i</b>"
        );
        assert_eq!(expand(r#"<b $for="$c in n">{$c}</b>|"#, json!({ "n": 5 })), "|");
        assert_eq!(expand(r#"<b $for="$c in missing">{$c}</b>|"#, json!({})), "|");
    }

    #[test]
    fn test_malformed_directive_is_left_in_place() {
        let source = r#"<ul $for="items"><li $for="$x in xs">{$x}</li></ul>"#;
        assert_eq!(
            expand(source, json!({ "xs": [1] })),
            r#"<ul $for="items"><li>1</li></ul>"#
        );
    }
}
