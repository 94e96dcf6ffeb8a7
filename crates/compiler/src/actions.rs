use crate::options::CompileOptions;
use cash_markup::{Attribute, Node};

pub const ACTION: &str = "$action";

/// Rewrites `<form $action="name">` into a form posting to the action endpoint.
/// The directive is dropped; the other attributes keep their text and order
/// and the new `action`/`method` attributes follow them. A directive without
/// an action name is left as written.
pub fn rewrite_actions(nodes: &mut [Node], options: &CompileOptions) {
    for node in nodes {
        let Node::Element(el) = node else { continue };

        if el.is_named("form") {
            let target = el
                .attribute(ACTION)
                .and_then(|a| a.value.clone())
                .filter(|name| !name.is_empty());
            if let Some(name) = target {
                el.remove_attribute(ACTION);
                el.push_attribute(Attribute::new(
                    "action",
                    format!("{}{}", options.action_prefix, name),
                ));
                el.push_attribute(Attribute::new("method", options.action_method.clone()));
            }
        }
        rewrite_actions(&mut el.children, options);
    }
}
