//! Binding scopes for directive evaluation.
//!
//! The root scope borrows the caller's bindings. Each loop iteration pushes a
//! frame that binds one more name on top of its parent; lookups walk frames
//! from the innermost outwards, so inner bindings shadow outer ones and the
//! caller's mapping is never copied or modified.
use cash_expr::Bindings;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy)]
pub struct Context<'a> {
    frame: Frame<'a>,
}

#[derive(Debug, Clone, Copy)]
enum Frame<'a> {
    Root(&'a Map<String, Value>),
    Bound {
        name: &'a str,
        value: &'a Value,
        parent: &'a Context<'a>,
    },
}

impl<'a> Context<'a> {
    pub fn new(bindings: &'a Map<String, Value>) -> Self {
        Self {
            frame: Frame::Root(bindings),
        }
    }

    /// A derived scope with `name` bound to `value`.
    pub fn bind<'b>(&'b self, name: &'b str, value: &'b Value) -> Context<'b>
    where
        'a: 'b,
    {
        Context {
            frame: Frame::Bound {
                name,
                value,
                parent: self,
            },
        }
    }

    pub fn get(&self, name: &str) -> Option<&'a Value> {
        match self.frame {
            Frame::Root(bindings) => bindings.get(name),
            Frame::Bound {
                name: bound,
                value,
                parent,
            } => {
                if bound == name {
                    Some(value)
                } else {
                    parent.get(name)
                }
            }
        }
    }
}

impl Bindings for Context<'_> {
    fn lookup(&self, name: &str) -> Option<&Value> {
        self.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_derived_scope_shadows_without_mutating_parent() {
        let data = json!({ "x": 1, "y": 2 });
        let root = Context::new(data.as_object().unwrap());
        let shadow = json!("inner");
        let derived = root.bind("x", &shadow);

        assert_eq!(derived.get("x"), Some(&json!("inner")));
        assert_eq!(derived.get("y"), Some(&json!(2)));
        assert_eq!(root.get("x"), Some(&json!(1)));
        assert_eq!(derived.get("z"), None);
    }

    #[test]
    fn test_frames_chain() {
        let data = json!({});
        let root = Context::new(data.as_object().unwrap());
        let a = json!("a");
        let b = json!("b");
        let first = root.bind("item", &a);
        let second = first.bind("index", &b);
        assert_eq!(second.get("item"), Some(&a));
        assert_eq!(second.get("index"), Some(&b));
        assert_eq!(first.get("index"), None);
    }
}
