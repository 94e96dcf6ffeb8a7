//! Extraction of the `$head { ... }` metadata block.
use crate::error::CompileError;
use crate::escape::escape_text;
use cash_expr::{
    EvaluationContext, FunctionRegistry, evaluate, parse_expression, to_display_string,
};
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::borrow::Cow;

static HEAD_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$head\s*\{").expect("valid head marker regex"));

/// Document head data declared by a template.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Head {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Attribute sets for `<meta>` tags, in declaration order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Vec<IndexMap<String, String>>>,
}

impl Head {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.meta.is_none()
    }

    /// Renders the `<title>` and `<meta>` tags, one per line.
    pub fn to_html(&self) -> String {
        let mut lines = Vec::new();
        if let Some(title) = self.title.as_deref().filter(|t| !t.is_empty()) {
            lines.push(format!("<title>{}</title>", escape_text(title)));
        }
        for attrs in self.meta.iter().flatten() {
            let rendered = attrs
                .iter()
                .map(|(name, value)| format!("{}=\"{}\"", name, escape_text(value)))
                .collect::<Vec<_>>()
                .join(" ");
            lines.push(format!("<meta {}>", rendered));
        }
        lines.join("\n")
    }
}

/// Splits the first `$head` block off `source`.
///
/// Returns the parsed metadata and the source with the block removed. A
/// block whose body is not valid metadata is still removed and yields an
/// empty `Head`; a source without a block passes through unchanged.
pub fn extract_head(source: &str) -> (Head, Cow<'_, str>) {
    let Some(marker) = HEAD_MARKER.find(source) else {
        return (Head::default(), Cow::Borrowed(source));
    };
    let open = marker.end() - 1;

    let close = match matching_brace(source, open) {
        Ok(close) => close,
        Err(e) => {
            log::warn!("{}; leaving it in place", e);
            return (Head::default(), Cow::Borrowed(source));
        }
    };

    let head = parse_head(&source[open..=close]).unwrap_or_else(|e| {
        log::warn!("Ignoring $head block: {}", e);
        Head::default()
    });

    let mut rest = String::with_capacity(source.len());
    rest.push_str(&source[..marker.start()]);
    rest.push_str(&source[close + 1..]);
    (head, Cow::Owned(rest))
}

/// Finds the `}` closing the `{` at byte `open`, skipping braces inside
/// string literals.
fn matching_brace(source: &str, open: usize) -> Result<usize, CompileError> {
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for (idx, c) in source[open..].char_indices() {
        if let Some(q) = quote {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                _ if c == q => quote = None,
                _ => {}
            }
            continue;
        }
        match c {
            '"' | '\'' | '`' => quote = Some(c),
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Ok(open + idx);
                }
            }
            _ => {}
        }
    }
    Err(CompileError::UnterminatedHead(open))
}

/// Parses an object literal (braces included) into `Head`. The literal is
/// evaluated without any bindings.
fn parse_head(literal: &str) -> Result<Head, CompileError> {
    let expr = parse_expression(literal)?;
    let bindings = Map::new();
    let functions = FunctionRegistry::new();
    let value = evaluate(&expr, &EvaluationContext::new(&bindings, &functions))?;
    Ok(serde_json::from_value(normalize(value))?)
}

/// Coerces the title and meta attribute values to text, the way they are
/// printed into the head. Fields with no textual form are dropped.
fn normalize(value: Value) -> Value {
    let Value::Object(fields) = value else {
        return value;
    };
    let fields = fields
        .into_iter()
        .filter_map(|(key, field)| {
            let field = match key.as_str() {
                "title" => Value::String(text(&field)?),
                "meta" => meta_entries(field)?,
                _ => field,
            };
            Some((key, field))
        })
        .collect();
    Value::Object(fields)
}

fn text(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Array(_) | Value::Object(_) => None,
        scalar => Some(to_display_string(scalar)),
    }
}

fn meta_entries(value: Value) -> Option<Value> {
    let Value::Array(entries) = value else {
        log::debug!("Ignoring $head meta that is not a list: {}", value);
        return None;
    };
    let entries = entries
        .into_iter()
        .filter_map(|entry| match entry {
            Value::Object(attrs) => Some(Value::Object(
                attrs
                    .iter()
                    .filter_map(|(name, v)| Some((name.clone(), Value::String(text(v)?))))
                    .collect(),
            )),
            _ => None,
        })
        .collect();
    Some(Value::Array(entries))
}
