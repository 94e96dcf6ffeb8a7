//! Defines the registry and built-in implementations for expression functions.
use crate::error::ExprError;
use crate::value::to_display_string;
use serde_json::{Value, json};
use std::collections::HashMap;

/// The signature for a callable function implementation.
pub type ExprFunction = fn(args: &[Value]) -> Result<Value, ExprError>;

/// A registry to hold all available functions for the evaluation engine.
#[derive(Clone)]
pub struct FunctionRegistry {
    functions: HashMap<String, ExprFunction>,
}

impl FunctionRegistry {
    /// Creates a new, empty function registry.
    pub fn new() -> Self {
        Self {
            functions: HashMap::new(),
        }
    }

    /// Registers a new function, replacing any previous one with the same name.
    pub fn register(&mut self, name: &str, func: ExprFunction) {
        self.functions.insert(name.to_lowercase(), func);
    }

    /// Finds a function by name (case-insensitive).
    pub fn get(&self, name: &str) -> Option<&ExprFunction> {
        self.functions.get(&name.to_lowercase())
    }

    pub fn call(&self, name: &str, args: &[Value]) -> Result<Value, ExprError> {
        let func = self
            .get(name)
            .ok_or_else(|| ExprError::UnknownFunction(name.to_string()))?;
        func(args)
    }
}

impl std::fmt::Debug for FunctionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<_> = self.functions.keys().collect();
        names.sort();
        f.debug_struct("FunctionRegistry")
            .field("functions", &names)
            .finish()
    }
}

fn string_arg<'v>(function: &str, args: &'v [Value], idx: usize) -> Result<&'v str, ExprError> {
    args.get(idx)
        .and_then(Value::as_str)
        .ok_or_else(|| ExprError::FunctionError {
            function: function.to_string(),
            message: format!("argument {} must be a string", idx + 1),
        })
}

// --- Built-in Function Implementations ---

fn upper(args: &[Value]) -> Result<Value, ExprError> {
    Ok(string_arg("upper", args, 0)?.to_uppercase().into())
}

fn lower(args: &[Value]) -> Result<Value, ExprError> {
    Ok(string_arg("lower", args, 0)?.to_lowercase().into())
}

fn trim(args: &[Value]) -> Result<Value, ExprError> {
    Ok(string_arg("trim", args, 0)?.trim().into())
}

fn concat(args: &[Value]) -> Result<Value, ExprError> {
    Ok(args.iter().map(to_display_string).collect::<String>().into())
}

fn contains(args: &[Value]) -> Result<Value, ExprError> {
    match (args.first(), args.get(1)) {
        (Some(Value::String(h)), Some(needle)) => Ok(h.contains(&to_display_string(needle)).into()),
        (Some(Value::Array(items)), Some(needle)) => Ok(items.contains(needle).into()),
        _ => Ok(false.into()),
    }
}

fn len(args: &[Value]) -> Result<Value, ExprError> {
    let n = match args.first() {
        Some(Value::Array(items)) => items.len(),
        Some(Value::Object(map)) => map.len(),
        Some(Value::String(s)) => s.chars().count(),
        _ => 0,
    };
    Ok(json!(n))
}

fn join(args: &[Value]) -> Result<Value, ExprError> {
    let separator = match args.get(1) {
        Some(sep) => to_display_string(sep),
        None => ",".to_string(),
    };
    match args.first() {
        Some(Value::Array(items)) => Ok(items
            .iter()
            .map(to_display_string)
            .collect::<Vec<_>>()
            .join(&separator)
            .into()),
        Some(other) => Ok(to_display_string(other).into()),
        None => Ok("".into()),
    }
}

fn to_json(args: &[Value]) -> Result<Value, ExprError> {
    let value = args.first().unwrap_or(&Value::Null);
    serde_json::to_string(value)
        .map(Value::String)
        .map_err(|e| ExprError::FunctionError {
            function: "json".to_string(),
            message: e.to_string(),
        })
}

impl Default for FunctionRegistry {
    /// Creates a new registry populated with all built-in functions.
    fn default() -> Self {
        let mut registry = Self::new();
        registry.register("upper", upper);
        registry.register("lower", lower);
        registry.register("trim", trim);
        registry.register("concat", concat);
        registry.register("contains", contains);
        registry.register("len", len);
        registry.register("join", join);
        registry.register("json", to_json);
        registry
    }
}
