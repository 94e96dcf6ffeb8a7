//! A small, JSON-native expression language for template directives.
//!
//! Expressions are parsed into an [`Expression`] tree and evaluated against
//! any [`Bindings`] implementation, producing `serde_json::Value`s. The grammar
//! covers literals (numbers, strings, lists, objects), free variables,
//! property and index access, function calls, arithmetic, comparison,
//! logical and conditional operators.

pub mod ast;
pub mod engine;
pub mod error;
pub mod functions;
pub mod operators;
mod parser;
pub mod sigil;
pub mod value;

// --- Public API ---
pub use ast::{BinaryOperator, Expression, UnaryOperator};
pub use engine::{
    Bindings, EvaluationContext, MAX_EVAL_DEPTH, evaluate, evaluate_as_bool, evaluate_as_string,
    evaluate_str,
};
pub use error::ExprError;
pub use functions::{ExprFunction, FunctionRegistry};
pub use parser::{MAX_CHAIN, MAX_NESTING, parse_expression};
pub use sigil::strip_sigils;
pub use value::{is_truthy, to_display_string};

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Map, Value, json};

    fn bindings(data: Value) -> Map<String, Value> {
        data.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn test_parse_and_eval_simple_path() {
        let expr = parse_expression("customer.name").unwrap();
        let vars = bindings(json!({ "customer": { "name": "ACME" } }));
        let funcs = FunctionRegistry::default();
        let e_ctx = EvaluationContext::new(&vars, &funcs);
        let result = evaluate(&expr, &e_ctx).unwrap();
        assert_eq!(result, json!("ACME"));
    }

    #[test]
    fn test_parse_and_eval_path_with_index() {
        let expr = parse_expression("orders[1].id").unwrap();
        let vars = bindings(json!({ "orders": [ { "id": "A" }, { "id": "B" } ] }));
        let funcs = FunctionRegistry::default();
        let e_ctx = EvaluationContext::new(&vars, &funcs);
        let result = evaluate(&expr, &e_ctx).unwrap();
        assert_eq!(result, json!("B"));
    }

    #[test]
    fn test_parse_and_eval_function() {
        let expr = parse_expression("upper('hello')").unwrap();
        let vars = Map::new();
        let funcs = FunctionRegistry::default();
        let e_ctx = EvaluationContext::new(&vars, &funcs);
        let result = evaluate(&expr, &e_ctx).unwrap();
        assert_eq!(result, json!("HELLO"));
    }

    #[test]
    fn test_parse_and_eval_nested_function_with_path() {
        let expr = parse_expression("concat('ID: ', upper(customer.orders[0].id))").unwrap();
        let vars = bindings(json!({ "customer": { "orders": [{ "id": "xn123" }] } }));
        let funcs = FunctionRegistry::default();
        let e_ctx = EvaluationContext::new(&vars, &funcs);
        let result = evaluate_as_string(&expr, &e_ctx).unwrap();
        assert_eq!(result, "ID: XN123");
    }

    #[test]
    fn test_sigil_stripped_directive_expression() {
        let source = strip_sigils("$items.length > 0 && $user.admin");
        let expr = parse_expression(&source).unwrap();
        let vars = bindings(json!({ "items": [1], "user": { "admin": true } }));
        let funcs = FunctionRegistry::default();
        let e_ctx = EvaluationContext::new(&vars, &funcs);
        assert!(evaluate_as_bool(&expr, &e_ctx).unwrap());
    }

    #[test]
    fn test_custom_function_registration() {
        fn double(args: &[Value]) -> Result<Value, ExprError> {
            let n = args.first().and_then(Value::as_i64).unwrap_or(0);
            Ok(json!(n * 2))
        }
        let mut funcs = FunctionRegistry::default();
        funcs.register("Double", double);
        let vars = Map::new();
        let e_ctx = EvaluationContext::new(&vars, &funcs);
        assert_eq!(evaluate_str("double(21)", &e_ctx).unwrap(), json!(42));
    }
}
