//! The evaluation engine for executing a parsed expression against a set of bindings.
use super::ast::{BinaryOperator, Expression, UnaryOperator};
use super::functions::FunctionRegistry;
use super::operators;
use super::parser::parse_expression;
use crate::error::ExprError;
use crate::value::{is_truthy, number_value, to_display_string, to_number};
use serde_json::{Map, Value};

/// Deepest expression tree `evaluate` walks before giving up.
pub const MAX_EVAL_DEPTH: usize = 128;

/// Resolves free variables of an expression.
pub trait Bindings {
    fn lookup(&self, name: &str) -> Option<&Value>;
}

impl Bindings for Map<String, Value> {
    fn lookup(&self, name: &str) -> Option<&Value> {
        self.get(name)
    }
}

/// A container for all state needed during expression evaluation.
pub struct EvaluationContext<'a> {
    pub bindings: &'a dyn Bindings,
    pub functions: &'a FunctionRegistry,
}

impl<'a> EvaluationContext<'a> {
    pub fn new(bindings: &'a dyn Bindings, functions: &'a FunctionRegistry) -> Self {
        Self {
            bindings,
            functions,
        }
    }
}

/// Evaluates a compiled expression and returns a concrete value.
pub fn evaluate(expr: &Expression, e_ctx: &EvaluationContext) -> Result<Value, ExprError> {
    eval_at(expr, e_ctx, 0)
}

fn eval_at(expr: &Expression, e_ctx: &EvaluationContext, depth: usize) -> Result<Value, ExprError> {
    if depth > MAX_EVAL_DEPTH {
        return Err(ExprError::TooDeep(MAX_EVAL_DEPTH));
    }
    let eval = |sub: &Expression| eval_at(sub, e_ctx, depth + 1);
    match expr {
        Expression::Literal(value) => Ok(value.clone()),
        Expression::Variable(name) => e_ctx
            .bindings
            .lookup(name)
            .cloned()
            .ok_or_else(|| ExprError::UnknownVariable(name.clone())),
        Expression::List(items) => items
            .iter()
            .map(eval)
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        Expression::Object(entries) => {
            let mut map = Map::new();
            for (key, value) in entries {
                map.insert(key.clone(), eval(value)?);
            }
            Ok(Value::Object(map))
        }
        Expression::Member { object, property } => {
            let target = eval(object)?;
            member(&target, property)
        }
        Expression::Index { object, index } => {
            let target = eval(object)?;
            let key = eval(index)?;
            index_value(&target, &key)
        }
        Expression::FunctionCall { name, args } => {
            let mut evaluated_args = Vec::with_capacity(args.len());
            for arg in args {
                evaluated_args.push(eval(arg)?);
            }
            e_ctx.functions.call(name, &evaluated_args)
        }
        Expression::UnaryOp { op, expr } => {
            let val = eval(expr)?;
            match op {
                UnaryOperator::Not => Ok(Value::Bool(!is_truthy(&val))),
                UnaryOperator::Minus => Ok(number_value(-to_number(&val))),
            }
        }
        Expression::BinaryOp { left, op, right } => {
            let left_val = eval(left)?;
            match op {
                // Logical operators yield one of their operands, like JavaScript.
                BinaryOperator::Or if is_truthy(&left_val) => Ok(left_val),
                BinaryOperator::And if !is_truthy(&left_val) => Ok(left_val),
                BinaryOperator::Or | BinaryOperator::And => eval(right),
                _ => {
                    let right_val = eval(right)?;
                    operators::evaluate_binary(*op, left_val, right_val)
                }
            }
        }
        Expression::Conditional {
            test,
            consequent,
            alternate,
        } => {
            if is_truthy(&eval(test)?) {
                eval(consequent)
            } else {
                eval(alternate)
            }
        }
    }
}

fn member(target: &Value, property: &str) -> Result<Value, ExprError> {
    match target {
        Value::Null => Err(ExprError::TypeError(format!(
            "cannot read property '{}' of null",
            property
        ))),
        Value::Object(map) => Ok(map.get(property).cloned().unwrap_or(Value::Null)),
        Value::Array(items) if property == "length" => Ok(Value::from(items.len())),
        Value::String(s) if property == "length" => Ok(Value::from(s.chars().count())),
        _ => Ok(Value::Null),
    }
}

fn index_value(target: &Value, key: &Value) -> Result<Value, ExprError> {
    let position = key
        .as_f64()
        .filter(|n| *n >= 0.0 && n.fract() == 0.0)
        .map(|n| n as usize);

    match (target, position) {
        (Value::Null, _) => Err(ExprError::TypeError(format!(
            "cannot read index '{}' of null",
            to_display_string(key)
        ))),
        (Value::Array(items), Some(i)) => Ok(items.get(i).cloned().unwrap_or(Value::Null)),
        (Value::String(s), Some(i)) => Ok(s
            .chars()
            .nth(i)
            .map(|c| Value::String(c.to_string()))
            .unwrap_or(Value::Null)),
        _ => member(target, &to_display_string(key)),
    }
}

/// Parses and evaluates an expression source in one step.
pub fn evaluate_str(source: &str, e_ctx: &EvaluationContext) -> Result<Value, ExprError> {
    let expr = parse_expression(source)?;
    evaluate(&expr, e_ctx)
}

/// Evaluates an expression and coerces the result to a boolean.
pub fn evaluate_as_bool(expr: &Expression, e_ctx: &EvaluationContext) -> Result<bool, ExprError> {
    evaluate(expr, e_ctx).map(|v| is_truthy(&v))
}

/// Evaluates an expression and coerces the result to its display string.
pub fn evaluate_as_string(
    expr: &Expression,
    e_ctx: &EvaluationContext,
) -> Result<String, ExprError> {
    evaluate(expr, e_ctx).map(|v| to_display_string(&v))
}
