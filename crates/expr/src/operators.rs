use crate::ast::BinaryOperator;
use crate::error::ExprError;
use crate::value::{compare, loose_equals, number_value, strict_equals, to_display_string, to_number};
use serde_json::Value;
use std::cmp::Ordering;

/// Applies a non-short-circuiting binary operator to two evaluated operands.
/// `And`/`Or` are resolved by the engine before their right operand is evaluated.
pub fn evaluate_binary(op: BinaryOperator, left: Value, right: Value) -> Result<Value, ExprError> {
    let result = match op {
        BinaryOperator::Or | BinaryOperator::And => {
            return Err(ExprError::TypeError(format!(
                "{:?} must be evaluated lazily",
                op
            )));
        }
        BinaryOperator::StrictEquals => Value::Bool(strict_equals(&left, &right)),
        BinaryOperator::StrictNotEquals => Value::Bool(!strict_equals(&left, &right)),
        BinaryOperator::Equals => Value::Bool(loose_equals(&left, &right)),
        BinaryOperator::NotEquals => Value::Bool(!loose_equals(&left, &right)),
        BinaryOperator::LessThan => evaluate_comparison(&left, &right, |ord| ord == Ordering::Less),
        BinaryOperator::LessThanOrEqual => {
            evaluate_comparison(&left, &right, |ord| ord != Ordering::Greater)
        }
        BinaryOperator::GreaterThan => {
            evaluate_comparison(&left, &right, |ord| ord == Ordering::Greater)
        }
        BinaryOperator::GreaterThanOrEqual => {
            evaluate_comparison(&left, &right, |ord| ord != Ordering::Less)
        }
        BinaryOperator::Plus => evaluate_plus(&left, &right),
        BinaryOperator::Minus => evaluate_arithmetic(&left, &right, |a, b| a - b),
        BinaryOperator::Multiply => evaluate_arithmetic(&left, &right, |a, b| a * b),
        BinaryOperator::Divide => evaluate_arithmetic(&left, &right, |a, b| a / b),
        BinaryOperator::Modulo => evaluate_arithmetic(&left, &right, |a, b| a % b),
    };
    Ok(result)
}

fn evaluate_comparison(left: &Value, right: &Value, pred: impl Fn(Ordering) -> bool) -> Value {
    Value::Bool(compare(left, right).is_some_and(pred))
}

fn evaluate_arithmetic(left: &Value, right: &Value, op: impl Fn(f64, f64) -> f64) -> Value {
    number_value(op(to_number(left), to_number(right)))
}

/// `+` concatenates as soon as either side is not a primitive number-like value.
fn evaluate_plus(left: &Value, right: &Value) -> Value {
    let concatenates = |v: &Value| matches!(v, Value::String(_) | Value::Array(_) | Value::Object(_));
    if concatenates(left) || concatenates(right) {
        let mut s = to_display_string(left);
        s.push_str(&to_display_string(right));
        Value::String(s)
    } else {
        evaluate_arithmetic(left, right, |a, b| a + b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_plus_concatenates_strings() {
        let result = evaluate_binary(BinaryOperator::Plus, json!("n="), json!(2)).unwrap();
        assert_eq!(result, json!("n=2"));
        let result = evaluate_binary(BinaryOperator::Plus, json!(2), json!(3)).unwrap();
        assert_eq!(result, json!(5));
    }

    #[test]
    fn test_comparisons() {
        let lt = evaluate_binary(BinaryOperator::LessThan, json!("apple"), json!("banana")).unwrap();
        assert_eq!(lt, json!(true));
        let ge = evaluate_binary(BinaryOperator::GreaterThanOrEqual, json!("10"), json!(9)).unwrap();
        assert_eq!(ge, json!(true));
        let nan = evaluate_binary(BinaryOperator::LessThan, json!("x"), json!(1)).unwrap();
        assert_eq!(nan, json!(false));
    }

    #[test]
    fn test_division() {
        let result = evaluate_binary(BinaryOperator::Divide, json!(7), json!(2)).unwrap();
        assert_eq!(result, json!(3.5));
        let result = evaluate_binary(BinaryOperator::Modulo, json!(7), json!(2)).unwrap();
        assert_eq!(result, json!(1));
        let result = evaluate_binary(BinaryOperator::Divide, json!(1), json!(0)).unwrap();
        assert_eq!(result, Value::Null);
    }
}
