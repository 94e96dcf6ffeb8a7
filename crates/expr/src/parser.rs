//! A `nom`-based parser for the directive expression language.
use super::ast::{BinaryOperator, Expression, UnaryOperator};
use crate::error::ExprError;
use crate::value::number_value;
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, take_while},
    character::complete::{char, digit1, multispace0, one_of, satisfy},
    combinator::{map, opt, recognize},
    error::{Error, ErrorKind},
    multi::{many0, separated_list0},
    sequence::{delimited, pair, preceded, terminated},
};
use serde_json::Value;
use std::cell::Cell;

/// Deepest nesting of sub-expressions (parentheses, brackets, call
/// arguments, ternary branches, prefix operators) the parser descends into.
pub const MAX_NESTING: usize = 32;

/// Longest run of operands joined by one operator tier, or of accessors
/// after one primary expression.
pub const MAX_CHAIN: usize = 64;

thread_local! {
    static NESTING: Cell<usize> = const { Cell::new(0) };
}

// --- Main Public Parser ---

pub fn parse_expression(input: &str) -> Result<Expression, ExprError> {
    match expression(input.trim()) {
        Ok(("", expr)) => Ok(expr),
        Ok((rem, _)) => Err(ExprError::Parse(
            input.to_string(),
            format!("Parser did not consume all input. Remainder: '{}'", rem),
        )),
        Err(nom::Err::Failure(e)) if e.code == ErrorKind::TooLarge => Err(ExprError::Parse(
            input.to_string(),
            format!(
                "Expression nests deeper than {} levels or chains more than {} terms",
                MAX_NESTING, MAX_CHAIN
            ),
        )),
        Err(e) => Err(ExprError::Parse(input.to_string(), e.to_string())),
    }
}

// --- Limits ---

/// Counts one level of parser recursion for as long as it is alive.
struct NestingGuard;

impl NestingGuard {
    fn enter(input: &str) -> Result<Self, nom::Err<Error<&str>>> {
        let depth = NESTING.with(|n| {
            n.set(n.get() + 1);
            n.get()
        });
        let guard = NestingGuard;
        if depth > MAX_NESTING {
            return Err(too_large(input));
        }
        Ok(guard)
    }
}

impl Drop for NestingGuard {
    fn drop(&mut self) {
        NESTING.with(|n| n.set(n.get() - 1));
    }
}

/// A non-recoverable error: no alternative parse can get under a limit.
fn too_large(input: &str) -> nom::Err<Error<&str>> {
    nom::Err::Failure(Error::new(input, ErrorKind::TooLarge))
}

// --- Combinators & Helpers ---

/// A combinator that takes a parser `inner` and produces a parser that consumes surrounding whitespace.
fn ws<'a, F, O, E>(inner: F) -> impl Parser<&'a str, Output = O, Error = E>
where
    F: Parser<&'a str, Output = O, Error = E>,
    E: nom::error::ParseError<&'a str>,
{
    delimited(multispace0, inner, multispace0)
}

fn build_binary_expr_parser<'a, F, G>(
    sub_expr_parser: F,
    op_parser: G,
) -> impl FnMut(&'a str) -> IResult<&'a str, Expression>
where
    F: Parser<&'a str, Output = Expression, Error = Error<&'a str>> + Clone,
    G: Parser<&'a str, Output = BinaryOperator, Error = Error<&'a str>> + Clone,
{
    move |input: &str| {
        let (input, mut left) = sub_expr_parser.clone().parse(input)?;
        let (input, remainder) =
            many0(pair(ws(op_parser.clone()), sub_expr_parser.clone())).parse(input)?;
        if remainder.len() >= MAX_CHAIN {
            return Err(too_large(input));
        }

        for (op, right) in remainder {
            left = Expression::BinaryOp {
                left: Box::new(left),
                op,
                right: Box::new(right),
            };
        }
        Ok((input, left))
    }
}

// --- Expression Parsers (in order of precedence) ---

fn expression(input: &str) -> IResult<&str, Expression> {
    let _guard = NestingGuard::enter(input)?;
    conditional_expr(input)
}

fn conditional_expr(input: &str) -> IResult<&str, Expression> {
    let (i, test) = or_expr(input)?;
    let (i, branches) = opt(pair(
        preceded(ws(char('?')), expression),
        preceded(ws(char(':')), expression),
    ))
    .parse(i)?;

    match branches {
        Some((consequent, alternate)) => Ok((
            i,
            Expression::Conditional {
                test: Box::new(test),
                consequent: Box::new(consequent),
                alternate: Box::new(alternate),
            },
        )),
        None => Ok((i, test)),
    }
}

fn or_op(input: &str) -> IResult<&str, BinaryOperator> {
    map(tag("||"), |_| BinaryOperator::Or).parse(input)
}

fn and_op(input: &str) -> IResult<&str, BinaryOperator> {
    map(tag("&&"), |_| BinaryOperator::And).parse(input)
}

fn equality_op(input: &str) -> IResult<&str, BinaryOperator> {
    alt((
        map(tag("==="), |_| BinaryOperator::StrictEquals),
        map(tag("!=="), |_| BinaryOperator::StrictNotEquals),
        map(tag("=="), |_| BinaryOperator::Equals),
        map(tag("!="), |_| BinaryOperator::NotEquals),
    ))
    .parse(input)
}

fn relational_op(input: &str) -> IResult<&str, BinaryOperator> {
    alt((
        map(tag("<="), |_| BinaryOperator::LessThanOrEqual),
        map(tag(">="), |_| BinaryOperator::GreaterThanOrEqual),
        map(tag("<"), |_| BinaryOperator::LessThan),
        map(tag(">"), |_| BinaryOperator::GreaterThan),
    ))
    .parse(input)
}

fn additive_op(input: &str) -> IResult<&str, BinaryOperator> {
    alt((
        map(char('+'), |_| BinaryOperator::Plus),
        map(char('-'), |_| BinaryOperator::Minus),
    ))
    .parse(input)
}

fn multiplicative_op(input: &str) -> IResult<&str, BinaryOperator> {
    alt((
        map(char('*'), |_| BinaryOperator::Multiply),
        map(char('/'), |_| BinaryOperator::Divide),
        map(char('%'), |_| BinaryOperator::Modulo),
    ))
    .parse(input)
}

fn or_expr(input: &str) -> IResult<&str, Expression> {
    build_binary_expr_parser(and_expr, or_op)(input)
}

fn and_expr(input: &str) -> IResult<&str, Expression> {
    build_binary_expr_parser(equality_expr, and_op)(input)
}

fn equality_expr(input: &str) -> IResult<&str, Expression> {
    build_binary_expr_parser(relational_expr, equality_op)(input)
}

fn relational_expr(input: &str) -> IResult<&str, Expression> {
    build_binary_expr_parser(additive_expr, relational_op)(input)
}

fn additive_expr(input: &str) -> IResult<&str, Expression> {
    build_binary_expr_parser(multiplicative_expr, additive_op)(input)
}

fn multiplicative_expr(input: &str) -> IResult<&str, Expression> {
    build_binary_expr_parser(unary_expr, multiplicative_op)(input)
}

fn unary_op(input: &str) -> IResult<&str, UnaryOperator> {
    ws(alt((
        map(char('!'), |_| UnaryOperator::Not),
        map(char('-'), |_| UnaryOperator::Minus),
    )))
    .parse(input)
}

fn unary_expr(input: &str) -> IResult<&str, Expression> {
    let (i, op) = opt(unary_op).parse(input)?;
    let Some(op) = op else {
        return postfix_expr(i);
    };
    let _guard = NestingGuard::enter(i)?;
    let (i, expr) = unary_expr(i)?;
    Ok((
        i,
        Expression::UnaryOp {
            op,
            expr: Box::new(expr),
        },
    ))
}

enum Postfix {
    Member(String),
    Index(Expression),
}

fn postfix_expr(input: &str) -> IResult<&str, Expression> {
    let (i, base) = primary_expr(input)?;
    let (i, accessors) = many0(alt((
        map(preceded(ws(char('.')), identifier), |name| {
            Postfix::Member(name.to_string())
        }),
        map(
            delimited(ws(char('[')), expression, ws(char(']'))),
            Postfix::Index,
        ),
    )))
    .parse(i)?;
    if accessors.len() > MAX_CHAIN {
        return Err(too_large(i));
    }

    let expr = accessors
        .into_iter()
        .fold(base, |object, accessor| match accessor {
            Postfix::Member(property) => Expression::Member {
                object: Box::new(object),
                property,
            },
            Postfix::Index(index) => Expression::Index {
                object: Box::new(object),
                index: Box::new(index),
            },
        });
    Ok((i, expr))
}

fn primary_expr(input: &str) -> IResult<&str, Expression> {
    ws(alt((
        number,
        map(string_literal, |s| Expression::Literal(Value::String(s))),
        list_literal,
        object_literal,
        function_call, // Must be before identifiers to parse `func()` not `func`
        identifier_or_keyword,
        delimited(ws(char('(')), expression, ws(char(')'))),
    )))
    .parse(input)
}

// --- Literal Parsers ---

fn number(input: &str) -> IResult<&str, Expression> {
    let (i, text) = recognize(pair(
        digit1,
        pair(
            opt(pair(char('.'), digit1)),
            opt(pair(one_of("eE"), pair(opt(one_of("+-")), digit1))),
        ),
    ))
    .parse(input)?;

    match text.parse::<f64>() {
        Ok(n) => Ok((i, Expression::Literal(number_value(n)))),
        Err(_) => Err(nom::Err::Error(Error::new(input, ErrorKind::Float))),
    }
}

/// Single or double quoted string with backslash escapes.
fn string_literal(input: &str) -> IResult<&str, String> {
    let mut chars = input.char_indices();
    let quote = match chars.next() {
        Some((_, q @ ('"' | '\''))) => q,
        _ => return Err(nom::Err::Error(Error::new(input, ErrorKind::Char))),
    };

    let mut out = String::new();
    while let Some((idx, c)) = chars.next() {
        match c {
            c if c == quote => return Ok((&input[idx + c.len_utf8()..], out)),
            '\\' => match chars.next() {
                Some((_, 'n')) => out.push('\n'),
                Some((_, 't')) => out.push('\t'),
                Some((_, 'r')) => out.push('\r'),
                Some((_, escaped)) => out.push(escaped),
                None => break,
            },
            c => out.push(c),
        }
    }
    Err(nom::Err::Error(Error::new(input, ErrorKind::Char)))
}

fn list_literal(input: &str) -> IResult<&str, Expression> {
    map(
        delimited(
            ws(char('[')),
            terminated(
                separated_list0(ws(char(',')), expression),
                opt(ws(char(','))),
            ),
            ws(char(']')),
        ),
        Expression::List,
    )
    .parse(input)
}

fn object_key(input: &str) -> IResult<&str, String> {
    ws(alt((map(identifier, |s: &str| s.to_string()), string_literal))).parse(input)
}

fn object_entry(input: &str) -> IResult<&str, (String, Expression)> {
    let (i, key) = object_key(input)?;
    let (i, _) = ws(char(':')).parse(i)?;
    let (i, value) = expression(i)?;
    Ok((i, (key, value)))
}

fn object_literal(input: &str) -> IResult<&str, Expression> {
    map(
        delimited(
            ws(char('{')),
            terminated(
                separated_list0(ws(char(',')), object_entry),
                opt(ws(char(','))),
            ),
            ws(char('}')),
        ),
        Expression::Object,
    )
    .parse(input)
}

// --- Names ---

fn identifier(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        satisfy(|c: char| c.is_alphabetic() || c == '_'),
        take_while(|c: char| c.is_alphanumeric() || c == '_'),
    ))
    .parse(input)
}

fn identifier_or_keyword(input: &str) -> IResult<&str, Expression> {
    let (i, name) = identifier(input)?;
    let expr = match name {
        "true" => Expression::Literal(Value::Bool(true)),
        "false" => Expression::Literal(Value::Bool(false)),
        "null" | "undefined" => Expression::Literal(Value::Null),
        _ => Expression::Variable(name.to_string()),
    };
    Ok((i, expr))
}

// --- Function Call Parser ---

fn function_call(input: &str) -> IResult<&str, Expression> {
    let (i, name) = identifier(input)?;
    let (i, _) = multispace0(i)?;
    let (i, args) = delimited(
        char('('),
        separated_list0(ws(char(',')), expression),
        ws(char(')')),
    )
    .parse(i)?;

    Ok((
        i,
        Expression::FunctionCall {
            name: name.to_string(),
            args,
        },
    ))
}
