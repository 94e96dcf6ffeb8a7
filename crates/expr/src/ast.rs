//! Defines the Abstract Syntax Tree (AST) for directive expressions.
use serde_json::Value;

/// The top-level representation of a parsed expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// A literal value, like a string, number, boolean or null.
    Literal(Value),
    /// A free variable resolved against the bindings (e.g. `user`).
    Variable(String),
    /// A list literal (e.g. `[1, 'two', flag]`).
    List(Vec<Expression>),
    /// An object literal. Keys keep their source order.
    Object(Vec<(String, Expression)>),
    /// Property access with a static name (e.g. `user.name`).
    Member {
        object: Box<Expression>,
        property: String,
    },
    /// Computed access (e.g. `items[0]`, `row[key]`).
    Index {
        object: Box<Expression>,
        index: Box<Expression>,
    },
    /// A call to a registered function.
    FunctionCall { name: String, args: Vec<Expression> },
    UnaryOp {
        op: UnaryOperator,
        expr: Box<Expression>,
    },
    BinaryOp {
        left: Box<Expression>,
        op: BinaryOperator,
        right: Box<Expression>,
    },
    /// `test ? consequent : alternate`
    Conditional {
        test: Box<Expression>,
        consequent: Box<Expression>,
        alternate: Box<Expression>,
    },
}

/// A unary operator used in an expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    Not,
    Minus,
}

/// A binary operator used in an expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    // Logical
    Or,
    And,
    // Equality
    StrictEquals,
    StrictNotEquals,
    Equals,
    NotEquals,
    // Relational
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
    // Additive
    Plus,
    Minus,
    // Multiplicative
    Multiply,
    Divide,
    Modulo,
}
