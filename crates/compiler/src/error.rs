use cash_expr::ExprError;
use thiserror::Error;

/// Failures inside a single template construct. The compiler never returns
/// these to its caller; each one is replaced by the construct's fallback.
#[derive(Error, Debug)]
pub enum CompileError {
    #[error("Expression error: {0}")]
    Expr(#[from] ExprError),

    #[error("Head block is not valid metadata: {0}")]
    Head(#[from] serde_json::Error),

    #[error("$head block opened at byte {0} is never closed")]
    UnterminatedHead(usize),

    #[error("Invalid $for directive '{0}': expected \"$item in <expression>\"")]
    InvalidLoop(String),
}
