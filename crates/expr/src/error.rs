use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExprError {
    #[error("Expression parse error in '{0}': {1}")]
    Parse(String, String),

    #[error("'{0}' is not defined")]
    UnknownVariable(String),

    #[error("'{0}' is not a function")]
    UnknownFunction(String),

    #[error("Function '{function}' error: {message}")]
    FunctionError { function: String, message: String },

    #[error("Type error: {0}")]
    TypeError(String),

    #[error("Expression is nested more than {0} levels deep")]
    TooDeep(usize),
}
