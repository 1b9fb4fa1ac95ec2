//! Errors produced while parsing or evaluating an expression.

/// Why an expression could not be evaluated.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ExpressionError {
    #[error("unexpected character '{ch}' at offset {position}")]
    UnexpectedCharacter { ch: char, position: usize },

    #[error("unexpected {found} at offset {position}")]
    UnexpectedToken { found: String, position: usize },

    #[error("unexpected end of expression")]
    UnexpectedEnd,

    #[error("invalid literal '{0}'")]
    InvalidLiteral(String),

    #[error("unknown identifier '{0}'")]
    UnknownIdentifier(String),

    #[error("unknown function '{0}'")]
    UnknownFunction(String),

    #[error("{function} expects {expected} argument(s), found {found}")]
    Arity {
        function: String,
        expected: usize,
        found: usize,
    },

    #[error("expression nested deeper than {0} levels")]
    TooDeep(usize),

    #[error("cyclic reference through '{0}'")]
    CyclicReference(String),

    #[error("division by zero")]
    DivisionByZero,

    #[error("integer overflow")]
    Overflow,

    #[error("operator {operator} is not defined for {operand}")]
    TypeMismatch { operator: String, operand: String },
}

/// Result type for expression evaluation.
pub type Result<T> = std::result::Result<T, ExpressionError>;
