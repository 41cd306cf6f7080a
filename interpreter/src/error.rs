use brisk_core::{LexError, Token, Type};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ParseError {
    #[error("expected {expected}, found {found}")]
    UnexpectedToken { expected: Type, found: Token },

    #[error("expected an expression, found {found}")]
    ExpectedExpression { found: Token },
}

impl ParseError {
    pub(crate) fn unexpected(expected: Type, found: &Token) -> Self {
        ParseError::UnexpectedToken {
            expected,
            found: found.clone(),
        }
    }

    pub(crate) fn expected_expression(found: &Token) -> Self {
        ParseError::ExpectedExpression {
            found: found.clone(),
        }
    }
}

#[derive(Debug, Error, PartialEq, Clone)]
pub enum RuntimeError {
    #[error("undefined variable '{name}'")]
    UndefinedVariable { name: String },

    #[error("undefined routine '{name}'")]
    UndefinedRoutine { name: String },

    #[error("routine '{name}' expected {expected} arguments but got {got}")]
    ArityMismatch {
        name: String,
        expected: usize,
        got: usize,
    },

    #[error("invalid assignment target")]
    InvalidAssignmentTarget,

    #[error("division by zero")]
    DivisionByZero,

    #[error("modulo by zero")]
    ModuloByZero,

    #[error("invalid operands for '{op}'")]
    InvalidOperands { op: String },
}

impl RuntimeError {
    pub(crate) fn undefined_variable(name: &str) -> Self {
        RuntimeError::UndefinedVariable {
            name: String::from(name),
        }
    }

    pub(crate) fn undefined_routine(name: &str) -> Self {
        RuntimeError::UndefinedRoutine {
            name: String::from(name),
        }
    }

    pub(crate) fn arity_mismatch(name: &str, expected: usize, got: usize) -> Self {
        RuntimeError::ArityMismatch {
            name: String::from(name),
            expected,
            got,
        }
    }

    pub(crate) fn invalid_operands(op: &str) -> Self {
        RuntimeError::InvalidOperands {
            op: String::from(op),
        }
    }
}

// The boundary type handed to callers: whichever stage fails first wraps its
// error here and aborts the whole evaluation.
#[derive(Debug, Error, PartialEq, Clone)]
pub enum Error {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}
