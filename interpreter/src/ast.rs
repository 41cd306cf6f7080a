use brisk_core::Token;

use crate::value::Number;

// Nodes own their children outright; the parser builds the tree once and the
// evaluator only reads it. Operator tokens are cloned in during parsing so
// runtime errors can name the offending lexeme.

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Expr {
    Binary {
        op: Token,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Unary {
        op: Token,
        operand: Box<Expr>,
    },
    Number {
        value: Number,
    },
    Str {
        value: String,
    },
    Variable {
        name: String,
    },
    Call {
        name: String,
        args: Vec<Expr>,
    },
}

#[allow(dead_code)]
impl Expr {
    // Creator methods, mostly for the parser and for spelling out expected
    // trees in tests.
    pub(crate) fn binary(op: Token, lhs: Expr, rhs: Expr) -> Self {
        Expr::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    pub(crate) fn unary(op: Token, operand: Expr) -> Self {
        Expr::Unary {
            op,
            operand: Box::new(operand),
        }
    }

    pub(crate) fn number<T>(value: T) -> Self
    where
        Number: From<T>,
    {
        Expr::Number {
            value: Number::from(value),
        }
    }

    pub(crate) fn string(value: &str) -> Self {
        Expr::Str {
            value: String::from(value),
        }
    }

    pub(crate) fn variable(name: &str) -> Self {
        Expr::Variable {
            name: String::from(name),
        }
    }

    pub(crate) fn call(name: &str, args: Vec<Expr>) -> Self {
        Expr::Call {
            name: String::from(name),
            args,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Stmt {
    Expression {
        expr: Expr,
    },
    Block {
        statements: Vec<Stmt>,
    },
    If {
        condition: Expr,
        then_branch: Box<Stmt>,
        else_branch: Option<Box<Stmt>>,
    },
    While {
        condition: Expr,
        body: Box<Stmt>,
    },
    Routine {
        name: String,
        params: Vec<String>,
        body: Box<Stmt>,
    },
}

impl Stmt {
    pub(crate) fn expression(expr: Expr) -> Self {
        Stmt::Expression { expr }
    }

    pub(crate) fn block(statements: Vec<Stmt>) -> Self {
        Stmt::Block { statements }
    }

    pub(crate) fn if_(condition: Expr, then_branch: Stmt, else_branch: Option<Stmt>) -> Self {
        Stmt::If {
            condition,
            then_branch: Box::new(then_branch),
            else_branch: else_branch.map(Box::new),
        }
    }

    pub(crate) fn while_(condition: Expr, body: Stmt) -> Self {
        Stmt::While {
            condition,
            body: Box::new(body),
        }
    }

    pub(crate) fn routine(name: &str, params: Vec<String>, body: Stmt) -> Self {
        Stmt::Routine {
            name: String::from(name),
            params,
            body: Box::new(body),
        }
    }
}

// A wrapper over the root block to not leak Stmt to public
#[derive(Debug, PartialEq)]
pub struct Program(pub(crate) Stmt);
