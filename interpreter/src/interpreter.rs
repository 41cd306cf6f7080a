use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;

use brisk_core::{Scanner, Token, Type};

use crate::ast::{Expr, Program, Stmt};
use crate::env::{Environment, Routine, ScopeId, GLOBAL};
use crate::error::{Error, RuntimeError};
use crate::parser::Parser;
use crate::value::Value;

pub struct Interpreter {
    env: Environment,
    stdout: Rc<RefCell<dyn Write>>,
}

impl Interpreter {
    pub fn new(stdout: Rc<RefCell<dyn Write>>) -> Self {
        Interpreter {
            env: Environment::new(),
            stdout,
        }
    }

    pub fn evaluate(&mut self, src: &str) -> Result<Vec<Value>, Error> {
        let tokens = Scanner::new(src).scan_tokens()?;
        self.evaluate_tokens(&tokens)
    }

    pub fn evaluate_tokens(&mut self, tokens: &[Token]) -> Result<Vec<Value>, Error> {
        let program = Parser::new(tokens).parse()?;
        self.evaluate_program(&program)
    }

    pub fn evaluate_program(&mut self, program: &Program) -> Result<Vec<Value>, Error> {
        // Call scopes left behind by an earlier failed evaluation must not
        // leak into this one. Global bindings survive.
        self.env.reset();

        let mut values = Vec::new();
        self.eval_stmt(&program.0, GLOBAL, &mut values)?;
        Ok(values)
    }

    fn eval_stmt(
        &mut self,
        stmt: &Stmt,
        scope: ScopeId,
        values: &mut Vec<Value>,
    ) -> Result<(), RuntimeError> {
        match stmt {
            Stmt::Expression { expr } => {
                // A statement contributes to the output only when its
                // expression produced a real value.
                let value = self.eval_expr(expr, scope)?;
                if value != Value::None {
                    values.push(value);
                }
                Ok(())
            }
            Stmt::Block { statements } => {
                for statement in statements {
                    self.eval_stmt(statement, scope, values)?;
                }
                Ok(())
            }
            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => {
                if self.eval_expr(condition, scope)?.truthy() {
                    self.eval_stmt(then_branch, scope, values)
                } else if let Some(else_branch) = else_branch {
                    self.eval_stmt(else_branch, scope, values)
                } else {
                    Ok(())
                }
            }
            Stmt::While { condition, body } => {
                while self.eval_expr(condition, scope)?.truthy() {
                    self.eval_stmt(body, scope, values)?;
                }
                Ok(())
            }
            Stmt::Routine { name, params, body } => {
                self.env.define_routine(
                    scope,
                    Routine {
                        name: name.clone(),
                        params: params.clone(),
                        body: (**body).clone(),
                    },
                );
                Ok(())
            }
        }
    }

    fn eval_expr(&mut self, expr: &Expr, scope: ScopeId) -> Result<Value, RuntimeError> {
        match expr {
            Expr::Binary { op, lhs, rhs } => self.eval_binary(op, lhs, rhs, scope),
            Expr::Unary { op, operand } => self.eval_unary(op, operand, scope),
            Expr::Number { value } => Ok(Value::Num(*value)),
            Expr::Str { value } => Ok(Value::Str(value.clone())),
            Expr::Variable { name } => match self.env.variable(scope, name) {
                Some(value) => Ok(value),
                None => Err(RuntimeError::undefined_variable(name)),
            },
            Expr::Call { name, args } => self.eval_call(name, args, scope),
        }
    }

    fn eval_binary(
        &mut self,
        op: &Token,
        lhs: &Expr,
        rhs: &Expr,
        scope: ScopeId,
    ) -> Result<Value, RuntimeError> {
        if op.ty == Type::Colon {
            return self.eval_assignment(lhs, rhs, scope);
        }

        let lhs = self.eval_expr(lhs, scope)?;
        let rhs = self.eval_expr(rhs, scope)?;

        match op.ty {
            Type::Plus => match (lhs, rhs) {
                (Value::Num(lhs), Value::Num(rhs)) => Ok(Value::Num(lhs.add(rhs))),
                (Value::Str(lhs), Value::Str(rhs)) => Ok(Value::Str(lhs + &rhs)),
                _ => Err(RuntimeError::invalid_operands("+")),
            },
            Type::Minus => match (lhs, rhs) {
                (Value::Num(lhs), Value::Num(rhs)) => Ok(Value::Num(lhs.sub(rhs))),
                _ => Err(RuntimeError::invalid_operands("-")),
            },
            Type::Mul => match (lhs, rhs) {
                (Value::Num(lhs), Value::Num(rhs)) => Ok(Value::Num(lhs.mul(rhs))),
                _ => Err(RuntimeError::invalid_operands("*")),
            },
            Type::Div => match (lhs, rhs) {
                (Value::Num(lhs), Value::Num(rhs)) => Ok(Value::Num(lhs.div(rhs)?)),
                _ => Err(RuntimeError::invalid_operands("/")),
            },
            Type::Mod => match (lhs, rhs) {
                (Value::Num(lhs), Value::Num(rhs)) => Ok(Value::Num(lhs.rem(rhs)?)),
                _ => Err(RuntimeError::invalid_operands("%")),
            },
            Type::Exp => match (lhs, rhs) {
                (Value::Num(lhs), Value::Num(rhs)) => Ok(Value::Num(lhs.pow(rhs))),
                _ => Err(RuntimeError::invalid_operands("**")),
            },
            Type::Eq => Ok(Value::from(lhs == rhs)),
            Type::Ne => Ok(Value::from(lhs != rhs)),
            Type::Lt => match (lhs, rhs) {
                (Value::Num(lhs), Value::Num(rhs)) => Ok(Value::from(lhs < rhs)),
                (Value::Str(lhs), Value::Str(rhs)) => Ok(Value::from(lhs < rhs)),
                _ => Err(RuntimeError::invalid_operands("<")),
            },
            Type::Le => match (lhs, rhs) {
                (Value::Num(lhs), Value::Num(rhs)) => Ok(Value::from(lhs <= rhs)),
                (Value::Str(lhs), Value::Str(rhs)) => Ok(Value::from(lhs <= rhs)),
                _ => Err(RuntimeError::invalid_operands("<=")),
            },
            Type::Gt => match (lhs, rhs) {
                (Value::Num(lhs), Value::Num(rhs)) => Ok(Value::from(lhs > rhs)),
                (Value::Str(lhs), Value::Str(rhs)) => Ok(Value::from(lhs > rhs)),
                _ => Err(RuntimeError::invalid_operands(">")),
            },
            Type::Ge => match (lhs, rhs) {
                (Value::Num(lhs), Value::Num(rhs)) => Ok(Value::from(lhs >= rhs)),
                (Value::Str(lhs), Value::Str(rhs)) => Ok(Value::from(lhs >= rhs)),
                _ => Err(RuntimeError::invalid_operands(">=")),
            },
            _ => Err(RuntimeError::invalid_operands(&op.text)),
        }
    }

    // The right side binds first and the expression as a whole is silent,
    // an assignment never contributes to the program output.
    fn eval_assignment(
        &mut self,
        target: &Expr,
        value: &Expr,
        scope: ScopeId,
    ) -> Result<Value, RuntimeError> {
        let value = self.eval_expr(value, scope)?;

        match target {
            Expr::Variable { name } => {
                self.env.define_variable(scope, name, value);
                Ok(Value::None)
            }
            _ => Err(RuntimeError::InvalidAssignmentTarget),
        }
    }

    fn eval_unary(
        &mut self,
        op: &Token,
        operand: &Expr,
        scope: ScopeId,
    ) -> Result<Value, RuntimeError> {
        let value = self.eval_expr(operand, scope)?;

        match (op.ty, value) {
            (Type::Minus, Value::Num(value)) => Ok(Value::Num(value.neg())),
            _ => Err(RuntimeError::invalid_operands(&op.text)),
        }
    }

    fn eval_call(&mut self, name: &str, args: &[Expr], scope: ScopeId) -> Result<Value, RuntimeError> {
        // print never goes through the routine namespace.
        if name == "print" {
            return self.eval_print(args, scope);
        }

        let routine = match self.env.routine(scope, name) {
            Some(routine) => routine,
            None => return Err(RuntimeError::undefined_routine(name)),
        };

        if routine.params.len() != args.len() {
            return Err(RuntimeError::arity_mismatch(
                name,
                routine.params.len(),
                args.len(),
            ));
        }

        // Arguments are evaluated in the caller's scope. The body runs in a
        // fresh scope chained to the globals, so a routine sees its
        // parameters and global bindings, never the caller's locals.
        let mut evaluated = Vec::new();
        for arg in args {
            evaluated.push(self.eval_expr(arg, scope)?);
        }

        let call_scope = self.env.push(GLOBAL);
        for (param, value) in routine.params.iter().zip(evaluated) {
            self.env.define_variable(call_scope, param, value);
        }

        let mut produced = Vec::new();
        let result = self.eval_stmt(&routine.body, call_scope, &mut produced);
        // The call scope is dropped even when the body fails.
        self.env.pop(call_scope);
        result?;

        // The call's value is the last value the body produced.
        Ok(produced.pop().unwrap_or(Value::None))
    }

    fn eval_print(&mut self, args: &[Expr], scope: ScopeId) -> Result<Value, RuntimeError> {
        let mut rendered = Vec::new();
        for arg in args {
            rendered.push(self.eval_expr(arg, scope)?.to_string());
        }

        writeln!(RefCell::borrow_mut(&self.stdout), "{}", rendered.join(" ")).unwrap();
        Ok(Value::None)
    }
}
