use brisk_core::{Token, Type};

use crate::ast::{Expr, Program, Stmt};
use crate::error::ParseError;
use crate::value::Number;

// Shorter return types for the descent helpers
type StmtResult = Result<Stmt, ParseError>;
type ExprResult = Result<Expr, ParseError>;

pub struct Parser<'a> {
    tokens: &'a [Token],
    current: usize,
    eof: Token,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        Parser {
            tokens,
            current: 0,
            eof: Token::eof(),
        }
    }

    // The first error aborts the parse, there is no recovery and no
    // partial tree.
    pub fn parse(&mut self) -> Result<Program, ParseError> {
        let mut statements = Vec::new();
        while !self.is_at_end() {
            statements.push(self.statement()?);
        }

        Ok(Program(Stmt::block(statements)))
    }

    fn statement(&mut self) -> StmtResult {
        if self.match_one(Type::If) {
            self.if_statement()
        } else if self.match_one(Type::While) {
            self.while_statement()
        } else if self.match_one(Type::Routine) {
            self.routine_declaration()
        } else {
            self.expression_statement()
        }
    }

    fn expression_statement(&mut self) -> StmtResult {
        let expr = self.expression()?;
        self.consume(Type::Period)?;
        Ok(Stmt::expression(expr))
    }

    fn if_statement(&mut self) -> StmtResult {
        let condition = self.expression()?;
        self.consume(Type::Then)?;
        let then_branch = self.block(&[Type::Else, Type::End])?;

        let else_branch = if self.match_one(Type::Else) {
            Some(self.block(&[Type::End])?)
        } else {
            None
        };

        self.consume(Type::End)?;
        Ok(Stmt::if_(condition, then_branch, else_branch))
    }

    fn while_statement(&mut self) -> StmtResult {
        let condition = self.expression()?;
        self.consume(Type::Do)?;
        let body = self.block(&[Type::End])?;
        self.consume(Type::End)?;
        Ok(Stmt::while_(condition, body))
    }

    fn routine_declaration(&mut self) -> StmtResult {
        let name = self.consume(Type::Identifier)?.text.clone();
        self.consume(Type::LParen)?;

        let mut params = Vec::new();
        while !self.check(Type::RParen) && !self.is_at_end() {
            params.push(self.consume(Type::Identifier)?.text.clone());
        }
        self.consume(Type::RParen)?;

        let body = self.block(&[Type::End])?;
        self.consume(Type::End)?;
        Ok(Stmt::routine(&name, params, body))
    }

    // Collects statements up to, but not including, one of the terminator
    // keywords. The caller consumes the terminator itself, so running out
    // of input surfaces as a missing terminator there.
    fn block(&mut self, terminators: &[Type]) -> StmtResult {
        let mut statements = Vec::new();
        while !self.check_any(terminators) && !self.is_at_end() {
            statements.push(self.statement()?);
        }

        Ok(Stmt::block(statements))
    }

    fn expression(&mut self) -> ExprResult {
        self.assignment()
    }

    // right-recursive
    fn assignment(&mut self) -> ExprResult {
        let expr = self.equality()?;

        if self.match_one(Type::Colon) {
            let op = self.previous().clone();
            let value = self.assignment()?;
            return Ok(Expr::binary(op, expr, value));
        }

        Ok(expr)
    }

    fn equality(&mut self) -> ExprResult {
        let mut expr = self.comparison()?;

        while self.match_either(&[Type::Eq, Type::Ne]) {
            let op = self.previous().clone();
            let rhs = self.comparison()?;
            expr = Expr::binary(op, expr, rhs);
        }

        Ok(expr)
    }

    fn comparison(&mut self) -> ExprResult {
        let mut expr = self.addition()?;

        while self.match_either(&[Type::Lt, Type::Le, Type::Gt, Type::Ge]) {
            let op = self.previous().clone();
            let rhs = self.addition()?;
            expr = Expr::binary(op, expr, rhs);
        }

        Ok(expr)
    }

    fn addition(&mut self) -> ExprResult {
        let mut expr = self.multiplication()?;

        while self.match_either(&[Type::Plus, Type::Minus]) {
            let op = self.previous().clone();
            let rhs = self.multiplication()?;
            expr = Expr::binary(op, expr, rhs);
        }

        Ok(expr)
    }

    fn multiplication(&mut self) -> ExprResult {
        let mut expr = self.exponent()?;

        while self.match_either(&[Type::Mul, Type::Div, Type::Mod]) {
            let op = self.previous().clone();
            let rhs = self.exponent()?;
            expr = Expr::binary(op, expr, rhs);
        }

        Ok(expr)
    }

    // right-recursive
    fn exponent(&mut self) -> ExprResult {
        let expr = self.unary()?;

        if self.match_one(Type::Exp) {
            let op = self.previous().clone();
            let rhs = self.exponent()?;
            return Ok(Expr::binary(op, expr, rhs));
        }

        Ok(expr)
    }

    fn unary(&mut self) -> ExprResult {
        if self.match_one(Type::Minus) {
            let op = self.previous().clone();
            let operand = self.unary()?;
            return Ok(Expr::unary(op, operand));
        }

        self.primary()
    }

    fn primary(&mut self) -> ExprResult {
        if self.match_one(Type::Number) {
            let value = self.number_literal()?;
            Ok(Expr::number(value))
        } else if self.match_one(Type::Str) {
            Ok(Expr::string(&self.previous().text))
        } else if self.match_one(Type::Identifier) {
            let name = self.previous().text.clone();
            if self.match_one(Type::LParen) {
                self.finish_call(&name)
            } else {
                Ok(Expr::variable(&name))
            }
        } else if self.match_one(Type::LParen) {
            // Parentheses rebind precedence only, there is no grouping node.
            let expr = self.expression()?;
            self.consume(Type::RParen)?;
            Ok(expr)
        } else {
            Err(ParseError::expected_expression(self.peek()))
        }
    }

    // A lexeme without a decimal point is an integer; anything else,
    // including an integer too wide for i64, is kept as a float.
    fn number_literal(&self) -> Result<Number, ParseError> {
        let token = self.previous();

        if !token.text.contains('.') {
            if let Ok(value) = token.text.parse::<i64>() {
                return Ok(Number::from(value));
            }
        }

        match token.text.parse::<f64>() {
            Ok(value) => Ok(Number::from(value)),
            Err(_) => Err(ParseError::expected_expression(token)),
        }
    }

    // Arguments are not delimited, each one is a full expression.
    fn finish_call(&mut self, name: &str) -> ExprResult {
        let mut args = Vec::new();
        while !self.check(Type::RParen) && !self.is_at_end() {
            args.push(self.expression()?);
        }

        self.consume(Type::RParen)?;
        Ok(Expr::call(name, args))
    }

    fn is_at_end(&self) -> bool {
        self.peek().ty == Type::Eof
    }

    fn check(&self, ty: Type) -> bool {
        if self.is_at_end() {
            false
        } else {
            self.peek().ty == ty
        }
    }

    fn check_any(&self, types: &[Type]) -> bool {
        types.iter().any(|ty| self.check(*ty))
    }

    fn consume(&mut self, ty: Type) -> Result<&Token, ParseError> {
        if self.check(ty) {
            Ok(self.advance())
        } else {
            Err(ParseError::unexpected(ty, self.peek()))
        }
    }

    fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.current += 1;
        }

        self.previous()
    }

    // The token stream usually ends with an explicit end-of-input token,
    // but reads past the end synthesize one so lookahead is always valid.
    fn peek(&self) -> &Token {
        self.tokens.get(self.current).unwrap_or(&self.eof)
    }

    fn previous(&self) -> &Token {
        &self.tokens[self.current - 1]
    }

    fn match_either(&mut self, types: &[Type]) -> bool {
        for ty in types {
            if self.match_one(*ty) {
                // Already skipped in the `match_one`, just return result
                return true;
            }
        }

        false
    }

    fn match_one(&mut self, ty: Type) -> bool {
        if self.check(ty) {
            self.advance();
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use brisk_core::{Scanner, Token, Type};

    use crate::ast::{Expr, Program, Stmt};
    use crate::error::ParseError;
    use crate::parser::Parser;

    macro_rules! token {
        ($ty:ident, $lex:literal) => {
            Token::new(Type::$ty, String::from($lex))
        };
    }

    fn parse(src: &str) -> Result<Program, ParseError> {
        let tokens = Scanner::new(src).scan_tokens().unwrap();
        Parser::new(&tokens).parse()
    }

    #[test]
    fn test_statements() {
        let tests = [
            // multiplication binds tighter than addition
            (
                "1 + 2 * 3.",
                Stmt::expression(Expr::binary(
                    token!(Plus, "+"),
                    Expr::number(1),
                    Expr::binary(token!(Mul, "*"), Expr::number(2), Expr::number(3)),
                )),
            ),
            // parentheses rebind without a node of their own
            (
                "(1 + 2) * 3.",
                Stmt::expression(Expr::binary(
                    token!(Mul, "*"),
                    Expr::binary(token!(Plus, "+"), Expr::number(1), Expr::number(2)),
                    Expr::number(3),
                )),
            ),
            // comparison sits below equality
            (
                "1 + 2 < 4 = 1.",
                Stmt::expression(Expr::binary(
                    token!(Eq, "="),
                    Expr::binary(
                        token!(Lt, "<"),
                        Expr::binary(token!(Plus, "+"), Expr::number(1), Expr::number(2)),
                        Expr::number(4),
                    ),
                    Expr::number(1),
                )),
            ),
            // unary minus binds tighter than the exponent
            (
                "-2 ** 2.",
                Stmt::expression(Expr::binary(
                    token!(Exp, "**"),
                    Expr::unary(token!(Minus, "-"), Expr::number(2)),
                    Expr::number(2),
                )),
            ),
            // a dot after an integer ends the statement instead of
            // starting a fraction
            ("7.", Stmt::expression(Expr::number(7))),
            ("2.5.", Stmt::expression(Expr::number(2.5))),
            // assignment is an ordinary binary node at this stage
            (
                "x : \"hello\".",
                Stmt::expression(Expr::binary(
                    token!(Colon, ":"),
                    Expr::variable("x"),
                    Expr::string("hello"),
                )),
            ),
            // call arguments are juxtaposed, each a full expression
            (
                "agg(1 2 n - 1).",
                Stmt::expression(Expr::call(
                    "agg",
                    vec![
                        Expr::number(1),
                        Expr::number(2),
                        Expr::binary(token!(Minus, "-"), Expr::variable("n"), Expr::number(1)),
                    ],
                )),
            ),
            ("now().", Stmt::expression(Expr::call("now", Vec::new()))),
        ];

        for (src, expected) in tests {
            assert_eq!(
                parse(src).unwrap(),
                Program(Stmt::block(vec![expected])),
                "source: {}",
                src
            );
        }
    }

    #[test]
    fn test_block_statements() {
        let tests = [
            (
                "if x < 1 then 1. else 2. end",
                Stmt::if_(
                    Expr::binary(token!(Lt, "<"), Expr::variable("x"), Expr::number(1)),
                    Stmt::block(vec![Stmt::expression(Expr::number(1))]),
                    Some(Stmt::block(vec![Stmt::expression(Expr::number(2))])),
                ),
            ),
            (
                "if x then 1. end",
                Stmt::if_(
                    Expr::variable("x"),
                    Stmt::block(vec![Stmt::expression(Expr::number(1))]),
                    None,
                ),
            ),
            (
                "while n < 5 do n : n + 1. end",
                Stmt::while_(
                    Expr::binary(token!(Lt, "<"), Expr::variable("n"), Expr::number(5)),
                    Stmt::block(vec![Stmt::expression(Expr::binary(
                        token!(Colon, ":"),
                        Expr::variable("n"),
                        Expr::binary(token!(Plus, "+"), Expr::variable("n"), Expr::number(1)),
                    ))]),
                ),
            ),
            (
                "routine add(a b) a + b. end",
                Stmt::routine(
                    "add",
                    vec![String::from("a"), String::from("b")],
                    Stmt::block(vec![Stmt::expression(Expr::binary(
                        token!(Plus, "+"),
                        Expr::variable("a"),
                        Expr::variable("b"),
                    ))]),
                ),
            ),
            (
                "routine beep() print(\"beep\"). end",
                Stmt::routine(
                    "beep",
                    Vec::new(),
                    Stmt::block(vec![Stmt::expression(Expr::call(
                        "print",
                        vec![Expr::string("beep")],
                    ))]),
                ),
            ),
        ];

        for (src, expected) in tests {
            assert_eq!(
                parse(src).unwrap(),
                Program(Stmt::block(vec![expected])),
                "source: {}",
                src
            );
        }
    }

    #[test]
    fn test_right_associativity() {
        let tests = [
            (
                "2 ** 3 ** 2.",
                Stmt::expression(Expr::binary(
                    token!(Exp, "**"),
                    Expr::number(2),
                    Expr::binary(token!(Exp, "**"), Expr::number(3), Expr::number(2)),
                )),
            ),
            (
                "x : y : 1.",
                Stmt::expression(Expr::binary(
                    token!(Colon, ":"),
                    Expr::variable("x"),
                    Expr::binary(token!(Colon, ":"), Expr::variable("y"), Expr::number(1)),
                )),
            ),
        ];

        for (src, expected) in tests {
            assert_eq!(
                parse(src).unwrap(),
                Program(Stmt::block(vec![expected])),
                "source: {}",
                src
            );
        }
    }

    #[test]
    fn test_program_collects_statements() {
        assert_eq!(
            parse("x : 1. x + 1.").unwrap(),
            Program(Stmt::block(vec![
                Stmt::expression(Expr::binary(
                    token!(Colon, ":"),
                    Expr::variable("x"),
                    Expr::number(1),
                )),
                Stmt::expression(Expr::binary(
                    token!(Plus, "+"),
                    Expr::variable("x"),
                    Expr::number(1),
                )),
            ]))
        );
    }

    #[test]
    fn test_parse_errors() {
        let tests = [
            (
                "1 +.",
                ParseError::expected_expression(&token!(Period, ".")),
            ),
            (
                "(1 + 2.",
                ParseError::unexpected(Type::RParen, &token!(Period, ".")),
            ),
            ("1 + 2", ParseError::unexpected(Type::Period, &Token::eof())),
            (
                "if 1 then 2.",
                ParseError::unexpected(Type::End, &Token::eof()),
            ),
            (
                "while 1 2.",
                ParseError::unexpected(Type::Do, &token!(Number, "2")),
            ),
            (
                "routine 1() end",
                ParseError::unexpected(Type::Identifier, &token!(Number, "1")),
            ),
        ];

        for (src, expected) in tests {
            let tokens = Scanner::new(src).scan_tokens().unwrap();
            let err = Parser::new(&tokens).parse().unwrap_err();
            assert_eq!(err, expected, "source: {}", src);
        }
    }
}
