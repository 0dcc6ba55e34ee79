//! Recursive-descent parser with precedence climbing for binary operators.
//!
//! Two entry points mirror base spec §4.4's two eval modes: [`parse_expression`]
//! for attribute values that must be a single expression (`show`, `class`,
//! `if`, loop sources, interpolation) and [`parse_statements`] for handler
//! bodies (`on-*`, `init`) that may contain `;`-separated statements and a
//! simple `if`/`else`.

use super::ast::*;
use super::lexer::{LexError, Lexer, Token};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    #[error("lex error: {0}")]
    Lex(#[from] LexError),
    #[error("unexpected token {found}, expected {expected}")]
    Unexpected { found: String, expected: String },
    #[error("unexpected end of expression")]
    UnexpectedEof,
}

pub fn parse_expression(src: &str) -> Result<Expr, ParseError> {
    let tokens = Lexer::new(src).tokenize()?;
    let mut p = Parser { tokens, pos: 0 };
    let expr = p.assignment()?;
    p.expect(Token::Eof)?;
    Ok(expr)
}

pub fn parse_statements(src: &str) -> Result<Vec<Stmt>, ParseError> {
    let tokens = Lexer::new(src).tokenize()?;
    let mut p = Parser { tokens, pos: 0 };
    let mut stmts = Vec::new();
    while p.peek() != &Token::Eof {
        stmts.push(p.statement()?);
        while p.peek() == &Token::Semicolon {
            p.bump();
        }
    }
    Ok(stmts)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> &Token {
        &self.tokens[self.pos]
    }

    fn bump(&mut self) -> Token {
        let t = self.tokens[self.pos].clone();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        t
    }

    fn expect(&mut self, expected: Token) -> Result<(), ParseError> {
        if *self.peek() == expected {
            self.bump();
            Ok(())
        } else {
            Err(ParseError::Unexpected {
                found: self.peek().to_string(),
                expected: format!("{expected:?}"),
            })
        }
    }

    fn eat(&mut self, tok: &Token) -> bool {
        if self.peek() == tok {
            self.bump();
            true
        } else {
            false
        }
    }

    // ---- statements ----

    fn statement(&mut self) -> Result<Stmt, ParseError> {
        match self.peek() {
            Token::Ident(name) if name == "if" => self.if_statement(),
            Token::LBrace => self.block(),
            _ => Ok(Stmt::Expr(self.assignment()?)),
        }
    }

    fn block(&mut self) -> Result<Stmt, ParseError> {
        self.expect(Token::LBrace)?;
        let mut stmts = Vec::new();
        while *self.peek() != Token::RBrace {
            stmts.push(self.statement()?);
            while self.eat(&Token::Semicolon) {}
        }
        self.expect(Token::RBrace)?;
        Ok(Stmt::Block(stmts))
    }

    fn if_statement(&mut self) -> Result<Stmt, ParseError> {
        self.bump(); // `if`
        self.expect(Token::LParen)?;
        let test = self.assignment()?;
        self.expect(Token::RParen)?;
        let consequent = Box::new(self.statement()?);
        let alternate = if matches!(self.peek(), Token::Ident(n) if n == "else") {
            self.bump();
            Some(Box::new(self.statement()?))
        } else {
            None
        };
        Ok(Stmt::If { test, consequent, alternate })
    }

    // ---- expressions, lowest to highest precedence ----

    fn assignment(&mut self) -> Result<Expr, ParseError> {
        let target = self.ternary()?;
        let op = match self.peek() {
            Token::Eq => Some(AssignOp::Assign),
            Token::PlusEq => Some(AssignOp::AddAssign),
            Token::MinusEq => Some(AssignOp::SubAssign),
            Token::StarEq => Some(AssignOp::MulAssign),
            Token::SlashEq => Some(AssignOp::DivAssign),
            _ => None,
        };
        if let Some(op) = op {
            self.bump();
            let value = self.assignment()?;
            return Ok(Expr::Assignment { op, target: Box::new(target), value: Box::new(value) });
        }
        Ok(target)
    }

    fn ternary(&mut self) -> Result<Expr, ParseError> {
        let test = self.nullish()?;
        if self.eat(&Token::Question) {
            let consequent = self.assignment()?;
            self.expect(Token::Colon)?;
            let alternate = self.assignment()?;
            return Ok(Expr::Conditional {
                test: Box::new(test),
                consequent: Box::new(consequent),
                alternate: Box::new(alternate),
            });
        }
        Ok(test)
    }

    fn nullish(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.or()?;
        while self.eat(&Token::QuestionQuestion) {
            let right = self.or()?;
            left = Expr::Logical { op: LogicalOp::NullishCoalesce, left: Box::new(left), right: Box::new(right) };
        }
        Ok(left)
    }

    fn or(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.and()?;
        while self.eat(&Token::PipePipe) {
            let right = self.and()?;
            left = Expr::Logical { op: LogicalOp::Or, left: Box::new(left), right: Box::new(right) };
        }
        Ok(left)
    }

    fn and(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.equality()?;
        while self.eat(&Token::AmpAmp) {
            let right = self.equality()?;
            left = Expr::Logical { op: LogicalOp::And, left: Box::new(left), right: Box::new(right) };
        }
        Ok(left)
    }

    fn equality(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.relational()?;
        loop {
            let op = match self.peek() {
                Token::EqEq | Token::EqEqEq => BinaryOp::Eq,
                Token::NotEq | Token::NotEqEq => BinaryOp::NotEq,
                _ => break,
            };
            self.bump();
            let right = self.relational()?;
            left = Expr::Binary { op, left: Box::new(left), right: Box::new(right) };
        }
        Ok(left)
    }

    fn relational(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.additive()?;
        loop {
            let op = match self.peek() {
                Token::Lt => BinaryOp::Lt,
                Token::LtEq => BinaryOp::LtEq,
                Token::Gt => BinaryOp::Gt,
                Token::GtEq => BinaryOp::GtEq,
                _ => break,
            };
            self.bump();
            let right = self.additive()?;
            left = Expr::Binary { op, left: Box::new(left), right: Box::new(right) };
        }
        Ok(left)
    }

    fn additive(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.multiplicative()?;
        loop {
            let op = match self.peek() {
                Token::Plus => BinaryOp::Add,
                Token::Minus => BinaryOp::Sub,
                _ => break,
            };
            self.bump();
            let right = self.multiplicative()?;
            left = Expr::Binary { op, left: Box::new(left), right: Box::new(right) };
        }
        Ok(left)
    }

    fn multiplicative(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.unary()?;
        loop {
            let op = match self.peek() {
                Token::Star => BinaryOp::Mul,
                Token::Slash => BinaryOp::Div,
                Token::Percent => BinaryOp::Mod,
                _ => break,
            };
            self.bump();
            let right = self.unary()?;
            left = Expr::Binary { op, left: Box::new(left), right: Box::new(right) };
        }
        Ok(left)
    }

    fn unary(&mut self) -> Result<Expr, ParseError> {
        let op = match self.peek() {
            Token::Bang => Some(UnaryOp::Not),
            Token::Minus => Some(UnaryOp::Neg),
            Token::Plus => Some(UnaryOp::Plus),
            Token::Ident(n) if n == "typeof" => Some(UnaryOp::Typeof),
            _ => None,
        };
        if let Some(op) = op {
            self.bump();
            let expr = self.unary()?;
            return Ok(Expr::Unary { op, expr: Box::new(expr) });
        }
        if self.eat(&Token::PlusPlus) {
            let target = self.unary()?;
            return Ok(Expr::Update { op: UpdateOp::Increment, prefix: true, target: Box::new(target) });
        }
        if self.eat(&Token::MinusMinus) {
            let target = self.unary()?;
            return Ok(Expr::Update { op: UpdateOp::Decrement, prefix: true, target: Box::new(target) });
        }
        self.postfix()
    }

    fn postfix(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.call_or_member()?;
        if self.eat(&Token::PlusPlus) {
            expr = Expr::Update { op: UpdateOp::Increment, prefix: false, target: Box::new(expr) };
        } else if self.eat(&Token::MinusMinus) {
            expr = Expr::Update { op: UpdateOp::Decrement, prefix: false, target: Box::new(expr) };
        }
        Ok(expr)
    }

    fn call_or_member(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.primary()?;
        loop {
            match self.peek() {
                Token::Dot => {
                    self.bump();
                    let name = self.ident_name()?;
                    expr = Expr::Member { object: Box::new(expr), property: MemberProp::Static(name), optional: false };
                }
                Token::OptionalDot => {
                    self.bump();
                    let name = self.ident_name()?;
                    expr = Expr::Member { object: Box::new(expr), property: MemberProp::Static(name), optional: true };
                }
                Token::LBracket => {
                    self.bump();
                    let index = self.assignment()?;
                    self.expect(Token::RBracket)?;
                    expr = Expr::Member { object: Box::new(expr), property: MemberProp::Computed(Box::new(index)), optional: false };
                }
                Token::LParen => {
                    self.bump();
                    let args = self.call_args()?;
                    expr = Expr::Call { callee: Box::new(expr), args, optional: false };
                }
                _ => break,
            }
        }
        Ok(expr)
    }

    fn call_args(&mut self) -> Result<Vec<Expr>, ParseError> {
        let mut args = Vec::new();
        if !self.eat(&Token::RParen) {
            loop {
                args.push(self.assignment()?);
                if self.eat(&Token::Comma) {
                    continue;
                }
                self.expect(Token::RParen)?;
                break;
            }
        }
        Ok(args)
    }

    fn ident_name(&mut self) -> Result<String, ParseError> {
        match self.bump() {
            Token::Ident(s) => Ok(s),
            other => Err(ParseError::Unexpected { found: other.to_string(), expected: "identifier".into() }),
        }
    }

    fn primary(&mut self) -> Result<Expr, ParseError> {
        match self.bump() {
            Token::Number(n) => Ok(Expr::Literal(Literal::Number(n))),
            Token::String(s) => Ok(Expr::Literal(Literal::String(s))),
            Token::True => Ok(Expr::Literal(Literal::Bool(true))),
            Token::False => Ok(Expr::Literal(Literal::Bool(false))),
            Token::Null => Ok(Expr::Literal(Literal::Null)),
            Token::Undefined => Ok(Expr::Literal(Literal::Undefined)),
            Token::Ident(name) => Ok(Expr::Identifier(name)),
            Token::LParen => {
                let expr = self.assignment()?;
                self.expect(Token::RParen)?;
                Ok(expr)
            }
            Token::LBracket => self.array_literal(),
            Token::LBrace => self.object_literal(),
            Token::Minus => {
                let expr = self.unary()?;
                Ok(Expr::Unary { op: UnaryOp::Neg, expr: Box::new(expr) })
            }
            Token::Eof => Err(ParseError::UnexpectedEof),
            other => Err(ParseError::Unexpected { found: other.to_string(), expected: "expression".into() }),
        }
    }

    fn array_literal(&mut self) -> Result<Expr, ParseError> {
        let mut items = Vec::new();
        if !self.eat(&Token::RBracket) {
            loop {
                items.push(self.assignment()?);
                if self.eat(&Token::Comma) {
                    continue;
                }
                self.expect(Token::RBracket)?;
                break;
            }
        }
        Ok(Expr::Array(items))
    }

    fn object_literal(&mut self) -> Result<Expr, ParseError> {
        let mut props = Vec::new();
        if !self.eat(&Token::RBrace) {
            loop {
                let key = match self.bump() {
                    Token::Ident(s) => PropKey::Ident(s),
                    Token::String(s) => PropKey::String(s),
                    Token::LBracket => {
                        let e = self.assignment()?;
                        self.expect(Token::RBracket)?;
                        PropKey::Computed(Box::new(e))
                    }
                    other => {
                        return Err(ParseError::Unexpected { found: other.to_string(), expected: "property key".into() })
                    }
                };
                self.expect(Token::Colon)?;
                let value = self.assignment()?;
                props.push((key, value));
                if self.eat(&Token::Comma) {
                    continue;
                }
                self.expect(Token::RBrace)?;
                break;
            }
        }
        Ok(Expr::Object(props))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_arithmetic_with_precedence() {
        let expr = parse_expression("1 + 2 * 3").unwrap();
        assert_eq!(
            expr,
            Expr::Binary {
                op: BinaryOp::Add,
                left: Box::new(Expr::Literal(Literal::Number(1.0))),
                right: Box::new(Expr::Binary {
                    op: BinaryOp::Mul,
                    left: Box::new(Expr::Literal(Literal::Number(2.0))),
                    right: Box::new(Expr::Literal(Literal::Number(3.0))),
                }),
            }
        );
    }

    #[test]
    fn parses_member_and_call_chain() {
        let expr = parse_expression("todos.length > 0").unwrap();
        assert_eq!(
            expr,
            Expr::Binary {
                op: BinaryOp::Gt,
                left: Box::new(Expr::Member {
                    object: Box::new(Expr::Identifier("todos".into())),
                    property: MemberProp::Static("length".into()),
                    optional: false,
                }),
                right: Box::new(Expr::Literal(Literal::Number(0.0))),
            }
        );
    }

    #[test]
    fn parses_ternary_and_assignment() {
        assert!(parse_expression("done ? 'yes' : 'no'").is_ok());
        assert!(parse_expression("count = count + 1").is_ok());
    }

    #[test]
    fn parses_statement_sequence_with_if() {
        let stmts = parse_statements("count++; if (count > 10) { count = 0 }").unwrap();
        assert_eq!(stmts.len(), 2);
        assert!(matches!(stmts[0], Stmt::Expr(Expr::Update { .. })));
        assert!(matches!(stmts[1], Stmt::If { .. }));
    }

    #[test]
    fn rejects_trailing_garbage_in_expression_mode() {
        assert!(parse_expression("1 + 2 3").is_err());
    }
}
