//! Precedence-climbing parser producing an expression tree.

use crate::error::{ExpressionError, Result};
use crate::lexer::{tokenize, Token};
use crate::value::Value;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Expr {
    Literal(Value),
    Identifier(String),
    Unary(&'static str, Box<Expr>),
    Binary(&'static str, Box<Expr>, Box<Expr>),
    Ternary(Box<Expr>, Box<Expr>, Box<Expr>),
    Call(String, Vec<Expr>),
}

/// Binding power of binary operators, loosest first.
fn precedence(op: &str) -> Option<(u8, bool)> {
    // (power, right associative)
    let entry = match op {
        "||" => (1, false),
        "&&" => (2, false),
        "|" => (3, false),
        "^" => (4, false),
        "&" => (5, false),
        "==" | "!=" => (6, false),
        "<" | "<=" | ">" | ">=" => (7, false),
        "<<" | ">>" => (8, false),
        "+" | "-" => (9, false),
        "*" | "/" | "%" => (10, false),
        "**" => (11, true),
        _ => return None,
    };
    Some(entry)
}

/// Deepest expression tree, and deepest parameter reference chain, that is evaluated.
pub(crate) const MAX_DEPTH: usize = 256;

pub(crate) fn parse(input: &str) -> Result<Expr> {
    let tokens = tokenize(input)?;
    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
    };
    let (expr, _) = parser.ternary()?;
    match parser.peek() {
        None => Ok(expr),
        Some((token, position)) => Err(ExpressionError::UnexpectedToken {
            found: token.describe(),
            position: *position,
        }),
    }
}

/// A parsed subtree and its height.
type Parsed = (Expr, usize);

fn grow(children: &[usize]) -> Result<usize> {
    let height = children.iter().copied().max().unwrap_or(0) + 1;
    if height > MAX_DEPTH {
        return Err(ExpressionError::TooDeep(MAX_DEPTH));
    }
    Ok(height)
}

struct Parser {
    tokens: Vec<(Token, usize)>,
    pos: usize,
    /// Active recursive calls.
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<&(Token, usize)> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Result<(Token, usize)> {
        let item = self
            .tokens
            .get(self.pos)
            .cloned()
            .ok_or(ExpressionError::UnexpectedEnd)?;
        self.pos += 1;
        Ok(item)
    }

    fn expect(&mut self, expected: Token) -> Result<()> {
        let (token, position) = self.next()?;
        if token == expected {
            Ok(())
        } else {
            Err(ExpressionError::UnexpectedToken {
                found: token.describe(),
                position,
            })
        }
    }

    fn nested<T>(&mut self, rule: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        if self.depth >= MAX_DEPTH {
            return Err(ExpressionError::TooDeep(MAX_DEPTH));
        }
        self.depth += 1;
        let result = rule(self);
        self.depth -= 1;
        result
    }

    fn ternary(&mut self) -> Result<Parsed> {
        self.nested(|p| {
            let (condition, height) = p.binary(1)?;
            if matches!(p.peek(), Some((Token::Question, _))) {
                p.pos += 1;
                let (then, then_height) = p.ternary()?;
                p.expect(Token::Colon)?;
                let (otherwise, otherwise_height) = p.ternary()?;
                let height = grow(&[height, then_height, otherwise_height])?;
                let expr = Expr::Ternary(Box::new(condition), Box::new(then), Box::new(otherwise));
                return Ok((expr, height));
            }
            Ok((condition, height))
        })
    }

    fn binary(&mut self, min_power: u8) -> Result<Parsed> {
        self.nested(|p| {
            let (mut lhs, mut height) = p.unary()?;
            loop {
                let Some((Token::Operator(op), _)) = p.peek() else {
                    break;
                };
                let op = *op;
                let Some((power, right_assoc)) = precedence(op) else {
                    break;
                };
                if power < min_power {
                    break;
                }
                p.pos += 1;
                let next_min = if right_assoc { power } else { power + 1 };
                let (rhs, rhs_height) = p.binary(next_min)?;
                height = grow(&[height, rhs_height])?;
                lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs));
            }
            Ok((lhs, height))
        })
    }

    fn unary(&mut self) -> Result<Parsed> {
        if let Some((Token::Operator(op), _)) = self.peek() {
            let op = *op;
            if matches!(op, "+" | "-" | "!" | "~") {
                self.pos += 1;
                let (operand, height) = self.nested(Self::unary)?;
                return Ok((Expr::Unary(op, Box::new(operand)), grow(&[height])?));
            }
        }
        self.primary()
    }

    fn primary(&mut self) -> Result<Parsed> {
        let (token, position) = self.next()?;
        match token {
            Token::Literal(value) => Ok((Expr::Literal(value), 1)),
            Token::Identifier(name) => Ok((Expr::Identifier(name), 1)),
            Token::LParen => {
                let inner = self.ternary()?;
                self.expect(Token::RParen)?;
                Ok(inner)
            }
            Token::Function(name) => {
                self.expect(Token::LParen)?;
                let mut args = Vec::new();
                let mut heights = Vec::new();
                if !matches!(self.peek(), Some((Token::RParen, _))) {
                    loop {
                        let (arg, height) = self.ternary()?;
                        args.push(arg);
                        heights.push(height);
                        if matches!(self.peek(), Some((Token::Comma, _))) {
                            self.pos += 1;
                        } else {
                            break;
                        }
                    }
                }
                self.expect(Token::RParen)?;
                Ok((Expr::Call(name, args), grow(&heights)?))
            }
            other => Err(ExpressionError::UnexpectedToken {
                found: other.describe(),
                position,
            }),
        }
    }
}
