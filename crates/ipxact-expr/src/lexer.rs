//! Tokenizer for SystemVerilog constant expressions.

use crate::error::{ExpressionError, Result};
use crate::value::Value;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Token {
    Literal(Value),
    Identifier(String),
    /// `$name` system function.
    Function(String),
    Operator(&'static str),
    LParen,
    RParen,
    Comma,
    Question,
    Colon,
}

impl Token {
    pub(crate) fn describe(&self) -> String {
        match self {
            Token::Literal(v) => format!("literal {v}"),
            Token::Identifier(name) => format!("identifier '{name}'"),
            Token::Function(name) => format!("function '${name}'"),
            Token::Operator(op) => format!("operator '{op}'"),
            Token::LParen => "'('".into(),
            Token::RParen => "')'".into(),
            Token::Comma => "','".into(),
            Token::Question => "'?'".into(),
            Token::Colon => "':'".into(),
        }
    }
}

/// Operators ordered so that longer spellings match first.
const OPERATORS: &[&str] = &[
    "**", "<<", ">>", "<=", ">=", "==", "!=", "&&", "||", "+", "-", "*", "/", "%", "<", ">", "&",
    "|", "^", "!", "~",
];

/// Split `input` into tokens paired with their byte offsets.
pub(crate) fn tokenize(input: &str) -> Result<Vec<(Token, usize)>> {
    let bytes = input.as_bytes();
    let mut tokens = Vec::new();
    let mut pos = 0;

    while pos < bytes.len() {
        let c = bytes[pos] as char;
        if c.is_ascii_whitespace() {
            pos += 1;
            continue;
        }

        let start = pos;
        let token = match c {
            '(' => {
                pos += 1;
                Token::LParen
            }
            ')' => {
                pos += 1;
                Token::RParen
            }
            ',' => {
                pos += 1;
                Token::Comma
            }
            '?' => {
                pos += 1;
                Token::Question
            }
            ':' => {
                pos += 1;
                Token::Colon
            }
            '"' => {
                let end = input[pos + 1..]
                    .find('"')
                    .ok_or(ExpressionError::UnexpectedEnd)?;
                let text = input[pos + 1..pos + 1 + end].to_string();
                pos += end + 2;
                Token::Literal(Value::Text(text))
            }
            '$' => {
                let len = identifier_len(&input[pos + 1..]);
                if len == 0 {
                    return Err(ExpressionError::UnexpectedCharacter { ch: c, position: pos });
                }
                let name = input[pos + 1..pos + 1 + len].to_string();
                pos += len + 1;
                Token::Function(name)
            }
            '\'' | '0'..='9' => {
                let (value, len) = number(&input[pos..])?;
                pos += len;
                Token::Literal(value)
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                let len = identifier_len(&input[pos..]);
                let word = &input[pos..pos + len];
                pos += len;
                match word {
                    "true" => Token::Literal(Value::Int(1)),
                    "false" => Token::Literal(Value::Int(0)),
                    _ => Token::Identifier(word.to_string()),
                }
            }
            _ => {
                let op = OPERATORS
                    .iter()
                    .find(|op| input[pos..].starts_with(**op))
                    .ok_or_else(|| ExpressionError::UnexpectedCharacter {
                        ch: input[pos..].chars().next().unwrap_or(c),
                        position: pos,
                    })?;
                pos += op.len();
                Token::Operator(*op)
            }
        };
        tokens.push((token, start));
    }

    Ok(tokens)
}

fn identifier_len(s: &str) -> usize {
    s.bytes()
        .take_while(|b| b.is_ascii_alphanumeric() || *b == b'_')
        .count()
}

/// Parse a numeric literal at the start of `s`, returning the value and its length.
fn number(s: &str) -> Result<(Value, usize)> {
    let bytes = s.as_bytes();

    if s.starts_with("0x") || s.starts_with("0X") {
        let digits_len = digit_run(&s[2..], |b| b.is_ascii_hexdigit());
        let text = &s[..2 + digits_len];
        let value = radix_value(&s[2..2 + digits_len], 16, text)?;
        return Ok((Value::Int(value), text.len()));
    }

    let size_len = digit_run(s, |b| b.is_ascii_digit());
    if bytes.get(size_len) == Some(&b'\'') {
        return based(s, size_len);
    }

    // Decimal integer or real.
    let mut len = size_len;
    let mut is_real = false;
    if bytes.get(len) == Some(&b'.') && bytes.get(len + 1).is_some_and(u8::is_ascii_digit) {
        is_real = true;
        len += 1 + digit_run(&s[len + 1..], |b| b.is_ascii_digit());
    }
    if matches!(bytes.get(len), Some(b'e') | Some(b'E')) {
        let mut exp = len + 1;
        if matches!(bytes.get(exp), Some(b'+') | Some(b'-')) {
            exp += 1;
        }
        let exp_digits = digit_run(&s[exp..], |b| b.is_ascii_digit());
        if exp_digits > 0 {
            is_real = true;
            len = exp + exp_digits;
        }
    }

    let text = &s[..len];
    let clean: String = text.chars().filter(|c| *c != '_').collect();
    if is_real {
        let value: f64 = clean
            .parse()
            .map_err(|_| ExpressionError::InvalidLiteral(text.to_string()))?;
        Ok((Value::Real(value), len))
    } else {
        let value: i128 = clean
            .parse()
            .map_err(|_| ExpressionError::InvalidLiteral(text.to_string()))?;
        Ok((Value::Int(value), len))
    }
}

/// `[size]'[s]<base><digits>` with the size already measured.
fn based(s: &str, size_len: usize) -> Result<(Value, usize)> {
    let bytes = s.as_bytes();
    let mut pos = size_len + 1;
    if matches!(bytes.get(pos), Some(b's') | Some(b'S')) {
        pos += 1;
    }
    let radix = match bytes.get(pos).map(|b| b.to_ascii_lowercase()) {
        Some(b'b') => 2,
        Some(b'o') => 8,
        Some(b'd') => 10,
        Some(b'h') => 16,
        _ => {
            let mut text = s[..pos].to_string();
            text.extend(s[pos..].chars().next());
            return Err(ExpressionError::InvalidLiteral(text));
        }
    };
    pos += 1;
    let digits_len = digit_run(&s[pos..], |b| b.is_ascii_alphanumeric());
    let text = &s[..pos + digits_len];
    let mut value = radix_value(&s[pos..pos + digits_len], radix, text)?;

    if size_len > 0 {
        let size: u32 = s[..size_len]
            .replace('_', "")
            .parse()
            .map_err(|_| ExpressionError::InvalidLiteral(text.to_string()))?;
        if size == 0 {
            return Err(ExpressionError::InvalidLiteral(text.to_string()));
        }
        if size < 127 {
            value &= (1i128 << size) - 1;
        }
    }

    Ok((Value::Int(value), text.len()))
}

fn digit_run(s: &str, accept: impl Fn(&u8) -> bool) -> usize {
    s.bytes().take_while(|b| accept(b) || *b == b'_').count()
}

fn radix_value(digits: &str, radix: u32, text: &str) -> Result<i128> {
    let clean: String = digits.chars().filter(|c| *c != '_').collect();
    if clean.is_empty() {
        return Err(ExpressionError::InvalidLiteral(text.to_string()));
    }
    i128::from_str_radix(&clean, radix)
        .map_err(|_| ExpressionError::InvalidLiteral(text.to_string()))
}
