//! Evaluation of parsed expressions against a parameter scope.

use std::collections::HashMap;

use crate::error::{ExpressionError, Result};
use crate::parser::{parse, Expr, MAX_DEPTH};
use crate::value::Value;
use crate::ExpressionParser;

/// Parameter values visible to an expression, keyed by id.
///
/// Lookups try the id first and fall back to the parameter name.
#[derive(Debug, Clone, Default)]
pub struct ParameterScope {
    values: HashMap<String, String>,
    names: HashMap<String, String>,
}

impl ParameterScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a parameter. A later insert with the same id replaces the value.
    pub fn insert(
        &mut self,
        id: impl Into<String>,
        name: impl Into<String>,
        expression: impl Into<String>,
    ) {
        let id = id.into();
        let name = name.into();
        if !name.is_empty() {
            self.names.entry(name).or_insert_with(|| id.clone());
        }
        self.values.insert(id, expression.into());
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn resolve(&self, reference: &str) -> Option<(&str, &str)> {
        if let Some((id, expr)) = self.values.get_key_value(reference) {
            return Some((id.as_str(), expr.as_str()));
        }
        let id = self.names.get(reference)?;
        self.values
            .get(id)
            .map(|expr| (id.as_str(), expr.as_str()))
    }
}

/// SystemVerilog constant-expression evaluator.
#[derive(Debug, Clone, Default)]
pub struct SystemVerilogParser {
    scope: ParameterScope,
}

impl SystemVerilogParser {
    /// An evaluator with no parameters in scope.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_scope(scope: ParameterScope) -> Self {
        Self { scope }
    }

    pub fn scope(&self) -> &ParameterScope {
        &self.scope
    }

    fn evaluate_text(&self, text: &str, stack: &mut Vec<String>) -> Result<Value> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(Value::Empty);
        }
        let expr = parse(text)?;
        self.eval(&expr, stack)
    }

    fn eval(&self, expr: &Expr, stack: &mut Vec<String>) -> Result<Value> {
        match expr {
            Expr::Literal(v) => Ok(v.clone()),
            Expr::Identifier(name) => self.reference(name, stack),
            Expr::Unary(op, operand) => {
                let value = self.eval(operand, stack)?;
                unary(op, value)
            }
            Expr::Binary(op, lhs, rhs) => {
                let lhs = self.eval(lhs, stack)?;
                // Short-circuit the logical operators.
                match *op {
                    "&&" if !truthy(op, &lhs)? => return Ok(Value::Int(0)),
                    "||" if truthy(op, &lhs)? => return Ok(Value::Int(1)),
                    _ => {}
                }
                let rhs = self.eval(rhs, stack)?;
                binary(op, lhs, rhs)
            }
            Expr::Ternary(condition, then, otherwise) => {
                let condition = self.eval(condition, stack)?;
                if truthy("?:", &condition)? {
                    self.eval(then, stack)
                } else {
                    self.eval(otherwise, stack)
                }
            }
            Expr::Call(name, args) => {
                let values = args
                    .iter()
                    .map(|a| self.eval(a, stack))
                    .collect::<Result<Vec<_>>>()?;
                call(name, &values)
            }
        }
    }

    fn reference(&self, name: &str, stack: &mut Vec<String>) -> Result<Value> {
        let (id, text) = self
            .scope
            .resolve(name)
            .ok_or_else(|| ExpressionError::UnknownIdentifier(name.to_string()))?;
        if stack.iter().any(|visiting| visiting == id) {
            return Err(ExpressionError::CyclicReference(id.to_string()));
        }
        if stack.len() >= MAX_DEPTH {
            return Err(ExpressionError::TooDeep(MAX_DEPTH));
        }
        stack.push(id.to_string());
        let value = self.evaluate_text(text, stack);
        stack.pop();
        value
    }
}

impl ExpressionParser for SystemVerilogParser {
    fn parse_expression(&self, expression: &str) -> Result<Value> {
        self.evaluate_text(expression, &mut Vec::new())
    }
}

fn mismatch(op: &str, value: &Value) -> ExpressionError {
    ExpressionError::TypeMismatch {
        operator: op.to_string(),
        operand: value.kind().to_string(),
    }
}

fn truthy(op: &str, value: &Value) -> Result<bool> {
    match value {
        Value::Int(v) => Ok(*v != 0),
        Value::Real(v) => Ok(*v != 0.0),
        other => Err(mismatch(op, other)),
    }
}

fn bool_value(b: bool) -> Value {
    Value::Int(i128::from(b))
}

fn unary(op: &str, value: Value) -> Result<Value> {
    match (op, value) {
        ("+", v @ (Value::Int(_) | Value::Real(_))) => Ok(v),
        ("-", Value::Int(v)) => v.checked_neg().map(Value::Int).ok_or(ExpressionError::Overflow),
        ("-", Value::Real(v)) => Ok(Value::Real(-v)),
        ("!", v) => Ok(bool_value(!truthy(op, &v)?)),
        ("~", Value::Int(v)) => Ok(Value::Int(!v)),
        (_, v) => Err(mismatch(op, &v)),
    }
}

fn binary(op: &str, lhs: Value, rhs: Value) -> Result<Value> {
    if matches!(op, "==" | "!=") {
        if let (Value::Text(a), Value::Text(b)) = (&lhs, &rhs) {
            return Ok(bool_value((a == b) == (op == "==")));
        }
    }
    if matches!(op, "&&" | "||") {
        return Ok(bool_value(truthy(op, &rhs)?));
    }

    match (&lhs, &rhs) {
        (Value::Int(a), Value::Int(b)) => integer_binary(op, *a, *b),
        (Value::Int(_) | Value::Real(_), Value::Int(_) | Value::Real(_)) => {
            let (Some(a), Some(b)) = (lhs.as_real(), rhs.as_real()) else {
                return Err(mismatch(op, &lhs));
            };
            real_binary(op, a, b).ok_or_else(|| mismatch(op, &Value::Real(a)))
        }
        (Value::Int(_) | Value::Real(_), other) | (other, _) => Err(mismatch(op, other)),
    }
}

fn integer_binary(op: &str, a: i128, b: i128) -> Result<Value> {
    let overflow = ExpressionError::Overflow;
    let value = match op {
        "+" => a.checked_add(b).ok_or(overflow)?,
        "-" => a.checked_sub(b).ok_or(overflow)?,
        "*" => a.checked_mul(b).ok_or(overflow)?,
        "/" | "%" if b == 0 => return Err(ExpressionError::DivisionByZero),
        "/" => a.checked_div(b).ok_or(overflow)?,
        "%" => a.checked_rem(b).ok_or(overflow)?,
        "**" => {
            if b < 0 {
                return Ok(Value::Real((a as f64).powf(b as f64)));
            }
            let exp = u32::try_from(b).map_err(|_| ExpressionError::Overflow)?;
            a.checked_pow(exp).ok_or(overflow)?
        }
        "<<" | ">>" => {
            let shift = u32::try_from(b).map_err(|_| ExpressionError::Overflow)?;
            if op == "<<" {
                a.checked_shl(shift).ok_or(overflow)?
            } else {
                a.checked_shr(shift).ok_or(overflow)?
            }
        }
        "&" => a & b,
        "|" => a | b,
        "^" => a ^ b,
        "<" => i128::from(a < b),
        "<=" => i128::from(a <= b),
        ">" => i128::from(a > b),
        ">=" => i128::from(a >= b),
        "==" => i128::from(a == b),
        "!=" => i128::from(a != b),
        _ => {
            return Err(ExpressionError::TypeMismatch {
                operator: op.to_string(),
                operand: "integer".into(),
            })
        }
    };
    Ok(Value::Int(value))
}

/// Real arithmetic; `None` for the integer-only operators.
fn real_binary(op: &str, a: f64, b: f64) -> Option<Value> {
    let value = match op {
        "+" => Value::Real(a + b),
        "-" => Value::Real(a - b),
        "*" => Value::Real(a * b),
        "/" => Value::Real(a / b),
        "**" => Value::Real(a.powf(b)),
        "<" => bool_value(a < b),
        "<=" => bool_value(a <= b),
        ">" => bool_value(a > b),
        ">=" => bool_value(a >= b),
        "==" => bool_value(a == b),
        "!=" => bool_value(a != b),
        _ => return None,
    };
    Some(value)
}

fn arity(name: &str, args: &[Value], expected: usize) -> Result<()> {
    if args.len() == expected {
        Ok(())
    } else {
        Err(ExpressionError::Arity {
            function: format!("${name}"),
            expected,
            found: args.len(),
        })
    }
}

fn number(name: &str, value: &Value) -> Result<f64> {
    value.as_real().ok_or_else(|| mismatch(&format!("${name}"), value))
}

fn call(name: &str, args: &[Value]) -> Result<Value> {
    match name {
        "clog2" => {
            arity(name, args, 1)?;
            let Value::Int(n) = args[0] else {
                return Err(mismatch("$clog2", &args[0]));
            };
            if n <= 1 {
                return Ok(Value::Int(0));
            }
            let bits = 128 - (n - 1).leading_zeros();
            Ok(Value::Int(i128::from(bits)))
        }
        "pow" => {
            arity(name, args, 2)?;
            binary("**", args[0].clone(), args[1].clone())
        }
        "sqrt" => {
            arity(name, args, 1)?;
            Ok(Value::Real(number(name, &args[0])?.sqrt()))
        }
        "ceil" | "floor" => {
            arity(name, args, 1)?;
            let v = number(name, &args[0])?;
            let rounded = if name == "ceil" { v.ceil() } else { v.floor() };
            if !rounded.is_finite() || rounded.abs() > i128::MAX as f64 {
                return Err(ExpressionError::Overflow);
            }
            Ok(Value::Int(rounded as i128))
        }
        "abs" => {
            arity(name, args, 1)?;
            match &args[0] {
                Value::Int(v) => v.checked_abs().map(Value::Int).ok_or(ExpressionError::Overflow),
                Value::Real(v) => Ok(Value::Real(v.abs())),
                other => Err(mismatch("$abs", other)),
            }
        }
        _ => Err(ExpressionError::UnknownFunction(format!("${name}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(text: &str) -> Result<Value> {
        SystemVerilogParser::new().parse_expression(text)
    }

    fn scoped(params: &[(&str, &str, &str)]) -> SystemVerilogParser {
        let mut scope = ParameterScope::new();
        for (id, name, expr) in params {
            scope.insert(*id, *name, *expr);
        }
        SystemVerilogParser::with_scope(scope)
    }

    #[test]
    fn arithmetic_and_precedence() {
        assert_eq!(eval("1 + 2 * 3").unwrap(), Value::Int(7));
        assert_eq!(eval("(1 + 2) * 3").unwrap(), Value::Int(9));
        assert_eq!(eval("2 ** 10").unwrap(), Value::Int(1024));
        assert_eq!(eval("-4 + 1").unwrap(), Value::Int(-3));
        assert_eq!(eval("17 % 5").unwrap(), Value::Int(2));
        assert_eq!(eval("1 << 4 | 1").unwrap(), Value::Int(17));
    }

    #[test]
    fn empty_text_is_empty_value() {
        assert_eq!(eval("   ").unwrap(), Value::Empty);
    }

    #[test]
    fn reals_propagate() {
        assert_eq!(eval("1 + 0.5").unwrap(), Value::Real(1.5));
        assert_eq!(eval("2 ** -1").unwrap(), Value::Real(0.5));
        assert_eq!(eval("1.5 < 2").unwrap(), Value::Int(1));
    }

    #[test]
    fn comparisons_and_logic() {
        assert_eq!(eval("3 >= 3 && 2 != 1").unwrap(), Value::Int(1));
        assert_eq!(eval("0 || 0").unwrap(), Value::Int(0));
        assert_eq!(eval("!5").unwrap(), Value::Int(0));
        assert_eq!(eval("\"a\" == \"a\"").unwrap(), Value::Int(1));
        assert_eq!(eval("0 && (1 / 0)").unwrap(), Value::Int(0));
    }

    #[test]
    fn ternary_selects_branch() {
        assert_eq!(eval("1 ? 10 : 20").unwrap(), Value::Int(10));
        assert_eq!(eval("0 ? 10 : 0 ? 20 : 30").unwrap(), Value::Int(30));
    }

    #[test]
    fn system_functions() {
        assert_eq!(eval("$clog2(1)").unwrap(), Value::Int(0));
        assert_eq!(eval("$clog2(8)").unwrap(), Value::Int(3));
        assert_eq!(eval("$clog2(9)").unwrap(), Value::Int(4));
        assert_eq!(eval("$pow(2, 8)").unwrap(), Value::Int(256));
        assert_eq!(eval("$sqrt(16)").unwrap(), Value::Real(4.0));
        assert_eq!(eval("$ceil(1.2)").unwrap(), Value::Int(2));
        assert_eq!(eval("$floor(1.8)").unwrap(), Value::Int(1));
        assert_eq!(eval("$abs(-7)").unwrap(), Value::Int(7));
    }

    #[test]
    fn evaluation_errors() {
        assert_eq!(eval("1 / 0"), Err(ExpressionError::DivisionByZero));
        assert!(matches!(eval("$clog2(1, 2)"), Err(ExpressionError::Arity { .. })));
        assert!(matches!(eval("$nope(1)"), Err(ExpressionError::UnknownFunction(_))));
        assert!(matches!(eval("WIDTH"), Err(ExpressionError::UnknownIdentifier(_))));
        assert!(matches!(eval("1.5 & 1"), Err(ExpressionError::TypeMismatch { .. })));
        assert!(matches!(eval("\"a\" + 1"), Err(ExpressionError::TypeMismatch { .. })));
        assert_eq!(eval("2 ** 200"), Err(ExpressionError::Overflow));
    }

    #[test]
    fn parameters_by_id_and_name() {
        let parser = scoped(&[("uuid_1", "WIDTH", "8"), ("uuid_2", "DEPTH", "uuid_1 * 4")]);
        assert_eq!(parser.parse_expression("WIDTH - 1").unwrap(), Value::Int(7));
        assert_eq!(parser.parse_expression("uuid_2").unwrap(), Value::Int(32));
        assert_eq!(parser.parse_expression("$clog2(DEPTH)").unwrap(), Value::Int(5));
    }

    #[test]
    fn cycles_are_reported() {
        let parser = scoped(&[("a", "A", "b + 1"), ("b", "B", "a + 1")]);
        assert!(matches!(
            parser.parse_expression("A"),
            Err(ExpressionError::CyclicReference(_))
        ));
        let selfish = scoped(&[("p", "P", "p")]);
        assert!(!selfish.is_valid_expression("P"));
    }

    #[test]
    fn long_reference_chains_are_bounded() {
        let mut scope = ParameterScope::new();
        scope.insert("p0", "P0", "1");
        for i in 1..10_000 {
            scope.insert(format!("p{i}"), format!("P{i}"), format!("p{} + 1", i - 1));
        }
        let parser = SystemVerilogParser::with_scope(scope);
        assert_eq!(parser.parse_expression("P100").unwrap(), Value::Int(101));
        assert_eq!(
            parser.parse_expression("P9999"),
            Err(ExpressionError::TooDeep(MAX_DEPTH))
        );
    }

    #[test]
    fn diamond_references_are_not_cycles() {
        let parser = scoped(&[("a", "A", "1"), ("b", "B", "A + A"), ("c", "C", "B * A")]);
        assert_eq!(parser.parse_expression("C + B").unwrap(), Value::Int(4));
    }
}
