//! Evaluated expression values.

use std::fmt;

/// Result of evaluating an expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// The expression text was empty.
    Empty,
    Int(i128),
    Real(f64),
    Text(String),
}

impl Value {
    /// Integer interpretation; reals and text have none.
    pub fn as_integer(&self) -> Option<i128> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Numeric interpretation of integers and reals.
    pub fn as_real(&self) -> Option<f64> {
        match self {
            Value::Int(v) => Some(*v as f64),
            Value::Real(v) => Some(*v),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Value::Empty)
    }

    pub(crate) fn kind(&self) -> &'static str {
        match self {
            Value::Empty => "empty value",
            Value::Int(_) => "integer",
            Value::Real(_) => "real",
            Value::Text(_) => "string",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Empty => Ok(()),
            Value::Int(v) => write!(f, "{v}"),
            Value::Real(v) => write!(f, "{v}"),
            Value::Text(s) => write!(f, "\"{s}\""),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_views() {
        assert_eq!(Value::Int(4).as_integer(), Some(4));
        assert_eq!(Value::Real(1.5).as_integer(), None);
        assert_eq!(Value::Int(2).as_real(), Some(2.0));
        assert_eq!(Value::Text("a".into()).as_real(), None);
        assert_eq!(Value::Empty.as_integer(), None);
    }

    #[test]
    fn display_forms() {
        assert_eq!(Value::Int(-3).to_string(), "-3");
        assert_eq!(Value::Real(0.25).to_string(), "0.25");
        assert_eq!(Value::Text("x".into()).to_string(), "\"x\"");
        assert_eq!(Value::Empty.to_string(), "");
    }
}
