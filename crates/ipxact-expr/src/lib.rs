//! SystemVerilog constant-expression evaluation.
//!
//! IP-XACT stores widths, offsets, ranges and parameter values as expression
//! text. Validators only need to know whether such text evaluates and, if so,
//! to what integer. [`ExpressionParser`] is that seam;
//! [`SystemVerilogParser`] implements it over a [`ParameterScope`] so that
//! identifiers resolve to other parameters by id or by name.
//!
//! ```
//! use ipxact_expr::{ExpressionParser, ParameterScope, SystemVerilogParser};
//!
//! let mut scope = ParameterScope::new();
//! scope.insert("uuid_width", "WIDTH", "16");
//! let parser = SystemVerilogParser::with_scope(scope);
//! assert_eq!(parser.integer_value("WIDTH / 8 - 1"), Some(1));
//! assert!(!parser.is_valid_expression("WIDTH +"));
//! ```

pub mod error;
mod eval;
mod lexer;
mod parser;
pub mod value;

pub use error::{ExpressionError, Result};
pub use eval::{ParameterScope, SystemVerilogParser};
pub use value::Value;

/// Evaluates expression text found in documents.
///
/// Implementations must not retain state between calls; validators share one
/// parser across threads.
pub trait ExpressionParser: Send + Sync {
    /// Evaluate `expression`. Blank text evaluates to [`Value::Empty`].
    fn parse_expression(&self, expression: &str) -> Result<Value>;

    /// True when the text evaluates, including blank text.
    fn is_valid_expression(&self, expression: &str) -> bool {
        self.parse_expression(expression).is_ok()
    }

    /// Integer value of the text, `None` for blank, real, text or invalid input.
    fn integer_value(&self, expression: &str) -> Option<i128> {
        self.parse_expression(expression).ok()?.as_integer()
    }

    /// Non-negative integer value that fits in 64 bits.
    fn unsigned_value(&self, expression: &str) -> Option<u64> {
        u64::try_from(self.integer_value(expression)?).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn parser_is_shareable() {
        assert_send_sync::<SystemVerilogParser>();
        let parser: Box<dyn ExpressionParser> = Box::new(SystemVerilogParser::new());
        assert_eq!(parser.integer_value("4'b1111"), Some(15));
    }

    #[test]
    fn helper_views() {
        let parser = SystemVerilogParser::new();
        assert!(parser.is_valid_expression(""));
        assert_eq!(parser.integer_value(""), None);
        assert_eq!(parser.integer_value("1.5"), None);
        assert_eq!(parser.unsigned_value("-1"), None);
        assert_eq!(parser.unsigned_value("0x10"), Some(16));
    }

    #[test]
    fn evaluation_is_repeatable() {
        let mut scope = ParameterScope::new();
        scope.insert("a", "A", "3");
        let parser = SystemVerilogParser::with_scope(scope);
        let first = parser.parse_expression("A * A");
        let second = parser.parse_expression("A * A");
        assert_eq!(first, second);
        assert_eq!(first, Ok(Value::Int(9)));
    }
}
