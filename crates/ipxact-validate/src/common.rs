//! Checks shared by several validators.

use ipxact_expr::ExpressionParser;

/// Names must contain something other than whitespace.
pub fn has_valid_name(name: &str) -> bool {
    !name.trim().is_empty()
}

/// An `isPresent` expression is valid when unset or evaluating to 0 or 1.
pub fn has_valid_is_present(parser: &dyn ExpressionParser, is_present: &str) -> bool {
    is_present.trim().is_empty() || matches!(parser.integer_value(is_present), Some(0 | 1))
}

/// Whether an element with the given `isPresent` takes part in layout checks.
///
/// Unset means present; anything not evaluating to a non-zero integer is absent.
pub fn is_present(parser: &dyn ExpressionParser, is_present: &str) -> bool {
    if is_present.trim().is_empty() {
        return true;
    }
    parser.integer_value(is_present).is_some_and(|v| v != 0)
}

/// Names that occur more than once, each reported once in order of its second occurrence.
pub fn duplicate_names<'a>(names: impl IntoIterator<Item = &'a str>) -> Vec<&'a str> {
    let mut seen: Vec<&str> = Vec::new();
    let mut duplicates: Vec<&str> = Vec::new();
    for name in names {
        if seen.contains(&name) {
            if !duplicates.contains(&name) {
                duplicates.push(name);
            }
        } else {
            seen.push(name);
        }
    }
    duplicates
}

#[cfg(test)]
mod tests {
    use super::*;
    use ipxact_expr::SystemVerilogParser;

    #[test]
    fn names() {
        assert!(has_valid_name("clk"));
        assert!(!has_valid_name(""));
        assert!(!has_valid_name(" \t"));
    }

    #[test]
    fn presence_expressions() {
        let parser = SystemVerilogParser::new();
        assert!(has_valid_is_present(&parser, ""));
        assert!(has_valid_is_present(&parser, "1"));
        assert!(has_valid_is_present(&parser, "2 - 2"));
        assert!(!has_valid_is_present(&parser, "2"));
        assert!(!has_valid_is_present(&parser, "x +"));

        assert!(is_present(&parser, ""));
        assert!(is_present(&parser, "1"));
        assert!(!is_present(&parser, "0"));
    }

    #[test]
    fn duplicates_reported_once() {
        let names = ["a", "b", "a", "c", "a", "b"];
        assert_eq!(duplicate_names(names.iter().copied()), vec!["a", "b"]);
    }
}
