//! Timing constraints of wire ports.

use ipxact_core::abstraction::{PortAbstraction, TimingConstraint};
use ipxact_expr::ExpressionParser;

use crate::finding::{Category, Finding};
use crate::Validator;

/// Validates timing constraints against the logical ports that may serve as clocks.
pub struct TimingConstraintValidator<'a> {
    parser: &'a dyn ExpressionParser,
    logical_ports: &'a [PortAbstraction],
}

impl<'a> TimingConstraintValidator<'a> {
    pub fn new(parser: &'a dyn ExpressionParser, logical_ports: &'a [PortAbstraction]) -> Self {
        Self {
            parser,
            logical_ports,
        }
    }

    /// Value must be a percentage of the clock cycle.
    fn has_valid_value(&self, constraint: &TimingConstraint) -> bool {
        self.parser
            .parse_expression(&constraint.value)
            .ok()
            .and_then(|v| v.as_real())
            .is_some_and(|v| (0.0..=100.0).contains(&v))
    }
}

impl Validator<TimingConstraint> for TimingConstraintValidator<'_> {
    fn find_errors_in(
        &self,
        errors: &mut Vec<Finding>,
        constraint: &TimingConstraint,
        context: &str,
    ) {
        if !self.has_valid_value(constraint) {
            errors.push(Finding::new(
                Category::InvalidExpression,
                format!(
                    "Invalid timing constraint value '{}' in {context}; expected 0 to 100.",
                    constraint.value
                ),
            ));
        }

        if !matches!(constraint.clock_edge.as_str(), "" | "rise" | "fall") {
            errors.push(Finding::new(
                Category::InvalidExpression,
                format!(
                    "Invalid clock edge '{}' for timing constraint in {context}.",
                    constraint.clock_edge
                ),
            ));
        }

        if !matches!(constraint.delay_type.as_str(), "" | "min" | "max") {
            errors.push(Finding::new(
                Category::InvalidExpression,
                format!(
                    "Invalid delay type '{}' for timing constraint in {context}.",
                    constraint.delay_type
                ),
            ));
        }

        if constraint.clock_name.trim().is_empty() {
            errors.push(Finding::new(
                Category::MissingElement,
                format!("Clock name must be set for timing constraint in {context}."),
            ));
        } else if !self
            .logical_ports
            .iter()
            .any(|p| p.logical_name == constraint.clock_name)
        {
            errors.push(Finding::new(
                Category::UnresolvedReference,
                format!(
                    "Clock {} of timing constraint in {context} is not a logical port.",
                    constraint.clock_name
                ),
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ipxact_core::abstraction::WireAbstraction;
    use ipxact_expr::SystemVerilogParser;

    fn ports() -> Vec<PortAbstraction> {
        vec![PortAbstraction::wire("CLK", WireAbstraction::default())]
    }

    fn constraint(value: &str, clock: &str) -> TimingConstraint {
        TimingConstraint {
            value: value.into(),
            clock_name: clock.into(),
            ..TimingConstraint::default()
        }
    }

    #[test]
    fn percentage_range() {
        let parser = SystemVerilogParser::new();
        let ports = ports();
        let validator = TimingConstraintValidator::new(&parser, &ports);
        assert!(validator.validate(&constraint("50", "CLK")));
        assert!(validator.validate(&constraint("12.5", "CLK")));
        assert!(!validator.validate(&constraint("101", "CLK")));
        assert!(!validator.validate(&constraint("-1", "CLK")));
        assert!(!validator.validate(&constraint("", "CLK")));
    }

    #[test]
    fn clock_must_be_logical_port() {
        let parser = SystemVerilogParser::new();
        let ports = ports();
        let validator = TimingConstraintValidator::new(&parser, &ports);
        let errors = validator.findings(&constraint("10", "HCLK"), "port DATA");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].category, Category::UnresolvedReference);
        assert!(!validator.validate(&constraint("10", "")));
    }

    #[test]
    fn edge_and_delay_enumerations() {
        let parser = SystemVerilogParser::new();
        let ports = ports();
        let validator = TimingConstraintValidator::new(&parser, &ports);
        let mut tc = constraint("10", "CLK");
        tc.clock_edge = "fall".into();
        tc.delay_type = "max".into();
        assert!(validator.validate(&tc));
        tc.clock_edge = "both".into();
        tc.delay_type = "typ".into();
        assert_eq!(validator.findings(&tc, "port DATA").len(), 2);
    }
}
