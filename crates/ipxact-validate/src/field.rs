//! Register field validation.

use ipxact_core::memory::Field;
use ipxact_core::parameter::Choice;
use ipxact_core::types::AccessType;
use ipxact_core::Revision;
use ipxact_expr::ExpressionParser;

use crate::common::{has_valid_is_present, has_valid_name};
use crate::finding::{Category, Finding};
use crate::parameter::ParameterValidator;
use crate::Validator;

pub struct FieldValidator<'a> {
    parser: &'a dyn ExpressionParser,
    parameters: ParameterValidator<'a>,
}

impl<'a> FieldValidator<'a> {
    pub fn new(
        parser: &'a dyn ExpressionParser,
        choices: &'a [Choice],
        revision: Revision,
    ) -> Self {
        Self {
            parser,
            parameters: ParameterValidator::new(parser, choices, revision),
        }
    }

    pub fn has_valid_bit_offset(&self, field: &Field) -> bool {
        self.parser.unsigned_value(&field.bit_offset).is_some()
    }

    pub fn has_valid_bit_width(&self, field: &Field) -> bool {
        self.parser.integer_value(&field.bit_width).is_some_and(|w| w > 0)
    }

    /// Unset, or a non-negative integer.
    fn is_bit_expression_valid(&self, expression: &str) -> bool {
        expression.trim().is_empty() || self.parser.unsigned_value(expression).is_some()
    }

    pub fn has_valid_reset_value(&self, field: &Field) -> bool {
        self.is_bit_expression_valid(&field.reset_value)
    }

    /// A mask is meaningless without a reset value.
    pub fn has_valid_reset_mask(&self, field: &Field) -> bool {
        if field.reset_mask.trim().is_empty() {
            return true;
        }
        !field.reset_value.trim().is_empty() && self.is_bit_expression_valid(&field.reset_mask)
    }

    pub fn has_valid_access(&self, field: &Field) -> bool {
        match field.access {
            Some(AccessType::ReadOnly) => field.modified_write.is_empty(),
            Some(AccessType::WriteOnly | AccessType::WriteOnce) => field.read_action.is_empty(),
            _ => true,
        }
    }
}

impl Validator<Field> for FieldValidator<'_> {
    fn find_errors_in(&self, errors: &mut Vec<Finding>, field: &Field, context: &str) {
        let name = &field.name;

        if !has_valid_name(name) {
            errors.push(Finding::new(
                Category::MissingElement,
                format!("Invalid name specified for field {name} within {context}"),
            ));
        }

        if !has_valid_is_present(self.parser, &field.is_present) {
            errors.push(Finding::new(
                Category::InvalidExpression,
                format!(
                    "Invalid isPresent value specified for {name} within {context}. Value should evaluate to 0 or 1."
                ),
            ));
        }

        if !self.has_valid_bit_offset(field) {
            errors.push(Finding::new(
                Category::InvalidExpression,
                format!("Invalid bit offset set for field {name} within {context}"),
            ));
        }

        if !self.has_valid_reset_value(field) {
            errors.push(Finding::new(
                Category::InvalidExpression,
                format!("Invalid reset value set for field {name} within {context}"),
            ));
        }

        if !self.has_valid_reset_mask(field) {
            errors.push(Finding::new(
                Category::InvalidExpression,
                format!("Invalid reset mask set for field {name} within {context}"),
            ));
        }

        if !has_valid_is_present(self.parser, &field.reserved) {
            errors.push(Finding::new(
                Category::InvalidExpression,
                format!("Invalid reserved set for field {name} within {context}"),
            ));
        }

        if !self.has_valid_bit_width(field) {
            errors.push(Finding::new(
                Category::InvalidExpression,
                format!("Invalid bit width set for field {name} within {context}"),
            ));
        }

        match field.access {
            Some(AccessType::ReadOnly) if !field.modified_write.is_empty() => {
                errors.push(Finding::new(
                    Category::Inconsistency,
                    format!(
                        "In field {name} within {context}, access type readOnly does not allow a field to include a modified write value."
                    ),
                ));
            }
            Some(AccessType::WriteOnly | AccessType::WriteOnce)
                if !field.read_action.is_empty() =>
            {
                errors.push(Finding::new(
                    Category::Inconsistency,
                    format!(
                        "In field {name} within {context}, access type write only and write once do not allow a field to include a read action value."
                    ),
                ));
            }
            _ => {}
        }

        self.parameters
            .find_errors_in_list(errors, &field.parameters, &format!("field {name}"), context);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ipxact_expr::SystemVerilogParser;

    #[test]
    fn valid_field() {
        let parser = SystemVerilogParser::new();
        let validator = FieldValidator::new(&parser, &[], Revision::Std14);
        let mut field = Field::new("enable", "0", "1");
        field.reset_value = "1'b0".into();
        field.reset_mask = "1'b1".into();
        assert!(validator.validate(&field));
    }

    #[test]
    fn offsets_and_widths() {
        let parser = SystemVerilogParser::new();
        let validator = FieldValidator::new(&parser, &[], Revision::Std14);
        assert!(!validator.validate(&Field::new("f", "-1", "1")));
        assert!(!validator.validate(&Field::new("f", "0", "0")));
        assert!(!validator.validate(&Field::new("f", "", "4")));
    }

    #[test]
    fn mask_requires_value() {
        let parser = SystemVerilogParser::new();
        let validator = FieldValidator::new(&parser, &[], Revision::Std14);
        let mut field = Field::new("f", "0", "4");
        field.reset_mask = "4'hF".into();
        let errors = validator.findings(&field, "register ctrl");
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("reset mask"));
    }

    #[test]
    fn access_restrictions() {
        let parser = SystemVerilogParser::new();
        let validator = FieldValidator::new(&parser, &[], Revision::Std14);

        let mut read_only = Field::new("status", "0", "8");
        read_only.access = Some(AccessType::ReadOnly);
        read_only.modified_write = "oneToClear".into();
        assert!(!validator.validate(&read_only));

        let mut write_once = Field::new("key", "0", "8");
        write_once.access = Some(AccessType::WriteOnce);
        write_once.read_action = "clear".into();
        assert!(!validator.validate(&write_once));

        write_once.read_action.clear();
        assert!(validator.validate(&write_once));
    }

    #[test]
    fn reserved_must_be_boolean() {
        let parser = SystemVerilogParser::new();
        let validator = FieldValidator::new(&parser, &[], Revision::Std14);
        let mut field = Field::new("f", "0", "1");
        field.reserved = "2".into();
        assert!(!validator.validate(&field));
        field.reserved = "1".into();
        assert!(validator.validate(&field));
    }
}
