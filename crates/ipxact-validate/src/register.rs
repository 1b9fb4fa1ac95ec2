//! Register validation, including the layout of its fields.

use ipxact_core::memory::{Field, Register};
use ipxact_core::parameter::Choice;
use ipxact_core::types::AccessType;
use ipxact_core::Revision;
use ipxact_expr::ExpressionParser;

use crate::common::{has_valid_is_present, has_valid_name, is_present};
use crate::field::FieldValidator;
use crate::finding::{Category, Finding};
use crate::memory_reserve::{span_fits, MemoryReserve};
use crate::parameter::ParameterValidator;
use crate::Validator;

fn access_name(access: Option<AccessType>) -> &'static str {
    access.map(AccessType::as_str).unwrap_or("")
}

pub struct RegisterValidator<'a> {
    parser: &'a dyn ExpressionParser,
    fields: FieldValidator<'a>,
    parameters: ParameterValidator<'a>,
    revision: Revision,
}

impl<'a> RegisterValidator<'a> {
    pub fn new(
        parser: &'a dyn ExpressionParser,
        choices: &'a [Choice],
        revision: Revision,
    ) -> Self {
        Self {
            parser,
            fields: FieldValidator::new(parser, choices, revision),
            parameters: ParameterValidator::new(parser, choices, revision),
            revision,
        }
    }

    pub fn has_valid_address_offset(&self, register: &Register) -> bool {
        self.parser.unsigned_value(&register.address_offset).is_some()
    }

    pub fn has_valid_size(&self, register: &Register) -> bool {
        self.parser.integer_value(&register.size).is_some_and(|s| s > 0)
    }

    /// Fields sharing a type identifier must describe the same kind of field.
    fn fields_have_similar_definitions(&self, first: &Field, second: &Field) -> bool {
        self.parser.integer_value(&first.bit_width) == self.parser.integer_value(&second.bit_width)
            && first.volatile == second.volatile
            && first.access == second.access
    }

    fn find_errors_in_fields(&self, errors: &mut Vec<Finding>, register: &Register, context: &str) {
        let size = self.parser.integer_value(&register.size).unwrap_or(0);
        let mut names: Vec<&str> = Vec::new();
        let mut typed: Vec<&Field> = Vec::new();
        let mut reserve = MemoryReserve::new();

        for field in &register.fields {
            self.fields.find_errors_in(errors, field, context);

            if names.contains(&field.name.as_str()) {
                errors.push(Finding::new(
                    Category::Inconsistency,
                    format!("Name {} of fields in {context} is not unique.", field.name),
                ));
            }
            names.push(&field.name);

            let width = self.parser.integer_value(&field.bit_width).unwrap_or(0);
            let begin = self.parser.integer_value(&field.bit_offset).unwrap_or(0);
            if !span_fits(begin, width, size) {
                errors.push(Finding::new(
                    Category::Inconsistency,
                    format!("Field {} is not contained within {}", field.name, register.name),
                ));
            }

            if is_present(self.parser, &field.is_present) {
                reserve.add_span(field.name.clone(), begin, width);
            }

            if !field.type_identifier.is_empty() {
                match typed.iter().find(|f| f.type_identifier == field.type_identifier) {
                    Some(first) if !self.fields_have_similar_definitions(first, field) => {
                        errors.push(Finding::new(
                            Category::Inconsistency,
                            format!(
                                "Fields {} and {} have type identifier {}, but different field definitions within {context}",
                                first.name, field.name, field.type_identifier
                            ),
                        ));
                    }
                    Some(_) => {}
                    None => typed.push(field),
                }
            }

            if field.volatile == Some(true) && register.volatile == Some(false) {
                errors.push(Finding::new(
                    Category::Inconsistency,
                    format!(
                        "Volatile cannot be set to false in {context}, where contained field {} has volatile true",
                        field.name
                    ),
                ));
            }

            if self.revision == Revision::Std14
                && !AccessType::permits(register.access, field.access)
            {
                errors.push(Finding::new(
                    Category::Inconsistency,
                    format!(
                        "Access cannot be set to {} in field {}, where containing register {} has access {}",
                        access_name(field.access),
                        field.name,
                        register.name,
                        access_name(register.access)
                    ),
                ));
            }
        }

        reserve.find_errors_in_overlap(errors, "Fields", context);
    }
}

impl Validator<Register> for RegisterValidator<'_> {
    fn find_errors_in(&self, errors: &mut Vec<Finding>, register: &Register, context: &str) {
        let name = &register.name;
        let register_context = format!("register {name}");
        let complete_context = format!("register '{name}' within {context}");

        if !has_valid_name(name) {
            errors.push(Finding::new(
                Category::MissingElement,
                format!("Invalid name specified for register {name} within {context}"),
            ));
        }

        if !has_valid_is_present(self.parser, &register.is_present) {
            errors.push(Finding::new(
                Category::InvalidExpression,
                format!("Invalid isPresent value specified for {complete_context}. Value should evaluate to 0 or 1."),
            ));
        }

        if !self.has_valid_address_offset(register) {
            errors.push(Finding::new(
                Category::InvalidExpression,
                format!("Invalid address offset set for {complete_context}"),
            ));
        }

        if !self.has_valid_size(register) {
            errors.push(Finding::new(
                Category::InvalidExpression,
                format!("Invalid size specified for {complete_context}"),
            ));
        }

        self.find_errors_in_fields(errors, register, &register_context);

        self.parameters
            .find_errors_in_list(errors, &register.parameters, &register_context, context);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ipxact_expr::SystemVerilogParser;

    fn register(fields: Vec<Field>) -> Register {
        Register {
            fields,
            ..Register::new("ctrl", "0", "32")
        }
    }

    #[test]
    fn valid_register() {
        let parser = SystemVerilogParser::new();
        let validator = RegisterValidator::new(&parser, &[], Revision::Std14);
        let r = register(vec![Field::new("enable", "0", "1"), Field::new("mode", "1", "3")]);
        assert!(validator.validate(&r), "{:?}", validator.findings(&r, "address block regs"));
    }

    #[test]
    fn register_without_fields_is_a_plain_value() {
        let parser = SystemVerilogParser::new();
        let validator = RegisterValidator::new(&parser, &[], Revision::Std14);
        assert!(validator.validate(&register(Vec::new())));

        let mut unsized_register = register(Vec::new());
        unsized_register.size = "0".into();
        let errors = validator.findings(&unsized_register, "address block regs");
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors[0].message,
            "Invalid size specified for register 'ctrl' within address block regs"
        );
    }

    #[test]
    fn field_layout() {
        let parser = SystemVerilogParser::new();
        let validator = RegisterValidator::new(&parser, &[], Revision::Std14);

        let outside = register(vec![Field::new("wide", "30", "4")]);
        let errors = validator.findings(&outside, "address block regs");
        assert!(errors.iter().any(|e| e.message == "Field wide is not contained within ctrl"));

        let overlapping = register(vec![Field::new("a", "0", "4"), Field::new("b", "2", "4")]);
        let errors = validator.findings(&overlapping, "address block regs");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "Fields a and b overlap within register ctrl");

        let mut absent = Field::new("b", "2", "4");
        absent.is_present = "0".into();
        assert!(validator.validate(&register(vec![Field::new("a", "0", "4"), absent])));
    }

    #[test]
    fn field_bounds_near_integer_limit() {
        let parser = SystemVerilogParser::new();
        let validator = RegisterValidator::new(&parser, &[], Revision::Std14);
        let max = i128::MAX.to_string();

        let wide = register(vec![Field::new("wide", "1", &max)]);
        let errors = validator.findings(&wide, "address block regs");
        assert!(errors
            .iter()
            .any(|e| e.message == "Field wide is not contained within ctrl"));

        let far = register(vec![Field::new("far", &max, "1"), Field::new("low", "0", "4")]);
        let errors = validator.findings(&far, "address block regs");
        assert!(errors
            .iter()
            .any(|e| e.message == "Field far is not contained within ctrl"));
        assert!(!validator.validate(&far));
    }

    #[test]
    fn duplicate_field_names() {
        let parser = SystemVerilogParser::new();
        let validator = RegisterValidator::new(&parser, &[], Revision::Std14);
        let r = register(vec![Field::new("a", "0", "4"), Field::new("a", "4", "4")]);
        let errors = validator.findings(&r, "address block regs");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "Name a of fields in register ctrl is not unique.");
    }

    #[test]
    fn type_identifiers() {
        let parser = SystemVerilogParser::new();
        let validator = RegisterValidator::new(&parser, &[], Revision::Std14);
        let mut a = Field::new("a", "0", "4");
        a.type_identifier = "nibble".into();
        let mut b = Field::new("b", "4", "4");
        b.type_identifier = "nibble".into();
        assert!(validator.validate(&register(vec![a.clone(), b.clone()])));

        b.bit_width = "3".into();
        assert!(!validator.validate(&register(vec![a, b])));
    }

    #[test]
    fn volatile_and_access() {
        let parser = SystemVerilogParser::new();
        let mut volatile = Field::new("status", "0", "1");
        volatile.volatile = Some(true);
        let mut r = register(vec![volatile]);
        r.volatile = Some(false);
        let std14 = RegisterValidator::new(&parser, &[], Revision::Std14);
        assert!(!std14.validate(&r));

        let mut write = Field::new("cmd", "0", "8");
        write.access = Some(AccessType::WriteOnly);
        let mut r = register(vec![write]);
        r.access = Some(AccessType::ReadOnly);
        assert!(!std14.validate(&r));
        assert!(RegisterValidator::new(&parser, &[], Revision::Std22).validate(&r));
    }
}
