//! Parameter validation.
//!
//! A parameter is checked for a name, a value that evaluates and fits its
//! declared type, bounds, an optional choice, resolve rules and vectors.
//! Array values (`{a, b}` or `'{a, b}`) are split and each element is checked
//! on its own.

use ipxact_core::parameter::{find_choice, Choice, Parameter};
use ipxact_core::Revision;
use ipxact_expr::{ExpressionParser, Value};

use crate::common::{duplicate_names, has_valid_name};
use crate::finding::{Category, Finding};
use crate::Validator;

const PARAMETER_TYPES: [&str; 9] = [
    "", "bit", "byte", "shortint", "int", "longint", "shortreal", "real", "string",
];

/// Elements of an array value, `None` when the text is not an array.
fn array_elements(value: &str) -> Option<Vec<&str>> {
    let trimmed = value.trim();
    let inner = trimmed
        .strip_prefix("'{")
        .or_else(|| trimmed.strip_prefix('{'))?
        .strip_suffix('}')?;
    Some(inner.split(',').map(str::trim).collect())
}

pub struct ParameterValidator<'a> {
    parser: &'a dyn ExpressionParser,
    choices: &'a [Choice],
    revision: Revision,
}

impl<'a> ParameterValidator<'a> {
    pub fn new(
        parser: &'a dyn ExpressionParser,
        choices: &'a [Choice],
        revision: Revision,
    ) -> Self {
        Self {
            parser,
            choices,
            revision,
        }
    }

    pub fn has_valid_type(&self, parameter: &Parameter) -> bool {
        PARAMETER_TYPES.contains(&parameter.type_name.as_str())
    }

    /// Whether `value` evaluates to something representable by `type_name`.
    pub fn has_valid_value_for_type(&self, value: &str, type_name: &str) -> bool {
        if let Some(elements) = array_elements(value) {
            return elements
                .iter()
                .all(|element| self.has_valid_value_for_type(element, type_name));
        }

        let Ok(solved) = self.parser.parse_expression(value) else {
            return false;
        };

        match type_name {
            "" => !solved.is_empty(),
            "bit" => solved.as_integer().is_some_and(|v| v >= 0),
            "byte" => solved.as_integer().is_some_and(|v| i8::try_from(v).is_ok()),
            "shortint" => solved.as_integer().is_some_and(|v| i16::try_from(v).is_ok()),
            "int" => solved.as_integer().is_some_and(|v| i32::try_from(v).is_ok()),
            "longint" => solved
                .as_integer()
                .is_some_and(|v| i64::try_from(v).is_ok() || u64::try_from(v).is_ok()),
            "shortreal" | "real" => solved.as_real().is_some(),
            "string" => matches!(solved, Value::Text(_)),
            _ => false,
        }
    }

    /// Bounds only apply to numeric types and only when they evaluate.
    fn should_compare_with_boundary(&self, boundary: &str, type_name: &str) -> bool {
        !boundary.trim().is_empty()
            && !type_name.is_empty()
            && type_name != "bit"
            && type_name != "string"
            && self.parser.is_valid_expression(boundary)
    }

    fn numeric_values(&self, value: &str) -> Vec<f64> {
        let elements = array_elements(value).unwrap_or_else(|| vec![value]);
        elements
            .into_iter()
            .filter_map(|e| self.parser.parse_expression(e).ok()?.as_real())
            .collect()
    }

    fn violates_boundary(&self, parameter: &Parameter, boundary: &str, below: bool) -> bool {
        if !self.should_compare_with_boundary(boundary, &parameter.type_name) {
            return false;
        }
        let Some(limit) = self
            .parser
            .parse_expression(boundary)
            .ok()
            .and_then(|v| v.as_real())
        else {
            return false;
        };
        self.numeric_values(&parameter.value)
            .into_iter()
            .any(|v| if below { v < limit } else { v > limit })
    }

    pub fn value_is_less_than_minimum(&self, parameter: &Parameter) -> bool {
        self.violates_boundary(parameter, &parameter.minimum, true)
    }

    pub fn value_is_greater_than_maximum(&self, parameter: &Parameter) -> bool {
        self.violates_boundary(parameter, &parameter.maximum, false)
    }

    pub fn has_valid_choice(&self, parameter: &Parameter) -> bool {
        parameter.choice_ref.is_empty()
            || find_choice(self.choices, &parameter.choice_ref).is_some()
    }

    pub fn has_valid_value_for_choice(&self, parameter: &Parameter) -> bool {
        if parameter.choice_ref.is_empty() {
            return true;
        }
        let Some(choice) = find_choice(self.choices, &parameter.choice_ref) else {
            return false;
        };
        match array_elements(&parameter.value) {
            Some(elements) => elements.iter().all(|e| choice.has_enumeration(e)),
            None => choice.has_enumeration(&parameter.value),
        }
    }

    pub fn has_valid_resolve(&self, parameter: &Parameter) -> bool {
        matches!(parameter.resolve.as_str(), "" | "immediate" | "user" | "generated")
    }

    pub fn has_valid_value_id(&self, parameter: &Parameter) -> bool {
        !matches!(parameter.resolve.as_str(), "user" | "generated")
            || !parameter.value_id.trim().is_empty()
    }

    /// Vector bounds must be non-negative integers, and only bit parameters may be vectors.
    pub fn has_valid_vectors(&self, parameter: &Parameter) -> bool {
        if parameter.vectors.is_empty() {
            return true;
        }
        parameter.type_name == "bit"
            && parameter.vectors.iter().all(|v| {
                self.parser.unsigned_value(&v.left).is_some()
                    && self.parser.unsigned_value(&v.right).is_some()
            })
    }

    /// Check every parameter of a container plus name uniqueness among them.
    pub fn find_errors_in_list(
        &self,
        errors: &mut Vec<Finding>,
        parameters: &[Parameter],
        container: &str,
        context: &str,
    ) {
        for name in duplicate_names(parameters.iter().map(|p| p.name.as_str())) {
            errors.push(Finding::new(
                Category::Inconsistency,
                format!("Parameter name {name} is not unique in {container} within {context}."),
            ));
        }

        let parameter_context = format!("{container} within {context}");
        for parameter in parameters {
            self.find_errors_in(errors, parameter, &parameter_context);
        }
    }

    fn find_errors_in_value(
        &self,
        errors: &mut Vec<Finding>,
        parameter: &Parameter,
        context: &str,
    ) {
        let name = &parameter.name;
        if parameter.value.trim().is_empty() {
            errors.push(Finding::new(
                Category::MissingElement,
                format!("No value specified for parameter {name} within {context}"),
            ));
            return;
        }

        if !self.has_valid_value_for_type(&parameter.value, &parameter.type_name) {
            errors.push(Finding::new(
                Category::InvalidExpression,
                format!(
                    "Value '{}' is not valid for type {} in parameter {name} within {context}",
                    parameter.value, parameter.type_name
                ),
            ));
        }

        if self.value_is_less_than_minimum(parameter) {
            errors.push(Finding::new(
                Category::Inconsistency,
                format!(
                    "Value '{}' violates minimum value {} in parameter {name} within {context}",
                    parameter.value, parameter.minimum
                ),
            ));
        }

        if self.value_is_greater_than_maximum(parameter) {
            errors.push(Finding::new(
                Category::Inconsistency,
                format!(
                    "Value '{}' violates maximum value {} in parameter {name} within {context}",
                    parameter.value, parameter.maximum
                ),
            ));
        }

        if !self.has_valid_value_for_choice(parameter) {
            errors.push(Finding::new(
                Category::UnresolvedReference,
                format!(
                    "Value '{}' references unknown enumeration for choice {} in parameter {name} within {context}",
                    parameter.value, parameter.choice_ref
                ),
            ));
        }
    }

    fn find_errors_in_vectors(
        &self,
        errors: &mut Vec<Finding>,
        parameter: &Parameter,
        context: &str,
    ) {
        if !self.has_valid_vectors(parameter) {
            errors.push(Finding::new(
                Category::InvalidExpression,
                format!(
                    "Invalid bit vector values specified for parameter {} within {context}",
                    parameter.name
                ),
            ));
        }

        if self.revision == Revision::Std14 && parameter.vectors.iter().any(|v| !v.id.is_empty()) {
            errors.push(Finding::new(
                Category::RevisionMismatch,
                format!(
                    "Vector id is not allowed for parameter {} within {context} in IP-XACT standard revision 2014",
                    parameter.name
                ),
            ));
        }
    }
}

impl Validator<Parameter> for ParameterValidator<'_> {
    fn find_errors_in(&self, errors: &mut Vec<Finding>, parameter: &Parameter, context: &str) {
        let name = &parameter.name;

        // 1. Identity and type.
        if !has_valid_name(name) {
            errors.push(Finding::new(
                Category::MissingElement,
                format!("No valid name specified for parameter {name} within {context}"),
            ));
        }
        if !self.has_valid_type(parameter) {
            errors.push(Finding::new(
                Category::InvalidExpression,
                format!(
                    "Invalid type {} specified for parameter {name} within {context}",
                    parameter.type_name
                ),
            ));
        }

        // 2. Value against type, bounds and choice.
        self.find_errors_in_value(errors, parameter, context);

        // 3. Boundaries themselves.
        for (label, boundary) in [
            ("Minimum", &parameter.minimum),
            ("Maximum", &parameter.maximum),
        ] {
            if !boundary.trim().is_empty()
                && self.should_compare_with_boundary(boundary, &parameter.type_name)
                && !self.has_valid_value_for_type(boundary, &parameter.type_name)
            {
                errors.push(Finding::new(
                    Category::InvalidExpression,
                    format!(
                        "{label} value {boundary} is not valid for type {} in parameter {name} within {context}",
                        parameter.type_name
                    ),
                ));
            }
        }

        // 4. References and resolution.
        if !self.has_valid_choice(parameter) {
            errors.push(Finding::new(
                Category::UnresolvedReference,
                format!(
                    "Choice {} referenced in parameter {name} is not specified within {context}",
                    parameter.choice_ref
                ),
            ));
        }
        if !self.has_valid_resolve(parameter) {
            errors.push(Finding::new(
                Category::InvalidExpression,
                format!(
                    "Invalid resolve {} specified for parameter {name} within {context}",
                    parameter.resolve
                ),
            ));
        } else if !self.has_valid_value_id(parameter) {
            errors.push(Finding::new(
                Category::MissingElement,
                format!(
                    "Parameter {name} with resolve {} must specify a value id within {context}",
                    parameter.resolve
                ),
            ));
        }

        // 5. Vectors.
        self.find_errors_in_vectors(errors, parameter, context);
    }
}
