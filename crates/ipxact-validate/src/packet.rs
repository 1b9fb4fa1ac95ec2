//! Packets of 1685-2022 logical ports.

use ipxact_core::abstraction::{Packet, PacketField};
use ipxact_expr::ExpressionParser;

use crate::common::{duplicate_names, has_valid_name};
use crate::finding::{Category, Finding};
use crate::Validator;

fn has_valid_endianness(endianness: &str) -> bool {
    matches!(endianness, "" | "big" | "little")
}

pub struct PacketValidator<'a> {
    parser: &'a dyn ExpressionParser,
}

impl<'a> PacketValidator<'a> {
    pub fn new(parser: &'a dyn ExpressionParser) -> Self {
        Self { parser }
    }

    fn find_errors_in_field(&self, errors: &mut Vec<Finding>, field: &PacketField, context: &str) {
        if !has_valid_name(&field.name) {
            errors.push(Finding::new(
                Category::MissingElement,
                format!("Invalid name set for packet field in {context}."),
            ));
        }

        if !self.parser.integer_value(&field.width).is_some_and(|w| w > 0) {
            errors.push(Finding::new(
                Category::InvalidExpression,
                format!(
                    "Invalid width '{}' set for packet field {} in {context}.",
                    field.width, field.name
                ),
            ));
        }

        if !field.value.trim().is_empty() && !self.parser.is_valid_expression(&field.value) {
            errors.push(Finding::new(
                Category::InvalidExpression,
                format!(
                    "Invalid value '{}' set for packet field {} in {context}.",
                    field.value, field.name
                ),
            ));
        }

        if !has_valid_endianness(&field.endianness) {
            errors.push(Finding::new(
                Category::InvalidExpression,
                format!(
                    "Invalid endianness '{}' set for packet field {} in {context}.",
                    field.endianness, field.name
                ),
            ));
        }
    }
}

impl Validator<Packet> for PacketValidator<'_> {
    fn find_errors_in(&self, errors: &mut Vec<Finding>, packet: &Packet, context: &str) {
        if !has_valid_name(&packet.name) {
            errors.push(Finding::new(
                Category::MissingElement,
                format!("Invalid name set for packet in {context}."),
            ));
        }

        if !has_valid_endianness(&packet.endianness) {
            errors.push(Finding::new(
                Category::InvalidExpression,
                format!(
                    "Invalid endianness '{}' set for packet {} in {context}.",
                    packet.endianness, packet.name
                ),
            ));
        }

        if packet.fields.is_empty() {
            errors.push(Finding::new(
                Category::MissingElement,
                format!(
                    "Packet {} in {context} must contain at least one packet field.",
                    packet.name
                ),
            ));
        }

        for name in duplicate_names(packet.fields.iter().map(|f| f.name.as_str())) {
            errors.push(Finding::new(
                Category::Inconsistency,
                format!(
                    "Packet field name {name} is not unique in packet {} in {context}.",
                    packet.name
                ),
            ));
        }

        let field_context = format!("packet {} in {context}", packet.name);
        for field in &packet.fields {
            self.find_errors_in_field(errors, field, &field_context);
        }
    }
}
