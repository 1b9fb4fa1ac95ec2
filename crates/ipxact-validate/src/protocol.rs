//! Protocol of transactional ports.

use ipxact_core::abstraction::Protocol;

use crate::common::has_valid_name;
use crate::finding::{Category, Finding};
use crate::Validator;

#[derive(Debug, Clone, Copy, Default)]
pub struct ProtocolValidator;

impl ProtocolValidator {
    pub fn new() -> Self {
        Self
    }
}

impl Validator<Protocol> for ProtocolValidator {
    fn find_errors_in(&self, errors: &mut Vec<Finding>, protocol: &Protocol, context: &str) {
        match protocol.protocol_type.as_str() {
            "tlm" => {}
            "custom" => {
                if protocol.custom_protocol_type.trim().is_empty() {
                    errors.push(Finding::new(
                        Category::MissingElement,
                        format!("Custom protocol type must be defined for protocol in {context}."),
                    ));
                }
            }
            other => errors.push(Finding::new(
                Category::InvalidExpression,
                format!("Invalid protocol type '{other}' in {context}."),
            )),
        }

        let Some(payload) = &protocol.payload else {
            return;
        };
        if !has_valid_name(&payload.name) {
            errors.push(Finding::new(
                Category::MissingElement,
                format!("Invalid payload name '{}' in {context}.", payload.name),
            ));
        }
        if payload.payload_type != "generic" && payload.payload_type != "specific" {
            errors.push(Finding::new(
                Category::InvalidExpression,
                format!(
                    "Invalid payload type '{}' in {context}; expected generic or specific.",
                    payload.payload_type
                ),
            ));
        }
    }
}
