//! Qualifier rules of logical ports.

use ipxact_core::abstraction::{Qualifier, QualifierAttribute, QualifierType};
use ipxact_core::Revision;

use crate::finding::{Category, Finding};
use crate::Validator;

const STD14_TYPES: [QualifierType; 4] = [
    QualifierType::Address,
    QualifierType::Data,
    QualifierType::Clock,
    QualifierType::Reset,
];

const FLOW_TYPES: [&str; 4] = ["creditReturn", "ready", "busy", "user"];

/// Level attributes and the qualifier type each belongs to.
const LEVEL_ATTRIBUTES: [(QualifierAttribute, QualifierType); 3] = [
    (QualifierAttribute::ResetLevel, QualifierType::Reset),
    (QualifierAttribute::ClockEnableLevel, QualifierType::ClockEnable),
    (QualifierAttribute::PowerEnableLevel, QualifierType::PowerEnable),
];

/// Validates a qualifier against the rules of one document revision.
#[derive(Debug, Clone, Copy)]
pub struct QualifierValidator {
    revision: Revision,
}

impl QualifierValidator {
    pub fn new(revision: Revision) -> Self {
        Self { revision }
    }

    fn find_errors_in_std14(
        &self,
        errors: &mut Vec<Finding>,
        qualifier: &Qualifier,
        context: &str,
    ) {
        for qualifier_type in &qualifier.types {
            if !STD14_TYPES.contains(qualifier_type) {
                errors.push(Finding::new(
                    Category::RevisionMismatch,
                    format!(
                        "Qualifier {} is not allowed in IP-XACT standard revision 2014 in {context}.",
                        qualifier_type.as_str()
                    ),
                ));
            }
        }

        if qualifier.has_type(QualifierType::Clock) && qualifier.has_type(QualifierType::Reset) {
            errors.push(Finding::new(
                Category::MutualExclusion,
                format!("Qualifier in {context} cannot be both clock and reset."),
            ));
        }

        for attribute in qualifier.attributes.set_attributes() {
            errors.push(Finding::new(
                Category::RevisionMismatch,
                format!(
                    "Qualifier attribute {} is not allowed in IP-XACT standard revision 2014 in {context}.",
                    attribute.as_str()
                ),
            ));
        }
    }

    fn find_errors_in_std22(
        &self,
        errors: &mut Vec<Finding>,
        qualifier: &Qualifier,
        context: &str,
    ) {
        for (attribute, owner) in LEVEL_ATTRIBUTES {
            let level = qualifier.attribute(attribute);
            if level.is_empty() {
                continue;
            }
            if level != "high" && level != "low" {
                errors.push(Finding::new(
                    Category::InvalidExpression,
                    format!(
                        "Qualifier attribute {} has invalid level '{level}' in {context}.",
                        attribute.as_str()
                    ),
                ));
            }
            if !qualifier.has_type(owner) {
                errors.push(Finding::new(
                    Category::Inconsistency,
                    format!(
                        "Qualifier attribute {} is set without qualifier {} in {context}.",
                        attribute.as_str(),
                        owner.as_str()
                    ),
                ));
            }
        }

        let flow_type = qualifier.attribute(QualifierAttribute::FlowType);
        if qualifier.has_type(QualifierType::FlowControl) {
            if flow_type.is_empty() {
                errors.push(Finding::new(
                    Category::MissingElement,
                    format!("Flow control qualifier in {context} must define a flow type."),
                ));
            } else if !FLOW_TYPES.contains(&flow_type) {
                errors.push(Finding::new(
                    Category::InvalidExpression,
                    format!("Invalid flow type '{flow_type}' set for qualifier in {context}."),
                ));
            } else if flow_type == "user"
                && qualifier.attribute(QualifierAttribute::UserFlowType).trim().is_empty()
            {
                errors.push(Finding::new(
                    Category::MissingElement,
                    format!("User flow type must be defined for flow control qualifier in {context}."),
                ));
            }
        }

        if qualifier.has_type(QualifierType::User)
            && qualifier.attribute(QualifierAttribute::UserDefined).trim().is_empty()
        {
            errors.push(Finding::new(
                Category::MissingElement,
                format!("User qualifier in {context} must define a user-defined value."),
            ));
        }
    }
}

impl Validator<Qualifier> for QualifierValidator {
    fn find_errors_in(&self, errors: &mut Vec<Finding>, qualifier: &Qualifier, context: &str) {
        match self.revision {
            Revision::Std14 => self.find_errors_in_std14(errors, qualifier, context),
            Revision::Std22 => self.find_errors_in_std22(errors, qualifier, context),
        }
    }
}
