//! Walks an abstraction definition and validates its logical ports.

use log::{debug, trace, warn};

use ipxact_core::abstraction::AbstractionDefinition;
use ipxact_core::{DocumentType, Library};
use ipxact_expr::SystemVerilogParser;

use crate::common::duplicate_names;
use crate::finding::{Category, Finding};
use crate::parameter::ParameterValidator;
use crate::port_abstraction::PortAbstractionValidator;
use crate::scope::abstraction_scope;
use crate::Validator;

pub struct AbstractionDefinitionValidator<'a> {
    library: &'a dyn Library,
}

impl<'a> AbstractionDefinitionValidator<'a> {
    pub fn new(library: &'a dyn Library) -> Self {
        Self { library }
    }
}

impl Validator<AbstractionDefinition> for AbstractionDefinitionValidator<'_> {
    fn find_errors_in(
        &self,
        errors: &mut Vec<Finding>,
        definition: &AbstractionDefinition,
        context: &str,
    ) {
        let definition_context = if context.is_empty() {
            format!("abstraction definition {}", definition.vlnv)
        } else {
            format!("abstraction definition {} within {context}", definition.vlnv)
        };
        debug!("validating {definition_context}");

        let parser = SystemVerilogParser::with_scope(abstraction_scope(definition));

        let bus_document = if definition.bus_type.is_empty() {
            errors.push(Finding::new(
                Category::MissingElement,
                format!("No bus type set for {definition_context}"),
            ));
            None
        } else if self.library.document_type(&definition.bus_type) != DocumentType::BusDefinition {
            warn!("bus definition {} not found in library", definition.bus_type);
            errors.push(Finding::new(
                Category::UnresolvedReference,
                format!(
                    "Bus type {} of {definition_context} could not be found in the library",
                    definition.bus_type
                ),
            ));
            None
        } else {
            self.library.model(&definition.bus_type)
        };
        let bus = bus_document.as_ref().and_then(|d| d.as_bus_definition());

        for name in duplicate_names(
            definition
                .logical_ports
                .iter()
                .map(|p| p.logical_name.as_str()),
        ) {
            errors.push(Finding::new(
                Category::Inconsistency,
                format!("Logical port name {name} is not unique within {definition_context}."),
            ));
        }

        let ports = PortAbstractionValidator::new(&parser, self.library, definition, bus);
        for port in &definition.logical_ports {
            trace!("logical port {} of {definition_context}", port.logical_name);
            ports.find_errors_in(errors, port, &definition_context);
        }

        ParameterValidator::new(&parser, &definition.choices, definition.revision)
            .find_errors_in_list(
                errors,
                &definition.parameters,
                "abstraction definition",
                &definition_context,
            );
    }
}
