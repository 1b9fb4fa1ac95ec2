//! Walks a component and runs every validator on its elements.

use log::{debug, trace};

use ipxact_core::component::Component;
use ipxact_core::Library;
use ipxact_expr::SystemVerilogParser;

use crate::abstraction_type::AbstractionTypeValidator;
use crate::address_block::AddressBlockValidator;
use crate::common::duplicate_names;
use crate::finding::{Category, Finding};
use crate::indirect_interface::IndirectInterfaceValidator;
use crate::parameter::ParameterValidator;
use crate::scope::component_scope;
use crate::Validator;

/// Validates whole components against a library.
///
/// Expressions are evaluated with every parameter of the component in scope.
pub struct ComponentValidator<'a> {
    library: &'a dyn Library,
}

impl<'a> ComponentValidator<'a> {
    pub fn new(library: &'a dyn Library) -> Self {
        Self { library }
    }

    fn find_duplicates<'n>(
        errors: &mut Vec<Finding>,
        element: &str,
        names: impl IntoIterator<Item = &'n str>,
        context: &str,
    ) {
        for name in duplicate_names(names) {
            errors.push(Finding::new(
                Category::Inconsistency,
                format!("{element} name {name} is not unique within {context}."),
            ));
        }
    }
}

impl Validator<Component> for ComponentValidator<'_> {
    fn find_errors_in(&self, errors: &mut Vec<Finding>, component: &Component, context: &str) {
        let component_context = if context.is_empty() {
            format!("component {}", component.vlnv)
        } else {
            format!("component {} within {context}", component.vlnv)
        };
        debug!("validating {component_context}");

        let parser = SystemVerilogParser::with_scope(component_scope(component));
        let revision = component.revision;

        trace!("parameters of {component_context}");
        ParameterValidator::new(&parser, &component.choices, revision).find_errors_in_list(
            errors,
            &component.parameters,
            "component",
            &component_context,
        );

        Self::find_duplicates(
            errors,
            "Bus interface",
            component.bus_interfaces.iter().map(|b| b.name.as_str()),
            &component_context,
        );
        for bus in &component.bus_interfaces {
            let bus_context = format!("bus interface {} within {component_context}", bus.name);
            let validator = AbstractionTypeValidator::new(
                &parser,
                self.library,
                &component.views,
                &component.ports,
                bus,
            );
            for abstraction in &bus.abstraction_types {
                trace!("abstraction type of {bus_context}");
                validator.find_errors_in(errors, abstraction, &bus_context);
            }
        }

        Self::find_duplicates(
            errors,
            "Memory map",
            component.memory_maps.iter().map(|m| m.name.as_str()),
            &component_context,
        );
        for map in &component.memory_maps {
            let map_context = format!("memory map {} within {component_context}", map.name);
            Self::find_duplicates(
                errors,
                "Memory block",
                map.blocks.iter().map(|b| b.name()),
                &map_context,
            );

            let validator = AddressBlockValidator::new(&parser, &component.choices, revision)
                .with_address_unit_bits(map.address_unit_bits.clone());
            for block in map.address_blocks() {
                trace!("address block {} of {map_context}", block.name);
                validator.find_errors_in(errors, block, &map_context);
            }
        }

        Self::find_duplicates(
            errors,
            "Indirect interface",
            component.indirect_interfaces.iter().map(|i| i.name.as_str()),
            &component_context,
        );
        let indirect = IndirectInterfaceValidator::new(&parser, component);
        for interface in &component.indirect_interfaces {
            trace!("indirect interface {} of {component_context}", interface.name);
            indirect.find_errors_in(errors, interface, &component_context);
        }

        debug!("{} findings in {component_context}", errors.len());
    }
}
