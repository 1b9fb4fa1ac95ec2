//! Logical port validation within an abstraction definition.

use ipxact_core::abstraction::{
    AbstractionDefinition, PortAbstraction, Qualifier, QualifierAttribute, QualifierType,
    TransactionalPort, WirePort,
};
use ipxact_core::bus::BusDefinition;
use ipxact_core::library::{self, Library};
use ipxact_core::types::{Initiative, TRANSACTIONAL_KINDS};
use ipxact_core::Revision;
use ipxact_expr::ExpressionParser;

use crate::cell_specification::CellSpecificationValidator;
use crate::common::has_valid_name;
use crate::finding::{Category, Finding};
use crate::packet::PacketValidator;
use crate::protocol::ProtocolValidator;
use crate::qualifier::QualifierValidator;
use crate::timing_constraint::TimingConstraintValidator;
use crate::Validator;

/// Validates the logical ports of one abstraction definition.
///
/// The bus definition, when known, supplies the system groups that system
/// mode ports must belong to.
pub struct PortAbstractionValidator<'a> {
    parser: &'a dyn ExpressionParser,
    library: &'a dyn Library,
    definition: &'a AbstractionDefinition,
    bus: Option<&'a BusDefinition>,
}

impl<'a> PortAbstractionValidator<'a> {
    pub fn new(
        parser: &'a dyn ExpressionParser,
        library: &'a dyn Library,
        definition: &'a AbstractionDefinition,
        bus: Option<&'a BusDefinition>,
    ) -> Self {
        Self {
            parser,
            library,
            definition,
            bus,
        }
    }

    fn revision(&self) -> Revision {
        self.definition.revision
    }

    fn find_errors_in_presence(&self, errors: &mut Vec<Finding>, port: &PortAbstraction) {
        let name = &port.logical_name;
        match self.revision() {
            Revision::Std14 => {
                if !self.parser.is_valid_expression(&port.is_present) {
                    errors.push(Finding::new(
                        Category::InvalidExpression,
                        format!("The presence '{}' of port {name} is invalid.", port.is_present),
                    ));
                }
                if port.match_ {
                    errors.push(Finding::new(
                        Category::RevisionMismatch,
                        format!(
                            "Port match is set for port {name} in abstraction definition not using IP-XACT standard revision 2022."
                        ),
                    ));
                }
            }
            Revision::Std22 => {
                if !port.is_present.trim().is_empty() {
                    errors.push(Finding::new(
                        Category::RevisionMismatch,
                        format!(
                            "The presence '{}' of port {name} is not allowed in IP-XACT standard revision 2022.",
                            port.is_present
                        ),
                    ));
                }
            }
        }
    }

    fn find_errors_in_qualifier(
        &self,
        errors: &mut Vec<Finding>,
        qualifier: &Qualifier,
        context: &str,
    ) {
        if !qualifier.is_set() {
            return;
        }

        QualifierValidator::new(self.revision()).find_errors_in(errors, qualifier, context);

        if qualifier.has_type(QualifierType::PowerEnable)
            && !qualifier
                .attribute(QualifierAttribute::PowerDomainReference)
                .is_empty()
        {
            errors.push(Finding::new(
                Category::Inconsistency,
                format!(
                    "Illegal attribute powerDomainRef set for power enable qualifier of {context} within abstraction definition {}.",
                    self.definition.vlnv
                ),
            ));
        }
    }

    fn find_errors_in_wire_port(
        &self,
        errors: &mut Vec<Finding>,
        wire_port: &WirePort,
        context: &str,
    ) {
        if !self.parser.is_valid_expression(&wire_port.width) {
            errors.push(Finding::new(
                Category::InvalidExpression,
                format!("Wire port width is invalid in {context}."),
            ));
        }

        let timing = TimingConstraintValidator::new(self.parser, &self.definition.logical_ports);
        for constraint in [
            &wire_port.timing_constraint,
            &wire_port.mirrored_timing_constraint,
        ]
        .into_iter()
        .flatten()
        {
            timing.find_errors_in(errors, constraint, context);
        }

        let cells = CellSpecificationValidator::new();
        for cell in [
            &wire_port.drive_constraint,
            &wire_port.mirrored_drive_constraint,
            &wire_port.load_constraint,
            &wire_port.mirrored_load_constraint,
        ]
        .into_iter()
        .flatten()
        {
            cells.find_errors_in(errors, cell, context);
        }
    }

    fn find_errors_in_transactional_port(
        &self,
        errors: &mut Vec<Finding>,
        port: &TransactionalPort,
        context: &str,
    ) {
        if !port.initiative.is_empty() && Initiative::parse(&port.initiative).is_none() {
            errors.push(Finding::new(
                Category::InvalidExpression,
                format!(
                    "The transactional port initiative {} is invalid in {context}.",
                    port.initiative
                ),
            ));
        }

        if !port.kind.is_empty() && !TRANSACTIONAL_KINDS.contains(&port.kind.as_str()) {
            errors.push(Finding::new(
                Category::InvalidExpression,
                format!("The transactional port kind {} is invalid in {context}.", port.kind),
            ));
        }

        if !self.parser.is_valid_expression(&port.bus_width) {
            errors.push(Finding::new(
                Category::InvalidExpression,
                format!("The transactional port bus width is invalid in {context}."),
            ));
        }

        if let Some(protocol) = &port.protocol {
            ProtocolValidator::new().find_errors_in(errors, protocol, context);
        }
    }

    fn find_errors_in_system_group(
        &self,
        errors: &mut Vec<Finding>,
        system_group: &str,
        groups: &[String],
        context: &str,
    ) {
        if system_group.is_empty() {
            errors.push(Finding::new(
                Category::MissingElement,
                format!("System group must be assigned for {context}."),
            ));
        } else if !groups.iter().any(|g| g == system_group) {
            let bus = self
                .bus
                .map(|b| b.vlnv.to_string())
                .unwrap_or_else(|| ":::".to_string());
            errors.push(Finding::new(
                Category::UnresolvedReference,
                format!(
                    "The system group {system_group} in {context} is not defined in system groups of bus definition {bus}."
                ),
            ));
        }
    }

    fn find_errors_in_packets(
        &self,
        errors: &mut Vec<Finding>,
        port: &PortAbstraction,
        context: &str,
    ) {
        if port.packets.is_empty() {
            return;
        }

        if self.revision() != Revision::Std22 {
            errors.push(Finding::new(
                Category::RevisionMismatch,
                format!("Packets defined in {context} not supported by IP-XACT document revision."),
            ));
            return;
        }

        let packets = PacketValidator::new(self.parser);
        for packet in &port.packets {
            packets.find_errors_in(errors, packet, context);
        }
    }
}

impl Validator<PortAbstraction> for PortAbstractionValidator<'_> {
    fn find_errors_in(&self, errors: &mut Vec<Finding>, port: &PortAbstraction, _context: &str) {
        let name = &port.logical_name;

        // 1. Name.
        if !has_valid_name(name) {
            errors.push(Finding::new(
                Category::MissingElement,
                format!("Port name {name} is invalid."),
            ));
        }

        // 2. Presence and match by revision.
        self.find_errors_in_presence(errors, port);

        // 3. Wire XOR transactional.
        match (&port.wire, &port.transactional) {
            (None, None) => errors.push(Finding::new(
                Category::MutualExclusion,
                format!("Port {name} has neither wire nor transactional defined."),
            )),
            (Some(_), Some(_)) => errors.push(Finding::new(
                Category::MutualExclusion,
                format!("Port {name} has both wire and transactional."),
            )),
            _ => {}
        }

        let context = format!("port {name}");
        let groups = self
            .bus
            .map(|bus| library::system_groups(bus, self.library))
            .unwrap_or_default();

        // 4. Per-mode definitions.
        if let Some(wire) = &port.wire {
            self.find_errors_in_qualifier(errors, &wire.qualifier, &context);

            if !self.parser.is_valid_expression(&wire.default_value) {
                errors.push(Finding::new(
                    Category::InvalidExpression,
                    format!("Default value for port {name} is invalid."),
                ));
            }

            for mode_port in [&wire.on_master, &wire.on_slave].into_iter().flatten() {
                self.find_errors_in_wire_port(errors, mode_port, &context);
            }
            for system_port in &wire.on_system {
                self.find_errors_in_wire_port(errors, system_port, &context);
                self.find_errors_in_system_group(
                    errors,
                    &system_port.system_group,
                    &groups,
                    &context,
                );
            }
        }

        if let Some(transactional) = &port.transactional {
            self.find_errors_in_qualifier(errors, &transactional.qualifier, &context);

            for mode_port in [&transactional.on_master, &transactional.on_slave]
                .into_iter()
                .flatten()
            {
                self.find_errors_in_transactional_port(errors, mode_port, &context);
            }
            for system_port in &transactional.on_system {
                self.find_errors_in_transactional_port(errors, system_port, &context);
                self.find_errors_in_system_group(
                    errors,
                    &system_port.system_group,
                    &groups,
                    &context,
                );
            }
        }

        // 5. Packets.
        self.find_errors_in_packets(errors, port, &context);
    }
}
