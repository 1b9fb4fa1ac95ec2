//! Abstraction types of a bus interface: view references, the abstraction
//! definition reference and the port maps realizing it.

use ipxact_core::abstraction::AbstractionDefinition;
use ipxact_core::component::{AbstractionType, BusInterface, Port, PortMap, View};
use ipxact_core::types::Presence;
use ipxact_core::{DocumentType, Library};
use ipxact_expr::ExpressionParser;

use crate::finding::{push_unique, Category, Finding};
use crate::memory_reserve::MemoryReserve;
use crate::port_map::PortMapValidator;
use crate::Validator;

pub struct AbstractionTypeValidator<'a> {
    parser: &'a dyn ExpressionParser,
    library: &'a dyn Library,
    views: &'a [View],
    ports: &'a [Port],
    bus_interface: &'a BusInterface,
}

impl<'a> AbstractionTypeValidator<'a> {
    /// Validator for the abstraction types of `bus_interface`, whose component
    /// provides `views` and `ports`.
    pub fn new(
        parser: &'a dyn ExpressionParser,
        library: &'a dyn Library,
        views: &'a [View],
        ports: &'a [Port],
        bus_interface: &'a BusInterface,
    ) -> Self {
        Self {
            parser,
            library,
            views,
            ports,
            bus_interface,
        }
    }

    fn siblings(&self) -> &'a [AbstractionType] {
        &self.bus_interface.abstraction_types
    }

    /// No view references (or a single empty one) means "all views".
    fn applies_to_all_views(abstraction: &AbstractionType) -> bool {
        match abstraction.view_refs.as_slice() {
            [] => true,
            [only] => only.is_empty(),
            _ => false,
        }
    }

    fn view_exists(&self, name: &str) -> bool {
        self.views.iter().any(|v| v.name == name)
    }

    fn view_reference_count(&self, name: &str) -> usize {
        self.siblings()
            .iter()
            .flat_map(|a| a.view_refs.iter())
            .filter(|v| *v == name)
            .count()
    }

    pub fn has_valid_view_references(&self, abstraction: &AbstractionType) -> bool {
        if Self::applies_to_all_views(abstraction) {
            return self.siblings().len() <= 1;
        }
        abstraction
            .view_refs
            .iter()
            .all(|v| !v.is_empty() && self.view_exists(v) && self.view_reference_count(v) == 1)
    }

    pub fn has_valid_abstraction_reference(&self, abstraction: &AbstractionType) -> bool {
        abstraction.abstraction_ref.as_ref().is_some_and(|vlnv| {
            self.library.contains(vlnv)
                && self.library.document_type(vlnv) == DocumentType::AbstractionDefinition
        })
    }

    pub fn has_valid_port_maps(&self, abstraction: &AbstractionType) -> bool {
        let mut errors = Vec::new();
        self.find_errors_in_port_maps(&mut errors, abstraction, "");
        errors.is_empty()
    }

    fn find_errors_in_views(
        &self,
        errors: &mut Vec<Finding>,
        abstraction: &AbstractionType,
        context: &str,
    ) {
        if Self::applies_to_all_views(abstraction) {
            if self.siblings().len() > 1 {
                push_unique(
                    errors,
                    Finding::new(
                        Category::Inconsistency,
                        format!("Abstraction with no view references should be the only abstraction definition in {context}"),
                    ),
                );
            }
            return;
        }

        for view in &abstraction.view_refs {
            if !self.view_exists(view) {
                push_unique(
                    errors,
                    Finding::new(
                        Category::UnresolvedReference,
                        format!("Invalid view reference {view} set for abstraction type in {context}"),
                    ),
                );
            }
            if self.view_reference_count(view) > 1 {
                push_unique(
                    errors,
                    Finding::new(
                        Category::Inconsistency,
                        format!("View {view} has been referenced multiple times in abstraction types in {context}"),
                    ),
                );
            }
        }
    }

    fn find_errors_in_reference(
        &self,
        errors: &mut Vec<Finding>,
        abstraction: &AbstractionType,
        context: &str,
    ) {
        let Some(vlnv) = &abstraction.abstraction_ref else {
            errors.push(Finding::new(
                Category::MissingElement,
                format!("Abstraction reference must be set for each abstraction type in {context}"),
            ));
            return;
        };

        if !self.library.contains(vlnv) {
            errors.push(Finding::new(
                Category::UnresolvedReference,
                format!("Abstraction reference {vlnv} set for {context} could not be found in the library"),
            ));
        } else if self.library.document_type(vlnv) != DocumentType::AbstractionDefinition {
            errors.push(Finding::new(
                Category::UnresolvedReference,
                format!("Invalid abstraction reference set within {context}"),
            ));
        }
    }

    /// Required logical ports must be mapped and illegal ones must not be.
    fn find_errors_in_presence(
        &self,
        errors: &mut Vec<Finding>,
        definition: &AbstractionDefinition,
        port_maps: &[PortMap],
        context: &str,
    ) {
        let mode = self.bus_interface.mode;
        let group = self.bus_interface.system_group.as_str();
        let mapped = |name: &str| {
            port_maps
                .iter()
                .any(|m| m.logical_port.as_ref().is_some_and(|l| l.name == name))
        };

        for logical in &definition.logical_ports {
            if logical.presence(mode, group) == Some(Presence::Required)
                && !mapped(&logical.logical_name)
            {
                errors.push(Finding::new(
                    Category::MissingElement,
                    format!(
                        "Logical port {} with presence 'REQUIRED' is not mapped within {context}.",
                        logical.logical_name
                    ),
                ));
            }
        }

        let mut reported: Vec<&str> = Vec::new();
        for logical in port_maps.iter().filter_map(|m| m.logical_port.as_ref()) {
            let illegal = definition
                .logical_port(&logical.name)
                .is_some_and(|p| p.presence(mode, group) == Some(Presence::Illegal));
            if illegal && !reported.contains(&logical.name.as_str()) {
                errors.push(Finding::new(
                    Category::Inconsistency,
                    format!(
                        "Logical port {} with presence 'ILLEGAL' mapped within {context}.",
                        logical.name
                    ),
                ));
                reported.push(&logical.name);
            }
        }
    }

    fn find_errors_in_port_maps(
        &self,
        errors: &mut Vec<Finding>,
        abstraction: &AbstractionType,
        context: &str,
    ) {
        let Some(document) = abstraction
            .abstraction_ref
            .as_ref()
            .and_then(|v| self.library.model(v))
        else {
            return;
        };
        let Some(definition) = document.as_abstraction_definition() else {
            return;
        };

        self.find_errors_in_presence(errors, definition, &abstraction.port_maps, context);

        let port_maps = PortMapValidator::new(
            self.parser,
            Some(definition),
            self.bus_interface.mode,
            &self.bus_interface.system_group,
            self.ports,
        );

        let mut reserve = MemoryReserve::new();
        for port_map in &abstraction.port_maps {
            port_maps.find_errors_in(errors, port_map, context);

            if let Some(logical) = &port_map.logical_port {
                let (begin, end) = logical
                    .range
                    .as_ref()
                    .map(|r| {
                        (
                            self.parser.integer_value(&r.left).unwrap_or(0),
                            self.parser.integer_value(&r.right).unwrap_or(0),
                        )
                    })
                    .unwrap_or((0, 0));
                reserve.add_area(logical.name.clone(), begin, end);
            }
        }
        reserve.find_errors_in_id_dependant_overlap(errors, "logical port", context);
    }
}

impl Validator<AbstractionType> for AbstractionTypeValidator<'_> {
    fn find_errors_in(
        &self,
        errors: &mut Vec<Finding>,
        abstraction: &AbstractionType,
        context: &str,
    ) {
        self.find_errors_in_views(errors, abstraction, context);
        self.find_errors_in_reference(errors, abstraction, context);

        let port_map_context = format!("{} {context}", self.bus_interface.mode.as_str());
        self.find_errors_in_port_maps(errors, abstraction, &port_map_context);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ipxact_core::abstraction::{PortAbstraction, WireAbstraction, WirePort};
    use ipxact_core::types::{Direction, InterfaceMode};
    use ipxact_core::{Document, InMemoryLibrary, Revision, Vlnv};
    use ipxact_expr::SystemVerilogParser;

    fn abstraction_vlnv() -> Vlnv {
        Vlnv::new("acme", "bus", "apb_rtl", "1.0")
    }

    fn library() -> InMemoryLibrary {
        let mut def = AbstractionDefinition::new(
            abstraction_vlnv(),
            Revision::Std14,
            Vlnv::new("acme", "bus", "apb", "1.0"),
        );
        def.logical_ports = vec![
            PortAbstraction::wire(
                "PCLK",
                WireAbstraction {
                    on_slave: Some(
                        WirePort::new("1", Direction::In).with_presence(Presence::Required),
                    ),
                    ..WireAbstraction::default()
                },
            ),
            PortAbstraction::wire(
                "PDATA",
                WireAbstraction {
                    on_slave: Some(WirePort::new("8", Direction::In)),
                    ..WireAbstraction::default()
                },
            ),
            PortAbstraction::wire(
                "PTEST",
                WireAbstraction {
                    on_slave: Some(
                        WirePort::new("1", Direction::In).with_presence(Presence::Illegal),
                    ),
                    ..WireAbstraction::default()
                },
            ),
        ];
        let mut library = InMemoryLibrary::new();
        library.insert(Document::AbstractionDefinition(def)).unwrap();
        library
    }

    fn ports() -> Vec<Port> {
        vec![
            Port::wire("clk", Direction::In, "", ""),
            Port::wire("data", Direction::In, "7", "0"),
            Port::wire("test", Direction::In, "", ""),
        ]
    }

    fn bus(port_maps: Vec<PortMap>) -> BusInterface {
        let mut bus = BusInterface::new("apb", InterfaceMode::Slave);
        bus.abstraction_types = vec![AbstractionType {
            abstraction_ref: Some(abstraction_vlnv()),
            view_refs: Vec::new(),
            port_maps,
        }];
        bus
    }

    #[test]
    fn valid_abstraction_type() {
        let parser = SystemVerilogParser::new();
        let library = library();
        let ports = ports();
        let bus = bus(vec![
            PortMap::new("PCLK", "clk"),
            PortMap::new("PDATA", "data").with_logical_range("7", "0"),
        ]);
        let validator = AbstractionTypeValidator::new(&parser, &library, &[], &ports, &bus);
        let abstraction = &bus.abstraction_types[0];
        assert!(
            validator.validate(abstraction),
            "{:?}",
            validator.findings(abstraction, "bus interface apb")
        );
    }

    #[test]
    fn presence_rules() {
        let parser = SystemVerilogParser::new();
        let library = library();
        let ports = ports();
        let bus = bus(vec![PortMap::new("PTEST", "test"), PortMap::new("PTEST", "test")]);
        let validator = AbstractionTypeValidator::new(&parser, &library, &[], &ports, &bus);
        let errors = validator.findings(&bus.abstraction_types[0], "bus interface apb");

        let messages: Vec<&str> = errors.iter().map(|e| e.message.as_str()).collect();
        assert!(messages.contains(
            &"Logical port PCLK with presence 'REQUIRED' is not mapped within slave bus interface apb."
        ));
        assert_eq!(
            messages.iter().filter(|m| m.contains("presence 'ILLEGAL'")).count(),
            1
        );
    }

    #[test]
    fn logical_ranges_must_not_overlap() {
        let parser = SystemVerilogParser::new();
        let library = library();
        let ports = vec![
            Port::wire("clk", Direction::In, "", ""),
            Port::wire("low", Direction::In, "4", "0"),
            Port::wire("high", Direction::In, "4", "0"),
        ];
        let overlapping = bus(vec![
            PortMap::new("PCLK", "clk"),
            PortMap::new("PDATA", "low").with_logical_range("4", "0"),
            PortMap::new("PDATA", "high").with_logical_range("7", "3"),
        ]);
        let validator = AbstractionTypeValidator::new(&parser, &library, &[], &ports, &overlapping);
        let errors = validator.findings(&overlapping.abstraction_types[0], "bus interface apb");
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("of logical port PDATA overlap"));
    }

    #[test]
    fn references() {
        let parser = SystemVerilogParser::new();
        let library = library();
        let mut bus = bus(Vec::new());
        bus.abstraction_types[0].abstraction_ref = Some(Vlnv::new("acme", "bus", "missing", "1.0"));
        let validator = AbstractionTypeValidator::new(&parser, &library, &[], &[], &bus);
        let errors = validator.findings(&bus.abstraction_types[0], "bus interface apb");
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors[0].message,
            "Abstraction reference acme:bus:missing:1.0 set for bus interface apb could not be found in the library"
        );

        bus.abstraction_types[0].abstraction_ref = None;
        let validator = AbstractionTypeValidator::new(&parser, &library, &[], &[], &bus);
        assert!(!validator.has_valid_abstraction_reference(&bus.abstraction_types[0]));
    }

    #[test]
    fn view_references() {
        let parser = SystemVerilogParser::new();
        let library = library();
        let views = vec![View::new("rtl"), View::new("tlm")];
        let ports = ports();

        let mut bus = bus(vec![PortMap::new("PCLK", "clk")]);
        let mut second = bus.abstraction_types[0].clone();
        bus.abstraction_types[0].view_refs = vec!["rtl".into()];
        second.view_refs = vec!["tlm".into()];
        bus.abstraction_types.push(second);

        let validator = AbstractionTypeValidator::new(&parser, &library, &views, &ports, &bus);
        assert!(validator.has_valid_view_references(&bus.abstraction_types[0]));
        assert!(validator.validate(&bus.abstraction_types[1]));

        bus.abstraction_types[1].view_refs = vec!["rtl".into(), "gate".into()];
        let validator = AbstractionTypeValidator::new(&parser, &library, &views, &ports, &bus);
        let errors = validator.findings(&bus.abstraction_types[1], "bus interface apb");
        assert_eq!(errors.len(), 2);
        assert_eq!(
            errors[0].message,
            "View rtl has been referenced multiple times in abstraction types in bus interface apb"
        );
        assert_eq!(
            errors[1].message,
            "Invalid view reference gate set for abstraction type in bus interface apb"
        );

        bus.abstraction_types[1].view_refs.clear();
        let validator = AbstractionTypeValidator::new(&parser, &library, &views, &ports, &bus);
        assert!(!validator.has_valid_view_references(&bus.abstraction_types[1]));
    }
}
