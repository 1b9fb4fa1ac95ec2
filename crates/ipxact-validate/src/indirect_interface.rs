//! Indirect interfaces: an address field and a data field giving access to a
//! memory map or to bridged master interfaces.

use ipxact_core::component::{Component, IndirectInterface};
use ipxact_core::memory::{find_field, Field};
use ipxact_core::types::InterfaceMode;
use ipxact_expr::ExpressionParser;

use crate::common::has_valid_name;
use crate::finding::{Category, Finding};
use crate::parameter::ParameterValidator;
use crate::Validator;

pub struct IndirectInterfaceValidator<'a> {
    parser: &'a dyn ExpressionParser,
    component: &'a Component,
    parameters: ParameterValidator<'a>,
}

impl<'a> IndirectInterfaceValidator<'a> {
    pub fn new(parser: &'a dyn ExpressionParser, component: &'a Component) -> Self {
        Self {
            parser,
            component,
            parameters: ParameterValidator::new(parser, &component.choices, component.revision),
        }
    }

    fn field(&self, id: &str) -> Option<&'a Field> {
        find_field(&self.component.memory_maps, id)
    }

    /// True when the indirectly accessed memory map itself holds the field.
    fn indirect_map_contains(&self, interface: &IndirectInterface, id: &str) -> bool {
        self.component
            .memory_map(&interface.memory_map_ref)
            .is_some_and(|map| map.fields().any(|f| f.id == id))
    }

    fn is_valid_field_reference(&self, interface: &IndirectInterface, id: &str) -> bool {
        !id.is_empty() && self.field(id).is_some() && !self.indirect_map_contains(interface, id)
    }

    /// The address field must exist outside the indirect map and accept repeated writes.
    pub fn has_valid_address_reference(&self, interface: &IndirectInterface) -> bool {
        let id = &interface.indirect_address_ref;
        self.is_valid_field_reference(interface, id)
            && self
                .field(id)
                .and_then(|f| f.access)
                .map_or(true, |access| access.is_writable())
    }

    pub fn has_valid_data_reference(&self, interface: &IndirectInterface) -> bool {
        self.is_valid_field_reference(interface, &interface.indirect_data_ref)
    }

    pub fn has_valid_memory_map_reference(&self, interface: &IndirectInterface) -> bool {
        interface.memory_map_ref.is_empty()
            || self.component.memory_map(&interface.memory_map_ref).is_some()
    }

    /// Every bridge names a master bus interface of the component.
    pub fn has_valid_transparent_bridges(&self, interface: &IndirectInterface) -> bool {
        interface.transparent_bridges.iter().all(|bridge| {
            self.component
                .bus_interface(&bridge.master_ref)
                .is_some_and(|bus| bus.mode == InterfaceMode::Master)
        })
    }

    pub fn has_valid_bits_in_lau(&self, interface: &IndirectInterface) -> bool {
        interface.bits_in_lau.trim().is_empty()
            || self.parser.unsigned_value(&interface.bits_in_lau).is_some()
    }

    pub fn has_valid_endianness(interface: &IndirectInterface) -> bool {
        matches!(interface.endianness.as_str(), "" | "big" | "little")
    }

    fn find_errors_in_address_reference(
        &self,
        errors: &mut Vec<Finding>,
        interface: &IndirectInterface,
        context: &str,
    ) {
        let name = &interface.name;
        let id = &interface.indirect_address_ref;
        if id.is_empty() {
            errors.push(Finding::new(
                Category::MissingElement,
                format!("No field specified for address in indirect interface '{name}' within {context}"),
            ));
            return;
        }

        let Some(field) = self.field(id) else {
            errors.push(Finding::new(
                Category::UnresolvedReference,
                format!("Field '{id}' not found for address in indirect interface '{name}' within {context}"),
            ));
            return;
        };

        if self.indirect_map_contains(interface, id) {
            errors.push(Finding::new(
                Category::Inconsistency,
                format!(
                    "Field '{id}' is defined within indirect memory map '{}' in indirect interface {name} within {context}",
                    interface.memory_map_ref
                ),
            ));
        }

        if let Some(access) = field.access.filter(|a| !a.is_writable()) {
            errors.push(Finding::new(
                Category::Inconsistency,
                format!(
                    "Field '{id}' has invalid access '{access}' for address in indirect interface {name} within {context}"
                ),
            ));
        }
    }

    fn find_errors_in_data_reference(
        &self,
        errors: &mut Vec<Finding>,
        interface: &IndirectInterface,
        context: &str,
    ) {
        let name = &interface.name;
        let id = &interface.indirect_data_ref;
        if id.is_empty() {
            errors.push(Finding::new(
                Category::MissingElement,
                format!("No field specified for data in indirect interface '{name}' within {context}"),
            ));
        } else if self.field(id).is_none() {
            errors.push(Finding::new(
                Category::UnresolvedReference,
                format!("Field '{id}' not found for data in indirect interface '{name}' within {context}"),
            ));
        } else if self.indirect_map_contains(interface, id) {
            errors.push(Finding::new(
                Category::Inconsistency,
                format!(
                    "Field '{id}' is defined within indirect memory map '{}' in indirect interface {name} within {context}",
                    interface.memory_map_ref
                ),
            ));
        }
    }

    fn find_errors_in_target(
        &self,
        errors: &mut Vec<Finding>,
        interface: &IndirectInterface,
        context: &str,
    ) {
        let name = &interface.name;
        let has_map = !interface.memory_map_ref.is_empty();
        let has_bridges = !interface.transparent_bridges.is_empty();

        match (has_map, has_bridges) {
            (true, true) => errors.push(Finding::new(
                Category::MutualExclusion,
                format!("Both memory map and transparent bridges defined for indirect interface '{name}' within {context}."),
            )),
            (false, false) => errors.push(Finding::new(
                Category::MissingElement,
                format!("No memory map or transparent bridges defined for indirect interface '{name}' within {context}."),
            )),
            _ => {}
        }

        if !self.has_valid_memory_map_reference(interface) {
            errors.push(Finding::new(
                Category::UnresolvedReference,
                format!(
                    "Invalid memory map '{}' referenced in indirect interface '{name}' within {context}.",
                    interface.memory_map_ref
                ),
            ));
        }

        for bridge in &interface.transparent_bridges {
            let master = &bridge.master_ref;
            match self.component.bus_interface(master) {
                Some(bus) if bus.mode == InterfaceMode::Master => {}
                Some(_) => errors.push(Finding::new(
                    Category::Inconsistency,
                    format!(
                        "Transparent bridge references a non-master bus interface '{master}' in indirect interface '{name}' within {context}."
                    ),
                )),
                None => errors.push(Finding::new(
                    Category::UnresolvedReference,
                    format!(
                        "Transparent bridge references an invalid bus interface '{master}' in indirect interface '{name}' within {context}."
                    ),
                )),
            }
        }
    }
}

impl Validator<IndirectInterface> for IndirectInterfaceValidator<'_> {
    fn find_errors_in(
        &self,
        errors: &mut Vec<Finding>,
        interface: &IndirectInterface,
        context: &str,
    ) {
        let name = &interface.name;

        if !has_valid_name(name) {
            errors.push(Finding::new(
                Category::MissingElement,
                format!("Invalid name specified for indirect interface '{name}' within {context}"),
            ));
        }

        self.find_errors_in_address_reference(errors, interface, context);
        self.find_errors_in_data_reference(errors, interface, context);
        self.find_errors_in_target(errors, interface, context);

        if !self.has_valid_bits_in_lau(interface) {
            errors.push(Finding::new(
                Category::InvalidExpression,
                format!(
                    "Invalid bits in lau '{}' set for indirect interface '{name}' within {context}.",
                    interface.bits_in_lau
                ),
            ));
        }

        if !Self::has_valid_endianness(interface) {
            errors.push(Finding::new(
                Category::InvalidExpression,
                format!(
                    "Invalid endianness '{}' set for indirect interface '{name}' within {context}.",
                    interface.endianness
                ),
            ));
        }

        self.parameters.find_errors_in_list(
            errors,
            &interface.parameters,
            &format!("indirect interface {name}"),
            context,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ipxact_core::component::{BusInterface, TransparentBridge};
    use ipxact_core::memory::{AddressBlock, MemoryBlock, MemoryMap, Register};
    use ipxact_core::types::AccessType;
    use ipxact_core::{Revision, Vlnv};
    use ipxact_expr::SystemVerilogParser;

    fn map(name: &str, fields: Vec<Field>) -> MemoryMap {
        let mut register = Register::new("reg", "0", "32");
        register.fields = fields;
        let mut block = AddressBlock::new("block", "0", "16", "32");
        block.register_data.push(ipxact_core::memory::RegisterData::Register(register));
        let mut map = MemoryMap::new(name);
        map.blocks.push(MemoryBlock::AddressBlock(block));
        map
    }

    fn component() -> Component {
        let mut component = Component::new(Vlnv::new("acme", "ip", "dma", "1.0"), Revision::Std22);
        component.memory_maps = vec![
            map("control", vec![Field::new("addr", "0", "16"), Field::new("data", "16", "16")]),
            map("hidden", vec![Field::new("secret", "0", "32")]),
        ];
        component.bus_interfaces = vec![
            BusInterface::new("m_axi", InterfaceMode::Master),
            BusInterface::new("s_axi", InterfaceMode::Slave),
        ];
        component
    }

    fn interface() -> IndirectInterface {
        IndirectInterface {
            name: "indirect".into(),
            indirect_address_ref: "addr".into(),
            indirect_data_ref: "data".into(),
            memory_map_ref: "hidden".into(),
            ..IndirectInterface::default()
        }
    }

    #[test]
    fn valid_interface() {
        let parser = SystemVerilogParser::new();
        let component = component();
        let validator = IndirectInterfaceValidator::new(&parser, &component);
        assert!(validator.validate(&interface()));

        let mut bridged = interface();
        bridged.memory_map_ref.clear();
        bridged.transparent_bridges.push(TransparentBridge::new("m_axi"));
        assert!(validator.validate(&bridged));
    }

    #[test]
    fn address_field_access() {
        let parser = SystemVerilogParser::new();
        let mut component = component();
        let MemoryBlock::AddressBlock(block) = &mut component.memory_maps[0].blocks[0] else {
            unreachable!()
        };
        let ipxact_core::memory::RegisterData::Register(register) = &mut block.register_data[0]
        else {
            unreachable!()
        };
        register.fields[0].access = Some(AccessType::ReadOnly);

        let validator = IndirectInterfaceValidator::new(&parser, &component);
        assert!(!validator.has_valid_address_reference(&interface()));
        let errors = validator.findings(&interface(), "component dma");
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors[0].message,
            "Field 'addr' has invalid access 'read-only' for address in indirect interface indirect within component dma"
        );
    }

    #[test]
    fn fields_inside_indirect_map() {
        let parser = SystemVerilogParser::new();
        let component = component();
        let validator = IndirectInterfaceValidator::new(&parser, &component);
        let mut inside = interface();
        inside.indirect_data_ref = "secret".into();
        let errors = validator.findings(&inside, "component dma");
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("is defined within indirect memory map 'hidden'"));
    }

    #[test]
    fn map_xor_bridges() {
        let parser = SystemVerilogParser::new();
        let component = component();
        let validator = IndirectInterfaceValidator::new(&parser, &component);

        let mut both = interface();
        both.transparent_bridges.push(TransparentBridge::new("m_axi"));
        let errors = validator.findings(&both, "component dma");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].category, Category::MutualExclusion);

        let mut neither = interface();
        neither.memory_map_ref.clear();
        assert!(!validator.validate(&neither));

        let mut slave_bridge = neither.clone();
        slave_bridge.transparent_bridges = vec![
            TransparentBridge::new("s_axi"),
            TransparentBridge::new("nope"),
        ];
        let errors = validator.findings(&slave_bridge, "component dma");
        assert_eq!(errors.len(), 2);
        assert!(errors[0].message.contains("non-master bus interface 's_axi'"));
        assert!(errors[1].message.contains("invalid bus interface 'nope'"));
    }

    #[test]
    fn lau_and_endianness() {
        let parser = SystemVerilogParser::new();
        let component = component();
        let validator = IndirectInterfaceValidator::new(&parser, &component);
        let mut i = interface();
        i.bits_in_lau = "-8".into();
        i.endianness = "middle".into();
        assert_eq!(validator.findings(&i, "component dma").len(), 2);
        i.bits_in_lau = "8".into();
        i.endianness = "little".into();
        assert!(validator.validate(&i));
    }
}
