//! Parameter scopes for evaluating the expressions of a document.

use ipxact_core::abstraction::AbstractionDefinition;
use ipxact_core::component::Component;
use ipxact_core::memory::{MemoryBlock, RegisterData};
use ipxact_core::parameter::Parameter;
use ipxact_expr::ParameterScope;

fn insert_all<'p>(scope: &mut ParameterScope, parameters: impl IntoIterator<Item = &'p Parameter>) {
    for parameter in parameters {
        scope.insert(&parameter.id, &parameter.name, &parameter.value);
    }
}

/// Every parameter declared anywhere in `component`, so that nested
/// expressions may reference parameters of any enclosing element.
pub fn component_scope(component: &Component) -> ParameterScope {
    let mut scope = ParameterScope::new();
    insert_all(&mut scope, &component.parameters);

    for map in &component.memory_maps {
        for block in &map.blocks {
            let MemoryBlock::AddressBlock(block) = block else {
                continue;
            };
            insert_all(&mut scope, &block.parameters);
            for data in &block.register_data {
                if let RegisterData::Register(register) = data {
                    insert_all(&mut scope, &register.parameters);
                    insert_all(&mut scope, register.fields.iter().flat_map(|f| &f.parameters));
                }
            }
        }
    }

    insert_all(
        &mut scope,
        component.indirect_interfaces.iter().flat_map(|i| &i.parameters),
    );
    scope
}

pub fn abstraction_scope(definition: &AbstractionDefinition) -> ParameterScope {
    let mut scope = ParameterScope::new();
    insert_all(&mut scope, &definition.parameters);
    scope
}

#[cfg(test)]
mod tests {
    use super::*;
    use ipxact_core::memory::{AddressBlock, MemoryMap, Register};
    use ipxact_core::{Revision, Vlnv};
    use ipxact_expr::{ExpressionParser, SystemVerilogParser};

    #[test]
    fn nested_parameters_are_visible() {
        let mut component = Component::new(Vlnv::new("acme", "ip", "uart", "1.0"), Revision::Std14);
        component.parameters.push(Parameter::new("WIDTH", "32"));

        let mut register = Register::new("ctrl", "0", "WIDTH");
        register.parameters.push(Parameter::new("HALF", "WIDTH / 2"));
        let mut block = AddressBlock::new("regs", "0", "4", "WIDTH");
        block.register_data.push(RegisterData::Register(register));
        let mut map = MemoryMap::new("map");
        map.blocks.push(MemoryBlock::AddressBlock(block));
        component.memory_maps.push(map);

        let parser = SystemVerilogParser::with_scope(component_scope(&component));
        assert_eq!(parser.integer_value("HALF"), Some(16));
        assert_eq!(parser.scope().len(), 2);
    }
}
