//! Component documents: views, physical ports, bus interfaces, indirect interfaces.

use serde::{Deserialize, Serialize};

use crate::document::{Revision, Vlnv};
use crate::generator::ComponentGenerator;
use crate::memory::MemoryMap;
use crate::parameter::{Choice, Parameter};
use crate::types::{Direction, InterfaceMode};

/// A hardware component description.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Component {
    pub vlnv: Vlnv,
    pub revision: Revision,
    pub views: Vec<View>,
    pub ports: Vec<Port>,
    pub bus_interfaces: Vec<BusInterface>,
    pub memory_maps: Vec<MemoryMap>,
    pub indirect_interfaces: Vec<IndirectInterface>,
    pub parameters: Vec<Parameter>,
    pub choices: Vec<Choice>,
    pub component_generators: Vec<ComponentGenerator>,
}

impl Component {
    pub fn new(vlnv: Vlnv, revision: Revision) -> Self {
        Self {
            vlnv,
            revision,
            ..Self::default()
        }
    }

    pub fn port(&self, name: &str) -> Option<&Port> {
        self.ports.iter().find(|p| p.name == name)
    }

    pub fn view(&self, name: &str) -> Option<&View> {
        self.views.iter().find(|v| v.name == name)
    }

    pub fn bus_interface(&self, name: &str) -> Option<&BusInterface> {
        self.bus_interfaces.iter().find(|b| b.name == name)
    }

    pub fn memory_map(&self, name: &str) -> Option<&MemoryMap> {
        self.memory_maps.iter().find(|m| m.name == name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct View {
    pub name: String,
    pub env_identifiers: Vec<String>,
}

impl View {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            env_identifiers: Vec::new(),
        }
    }
}

/// A physical port of a component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Port {
    pub name: String,
    #[serde(flatten)]
    pub signal: PortSignal,
}

impl Port {
    pub fn wire(name: impl Into<String>, direction: Direction, left: &str, right: &str) -> Self {
        Self {
            name: name.into(),
            signal: PortSignal::Wire(WireSignal {
                direction,
                left: left.to_string(),
                right: right.to_string(),
                all_logical_directions_allowed: false,
            }),
        }
    }

    pub fn transactional(name: impl Into<String>, initiative: &str, bus_width: &str) -> Self {
        Self {
            name: name.into(),
            signal: PortSignal::Transactional(TransactionalSignal {
                initiative: initiative.to_string(),
                kind: String::new(),
                bus_width: bus_width.to_string(),
                all_logical_initiatives_allowed: false,
            }),
        }
    }

    pub fn as_wire(&self) -> Option<&WireSignal> {
        match &self.signal {
            PortSignal::Wire(w) => Some(w),
            PortSignal::Transactional(_) => None,
        }
    }

    pub fn as_transactional(&self) -> Option<&TransactionalSignal> {
        match &self.signal {
            PortSignal::Transactional(t) => Some(t),
            PortSignal::Wire(_) => None,
        }
    }
}

/// Wire or transactional payload of a physical port.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PortSignal {
    Wire(WireSignal),
    Transactional(TransactionalSignal),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct WireSignal {
    pub direction: Direction,
    /// Vector bounds; both empty for a scalar wire.
    #[serde(default)]
    pub left: String,
    #[serde(default)]
    pub right: String,
    #[serde(default)]
    pub all_logical_directions_allowed: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct TransactionalSignal {
    pub initiative: String,
    pub kind: String,
    pub bus_width: String,
    pub all_logical_initiatives_allowed: bool,
}

/// A bus interface binding a bus type to component ports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct BusInterface {
    pub name: String,
    pub mode: InterfaceMode,
    /// System group name for system and mirrored system modes.
    #[serde(default)]
    pub system_group: String,
    #[serde(default)]
    pub bus_type: Vlnv,
    #[serde(default)]
    pub abstraction_types: Vec<AbstractionType>,
}

impl BusInterface {
    pub fn new(name: impl Into<String>, mode: InterfaceMode) -> Self {
        Self {
            name: name.into(),
            mode,
            system_group: String::new(),
            bus_type: Vlnv::default(),
            abstraction_types: Vec::new(),
        }
    }
}

/// A bus interface's binding to one abstraction definition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct AbstractionType {
    pub abstraction_ref: Option<Vlnv>,
    pub view_refs: Vec<String>,
    pub port_maps: Vec<PortMap>,
}

/// Mapping of one logical port (or part of it) to a physical port or tie off.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct PortMap {
    pub is_present: String,
    pub logical_port: Option<LogicalPortRef>,
    pub physical_port: Option<PhysicalPortRef>,
    pub logical_tie_off: String,
}

impl PortMap {
    pub fn new(logical: impl Into<String>, physical: impl Into<String>) -> Self {
        Self {
            logical_port: Some(LogicalPortRef {
                name: logical.into(),
                range: None,
            }),
            physical_port: Some(PhysicalPortRef {
                name: physical.into(),
                part_select: None,
            }),
            ..Self::default()
        }
    }

    pub fn with_logical_range(mut self, left: &str, right: &str) -> Self {
        if let Some(logical) = self.logical_port.as_mut() {
            logical.range = Some(BitRange::new(left, right));
        }
        self
    }

    pub fn with_part_select(mut self, left: &str, right: &str) -> Self {
        if let Some(physical) = self.physical_port.as_mut() {
            physical.part_select = Some(BitRange::new(left, right));
        }
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct LogicalPortRef {
    pub name: String,
    pub range: Option<BitRange>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct PhysicalPortRef {
    pub name: String,
    pub part_select: Option<BitRange>,
}

/// A `[left:right]` pair of expressions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct BitRange {
    pub left: String,
    pub right: String,
}

impl BitRange {
    pub fn new(left: &str, right: &str) -> Self {
        Self {
            left: left.to_string(),
            right: right.to_string(),
        }
    }
}

/// Indirect access to a memory map or bridged bus interfaces through two fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct IndirectInterface {
    pub name: String,
    /// Field id of the address field.
    pub indirect_address_ref: String,
    /// Field id of the data field.
    pub indirect_data_ref: String,
    pub memory_map_ref: String,
    pub transparent_bridges: Vec<TransparentBridge>,
    pub bits_in_lau: String,
    pub endianness: String,
    pub parameters: Vec<Parameter>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct TransparentBridge {
    /// Name of the bridged master bus interface.
    pub master_ref: String,
    pub is_present: String,
}

impl TransparentBridge {
    pub fn new(master_ref: impl Into<String>) -> Self {
        Self {
            master_ref: master_ref.into(),
            is_present: String::new(),
        }
    }
}
