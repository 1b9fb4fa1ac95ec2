//! Abstraction definitions and their logical port descriptions.

use serde::{Deserialize, Serialize};

use crate::document::{Revision, Vlnv};
use crate::parameter::{Choice, Parameter};
use crate::types::{Direction, InterfaceMode, Presence};

/// Logical ports of a bus protocol, independent of any component.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct AbstractionDefinition {
    pub vlnv: Vlnv,
    pub revision: Revision,
    pub bus_type: Vlnv,
    pub extends: Option<Vlnv>,
    pub logical_ports: Vec<PortAbstraction>,
    pub parameters: Vec<Parameter>,
    pub choices: Vec<Choice>,
}

impl AbstractionDefinition {
    pub fn new(vlnv: Vlnv, revision: Revision, bus_type: Vlnv) -> Self {
        Self {
            vlnv,
            revision,
            bus_type,
            ..Self::default()
        }
    }

    pub fn logical_port(&self, name: &str) -> Option<&PortAbstraction> {
        self.logical_ports.iter().find(|p| p.logical_name == name)
    }
}

/// One logical port of an abstraction definition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct PortAbstraction {
    pub logical_name: String,
    /// Presence expression (1685-2014).
    pub is_present: String,
    /// Port match flag (1685-2022).
    #[serde(rename = "match")]
    pub match_: bool,
    pub wire: Option<WireAbstraction>,
    pub transactional: Option<TransactionalAbstraction>,
    pub packets: Vec<Packet>,
}

/// The per-mode definition of a logical port.
#[derive(Debug, Clone, Copy)]
pub enum ModePort<'a> {
    Wire(&'a WirePort),
    Transactional(&'a TransactionalPort),
}

impl<'a> ModePort<'a> {
    pub fn presence(&self) -> Option<Presence> {
        match self {
            ModePort::Wire(w) => w.presence,
            ModePort::Transactional(t) => t.presence,
        }
    }

    /// Width expression (wire width or transactional bus width).
    pub fn width(&self) -> &'a str {
        match self {
            ModePort::Wire(w) => &w.width,
            ModePort::Transactional(t) => &t.bus_width,
        }
    }
}

impl PortAbstraction {
    pub fn wire(name: impl Into<String>, wire: WireAbstraction) -> Self {
        Self {
            logical_name: name.into(),
            wire: Some(wire),
            ..Self::default()
        }
    }

    pub fn transactional(name: impl Into<String>, transactional: TransactionalAbstraction) -> Self {
        Self {
            logical_name: name.into(),
            transactional: Some(transactional),
            ..Self::default()
        }
    }

    /// The port definition applying to an interface `mode`.
    ///
    /// Mirrored modes use the definition of their base mode; system modes
    /// select the system port of `system_group`. Monitor mode has none.
    pub fn port_for_mode(&self, mode: InterfaceMode, system_group: &str) -> Option<ModePort<'_>> {
        if let Some(wire) = &self.wire {
            let port = match mode.base() {
                InterfaceMode::Master => wire.on_master.as_ref(),
                InterfaceMode::Slave => wire.on_slave.as_ref(),
                InterfaceMode::System => {
                    wire.on_system.iter().find(|p| p.system_group == system_group)
                }
                _ => None,
            };
            return port.map(ModePort::Wire);
        }
        if let Some(transactional) = &self.transactional {
            let port = match mode.base() {
                InterfaceMode::Master => transactional.on_master.as_ref(),
                InterfaceMode::Slave => transactional.on_slave.as_ref(),
                InterfaceMode::System => transactional
                    .on_system
                    .iter()
                    .find(|p| p.system_group == system_group),
                _ => None,
            };
            return port.map(ModePort::Transactional);
        }
        None
    }

    /// Presence for an interface mode; a defined port without an explicit
    /// presence is optional, an undefined one has no presence.
    pub fn presence(&self, mode: InterfaceMode, system_group: &str) -> Option<Presence> {
        self.port_for_mode(mode, system_group)
            .map(|port| port.presence().unwrap_or(Presence::Optional))
    }
}

/// Wire-specific logical port definition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct WireAbstraction {
    pub qualifier: Qualifier,
    pub default_value: String,
    pub requires_driver: bool,
    pub on_master: Option<WirePort>,
    pub on_slave: Option<WirePort>,
    pub on_system: Vec<WirePort>,
}

/// Wire characteristics in one interface mode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct WirePort {
    pub system_group: String,
    pub presence: Option<Presence>,
    pub width: String,
    pub direction: Option<Direction>,
    pub timing_constraint: Option<TimingConstraint>,
    pub mirrored_timing_constraint: Option<TimingConstraint>,
    pub drive_constraint: Option<CellSpecification>,
    pub mirrored_drive_constraint: Option<CellSpecification>,
    pub load_constraint: Option<CellSpecification>,
    pub mirrored_load_constraint: Option<CellSpecification>,
}

impl WirePort {
    pub fn new(width: impl Into<String>, direction: Direction) -> Self {
        Self {
            width: width.into(),
            direction: Some(direction),
            ..Self::default()
        }
    }

    pub fn with_presence(mut self, presence: Presence) -> Self {
        self.presence = Some(presence);
        self
    }
}

/// Transactional-specific logical port definition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct TransactionalAbstraction {
    pub qualifier: Qualifier,
    pub on_master: Option<TransactionalPort>,
    pub on_slave: Option<TransactionalPort>,
    pub on_system: Vec<TransactionalPort>,
}

/// Transactional characteristics in one interface mode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct TransactionalPort {
    pub system_group: String,
    pub presence: Option<Presence>,
    /// `requires`, `provides`, `both`, `phantom` or empty.
    pub initiative: String,
    pub kind: String,
    pub bus_width: String,
    pub protocol: Option<Protocol>,
}

/// Qualifier flags of a logical port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QualifierType {
    Address,
    Data,
    Clock,
    Reset,
    Valid,
    Interrupt,
    ClockEnable,
    PowerEnable,
    Opcode,
    Protection,
    FlowControl,
    User,
    Request,
    Response,
    Capability,
}

impl QualifierType {
    pub fn as_str(self) -> &'static str {
        match self {
            QualifierType::Address => "address",
            QualifierType::Data => "data",
            QualifierType::Clock => "clock",
            QualifierType::Reset => "reset",
            QualifierType::Valid => "valid",
            QualifierType::Interrupt => "interrupt",
            QualifierType::ClockEnable => "clock-enable",
            QualifierType::PowerEnable => "power-enable",
            QualifierType::Opcode => "opcode",
            QualifierType::Protection => "protection",
            QualifierType::FlowControl => "flow-control",
            QualifierType::User => "user",
            QualifierType::Request => "request",
            QualifierType::Response => "response",
            QualifierType::Capability => "capability",
        }
    }
}

/// Named attributes a qualifier may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QualifierAttribute {
    ResetLevel,
    ClockEnableLevel,
    PowerEnableLevel,
    PowerDomainReference,
    FlowType,
    UserFlowType,
    UserDefined,
}

impl QualifierAttribute {
    pub fn as_str(self) -> &'static str {
        match self {
            QualifierAttribute::ResetLevel => "reset-level",
            QualifierAttribute::ClockEnableLevel => "clock-enable-level",
            QualifierAttribute::PowerEnableLevel => "power-enable-level",
            QualifierAttribute::PowerDomainReference => "power-domain-reference",
            QualifierAttribute::FlowType => "flow-type",
            QualifierAttribute::UserFlowType => "user-flow-type",
            QualifierAttribute::UserDefined => "user-defined",
        }
    }
}

/// Attribute values of a qualifier; empty text means absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct QualifierAttributes {
    pub reset_level: String,
    pub clock_enable_level: String,
    pub power_enable_level: String,
    pub power_domain_reference: String,
    pub flow_type: String,
    pub user_flow_type: String,
    pub user_defined: String,
}

impl QualifierAttributes {
    fn slot(&mut self, attribute: QualifierAttribute) -> &mut String {
        match attribute {
            QualifierAttribute::ResetLevel => &mut self.reset_level,
            QualifierAttribute::ClockEnableLevel => &mut self.clock_enable_level,
            QualifierAttribute::PowerEnableLevel => &mut self.power_enable_level,
            QualifierAttribute::PowerDomainReference => &mut self.power_domain_reference,
            QualifierAttribute::FlowType => &mut self.flow_type,
            QualifierAttribute::UserFlowType => &mut self.user_flow_type,
            QualifierAttribute::UserDefined => &mut self.user_defined,
        }
    }

    pub fn get(&self, attribute: QualifierAttribute) -> &str {
        match attribute {
            QualifierAttribute::ResetLevel => &self.reset_level,
            QualifierAttribute::ClockEnableLevel => &self.clock_enable_level,
            QualifierAttribute::PowerEnableLevel => &self.power_enable_level,
            QualifierAttribute::PowerDomainReference => &self.power_domain_reference,
            QualifierAttribute::FlowType => &self.flow_type,
            QualifierAttribute::UserFlowType => &self.user_flow_type,
            QualifierAttribute::UserDefined => &self.user_defined,
        }
    }

    /// Attributes holding a value.
    pub fn set_attributes(&self) -> Vec<QualifierAttribute> {
        [
            QualifierAttribute::ResetLevel,
            QualifierAttribute::ClockEnableLevel,
            QualifierAttribute::PowerEnableLevel,
            QualifierAttribute::PowerDomainReference,
            QualifierAttribute::FlowType,
            QualifierAttribute::UserFlowType,
            QualifierAttribute::UserDefined,
        ]
        .into_iter()
        .filter(|a| !self.get(*a).is_empty())
        .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Qualifier {
    pub types: Vec<QualifierType>,
    pub attributes: QualifierAttributes,
}

impl Qualifier {
    pub fn of(types: &[QualifierType]) -> Self {
        Self {
            types: types.to_vec(),
            attributes: QualifierAttributes::default(),
        }
    }

    pub fn with_attribute(
        mut self,
        attribute: QualifierAttribute,
        value: impl Into<String>,
    ) -> Self {
        *self.attributes.slot(attribute) = value.into();
        self
    }

    pub fn has_type(&self, qualifier_type: QualifierType) -> bool {
        self.types.contains(&qualifier_type)
    }

    /// Attribute text, empty when absent.
    pub fn attribute(&self, attribute: QualifierAttribute) -> &str {
        self.attributes.get(attribute)
    }

    pub fn is_set(&self) -> bool {
        !self.types.is_empty() || !self.attributes.set_attributes().is_empty()
    }
}

/// Transaction protocol of a transactional port.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Protocol {
    /// `tlm` or `custom`.
    pub protocol_type: String,
    pub custom_protocol_type: String,
    pub payload: Option<Payload>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Payload {
    pub name: String,
    /// `generic` or `specific`.
    #[serde(rename = "type")]
    pub payload_type: String,
    pub extension: String,
    pub extension_mandatory: bool,
}

/// Timing constraint relative to a clock port.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct TimingConstraint {
    /// Percentage of the clock cycle.
    pub value: String,
    pub clock_edge: String,
    pub delay_type: String,
    pub clock_name: String,
}

/// Technology-independent cell description used by drive and load constraints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CellSpecification {
    pub cell_function: String,
    /// Custom function text when `cell_function` is `other`.
    pub other_function: String,
    pub cell_class: String,
    pub cell_strength: String,
}

/// A 1685-2022 packet carried by a logical port.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Packet {
    pub name: String,
    pub endianness: String,
    pub fields: Vec<PacketField>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct PacketField {
    pub name: String,
    pub width: String,
    pub value: String,
    pub endianness: String,
}

impl PacketField {
    pub fn new(name: impl Into<String>, width: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            width: width.into(),
            ..Self::default()
        }
    }
}
