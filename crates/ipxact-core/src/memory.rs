//! Memory maps and the address block / register / field hierarchy.
//!
//! Memory blocks and register data are closed sum types; validators match on
//! the concrete variant once during traversal.

use serde::{Deserialize, Serialize};

use crate::parameter::Parameter;
use crate::types::{AccessType, Usage};

/// A named memory map holding memory blocks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct MemoryMap {
    pub name: String,
    /// Bits per least addressable unit (expression).
    pub address_unit_bits: String,
    pub blocks: Vec<MemoryBlock>,
}

impl Default for MemoryMap {
    fn default() -> Self {
        Self {
            name: String::new(),
            address_unit_bits: "8".to_string(),
            blocks: Vec::new(),
        }
    }
}

impl MemoryMap {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Address blocks of this map in declaration order.
    pub fn address_blocks(&self) -> impl Iterator<Item = &AddressBlock> {
        self.blocks.iter().filter_map(|b| match b {
            MemoryBlock::AddressBlock(block) => Some(block),
            MemoryBlock::SubspaceMap(_) => None,
        })
    }

    /// Every field reachable through the address blocks and registers of this map.
    pub fn fields(&self) -> impl Iterator<Item = &Field> {
        self.address_blocks()
            .flat_map(|block| block.registers())
            .flat_map(|register| register.fields.iter())
    }
}

/// A memory block inside a memory map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum MemoryBlock {
    AddressBlock(AddressBlock),
    SubspaceMap(SubspaceMap),
}

impl MemoryBlock {
    pub fn name(&self) -> &str {
        match self {
            MemoryBlock::AddressBlock(b) => &b.name,
            MemoryBlock::SubspaceMap(s) => &s.name,
        }
    }
}

/// A block of addresses holding registers or raw memory.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct AddressBlock {
    pub name: String,
    pub is_present: String,
    pub base_address: String,
    pub range: String,
    pub width: String,
    pub usage: Option<Usage>,
    pub access: Option<AccessType>,
    pub volatile: Option<bool>,
    /// `"false"` forbids registers straddling a width boundary (1685-2022).
    pub misalignment_allowed: String,
    pub register_data: Vec<RegisterData>,
    pub parameters: Vec<Parameter>,
}

impl AddressBlock {
    pub fn new(
        name: impl Into<String>,
        base_address: impl Into<String>,
        range: impl Into<String>,
        width: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            base_address: base_address.into(),
            range: range.into(),
            width: width.into(),
            ..Self::default()
        }
    }

    /// Concrete registers of this block in declaration order.
    pub fn registers(&self) -> impl Iterator<Item = &Register> {
        self.register_data.iter().filter_map(|d| match d {
            RegisterData::Register(r) => Some(r),
            RegisterData::RegisterFile(_) => None,
        })
    }
}

/// A reference to another address space mapped into a memory map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SubspaceMap {
    pub name: String,
    pub base_address: String,
    pub master_ref: String,
}

/// Register data inside an address block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum RegisterData {
    Register(Register),
    RegisterFile(RegisterFile),
}

impl RegisterData {
    pub fn name(&self) -> &str {
        match self {
            RegisterData::Register(r) => &r.name,
            RegisterData::RegisterFile(f) => &f.name,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Register {
    pub name: String,
    pub is_present: String,
    pub address_offset: String,
    /// Width in bits (expression).
    pub size: String,
    pub type_identifier: String,
    pub volatile: Option<bool>,
    pub access: Option<AccessType>,
    pub fields: Vec<Field>,
    pub parameters: Vec<Parameter>,
}

impl Register {
    pub fn new(
        name: impl Into<String>,
        address_offset: impl Into<String>,
        size: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            address_offset: address_offset.into(),
            size: size.into(),
            ..Self::default()
        }
    }

    /// True when this register or any of its fields declares volatile true.
    pub fn has_volatile_content(&self) -> bool {
        self.volatile == Some(true) || self.fields.iter().any(|f| f.volatile == Some(true))
    }
}

/// A grouping of registers occupying `range` address units.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct RegisterFile {
    pub name: String,
    pub is_present: String,
    pub address_offset: String,
    pub range: String,
}

/// A bit field of a register.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Field {
    /// Free-text identifier used by indirect interface references.
    pub id: String,
    pub name: String,
    pub is_present: String,
    pub bit_offset: String,
    pub bit_width: String,
    pub reset_value: String,
    pub reset_mask: String,
    pub type_identifier: String,
    pub volatile: Option<bool>,
    pub access: Option<AccessType>,
    pub modified_write: String,
    pub read_action: String,
    pub reserved: String,
    pub parameters: Vec<Parameter>,
}

impl Field {
    pub fn new(
        name: impl Into<String>,
        bit_offset: impl Into<String>,
        bit_width: impl Into<String>,
    ) -> Self {
        let name = name.into();
        Self {
            id: name.clone(),
            name,
            bit_offset: bit_offset.into(),
            bit_width: bit_width.into(),
            ..Self::default()
        }
    }
}

/// Depth-first search for a field by `id` across memory maps.
///
/// Only address blocks and concrete registers are traversed.
pub fn find_field<'a>(maps: &'a [MemoryMap], field_id: &str) -> Option<&'a Field> {
    maps.iter()
        .flat_map(|map| map.fields())
        .find(|field| field.id == field_id)
}
