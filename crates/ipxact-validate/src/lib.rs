//! Validator network for IP-XACT documents.
//!
//! Every validator implements [`Validator`]: [`Validator::find_errors_in`]
//! appends typed [`Finding`]s and never stops at the first problem, and
//! [`Validator::validate`] is derived from it, so a rejected element always has
//! at least one finding explaining why.
//!
//! Validators are plain structs borrowing what they need (an expression
//! parser, the library, the containing component). Context is explicit: a
//! validator for a different component is simply a new value.
//!
//! Layers, leaf first:
//!
//! - **Leaves:** [`QualifierValidator`], [`ProtocolValidator`],
//!   [`TimingConstraintValidator`], [`CellSpecificationValidator`],
//!   [`PacketValidator`], [`ParameterValidator`], [`FieldValidator`]
//! - **Composites:** [`RegisterValidator`], [`AddressBlockValidator`],
//!   [`PortAbstractionValidator`], [`PortMapValidator`],
//!   [`AbstractionTypeValidator`], [`IndirectInterfaceValidator`]
//! - **Walkers:** [`ComponentValidator`], [`AbstractionDefinitionValidator`]

pub mod abstraction_definition;
pub mod abstraction_type;
pub mod address_block;
pub mod cell_specification;
pub mod common;
pub mod component;
pub mod field;
pub mod finding;
pub mod indirect_interface;
pub mod memory_reserve;
pub mod packet;
pub mod parameter;
pub mod port_abstraction;
pub mod port_map;
pub mod protocol;
pub mod qualifier;
pub mod register;
pub mod report;
pub mod scope;
pub mod timing_constraint;

pub use abstraction_definition::AbstractionDefinitionValidator;
pub use abstraction_type::AbstractionTypeValidator;
pub use address_block::AddressBlockValidator;
pub use cell_specification::CellSpecificationValidator;
pub use component::ComponentValidator;
pub use field::FieldValidator;
pub use finding::{Category, Finding};
pub use indirect_interface::IndirectInterfaceValidator;
pub use memory_reserve::MemoryReserve;
pub use packet::PacketValidator;
pub use parameter::ParameterValidator;
pub use port_abstraction::PortAbstractionValidator;
pub use port_map::PortMapValidator;
pub use protocol::ProtocolValidator;
pub use qualifier::QualifierValidator;
pub use register::RegisterValidator;
pub use report::{DocumentFinding, ValidationReport};
pub use timing_constraint::TimingConstraintValidator;

/// The contract shared by all validators.
pub trait Validator<T: ?Sized> {
    /// Append every finding for `item`. `context` names the enclosing element
    /// and ends up in messages as "within {context}".
    fn find_errors_in(&self, errors: &mut Vec<Finding>, item: &T, context: &str);

    /// All findings for `item`.
    fn findings(&self, item: &T, context: &str) -> Vec<Finding> {
        let mut errors = Vec::new();
        self.find_errors_in(&mut errors, item, context);
        errors
    }

    /// True when `item` has no findings.
    fn validate(&self, item: &T) -> bool {
        self.findings(item, "").is_empty()
    }
}
