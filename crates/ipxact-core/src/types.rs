//! Enumerated IP-XACT values shared across the model.
//!
//! Each enum serializes to its IP-XACT text form and exposes `as_str`/`parse`
//! so callers that hold raw text (readers, validators) can map it leniently.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Access rights of an address block, register, or field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccessType {
    #[serde(rename = "read-only")]
    ReadOnly,
    #[serde(rename = "write-only")]
    WriteOnly,
    #[serde(rename = "read-write")]
    ReadWrite,
    #[serde(rename = "writeOnce")]
    WriteOnce,
    #[serde(rename = "read-writeOnce")]
    ReadWriteOnce,
}

impl AccessType {
    pub fn as_str(self) -> &'static str {
        match self {
            AccessType::ReadOnly => "read-only",
            AccessType::WriteOnly => "write-only",
            AccessType::ReadWrite => "read-write",
            AccessType::WriteOnce => "writeOnce",
            AccessType::ReadWriteOnce => "read-writeOnce",
        }
    }

    pub fn parse(text: &str) -> Option<Self> {
        match text.trim() {
            "read-only" => Some(AccessType::ReadOnly),
            "write-only" => Some(AccessType::WriteOnly),
            "read-write" => Some(AccessType::ReadWrite),
            "writeOnce" => Some(AccessType::WriteOnce),
            "read-writeOnce" => Some(AccessType::ReadWriteOnce),
            _ => None,
        }
    }

    /// Whether an element with access `inner` may live inside a container
    /// declaring `outer`. An unset access on either side is unconstrained.
    ///
    /// ```
    /// use ipxact_core::types::AccessType;
    ///
    /// assert!(!AccessType::permits(Some(AccessType::ReadOnly), Some(AccessType::WriteOnly)));
    /// assert!(AccessType::permits(Some(AccessType::WriteOnce), Some(AccessType::WriteOnce)));
    /// ```
    pub fn permits(outer: Option<AccessType>, inner: Option<AccessType>) -> bool {
        let (Some(outer), Some(inner)) = (outer, inner) else {
            return true;
        };
        match outer {
            AccessType::ReadWrite => true,
            AccessType::ReadOnly => inner == AccessType::ReadOnly,
            AccessType::WriteOnly => {
                matches!(inner, AccessType::WriteOnly | AccessType::WriteOnce)
            }
            AccessType::ReadWriteOnce => matches!(
                inner,
                AccessType::ReadOnly | AccessType::ReadWriteOnce | AccessType::WriteOnce
            ),
            AccessType::WriteOnce => inner == AccessType::WriteOnce,
        }
    }

    /// True when the access allows repeated writes.
    pub fn is_writable(self) -> bool {
        !matches!(
            self,
            AccessType::ReadOnly | AccessType::ReadWriteOnce | AccessType::WriteOnce
        )
    }
}

impl fmt::Display for AccessType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Usage of an address block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Usage {
    Register,
    Memory,
    Reserved,
}

impl Usage {
    pub fn as_str(self) -> &'static str {
        match self {
            Usage::Register => "register",
            Usage::Memory => "memory",
            Usage::Reserved => "reserved",
        }
    }
}

impl fmt::Display for Usage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Presence of a logical port in one interface mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Presence {
    Required,
    Optional,
    Illegal,
}

/// Direction of a wire port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Direction {
    In,
    Out,
    Inout,
    Phantom,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::In => "in",
            Direction::Out => "out",
            Direction::Inout => "inout",
            Direction::Phantom => "phantom",
        }
    }

    /// The direction seen from the opposite side of a connection.
    pub fn mirrored(self) -> Self {
        match self {
            Direction::In => Direction::Out,
            Direction::Out => Direction::In,
            other => other,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Initiative of a transactional port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Initiative {
    Requires,
    Provides,
    Both,
    Phantom,
}

impl Initiative {
    pub fn as_str(self) -> &'static str {
        match self {
            Initiative::Requires => "requires",
            Initiative::Provides => "provides",
            Initiative::Both => "both",
            Initiative::Phantom => "phantom",
        }
    }

    pub fn parse(text: &str) -> Option<Self> {
        match text.trim() {
            "requires" => Some(Initiative::Requires),
            "provides" => Some(Initiative::Provides),
            "both" => Some(Initiative::Both),
            "phantom" => Some(Initiative::Phantom),
            _ => None,
        }
    }

    pub fn mirrored(self) -> Self {
        match self {
            Initiative::Requires => Initiative::Provides,
            Initiative::Provides => Initiative::Requires,
            other => other,
        }
    }
}

impl fmt::Display for Initiative {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Standard transactional port kinds.
pub const TRANSACTIONAL_KINDS: &[&str] =
    &["tlm_port", "tlm_socket", "simple_socket", "multi_socket"];

/// Mode of a bus interface.
///
/// The 1685-2022 names `initiator`/`target` are accepted as aliases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InterfaceMode {
    #[serde(rename = "master", alias = "initiator")]
    Master,
    #[serde(rename = "slave", alias = "target")]
    Slave,
    #[serde(rename = "system")]
    System,
    #[serde(rename = "mirroredMaster", alias = "mirroredInitiator")]
    MirroredMaster,
    #[serde(rename = "mirroredSlave", alias = "mirroredTarget")]
    MirroredSlave,
    #[serde(rename = "mirroredSystem")]
    MirroredSystem,
    #[serde(rename = "monitor")]
    Monitor,
}

impl InterfaceMode {
    pub fn as_str(self) -> &'static str {
        match self {
            InterfaceMode::Master => "master",
            InterfaceMode::Slave => "slave",
            InterfaceMode::System => "system",
            InterfaceMode::MirroredMaster => "mirroredMaster",
            InterfaceMode::MirroredSlave => "mirroredSlave",
            InterfaceMode::MirroredSystem => "mirroredSystem",
            InterfaceMode::Monitor => "monitor",
        }
    }

    pub fn is_mirrored(self) -> bool {
        matches!(
            self,
            InterfaceMode::MirroredMaster
                | InterfaceMode::MirroredSlave
                | InterfaceMode::MirroredSystem
        )
    }

    /// The non-mirrored mode whose logical port definition applies.
    pub fn base(self) -> Self {
        match self {
            InterfaceMode::MirroredMaster => InterfaceMode::Master,
            InterfaceMode::MirroredSlave => InterfaceMode::Slave,
            InterfaceMode::MirroredSystem => InterfaceMode::System,
            other => other,
        }
    }
}

impl fmt::Display for InterfaceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
