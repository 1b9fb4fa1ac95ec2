//! Document identity: revisions, VLNV identifiers, and the top-level document sum type.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::abstraction::AbstractionDefinition;
use crate::bus::BusDefinition;
use crate::component::Component;
use crate::error::ModelError;

/// IP-XACT standard revision a document was authored against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Revision {
    /// IEEE 1685-2014.
    #[default]
    #[serde(rename = "1685-2014")]
    Std14,
    /// IEEE 1685-2022.
    #[serde(rename = "1685-2022")]
    Std22,
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Revision::Std14 => write!(f, "1685-2014"),
            Revision::Std22 => write!(f, "1685-2022"),
        }
    }
}

/// Vendor-Library-Name-Version identifier.
///
/// Serialized as the colon separated form `vendor:library:name:version`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Vlnv {
    pub vendor: String,
    pub library: String,
    pub name: String,
    pub version: String,
}

impl Vlnv {
    pub fn new(
        vendor: impl Into<String>,
        library: impl Into<String>,
        name: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            vendor: vendor.into(),
            library: library.into(),
            name: name.into(),
            version: version.into(),
        }
    }

    /// True when every part is empty.
    pub fn is_empty(&self) -> bool {
        self.vendor.is_empty()
            && self.library.is_empty()
            && self.name.is_empty()
            && self.version.is_empty()
    }
}

impl fmt::Display for Vlnv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}:{}",
            self.vendor, self.library, self.name, self.version
        )
    }
}

impl FromStr for Vlnv {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(':').map(str::trim).collect();
        match parts.as_slice() {
            [vendor, library, name, version] => Ok(Vlnv::new(*vendor, *library, *name, *version)),
            _ => Err(ModelError::InvalidVlnv { text: s.to_string() }),
        }
    }
}

impl TryFrom<String> for Vlnv {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Vlnv> for String {
    fn from(value: Vlnv) -> Self {
        value.to_string()
    }
}

/// Kind of document a VLNV resolves to in a library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentType {
    Component,
    AbstractionDefinition,
    BusDefinition,
    /// The VLNV is not known to the library.
    Unknown,
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentType::Component => write!(f, "component"),
            DocumentType::AbstractionDefinition => write!(f, "abstraction definition"),
            DocumentType::BusDefinition => write!(f, "bus definition"),
            DocumentType::Unknown => write!(f, "unknown"),
        }
    }
}

/// A parsed IP-XACT document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "document", rename_all = "kebab-case")]
pub enum Document {
    Component(Component),
    AbstractionDefinition(AbstractionDefinition),
    BusDefinition(BusDefinition),
}

impl Document {
    pub fn vlnv(&self) -> &Vlnv {
        match self {
            Document::Component(c) => &c.vlnv,
            Document::AbstractionDefinition(a) => &a.vlnv,
            Document::BusDefinition(b) => &b.vlnv,
        }
    }

    pub fn revision(&self) -> Revision {
        match self {
            Document::Component(c) => c.revision,
            Document::AbstractionDefinition(a) => a.revision,
            Document::BusDefinition(b) => b.revision,
        }
    }

    pub fn document_type(&self) -> DocumentType {
        match self {
            Document::Component(_) => DocumentType::Component,
            Document::AbstractionDefinition(_) => DocumentType::AbstractionDefinition,
            Document::BusDefinition(_) => DocumentType::BusDefinition,
        }
    }

    pub fn as_component(&self) -> Option<&Component> {
        match self {
            Document::Component(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_abstraction_definition(&self) -> Option<&AbstractionDefinition> {
        match self {
            Document::AbstractionDefinition(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_bus_definition(&self) -> Option<&BusDefinition> {
        match self {
            Document::BusDefinition(b) => Some(b),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vlnv_display_and_parse() {
        let vlnv = Vlnv::new("acme", "ip", "uart", "1.0");
        assert_eq!(vlnv.to_string(), "acme:ip:uart:1.0");
        assert_eq!("acme:ip:uart:1.0".parse::<Vlnv>().unwrap(), vlnv);
    }

    #[test]
    fn vlnv_rejects_wrong_part_count() {
        assert!("acme:ip:uart".parse::<Vlnv>().is_err());
        assert!("a:b:c:d:e".parse::<Vlnv>().is_err());
    }

    #[test]
    fn vlnv_is_empty() {
        assert!(Vlnv::default().is_empty());
        assert!(":::".parse::<Vlnv>().unwrap().is_empty());
        assert!(!Vlnv::new("a", "", "", "").is_empty());
    }

    #[test]
    fn revision_serde_names() {
        let json = serde_json::to_string(&Revision::Std22).unwrap();
        assert_eq!(json, "\"1685-2022\"");
        let back: Revision = serde_json::from_str("\"1685-2014\"").unwrap();
        assert_eq!(back, Revision::Std14);
    }
}
