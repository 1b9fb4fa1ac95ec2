//! Bus definitions.

use serde::{Deserialize, Serialize};

use crate::document::{Revision, Vlnv};

/// General properties of a bus protocol, including its system groups.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct BusDefinition {
    pub vlnv: Vlnv,
    pub revision: Revision,
    pub extends: Option<Vlnv>,
    pub direct_connection: bool,
    pub is_addressable: bool,
    pub system_group_names: Vec<String>,
}

impl BusDefinition {
    pub fn new(vlnv: Vlnv, revision: Revision) -> Self {
        Self {
            vlnv,
            revision,
            ..Self::default()
        }
    }
}
