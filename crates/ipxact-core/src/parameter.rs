//! Parameters, choices, and their enumerations.

use serde::{Deserialize, Serialize};

/// A named, typed, expression-valued parameter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Parameter {
    /// Identifier other expressions use to reference this parameter.
    pub id: String,
    pub name: String,
    /// Value expression.
    pub value: String,
    /// SystemVerilog type name; empty means untyped.
    #[serde(rename = "type")]
    pub type_name: String,
    pub minimum: String,
    pub maximum: String,
    /// Name of a [`Choice`] constraining the value.
    pub choice_ref: String,
    /// `immediate`, `user`, `generated` or empty.
    pub resolve: String,
    /// Identifier required when the value is user or generator resolved.
    pub value_id: String,
    pub vectors: Vec<ParameterVector>,
}

impl Parameter {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: name.clone(),
            name,
            value: value.into(),
            ..Self::default()
        }
    }

    pub fn with_type(mut self, type_name: impl Into<String>) -> Self {
        self.type_name = type_name.into();
        self
    }
}

/// One dimension of a vector parameter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ParameterVector {
    /// 1685-2022 only.
    pub id: String,
    pub left: String,
    pub right: String,
}

/// A set of legal values referenced by parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Choice {
    pub name: String,
    pub enumerations: Vec<Enumeration>,
}

impl Choice {
    pub fn has_enumeration(&self, value: &str) -> bool {
        let value = value.trim();
        self.enumerations.iter().any(|e| e.value.trim() == value)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Enumeration {
    pub value: String,
    pub text: String,
}

/// Find a choice by name.
pub fn find_choice<'a>(choices: &'a [Choice], name: &str) -> Option<&'a Choice> {
    choices.iter().find(|c| c.name == name)
}
