//! Component generator hookups and their lenient reader/writer.
//!
//! Unrecognized enumerated text never fails a read: the field is left unset.
//! Elements that only exist in 1685-2022 are dropped when reading or writing
//! an older revision.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::document::Revision;
use crate::parameter::Parameter;

/// Where a generator runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GeneratorScope {
    Instance,
    Entity,
}

impl GeneratorScope {
    pub fn as_str(self) -> &'static str {
        match self {
            GeneratorScope::Instance => "instance",
            GeneratorScope::Entity => "entity",
        }
    }
}

impl FromStr for GeneratorScope {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "instance" => Ok(GeneratorScope::Instance),
            "entity" => Ok(GeneratorScope::Entity),
            _ => Err(()),
        }
    }
}

/// Tight generator interface flavour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApiType {
    #[serde(rename = "TGI_2009")]
    Tgi2009,
    #[serde(rename = "TGI_2014_BASE")]
    Tgi2014Base,
    #[serde(rename = "TGI_2014_EXTENDED")]
    Tgi2014Extended,
    #[serde(rename = "TGI_2022_BASE")]
    Tgi2022Base,
    #[serde(rename = "TGI_2022_EXTENDED")]
    Tgi2022Extended,
    #[serde(rename = "none")]
    None,
}

impl ApiType {
    pub fn as_str(self) -> &'static str {
        match self {
            ApiType::Tgi2009 => "TGI_2009",
            ApiType::Tgi2014Base => "TGI_2014_BASE",
            ApiType::Tgi2014Extended => "TGI_2014_EXTENDED",
            ApiType::Tgi2022Base => "TGI_2022_BASE",
            ApiType::Tgi2022Extended => "TGI_2022_EXTENDED",
            ApiType::None => "none",
        }
    }

    /// Whether the API type exists in `revision`.
    pub fn available_in(self, revision: Revision) -> bool {
        match self {
            ApiType::Tgi2022Base | ApiType::Tgi2022Extended => revision == Revision::Std22,
            ApiType::Tgi2009 | ApiType::Tgi2014Base | ApiType::Tgi2014Extended => {
                revision == Revision::Std14
            }
            ApiType::None => true,
        }
    }
}

impl FromStr for ApiType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "TGI_2009" => Ok(ApiType::Tgi2009),
            "TGI_2014_BASE" => Ok(ApiType::Tgi2014Base),
            "TGI_2014_EXTENDED" => Ok(ApiType::Tgi2014Extended),
            "TGI_2022_BASE" => Ok(ApiType::Tgi2022Base),
            "TGI_2022_EXTENDED" => Ok(ApiType::Tgi2022Extended),
            "none" => Ok(ApiType::None),
            _ => Err(()),
        }
    }
}

impl fmt::Display for ApiType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An external generator tool hooked into a component.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ComponentGenerator {
    pub name: String,
    pub display_name: String,
    pub description: String,
    pub hidden: bool,
    #[serde(deserialize_with = "lenient")]
    pub scope: Option<GeneratorScope>,
    /// Ordering expression among generators.
    pub phase: String,
    pub parameters: Vec<Parameter>,
    #[serde(deserialize_with = "lenient")]
    pub api_type: Option<ApiType>,
    /// 1685-2022 only.
    pub api_service: String,
    pub transport_methods: Vec<String>,
    pub generator_exe: String,
    pub groups: Vec<String>,
}

impl ComponentGenerator {
    /// Drop content the given revision cannot express.
    pub fn restrict_to(mut self, revision: Revision) -> Self {
        if revision != Revision::Std22 {
            self.api_service.clear();
        }
        if self.api_type.is_some_and(|api| !api.available_in(revision)) {
            self.api_type = None;
        }
        self
    }
}

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
{
    let text = Option::<String>::deserialize(deserializer)?;
    Ok(text.and_then(|t| t.parse().ok()))
}

/// The textual element form of a generator as read from or written to a document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct GeneratorElement {
    pub name: String,
    pub display_name: String,
    pub description: String,
    pub hidden: String,
    pub scope: String,
    pub phase: String,
    pub parameters: Vec<Parameter>,
    pub api_type: String,
    pub api_service: String,
    pub transport_methods: Vec<String>,
    pub generator_exe: String,
    pub groups: Vec<String>,
}

/// Convert an element into a generator under `revision`.
pub fn read_generator(element: &GeneratorElement, revision: Revision) -> ComponentGenerator {
    let generator = ComponentGenerator {
        name: element.name.clone(),
        display_name: element.display_name.clone(),
        description: element.description.clone(),
        hidden: element.hidden.trim() == "true",
        scope: element.scope.parse().ok(),
        phase: element.phase.clone(),
        parameters: element.parameters.clone(),
        api_type: element.api_type.parse().ok(),
        api_service: element.api_service.clone(),
        transport_methods: element.transport_methods.clone(),
        generator_exe: element.generator_exe.clone(),
        groups: element.groups.clone(),
    };
    generator.restrict_to(revision)
}

/// Convert a generator into its element form under `revision`.
pub fn write_generator(generator: &ComponentGenerator, revision: Revision) -> GeneratorElement {
    let generator = generator.clone().restrict_to(revision);
    GeneratorElement {
        name: generator.name,
        display_name: generator.display_name,
        description: generator.description,
        hidden: if generator.hidden { "true".into() } else { String::new() },
        scope: generator
            .scope
            .map(|s| s.as_str().to_string())
            .unwrap_or_default(),
        phase: generator.phase,
        parameters: generator.parameters,
        api_type: generator
            .api_type
            .map(|a| a.as_str().to_string())
            .unwrap_or_default(),
        api_service: generator.api_service,
        transport_methods: generator.transport_methods,
        generator_exe: generator.generator_exe,
        groups: generator.groups,
    }
}
