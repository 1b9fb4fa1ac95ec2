//! `ipxact.toml` manifest parsing and project configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub const MANIFEST_FILE: &str = "ipxact.toml";

/// The top-level manifest of an IP-XACT project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IpxactManifest {
    pub project: ProjectConfig,
    #[serde(default)]
    pub library: LibraryConfig,
    #[serde(default)]
    pub validation: ValidationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Where library documents live, relative to the manifest directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LibraryConfig {
    #[serde(default = "default_library_paths")]
    pub paths: Vec<String>,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            paths: default_library_paths(),
        }
    }
}

fn default_library_paths() -> Vec<String> {
    vec!["library".to_string()]
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Report format, `human` or `json`.
    #[serde(default)]
    pub report: Option<String>,
    /// Treat a missing library directory as an error.
    #[serde(default, rename = "fail-on-warning")]
    pub fail_on_warning: bool,
}

impl IpxactManifest {
    /// Search upward from `start_dir` for an `ipxact.toml` file, parse and
    /// return it along with the directory it was found in.
    pub fn find_and_load(start_dir: &Path) -> Result<Option<(Self, PathBuf)>> {
        let mut dir = start_dir.to_path_buf();
        loop {
            let candidate = dir.join(MANIFEST_FILE);
            if candidate.is_file() {
                let content = std::fs::read_to_string(&candidate)
                    .with_context(|| format!("reading {}", candidate.display()))?;
                let manifest: IpxactManifest = toml::from_str(&content)
                    .with_context(|| format!("parsing {}", candidate.display()))?;
                return Ok(Some((manifest, dir)));
            }
            if !dir.pop() {
                break;
            }
        }
        Ok(None)
    }

    #[cfg(test)]
    pub fn from_str(s: &str) -> Result<Self> {
        toml::from_str(s).context("parsing ipxact.toml")
    }

    /// Library directories resolved against the manifest directory.
    pub fn library_paths(&self, project_dir: &Path) -> Vec<PathBuf> {
        self.library
            .paths
            .iter()
            .map(|p| project_dir.join(p))
            .collect()
    }

    pub fn report_format(&self) -> Option<&str> {
        self.validation.report.as_deref()
    }
}
