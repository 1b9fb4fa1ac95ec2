//! Subcommands and the library loading they share.

pub mod list;
pub mod validate;

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use log::{info, warn};

use ipxact_core::InMemoryLibrary;

use crate::manifest::IpxactManifest;

/// Library directories to scan: command-line paths win over the manifest,
/// which wins over `./library`.
pub fn library_paths(
    project_dir: &Path,
    manifest: Option<&IpxactManifest>,
    cli_paths: &[PathBuf],
) -> Vec<PathBuf> {
    if !cli_paths.is_empty() {
        return cli_paths.to_vec();
    }
    match manifest {
        Some(m) => m.library_paths(project_dir),
        None => vec![project_dir.join("library")],
    }
}

/// Load every document below `paths`.
///
/// A missing directory is an error when given on the command line or when
/// `strict`, and a warning otherwise.
pub fn load_library(paths: &[PathBuf], explicit: bool, strict: bool) -> Result<InMemoryLibrary> {
    let mut library = InMemoryLibrary::new();
    for path in paths {
        if !path.is_dir() {
            if explicit || strict {
                bail!("library directory not found: {}", path.display());
            }
            warn!("library directory not found: {}", path.display());
            continue;
        }
        let loaded = library
            .load_directory(path)
            .with_context(|| format!("loading library {}", path.display()))?;
        info!("loaded {loaded} documents from {}", path.display());
    }
    Ok(library)
}
