//! `ipxact list`: show the documents a library resolves to.

use std::path::{Path, PathBuf};

use anyhow::Result;

use ipxact_core::InMemoryLibrary;

use crate::commands::{library_paths, load_library};
use crate::manifest::IpxactManifest;

pub fn run(
    project_dir: &Path,
    manifest: Option<&IpxactManifest>,
    libraries: &[PathBuf],
) -> Result<()> {
    let strict = manifest.is_some_and(|m| m.validation.fail_on_warning);
    let paths = library_paths(project_dir, manifest, libraries);
    let library = load_library(&paths, !libraries.is_empty(), strict)?;
    print!("{}", render(&library));
    Ok(())
}

/// One line per document, sorted by VLNV.
pub fn render(library: &InMemoryLibrary) -> String {
    let mut rows: Vec<(String, String, String)> = library
        .documents()
        .map(|d| (d.vlnv().to_string(), d.document_type().to_string(), d.revision().to_string()))
        .collect();
    rows.sort();

    let width = rows.iter().map(|(_, kind, _)| kind.len()).max().unwrap_or(0);
    let mut out = String::new();
    for (vlnv, kind, revision) in &rows {
        out.push_str(&format!("{kind:<width$}  {vlnv}  ({revision})\n"));
    }
    out.push_str(&format!("{} document(s)\n", rows.len()));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use ipxact_core::bus::BusDefinition;
    use ipxact_core::{Document, Revision, Vlnv};

    #[test]
    fn render_sorts_by_vlnv() {
        let mut library = InMemoryLibrary::new();
        for name in ["uart", "apb"] {
            let bus = BusDefinition::new(Vlnv::new("acme", "bus", name, "1.0"), Revision::Std14);
            library.insert(Document::BusDefinition(bus)).unwrap();
        }
        let output = render(&library);
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("acme:bus:apb:1.0"));
        assert!(lines[0].starts_with("bus definition"));
        assert_eq!(lines[2], "2 document(s)");
    }

    #[test]
    fn empty_library() {
        assert_eq!(render(&InMemoryLibrary::new()), "0 document(s)\n");
    }
}
