//! Read-only resolution of VLNV references to documents.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use std::sync::Arc;

use crate::bus::BusDefinition;
use crate::document::{Document, DocumentType, Vlnv};
use crate::error::{ModelError, Result};
use crate::parse;

/// Library lookup used to resolve cross-document references.
pub trait Library {
    fn contains(&self, vlnv: &Vlnv) -> bool;

    /// Type of the document behind `vlnv`, [`DocumentType::Unknown`] when absent.
    fn document_type(&self, vlnv: &Vlnv) -> DocumentType;

    /// Shared read-only handle to the document.
    fn model(&self, vlnv: &Vlnv) -> Option<Arc<Document>>;
}

/// A library held entirely in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryLibrary {
    documents: BTreeMap<Vlnv, Arc<Document>>,
}

impl InMemoryLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a document, rejecting a second document with the same VLNV.
    pub fn insert(&mut self, document: Document) -> Result<()> {
        let vlnv = document.vlnv().clone();
        if self.documents.contains_key(&vlnv) {
            return Err(ModelError::DuplicateDocument {
                vlnv: vlnv.to_string(),
            });
        }
        self.documents.insert(vlnv, Arc::new(document));
        Ok(())
    }

    /// Load every document found under `dir`.
    pub fn load_directory(&mut self, dir: &Path) -> Result<usize> {
        let mut loaded = 0;
        for path in parse::discover_documents(dir)? {
            let document = parse::load_document(&path)?;
            log::debug!("loaded {} {}", document.document_type(), document.vlnv());
            self.insert(document)?;
            loaded += 1;
        }
        Ok(loaded)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// All documents ordered by VLNV.
    pub fn documents(&self) -> impl Iterator<Item = &Arc<Document>> {
        self.documents.values()
    }
}

impl Library for InMemoryLibrary {
    fn contains(&self, vlnv: &Vlnv) -> bool {
        self.documents.contains_key(vlnv)
    }

    fn document_type(&self, vlnv: &Vlnv) -> DocumentType {
        self.documents
            .get(vlnv)
            .map(|d| d.document_type())
            .unwrap_or(DocumentType::Unknown)
    }

    fn model(&self, vlnv: &Vlnv) -> Option<Arc<Document>> {
        self.documents.get(vlnv).cloned()
    }
}

/// System group names of `bus` and every bus definition it extends.
///
/// Unresolvable or cyclic `extends` references end the walk.
pub fn system_groups(bus: &BusDefinition, library: &dyn Library) -> Vec<String> {
    let mut groups = bus.system_group_names.clone();
    let mut visited: HashSet<Vlnv> = HashSet::from([bus.vlnv.clone()]);
    let mut next = bus.extends.clone();

    while let Some(vlnv) = next.take() {
        if !visited.insert(vlnv.clone()) {
            break;
        }
        let Some(document) = library.model(&vlnv) else {
            log::warn!("extended bus definition {vlnv} not found in library");
            break;
        };
        let Some(parent) = document.as_bus_definition() else {
            break;
        };
        for group in &parent.system_group_names {
            if !groups.contains(group) {
                groups.push(group.clone());
            }
        }
        next = parent.extends.clone();
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Revision;

    fn bus(name: &str, groups: &[&str], extends: Option<&str>) -> BusDefinition {
        let mut b = BusDefinition::new(Vlnv::new("acme", "bus", name, "1.0"), Revision::Std14);
        b.system_group_names = groups.iter().map(|g| g.to_string()).collect();
        b.extends = extends.map(|e| Vlnv::new("acme", "bus", e, "1.0"));
        b
    }

    #[test]
    fn insert_and_lookup() {
        let mut lib = InMemoryLibrary::new();
        let b = bus("apb", &[], None);
        let vlnv = b.vlnv.clone();
        lib.insert(Document::BusDefinition(b)).unwrap();

        assert!(lib.contains(&vlnv));
        assert_eq!(lib.document_type(&vlnv), DocumentType::BusDefinition);
        assert!(lib.model(&vlnv).is_some());

        let missing = Vlnv::new("acme", "bus", "axi", "1.0");
        assert!(!lib.contains(&missing));
        assert_eq!(lib.document_type(&missing), DocumentType::Unknown);
    }

    #[test]
    fn duplicate_insert_rejected() {
        let mut lib = InMemoryLibrary::new();
        lib.insert(Document::BusDefinition(bus("apb", &[], None))).unwrap();
        let err = lib
            .insert(Document::BusDefinition(bus("apb", &[], None)))
            .unwrap_err();
        assert!(matches!(err, ModelError::DuplicateDocument { .. }));
    }

    #[test]
    fn system_groups_follow_extends() {
        let mut lib = InMemoryLibrary::new();
        lib.insert(Document::BusDefinition(bus("base", &["clocks", "resets"], None)))
            .unwrap();
        let child = bus("child", &["clocks", "debug"], Some("base"));
        let groups = system_groups(&child, &lib);
        assert_eq!(groups, vec!["clocks", "debug", "resets"]);
    }

    #[test]
    fn system_groups_survive_cycles() {
        let mut lib = InMemoryLibrary::new();
        lib.insert(Document::BusDefinition(bus("a", &["ga"], Some("b"))))
            .unwrap();
        lib.insert(Document::BusDefinition(bus("b", &["gb"], Some("a"))))
            .unwrap();
        let a = bus("a", &["ga"], Some("b"));
        assert_eq!(system_groups(&a, &lib), vec!["ga", "gb"]);
    }
}
