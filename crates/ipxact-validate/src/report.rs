//! Validation report over every document of a library.

use std::collections::BTreeMap;
use std::fmt;

use log::debug;
use serde::Serialize;

use ipxact_core::{Document, InMemoryLibrary};

use crate::abstraction_definition::AbstractionDefinitionValidator;
use crate::component::ComponentValidator;
use crate::finding::{Category, Finding};
use crate::Validator;

/// A finding attributed to the document it was found in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentFinding {
    /// VLNV of the validated document.
    pub document: String,
    #[serde(flatten)]
    pub finding: Finding,
}

/// Per-category counts of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReportSummary {
    pub documents: usize,
    pub findings: usize,
    pub by_category: BTreeMap<Category, usize>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationReport {
    /// Number of components and abstraction definitions validated.
    pub documents: usize,
    pub findings: Vec<DocumentFinding>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate every component and abstraction definition in `library`.
    ///
    /// Bus definitions are only consulted as references.
    pub fn for_library(library: &InMemoryLibrary) -> Self {
        let components = ComponentValidator::new(library);
        let definitions = AbstractionDefinitionValidator::new(library);
        let mut report = Self::new();

        for document in library.documents() {
            let findings = match &**document {
                Document::Component(component) => components.findings(component, ""),
                Document::AbstractionDefinition(definition) => definitions.findings(definition, ""),
                Document::BusDefinition(_) => continue,
            };
            report.add(&document.vlnv().to_string(), findings);
        }

        debug!(
            "validated {} documents, {} findings",
            report.documents,
            report.findings.len()
        );
        report
    }

    /// Record the findings of one validated document.
    pub fn add(&mut self, document: &str, findings: Vec<Finding>) {
        self.documents += 1;
        self.findings
            .extend(findings.into_iter().map(|finding| DocumentFinding {
                document: document.to_string(),
                finding,
            }));
    }

    pub fn is_clean(&self) -> bool {
        self.findings.is_empty()
    }

    pub fn count(&self, category: Category) -> usize {
        self.findings
            .iter()
            .filter(|f| f.finding.category == category)
            .count()
    }

    pub fn summary(&self) -> ReportSummary {
        let mut by_category = BTreeMap::new();
        for f in &self.findings {
            *by_category.entry(f.finding.category).or_insert(0) += 1;
        }
        ReportSummary {
            documents: self.documents,
            findings: self.findings.len(),
            by_category,
        }
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Validation Report ===")?;
        write!(
            f,
            "Documents: {} | Findings: {}",
            self.documents,
            self.findings.len()
        )?;
        for category in Category::ALL {
            let count = self.count(category);
            if count > 0 {
                write!(f, " | {category}: {count}")?;
            }
        }
        writeln!(f)?;

        if self.findings.is_empty() {
            writeln!(f, "No findings.")?;
        } else {
            writeln!(f, "--- Findings ---")?;
            for entry in &self.findings {
                writeln!(f, "{} ({})", entry.finding, entry.document)?;
            }
        }
        Ok(())
    }
}
