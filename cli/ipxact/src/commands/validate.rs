//! `ipxact validate`: validate every component and abstraction definition.

use std::path::{Path, PathBuf};

use anyhow::{bail, Result};

use ipxact_validate::ValidationReport;

use crate::commands::{library_paths, load_library};
use crate::manifest::IpxactManifest;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Human,
    Json,
}

/// Resolve the report format (CLI flag > manifest > human).
pub fn resolve_format(
    flag: Option<&str>,
    manifest: Option<&IpxactManifest>,
) -> Result<ReportFormat> {
    match flag.or_else(|| manifest.and_then(|m| m.report_format())) {
        Some("human") | None => Ok(ReportFormat::Human),
        Some("json") => Ok(ReportFormat::Json),
        Some(other) => bail!("unknown report format: '{other}'. Choose: human, json"),
    }
}

pub fn render(report: &ValidationReport, format: ReportFormat) -> Result<String> {
    Ok(match format {
        ReportFormat::Human => report.to_string(),
        ReportFormat::Json => serde_json::to_string_pretty(report)? + "\n",
    })
}

/// Validate the library and print the report; any finding fails the run.
pub fn run(
    project_dir: &Path,
    manifest: Option<&IpxactManifest>,
    libraries: &[PathBuf],
    report_format: Option<&str>,
) -> Result<()> {
    let format = resolve_format(report_format, manifest)?;
    let strict = manifest.is_some_and(|m| m.validation.fail_on_warning);
    let paths = library_paths(project_dir, manifest, libraries);
    let library = load_library(&paths, !libraries.is_empty(), strict)?;

    let report = ValidationReport::for_library(&library);
    print!("{}", render(&report, format)?);

    if !report.is_clean() {
        bail!(
            "validation failed: {} finding(s) in {} document(s)",
            report.findings.len(),
            report.documents
        );
    }
    Ok(())
}
