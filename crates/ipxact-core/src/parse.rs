//! TOML and JSON loading, serialization, and discovery of document files.
//!
//! Documents carry a `document = "component" | "abstraction-definition" |
//! "bus-definition"` tag. XML interchange is handled elsewhere; these formats
//! hold the same in-memory model.

use std::path::{Path, PathBuf};

use crate::document::Document;
use crate::error::{ModelError, Result};

/// Load a document from a `.toml` or `.json` file.
pub fn load_document(path: &Path) -> Result<Document> {
    if !path.exists() {
        return Err(ModelError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let content = std::fs::read_to_string(path)?;
    match path.extension().and_then(|e| e.to_str()) {
        Some("toml") => parse_document_toml(&content),
        Some("json") => parse_document_json(&content),
        _ => Err(ModelError::UnsupportedFormat {
            path: path.to_path_buf(),
        }),
    }
}

/// Parse a document from a TOML string.
pub fn parse_document_toml(toml_str: &str) -> Result<Document> {
    let document: Document = toml::from_str(toml_str)?;
    Ok(normalize(document))
}

/// Parse a document from a JSON string.
pub fn parse_document_json(json_str: &str) -> Result<Document> {
    let document: Document = serde_json::from_str(json_str)?;
    Ok(normalize(document))
}

/// Serialize a document to pretty TOML.
pub fn document_to_toml(document: &Document) -> Result<String> {
    Ok(toml::to_string_pretty(document)?)
}

/// Serialize a document to pretty JSON.
pub fn document_to_json(document: &Document) -> Result<String> {
    Ok(serde_json::to_string_pretty(document)?)
}

/// Apply revision gating that the file formats cannot express.
fn normalize(document: Document) -> Document {
    match document {
        Document::Component(mut component) => {
            let revision = component.revision;
            component.component_generators = component
                .component_generators
                .into_iter()
                .map(|g| g.restrict_to(revision))
                .collect();
            Document::Component(component)
        }
        other => other,
    }
}

/// List every `.toml` / `.json` file directly inside `dir`, sorted by path.
pub fn discover_documents(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(ModelError::NotFound {
            path: dir.to_path_buf(),
        });
    }

    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let is_document = path.is_file()
            && matches!(
                path.extension().and_then(|e| e.to_str()),
                Some("toml") | Some("json")
            );
        if is_document {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Revision;
    use crate::memory::{MemoryBlock, RegisterData};
    use crate::types::{AccessType, InterfaceMode, Usage};

    const COMPONENT: &str = r#"
document = "component"
vlnv = "acme:ip:timer:1.0"
revision = "1685-2022"

[[views]]
name = "rtl"

[[ports]]
name = "clk"
[ports.wire]
direction = "in"

[[ports]]
name = "data"
[ports.wire]
direction = "out"
left = "7"
right = "0"

[[bus-interfaces]]
name = "apb"
mode = "target"
bus-type = "acme:bus:apb:1.0"

[[bus-interfaces.abstraction-types]]
abstraction-ref = "acme:bus:apb_rtl:1.0"
view-refs = ["rtl"]

[[bus-interfaces.abstraction-types.port-maps]]
logical-port = { name = "PCLK" }
physical-port = { name = "clk" }

[[memory-maps]]
name = "regs_map"

[[memory-maps.blocks]]
kind = "address-block"
name = "regs"
base-address = "0x1000"
range = "16"
width = "32"
usage = "register"
access = "read-write"

[[memory-maps.blocks.register-data]]
kind = "register"
name = "ctrl"
address-offset = "0"
size = "32"
volatile = false

[[memory-maps.blocks.register-data.fields]]
name = "enable"
bit-offset = "0"
bit-width = "1"

[[component-generators]]
name = "gen"
scope = "bogus"
api-type = "TGI_2022_BASE"
api-service = "REST"
"#;

    #[test]
    fn parse_component_toml() {
        let doc = parse_document_toml(COMPONENT).unwrap();
        let component = doc.as_component().unwrap();
        assert_eq!(component.revision, Revision::Std22);
        assert_eq!(component.vlnv.name, "timer");
        assert_eq!(component.ports.len(), 2);
        assert!(component.port("data").unwrap().as_wire().is_some());
        assert_eq!(component.bus_interfaces[0].mode, InterfaceMode::Slave);

        let MemoryBlock::AddressBlock(block) = &component.memory_maps[0].blocks[0] else {
            panic!("expected address block");
        };
        assert_eq!(block.usage, Some(Usage::Register));
        assert_eq!(block.access, Some(AccessType::ReadWrite));
        let RegisterData::Register(register) = &block.register_data[0] else {
            panic!("expected register");
        };
        assert_eq!(register.volatile, Some(false));
        assert_eq!(register.fields[0].bit_width, "1");

        let generator = &component.component_generators[0];
        assert_eq!(generator.scope, None);
        assert_eq!(generator.api_service, "REST");
    }

    #[test]
    fn std14_component_drops_api_service() {
        let text = COMPONENT.replace("1685-2022", "1685-2014");
        let doc = parse_document_toml(&text).unwrap();
        let generator = &doc.as_component().unwrap().component_generators[0];
        assert!(generator.api_service.is_empty());
        assert_eq!(generator.api_type, None);
    }

    #[test]
    fn toml_round_trip() {
        let doc = parse_document_toml(COMPONENT).unwrap();
        let text = document_to_toml(&doc).unwrap();
        assert_eq!(parse_document_toml(&text).unwrap(), doc);
    }

    #[test]
    fn parse_bus_definition_json() {
        let json = r#"{
            "document": "bus-definition",
            "vlnv": "acme:bus:apb:1.0",
            "system-group-names": ["clocks"]
        }"#;
        let doc = parse_document_json(json).unwrap();
        assert_eq!(doc.as_bus_definition().unwrap().system_group_names, vec!["clocks"]);
        assert_eq!(doc.revision(), Revision::Std14);
    }

    #[test]
    fn reject_unknown_document_tag() {
        let err = parse_document_toml("document = \"design\"\nvlnv = \"a:b:c:d\"\n");
        assert!(err.is_err());
    }

    #[test]
    fn reject_malformed_vlnv() {
        let err = parse_document_toml("document = \"bus-definition\"\nvlnv = \"a:b\"\n");
        assert!(err.is_err());
    }

    #[test]
    fn load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_document(&dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(err, ModelError::NotFound { .. }));
    }

    #[test]
    fn load_unsupported_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.xml");
        std::fs::write(&path, "<ipxact/>").unwrap();
        let err = load_document(&path).unwrap_err();
        assert!(matches!(err, ModelError::UnsupportedFormat { .. }));
    }

    #[test]
    fn discover_sorted_documents() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.toml"), "").unwrap();
        std::fs::write(dir.path().join("a.json"), "").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "").unwrap();
        std::fs::create_dir(dir.path().join("sub.toml")).unwrap();

        let found = discover_documents(dir.path()).unwrap();
        let names: Vec<_> = found
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["a.json", "b.toml"]);
    }
}
