//! Loading a library directory and resolving references across documents.

use ipxact_core::library::system_groups;
use ipxact_core::{DocumentType, InMemoryLibrary, Library, Vlnv};

const BUS: &str = r#"
document = "bus-definition"
vlnv = "acme:bus:apb:1.0"
system-group-names = ["clocks"]
"#;

const ABSTRACTION: &str = r#"
document = "abstraction-definition"
vlnv = "acme:bus:apb_rtl:1.0"
bus-type = "acme:bus:apb:1.0"

[[logical-ports]]
logical-name = "PCLK"
[logical-ports.wire.on-master]
width = "1"
direction = "in"
presence = "required"
"#;

const COMPONENT_JSON: &str = r#"{
    "document": "component",
    "vlnv": "acme:ip:timer:1.0",
    "ports": [{ "name": "clk", "wire": { "direction": "in" } }]
}"#;

#[test]
fn load_directory_resolves_every_document() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("apb.toml"), BUS).unwrap();
    std::fs::write(dir.path().join("apb_rtl.toml"), ABSTRACTION).unwrap();
    std::fs::write(dir.path().join("timer.json"), COMPONENT_JSON).unwrap();

    let mut library = InMemoryLibrary::new();
    let loaded = library.load_directory(dir.path()).unwrap();
    assert_eq!(loaded, 3);
    assert_eq!(library.len(), 3);

    let abs_vlnv: Vlnv = "acme:bus:apb_rtl:1.0".parse().unwrap();
    assert_eq!(
        library.document_type(&abs_vlnv),
        DocumentType::AbstractionDefinition
    );

    let abstraction = library.model(&abs_vlnv).unwrap();
    let abstraction = abstraction.as_abstraction_definition().unwrap();
    let bus = library.model(&abstraction.bus_type).unwrap();
    let groups = system_groups(bus.as_bus_definition().unwrap(), &library);
    assert_eq!(groups, vec!["clocks"]);

    let component = library
        .model(&"acme:ip:timer:1.0".parse().unwrap())
        .unwrap();
    assert!(component.as_component().unwrap().port("clk").is_some());
}

#[test]
fn load_directory_reports_malformed_document() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("broken.toml"), "document = \"component\"\nvlnv = 3\n").unwrap();

    let mut library = InMemoryLibrary::new();
    assert!(library.load_directory(dir.path()).is_err());
}

#[test]
fn load_directory_rejects_duplicate_vlnv() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("one.toml"), BUS).unwrap();
    std::fs::write(dir.path().join("two.toml"), BUS).unwrap();

    let mut library = InMemoryLibrary::new();
    assert!(library.load_directory(dir.path()).is_err());
}
