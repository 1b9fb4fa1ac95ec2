//! In-memory IP-XACT document model.
//!
//! Documents own their sub-elements by value; cross-document references are
//! VLNVs resolved through a [`library::Library`]. Nothing in the model holds a
//! pointer back to its container, so callers pass containers explicitly.
//!
//! - **component:** views, ports, bus interfaces, indirect interfaces
//! - **memory:** memory maps, address blocks, registers, fields
//! - **abstraction / bus:** logical ports and system groups of a bus protocol

pub mod abstraction;
pub mod bus;
pub mod component;
pub mod document;
pub mod error;
pub mod generator;
pub mod library;
pub mod memory;
pub mod parameter;
pub mod parse;
pub mod types;

pub use document::{Document, DocumentType, Revision, Vlnv};
pub use error::{ModelError, Result};
pub use library::{InMemoryLibrary, Library};
