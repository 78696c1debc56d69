// crates/sbml-rs/src/lib.rs

#![doc = "Reads, edits, checks and writes SBML documents."]
#![doc = ""]
#![doc = "The object model is a tree of owned elements: a document owns its model,"]
#![doc = "a model owns its `listOf` containers and every container owns its items."]
#![doc = "Reading never stops on a semantic problem; diagnostics accumulate in the"]
#![doc = "document's error log. SBML Level 3 packages attach to core elements"]
#![doc = "through plugins and are selected with Cargo features:"]
#![doc = "- `fbc`: Flux Balance Constraints, versions 2 and 3."]
#![doc = "- `qual`: Qualitative Models, version 1."]

// --- Foundation Modules ---
mod log;
pub mod error;
pub mod types;
pub mod xml;
pub mod namespaces;

// --- Object Model ---
pub mod sbase;
pub mod list_of;
pub mod model;
pub mod document;
pub mod packages;

// --- Document I/O and Checks ---
pub mod reader;
pub mod writer;
pub mod validator;

// --- Top-level Exports ---
pub use document::{DocumentContext, SbmlDocument};
pub use error::{Category, ErrorLog, SbmlConstructorError, SbmlError, Severity};
pub use list_of::{ItemTypeLock, ListOf};
pub use model::{Compartment, Model, Parameter, Reaction, Species, SpeciesReference};
pub use namespaces::{SbmlExtension, SbmlNamespaces, registry};
pub use reader::{SbmlReader, read_sbml, read_sbml_from_string};
pub use sbase::{ParentLink, SBase, SBasePlugin};
pub use types::{OPERATION_SUCCESS, OperationError, OperationResult, TypeCode};
pub use writer::{SbmlWriter, write_sbml, write_sbml_to_string};
