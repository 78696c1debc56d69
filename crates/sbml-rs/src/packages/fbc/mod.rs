// crates/sbml-rs/src/packages/fbc/mod.rs

//! Flux Balance Constraints, versions 2 and 3.
//!
//! Supported: gene products, gene product associations built from `and`,
//! `or` and `geneProductRef` nodes, flux bounds on reactions, objectives
//! and the species charge/formula attributes.

mod association;
pub mod errors;
mod extension;
mod gene_product;
mod infix;
mod objective;
mod plugins;

pub use association::{FbcAnd, FbcOr, GeneProductAssociation, GeneProductRef};
pub use extension::{FBC_XMLNS_V2, FBC_XMLNS_V3, FbcExtension};
pub use gene_product::GeneProduct;
pub use infix::{InfixError, parse_infix, to_infix};
pub use objective::{FluxObjective, ListOfObjectives, Objective, ObjectiveType};
pub use plugins::{FbcModelPlugin, FbcReactionPlugin, FbcSpeciesPlugin};

/// Name under which the package is registered.
pub const FBC_PACKAGE: &str = "fbc";
