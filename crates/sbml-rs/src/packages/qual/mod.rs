// crates/sbml-rs/src/packages/qual/mod.rs

//! Qualitative Models, version 1.
//!
//! Logical (Boolean or multi-valued) networks: qualitative species whose
//! levels change through transitions. Function term mathematics is kept as
//! opaque MathML.

pub mod errors;
mod extension;
mod function_term;
mod plugins;
mod qualitative_species;
mod transition;

pub use extension::{QUAL_XMLNS_V1, QualExtension};
pub use function_term::{DefaultTerm, FunctionTerm, ListOfFunctionTerms};
pub use plugins::QualModelPlugin;
pub use qualitative_species::QualitativeSpecies;
pub use transition::{Input, InputTransitionEffect, Output, OutputTransitionEffect, Sign, Transition};

/// Name under which the package is registered.
pub const QUAL_PACKAGE: &str = "qual";
