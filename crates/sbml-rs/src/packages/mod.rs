// crates/sbml-rs/src/packages/mod.rs

//! SBML Level 3 packages compiled into this build. Each package is selected
//! by the Cargo feature of the same name.

#[cfg(feature = "fbc")]
pub mod fbc;

#[cfg(feature = "qual")]
pub mod qual;
