// crates/sbml-rs/src/packages/qual/errors.rs

//! Diagnostic table of the qual package. Codes live in the `3000000` range
//! reserved for qual.

use crate::error::table::{ErrorReferences, ErrorTableEntry, entry};
use crate::error::{Category, Severity};

pub const QUAL_UNKNOWN: u32 = 3010100;
pub const QUAL_ALLOWED_ATTRIBUTES_ON_QUAL_SPECIES: u32 = 3020201;
pub const QUAL_COMPARTMENT_MUST_EXIST: u32 = 3020204;
pub const QUAL_INITIAL_LEVEL_EXCEEDS_MAX: u32 = 3020206;
pub const QUAL_ALLOWED_ATTRIBUTES_ON_TRANSITION: u32 = 3020301;
pub const QUAL_TRANSITION_FUNCTION_TERMS_REQUIRED: u32 = 3020304;
pub const QUAL_ALLOWED_ATTRIBUTES_ON_INPUT: u32 = 3020401;
pub const QUAL_INPUT_SPECIES_MUST_EXIST: u32 = 3020404;
pub const QUAL_ALLOWED_ATTRIBUTES_ON_OUTPUT: u32 = 3020501;
pub const QUAL_OUTPUT_SPECIES_MUST_EXIST: u32 = 3020504;
pub const QUAL_OUTPUT_SPECIES_NOT_CONSTANT: u32 = 3020505;
pub const QUAL_ALLOWED_ATTRIBUTES_ON_DEFAULT_TERM: u32 = 3020601;
pub const QUAL_ALLOWED_ATTRIBUTES_ON_FUNCTION_TERM: u32 = 3020701;
pub const QUAL_FUNCTION_TERM_MATH_REQUIRED: u32 = 3020702;
pub const QUAL_RESULT_LEVEL_EXCEEDS_MAX: u32 = 3020703;
pub const QUAL_LIST_OF_FUNCTION_TERMS_DEFAULT_REQUIRED: u32 = 3020801;

pub(crate) static QUAL_ERROR_TABLE: [ErrorTableEntry; 16] = [
    entry(
        QUAL_UNKNOWN,
        "Unknown error from qual",
        Category::Internal,
        Severity::Error,
        "Unknown error from the Qualitative Models package.",
        ErrorReferences::NONE,
    ),
    entry(
        QUAL_ALLOWED_ATTRIBUTES_ON_QUAL_SPECIES,
        "Invalid attribute on the <qualitativeSpecies> element",
        Category::GeneralConsistency,
        Severity::Error,
        "A <qualitativeSpecies> object must have the required attributes 'qual:id', 'qual:compartment' and 'qual:constant', and may have the optional attributes 'metaid', 'sboTerm', 'qual:name', 'qual:initialLevel' and 'qual:maxLevel'.",
        ErrorReferences::all("qual Section 3.5"),
    ),
    entry(
        QUAL_COMPARTMENT_MUST_EXIST,
        "The 'qual:compartment' must refer to a compartment",
        Category::GeneralConsistency,
        Severity::Error,
        "The value of the attribute 'qual:compartment' of a <qualitativeSpecies> must be the identifier of an existing <compartment> in the enclosing model.",
        ErrorReferences::all("qual Section 3.5"),
    ),
    entry(
        QUAL_INITIAL_LEVEL_EXCEEDS_MAX,
        "The 'qual:initialLevel' cannot exceed 'qual:maxLevel'",
        Category::GeneralConsistency,
        Severity::Error,
        "The value of the attribute 'qual:initialLevel' of a <qualitativeSpecies> must not be greater than the value of its 'qual:maxLevel'.",
        ErrorReferences::all("qual Section 3.5"),
    ),
    entry(
        QUAL_ALLOWED_ATTRIBUTES_ON_TRANSITION,
        "Invalid attribute on the <transition> element",
        Category::GeneralConsistency,
        Severity::Error,
        "A <transition> object may have the optional attributes 'metaid', 'sboTerm', 'qual:id' and 'qual:name'. No other attributes from the qual namespace are permitted on a <transition> object.",
        ErrorReferences::all("qual Section 3.6"),
    ),
    entry(
        QUAL_TRANSITION_FUNCTION_TERMS_REQUIRED,
        "A <transition> must contain a <listOfFunctionTerms>",
        Category::GeneralConsistency,
        Severity::Error,
        "A <transition> object must contain exactly one <listOfFunctionTerms>.",
        ErrorReferences::all("qual Section 3.6"),
    ),
    entry(
        QUAL_ALLOWED_ATTRIBUTES_ON_INPUT,
        "Invalid attribute on the <input> element",
        Category::GeneralConsistency,
        Severity::Error,
        "An <input> object must have the required attributes 'qual:qualitativeSpecies' and 'qual:transitionEffect', and may have the optional attributes 'metaid', 'sboTerm', 'qual:id', 'qual:name', 'qual:sign' and 'qual:thresholdLevel'.",
        ErrorReferences::all("qual Section 3.7"),
    ),
    entry(
        QUAL_INPUT_SPECIES_MUST_EXIST,
        "The 'qual:qualitativeSpecies' of an <input> must exist",
        Category::GeneralConsistency,
        Severity::Error,
        "The value of the attribute 'qual:qualitativeSpecies' of an <input> must be the identifier of an existing <qualitativeSpecies> in the enclosing model.",
        ErrorReferences::all("qual Section 3.7"),
    ),
    entry(
        QUAL_ALLOWED_ATTRIBUTES_ON_OUTPUT,
        "Invalid attribute on the <output> element",
        Category::GeneralConsistency,
        Severity::Error,
        "An <output> object must have the required attributes 'qual:qualitativeSpecies' and 'qual:transitionEffect', and may have the optional attributes 'metaid', 'sboTerm', 'qual:id', 'qual:name' and 'qual:outputLevel'.",
        ErrorReferences::all("qual Section 3.8"),
    ),
    entry(
        QUAL_OUTPUT_SPECIES_MUST_EXIST,
        "The 'qual:qualitativeSpecies' of an <output> must exist",
        Category::GeneralConsistency,
        Severity::Error,
        "The value of the attribute 'qual:qualitativeSpecies' of an <output> must be the identifier of an existing <qualitativeSpecies> in the enclosing model.",
        ErrorReferences::all("qual Section 3.8"),
    ),
    entry(
        QUAL_OUTPUT_SPECIES_NOT_CONSTANT,
        "An <output> cannot refer to a constant qualitative species",
        Category::GeneralConsistency,
        Severity::Error,
        "The <qualitativeSpecies> referenced by an <output> must have the value 'false' for its attribute 'qual:constant'.",
        ErrorReferences::all("qual Section 3.8"),
    ),
    entry(
        QUAL_ALLOWED_ATTRIBUTES_ON_DEFAULT_TERM,
        "Invalid attribute on the <defaultTerm> element",
        Category::GeneralConsistency,
        Severity::Error,
        "A <defaultTerm> object must have the required attribute 'qual:resultLevel', a non-negative integer, and may have the optional attributes 'metaid' and 'sboTerm'.",
        ErrorReferences::all("qual Section 3.9"),
    ),
    entry(
        QUAL_ALLOWED_ATTRIBUTES_ON_FUNCTION_TERM,
        "Invalid attribute on the <functionTerm> element",
        Category::GeneralConsistency,
        Severity::Error,
        "A <functionTerm> object must have the required attribute 'qual:resultLevel', a non-negative integer, and may have the optional attributes 'metaid' and 'sboTerm'.",
        ErrorReferences::all("qual Section 3.10"),
    ),
    entry(
        QUAL_FUNCTION_TERM_MATH_REQUIRED,
        "A <functionTerm> must contain one <math> element",
        Category::GeneralConsistency,
        Severity::Error,
        "A <functionTerm> object must contain exactly one MathML <math> element.",
        ErrorReferences::all("qual Section 3.10"),
    ),
    entry(
        QUAL_RESULT_LEVEL_EXCEEDS_MAX,
        "A result level cannot exceed the output's 'qual:maxLevel'",
        Category::GeneralConsistency,
        Severity::Error,
        "The 'qual:resultLevel' of a <functionTerm> or <defaultTerm> must not be greater than the 'qual:maxLevel' of any <qualitativeSpecies> referenced by an <output> of the same <transition>.",
        ErrorReferences::all("qual Section 3.10"),
    ),
    entry(
        QUAL_LIST_OF_FUNCTION_TERMS_DEFAULT_REQUIRED,
        "A <listOfFunctionTerms> must contain a <defaultTerm>",
        Category::GeneralConsistency,
        Severity::Error,
        "A <listOfFunctionTerms> object must contain exactly one <defaultTerm>.",
        ErrorReferences::all("qual Section 3.6"),
    ),
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SbmlError;

    #[test]
    fn test_codes_are_unique() {
        let mut codes: Vec<u32> = QUAL_ERROR_TABLE.iter().map(|e| e.code).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), QUAL_ERROR_TABLE.len());
    }

    #[test]
    fn test_errors_are_tagged_with_package() {
        let err = SbmlError::new(QUAL_OUTPUT_SPECIES_NOT_CONSTANT, "q1");
        assert_eq!(err.package(), "qual");
        assert_eq!(err.category(), Category::GeneralConsistency);
    }
}
