// crates/sbml-rs/src/packages/fbc/errors.rs

//! Diagnostic table of the fbc package. Codes live in the `2000000` range
//! reserved for fbc.

use crate::error::table::{ErrorReferences, ErrorTableEntry, entry};
use crate::error::{Category, Severity};

pub const FBC_UNKNOWN: u32 = 2010100;
pub const FBC_ALLOWED_ATTRIBUTES_ON_MODEL: u32 = 2020201;
pub const FBC_MODEL_STRICT_REQUIRED: u32 = 2020202;
pub const FBC_ALLOWED_ATTRIBUTES_ON_SPECIES: u32 = 2020301;
pub const FBC_ALLOWED_ATTRIBUTES_ON_REACTION: u32 = 2020701;
pub const FBC_LOWER_FLUX_BOUND_MUST_EXIST: u32 = 2020708;
pub const FBC_UPPER_FLUX_BOUND_MUST_EXIST: u32 = 2020709;
pub const FBC_ALLOWED_ATTRIBUTES_ON_OBJECTIVE: u32 = 2020801;
pub const FBC_ALLOWED_ATTRIBUTES_ON_LIST_OF_OBJECTIVES: u32 = 2020802;
pub const FBC_ACTIVE_OBJECTIVE_MUST_EXIST: u32 = 2020803;
pub const FBC_ALLOWED_ATTRIBUTES_ON_FLUX_OBJECTIVE: u32 = 2020901;
pub const FBC_FLUX_OBJECTIVE_REACTION_MUST_EXIST: u32 = 2020904;
pub const FBC_ALLOWED_ATTRIBUTES_ON_GENE_PRODUCT_ASSOCIATION: u32 = 2021001;
pub const FBC_GENE_PRODUCT_ASSOCIATION_CONTAINS_ONE: u32 = 2021003;
pub const FBC_ALLOWED_ATTRIBUTES_ON_GENE_PRODUCT_REF: u32 = 2021101;
pub const FBC_GENE_PRODUCT_REF_MUST_EXIST: u32 = 2021104;
pub const FBC_ALLOWED_ATTRIBUTES_ON_AND: u32 = 2021201;
pub const FBC_AND_TWO_CHILDREN: u32 = 2021203;
pub const FBC_ALLOWED_ATTRIBUTES_ON_OR: u32 = 2021301;
pub const FBC_OR_TWO_CHILDREN: u32 = 2021303;
pub const FBC_ALLOWED_ATTRIBUTES_ON_GENE_PRODUCT: u32 = 2021401;
pub const FBC_GENE_PRODUCT_ASSOCIATED_SPECIES_MUST_EXIST: u32 = 2021405;

pub(crate) static FBC_ERROR_TABLE: [ErrorTableEntry; 22] = [
    entry(
        FBC_UNKNOWN,
        "Unknown error from fbc",
        Category::Internal,
        Severity::Error,
        "Unknown error from the Flux Balance Constraints package.",
        ErrorReferences::NONE,
    ),
    entry(
        FBC_ALLOWED_ATTRIBUTES_ON_MODEL,
        "Invalid fbc attribute on the <model> element",
        Category::GeneralConsistency,
        Severity::Error,
        "A <model> object may have the attribute 'fbc:strict'. No other attributes from the fbc namespace are permitted on a <model> object.",
        ErrorReferences::all("fbc Section 3.3"),
    ),
    entry(
        FBC_MODEL_STRICT_REQUIRED,
        "The 'fbc:strict' attribute is required and must be a boolean",
        Category::GeneralConsistency,
        Severity::Error,
        "A <model> object in a document using fbc must have the attribute 'fbc:strict', whose value must be of type boolean.",
        ErrorReferences::all("fbc Section 3.3"),
    ),
    entry(
        FBC_ALLOWED_ATTRIBUTES_ON_SPECIES,
        "Invalid fbc attribute on the <species> element",
        Category::GeneralConsistency,
        Severity::Error,
        "A <species> object may have the optional attributes 'fbc:charge' (an integer) and 'fbc:chemicalFormula' (a string). No other attributes from the fbc namespace are permitted on a <species> object.",
        ErrorReferences::all("fbc Section 3.4"),
    ),
    entry(
        FBC_ALLOWED_ATTRIBUTES_ON_REACTION,
        "Invalid fbc attribute on the <reaction> element",
        Category::GeneralConsistency,
        Severity::Error,
        "A <reaction> object may have the optional attributes 'fbc:lowerFluxBound' and 'fbc:upperFluxBound', both of type SIdRef. No other attributes from the fbc namespace are permitted on a <reaction> object.",
        ErrorReferences::all("fbc Section 3.5"),
    ),
    entry(
        FBC_LOWER_FLUX_BOUND_MUST_EXIST,
        "The 'fbc:lowerFluxBound' must refer to a parameter",
        Category::GeneralConsistency,
        Severity::Error,
        "The value of the attribute 'fbc:lowerFluxBound' of a <reaction> must be the identifier of an existing <parameter> in the enclosing model.",
        ErrorReferences::all("fbc Section 3.5"),
    ),
    entry(
        FBC_UPPER_FLUX_BOUND_MUST_EXIST,
        "The 'fbc:upperFluxBound' must refer to a parameter",
        Category::GeneralConsistency,
        Severity::Error,
        "The value of the attribute 'fbc:upperFluxBound' of a <reaction> must be the identifier of an existing <parameter> in the enclosing model.",
        ErrorReferences::all("fbc Section 3.5"),
    ),
    entry(
        FBC_ALLOWED_ATTRIBUTES_ON_OBJECTIVE,
        "Invalid attribute on the <objective> element",
        Category::GeneralConsistency,
        Severity::Error,
        "An <objective> object must have the required attributes 'fbc:id' and 'fbc:type', and may have the optional attributes 'metaid', 'sboTerm' and 'fbc:name'. The value of 'fbc:type' must be 'maximize' or 'minimize'.",
        ErrorReferences::all("fbc Section 3.7"),
    ),
    entry(
        FBC_ALLOWED_ATTRIBUTES_ON_LIST_OF_OBJECTIVES,
        "Invalid attribute on the <listOfObjectives> element",
        Category::GeneralConsistency,
        Severity::Error,
        "A <listOfObjectives> object must have the required attribute 'fbc:activeObjective'. No other attributes from the fbc namespace are permitted on it.",
        ErrorReferences::all("fbc Section 3.6"),
    ),
    entry(
        FBC_ACTIVE_OBJECTIVE_MUST_EXIST,
        "The 'fbc:activeObjective' must refer to an objective",
        Category::GeneralConsistency,
        Severity::Error,
        "The value of the attribute 'fbc:activeObjective' must be the identifier of an existing <objective> in the <listOfObjectives>.",
        ErrorReferences::all("fbc Section 3.6"),
    ),
    entry(
        FBC_ALLOWED_ATTRIBUTES_ON_FLUX_OBJECTIVE,
        "Invalid attribute on the <fluxObjective> element",
        Category::GeneralConsistency,
        Severity::Error,
        "A <fluxObjective> object must have the required attributes 'fbc:reaction' and 'fbc:coefficient', and may have the optional attributes 'metaid', 'sboTerm', 'fbc:id' and 'fbc:name'.",
        ErrorReferences::all("fbc Section 3.8"),
    ),
    entry(
        FBC_FLUX_OBJECTIVE_REACTION_MUST_EXIST,
        "The 'fbc:reaction' must refer to a reaction",
        Category::GeneralConsistency,
        Severity::Error,
        "The value of the attribute 'fbc:reaction' of a <fluxObjective> must be the identifier of an existing <reaction> in the enclosing model.",
        ErrorReferences::all("fbc Section 3.8"),
    ),
    entry(
        FBC_ALLOWED_ATTRIBUTES_ON_GENE_PRODUCT_ASSOCIATION,
        "Invalid attribute on the <geneProductAssociation> element",
        Category::GeneralConsistency,
        Severity::Error,
        "A <geneProductAssociation> object may have the optional attributes 'metaid', 'sboTerm', 'fbc:id' and 'fbc:name'. No other attributes are permitted.",
        ErrorReferences::all("fbc Section 3.9"),
    ),
    entry(
        FBC_GENE_PRODUCT_ASSOCIATION_CONTAINS_ONE,
        "A <geneProductAssociation> must contain exactly one association",
        Category::GeneralConsistency,
        Severity::Error,
        "A <geneProductAssociation> object must contain exactly one <and>, <or> or <geneProductRef> element.",
        ErrorReferences::all("fbc Section 3.9"),
    ),
    entry(
        FBC_ALLOWED_ATTRIBUTES_ON_GENE_PRODUCT_REF,
        "Invalid attribute on the <geneProductRef> element",
        Category::GeneralConsistency,
        Severity::Error,
        "A <geneProductRef> object must have the required attribute 'fbc:geneProduct', and may have the optional attributes 'metaid', 'sboTerm', 'fbc:id' and 'fbc:name'.",
        ErrorReferences::all("fbc Section 3.10"),
    ),
    entry(
        FBC_GENE_PRODUCT_REF_MUST_EXIST,
        "The 'fbc:geneProduct' must refer to a gene product",
        Category::GeneralConsistency,
        Severity::Error,
        "The value of the attribute 'fbc:geneProduct' of a <geneProductRef> must be the identifier of an existing <geneProduct> in the enclosing model.",
        ErrorReferences::all("fbc Section 3.10"),
    ),
    entry(
        FBC_ALLOWED_ATTRIBUTES_ON_AND,
        "Invalid attribute on the <and> element",
        Category::GeneralConsistency,
        Severity::Error,
        "An <and> object may have the optional attributes 'metaid' and 'sboTerm'. No other attributes are permitted.",
        ErrorReferences::all("fbc Section 3.11"),
    ),
    entry(
        FBC_AND_TWO_CHILDREN,
        "An <and> must have at least two children",
        Category::GeneralConsistency,
        Severity::Error,
        "An <and> object must contain at least two <and>, <or> or <geneProductRef> elements.",
        ErrorReferences::all("fbc Section 3.11"),
    ),
    entry(
        FBC_ALLOWED_ATTRIBUTES_ON_OR,
        "Invalid attribute on the <or> element",
        Category::GeneralConsistency,
        Severity::Error,
        "An <or> object may have the optional attributes 'metaid' and 'sboTerm'. No other attributes are permitted.",
        ErrorReferences::all("fbc Section 3.12"),
    ),
    entry(
        FBC_OR_TWO_CHILDREN,
        "An <or> must have at least two children",
        Category::GeneralConsistency,
        Severity::Error,
        "An <or> object must contain at least two <and>, <or> or <geneProductRef> elements.",
        ErrorReferences::all("fbc Section 3.12"),
    ),
    entry(
        FBC_ALLOWED_ATTRIBUTES_ON_GENE_PRODUCT,
        "Invalid attribute on the <geneProduct> element",
        Category::GeneralConsistency,
        Severity::Error,
        "A <geneProduct> object must have the required attributes 'fbc:id' and 'fbc:label', and may have the optional attributes 'metaid', 'sboTerm', 'fbc:name' and 'fbc:associatedSpecies'.",
        ErrorReferences::all("fbc Section 3.13"),
    ),
    entry(
        FBC_GENE_PRODUCT_ASSOCIATED_SPECIES_MUST_EXIST,
        "The 'fbc:associatedSpecies' must refer to a species",
        Category::GeneralConsistency,
        Severity::Error,
        "The value of the attribute 'fbc:associatedSpecies' of a <geneProduct> must be the identifier of an existing <species> in the enclosing model.",
        ErrorReferences::all("fbc Section 3.13"),
    ),
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SbmlError;

    #[test]
    fn test_codes_are_unique() {
        let mut codes: Vec<u32> = FBC_ERROR_TABLE.iter().map(|e| e.code).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), FBC_ERROR_TABLE.len());
    }

    #[test]
    fn test_errors_are_tagged_with_package() {
        let err = SbmlError::new(FBC_GENE_PRODUCT_REF_MUST_EXIST, "g9");
        assert_eq!(err.package(), "fbc");
        assert_eq!(err.severity(), Severity::Error);
        assert_eq!(err.reference(), "fbc Section 3.10");
    }
}
