// crates/sbml-rs/src/error/table.rs

//! Static diagnostic tables for XML and SBML core.
//!
//! Each row is immutable data describing one known diagnostic. Codes follow the
//! libSBML numbering: `0..=9999` are XML layer problems, `10000..=99999` are SBML
//! core. Package tables live with their packages and are reached through the
//! extension registry.

use super::{Category, Severity};
use crate::namespaces::registry;

/// The SBML reference section cited by a diagnostic, per SBML Level/Version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorReferences {
    pub l2v4: &'static str,
    pub l3v1: &'static str,
    pub l3v2: &'static str,
}

impl ErrorReferences {
    pub const NONE: ErrorReferences = ErrorReferences {
        l2v4: "",
        l3v1: "",
        l3v2: "",
    };

    /// Same section in every Level/Version.
    pub const fn all(section: &'static str) -> Self {
        ErrorReferences {
            l2v4: section,
            l3v1: section,
            l3v2: section,
        }
    }

    pub fn for_level_version(&self, level: u32, version: u32) -> &'static str {
        match (level, version) {
            (2, _) => self.l2v4,
            (3, 1) => self.l3v1,
            _ => self.l3v2,
        }
    }
}

/// One row of a diagnostic table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorTableEntry {
    pub code: u32,
    pub short_message: &'static str,
    pub category: Category,
    pub severity: Severity,
    pub message: &'static str,
    pub references: ErrorReferences,
}

pub(crate) const fn entry(
    code: u32,
    short_message: &'static str,
    category: Category,
    severity: Severity,
    message: &'static str,
    references: ErrorReferences,
) -> ErrorTableEntry {
    ErrorTableEntry {
        code,
        short_message,
        category,
        severity,
        message,
        references,
    }
}

// --- XML layer ---
pub const XML_UNKNOWN_ERROR: u32 = 0;
pub const XML_FILE_UNREADABLE: u32 = 2;
pub const XML_FILE_UNWRITABLE: u32 = 3;
pub const XML_FILE_OPERATION_ERROR: u32 = 4;
pub const UNRECOGNIZED_XML_PARSER_CODE: u32 = 102;
pub const BAD_XML_DECL: u32 = 1003;
pub const BADLY_FORMED_XML: u32 = 1006;
pub const XML_TAG_MISMATCH: u32 = 1009;
pub const DUPLICATE_XML_ATTRIBUTE: u32 = 1010;
pub const UNDEFINED_XML_ENTITY: u32 = 1011;
pub const BAD_XML_PREFIX: u32 = 1013;
pub const BAD_XML_ATTRIBUTE: u32 = 1020;
pub const XML_UNEXPECTED_EOF: u32 = 1024;
pub const XML_CONTENT_EMPTY: u32 = 1035;

// --- SBML core ---
pub const UNKNOWN_ERROR: u32 = 10000;
pub const NOT_UTF8: u32 = 10101;
pub const UNRECOGNIZED_ELEMENT: u32 = 10102;
pub const NOT_SCHEMA_CONFORMANT: u32 = 10103;
pub const DUPLICATE_COMPONENT_ID: u32 = 10301;
pub const DUPLICATE_METAID: u32 = 10307;
pub const INVALID_SBO_TERM_SYNTAX: u32 = 10308;
pub const INVALID_METAID_SYNTAX: u32 = 10309;
pub const INVALID_ID_SYNTAX: u32 = 10310;
pub const INVALID_NAMESPACE_ON_SBML: u32 = 20101;
pub const MISSING_OR_INCONSISTENT_LEVEL: u32 = 20102;
pub const MISSING_OR_INCONSISTENT_VERSION: u32 = 20103;
pub const ALLOWED_ATTRIBUTES_ON_SBML: u32 = 20108;
pub const MISSING_MODEL: u32 = 20201;
pub const EMPTY_LIST_ELEMENT: u32 = 20203;
pub const ALLOWED_ATTRIBUTES_ON_MODEL: u32 = 20222;
pub const ALLOWED_ATTRIBUTES_ON_LIST_OF_COMPARTMENTS: u32 = 20225;
pub const ALLOWED_ATTRIBUTES_ON_LIST_OF_SPECIES: u32 = 20226;
pub const ALLOWED_ATTRIBUTES_ON_LIST_OF_PARAMETERS: u32 = 20227;
pub const ALLOWED_ATTRIBUTES_ON_LIST_OF_REACTIONS: u32 = 20231;
pub const ALLOWED_ATTRIBUTES_ON_COMPARTMENT: u32 = 20517;
pub const INVALID_SPECIES_COMPARTMENT_REF: u32 = 20601;
pub const ALLOWED_ATTRIBUTES_ON_SPECIES: u32 = 20623;
pub const ALLOWED_ATTRIBUTES_ON_PARAMETER: u32 = 20706;
pub const ALLOWED_ATTRIBUTES_ON_REACTION: u32 = 21110;
pub const INVALID_SPECIES_REFERENCE: u32 = 21111;
pub const ALLOWED_ATTRIBUTES_ON_SPECIES_REFERENCE: u32 = 21116;
pub const ALLOWED_ATTRIBUTES_ON_LIST_OF_SPECIES_REFERENCES: u32 = 21150;
pub const REQUIRED_PACKAGE_PRESENT: u32 = 99107;
pub const UNREQUIRED_PACKAGE_PRESENT: u32 = 99108;
pub const UNKNOWN_CORE_ATTRIBUTE: u32 = 99994;
pub const UNKNOWN_PACKAGE_ATTRIBUTE: u32 = 99995;

/// Row used for codes missing from every table.
pub(crate) const UNKNOWN_ENTRY: ErrorTableEntry = entry(
    UNKNOWN_ERROR,
    "Unknown error",
    Category::Internal,
    Severity::Fatal,
    "Encountered unknown internal SBML error.",
    ErrorReferences::NONE,
);

/// Diagnostics of the XML layer and SBML core.
pub static CORE_ERROR_TABLE: &[ErrorTableEntry] = &[
    entry(
        XML_UNKNOWN_ERROR,
        "Unknown XML error",
        Category::Internal,
        Severity::Fatal,
        "Unknown internal XML error.",
        ErrorReferences::NONE,
    ),
    entry(
        XML_FILE_UNREADABLE,
        "File unreadable",
        Category::System,
        Severity::Fatal,
        "File unreadable.",
        ErrorReferences::NONE,
    ),
    entry(
        XML_FILE_UNWRITABLE,
        "File unwritable",
        Category::System,
        Severity::Fatal,
        "File unwritable.",
        ErrorReferences::NONE,
    ),
    entry(
        XML_FILE_OPERATION_ERROR,
        "File operation error",
        Category::System,
        Severity::Fatal,
        "Error encountered while attempting file operation.",
        ErrorReferences::NONE,
    ),
    entry(
        UNRECOGNIZED_XML_PARSER_CODE,
        "Unrecognized XML parser code",
        Category::Internal,
        Severity::Fatal,
        "The XML parser reported an error that could not be classified.",
        ErrorReferences::NONE,
    ),
    entry(
        BAD_XML_DECL,
        "Bad XML declaration",
        Category::Xml,
        Severity::Error,
        "Invalid or unrecognized XML declaration or XML encoding.",
        ErrorReferences::NONE,
    ),
    entry(
        BADLY_FORMED_XML,
        "Badly formed XML",
        Category::Xml,
        Severity::Error,
        "Badly formed XML.",
        ErrorReferences::NONE,
    ),
    entry(
        XML_TAG_MISMATCH,
        "XML tag mismatch",
        Category::Xml,
        Severity::Error,
        "XML tag mismatch; an end tag does not match the start tag it closes.",
        ErrorReferences::NONE,
    ),
    entry(
        DUPLICATE_XML_ATTRIBUTE,
        "Duplicate XML attribute",
        Category::Xml,
        Severity::Error,
        "Duplicate attribute on an XML element.",
        ErrorReferences::NONE,
    ),
    entry(
        UNDEFINED_XML_ENTITY,
        "Undefined XML entity",
        Category::Xml,
        Severity::Error,
        "Undefined XML entity or invalid character reference.",
        ErrorReferences::NONE,
    ),
    entry(
        BAD_XML_PREFIX,
        "Bad XML prefix",
        Category::Xml,
        Severity::Error,
        "Invalid or undeclared XML namespace prefix.",
        ErrorReferences::NONE,
    ),
    entry(
        BAD_XML_ATTRIBUTE,
        "Bad XML attribute",
        Category::Xml,
        Severity::Error,
        "Invalid XML attribute syntax.",
        ErrorReferences::NONE,
    ),
    entry(
        XML_UNEXPECTED_EOF,
        "Unexpected end of file",
        Category::Xml,
        Severity::Error,
        "Encountered unexpected end of file before all elements were closed.",
        ErrorReferences::NONE,
    ),
    entry(
        XML_CONTENT_EMPTY,
        "XML content empty",
        Category::Xml,
        Severity::Error,
        "The XML content is empty; no root element was found.",
        ErrorReferences::NONE,
    ),
    UNKNOWN_ENTRY,
    entry(
        NOT_UTF8,
        "Not UTF8",
        Category::Sbml,
        Severity::Error,
        "An SBML XML file must use UTF-8 as the character encoding.",
        ErrorReferences {
            l2v4: "SBML L2V4 Section 4.1",
            l3v1: "SBML L3V1 Section 4.1",
            l3v2: "SBML L3V2 Section 4.1",
        },
    ),
    entry(
        UNRECOGNIZED_ELEMENT,
        "Unrecognized element",
        Category::Sbml,
        Severity::Error,
        "An SBML XML document must not contain undefined elements or attributes in the SBML namespace.",
        ErrorReferences {
            l2v4: "SBML L2V4 Section 4.1",
            l3v1: "SBML L3V1 Section 4.1",
            l3v2: "SBML L3V2 Section 4.1",
        },
    ),
    entry(
        NOT_SCHEMA_CONFORMANT,
        "Not conformant to SBML XML schema",
        Category::Sbml,
        Severity::Error,
        "An SBML XML document must conform to the XML Schema for the corresponding SBML Level, Version and Release.",
        ErrorReferences {
            l2v4: "SBML L2V4 Section 4.1",
            l3v1: "SBML L3V1 Section 1.4.1",
            l3v2: "SBML L3V2 Section 1.4.1",
        },
    ),
    entry(
        DUPLICATE_COMPONENT_ID,
        "Duplicate 'id' attribute value",
        Category::IdentifierConsistency,
        Severity::Error,
        "The value of the 'id' attribute on every instance of the following classes of objects must be unique across the set of all 'id' attribute values of all such objects in a model.",
        ErrorReferences {
            l2v4: "SBML L2V4 Section 3.3",
            l3v1: "SBML L3V1 Section 3.3",
            l3v2: "SBML L3V2 Section 3.3",
        },
    ),
    entry(
        DUPLICATE_METAID,
        "Duplicate 'metaid' attribute value",
        Category::IdentifierConsistency,
        Severity::Error,
        "Every 'metaid' attribute value must be unique across the set of all 'metaid' values in a model.",
        ErrorReferences {
            l2v4: "SBML L2V4 Section 3.2",
            l3v1: "SBML L3V1 Section 3.1.6",
            l3v2: "SBML L3V2 Section 3.2",
        },
    ),
    entry(
        INVALID_SBO_TERM_SYNTAX,
        "Invalid 'sboTerm' attribute value syntax",
        Category::Sbml,
        Severity::Error,
        "The value of an 'sboTerm' attribute must have the data type SBOTerm, which is a string consisting of the characters 'S', 'B', 'O', ':' followed by exactly seven digits.",
        ErrorReferences {
            l2v4: "SBML L2V4 Section 3.1.9",
            l3v1: "SBML L3V1 Section 3.1.11",
            l3v2: "SBML L3V2 Section 3.1.11",
        },
    ),
    entry(
        INVALID_METAID_SYNTAX,
        "Invalid 'metaid' attribute value syntax",
        Category::Sbml,
        Severity::Error,
        "The value of a 'metaid' attribute must conform to the syntax of the XML Type ID.",
        ErrorReferences {
            l2v4: "SBML L2V4 Section 3.1.6",
            l3v1: "SBML L3V1 Section 3.1.6",
            l3v2: "SBML L3V2 Section 3.1.6",
        },
    ),
    entry(
        INVALID_ID_SYNTAX,
        "Invalid syntax for an 'id' attribute value",
        Category::Sbml,
        Severity::Error,
        "The value of an 'id' attribute must conform to the syntax of the SBML data type SId.",
        ErrorReferences {
            l2v4: "SBML L2V4 Section 3.1.7",
            l3v1: "SBML L3V1 Section 3.1.7",
            l3v2: "SBML L3V2 Section 3.1.7",
        },
    ),
    entry(
        INVALID_NAMESPACE_ON_SBML,
        "Invalid XML namespace for the SBML container element",
        Category::GeneralConsistency,
        Severity::Error,
        "The <sbml> container element must declare the XML Namespace for SBML, and this declaration must be consistent with the values of the 'level' and 'version' attributes.",
        ErrorReferences::all("Section 4.1"),
    ),
    entry(
        MISSING_OR_INCONSISTENT_LEVEL,
        "Missing or inconsistent value for the 'level' attribute",
        Category::GeneralConsistency,
        Severity::Error,
        "The <sbml> container element must declare the SBML Level using the attribute 'level', and this declaration must be consistent with the XML Namespace declared for the <sbml> element.",
        ErrorReferences::all("Section 4.1"),
    ),
    entry(
        MISSING_OR_INCONSISTENT_VERSION,
        "Missing or inconsistent value for the 'version' attribute",
        Category::GeneralConsistency,
        Severity::Error,
        "The <sbml> container element must declare the SBML Version using the attribute 'version', and this declaration must be consistent with the XML Namespace declared for the <sbml> element.",
        ErrorReferences::all("Section 4.1"),
    ),
    entry(
        ALLOWED_ATTRIBUTES_ON_SBML,
        "Invalid attribute on the <sbml> element",
        Category::GeneralConsistency,
        Severity::Error,
        "An <sbml> object must have the required attributes 'level' and 'version', and may have the optional attributes 'metaid' and 'sboTerm'. No other attributes from the SBML Level 3 Core namespace are permitted on an <sbml> object.",
        ErrorReferences::all("Section 4.1.1"),
    ),
    entry(
        MISSING_MODEL,
        "Missing model",
        Category::GeneralConsistency,
        Severity::Error,
        "An SBML document must contain a <model> definition.",
        ErrorReferences {
            l2v4: "SBML L2V4 Section 4.1",
            l3v1: "",
            l3v2: "",
        },
    ),
    entry(
        EMPTY_LIST_ELEMENT,
        "Empty ListOf element",
        Category::GeneralConsistency,
        Severity::Error,
        "The various ListOf subcomponents in a model are optional, but if present, these container elements must not be empty.",
        ErrorReferences {
            l2v4: "SBML L2V4 Section 4.2",
            l3v1: "SBML L3V1 Section 4.2",
            l3v2: "",
        },
    ),
    entry(
        ALLOWED_ATTRIBUTES_ON_MODEL,
        "Invalid attribute on the <model> element",
        Category::GeneralConsistency,
        Severity::Error,
        "A <model> object may have the optional attributes 'metaid', 'sboTerm', 'id' and 'name'. No other attributes from the SBML Level 3 Core namespace are permitted on a <model> object.",
        ErrorReferences::all("Section 4.2"),
    ),
    entry(
        ALLOWED_ATTRIBUTES_ON_LIST_OF_COMPARTMENTS,
        "Invalid attribute on the <listOfCompartments> element",
        Category::GeneralConsistency,
        Severity::Error,
        "A <listOfCompartments> object may have the optional attributes 'metaid' and 'sboTerm'. No other attributes from the SBML Level 3 Core namespace are permitted on a <listOfCompartments> object.",
        ErrorReferences::all("Section 4.2.8"),
    ),
    entry(
        ALLOWED_ATTRIBUTES_ON_LIST_OF_SPECIES,
        "Invalid attribute on the <listOfSpecies> element",
        Category::GeneralConsistency,
        Severity::Error,
        "A <listOfSpecies> object may have the optional attributes 'metaid' and 'sboTerm'. No other attributes from the SBML Level 3 Core namespace are permitted on a <listOfSpecies> object.",
        ErrorReferences::all("Section 4.2.8"),
    ),
    entry(
        ALLOWED_ATTRIBUTES_ON_LIST_OF_PARAMETERS,
        "Invalid attribute on the <listOfParameters> element",
        Category::GeneralConsistency,
        Severity::Error,
        "A <listOfParameters> object may have the optional attributes 'metaid' and 'sboTerm'. No other attributes from the SBML Level 3 Core namespace are permitted on a <listOfParameters> object.",
        ErrorReferences::all("Section 4.2.8"),
    ),
    entry(
        ALLOWED_ATTRIBUTES_ON_LIST_OF_REACTIONS,
        "Invalid attribute on the <listOfReactions> element",
        Category::GeneralConsistency,
        Severity::Error,
        "A <listOfReactions> object may have the optional attributes 'metaid' and 'sboTerm'. No other attributes from the SBML Level 3 Core namespace are permitted on a <listOfReactions> object.",
        ErrorReferences::all("Section 4.2.8"),
    ),
    entry(
        ALLOWED_ATTRIBUTES_ON_COMPARTMENT,
        "Invalid attribute on the <compartment> element",
        Category::GeneralConsistency,
        Severity::Error,
        "A <compartment> object must have the required attributes 'id' and 'constant', and may have the optional attributes 'metaid', 'sboTerm', 'name', 'size', 'spatialDimensions' and 'units'.",
        ErrorReferences::all("Section 4.5"),
    ),
    entry(
        INVALID_SPECIES_COMPARTMENT_REF,
        "Invalid value for the 'compartment' attribute",
        Category::GeneralConsistency,
        Severity::Error,
        "The value of the attribute 'compartment' in a <species> object must be the identifier of an existing <compartment> object defined in the enclosing <model> object.",
        ErrorReferences::all("Section 4.6.3"),
    ),
    entry(
        ALLOWED_ATTRIBUTES_ON_SPECIES,
        "Invalid attribute on the <species> element",
        Category::GeneralConsistency,
        Severity::Error,
        "A <species> object must have the required attributes 'id', 'compartment', 'hasOnlySubstanceUnits', 'boundaryCondition' and 'constant', and may have the optional attributes 'metaid', 'sboTerm', 'name', 'initialAmount', 'initialConcentration', 'substanceUnits' and 'conversionFactor'.",
        ErrorReferences::all("Section 4.6"),
    ),
    entry(
        ALLOWED_ATTRIBUTES_ON_PARAMETER,
        "Invalid attribute on the <parameter> element",
        Category::GeneralConsistency,
        Severity::Error,
        "A <parameter> object must have the required attributes 'id' and 'constant', and may have the optional attributes 'metaid', 'sboTerm', 'name', 'value' and 'units'.",
        ErrorReferences::all("Section 4.7"),
    ),
    entry(
        ALLOWED_ATTRIBUTES_ON_REACTION,
        "Invalid attribute on the <reaction> element",
        Category::GeneralConsistency,
        Severity::Error,
        "A <reaction> object must have the required attribute 'id' and 'reversible', and may have the optional attributes 'metaid', 'sboTerm', 'name' and 'compartment'.",
        ErrorReferences::all("Section 4.11"),
    ),
    entry(
        INVALID_SPECIES_REFERENCE,
        "Invalid 'species' attribute value",
        Category::GeneralConsistency,
        Severity::Error,
        "The value of a 'species' attribute in a <speciesReference> object must be the identifier of an existing <species> in the model.",
        ErrorReferences::all("Section 4.11.3"),
    ),
    entry(
        ALLOWED_ATTRIBUTES_ON_SPECIES_REFERENCE,
        "Invalid attribute on the <speciesReference> element",
        Category::GeneralConsistency,
        Severity::Error,
        "A <speciesReference> object must have the required attributes 'species' and 'constant', and may have the optional attributes 'metaid', 'sboTerm', 'name', 'id' and 'stoichiometry'.",
        ErrorReferences::all("Section 4.11.3"),
    ),
    entry(
        ALLOWED_ATTRIBUTES_ON_LIST_OF_SPECIES_REFERENCES,
        "Invalid attribute on a list of species references",
        Category::GeneralConsistency,
        Severity::Error,
        "A <listOfReactants> or <listOfProducts> object may have the optional attributes 'metaid' and 'sboTerm'. No other attributes from the SBML Level 3 Core namespace are permitted on these objects.",
        ErrorReferences::all("Section 4.11"),
    ),
    entry(
        REQUIRED_PACKAGE_PRESENT,
        "A required package is not supported by this build",
        Category::Sbml,
        Severity::Error,
        "The document uses an SBML Level 3 package that is marked as required but is not supported by this build; the model cannot be interpreted correctly.",
        ErrorReferences::NONE,
    ),
    entry(
        UNREQUIRED_PACKAGE_PRESENT,
        "An unsupported optional package is present",
        Category::Sbml,
        Severity::Warning,
        "The document uses an SBML Level 3 package that is not supported by this build; its information will be ignored.",
        ErrorReferences::NONE,
    ),
    entry(
        UNKNOWN_CORE_ATTRIBUTE,
        "Unknown attribute in the SBML core namespace",
        Category::Sbml,
        Severity::Error,
        "An unknown attribute has been found in the SBML core namespace.",
        ErrorReferences::NONE,
    ),
    entry(
        UNKNOWN_PACKAGE_ATTRIBUTE,
        "Unknown attribute in a package namespace",
        Category::Sbml,
        Severity::Error,
        "An unknown attribute has been found in the namespace of an SBML Level 3 package.",
        ErrorReferences::NONE,
    ),
];

/// Finds the table row for `code`, searching the core table first and then
/// the tables of every compiled-in package.
pub fn lookup(code: u32) -> Option<&'static ErrorTableEntry> {
    find_entry(code).map(|(_, entry)| entry)
}

/// Like [`lookup`], also returning the name of the package owning the row.
pub(crate) fn find_entry(code: u32) -> Option<(&'static str, &'static ErrorTableEntry)> {
    if let Some(entry) = CORE_ERROR_TABLE.iter().find(|e| e.code == code) {
        return Some(("core", entry));
    }
    registry().lookup_error(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_codes_are_unique() {
        let mut codes: Vec<u32> = CORE_ERROR_TABLE.iter().map(|e| e.code).collect();
        codes.sort_unstable();
        let before = codes.len();
        codes.dedup();
        assert_eq!(before, codes.len());
    }

    #[test]
    fn test_lookup_core_entry() {
        let entry = lookup(NOT_SCHEMA_CONFORMANT).unwrap();
        assert_eq!(entry.category, Category::Sbml);
        assert_eq!(entry.severity, Severity::Error);
        assert_eq!(
            entry.references.for_level_version(3, 1),
            "SBML L3V1 Section 1.4.1"
        );
        assert!(lookup(4_242_424).is_none());
    }

    #[test]
    fn test_file_errors_are_fatal() {
        assert_eq!(lookup(XML_FILE_UNREADABLE).unwrap().severity, Severity::Fatal);
        assert_eq!(lookup(XML_FILE_UNWRITABLE).unwrap().severity, Severity::Fatal);
    }
}
