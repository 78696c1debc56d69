// crates/sbml-rs/src/types.rs

use core::fmt;

/// Status code returned by successful mutating operations.
///
/// Mutating operations return `Result<(), OperationError>`; this constant is the
/// integer an `Ok(())` corresponds to when codes are exchanged with other tools.
pub const OPERATION_SUCCESS: i32 = 0;

/// Identifies the concrete schema class of an element.
///
/// Containers use it to gate insertion, and generic code uses it before
/// downcasting a `dyn SBase` to its concrete type. Package codes are always
/// present, even when the package itself is not compiled in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TypeCode {
    /// Sentinel for "not yet known".
    Unknown,
    Document,
    Model,
    Compartment,
    Species,
    Parameter,
    Reaction,
    SpeciesReference,
    ListOf,

    // --- fbc ---
    FbcGeneProduct,
    FbcGeneProductAssociation,
    /// Abstract association node; used as the lock of association containers.
    FbcAssociation,
    FbcAnd,
    FbcOr,
    FbcGeneProductRef,
    FbcObjective,
    FbcFluxObjective,

    // --- qual ---
    QualQualitativeSpecies,
    QualTransition,
    QualInput,
    QualOutput,
    QualFunctionTerm,
    QualDefaultTerm,
}

impl TypeCode {
    /// Name of the package that defines this type ("core" for SBML core).
    pub fn package_name(self) -> &'static str {
        match self {
            TypeCode::FbcGeneProduct
            | TypeCode::FbcGeneProductAssociation
            | TypeCode::FbcAssociation
            | TypeCode::FbcAnd
            | TypeCode::FbcOr
            | TypeCode::FbcGeneProductRef
            | TypeCode::FbcObjective
            | TypeCode::FbcFluxObjective => "fbc",
            TypeCode::QualQualitativeSpecies
            | TypeCode::QualTransition
            | TypeCode::QualInput
            | TypeCode::QualOutput
            | TypeCode::QualFunctionTerm
            | TypeCode::QualDefaultTerm => "qual",
            _ => "core",
        }
    }
}

impl fmt::Display for TypeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Failure status of a mutating operation.
///
/// These are returned, never logged: the caller decides whether a rejected
/// insert or setter call is worth a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationError {
    /// An index was outside the valid range.
    IndexExceedsSize,
    /// An attribute was set on an element that does not define it.
    UnexpectedAttribute,
    /// The operation failed for an unspecified reason.
    Failed,
    /// The value does not satisfy the attribute's syntax.
    InvalidAttributeValue,
    /// The object is of the wrong type or is incomplete.
    InvalidObject,
    /// An object with the same identifier already exists in scope.
    DuplicateObjectId,
    /// The object's SBML Level differs from the target's.
    LevelMismatch,
    /// The object's SBML Version differs from the target's.
    VersionMismatch,
    /// The object's namespaces are not declared by the target.
    NamespacesMismatch,
}

impl OperationError {
    /// The libSBML-compatible integer code for this status.
    pub fn code(self) -> i32 {
        match self {
            OperationError::IndexExceedsSize => -1,
            OperationError::UnexpectedAttribute => -2,
            OperationError::Failed => -3,
            OperationError::InvalidAttributeValue => -4,
            OperationError::InvalidObject => -5,
            OperationError::DuplicateObjectId => -6,
            OperationError::LevelMismatch => -7,
            OperationError::VersionMismatch => -8,
            OperationError::NamespacesMismatch => -10,
        }
    }
}

impl fmt::Display for OperationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IndexExceedsSize => write!(f, "Index exceeds the size of the container"),
            Self::UnexpectedAttribute => write!(f, "Attribute is not defined on this element"),
            Self::Failed => write!(f, "Operation failed"),
            Self::InvalidAttributeValue => write!(f, "Invalid attribute value"),
            Self::InvalidObject => write!(f, "Object is of the wrong type or incomplete"),
            Self::DuplicateObjectId => write!(f, "An object with this identifier already exists"),
            Self::LevelMismatch => write!(f, "SBML Level mismatch"),
            Self::VersionMismatch => write!(f, "SBML Version mismatch"),
            Self::NamespacesMismatch => write!(f, "Namespaces mismatch"),
        }
    }
}

impl std::error::Error for OperationError {}

/// Result of a mutating operation.
pub type OperationResult = Result<(), OperationError>;

/// Returns true if `value` is a valid SBML `SId`:
/// a letter or underscore followed by letters, digits or underscores.
pub fn is_valid_sid(value: &str) -> bool {
    let mut chars = value.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Returns true if `value` is a valid XML `ID` (an NCName), as used by `metaid`.
pub fn is_valid_xml_id(value: &str) -> bool {
    let mut chars = value.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.') || is_combining(c))
}

fn is_combining(c: char) -> bool {
    matches!(c, '\u{00B7}' | '\u{0300}'..='\u{036F}' | '\u{203F}'..='\u{2040}')
}

/// Parses an `sboTerm` attribute value of the form `SBO:nnnnnnn`.
pub fn parse_sbo_term(value: &str) -> Option<u32> {
    let digits = value.strip_prefix("SBO:")?;
    if digits.len() != 7 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Formats an SBO term number as `SBO:nnnnnnn`.
pub fn format_sbo_term(term: u32) -> String {
    format!("SBO:{:07}", term)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_codes_match_libsbml() {
        assert_eq!(OperationError::InvalidObject.code(), -5);
        assert_eq!(OperationError::DuplicateObjectId.code(), -6);
        assert_eq!(OperationError::LevelMismatch.code(), -7);
        assert_eq!(OperationError::VersionMismatch.code(), -8);
        assert_eq!(OperationError::NamespacesMismatch.code(), -10);
        assert_eq!(OPERATION_SUCCESS, 0);
    }

    #[test]
    fn test_sid_syntax() {
        assert!(is_valid_sid("S1"));
        assert!(is_valid_sid("_glucose_6P"));
        assert!(!is_valid_sid(""));
        assert!(!is_valid_sid("1abc"));
        assert!(!is_valid_sid("a-b"));
        assert!(!is_valid_sid("a b"));
    }

    #[test]
    fn test_metaid_syntax() {
        assert!(is_valid_xml_id("meta_1"));
        assert!(is_valid_xml_id("m.1-a"));
        assert!(!is_valid_xml_id("1meta"));
        assert!(!is_valid_xml_id("a:b"));
    }

    #[test]
    fn test_sbo_term_round_trip() {
        assert_eq!(parse_sbo_term("SBO:0000252"), Some(252));
        assert_eq!(format_sbo_term(252), "SBO:0000252");
        assert_eq!(parse_sbo_term("SBO:252"), None);
        assert_eq!(parse_sbo_term("0000252"), None);
    }

    #[test]
    fn test_type_code_packages() {
        assert_eq!(TypeCode::Species.package_name(), "core");
        assert_eq!(TypeCode::FbcAnd.package_name(), "fbc");
        assert_eq!(TypeCode::QualTransition.package_name(), "qual");
    }
}
