// crates/sbml-rs/src/error/mod.rs

//! Diagnostics produced while reading, writing and checking documents.
//!
//! Three kinds of failure exist side by side:
//! - [`SbmlError`] values accumulated in an [`ErrorLog`]. Reading never aborts
//!   on a semantic problem; it records it and carries on.
//! - [`OperationError`](crate::types::OperationError) status codes returned by
//!   mutating calls. These are never logged.
//! - Rust errors such as [`SbmlConstructorError`], returned by fallible
//!   constructors.

pub mod table;

use core::fmt;
use serde::Serialize;
use std::io::{self, Write};
use thiserror::Error;

pub use table::{ErrorReferences, ErrorTableEntry, lookup};

/// How serious a diagnostic is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Severity {
    Info,
    Warning,
    Error,
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Severity::Info => "Info",
            Severity::Warning => "Warning",
            Severity::Error => "Error",
            Severity::Fatal => "Fatal",
        };
        write!(f, "{}", s)
    }
}

/// Which layer or rule family a diagnostic belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Category {
    Internal,
    System,
    Xml,
    Sbml,
    GeneralConsistency,
    IdentifierConsistency,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Category::Internal => "Internal",
            Category::System => "System",
            Category::Xml => "XML",
            Category::Sbml => "SBML",
            Category::GeneralConsistency => "General SBML conformance",
            Category::IdentifierConsistency => "SBML component consistency",
        };
        write!(f, "{}", s)
    }
}

/// One diagnostic, built from a table row plus call-site details.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SbmlError {
    code: u32,
    short_message: String,
    message: String,
    details: String,
    severity: Severity,
    category: Category,
    package: String,
    reference: String,
    line: u32,
    column: u32,
    critical: bool,
}

impl SbmlError {
    /// Creates a diagnostic for `code`. Codes missing from every table keep
    /// their number but take the text of the core "unknown error" row.
    pub fn new(code: u32, details: impl Into<String>) -> Self {
        let details = details.into();
        let (package, entry) = table::find_entry(code).unwrap_or(("core", &table::UNKNOWN_ENTRY));
        let message = if details.is_empty() {
            entry.message.to_string()
        } else {
            format!("{}\n{}", entry.message, details)
        };
        SbmlError {
            code,
            short_message: entry.short_message.to_string(),
            message,
            details,
            severity: entry.severity,
            category: entry.category,
            package: package.to_string(),
            reference: entry.references.l3v2.to_string(),
            line: 0,
            column: 0,
            critical: false,
        }
    }

    /// Selects the SBML document reference matching the document's Level/Version.
    pub fn with_level_version(mut self, level: u32, version: u32) -> Self {
        if let Some(entry) = lookup(self.code) {
            self.reference = entry.references.for_level_version(level, version).to_string();
        }
        self
    }

    /// Attaches a source position.
    pub fn at(mut self, line: u32, column: u32) -> Self {
        self.line = line;
        self.column = column;
        self
    }

    /// Overrides the owning package (used for generic codes such as unknown
    /// package attributes, where the package comes from the attribute's namespace).
    pub fn with_package(mut self, package: &str) -> Self {
        self.package = package.to_string();
        self
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Marks the diagnostic as critical: reading stopped because of it.
    pub fn critical(mut self) -> Self {
        self.critical = true;
        self
    }

    pub fn code(&self) -> u32 {
        self.code
    }

    /// Full text: the table message followed by the call-site details.
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn short_message(&self) -> &str {
        &self.short_message
    }

    pub fn details(&self) -> &str {
        &self.details
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn package(&self) -> &str {
        &self.package
    }

    pub fn reference(&self) -> &str {
        &self.reference
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    pub fn column(&self) -> u32 {
        self.column
    }

    pub fn is_critical(&self) -> bool {
        self.critical
    }

    /// True for `Error` and `Fatal` severities.
    pub fn is_error(&self) -> bool {
        self.severity >= Severity::Error
    }

    pub fn is_fatal(&self) -> bool {
        self.severity == Severity::Fatal
    }
}

impl fmt::Display for SbmlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "line {}:{}: ({} [{}]) {}",
            self.line, self.column, self.code, self.severity, self.message
        )
    }
}

/// Ordered collection of diagnostics gathered during one or more passes.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ErrorLog {
    errors: Vec<SbmlError>,
}

impl ErrorLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn log(&mut self, error: SbmlError) {
        self.errors.push(error);
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Bounds-checked access by position.
    pub fn error(&self, index: usize) -> Option<&SbmlError> {
        self.errors.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SbmlError> {
        self.errors.iter()
    }

    pub fn errors(&self) -> &[SbmlError] {
        &self.errors
    }

    /// First entry carrying `code`.
    pub fn error_with_code(&self, code: u32) -> Option<&SbmlError> {
        self.errors.iter().find(|e| e.code == code)
    }

    pub fn contains(&self, code: u32) -> bool {
        self.error_with_code(code).is_some()
    }

    pub fn count_with_code(&self, code: u32) -> usize {
        self.errors.iter().filter(|e| e.code == code).count()
    }

    /// Removes and returns the first entry carrying `code`.
    pub fn remove(&mut self, code: u32) -> Option<SbmlError> {
        let pos = self.errors.iter().position(|e| e.code == code)?;
        Some(self.errors.remove(pos))
    }

    /// Removes every entry carrying `code`, returning how many were dropped.
    pub fn remove_all(&mut self, code: u32) -> usize {
        let before = self.errors.len();
        self.errors.retain(|e| e.code != code);
        before - self.errors.len()
    }

    pub fn clear(&mut self) {
        self.errors.clear();
    }

    pub fn num_with_severity(&self, severity: Severity) -> usize {
        self.errors.iter().filter(|e| e.severity == severity).count()
    }

    /// Number of entries of severity `Error` or `Fatal`.
    pub fn num_errors(&self) -> usize {
        self.errors.iter().filter(|e| e.is_error()).count()
    }

    pub fn has_critical(&self) -> bool {
        self.errors.iter().any(|e| e.critical)
    }

    /// Keeps only critical entries; returns how many were discarded.
    pub fn discard_non_critical(&mut self) -> usize {
        let before = self.errors.len();
        self.errors.retain(|e| e.critical);
        before - self.errors.len()
    }

    /// Replaces, in place, every entry logged at or after `since` that satisfies
    /// `matches` with the diagnostic produced by `upgrade`. Entries before
    /// `since` belong to earlier elements and are never touched.
    pub fn reclassify<M, U>(&mut self, since: usize, matches: M, upgrade: U) -> usize
    where
        M: Fn(&SbmlError) -> bool,
        U: Fn(&SbmlError) -> SbmlError,
    {
        let mut count = 0;
        for entry in self.errors.iter_mut().skip(since) {
            if matches(entry) {
                *entry = upgrade(entry);
                count += 1;
            }
        }
        count
    }

    /// Appends every entry of `other`, preserving order.
    pub fn append(&mut self, other: ErrorLog) {
        self.errors.extend(other.errors);
    }

    /// Machine-readable report of the whole log.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.errors)
    }

    /// Human-readable report, one entry per paragraph.
    pub fn print_errors<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for error in &self.errors {
            writeln!(out, "{}", error)?;
        }
        Ok(())
    }
}

impl Extend<SbmlError> for ErrorLog {
    fn extend<T: IntoIterator<Item = SbmlError>>(&mut self, iter: T) {
        self.errors.extend(iter);
    }
}

impl<'a> IntoIterator for &'a ErrorLog {
    type Item = &'a SbmlError;
    type IntoIter = std::slice::Iter<'a, SbmlError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

/// Failure to construct an element or a namespace set.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SbmlConstructorError {
    #[error("SBML Level {level} Version {version} is not supported")]
    UnsupportedLevelVersion { level: u32, version: u32 },

    #[error(
        "package '{package}' version {package_version} is not supported with SBML Level {level} Version {version}"
    )]
    UnsupportedPackageVersion {
        package: String,
        package_version: u32,
        level: u32,
        version: u32,
    },

    #[error("package '{0}' is not available in this build")]
    UnknownPackage(String),
}

#[cfg(test)]
mod tests {
    use super::table::*;
    use super::*;

    #[test]
    fn test_error_from_table() {
        let e = SbmlError::new(NOT_UTF8, "Encoding 'ISO-8859-1' declared").at(1, 1);
        assert_eq!(e.code(), NOT_UTF8);
        assert_eq!(e.severity(), Severity::Error);
        assert_eq!(e.category(), Category::Sbml);
        assert_eq!(e.package(), "core");
        assert!(e.message().ends_with("Encoding 'ISO-8859-1' declared"));
        assert_eq!(e.to_string().lines().next().unwrap(), "line 1:1: (10101 [Error]) An SBML XML file must use UTF-8 as the character encoding.");
    }

    #[test]
    fn test_unknown_code_keeps_number() {
        let e = SbmlError::new(4_242_424, "");
        assert_eq!(e.code(), 4_242_424);
        assert_eq!(e.severity(), Severity::Fatal);
        assert_eq!(e.message(), "Encountered unknown internal SBML error.");
    }

    #[test]
    fn test_reference_per_level_version() {
        let e = SbmlError::new(NOT_SCHEMA_CONFORMANT, "").with_level_version(2, 4);
        assert_eq!(e.reference(), "SBML L2V4 Section 4.1");
    }

    #[test]
    fn test_remove_first_and_all() {
        let mut log = ErrorLog::new();
        log.log(SbmlError::new(UNKNOWN_CORE_ATTRIBUTE, "a"));
        log.log(SbmlError::new(NOT_UTF8, ""));
        log.log(SbmlError::new(UNKNOWN_CORE_ATTRIBUTE, "b"));

        let first = log.remove(UNKNOWN_CORE_ATTRIBUTE).unwrap();
        assert_eq!(first.details(), "a");
        assert_eq!(log.len(), 2);
        assert_eq!(log.remove_all(UNKNOWN_CORE_ATTRIBUTE), 1);
        assert_eq!(log.len(), 1);
        assert!(log.remove(UNKNOWN_CORE_ATTRIBUTE).is_none());
        assert!(log.error(5).is_none());
    }

    #[test]
    fn test_reclassify_window_and_details() {
        let mut log = ErrorLog::new();
        log.log(SbmlError::new(UNKNOWN_CORE_ATTRIBUTE, "before"));
        let since = log.len();
        log.log(SbmlError::new(UNKNOWN_CORE_ATTRIBUTE, "Attribute 'foo' is not part of <species>.").at(4, 9));

        let n = log.reclassify(
            since,
            |e| e.code() == UNKNOWN_CORE_ATTRIBUTE,
            |e| SbmlError::new(ALLOWED_ATTRIBUTES_ON_SPECIES, e.details()).at(e.line(), e.column()),
        );
        assert_eq!(n, 1);
        assert_eq!(log.len(), 2);
        assert_eq!(log.error(0).unwrap().code(), UNKNOWN_CORE_ATTRIBUTE);
        let upgraded = log.error(1).unwrap();
        assert_eq!(upgraded.code(), ALLOWED_ATTRIBUTES_ON_SPECIES);
        assert!(upgraded.message().contains("Attribute 'foo' is not part of <species>."));
        assert_eq!((upgraded.line(), upgraded.column()), (4, 9));
    }

    #[test]
    fn test_discard_non_critical() {
        let mut log = ErrorLog::new();
        log.log(SbmlError::new(UNKNOWN_CORE_ATTRIBUTE, ""));
        log.log(SbmlError::new(BADLY_FORMED_XML, "").critical());
        assert!(log.has_critical());
        assert_eq!(log.discard_non_critical(), 1);
        assert_eq!(log.len(), 1);
        assert_eq!(log.error(0).unwrap().code(), BADLY_FORMED_XML);
    }

    #[test]
    fn test_json_and_text_reports() {
        let mut log = ErrorLog::new();
        log.log(SbmlError::new(XML_FILE_UNREADABLE, "File 'x.xml' not found"));
        let json = log.to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["code"], 2);
        assert_eq!(value[0]["severity"], "Fatal");

        let mut out = Vec::new();
        log.print_errors(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("line 0:0: (2 [Fatal]) File unreadable."));
    }

    #[test]
    fn test_constructor_error_display() {
        let e = SbmlConstructorError::UnsupportedLevelVersion { level: 9, version: 9 };
        assert_eq!(e.to_string(), "SBML Level 9 Version 9 is not supported");
    }
}
