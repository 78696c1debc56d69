// crates/sbml-rs/src/packages/qual/qualitative_species.rs

use super::QUAL_PACKAGE;
use super::errors::{
    QUAL_ALLOWED_ATTRIBUTES_ON_QUAL_SPECIES, QUAL_COMPARTMENT_MUST_EXIST,
    QUAL_INITIAL_LEVEL_EXCEEDS_MAX,
};
use crate::error::{ErrorLog, SbmlConstructorError, SbmlError};
use crate::model::Model;
use crate::namespaces::SbmlNamespaces;
use crate::sbase::{
    AttributeReader, SBase, SBaseData, add_base_expected_attributes, read_base_and_reclassify,
    sbase_boilerplate, write_base_attributes,
};
use crate::types::{OperationError, OperationResult, TypeCode, is_valid_sid};
use crate::xml::{ExpectedAttributes, XmlAttributes, XmlOutputStream};

/// An entity whose state is a non-negative integer level.
#[derive(Debug, Clone)]
pub struct QualitativeSpecies {
    base: SBaseData,
    compartment: Option<String>,
    constant: Option<bool>,
    initial_level: Option<u32>,
    max_level: Option<u32>,
}

impl QualitativeSpecies {
    pub fn new(level: u32, version: u32, package_version: u32) -> Result<Self, SbmlConstructorError> {
        let ns = SbmlNamespaces::with_package(level, version, QUAL_PACKAGE, package_version)?;
        Ok(Self::with_namespaces(ns))
    }

    pub fn with_namespaces(namespaces: SbmlNamespaces) -> Self {
        QualitativeSpecies {
            base: SBaseData::new(namespaces, TypeCode::QualQualitativeSpecies),
            compartment: None,
            constant: None,
            initial_level: None,
            max_level: None,
        }
    }

    pub fn compartment(&self) -> Option<&str> {
        self.compartment.as_deref()
    }

    pub fn set_compartment(&mut self, compartment: &str) -> OperationResult {
        if !is_valid_sid(compartment) {
            return Err(OperationError::InvalidAttributeValue);
        }
        self.compartment = Some(compartment.to_string());
        Ok(())
    }

    pub fn unset_compartment(&mut self) {
        self.compartment = None;
    }

    pub fn constant(&self) -> Option<bool> {
        self.constant
    }

    pub fn set_constant(&mut self, constant: bool) {
        self.constant = Some(constant);
    }

    pub fn initial_level(&self) -> Option<u32> {
        self.initial_level
    }

    pub fn set_initial_level(&mut self, level: u32) {
        self.initial_level = Some(level);
    }

    pub fn unset_initial_level(&mut self) {
        self.initial_level = None;
    }

    /// Highest level the species can reach; unbounded when unset.
    pub fn max_level(&self) -> Option<u32> {
        self.max_level
    }

    pub fn set_max_level(&mut self, level: u32) {
        self.max_level = Some(level);
    }

    pub fn unset_max_level(&mut self) {
        self.max_level = None;
    }

    fn report(&self, code: u32, details: String, log: &mut ErrorLog) {
        log.log(
            SbmlError::new(code, details)
                .with_level_version(self.level(), self.version())
                .at(self.line(), self.column()),
        );
    }
}

impl SBase for QualitativeSpecies {
    sbase_boilerplate!();

    fn type_code(&self) -> TypeCode {
        TypeCode::QualQualitativeSpecies
    }

    fn element_name(&self) -> &'static str {
        "qualitativeSpecies"
    }

    fn add_expected_attributes(&self, expected: &mut ExpectedAttributes) {
        add_base_expected_attributes(self, expected);
        let uri = self.namespaces().attribute_uri_for(QUAL_PACKAGE);
        for name in ["compartment", "constant", "initialLevel", "maxLevel"] {
            expected.add(name, uri);
        }
    }

    fn read_attributes(
        &mut self,
        attrs: &XmlAttributes,
        expected: &ExpectedAttributes,
        log: &mut ErrorLog,
    ) {
        let code = QUAL_ALLOWED_ATTRIBUTES_ON_QUAL_SPECIES;
        read_base_and_reclassify(self, attrs, expected, log, code);
        let uri = self.namespaces().attribute_uri_for(QUAL_PACKAGE);
        let reader = AttributeReader::new(self, attrs, uri, code);
        reader.require("id", log);
        self.compartment = reader.sid_ref("compartment", true, log);
        self.constant = reader.boolean("constant", true, log);
        self.initial_level = reader.non_negative_int("initialLevel", false, log);
        self.max_level = reader.non_negative_int("maxLevel", false, log);
    }

    fn write_attributes(&self, out: &mut XmlOutputStream<'_>) {
        write_base_attributes(self, out);
        let prefix = self.namespaces().prefix_for(QUAL_PACKAGE);
        if let Some(compartment) = &self.compartment {
            out.write_attribute(&prefix, "compartment", compartment);
        }
        if let Some(constant) = self.constant {
            out.write_bool_attribute(&prefix, "constant", constant);
        }
        if let Some(level) = self.initial_level {
            out.write_int_attribute(&prefix, "initialLevel", i64::from(level));
        }
        if let Some(level) = self.max_level {
            out.write_int_attribute(&prefix, "maxLevel", i64::from(level));
        }
    }

    fn check_references(&self, model: &Model, log: &mut ErrorLog) {
        let id = self.id().unwrap_or_default();
        if let Some(compartment) = self.compartment() {
            if model.get_compartment_by_id(compartment).is_none() {
                self.report(
                    QUAL_COMPARTMENT_MUST_EXIST,
                    format!(
                        "Qualitative species '{}' is in compartment '{}', which is not defined.",
                        id, compartment
                    ),
                    log,
                );
            }
        }
        if let (Some(initial), Some(max)) = (self.initial_level, self.max_level) {
            if initial > max {
                self.report(
                    QUAL_INITIAL_LEVEL_EXCEEDS_MAX,
                    format!(
                        "Qualitative species '{}' starts at level {} above its maximum {}.",
                        id, initial, max
                    ),
                    log,
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attributes_are_package_qualified() {
        let mut qs = QualitativeSpecies::new(3, 1, 1).unwrap();
        qs.set_id("A").unwrap();
        qs.set_compartment("cell").unwrap();
        qs.set_constant(false);
        let mut expected = ExpectedAttributes::new();
        qs.add_expected_attributes(&mut expected);
        assert!(expected.has("maxLevel", "http://www.sbml.org/sbml/level3/version1/qual/version1"));
        assert!(!expected.has("maxLevel", ""));
    }

    #[test]
    fn test_read_logs_missing_required() {
        let mut qs = QualitativeSpecies::new(3, 1, 1).unwrap();
        let uri = qs.namespaces().attribute_uri_for(QUAL_PACKAGE);
        let mut attrs = XmlAttributes::new();
        attrs.add("id", uri, "A");
        attrs.add("maxLevel", uri, "-1");
        let mut expected = ExpectedAttributes::new();
        qs.add_expected_attributes(&mut expected);
        let mut log = ErrorLog::new();
        qs.read_attributes(&attrs, &expected, &mut log);
        assert_eq!(qs.id(), Some("A"));
        assert!(qs.max_level().is_none());
        // compartment, constant, and the malformed maxLevel
        assert_eq!(log.len(), 3);
        assert!(log.iter().all(|e| e.code() == QUAL_ALLOWED_ATTRIBUTES_ON_QUAL_SPECIES));
    }
}
