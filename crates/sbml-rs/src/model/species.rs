// crates/sbml-rs/src/model/species.rs

use super::Model;
use crate::error::table::{ALLOWED_ATTRIBUTES_ON_SPECIES, INVALID_SPECIES_COMPARTMENT_REF};
use crate::error::{ErrorLog, SbmlConstructorError, SbmlError};
use crate::namespaces::SbmlNamespaces;
use crate::sbase::{
    AttributeReader, SBase, SBaseData, add_base_expected_attributes, read_base_and_reclassify,
    sbase_boilerplate, write_base_attributes,
};
use crate::types::{OperationError, OperationResult, TypeCode, is_valid_sid};
use crate::xml::{ExpectedAttributes, XmlAttributes, XmlOutputStream};

/// A pool of entities located in a compartment.
///
/// `initial_amount` and `initial_concentration` are mutually exclusive;
/// setting one unsets the other.
#[derive(Debug, Clone)]
pub struct Species {
    base: SBaseData,
    compartment: Option<String>,
    initial_amount: Option<f64>,
    initial_concentration: Option<f64>,
    substance_units: Option<String>,
    has_only_substance_units: Option<bool>,
    boundary_condition: Option<bool>,
    constant: Option<bool>,
    conversion_factor: Option<String>,
}

fn sid(value: &str) -> Result<String, OperationError> {
    if is_valid_sid(value) {
        Ok(value.to_string())
    } else {
        Err(OperationError::InvalidAttributeValue)
    }
}

impl Species {
    pub fn new(level: u32, version: u32) -> Result<Self, SbmlConstructorError> {
        Ok(Self::with_namespaces(SbmlNamespaces::new(level, version)?))
    }

    pub fn with_namespaces(namespaces: SbmlNamespaces) -> Self {
        Species {
            base: SBaseData::new(namespaces, TypeCode::Species),
            compartment: None,
            initial_amount: None,
            initial_concentration: None,
            substance_units: None,
            has_only_substance_units: None,
            boundary_condition: None,
            constant: None,
            conversion_factor: None,
        }
    }

    pub fn compartment(&self) -> Option<&str> {
        self.compartment.as_deref()
    }

    pub fn set_compartment(&mut self, compartment: &str) -> OperationResult {
        self.compartment = Some(sid(compartment)?);
        Ok(())
    }

    pub fn unset_compartment(&mut self) {
        self.compartment = None;
    }

    pub fn initial_amount(&self) -> Option<f64> {
        self.initial_amount
    }

    pub fn set_initial_amount(&mut self, amount: f64) {
        self.initial_amount = Some(amount);
        self.initial_concentration = None;
    }

    pub fn unset_initial_amount(&mut self) {
        self.initial_amount = None;
    }

    pub fn initial_concentration(&self) -> Option<f64> {
        self.initial_concentration
    }

    pub fn set_initial_concentration(&mut self, concentration: f64) {
        self.initial_concentration = Some(concentration);
        self.initial_amount = None;
    }

    pub fn unset_initial_concentration(&mut self) {
        self.initial_concentration = None;
    }

    pub fn substance_units(&self) -> Option<&str> {
        self.substance_units.as_deref()
    }

    pub fn set_substance_units(&mut self, units: &str) -> OperationResult {
        self.substance_units = Some(sid(units)?);
        Ok(())
    }

    pub fn unset_substance_units(&mut self) {
        self.substance_units = None;
    }

    pub fn has_only_substance_units(&self) -> Option<bool> {
        self.has_only_substance_units
    }

    pub fn set_has_only_substance_units(&mut self, value: bool) {
        self.has_only_substance_units = Some(value);
    }

    pub fn boundary_condition(&self) -> Option<bool> {
        self.boundary_condition
    }

    pub fn set_boundary_condition(&mut self, value: bool) {
        self.boundary_condition = Some(value);
    }

    pub fn constant(&self) -> Option<bool> {
        self.constant
    }

    pub fn set_constant(&mut self, value: bool) {
        self.constant = Some(value);
    }

    pub fn conversion_factor(&self) -> Option<&str> {
        self.conversion_factor.as_deref()
    }

    /// Only defined in Level 3.
    pub fn set_conversion_factor(&mut self, parameter: &str) -> OperationResult {
        if self.level() < 3 {
            return Err(OperationError::UnexpectedAttribute);
        }
        self.conversion_factor = Some(sid(parameter)?);
        Ok(())
    }

    pub fn unset_conversion_factor(&mut self) {
        self.conversion_factor = None;
    }
}

impl SBase for Species {
    sbase_boilerplate!();

    fn type_code(&self) -> TypeCode {
        TypeCode::Species
    }

    fn element_name(&self) -> &'static str {
        "species"
    }

    fn add_expected_attributes(&self, expected: &mut ExpectedAttributes) {
        add_base_expected_attributes(self, expected);
        for name in [
            "compartment",
            "initialAmount",
            "initialConcentration",
            "substanceUnits",
            "hasOnlySubstanceUnits",
            "boundaryCondition",
            "constant",
        ] {
            expected.add(name, "");
        }
        if self.level() >= 3 {
            expected.add("conversionFactor", "");
        }
    }

    fn read_attributes(
        &mut self,
        attrs: &XmlAttributes,
        expected: &ExpectedAttributes,
        log: &mut ErrorLog,
    ) {
        read_base_and_reclassify(self, attrs, expected, log, ALLOWED_ATTRIBUTES_ON_SPECIES);
        let strict = self.level() >= 3;
        let reader = AttributeReader::new(self, attrs, "", ALLOWED_ATTRIBUTES_ON_SPECIES);
        if strict {
            reader.require("id", log);
        }
        self.compartment = reader.sid_ref("compartment", true, log);
        self.initial_amount = reader.double("initialAmount", false, log);
        self.initial_concentration = reader.double("initialConcentration", false, log);
        self.substance_units = reader.sid_ref("substanceUnits", false, log);
        self.has_only_substance_units = reader.boolean("hasOnlySubstanceUnits", strict, log);
        self.boundary_condition = reader.boolean("boundaryCondition", strict, log);
        self.constant = reader.boolean("constant", strict, log);
        if strict {
            self.conversion_factor = reader.sid_ref("conversionFactor", false, log);
        }
    }

    fn write_attributes(&self, out: &mut XmlOutputStream<'_>) {
        write_base_attributes(self, out);
        if let Some(compartment) = &self.compartment {
            out.write_attribute("", "compartment", compartment);
        }
        if let Some(amount) = self.initial_amount {
            out.write_double_attribute("", "initialAmount", amount);
        }
        if let Some(concentration) = self.initial_concentration {
            out.write_double_attribute("", "initialConcentration", concentration);
        }
        if let Some(units) = &self.substance_units {
            out.write_attribute("", "substanceUnits", units);
        }
        if let Some(value) = self.has_only_substance_units {
            out.write_bool_attribute("", "hasOnlySubstanceUnits", value);
        }
        if let Some(value) = self.boundary_condition {
            out.write_bool_attribute("", "boundaryCondition", value);
        }
        if let Some(value) = self.constant {
            out.write_bool_attribute("", "constant", value);
        }
        if let Some(factor) = &self.conversion_factor {
            out.write_attribute("", "conversionFactor", factor);
        }
    }

    fn check_references(&self, model: &Model, log: &mut ErrorLog) {
        let Some(compartment) = self.compartment() else {
            return;
        };
        if model.get_compartment_by_id(compartment).is_none() {
            log.log(
                SbmlError::new(
                    INVALID_SPECIES_COMPARTMENT_REF,
                    format!(
                        "Species '{}' refers to compartment '{}', which is not defined.",
                        self.id().unwrap_or_default(),
                        compartment
                    ),
                )
                .with_level_version(self.level(), self.version())
                .at(self.line(), self.column()),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amount_and_concentration_are_exclusive() {
        let mut s = Species::new(3, 2).unwrap();
        s.set_initial_amount(1.5);
        s.set_initial_concentration(0.1);
        assert_eq!(s.initial_amount(), None);
        assert_eq!(s.initial_concentration(), Some(0.1));
    }

    #[test]
    fn test_conversion_factor_is_level_3_only() {
        let mut l2 = Species::new(2, 4).unwrap();
        assert_eq!(
            l2.set_conversion_factor("k"),
            Err(OperationError::UnexpectedAttribute)
        );
        let mut l3 = Species::new(3, 1).unwrap();
        assert!(l3.set_conversion_factor("k").is_ok());
        assert_eq!(l3.set_compartment("9c"), Err(OperationError::InvalidAttributeValue));
    }
}
