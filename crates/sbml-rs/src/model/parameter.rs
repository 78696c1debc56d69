// crates/sbml-rs/src/model/parameter.rs

use crate::error::table::ALLOWED_ATTRIBUTES_ON_PARAMETER;
use crate::error::{ErrorLog, SbmlConstructorError};
use crate::namespaces::SbmlNamespaces;
use crate::sbase::{
    AttributeReader, SBase, SBaseData, add_base_expected_attributes, read_base_and_reclassify,
    sbase_boilerplate, write_base_attributes,
};
use crate::types::{OperationError, OperationResult, TypeCode, is_valid_sid};
use crate::xml::{ExpectedAttributes, XmlAttributes, XmlOutputStream};

/// A named quantity. Also the target of fbc flux bounds.
#[derive(Debug, Clone)]
pub struct Parameter {
    base: SBaseData,
    value: Option<f64>,
    units: Option<String>,
    constant: Option<bool>,
}

impl Parameter {
    pub fn new(level: u32, version: u32) -> Result<Self, SbmlConstructorError> {
        Ok(Self::with_namespaces(SbmlNamespaces::new(level, version)?))
    }

    pub fn with_namespaces(namespaces: SbmlNamespaces) -> Self {
        Parameter {
            base: SBaseData::new(namespaces, TypeCode::Parameter),
            value: None,
            units: None,
            constant: None,
        }
    }

    pub fn value(&self) -> Option<f64> {
        self.value
    }

    pub fn set_value(&mut self, value: f64) {
        self.value = Some(value);
    }

    pub fn unset_value(&mut self) {
        self.value = None;
    }

    pub fn units(&self) -> Option<&str> {
        self.units.as_deref()
    }

    pub fn set_units(&mut self, units: &str) -> OperationResult {
        if !is_valid_sid(units) {
            return Err(OperationError::InvalidAttributeValue);
        }
        self.units = Some(units.to_string());
        Ok(())
    }

    pub fn unset_units(&mut self) {
        self.units = None;
    }

    pub fn constant(&self) -> Option<bool> {
        self.constant
    }

    pub fn set_constant(&mut self, constant: bool) {
        self.constant = Some(constant);
    }
}

impl SBase for Parameter {
    sbase_boilerplate!();

    fn type_code(&self) -> TypeCode {
        TypeCode::Parameter
    }

    fn element_name(&self) -> &'static str {
        "parameter"
    }

    fn add_expected_attributes(&self, expected: &mut ExpectedAttributes) {
        add_base_expected_attributes(self, expected);
        for name in ["value", "units", "constant"] {
            expected.add(name, "");
        }
    }

    fn read_attributes(
        &mut self,
        attrs: &XmlAttributes,
        expected: &ExpectedAttributes,
        log: &mut ErrorLog,
    ) {
        read_base_and_reclassify(self, attrs, expected, log, ALLOWED_ATTRIBUTES_ON_PARAMETER);
        let strict = self.level() >= 3;
        let reader = AttributeReader::new(self, attrs, "", ALLOWED_ATTRIBUTES_ON_PARAMETER);
        reader.require("id", log);
        self.value = reader.double("value", false, log);
        self.units = reader.sid_ref("units", false, log);
        self.constant = reader.boolean("constant", strict, log);
    }

    fn write_attributes(&self, out: &mut XmlOutputStream<'_>) {
        write_base_attributes(self, out);
        if let Some(value) = self.value {
            out.write_double_attribute("", "value", value);
        }
        if let Some(units) = &self.units {
            out.write_attribute("", "units", units);
        }
        if let Some(constant) = self.constant {
            out.write_bool_attribute("", "constant", constant);
        }
    }
}
