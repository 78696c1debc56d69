// crates/sbml-rs/src/model/compartment.rs

use crate::error::table::ALLOWED_ATTRIBUTES_ON_COMPARTMENT;
use crate::error::{ErrorLog, SbmlConstructorError};
use crate::namespaces::SbmlNamespaces;
use crate::sbase::{
    AttributeReader, SBase, SBaseData, add_base_expected_attributes, read_base_and_reclassify,
    sbase_boilerplate, write_base_attributes,
};
use crate::types::{OperationError, OperationResult, TypeCode, is_valid_sid};
use crate::xml::{ExpectedAttributes, XmlAttributes, XmlOutputStream};

/// A bounded container in which species are located.
#[derive(Debug, Clone)]
pub struct Compartment {
    base: SBaseData,
    spatial_dimensions: Option<f64>,
    size: Option<f64>,
    units: Option<String>,
    constant: Option<bool>,
}

impl Compartment {
    pub fn new(level: u32, version: u32) -> Result<Self, SbmlConstructorError> {
        Ok(Self::with_namespaces(SbmlNamespaces::new(level, version)?))
    }

    pub fn with_namespaces(namespaces: SbmlNamespaces) -> Self {
        Compartment {
            base: SBaseData::new(namespaces, TypeCode::Compartment),
            spatial_dimensions: None,
            size: None,
            units: None,
            constant: None,
        }
    }

    pub fn spatial_dimensions(&self) -> Option<f64> {
        self.spatial_dimensions
    }

    pub fn set_spatial_dimensions(&mut self, value: f64) -> OperationResult {
        if value.is_nan() || value < 0.0 {
            return Err(OperationError::InvalidAttributeValue);
        }
        self.spatial_dimensions = Some(value);
        Ok(())
    }

    pub fn unset_spatial_dimensions(&mut self) {
        self.spatial_dimensions = None;
    }

    pub fn size(&self) -> Option<f64> {
        self.size
    }

    pub fn set_size(&mut self, value: f64) {
        self.size = Some(value);
    }

    pub fn unset_size(&mut self) {
        self.size = None;
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

    pub fn unset_constant(&mut self) {
        self.constant = None;
    }
}

impl SBase for Compartment {
    sbase_boilerplate!();

    fn type_code(&self) -> TypeCode {
        TypeCode::Compartment
    }

    fn element_name(&self) -> &'static str {
        "compartment"
    }

    fn add_expected_attributes(&self, expected: &mut ExpectedAttributes) {
        add_base_expected_attributes(self, expected);
        for name in ["spatialDimensions", "size", "units", "constant"] {
            expected.add(name, "");
        }
    }

    fn read_attributes(
        &mut self,
        attrs: &XmlAttributes,
        expected: &ExpectedAttributes,
        log: &mut ErrorLog,
    ) {
        read_base_and_reclassify(self, attrs, expected, log, ALLOWED_ATTRIBUTES_ON_COMPARTMENT);
        let strict = self.level() >= 3;
        let reader = AttributeReader::new(self, attrs, "", ALLOWED_ATTRIBUTES_ON_COMPARTMENT);
        if strict {
            reader.require("id", log);
        }
        self.spatial_dimensions = reader.double("spatialDimensions", false, log);
        self.size = reader.double("size", false, log);
        self.units = reader.sid_ref("units", false, log);
        self.constant = reader.boolean("constant", strict, log);
    }

    fn write_attributes(&self, out: &mut XmlOutputStream<'_>) {
        write_base_attributes(self, out);
        if let Some(dims) = self.spatial_dimensions {
            out.write_double_attribute("", "spatialDimensions", dims);
        }
        if let Some(size) = self.size {
            out.write_double_attribute("", "size", size);
        }
        if let Some(units) = &self.units {
            out.write_attribute("", "units", units);
        }
        if let Some(constant) = self.constant {
            out.write_bool_attribute("", "constant", constant);
        }
    }
}
