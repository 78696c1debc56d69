// crates/sbml-rs/src/packages/fbc/gene_product.rs

use super::FBC_PACKAGE;
use super::errors::{
    FBC_ALLOWED_ATTRIBUTES_ON_GENE_PRODUCT, FBC_GENE_PRODUCT_ASSOCIATED_SPECIES_MUST_EXIST,
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

/// A gene, or the product of a gene, that a reaction may depend on.
#[derive(Debug, Clone)]
pub struct GeneProduct {
    base: SBaseData,
    label: Option<String>,
    associated_species: Option<String>,
}

impl GeneProduct {
    pub fn new(level: u32, version: u32, package_version: u32) -> Result<Self, SbmlConstructorError> {
        let ns = SbmlNamespaces::with_package(level, version, FBC_PACKAGE, package_version)?;
        Ok(Self::with_namespaces(ns))
    }

    pub fn with_namespaces(namespaces: SbmlNamespaces) -> Self {
        GeneProduct {
            base: SBaseData::new(namespaces, TypeCode::FbcGeneProduct),
            label: None,
            associated_species: None,
        }
    }

    /// Free-text name of the gene, e.g. `b0001`.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn set_label(&mut self, label: &str) -> OperationResult {
        if label.is_empty() {
            return Err(OperationError::InvalidAttributeValue);
        }
        self.label = Some(label.to_string());
        Ok(())
    }

    pub fn unset_label(&mut self) {
        self.label = None;
    }

    pub fn associated_species(&self) -> Option<&str> {
        self.associated_species.as_deref()
    }

    pub fn set_associated_species(&mut self, species: &str) -> OperationResult {
        if !is_valid_sid(species) {
            return Err(OperationError::InvalidAttributeValue);
        }
        self.associated_species = Some(species.to_string());
        Ok(())
    }

    pub fn unset_associated_species(&mut self) {
        self.associated_species = None;
    }
}

impl SBase for GeneProduct {
    sbase_boilerplate!();

    fn type_code(&self) -> TypeCode {
        TypeCode::FbcGeneProduct
    }

    fn element_name(&self) -> &'static str {
        "geneProduct"
    }

    fn add_expected_attributes(&self, expected: &mut ExpectedAttributes) {
        add_base_expected_attributes(self, expected);
        let uri = self.namespaces().attribute_uri_for(FBC_PACKAGE);
        expected.add("label", uri);
        expected.add("associatedSpecies", uri);
    }

    fn read_attributes(
        &mut self,
        attrs: &XmlAttributes,
        expected: &ExpectedAttributes,
        log: &mut ErrorLog,
    ) {
        let code = FBC_ALLOWED_ATTRIBUTES_ON_GENE_PRODUCT;
        read_base_and_reclassify(self, attrs, expected, log, code);
        let uri = self.namespaces().attribute_uri_for(FBC_PACKAGE);
        let reader = AttributeReader::new(self, attrs, uri, code);
        reader.require("id", log);
        self.label = reader.string("label", true, log);
        self.associated_species = reader.sid_ref("associatedSpecies", false, log);
    }

    fn write_attributes(&self, out: &mut XmlOutputStream<'_>) {
        write_base_attributes(self, out);
        let prefix = self.namespaces().prefix_for(FBC_PACKAGE);
        if let Some(label) = &self.label {
            out.write_attribute(&prefix, "label", label);
        }
        if let Some(species) = &self.associated_species {
            out.write_attribute(&prefix, "associatedSpecies", species);
        }
    }

    fn check_references(&self, model: &Model, log: &mut ErrorLog) {
        let Some(species) = self.associated_species() else {
            return;
        };
        if model.get_species_by_id(species).is_none() {
            log.log(
                SbmlError::new(
                    FBC_GENE_PRODUCT_ASSOCIATED_SPECIES_MUST_EXIST,
                    format!(
                        "Gene product '{}' is associated with species '{}', which is not defined.",
                        self.id().unwrap_or_default(),
                        species
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
    fn test_setters() {
        let mut gp = GeneProduct::new(3, 1, 2).unwrap();
        assert_eq!(gp.package_name(), "fbc");
        assert_eq!(gp.package_version(), 2);
        assert_eq!(gp.set_label(""), Err(OperationError::InvalidAttributeValue));
        gp.set_label("b0001").unwrap();
        assert_eq!(gp.label(), Some("b0001"));
        assert_eq!(
            gp.set_associated_species("not an id"),
            Err(OperationError::InvalidAttributeValue)
        );
        assert!(gp.associated_species().is_none());
    }

    #[test]
    fn test_requires_fbc_namespace() {
        assert!(matches!(
            GeneProduct::new(2, 4, 2),
            Err(SbmlConstructorError::UnsupportedPackageVersion { .. })
        ));
    }
}
