// crates/sbml-rs/src/model/reaction.rs

use super::Model;
use crate::error::table::{
    ALLOWED_ATTRIBUTES_ON_LIST_OF_SPECIES_REFERENCES, ALLOWED_ATTRIBUTES_ON_REACTION,
    ALLOWED_ATTRIBUTES_ON_SPECIES_REFERENCE, INVALID_SPECIES_REFERENCE,
};
use crate::error::{ErrorLog, SbmlConstructorError, SbmlError};
use crate::list_of::{ListOf, ListOfKind, list_accessors};
use crate::namespaces::SbmlNamespaces;
use crate::sbase::{
    AttributeReader, SBase, SBaseData, add_base_expected_attributes, read_base_and_reclassify,
    sbase_boilerplate, write_base_attributes, write_element,
};
use crate::types::{OperationError, OperationResult, TypeCode, is_valid_sid};
use crate::xml::{ExpectedAttributes, XmlAttributes, XmlOutputStream, XmlTriple};

fn new_species_reference(ns: &SbmlNamespaces) -> Box<dyn SBase> {
    Box::new(SpeciesReference::with_namespaces(ns.clone()))
}

pub(crate) static LIST_OF_REACTANTS: ListOfKind = ListOfKind {
    element_name: "listOfReactants",
    package: "core",
    item_element: "speciesReference",
    item_type: TypeCode::SpeciesReference,
    create: new_species_reference,
    accepts: None,
    allowed_attributes: Some(ALLOWED_ATTRIBUTES_ON_LIST_OF_SPECIES_REFERENCES),
};

pub(crate) static LIST_OF_PRODUCTS: ListOfKind = ListOfKind {
    element_name: "listOfProducts",
    package: "core",
    item_element: "speciesReference",
    item_type: TypeCode::SpeciesReference,
    create: new_species_reference,
    accepts: None,
    allowed_attributes: Some(ALLOWED_ATTRIBUTES_ON_LIST_OF_SPECIES_REFERENCES),
};

/// A process converting reactants into products.
#[derive(Debug, Clone)]
pub struct Reaction {
    base: SBaseData,
    reversible: Option<bool>,
    fast: Option<bool>,
    compartment: Option<String>,
    reactants: ListOf,
    products: ListOf,
}

impl Reaction {
    pub fn new(level: u32, version: u32) -> Result<Self, SbmlConstructorError> {
        Ok(Self::with_namespaces(SbmlNamespaces::new(level, version)?))
    }

    pub fn with_namespaces(namespaces: SbmlNamespaces) -> Self {
        let mut reaction = Reaction {
            base: SBaseData::new(namespaces.clone(), TypeCode::Reaction),
            reversible: None,
            fast: None,
            compartment: None,
            reactants: ListOf::of_kind(&LIST_OF_REACTANTS, namespaces.clone()),
            products: ListOf::of_kind(&LIST_OF_PRODUCTS, namespaces),
        };
        reaction.connect_to_child();
        reaction
    }

    pub fn reversible(&self) -> Option<bool> {
        self.reversible
    }

    pub fn set_reversible(&mut self, reversible: bool) {
        self.reversible = Some(reversible);
    }

    pub fn unset_reversible(&mut self) {
        self.reversible = None;
    }

    /// Removed in Level 3 Version 2.
    pub fn fast(&self) -> Option<bool> {
        self.fast
    }

    pub fn set_fast(&mut self, fast: bool) -> OperationResult {
        if (self.level(), self.version()) == (3, 2) {
            return Err(OperationError::UnexpectedAttribute);
        }
        self.fast = Some(fast);
        Ok(())
    }

    pub fn compartment(&self) -> Option<&str> {
        self.compartment.as_deref()
    }

    /// Only defined in Level 3.
    pub fn set_compartment(&mut self, compartment: &str) -> OperationResult {
        if self.level() < 3 {
            return Err(OperationError::UnexpectedAttribute);
        }
        if !is_valid_sid(compartment) {
            return Err(OperationError::InvalidAttributeValue);
        }
        self.compartment = Some(compartment.to_string());
        Ok(())
    }

    pub fn unset_compartment(&mut self) {
        self.compartment = None;
    }

    list_accessors!(
        reactants: SpeciesReference,
        add: add_reactant,
        create: create_reactant,
        get: get_reactant,
        get_mut: get_reactant_mut,
        get_by_id: get_reactant_by_id,
        remove: remove_reactant,
        num: num_reactants,
        list: list_of_reactants,
        list_mut: list_of_reactants_mut,
    );

    list_accessors!(
        products: SpeciesReference,
        add: add_product,
        create: create_product,
        get: get_product,
        get_mut: get_product_mut,
        get_by_id: get_product_by_id,
        remove: remove_product,
        num: num_products,
        list: list_of_products,
        list_mut: list_of_products_mut,
    );

    fn allows_fast(&self) -> bool {
        (self.level(), self.version()) != (3, 2)
    }
}

impl SBase for Reaction {
    sbase_boilerplate!();

    fn type_code(&self) -> TypeCode {
        TypeCode::Reaction
    }

    fn element_name(&self) -> &'static str {
        "reaction"
    }

    fn children(&self) -> Vec<&dyn SBase> {
        vec![&self.reactants as &dyn SBase, &self.products]
    }

    fn children_mut(&mut self) -> Vec<&mut dyn SBase> {
        vec![&mut self.reactants as &mut dyn SBase, &mut self.products]
    }

    fn add_expected_attributes(&self, expected: &mut ExpectedAttributes) {
        add_base_expected_attributes(self, expected);
        expected.add("reversible", "");
        if self.allows_fast() {
            expected.add("fast", "");
        }
        if self.level() >= 3 {
            expected.add("compartment", "");
        }
    }

    fn read_attributes(
        &mut self,
        attrs: &XmlAttributes,
        expected: &ExpectedAttributes,
        log: &mut ErrorLog,
    ) {
        read_base_and_reclassify(self, attrs, expected, log, ALLOWED_ATTRIBUTES_ON_REACTION);
        let level = self.level();
        let reader = AttributeReader::new(self, attrs, "", ALLOWED_ATTRIBUTES_ON_REACTION);
        reader.require("id", log);
        self.reversible = reader.boolean("reversible", level >= 3, log);
        if self.allows_fast() {
            let fast_required = (self.level(), self.version()) == (3, 1);
            self.fast = reader.boolean("fast", fast_required, log);
        }
        if level >= 3 {
            self.compartment = reader.sid_ref("compartment", false, log);
        }
    }

    fn write_attributes(&self, out: &mut XmlOutputStream<'_>) {
        write_base_attributes(self, out);
        if let Some(reversible) = self.reversible {
            out.write_bool_attribute("", "reversible", reversible);
        }
        if let Some(fast) = self.fast {
            out.write_bool_attribute("", "fast", fast);
        }
        if let Some(compartment) = &self.compartment {
            out.write_attribute("", "compartment", compartment);
        }
    }

    fn create_object(&mut self, start: &XmlTriple) -> Option<&mut dyn SBase> {
        if start.uri != self.namespaces().core_uri() {
            return None;
        }
        match start.name.as_str() {
            "listOfReactants" => Some(&mut self.reactants as &mut dyn SBase),
            "listOfProducts" => Some(&mut self.products as &mut dyn SBase),
            _ => None,
        }
    }

    fn write_elements(&self, out: &mut XmlOutputStream<'_>) {
        write_element(&self.reactants, out);
        write_element(&self.products, out);
    }
}

/// A participant of a reaction.
#[derive(Debug, Clone)]
pub struct SpeciesReference {
    base: SBaseData,
    species: Option<String>,
    stoichiometry: Option<f64>,
    constant: Option<bool>,
}

impl SpeciesReference {
    pub fn new(level: u32, version: u32) -> Result<Self, SbmlConstructorError> {
        Ok(Self::with_namespaces(SbmlNamespaces::new(level, version)?))
    }

    pub fn with_namespaces(namespaces: SbmlNamespaces) -> Self {
        SpeciesReference {
            base: SBaseData::new(namespaces, TypeCode::SpeciesReference),
            species: None,
            stoichiometry: None,
            constant: None,
        }
    }

    pub fn species(&self) -> Option<&str> {
        self.species.as_deref()
    }

    pub fn set_species(&mut self, species: &str) -> OperationResult {
        if !is_valid_sid(species) {
            return Err(OperationError::InvalidAttributeValue);
        }
        self.species = Some(species.to_string());
        Ok(())
    }

    pub fn stoichiometry(&self) -> Option<f64> {
        self.stoichiometry
    }

    pub fn set_stoichiometry(&mut self, value: f64) {
        self.stoichiometry = Some(value);
    }

    pub fn unset_stoichiometry(&mut self) {
        self.stoichiometry = None;
    }

    pub fn constant(&self) -> Option<bool> {
        self.constant
    }

    /// Only defined in Level 3.
    pub fn set_constant(&mut self, constant: bool) -> OperationResult {
        if self.level() < 3 {
            return Err(OperationError::UnexpectedAttribute);
        }
        self.constant = Some(constant);
        Ok(())
    }
}

impl SBase for SpeciesReference {
    sbase_boilerplate!();

    fn type_code(&self) -> TypeCode {
        TypeCode::SpeciesReference
    }

    fn element_name(&self) -> &'static str {
        "speciesReference"
    }

    fn add_expected_attributes(&self, expected: &mut ExpectedAttributes) {
        add_base_expected_attributes(self, expected);
        expected.add("species", "");
        expected.add("stoichiometry", "");
        if self.level() >= 3 {
            expected.add("constant", "");
        }
    }

    fn read_attributes(
        &mut self,
        attrs: &XmlAttributes,
        expected: &ExpectedAttributes,
        log: &mut ErrorLog,
    ) {
        read_base_and_reclassify(
            self,
            attrs,
            expected,
            log,
            ALLOWED_ATTRIBUTES_ON_SPECIES_REFERENCE,
        );
        let strict = self.level() >= 3;
        let reader =
            AttributeReader::new(self, attrs, "", ALLOWED_ATTRIBUTES_ON_SPECIES_REFERENCE);
        self.species = reader.sid_ref("species", true, log);
        self.stoichiometry = reader.double("stoichiometry", false, log);
        if strict {
            self.constant = reader.boolean("constant", true, log);
        }
    }

    fn write_attributes(&self, out: &mut XmlOutputStream<'_>) {
        write_base_attributes(self, out);
        if let Some(species) = &self.species {
            out.write_attribute("", "species", species);
        }
        if let Some(stoichiometry) = self.stoichiometry {
            out.write_double_attribute("", "stoichiometry", stoichiometry);
        }
        if let Some(constant) = self.constant {
            out.write_bool_attribute("", "constant", constant);
        }
    }

    fn check_references(&self, model: &Model, log: &mut ErrorLog) {
        let Some(species) = self.species() else {
            return;
        };
        if model.get_species_by_id(species).is_none() {
            log.log(
                SbmlError::new(
                    INVALID_SPECIES_REFERENCE,
                    format!("Species reference to '{}' names no species of the model.", species),
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
    fn test_reactants_and_products_are_separate() {
        let mut reaction = Reaction::new(3, 2).unwrap();
        reaction.create_reactant().unwrap().set_species("A").unwrap();
        reaction.create_product().unwrap().set_species("B").unwrap();
        reaction.create_product().unwrap().set_species("C").unwrap();
        assert_eq!(reaction.num_reactants(), 1);
        assert_eq!(reaction.num_products(), 2);
        assert_eq!(reaction.get_product(1).unwrap().species(), Some("C"));
        let link = reaction.get_reactant(0).unwrap().parent().unwrap();
        assert_eq!(link.element_name, "listOfReactants");
    }

    #[test]
    fn test_reactant_list_rejects_other_types() {
        let mut reaction = Reaction::new(3, 2).unwrap();
        let species = crate::model::Species::new(3, 2).unwrap();
        assert_eq!(
            reaction.list_of_reactants_mut().append(&species),
            Err(OperationError::InvalidObject)
        );
    }

    #[test]
    fn test_level_gated_setters() {
        let mut l2 = Reaction::new(2, 4).unwrap();
        assert_eq!(l2.set_compartment("c"), Err(OperationError::UnexpectedAttribute));
        assert!(l2.set_fast(false).is_ok());
        let mut l3v2 = Reaction::new(3, 2).unwrap();
        assert_eq!(l3v2.set_fast(false), Err(OperationError::UnexpectedAttribute));
        let mut sr = SpeciesReference::new(2, 4).unwrap();
        assert_eq!(sr.set_constant(true), Err(OperationError::UnexpectedAttribute));
    }
}
