// crates/sbml-rs/src/model/mod.rs

//! SBML core classes: the model and the components it owns.

mod compartment;
mod parameter;
mod reaction;
mod species;

pub use compartment::Compartment;
pub use parameter::Parameter;
pub use reaction::{Reaction, SpeciesReference};
pub use species::Species;

use crate::error::table::{
    ALLOWED_ATTRIBUTES_ON_LIST_OF_COMPARTMENTS, ALLOWED_ATTRIBUTES_ON_LIST_OF_PARAMETERS,
    ALLOWED_ATTRIBUTES_ON_LIST_OF_REACTIONS, ALLOWED_ATTRIBUTES_ON_LIST_OF_SPECIES,
    ALLOWED_ATTRIBUTES_ON_MODEL,
};
use crate::error::{ErrorLog, SbmlConstructorError};
use crate::list_of::{ListOf, ListOfKind, list_accessors};
use crate::namespaces::SbmlNamespaces;
use crate::sbase::{
    AttributeReader, SBase, SBaseData, add_base_expected_attributes, read_base_and_reclassify,
    sbase_boilerplate, write_base_attributes, write_element,
};
use crate::types::{OperationError, OperationResult, TypeCode, is_valid_sid};
use crate::xml::{ExpectedAttributes, XmlAttributes, XmlOutputStream, XmlTriple};

fn new_compartment(ns: &SbmlNamespaces) -> Box<dyn SBase> {
    Box::new(Compartment::with_namespaces(ns.clone()))
}

fn new_species(ns: &SbmlNamespaces) -> Box<dyn SBase> {
    Box::new(Species::with_namespaces(ns.clone()))
}

fn new_parameter(ns: &SbmlNamespaces) -> Box<dyn SBase> {
    Box::new(Parameter::with_namespaces(ns.clone()))
}

fn new_reaction(ns: &SbmlNamespaces) -> Box<dyn SBase> {
    Box::new(Reaction::with_namespaces(ns.clone()))
}

pub(crate) static LIST_OF_COMPARTMENTS: ListOfKind = ListOfKind {
    element_name: "listOfCompartments",
    package: "core",
    item_element: "compartment",
    item_type: TypeCode::Compartment,
    create: new_compartment,
    accepts: None,
    allowed_attributes: Some(ALLOWED_ATTRIBUTES_ON_LIST_OF_COMPARTMENTS),
};

pub(crate) static LIST_OF_SPECIES: ListOfKind = ListOfKind {
    element_name: "listOfSpecies",
    package: "core",
    item_element: "species",
    item_type: TypeCode::Species,
    create: new_species,
    accepts: None,
    allowed_attributes: Some(ALLOWED_ATTRIBUTES_ON_LIST_OF_SPECIES),
};

pub(crate) static LIST_OF_PARAMETERS: ListOfKind = ListOfKind {
    element_name: "listOfParameters",
    package: "core",
    item_element: "parameter",
    item_type: TypeCode::Parameter,
    create: new_parameter,
    accepts: None,
    allowed_attributes: Some(ALLOWED_ATTRIBUTES_ON_LIST_OF_PARAMETERS),
};

pub(crate) static LIST_OF_REACTIONS: ListOfKind = ListOfKind {
    element_name: "listOfReactions",
    package: "core",
    item_element: "reaction",
    item_type: TypeCode::Reaction,
    create: new_reaction,
    accepts: None,
    allowed_attributes: Some(ALLOWED_ATTRIBUTES_ON_LIST_OF_REACTIONS),
};

/// Level 3 model-wide unit attributes, in the order they are written.
const UNIT_ATTRIBUTES: [&str; 6] = [
    "substanceUnits",
    "timeUnits",
    "volumeUnits",
    "areaUnits",
    "lengthUnits",
    "extentUnits",
];

/// The model: owner of every compartment, species, parameter and reaction.
#[derive(Debug, Clone)]
pub struct Model {
    base: SBaseData,
    /// Values of [`UNIT_ATTRIBUTES`], by position.
    units: [Option<String>; 6],
    conversion_factor: Option<String>,
    compartments: ListOf,
    species: ListOf,
    parameters: ListOf,
    reactions: ListOf,
}

impl Model {
    pub fn new(level: u32, version: u32) -> Result<Self, SbmlConstructorError> {
        Ok(Self::with_namespaces(SbmlNamespaces::new(level, version)?))
    }

    pub fn with_namespaces(namespaces: SbmlNamespaces) -> Self {
        let mut model = Model {
            base: SBaseData::new(namespaces.clone(), TypeCode::Model),
            units: Default::default(),
            conversion_factor: None,
            compartments: ListOf::of_kind(&LIST_OF_COMPARTMENTS, namespaces.clone()),
            species: ListOf::of_kind(&LIST_OF_SPECIES, namespaces.clone()),
            parameters: ListOf::of_kind(&LIST_OF_PARAMETERS, namespaces.clone()),
            reactions: ListOf::of_kind(&LIST_OF_REACTIONS, namespaces),
        };
        model.connect_to_child();
        model
    }

    list_accessors!(
        compartments: Compartment,
        add: add_compartment,
        create: create_compartment,
        get: get_compartment,
        get_mut: get_compartment_mut,
        get_by_id: get_compartment_by_id,
        remove: remove_compartment,
        num: num_compartments,
        list: list_of_compartments,
        list_mut: list_of_compartments_mut,
    );

    list_accessors!(
        species: Species,
        add: add_species,
        create: create_species,
        get: get_species,
        get_mut: get_species_mut,
        get_by_id: get_species_by_id,
        remove: remove_species,
        num: num_species,
        list: list_of_species,
        list_mut: list_of_species_mut,
    );

    list_accessors!(
        parameters: Parameter,
        add: add_parameter,
        create: create_parameter,
        get: get_parameter,
        get_mut: get_parameter_mut,
        get_by_id: get_parameter_by_id,
        remove: remove_parameter,
        num: num_parameters,
        list: list_of_parameters,
        list_mut: list_of_parameters_mut,
    );

    list_accessors!(
        reactions: Reaction,
        add: add_reaction,
        create: create_reaction,
        get: get_reaction,
        get_mut: get_reaction_mut,
        get_by_id: get_reaction_by_id,
        remove: remove_reaction,
        num: num_reactions,
        list: list_of_reactions,
        list_mut: list_of_reactions_mut,
    );

    fn unit_slot(name: &str) -> Option<usize> {
        UNIT_ATTRIBUTES.iter().position(|n| *n == name)
    }

    /// Value of a model-wide unit attribute such as `"timeUnits"`.
    pub fn unit(&self, attribute: &str) -> Option<&str> {
        Self::unit_slot(attribute).and_then(|i| self.units[i].as_deref())
    }

    /// Sets a model-wide unit attribute. Level 3 only.
    pub fn set_unit(&mut self, attribute: &str, units: &str) -> OperationResult {
        if self.level() < 3 {
            return Err(OperationError::UnexpectedAttribute);
        }
        let slot = Self::unit_slot(attribute).ok_or(OperationError::UnexpectedAttribute)?;
        if !is_valid_sid(units) {
            return Err(OperationError::InvalidAttributeValue);
        }
        self.units[slot] = Some(units.to_string());
        Ok(())
    }

    pub fn unset_unit(&mut self, attribute: &str) {
        if let Some(slot) = Self::unit_slot(attribute) {
            self.units[slot] = None;
        }
    }

    pub fn substance_units(&self) -> Option<&str> {
        self.unit("substanceUnits")
    }

    pub fn time_units(&self) -> Option<&str> {
        self.unit("timeUnits")
    }

    pub fn extent_units(&self) -> Option<&str> {
        self.unit("extentUnits")
    }

    pub fn conversion_factor(&self) -> Option<&str> {
        self.conversion_factor.as_deref()
    }

    pub fn set_conversion_factor(&mut self, parameter: &str) -> OperationResult {
        if self.level() < 3 {
            return Err(OperationError::UnexpectedAttribute);
        }
        if !is_valid_sid(parameter) {
            return Err(OperationError::InvalidAttributeValue);
        }
        self.conversion_factor = Some(parameter.to_string());
        Ok(())
    }

    pub fn unset_conversion_factor(&mut self) {
        self.conversion_factor = None;
    }
}

impl SBase for Model {
    sbase_boilerplate!();

    fn type_code(&self) -> TypeCode {
        TypeCode::Model
    }

    fn element_name(&self) -> &'static str {
        "model"
    }

    fn children(&self) -> Vec<&dyn SBase> {
        vec![
            &self.compartments as &dyn SBase,
            &self.species,
            &self.parameters,
            &self.reactions,
        ]
    }

    fn children_mut(&mut self) -> Vec<&mut dyn SBase> {
        vec![
            &mut self.compartments as &mut dyn SBase,
            &mut self.species,
            &mut self.parameters,
            &mut self.reactions,
        ]
    }

    fn add_expected_attributes(&self, expected: &mut ExpectedAttributes) {
        add_base_expected_attributes(self, expected);
        if self.level() >= 3 {
            for name in UNIT_ATTRIBUTES {
                expected.add(name, "");
            }
            expected.add("conversionFactor", "");
        }
    }

    fn read_attributes(
        &mut self,
        attrs: &XmlAttributes,
        expected: &ExpectedAttributes,
        log: &mut ErrorLog,
    ) {
        read_base_and_reclassify(self, attrs, expected, log, ALLOWED_ATTRIBUTES_ON_MODEL);
        if self.level() < 3 {
            return;
        }
        let reader = AttributeReader::new(self, attrs, "", ALLOWED_ATTRIBUTES_ON_MODEL);
        for (slot, name) in UNIT_ATTRIBUTES.iter().enumerate() {
            self.units[slot] = reader.sid_ref(name, false, log);
        }
        self.conversion_factor = reader.sid_ref("conversionFactor", false, log);
    }

    fn write_attributes(&self, out: &mut XmlOutputStream<'_>) {
        write_base_attributes(self, out);
        for (name, value) in UNIT_ATTRIBUTES.iter().zip(self.units.iter()) {
            if let Some(value) = value {
                out.write_attribute("", name, value);
            }
        }
        if let Some(factor) = &self.conversion_factor {
            out.write_attribute("", "conversionFactor", factor);
        }
    }

    fn create_object(&mut self, start: &XmlTriple) -> Option<&mut dyn SBase> {
        if start.uri != self.namespaces().core_uri() {
            return None;
        }
        let list: &mut dyn SBase = match start.name.as_str() {
            "listOfCompartments" => &mut self.compartments,
            "listOfSpecies" => &mut self.species,
            "listOfParameters" => &mut self.parameters,
            "listOfReactions" => &mut self.reactions,
            _ => return None,
        };
        Some(list)
    }

    fn write_elements(&self, out: &mut XmlOutputStream<'_>) {
        for list in self.children() {
            write_element(list, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_rejects_duplicate_ids() {
        let mut model = Model::new(3, 2).unwrap();
        let mut c = Compartment::new(3, 2).unwrap();
        c.set_id("cell").unwrap();
        model.add_compartment(&c).unwrap();
        assert_eq!(model.add_compartment(&c), Err(OperationError::DuplicateObjectId));
        assert_eq!(model.num_compartments(), 1);
    }

    #[test]
    fn test_add_rejects_level_mismatch() {
        let mut model = Model::new(3, 2).unwrap();
        let p = Parameter::new(2, 4).unwrap();
        assert_eq!(model.add_parameter(&p), Err(OperationError::LevelMismatch));
    }

    #[test]
    fn test_create_and_remove() {
        let mut model = Model::new(3, 1).unwrap();
        model.create_parameter().unwrap().set_id("k1").unwrap();
        model.create_parameter().unwrap().set_id("k2").unwrap();
        assert_eq!(model.get_parameter_by_id("k2").unwrap().id(), Some("k2"));

        let removed = model.remove_parameter(0).unwrap();
        assert_eq!(removed.id(), Some("k1"));
        assert!(removed.parent().is_none());
        assert_eq!(model.num_parameters(), 1);
        assert!(model.remove_parameter(5).is_none());
    }

    #[test]
    fn test_units_are_level_3_only() {
        let mut l2 = Model::new(2, 4).unwrap();
        assert_eq!(l2.set_unit("timeUnits", "second"), Err(OperationError::UnexpectedAttribute));
        let mut l3 = Model::new(3, 2).unwrap();
        l3.set_unit("timeUnits", "second").unwrap();
        assert_eq!(l3.time_units(), Some("second"));
        assert_eq!(l3.set_unit("bogusUnits", "x"), Err(OperationError::UnexpectedAttribute));
    }

    #[test]
    fn test_lists_know_their_owner() {
        let model = Model::new(3, 2).unwrap();
        let link = model.list_of_species().parent().unwrap();
        assert_eq!(link.type_code, TypeCode::Model);
        assert_eq!(link.element_name, "model");
    }
}
