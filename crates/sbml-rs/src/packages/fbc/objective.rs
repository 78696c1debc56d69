// crates/sbml-rs/src/packages/fbc/objective.rs

//! Objective functions: linear combinations of reaction fluxes to optimize.

use super::FBC_PACKAGE;
use super::errors::{
    FBC_ACTIVE_OBJECTIVE_MUST_EXIST, FBC_ALLOWED_ATTRIBUTES_ON_FLUX_OBJECTIVE,
    FBC_ALLOWED_ATTRIBUTES_ON_LIST_OF_OBJECTIVES, FBC_ALLOWED_ATTRIBUTES_ON_OBJECTIVE,
    FBC_FLUX_OBJECTIVE_REACTION_MUST_EXIST,
};
use crate::error::{ErrorLog, SbmlConstructorError, SbmlError};
use crate::list_of::{ListOf, ListOfKind, list_accessors};
use crate::model::Model;
use crate::namespaces::SbmlNamespaces;
use crate::sbase::{
    AttributeReader, SBase, SBaseData, add_base_expected_attributes, read_base_and_reclassify,
    sbase_boilerplate, write_base_attributes, write_element,
};
use crate::types::{OperationError, OperationResult, TypeCode, is_valid_sid};
use crate::xml::{ExpectedAttributes, XmlAttributes, XmlOutputStream, XmlTriple};

fn new_objective(ns: &SbmlNamespaces) -> Box<dyn SBase> {
    Box::new(Objective::with_namespaces(ns.clone()))
}

fn new_flux_objective(ns: &SbmlNamespaces) -> Box<dyn SBase> {
    Box::new(FluxObjective::with_namespaces(ns.clone()))
}

pub(crate) static LIST_OF_OBJECTIVES: ListOfKind = ListOfKind {
    element_name: "listOfObjectives",
    package: FBC_PACKAGE,
    item_element: "objective",
    item_type: TypeCode::FbcObjective,
    create: new_objective,
    accepts: None,
    allowed_attributes: Some(FBC_ALLOWED_ATTRIBUTES_ON_LIST_OF_OBJECTIVES),
};

static LIST_OF_FLUX_OBJECTIVES: ListOfKind = ListOfKind {
    element_name: "listOfFluxObjectives",
    package: FBC_PACKAGE,
    item_element: "fluxObjective",
    item_type: TypeCode::FbcFluxObjective,
    create: new_flux_objective,
    accepts: None,
    allowed_attributes: None,
};

/// Direction of optimization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectiveType {
    Maximize,
    Minimize,
}

impl ObjectiveType {
    pub fn as_str(self) -> &'static str {
        match self {
            ObjectiveType::Maximize => "maximize",
            ObjectiveType::Minimize => "minimize",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "maximize" => Some(ObjectiveType::Maximize),
            "minimize" => Some(ObjectiveType::Minimize),
            _ => None,
        }
    }
}

/// The objectives of a model, one of which is active.
#[derive(Debug, Clone)]
pub struct ListOfObjectives {
    list: ListOf,
    active_objective: Option<String>,
}

impl ListOfObjectives {
    pub fn with_namespaces(namespaces: SbmlNamespaces) -> Self {
        ListOfObjectives {
            list: ListOf::of_kind(&LIST_OF_OBJECTIVES, namespaces),
            active_objective: None,
        }
    }

    pub fn active_objective(&self) -> Option<&str> {
        self.active_objective.as_deref()
    }

    pub fn set_active_objective(&mut self, id: &str) -> OperationResult {
        if !is_valid_sid(id) {
            return Err(OperationError::InvalidAttributeValue);
        }
        self.active_objective = Some(id.to_string());
        Ok(())
    }

    pub fn unset_active_objective(&mut self) {
        self.active_objective = None;
    }

    list_accessors!(
        list: Objective,
        add: add_objective,
        create: create_objective,
        get: get_objective,
        get_mut: get_objective_mut,
        get_by_id: get_objective_by_id,
        remove: remove_objective,
        num: num_objectives,
        list: as_list,
        list_mut: as_list_mut,
    );
}

impl SBase for ListOfObjectives {
    sbase_boilerplate!(delegate list);

    fn type_code(&self) -> TypeCode {
        TypeCode::ListOf
    }

    fn element_name(&self) -> &'static str {
        LIST_OF_OBJECTIVES.element_name
    }

    fn package_name(&self) -> &'static str {
        FBC_PACKAGE
    }

    fn children(&self) -> Vec<&dyn SBase> {
        self.list.children()
    }

    fn children_mut(&mut self) -> Vec<&mut dyn SBase> {
        self.list.children_mut()
    }

    fn add_expected_attributes(&self, expected: &mut ExpectedAttributes) {
        add_base_expected_attributes(self, expected);
        expected.add("activeObjective", self.namespaces().attribute_uri_for(FBC_PACKAGE));
    }

    fn read_attributes(
        &mut self,
        attrs: &XmlAttributes,
        expected: &ExpectedAttributes,
        log: &mut ErrorLog,
    ) {
        let code = FBC_ALLOWED_ATTRIBUTES_ON_LIST_OF_OBJECTIVES;
        read_base_and_reclassify(self, attrs, expected, log, code);
        let uri = self.namespaces().attribute_uri_for(FBC_PACKAGE);
        let reader = AttributeReader::new(self, attrs, uri, code);
        self.active_objective = reader.sid_ref("activeObjective", true, log);
    }

    fn write_attributes(&self, out: &mut XmlOutputStream<'_>) {
        write_base_attributes(self, out);
        if let Some(active) = &self.active_objective {
            let prefix = self.namespaces().prefix_for(FBC_PACKAGE);
            out.write_attribute(&prefix, "activeObjective", active);
        }
    }

    fn create_object(&mut self, start: &XmlTriple) -> Option<&mut dyn SBase> {
        self.list.create_object(start)
    }

    fn write_elements(&self, out: &mut XmlOutputStream<'_>) {
        self.list.write_elements(out);
    }

    fn should_write(&self) -> bool {
        self.list.should_write() || self.active_objective.is_some()
    }

    fn on_read_finished(&mut self, log: &mut ErrorLog) {
        self.list.on_read_finished(log);
    }

    fn check_references(&self, _model: &Model, log: &mut ErrorLog) {
        let Some(active) = self.active_objective() else {
            return;
        };
        if self.get_objective_by_id(active).is_none() {
            log.log(
                SbmlError::new(
                    FBC_ACTIVE_OBJECTIVE_MUST_EXIST,
                    format!("The active objective '{}' is not defined.", active),
                )
                .with_level_version(self.level(), self.version())
                .at(self.line(), self.column()),
            );
        }
    }
}

/// One objective function.
#[derive(Debug, Clone)]
pub struct Objective {
    base: SBaseData,
    objective_type: Option<ObjectiveType>,
    flux_objectives: ListOf,
}

impl Objective {
    pub fn new(level: u32, version: u32, package_version: u32) -> Result<Self, SbmlConstructorError> {
        let ns = SbmlNamespaces::with_package(level, version, FBC_PACKAGE, package_version)?;
        Ok(Self::with_namespaces(ns))
    }

    pub fn with_namespaces(namespaces: SbmlNamespaces) -> Self {
        let mut objective = Objective {
            base: SBaseData::new(namespaces.clone(), TypeCode::FbcObjective),
            objective_type: None,
            flux_objectives: ListOf::of_kind(&LIST_OF_FLUX_OBJECTIVES, namespaces),
        };
        objective.connect_to_child();
        objective
    }

    pub fn objective_type(&self) -> Option<ObjectiveType> {
        self.objective_type
    }

    pub fn set_objective_type(&mut self, objective_type: ObjectiveType) {
        self.objective_type = Some(objective_type);
    }

    list_accessors!(
        flux_objectives: FluxObjective,
        add: add_flux_objective,
        create: create_flux_objective,
        get: get_flux_objective,
        get_mut: get_flux_objective_mut,
        get_by_id: get_flux_objective_by_id,
        remove: remove_flux_objective,
        num: num_flux_objectives,
        list: list_of_flux_objectives,
        list_mut: list_of_flux_objectives_mut,
    );
}

impl SBase for Objective {
    sbase_boilerplate!();

    fn type_code(&self) -> TypeCode {
        TypeCode::FbcObjective
    }

    fn element_name(&self) -> &'static str {
        "objective"
    }

    fn children(&self) -> Vec<&dyn SBase> {
        vec![&self.flux_objectives as &dyn SBase]
    }

    fn children_mut(&mut self) -> Vec<&mut dyn SBase> {
        vec![&mut self.flux_objectives as &mut dyn SBase]
    }

    fn add_expected_attributes(&self, expected: &mut ExpectedAttributes) {
        add_base_expected_attributes(self, expected);
        expected.add("type", self.namespaces().attribute_uri_for(FBC_PACKAGE));
    }

    fn read_attributes(
        &mut self,
        attrs: &XmlAttributes,
        expected: &ExpectedAttributes,
        log: &mut ErrorLog,
    ) {
        let code = FBC_ALLOWED_ATTRIBUTES_ON_OBJECTIVE;
        read_base_and_reclassify(self, attrs, expected, log, code);
        let uri = self.namespaces().attribute_uri_for(FBC_PACKAGE);
        let reader = AttributeReader::new(self, attrs, uri, code);
        reader.require("id", log);
        self.objective_type = reader.enumerated("type", true, log, ObjectiveType::parse);
    }

    fn write_attributes(&self, out: &mut XmlOutputStream<'_>) {
        write_base_attributes(self, out);
        if let Some(objective_type) = self.objective_type {
            let prefix = self.namespaces().prefix_for(FBC_PACKAGE);
            out.write_attribute(&prefix, "type", objective_type.as_str());
        }
    }

    fn create_object(&mut self, start: &XmlTriple) -> Option<&mut dyn SBase> {
        let fbc_uri = self.namespaces().attribute_uri_for(FBC_PACKAGE);
        if start.uri == fbc_uri && start.name == LIST_OF_FLUX_OBJECTIVES.element_name {
            Some(&mut self.flux_objectives as &mut dyn SBase)
        } else {
            None
        }
    }

    fn write_elements(&self, out: &mut XmlOutputStream<'_>) {
        write_element(&self.flux_objectives, out);
    }
}

/// A reaction flux and its weight in an objective.
#[derive(Debug, Clone)]
pub struct FluxObjective {
    base: SBaseData,
    reaction: Option<String>,
    coefficient: Option<f64>,
}

impl FluxObjective {
    pub fn new(level: u32, version: u32, package_version: u32) -> Result<Self, SbmlConstructorError> {
        let ns = SbmlNamespaces::with_package(level, version, FBC_PACKAGE, package_version)?;
        Ok(Self::with_namespaces(ns))
    }

    pub fn with_namespaces(namespaces: SbmlNamespaces) -> Self {
        FluxObjective {
            base: SBaseData::new(namespaces, TypeCode::FbcFluxObjective),
            reaction: None,
            coefficient: None,
        }
    }

    pub fn reaction(&self) -> Option<&str> {
        self.reaction.as_deref()
    }

    pub fn set_reaction(&mut self, reaction: &str) -> OperationResult {
        if !is_valid_sid(reaction) {
            return Err(OperationError::InvalidAttributeValue);
        }
        self.reaction = Some(reaction.to_string());
        Ok(())
    }

    pub fn coefficient(&self) -> Option<f64> {
        self.coefficient
    }

    pub fn set_coefficient(&mut self, coefficient: f64) {
        self.coefficient = Some(coefficient);
    }
}

impl SBase for FluxObjective {
    sbase_boilerplate!();

    fn type_code(&self) -> TypeCode {
        TypeCode::FbcFluxObjective
    }

    fn element_name(&self) -> &'static str {
        "fluxObjective"
    }

    fn add_expected_attributes(&self, expected: &mut ExpectedAttributes) {
        add_base_expected_attributes(self, expected);
        let uri = self.namespaces().attribute_uri_for(FBC_PACKAGE);
        expected.add("reaction", uri);
        expected.add("coefficient", uri);
    }

    fn read_attributes(
        &mut self,
        attrs: &XmlAttributes,
        expected: &ExpectedAttributes,
        log: &mut ErrorLog,
    ) {
        let code = FBC_ALLOWED_ATTRIBUTES_ON_FLUX_OBJECTIVE;
        read_base_and_reclassify(self, attrs, expected, log, code);
        let uri = self.namespaces().attribute_uri_for(FBC_PACKAGE);
        let reader = AttributeReader::new(self, attrs, uri, code);
        self.reaction = reader.sid_ref("reaction", true, log);
        self.coefficient = reader.double("coefficient", true, log);
    }

    fn write_attributes(&self, out: &mut XmlOutputStream<'_>) {
        write_base_attributes(self, out);
        let prefix = self.namespaces().prefix_for(FBC_PACKAGE);
        if let Some(reaction) = &self.reaction {
            out.write_attribute(&prefix, "reaction", reaction);
        }
        if let Some(coefficient) = self.coefficient {
            out.write_double_attribute(&prefix, "coefficient", coefficient);
        }
    }

    fn check_references(&self, model: &Model, log: &mut ErrorLog) {
        let Some(reaction) = self.reaction() else {
            return;
        };
        if model.get_reaction_by_id(reaction).is_none() {
            log.log(
                SbmlError::new(
                    FBC_FLUX_OBJECTIVE_REACTION_MUST_EXIST,
                    format!("The reaction '{}' is not defined.", reaction),
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
    use crate::sbase::qualified_element_name;

    #[test]
    fn test_objective_type_parse() {
        assert_eq!(ObjectiveType::parse("maximize"), Some(ObjectiveType::Maximize));
        assert_eq!(ObjectiveType::parse("Maximize"), None);
        assert_eq!(ObjectiveType::Minimize.as_str(), "minimize");
    }

    #[test]
    fn test_list_of_objectives_is_written_with_active_only() {
        let ns = SbmlNamespaces::with_package(3, 1, "fbc", 2).unwrap();
        let mut list = ListOfObjectives::with_namespaces(ns);
        assert!(!list.should_write());
        list.set_active_objective("obj").unwrap();
        assert!(list.should_write());
        assert_eq!(qualified_element_name(&list), "fbc:listOfObjectives");
    }

    #[test]
    fn test_flux_objectives_are_owned() {
        let mut objective = Objective::new(3, 1, 2).unwrap();
        objective.set_id("obj").unwrap();
        let flux = objective.create_flux_objective().unwrap();
        flux.set_reaction("R1").unwrap();
        flux.set_coefficient(1.0);
        let flux = objective.get_flux_objective(0).unwrap();
        assert_eq!(flux.parent().unwrap().element_name, "listOfFluxObjectives");
        assert_eq!(objective.num_flux_objectives(), 1);
    }
}
