// crates/sbml-rs/src/packages/qual/plugins.rs

use super::QUAL_PACKAGE;
use super::qualitative_species::QualitativeSpecies;
use super::transition::Transition;
use crate::list_of::{ListOf, ListOfKind, list_accessors};
use crate::model::Model;
use crate::namespaces::SbmlNamespaces;
use crate::sbase::{SBase, SBasePlugin, plugin_boilerplate, write_element};
use crate::types::TypeCode;
use crate::xml::{XmlOutputStream, XmlTriple};

fn new_qualitative_species(ns: &SbmlNamespaces) -> Box<dyn SBase> {
    Box::new(QualitativeSpecies::with_namespaces(ns.clone()))
}

fn new_transition(ns: &SbmlNamespaces) -> Box<dyn SBase> {
    Box::new(Transition::with_namespaces(ns.clone()))
}

static LIST_OF_QUALITATIVE_SPECIES: ListOfKind = ListOfKind {
    element_name: "listOfQualitativeSpecies",
    package: QUAL_PACKAGE,
    item_element: "qualitativeSpecies",
    item_type: TypeCode::QualQualitativeSpecies,
    create: new_qualitative_species,
    accepts: None,
    allowed_attributes: None,
};

static LIST_OF_TRANSITIONS: ListOfKind = ListOfKind {
    element_name: "listOfTransitions",
    package: QUAL_PACKAGE,
    item_element: "transition",
    item_type: TypeCode::QualTransition,
    create: new_transition,
    accepts: None,
    allowed_attributes: None,
};

/// qual on `<model>`: the qualitative species and the transitions.
#[derive(Debug, Clone)]
pub struct QualModelPlugin {
    ns: SbmlNamespaces,
    qualitative_species: ListOf,
    transitions: ListOf,
}

impl QualModelPlugin {
    pub(crate) fn new(ns: &SbmlNamespaces) -> Self {
        QualModelPlugin {
            ns: ns.clone(),
            qualitative_species: ListOf::of_kind(&LIST_OF_QUALITATIVE_SPECIES, ns.clone()),
            transitions: ListOf::of_kind(&LIST_OF_TRANSITIONS, ns.clone()),
        }
    }

    list_accessors!(
        qualitative_species: QualitativeSpecies,
        add: add_qualitative_species,
        create: create_qualitative_species,
        get: get_qualitative_species,
        get_mut: get_qualitative_species_mut,
        get_by_id: get_qualitative_species_by_id,
        remove: remove_qualitative_species,
        num: num_qualitative_species,
        list: list_of_qualitative_species,
        list_mut: list_of_qualitative_species_mut,
    );

    list_accessors!(
        transitions: Transition,
        add: add_transition,
        create: create_transition,
        get: get_transition,
        get_mut: get_transition_mut,
        get_by_id: get_transition_by_id,
        remove: remove_transition,
        num: num_transitions,
        list: list_of_transitions,
        list_mut: list_of_transitions_mut,
    );
}

impl SBasePlugin for QualModelPlugin {
    plugin_boilerplate!(QUAL_PACKAGE);

    fn create_object(&mut self, start: &XmlTriple) -> Option<&mut dyn SBase> {
        if start.uri != self.uri() {
            return None;
        }
        match start.name.as_str() {
            "listOfQualitativeSpecies" => Some(&mut self.qualitative_species as &mut dyn SBase),
            "listOfTransitions" => Some(&mut self.transitions as &mut dyn SBase),
            _ => None,
        }
    }

    fn write_elements(&self, out: &mut XmlOutputStream<'_>) {
        write_element(&self.qualitative_species, out);
        write_element(&self.transitions, out);
    }

    fn children(&self) -> Vec<&dyn SBase> {
        vec![&self.qualitative_species as &dyn SBase, &self.transitions]
    }

    fn children_mut(&mut self) -> Vec<&mut dyn SBase> {
        vec![
            &mut self.qualitative_species as &mut dyn SBase,
            &mut self.transitions,
        ]
    }
}

impl Model {
    /// The qual extension of this model, if qual is enabled.
    pub fn qual(&self) -> Option<&QualModelPlugin> {
        self.get_plugin(QUAL_PACKAGE)?.downcast_ref()
    }

    pub fn qual_mut(&mut self) -> Option<&mut QualModelPlugin> {
        self.get_plugin_mut(QUAL_PACKAGE)?.downcast_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::SbmlDocument;
    use crate::error::ErrorLog;
    use crate::packages::qual::errors::{
        QUAL_COMPARTMENT_MUST_EXIST, QUAL_OUTPUT_SPECIES_NOT_CONSTANT, QUAL_RESULT_LEVEL_EXCEEDS_MAX,
    };
    use crate::packages::qual::OutputTransitionEffect;
    use crate::sbase::walk;

    fn qual_document() -> SbmlDocument {
        let mut doc = SbmlDocument::new(3, 1).unwrap();
        doc.enable_package("qual", 1, "qual").unwrap();
        doc.create_model().set_id("m").unwrap();
        doc
    }

    #[test]
    fn test_required_by_default() {
        let doc = qual_document();
        assert_eq!(doc.package_required("qual"), Some(true));
        assert!(doc.model().unwrap().qual().is_some());
    }

    #[test]
    fn test_reference_checks() {
        let mut doc = qual_document();
        let model = doc.model_mut().unwrap();
        model.create_compartment().unwrap().set_id("cell").unwrap();
        let qual = model.qual_mut().unwrap();
        let a = qual.create_qualitative_species().unwrap();
        a.set_id("A").unwrap();
        a.set_compartment("cell").unwrap();
        a.set_constant(true);
        a.set_max_level(1);
        let b = qual.create_qualitative_species().unwrap();
        b.set_id("B").unwrap();
        b.set_compartment("nucleus").unwrap();
        b.set_constant(false);

        let t = qual.create_transition().unwrap();
        let out = t.create_output().unwrap();
        out.set_qualitative_species("A").unwrap();
        out.set_transition_effect(OutputTransitionEffect::AssignmentLevel);
        t.list_of_function_terms_mut().create_default_term().set_result_level(2);

        let model = doc.model().unwrap();
        let mut log = ErrorLog::new();
        walk(model, &mut |el| el.check_references(model, &mut log));
        let codes: Vec<u32> = log.iter().map(|e| e.code()).collect();
        assert!(codes.contains(&QUAL_COMPARTMENT_MUST_EXIST));
        assert!(codes.contains(&QUAL_OUTPUT_SPECIES_NOT_CONSTANT));
        assert!(codes.contains(&QUAL_RESULT_LEVEL_EXCEEDS_MAX));
        assert_eq!(codes.len(), 3);
    }
}
