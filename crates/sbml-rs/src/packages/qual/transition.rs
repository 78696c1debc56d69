// crates/sbml-rs/src/packages/qual/transition.rs

//! Transitions: how input levels determine output levels.

use super::QUAL_PACKAGE;
use super::errors::{
    QUAL_ALLOWED_ATTRIBUTES_ON_INPUT, QUAL_ALLOWED_ATTRIBUTES_ON_OUTPUT,
    QUAL_ALLOWED_ATTRIBUTES_ON_TRANSITION, QUAL_INPUT_SPECIES_MUST_EXIST,
    QUAL_OUTPUT_SPECIES_MUST_EXIST, QUAL_OUTPUT_SPECIES_NOT_CONSTANT,
    QUAL_RESULT_LEVEL_EXCEEDS_MAX, QUAL_TRANSITION_FUNCTION_TERMS_REQUIRED,
};
use super::function_term::ListOfFunctionTerms;
use super::qualitative_species::QualitativeSpecies;
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

fn new_input(ns: &SbmlNamespaces) -> Box<dyn SBase> {
    Box::new(Input::with_namespaces(ns.clone()))
}

fn new_output(ns: &SbmlNamespaces) -> Box<dyn SBase> {
    Box::new(Output::with_namespaces(ns.clone()))
}

static LIST_OF_INPUTS: ListOfKind = ListOfKind {
    element_name: "listOfInputs",
    package: QUAL_PACKAGE,
    item_element: "input",
    item_type: TypeCode::QualInput,
    create: new_input,
    accepts: None,
    allowed_attributes: None,
};

static LIST_OF_OUTPUTS: ListOfKind = ListOfKind {
    element_name: "listOfOutputs",
    package: QUAL_PACKAGE,
    item_element: "output",
    item_type: TypeCode::QualOutput,
    create: new_output,
    accepts: None,
    allowed_attributes: None,
};

/// Qualitative species referenced by `id`, if qual is enabled on `model`.
fn find_species<'m>(model: &'m Model, id: &str) -> Option<&'m QualitativeSpecies> {
    model.qual()?.get_qualitative_species_by_id(id)
}

fn report(el: &dyn SBase, code: u32, details: String, log: &mut ErrorLog) {
    log.log(
        SbmlError::new(code, details)
            .with_level_version(el.level(), el.version())
            .at(el.line(), el.column()),
    );
}

/// Direction in which an input influences the transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sign {
    Positive,
    Negative,
    Dual,
    Unknown,
}

impl Sign {
    pub fn as_str(self) -> &'static str {
        match self {
            Sign::Positive => "positive",
            Sign::Negative => "negative",
            Sign::Dual => "dual",
            Sign::Unknown => "unknown",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "positive" => Some(Sign::Positive),
            "negative" => Some(Sign::Negative),
            "dual" => Some(Sign::Dual),
            "unknown" => Some(Sign::Unknown),
            _ => None,
        }
    }
}

/// What firing the transition does to an input's level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputTransitionEffect {
    None,
    Consumption,
}

impl InputTransitionEffect {
    pub fn as_str(self) -> &'static str {
        match self {
            InputTransitionEffect::None => "none",
            InputTransitionEffect::Consumption => "consumption",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "none" => Some(InputTransitionEffect::None),
            "consumption" => Some(InputTransitionEffect::Consumption),
            _ => None,
        }
    }
}

/// How firing the transition sets an output's level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputTransitionEffect {
    Production,
    AssignmentLevel,
}

impl OutputTransitionEffect {
    pub fn as_str(self) -> &'static str {
        match self {
            OutputTransitionEffect::Production => "production",
            OutputTransitionEffect::AssignmentLevel => "assignmentLevel",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "production" => Some(OutputTransitionEffect::Production),
            "assignmentLevel" => Some(OutputTransitionEffect::AssignmentLevel),
            _ => None,
        }
    }
}

/// A change of level of some outputs, driven by the levels of some inputs.
#[derive(Debug, Clone)]
pub struct Transition {
    base: SBaseData,
    inputs: ListOf,
    outputs: ListOf,
    function_terms: ListOfFunctionTerms,
}

impl Transition {
    pub fn new(level: u32, version: u32, package_version: u32) -> Result<Self, SbmlConstructorError> {
        let ns = SbmlNamespaces::with_package(level, version, QUAL_PACKAGE, package_version)?;
        Ok(Self::with_namespaces(ns))
    }

    pub fn with_namespaces(namespaces: SbmlNamespaces) -> Self {
        let mut transition = Transition {
            base: SBaseData::new(namespaces.clone(), TypeCode::QualTransition),
            inputs: ListOf::of_kind(&LIST_OF_INPUTS, namespaces.clone()),
            outputs: ListOf::of_kind(&LIST_OF_OUTPUTS, namespaces.clone()),
            function_terms: ListOfFunctionTerms::with_namespaces(namespaces),
        };
        transition.connect_to_child();
        transition
    }

    list_accessors!(
        inputs: Input,
        add: add_input,
        create: create_input,
        get: get_input,
        get_mut: get_input_mut,
        get_by_id: get_input_by_id,
        remove: remove_input,
        num: num_inputs,
        list: list_of_inputs,
        list_mut: list_of_inputs_mut,
    );

    list_accessors!(
        outputs: Output,
        add: add_output,
        create: create_output,
        get: get_output,
        get_mut: get_output_mut,
        get_by_id: get_output_by_id,
        remove: remove_output,
        num: num_outputs,
        list: list_of_outputs,
        list_mut: list_of_outputs_mut,
    );

    pub fn list_of_function_terms(&self) -> &ListOfFunctionTerms {
        &self.function_terms
    }

    pub fn list_of_function_terms_mut(&mut self) -> &mut ListOfFunctionTerms {
        &mut self.function_terms
    }

    /// Input reading the qualitative species `species`.
    pub fn get_input_by_species(&self, species: &str) -> Option<&Input> {
        self.inputs
            .iter_as::<Input>()
            .find(|input| input.qualitative_species() == Some(species))
    }

    pub fn get_output_by_species(&self, species: &str) -> Option<&Output> {
        self.outputs
            .iter_as::<Output>()
            .find(|output| output.qualitative_species() == Some(species))
    }
}

impl SBase for Transition {
    sbase_boilerplate!();

    fn type_code(&self) -> TypeCode {
        TypeCode::QualTransition
    }

    fn element_name(&self) -> &'static str {
        "transition"
    }

    fn children(&self) -> Vec<&dyn SBase> {
        vec![
            &self.inputs as &dyn SBase,
            &self.outputs,
            &self.function_terms,
        ]
    }

    fn children_mut(&mut self) -> Vec<&mut dyn SBase> {
        vec![
            &mut self.inputs as &mut dyn SBase,
            &mut self.outputs,
            &mut self.function_terms,
        ]
    }

    fn read_attributes(
        &mut self,
        attrs: &XmlAttributes,
        expected: &ExpectedAttributes,
        log: &mut ErrorLog,
    ) {
        read_base_and_reclassify(self, attrs, expected, log, QUAL_ALLOWED_ATTRIBUTES_ON_TRANSITION);
    }

    fn create_object(&mut self, start: &XmlTriple) -> Option<&mut dyn SBase> {
        if start.uri != self.namespaces().attribute_uri_for(QUAL_PACKAGE) {
            return None;
        }
        let list: &mut dyn SBase = match start.name.as_str() {
            "listOfInputs" => &mut self.inputs,
            "listOfOutputs" => &mut self.outputs,
            "listOfFunctionTerms" => &mut self.function_terms,
            _ => return None,
        };
        Some(list)
    }

    fn write_elements(&self, out: &mut XmlOutputStream<'_>) {
        for list in self.children() {
            write_element(list, out);
        }
    }

    fn on_read_finished(&mut self, log: &mut ErrorLog) {
        if !self.function_terms.should_write() {
            let details = format!("Transition '{}' has no function terms.", self.id().unwrap_or_default());
            report(&*self, QUAL_TRANSITION_FUNCTION_TERMS_REQUIRED, details, log);
        }
    }

    fn check_references(&self, model: &Model, log: &mut ErrorLog) {
        let Some(highest) = self.function_terms.result_levels().max() else {
            return;
        };
        for output in self.outputs.iter_as::<Output>() {
            let Some(species) = output.qualitative_species().and_then(|id| find_species(model, id))
            else {
                continue;
            };
            if let Some(max) = species.max_level().filter(|max| highest > *max) {
                report(
                    self,
                    QUAL_RESULT_LEVEL_EXCEEDS_MAX,
                    format!(
                        "Transition '{}' can set '{}' to level {}, above its maximum {}.",
                        self.id().unwrap_or_default(),
                        species.id().unwrap_or_default(),
                        highest,
                        max
                    ),
                    log,
                );
            }
        }
    }
}

/// A qualitative species read by a transition.
#[derive(Debug, Clone)]
pub struct Input {
    base: SBaseData,
    qualitative_species: Option<String>,
    transition_effect: Option<InputTransitionEffect>,
    sign: Option<Sign>,
    threshold_level: Option<u32>,
}

impl Input {
    pub fn new(level: u32, version: u32, package_version: u32) -> Result<Self, SbmlConstructorError> {
        let ns = SbmlNamespaces::with_package(level, version, QUAL_PACKAGE, package_version)?;
        Ok(Self::with_namespaces(ns))
    }

    pub fn with_namespaces(namespaces: SbmlNamespaces) -> Self {
        Input {
            base: SBaseData::new(namespaces, TypeCode::QualInput),
            qualitative_species: None,
            transition_effect: None,
            sign: None,
            threshold_level: None,
        }
    }

    pub fn qualitative_species(&self) -> Option<&str> {
        self.qualitative_species.as_deref()
    }

    pub fn set_qualitative_species(&mut self, species: &str) -> OperationResult {
        if !is_valid_sid(species) {
            return Err(OperationError::InvalidAttributeValue);
        }
        self.qualitative_species = Some(species.to_string());
        Ok(())
    }

    pub fn transition_effect(&self) -> Option<InputTransitionEffect> {
        self.transition_effect
    }

    pub fn set_transition_effect(&mut self, effect: InputTransitionEffect) {
        self.transition_effect = Some(effect);
    }

    pub fn sign(&self) -> Option<Sign> {
        self.sign
    }

    pub fn set_sign(&mut self, sign: Sign) {
        self.sign = Some(sign);
    }

    pub fn unset_sign(&mut self) {
        self.sign = None;
    }

    /// Level at or above which the input counts as active.
    pub fn threshold_level(&self) -> Option<u32> {
        self.threshold_level
    }

    pub fn set_threshold_level(&mut self, level: u32) {
        self.threshold_level = Some(level);
    }

    pub fn unset_threshold_level(&mut self) {
        self.threshold_level = None;
    }
}

impl SBase for Input {
    sbase_boilerplate!();

    fn type_code(&self) -> TypeCode {
        TypeCode::QualInput
    }

    fn element_name(&self) -> &'static str {
        "input"
    }

    fn add_expected_attributes(&self, expected: &mut ExpectedAttributes) {
        add_base_expected_attributes(self, expected);
        let uri = self.namespaces().attribute_uri_for(QUAL_PACKAGE);
        for name in ["qualitativeSpecies", "transitionEffect", "sign", "thresholdLevel"] {
            expected.add(name, uri);
        }
    }

    fn read_attributes(
        &mut self,
        attrs: &XmlAttributes,
        expected: &ExpectedAttributes,
        log: &mut ErrorLog,
    ) {
        let code = QUAL_ALLOWED_ATTRIBUTES_ON_INPUT;
        read_base_and_reclassify(self, attrs, expected, log, code);
        let uri = self.namespaces().attribute_uri_for(QUAL_PACKAGE);
        let reader = AttributeReader::new(self, attrs, uri, code);
        self.qualitative_species = reader.sid_ref("qualitativeSpecies", true, log);
        self.transition_effect =
            reader.enumerated("transitionEffect", true, log, InputTransitionEffect::parse);
        self.sign = reader.enumerated("sign", false, log, Sign::parse);
        self.threshold_level = reader.non_negative_int("thresholdLevel", false, log);
    }

    fn write_attributes(&self, out: &mut XmlOutputStream<'_>) {
        write_base_attributes(self, out);
        let prefix = self.namespaces().prefix_for(QUAL_PACKAGE);
        if let Some(species) = &self.qualitative_species {
            out.write_attribute(&prefix, "qualitativeSpecies", species);
        }
        if let Some(effect) = self.transition_effect {
            out.write_attribute(&prefix, "transitionEffect", effect.as_str());
        }
        if let Some(sign) = self.sign {
            out.write_attribute(&prefix, "sign", sign.as_str());
        }
        if let Some(level) = self.threshold_level {
            out.write_int_attribute(&prefix, "thresholdLevel", i64::from(level));
        }
    }

    fn check_references(&self, model: &Model, log: &mut ErrorLog) {
        let Some(species) = self.qualitative_species() else {
            return;
        };
        if find_species(model, species).is_none() {
            report(
                self,
                QUAL_INPUT_SPECIES_MUST_EXIST,
                format!("The input species '{}' is not defined.", species),
                log,
            );
        }
    }
}

/// A qualitative species set by a transition.
#[derive(Debug, Clone)]
pub struct Output {
    base: SBaseData,
    qualitative_species: Option<String>,
    transition_effect: Option<OutputTransitionEffect>,
    output_level: Option<u32>,
}

impl Output {
    pub fn new(level: u32, version: u32, package_version: u32) -> Result<Self, SbmlConstructorError> {
        let ns = SbmlNamespaces::with_package(level, version, QUAL_PACKAGE, package_version)?;
        Ok(Self::with_namespaces(ns))
    }

    pub fn with_namespaces(namespaces: SbmlNamespaces) -> Self {
        Output {
            base: SBaseData::new(namespaces, TypeCode::QualOutput),
            qualitative_species: None,
            transition_effect: None,
            output_level: None,
        }
    }

    pub fn qualitative_species(&self) -> Option<&str> {
        self.qualitative_species.as_deref()
    }

    pub fn set_qualitative_species(&mut self, species: &str) -> OperationResult {
        if !is_valid_sid(species) {
            return Err(OperationError::InvalidAttributeValue);
        }
        self.qualitative_species = Some(species.to_string());
        Ok(())
    }

    pub fn transition_effect(&self) -> Option<OutputTransitionEffect> {
        self.transition_effect
    }

    pub fn set_transition_effect(&mut self, effect: OutputTransitionEffect) {
        self.transition_effect = Some(effect);
    }

    /// Amount added to the species' level by a `production` transition.
    pub fn output_level(&self) -> Option<u32> {
        self.output_level
    }

    pub fn set_output_level(&mut self, level: u32) {
        self.output_level = Some(level);
    }

    pub fn unset_output_level(&mut self) {
        self.output_level = None;
    }
}

impl SBase for Output {
    sbase_boilerplate!();

    fn type_code(&self) -> TypeCode {
        TypeCode::QualOutput
    }

    fn element_name(&self) -> &'static str {
        "output"
    }

    fn add_expected_attributes(&self, expected: &mut ExpectedAttributes) {
        add_base_expected_attributes(self, expected);
        let uri = self.namespaces().attribute_uri_for(QUAL_PACKAGE);
        for name in ["qualitativeSpecies", "transitionEffect", "outputLevel"] {
            expected.add(name, uri);
        }
    }

    fn read_attributes(
        &mut self,
        attrs: &XmlAttributes,
        expected: &ExpectedAttributes,
        log: &mut ErrorLog,
    ) {
        let code = QUAL_ALLOWED_ATTRIBUTES_ON_OUTPUT;
        read_base_and_reclassify(self, attrs, expected, log, code);
        let uri = self.namespaces().attribute_uri_for(QUAL_PACKAGE);
        let reader = AttributeReader::new(self, attrs, uri, code);
        self.qualitative_species = reader.sid_ref("qualitativeSpecies", true, log);
        self.transition_effect =
            reader.enumerated("transitionEffect", true, log, OutputTransitionEffect::parse);
        self.output_level = reader.non_negative_int("outputLevel", false, log);
    }

    fn write_attributes(&self, out: &mut XmlOutputStream<'_>) {
        write_base_attributes(self, out);
        let prefix = self.namespaces().prefix_for(QUAL_PACKAGE);
        if let Some(species) = &self.qualitative_species {
            out.write_attribute(&prefix, "qualitativeSpecies", species);
        }
        if let Some(effect) = self.transition_effect {
            out.write_attribute(&prefix, "transitionEffect", effect.as_str());
        }
        if let Some(level) = self.output_level {
            out.write_int_attribute(&prefix, "outputLevel", i64::from(level));
        }
    }

    fn check_references(&self, model: &Model, log: &mut ErrorLog) {
        let Some(id) = self.qualitative_species() else {
            return;
        };
        match find_species(model, id) {
            None => report(
                self,
                QUAL_OUTPUT_SPECIES_MUST_EXIST,
                format!("The output species '{}' is not defined.", id),
                log,
            ),
            Some(species) if species.constant() == Some(true) => report(
                self,
                QUAL_OUTPUT_SPECIES_NOT_CONSTANT,
                format!("The output species '{}' is constant.", id),
                log,
            ),
            Some(_) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enumerations() {
        assert_eq!(Sign::parse("dual"), Some(Sign::Dual));
        assert_eq!(Sign::parse("both"), None);
        assert_eq!(
            OutputTransitionEffect::parse("assignmentLevel"),
            Some(OutputTransitionEffect::AssignmentLevel)
        );
        assert_eq!(InputTransitionEffect::Consumption.as_str(), "consumption");
    }

    #[test]
    fn test_transition_owns_its_lists() {
        let mut transition = Transition::new(3, 1, 1).unwrap();
        transition.set_id("t1").unwrap();
        let input = transition.create_input().unwrap();
        input.set_qualitative_species("A").unwrap();
        input.set_transition_effect(InputTransitionEffect::None);
        let output = transition.create_output().unwrap();
        output.set_qualitative_species("B").unwrap();
        transition
            .list_of_function_terms_mut()
            .create_default_term()
            .set_result_level(0);

        let input = transition.get_input_by_species("A").unwrap();
        assert_eq!(input.parent().unwrap().element_name, "listOfInputs");
        assert!(transition.get_output_by_species("A").is_none());
        let lists: Vec<_> = transition.children().iter().map(|c| c.element_name()).collect();
        assert_eq!(lists, vec!["listOfInputs", "listOfOutputs", "listOfFunctionTerms"]);
    }

    #[test]
    fn test_missing_function_terms_logged_on_read() {
        let mut transition = Transition::new(3, 1, 1).unwrap();
        let mut log = ErrorLog::new();
        transition.on_read_finished(&mut log);
        assert!(log.contains(QUAL_TRANSITION_FUNCTION_TERMS_REQUIRED));
    }
}
