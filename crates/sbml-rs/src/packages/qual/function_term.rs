// crates/sbml-rs/src/packages/qual/function_term.rs

//! The rules deciding a transition's result level.
//!
//! A `<listOfFunctionTerms>` holds an ordered list of `<functionTerm>`s and
//! one `<defaultTerm>`, written first. The first term whose `<math>` holds
//! decides the level; the default applies when none does.

use super::QUAL_PACKAGE;
use super::errors::{
    QUAL_ALLOWED_ATTRIBUTES_ON_DEFAULT_TERM, QUAL_ALLOWED_ATTRIBUTES_ON_FUNCTION_TERM,
    QUAL_FUNCTION_TERM_MATH_REQUIRED, QUAL_LIST_OF_FUNCTION_TERMS_DEFAULT_REQUIRED,
};
use crate::error::{ErrorLog, SbmlConstructorError, SbmlError};
use crate::list_of::{ListOf, ListOfKind, list_accessors};
use crate::namespaces::{MATHML_XMLNS, SbmlNamespaces};
use crate::sbase::{
    AttributeReader, ParentLink, SBase, SBaseData, add_base_expected_attributes,
    read_base_and_reclassify, sbase_boilerplate, write_base_attributes, write_element,
};
use crate::types::{OperationError, OperationResult, TypeCode};
use crate::xml::{
    ExpectedAttributes, XmlAttributes, XmlInputStream, XmlOutputStream, XmlStartTag, XmlTriple,
};

fn new_function_term(ns: &SbmlNamespaces) -> Box<dyn SBase> {
    Box::new(FunctionTerm::with_namespaces(ns.clone()))
}

static LIST_OF_FUNCTION_TERMS: ListOfKind = ListOfKind {
    element_name: "listOfFunctionTerms",
    package: QUAL_PACKAGE,
    item_element: "functionTerm",
    item_type: TypeCode::QualFunctionTerm,
    create: new_function_term,
    accepts: None,
    allowed_attributes: None,
};

fn add_result_level_attribute(el: &dyn SBase, expected: &mut ExpectedAttributes) {
    add_base_expected_attributes(el, expected);
    expected.add("resultLevel", el.namespaces().attribute_uri_for(QUAL_PACKAGE));
}

fn read_result_level(
    el: &mut dyn SBase,
    attrs: &XmlAttributes,
    expected: &ExpectedAttributes,
    log: &mut ErrorLog,
    code: u32,
) -> Option<u32> {
    read_base_and_reclassify(el, attrs, expected, log, code);
    let uri = el.namespaces().attribute_uri_for(QUAL_PACKAGE);
    AttributeReader::new(el, attrs, uri, code).non_negative_int("resultLevel", true, log)
}

fn write_result_level(el: &dyn SBase, level: Option<u32>, out: &mut XmlOutputStream<'_>) {
    write_base_attributes(el, out);
    if let Some(level) = level {
        let prefix = el.namespaces().prefix_for(QUAL_PACKAGE);
        out.write_int_attribute(&prefix, "resultLevel", i64::from(level));
    }
}

/// Level taken when no function term applies.
#[derive(Debug, Clone)]
pub struct DefaultTerm {
    base: SBaseData,
    result_level: Option<u32>,
}

impl DefaultTerm {
    pub fn new(level: u32, version: u32, package_version: u32) -> Result<Self, SbmlConstructorError> {
        let ns = SbmlNamespaces::with_package(level, version, QUAL_PACKAGE, package_version)?;
        Ok(Self::with_namespaces(ns))
    }

    pub fn with_namespaces(namespaces: SbmlNamespaces) -> Self {
        DefaultTerm {
            base: SBaseData::new(namespaces, TypeCode::QualDefaultTerm),
            result_level: None,
        }
    }

    pub fn result_level(&self) -> Option<u32> {
        self.result_level
    }

    pub fn set_result_level(&mut self, level: u32) {
        self.result_level = Some(level);
    }
}

impl SBase for DefaultTerm {
    sbase_boilerplate!();

    fn type_code(&self) -> TypeCode {
        TypeCode::QualDefaultTerm
    }

    fn element_name(&self) -> &'static str {
        "defaultTerm"
    }

    fn add_expected_attributes(&self, expected: &mut ExpectedAttributes) {
        add_result_level_attribute(self, expected);
    }

    fn read_attributes(
        &mut self,
        attrs: &XmlAttributes,
        expected: &ExpectedAttributes,
        log: &mut ErrorLog,
    ) {
        let code = QUAL_ALLOWED_ATTRIBUTES_ON_DEFAULT_TERM;
        self.result_level = read_result_level(self, attrs, expected, log, code);
    }

    fn write_attributes(&self, out: &mut XmlOutputStream<'_>) {
        write_result_level(self, self.result_level, out);
    }
}

/// A condition, as MathML, and the level it yields.
#[derive(Debug, Clone)]
pub struct FunctionTerm {
    base: SBaseData,
    result_level: Option<u32>,
    math: Option<String>,
}

impl FunctionTerm {
    pub fn new(level: u32, version: u32, package_version: u32) -> Result<Self, SbmlConstructorError> {
        let ns = SbmlNamespaces::with_package(level, version, QUAL_PACKAGE, package_version)?;
        Ok(Self::with_namespaces(ns))
    }

    pub fn with_namespaces(namespaces: SbmlNamespaces) -> Self {
        FunctionTerm {
            base: SBaseData::new(namespaces, TypeCode::QualFunctionTerm),
            result_level: None,
            math: None,
        }
    }

    pub fn result_level(&self) -> Option<u32> {
        self.result_level
    }

    pub fn set_result_level(&mut self, level: u32) {
        self.result_level = Some(level);
    }

    /// The `<math>` element, verbatim.
    pub fn math(&self) -> Option<&str> {
        self.math.as_deref()
    }

    /// Stores `xml`, which must be a single `<math>` element.
    pub fn set_math(&mut self, xml: &str) -> OperationResult {
        let xml = xml.trim();
        if !xml.starts_with("<math") || !xml.ends_with('>') {
            return Err(OperationError::InvalidObject);
        }
        self.math = Some(xml.to_string());
        Ok(())
    }

    pub fn unset_math(&mut self) {
        self.math = None;
    }
}

impl SBase for FunctionTerm {
    sbase_boilerplate!();

    fn type_code(&self) -> TypeCode {
        TypeCode::QualFunctionTerm
    }

    fn element_name(&self) -> &'static str {
        "functionTerm"
    }

    fn add_expected_attributes(&self, expected: &mut ExpectedAttributes) {
        add_result_level_attribute(self, expected);
    }

    fn read_attributes(
        &mut self,
        attrs: &XmlAttributes,
        expected: &ExpectedAttributes,
        log: &mut ErrorLog,
    ) {
        let code = QUAL_ALLOWED_ATTRIBUTES_ON_FUNCTION_TERM;
        self.result_level = read_result_level(self, attrs, expected, log, code);
    }

    fn write_attributes(&self, out: &mut XmlOutputStream<'_>) {
        write_result_level(self, self.result_level, out);
    }

    fn read_other_element(&mut self, start: &XmlStartTag, stream: &mut XmlInputStream<'_>) -> bool {
        if start.triple.uri != MATHML_XMLNS || start.triple.name != "math" {
            return false;
        }
        self.math = Some(stream.capture_element(start));
        true
    }

    fn write_elements(&self, out: &mut XmlOutputStream<'_>) {
        if let Some(math) = &self.math {
            out.write_raw(math);
        }
    }

    fn on_read_finished(&mut self, log: &mut ErrorLog) {
        if self.math.is_none() {
            log.log(
                SbmlError::new(
                    QUAL_FUNCTION_TERM_MATH_REQUIRED,
                    "The <functionTerm> has no <math> element.",
                )
                .with_level_version(self.level(), self.version())
                .at(self.line(), self.column()),
            );
        }
    }
}

/// The function terms of a transition plus their default.
#[derive(Debug)]
pub struct ListOfFunctionTerms {
    list: ListOf,
    default_term: Option<DefaultTerm>,
}

impl Clone for ListOfFunctionTerms {
    fn clone(&self) -> Self {
        let mut copy = ListOfFunctionTerms {
            list: self.list.clone(),
            default_term: self.default_term.clone(),
        };
        copy.connect_to_child();
        copy
    }
}

impl ListOfFunctionTerms {
    pub fn with_namespaces(namespaces: SbmlNamespaces) -> Self {
        ListOfFunctionTerms {
            list: ListOf::of_kind(&LIST_OF_FUNCTION_TERMS, namespaces),
            default_term: None,
        }
    }

    pub fn default_term(&self) -> Option<&DefaultTerm> {
        self.default_term.as_ref()
    }

    pub fn default_term_mut(&mut self) -> Option<&mut DefaultTerm> {
        self.default_term.as_mut()
    }

    /// Replaces the default term with a new one.
    pub fn create_default_term(&mut self) -> &mut DefaultTerm {
        let term = DefaultTerm::with_namespaces(self.namespaces().clone());
        self.install_default(term)
    }

    /// Installs a copy of `term` as the default.
    pub fn set_default_term(&mut self, term: &DefaultTerm) -> OperationResult {
        if term.level() != self.level() {
            return Err(OperationError::LevelMismatch);
        }
        if term.version() != self.version() {
            return Err(OperationError::VersionMismatch);
        }
        self.install_default(term.clone());
        Ok(())
    }

    pub fn unset_default_term(&mut self) -> Option<DefaultTerm> {
        let mut term = self.default_term.take()?;
        term.detach();
        Some(term)
    }

    fn install_default(&mut self, mut term: DefaultTerm) -> &mut DefaultTerm {
        term.connect_to_parent(ParentLink {
            type_code: TypeCode::ListOf,
            element_name: self.element_name(),
            document: self.base().document.clone(),
        });
        self.default_term.insert(term)
    }

    list_accessors!(
        list: FunctionTerm,
        add: add_function_term,
        create: create_function_term,
        get: get_function_term,
        get_mut: get_function_term_mut,
        get_by_id: get_function_term_by_id,
        remove: remove_function_term,
        num: num_function_terms,
        list: as_list,
        list_mut: as_list_mut,
    );

    /// Every result level this list can produce, default first.
    pub fn result_levels(&self) -> impl Iterator<Item = u32> + '_ {
        self.default_term
            .iter()
            .filter_map(|t| t.result_level())
            .chain(self.list.iter_as::<FunctionTerm>().filter_map(|t| t.result_level()))
    }
}

impl SBase for ListOfFunctionTerms {
    sbase_boilerplate!(delegate list);

    fn type_code(&self) -> TypeCode {
        TypeCode::ListOf
    }

    fn element_name(&self) -> &'static str {
        LIST_OF_FUNCTION_TERMS.element_name
    }

    fn package_name(&self) -> &'static str {
        QUAL_PACKAGE
    }

    fn children(&self) -> Vec<&dyn SBase> {
        let mut out: Vec<&dyn SBase> = Vec::new();
        if let Some(term) = &self.default_term {
            out.push(term);
        }
        out.extend(self.list.children());
        out
    }

    fn children_mut(&mut self) -> Vec<&mut dyn SBase> {
        let mut out: Vec<&mut dyn SBase> = Vec::new();
        if let Some(term) = &mut self.default_term {
            out.push(term);
        }
        out.extend(self.list.children_mut());
        out
    }

    fn create_object(&mut self, start: &XmlTriple) -> Option<&mut dyn SBase> {
        let uri = self.namespaces().attribute_uri_for(QUAL_PACKAGE);
        if start.uri == uri && start.name == "defaultTerm" {
            return Some(self.create_default_term() as &mut dyn SBase);
        }
        self.list.create_object(start)
    }

    fn write_elements(&self, out: &mut XmlOutputStream<'_>) {
        if let Some(term) = &self.default_term {
            write_element(term, out);
        }
        self.list.write_elements(out);
    }

    fn should_write(&self) -> bool {
        self.list.should_write() || self.default_term.is_some()
    }

    fn on_read_finished(&mut self, log: &mut ErrorLog) {
        if self.default_term.is_some() {
            return;
        }
        log.log(
            SbmlError::new(
                QUAL_LIST_OF_FUNCTION_TERMS_DEFAULT_REQUIRED,
                "The <listOfFunctionTerms> has no <defaultTerm>.",
            )
            .with_level_version(self.level(), self.version())
            .at(self.line(), self.column()),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ns() -> SbmlNamespaces {
        SbmlNamespaces::with_package(3, 1, "qual", 1).unwrap()
    }

    #[test]
    fn test_default_term_is_first_child() {
        let mut list = ListOfFunctionTerms::with_namespaces(ns());
        assert!(!list.should_write());
        list.create_function_term().unwrap().set_result_level(1);
        list.create_default_term().set_result_level(0);
        let children = list.children();
        assert_eq!(children[0].type_code(), TypeCode::QualDefaultTerm);
        assert_eq!(children[1].type_code(), TypeCode::QualFunctionTerm);
        assert_eq!(list.result_levels().collect::<Vec<_>>(), vec![0, 1]);
        let default = list.default_term().unwrap();
        assert_eq!(default.parent().unwrap().element_name, "listOfFunctionTerms");
    }

    #[test]
    fn test_clone_keeps_default_parented() {
        let mut list = ListOfFunctionTerms::with_namespaces(ns());
        list.create_default_term().set_result_level(2);
        let copy = list.clone();
        assert_eq!(copy.default_term().unwrap().result_level(), Some(2));
        assert!(copy.default_term().unwrap().parent().is_some());
    }

    #[test]
    fn test_set_math_requires_math_element() {
        let mut term = FunctionTerm::new(3, 1, 1).unwrap();
        assert_eq!(term.set_math("<apply/>"), Err(OperationError::InvalidObject));
        term.set_math("  <math xmlns=\"http://www.w3.org/1998/Math/MathML\"><true/></math>\n")
            .unwrap();
        assert!(term.math().unwrap().starts_with("<math"));
    }

    #[test]
    fn test_missing_default_is_logged() {
        let mut list = ListOfFunctionTerms::with_namespaces(ns());
        let mut log = ErrorLog::new();
        list.on_read_finished(&mut log);
        assert!(log.contains(QUAL_LIST_OF_FUNCTION_TERMS_DEFAULT_REQUIRED));
        list.create_default_term();
        let mut log = ErrorLog::new();
        list.on_read_finished(&mut log);
        assert!(log.is_empty());
    }
}
