// crates/sbml-rs/src/document.rs

//! The `<sbml>` root element.

use crate::error::table::{ALLOWED_ATTRIBUTES_ON_SBML, MISSING_MODEL};
use crate::error::{ErrorLog, SbmlConstructorError, SbmlError, Severity};
use crate::model::Model;
use crate::namespaces::SbmlNamespaces;
use crate::sbase::{
    SBase, SBaseData, add_base_expected_attributes, read_base_and_reclassify, sbase_boilerplate,
    write_base_attributes, write_element,
};
use crate::types::{OperationError, OperationResult, TypeCode};
use crate::validator;
use crate::xml::{ExpectedAttributes, XmlAttributes, XmlOutputStream, XmlTriple};
use std::rc::Rc;

/// What every element of a document can learn about the document that owns
/// it, through its `Weak` document link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentContext {
    pub level: u32,
    pub version: u32,
    pub namespaces: SbmlNamespaces,
}

/// Root of an SBML document: the namespace declarations, the optional model
/// and the diagnostics gathered while reading, writing and checking it.
#[derive(Debug)]
pub struct SbmlDocument {
    base: SBaseData,
    model: Option<Model>,
    errors: ErrorLog,
    context: Rc<DocumentContext>,
    /// Root declarations other than core and enabled packages, as
    /// `(prefix, uri)`.
    foreign_namespaces: Vec<(String, String)>,
}

impl Clone for SbmlDocument {
    fn clone(&self) -> Self {
        let mut copy = SbmlDocument {
            base: self.base.clone(),
            model: self.model.clone(),
            errors: self.errors.clone(),
            context: Rc::new((*self.context).clone()),
            foreign_namespaces: self.foreign_namespaces.clone(),
        };
        copy.attach();
        copy
    }
}

impl Default for SbmlDocument {
    /// An empty document at the default Level/Version.
    fn default() -> Self {
        Self::with_namespaces(SbmlNamespaces::default_namespaces())
    }
}

impl SbmlDocument {
    pub fn new(level: u32, version: u32) -> Result<Self, SbmlConstructorError> {
        Ok(Self::with_namespaces(SbmlNamespaces::new(level, version)?))
    }

    pub fn with_namespaces(namespaces: SbmlNamespaces) -> Self {
        let context = Rc::new(DocumentContext {
            level: namespaces.level(),
            version: namespaces.version(),
            namespaces: namespaces.clone(),
        });
        let mut doc = SbmlDocument {
            base: SBaseData::new(namespaces, TypeCode::Document),
            model: None,
            errors: ErrorLog::new(),
            context,
            foreign_namespaces: Vec::new(),
        };
        doc.attach();
        doc
    }

    /// Rebuilds the shared context from the current namespaces and points the
    /// whole tree at it.
    pub(crate) fn attach(&mut self) {
        self.context = Rc::new(DocumentContext {
            level: self.level(),
            version: self.version(),
            namespaces: self.namespaces().clone(),
        });
        let weak = Rc::downgrade(&self.context);
        self.set_document(&weak);
        self.connect_to_child();
    }

    pub fn context(&self) -> &DocumentContext {
        &self.context
    }

    pub fn model(&self) -> Option<&Model> {
        self.model.as_ref()
    }

    pub fn model_mut(&mut self) -> Option<&mut Model> {
        self.model.as_mut()
    }

    /// Replaces any existing model with a new, empty one.
    pub fn create_model(&mut self) -> &mut Model {
        let model = Model::with_namespaces(self.namespaces().clone());
        self.install_model(model)
    }

    /// Installs a copy of `model`.
    pub fn set_model(&mut self, model: &Model) -> OperationResult {
        if model.level() != self.level() {
            return Err(OperationError::LevelMismatch);
        }
        if model.version() != self.version() {
            return Err(OperationError::VersionMismatch);
        }
        self.install_model(model.clone());
        Ok(())
    }

    fn install_model(&mut self, model: Model) -> &mut Model {
        let model = self.model.insert(model);
        model.connect_to_parent(crate::sbase::ParentLink {
            type_code: TypeCode::Document,
            element_name: "sbml",
            document: Rc::downgrade(&self.context),
        });
        model
    }

    /// Takes the model out of the document, detached.
    pub fn remove_model(&mut self) -> Option<Model> {
        let mut model = self.model.take()?;
        model.detach();
        Some(model)
    }

    /// Declares `package` on the document and every element in it, creating
    /// the package's plugins.
    pub fn enable_package(
        &mut self,
        package: &str,
        package_version: u32,
        prefix: &str,
    ) -> OperationResult {
        let mut namespaces = self.namespaces().clone();
        namespaces
            .add_package(package, package_version, prefix)
            .map_err(|err| match err {
                SbmlConstructorError::UnsupportedPackageVersion { .. } => {
                    OperationError::InvalidAttributeValue
                }
                _ => OperationError::Failed,
            })?;
        let entry = namespaces.package(package).cloned().ok_or(OperationError::Failed)?;
        self.foreign_namespaces
            .retain(|(prefix, uri)| *prefix != entry.prefix && uri.as_str() != entry.uri);
        self.enable_package_internal(&entry, true);
        self.attach();
        Ok(())
    }

    /// Removes `package` from the document and every element in it, dropping
    /// the package's plugins and their content.
    pub fn disable_package(&mut self, package: &str) -> OperationResult {
        let entry = self
            .namespaces()
            .package(package)
            .cloned()
            .ok_or(OperationError::Failed)?;
        self.enable_package_internal(&entry, false);
        self.attach();
        Ok(())
    }

    /// Declares `prefix` on `<sbml>` for content outside SBML, such as XHTML
    /// in notes or RDF in annotations. Core and package prefixes are refused.
    pub fn add_namespace(&mut self, prefix: &str, uri: &str) -> OperationResult {
        let namespaces = self.namespaces();
        if prefix.is_empty()
            || prefix == "xmlns"
            || namespaces.packages().iter().any(|p| p.prefix == prefix)
        {
            return Err(OperationError::InvalidAttributeValue);
        }
        match self.foreign_namespaces.iter_mut().find(|(p, _)| p == prefix) {
            Some(existing) => existing.1 = uri.to_string(),
            None => self.foreign_namespaces.push((prefix.to_string(), uri.to_string())),
        }
        Ok(())
    }

    pub fn remove_namespace(&mut self, prefix: &str) -> bool {
        let before = self.foreign_namespaces.len();
        self.foreign_namespaces.retain(|(p, _)| p != prefix);
        before != self.foreign_namespaces.len()
    }

    /// Root declarations kept alongside the core and package namespaces.
    pub fn foreign_namespaces(&self) -> &[(String, String)] {
        &self.foreign_namespaces
    }

    pub fn is_package_enabled(&self, package: &str) -> bool {
        self.namespaces().has_package(package)
    }

    /// Value of the `prefix:required` flag written for `package`.
    pub fn package_required(&self, package: &str) -> Option<bool> {
        self.namespaces().package(package).map(|p| p.required)
    }

    pub fn set_package_required(&mut self, package: &str, required: bool) -> OperationResult {
        if !self.namespaces().has_package(package) {
            return Err(OperationError::Failed);
        }
        self.base.namespaces.set_required(package, required);
        self.attach();
        Ok(())
    }

    pub fn errors(&self) -> &ErrorLog {
        &self.errors
    }

    pub fn errors_mut(&mut self) -> &mut ErrorLog {
        &mut self.errors
    }

    pub fn num_errors(&self) -> usize {
        self.errors.len()
    }

    pub fn error(&self, index: usize) -> Option<&SbmlError> {
        self.errors.error(index)
    }

    pub fn num_errors_with_severity(&self, severity: Severity) -> usize {
        self.errors.num_with_severity(severity)
    }

    /// Runs the consistency checks and logs their findings in this
    /// document's log. Returns the number of diagnostics logged.
    pub fn check_consistency(&mut self) -> usize {
        let mut log = ErrorLog::new();
        let count = validator::check_consistency(self, &mut log);
        self.errors.append(log);
        count
    }
}

impl SBase for SbmlDocument {
    sbase_boilerplate!();

    fn type_code(&self) -> TypeCode {
        TypeCode::Document
    }

    fn element_name(&self) -> &'static str {
        "sbml"
    }

    fn children(&self) -> Vec<&dyn SBase> {
        self.model.iter().map(|m| m as &dyn SBase).collect()
    }

    fn children_mut(&mut self) -> Vec<&mut dyn SBase> {
        self.model.iter_mut().map(|m| m as &mut dyn SBase).collect()
    }

    fn add_expected_attributes(&self, expected: &mut ExpectedAttributes) {
        add_base_expected_attributes(self, expected);
        expected.add("level", "");
        expected.add("version", "");
        for pkg in self.namespaces().packages() {
            expected.add("required", pkg.uri);
        }
    }

    /// Level, version and package flags are interpreted by the reader before
    /// the tree is built; only the common attributes are read here.
    fn read_attributes(
        &mut self,
        attrs: &XmlAttributes,
        expected: &ExpectedAttributes,
        log: &mut ErrorLog,
    ) {
        read_base_and_reclassify(self, attrs, expected, log, ALLOWED_ATTRIBUTES_ON_SBML);
    }

    fn write_attributes(&self, out: &mut XmlOutputStream<'_>) {
        let namespaces = self.namespaces();
        out.write_namespace("", namespaces.core_uri());
        for pkg in namespaces.packages() {
            out.write_namespace(&pkg.prefix, pkg.uri);
        }
        for (prefix, uri) in &self.foreign_namespaces {
            out.write_namespace(prefix, uri);
        }
        write_base_attributes(self, out);
        out.write_int_attribute("", "level", i64::from(self.level()));
        out.write_int_attribute("", "version", i64::from(self.version()));
        for pkg in namespaces.packages() {
            out.write_bool_attribute(&pkg.prefix, "required", pkg.required);
        }
    }

    fn create_object(&mut self, start: &XmlTriple) -> Option<&mut dyn SBase> {
        if start.name != "model" || start.uri != self.namespaces().core_uri() {
            return None;
        }
        let model = self.create_model();
        Some(model as &mut dyn SBase)
    }

    fn write_elements(&self, out: &mut XmlOutputStream<'_>) {
        if let Some(model) = &self.model {
            write_element(model, out);
        }
    }

    fn on_read_finished(&mut self, log: &mut ErrorLog) {
        if self.model.is_none() && self.level() < 3 {
            log.log(
                SbmlError::new(MISSING_MODEL, "")
                    .with_level_version(self.level(), self.version())
                    .at(self.line(), self.column()),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Species;

    #[test]
    fn test_unsupported_level_version_fails() {
        assert!(matches!(
            SbmlDocument::new(4, 1),
            Err(SbmlConstructorError::UnsupportedLevelVersion { level: 4, version: 1 })
        ));
        assert!(SbmlDocument::new(2, 1).is_err());
    }

    #[test]
    fn test_model_sees_document() {
        let mut doc = SbmlDocument::new(3, 1).unwrap();
        let model = doc.create_model();
        let mut s = Species::new(3, 1).unwrap();
        s.set_id("S1").unwrap();
        model.add_species(&s).unwrap();

        let species = doc.model().unwrap().get_species(0).unwrap();
        let ctx = species.document().unwrap();
        assert_eq!((ctx.level, ctx.version), (3, 1));
        assert_eq!(doc.model().unwrap().parent().unwrap().element_name, "sbml");
    }

    #[test]
    fn test_foreign_namespaces() {
        let mut doc = SbmlDocument::new(3, 2).unwrap();
        doc.add_namespace("html", "http://www.w3.org/1999/xhtml").unwrap();
        doc.add_namespace("html", "http://www.w3.org/1999/xhtml").unwrap();
        assert_eq!(doc.foreign_namespaces().len(), 1);
        assert_eq!(doc.add_namespace("", "urn:x"), Err(OperationError::InvalidAttributeValue));

        let xml = crate::writer::write_sbml_to_string(&doc).unwrap();
        assert!(xml.contains("xmlns:html=\"http://www.w3.org/1999/xhtml\""));
        assert!(doc.remove_namespace("html"));
        assert!(!doc.remove_namespace("html"));
    }

    #[cfg(feature = "fbc")]
    #[test]
    fn test_enabled_package_replaces_foreign_prefix() {
        let mut doc = SbmlDocument::new(3, 1).unwrap();
        doc.add_namespace("fbc", "urn:elsewhere").unwrap();
        doc.enable_package("fbc", 2, "fbc").unwrap();
        assert!(doc.foreign_namespaces().is_empty());
        assert_eq!(doc.add_namespace("fbc", "urn:x"), Err(OperationError::InvalidAttributeValue));
    }

    #[test]
    fn test_removed_model_is_detached() {
        let mut doc = SbmlDocument::new(3, 2).unwrap();
        doc.create_model().create_species().unwrap().set_id("S1").unwrap();
        let model = doc.remove_model().unwrap();
        assert!(model.document().is_none());
        assert!(model.get_species(0).unwrap().document().is_none());
    }

    #[test]
    fn test_clone_gets_its_own_context() {
        let mut doc = SbmlDocument::new(3, 2).unwrap();
        doc.create_model();
        let copy = doc.clone();
        let ctx = copy.model().unwrap().document().unwrap();
        assert!(std::ptr::eq(&*ctx, copy.context()));
        drop(doc);
        assert!(copy.model().unwrap().document().is_some());
    }

    #[test]
    fn test_set_model_checks_level() {
        let mut doc = SbmlDocument::new(3, 2).unwrap();
        let model = Model::new(2, 4).unwrap();
        assert_eq!(doc.set_model(&model), Err(OperationError::LevelMismatch));
        let model = Model::new(3, 1).unwrap();
        assert_eq!(doc.set_model(&model), Err(OperationError::VersionMismatch));
    }

    #[test]
    fn test_model_copy_is_not_tied_to_document() {
        let mut doc = SbmlDocument::new(3, 2).unwrap();
        doc.create_model().create_compartment().unwrap();
        let model = doc.model().unwrap().clone();
        drop(doc);
        assert!(model.document().is_none());
    }
}
