// crates/sbml-rs/src/sbase/mod.rs

//! The element abstraction shared by every class of the object model.
//!
//! An element owns its children outright. Upward links are descriptive only:
//! [`ParentLink`] records what kind of element owns this one, and the
//! document link is a `Weak` reference that never keeps a document alive.
//! The XML contract (`add_expected_attributes`, `read_attributes`,
//! `write_attributes`, `create_object`, `write_elements`) is driven by the
//! generic [`read_element`] and [`write_element`] functions.

mod attributes;
mod plugin;

pub(crate) use attributes::{
    AttributeReader, add_base_expected_attributes, read_base_and_reclassify,
    read_base_attributes, reclassify_unknown_attributes, write_base_attributes,
};
pub use plugin::SBasePlugin;
pub(crate) use plugin::plugin_boilerplate;

use crate::document::DocumentContext;
use crate::error::table::UNRECOGNIZED_ELEMENT;
use crate::error::{ErrorLog, SbmlError};
use crate::log::{ElementContext, my_trace, my_warn};
use crate::model::Model;
use crate::namespaces::{PackageNamespace, SbmlNamespaces, registry};
use crate::types::{
    OperationError, OperationResult, TypeCode, is_valid_sid, is_valid_xml_id,
};
use crate::xml::{
    ExpectedAttributes, XmlAttributes, XmlInputStream, XmlOutputStream, XmlStartTag, XmlToken,
    XmlTriple,
};
use core::fmt;
use std::any::Any;
use std::rc::{Rc, Weak};

/// Describes the element that owns this one.
#[derive(Debug, Clone)]
pub struct ParentLink {
    pub type_code: TypeCode,
    pub element_name: &'static str,
    pub document: Weak<DocumentContext>,
}

/// State common to every element.
#[derive(Debug)]
pub struct SBaseData {
    pub(crate) id: Option<String>,
    pub(crate) name: Option<String>,
    pub(crate) meta_id: Option<String>,
    pub(crate) sbo_term: Option<u32>,
    pub(crate) notes: Option<String>,
    pub(crate) annotation: Option<String>,
    pub(crate) namespaces: SbmlNamespaces,
    pub(crate) parent: Option<ParentLink>,
    pub(crate) document: Weak<DocumentContext>,
    pub(crate) line: u32,
    pub(crate) column: u32,
    pub(crate) plugins: Vec<Box<dyn SBasePlugin>>,
}

impl SBaseData {
    /// Creates the state for an element of type `host`, instantiating one
    /// plugin per declared package that extends `host`.
    pub fn new(namespaces: SbmlNamespaces, host: TypeCode) -> Self {
        let plugins = namespaces
            .packages()
            .iter()
            .filter_map(|pkg| registry().extension(pkg.name))
            .filter_map(|ext| ext.create_plugin(host, &namespaces))
            .collect();
        SBaseData {
            id: None,
            name: None,
            meta_id: None,
            sbo_term: None,
            notes: None,
            annotation: None,
            namespaces,
            parent: None,
            document: Weak::new(),
            line: 0,
            column: 0,
            plugins,
        }
    }

    pub fn plugins(&self) -> &[Box<dyn SBasePlugin>] {
        &self.plugins
    }

    pub fn plugins_mut(&mut self) -> &mut [Box<dyn SBasePlugin>] {
        &mut self.plugins
    }

    /// True if any attribute, notes or annotation common to all elements is set.
    pub fn has_content(&self) -> bool {
        self.id.is_some()
            || self.name.is_some()
            || self.meta_id.is_some()
            || self.sbo_term.is_some()
            || self.notes.is_some()
            || self.annotation.is_some()
    }
}

/// Copies are detached: they belong to no parent and no document until they
/// are inserted somewhere.
impl Clone for SBaseData {
    fn clone(&self) -> Self {
        SBaseData {
            id: self.id.clone(),
            name: self.name.clone(),
            meta_id: self.meta_id.clone(),
            sbo_term: self.sbo_term,
            notes: self.notes.clone(),
            annotation: self.annotation.clone(),
            namespaces: self.namespaces.clone(),
            parent: None,
            document: Weak::new(),
            line: self.line,
            column: self.column,
            plugins: self.plugins.clone(),
        }
    }
}

/// An element of the object model.
pub trait SBase: fmt::Debug + Any {
    fn base(&self) -> &SBaseData;

    fn base_mut(&mut self) -> &mut SBaseData;

    /// Polymorphic deep copy. The copy's subtree is wired to the copy.
    fn clone_box(&self) -> Box<dyn SBase>;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    fn into_any(self: Box<Self>) -> Box<dyn Any>;

    fn as_sbase(&self) -> &dyn SBase;

    fn as_sbase_mut(&mut self) -> &mut dyn SBase;

    fn type_code(&self) -> TypeCode;

    /// Local XML element name.
    fn element_name(&self) -> &'static str;

    fn package_name(&self) -> &'static str {
        self.type_code().package_name()
    }

    /// Direct children owned by this element, excluding plugin children.
    fn children(&self) -> Vec<&dyn SBase> {
        Vec::new()
    }

    fn children_mut(&mut self) -> Vec<&mut dyn SBase> {
        Vec::new()
    }

    /// Direct children including those owned by plugins.
    fn all_children(&self) -> Vec<&dyn SBase> {
        let mut out = self.children();
        for plugin in self.base().plugins.iter() {
            out.extend(plugin.children());
        }
        out
    }

    // --- identity ---

    fn id(&self) -> Option<&str> {
        self.base().id.as_deref()
    }

    fn set_id(&mut self, id: &str) -> OperationResult {
        if !is_valid_sid(id) {
            return Err(OperationError::InvalidAttributeValue);
        }
        self.base_mut().id = Some(id.to_string());
        Ok(())
    }

    fn unset_id(&mut self) {
        self.base_mut().id = None;
    }

    fn name(&self) -> Option<&str> {
        self.base().name.as_deref()
    }

    fn set_name(&mut self, name: &str) {
        self.base_mut().name = Some(name.to_string());
    }

    fn unset_name(&mut self) {
        self.base_mut().name = None;
    }

    fn meta_id(&self) -> Option<&str> {
        self.base().meta_id.as_deref()
    }

    fn set_meta_id(&mut self, meta_id: &str) -> OperationResult {
        if !is_valid_xml_id(meta_id) {
            return Err(OperationError::InvalidAttributeValue);
        }
        self.base_mut().meta_id = Some(meta_id.to_string());
        Ok(())
    }

    fn unset_meta_id(&mut self) {
        self.base_mut().meta_id = None;
    }

    fn sbo_term(&self) -> Option<u32> {
        self.base().sbo_term
    }

    fn set_sbo_term(&mut self, term: u32) -> OperationResult {
        if term > 9_999_999 {
            return Err(OperationError::InvalidAttributeValue);
        }
        self.base_mut().sbo_term = Some(term);
        Ok(())
    }

    fn unset_sbo_term(&mut self) {
        self.base_mut().sbo_term = None;
    }

    /// Notes as raw XML, including the `<notes>` tags.
    fn notes(&self) -> Option<&str> {
        self.base().notes.as_deref()
    }

    /// Sets notes from raw XML. Content not already wrapped in `<notes>` is wrapped.
    fn set_notes(&mut self, xml: &str) {
        self.base_mut().notes = Some(wrap_block("notes", xml));
    }

    fn unset_notes(&mut self) {
        self.base_mut().notes = None;
    }

    /// Annotation as raw XML, including the `<annotation>` tags.
    fn annotation(&self) -> Option<&str> {
        self.base().annotation.as_deref()
    }

    fn set_annotation(&mut self, xml: &str) {
        self.base_mut().annotation = Some(wrap_block("annotation", xml));
    }

    fn unset_annotation(&mut self) {
        self.base_mut().annotation = None;
    }

    // --- context ---

    fn namespaces(&self) -> &SbmlNamespaces {
        &self.base().namespaces
    }

    fn level(&self) -> u32 {
        self.base().namespaces.level()
    }

    fn version(&self) -> u32 {
        self.base().namespaces.version()
    }

    /// Version of the package this element belongs to; zero for core elements.
    fn package_version(&self) -> u32 {
        self.base()
            .namespaces
            .package(self.package_name())
            .map(|p| p.version)
            .unwrap_or(0)
    }

    fn parent(&self) -> Option<&ParentLink> {
        self.base().parent.as_ref()
    }

    fn document(&self) -> Option<Rc<DocumentContext>> {
        self.base().document.upgrade()
    }

    /// Source line this element was read from; zero if built in code.
    fn line(&self) -> u32 {
        self.base().line
    }

    fn column(&self) -> u32 {
        self.base().column
    }

    fn get_plugin(&self, package: &str) -> Option<&dyn SBasePlugin> {
        self.base()
            .plugins
            .iter()
            .find(|p| p.package_name() == package)
            .map(|p| p.as_ref())
    }

    fn get_plugin_mut(&mut self, package: &str) -> Option<&mut dyn SBasePlugin> {
        self.base_mut()
            .plugins
            .iter_mut()
            .find(|p| p.package_name() == package)
            .map(|p| p.as_mut() as &mut dyn SBasePlugin)
    }

    // --- XML contract ---

    fn add_expected_attributes(&self, expected: &mut ExpectedAttributes) {
        add_base_expected_attributes(self.as_sbase(), expected);
    }

    fn read_attributes(
        &mut self,
        attrs: &XmlAttributes,
        expected: &ExpectedAttributes,
        log: &mut ErrorLog,
    ) {
        read_base_attributes(self.as_sbase_mut(), attrs, expected, log);
    }

    fn write_attributes(&self, out: &mut XmlOutputStream<'_>) {
        write_base_attributes(self.as_sbase(), out);
    }

    /// Creates (or selects) the child for a start tag, returning it so the
    /// reader can descend into it.
    fn create_object(&mut self, _start: &XmlTriple) -> Option<&mut dyn SBase> {
        None
    }

    /// Hook for children that are not elements of the object model, such as
    /// opaque `<math>` blocks. Returns true if the element was consumed.
    fn read_other_element(
        &mut self,
        _start: &XmlStartTag,
        _stream: &mut XmlInputStream<'_>,
    ) -> bool {
        false
    }

    fn write_elements(&self, _out: &mut XmlOutputStream<'_>) {}

    /// Called once all children have been read.
    fn on_read_finished(&mut self, _log: &mut ErrorLog) {}

    /// Whether the writer emits this element at all.
    fn should_write(&self) -> bool {
        true
    }

    /// Reference checks run by the consistency pass.
    fn check_references(&self, _model: &Model, _log: &mut ErrorLog) {}

    // --- lifecycle ---

    /// Records `link` as this element's owner and wires the whole subtree.
    /// Calling it again with the same owner changes nothing.
    fn connect_to_parent(&mut self, link: ParentLink) {
        self.base_mut().document = link.document.clone();
        self.base_mut().parent = Some(link);
        self.connect_to_child();
    }

    /// Points every direct child (plugin children included) at this element.
    fn connect_to_child(&mut self) {
        let link = ParentLink {
            type_code: self.type_code(),
            element_name: self.element_name(),
            document: self.base().document.clone(),
        };
        for child in self.children_mut() {
            child.connect_to_parent(link.clone());
        }
        for plugin in self.base_mut().plugins.iter_mut() {
            plugin.connect_to_host(&link);
        }
    }

    /// Propagates the document link to this element and every descendant.
    fn set_document(&mut self, document: &Weak<DocumentContext>) {
        self.base_mut().document = document.clone();
        if let Some(parent) = self.base_mut().parent.as_mut() {
            parent.document = document.clone();
        }
        for child in self.children_mut() {
            child.set_document(document);
        }
        for plugin in self.base_mut().plugins.iter_mut() {
            plugin.set_document(document);
        }
    }

    /// Forgets the owner and the document, for elements handed back to a caller.
    fn detach(&mut self) {
        self.base_mut().parent = None;
        self.set_document(&Weak::new());
    }

    /// Declares (or removes) a package namespace on this subtree, creating or
    /// dropping the matching plugins.
    fn enable_package_internal(&mut self, pkg: &PackageNamespace, enable: bool) {
        let host = self.type_code();
        let base = self.base_mut();
        if enable {
            base.namespaces.add_package_namespace(pkg.clone());
            if !base.plugins.iter().any(|p| p.package_name() == pkg.name) {
                if let Some(plugin) = registry()
                    .extension(pkg.name)
                    .and_then(|ext| ext.create_plugin(host, &base.namespaces))
                {
                    base.plugins.push(plugin);
                }
            }
        } else {
            base.namespaces.remove_package(pkg.name);
            base.plugins.retain(|p| p.package_name() != pkg.name);
        }
        for child in self.children_mut() {
            child.enable_package_internal(pkg, enable);
        }
        for plugin in self.base_mut().plugins.iter_mut() {
            plugin.enable_package_internal(pkg, enable);
        }
    }

    // --- search ---

    /// Depth-first search of this element and its descendants by `id`.
    fn element_by_sid(&self, id: &str) -> Option<&dyn SBase> {
        if self.id() == Some(id) {
            return Some(self.as_sbase());
        }
        self.all_children()
            .into_iter()
            .find_map(|child| child.element_by_sid(id))
    }

    /// Depth-first search of this element and its descendants by `metaid`.
    fn element_by_metaid(&self, meta_id: &str) -> Option<&dyn SBase> {
        if self.meta_id() == Some(meta_id) {
            return Some(self.as_sbase());
        }
        self.all_children()
            .into_iter()
            .find_map(|child| child.element_by_metaid(meta_id))
    }

    /// Every descendant, depth-first, excluding this element.
    fn all_elements(&self) -> Vec<&dyn SBase> {
        let mut out = Vec::new();
        for child in self.all_children() {
            out.push(child);
            out.extend(child.all_elements());
        }
        out
    }
}

impl Clone for Box<dyn SBase> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

impl<'a> dyn SBase + 'a {
    pub fn downcast_ref<T: SBase>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    pub fn downcast_mut<T: SBase>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut::<T>()
    }

    pub fn is<T: SBase>(&self) -> bool {
        self.as_any().is::<T>()
    }
}

/// Implements the mechanical part of [`SBase`] for a struct with a
/// `base: SBaseData` field, or with `delegate field` for a wrapper whose
/// common state lives in an inner element.
macro_rules! sbase_boilerplate {
    () => {
        fn base(&self) -> &$crate::sbase::SBaseData {
            &self.base
        }

        fn base_mut(&mut self) -> &mut $crate::sbase::SBaseData {
            &mut self.base
        }

        $crate::sbase::sbase_boilerplate!(@common);
    };
    (delegate $field:ident) => {
        fn base(&self) -> &$crate::sbase::SBaseData {
            $crate::sbase::SBase::base(&self.$field)
        }

        fn base_mut(&mut self) -> &mut $crate::sbase::SBaseData {
            $crate::sbase::SBase::base_mut(&mut self.$field)
        }

        $crate::sbase::sbase_boilerplate!(@common);
    };
    (@common) => {
        fn clone_box(&self) -> Box<dyn $crate::sbase::SBase> {
            let mut copy = Box::new(self.clone());
            $crate::sbase::SBase::connect_to_child(&mut *copy);
            copy
        }

        fn as_any(&self) -> &dyn std::any::Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
            self
        }

        fn into_any(self: Box<Self>) -> Box<dyn std::any::Any> {
            self
        }

        fn as_sbase(&self) -> &dyn $crate::sbase::SBase {
            self
        }

        fn as_sbase_mut(&mut self) -> &mut dyn $crate::sbase::SBase {
            self
        }
    };
}

pub(crate) use sbase_boilerplate;

fn wrap_block(tag: &str, xml: &str) -> String {
    let trimmed = xml.trim();
    if trimmed.starts_with(&format!("<{}", tag)) {
        trimmed.to_string()
    } else {
        format!("<{tag}>{trimmed}</{tag}>")
    }
}

/// Qualified element name as written: package elements carry their prefix.
pub fn qualified_element_name(el: &dyn SBase) -> String {
    let prefix = el.namespaces().prefix_for(el.package_name());
    if prefix.is_empty() {
        el.element_name().to_string()
    } else {
        format!("{}:{}", prefix, el.element_name())
    }
}

/// Visits `root` and every descendant, depth-first, plugins included.
pub fn walk<'a>(root: &'a dyn SBase, visit: &mut dyn FnMut(&'a dyn SBase)) {
    visit(root);
    for child in root.all_children() {
        walk(child, visit);
    }
}

/// Reads the element whose start tag is `start` into `el`: attributes
/// (element first, then its plugins), notes and annotation, then children
/// through `create_object`. Consumes the stream up to and including the
/// element's end tag.
pub fn read_element(
    el: &mut dyn SBase,
    start: &XmlStartTag,
    stream: &mut XmlInputStream<'_>,
    log: &mut ErrorLog,
) {
    let ctx = ElementContext {
        element: el.element_name(),
        line: start.line,
        column: start.column,
    };
    my_trace!(ctx, "reading <{}>", start.triple.qualified_name());

    el.base_mut().line = start.line;
    el.base_mut().column = start.column;

    let mut expected = ExpectedAttributes::new();
    el.add_expected_attributes(&mut expected);
    for plugin in el.base().plugins.iter() {
        plugin.add_expected_attributes(&mut expected);
    }

    let since = log.len();
    el.read_attributes(&start.attributes, &expected, log);
    for plugin in el.base_mut().plugins.iter_mut() {
        plugin.read_attributes(&start.attributes, log, since, start.line, start.column);
    }

    let core_uri = el.namespaces().core_uri();
    loop {
        let child = match stream.next_token() {
            XmlToken::Start(child) => child,
            XmlToken::End(_) | XmlToken::Eof => break,
        };

        if child.triple.uri == core_uri && child.triple.name == "notes" {
            let raw = stream.capture_element(&child);
            el.base_mut().notes = Some(raw);
            continue;
        }
        if child.triple.uri == core_uri && child.triple.name == "annotation" {
            let raw = stream.capture_element(&child);
            el.base_mut().annotation = Some(raw);
            continue;
        }

        if let Some(obj) = el.create_object(&child.triple) {
            read_element(obj, &child, stream, log);
            continue;
        }

        let mut handled = false;
        for plugin in el.base_mut().plugins.iter_mut() {
            if let Some(obj) = plugin.create_object(&child.triple) {
                read_element(obj, &child, stream, log);
                handled = true;
                break;
            }
        }
        if handled || el.read_other_element(&child, stream) {
            continue;
        }

        if el.namespaces().declares_uri(&child.triple.uri) {
            log.log(
                SbmlError::new(
                    UNRECOGNIZED_ELEMENT,
                    format!(
                        "Element <{}> is not allowed inside <{}>.",
                        child.triple.qualified_name(),
                        el.element_name()
                    ),
                )
                .with_level_version(el.level(), el.version())
                .at(child.line, child.column),
            );
        } else {
            my_warn!(
                ElementContext {
                    element: el.element_name(),
                    line: child.line,
                    column: child.column
                },
                "skipping <{}> from unknown namespace '{}'",
                child.triple.qualified_name(),
                child.triple.uri
            );
        }
        stream.skip_element(&child);
    }

    el.on_read_finished(log);
    let (line, column) = (start.line, start.column);
    for plugin in el.base_mut().plugins.iter_mut() {
        plugin.on_read_finished(log, line, column);
    }
}

/// Writes `el` (start tag, attributes, plugin attributes, notes, annotation,
/// children, plugin children, end tag). Elements whose `should_write` is
/// false are skipped.
pub fn write_element(el: &dyn SBase, out: &mut XmlOutputStream<'_>) {
    if !el.should_write() {
        return;
    }
    out.start_element(&qualified_element_name(el));
    el.write_attributes(out);
    for plugin in el.base().plugins.iter() {
        plugin.write_attributes(out);
    }
    if let Some(notes) = el.notes() {
        out.write_raw(notes);
    }
    if let Some(annotation) = el.annotation() {
        out.write_raw(annotation);
    }
    el.write_elements(out);
    for plugin in el.base().plugins.iter() {
        plugin.write_elements(out);
    }
    out.end_element();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Model, Species};

    fn species(id: &str) -> Species {
        let mut s = Species::new(3, 2).unwrap();
        s.set_id(id).unwrap();
        s
    }

    #[test]
    fn test_identity_setters_validate_syntax() {
        let mut s = species("S1");
        assert_eq!(s.set_id("1bad"), Err(OperationError::InvalidAttributeValue));
        assert_eq!(s.id(), Some("S1"));
        assert_eq!(s.set_meta_id("has space"), Err(OperationError::InvalidAttributeValue));
        assert!(s.set_meta_id("_m1").is_ok());
        assert_eq!(s.set_sbo_term(10_000_000), Err(OperationError::InvalidAttributeValue));
        assert!(s.set_sbo_term(252).is_ok());
    }

    #[test]
    fn test_notes_are_wrapped() {
        let mut s = species("S1");
        s.set_notes("<p xmlns=\"http://www.w3.org/1999/xhtml\">hello</p>");
        assert!(s.notes().unwrap().starts_with("<notes><p"));
        s.set_annotation("<annotation><x xmlns=\"urn:x\"/></annotation>");
        assert_eq!(s.annotation(), Some("<annotation><x xmlns=\"urn:x\"/></annotation>"));
    }

    #[test]
    fn test_clone_is_detached_and_deep() {
        let mut model = Model::new(3, 2).unwrap();
        model.add_species(&species("S1")).unwrap();
        let copy = model.clone_box();
        let copied = copy.downcast_ref::<Model>().unwrap();
        assert!(copied.parent().is_none());
        assert_eq!(copied.num_species(), 1);
        let s = copied.get_species(0).unwrap();
        assert_eq!(s.parent().unwrap().element_name, "listOfSpecies");
    }

    #[test]
    fn test_search_by_sid_and_metaid() {
        let mut model = Model::new(3, 2).unwrap();
        let mut s = species("S1");
        s.set_meta_id("meta_S1").unwrap();
        model.add_species(&s).unwrap();
        assert_eq!(model.element_by_sid("S1").unwrap().type_code(), TypeCode::Species);
        assert_eq!(model.element_by_metaid("meta_S1").unwrap().id(), Some("S1"));
        assert!(model.element_by_sid("nope").is_none());
    }

    #[test]
    fn test_walk_visits_all() {
        let mut model = Model::new(3, 2).unwrap();
        model.add_species(&species("S1")).unwrap();
        model.add_species(&species("S2")).unwrap();
        let mut ids = Vec::new();
        walk(&model, &mut |el| {
            if let Some(id) = el.id() {
                ids.push(id.to_string());
            }
        });
        assert_eq!(ids, vec!["S1", "S2"]);
    }
}
