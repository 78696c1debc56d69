// crates/sbml-rs/src/sbase/plugin.rs

use super::{ParentLink, SBase};
use crate::document::DocumentContext;
use crate::error::ErrorLog;
use crate::model::Model;
use crate::namespaces::{PackageNamespace, SbmlNamespaces};
use crate::xml::{ExpectedAttributes, XmlAttributes, XmlOutputStream, XmlTriple};
use core::fmt;
use std::any::Any;
use std::rc::Weak;

/// Package extension attached to a core element.
///
/// A plugin contributes attributes (read and written on the host's tag) and
/// child elements (read and written after the host's own children). Plugins
/// are created by the package's [`SbmlExtension`](crate::namespaces::SbmlExtension)
/// whenever the package is declared for the host's document.
pub trait SBasePlugin: fmt::Debug + Any {
    fn package_name(&self) -> &'static str;

    fn clone_box(&self) -> Box<dyn SBasePlugin>;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    fn namespaces(&self) -> &SbmlNamespaces;

    fn namespaces_mut(&mut self) -> &mut SbmlNamespaces;

    /// Prefix used for this package's attributes and elements.
    fn prefix(&self) -> String {
        self.namespaces().prefix_for(self.package_name())
    }

    /// Namespace URI of this package's attributes.
    fn uri(&self) -> &'static str {
        self.namespaces().attribute_uri_for(self.package_name())
    }

    fn add_expected_attributes(&self, _expected: &mut ExpectedAttributes) {}

    /// Reads this package's attributes from the host tag. `since` is the log
    /// length before the host started reading, for reclassification.
    fn read_attributes(
        &mut self,
        _attrs: &XmlAttributes,
        _log: &mut ErrorLog,
        _since: usize,
        _line: u32,
        _column: u32,
    ) {
    }

    fn write_attributes(&self, _out: &mut XmlOutputStream<'_>) {}

    fn create_object(&mut self, _start: &XmlTriple) -> Option<&mut dyn SBase> {
        None
    }

    fn write_elements(&self, _out: &mut XmlOutputStream<'_>) {}

    fn children(&self) -> Vec<&dyn SBase> {
        Vec::new()
    }

    fn children_mut(&mut self) -> Vec<&mut dyn SBase> {
        Vec::new()
    }

    /// Points the plugin's children at the host element.
    fn connect_to_host(&mut self, link: &ParentLink) {
        for child in self.children_mut() {
            child.connect_to_parent(link.clone());
        }
    }

    fn set_document(&mut self, document: &Weak<DocumentContext>) {
        for child in self.children_mut() {
            child.set_document(document);
        }
    }

    fn on_read_finished(&mut self, _log: &mut ErrorLog, _line: u32, _column: u32) {}

    /// Reference checks run by the consistency pass.
    fn check_references(&self, _model: &Model, _log: &mut ErrorLog) {}

    fn enable_package_internal(&mut self, pkg: &PackageNamespace, enable: bool) {
        if enable {
            self.namespaces_mut().add_package_namespace(pkg.clone());
        } else {
            self.namespaces_mut().remove_package(pkg.name);
        }
        for child in self.children_mut() {
            child.enable_package_internal(pkg, enable);
        }
    }
}

impl Clone for Box<dyn SBasePlugin> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

impl<'a> dyn SBasePlugin + 'a {
    pub fn downcast_ref<T: SBasePlugin>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    pub fn downcast_mut<T: SBasePlugin>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut::<T>()
    }
}

/// Implements the mechanical part of [`SBasePlugin`] for a struct with a
/// `ns: SbmlNamespaces` field.
macro_rules! plugin_boilerplate {
    ($package:expr) => {
        fn package_name(&self) -> &'static str {
            $package
        }

        fn clone_box(&self) -> Box<dyn $crate::sbase::SBasePlugin> {
            let mut copy = Box::new(self.clone());
            for child in $crate::sbase::SBasePlugin::children_mut(&mut *copy) {
                $crate::sbase::SBase::connect_to_child(child);
            }
            copy
        }

        fn as_any(&self) -> &dyn std::any::Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
            self
        }

        fn namespaces(&self) -> &$crate::namespaces::SbmlNamespaces {
            &self.ns
        }

        fn namespaces_mut(&mut self) -> &mut $crate::namespaces::SbmlNamespaces {
            &mut self.ns
        }
    };
}

pub(crate) use plugin_boilerplate;
