// crates/sbml-rs/src/list_of.rs

//! The owning, ordered, type-gated container behind every `listOfXxx` element.

use crate::error::table::EMPTY_LIST_ELEMENT;
use crate::error::{ErrorLog, SbmlConstructorError, SbmlError};
use crate::log::{ElementContext, my_trace};
use crate::namespaces::SbmlNamespaces;
use crate::sbase::{
    ParentLink, SBase, SBaseData, read_base_and_reclassify, read_base_attributes,
    sbase_boilerplate, write_element,
};
use crate::types::{OperationError, OperationResult, TypeCode};
use crate::xml::{ExpectedAttributes, XmlAttributes, XmlOutputStream, XmlTriple};

/// Which item type a container accepts.
///
/// A generic container starts `Unconstrained` and locks to the type of the
/// first item it accepts. The lock is permanent: clearing the container
/// keeps it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemTypeLock {
    Unconstrained,
    Constrained(TypeCode),
}

/// Static description of a specialized container, e.g. `listOfSpecies`.
#[derive(Debug)]
pub struct ListOfKind {
    pub element_name: &'static str,
    /// Package owning the container and its items ("core" for SBML core).
    pub package: &'static str,
    /// Element name of the items.
    pub item_element: &'static str,
    pub item_type: TypeCode,
    /// Builds an empty item for the reader.
    pub create: fn(&SbmlNamespaces) -> Box<dyn SBase>,
    /// Replaces the single-type check for containers that accept a set of types.
    pub accepts: Option<fn(TypeCode) -> bool>,
    /// Code unknown attributes on the container are reported under; `None`
    /// keeps the generic unknown-attribute code.
    pub allowed_attributes: Option<u32>,
}

/// Ordered collection that exclusively owns its items.
#[derive(Debug)]
pub struct ListOf {
    base: SBaseData,
    items: Vec<Box<dyn SBase>>,
    lock: ItemTypeLock,
    kind: Option<&'static ListOfKind>,
}

impl Clone for ListOf {
    fn clone(&self) -> Self {
        let mut copy = ListOf {
            base: self.base.clone(),
            items: self.items.clone(),
            lock: self.lock,
            kind: self.kind,
        };
        copy.connect_to_child();
        copy
    }
}

impl ListOf {
    /// A generic, unconstrained container.
    pub fn new(level: u32, version: u32) -> Result<Self, SbmlConstructorError> {
        Ok(Self::with_namespaces(SbmlNamespaces::new(level, version)?))
    }

    pub fn with_namespaces(namespaces: SbmlNamespaces) -> Self {
        ListOf {
            base: SBaseData::new(namespaces, TypeCode::ListOf),
            items: Vec::new(),
            lock: ItemTypeLock::Unconstrained,
            kind: None,
        }
    }

    /// A specialized container, locked to `kind.item_type` from the start.
    pub fn of_kind(kind: &'static ListOfKind, namespaces: SbmlNamespaces) -> Self {
        ListOf {
            base: SBaseData::new(namespaces, TypeCode::ListOf),
            items: Vec::new(),
            lock: ItemTypeLock::Constrained(kind.item_type),
            kind: Some(kind),
        }
    }

    pub fn kind(&self) -> Option<&'static ListOfKind> {
        self.kind
    }

    pub fn item_type_lock(&self) -> ItemTypeLock {
        self.lock
    }

    /// The locked item type, or `TypeCode::Unknown` while unconstrained.
    pub fn item_type_code(&self) -> TypeCode {
        match self.lock {
            ItemTypeLock::Unconstrained => TypeCode::Unknown,
            ItemTypeLock::Constrained(code) => code,
        }
    }

    pub fn is_valid_type_for_list(&self, item: &dyn SBase) -> bool {
        self.type_allowed(self.lock, item.type_code())
    }

    fn type_allowed(&self, lock: ItemTypeLock, code: TypeCode) -> bool {
        if let Some(accepts) = self.kind.and_then(|k| k.accepts) {
            return accepts(code);
        }
        match lock {
            ItemTypeLock::Unconstrained => true,
            ItemTypeLock::Constrained(locked) => locked == code,
        }
    }

    fn check_insert(&self, lock: ItemTypeLock, item: &dyn SBase) -> OperationResult {
        if !self.type_allowed(lock, item.type_code()) {
            my_trace!(
                "rejected {} in <{}> locked to {:?}",
                item.type_code(),
                self.element_name(),
                lock
            );
            return Err(OperationError::InvalidObject);
        }
        if item.level() != self.level() {
            return Err(OperationError::LevelMismatch);
        }
        if item.version() != self.version() {
            return Err(OperationError::VersionMismatch);
        }
        let package = item.package_name();
        if package != "core" {
            let declared = self.namespaces().package(package).map(|p| p.uri);
            let carried = item.namespaces().package(package).map(|p| p.uri);
            if declared.is_none() || declared != carried {
                return Err(OperationError::NamespacesMismatch);
            }
        }
        Ok(())
    }

    fn lock_to(&mut self, code: TypeCode) {
        if self.lock == ItemTypeLock::Unconstrained && self.kind.and_then(|k| k.accepts).is_none() {
            self.lock = ItemTypeLock::Constrained(code);
        }
    }

    fn child_link(&self) -> ParentLink {
        ParentLink {
            type_code: TypeCode::ListOf,
            element_name: self.element_name(),
            document: self.base.document.clone(),
        }
    }

    /// Inserts `item` at `index` and takes ownership of it. On failure the
    /// container is unchanged.
    pub fn insert_and_own(&mut self, index: usize, mut item: Box<dyn SBase>) -> OperationResult {
        if index > self.items.len() {
            return Err(OperationError::IndexExceedsSize);
        }
        self.check_insert(self.lock, item.as_ref())?;
        self.lock_to(item.type_code());
        item.connect_to_parent(self.child_link());
        self.items.insert(index, item);
        Ok(())
    }

    /// Inserts a deep copy of `item` at `index`.
    pub fn insert(&mut self, index: usize, item: &dyn SBase) -> OperationResult {
        if index > self.items.len() {
            return Err(OperationError::IndexExceedsSize);
        }
        self.check_insert(self.lock, item)?;
        self.insert_and_own(index, item.clone_box())
    }

    pub fn append_and_own(&mut self, item: Box<dyn SBase>) -> OperationResult {
        self.insert_and_own(self.items.len(), item)
    }

    /// Appends a deep copy of `item`.
    pub fn append(&mut self, item: &dyn SBase) -> OperationResult {
        self.insert(self.items.len(), item)
    }

    /// Appends deep copies of every item of `other`. Either all items are
    /// appended or, if any would be rejected, none is.
    pub fn append_from(&mut self, other: &ListOf) -> OperationResult {
        let mut lock = self.lock;
        for item in other.iter() {
            self.check_insert(lock, item)?;
            if lock == ItemTypeLock::Unconstrained && self.kind.and_then(|k| k.accepts).is_none() {
                lock = ItemTypeLock::Constrained(item.type_code());
            }
        }
        for item in other.iter() {
            self.append(item)?;
        }
        Ok(())
    }

    /// Builds `item`, appends it and returns it typed.
    pub(crate) fn append_new<T: SBase>(&mut self, item: T) -> Option<&mut T> {
        self.append_and_own(Box::new(item)).ok()?;
        self.items.last_mut()?.as_any_mut().downcast_mut::<T>()
    }

    pub fn get(&self, index: usize) -> Option<&dyn SBase> {
        self.items.get(index).map(|item| &**item)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut dyn SBase> {
        self.items.get_mut(index).map(|item| &mut **item as &mut dyn SBase)
    }

    pub fn get_by_id(&self, id: &str) -> Option<&dyn SBase> {
        self.iter().find(|item| item.id() == Some(id))
    }

    pub fn get_by_id_mut(&mut self, id: &str) -> Option<&mut dyn SBase> {
        self.items
            .iter_mut()
            .find(|item| item.id() == Some(id))
            .map(|item| &mut **item as &mut dyn SBase)
    }

    /// Typed access; `None` when out of range or of another type.
    pub fn get_as<T: SBase>(&self, index: usize) -> Option<&T> {
        self.items.get(index)?.as_any().downcast_ref::<T>()
    }

    pub fn get_as_mut<T: SBase>(&mut self, index: usize) -> Option<&mut T> {
        self.items.get_mut(index)?.as_any_mut().downcast_mut::<T>()
    }

    /// Items of type `T`, in order.
    pub fn iter_as<T: SBase>(&self) -> impl Iterator<Item = &T> {
        self.items.iter().filter_map(|item| item.as_any().downcast_ref::<T>())
    }

    /// Removes the item at `index` and hands it back detached.
    pub fn remove(&mut self, index: usize) -> Option<Box<dyn SBase>> {
        if index >= self.items.len() {
            return None;
        }
        let mut item = self.items.remove(index);
        item.detach();
        Some(item)
    }

    pub fn remove_by_id(&mut self, id: &str) -> Option<Box<dyn SBase>> {
        let index = self.items.iter().position(|item| item.id() == Some(id))?;
        self.remove(index)
    }

    /// Destroys every item. The type lock is kept.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Hands every item back to the caller, detached. The type lock is kept.
    pub fn detach_all(&mut self) -> Vec<Box<dyn SBase>> {
        let mut items = std::mem::take(&mut self.items);
        for item in items.iter_mut() {
            item.detach();
        }
        items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn SBase> {
        self.items.iter().map(|item| &**item)
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Box<dyn SBase>> {
        self.items.iter_mut()
    }

    /// Namespace URI of the items this container reads.
    fn item_uri(&self) -> Option<&'static str> {
        let kind = self.kind?;
        if kind.package == "core" {
            Some(self.namespaces().core_uri())
        } else {
            self.namespaces().package(kind.package).map(|p| p.uri)
        }
    }
}

impl SBase for ListOf {
    sbase_boilerplate!();

    fn type_code(&self) -> TypeCode {
        TypeCode::ListOf
    }

    fn element_name(&self) -> &'static str {
        self.kind.map(|k| k.element_name).unwrap_or("listOf")
    }

    fn package_name(&self) -> &'static str {
        self.kind.map(|k| k.package).unwrap_or("core")
    }

    fn children(&self) -> Vec<&dyn SBase> {
        self.iter().collect()
    }

    fn read_attributes(
        &mut self,
        attrs: &XmlAttributes,
        expected: &ExpectedAttributes,
        log: &mut ErrorLog,
    ) {
        match self.kind.and_then(|k| k.allowed_attributes) {
            Some(code) => read_base_and_reclassify(self, attrs, expected, log, code),
            None => read_base_attributes(self, attrs, expected, log),
        }
    }

    fn children_mut(&mut self) -> Vec<&mut dyn SBase> {
        self.items
            .iter_mut()
            .map(|item| &mut **item as &mut dyn SBase)
            .collect()
    }

    fn create_object(&mut self, start: &XmlTriple) -> Option<&mut dyn SBase> {
        let kind = self.kind?;
        let uri = self.item_uri()?;
        if start.name != kind.item_element || start.uri != uri {
            return None;
        }
        let item = (kind.create)(self.namespaces());
        self.append_and_own(item).ok()?;
        self.items
            .last_mut()
            .map(|item| &mut **item as &mut dyn SBase)
    }

    fn write_elements(&self, out: &mut XmlOutputStream<'_>) {
        for item in self.iter() {
            write_element(item, out);
        }
    }

    /// Empty containers are written only when they carry content of their own.
    fn should_write(&self) -> bool {
        !self.items.is_empty() || self.base.has_content()
    }

    fn on_read_finished(&mut self, log: &mut ErrorLog) {
        let (level, version) = (self.level(), self.version());
        if self.items.is_empty() && matches!((level, version), (2, 4) | (3, 1)) {
            my_trace!(
                ElementContext {
                    element: self.element_name(),
                    line: self.line(),
                    column: self.column()
                },
                "empty container"
            );
            log.log(
                SbmlError::new(
                    EMPTY_LIST_ELEMENT,
                    format!("The <{}> element is empty.", self.element_name()),
                )
                .with_level_version(level, version)
                .at(self.line(), self.column()),
            );
        }
    }
}

/// Generates typed accessors for a `ListOf` field holding items of one type.
///
/// `add` copies the item and refuses an id already present in the container;
/// `create` appends a fresh item built from the owner's namespaces.
macro_rules! list_accessors {
    (
        $field:ident: $ty:ty,
        add: $add:ident,
        create: $create:ident,
        get: $get:ident,
        get_mut: $get_mut:ident,
        get_by_id: $get_by_id:ident,
        remove: $remove:ident,
        num: $num:ident,
        list: $list:ident,
        list_mut: $list_mut:ident $(,)?
    ) => {
        pub fn $add(&mut self, item: &$ty) -> $crate::types::OperationResult {
            if let Some(id) = $crate::sbase::SBase::id(item) {
                if self.$field.get_by_id(id).is_some() {
                    return Err($crate::types::OperationError::DuplicateObjectId);
                }
            }
            self.$field.append(item)
        }

        pub fn $create(&mut self) -> Option<&mut $ty> {
            let item = <$ty>::with_namespaces(self.namespaces().clone());
            self.$field.append_new(item)
        }

        pub fn $get(&self, index: usize) -> Option<&$ty> {
            self.$field.get_as::<$ty>(index)
        }

        pub fn $get_mut(&mut self, index: usize) -> Option<&mut $ty> {
            self.$field.get_as_mut::<$ty>(index)
        }

        pub fn $get_by_id(&self, id: &str) -> Option<&$ty> {
            self.$field.get_by_id(id)?.downcast_ref::<$ty>()
        }

        /// Removes the item at `index` and hands it back detached.
        pub fn $remove(&mut self, index: usize) -> Option<$ty> {
            let item = self.$field.remove(index)?;
            item.into_any().downcast::<$ty>().ok().map(|boxed| *boxed)
        }

        pub fn $num(&self) -> usize {
            self.$field.len()
        }

        pub fn $list(&self) -> &$crate::list_of::ListOf {
            &self.$field
        }

        pub fn $list_mut(&mut self) -> &mut $crate::list_of::ListOf {
            &mut self.$field
        }
    };
}

pub(crate) use list_accessors;
