// crates/sbml-rs/src/packages/fbc/association.rs

//! Gene product associations: a boolean rule over gene products, stored as a
//! tree of `and`, `or` and `geneProductRef` nodes under one
//! `geneProductAssociation`.

use super::FBC_PACKAGE;
use super::errors::{
    FBC_ALLOWED_ATTRIBUTES_ON_AND, FBC_ALLOWED_ATTRIBUTES_ON_GENE_PRODUCT_ASSOCIATION,
    FBC_ALLOWED_ATTRIBUTES_ON_GENE_PRODUCT_REF, FBC_ALLOWED_ATTRIBUTES_ON_OR, FBC_AND_TWO_CHILDREN,
    FBC_GENE_PRODUCT_ASSOCIATION_CONTAINS_ONE, FBC_GENE_PRODUCT_REF_MUST_EXIST, FBC_OR_TWO_CHILDREN,
};
use super::infix::{InfixError, parse_infix, to_infix};
use crate::error::{ErrorLog, SbmlConstructorError, SbmlError};
use crate::list_of::{ListOf, ListOfKind};
use crate::model::Model;
use crate::namespaces::SbmlNamespaces;
use crate::sbase::{
    AttributeReader, ParentLink, SBase, SBaseData, add_base_expected_attributes,
    read_base_and_reclassify, sbase_boilerplate, write_base_attributes, write_element,
};
use crate::types::{OperationError, OperationResult, TypeCode, is_valid_sid};
use crate::xml::{
    ExpectedAttributes, XmlAttributes, XmlInputStream, XmlOutputStream, XmlStartTag, XmlTriple,
};

/// Node types allowed inside `and`, `or` and `geneProductAssociation`.
pub(crate) fn is_association(code: TypeCode) -> bool {
    matches!(
        code,
        TypeCode::FbcAnd | TypeCode::FbcOr | TypeCode::FbcGeneProductRef
    )
}

fn is_association_element(name: &str) -> bool {
    matches!(name, "and" | "or" | "geneProductRef")
}

/// Builds an empty association node for its element name.
pub(crate) fn new_association(name: &str, ns: &SbmlNamespaces) -> Option<Box<dyn SBase>> {
    let node: Box<dyn SBase> = match name {
        "and" => Box::new(FbcAnd::with_namespaces(ns.clone())),
        "or" => Box::new(FbcOr::with_namespaces(ns.clone())),
        "geneProductRef" => Box::new(GeneProductRef::with_namespaces(ns.clone())),
        _ => return None,
    };
    Some(node)
}

fn new_gene_product_ref(ns: &SbmlNamespaces) -> Box<dyn SBase> {
    Box::new(GeneProductRef::with_namespaces(ns.clone()))
}

/// Operands of `and`/`or`. Never written as an element of its own.
static LIST_OF_ASSOCIATIONS: ListOfKind = ListOfKind {
    element_name: "listOfAssociations",
    package: FBC_PACKAGE,
    item_element: "geneProductRef",
    item_type: TypeCode::FbcAssociation,
    create: new_gene_product_ref,
    accepts: Some(is_association),
    allowed_attributes: None,
};

/// Generates `FbcAnd` and `FbcOr`, which differ only in name and codes.
macro_rules! junction {
    (
        $(#[$meta:meta])*
        $name:ident,
        type_code: $code:expr,
        element: $element:literal,
        allowed: $allowed:expr,
        two_children: $two:expr $(,)?
    ) => {
        $(#[$meta])*
        #[derive(Debug)]
        pub struct $name {
            base: SBaseData,
            associations: ListOf,
        }

        impl Clone for $name {
            fn clone(&self) -> Self {
                let mut copy = $name {
                    base: self.base.clone(),
                    associations: self.associations.clone(),
                };
                copy.connect_to_child();
                copy
            }
        }

        impl $name {
            pub fn new(
                level: u32,
                version: u32,
                package_version: u32,
            ) -> Result<Self, SbmlConstructorError> {
                let ns = SbmlNamespaces::with_package(level, version, FBC_PACKAGE, package_version)?;
                Ok(Self::with_namespaces(ns))
            }

            pub fn with_namespaces(namespaces: SbmlNamespaces) -> Self {
                $name {
                    base: SBaseData::new(namespaces.clone(), $code),
                    associations: ListOf::of_kind(&LIST_OF_ASSOCIATIONS, namespaces),
                }
            }

            /// Appends a copy of `association`, which must be an `and`, an
            /// `or` or a `geneProductRef`.
            pub fn add_association(&mut self, association: &dyn SBase) -> OperationResult {
                self.add_association_owned(association.clone_box())
            }

            pub(crate) fn add_association_owned(
                &mut self,
                association: Box<dyn SBase>,
            ) -> OperationResult {
                self.associations.append_and_own(association)?;
                self.connect_to_child();
                Ok(())
            }

            fn push<T: SBase>(&mut self, node: T) -> Option<&mut T> {
                self.add_association_owned(Box::new(node)).ok()?;
                let last = self.associations.len().checked_sub(1)?;
                self.associations.get_as_mut::<T>(last)
            }

            pub fn create_and(&mut self) -> Option<&mut FbcAnd> {
                let node = FbcAnd::with_namespaces(self.namespaces().clone());
                self.push(node)
            }

            pub fn create_or(&mut self) -> Option<&mut FbcOr> {
                let node = FbcOr::with_namespaces(self.namespaces().clone());
                self.push(node)
            }

            pub fn create_gene_product_ref(&mut self) -> Option<&mut GeneProductRef> {
                let node = GeneProductRef::with_namespaces(self.namespaces().clone());
                self.push(node)
            }

            pub fn get_association(&self, index: usize) -> Option<&dyn SBase> {
                self.associations.get(index)
            }

            pub fn get_association_mut(&mut self, index: usize) -> Option<&mut dyn SBase> {
                self.associations.get_mut(index)
            }

            /// Removes the operand at `index` and hands it back detached.
            pub fn remove_association(&mut self, index: usize) -> Option<Box<dyn SBase>> {
                self.associations.remove(index)
            }

            pub fn num_associations(&self) -> usize {
                self.associations.len()
            }

            pub fn associations(&self) -> impl Iterator<Item = &dyn SBase> {
                self.associations.iter()
            }

            pub fn list_of_associations(&self) -> &ListOf {
                &self.associations
            }
        }

        impl SBase for $name {
            sbase_boilerplate!();

            fn type_code(&self) -> TypeCode {
                $code
            }

            fn element_name(&self) -> &'static str {
                $element
            }

            /// Operands are owned through the container but parented to this node.
            fn children(&self) -> Vec<&dyn SBase> {
                self.associations.children()
            }

            fn children_mut(&mut self) -> Vec<&mut dyn SBase> {
                self.associations.children_mut()
            }

            fn read_attributes(
                &mut self,
                attrs: &XmlAttributes,
                expected: &ExpectedAttributes,
                log: &mut ErrorLog,
            ) {
                read_base_and_reclassify(self, attrs, expected, log, $allowed);
            }

            fn create_object(&mut self, start: &XmlTriple) -> Option<&mut dyn SBase> {
                if start.uri != self.namespaces().attribute_uri_for(FBC_PACKAGE) {
                    return None;
                }
                let node = new_association(&start.name, self.namespaces())?;
                self.add_association_owned(node).ok()?;
                let last = self.associations.len().checked_sub(1)?;
                self.associations.get_mut(last)
            }

            fn write_elements(&self, out: &mut XmlOutputStream<'_>) {
                for node in self.associations.iter() {
                    write_element(node, out);
                }
            }

            fn on_read_finished(&mut self, log: &mut ErrorLog) {
                if self.associations.len() < 2 {
                    log.log(
                        SbmlError::new(
                            $two,
                            format!(
                                "The <{}> element has {} operand(s).",
                                $element,
                                self.associations.len()
                            ),
                        )
                        .with_level_version(self.level(), self.version())
                        .at(self.line(), self.column()),
                    );
                }
            }
        }
    };
}

junction!(
    /// Conjunction: every operand is needed.
    FbcAnd,
    type_code: TypeCode::FbcAnd,
    element: "and",
    allowed: FBC_ALLOWED_ATTRIBUTES_ON_AND,
    two_children: FBC_AND_TWO_CHILDREN,
);

junction!(
    /// Disjunction: any operand suffices.
    FbcOr,
    type_code: TypeCode::FbcOr,
    element: "or",
    allowed: FBC_ALLOWED_ATTRIBUTES_ON_OR,
    two_children: FBC_OR_TWO_CHILDREN,
);

/// Leaf of an association: one gene product.
#[derive(Debug, Clone)]
pub struct GeneProductRef {
    base: SBaseData,
    gene_product: Option<String>,
}

impl GeneProductRef {
    pub fn new(level: u32, version: u32, package_version: u32) -> Result<Self, SbmlConstructorError> {
        let ns = SbmlNamespaces::with_package(level, version, FBC_PACKAGE, package_version)?;
        Ok(Self::with_namespaces(ns))
    }

    pub fn with_namespaces(namespaces: SbmlNamespaces) -> Self {
        GeneProductRef {
            base: SBaseData::new(namespaces, TypeCode::FbcGeneProductRef),
            gene_product: None,
        }
    }

    pub fn gene_product(&self) -> Option<&str> {
        self.gene_product.as_deref()
    }

    pub fn set_gene_product(&mut self, gene_product: &str) -> OperationResult {
        if !is_valid_sid(gene_product) {
            return Err(OperationError::InvalidAttributeValue);
        }
        self.gene_product = Some(gene_product.to_string());
        Ok(())
    }
}

impl SBase for GeneProductRef {
    sbase_boilerplate!();

    fn type_code(&self) -> TypeCode {
        TypeCode::FbcGeneProductRef
    }

    fn element_name(&self) -> &'static str {
        "geneProductRef"
    }

    fn add_expected_attributes(&self, expected: &mut ExpectedAttributes) {
        add_base_expected_attributes(self, expected);
        expected.add("geneProduct", self.namespaces().attribute_uri_for(FBC_PACKAGE));
    }

    fn read_attributes(
        &mut self,
        attrs: &XmlAttributes,
        expected: &ExpectedAttributes,
        log: &mut ErrorLog,
    ) {
        let code = FBC_ALLOWED_ATTRIBUTES_ON_GENE_PRODUCT_REF;
        read_base_and_reclassify(self, attrs, expected, log, code);
        let uri = self.namespaces().attribute_uri_for(FBC_PACKAGE);
        let reader = AttributeReader::new(self, attrs, uri, code);
        self.gene_product = reader.sid_ref("geneProduct", true, log);
    }

    fn write_attributes(&self, out: &mut XmlOutputStream<'_>) {
        write_base_attributes(self, out);
        if let Some(gene_product) = &self.gene_product {
            let prefix = self.namespaces().prefix_for(FBC_PACKAGE);
            out.write_attribute(&prefix, "geneProduct", gene_product);
        }
    }

    fn check_references(&self, model: &Model, log: &mut ErrorLog) {
        let Some(gene_product) = self.gene_product() else {
            return;
        };
        let found = model
            .fbc()
            .is_some_and(|fbc| fbc.get_gene_product_by_id(gene_product).is_some());
        if !found {
            log.log(
                SbmlError::new(
                    FBC_GENE_PRODUCT_REF_MUST_EXIST,
                    format!("The gene product '{}' is not defined.", gene_product),
                )
                .with_level_version(self.level(), self.version())
                .at(self.line(), self.column()),
            );
        }
    }
}

/// The gene rule of a reaction: exactly one association node.
#[derive(Debug)]
pub struct GeneProductAssociation {
    base: SBaseData,
    association: Option<Box<dyn SBase>>,
    /// Association elements read after the first one.
    surplus: usize,
}

impl Clone for GeneProductAssociation {
    fn clone(&self) -> Self {
        let mut copy = GeneProductAssociation {
            base: self.base.clone(),
            association: self.association.clone(),
            surplus: self.surplus,
        };
        copy.connect_to_child();
        copy
    }
}

impl GeneProductAssociation {
    pub fn new(level: u32, version: u32, package_version: u32) -> Result<Self, SbmlConstructorError> {
        let ns = SbmlNamespaces::with_package(level, version, FBC_PACKAGE, package_version)?;
        Ok(Self::with_namespaces(ns))
    }

    pub fn with_namespaces(namespaces: SbmlNamespaces) -> Self {
        GeneProductAssociation {
            base: SBaseData::new(namespaces, TypeCode::FbcGeneProductAssociation),
            association: None,
            surplus: 0,
        }
    }

    pub fn association(&self) -> Option<&dyn SBase> {
        self.association.as_deref()
    }

    pub fn association_mut(&mut self) -> Option<&mut dyn SBase> {
        self.association
            .as_mut()
            .map(|node| &mut **node as &mut dyn SBase)
    }

    /// Replaces the association with a copy of `association`.
    pub fn set_association(&mut self, association: &dyn SBase) -> OperationResult {
        if !is_association(association.type_code()) {
            return Err(OperationError::InvalidObject);
        }
        if association.level() != self.level() {
            return Err(OperationError::LevelMismatch);
        }
        if association.version() != self.version() {
            return Err(OperationError::VersionMismatch);
        }
        self.install(association.clone_box());
        Ok(())
    }

    fn install(&mut self, mut node: Box<dyn SBase>) -> &mut dyn SBase {
        node.connect_to_parent(ParentLink {
            type_code: TypeCode::FbcGeneProductAssociation,
            element_name: "geneProductAssociation",
            document: self.base.document.clone(),
        });
        &mut **self.association.insert(node)
    }

    fn install_typed<T: SBase>(&mut self, node: T) -> Option<&mut T> {
        self.install(Box::new(node));
        self.association.as_mut()?.as_any_mut().downcast_mut::<T>()
    }

    pub fn create_and(&mut self) -> Option<&mut FbcAnd> {
        let node = FbcAnd::with_namespaces(self.namespaces().clone());
        self.install_typed(node)
    }

    pub fn create_or(&mut self) -> Option<&mut FbcOr> {
        let node = FbcOr::with_namespaces(self.namespaces().clone());
        self.install_typed(node)
    }

    pub fn create_gene_product_ref(&mut self) -> Option<&mut GeneProductRef> {
        let node = GeneProductRef::with_namespaces(self.namespaces().clone());
        self.install_typed(node)
    }

    /// Takes the association out, detached.
    pub fn unset_association(&mut self) -> Option<Box<dyn SBase>> {
        let mut node = self.association.take()?;
        node.detach();
        Some(node)
    }

    /// The association as text, e.g. `(g1 and g2) or g3`. Empty when unset.
    pub fn to_infix(&self) -> String {
        self.association().map(to_infix).unwrap_or_default()
    }

    /// Replaces the association with the tree parsed from `infix`. On error
    /// the current association is kept.
    pub fn set_association_from_infix(&mut self, infix: &str) -> Result<(), InfixError> {
        let node = parse_infix(infix, self.namespaces())?;
        self.install(node);
        Ok(())
    }
}

impl SBase for GeneProductAssociation {
    sbase_boilerplate!();

    fn type_code(&self) -> TypeCode {
        TypeCode::FbcGeneProductAssociation
    }

    fn element_name(&self) -> &'static str {
        "geneProductAssociation"
    }

    fn children(&self) -> Vec<&dyn SBase> {
        self.association.iter().map(|node| &**node).collect()
    }

    fn children_mut(&mut self) -> Vec<&mut dyn SBase> {
        self.association
            .iter_mut()
            .map(|node| &mut **node as &mut dyn SBase)
            .collect()
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
            FBC_ALLOWED_ATTRIBUTES_ON_GENE_PRODUCT_ASSOCIATION,
        );
    }

    fn create_object(&mut self, start: &XmlTriple) -> Option<&mut dyn SBase> {
        let fbc_uri = self.namespaces().attribute_uri_for(FBC_PACKAGE);
        if self.association.is_some() || start.uri != fbc_uri {
            return None;
        }
        let node = new_association(&start.name, self.namespaces())?;
        Some(self.install(node))
    }

    /// Counts and skips association elements beyond the first.
    fn read_other_element(&mut self, start: &XmlStartTag, stream: &mut XmlInputStream<'_>) -> bool {
        let fbc_uri = self.namespaces().attribute_uri_for(FBC_PACKAGE);
        if start.triple.uri != fbc_uri || !is_association_element(&start.triple.name) {
            return false;
        }
        self.surplus += 1;
        stream.skip_element(start);
        true
    }

    fn write_elements(&self, out: &mut XmlOutputStream<'_>) {
        if let Some(node) = &self.association {
            write_element(node.as_ref(), out);
        }
    }

    fn on_read_finished(&mut self, log: &mut ErrorLog) {
        if self.association.is_none() || self.surplus > 0 {
            log.log(
                SbmlError::new(
                    FBC_GENE_PRODUCT_ASSOCIATION_CONTAINS_ONE,
                    format!(
                        "The <geneProductAssociation> element contains {} association(s).",
                        usize::from(self.association.is_some()) + self.surplus
                    ),
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
    use crate::model::Species;

    fn gpa() -> GeneProductAssociation {
        GeneProductAssociation::new(3, 1, 2).unwrap()
    }

    #[test]
    fn test_junction_accepts_only_associations() {
        let mut and = FbcAnd::new(3, 1, 2).unwrap();
        let species = Species::new(3, 1).unwrap();
        assert_eq!(and.add_association(&species), Err(OperationError::InvalidObject));

        and.create_gene_product_ref().unwrap().set_gene_product("g1").unwrap();
        and.create_or().unwrap();
        let mut r = GeneProductRef::new(3, 1, 2).unwrap();
        r.set_gene_product("g2").unwrap();
        and.add_association(&r).unwrap();
        assert_eq!(and.num_associations(), 3);
        assert_eq!(and.list_of_associations().item_type_code(), TypeCode::FbcAssociation);
    }

    #[test]
    fn test_operands_are_parented_to_the_node() {
        let mut and = FbcAnd::new(3, 1, 2).unwrap();
        and.create_gene_product_ref().unwrap();
        let link = and.get_association(0).unwrap().parent().unwrap();
        assert_eq!(link.type_code, TypeCode::FbcAnd);
        assert_eq!(link.element_name, "and");

        let copy = and.clone();
        assert_eq!(copy.get_association(0).unwrap().parent().unwrap().element_name, "and");
    }

    #[test]
    fn test_association_is_replaced() {
        let mut gpa = gpa();
        gpa.create_gene_product_ref().unwrap().set_gene_product("g1").unwrap();
        gpa.create_or().unwrap();
        assert_eq!(gpa.association().unwrap().type_code(), TypeCode::FbcOr);
        assert_eq!(gpa.children().len(), 1);

        let removed = gpa.unset_association().unwrap();
        assert!(removed.parent().is_none());
        assert!(gpa.association().is_none());
    }

    #[test]
    fn test_set_association_checks_type() {
        let mut gpa = gpa();
        let species = Species::new(3, 1).unwrap();
        assert_eq!(gpa.set_association(&species), Err(OperationError::InvalidObject));
        let or = FbcOr::new(3, 2, 2).unwrap();
        assert_eq!(gpa.set_association(&or), Err(OperationError::VersionMismatch));
    }

    #[test]
    fn test_infix_round_trip() {
        let mut gpa = gpa();
        gpa.set_association_from_infix("(g1 and g2) or g3").unwrap();
        assert_eq!(gpa.association().unwrap().type_code(), TypeCode::FbcOr);
        assert_eq!(gpa.to_infix(), "(g1 and g2) or g3");

        assert!(gpa.set_association_from_infix("g1 and (g2").is_err());
        assert_eq!(gpa.to_infix(), "(g1 and g2) or g3");
    }
}
