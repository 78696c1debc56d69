// crates/sbml-rs/src/packages/fbc/plugins.rs

//! fbc extensions of `<model>`, `<reaction>` and `<species>`.

use super::FBC_PACKAGE;
use super::association::GeneProductAssociation;
use super::errors::{
    FBC_ALLOWED_ATTRIBUTES_ON_MODEL, FBC_ALLOWED_ATTRIBUTES_ON_REACTION,
    FBC_ALLOWED_ATTRIBUTES_ON_SPECIES, FBC_LOWER_FLUX_BOUND_MUST_EXIST, FBC_MODEL_STRICT_REQUIRED,
    FBC_UPPER_FLUX_BOUND_MUST_EXIST,
};
use super::gene_product::GeneProduct;
use super::objective::{ListOfObjectives, Objective};
use crate::document::DocumentContext;
use crate::error::{ErrorLog, SbmlError};
use crate::list_of::{ListOf, ListOfKind, list_accessors};
use crate::model::{Model, Reaction, Species};
use crate::namespaces::SbmlNamespaces;
use crate::sbase::{
    AttributeReader, ParentLink, SBase, SBasePlugin, plugin_boilerplate,
    reclassify_unknown_attributes, write_element,
};
use crate::types::{OperationError, OperationResult, TypeCode, is_valid_sid};
use crate::xml::{ExpectedAttributes, XmlAttributes, XmlOutputStream, XmlTriple};
use std::rc::Weak;

fn new_gene_product(ns: &SbmlNamespaces) -> Box<dyn SBase> {
    Box::new(GeneProduct::with_namespaces(ns.clone()))
}

static LIST_OF_GENE_PRODUCTS: ListOfKind = ListOfKind {
    element_name: "listOfGeneProducts",
    package: FBC_PACKAGE,
    item_element: "geneProduct",
    item_type: TypeCode::FbcGeneProduct,
    create: new_gene_product,
    accepts: None,
    allowed_attributes: None,
};

/// Reclassifies the host's generic diagnostics for unknown fbc attributes.
fn reclassify(log: &mut ErrorLog, since: usize, code: u32, ns: &SbmlNamespaces) {
    reclassify_unknown_attributes(
        log,
        since,
        false,
        Some(FBC_PACKAGE),
        code,
        ns.level(),
        ns.version(),
    );
}

/// fbc on `<model>`: the `strict` flag, objectives and gene products.
#[derive(Debug, Clone)]
pub struct FbcModelPlugin {
    ns: SbmlNamespaces,
    strict: Option<bool>,
    objectives: ListOfObjectives,
    gene_products: ListOf,
}

impl FbcModelPlugin {
    pub(crate) fn new(ns: &SbmlNamespaces) -> Self {
        FbcModelPlugin {
            ns: ns.clone(),
            strict: None,
            objectives: ListOfObjectives::with_namespaces(ns.clone()),
            gene_products: ListOf::of_kind(&LIST_OF_GENE_PRODUCTS, ns.clone()),
        }
    }

    /// Whether the model promises to follow the strict fbc rules.
    pub fn strict(&self) -> Option<bool> {
        self.strict
    }

    pub fn set_strict(&mut self, strict: bool) {
        self.strict = Some(strict);
    }

    pub fn unset_strict(&mut self) {
        self.strict = None;
    }

    list_accessors!(
        gene_products: GeneProduct,
        add: add_gene_product,
        create: create_gene_product,
        get: get_gene_product,
        get_mut: get_gene_product_mut,
        get_by_id: get_gene_product_by_id,
        remove: remove_gene_product,
        num: num_gene_products,
        list: list_of_gene_products,
        list_mut: list_of_gene_products_mut,
    );

    /// Gene product whose `label` is `label`.
    pub fn get_gene_product_by_label(&self, label: &str) -> Option<&GeneProduct> {
        self.gene_products
            .iter_as::<GeneProduct>()
            .find(|gp| gp.label() == Some(label))
    }

    pub fn list_of_objectives(&self) -> &ListOfObjectives {
        &self.objectives
    }

    pub fn list_of_objectives_mut(&mut self) -> &mut ListOfObjectives {
        &mut self.objectives
    }

    pub fn create_objective(&mut self) -> Option<&mut Objective> {
        self.objectives.create_objective()
    }

    pub fn get_objective(&self, index: usize) -> Option<&Objective> {
        self.objectives.get_objective(index)
    }

    pub fn get_objective_by_id(&self, id: &str) -> Option<&Objective> {
        self.objectives.get_objective_by_id(id)
    }

    pub fn num_objectives(&self) -> usize {
        self.objectives.num_objectives()
    }

    /// The objective named by `activeObjective`, if it exists.
    pub fn active_objective(&self) -> Option<&Objective> {
        self.objectives
            .active_objective()
            .and_then(|id| self.objectives.get_objective_by_id(id))
    }

    pub fn set_active_objective(&mut self, id: &str) -> OperationResult {
        self.objectives.set_active_objective(id)
    }
}

impl SBasePlugin for FbcModelPlugin {
    plugin_boilerplate!(FBC_PACKAGE);

    fn add_expected_attributes(&self, expected: &mut ExpectedAttributes) {
        expected.add("strict", self.uri());
    }

    fn read_attributes(
        &mut self,
        attrs: &XmlAttributes,
        log: &mut ErrorLog,
        since: usize,
        line: u32,
        column: u32,
    ) {
        reclassify(log, since, FBC_ALLOWED_ATTRIBUTES_ON_MODEL, &self.ns);
        let reader = AttributeReader::for_plugin(
            attrs,
            self.uri(),
            "model",
            FBC_MODEL_STRICT_REQUIRED,
            (self.ns.level(), self.ns.version()),
            (line, column),
        );
        self.strict = reader.boolean("strict", true, log);
    }

    fn write_attributes(&self, out: &mut XmlOutputStream<'_>) {
        if let Some(strict) = self.strict {
            out.write_bool_attribute(&self.prefix(), "strict", strict);
        }
    }

    fn create_object(&mut self, start: &XmlTriple) -> Option<&mut dyn SBase> {
        if start.uri != self.uri() {
            return None;
        }
        match start.name.as_str() {
            "listOfObjectives" => Some(&mut self.objectives as &mut dyn SBase),
            "listOfGeneProducts" => Some(&mut self.gene_products as &mut dyn SBase),
            _ => None,
        }
    }

    fn write_elements(&self, out: &mut XmlOutputStream<'_>) {
        write_element(&self.objectives, out);
        write_element(&self.gene_products, out);
    }

    fn children(&self) -> Vec<&dyn SBase> {
        vec![&self.objectives as &dyn SBase, &self.gene_products]
    }

    fn children_mut(&mut self) -> Vec<&mut dyn SBase> {
        vec![
            &mut self.objectives as &mut dyn SBase,
            &mut self.gene_products,
        ]
    }
}

/// fbc on `<reaction>`: flux bounds and the gene rule.
#[derive(Debug, Clone)]
pub struct FbcReactionPlugin {
    ns: SbmlNamespaces,
    lower_flux_bound: Option<String>,
    upper_flux_bound: Option<String>,
    gene_product_association: Option<GeneProductAssociation>,
    /// The reaction this plugin extends, once it has been connected.
    host: Option<ParentLink>,
}

impl FbcReactionPlugin {
    pub(crate) fn new(ns: &SbmlNamespaces) -> Self {
        FbcReactionPlugin {
            ns: ns.clone(),
            lower_flux_bound: None,
            upper_flux_bound: None,
            gene_product_association: None,
            host: None,
        }
    }

    /// Identifier of the parameter holding the lower flux bound.
    pub fn lower_flux_bound(&self) -> Option<&str> {
        self.lower_flux_bound.as_deref()
    }

    pub fn set_lower_flux_bound(&mut self, parameter: &str) -> OperationResult {
        if !is_valid_sid(parameter) {
            return Err(OperationError::InvalidAttributeValue);
        }
        self.lower_flux_bound = Some(parameter.to_string());
        Ok(())
    }

    pub fn unset_lower_flux_bound(&mut self) {
        self.lower_flux_bound = None;
    }

    pub fn upper_flux_bound(&self) -> Option<&str> {
        self.upper_flux_bound.as_deref()
    }

    pub fn set_upper_flux_bound(&mut self, parameter: &str) -> OperationResult {
        if !is_valid_sid(parameter) {
            return Err(OperationError::InvalidAttributeValue);
        }
        self.upper_flux_bound = Some(parameter.to_string());
        Ok(())
    }

    pub fn unset_upper_flux_bound(&mut self) {
        self.upper_flux_bound = None;
    }

    pub fn gene_product_association(&self) -> Option<&GeneProductAssociation> {
        self.gene_product_association.as_ref()
    }

    pub fn gene_product_association_mut(&mut self) -> Option<&mut GeneProductAssociation> {
        self.gene_product_association.as_mut()
    }

    /// Replaces the gene rule with a new, empty one.
    pub fn create_gene_product_association(&mut self) -> &mut GeneProductAssociation {
        let gpa = GeneProductAssociation::with_namespaces(self.ns.clone());
        self.install(gpa)
    }

    /// Installs a copy of `gpa`.
    pub fn set_gene_product_association(&mut self, gpa: &GeneProductAssociation) -> OperationResult {
        if gpa.level() != self.ns.level() {
            return Err(OperationError::LevelMismatch);
        }
        if gpa.version() != self.ns.version() {
            return Err(OperationError::VersionMismatch);
        }
        self.install(gpa.clone());
        Ok(())
    }

    /// Takes the gene rule out, detached.
    pub fn unset_gene_product_association(&mut self) -> Option<GeneProductAssociation> {
        let mut gpa = self.gene_product_association.take()?;
        gpa.detach();
        Some(gpa)
    }

    fn install(&mut self, mut gpa: GeneProductAssociation) -> &mut GeneProductAssociation {
        match &self.host {
            Some(link) => gpa.connect_to_parent(link.clone()),
            None => gpa.connect_to_child(),
        }
        self.gene_product_association.insert(gpa)
    }
}

impl SBasePlugin for FbcReactionPlugin {
    plugin_boilerplate!(FBC_PACKAGE);

    fn add_expected_attributes(&self, expected: &mut ExpectedAttributes) {
        expected.add("lowerFluxBound", self.uri());
        expected.add("upperFluxBound", self.uri());
    }

    fn read_attributes(
        &mut self,
        attrs: &XmlAttributes,
        log: &mut ErrorLog,
        since: usize,
        line: u32,
        column: u32,
    ) {
        reclassify(log, since, FBC_ALLOWED_ATTRIBUTES_ON_REACTION, &self.ns);
        let reader = AttributeReader::for_plugin(
            attrs,
            self.uri(),
            "reaction",
            FBC_ALLOWED_ATTRIBUTES_ON_REACTION,
            (self.ns.level(), self.ns.version()),
            (line, column),
        );
        self.lower_flux_bound = reader.sid_ref("lowerFluxBound", false, log);
        self.upper_flux_bound = reader.sid_ref("upperFluxBound", false, log);
    }

    fn write_attributes(&self, out: &mut XmlOutputStream<'_>) {
        let prefix = self.prefix();
        if let Some(bound) = &self.lower_flux_bound {
            out.write_attribute(&prefix, "lowerFluxBound", bound);
        }
        if let Some(bound) = &self.upper_flux_bound {
            out.write_attribute(&prefix, "upperFluxBound", bound);
        }
    }

    fn create_object(&mut self, start: &XmlTriple) -> Option<&mut dyn SBase> {
        if start.uri != self.uri() || start.name != "geneProductAssociation" {
            return None;
        }
        Some(self.create_gene_product_association() as &mut dyn SBase)
    }

    fn write_elements(&self, out: &mut XmlOutputStream<'_>) {
        if let Some(gpa) = &self.gene_product_association {
            write_element(gpa, out);
        }
    }

    fn children(&self) -> Vec<&dyn SBase> {
        self.gene_product_association
            .iter()
            .map(|gpa| gpa as &dyn SBase)
            .collect()
    }

    fn children_mut(&mut self) -> Vec<&mut dyn SBase> {
        self.gene_product_association
            .iter_mut()
            .map(|gpa| gpa as &mut dyn SBase)
            .collect()
    }

    fn connect_to_host(&mut self, link: &ParentLink) {
        self.host = Some(link.clone());
        if let Some(gpa) = &mut self.gene_product_association {
            gpa.connect_to_parent(link.clone());
        }
    }

    fn set_document(&mut self, document: &Weak<DocumentContext>) {
        if let Some(host) = &mut self.host {
            host.document = document.clone();
        }
        if let Some(gpa) = &mut self.gene_product_association {
            gpa.set_document(document);
        }
    }

    fn check_references(&self, model: &Model, log: &mut ErrorLog) {
        let bounds = [
            (&self.lower_flux_bound, FBC_LOWER_FLUX_BOUND_MUST_EXIST, "lower"),
            (&self.upper_flux_bound, FBC_UPPER_FLUX_BOUND_MUST_EXIST, "upper"),
        ];
        for (bound, code, which) in bounds {
            let Some(parameter) = bound else {
                continue;
            };
            if model.get_parameter_by_id(parameter).is_none() {
                log.log(
                    SbmlError::new(
                        code,
                        format!("The {} flux bound '{}' is not a defined parameter.", which, parameter),
                    )
                    .with_level_version(self.ns.level(), self.ns.version()),
                );
            }
        }
    }
}

/// fbc on `<species>`: charge and chemical formula.
#[derive(Debug, Clone)]
pub struct FbcSpeciesPlugin {
    ns: SbmlNamespaces,
    charge: Option<i32>,
    chemical_formula: Option<String>,
}

impl FbcSpeciesPlugin {
    pub(crate) fn new(ns: &SbmlNamespaces) -> Self {
        FbcSpeciesPlugin {
            ns: ns.clone(),
            charge: None,
            chemical_formula: None,
        }
    }

    pub fn charge(&self) -> Option<i32> {
        self.charge
    }

    pub fn set_charge(&mut self, charge: i32) {
        self.charge = Some(charge);
    }

    pub fn unset_charge(&mut self) {
        self.charge = None;
    }

    /// Hill-system formula, e.g. `C6H12O6`.
    pub fn chemical_formula(&self) -> Option<&str> {
        self.chemical_formula.as_deref()
    }

    pub fn set_chemical_formula(&mut self, formula: &str) -> OperationResult {
        if !formula.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(OperationError::InvalidAttributeValue);
        }
        self.chemical_formula = Some(formula.to_string());
        Ok(())
    }

    pub fn unset_chemical_formula(&mut self) {
        self.chemical_formula = None;
    }
}

impl SBasePlugin for FbcSpeciesPlugin {
    plugin_boilerplate!(FBC_PACKAGE);

    fn add_expected_attributes(&self, expected: &mut ExpectedAttributes) {
        expected.add("charge", self.uri());
        expected.add("chemicalFormula", self.uri());
    }

    fn read_attributes(
        &mut self,
        attrs: &XmlAttributes,
        log: &mut ErrorLog,
        since: usize,
        line: u32,
        column: u32,
    ) {
        reclassify(log, since, FBC_ALLOWED_ATTRIBUTES_ON_SPECIES, &self.ns);
        let reader = AttributeReader::for_plugin(
            attrs,
            self.uri(),
            "species",
            FBC_ALLOWED_ATTRIBUTES_ON_SPECIES,
            (self.ns.level(), self.ns.version()),
            (line, column),
        );
        self.charge = reader.int("charge", false, log);
        self.chemical_formula = reader.string("chemicalFormula", false, log);
    }

    fn write_attributes(&self, out: &mut XmlOutputStream<'_>) {
        let prefix = self.prefix();
        if let Some(charge) = self.charge {
            out.write_int_attribute(&prefix, "charge", i64::from(charge));
        }
        if let Some(formula) = &self.chemical_formula {
            out.write_attribute(&prefix, "chemicalFormula", formula);
        }
    }
}

impl Model {
    /// The fbc extension of this model, if fbc is enabled.
    pub fn fbc(&self) -> Option<&FbcModelPlugin> {
        self.get_plugin(FBC_PACKAGE)?.downcast_ref()
    }

    pub fn fbc_mut(&mut self) -> Option<&mut FbcModelPlugin> {
        self.get_plugin_mut(FBC_PACKAGE)?.downcast_mut()
    }
}

impl Reaction {
    pub fn fbc(&self) -> Option<&FbcReactionPlugin> {
        self.get_plugin(FBC_PACKAGE)?.downcast_ref()
    }

    pub fn fbc_mut(&mut self) -> Option<&mut FbcReactionPlugin> {
        self.get_plugin_mut(FBC_PACKAGE)?.downcast_mut()
    }
}

impl Species {
    pub fn fbc(&self) -> Option<&FbcSpeciesPlugin> {
        self.get_plugin(FBC_PACKAGE)?.downcast_ref()
    }

    pub fn fbc_mut(&mut self) -> Option<&mut FbcSpeciesPlugin> {
        self.get_plugin_mut(FBC_PACKAGE)?.downcast_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::SbmlDocument;

    fn fbc_document() -> SbmlDocument {
        let mut doc = SbmlDocument::new(3, 1).unwrap();
        doc.enable_package("fbc", 2, "fbc").unwrap();
        doc.create_model().set_id("m").unwrap();
        doc
    }

    #[test]
    fn test_plugins_follow_enable_package() {
        let mut doc = fbc_document();
        let model = doc.model_mut().unwrap();
        assert!(model.fbc().is_some());
        let reaction = model.create_reaction().unwrap();
        assert!(reaction.fbc().is_some());

        doc.disable_package("fbc").unwrap();
        let model = doc.model().unwrap();
        assert!(model.fbc().is_none());
        assert!(model.get_reaction(0).unwrap().fbc().is_none());
    }

    #[test]
    fn test_gene_products_are_parented_to_model() {
        let mut doc = fbc_document();
        let fbc = doc.model_mut().unwrap().fbc_mut().unwrap();
        let gp = fbc.create_gene_product().unwrap();
        gp.set_id("g1").unwrap();
        gp.set_label("b0001").unwrap();

        let model = doc.model().unwrap();
        let gp = model.fbc().unwrap().get_gene_product_by_label("b0001").unwrap();
        assert_eq!(gp.id(), Some("g1"));
        assert_eq!(gp.parent().unwrap().element_name, "listOfGeneProducts");
        assert!(gp.document().is_some());
        assert_eq!(model.element_by_sid("g1").unwrap().type_code(), TypeCode::FbcGeneProduct);
    }

    #[test]
    fn test_association_is_parented_to_reaction() {
        let mut doc = fbc_document();
        let reaction = doc.model_mut().unwrap().create_reaction().unwrap();
        reaction.set_id("r1").unwrap();
        let fbc = reaction.fbc_mut().unwrap();
        fbc.create_gene_product_association()
            .set_association_from_infix("g1 or g2")
            .unwrap();

        let reaction = doc.model().unwrap().get_reaction(0).unwrap();
        let gpa = reaction.fbc().unwrap().gene_product_association().unwrap();
        assert_eq!(gpa.parent().unwrap().type_code, TypeCode::Reaction);
        assert_eq!(gpa.to_infix(), "g1 or g2");
    }

    #[test]
    fn test_flux_bound_setters() {
        let ns = SbmlNamespaces::with_package(3, 1, "fbc", 2).unwrap();
        let mut plugin = FbcReactionPlugin::new(&ns);
        assert_eq!(plugin.set_lower_flux_bound("1x"), Err(OperationError::InvalidAttributeValue));
        plugin.set_upper_flux_bound("ub").unwrap();
        assert_eq!(plugin.upper_flux_bound(), Some("ub"));
    }

    #[test]
    fn test_species_formula() {
        let ns = SbmlNamespaces::with_package(3, 1, "fbc", 2).unwrap();
        let mut plugin = FbcSpeciesPlugin::new(&ns);
        assert_eq!(plugin.set_chemical_formula("C6 H12"), Err(OperationError::InvalidAttributeValue));
        plugin.set_chemical_formula("C6H12O6").unwrap();
        plugin.set_charge(-1);
        assert_eq!(plugin.charge(), Some(-1));
    }
}
