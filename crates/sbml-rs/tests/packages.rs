// crates/sbml-rs/tests/packages.rs

use sbml_rs::error::table::{REQUIRED_PACKAGE_PRESENT, UNREQUIRED_PACKAGE_PRESENT};
use sbml_rs::error::Severity;
use sbml_rs::{SBase, SbmlDocument, read_sbml_from_string, write_sbml_to_string};
use std::fs;
use std::path::PathBuf;

fn load_test_file(name: &str) -> String {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("data");
    path.push(name);

    fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read test file {:?}: {}", path, e))
}

#[test]
fn test_unknown_packages_are_reported() {
    let doc = read_sbml_from_string(&load_test_file("unknown_packages.xml"));
    assert_eq!(doc.errors().count_with_code(REQUIRED_PACKAGE_PRESENT), 1);
    assert_eq!(doc.errors().count_with_code(UNREQUIRED_PACKAGE_PRESENT), 1);
    assert!(doc.model().is_some());
    assert!(!doc.is_package_enabled("comp"));

    let required = doc.errors().error_with_code(REQUIRED_PACKAGE_PRESENT).unwrap();
    assert!(required.details().contains("comp"));
}

#[test]
fn test_diagnostics_as_json() {
    let doc = read_sbml_from_string(&load_test_file("unknown_packages.xml"));
    let json = doc.errors().to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    let entries = value.as_array().unwrap();
    assert_eq!(entries.len(), doc.num_errors());
    let codes: Vec<u64> = entries.iter().filter_map(|e| e["code"].as_u64()).collect();
    assert!(codes.contains(&u64::from(REQUIRED_PACKAGE_PRESENT)));
    assert!(entries.iter().all(|e| e["severity"].is_string()));
}

#[cfg(feature = "fbc")]
mod fbc {
    use super::*;
    use sbml_rs::packages::fbc::errors::{
        FBC_ACTIVE_OBJECTIVE_MUST_EXIST, FBC_GENE_PRODUCT_REF_MUST_EXIST,
        FBC_UPPER_FLUX_BOUND_MUST_EXIST,
    };
    use sbml_rs::packages::fbc::{FbcAnd, FbcOr, ObjectiveType};

    #[test]
    fn test_read_fbc_model() {
        let doc = read_sbml_from_string(&load_test_file("fbc_model.xml"));
        assert_eq!(doc.num_errors(), 0, "{:?}", doc.errors());
        assert!(doc.is_package_enabled("fbc"));
        assert_eq!(doc.package_required("fbc"), Some(false));

        let model = doc.model().unwrap();
        let fbc = model.fbc().expect("fbc model plugin");
        assert_eq!(fbc.strict(), Some(true));
        assert_eq!(fbc.num_gene_products(), 3);
        assert_eq!(fbc.get_gene_product_by_label("b0003").unwrap().associated_species(), Some("B"));

        let objective = fbc.active_objective().expect("active objective");
        assert_eq!(objective.id(), Some("biomass"));
        assert_eq!(objective.objective_type(), Some(ObjectiveType::Maximize));
        assert_eq!(objective.get_flux_objective(0).unwrap().reaction(), Some("R1"));

        let species = model.get_species_by_id("B").unwrap().fbc().unwrap();
        assert_eq!(species.charge(), Some(-2));
        assert!(species.chemical_formula().is_none());

        let reaction = model.get_reaction_by_id("R1").unwrap();
        let bounds = reaction.fbc().unwrap();
        assert_eq!(bounds.lower_flux_bound(), Some("zero"));
        assert_eq!(bounds.upper_flux_bound(), Some("cobra_max"));
        let gpa = bounds.gene_product_association().expect("association");
        assert_eq!(gpa.to_infix(), "g1 or (g2 and g3)");
        let or = gpa.association().unwrap().downcast_ref::<FbcOr>().unwrap();
        assert!(or.get_association(1).unwrap().is::<FbcAnd>());
        assert_eq!(gpa.parent().unwrap().element_name, "reaction");
    }

    #[test]
    fn test_fbc_model_is_consistent_and_round_trips() {
        let mut doc = read_sbml_from_string(&load_test_file("fbc_model.xml"));
        assert_eq!(doc.check_consistency(), 0, "{:?}", doc.errors());

        let xml = write_sbml_to_string(&doc).unwrap();
        assert!(xml.contains("fbc:required=\"false\""));
        assert!(xml.contains("<fbc:geneProduct fbc:id=\"g1\" fbc:label=\"b0001\"/>"));
        let back = read_sbml_from_string(&xml);
        assert_eq!(back.num_errors(), 0, "{:?}", back.errors());
        assert_eq!(write_sbml_to_string(&back).unwrap(), xml);
    }

    #[test]
    fn test_fbc_dangling_references() {
        let xml = load_test_file("fbc_model.xml")
            .replace("fbc:upperFluxBound=\"cobra_max\"", "fbc:upperFluxBound=\"nowhere\"")
            .replace("fbc:activeObjective=\"biomass\"", "fbc:activeObjective=\"growth\"")
            .replace("fbc:geneProduct=\"g3\"", "fbc:geneProduct=\"g4\"");
        let mut doc = read_sbml_from_string(&xml);
        assert_eq!(doc.num_errors(), 0, "{:?}", doc.errors());
        assert_eq!(doc.check_consistency(), 3);
        assert!(doc.errors().contains(FBC_UPPER_FLUX_BOUND_MUST_EXIST));
        assert!(doc.errors().contains(FBC_ACTIVE_OBJECTIVE_MUST_EXIST));
        let missing = doc.errors().error_with_code(FBC_GENE_PRODUCT_REF_MUST_EXIST).unwrap();
        assert_eq!(missing.package(), "fbc");
        assert!(missing.details().contains("g4"));
    }

    #[test]
    fn test_enable_fbc_and_build() {
        let mut doc = SbmlDocument::new(3, 1).unwrap();
        doc.enable_package("fbc", 2, "fbc").unwrap();
        let model = doc.create_model();
        let p = model.create_parameter().unwrap();
        p.set_id("ub").unwrap();
        p.set_constant(true);
        let r = model.create_reaction().unwrap();
        r.set_id("R1").unwrap();
        r.set_reversible(false);
        r.set_fast(false).unwrap();
        let plugin = r.fbc_mut().unwrap();
        plugin.set_upper_flux_bound("ub").unwrap();
        plugin
            .create_gene_product_association()
            .set_association_from_infix("a and b")
            .unwrap();
        let fbc = model.fbc_mut().unwrap();
        fbc.set_strict(false);
        for id in ["a", "b"] {
            let gp = fbc.create_gene_product().unwrap();
            gp.set_id(id).unwrap();
            gp.set_label(id).unwrap();
        }

        assert_eq!(doc.check_consistency(), 0, "{:?}", doc.errors());
        let xml = write_sbml_to_string(&doc).unwrap();
        assert!(xml.contains("xmlns:fbc=\"http://www.sbml.org/sbml/level3/version1/fbc/version2\""));
        assert!(xml.contains("fbc:upperFluxBound=\"ub\""));
        let back = read_sbml_from_string(&xml);
        assert_eq!(back.num_errors(), 0, "{:?}", back.errors());
        let gpa = back.model().unwrap().get_reaction(0).unwrap().fbc().unwrap();
        assert_eq!(gpa.gene_product_association().unwrap().to_infix(), "a and b");
    }
}

#[cfg(feature = "qual")]
mod qual {
    use super::*;
    use sbml_rs::packages::qual::errors::{
        QUAL_INITIAL_LEVEL_EXCEEDS_MAX, QUAL_OUTPUT_SPECIES_NOT_CONSTANT,
        QUAL_TRANSITION_FUNCTION_TERMS_REQUIRED,
    };
    use sbml_rs::packages::qual::{InputTransitionEffect, OutputTransitionEffect, Sign};

    #[test]
    fn test_read_qual_model() {
        let doc = read_sbml_from_string(&load_test_file("qual_model.xml"));
        assert_eq!(doc.num_errors(), 0, "{:?}", doc.errors());
        assert_eq!(doc.package_required("qual"), Some(true));

        let qual = doc.model().unwrap().qual().expect("qual model plugin");
        assert_eq!(qual.num_qualitative_species(), 2);
        let laci = qual.get_qualitative_species_by_id("LacI").unwrap();
        assert_eq!(laci.initial_level(), Some(1));
        assert_eq!(laci.max_level(), Some(1));

        let transition = qual.get_transition_by_id("tr_LacZ").unwrap();
        let input = transition.get_input_by_species("LacI").unwrap();
        assert_eq!(input.sign(), Some(Sign::Negative));
        assert_eq!(input.transition_effect(), Some(InputTransitionEffect::None));
        assert_eq!(input.threshold_level(), Some(1));
        let output = transition.get_output(0).unwrap();
        assert_eq!(output.transition_effect(), Some(OutputTransitionEffect::AssignmentLevel));

        let terms = transition.list_of_function_terms();
        assert_eq!(terms.default_term().unwrap().result_level(), Some(0));
        assert_eq!(terms.num_function_terms(), 1);
        let math = terms.get_function_term(0).unwrap().math().unwrap();
        assert!(math.starts_with("<math"));
        assert!(math.contains("<ci> LacI </ci>"));
    }

    #[test]
    fn test_qual_model_round_trips() {
        let mut doc = read_sbml_from_string(&load_test_file("qual_model.xml"));
        assert_eq!(doc.check_consistency(), 0, "{:?}", doc.errors());
        let xml = write_sbml_to_string(&doc).unwrap();
        assert!(xml.contains("qual:required=\"true\""));
        let default_at = xml.find("<qual:defaultTerm").unwrap();
        let term_at = xml.find("<qual:functionTerm").unwrap();
        assert!(default_at < term_at);

        let back = read_sbml_from_string(&xml);
        assert_eq!(back.num_errors(), 0, "{:?}", back.errors());
        let transition = back.model().unwrap().qual().unwrap().get_transition(0).unwrap();
        assert!(transition.list_of_function_terms().get_function_term(0).unwrap().math().is_some());
    }

    #[test]
    fn test_qual_rules() {
        let xml = load_test_file("qual_model.xml")
            .replace("qual:initialLevel=\"1\" qual:maxLevel=\"1\"", "qual:initialLevel=\"3\" qual:maxLevel=\"1\"")
            .replace(
                "qual:id=\"LacZ\" qual:compartment=\"cytosol\" qual:constant=\"false\"",
                "qual:id=\"LacZ\" qual:compartment=\"cytosol\" qual:constant=\"true\"",
            );
        let mut doc = read_sbml_from_string(&xml);
        assert_eq!(doc.num_errors(), 0, "{:?}", doc.errors());
        doc.check_consistency();
        assert!(doc.errors().contains(QUAL_INITIAL_LEVEL_EXCEEDS_MAX));
        assert!(doc.errors().contains(QUAL_OUTPUT_SPECIES_NOT_CONSTANT));
    }

    #[test]
    fn test_transition_without_function_terms() {
        let xml = load_test_file("qual_model.xml");
        let start = xml.find("<qual:listOfFunctionTerms>").unwrap();
        let end = xml.find("</qual:listOfFunctionTerms>").unwrap() + "</qual:listOfFunctionTerms>".len();
        let stripped = format!("{}{}", &xml[..start], &xml[end..]);

        let doc = read_sbml_from_string(&stripped);
        let error = doc
            .errors()
            .error_with_code(QUAL_TRANSITION_FUNCTION_TERMS_REQUIRED)
            .expect("missing function terms reported");
        assert_eq!(error.severity(), Severity::Error);
        assert_eq!(error.package(), "qual");
    }
}
