// crates/sbml-rs/tests/round_trip.rs

use sbml_rs::error::table::{
    ALLOWED_ATTRIBUTES_ON_LIST_OF_SPECIES, ALLOWED_ATTRIBUTES_ON_LIST_OF_SPECIES_REFERENCES,
    DUPLICATE_COMPONENT_ID, UNKNOWN_CORE_ATTRIBUTE, XML_FILE_UNWRITABLE,
};
use sbml_rs::{
    SBase, SbmlDocument, SbmlReader, SbmlWriter, read_sbml, read_sbml_from_string, write_sbml,
    write_sbml_to_string,
};
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
fn test_read_core_model() {
    let doc = read_sbml_from_string(&load_test_file("core_l3v2.xml"));
    assert_eq!(doc.num_errors(), 0, "{:?}", doc.errors());
    assert_eq!((doc.level(), doc.version()), (3, 2));

    let model = doc.model().expect("model");
    assert_eq!(model.id(), Some("hexokinase_step"));
    assert_eq!(model.name(), Some("Hexokinase step"));
    assert_eq!(model.num_compartments(), 1);
    assert_eq!(model.num_species(), 3);
    assert_eq!(model.num_parameters(), 1);

    let cell = model.get_compartment_by_id("cell").unwrap();
    assert_eq!(cell.size(), Some(1.0));
    assert_eq!(cell.spatial_dimensions(), Some(3.0));

    let atp = model.get_species_by_id("atp").unwrap();
    assert_eq!(atp.boundary_condition(), Some(true));
    assert_eq!(atp.initial_concentration(), Some(2.5));
    assert_eq!(model.get_species(2).unwrap().meta_id(), Some("_g6p"));

    let hk = model.get_reaction_by_id("hk").unwrap();
    assert_eq!(hk.reversible(), Some(false));
    assert_eq!(hk.num_reactants(), 2);
    assert_eq!(hk.get_product(0).unwrap().species(), Some("g6p"));
    assert_eq!(hk.get_reactant(1).unwrap().line(), 19);
}

#[test]
fn test_file_round_trip() {
    let mut doc = read_sbml_from_string(&load_test_file("core_l3v2.xml"));
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("hexokinase.xml");

    assert!(write_sbml(&mut doc, &path));
    let back = read_sbml(&path);
    assert_eq!(back.num_errors(), 0, "{:?}", back.errors());
    assert_eq!(
        write_sbml_to_string(&back).unwrap(),
        write_sbml_to_string(&doc).unwrap()
    );
    assert_eq!(back.model().unwrap().get_species_by_id("glc").unwrap().compartment(), Some("cell"));
}

#[test]
fn test_unwritable_path_is_logged() {
    let mut doc = SbmlDocument::new(3, 2).unwrap();
    doc.create_model();
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("missing_dir").join("out.xml");

    assert!(!write_sbml(&mut doc, &path));
    assert!(doc.errors().contains(XML_FILE_UNWRITABLE));
}

#[test]
fn test_writer_options() {
    let mut doc = SbmlDocument::new(3, 1).unwrap();
    doc.create_model().set_id("m").unwrap();
    let xml = SbmlWriter::new()
        .with_program_name("modeller")
        .with_program_version("1.2")
        .with_indent(0)
        .write_sbml_to_string(&doc)
        .unwrap();
    assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
    assert!(xml.contains("<!-- Created by modeller version 1.2 -->"));
    assert!(xml.contains("level=\"3\" version=\"1\""));
}

#[test]
fn test_built_model_round_trip() {
    let mut doc = SbmlDocument::new(3, 1).unwrap();
    let model = doc.create_model();
    model.set_id("decay").unwrap();
    let c = model.create_compartment().unwrap();
    c.set_id("c").unwrap();
    c.set_constant(true);
    let s = model.create_species().unwrap();
    s.set_id("X").unwrap();
    s.set_compartment("c").unwrap();
    s.set_initial_amount(10.0);
    s.set_has_only_substance_units(true);
    s.set_boundary_condition(false);
    s.set_constant(false);
    let r = model.create_reaction().unwrap();
    r.set_id("decay_X").unwrap();
    r.set_reversible(false);
    r.set_fast(false).unwrap();
    let reactant = r.create_reactant().unwrap();
    reactant.set_species("X").unwrap();
    reactant.set_stoichiometry(1.0);
    reactant.set_constant(true).unwrap();

    assert_eq!(doc.check_consistency(), 0);
    let xml = write_sbml_to_string(&doc).unwrap();
    let back = read_sbml_from_string(&xml);
    assert_eq!(back.num_errors(), 0, "{:?}", back.errors());
    let reaction = back.model().unwrap().get_reaction(0).unwrap();
    assert_eq!(reaction.get_reactant(0).unwrap().species(), Some("X"));
    assert_eq!(back.model().unwrap().get_species(0).unwrap().initial_amount(), Some(10.0));
}

#[test]
fn test_consistency_after_read() {
    let mut xml = load_test_file("core_l3v2.xml");
    xml = xml.replace("<parameter id=\"k_hk\"", "<parameter id=\"glc\"");
    let mut doc = SbmlReader::new().read_sbml_from_bytes(xml.as_bytes());
    assert_eq!(doc.num_errors(), 0);
    assert_eq!(doc.check_consistency(), 1);
    assert!(doc.errors().contains(DUPLICATE_COMPONENT_ID));
}

#[test]
fn test_notes_and_annotation_round_trip() {
    let doc = read_sbml_from_string(&load_test_file("annotated_l3v2.xml"));
    assert_eq!(doc.num_errors(), 0, "{:?}", doc.errors());
    let prefixes: Vec<_> = doc.foreign_namespaces().iter().map(|(p, _)| p.as_str()).collect();
    assert_eq!(prefixes, ["html", "rdf"]);

    let model = doc.model().unwrap();
    assert!(model.notes().unwrap().contains("<html:p>First step of glycolysis.</html:p>"));
    let annotation = model.get_species_by_id("glc").unwrap().annotation().unwrap();
    assert!(annotation.starts_with("<annotation>"));
    assert!(annotation.contains("xmlns:bqbiol=\"http://biomodels.net/biology-qualifiers/\""));

    let xml = write_sbml_to_string(&doc).unwrap();
    assert!(xml.contains("xmlns:html=\"http://www.w3.org/1999/xhtml\""));
    assert!(xml.contains("xmlns:rdf=\"http://www.w3.org/1999/02/22-rdf-syntax-ns#\""));
    let back = read_sbml_from_string(&xml);
    assert_eq!(back.num_errors(), 0, "{:?}", back.errors());
    assert_eq!(write_sbml_to_string(&back).unwrap(), xml);
}

#[test]
fn test_notes_prefix_declared_on_root_survives_write() {
    let xml = "<sbml xmlns=\"http://www.sbml.org/sbml/level3/version2/core\" \
               xmlns:html=\"http://www.w3.org/1999/xhtml\" level=\"3\" version=\"2\">\
               <model id=\"m\"><notes><html:p>hello</html:p></notes></model></sbml>";
    let doc = read_sbml_from_string(xml);
    assert_eq!(doc.num_errors(), 0, "{:?}", doc.errors());

    let written = write_sbml_to_string(&doc).unwrap();
    let again = read_sbml_from_string(&written);
    assert_eq!(again.num_errors(), 0, "{:?}", again.errors());
    assert!(again.model().unwrap().notes().unwrap().contains("hello"));
}

#[test]
fn test_unknown_attributes_on_containers() {
    let xml = load_test_file("core_l3v2.xml")
        .replace("<listOfSpecies>", "<listOfSpecies foo=\"bar\">")
        .replace("<listOfProducts>", "<listOfProducts weight=\"2\">");
    let doc = read_sbml_from_string(&xml);
    assert_eq!(doc.num_errors(), 2, "{:?}", doc.errors());
    assert!(!doc.errors().contains(UNKNOWN_CORE_ATTRIBUTE));

    let on_species = doc.errors().error_with_code(ALLOWED_ATTRIBUTES_ON_LIST_OF_SPECIES).unwrap();
    assert!(on_species.message().contains("foo"));
    assert_eq!(on_species.line(), 7);
    assert_eq!(doc.errors().count_with_code(ALLOWED_ATTRIBUTES_ON_LIST_OF_SPECIES_REFERENCES), 1);
    assert_eq!(doc.model().unwrap().num_species(), 3);
}
