// crates/sbml-rs/tests/scenarios.rs

use sbml_rs::error::table::{
    EMPTY_LIST_ELEMENT, NOT_SCHEMA_CONFORMANT, XML_FILE_UNREADABLE,
};
use sbml_rs::{
    ItemTypeLock, ListOf, OperationError, Parameter, SBase, SbmlConstructorError, SbmlDocument,
    Species, TypeCode, read_sbml, read_sbml_from_string, write_sbml_to_string,
};
use std::fs;
use std::path::PathBuf;

/// Helper function to load a test file from the `tests/data/` directory.
fn load_test_file(name: &str) -> String {
    let _ = env_logger::builder().is_test(true).try_init();
    fs::read_to_string(data_path(name))
        .unwrap_or_else(|e| panic!("Failed to read test file {:?}: {}", data_path(name), e))
}

fn data_path(name: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("data");
    path.push(name);
    path
}

fn species(id: &str) -> Species {
    let mut s = Species::new(3, 2).unwrap();
    s.set_id(id).unwrap();
    s
}

/// A bare list takes the type of its first item and refuses any other.
#[test]
fn test_type_gate_locks_on_first_item() {
    let mut list = ListOf::new(3, 2).unwrap();
    assert_eq!(list.item_type_lock(), ItemTypeLock::Unconstrained);

    list.append(&species("S1")).unwrap();
    assert_eq!(list.item_type_lock(), ItemTypeLock::Constrained(TypeCode::Species));

    let mut p = Parameter::new(3, 2).unwrap();
    p.set_id("k1").unwrap();
    assert_eq!(list.append(&p), Err(OperationError::InvalidObject));
    assert_eq!(list.len(), 1);

    // The lock outlives the items that set it.
    list.clear();
    assert!(list.is_empty());
    assert_eq!(list.append(&p), Err(OperationError::InvalidObject));
}

#[test]
fn test_type_gate_on_model_lists() {
    let mut doc = SbmlDocument::new(3, 2).unwrap();
    let model = doc.create_model();
    let mut p = Parameter::new(3, 2).unwrap();
    p.set_id("k1").unwrap();
    assert_eq!(
        model.list_of_species_mut().append(&p),
        Err(OperationError::InvalidObject)
    );
    assert_eq!(model.num_species(), 0);

    let old = Species::new(2, 4).unwrap();
    assert_eq!(
        model.list_of_species_mut().append(&old),
        Err(OperationError::LevelMismatch)
    );
}

/// `append_from` copies; the source keeps its items and both lists own
/// independent objects.
#[test]
fn test_append_from_clones_items() {
    let mut source = ListOf::new(3, 2).unwrap();
    source.append(&species("A")).unwrap();
    source.append(&species("B")).unwrap();

    let mut target = ListOf::new(3, 2).unwrap();
    target.append(&species("C")).unwrap();
    target.append_from(&source).unwrap();

    assert_eq!(source.len(), 2);
    assert_eq!(target.len(), 3);
    let ids: Vec<_> = target.iter().filter_map(|s| s.id()).collect();
    assert_eq!(ids, ["C", "A", "B"]);

    target.get_as_mut::<Species>(1).unwrap().set_id("A2").unwrap();
    assert_eq!(source.get(0).unwrap().id(), Some("A"));
    assert_eq!(target.get(1).unwrap().parent().unwrap().element_name, "listOf");
}

#[test]
fn test_append_from_is_all_or_nothing() {
    let mut source = ListOf::new(3, 2).unwrap();
    source.append(&species("A")).unwrap();
    let mut mixed = ListOf::new(3, 2).unwrap();
    let mut p = Parameter::new(3, 2).unwrap();
    p.set_id("k").unwrap();
    mixed.append(&p).unwrap();

    assert_eq!(source.append_from(&mixed), Err(OperationError::InvalidObject));
    assert_eq!(source.len(), 1);
}

#[test]
fn test_missing_file_is_logged() {
    let path = data_path("does_not_exist.xml");
    let doc = read_sbml(&path);
    assert!(doc.model().is_none());
    assert_eq!(doc.num_errors(), 1);
    let error = doc.error(0).unwrap();
    assert_eq!(error.code(), XML_FILE_UNREADABLE);
    assert!(error.details().contains("does_not_exist.xml"));
}

#[test]
fn test_compressed_file_is_unreadable() {
    let doc = read_sbml(data_path("core_l3v2.xml.gz"));
    assert!(doc.errors().contains(XML_FILE_UNREADABLE));
}

#[test]
fn test_wrong_root_element() {
    let doc = read_sbml(data_path("wrong_root.xml"));
    assert!(doc.model().is_none());
    assert_eq!(doc.num_errors(), 1, "{:?}", doc.errors());
    assert!(doc.errors().contains(NOT_SCHEMA_CONFORMANT));
    assert!(doc.errors().has_critical());
    assert!(doc.error(0).unwrap().details().contains("notSbml"));
}

#[test]
fn test_unsupported_construction() {
    assert!(matches!(
        Species::new(9, 9),
        Err(SbmlConstructorError::UnsupportedLevelVersion { level: 9, version: 9 })
    ));
    assert!(matches!(
        SbmlDocument::new(3, 3),
        Err(SbmlConstructorError::UnsupportedLevelVersion { .. })
    ));
    assert!(ListOf::new(1, 2).is_err());
}

/// Empty containers are not written, and reading the output back yields the
/// same structure without new diagnostics.
#[test]
fn test_empty_containers_round_trip() {
    let mut doc = SbmlDocument::new(3, 2).unwrap();
    doc.create_model().set_id("m").unwrap();

    let xml = write_sbml_to_string(&doc).unwrap();
    assert!(xml.contains("<model id=\"m\""));
    assert!(!xml.contains("listOf"));

    let back = read_sbml_from_string(&xml);
    assert_eq!(back.num_errors(), 0, "{:?}", back.errors());
    let model = back.model().unwrap();
    assert_eq!(model.id(), Some("m"));
    assert_eq!(model.num_species(), 0);
    assert_eq!(write_sbml_to_string(&back).unwrap(), xml);
}

#[test]
fn test_empty_list_elements_are_reported_on_read() {
    let xml = load_test_file("empty_lists_l3v1.xml");
    let doc = read_sbml_from_string(&xml);
    assert_eq!(doc.errors().count_with_code(EMPTY_LIST_ELEMENT), 2);
    assert!(doc.model().is_some());

    let rewritten = write_sbml_to_string(&doc).unwrap();
    assert!(!rewritten.contains("listOfCompartments"));
    assert!(!rewritten.contains("listOfSpecies"));
}
