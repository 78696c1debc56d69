// crates/sbml-rs/src/validator.rs

//! Consistency checks over a document tree: identifier uniqueness and
//! cross-references between components.

use crate::document::SbmlDocument;
use crate::error::table::{DUPLICATE_COMPONENT_ID, DUPLICATE_METAID};
use crate::error::{ErrorLog, SbmlError};
use crate::log::{PassContext, my_debug, my_info};
use crate::sbase::{SBase, qualified_element_name, walk};
use std::collections::HashMap;

/// Runs every check and logs into `log`. Returns the number of entries logged.
pub fn check_consistency(doc: &SbmlDocument, log: &mut ErrorLog) -> usize {
    let before = log.len();
    let ctx = PassContext {
        pass: "consistency",
        source: doc
            .model()
            .and_then(|m| m.id())
            .unwrap_or("<no model id>")
            .to_string(),
    };
    my_debug!(ctx, "starting");

    check_unique_metaids(doc, log);
    if let Some(model) = doc.model() {
        check_unique_sids(model, log);
        walk(model, &mut |el| {
            el.check_references(model, log);
            for plugin in el.base().plugins() {
                plugin.check_references(model, log);
            }
        });
    }

    let count = log.len() - before;
    my_info!(ctx, "{} diagnostic(s)", count);
    count
}

/// `metaid` values share a single scope: the whole document.
fn check_unique_metaids(doc: &SbmlDocument, log: &mut ErrorLog) {
    let mut seen: HashMap<String, String> = HashMap::new();
    walk(doc, &mut |el| {
        let Some(meta_id) = el.meta_id() else {
            return;
        };
        match seen.get(meta_id) {
            Some(first) => log.log(duplicate(
                DUPLICATE_METAID,
                format!(
                    "The metaid '{}' on <{}> is already used by <{}>.",
                    meta_id,
                    qualified_element_name(el),
                    first
                ),
                el,
            )),
            None => {
                seen.insert(meta_id.to_string(), qualified_element_name(el));
            }
        }
    });
}

/// Component identifiers share the scope of the model, packages included.
fn check_unique_sids(model: &dyn SBase, log: &mut ErrorLog) {
    let mut seen: HashMap<String, String> = HashMap::new();
    walk(model, &mut |el| {
        let Some(id) = el.id() else {
            return;
        };
        match seen.get(id) {
            Some(first) => log.log(duplicate(
                DUPLICATE_COMPONENT_ID,
                format!(
                    "The id '{}' on <{}> is already used by <{}>.",
                    id,
                    qualified_element_name(el),
                    first
                ),
                el,
            )),
            None => {
                seen.insert(id.to_string(), qualified_element_name(el));
            }
        }
    });
}

fn duplicate(code: u32, details: String, el: &dyn SBase) -> SbmlError {
    SbmlError::new(code, details)
        .with_level_version(el.level(), el.version())
        .at(el.line(), el.column())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::table::{INVALID_SPECIES_COMPARTMENT_REF, INVALID_SPECIES_REFERENCE};

    fn document() -> SbmlDocument {
        let mut doc = SbmlDocument::new(3, 2).unwrap();
        let model = doc.create_model();
        model.set_id("m").unwrap();
        model.create_compartment().unwrap().set_id("cell").unwrap();
        let s = model.create_species().unwrap();
        s.set_id("A").unwrap();
        s.set_compartment("cell").unwrap();
        doc
    }

    #[test]
    fn test_clean_document_has_no_findings() {
        let doc = document();
        let mut log = ErrorLog::new();
        assert_eq!(check_consistency(&doc, &mut log), 0);
        assert!(log.is_empty());
    }

    #[test]
    fn test_duplicate_ids_across_lists() {
        let mut doc = document();
        let model = doc.model_mut().unwrap();
        model.create_parameter().unwrap().set_id("A").unwrap();
        let mut log = ErrorLog::new();
        assert_eq!(check_consistency(&doc, &mut log), 1);
        assert_eq!(log.error(0).unwrap().code(), DUPLICATE_COMPONENT_ID);
    }

    #[test]
    fn test_duplicate_metaids() {
        let mut doc = document();
        doc.set_meta_id("x").unwrap();
        let model = doc.model_mut().unwrap();
        model.set_meta_id("x").unwrap();
        let mut log = ErrorLog::new();
        check_consistency(&doc, &mut log);
        assert_eq!(log.count_with_code(DUPLICATE_METAID), 1);
    }

    #[test]
    fn test_dangling_references() {
        let mut doc = document();
        let model = doc.model_mut().unwrap();
        model.get_species_mut(0).unwrap().set_compartment("nowhere").unwrap();
        let reaction = model.create_reaction().unwrap();
        reaction.set_id("r1").unwrap();
        reaction.create_reactant().unwrap().set_species("ghost").unwrap();
        let mut log = ErrorLog::new();
        assert_eq!(check_consistency(&doc, &mut log), 2);
        assert!(log.contains(INVALID_SPECIES_COMPARTMENT_REF));
        assert!(log.contains(INVALID_SPECIES_REFERENCE));
    }
}
