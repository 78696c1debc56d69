// crates/sbml-rs/src/packages/qual/extension.rs

use super::QUAL_PACKAGE;
use super::errors::QUAL_ERROR_TABLE;
use super::plugins::QualModelPlugin;
use crate::error::ErrorTableEntry;
use crate::namespaces::{PackageVersion, SbmlExtension, SbmlNamespaces};
use crate::sbase::SBasePlugin;
use crate::types::TypeCode;

pub const QUAL_XMLNS_V1: &str = "http://www.sbml.org/sbml/level3/version1/qual/version1";

static QUAL_VERSIONS: [PackageVersion; 2] = [
    PackageVersion {
        level: 3,
        version: 1,
        package_version: 1,
        uri: QUAL_XMLNS_V1,
    },
    PackageVersion {
        level: 3,
        version: 2,
        package_version: 1,
        uri: QUAL_XMLNS_V1,
    },
];

/// Registry entry of the qual package.
#[derive(Debug, Clone, Copy, Default)]
pub struct QualExtension;

impl SbmlExtension for QualExtension {
    fn name(&self) -> &'static str {
        QUAL_PACKAGE
    }

    fn default_prefix(&self) -> &'static str {
        "qual"
    }

    fn versions(&self) -> &'static [PackageVersion] {
        &QUAL_VERSIONS
    }

    fn default_required(&self) -> bool {
        true
    }

    fn create_plugin(&self, host: TypeCode, ns: &SbmlNamespaces) -> Option<Box<dyn SBasePlugin>> {
        match host {
            TypeCode::Model => Some(Box::new(QualModelPlugin::new(ns))),
            _ => None,
        }
    }

    fn error_table(&self) -> &'static [ErrorTableEntry] {
        &QUAL_ERROR_TABLE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::namespaces::registry;

    #[test]
    fn test_single_package_version() {
        let ext = QualExtension;
        assert_eq!(ext.get_uri(3, 1, 1), QUAL_XMLNS_V1);
        assert_eq!(ext.get_uri(3, 2, 1), QUAL_XMLNS_V1);
        assert_eq!(ext.get_uri(3, 1, 2), "");
        assert!(ext.default_required());
    }

    #[test]
    fn test_only_extends_model() {
        let (ext, _) = registry().extension_for_uri(QUAL_XMLNS_V1, 3, 1).unwrap();
        let ns = SbmlNamespaces::with_package(3, 1, "qual", 1).unwrap();
        assert!(ext.create_plugin(TypeCode::Model, &ns).is_some());
        assert!(ext.create_plugin(TypeCode::Species, &ns).is_none());
    }
}
