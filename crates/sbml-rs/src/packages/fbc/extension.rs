// crates/sbml-rs/src/packages/fbc/extension.rs

use super::FBC_PACKAGE;
use super::errors::FBC_ERROR_TABLE;
use super::plugins::{FbcModelPlugin, FbcReactionPlugin, FbcSpeciesPlugin};
use crate::error::ErrorTableEntry;
use crate::namespaces::{PackageVersion, SbmlExtension, SbmlNamespaces};
use crate::sbase::SBasePlugin;
use crate::types::TypeCode;

pub const FBC_XMLNS_V2: &str = "http://www.sbml.org/sbml/level3/version1/fbc/version2";
pub const FBC_XMLNS_V3: &str = "http://www.sbml.org/sbml/level3/version1/fbc/version3";

/// Both core Level 3 versions use the package namespaces minted for L3V1.
static FBC_VERSIONS: [PackageVersion; 4] = [
    PackageVersion {
        level: 3,
        version: 1,
        package_version: 2,
        uri: FBC_XMLNS_V2,
    },
    PackageVersion {
        level: 3,
        version: 2,
        package_version: 2,
        uri: FBC_XMLNS_V2,
    },
    PackageVersion {
        level: 3,
        version: 1,
        package_version: 3,
        uri: FBC_XMLNS_V3,
    },
    PackageVersion {
        level: 3,
        version: 2,
        package_version: 3,
        uri: FBC_XMLNS_V3,
    },
];

/// Registry entry of the fbc package.
#[derive(Debug, Clone, Copy, Default)]
pub struct FbcExtension;

impl SbmlExtension for FbcExtension {
    fn name(&self) -> &'static str {
        FBC_PACKAGE
    }

    fn default_prefix(&self) -> &'static str {
        "fbc"
    }

    fn versions(&self) -> &'static [PackageVersion] {
        &FBC_VERSIONS
    }

    /// fbc only adds constraints; a reader that ignores it still gets a valid model.
    fn default_required(&self) -> bool {
        false
    }

    fn create_plugin(&self, host: TypeCode, ns: &SbmlNamespaces) -> Option<Box<dyn SBasePlugin>> {
        match host {
            TypeCode::Model => Some(Box::new(FbcModelPlugin::new(ns))),
            TypeCode::Reaction => Some(Box::new(FbcReactionPlugin::new(ns))),
            TypeCode::Species => Some(Box::new(FbcSpeciesPlugin::new(ns))),
            _ => None,
        }
    }

    fn error_table(&self) -> &'static [ErrorTableEntry] {
        &FBC_ERROR_TABLE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::namespaces::registry;

    #[test]
    fn test_uris_per_package_version() {
        let ext = FbcExtension;
        assert_eq!(ext.get_uri(3, 1, 2), FBC_XMLNS_V2);
        assert_eq!(ext.get_uri(3, 2, 3), FBC_XMLNS_V3);
        assert_eq!(ext.get_uri(3, 1, 1), "");
        assert_eq!(ext.get_uri(2, 4, 2), "");
    }

    #[test]
    fn test_registered() {
        let (ext, row) = registry().extension_for_uri(FBC_XMLNS_V3, 3, 2).unwrap();
        assert_eq!(ext.name(), "fbc");
        assert_eq!(row.package_version, 3);
        assert!(ext.create_plugin(TypeCode::Compartment, &SbmlNamespaces::new(3, 2).unwrap()).is_none());
    }
}
