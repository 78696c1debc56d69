// crates/sbml-rs/src/namespaces.rs

//! SBML Level/Version namespaces and the registry of compiled-in packages.
//!
//! The registry is built once, on first use, from the packages selected by
//! Cargo features, and is read-only afterwards. Every element carries an
//! [`SbmlNamespaces`] value describing the core Level/Version it belongs to and
//! the package namespaces declared around it.

use crate::error::{ErrorTableEntry, SbmlConstructorError};
use crate::sbase::SBasePlugin;
use crate::types::TypeCode;
use once_cell::sync::Lazy;

pub const SBML_XMLNS_L2V4: &str = "http://www.sbml.org/sbml/level2/version4";
pub const SBML_XMLNS_L3V1: &str = "http://www.sbml.org/sbml/level3/version1/core";
pub const SBML_XMLNS_L3V2: &str = "http://www.sbml.org/sbml/level3/version2/core";

pub const XHTML_XMLNS: &str = "http://www.w3.org/1999/xhtml";
pub const MATHML_XMLNS: &str = "http://www.w3.org/1998/Math/MathML";

/// Prefix shared by the namespace URIs of every SBML Level 3 package.
const SBML_L3_PACKAGE_URI_PREFIX: &str = "http://www.sbml.org/sbml/level3/";

/// Level/Version used when nothing else is known.
pub const DEFAULT_LEVEL: u32 = 3;
pub const DEFAULT_VERSION: u32 = 2;

/// Core namespace URI for `level`/`version`, if supported.
pub fn core_uri(level: u32, version: u32) -> Option<&'static str> {
    match (level, version) {
        (2, 4) => Some(SBML_XMLNS_L2V4),
        (3, 1) => Some(SBML_XMLNS_L3V1),
        (3, 2) => Some(SBML_XMLNS_L3V2),
        _ => None,
    }
}

/// Inverse of [`core_uri`].
pub fn level_version_for_uri(uri: &str) -> Option<(u32, u32)> {
    match uri {
        SBML_XMLNS_L2V4 => Some((2, 4)),
        SBML_XMLNS_L3V1 => Some((3, 1)),
        SBML_XMLNS_L3V2 => Some((3, 2)),
        _ => None,
    }
}

/// True if `uri` has the shape of an SBML Level 3 package namespace, whether
/// or not the package is compiled in.
pub fn is_sbml_package_uri(uri: &str) -> bool {
    uri.starts_with(SBML_L3_PACKAGE_URI_PREFIX) && level_version_for_uri(uri).is_none()
}

/// Core namespace URI for `level`/`version`, or an empty string when the
/// combination is unsupported.
pub fn get_uri(level: u32, version: u32) -> String {
    core_uri(level, version).unwrap_or_default().to_string()
}

pub fn is_supported_combination(level: u32, version: u32) -> bool {
    core_uri(level, version).is_some()
}

/// A package namespace declared in a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageNamespace {
    pub name: &'static str,
    pub prefix: String,
    pub uri: &'static str,
    pub version: u32,
    /// Value of the `prefix:required` attribute on `<sbml>`.
    pub required: bool,
}

/// The namespace context of an element: core Level/Version plus the package
/// namespaces in scope.
///
/// Instances can only be built for combinations the registry supports, so an
/// element holding one is always in a valid context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SbmlNamespaces {
    level: u32,
    version: u32,
    packages: Vec<PackageNamespace>,
}

impl SbmlNamespaces {
    pub fn new(level: u32, version: u32) -> Result<Self, SbmlConstructorError> {
        if !is_supported_combination(level, version) {
            return Err(SbmlConstructorError::UnsupportedLevelVersion { level, version });
        }
        Ok(SbmlNamespaces {
            level,
            version,
            packages: Vec::new(),
        })
    }

    /// Core namespaces plus one package, declared with its default prefix.
    pub fn with_package(
        level: u32,
        version: u32,
        package: &str,
        package_version: u32,
    ) -> Result<Self, SbmlConstructorError> {
        let mut ns = Self::new(level, version)?;
        let prefix = registry()
            .extension(package)
            .map(|ext| ext.default_prefix())
            .ok_or_else(|| SbmlConstructorError::UnknownPackage(package.to_string()))?;
        ns.add_package(package, package_version, prefix)?;
        Ok(ns)
    }

    pub(crate) fn default_namespaces() -> Self {
        SbmlNamespaces {
            level: DEFAULT_LEVEL,
            version: DEFAULT_VERSION,
            packages: Vec::new(),
        }
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn core_uri(&self) -> &'static str {
        core_uri(self.level, self.version).unwrap_or_default()
    }

    pub fn packages(&self) -> &[PackageNamespace] {
        &self.packages
    }

    /// Declares a package namespace. Re-declaring a package replaces the
    /// earlier declaration.
    pub fn add_package(
        &mut self,
        package: &str,
        package_version: u32,
        prefix: &str,
    ) -> Result<(), SbmlConstructorError> {
        let ext = registry()
            .extension(package)
            .ok_or_else(|| SbmlConstructorError::UnknownPackage(package.to_string()))?;
        let uri = ext
            .uri(self.level, self.version, package_version)
            .ok_or_else(|| SbmlConstructorError::UnsupportedPackageVersion {
                package: package.to_string(),
                package_version,
                level: self.level,
                version: self.version,
            })?;
        let entry = PackageNamespace {
            name: ext.name(),
            prefix: prefix.to_string(),
            uri,
            version: package_version,
            required: ext.default_required(),
        };
        match self.packages.iter_mut().find(|p| p.name == entry.name) {
            Some(existing) => *existing = entry,
            None => self.packages.push(entry),
        }
        Ok(())
    }

    /// Inserts an already resolved declaration.
    pub(crate) fn add_package_namespace(&mut self, entry: PackageNamespace) {
        match self.packages.iter_mut().find(|p| p.name == entry.name) {
            Some(existing) => *existing = entry,
            None => self.packages.push(entry),
        }
    }

    pub fn remove_package(&mut self, package: &str) -> bool {
        let before = self.packages.len();
        self.packages.retain(|p| p.name != package);
        before != self.packages.len()
    }

    pub fn package(&self, package: &str) -> Option<&PackageNamespace> {
        self.packages.iter().find(|p| p.name == package)
    }

    pub fn has_package(&self, package: &str) -> bool {
        self.package(package).is_some()
    }

    pub fn package_for_uri(&self, uri: &str) -> Option<&PackageNamespace> {
        self.packages.iter().find(|p| p.uri == uri)
    }

    /// True if `uri` is this context's core namespace or a declared package.
    pub fn declares_uri(&self, uri: &str) -> bool {
        uri == self.core_uri() || self.package_for_uri(uri).is_some()
    }

    /// The prefix to write for `package`, falling back to its default prefix.
    pub fn prefix_for(&self, package: &str) -> String {
        if package == "core" {
            return String::new();
        }
        self.package(package)
            .map(|p| p.prefix.clone())
            .or_else(|| registry().extension(package).map(|e| e.default_prefix().to_string()))
            .unwrap_or_else(|| package.to_string())
    }

    /// Namespace URI of `package` in this context ("" for core attributes).
    pub fn attribute_uri_for(&self, package: &str) -> &'static str {
        if package == "core" {
            return "";
        }
        self.package(package).map(|p| p.uri).unwrap_or_default()
    }

    pub(crate) fn set_required(&mut self, package: &str, required: bool) {
        if let Some(p) = self.packages.iter_mut().find(|p| p.name == package) {
            p.required = required;
        }
    }
}

/// One supported (core Level, core Version, package version) row of a package.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackageVersion {
    pub level: u32,
    pub version: u32,
    pub package_version: u32,
    pub uri: &'static str,
}

/// A compiled-in SBML Level 3 package.
pub trait SbmlExtension: Send + Sync {
    fn name(&self) -> &'static str;

    fn default_prefix(&self) -> &'static str;

    fn versions(&self) -> &'static [PackageVersion];

    /// Default value of the `required` flag written on `<sbml>`.
    fn default_required(&self) -> bool;

    /// Builds the plugin this package attaches to elements of type `host`,
    /// if it extends that type at all.
    fn create_plugin(&self, host: TypeCode, ns: &SbmlNamespaces) -> Option<Box<dyn SBasePlugin>>;

    fn error_table(&self) -> &'static [ErrorTableEntry];

    fn uri(&self, level: u32, version: u32, package_version: u32) -> Option<&'static str> {
        self.versions()
            .iter()
            .find(|v| v.level == level && v.version == version && v.package_version == package_version)
            .map(|v| v.uri)
    }

    /// Package namespace URI, or an empty string when unsupported.
    fn get_uri(&self, level: u32, version: u32, package_version: u32) -> String {
        self.uri(level, version, package_version)
            .unwrap_or_default()
            .to_string()
    }
}

/// Process-wide table of the packages compiled into this build.
pub struct ExtensionRegistry {
    extensions: Vec<Box<dyn SbmlExtension>>,
}

static REGISTRY: Lazy<ExtensionRegistry> = Lazy::new(ExtensionRegistry::with_compiled_packages);

/// The process-wide registry.
pub fn registry() -> &'static ExtensionRegistry {
    &REGISTRY
}

impl ExtensionRegistry {
    #[allow(unused_mut)]
    fn with_compiled_packages() -> Self {
        let mut extensions: Vec<Box<dyn SbmlExtension>> = Vec::new();
        #[cfg(feature = "fbc")]
        extensions.push(Box::new(crate::packages::fbc::FbcExtension));
        #[cfg(feature = "qual")]
        extensions.push(Box::new(crate::packages::qual::QualExtension));
        ExtensionRegistry { extensions }
    }

    pub fn extensions(&self) -> impl Iterator<Item = &dyn SbmlExtension> {
        self.extensions.iter().map(|e| e.as_ref())
    }

    pub fn extension(&self, name: &str) -> Option<&dyn SbmlExtension> {
        self.extensions().find(|e| e.name() == name)
    }

    /// Resolves a package namespace URI within a core Level/Version.
    pub fn extension_for_uri(
        &self,
        uri: &str,
        level: u32,
        version: u32,
    ) -> Option<(&dyn SbmlExtension, PackageVersion)> {
        self.extensions().find_map(|ext| {
            ext.versions()
                .iter()
                .find(|v| v.uri == uri && v.level == level && v.version == version)
                .map(|v| (ext, *v))
        })
    }

    pub fn is_package_enabled(&self, name: &str) -> bool {
        self.extension(name).is_some()
    }

    /// Every namespace combination this build can read and write: each core
    /// Level/Version alone, then each with every package version it supports.
    pub fn supported_namespaces(&self) -> Vec<SbmlNamespaces> {
        let mut out = Vec::new();
        for (level, version) in [(2, 4), (3, 1), (3, 2)] {
            let Ok(core) = SbmlNamespaces::new(level, version) else {
                continue;
            };
            out.push(core.clone());
            for ext in self.extensions() {
                for row in ext.versions().iter().filter(|v| v.level == level && v.version == version) {
                    let mut ns = core.clone();
                    if ns.add_package(ext.name(), row.package_version, ext.default_prefix()).is_ok() {
                        out.push(ns);
                    }
                }
            }
        }
        out
    }

    /// Searches the error tables of all compiled-in packages.
    pub fn lookup_error(&self, code: u32) -> Option<(&'static str, &'static ErrorTableEntry)> {
        self.extensions().find_map(|ext| {
            ext.error_table()
                .iter()
                .find(|e| e.code == code)
                .map(|e| (ext.name(), e))
        })
    }
}

/// Every namespace combination supported by this build.
pub fn supported_namespaces() -> Vec<SbmlNamespaces> {
    registry().supported_namespaces()
}
