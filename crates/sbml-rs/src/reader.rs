// crates/sbml-rs/src/reader.rs

//! Whole-document reading. A read always produces a document; everything that
//! went wrong is in its error log.

use crate::document::SbmlDocument;
use crate::error::table::{
    INVALID_NAMESPACE_ON_SBML, MISSING_OR_INCONSISTENT_LEVEL, MISSING_OR_INCONSISTENT_VERSION,
    NOT_SCHEMA_CONFORMANT, NOT_UTF8, REQUIRED_PACKAGE_PRESENT, UNREQUIRED_PACKAGE_PRESENT,
    XML_FILE_UNREADABLE,
};
use crate::error::{ErrorLog, SbmlError};
use crate::log::{PassContext, my_debug, my_info, my_warn};
use crate::namespaces::{SbmlNamespaces, is_sbml_package_uri, level_version_for_uri, registry};
use crate::sbase::read_element;
use crate::xml::{XmlInputStream, XmlStartTag, XmlToken, parse_bool};
use std::borrow::Cow;
use std::path::Path;

/// File suffixes of compressed documents, which this build cannot open.
const COMPRESSED_SUFFIXES: [&str; 3] = [".gz", ".zip", ".bz2"];

pub(crate) fn is_compressed(path: &Path) -> bool {
    let name = path.to_string_lossy().to_ascii_lowercase();
    COMPRESSED_SUFFIXES.iter().any(|suffix| name.ends_with(suffix))
}

/// Reads SBML documents from files, strings or bytes.
#[derive(Debug, Clone)]
pub struct SbmlReader {
    discard_non_critical: bool,
}

impl Default for SbmlReader {
    fn default() -> Self {
        SbmlReader {
            discard_non_critical: true,
        }
    }
}

impl SbmlReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether non-critical diagnostics are dropped when a read hits a
    /// critical error. On by default.
    pub fn with_discard_non_critical(mut self, discard: bool) -> Self {
        self.discard_non_critical = discard;
        self
    }

    pub fn read_sbml(&self, path: impl AsRef<Path>) -> SbmlDocument {
        let path = path.as_ref();
        let source = path.display().to_string();
        if is_compressed(path) {
            return unreadable(
                &source,
                format!("The file '{}' is compressed; compressed files are not supported.", source),
            );
        }
        match std::fs::read(path) {
            Ok(bytes) => self.read(&bytes, source),
            Err(err) => unreadable(&source, format!("The file '{}' could not be read: {}", source, err)),
        }
    }

    pub fn read_sbml_from_string(&self, xml: &str) -> SbmlDocument {
        self.parse(xml, false, "<string>".to_string())
    }

    pub fn read_sbml_from_bytes(&self, bytes: &[u8]) -> SbmlDocument {
        self.read(bytes, "<bytes>".to_string())
    }

    fn read(&self, bytes: &[u8], source: String) -> SbmlDocument {
        let (text, not_utf8) = match std::str::from_utf8(bytes) {
            Ok(text) => (Cow::Borrowed(text), false),
            Err(_) => (String::from_utf8_lossy(bytes), true),
        };
        self.parse(&text, not_utf8, source)
    }

    fn parse(&self, text: &str, not_utf8: bool, source: String) -> SbmlDocument {
        let ctx = PassContext {
            pass: "read",
            source,
        };
        my_debug!(ctx, "reading {} bytes", text.len());

        let mut log = ErrorLog::new();
        let mut stream = XmlInputStream::new(text);
        let root = match stream.next_token() {
            XmlToken::Start(root) => Some(root),
            _ => None,
        };

        let declared_encoding = stream.encoding().map(str::to_string);
        let bad_encoding = declared_encoding
            .as_deref()
            .is_some_and(|enc| !enc.eq_ignore_ascii_case("UTF-8"));
        if not_utf8 || bad_encoding {
            let details = match declared_encoding {
                Some(enc) if bad_encoding => format!("The declared encoding is '{}'.", enc),
                _ => "The input contains bytes that are not valid UTF-8.".to_string(),
            };
            log.log(SbmlError::new(NOT_UTF8, details));
        }

        let mut doc = match root {
            Some(root) => self.read_root(&root, &mut stream, &mut log),
            None => SbmlDocument::default(),
        };

        while !matches!(stream.next_token(), XmlToken::Eof) {}
        log.append(stream.take_errors());

        if self.discard_non_critical && log.has_critical() {
            let dropped = log.discard_non_critical();
            my_debug!(ctx, "critical error; discarded {} non-critical diagnostic(s)", dropped);
        }
        doc.errors_mut().append(log);
        doc.attach();

        my_info!(ctx, "done with {} diagnostic(s)", doc.num_errors());
        doc
    }

    /// Interprets the `<sbml>` tag and reads the tree below it. Returns a
    /// default document when the root cannot be interpreted.
    fn read_root(
        &self,
        root: &XmlStartTag,
        stream: &mut XmlInputStream<'_>,
        log: &mut ErrorLog,
    ) -> SbmlDocument {
        if root.triple.name != "sbml" {
            log.log(
                SbmlError::new(
                    NOT_SCHEMA_CONFORMANT,
                    format!(
                        "The root element is <{}>; an SBML document must start with <sbml>.",
                        root.triple.qualified_name()
                    ),
                )
                .at(root.line, root.column)
                .critical(),
            );
            return SbmlDocument::default();
        }

        let Some((level, version)) = level_version_for_uri(&root.triple.uri) else {
            log.log(
                SbmlError::new(
                    INVALID_NAMESPACE_ON_SBML,
                    format!("The namespace '{}' is not an SBML core namespace.", root.triple.uri),
                )
                .at(root.line, root.column)
                .critical(),
            );
            return SbmlDocument::default();
        };

        check_level_version(root, level, version, log);

        let Ok(mut namespaces) = SbmlNamespaces::new(level, version) else {
            return SbmlDocument::default();
        };
        let foreign = declare_packages(root, &mut namespaces, log);

        let mut doc = SbmlDocument::with_namespaces(namespaces);
        for (prefix, uri) in &foreign {
            let _ = doc.add_namespace(prefix, uri);
        }
        read_element(&mut doc, root, stream, log);
        doc
    }
}

fn check_level_version(root: &XmlStartTag, level: u32, version: u32, log: &mut ErrorLog) {
    let attribute = |name: &str| {
        root.attributes
            .get(name, "")
            .and_then(|v| v.trim().parse::<u32>().ok())
    };
    if attribute("level") != Some(level) {
        log.log(
            SbmlError::new(
                MISSING_OR_INCONSISTENT_LEVEL,
                format!("The namespace declares Level {}.", level),
            )
            .with_level_version(level, version)
            .at(root.line, root.column),
        );
    }
    if attribute("version") != Some(version) {
        log.log(
            SbmlError::new(
                MISSING_OR_INCONSISTENT_VERSION,
                format!("The namespace declares Version {}.", version),
            )
            .with_level_version(level, version)
            .at(root.line, root.column),
        );
    }
}

/// Declares every compiled-in package found on the root, with its
/// `required` flag; reports SBML packages this build does not know.
///
/// Returns the remaining prefixed declarations, which notes, annotations and
/// unknown packages may still refer to.
fn declare_packages(
    root: &XmlStartTag,
    namespaces: &mut SbmlNamespaces,
    log: &mut ErrorLog,
) -> Vec<(String, String)> {
    let (level, version) = (namespaces.level(), namespaces.version());
    let mut foreign = Vec::new();
    for (prefix, uri) in root.namespaces.iter().filter(|(p, _)| !p.is_empty()) {
        let required = root.attributes.get("required", uri).and_then(parse_bool);
        if let Some((ext, row)) = registry().extension_for_uri(uri, level, version) {
            if namespaces.add_package(ext.name(), row.package_version, prefix).is_ok() {
                if let Some(required) = required {
                    namespaces.set_required(ext.name(), required);
                }
            }
            continue;
        }
        foreign.push((prefix.clone(), uri.clone()));
        if !is_sbml_package_uri(uri) {
            continue;
        }
        let code = if required == Some(true) {
            REQUIRED_PACKAGE_PRESENT
        } else {
            UNREQUIRED_PACKAGE_PRESENT
        };
        my_warn!(
            PassContext {
                pass: "read",
                source: uri.clone()
            },
            "package '{}' is not supported by this build",
            prefix
        );
        log.log(
            SbmlError::new(
                code,
                format!("The package '{}' ({}) is not supported by this build.", prefix, uri),
            )
            .with_level_version(level, version)
            .at(root.line, root.column),
        );
    }
    foreign
}

fn unreadable(source: &str, details: String) -> SbmlDocument {
    my_warn!(
        PassContext {
            pass: "read",
            source: source.to_string()
        },
        "file unreadable"
    );
    let mut doc = SbmlDocument::default();
    doc.errors_mut().log(SbmlError::new(XML_FILE_UNREADABLE, details));
    doc
}

/// Reads a file with the default reader options.
pub fn read_sbml(path: impl AsRef<Path>) -> SbmlDocument {
    SbmlReader::new().read_sbml(path)
}

/// Reads a string with the default reader options.
pub fn read_sbml_from_string(xml: &str) -> SbmlDocument {
    SbmlReader::new().read_sbml_from_string(xml)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::table::{MISSING_MODEL, XML_CONTENT_EMPTY};
    use crate::sbase::SBase;

    const MINIMAL_L3V2: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<sbml xmlns="http://www.sbml.org/sbml/level3/version2/core" level="3" version="2">
  <model id="m"/>
</sbml>"#;

    #[test]
    fn test_minimal_document() {
        let doc = read_sbml_from_string(MINIMAL_L3V2);
        assert_eq!(doc.num_errors(), 0, "{:?}", doc.errors());
        assert_eq!((doc.level(), doc.version()), (3, 2));
        assert_eq!(doc.model().unwrap().id(), Some("m"));
    }

    #[test]
    fn test_empty_input() {
        let doc = read_sbml_from_string("");
        assert!(doc.errors().contains(XML_CONTENT_EMPTY));
        assert!(doc.model().is_none());
    }

    #[test]
    fn test_inconsistent_level_attribute() {
        let xml = MINIMAL_L3V2.replace("level=\"3\"", "level=\"2\"");
        let doc = read_sbml_from_string(&xml);
        assert!(doc.errors().contains(MISSING_OR_INCONSISTENT_LEVEL));
        assert!(!doc.errors().contains(MISSING_OR_INCONSISTENT_VERSION));
    }

    #[test]
    fn test_level_2_requires_model() {
        let xml = r#"<sbml xmlns="http://www.sbml.org/sbml/level2/version4" level="2" version="4"/>"#;
        let doc = read_sbml_from_string(xml);
        assert!(doc.errors().contains(MISSING_MODEL));
        let xml = r#"<sbml xmlns="http://www.sbml.org/sbml/level3/version1/core" level="3" version="1"/>"#;
        assert_eq!(read_sbml_from_string(xml).num_errors(), 0);
    }

    #[test]
    fn test_non_utf8_bytes() {
        let mut bytes = MINIMAL_L3V2.as_bytes().to_vec();
        let at = bytes.len() - "\n</sbml>".len();
        bytes.insert(at, 0xFF);
        let doc = SbmlReader::new().read_sbml_from_bytes(&bytes);
        assert!(doc.errors().contains(NOT_UTF8));
    }

    #[test]
    fn test_compressed_suffix_is_unreadable() {
        let doc = read_sbml("model.xml.gz");
        assert_eq!(doc.num_errors(), 1);
        assert!(doc.error(0).unwrap().is_fatal());
    }
}
