// crates/sbml-rs/src/sbase/attributes.rs

use super::SBase;
use crate::error::table::{
    INVALID_ID_SYNTAX, INVALID_METAID_SYNTAX, INVALID_SBO_TERM_SYNTAX, UNKNOWN_CORE_ATTRIBUTE,
    UNKNOWN_PACKAGE_ATTRIBUTE,
};
use crate::error::{ErrorLog, SbmlError};
use crate::log::{ElementContext, my_debug};
use crate::types::{format_sbo_term, is_valid_sid, is_valid_xml_id, parse_sbo_term};
use crate::xml::{ExpectedAttributes, XmlAttributes, XmlOutputStream, parse_bool, parse_double};

/// Declares `metaid`, `sboTerm`, `id` and `name`. For package elements `id`
/// and `name` live in the package namespace.
pub(crate) fn add_base_expected_attributes(el: &dyn SBase, expected: &mut ExpectedAttributes) {
    expected.add("metaid", "");
    expected.add("sboTerm", "");
    let uri = el.namespaces().attribute_uri_for(el.package_name());
    expected.add("id", uri);
    expected.add("name", uri);
}

/// Logs every unexpected attribute with a generic code, then reads the
/// attributes common to all elements.
///
/// Unknown attributes in the core namespace are logged as
/// `UNKNOWN_CORE_ATTRIBUTE`; those in a declared package namespace as
/// `UNKNOWN_PACKAGE_ATTRIBUTE` tagged with that package. Attributes from other
/// namespaces are ignored.
pub(crate) fn read_base_attributes(
    el: &mut dyn SBase,
    attrs: &XmlAttributes,
    expected: &ExpectedAttributes,
    log: &mut ErrorLog,
) {
    let (level, version) = (el.level(), el.version());
    let (line, column) = (el.line(), el.column());
    let element = el.element_name();
    let core_uri = el.namespaces().core_uri();

    for attr in attrs.iter() {
        if expected.has(&attr.name, &attr.uri) {
            continue;
        }
        if attr.uri.is_empty() || attr.uri == core_uri {
            log.log(
                SbmlError::new(
                    UNKNOWN_CORE_ATTRIBUTE,
                    format!(
                        "Attribute '{}' is not part of the definition of an SBML Level {} Version {} <{}> element.",
                        attr.name, level, version, element
                    ),
                )
                .with_level_version(level, version)
                .at(line, column),
            );
        } else if let Some(pkg) = el.namespaces().package_for_uri(&attr.uri) {
            log.log(
                SbmlError::new(
                    UNKNOWN_PACKAGE_ATTRIBUTE,
                    format!(
                        "Attribute '{}' from the '{}' package is not part of the definition of <{}>.",
                        attr.name, pkg.name, element
                    ),
                )
                .with_package(pkg.name)
                .with_level_version(level, version)
                .at(line, column),
            );
        } else {
            my_debug!(
                ElementContext {
                    element,
                    line,
                    column
                },
                "ignoring attribute '{}' from namespace '{}'",
                attr.name,
                attr.uri
            );
        }
    }

    let id_uri = el.namespaces().attribute_uri_for(el.package_name());
    let syntax_error = |code: u32, details: String| {
        SbmlError::new(code, details)
            .with_level_version(level, version)
            .at(line, column)
    };

    if let Some(value) = attrs.get("metaid", "") {
        if is_valid_xml_id(value) {
            el.base_mut().meta_id = Some(value.to_string());
        } else {
            log.log(syntax_error(
                INVALID_METAID_SYNTAX,
                format!("The metaid '{}' on <{}> does not conform to the syntax of XML ID.", value, element),
            ));
        }
    }
    if let Some(value) = attrs.get("sboTerm", "") {
        match parse_sbo_term(value) {
            Some(term) => el.base_mut().sbo_term = Some(term),
            None => log.log(syntax_error(
                INVALID_SBO_TERM_SYNTAX,
                format!("The sboTerm '{}' on <{}> is not of the form SBO:nnnnnnn.", value, element),
            )),
        }
    }
    if let Some(value) = attrs.get("id", id_uri) {
        if is_valid_sid(value) {
            el.base_mut().id = Some(value.to_string());
        } else {
            log.log(syntax_error(
                INVALID_ID_SYNTAX,
                format!("The id '{}' on <{}> does not conform to the syntax of SId.", value, element),
            ));
        }
    }
    if let Some(value) = attrs.get("name", id_uri) {
        el.base_mut().name = Some(value.to_string());
    }
}

/// Writes `metaid`, `sboTerm`, `id` and `name` when set.
pub(crate) fn write_base_attributes(el: &dyn SBase, out: &mut XmlOutputStream<'_>) {
    if let Some(meta_id) = el.meta_id() {
        out.write_attribute("", "metaid", meta_id);
    }
    if let Some(term) = el.sbo_term() {
        out.write_attribute("", "sboTerm", &format_sbo_term(term));
    }
    let prefix = el.namespaces().prefix_for(el.package_name());
    if let Some(id) = el.id() {
        out.write_attribute(&prefix, "id", id);
    }
    if let Some(name) = el.name() {
        out.write_attribute(&prefix, "name", name);
    }
}

/// Replaces generic unknown-attribute diagnostics logged since `since` with
/// the class-specific `code`, keeping their details and positions.
///
/// `core` selects `UNKNOWN_CORE_ATTRIBUTE` entries; `package` selects
/// `UNKNOWN_PACKAGE_ATTRIBUTE` entries of that package.
pub(crate) fn reclassify_unknown_attributes(
    log: &mut ErrorLog,
    since: usize,
    core: bool,
    package: Option<&str>,
    code: u32,
    level: u32,
    version: u32,
) -> usize {
    log.reclassify(
        since,
        |e| {
            (core && e.code() == UNKNOWN_CORE_ATTRIBUTE)
                || package.is_some_and(|p| e.code() == UNKNOWN_PACKAGE_ATTRIBUTE && e.package() == p)
        },
        |e| {
            SbmlError::new(code, e.details())
                .with_level_version(level, version)
                .at(e.line(), e.column())
        },
    )
}

/// Reads the common attributes of `el` and immediately reclassifies the
/// generic unknown-attribute diagnostics into `code`. Package elements also
/// reclassify unknown attributes of their own package.
pub(crate) fn read_base_and_reclassify(
    el: &mut dyn SBase,
    attrs: &XmlAttributes,
    expected: &ExpectedAttributes,
    log: &mut ErrorLog,
    code: u32,
) {
    let since = log.len();
    read_base_attributes(el, attrs, expected, log);
    let package = Some(el.package_name()).filter(|p| *p != "core");
    reclassify_unknown_attributes(log, since, true, package, code, el.level(), el.version());
}

/// Typed access to the attributes of one tag, logging missing required values
/// and malformed values under a single class-specific code.
pub(crate) struct AttributeReader<'a> {
    attrs: &'a XmlAttributes,
    uri: &'static str,
    element: &'static str,
    code: u32,
    level: u32,
    version: u32,
    line: u32,
    column: u32,
}

impl<'a> AttributeReader<'a> {
    /// `uri` is the namespace of the attributes to read ("" for core).
    pub(crate) fn new(el: &dyn SBase, attrs: &'a XmlAttributes, uri: &'static str, code: u32) -> Self {
        AttributeReader {
            attrs,
            uri,
            element: el.element_name(),
            code,
            level: el.level(),
            version: el.version(),
            line: el.line(),
            column: el.column(),
        }
    }

    /// Same as [`AttributeReader::new`] for plugins, which have no position of their own.
    pub(crate) fn for_plugin(
        attrs: &'a XmlAttributes,
        uri: &'static str,
        element: &'static str,
        code: u32,
        (level, version): (u32, u32),
        (line, column): (u32, u32),
    ) -> Self {
        AttributeReader {
            attrs,
            uri,
            element,
            code,
            level,
            version,
            line,
            column,
        }
    }

    fn report(&self, details: String, log: &mut ErrorLog) {
        log.log(
            SbmlError::new(self.code, details)
                .with_level_version(self.level, self.version)
                .at(self.line, self.column),
        );
    }

    fn missing(&self, name: &str, log: &mut ErrorLog) {
        self.report(
            format!(
                "The required attribute '{}' is missing from the <{}> element.",
                name, self.element
            ),
            log,
        );
    }

    /// Logs `name` as missing if absent; for attributes whose value is read elsewhere.
    pub(crate) fn require(&self, name: &str, log: &mut ErrorLog) {
        if !self.attrs.has(name, self.uri) {
            self.missing(name, log);
        }
    }

    fn value<T>(
        &self,
        name: &str,
        required: bool,
        type_name: &str,
        log: &mut ErrorLog,
        parse: impl Fn(&str) -> Option<T>,
    ) -> Option<T> {
        let Some(raw) = self.attrs.get(name, self.uri) else {
            if required {
                self.missing(name, log);
            }
            return None;
        };
        let parsed = parse(raw);
        if parsed.is_none() {
            self.report(
                format!(
                    "The value '{}' of attribute '{}' on the <{}> element is not a valid {}.",
                    raw, name, self.element, type_name
                ),
                log,
            );
        }
        parsed
    }

    pub(crate) fn string(&self, name: &str, required: bool, log: &mut ErrorLog) -> Option<String> {
        self.value(name, required, "string", log, |s| Some(s.to_string()))
    }

    /// A reference to an SId.
    pub(crate) fn sid_ref(&self, name: &str, required: bool, log: &mut ErrorLog) -> Option<String> {
        self.value(name, required, "SId", log, |s| {
            is_valid_sid(s).then(|| s.to_string())
        })
    }

    pub(crate) fn boolean(&self, name: &str, required: bool, log: &mut ErrorLog) -> Option<bool> {
        self.value(name, required, "boolean", log, parse_bool)
    }

    pub(crate) fn double(&self, name: &str, required: bool, log: &mut ErrorLog) -> Option<f64> {
        self.value(name, required, "double", log, parse_double)
    }

    pub(crate) fn int(&self, name: &str, required: bool, log: &mut ErrorLog) -> Option<i32> {
        self.value(name, required, "integer", log, |s| s.trim().parse().ok())
    }

    pub(crate) fn non_negative_int(
        &self,
        name: &str,
        required: bool,
        log: &mut ErrorLog,
    ) -> Option<u32> {
        self.value(name, required, "non-negative integer", log, |s| s.trim().parse().ok())
    }

    /// A value from a fixed vocabulary.
    pub(crate) fn enumerated<T>(
        &self,
        name: &str,
        required: bool,
        log: &mut ErrorLog,
        parse: impl Fn(&str) -> Option<T>,
    ) -> Option<T> {
        self.value(name, required, "value for this attribute", log, parse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::table::{ALLOWED_ATTRIBUTES_ON_SPECIES, NOT_UTF8};
    use crate::model::Species;

    #[test]
    fn test_unknown_core_attribute_then_upgrade() {
        let mut species = Species::new(3, 1).unwrap();
        let mut attrs = XmlAttributes::new();
        attrs.add("id", "", "S1");
        attrs.add("foo", "", "bar");
        attrs.add("schemaLocation", "http://www.w3.org/2001/XMLSchema-instance", "x");

        let mut expected = ExpectedAttributes::new();
        add_base_expected_attributes(&species, &mut expected);

        let mut log = ErrorLog::new();
        log.log(SbmlError::new(NOT_UTF8, ""));
        let since = log.len();
        read_base_attributes(&mut species, &attrs, &expected, &mut log);
        assert_eq!(species.id(), Some("S1"));
        assert_eq!(log.len(), 2);
        let generic = log.error(1).unwrap().clone();
        assert_eq!(generic.code(), UNKNOWN_CORE_ATTRIBUTE);

        let n = reclassify_unknown_attributes(&mut log, since, true, None, ALLOWED_ATTRIBUTES_ON_SPECIES, 3, 1);
        assert_eq!(n, 1);
        assert_eq!(log.error(0).unwrap().code(), NOT_UTF8);
        let upgraded = log.error(1).unwrap();
        assert_eq!(upgraded.code(), ALLOWED_ATTRIBUTES_ON_SPECIES);
        assert!(upgraded.message().contains(generic.details()));
    }

    #[test]
    fn test_syntax_errors_are_logged_and_not_stored() {
        let mut species = Species::new(3, 2).unwrap();
        let mut attrs = XmlAttributes::new();
        attrs.add("id", "", "2x");
        attrs.add("metaid", "", "a b");
        attrs.add("sboTerm", "", "SBO:12");
        let mut expected = ExpectedAttributes::new();
        add_base_expected_attributes(&species, &mut expected);
        let mut log = ErrorLog::new();
        read_base_attributes(&mut species, &attrs, &expected, &mut log);
        assert!(species.id().is_none());
        assert!(log.contains(INVALID_ID_SYNTAX));
        assert!(log.contains(INVALID_METAID_SYNTAX));
        assert!(log.contains(INVALID_SBO_TERM_SYNTAX));
    }

    #[test]
    fn test_attribute_reader_missing_and_malformed() {
        let species = Species::new(3, 2).unwrap();
        let mut attrs = XmlAttributes::new();
        attrs.add("constant", "", "maybe");
        let reader = AttributeReader::new(&species, &attrs, "", ALLOWED_ATTRIBUTES_ON_SPECIES);
        let mut log = ErrorLog::new();
        assert_eq!(reader.boolean("constant", true, &mut log), None);
        assert_eq!(reader.sid_ref("compartment", true, &mut log), None);
        assert_eq!(reader.double("initialAmount", false, &mut log), None);
        assert_eq!(log.len(), 2);
        assert!(log.error(0).unwrap().details().contains("'maybe'"));
        assert!(log.error(1).unwrap().details().contains("'compartment' is missing"));
    }
}
