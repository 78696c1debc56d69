// crates/sbml-rs/src/xml/mod.rs

//! Thin XML layer over `quick-xml`: namespace-resolved start tags and
//! attributes on the way in, a structured stream writer on the way out.

mod input;
mod output;

pub use input::{XmlInputStream, XmlToken};
pub use output::{XmlOutputStream, XmlWriteError};

/// A resolved element name: local name, namespace URI and the prefix used.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlTriple {
    pub name: String,
    pub uri: String,
    pub prefix: String,
}

impl XmlTriple {
    pub fn new(name: impl Into<String>, uri: impl Into<String>, prefix: impl Into<String>) -> Self {
        XmlTriple {
            name: name.into(),
            uri: uri.into(),
            prefix: prefix.into(),
        }
    }

    /// `prefix:name`, or just `name` when unprefixed.
    pub fn qualified_name(&self) -> String {
        if self.prefix.is_empty() {
            self.name.clone()
        } else {
            format!("{}:{}", self.prefix, self.name)
        }
    }
}

/// One attribute of a start tag. `uri` is empty for unprefixed attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlAttribute {
    pub name: String,
    pub prefix: String,
    pub uri: String,
    pub value: String,
}

/// The attributes of one start tag, in document order. Namespace
/// declarations are not included.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlAttributes {
    attrs: Vec<XmlAttribute>,
}

impl XmlAttributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, attr: XmlAttribute) {
        self.attrs.push(attr);
    }

    /// Convenience for tests and programmatic construction.
    pub fn add(&mut self, name: &str, uri: &str, value: &str) {
        self.attrs.push(XmlAttribute {
            name: name.to_string(),
            prefix: String::new(),
            uri: uri.to_string(),
            value: value.to_string(),
        });
    }

    pub fn len(&self) -> usize {
        self.attrs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attrs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &XmlAttribute> {
        self.attrs.iter()
    }

    pub fn get(&self, name: &str, uri: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|a| a.name == name && a.uri == uri)
            .map(|a| a.value.as_str())
    }

    pub fn has(&self, name: &str, uri: &str) -> bool {
        self.get(name, uri).is_some()
    }
}

/// The `(name, uri)` pairs an element and its plugins understand. Anything
/// else found on the tag is reported as unknown.
#[derive(Debug, Clone, Default)]
pub struct ExpectedAttributes {
    names: Vec<(String, String)>,
}

impl ExpectedAttributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, name: &str, uri: &str) {
        if !self.has(name, uri) {
            self.names.push((name.to_string(), uri.to_string()));
        }
    }

    pub fn has(&self, name: &str, uri: &str) -> bool {
        self.names.iter().any(|(n, u)| n == name && u == uri)
    }
}

/// A start tag as delivered by [`XmlInputStream`].
#[derive(Debug, Clone, Default)]
pub struct XmlStartTag {
    pub triple: XmlTriple,
    pub attributes: XmlAttributes,
    /// Namespace declarations made on this tag, as `(prefix, uri)`; the
    /// default namespace has an empty prefix.
    pub namespaces: Vec<(String, String)>,
    pub line: u32,
    pub column: u32,
    /// Byte offset of the `<` in the source.
    pub offset: usize,
    pub is_empty: bool,
}

/// Parses an XML Schema boolean.
pub fn parse_bool(value: &str) -> Option<bool> {
    match value.trim() {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}

/// Parses an XML Schema double, including `INF`, `-INF` and `NaN`.
pub fn parse_double(value: &str) -> Option<f64> {
    match value.trim() {
        "INF" | "+INF" => Some(f64::INFINITY),
        "-INF" => Some(f64::NEG_INFINITY),
        "NaN" => Some(f64::NAN),
        // Rust also accepts "inf", "infinity" and "nan"; XML Schema does not.
        other if other.chars().any(|c| c.is_ascii_alphabetic() && c != 'e' && c != 'E') => None,
        other => other.parse().ok(),
    }
}

/// Formats a double the way SBML files spell special values.
pub fn format_double(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value == f64::INFINITY {
        "INF".to_string()
    } else if value == f64::NEG_INFINITY {
        "-INF".to_string()
    } else {
        format!("{}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("true"), Some(true));
        assert_eq!(parse_bool("0"), Some(false));
        assert_eq!(parse_bool("yes"), None);
    }

    #[test]
    fn test_parse_double_specials() {
        assert_eq!(parse_double("1.5e3"), Some(1500.0));
        assert_eq!(parse_double("INF"), Some(f64::INFINITY));
        assert_eq!(parse_double("-INF"), Some(f64::NEG_INFINITY));
        assert!(parse_double("NaN").unwrap().is_nan());
        assert_eq!(parse_double("inf"), None);
        assert_eq!(parse_double("abc"), None);
        assert_eq!(parse_double(""), None);
    }

    #[test]
    fn test_format_double() {
        assert_eq!(format_double(1.0), "1");
        assert_eq!(format_double(0.25), "0.25");
        assert_eq!(format_double(f64::NEG_INFINITY), "-INF");
        assert_eq!(parse_double(&format_double(1e-20)), Some(1e-20));
    }

    #[test]
    fn test_attribute_lookup_by_namespace() {
        let mut attrs = XmlAttributes::new();
        attrs.add("id", "", "r1");
        attrs.add("id", "urn:pkg", "p1");
        assert_eq!(attrs.get("id", ""), Some("r1"));
        assert_eq!(attrs.get("id", "urn:pkg"), Some("p1"));
        assert!(!attrs.has("name", ""));
    }

    #[test]
    fn test_qualified_name() {
        assert_eq!(XmlTriple::new("geneProduct", "urn:fbc", "fbc").qualified_name(), "fbc:geneProduct");
        assert_eq!(XmlTriple::new("model", "urn:core", "").qualified_name(), "model");
    }
}
