// crates/sbml-rs/src/xml/input.rs

use super::{XmlAttribute, XmlAttributes, XmlStartTag, XmlTriple};
use crate::error::table::{
    BAD_XML_ATTRIBUTE, BAD_XML_PREFIX, BADLY_FORMED_XML, DUPLICATE_XML_ATTRIBUTE,
    UNDEFINED_XML_ENTITY, UNRECOGNIZED_XML_PARSER_CODE, XML_CONTENT_EMPTY, XML_TAG_MISMATCH,
    XML_UNEXPECTED_EOF,
};
use crate::error::{ErrorLog, SbmlError};
use crate::log::{ElementContext, my_trace, my_warn};
use quick_xml::Reader;
use quick_xml::errors::{Error as XmlError, IllFormedError};
use quick_xml::events::attributes::AttrError;
use quick_xml::events::{BytesStart, Event};

const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

/// What the input stream hands to element readers.
#[derive(Debug, Clone)]
pub enum XmlToken {
    /// A start tag. Empty elements are delivered as a `Start` immediately
    /// followed by an `End`.
    Start(XmlStartTag),
    End(XmlTriple),
    /// End of input, or the point where tokenizing stopped after an error.
    Eof,
}

/// Pull parser over an in-memory document.
///
/// Resolves element and attribute namespaces, records source positions and
/// converts tokenizer failures into diagnostics. After the first structural
/// error the stream only returns [`XmlToken::Eof`].
pub struct XmlInputStream<'a> {
    source: &'a str,
    reader: Reader<&'a [u8]>,
    line_starts: Vec<usize>,
    /// Namespace declarations per open element, innermost last.
    scopes: Vec<Vec<(String, String)>>,
    open: Vec<XmlTriple>,
    pending_end: bool,
    errors: ErrorLog,
    failed: bool,
    finished: bool,
    seen_root: bool,
    encoding: Option<String>,
}

impl<'a> XmlInputStream<'a> {
    pub fn new(source: &'a str) -> Self {
        let mut reader = Reader::from_str(source);
        reader.config_mut().trim_text_start = false;
        reader.config_mut().trim_text_end = false;

        let line_starts = std::iter::once(0)
            .chain(source.match_indices('\n').map(|(i, _)| i + 1))
            .collect();

        XmlInputStream {
            source,
            reader,
            line_starts,
            scopes: Vec::new(),
            open: Vec::new(),
            pending_end: false,
            errors: ErrorLog::new(),
            failed: false,
            finished: false,
            seen_root: false,
            encoding: None,
        }
    }

    /// The encoding named by the XML declaration, if there was one.
    pub fn encoding(&self) -> Option<&str> {
        self.encoding.as_deref()
    }

    pub fn has_failed(&self) -> bool {
        self.failed
    }

    /// Diagnostics raised by the tokenizer so far.
    pub fn errors(&self) -> &ErrorLog {
        &self.errors
    }

    pub fn take_errors(&mut self) -> ErrorLog {
        std::mem::take(&mut self.errors)
    }

    /// 1-based line and column of a byte offset.
    pub fn position(&self, offset: usize) -> (u32, u32) {
        let line = self.line_starts.partition_point(|&start| start <= offset).max(1);
        let line_start = self.line_starts.get(line - 1).copied().unwrap_or(0);
        (line as u32, (offset - line_start + 1) as u32)
    }

    pub fn next_token(&mut self) -> XmlToken {
        if self.pending_end {
            self.pending_end = false;
            return self.close_element();
        }
        if self.failed || self.finished {
            return XmlToken::Eof;
        }
        loop {
            let offset = self.reader.buffer_position() as usize;
            match self.reader.read_event() {
                Ok(Event::Start(e)) => return self.open_element(&e, offset, false),
                Ok(Event::Empty(e)) => {
                    let token = self.open_element(&e, offset, true);
                    if matches!(token, XmlToken::Start(_)) {
                        self.pending_end = true;
                    }
                    return token;
                }
                Ok(Event::End(_)) => return self.close_element(),
                Ok(Event::Decl(decl)) => {
                    if let Some(Ok(encoding)) = decl.encoding() {
                        self.encoding = Some(String::from_utf8_lossy(&encoding).into_owned());
                    }
                }
                Ok(Event::Eof) => {
                    self.finish();
                    return XmlToken::Eof;
                }
                // Text, comments, CDATA, processing instructions and doctypes
                // carry nothing the object model reads outside raw blocks.
                Ok(_) => {}
                Err(err) => {
                    self.fail(err);
                    return XmlToken::Eof;
                }
            }
        }
    }

    /// Consumes the rest of an element whose start tag was just returned.
    pub fn skip_element(&mut self, start: &XmlStartTag) {
        if start.is_empty {
            if self.pending_end {
                self.next_token();
            }
            return;
        }
        let depth = self.open.len();
        loop {
            match self.next_token() {
                XmlToken::End(_) if self.open.len() < depth => break,
                XmlToken::Eof => break,
                _ => {}
            }
        }
    }

    /// Consumes an element whose start tag was just returned and gives back its
    /// source text verbatim, start and end tags included.
    pub fn capture_element(&mut self, start: &XmlStartTag) -> String {
        self.skip_element(start);
        let end = self.reader.buffer_position() as usize;
        self.source
            .get(start.offset..end.min(self.source.len()))
            .unwrap_or_default()
            .to_string()
    }

    fn open_element(&mut self, e: &BytesStart<'a>, offset: usize, is_empty: bool) -> XmlToken {
        let (line, column) = self.position(offset);

        let mut declared = Vec::new();
        let mut raw = Vec::new();
        for attr in e.attributes() {
            let attr = match attr {
                Ok(attr) => attr,
                Err(err) => {
                    self.fail_attribute(err, line, column);
                    return XmlToken::Eof;
                }
            };
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = match attr.unescape_value() {
                Ok(value) => value.into_owned(),
                Err(err) => {
                    self.log_critical(UNDEFINED_XML_ENTITY, err.to_string(), line, column);
                    return XmlToken::Eof;
                }
            };
            if key == "xmlns" {
                declared.push((String::new(), value));
            } else if let Some(prefix) = key.strip_prefix("xmlns:") {
                declared.push((prefix.to_string(), value));
            } else {
                raw.push((key, value));
            }
        }
        self.scopes.push(declared.clone());

        let qname = String::from_utf8_lossy(e.name().as_ref()).into_owned();
        let (prefix, local) = split_qname(&qname);
        let uri = self.resolve_prefix(prefix, line, column);
        let triple = XmlTriple::new(local, uri, prefix);

        let mut attributes = XmlAttributes::new();
        for (key, value) in raw {
            let (prefix, local) = split_qname(&key);
            let uri = if prefix.is_empty() {
                String::new()
            } else {
                self.resolve_prefix(prefix, line, column)
            };
            attributes.push(XmlAttribute {
                name: local.to_string(),
                prefix: prefix.to_string(),
                uri,
                value,
            });
        }

        my_trace!(
            ElementContext {
                element: "",
                line,
                column
            },
            "start tag <{}> in '{}'",
            triple.qualified_name(),
            triple.uri
        );

        self.open.push(triple.clone());
        self.seen_root = true;
        XmlToken::Start(XmlStartTag {
            triple,
            attributes,
            namespaces: declared,
            line,
            column,
            offset,
            is_empty,
        })
    }

    fn close_element(&mut self) -> XmlToken {
        self.scopes.pop();
        match self.open.pop() {
            Some(triple) => XmlToken::End(triple),
            None => XmlToken::End(XmlTriple::default()),
        }
    }

    /// Innermost binding of `prefix`; the unprefixed default namespace may be
    /// absent, a named prefix must be declared.
    fn resolve_prefix(&mut self, prefix: &str, line: u32, column: u32) -> String {
        if prefix == "xml" {
            return XML_NAMESPACE.to_string();
        }
        let found = self
            .scopes
            .iter()
            .rev()
            .flat_map(|scope| scope.iter())
            .find(|(p, _)| p == prefix)
            .map(|(_, uri)| uri.clone());
        match found {
            Some(uri) => uri,
            None if prefix.is_empty() => String::new(),
            None => {
                my_warn!(
                    ElementContext {
                        element: "",
                        line,
                        column
                    },
                    "undeclared namespace prefix '{}'",
                    prefix
                );
                self.errors.log(
                    SbmlError::new(
                        BAD_XML_PREFIX,
                        format!("The namespace prefix '{}' is not declared.", prefix),
                    )
                    .at(line, column),
                );
                String::new()
            }
        }
    }

    fn finish(&mut self) {
        self.finished = true;
        let offset = self.source.len();
        let (line, column) = self.position(offset);
        if let Some(open) = self.open.last() {
            let details = format!(
                "The element <{}> was not closed before the end of the input.",
                open.qualified_name()
            );
            self.log_critical(XML_UNEXPECTED_EOF, details, line, column);
        } else if !self.seen_root {
            self.log_critical(XML_CONTENT_EMPTY, String::new(), line, column);
        }
    }

    fn fail(&mut self, err: XmlError) {
        let code = match &err {
            XmlError::IllFormed(
                IllFormedError::MismatchedEndTag { .. } | IllFormedError::UnmatchedEndTag(_),
            ) => XML_TAG_MISMATCH,
            XmlError::IllFormed(IllFormedError::MissingEndTag(_)) => XML_UNEXPECTED_EOF,
            XmlError::IllFormed(_) | XmlError::Syntax(_) => BADLY_FORMED_XML,
            XmlError::InvalidAttr(AttrError::Duplicated(..)) => DUPLICATE_XML_ATTRIBUTE,
            XmlError::InvalidAttr(_) => BAD_XML_ATTRIBUTE,
            XmlError::Escape(_) => UNDEFINED_XML_ENTITY,
            _ => UNRECOGNIZED_XML_PARSER_CODE,
        };
        let (line, column) = self.position(self.reader.error_position() as usize);
        self.log_critical(code, err.to_string(), line, column);
    }

    fn fail_attribute(&mut self, err: AttrError, line: u32, column: u32) {
        let code = match err {
            AttrError::Duplicated(..) => DUPLICATE_XML_ATTRIBUTE,
            _ => BAD_XML_ATTRIBUTE,
        };
        self.log_critical(code, err.to_string(), line, column);
    }

    fn log_critical(&mut self, code: u32, details: String, line: u32, column: u32) {
        my_warn!(
            ElementContext {
                element: "",
                line,
                column
            },
            "XML input stopped: {}",
            details
        );
        self.failed = true;
        self.errors
            .log(SbmlError::new(code, details).at(line, column).critical());
    }
}

fn split_qname(qname: &str) -> (&str, &str) {
    match qname.split_once(':') {
        Some((prefix, local)) => (prefix, local),
        None => ("", qname),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(xml: &str) -> (Vec<XmlToken>, ErrorLog) {
        let mut stream = XmlInputStream::new(xml);
        let mut tokens = Vec::new();
        loop {
            let token = stream.next_token();
            let done = matches!(token, XmlToken::Eof);
            tokens.push(token);
            if done {
                break;
            }
        }
        (tokens, stream.take_errors())
    }

    #[test]
    fn test_namespaces_and_positions() {
        let xml = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<a xmlns=\"urn:a\" xmlns:p=\"urn:p\">\n  <p:b p:x=\"1\" y=\"2\"/>\n</a>";
        let mut stream = XmlInputStream::new(xml);
        let XmlToken::Start(a) = stream.next_token() else {
            panic!("expected start");
        };
        assert_eq!(stream.encoding(), Some("UTF-8"));
        assert_eq!(a.triple.uri, "urn:a");
        assert_eq!(a.namespaces.len(), 2);
        assert_eq!((a.line, a.column), (2, 1));

        let XmlToken::Start(b) = stream.next_token() else {
            panic!("expected start");
        };
        assert!(b.is_empty);
        assert_eq!(b.triple, XmlTriple::new("b", "urn:p", "p"));
        assert_eq!(b.attributes.get("x", "urn:p"), Some("1"));
        assert_eq!(b.attributes.get("y", ""), Some("2"));
        assert_eq!((b.line, b.column), (3, 3));

        assert!(matches!(stream.next_token(), XmlToken::End(t) if t.name == "b"));
        assert!(matches!(stream.next_token(), XmlToken::End(t) if t.name == "a"));
        assert!(matches!(stream.next_token(), XmlToken::Eof));
        assert!(stream.errors().is_empty());
    }

    #[test]
    fn test_capture_keeps_source_text() {
        let xml = "<a><notes><p xmlns=\"urn:x\">hi &amp; bye</p></notes><c/></a>";
        let mut stream = XmlInputStream::new(xml);
        stream.next_token();
        let XmlToken::Start(notes) = stream.next_token() else {
            panic!("expected notes");
        };
        let raw = stream.capture_element(&notes);
        assert_eq!(raw, "<notes><p xmlns=\"urn:x\">hi &amp; bye</p></notes>");
        assert!(matches!(stream.next_token(), XmlToken::Start(t) if t.triple.name == "c"));
    }

    #[test]
    fn test_mismatched_tag_is_critical() {
        let (_, errors) = collect("<a><b></a>");
        assert_eq!(errors.len(), 1);
        let e = errors.error(0).unwrap();
        assert!(e.is_critical());
        assert!(e.code() == XML_TAG_MISMATCH || e.code() == BADLY_FORMED_XML);
    }

    #[test]
    fn test_unclosed_root_is_unexpected_eof() {
        let (_, errors) = collect("<a><b/>");
        assert!(errors.has_critical());
        assert!(errors.contains(XML_UNEXPECTED_EOF) || errors.contains(BADLY_FORMED_XML));
    }

    #[test]
    fn test_empty_content() {
        let (tokens, errors) = collect("<?xml version=\"1.0\"?>\n");
        assert_eq!(tokens.len(), 1);
        assert!(errors.contains(XML_CONTENT_EMPTY));
    }

    #[test]
    fn test_duplicate_attribute() {
        let (_, errors) = collect("<a x=\"1\" x=\"2\"/>");
        assert!(errors.contains(DUPLICATE_XML_ATTRIBUTE));
    }

    #[test]
    fn test_undeclared_prefix_is_not_critical() {
        let (_, errors) = collect("<a><q:b/></a>");
        assert!(errors.contains(BAD_XML_PREFIX));
        assert!(!errors.has_critical());
    }
}
