// crates/sbml-rs/src/xml/output.rs

use super::format_double;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use std::io::Write;
use thiserror::Error;

/// Failure while producing XML output.
#[derive(Error, Debug)]
pub enum XmlWriteError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML writer error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("end_element called with no open element")]
    Unbalanced,
}

/// Structured writer used by every element's `write_attributes` and
/// `write_elements`.
///
/// A start tag stays pending until its first child or its end, so elements
/// without content are written as `<x/>`. The first failure is kept and all
/// later calls become no-ops; [`XmlOutputStream::finish`] reports it.
pub struct XmlOutputStream<'w> {
    writer: Writer<Box<dyn Write + 'w>>,
    pending: Option<BytesStart<'static>>,
    open: Vec<String>,
    error: Option<XmlWriteError>,
}

impl<'w> XmlOutputStream<'w> {
    /// `indent` is the number of spaces per nesting level; zero disables
    /// indentation.
    pub fn new(sink: Box<dyn Write + 'w>, indent: usize) -> Self {
        let writer = if indent == 0 {
            Writer::new(sink)
        } else {
            Writer::new_with_indent(sink, b' ', indent)
        };
        XmlOutputStream {
            writer,
            pending: None,
            open: Vec::new(),
            error: None,
        }
    }

    pub fn write_declaration(&mut self) {
        let event = Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None));
        self.write_event(event);
    }

    pub fn write_comment(&mut self, text: &str) {
        self.flush_pending();
        let event = Event::Comment(BytesText::new(text));
        self.write_event(event);
    }

    /// Opens an element; `name` is the qualified name to emit.
    pub fn start_element(&mut self, name: &str) {
        self.flush_pending();
        self.pending = Some(BytesStart::new(name.to_string()));
        self.open.push(name.to_string());
    }

    /// Adds an attribute to the element just opened. `prefix` may be empty.
    pub fn write_attribute(&mut self, prefix: &str, name: &str, value: &str) {
        let Some(start) = self.pending.as_mut() else {
            return;
        };
        if prefix.is_empty() {
            start.push_attribute((name, value));
        } else {
            let qualified = format!("{}:{}", prefix, name);
            start.push_attribute((qualified.as_str(), value));
        }
    }

    pub fn write_bool_attribute(&mut self, prefix: &str, name: &str, value: bool) {
        self.write_attribute(prefix, name, if value { "true" } else { "false" });
    }

    pub fn write_double_attribute(&mut self, prefix: &str, name: &str, value: f64) {
        self.write_attribute(prefix, name, &format_double(value));
    }

    pub fn write_int_attribute(&mut self, prefix: &str, name: &str, value: i64) {
        self.write_attribute(prefix, name, &value.to_string());
    }

    /// Declares a namespace on the element just opened.
    pub fn write_namespace(&mut self, prefix: &str, uri: &str) {
        if prefix.is_empty() {
            self.write_attribute("", "xmlns", uri);
        } else {
            self.write_attribute("xmlns", prefix, uri);
        }
    }

    /// Writes a block of XML verbatim, on its own line.
    pub fn write_raw(&mut self, xml: &str) {
        self.flush_pending();
        if self.error.is_some() {
            return;
        }
        let result = self
            .writer
            .write_indent()
            .map_err(XmlWriteError::from)
            .and_then(|_| {
                self.writer
                    .get_mut()
                    .write_all(xml.trim().as_bytes())
                    .map_err(XmlWriteError::from)
            });
        self.record(result);
    }

    pub fn end_element(&mut self) {
        let Some(name) = self.open.pop() else {
            self.record::<()>(Err(XmlWriteError::Unbalanced));
            return;
        };
        match self.pending.take() {
            Some(start) => self.write_event(Event::Empty(start)),
            None => self.write_event(Event::End(BytesEnd::new(name))),
        }
    }

    /// Number of elements opened and not yet closed.
    pub fn depth(&self) -> usize {
        self.open.len()
    }

    /// Flushes the sink and reports the first failure, if any.
    pub fn finish(mut self) -> Result<(), XmlWriteError> {
        self.flush_pending();
        if let Some(err) = self.error.take() {
            return Err(err);
        }
        if !self.open.is_empty() {
            return Err(XmlWriteError::Unbalanced);
        }
        self.writer.get_mut().write_all(b"\n")?;
        self.writer.get_mut().flush()?;
        Ok(())
    }

    fn flush_pending(&mut self) {
        if let Some(start) = self.pending.take() {
            self.write_event(Event::Start(start));
        }
    }

    fn write_event(&mut self, event: Event<'_>) {
        if self.error.is_some() {
            return;
        }
        let result = self.writer.write_event(event).map_err(XmlWriteError::from);
        self.record(result);
    }

    fn record<T>(&mut self, result: Result<T, XmlWriteError>) {
        if let Err(err) = result {
            if self.error.is_none() {
                self.error = Some(err);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(indent: usize, build: impl FnOnce(&mut XmlOutputStream<'_>)) -> String {
        let mut buffer = Vec::new();
        {
            let mut out = XmlOutputStream::new(Box::new(&mut buffer), indent);
            build(&mut out);
            out.finish().unwrap();
        }
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn test_empty_elements_collapse() {
        let xml = render(0, |out| {
            out.start_element("a");
            out.write_attribute("", "x", "1 < 2");
            out.start_element("fbc:b");
            out.write_attribute("fbc", "id", "g1");
            out.end_element();
            out.end_element();
        });
        assert_eq!(xml, "<a x=\"1 &lt; 2\"><fbc:b fbc:id=\"g1\"/></a>\n");
    }

    #[test]
    fn test_typed_attributes() {
        let xml = render(0, |out| {
            out.start_element("p");
            out.write_bool_attribute("", "constant", true);
            out.write_double_attribute("", "value", f64::INFINITY);
            out.write_int_attribute("qual", "maxLevel", 2);
            out.end_element();
        });
        assert_eq!(xml, "<p constant=\"true\" value=\"INF\" qual:maxLevel=\"2\"/>\n");
    }

    #[test]
    fn test_raw_block_is_indented() {
        let xml = render(2, |out| {
            out.start_element("species");
            out.write_raw("<notes><p>x</p></notes>");
            out.end_element();
        });
        assert_eq!(xml, "<species>\n  <notes><p>x</p></notes>\n</species>\n");
    }

    #[test]
    fn test_unbalanced_end_is_reported() {
        let mut buffer = Vec::new();
        let mut out = XmlOutputStream::new(Box::new(&mut buffer), 0);
        out.end_element();
        assert!(matches!(out.finish(), Err(XmlWriteError::Unbalanced)));
    }

    struct FailingSink;

    impl Write for FailingSink {
        fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::other("disk full"))
        }
        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_sink_failure_is_sticky() {
        let mut out = XmlOutputStream::new(Box::new(FailingSink), 0);
        out.write_declaration();
        out.start_element("a");
        out.end_element();
        assert!(out.finish().is_err());
    }
}
