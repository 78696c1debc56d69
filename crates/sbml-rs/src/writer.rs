// crates/sbml-rs/src/writer.rs

//! Whole-document writing.

use crate::document::SbmlDocument;
use crate::error::SbmlError;
use crate::error::table::{XML_FILE_OPERATION_ERROR, XML_FILE_UNWRITABLE};
use crate::log::{PassContext, my_debug, my_error};
use crate::reader::is_compressed;
use crate::sbase::write_element;
use crate::xml::{XmlOutputStream, XmlWriteError};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Writes SBML documents to files, sinks or strings.
#[derive(Debug, Clone)]
pub struct SbmlWriter {
    program_name: Option<String>,
    program_version: Option<String>,
    indent: usize,
}

impl Default for SbmlWriter {
    fn default() -> Self {
        SbmlWriter {
            program_name: None,
            program_version: None,
            indent: 2,
        }
    }
}

impl SbmlWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Name written in the leading `Created by` comment.
    pub fn with_program_name(mut self, name: &str) -> Self {
        self.program_name = Some(name.to_string());
        self
    }

    pub fn with_program_version(mut self, version: &str) -> Self {
        self.program_version = Some(version.to_string());
        self
    }

    /// Spaces per nesting level; zero writes everything on one line.
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    /// Writes `doc` to `path`. Failures are logged in the document.
    pub fn write_sbml(&self, doc: &mut SbmlDocument, path: impl AsRef<Path>) -> bool {
        let path = path.as_ref();
        let source = path.display().to_string();
        if is_compressed(path) {
            doc.errors_mut().log(SbmlError::new(
                XML_FILE_UNWRITABLE,
                format!("The file '{}' is compressed; compressed files are not supported.", source),
            ));
            return false;
        }
        let file = match File::create(path) {
            Ok(file) => file,
            Err(err) => {
                my_error!(
                    PassContext {
                        pass: "write",
                        source: source.clone()
                    },
                    "cannot create file: {}",
                    err
                );
                doc.errors_mut().log(SbmlError::new(
                    XML_FILE_UNWRITABLE,
                    format!("The file '{}' could not be opened for writing: {}", source, err),
                ));
                return false;
            }
        };
        let mut sink = BufWriter::new(file);
        self.write_to(doc, &mut sink, source)
    }

    /// Writes `doc` to `sink`. Stream faults are logged in the document.
    pub fn write_sbml_to_writer(&self, doc: &mut SbmlDocument, sink: &mut dyn Write) -> bool {
        self.write_to(doc, sink, "<writer>".to_string())
    }

    /// Renders `doc` as a string; `None` if rendering failed.
    pub fn write_sbml_to_string(&self, doc: &SbmlDocument) -> Option<String> {
        let mut buffer = Vec::new();
        if let Err(err) = self.render(doc, Box::new(&mut buffer)) {
            my_error!(
                PassContext {
                    pass: "write",
                    source: "<string>".to_string()
                },
                "{}",
                err
            );
            return None;
        }
        String::from_utf8(buffer).ok()
    }

    fn write_to(&self, doc: &mut SbmlDocument, sink: &mut dyn Write, source: String) -> bool {
        let ctx = PassContext {
            pass: "write",
            source,
        };
        my_debug!(ctx, "writing document");
        match self.render(doc, Box::new(sink)) {
            Ok(()) => {
                my_debug!(ctx, "done");
                true
            }
            Err(err) => {
                my_error!(ctx, "{}", err);
                doc.errors_mut()
                    .log(SbmlError::new(XML_FILE_OPERATION_ERROR, err.to_string()));
                false
            }
        }
    }

    fn render(&self, doc: &SbmlDocument, sink: Box<dyn Write + '_>) -> Result<(), XmlWriteError> {
        let mut out = XmlOutputStream::new(sink, self.indent);
        out.write_declaration();
        if let Some(name) = &self.program_name {
            let comment = match &self.program_version {
                Some(version) => format!(" Created by {} version {} ", name, version),
                None => format!(" Created by {} ", name),
            };
            out.write_comment(&comment);
        }
        write_element(doc, &mut out);
        out.finish()
    }
}

/// Writes a document to a file with the default writer options.
pub fn write_sbml(doc: &mut SbmlDocument, path: impl AsRef<Path>) -> bool {
    SbmlWriter::new().write_sbml(doc, path)
}

/// Renders a document with the default writer options.
pub fn write_sbml_to_string(doc: &SbmlDocument) -> Option<String> {
    SbmlWriter::new().write_sbml_to_string(doc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sbase::SBase;

    #[test]
    fn test_header_and_root() {
        let mut doc = SbmlDocument::new(3, 1).unwrap();
        doc.create_model().set_id("m").unwrap();
        let xml = SbmlWriter::new()
            .with_program_name("sbml-rs")
            .with_program_version("1.0")
            .write_sbml_to_string(&doc)
            .unwrap();
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(xml.contains("<!-- Created by sbml-rs version 1.0 -->"));
        assert!(xml.contains(
            "<sbml xmlns=\"http://www.sbml.org/sbml/level3/version1/core\" level=\"3\" version=\"1\">"
        ));
        assert!(xml.contains("<model id=\"m\"/>"));
    }

    #[test]
    fn test_empty_lists_are_omitted() {
        let mut doc = SbmlDocument::new(3, 2).unwrap();
        doc.create_model();
        let xml = write_sbml_to_string(&doc).unwrap();
        assert!(!xml.contains("listOf"));
    }

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"))
        }
        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_stream_fault_is_logged() {
        let mut doc = SbmlDocument::new(3, 2).unwrap();
        doc.create_model();
        assert!(!SbmlWriter::new().write_sbml_to_writer(&mut doc, &mut BrokenPipe));
        assert_eq!(doc.num_errors(), 1);
        assert_eq!(doc.error(0).unwrap().code(), XML_FILE_OPERATION_ERROR);
    }

    #[test]
    fn test_compressed_target_is_refused() {
        let mut doc = SbmlDocument::new(3, 2).unwrap();
        assert!(!write_sbml(&mut doc, "out.xml.bz2"));
        assert_eq!(doc.error(0).unwrap().code(), XML_FILE_UNWRITABLE);
    }
}
