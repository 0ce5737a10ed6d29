//! The EBML header that opens every EBML document, and the check that a
//! document is Matroska or WebM.

use crate::error::{Error, Result};
use crate::ids;
use crate::parser::Parsed;
use crate::reader::EbmlReader;
use bumpalo::Bump;
use std::io::Read;

ebml_master! {
    /// Contents of the `EBML` element.
    pub struct EbmlHeader<'a>("EBML") {
        0x0286 => version: uint,
        0x02F7 => read_version: uint,
        0x02F2 => max_id_length: uint,
        0x02F3 => max_size_length: uint,
        0x0282 => doc_type: string,
        0x0287 => doc_type_version: uint,
        0x0285 => doc_type_read_version: uint,
    }
}

impl<'a> EbmlHeader<'a> {
    /// The document type, `matroska` when absent.
    pub fn doc_type_str(&self) -> &'a [u8] {
        self.doc_type.unwrap_or(b"matroska")
    }

    /// Rejects headers describing documents this crate's readers cannot
    /// handle. Absent fields take their EBML defaults.
    pub fn validate(&self) -> Result<()> {
        let doc_type = self.doc_type_str();
        if doc_type != b"matroska" && doc_type != b"webm" {
            return Err(Error::unsupported_header(format!(
                "unknown doc type {:?}",
                String::from_utf8_lossy(doc_type)
            )));
        }
        if let Some(v) = self.doc_type_read_version.filter(|&v| v > 2) {
            return Err(Error::unsupported_header(format!(
                "doc type read version {v} is too new"
            )));
        }
        if let Some(v) = self.read_version.filter(|&v| v != 1) {
            return Err(Error::unsupported_header(format!(
                "EBML read version {v} is not supported"
            )));
        }
        if let Some(v) = self.max_size_length.filter(|&v| v > 8) {
            return Err(Error::unsupported_header(format!(
                "EBML max size length {v} is not supported"
            )));
        }
        if let Some(v) = self.max_id_length.filter(|&v| v != 4) {
            return Err(Error::unsupported_header(format!(
                "EBML max id length {v} is not supported"
            )));
        }
        Ok(())
    }
}

impl<R: Read> EbmlReader<R> {
    /// Reads and validates the EBML header at the start of a document.
    ///
    /// Parsing is quiet regardless of the reader's options, so probing a
    /// file that is not EBML does not log warnings.
    pub fn read_header<'a>(&mut self, arena: &'a Bump) -> Result<Parsed<EbmlHeader<'a>>> {
        let found = self.read_id()?;
        if found != ids::EBML {
            tracing::debug!(found = format_args!("{found:#x}"), "Not an EBML stream");
            return Err(Error::NotEbml { found });
        }
        let options = self.options().clone().quiet(true);
        let header = self.read_element_with::<EbmlHeader>(arena, &options)?;
        header.value.validate()?;
        tracing::debug!(
            doc_type = %String::from_utf8_lossy(header.value.doc_type_str()),
            version = ?header.value.doc_type_version,
            "EBML header"
        );
        Ok(header)
    }
}
