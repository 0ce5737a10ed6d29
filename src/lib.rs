//! # ebmlstream
//!
//! A schema-driven reader for EBML, the binary container format underneath
//! Matroska and WebM.
//!
//! ## Overview
//!
//! An EBML document is a tree of tag-length-value elements. `ebmlstream`
//! reads one top-level element at a time from any `std::io::Read` source and
//! populates a plain Rust struct describing it. Element types are declared
//! with the [`ebml_master!`] macro, which generates both the struct and the
//! schema the parser walks.
//!
//! ## Key Features
//!
//! * **Arena-backed**: each element body is buffered in a [`bumpalo::Bump`];
//!   strings and binary fields borrow from it and every array is allocated
//!   exactly once, sized by a counting pass
//! * **Bounded**: element size, nesting depth, occurrence counts and array
//!   sizes are all capped by [`ParseOptions`]
//! * **Tolerant**: malformed children are skipped or clamped and reported
//!   through [`Parsed::has_errors`] instead of failing the whole element
//! * **Recoverable**: [`EbmlReader::resync`] scans a damaged stream for the
//!   next element with a known ID
//!
//! ## Quick Start
//!
//! ```rust
//! use ebmlstream::{ebml_master, Bump, EbmlReader, Result};
//! use std::io::Cursor;
//!
//! ebml_master! {
//!     pub struct Track<'a>("Track") {
//!         0x01 => number: uint,
//!         0x02 => names: [string],
//!     }
//! }
//!
//! fn main() -> Result<()> {
//!     // ID 0x01, then an 11-byte body.
//!     let data = [
//!         0x81, 0x8B,
//!         0x81, 0x81, 0x05,
//!         0x82, 0x82, b'h', b'i',
//!         0x82, 0x82, b'y', b'o',
//!     ];
//!     let mut reader = EbmlReader::new(Cursor::new(data));
//!     assert_eq!(reader.read_id()?, 0x01);
//!
//!     let arena = Bump::new();
//!     let track = reader.read_element::<Track>(&arena)?;
//!     assert!(!track.has_errors);
//!     assert_eq!(track.value.number, Some(5));
//!     assert_eq!(&*track.value.names, &[&b"hi"[..], &b"yo"[..]]);
//!     Ok(())
//! }
//! ```
//!
//! ## Element IDs
//!
//! IDs are handled in decoded form: the length marker bit is masked off, so
//! the raw bytes `1A 45 DF A3` are the ID `0x0A45DFA3`. The [`ids`] module
//! lists the well-known values.
//!
//! ## Logging
//!
//! Diagnostics go through [`tracing`]; the library never installs a
//! subscriber. Decoded values are logged at `trace`, skipped or malformed
//! children at `debug`, and read failures at `warn` (or `debug` when
//! [`ParseOptions::quiet`] is set).

#[macro_use]
mod macros;

#[cfg(feature = "crc32")]
pub mod checksum;
pub mod error;
pub mod header;
pub mod ids;
pub mod options;
pub mod parser;
pub mod reader;
pub mod scalar;
pub mod schema;
pub mod vint;

// Re-export the main public API for user convenience.
pub use bumpalo::Bump;
pub use error::{Error, Result, VintError};
pub use header::EbmlHeader;
pub use options::ParseOptions;
pub use parser::{parse_element, Parsed};
pub use reader::EbmlReader;
pub use schema::{ElementDesc, ElementKind, FieldDesc, FieldMut, List, Master, MasterField, Slot};

#[cfg(feature = "crc32")]
pub use checksum::{Checksum, Crc32};
