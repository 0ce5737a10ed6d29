//! Schema-driven parsing of master element payloads.
//!
//! Every master is parsed in two passes over its payload. The first pass
//! walks the child headers, counting occurrences of each known field and
//! finding where the usable data ends. Multi-valued fields then get one arena
//! slice of exactly the counted size, and the second pass decodes each child
//! into its field, recursing into child masters.
//!
//! Malformed input is tolerated wherever possible: the parser records the
//! problem in `has_errors`, keeps whatever it could decode and moves on. Only
//! a handful of conditions abandon a whole master (see [`Error`]).

use crate::error::{Error, Result};
use crate::ids;
use crate::options::ParseOptions;
use crate::scalar::{decode_float, decode_sint, decode_uint};
use crate::schema::{ElementDesc, ElementKind, FieldDesc, FieldMut, Master, MasterField};
use crate::vint::{parse_header, parse_id};
use bumpalo::Bump;

/// Logs at warn level (or error, when given first), demoted to debug level
/// for callers that expect failures.
macro_rules! diag {
    (error, $quiet:expr, $($arg:tt)+) => {
        if $quiet {
            tracing::debug!($($arg)+)
        } else {
            tracing::error!($($arg)+)
        }
    };
    ($quiet:expr, $($arg:tt)+) => {
        if $quiet {
            tracing::debug!($($arg)+)
        } else {
            tracing::warn!($($arg)+)
        }
    };
}
pub(crate) use diag;

/// A populated element.
#[derive(Debug)]
pub struct Parsed<T> {
    pub value: T,
    /// Set when any part of the element was malformed and skipped, clamped or
    /// truncated. The value still holds everything that could be decoded.
    pub has_errors: bool,
}

/// State shared by every level of one parse.
pub(crate) struct ParseContext<'a, 'o> {
    arena: &'a Bump,
    options: &'o ParseOptions,
    has_errors: bool,
}

impl<'a, 'o> ParseContext<'a, 'o> {
    pub(crate) fn new(arena: &'a Bump, options: &'o ParseOptions) -> Self {
        Self {
            arena,
            options,
            has_errors: false,
        }
    }

    pub(crate) fn has_errors(&self) -> bool {
        self.has_errors
    }

    pub(crate) fn mark_error(&mut self) {
        self.has_errors = true;
    }

    /// Parses `data` as the payload of a `T` element at depth 0.
    pub(crate) fn parse<T: Master<'a> + Default>(&mut self, data: &'a [u8]) -> Result<T> {
        let mut value = T::default();
        self.parse_master(&mut value, data, 0)?;
        Ok(value)
    }

    fn parse_master(
        &mut self,
        target: &mut dyn Master<'a>,
        data: &'a [u8],
        depth: usize,
    ) -> Result<()> {
        let desc = target.desc();
        if depth >= self.options.max_depth {
            diag!(error, self.options.quiet, element = desc.name, depth, "EBML element nesting too deep");
            return Err(Error::DepthExceeded {
                element: desc.name,
                depth,
            });
        }
        tracing::trace!(element = desc.name, depth, size = data.len(), "parsing element");

        #[cfg(feature = "crc32")]
        if self.options.verify_checksums {
            self.check_crc32(desc, data);
        }

        let (end, counts) = self.count_children(desc, data)?;
        self.allocate(target, desc, &counts);
        self.populate(target, desc, &data[..end], depth);
        Ok(())
    }

    /// First pass. Returns the end of the usable data and the number of
    /// occurrences of each field of `desc`.
    fn count_children(&mut self, desc: &'static ElementDesc, data: &[u8]) -> Result<(usize, Vec<u64>)> {
        let mut counts = vec![0u64; desc.fields.len()];
        let mut pos = 0;
        while pos < data.len() {
            let header = match parse_header(&data[pos..]) {
                Ok(header) => header,
                Err(err) => {
                    tracing::debug!(element = desc.name, offset = pos, %err, "Error parsing subelement header");
                    self.has_errors = true;
                    break;
                }
            };
            let index = desc.field_index(header.id);
            let body = pos + header.size;
            let remaining = (data.len() - body) as u64;
            let length = if header.length <= remaining {
                header.length
            } else {
                match index.map(|i| desc.fields[i].kind) {
                    Some(kind) if kind != ElementKind::Master => {
                        tracing::debug!(
                            element = desc.name,
                            id = header.id,
                            length = header.length,
                            remaining,
                            "Subelement content goes past end of containing element"
                        );
                        self.has_errors = true;
                        break;
                    }
                    // Parse what is possible from inside the partial element.
                    _ => {
                        self.has_errors = true;
                        remaining
                    }
                }
            };
            if let Some(i) = index {
                counts[i] += 1;
                if counts[i] >= self.options.max_occurrences {
                    diag!(error, self.options.quiet, element = desc.name, id = header.id, "Too many EBML subelements");
                    return Err(Error::TooManyElements {
                        element: desc.name,
                        id: header.id,
                    });
                }
            }
            pos = body + length as usize;
        }
        Ok((pos, counts))
    }

    /// Gives every multi-valued field its storage, bounded by
    /// `max_array_bytes`.
    fn allocate(&mut self, target: &mut dyn Master<'a>, desc: &'static ElementDesc, counts: &[u64]) {
        for (fd, &count) in desc.fields.iter().zip(counts) {
            if !fd.multiple || count == 0 {
                continue;
            }
            let Some(mut field) = target.field(fd.id) else {
                continue;
            };
            let max = self.options.max_array_bytes / field.elem_size().max(1);
            let mut count = usize::try_from(count).unwrap_or(usize::MAX);
            if count > max {
                diag!(error, self.options.quiet, element = desc.name, field = fd.name, count, max, "Too many subelements");
                self.has_errors = true;
                count = max;
            }
            field.reserve(self.arena, count);
        }
    }

    /// Second pass over the range validated by `count_children`.
    fn populate(
        &mut self,
        target: &mut dyn Master<'a>,
        desc: &'static ElementDesc,
        data: &'a [u8],
        depth: usize,
    ) {
        // Singular master fields already attempted, kept or not.
        let mut attempted = vec![false; desc.fields.len()];
        let mut pos = 0;
        while pos < data.len() {
            let header = match parse_header(&data[pos..]) {
                Ok(header) => header,
                Err(err) => {
                    tracing::debug!(element = desc.name, offset = pos, %err, "Error parsing subelement");
                    break;
                }
            };
            let body = pos + header.size;
            let remaining = data.len() - body;
            let length = match usize::try_from(header.length) {
                Ok(length) if length <= remaining => length,
                _ => {
                    tracing::debug!(
                        element = desc.name,
                        id = header.id,
                        "Next subelement content goes past end of containing element, will be truncated"
                    );
                    remaining
                }
            };
            pos = body + length;
            self.store_child(target, desc, header.id, &data[body..pos], depth, &mut attempted);
        }
    }

    fn store_child(
        &mut self,
        target: &mut dyn Master<'a>,
        desc: &'static ElementDesc,
        id: u32,
        payload: &'a [u8],
        depth: usize,
        attempted: &mut [bool],
    ) {
        let size = payload.len();
        let Some((index, fd)) = desc.field_index(id).map(|i| (i, &desc.fields[i])) else {
            match id {
                ids::VOID => tracing::trace!(depth, size, "Ignoring Void element"),
                ids::CRC32 => tracing::trace!(depth, size, "Ignoring CRC-32 element"),
                _ => tracing::debug!(
                    element = desc.name,
                    id = format_args!("{id:#x}"),
                    size,
                    "Ignoring unrecognized subelement"
                ),
            }
            return;
        };
        let Some(field) = target.field(id) else {
            tracing::error!(element = desc.name, field = fd.name, "Field has no storage");
            self.has_errors = true;
            return;
        };
        if !field.accepts(fd.kind) {
            tracing::error!(element = desc.name, field = fd.name, kind = ?fd.kind, "Field storage does not match its kind");
            self.has_errors = true;
            return;
        }
        if field.is_set() || attempted[index] {
            tracing::debug!(
                element = desc.name,
                field = fd.name,
                size,
                "Another subelement of this type, only one allowed, ignoring"
            );
            self.has_errors = true;
            return;
        }

        let stored = match field {
            FieldMut::UInt(slot) => {
                if !(1..=8).contains(&size) {
                    return self.invalid_length(fd, size);
                }
                let value = decode_uint(payload);
                tracing::trace!(depth, field = fd.name, value, "uint");
                slot.store(value)
            }
            FieldMut::SInt(slot) => {
                if !(1..=8).contains(&size) {
                    return self.invalid_length(fd, size);
                }
                let value = decode_sint(payload);
                tracing::trace!(depth, field = fd.name, value, "sint");
                slot.store(value)
            }
            FieldMut::Float(slot) => {
                if size != 4 && size != 8 {
                    return self.invalid_length(fd, size);
                }
                let value = decode_float(payload);
                tracing::trace!(depth, field = fd.name, value, "float");
                slot.store(value)
            }
            FieldMut::Bytes(slot) => {
                if size as u64 > self.options.max_binary_len {
                    diag!(error, self.options.quiet, field = fd.name, size, "Not reading overly long EBML element");
                    return;
                }
                if fd.kind == ElementKind::String {
                    tracing::trace!(depth, field = fd.name, value = %String::from_utf8_lossy(payload), "string");
                } else {
                    tracing::trace!(depth, field = fd.name, size, "binary");
                }
                slot.store(payload)
            }
            FieldMut::EbmlId(slot) => match parse_id(payload) {
                Ok((value, used)) if used == size => {
                    tracing::trace!(depth, field = fd.name, value = format_args!("{value:#x}"), "ebml_id");
                    slot.store(value)
                }
                _ => {
                    tracing::debug!(field = fd.name, size, "ebml_id broken value");
                    self.has_errors = true;
                    return;
                }
            },
            FieldMut::Master(child) => {
                attempted[index] = !fd.multiple;
                return self.parse_child(child, desc, fd, payload, depth);
            }
        };
        if !stored {
            self.too_many(desc, fd);
        }
    }

    fn parse_child(
        &mut self,
        field: &mut dyn MasterField<'a>,
        desc: &'static ElementDesc,
        fd: &FieldDesc,
        payload: &'a [u8],
        depth: usize,
    ) {
        let result = match field.begin() {
            Some(child) => self.parse_master(child, payload, depth + 1),
            None => return self.too_many(desc, fd),
        };
        match result {
            Ok(()) => field.commit(),
            Err(err) => {
                tracing::debug!(element = desc.name, field = fd.name, %err, "Dropping unparseable subelement");
                field.abandon();
                self.has_errors = true;
            }
        }
    }

    fn invalid_length(&mut self, fd: &FieldDesc, size: usize) {
        tracing::debug!(field = fd.name, kind = ?fd.kind, size, "Invalid length for element type");
        self.has_errors = true;
    }

    fn too_many(&mut self, desc: &ElementDesc, fd: &FieldDesc) {
        diag!(error, self.options.quiet, element = desc.name, field = fd.name, "Too many subelements");
        self.has_errors = true;
    }

    #[cfg(feature = "crc32")]
    fn check_crc32(&mut self, desc: &ElementDesc, data: &[u8]) {
        match crate::checksum::verify_leading_crc32(data) {
            Some(Ok(())) => tracing::trace!(element = desc.name, "CRC-32 verified"),
            Some(Err(err)) => {
                diag!(self.options.quiet, element = desc.name, %err, "CRC-32 check failed");
                self.has_errors = true;
            }
            None => {}
        }
    }
}

/// Parses `data`, the payload of one `T` master element, into a `T`.
///
/// Strings, binary values and arrays in the result borrow from `data` and
/// `arena`. Fails only when the element as a whole cannot be parsed: nesting
/// deeper than [`ParseOptions::max_depth`] or a field repeated
/// [`ParseOptions::max_occurrences`] times.
pub fn parse_element<'a, T: Master<'a> + Default>(
    data: &'a [u8],
    arena: &'a Bump,
    options: &ParseOptions,
) -> Result<Parsed<T>> {
    let mut ctx = ParseContext::new(arena, options);
    let value = ctx.parse::<T>(data)?;
    Ok(Parsed {
        value,
        has_errors: ctx.has_errors(),
    })
}
