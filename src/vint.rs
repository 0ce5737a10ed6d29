//! EBML variable-length integers: element IDs, element lengths and the
//! nested varints found inside some payloads.
//!
//! Wire layout: the number of leading zero bits of the first byte, plus one,
//! is the encoded width `L`. The first set bit is a marker and is not part of
//! the value; the remaining bits of the first byte and all bits of the next
//! `L - 1` bytes form the big-endian value.
//!
//! IDs are 1-4 bytes, lengths 1-8 bytes. A length whose data bits are all set
//! is the reserved "unknown length" encoding and never decodes.

use crate::error::{Error, Result, VintError};
use std::io::Read;

/// Maximum encoded width of an element ID.
pub const MAX_ID_LEN: usize = 4;

/// Maximum encoded width of an element length.
pub const MAX_LENGTH_LEN: usize = 8;

/// A decoded element header: ID, payload length and the header's encoded size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub id: u32,
    pub length: u64,
    pub size: usize,
}

#[inline]
fn marker_width(first: u8, max: usize) -> Option<usize> {
    let width = first.leading_zeros() as usize + 1;
    (width <= max).then_some(width)
}

/// Decodes one varint of at most `max` bytes. Returns the value, the number of
/// bytes it occupies and whether every data bit was set.
#[inline]
fn decode(data: &[u8], max: usize) -> std::result::Result<(u64, usize, bool), VintError> {
    let first = *data.first().ok_or(VintError::Empty)?;
    let width = marker_width(first, max).ok_or(VintError::MissingMarker { max })?;
    if data.len() < width {
        return Err(VintError::Truncated {
            needed: width,
            available: data.len(),
        });
    }
    let mask = 0xFFu8.checked_shr(width as u32).unwrap_or(0);
    let value = data[1..width]
        .iter()
        .fold(u64::from(first & mask), |acc, &b| (acc << 8) | u64::from(b));
    let all_ones = value == (1u64 << (7 * width)) - 1;
    Ok((value, width, all_ones))
}

/// Parses an element ID from the start of `data`.
///
/// Returns the ID with its marker bit masked off and the number of bytes
/// consumed. Never reads past the end of `data`.
pub fn parse_id(data: &[u8]) -> std::result::Result<(u32, usize), VintError> {
    let (value, width, _) = decode(data, MAX_ID_LEN)?;
    Ok((value as u32, width))
}

/// Parses an element length from the start of `data`.
pub fn parse_length(data: &[u8]) -> std::result::Result<(u64, usize), VintError> {
    let (value, width, all_ones) = decode(data, MAX_LENGTH_LEN)?;
    // Must precede the range check: a one-byte 0xFF is small but reserved.
    if all_ones {
        return Err(VintError::UnknownLength);
    }
    if value >= 1u64 << 63 {
        return Err(VintError::Overflow);
    }
    Ok((value, width))
}

/// Parses an ID followed by a length.
pub fn parse_header(data: &[u8]) -> std::result::Result<Header, VintError> {
    let (id, id_len) = parse_id(data)?;
    let (length, len_len) = parse_length(&data[id_len..])?;
    Ok(Header {
        id,
        length,
        size: id_len + len_len,
    })
}

/// Reads an unsigned varint from the front of `buffer`, advancing it past the
/// consumed bytes on success.
pub fn read_vlen_uint(buffer: &mut &[u8]) -> std::result::Result<u64, VintError> {
    let (value, width) = parse_length(buffer)?;
    *buffer = &buffer[width..];
    Ok(value)
}

/// Reads a signed varint: the unsigned value minus `2^(7L-1) - 1`.
pub fn read_vlen_int(buffer: &mut &[u8]) -> std::result::Result<i64, VintError> {
    let (value, width) = parse_length(buffer)?;
    *buffer = &buffer[width..];
    let bias = (1i64 << (7 * width - 1)) - 1;
    Ok(value as i64 - bias)
}

fn read_byte<R: Read>(reader: &mut R) -> Result<u8> {
    let mut byte = [0u8; 1];
    read_exact(reader, &mut byte)?;
    Ok(byte[0])
}

pub(crate) fn read_exact<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<()> {
    reader.read_exact(buf).map_err(|e| match e.kind() {
        std::io::ErrorKind::UnexpectedEof => Error::UnexpectedEof,
        _ => e.into(),
    })
}

/// Reads an element ID from a stream.
///
/// When the first byte carries no marker only that byte is consumed.
pub fn read_id<R: Read>(reader: &mut R) -> Result<u32> {
    let mut buf = [0u8; MAX_ID_LEN];
    buf[0] = read_byte(reader)?;
    let width = marker_width(buf[0], MAX_ID_LEN).ok_or(VintError::MissingMarker {
        max: MAX_ID_LEN,
    })?;
    read_exact(reader, &mut buf[1..width])?;
    let (id, _) = parse_id(&buf[..width])?;
    Ok(id)
}

/// Reads an element length from a stream.
pub fn read_length<R: Read>(reader: &mut R) -> Result<u64> {
    let mut buf = [0u8; MAX_LENGTH_LEN];
    buf[0] = read_byte(reader)?;
    let width = marker_width(buf[0], MAX_LENGTH_LEN).ok_or(VintError::MissingMarker {
        max: MAX_LENGTH_LEN,
    })?;
    read_exact(reader, &mut buf[1..width])?;
    let (length, _) = parse_length(&buf[..width])?;
    Ok(length)
}

fn write_marked(value: u64, width: usize, out: &mut Vec<u8>) -> usize {
    let marked = value | (1u64 << (7 * width));
    out.extend_from_slice(&marked.to_be_bytes()[8 - width..]);
    width
}

/// Appends the shortest encoding of an element ID to `out`.
pub fn encode_id(id: u32, out: &mut Vec<u8>) -> std::result::Result<usize, VintError> {
    let width = (1..=MAX_ID_LEN)
        .find(|&w| u64::from(id) < 1u64 << (7 * w))
        .ok_or(VintError::Overflow)?;
    Ok(write_marked(u64::from(id), width, out))
}

/// Appends the shortest encoding of an element length to `out`, never
/// producing the reserved all-ones pattern.
pub fn encode_length(length: u64, out: &mut Vec<u8>) -> std::result::Result<usize, VintError> {
    let width = (1..=MAX_LENGTH_LEN)
        .find(|&w| length < (1u64 << (7 * w)) - 1)
        .ok_or(VintError::Overflow)?;
    Ok(write_marked(length, width, out))
}

/// Appends `length` encoded in exactly `width` bytes.
///
/// The all-ones value is accepted so that callers can produce the reserved
/// unknown-length encoding on purpose.
pub fn encode_length_with_width(
    length: u64,
    width: usize,
    out: &mut Vec<u8>,
) -> std::result::Result<usize, VintError> {
    if !(1..=MAX_LENGTH_LEN).contains(&width) || length > (1u64 << (7 * width)) - 1 {
        return Err(VintError::Overflow);
    }
    Ok(write_marked(length, width, out))
}
