//! CRC-32 elements.
//!
//! A master element may carry a CRC-32 child (ID `0x3F`, raw `BF`) as its
//! first element. Its 4-byte payload is the little-endian IEEE CRC-32 of
//! every byte of the master payload that follows the CRC-32 element.

use crate::error::{Error, Result};
use crate::ids;
use crate::vint::parse_header;

/// A trait for checksum algorithms.
pub trait Checksum {
    /// Calculates the checksum for the given payload.
    fn calculate(&self, payload: &[u8]) -> u32;

    /// Verifies the checksum. Returns `Ok(())` if it matches.
    fn verify(&self, expected: u32, payload: &[u8]) -> Result<()> {
        let calculated = self.calculate(payload);
        if calculated == expected {
            Ok(())
        } else {
            Err(Error::checksum_mismatch(expected, calculated))
        }
    }
}

/// IEEE CRC-32, as used by EBML.
#[derive(Default, Clone, Copy)]
pub struct Crc32;

impl Crc32 {
    pub fn new() -> Self {
        Self
    }
}

impl Checksum for Crc32 {
    fn calculate(&self, payload: &[u8]) -> u32 {
        crc32fast::hash(payload)
    }
}

/// Checks the CRC-32 element at the start of a master payload.
///
/// Returns `None` when the payload does not begin with a well-formed CRC-32
/// element, otherwise the verification result.
pub fn verify_leading_crc32(payload: &[u8]) -> Option<Result<()>> {
    let header = parse_header(payload).ok()?;
    if header.id != ids::CRC32 || header.length != 4 {
        return None;
    }
    let body = payload.get(header.size..header.size + 4)?;
    let expected = u32::from_le_bytes([body[0], body[1], body[2], body[3]]);
    Some(Crc32::new().verify(expected, &payload[header.size + 4..]))
}
