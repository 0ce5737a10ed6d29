//! Fixed-width scalar payloads.
//!
//! Callers validate the byte width first: 1-8 bytes for integers, 4 or 8 for
//! floats.

/// Decodes a big-endian unsigned integer of 1-8 bytes.
#[inline]
pub fn decode_uint(bytes: &[u8]) -> u64 {
    debug_assert!((1..=8).contains(&bytes.len()));
    bytes.iter().fold(0u64, |acc, &b| (acc << 8) | u64::from(b))
}

/// Decodes a big-endian two's complement integer of 1-8 bytes, sign-extended
/// from the width actually used.
#[inline]
pub fn decode_sint(bytes: &[u8]) -> i64 {
    debug_assert!((1..=8).contains(&bytes.len()));
    let seed = if bytes[0] & 0x80 != 0 { u64::MAX } else { 0 };
    bytes.iter().fold(seed, |acc, &b| (acc << 8) | u64::from(b)) as i64
}

/// Decodes an IEEE-754 single (4 bytes, promoted) or double (8 bytes).
#[inline]
pub fn decode_float(bytes: &[u8]) -> f64 {
    debug_assert!(bytes.len() == 4 || bytes.len() == 8);
    let bits = decode_uint(bytes);
    if bytes.len() == 4 {
        f64::from(f32::from_bits(bits as u32))
    } else {
        f64::from_bits(bits)
    }
}
