//! Byte-level builders for EBML test documents.
#![allow(dead_code)]

use ebmlstream::vint::{encode_id, encode_length};

/// Encodes one element: ID, minimal length, body.
pub fn element(id: u32, body: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(body.len() + 12);
    encode_id(id, &mut out).unwrap();
    encode_length(body.len() as u64, &mut out).unwrap();
    out.extend_from_slice(body);
    out
}

/// Encodes only the length and body, the part `read_element` consumes.
pub fn body_with_length(body: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(body.len() + 8);
    encode_length(body.len() as u64, &mut out).unwrap();
    out.extend_from_slice(body);
    out
}

pub fn uint(id: u32, value: u64) -> Vec<u8> {
    let bytes = value.to_be_bytes();
    let skip = (value.leading_zeros() / 8).min(7) as usize;
    element(id, &bytes[skip..])
}

pub fn sint(id: u32, value: i64) -> Vec<u8> {
    let bytes = value.to_be_bytes();
    // Drop redundant sign bytes, keeping at least one.
    let mut skip = 0;
    while skip < 7 {
        let (head, next) = (bytes[skip], bytes[skip + 1]);
        let redundant = (head == 0x00 && next & 0x80 == 0) || (head == 0xFF && next & 0x80 != 0);
        if !redundant {
            break;
        }
        skip += 1;
    }
    element(id, &bytes[skip..])
}

pub fn float(id: u32, value: f64) -> Vec<u8> {
    element(id, &value.to_be_bytes())
}

pub fn string(id: u32, value: &str) -> Vec<u8> {
    element(id, value.as_bytes())
}

pub fn ebml_id(id: u32, value: u32) -> Vec<u8> {
    let mut payload = Vec::new();
    encode_id(value, &mut payload).unwrap();
    element(id, &payload)
}

pub fn master(id: u32, children: &[Vec<u8>]) -> Vec<u8> {
    element(id, &children.concat())
}

/// A minimal EBML header declaring the given doc type.
pub fn ebml_header(doc_type: &str) -> Vec<u8> {
    use ebmlstream::ids;
    master(
        ids::EBML,
        &[
            uint(ids::EBML_VERSION, 1),
            uint(ids::EBML_READ_VERSION, 1),
            uint(ids::EBML_MAX_ID_LENGTH, 4),
            uint(ids::EBML_MAX_SIZE_LENGTH, 8),
            string(ids::DOC_TYPE, doc_type),
            uint(ids::DOC_TYPE_VERSION, 4),
            uint(ids::DOC_TYPE_READ_VERSION, 2),
        ],
    )
}
