//! Well-known element IDs.
//!
//! Values are decoded IDs (length marker masked off), the form produced by
//! [`read_id`](crate::vint::read_id) and used in schemas. The familiar raw
//! spelling is noted next to each constant.

/// EBML header, raw `1A 45 DF A3`.
pub const EBML: u32 = 0x0A45_DFA3;
/// Raw `42 86`.
pub const EBML_VERSION: u32 = 0x0286;
/// Raw `42 F7`.
pub const EBML_READ_VERSION: u32 = 0x02F7;
/// Raw `42 F2`.
pub const EBML_MAX_ID_LENGTH: u32 = 0x02F2;
/// Raw `42 F3`.
pub const EBML_MAX_SIZE_LENGTH: u32 = 0x02F3;
/// Raw `42 82`.
pub const DOC_TYPE: u32 = 0x0282;
/// Raw `42 87`.
pub const DOC_TYPE_VERSION: u32 = 0x0287;
/// Raw `42 85`.
pub const DOC_TYPE_READ_VERSION: u32 = 0x0285;

/// Padding element, raw `EC`.
pub const VOID: u32 = 0x6C;
/// Checksum element, raw `BF`.
pub const CRC32: u32 = 0x3F;

/// Raw `18 53 80 67`.
pub const SEGMENT: u32 = 0x0853_8067;
/// Raw `11 4D 9B 74`.
pub const SEEK_HEAD: u32 = 0x014D_9B74;
/// Raw `15 49 A9 66`.
pub const INFO: u32 = 0x0549_A966;
/// Raw `1F 43 B6 75`.
pub const CLUSTER: u32 = 0x0F43_B675;
/// Raw `16 54 AE 6B`.
pub const TRACKS: u32 = 0x0654_AE6B;
/// Raw `1C 53 BB 6B`.
pub const CUES: u32 = 0x0C53_BB6B;
/// Raw `19 41 A4 69`.
pub const ATTACHMENTS: u32 = 0x0941_A469;
/// Raw `10 43 A7 70`.
pub const CHAPTERS: u32 = 0x0043_A770;
/// Raw `12 54 C3 67`.
pub const TAGS: u32 = 0x0254_C367;

const MARKER_4: u32 = 0x1000_0000;

/// Strips the marker from a raw 4-byte ID; other values pass through.
#[inline]
pub const fn decoded_id(id: u32) -> u32 {
    if id >> 28 == 1 {
        id & !MARKER_4
    } else {
        id
    }
}

/// The raw 4-byte big-endian encoding of a 4-byte ID, accepting either the
/// decoded value or the raw spelling.
#[inline]
pub const fn raw_id4(id: u32) -> u32 {
    decoded_id(id) | MARKER_4
}

/// Whether `id` is a Matroska level 1 element, i.e. allowed directly inside
/// the Segment. Global elements (Void, CRC-32) are intentionally excluded.
pub fn is_mkv_level1_id(id: u32) -> bool {
    matches!(
        decoded_id(id),
        SEEK_HEAD | INFO | CLUSTER | TRACKS | CUES | ATTACHMENTS | CHAPTERS | TAGS
    )
}
