//! Element types shared by the integration tests. IDs are decoded values.
#![allow(dead_code)]

use ebmlstream::ebml_master;

pub const TRACK_NUMBER: u32 = 0x01;
pub const TRACK_NAME: u32 = 0x02;
pub const TRACK_OFFSET: u32 = 0x03;
pub const TRACK_RATE: u32 = 0x04;
pub const TRACK_CODEC: u32 = 0x05;
pub const TRACK_PRIVATE: u32 = 0x06;
pub const TRACK_ENTRY: u32 = 0x2E;

ebml_master! {
    /// A track entry with one field of every scalar kind.
    pub struct Track<'a>("Track") {
        0x01 => number: uint,
        0x02 => names: [string],
        0x03 => offset: sint,
        0x04 => rate: float,
        0x05 => codec: ebml_id,
        0x06 => private: binary,
    }
}

ebml_master! {
    pub struct Tracks<'a>("Tracks") {
        0x2E => entries: [Track],
    }
}

pub const NODE_VALUE: u32 = 0x01;
pub const NODE_CHILD: u32 = 0x02;

ebml_master! {
    /// Self-similar element used to build arbitrarily deep trees.
    pub struct Node<'a>("Node") {
        0x01 => value: uint,
        0x02 => children: [Node],
    }
}

pub const TIMECODE: u32 = 0x67;
pub const SIMPLE_BLOCK: u32 = 0x23;
pub const BLOCK_GROUP: u32 = 0x20;
pub const BLOCK: u32 = 0x21;
pub const BLOCK_DURATION: u32 = 0x1B;

ebml_master! {
    pub struct BlockGroup<'a>("BlockGroup") {
        0x21 => block: binary,
        0x1B => duration: uint,
    }
}

ebml_master! {
    /// Matroska Cluster with the fields a demuxer reads first.
    pub struct Cluster<'a>("Cluster") {
        0x67 => timecode: uint,
        0x23 => simple_blocks: [binary],
        0x20 => block_groups: [BlockGroup],
    }
}

pub const TIMECODE_SCALE: u32 = 0x0AD7B1;
pub const MUXING_APP: u32 = 0x0D80;
pub const DURATION: u32 = 0x0489;

ebml_master! {
    pub struct Info<'a>("Info") {
        0x0AD7B1 => timecode_scale: uint,
        0x0489 => duration: float,
        0x0D80 => muxing_app: string,
    }
}
