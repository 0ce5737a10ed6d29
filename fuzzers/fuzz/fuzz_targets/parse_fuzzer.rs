#![no_main]
use ebmlstream::{ebml_master, parse_element, Bump, EbmlReader, ParseOptions};
use libfuzzer_sys::fuzz_target;
use std::io::Cursor;

ebml_master! {
    struct Node<'a>("Node") {
        0x01 => value: uint,
        0x02 => children: [Node],
        0x03 => name: string,
        0x04 => offset: sint,
        0x05 => rate: float,
        0x06 => id: ebml_id,
        0x07 => blobs: [binary],
    }
}

fuzz_target!(|data: &[u8]| {
    let arena = Bump::new();
    let options = ParseOptions::default()
        .quiet(true)
        .verify_checksums(true)
        .with_max_element_size(1 << 20);
    let _ = parse_element::<Node>(data, &arena, &options);

    let mut reader = EbmlReader::with_options(Cursor::new(data), options);
    let _ = reader.read_header(&arena);
    while reader.read_id().is_ok() {
        if reader.read_element::<Node>(&arena).is_err() {
            let _ = reader.resync_cluster();
        }
    }
});
