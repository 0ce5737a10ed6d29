use ebmlstream::{ebml_master, parse_element, Bump, EbmlReader, ParseOptions};
use honggfuzz::fuzz;
use std::io::Cursor;

ebml_master! {
    struct Node<'a>("Node") {
        0x01 => value: uint,
        0x02 => children: [Node],
        0x03 => name: string,
    }
}

fn main() {
    loop {
        fuzz!(|data: &[u8]| {
            let arena = Bump::new();
            let options = ParseOptions::default().quiet(true).with_max_element_size(1 << 20);
            let _ = parse_element::<Node>(data, &arena, &options);
            let mut reader = EbmlReader::with_options(Cursor::new(data), options);
            while reader.read_id().is_ok() {
                if reader.skip_or_resync_cluster(None).is_err() {
                    break;
                }
            }
        });
    }
}
