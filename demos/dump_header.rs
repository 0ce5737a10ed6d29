use ebmlstream::*;
use std::fs::File;
use std::io::BufReader;

// Prints the EBML header of a Matroska/WebM file and lists the level 1
// elements of its first Segment.
//
// Run with: cargo run --example dump_header -- movie.mkv
// Set RUST_LOG=ebmlstream=trace to see every decoded value.

ebml_master! {
    struct Info<'a>("Info") {
        0x0AD7B1 => timecode_scale: uint,
        0x0489 => duration: float,
        0x0D80 => muxing_app: string,
        0x1741 => writing_app: string,
    }
}

fn name(id: u32) -> &'static str {
    match id {
        ids::SEEK_HEAD => "SeekHead",
        ids::INFO => "Info",
        ids::TRACKS => "Tracks",
        ids::CLUSTER => "Cluster",
        ids::CUES => "Cues",
        ids::ATTACHMENTS => "Attachments",
        ids::CHAPTERS => "Chapters",
        ids::TAGS => "Tags",
        ids::VOID => "Void",
        _ => "?",
    }
}

fn main() -> Result<()> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("ebmlstream=info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let Some(path) = std::env::args().nth(1) else {
        eprintln!("usage: dump_header <file.mkv>");
        std::process::exit(2);
    };

    let mut reader = EbmlReader::new(BufReader::new(File::open(&path)?));
    let mut arena = Bump::new();

    {
        let header = reader.read_header(&arena)?;
        let h = &header.value;
        println!("{path}:");
        println!("  doc type      {}", String::from_utf8_lossy(h.doc_type_str()));
        println!("  doc version   {:?} (read {:?})", h.doc_type_version, h.doc_type_read_version);
        println!("  ebml version  {:?}", h.version);
    }
    arena.reset();

    if reader.read_id()? != ids::SEGMENT {
        println!("  no Segment after the header");
        return Ok(());
    }
    let segment_len = reader.read_length()?;
    let segment_end = reader.position()? + segment_len;

    while reader.position()? < segment_end {
        let start = reader.position()?;
        let id = match reader.read_id() {
            Ok(id) => id,
            Err(Error::UnexpectedEof) => break,
            Err(_) => {
                reader.resync_cluster()?;
                continue;
            }
        };
        if id == ids::INFO {
            let info = reader.read_element::<Info>(&arena)?;
            let v = &info.value;
            println!(
                "  {start:>10}  Info  scale={:?} duration={:?} muxer={:?} writer={:?}",
                v.timecode_scale,
                v.duration,
                v.muxing_app.map(String::from_utf8_lossy),
                v.writing_app.map(String::from_utf8_lossy),
            );
        } else {
            println!("  {start:>10}  {} ({id:#x})", name(id));
            reader.skip_or_resync_cluster(Some(segment_end))?;
        }
        arena.reset();
    }
    Ok(())
}
