//! Stream-level access to EBML data.

use crate::error::{Error, Result};
use crate::ids;
use crate::options::ParseOptions;
use crate::parser::{diag, ParseContext, Parsed};
use crate::scalar::{decode_sint, decode_uint};
use crate::schema::Master;
use crate::vint;
use bumpalo::Bump;
use std::io::{self, Read, Seek, SeekFrom};

/// A reader for EBML elements from a byte stream.
///
/// The reader works one element at a time. The caller reads an element ID
/// with [`read_id`](Self::read_id), decides what it is, and then either
/// parses the element into a schema type with
/// [`read_element`](Self::read_element), reads a scalar body, or skips it.
/// When the stream is damaged, [`resync`](Self::resync) scans forward to the
/// next occurrence of a known 4-byte ID.
///
/// ```rust
/// # use ebmlstream::{ebml_master, Bump, EbmlReader, Result};
/// # use std::io::Cursor;
/// ebml_master! {
///     pub struct Info<'a>("Info") {
///         0x0AD7B1 => timecode_scale: uint,
///         0x0D80 => muxing_app: string,
///     }
/// }
///
/// let data = [
///     0x15, 0x49, 0xA9, 0x66, 0x8B, // Info, 11 bytes
///     0x2A, 0xD7, 0xB1, 0x83, 0x0F, 0x42, 0x40,
///     0x4D, 0x80, 0x81, b'x',
/// ];
/// let mut reader = EbmlReader::new(Cursor::new(data));
/// assert_eq!(reader.read_id()?, ebmlstream::ids::INFO);
///
/// let arena = Bump::new();
/// let info = reader.read_element::<Info>(&arena)?;
/// assert!(!info.has_errors);
/// assert_eq!(info.value.timecode_scale, Some(1_000_000));
/// assert_eq!(info.value.muxing_app, Some(&b"x"[..]));
/// # Ok::<(), ebmlstream::Error>(())
/// ```
pub struct EbmlReader<R> {
    reader: R,
    options: ParseOptions,
}

impl<R> EbmlReader<R> {
    /// Creates a reader with default options.
    pub fn new(reader: R) -> Self {
        Self::with_options(reader, ParseOptions::default())
    }

    pub fn with_options(reader: R, options: ParseOptions) -> Self {
        Self { reader, options }
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut ParseOptions {
        &mut self.options
    }

    /// Returns a reference to the underlying reader.
    pub fn get_ref(&self) -> &R {
        &self.reader
    }

    /// Returns a mutable reference to the underlying reader.
    pub fn get_mut(&mut self) -> &mut R {
        &mut self.reader
    }

    /// Consumes the `EbmlReader`, returning the underlying reader.
    pub fn into_inner(self) -> R {
        self.reader
    }
}

impl<R: Read> EbmlReader<R> {
    /// Reads an element ID. See [`vint::read_id`].
    pub fn read_id(&mut self) -> Result<u32> {
        vint::read_id(&mut self.reader)
    }

    /// Reads an element length. See [`vint::read_length`].
    pub fn read_length(&mut self) -> Result<u64> {
        vint::read_length(&mut self.reader)
    }

    /// Reads the body of an unsigned integer element: its length, then
    /// 1-8 value bytes.
    pub fn read_uint(&mut self) -> Result<u64> {
        let mut buf = [0u8; 8];
        let bytes = self.read_scalar_body(&mut buf)?;
        Ok(decode_uint(bytes))
    }

    /// Reads the body of a signed integer element.
    pub fn read_int(&mut self) -> Result<i64> {
        let mut buf = [0u8; 8];
        let bytes = self.read_scalar_body(&mut buf)?;
        Ok(decode_sint(bytes))
    }

    fn read_scalar_body<'b>(&mut self, buf: &'b mut [u8; 8]) -> Result<&'b [u8]> {
        let length = self.read_length()?;
        if !(1..=8).contains(&length) {
            return Err(Error::InvalidScalarLength { length });
        }
        let bytes = &mut buf[..length as usize];
        vint::read_exact(&mut self.reader, bytes)?;
        Ok(bytes)
    }

    /// Reads the body of a master element and parses it as a `T`.
    ///
    /// The element ID must already have been consumed. The body is buffered
    /// in `arena`, which also holds every array of the result; string and
    /// binary fields borrow from that buffer.
    ///
    /// A body cut short by the end of the stream is parsed as far as it goes
    /// and reported through [`Parsed::has_errors`]. An unreadable length, or
    /// one above [`ParseOptions::max_element_size`], is an error and nothing
    /// past the length is consumed.
    pub fn read_element<'a, T: Master<'a> + Default>(&mut self, arena: &'a Bump) -> Result<Parsed<T>> {
        let options = self.options.clone();
        self.read_element_with(arena, &options)
    }

    pub(crate) fn read_element_with<'a, T: Master<'a> + Default>(
        &mut self,
        arena: &'a Bump,
        options: &ParseOptions,
    ) -> Result<Parsed<T>> {
        let quiet = options.quiet;
        let length = match self.read_length() {
            Ok(length) => length,
            Err(err) => {
                diag!(quiet, %err, "Unexpected end of file - partial or corrupt file?");
                return Err(err);
            }
        };
        let limit = options.max_element_size;
        let size = match usize::try_from(length) {
            Ok(size) if length <= limit => size,
            _ => {
                diag!(quiet, length, limit, "Refusing to read oversized element");
                return Err(Error::element_too_large(length, limit));
            }
        };

        let buf: &'a mut [u8] = arena.alloc_slice_fill_copy(size, 0u8);
        let filled = read_available(&mut self.reader, &mut *buf)?;
        let buf: &'a [u8] = buf;

        let mut ctx = ParseContext::new(arena, options);
        if filled < size {
            diag!(quiet, expected = size, read = filled, "Unexpected end of file - partial or corrupt file?");
            ctx.mark_error();
        }
        let value = ctx.parse::<T>(&buf[..filled])?;
        if ctx.has_errors() {
            diag!(quiet, element = value.desc().name, "Error parsing element");
        }
        Ok(Parsed {
            value,
            has_errors: ctx.has_errors(),
        })
    }
}

impl<R: Read + Seek> EbmlReader<R> {
    /// Current offset in the underlying stream.
    pub fn position(&mut self) -> Result<u64> {
        Ok(self.reader.stream_position()?)
    }

    /// Skips the body of the current element, whose ID was already read.
    ///
    /// Fails with [`Error::InvalidLength`] when the length cannot be read or
    /// the body would pass `end` or the end of the stream; the stream is then
    /// restored to where it was.
    pub fn skip_element(&mut self, end: Option<u64>) -> Result<()> {
        let start = self.position()?;
        if let Err(err) = self.try_skip(end) {
            tracing::error!(position = start, %err, "Invalid EBML length");
            self.reader.seek(SeekFrom::Start(start))?;
            return Err(Error::InvalidLength { position: start });
        }
        Ok(())
    }

    fn try_skip(&mut self, end: Option<u64>) -> Result<()> {
        let length = self.read_length()?;
        let body = self.position()?;
        let target = body
            .checked_add(length)
            .filter(|&target| target < i64::MAX as u64)
            .ok_or(Error::InvalidLength { position: body })?;
        if matches!(end, Some(end) if target > end) {
            return Err(Error::InvalidLength { position: body });
        }
        if length == 0 {
            return Ok(());
        }
        // Seeking past the end succeeds, so land on the body's last byte and
        // read it to confirm the stream holds the whole element.
        self.reader.seek(SeekFrom::Start(target - 1))?;
        let mut last = [0u8; 1];
        if read_available(&mut self.reader, &mut last)? == 0 {
            return Err(Error::InvalidLength { position: body });
        }
        Ok(())
    }

    /// Scans forward for the 4-byte element ID `target` and positions the
    /// stream at its first byte, returning that offset.
    ///
    /// `target` may be given decoded (as in [`ids`]) or in its raw spelling.
    /// The scan reads one byte at a time, so an unbuffered source should be
    /// wrapped in a [`std::io::BufReader`].
    pub fn resync(&mut self, target: u32) -> Result<u64> {
        let pattern = ids::raw_id4(target);
        let start = self.position()?;
        tracing::error!(
            position = start,
            target = format_args!("{pattern:#010x}"),
            "Corrupt file detected, trying to resync"
        );

        let mut window = 0u32;
        let mut pos = start;
        let mut byte = [0u8; 1];
        loop {
            match self.reader.read(&mut byte) {
                Ok(0) => break,
                Ok(_) => {}
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
            window = (window << 8) | u32::from(byte[0]);
            pos += 1;
            if pos - start >= 4 && window == pattern {
                let found = pos - 4;
                self.reader.seek(SeekFrom::Start(found))?;
                tracing::error!(position = found, "Resync target found");
                return Ok(found);
            }
        }
        Err(Error::ResyncFailed {
            target: ids::decoded_id(target),
            start,
        })
    }

    /// Resyncs to the next Cluster.
    pub fn resync_cluster(&mut self) -> Result<u64> {
        self.resync(ids::CLUSTER)
    }

    /// Skips the current element, or resyncs to the next Cluster when its
    /// length is unusable.
    pub fn skip_or_resync_cluster(&mut self, end: Option<u64>) -> Result<()> {
        if self.skip_element(end).is_err() {
            self.resync_cluster()?;
        }
        Ok(())
    }
}

/// Fills as much of `buf` as the stream provides. Returns the byte count.
fn read_available<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
    Ok(filled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    crate::ebml_master! {
        struct Simple<'a>("Simple") {
            0x01 => number: uint,
            0x02 => names: [string],
        }
    }

    const SIMPLE: [u8; 12] = [
        0x8B, 0x81, 0x81, 0x05, 0x82, 0x82, b'h', b'i', 0x82, 0x82, b'y', b'o',
    ];

    #[test]
    fn test_read_element() {
        let arena = Bump::new();
        let mut reader = EbmlReader::new(Cursor::new(SIMPLE));
        let parsed = reader.read_element::<Simple>(&arena).unwrap();
        assert!(!parsed.has_errors);
        assert_eq!(parsed.value.number, Some(5));
        assert_eq!(parsed.value.names.len(), 2);
        assert_eq!(reader.position().unwrap(), 12);
    }

    #[test]
    fn test_read_element_truncated() {
        let arena = Bump::new();
        let mut reader = EbmlReader::new(Cursor::new(&SIMPLE[..9]));
        let parsed = reader.read_element::<Simple>(&arena).unwrap();
        assert!(parsed.has_errors);
        assert_eq!(parsed.value.number, Some(5));
        assert_eq!(&*parsed.value.names, &[&b"hi"[..]]);
    }

    #[test]
    fn test_read_element_too_large() {
        let arena = Bump::new();
        let options = ParseOptions::default().with_max_element_size(10);
        let mut reader = EbmlReader::with_options(Cursor::new(SIMPLE), options);
        let err = reader.read_element::<Simple>(&arena).unwrap_err();
        assert!(matches!(
            err,
            Error::ElementTooLarge {
                declared: 11,
                limit: 10
            }
        ));
        // Only the length was consumed.
        assert_eq!(reader.position().unwrap(), 1);
    }

    #[test]
    fn test_read_element_at_eof() {
        let arena = Bump::new();
        let mut reader = EbmlReader::new(Cursor::new(Vec::new()));
        let err = reader.read_element::<Simple>(&arena).unwrap_err();
        assert!(matches!(err, Error::UnexpectedEof));
    }

    #[test]
    fn test_read_scalars() {
        let mut reader = EbmlReader::new(Cursor::new(vec![0x82, 0x01, 0x00, 0x81, 0xFE, 0x89]));
        assert_eq!(reader.read_uint().unwrap(), 256);
        assert_eq!(reader.read_int().unwrap(), -2);
        assert!(matches!(
            reader.read_uint(),
            Err(Error::InvalidScalarLength { length: 9 })
        ));
    }

    #[test]
    fn test_skip_element_respects_end() {
        let mut reader = EbmlReader::new(Cursor::new(vec![0x83, 1, 2, 3, 0x85, 0]));
        reader.skip_element(None).unwrap();
        assert_eq!(reader.position().unwrap(), 4);
        let err = reader.skip_element(Some(6)).unwrap_err();
        assert!(matches!(err, Error::InvalidLength { position: 4 }));
        assert_eq!(reader.position().unwrap(), 4);
    }

    #[test]
    fn test_skip_element_past_eof_fails() {
        let mut reader = EbmlReader::new(Cursor::new(vec![0x85, 1, 2, 0x83, 1, 2, 3]));
        let err = reader.skip_element(None).unwrap_err();
        assert!(matches!(err, Error::InvalidLength { position: 0 }));
        assert_eq!(reader.position().unwrap(), 0);

        // A body ending exactly at the end of the stream is complete.
        reader.get_mut().set_position(3);
        reader.skip_element(None).unwrap();
        assert_eq!(reader.position().unwrap(), 7);
    }

    #[test]
    fn test_skip_element_bad_length_restores_position() {
        let mut reader = EbmlReader::new(Cursor::new(vec![0xFF, 0x00]));
        assert!(reader.skip_element(None).is_err());
        assert_eq!(reader.position().unwrap(), 0);
    }

    #[test]
    fn test_resync_finds_cluster() {
        let mut data = vec![0x00, 0x1F, 0x43, 0x00, 0x42];
        data.extend_from_slice(&[0x1F, 0x43, 0xB6, 0x75, 0x80]);
        let mut reader = EbmlReader::new(Cursor::new(data));
        assert_eq!(reader.resync_cluster().unwrap(), 5);
        assert_eq!(reader.read_id().unwrap(), ids::CLUSTER);
    }

    #[test]
    fn test_resync_not_found() {
        let mut reader = EbmlReader::new(Cursor::new(vec![0x1F, 0x43, 0xB6]));
        let err = reader.resync(0x1F43_B675).unwrap_err();
        assert!(matches!(
            err,
            Error::ResyncFailed {
                target: ids::CLUSTER,
                start: 0
            }
        ));
    }

    #[test]
    fn test_skip_or_resync_cluster() {
        // Unknown-length element followed by a cluster.
        let data = vec![0xFF, 0xAA, 0x1F, 0x43, 0xB6, 0x75, 0x80];
        let mut reader = EbmlReader::new(Cursor::new(data));
        reader.skip_or_resync_cluster(None).unwrap();
        assert_eq!(reader.position().unwrap(), 2);
    }
}
