#![allow(dead_code)]

use std::io::{Read, Result, Seek, SeekFrom};

/// Wraps a reader and misbehaves in a controlled way.
pub struct FaultyReader<R> {
    inner: R,
    mode: FaultMode,
    calls: usize,
    delivered: u64,
}

pub enum FaultMode {
    /// Every read returns at most one byte.
    OneByteChunks,
    /// Every n-th read fails with `ErrorKind::Interrupted`.
    InterruptedEvery(usize),
    /// The stream ends after this many bytes.
    TruncateAt(u64),
    /// Reads fail with `ErrorKind::BrokenPipe` once this many bytes were delivered.
    FailAt(u64),
}

impl<R: Read> FaultyReader<R> {
    pub fn new(inner: R, mode: FaultMode) -> Self {
        Self {
            inner,
            mode,
            calls: 0,
            delivered: 0,
        }
    }
}

impl<R: Read> Read for FaultyReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        self.calls += 1;
        if buf.is_empty() {
            return Ok(0);
        }
        let n = match self.mode {
            FaultMode::OneByteChunks => self.inner.read(&mut buf[..1])?,
            FaultMode::InterruptedEvery(n) if n != 0 && self.calls % n == 0 => {
                return Err(std::io::Error::from(std::io::ErrorKind::Interrupted));
            }
            FaultMode::TruncateAt(limit) => {
                let left = limit.saturating_sub(self.delivered) as usize;
                let len = buf.len().min(left);
                self.inner.read(&mut buf[..len])?
            }
            FaultMode::FailAt(limit) if self.delivered >= limit => {
                return Err(std::io::Error::from(std::io::ErrorKind::BrokenPipe));
            }
            _ => self.inner.read(buf)?,
        };
        self.delivered += n as u64;
        Ok(n)
    }
}

impl<R: Read + Seek> Seek for FaultyReader<R> {
    fn seek(&mut self, pos: SeekFrom) -> Result<u64> {
        let pos = self.inner.seek(pos)?;
        self.delivered = pos;
        Ok(pos)
    }
}
