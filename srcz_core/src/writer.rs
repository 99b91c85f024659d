use std::fs::File;
use std::io::Write;
use std::path::Path;

use tracing::debug;
use xxhash_rust::xxh3::xxh3_64;

use crate::codec::Codec;
use crate::format::{SrczHeader, FLAG_HAS_CHECKSUM, FORMAT_VERSION, HEADER_SIZE};

/// Sizes reported by [`Writer::finish`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileSummary {
    pub raw_len: u64,
    /// Codec payload size, excluding the header.
    pub compressed_len: u64,
    /// Total bytes written, header included.
    pub file_len: u64,
}

impl FileSummary {
    /// Compression ratio (raw / file on disk).
    pub fn ratio(&self) -> f64 {
        if self.file_len == 0 {
            return 1.0;
        }
        self.raw_len as f64 / self.file_len as f64
    }
}

/// Writer for SRCZ1 files.
///
/// # Write contract
/// Call [`write`](Self::write) any number of times with arbitrary-sized byte
/// slices. The writer accumulates everything in memory; the source codec
/// ranks its dictionary over the complete input, so nothing is compressed
/// before [`finish`](Self::finish).
///
/// # Format layout written
/// ```text
/// [HEADER: 32 bytes]   ← magic, version, codec id, flags, raw_len, checksum
/// [PAYLOAD]            ← codec output for the whole input
/// ```
pub struct Writer {
    file: File,
    codec: Box<dyn Codec>,
    /// Raw bytes not yet compressed.
    pending: Vec<u8>,
}

impl Writer {
    /// Create a new SRCZ1 file at `path`, overwriting any existing file.
    pub fn create(path: impl AsRef<Path>, codec: Box<dyn Codec>) -> anyhow::Result<Self> {
        let file = File::create(path)?;
        Ok(Self {
            file,
            codec,
            pending: Vec::new(),
        })
    }

    /// Buffer `data` for compression.
    pub fn write(&mut self, data: &[u8]) -> anyhow::Result<()> {
        self.pending.extend_from_slice(data);
        Ok(())
    }

    /// Compress everything written so far, then write header and payload.
    pub fn finish(mut self) -> anyhow::Result<FileSummary> {
        let raw = std::mem::take(&mut self.pending);
        let bytes = encode_file(self.codec.as_ref(), &raw)?;
        self.file.write_all(&bytes)?;
        self.file.flush()?;

        let summary = FileSummary {
            raw_len: raw.len() as u64,
            compressed_len: (bytes.len() - HEADER_SIZE) as u64,
            file_len: bytes.len() as u64,
        };
        debug!(
            codec = self.codec.name(),
            raw = summary.raw_len,
            file = summary.file_len,
            "wrote SRCZ1 file"
        );
        Ok(summary)
    }
}

/// Build a complete SRCZ1 image (header + payload) in memory.
pub fn encode_file(codec: &dyn Codec, raw: &[u8]) -> anyhow::Result<Vec<u8>> {
    let payload = codec.compress(raw)?;
    let header = SrczHeader {
        version: FORMAT_VERSION,
        codec_id: codec.id(),
        flags: FLAG_HAS_CHECKSUM,
        raw_len: raw.len() as u64,
        checksum: xxh3_64(raw),
    };
    let mut out = Vec::with_capacity(HEADER_SIZE + payload.len());
    out.extend_from_slice(&header.to_bytes());
    out.extend_from_slice(&payload);
    Ok(out)
}
