use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use xxhash_rust::xxh3::xxh3_64;

use crate::codec::Codec;
use crate::format::{SrczHeader, FLAG_HAS_CHECKSUM, FORMAT_VERSION, HEADER_SIZE};

/// Reader for SRCZ1 files.
///
/// # Open sequence
/// 1. Read the 32-byte header (magic check, version, codec id).
/// 2. Check the header's codec id against the supplied codec.
/// 3. Load the payload into memory.
///
/// [`read_all`](Self::read_all) decodes the payload and verifies both the
/// recorded raw length and the xxh3 checksum of the result.
pub struct Reader {
    pub header: SrczHeader,
    payload: Vec<u8>,
    codec: Arc<dyn Codec>,
}

/// Read only the header of the SRCZ1 file at `path`.
///
/// Used to discover which codec a file needs before opening it.
pub fn read_header(path: impl AsRef<Path>) -> anyhow::Result<SrczHeader> {
    let mut file = File::open(path)?;
    let mut buf = [0u8; HEADER_SIZE];
    file.read_exact(&mut buf)?;
    SrczHeader::from_bytes(&buf)
}

impl Reader {
    /// Open an SRCZ1 file.
    ///
    /// `codec` must match the `codec_id` stored in the file header. Use
    /// `srcz_codecs::codec_by_id(read_header(path)?.codec_id)` when the codec
    /// is not known up front.
    pub fn open(path: impl AsRef<Path>, codec: Arc<dyn Codec>) -> anyhow::Result<Self> {
        let bytes = std::fs::read(path)?;
        Self::from_bytes(&bytes, codec)
    }

    /// Parse an in-memory SRCZ1 image.
    pub fn from_bytes(bytes: &[u8], codec: Arc<dyn Codec>) -> anyhow::Result<Self> {
        if bytes.len() < HEADER_SIZE {
            anyhow::bail!(
                "file is {} bytes, shorter than the {}-byte SRCZ1 header",
                bytes.len(),
                HEADER_SIZE
            );
        }
        let header_buf: &[u8; HEADER_SIZE] = bytes[..HEADER_SIZE].try_into()?;
        let header = SrczHeader::from_bytes(header_buf)?;

        if header.version != FORMAT_VERSION {
            anyhow::bail!(
                "unsupported SRCZ version {} (only version {} is supported)",
                header.version,
                FORMAT_VERSION
            );
        }
        if header.codec_id != codec.id() {
            anyhow::bail!(
                "codec mismatch: file uses codec {} but provided codec has id {}",
                header.codec_id,
                codec.id()
            );
        }

        Ok(Self {
            header,
            payload: bytes[HEADER_SIZE..].to_vec(),
            codec,
        })
    }

    /// Length of the original content in bytes.
    #[inline]
    pub fn raw_size(&self) -> u64 {
        self.header.raw_len
    }

    /// Length of the codec payload in bytes (excluding the header).
    #[inline]
    pub fn compressed_size(&self) -> u64 {
        self.payload.len() as u64
    }

    /// Compression ratio (raw / compressed payload).
    pub fn ratio(&self) -> f64 {
        let compressed = self.compressed_size();
        if compressed == 0 {
            return 1.0;
        }
        self.raw_size() as f64 / compressed as f64
    }

    /// The undecoded codec payload (for inspection).
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    pub fn codec(&self) -> &dyn Codec {
        self.codec.as_ref()
    }

    /// Decode the payload and verify it against the header.
    pub fn read_all(&self) -> anyhow::Result<Vec<u8>> {
        let raw = self.codec.decompress(&self.payload)?;

        if raw.len() as u64 != self.header.raw_len {
            anyhow::bail!(
                "payload decompressed to {} bytes but header says {}",
                raw.len(),
                self.header.raw_len
            );
        }

        if self.header.has_flag(FLAG_HAS_CHECKSUM) {
            let computed = xxh3_64(&raw);
            if computed != self.header.checksum {
                anyhow::bail!(
                    "checksum mismatch: expected {:016x}, got {:016x}",
                    self.header.checksum,
                    computed
                );
            }
        }

        Ok(raw)
    }
}
