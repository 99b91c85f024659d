/// Magic bytes for SRCZ version 1 files.
/// 8 bytes: "SRCZ1\n" followed by 2 null bytes.
pub const MAGIC: &[u8; 8] = b"SRCZ1\n\x00\x00";

/// Fixed size of the SRCZ1 file header in bytes.
///   magic[8] + version:u16 + codec_id:u16 + flags:u32
///   + raw_len:u64 + checksum:u64
///   = 8 + 2 + 2 + 4 + 8 + 8 = 32
pub const HEADER_SIZE: usize = 32;

pub const FORMAT_VERSION: u16 = 1;

// ── Flags ──────────────────────────────────────────────────────────────────

/// The header carries an xxhash3-64 checksum of the uncompressed content.
pub const FLAG_HAS_CHECKSUM: u32 = 1 << 0;

// ── Codec IDs ──────────────────────────────────────────────────────────────

pub const CODEC_PASSTHROUGH: u16 = 0;
pub const CODEC_SOURCE: u16 = 1;
pub const CODEC_ZSTD: u16 = 2;
pub const CODEC_LZ4: u16 = 3;

// ── Header ─────────────────────────────────────────────────────────────────

/// Decoded representation of the 32-byte SRCZ1 file header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SrczHeader {
    pub version: u16,
    pub codec_id: u16,
    pub flags: u32,
    /// Length of the original, uncompressed content.
    pub raw_len: u64,
    /// xxhash3-64 of the original content.
    pub checksum: u64,
}

impl SrczHeader {
    /// Serialize to exactly `HEADER_SIZE` bytes.
    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut buf = [0u8; HEADER_SIZE];
        buf[..8].copy_from_slice(MAGIC);
        buf[8..10].copy_from_slice(&self.version.to_le_bytes());
        buf[10..12].copy_from_slice(&self.codec_id.to_le_bytes());
        buf[12..16].copy_from_slice(&self.flags.to_le_bytes());
        buf[16..24].copy_from_slice(&self.raw_len.to_le_bytes());
        buf[24..32].copy_from_slice(&self.checksum.to_le_bytes());
        buf
    }

    /// Deserialize from `HEADER_SIZE` bytes, checking the magic.
    pub fn from_bytes(buf: &[u8; HEADER_SIZE]) -> anyhow::Result<Self> {
        if &buf[..8] != MAGIC {
            anyhow::bail!("invalid SRCZ magic bytes, not an SRCZ1 file");
        }
        Ok(Self {
            version: u16::from_le_bytes(buf[8..10].try_into()?),
            codec_id: u16::from_le_bytes(buf[10..12].try_into()?),
            flags: u32::from_le_bytes(buf[12..16].try_into()?),
            raw_len: u64::from_le_bytes(buf[16..24].try_into()?),
            checksum: u64::from_le_bytes(buf[24..32].try_into()?),
        })
    }

    pub fn has_flag(&self, flag: u32) -> bool {
        self.flags & flag != 0
    }
}
