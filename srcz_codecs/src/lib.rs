mod lz4_codec;
mod passthrough;
mod source;
mod zstd_codec;

pub use lz4_codec::Lz4Codec;
pub use passthrough::PassThroughCodec;
pub use source::SourceCodec;
pub use zstd_codec::ZstdCodec;

use srcz_core::format::{CODEC_LZ4, CODEC_PASSTHROUGH, CODEC_SOURCE, CODEC_ZSTD};
use srcz_core::Codec;
use std::sync::Arc;

/// Resolve a codec from its on-disk `codec_id`.
///
/// Called by the CLI when opening an existing SRCZ1 file, so the reader can
/// be initialized with the right codec automatically. The source codec is
/// returned with the default profile; decoding never depends on it.
pub fn codec_by_id(id: u16) -> anyhow::Result<Arc<dyn Codec>> {
    match id {
        CODEC_PASSTHROUGH => Ok(Arc::new(PassThroughCodec)),
        CODEC_SOURCE => Ok(Arc::new(SourceCodec::default())),
        CODEC_ZSTD => Ok(Arc::new(ZstdCodec::default())),
        CODEC_LZ4 => Ok(Arc::new(Lz4Codec)),
        _ => anyhow::bail!(
            "unknown codec id {}; supported: 0 (passthrough), 1 (source), 2 (zstd), 3 (lz4)",
            id
        ),
    }
}
