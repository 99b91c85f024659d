use lz4_flex::{compress_prepend_size, decompress_size_prepended};
use srcz_core::format::CODEC_LZ4;
use srcz_core::Codec;

/// LZ4 codec.
///
/// Fastest decompression of the bundled codecs; weakest ratio on source text.
pub struct Lz4Codec;

impl Codec for Lz4Codec {
    fn id(&self) -> u16 {
        CODEC_LZ4
    }

    fn name(&self) -> &'static str {
        "lz4"
    }

    fn compress(&self, raw: &[u8]) -> anyhow::Result<Vec<u8>> {
        Ok(compress_prepend_size(raw))
    }

    fn decompress(&self, compressed: &[u8]) -> anyhow::Result<Vec<u8>> {
        let raw = decompress_size_prepended(compressed)
            .map_err(|e| anyhow::anyhow!("lz4 decompress error: {}", e))?;
        Ok(raw)
    }
}
