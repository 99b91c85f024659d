use srcz_core::format::CODEC_PASSTHROUGH;
use srcz_core::Codec;

/// No-op codec: stores content verbatim, with no compression.
///
/// Useful for verifying the container round-trip independently of any codec,
/// and as the baseline in `srcz compare`.
pub struct PassThroughCodec;

impl Codec for PassThroughCodec {
    fn id(&self) -> u16 {
        CODEC_PASSTHROUGH
    }

    fn name(&self) -> &'static str {
        "passthrough"
    }

    fn compress(&self, raw: &[u8]) -> anyhow::Result<Vec<u8>> {
        Ok(raw.to_vec())
    }

    fn decompress(&self, compressed: &[u8]) -> anyhow::Result<Vec<u8>> {
        Ok(compressed.to_vec())
    }
}
