/// Whole-input compression abstraction used by the SRCZ1 container.
///
/// Each `Codec` implementation:
/// - Is identified by a stable numeric `id()` stored in the file header.
/// - Compresses a complete input in one call. The source dictionary codec
///   needs the whole file to rank its entries, so there is no block splitting.
/// - Must round-trip exactly: `decompress(compress(x)) == x`.
pub trait Codec: Send + Sync {
    /// Stable codec ID stored in the SRCZ1 file header.
    fn id(&self) -> u16;

    /// Human-readable codec name for CLI display.
    fn name(&self) -> &'static str;

    fn compress(&self, raw: &[u8]) -> anyhow::Result<Vec<u8>>;

    fn decompress(&self, compressed: &[u8]) -> anyhow::Result<Vec<u8>>;
}
