use srcz_core::format::CODEC_SOURCE;
use srcz_core::{Codec, Engine, EngineConfig, LanguageProfile};

/// Syntax-aware dictionary codec backed by [`Engine`].
///
/// The profile only influences which words count as keywords when
/// compressing. Any `SourceCodec` can decompress any source stream.
#[derive(Debug, Clone, Copy, Default)]
pub struct SourceCodec {
    engine: Engine,
}

impl SourceCodec {
    pub fn new(profile: LanguageProfile, config: EngineConfig) -> Self {
        Self {
            engine: Engine::new(profile, config),
        }
    }

    pub fn with_profile(profile: LanguageProfile) -> Self {
        Self {
            engine: Engine::with_profile(profile),
        }
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }
}

impl Codec for SourceCodec {
    fn id(&self) -> u16 {
        CODEC_SOURCE
    }

    fn name(&self) -> &'static str {
        "source"
    }

    fn compress(&self, raw: &[u8]) -> anyhow::Result<Vec<u8>> {
        Ok(self.engine.compress(raw))
    }

    fn decompress(&self, compressed: &[u8]) -> anyhow::Result<Vec<u8>> {
        Ok(self.engine.decompress(compressed)?)
    }
}
