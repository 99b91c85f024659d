use tracing::debug;

use crate::config::EngineConfig;
use crate::decoder::decode;
use crate::dictionary::{self, BuildOutcome};
use crate::encoder::{encode, passthrough};
use crate::error::CorruptStreamError;
use crate::language::LanguageProfile;
use crate::scanner::Scanner;
use crate::stream::{CompressedStream, Mode};

/// Scanner → dictionary builder → encoder, plus the decoder for the way back.
///
/// An `Engine` holds only immutable configuration, so one instance can be
/// shared freely across threads. Every call allocates its own spans and
/// dictionary.
#[derive(Debug, Clone, Copy, Default)]
pub struct Engine {
    scanner: Scanner,
    config: EngineConfig,
}

/// Figures from a single [`Engine::compress_with_stats`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressionStats {
    pub input_len: usize,
    pub output_len: usize,
    pub span_count: usize,
    pub entry_count: usize,
    pub mode: Mode,
}

impl CompressionStats {
    /// Compression ratio (input / output).
    pub fn ratio(&self) -> f64 {
        if self.output_len == 0 {
            return 1.0;
        }
        self.input_len as f64 / self.output_len as f64
    }
}

impl Engine {
    pub fn new(profile: LanguageProfile, config: EngineConfig) -> Self {
        Self {
            scanner: Scanner::new(profile),
            config,
        }
    }

    pub fn with_profile(profile: LanguageProfile) -> Self {
        Self::new(profile, EngineConfig::default())
    }

    pub fn profile(&self) -> &LanguageProfile {
        self.scanner.profile()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn scanner(&self) -> &Scanner {
        &self.scanner
    }

    /// Compress `input` into a [`CompressedStream`], choosing passthrough
    /// whenever the dictionary stream would not be strictly smaller.
    pub fn compress_stream(&self, input: &[u8]) -> (CompressedStream, usize) {
        let spans = self.scanner.scan(input);
        let span_count = spans.len();

        let stream = match dictionary::build(&spans, &self.config) {
            BuildOutcome::NoBenefit { .. } => passthrough(input),
            BuildOutcome::Beneficial(dict) => {
                let encoded = encode(&spans, dict);
                let fallback_len = input.len() + 1;
                if encoded.encoded_len() < fallback_len {
                    encoded
                } else {
                    debug!(
                        encoded = encoded.encoded_len(),
                        passthrough = fallback_len,
                        "dictionary stream not smaller, using passthrough"
                    );
                    passthrough(input)
                }
            }
        };
        (stream, span_count)
    }

    pub fn compress(&self, input: &[u8]) -> Vec<u8> {
        self.compress_stream(input).0.to_bytes()
    }

    pub fn compress_with_stats(&self, input: &[u8]) -> (Vec<u8>, CompressionStats) {
        let (stream, span_count) = self.compress_stream(input);
        let entry_count = match &stream {
            CompressedStream::Dictionary { dictionary, .. } => dictionary.len(),
            CompressedStream::Passthrough(_) => 0,
        };
        let mode = stream.mode();
        let bytes = stream.to_bytes();
        let stats = CompressionStats {
            input_len: input.len(),
            output_len: bytes.len(),
            span_count,
            entry_count,
            mode,
        };
        debug!(
            profile = self.profile().name,
            input = stats.input_len,
            output = stats.output_len,
            spans = stats.span_count,
            entries = stats.entry_count,
            mode = mode.name(),
            "compressed"
        );
        (bytes, stats)
    }

    /// Inverse of [`compress`](Self::compress). The profile plays no part.
    pub fn decompress(&self, input: &[u8]) -> Result<Vec<u8>, CorruptStreamError> {
        let stream = CompressedStream::from_bytes(input)?;
        decode(&stream)
    }
}
