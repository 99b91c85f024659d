//! Syntax-aware compression for source text.
//!
//! Pipeline: [`Scanner`] classifies the input into spans, [`dictionary::build`]
//! ranks repeated identifiers, keywords and whitespace runs, the encoder
//! replaces them with escape-prefixed codes, and the decoder reverses it.
//! String literals and comments are always stored verbatim.
//!
//! The [`Codec`] trait and the SRCZ1 [`Writer`]/[`Reader`] wrap the engine
//! (or a generic codec) for storage in files.

pub mod codec;
pub mod config;
pub mod decoder;
pub mod dictionary;
pub mod encoder;
pub mod engine;
pub mod error;
pub mod format;
pub mod language;
pub mod reader;
pub mod scanner;
pub mod span;
pub mod stream;
pub mod varint;
pub mod writer;

pub use codec::Codec;
pub use config::EngineConfig;
pub use dictionary::{BuildOutcome, Dictionary, DictionaryEntry};
pub use engine::{CompressionStats, Engine};
pub use error::CorruptStreamError;
pub use format::{SrczHeader, HEADER_SIZE, MAGIC};
pub use language::{identify_language, LanguageProfile};
pub use reader::{read_header, Reader};
pub use scanner::Scanner;
pub use span::{Span, SpanKind};
pub use stream::{CompressedStream, Mode};
pub use writer::{encode_file, FileSummary, Writer};

/// Compress `input` with the default engine (C keyword profile).
///
/// Deterministic: identical input always yields identical output.
pub fn compress(input: &[u8]) -> Vec<u8> {
    Engine::default().compress(input)
}

/// Inverse of [`compress`] for streams from any profile.
pub fn decompress(input: &[u8]) -> Result<Vec<u8>, CorruptStreamError> {
    Engine::default().decompress(input)
}
