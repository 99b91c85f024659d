//! Byte-exact serialized form of a compressed stream.
//!
//! ```text
//! passthrough: [0x00] [input bytes ...]
//! dictionary:  [0x01] [escape:u8] [count:varint]
//!              count × ([kind tag:u8] [len:varint] [text bytes])
//!              [payload bytes ...]
//! ```

use crate::dictionary::{Dictionary, DictionaryEntry};
use crate::error::CorruptStreamError;
use crate::span::SpanKind;
use crate::varint::{read_varint, varint_len, write_varint};

pub const MODE_PASSTHROUGH: u8 = 0x00;
pub const MODE_DICTIONARY: u8 = 0x01;

/// Which of the two stream layouts is in use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Passthrough,
    Dictionary,
}

impl Mode {
    pub fn flag(self) -> u8 {
        match self {
            Mode::Passthrough => MODE_PASSTHROUGH,
            Mode::Dictionary => MODE_DICTIONARY,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Mode::Passthrough => "passthrough",
            Mode::Dictionary => "dictionary",
        }
    }
}

/// The only artifact that outlives a compression call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompressedStream {
    /// Input stored verbatim behind a one-byte mode flag.
    Passthrough(Vec<u8>),
    /// Dictionary header followed by a payload of literal bytes and codes.
    Dictionary {
        dictionary: Dictionary,
        payload: Vec<u8>,
    },
}

impl CompressedStream {
    pub fn mode(&self) -> Mode {
        match self {
            CompressedStream::Passthrough(_) => Mode::Passthrough,
            CompressedStream::Dictionary { .. } => Mode::Dictionary,
        }
    }

    /// Size of [`to_bytes`](Self::to_bytes) without serializing.
    pub fn encoded_len(&self) -> usize {
        match self {
            CompressedStream::Passthrough(raw) => 1 + raw.len(),
            CompressedStream::Dictionary {
                dictionary,
                payload,
            } => {
                let header: usize = dictionary.entries().iter().map(|e| e.header_len()).sum();
                2 + varint_len(dictionary.len() as u64) + header + payload.len()
            }
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.encoded_len());
        out.push(self.mode().flag());
        match self {
            CompressedStream::Passthrough(raw) => out.extend_from_slice(raw),
            CompressedStream::Dictionary {
                dictionary,
                payload,
            } => {
                out.push(dictionary.escape());
                write_varint(&mut out, dictionary.len() as u64);
                for entry in dictionary.entries() {
                    out.push(entry.kind.tag());
                    write_varint(&mut out, entry.text.len() as u64);
                    out.extend_from_slice(&entry.text);
                }
                out.extend_from_slice(payload);
            }
        }
        out
    }

    /// Parse the mode flag and header. The payload is not validated here;
    /// that happens while decoding it.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CorruptStreamError> {
        let (&flag, rest) = bytes.split_first().ok_or(CorruptStreamError::Empty)?;
        match flag {
            MODE_PASSTHROUGH => Ok(CompressedStream::Passthrough(rest.to_vec())),
            MODE_DICTIONARY => parse_dictionary(bytes),
            other => Err(CorruptStreamError::UnknownMode(other)),
        }
    }
}

fn parse_dictionary(bytes: &[u8]) -> Result<CompressedStream, CorruptStreamError> {
    let mut pos = 1;
    let escape = *bytes.get(pos).ok_or(CorruptStreamError::Truncated {
        what: "escape byte",
        offset: pos,
    })?;
    pos += 1;

    let (count, used) = read_varint(bytes, pos, "entry count")?;
    pos += used;

    // Each entry needs at least three bytes; reject absurd counts before allocating.
    let remaining = bytes.len() - pos;
    if count > (remaining / 3) as u64 {
        return Err(CorruptStreamError::Truncated {
            what: "header entries",
            offset: pos,
        });
    }

    let mut entries = Vec::with_capacity(count as usize);
    for entry in 0..count as usize {
        let tag = *bytes.get(pos).ok_or(CorruptStreamError::Truncated {
            what: "entry kind tag",
            offset: pos,
        })?;
        let kind = SpanKind::from_tag(tag).ok_or(CorruptStreamError::UnknownKind { entry, tag })?;
        if !kind.is_substitutable() {
            return Err(CorruptStreamError::UnsubstitutableKind {
                entry,
                kind: kind.name(),
            });
        }
        pos += 1;

        let (len, used) = read_varint(bytes, pos, "entry text length")?;
        pos += used;
        if len == 0 {
            return Err(CorruptStreamError::EmptyEntry { entry });
        }
        let end = usize::try_from(len)
            .ok()
            .and_then(|len| pos.checked_add(len))
            .filter(|&end| end <= bytes.len())
            .ok_or(CorruptStreamError::Truncated {
                what: "entry text",
                offset: pos,
            })?;
        entries.push(DictionaryEntry {
            kind,
            text: bytes[pos..end].to_vec(),
            frequency: 0,
        });
        pos = end;
    }

    Ok(CompressedStream::Dictionary {
        dictionary: Dictionary::new(escape, entries),
        payload: bytes[pos..].to_vec(),
    })
}
