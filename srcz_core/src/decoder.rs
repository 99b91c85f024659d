use crate::dictionary::Dictionary;
use crate::encoder::LITERAL_ESCAPE;
use crate::error::CorruptStreamError;
use crate::stream::CompressedStream;
use crate::varint::{read_varint, varint_len};

/// Reconstruct the original bytes from a parsed stream.
pub fn decode(stream: &CompressedStream) -> Result<Vec<u8>, CorruptStreamError> {
    match stream {
        CompressedStream::Passthrough(raw) => Ok(raw.clone()),
        CompressedStream::Dictionary {
            dictionary,
            payload,
        } => expand(dictionary, payload),
    }
}

fn expand(dictionary: &Dictionary, payload: &[u8]) -> Result<Vec<u8>, CorruptStreamError> {
    let escape = dictionary.escape();
    let mut out = Vec::with_capacity(payload.len() * 2);
    let mut pos = 0;

    while pos < payload.len() {
        let b = payload[pos];
        if b != escape {
            out.push(b);
            pos += 1;
            continue;
        }

        let code_at = pos;
        pos += 1;
        if pos >= payload.len() {
            return Err(CorruptStreamError::DanglingEscape { offset: code_at });
        }
        if payload[pos] == LITERAL_ESCAPE {
            out.push(escape);
            pos += 1;
            continue;
        }

        let (code, used) = read_varint(payload, pos, "code")?;
        pos += used;
        // Codes are always written in their shortest form, and never as zero.
        let index = code
            .checked_sub(1)
            .filter(|_| used == varint_len(code))
            .ok_or(CorruptStreamError::InvalidEscape { offset: code_at })?;
        let entry = usize::try_from(index)
            .ok()
            .and_then(|i| dictionary.get(i))
            .ok_or(CorruptStreamError::IndexOutOfRange {
                offset: code_at,
                index,
                len: dictionary.len(),
            })?;
        out.extend_from_slice(&entry.text);
    }

    Ok(out)
}
