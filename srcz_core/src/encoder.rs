use crate::dictionary::Dictionary;
use crate::span::Span;
use crate::stream::CompressedStream;
use crate::varint::write_varint;

/// Byte written after the escape byte to mean "a literal escape byte".
/// Codes use `index + 1`, so zero never names an entry.
pub const LITERAL_ESCAPE: u8 = 0x00;

/// Rewrite `spans` against `dictionary` into a dictionary-mode stream.
///
/// Spans whose (kind, text) has an entry become `escape, varint(index + 1)`.
/// Everything else is copied, with each occurrence of the escape byte
/// written as `escape, 0x00`.
pub fn encode(spans: &[Span<'_>], dictionary: Dictionary) -> CompressedStream {
    let escape = dictionary.escape();
    let payload = {
        let lookup = dictionary.lookup();
        let mut payload = Vec::with_capacity(spans.iter().map(Span::len).sum());
        for span in spans {
            if span.kind.is_substitutable() {
                if let Some(&index) = lookup.get(&(span.kind, span.text)) {
                    payload.push(escape);
                    write_varint(&mut payload, index as u64 + 1);
                    continue;
                }
            }
            write_literal(&mut payload, span.text, escape);
        }
        payload
    };
    CompressedStream::Dictionary {
        dictionary,
        payload,
    }
}

/// Wrap `input` as a passthrough stream.
pub fn passthrough(input: &[u8]) -> CompressedStream {
    CompressedStream::Passthrough(input.to_vec())
}

fn write_literal(out: &mut Vec<u8>, text: &[u8], escape: u8) {
    for &b in text {
        out.push(b);
        if b == escape {
            out.push(LITERAL_ESCAPE);
        }
    }
}
