use thiserror::Error;

/// Decode-time failure: the input is not a valid compressed stream.
///
/// Every variant means the stream was damaged or was never produced by the
/// encoder. Decoding never guesses past one of these.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CorruptStreamError {
    #[error("corrupt stream: input is empty, missing mode byte")]
    Empty,
    #[error("corrupt stream: unknown mode flag 0x{0:02x}")]
    UnknownMode(u8),
    #[error("corrupt stream: truncated while reading {what} at offset {offset}")]
    Truncated { what: &'static str, offset: usize },
    #[error("corrupt stream: varint at offset {offset} overflows 64 bits")]
    VarintOverflow { offset: usize },
    #[error("corrupt stream: header entry {entry} has unknown kind tag {tag}")]
    UnknownKind { entry: usize, tag: u8 },
    #[error("corrupt stream: header entry {entry} has kind `{kind}`, which is never substituted")]
    UnsubstitutableKind { entry: usize, kind: &'static str },
    #[error("corrupt stream: header entry {entry} has empty text")]
    EmptyEntry { entry: usize },
    #[error("corrupt stream: code at payload offset {offset} references entry {index} but header has {len}")]
    IndexOutOfRange {
        offset: usize,
        index: u64,
        len: usize,
    },
    #[error("corrupt stream: escape byte at payload offset {offset} has an invalid continuation")]
    InvalidEscape { offset: usize },
    #[error("corrupt stream: escape byte at payload offset {offset} has no continuation")]
    DanglingEscape { offset: usize },
}
