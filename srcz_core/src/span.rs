/// Lexical class of a [`Span`].
///
/// The discriminant is the stable one-byte kind tag written into dictionary
/// stream headers, so variants must never be reordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum SpanKind {
    Identifier = 0,
    Keyword = 1,
    StringLiteral = 2,
    CharLiteral = 3,
    CommentLine = 4,
    CommentBlock = 5,
    Whitespace = 6,
    Punctuation = 7,
    Other = 8,
}

impl SpanKind {
    pub const ALL: [SpanKind; 9] = [
        SpanKind::Identifier,
        SpanKind::Keyword,
        SpanKind::StringLiteral,
        SpanKind::CharLiteral,
        SpanKind::CommentLine,
        SpanKind::CommentBlock,
        SpanKind::Whitespace,
        SpanKind::Punctuation,
        SpanKind::Other,
    ];

    /// One-byte tag used in the stream header.
    #[inline]
    pub fn tag(self) -> u8 {
        self as u8
    }

    pub fn from_tag(tag: u8) -> Option<Self> {
        Self::ALL.get(tag as usize).copied()
    }

    /// Whether spans of this kind may be replaced by a dictionary code.
    ///
    /// Literals and comments are always stored verbatim.
    #[inline]
    pub fn is_substitutable(self) -> bool {
        matches!(
            self,
            SpanKind::Identifier | SpanKind::Keyword | SpanKind::Whitespace
        )
    }

    pub fn name(self) -> &'static str {
        match self {
            SpanKind::Identifier => "identifier",
            SpanKind::Keyword => "keyword",
            SpanKind::StringLiteral => "string",
            SpanKind::CharLiteral => "char",
            SpanKind::CommentLine => "line-comment",
            SpanKind::CommentBlock => "block-comment",
            SpanKind::Whitespace => "whitespace",
            SpanKind::Punctuation => "punctuation",
            SpanKind::Other => "other",
        }
    }
}

/// A classified, contiguous slice of the scanned input.
///
/// Spans borrow from the input; the scanner guarantees they partition it with
/// no gaps or overlaps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span<'a> {
    pub kind: SpanKind,
    /// Byte offset of the span within the scanned input.
    pub offset: usize,
    pub text: &'a [u8],
}

impl<'a> Span<'a> {
    pub fn new(kind: SpanKind, offset: usize, text: &'a [u8]) -> Self {
        Self { kind, offset, text }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.text.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Byte offset one past the end of the span.
    #[inline]
    pub fn end(&self) -> usize {
        self.offset + self.text.len()
    }
}
