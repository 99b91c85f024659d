use crate::language::LanguageProfile;
use crate::span::{Span, SpanKind};

/// Lexical classifier that splits raw bytes into [`Span`]s.
///
/// Scanning is total: any byte sequence, including invalid UTF-8 or
/// half-finished source, yields spans that concatenate back to the input.
/// Nothing is ever rewritten here.
#[derive(Debug, Clone, Copy, Default)]
pub struct Scanner {
    profile: LanguageProfile,
}

impl Scanner {
    pub fn new(profile: LanguageProfile) -> Self {
        Self { profile }
    }

    pub fn profile(&self) -> &LanguageProfile {
        &self.profile
    }

    /// Classify `input` into spans covering it exactly, in order.
    pub fn scan<'a>(&self, input: &'a [u8]) -> Vec<Span<'a>> {
        let mut spans = Vec::new();
        let mut pos = 0;
        while pos < input.len() {
            let (kind, len) = self.next_span(input, pos);
            debug_assert!(len > 0, "scanner must always make progress");
            spans.push(Span::new(kind, pos, &input[pos..pos + len]));
            pos += len;
        }
        spans
    }

    /// Classify the span starting at `pos`, returning its kind and length.
    fn next_span(&self, input: &[u8], pos: usize) -> (SpanKind, usize) {
        let rest = &input[pos..];
        let byte = rest[0];

        if let Some((open, close)) = self.profile.block_comment {
            if rest.starts_with(open) {
                return (SpanKind::CommentBlock, block_comment_len(rest, open, close));
            }
        }
        if let Some(marker) = self.profile.line_comment {
            if rest.starts_with(marker) {
                let len = rest.iter().position(|&b| b == b'\n').unwrap_or(rest.len());
                return (SpanKind::CommentLine, len);
            }
        }
        if self.profile.raw_quotes.contains(&byte) {
            return (SpanKind::StringLiteral, raw_string_len(rest));
        }
        if self.profile.string_quotes.contains(&byte) {
            return (SpanKind::StringLiteral, string_len(rest));
        }
        if self.profile.char_quote == Some(byte) {
            return match char_literal_len(rest) {
                Some(len) => (SpanKind::CharLiteral, len),
                None => (SpanKind::Other, 1),
            };
        }

        match byte {
            b if is_whitespace(b) => {
                let len = rest.iter().take_while(|&&b| is_whitespace(b)).count();
                (SpanKind::Whitespace, len)
            }
            b'a'..=b'z' | b'A'..=b'Z' | b'_' => {
                let len = rest.iter().take_while(|&&b| is_ident_continue(b)).count();
                let kind = if self.profile.is_keyword(&rest[..len]) {
                    SpanKind::Keyword
                } else {
                    SpanKind::Identifier
                };
                (kind, len)
            }
            b if b.is_ascii_punctuation() => (SpanKind::Punctuation, 1),
            _ => (SpanKind::Other, 1),
        }
    }
}

#[inline]
fn is_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r' | 0x0B | 0x0C)
}

#[inline]
fn is_ident_continue(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// Length of a block comment starting with `open`, including `close`.
/// Unterminated comments run to the end of input.
fn block_comment_len(rest: &[u8], open: &[u8], close: &[u8]) -> usize {
    let body = &rest[open.len()..];
    match body.windows(close.len()).position(|w| w == close) {
        Some(i) => open.len() + i + close.len(),
        None => rest.len(),
    }
}

/// Length of a string literal opened by `rest[0]`, closed by the same byte.
/// Backslash escapes the following byte. Unterminated strings run to the end
/// of input.
fn string_len(rest: &[u8]) -> usize {
    let quote = rest[0];
    let mut i = 1;
    while i < rest.len() {
        match rest[i] {
            b'\\' => i += 2,
            b if b == quote => return i + 1,
            _ => i += 1,
        }
    }
    rest.len()
}

/// Length of a raw string opened by `rest[0]`. Backslashes are ordinary
/// bytes; unterminated raw strings run to the end of input.
fn raw_string_len(rest: &[u8]) -> usize {
    let quote = rest[0];
    match rest[1..].iter().position(|&b| b == quote) {
        Some(i) => i + 2,
        None => rest.len(),
    }
}

/// Length of a character literal, or `None` unless the opening quote is
/// followed by exactly one character (or one escape sequence) and the
/// closing quote. This keeps lifetimes (`'a`) and apostrophes out.
fn char_literal_len(rest: &[u8]) -> Option<usize> {
    let quote = rest[0];
    let body = match *rest.get(1)? {
        b'\n' => return None,
        b if b == quote => return None,
        b'\\' => 1 + escape_len(&rest[2..])?,
        b => utf8_len(b),
    };
    let close = 1 + body;
    (rest.get(close) == Some(&quote)).then_some(close + 1)
}

/// Bytes of an escape sequence after its backslash: `\x41`, `\u{e9}`,
/// `\u00e9`, `\101` or a single escaped character.
fn escape_len(rest: &[u8]) -> Option<usize> {
    let first = *rest.first()?;
    let len = match first {
        b'\n' => return None,
        b'x' => 1 + hex_digits(&rest[1..]),
        b'u' | b'U' if rest.get(1) == Some(&b'{') => {
            let close = rest.iter().take(12).position(|&b| b == b'}')?;
            close + 1
        }
        b'u' | b'U' => 1 + hex_digits(&rest[1..]),
        b'0'..=b'7' => rest
            .iter()
            .take(3)
            .take_while(|b| matches!(b, b'0'..=b'7'))
            .count(),
        b => utf8_len(b),
    };
    Some(len)
}

fn hex_digits(rest: &[u8]) -> usize {
    rest.iter().take_while(|b| b.is_ascii_hexdigit()).count()
}

/// Width of the UTF-8 sequence introduced by `lead`; stray bytes count as one.
#[inline]
fn utf8_len(lead: u8) -> usize {
    match lead {
        0xC0..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF7 => 4,
        _ => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(profile: LanguageProfile, src: &str) -> Vec<(SpanKind, String)> {
        Scanner::new(profile)
            .scan(src.as_bytes())
            .into_iter()
            .map(|s| (s.kind, String::from_utf8_lossy(s.text).into_owned()))
            .collect()
    }

    fn c(src: &str) -> Vec<(SpanKind, String)> {
        kinds(LanguageProfile::C, src)
    }

    #[test]
    fn block_comment_is_atomic_across_lines() {
        let spans = c("/* struct { \"x\" }\n * // not a line comment\n */int");
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].0, SpanKind::CommentBlock);
        assert!(spans[0].1.ends_with("*/"));
        assert_eq!(spans[1], (SpanKind::Keyword, "int".into()));
    }

    #[test]
    fn block_comment_ends_at_first_close() {
        let spans = c("/* a /* b */ c */");
        assert_eq!(spans[0], (SpanKind::CommentBlock, "/* a /* b */".into()));
    }

    #[test]
    fn unterminated_block_comment_runs_to_end() {
        let spans = c("x /* never closed\n int y;");
        assert_eq!(spans.last().unwrap().0, SpanKind::CommentBlock);
        assert_eq!(spans.len(), 3);
    }

    #[test]
    fn line_comment_excludes_newline() {
        let spans = c("// Define a struct\nstruct");
        assert_eq!(
            spans,
            vec![
                (SpanKind::CommentLine, "// Define a struct".into()),
                (SpanKind::Whitespace, "\n".into()),
                (SpanKind::Keyword, "struct".into()),
            ]
        );
    }

    #[test]
    fn string_honors_escapes() {
        let spans = c(r#"printf("say \"hi\" {\\}", x);"#);
        assert_eq!(spans[0], (SpanKind::Identifier, "printf".into()));
        assert_eq!(spans[1], (SpanKind::Punctuation, "(".into()));
        assert_eq!(spans[2], (SpanKind::StringLiteral, r#""say \"hi\" {\\}""#.into()));
        assert_eq!(spans[3], (SpanKind::Punctuation, ",".into()));
    }

    #[test]
    fn char_literals() {
        let spans = c(r"'a' '\'' '\\'");
        let chars: Vec<_> = spans
            .iter()
            .filter(|(k, _)| *k == SpanKind::CharLiteral)
            .map(|(_, t)| t.as_str())
            .collect();
        assert_eq!(chars, vec!["'a'", r"'\''", r"'\\'"]);
    }

    #[test]
    fn unclosed_char_quote_is_other() {
        let spans = c("it's\nfine");
        assert_eq!(spans[0], (SpanKind::Identifier, "it".into()));
        assert_eq!(spans[1], (SpanKind::Other, "'".into()));
        assert_eq!(spans[2], (SpanKind::Identifier, "s".into()));
    }

    #[test]
    fn keywords_use_maximal_munch() {
        let spans = c("int integer _int int_ int");
        let words: Vec<_> = spans
            .into_iter()
            .filter(|(k, _)| *k != SpanKind::Whitespace)
            .collect();
        assert_eq!(
            words,
            vec![
                (SpanKind::Keyword, "int".into()),
                (SpanKind::Identifier, "integer".into()),
                (SpanKind::Identifier, "_int".into()),
                (SpanKind::Identifier, "int_".into()),
                (SpanKind::Keyword, "int".into()),
            ]
        );
    }

    #[test]
    fn whitespace_runs_merge() {
        let spans = c("{\n    \t\r\n    x");
        assert_eq!(spans[1], (SpanKind::Whitespace, "\n    \t\r\n    ".into()));
    }

    #[test]
    fn digits_and_non_ascii_are_single_byte_other() {
        let spans = Scanner::default().scan("42é".as_bytes());
        assert_eq!(spans.len(), 4);
        assert!(spans.iter().all(|s| s.kind == SpanKind::Other && s.len() == 1));
    }

    #[test]
    fn hash_comments_for_python() {
        let spans = kinds(LanguageProfile::PYTHON, "def f(): # returns 'x'\n    return 'x'");
        assert_eq!(spans[0], (SpanKind::Keyword, "def".into()));
        assert!(spans
            .iter()
            .any(|s| *s == (SpanKind::CommentLine, "# returns 'x'".into())));
        assert_eq!(spans.last().unwrap(), &(SpanKind::StringLiteral, "'x'".into()));
    }

    #[test]
    fn go_raw_strings() {
        let spans = kinds(LanguageProfile::GO, "x := `a \"b\" c`");
        assert_eq!(spans.last().unwrap(), &(SpanKind::StringLiteral, "`a \"b\" c`".into()));
    }

    #[test]
    fn go_raw_string_ignores_backslash() {
        let spans = kinds(LanguageProfile::GO, "p := `C:\\` + x\nfunc main() {}\n");
        assert_eq!(spans[5], (SpanKind::StringLiteral, "`C:\\`".into()));
        assert!(spans.contains(&(SpanKind::Keyword, "func".into())));
        assert!(spans.contains(&(SpanKind::Identifier, "main".into())));
        // Interpreted strings still take escapes.
        let spans = kinds(LanguageProfile::GO, r#"s := "a\"b""#);
        assert_eq!(spans.last().unwrap(), &(SpanKind::StringLiteral, r#""a\"b""#.into()));
    }

    #[test]
    fn rust_lifetimes_are_not_char_literals() {
        let spans = kinds(LanguageProfile::RUST, "fn f<'a>(x: &'a str) -> char { 'a' }");
        let chars: Vec<_> = spans
            .iter()
            .filter(|(k, _)| *k == SpanKind::CharLiteral)
            .map(|(_, t)| t.as_str())
            .collect();
        assert_eq!(chars, vec!["'a'"]);
        assert_eq!(
            spans.iter().filter(|s| **s == (SpanKind::Other, "'".into())).count(),
            2
        );
        assert!(spans.contains(&(SpanKind::Keyword, "str".into())));
    }

    #[test]
    fn char_literal_escape_forms() {
        let spans = kinds(
            LanguageProfile::RUST,
            r"'\x41' '\u{e9}' '\n' 'é' '\101' 'static",
        );
        let chars: Vec<_> = spans
            .iter()
            .filter(|(k, _)| *k == SpanKind::CharLiteral)
            .map(|(_, t)| t.as_str())
            .collect();
        assert_eq!(chars, vec![r"'\x41'", r"'\u{e9}'", r"'\n'", "'é'", r"'\101'"]);
        assert_eq!(spans.last().unwrap(), &(SpanKind::Identifier, "static".into()));
    }

    #[test]
    fn css_has_no_line_comments() {
        let spans = kinds(LanguageProfile::CSS, "a { background: url(//cdn/x.png); } /* top */");
        assert!(!spans.iter().any(|(k, _)| *k == SpanKind::CommentLine));
        assert!(spans.contains(&(SpanKind::Keyword, "background".into())));
        assert_eq!(spans.last().unwrap(), &(SpanKind::CommentBlock, "/* top */".into()));
    }

    #[test]
    fn html_comments_and_tags() {
        let spans = kinds(LanguageProfile::HTML, "<!-- <div> -->\n<div class=\"x\">it's</div>");
        assert_eq!(spans[0], (SpanKind::CommentBlock, "<!-- <div> -->".into()));
        assert!(spans.contains(&(SpanKind::Keyword, "div".into())));
        assert!(spans.contains(&(SpanKind::StringLiteral, "\"x\"".into())));
        assert!(spans.contains(&(SpanKind::Punctuation, "'".into())));
    }

    #[test]
    fn swift_single_quote_is_punctuation() {
        let spans = kinds(LanguageProfile::SWIFT, "// note\nlet s = \"it's\" // ok");
        assert_eq!(spans[0], (SpanKind::CommentLine, "// note".into()));
        assert!(spans.contains(&(SpanKind::Keyword, "let".into())));
        assert!(spans.contains(&(SpanKind::StringLiteral, "\"it's\"".into())));
        assert!(!spans.iter().any(|(k, _)| *k == SpanKind::CharLiteral));
    }

    #[test]
    fn spans_partition_arbitrary_bytes() {
        let input: Vec<u8> = (0..=255u8).chain(b"/* \"\\ '".iter().copied()).collect();
        let spans = Scanner::default().scan(&input);
        let mut expected_offset = 0;
        let mut rebuilt = Vec::new();
        for span in &spans {
            assert_eq!(span.offset, expected_offset);
            assert!(!span.is_empty());
            expected_offset = span.end();
            rebuilt.extend_from_slice(span.text);
        }
        assert_eq!(rebuilt, input);
    }

    #[test]
    fn empty_input_has_no_spans() {
        assert!(Scanner::default().scan(b"").is_empty());
    }
}
