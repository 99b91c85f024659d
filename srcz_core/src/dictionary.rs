//! Frequency-ranked substitution table built from scanned spans.

use std::collections::HashMap;

use tracing::debug;

use crate::config::EngineConfig;
use crate::span::{Span, SpanKind};
use crate::varint::varint_len;

/// One substitutable pattern. Its code is its position in the [`Dictionary`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DictionaryEntry {
    /// The entry only replaces spans of exactly this kind.
    pub kind: SpanKind,
    pub text: Vec<u8>,
    /// Occurrences in the input. Not serialized; zero for parsed streams.
    pub frequency: usize,
}

impl DictionaryEntry {
    /// Bytes this entry occupies in the stream header.
    pub fn header_len(&self) -> usize {
        header_cost(self.text.len())
    }
}

/// Ordered entries plus the escape byte that introduces their codes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dictionary {
    escape: u8,
    entries: Vec<DictionaryEntry>,
}

impl Dictionary {
    pub fn new(escape: u8, entries: Vec<DictionaryEntry>) -> Self {
        Self { escape, entries }
    }

    #[inline]
    pub fn escape(&self) -> u8 {
        self.escape
    }

    pub fn entries(&self) -> &[DictionaryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&DictionaryEntry> {
        self.entries.get(index)
    }

    /// Map from (kind, text) to entry index, for encoding.
    pub fn lookup(&self) -> HashMap<(SpanKind, &[u8]), usize> {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, e)| ((e.kind, e.text.as_slice()), i))
            .collect()
    }
}

/// Result of [`build`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildOutcome {
    Beneficial(Dictionary),
    /// Not enough repetition to pay for a header; store the input verbatim.
    NoBenefit { repeated_spans: usize },
}

/// Length in bytes of the code for entry `index`: escape byte + varint(index + 1).
#[inline]
pub fn code_len(index: usize) -> usize {
    1 + varint_len(index as u64 + 1)
}

/// Header bytes for an entry with `text_len` bytes of text:
/// kind tag + varint length + text.
#[inline]
pub fn header_cost(text_len: usize) -> usize {
    1 + varint_len(text_len as u64) + text_len
}

/// Pick the least frequent byte value in `spans`, lowest value on ties.
pub fn select_escape_byte(spans: &[Span<'_>]) -> u8 {
    let mut histogram = [0usize; 256];
    for span in spans {
        for &b in span.text {
            histogram[b as usize] += 1;
        }
    }
    let mut best = 0u8;
    for value in 1..=255u8 {
        if histogram[value as usize] < histogram[best as usize] {
            best = value;
        }
    }
    best
}

struct Candidate<'a> {
    kind: SpanKind,
    text: &'a [u8],
    frequency: usize,
    first_seen: usize,
}

impl Candidate<'_> {
    /// Ranking score, assuming the shortest (two-byte) code.
    fn score(&self) -> i64 {
        let per_use = self.text.len() as i64 - 2;
        self.frequency as i64 * per_use - header_cost(self.text.len()) as i64
    }

    /// Exact net saving if this candidate is given entry `index`.
    fn net_saving(&self, index: usize) -> i64 {
        let per_use = self.text.len() as i64 - code_len(index) as i64;
        self.frequency as i64 * per_use - header_cost(self.text.len()) as i64
    }
}

/// Build a dictionary from scanned spans.
///
/// Only Identifier, Keyword and Whitespace spans are counted. Entries are
/// ranked by estimated saving, ties broken by first occurrence, then kept
/// only while their exact saving at their assigned index is positive.
pub fn build(spans: &[Span<'_>], config: &EngineConfig) -> BuildOutcome {
    let mut by_key: HashMap<(SpanKind, &[u8]), usize> = HashMap::new();
    let mut candidates: Vec<Candidate<'_>> = Vec::new();

    for span in spans.iter().filter(|s| s.kind.is_substitutable()) {
        match by_key.get(&(span.kind, span.text)) {
            Some(&slot) => candidates[slot].frequency += 1,
            None => {
                by_key.insert((span.kind, span.text), candidates.len());
                candidates.push(Candidate {
                    kind: span.kind,
                    text: span.text,
                    frequency: 1,
                    first_seen: candidates.len(),
                });
            }
        }
    }

    let repeated_spans: usize = candidates
        .iter()
        .filter(|c| c.frequency >= 2)
        .map(|c| c.frequency)
        .sum();
    if repeated_spans < config.min_repeated_spans {
        debug!(
            repeated_spans,
            threshold = config.min_repeated_spans,
            "too few repeated spans for a dictionary"
        );
        return BuildOutcome::NoBenefit { repeated_spans };
    }

    candidates.retain(|c| c.score() > 0);
    candidates.sort_by(|a, b| {
        b.score()
            .cmp(&a.score())
            .then(a.first_seen.cmp(&b.first_seen))
    });

    let mut entries = Vec::new();
    let mut saved = 0i64;
    for candidate in &candidates {
        if entries.len() >= config.max_entries {
            break;
        }
        let net = candidate.net_saving(entries.len());
        if net <= 0 {
            continue;
        }
        saved += net;
        entries.push(DictionaryEntry {
            kind: candidate.kind,
            text: candidate.text.to_vec(),
            frequency: candidate.frequency,
        });
    }

    if entries.is_empty() {
        debug!(repeated_spans, "no dictionary entry saves space");
        return BuildOutcome::NoBenefit { repeated_spans };
    }

    let escape = select_escape_byte(spans);
    debug!(
        entries = entries.len(),
        escape = format_args!("0x{:02x}", escape),
        estimated_saving = saved,
        "built dictionary"
    );
    BuildOutcome::Beneficial(Dictionary::new(escape, entries))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::Scanner;

    fn build_for(src: &str) -> BuildOutcome {
        let spans = Scanner::default().scan(src.as_bytes());
        build(&spans, &EngineConfig::default())
    }

    fn dictionary_for(src: &str) -> Dictionary {
        match build_for(src) {
            BuildOutcome::Beneficial(d) => d,
            other => panic!("expected a dictionary, got {other:?}"),
        }
    }

    #[test]
    fn too_little_repetition_is_no_benefit() {
        assert_eq!(build_for("int x;"), BuildOutcome::NoBenefit { repeated_spans: 0 });
        assert!(matches!(build_for(""), BuildOutcome::NoBenefit { .. }));
    }

    #[test]
    fn short_repeats_that_cannot_pay_are_no_benefit() {
        // `a` repeats but a one-byte pattern never beats a two-byte code.
        assert!(matches!(
            build_for("a a a a a a a a"),
            BuildOutcome::NoBenefit { repeated_spans: 15 }
        ));
    }

    #[test]
    fn ranks_by_saving() {
        let src = "printf printf printf printf int int int int int int";
        let dict = dictionary_for(src);
        // printf: 4 * (6 - 2) - 8 = 8; int: 6 * (3 - 2) - 5 = 1
        let texts: Vec<_> = dict.entries().iter().map(|e| e.text.as_slice()).collect();
        assert_eq!(texts, vec![b"printf".as_slice(), b"int".as_slice()]);
        assert_eq!(dict.entries()[0].kind, SpanKind::Identifier);
        assert_eq!(dict.entries()[0].frequency, 4);
        assert_eq!(dict.entries()[1].kind, SpanKind::Keyword);
    }

    #[test]
    fn ties_break_by_first_occurrence() {
        let dict = dictionary_for("gamma alpha gamma alpha gamma alpha gamma alpha");
        let texts: Vec<_> = dict.entries().iter().map(|e| e.text.clone()).collect();
        assert_eq!(texts, vec![b"gamma".to_vec(), b"alpha".to_vec()]);
    }

    #[test]
    fn literals_and_comments_are_never_entries() {
        let src = "/* struct */ /* struct */ /* struct */ \"struct\" \"struct\" \"struct\" struct struct struct struct";
        let dict = dictionary_for(src);
        assert!(dict
            .entries()
            .iter()
            .all(|e| e.kind.is_substitutable()));
        assert!(dict
            .entries()
            .iter()
            .any(|e| e.kind == SpanKind::Keyword && e.text == b"struct"));
    }

    #[test]
    fn entry_kind_follows_profile_keywords() {
        let src = b"struct struct struct struct";
        let c_spans = Scanner::default().scan(src);
        let BuildOutcome::Beneficial(c) = build(&c_spans, &EngineConfig::default()) else {
            panic!("expected dictionary");
        };
        assert_eq!(c.entries()[0].kind, SpanKind::Keyword);

        let bash_spans = Scanner::new(crate::LanguageProfile::BASH).scan(src);
        let BuildOutcome::Beneficial(bash) = build(&bash_spans, &EngineConfig::default()) else {
            panic!("expected dictionary");
        };
        assert_eq!(bash.entries()[0].kind, SpanKind::Identifier);
    }

    #[test]
    fn escape_byte_is_least_frequent_lowest_value() {
        let spans = Scanner::default().scan(b"abc");
        assert_eq!(select_escape_byte(&spans), 0x00);

        let all: Vec<u8> = (0..=255u8).chain([0u8, 1, 2]).collect();
        let spans = Scanner::default().scan(&all);
        assert_eq!(select_escape_byte(&spans), 3);
    }

    #[test]
    fn respects_max_entries() {
        let src = "alpha alpha alpha beta beta beta gamma gamma gamma delta delta delta";
        let spans = Scanner::default().scan(src.as_bytes());
        let config = EngineConfig::default().with_max_entries(2);
        let BuildOutcome::Beneficial(dict) = build(&spans, &config) else {
            panic!("expected dictionary");
        };
        assert_eq!(dict.len(), 2);
    }

    #[test]
    fn code_and_header_costs() {
        assert_eq!(code_len(0), 2);
        assert_eq!(code_len(126), 2);
        assert_eq!(code_len(127), 3);
        assert_eq!(header_cost(6), 8);
        assert_eq!(header_cost(200), 203);
    }
}
