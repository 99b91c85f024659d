/// Default minimum number of repeated substitutable spans before a dictionary
/// is attempted.
pub const DEFAULT_MIN_REPEATED_SPANS: usize = 4;

/// Default cap on dictionary entries per stream.
pub const DEFAULT_MAX_ENTRIES: usize = 4096;

/// Tuning knobs for dictionary construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Inputs with fewer repeated Identifier/Keyword/Whitespace span
    /// occurrences than this are stored as passthrough.
    pub min_repeated_spans: usize,
    /// Upper bound on entries kept in one dictionary.
    pub max_entries: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            min_repeated_spans: DEFAULT_MIN_REPEATED_SPANS,
            max_entries: DEFAULT_MAX_ENTRIES,
        }
    }
}

impl EngineConfig {
    pub fn with_min_repeated_spans(mut self, n: usize) -> Self {
        self.min_repeated_spans = n;
        self
    }

    pub fn with_max_entries(mut self, n: usize) -> Self {
        self.max_entries = n;
        self
    }
}
