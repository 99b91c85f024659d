use std::path::Path;

/// Immutable lexical configuration for one source language.
///
/// Profiles only steer classification in the scanner. Compressed streams do
/// not record which profile produced them, and decoding never needs one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LanguageProfile {
    pub name: &'static str,
    /// Sorted keyword table, searched with binary search.
    pub keywords: &'static [&'static str],
    pub line_comment: Option<&'static [u8]>,
    pub block_comment: Option<(&'static [u8], &'static [u8])>,
    /// Bytes that open (and close) a string literal with backslash escapes.
    pub string_quotes: &'static [u8],
    /// Bytes that open (and close) a raw string, where backslash is literal.
    pub raw_quotes: &'static [u8],
    /// Byte that delimits a character literal, if the language has them.
    pub char_quote: Option<u8>,
}

impl LanguageProfile {
    pub const C: LanguageProfile = LanguageProfile {
        name: "c",
        keywords: &[
            "auto", "break", "case", "char", "const", "continue", "default", "define", "do",
            "double", "else", "endif", "enum", "extern", "float", "for", "goto", "if", "ifdef",
            "ifndef", "include", "inline", "int", "long", "register", "restrict", "return",
            "short", "signed", "sizeof", "static", "struct", "switch", "typedef", "union",
            "unsigned", "void", "volatile", "while",
        ],
        line_comment: Some(b"//"),
        block_comment: Some((b"/*", b"*/")),
        string_quotes: b"\"",
        raw_quotes: b"",
        char_quote: Some(b'\''),
    };

    pub const GO: LanguageProfile = LanguageProfile {
        name: "go",
        keywords: &[
            "bool", "break", "byte", "case", "chan", "const", "continue", "default", "defer",
            "else", "error", "fallthrough", "false", "float64", "for", "func", "go", "goto",
            "if", "import", "int", "interface", "map", "nil", "package", "range", "return",
            "select", "string", "struct", "switch", "true", "type", "var",
        ],
        line_comment: Some(b"//"),
        block_comment: Some((b"/*", b"*/")),
        string_quotes: b"\"",
        raw_quotes: b"`",
        char_quote: Some(b'\''),
    };

    pub const RUST: LanguageProfile = LanguageProfile {
        name: "rust",
        keywords: &[
            "as", "async", "await", "bool", "break", "const", "continue", "crate", "dyn",
            "else", "enum", "extern", "false", "fn", "for", "if", "impl", "in", "let", "loop",
            "match", "mod", "move", "mut", "pub", "ref", "return", "self", "static", "str",
            "struct", "super", "trait", "true", "type", "u8", "unsafe", "use", "usize",
            "where", "while",
        ],
        line_comment: Some(b"//"),
        block_comment: Some((b"/*", b"*/")),
        string_quotes: b"\"",
        raw_quotes: b"",
        char_quote: Some(b'\''),
    };

    pub const JAVA: LanguageProfile = LanguageProfile {
        name: "java",
        keywords: &[
            "abstract", "boolean", "break", "case", "catch", "char", "class", "continue",
            "default", "do", "double", "else", "enum", "extends", "final", "finally", "float",
            "for", "if", "implements", "import", "instanceof", "int", "interface", "long",
            "new", "null", "package", "private", "protected", "public", "return", "static",
            "super", "switch", "this", "throw", "throws", "try", "void", "while",
        ],
        line_comment: Some(b"//"),
        block_comment: Some((b"/*", b"*/")),
        string_quotes: b"\"",
        raw_quotes: b"",
        char_quote: Some(b'\''),
    };

    pub const JAVASCRIPT: LanguageProfile = LanguageProfile {
        name: "javascript",
        keywords: &[
            "async", "await", "break", "case", "catch", "class", "const", "continue",
            "default", "delete", "do", "else", "export", "extends", "false", "finally", "for",
            "from", "function", "if", "import", "in", "instanceof", "let", "new", "null",
            "return", "static", "super", "switch", "this", "throw", "true", "try", "typeof",
            "undefined", "var", "void", "while", "yield",
        ],
        line_comment: Some(b"//"),
        block_comment: Some((b"/*", b"*/")),
        string_quotes: b"\"'`",
        raw_quotes: b"",
        char_quote: None,
    };

    pub const PYTHON: LanguageProfile = LanguageProfile {
        name: "python",
        keywords: &[
            "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
            "continue", "def", "del", "elif", "else", "except", "finally", "for", "from",
            "global", "if", "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass",
            "raise", "return", "self", "try", "while", "with", "yield",
        ],
        line_comment: Some(b"#"),
        block_comment: None,
        string_quotes: b"\"'",
        raw_quotes: b"",
        char_quote: None,
    };

    pub const BASH: LanguageProfile = LanguageProfile {
        name: "bash",
        keywords: &[
            "case", "do", "done", "echo", "elif", "else", "esac", "export", "fi", "for",
            "function", "if", "in", "local", "return", "then", "until", "while",
        ],
        line_comment: Some(b"#"),
        block_comment: None,
        string_quotes: b"\"'",
        raw_quotes: b"",
        char_quote: None,
    };

    pub const CSS: LanguageProfile = LanguageProfile {
        name: "css",
        keywords: &[
            "auto", "background", "block", "bold", "border", "bottom", "color", "display",
            "flex", "font", "height", "important", "inherit", "left", "margin", "media",
            "none", "padding", "position", "relative", "right", "solid", "top", "width",
        ],
        line_comment: None,
        block_comment: Some((b"/*", b"*/")),
        string_quotes: b"\"'",
        raw_quotes: b"",
        char_quote: None,
    };

    pub const HTML: LanguageProfile = LanguageProfile {
        name: "html",
        keywords: &[
            "a", "body", "br", "button", "class", "div", "form", "head", "href", "html", "id",
            "img", "input", "li", "link", "meta", "p", "script", "span", "src", "style",
            "table", "td", "title", "tr", "type", "ul",
        ],
        line_comment: None,
        block_comment: Some((b"<!--", b"-->")),
        string_quotes: b"\"",
        raw_quotes: b"",
        char_quote: None,
    };

    pub const SWIFT: LanguageProfile = LanguageProfile {
        name: "swift",
        keywords: &[
            "Any", "Bool", "Int", "Self", "String", "as", "break", "case", "catch", "class",
            "continue", "default", "defer", "do", "else", "enum", "extension", "false", "for",
            "func", "guard", "if", "import", "in", "init", "internal", "let", "nil",
            "private", "protocol", "public", "return", "self", "static", "struct", "switch",
            "throw", "throws", "true", "try", "var", "where", "while",
        ],
        line_comment: Some(b"//"),
        block_comment: Some((b"/*", b"*/")),
        string_quotes: b"\"",
        raw_quotes: b"",
        char_quote: None,
    };

    pub const ALL: [LanguageProfile; 10] = [
        Self::C,
        Self::GO,
        Self::RUST,
        Self::JAVA,
        Self::JAVASCRIPT,
        Self::PYTHON,
        Self::BASH,
        Self::CSS,
        Self::HTML,
        Self::SWIFT,
    ];

    /// Look a profile up by name, case-insensitively.
    pub fn by_name(name: &str) -> anyhow::Result<Self> {
        let lower = name.to_ascii_lowercase();
        let wanted = match lower.as_str() {
            "js" | "ts" | "typescript" => "javascript",
            "py" => "python",
            "rs" => "rust",
            "sh" => "bash",
            "htm" => "html",
            other => other,
        };
        Self::ALL
            .into_iter()
            .find(|p| p.name == wanted)
            .ok_or_else(|| anyhow::anyhow!("unsupported language: {}", name))
    }

    #[inline]
    pub fn is_keyword(&self, word: &[u8]) -> bool {
        self.keywords
            .binary_search_by(|k| k.as_bytes().cmp(word))
            .is_ok()
    }
}

impl Default for LanguageProfile {
    fn default() -> Self {
        Self::C
    }
}

/// Pick a profile from a file's extension.
pub fn identify_language(path: impl AsRef<Path>) -> anyhow::Result<LanguageProfile> {
    let path = path.as_ref();
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    let profile = match ext.as_str() {
        "c" | "h" => LanguageProfile::C,
        "go" => LanguageProfile::GO,
        "rs" => LanguageProfile::RUST,
        "java" => LanguageProfile::JAVA,
        "js" | "jsx" | "mjs" | "cjs" | "ts" | "tsx" => LanguageProfile::JAVASCRIPT,
        "py" => LanguageProfile::PYTHON,
        "sh" | "bash" => LanguageProfile::BASH,
        "css" => LanguageProfile::CSS,
        "html" | "htm" => LanguageProfile::HTML,
        "swift" => LanguageProfile::SWIFT,
        _ => anyhow::bail!("unsupported file extension: {:?} ({})", ext, path.display()),
    };
    Ok(profile)
}
