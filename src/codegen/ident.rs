//! Identifier Derivation
//!
//! Turns document keys into Rust identifiers. Keys are split into words on
//! runs of non-alphanumeric characters and on camel-case humps, so
//! `"Feature-A"`, `"Feature_A"` and `"featureA"` all become the words
//! `feature a`.

use std::sync::LazyLock;

use regex::Regex;

static WORD_SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9]+").expect("separator pattern is valid"));

static RUST_PATH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*(::[A-Za-z_][A-Za-z0-9_]*)*$")
        .expect("path pattern is valid")
});

const KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "crate",
    "do", "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if", "impl", "in",
    "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref",
    "return", "self", "Self", "static", "struct", "super", "trait", "true", "try", "type", "typeof",
    "unsafe", "unsized", "use", "virtual", "where", "while", "yield",
];

/// A key split into lowercase words
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identifier {
    words: Vec<String>,
}

impl Identifier {
    /// Derive an identifier from a key; `None` if the key has no
    /// alphanumeric characters at all
    pub fn derive(key: &str) -> Option<Self> {
        let words: Vec<String> = WORD_SEPARATORS
            .split(key)
            .flat_map(split_humps)
            .map(|word| word.to_ascii_lowercase())
            .collect();

        if words.is_empty() {
            None
        } else {
            Some(Self { words })
        }
    }

    /// `feature_a`
    pub fn snake_case(&self) -> String {
        guard_leading_digit(self.words.join("_"))
    }

    /// `FEATURE_A`
    pub fn screaming_case(&self) -> String {
        self.snake_case().to_ascii_uppercase()
    }

    /// `FeatureA`
    pub fn camel_case(&self) -> String {
        let joined: String = self.words.iter().map(|word| capitalize(word)).collect();
        guard_leading_digit(joined)
    }
}

/// Split one alphanumeric run at camel-case boundaries
fn split_humps(run: &str) -> Vec<&str> {
    let chars: Vec<(usize, char)> = run.char_indices().collect();
    let mut words = Vec::new();
    let mut start = 0;

    for i in 1..chars.len() {
        let (index, current) = chars[i];
        let previous = chars[i - 1].1;
        let next_is_lower = chars.get(i + 1).is_some_and(|(_, c)| c.is_ascii_lowercase());

        let boundary = current.is_ascii_uppercase()
            && (previous.is_ascii_lowercase()
                || previous.is_ascii_digit()
                || (previous.is_ascii_uppercase() && next_is_lower));
        if boundary {
            words.push(&run[start..index]);
            start = index;
        }
    }

    if start < run.len() {
        words.push(&run[start..]);
    }
    words
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

fn guard_leading_digit(ident: String) -> String {
    if ident.starts_with(|c: char| c.is_ascii_digit()) {
        format!("_{}", ident)
    } else {
        ident
    }
}

pub fn is_keyword(ident: &str) -> bool {
    KEYWORDS.contains(&ident)
}

/// Keyword-safe form of a lowercase item name
pub fn escape_keyword(ident: String) -> String {
    if is_keyword(&ident) {
        format!("{}_", ident)
    } else {
        ident
    }
}

/// Whether `ident` can be used verbatim as a type name
pub fn is_type_name(ident: &str) -> bool {
    !ident.contains("::") && RUST_PATH.is_match(ident) && ident != "_" && !is_keyword(ident)
}

/// Whether `path` is a `::`-separated module path
pub fn is_module_path(path: &str) -> bool {
    const PATH_KEYWORDS: [&str; 3] = ["crate", "self", "super"];

    RUST_PATH.is_match(path)
        && path.split("::").all(|segment| {
            segment != "_" && (!is_keyword(segment) || PATH_KEYWORDS.contains(&segment))
        })
}
