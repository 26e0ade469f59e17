//! Filename sanitization
//!
//! Turns arbitrary metadata text into a legal file name or directory name:
//! 1. LaTeX commands are reduced to their content (`\emph{x}` -> `x`)
//! 2. Bare commands and leftover braces are removed
//! 3. Every illegal character is replaced one-for-one with `_`

use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;

/// Longest file name most filesystems accept, in bytes
pub const MAX_FILE_NAME_LENGTH: usize = 255;

const REPLACEMENT: char = '_';

/// `\command{content}` where content holds no braces, so nested forms
/// reduce from the innermost match outward
static BRACED_COMMAND: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\\[a-zA-Z]+\{([^{}]*)\}").expect("braced command pattern is valid"));

static BARE_COMMAND: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\\[a-zA-Z]+").expect("bare command pattern is valid"));

/// Decides which characters may appear unescaped in a file name
pub trait LegalChars {
    fn is_legal(&self, c: char) -> bool;
}

impl<F> LegalChars for F
where
    F: Fn(char) -> bool,
{
    fn is_legal(&self, c: char) -> bool {
        self(c)
    }
}

/// Characters rejected by at least one common filesystem
///
/// Path separators are legal here; [`FileNameCleaner::clean_file_name`]
/// rejects them on its own.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultLegalChars;

impl LegalChars for DefaultLegalChars {
    fn is_legal(&self, c: char) -> bool {
        !(c < '\u{20}' || matches!(c, '"' | '*' | ':' | '<' | '>' | '?' | '|' | '{' | '}'))
    }
}

/// Sanitizer parameterized by a legal-character predicate
#[derive(Debug, Clone, Default)]
pub struct FileNameCleaner<P = DefaultLegalChars> {
    legal: P,
}

impl<P: LegalChars> FileNameCleaner<P> {
    /// Create a cleaner with a custom predicate
    pub fn new(legal: P) -> Self {
        Self { legal }
    }

    /// Clean a single file name: illegal characters and both separators become `_`
    pub fn clean_file_name<'a>(&self, raw: impl Into<Option<&'a str>>) -> String {
        self.clean(raw.into(), |c| c != '/' && c != '\\')
    }

    /// Clean a directory name: like [`Self::clean_file_name`] but `/` and `\` survive
    pub fn clean_directory_name<'a>(&self, raw: impl Into<Option<&'a str>>) -> String {
        self.clean(raw.into(), |_| true)
    }

    fn clean(&self, raw: Option<&str>, keep: impl Fn(char) -> bool) -> String {
        let Some(raw) = raw else {
            return String::new();
        };

        let stripped = strip_latex_commands(raw);
        let cleaned: String = stripped
            .chars()
            .map(|c| {
                if self.legal.is_legal(c) && keep(c) {
                    c
                } else {
                    REPLACEMENT
                }
            })
            .collect();

        cleaned.trim().to_string()
    }
}

/// Remove LaTeX markup, keeping the text inside braced commands
///
/// `\textbf{\emph{Nested} content}` becomes `Nested content`, and
/// `\LaTeX text` becomes `text`.
pub fn strip_latex_commands(raw: &str) -> String {
    let mut text = raw.to_string();

    // Each replacement shrinks the text, so this reaches a fixpoint
    loop {
        match BRACED_COMMAND.replace_all(&text, "$1") {
            Cow::Borrowed(_) => break,
            Cow::Owned(reduced) => text = reduced,
        }
    }

    let text = BARE_COMMAND.replace_all(&text, "");
    let text: String = text.chars().filter(|c| !matches!(c, '{' | '}')).collect();
    text.trim().to_string()
}

/// Clean a file name with the default legal-character set
pub fn clean_file_name<'a>(raw: impl Into<Option<&'a str>>) -> String {
    FileNameCleaner::<DefaultLegalChars>::default().clean_file_name(raw)
}

/// Clean a directory name with the default legal-character set
pub fn clean_directory_name<'a>(raw: impl Into<Option<&'a str>>) -> String {
    FileNameCleaner::<DefaultLegalChars>::default().clean_directory_name(raw)
}

/// Cap a file name at [`MAX_FILE_NAME_LENGTH`] bytes, keeping its extension
pub fn valid_file_name(name: &str) -> String {
    if name.len() <= MAX_FILE_NAME_LENGTH {
        return name.to_string();
    }

    let (stem, extension) = match name.rfind('.') {
        Some(dot) if dot > 0 && name.len() - dot < MAX_FILE_NAME_LENGTH => name.split_at(dot),
        _ => (name, ""),
    };

    let budget = MAX_FILE_NAME_LENGTH - extension.len();
    format!("{}{}", truncate_to_boundary(stem, budget), extension)
}

fn truncate_to_boundary(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}
