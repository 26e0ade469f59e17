//! Canonical file name suggestion from record metadata

use crate::error::RenameError;
use crate::file::AttachedFile;
use crate::record::Record;
use crate::sanitize::{clean_file_name, valid_file_name};

/// Default pattern: `Knuth1984 - Literate Programming.pdf`
pub const DEFAULT_FILE_NAME_PATTERN: &str = "[citationkey] - [title]";

/// Computes the name a file attached to a record should carry
///
/// Implementations must read the record as given, never a cached copy, so
/// the suggestion reflects the key and fields at call time.
pub trait NameSuggester: Send + Sync {
    /// Full target file name, extension included
    fn suggest_file_name(&self, file: &AttachedFile, record: &Record) -> Result<String, RenameError>;
}

/// Bracket-pattern suggester
///
/// `[citationkey]` and `[entrytype]` expand to the record's key and type,
/// any other `[name]` to the field of that name. A token may carry a
/// `:lower` or `:upper` modifier. Missing values expand to nothing.
#[derive(Debug, Clone)]
pub struct PatternSuggester {
    pattern: String,
}

impl PatternSuggester {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
        }
    }

    /// Expand the pattern against a record, without cleaning
    pub fn expand(&self, record: &Record) -> String {
        let mut out = String::with_capacity(self.pattern.len());
        let mut rest = self.pattern.as_str();

        while let Some(open) = rest.find('[') {
            out.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            match after.find(']') {
                Some(close) => {
                    out.push_str(&expand_token(&after[..close], record));
                    rest = &after[close + 1..];
                }
                None => {
                    // Unterminated bracket is literal text
                    out.push_str(&rest[open..]);
                    rest = "";
                }
            }
        }
        out.push_str(rest);
        out
    }
}

impl Default for PatternSuggester {
    fn default() -> Self {
        Self::new(DEFAULT_FILE_NAME_PATTERN)
    }
}

impl NameSuggester for PatternSuggester {
    fn suggest_file_name(&self, file: &AttachedFile, record: &Record) -> Result<String, RenameError> {
        let expanded = self.expand(record);
        let base = clean_file_name(expanded.as_str());
        if base.is_empty() {
            return Err(RenameError::EmptySuggestion);
        }

        let name = match file.extension() {
            Some(ext) => format!("{}.{}", base, ext),
            None => base,
        };
        Ok(valid_file_name(&name))
    }
}

fn expand_token(token: &str, record: &Record) -> String {
    let (name, modifier) = match token.split_once(':') {
        Some((name, modifier)) => (name.trim(), Some(modifier.trim())),
        None => (token.trim(), None),
    };

    let value = match name.to_ascii_lowercase().as_str() {
        "citationkey" | "bibtexkey" => record.citation_key().unwrap_or_default().to_string(),
        "entrytype" => record.entry_type().to_string(),
        field => record.field(field).unwrap_or_default().to_string(),
    };

    match modifier {
        Some("lower") => value.to_lowercase(),
        Some("upper") => value.to_uppercase(),
        _ => value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn knuth() -> Record {
        Record::new("article")
            .with_citation_key("Knuth1984")
            .with_field("title", r"Literate \emph{Programming}")
            .with_field("year", "1984")
    }

    #[test]
    fn test_default_pattern() {
        let suggester = PatternSuggester::default();
        let name = suggester
            .suggest_file_name(&AttachedFile::local("papers/old.pdf"), &knuth())
            .unwrap();
        assert_eq!(name, "Knuth1984 - Literate Programming.pdf");
    }

    #[test]
    fn test_modifiers_and_entry_type() {
        let suggester = PatternSuggester::new("[entrytype:upper]_[citationkey:lower]_[year]");
        assert_eq!(suggester.expand(&knuth()), "ARTICLE_knuth1984_1984");
    }

    #[test]
    fn test_missing_values_expand_to_nothing() {
        let suggester = PatternSuggester::new("[citationkey]-[journal]");
        assert_eq!(suggester.expand(&knuth()), "Knuth1984-");
    }

    #[test]
    fn test_unterminated_bracket_is_literal() {
        let suggester = PatternSuggester::new("[citationkey] [oops");
        assert_eq!(suggester.expand(&knuth()), "Knuth1984 [oops");
    }

    #[test]
    fn test_empty_expansion_is_an_error() {
        let suggester = PatternSuggester::new("[journal]");
        let result = suggester.suggest_file_name(&AttachedFile::local("a.pdf"), &knuth());
        assert!(matches!(result, Err(RenameError::EmptySuggestion)));
    }

    #[test]
    fn test_illegal_characters_are_cleaned() {
        let record = Record::new("article")
            .with_citation_key("Doe2020")
            .with_field("title", "What? A/B: testing");
        let name = PatternSuggester::default()
            .suggest_file_name(&AttachedFile::local("x.pdf"), &record)
            .unwrap();
        assert_eq!(name, "Doe2020 - What_ A_B_ testing.pdf");
    }

    #[test]
    fn test_suggestion_reads_current_fields() {
        let suggester = PatternSuggester::new("[citationkey]");
        let file = AttachedFile::local("a.pdf");
        let mut record = knuth();
        assert_eq!(suggester.suggest_file_name(&file, &record).unwrap(), "Knuth1984.pdf");

        record.set_citation_key(Some("Knuth1992".to_string()));
        assert_eq!(suggester.suggest_file_name(&file, &record).unwrap(), "Knuth1992.pdf");
    }
}
