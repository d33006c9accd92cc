//! Normalized, keyword-searchable view of one rule file.
//!
//! A `RuleDocument` is built once from raw text and never changes:
//! comments (`#` to end of line, outside `"quoted"` text) and blank
//! lines are dropped, every line is trimmed and, except for `brief`
//! documents, lowercased. A line "has" a keyword when its first
//! whitespace-separated token equals it, so `action` never matches
//! `end-action` or `controlled-action`.

use serde::{Deserialize, Serialize};

use crate::core::{CompileError, CompileResult};

/// Which kind of rule file a document came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentKind {
    Rules,
    Board,
    Deck,
    /// Free-text game description, case preserved.
    Brief,
}

impl DocumentKind {
    /// File-name prefix for this kind.
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            DocumentKind::Rules => "rules",
            DocumentKind::Board => "board",
            DocumentKind::Deck => "deck",
            DocumentKind::Brief => "brief",
        }
    }

    #[must_use]
    pub fn from_keyword(word: &str) -> Option<Self> {
        match word.to_ascii_lowercase().as_str() {
            "rules" => Some(DocumentKind::Rules),
            "board" => Some(DocumentKind::Board),
            "deck" => Some(DocumentKind::Deck),
            "brief" => Some(DocumentKind::Brief),
            _ => None,
        }
    }

    /// Split a `<kind>.<name>.txt` file name.
    ///
    /// ```
    /// use card_referee::document::DocumentKind;
    ///
    /// assert_eq!(
    ///     DocumentKind::from_file_name("deck.standard.txt"),
    ///     Some((DocumentKind::Deck, "standard".to_string()))
    /// );
    /// assert_eq!(DocumentKind::from_file_name("notes.txt"), None);
    /// ```
    #[must_use]
    pub fn from_file_name(file_name: &str) -> Option<(Self, String)> {
        let stem = file_name.strip_suffix(".txt")?;
        let (kind, name) = stem.split_once('.')?;
        if name.is_empty() {
            return None;
        }
        Some((Self::from_keyword(kind)?, name.to_ascii_lowercase()))
    }

    /// Whether text of this kind is lowercased during normalization.
    #[must_use]
    pub const fn case_insensitive(self) -> bool {
        !matches!(self, DocumentKind::Brief)
    }
}

impl std::fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Relative presence and order of two keywords in a document.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeywordOrder {
    Neither,
    OnlyFirst,
    OnlySecond,
    FirstBeforeSecond,
    SecondBeforeFirst,
    /// Both found on the same line (only when the keywords are equal).
    Same,
}

/// Immutable, normalized line sequence of one rule file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuleDocument {
    kind: DocumentKind,
    name: String,
    lines: Vec<String>,
}

/// First whitespace-separated token of a line.
fn first_token(line: &str) -> &str {
    line.split_whitespace().next().unwrap_or("")
}

impl RuleDocument {
    /// Normalize raw text into a document.
    ///
    /// Fails with `MissingKeyword` if nothing but comments and blank
    /// lines remain.
    pub fn parse(kind: DocumentKind, name: impl Into<String>, text: &str) -> CompileResult<Self> {
        let name = name.into();
        let lines = Self::normalize(text, kind.case_insensitive());
        if lines.is_empty() {
            return Err(CompileError::MissingKeyword {
                document: format!("{}.{}", kind, name),
                keyword: "<any directive>".to_string(),
            });
        }
        Ok(Self { kind, name, lines })
    }

    fn normalize(text: &str, lowercase: bool) -> Vec<String> {
        text.lines()
            .map(strip_comment)
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| {
                if lowercase {
                    line.to_lowercase()
                } else {
                    line.to_string()
                }
            })
            .collect()
    }

    #[must_use]
    pub fn kind(&self) -> DocumentKind {
        self.kind
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// `<kind>.<name>`, used in error messages.
    #[must_use]
    pub fn identity(&self) -> String {
        format!("{}.{}", self.kind, self.name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Only sub-documents produced by `divide` can be empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    #[must_use]
    pub fn line(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(String::as_str)
    }

    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Does the line at `index` start with `keyword`?
    #[must_use]
    pub fn line_has(&self, index: usize, keyword: &str) -> bool {
        self.line(index).is_some_and(|line| first_token(line) == keyword)
    }

    /// Index of the first line starting with `keyword`.
    #[must_use]
    pub fn index_of(&self, keyword: &str) -> Option<usize> {
        self.index_of_from(keyword, 0)
    }

    /// Index of the first line at or after `from` starting with `keyword`.
    #[must_use]
    pub fn index_of_from(&self, keyword: &str, from: usize) -> Option<usize> {
        (from..self.lines.len()).find(|&i| self.line_has(i, keyword))
    }

    pub fn check_index_of(&self, keyword: &str) -> CompileResult<usize> {
        self.check_index_of_from(keyword, 0)
    }

    pub fn check_index_of_from(&self, keyword: &str, from: usize) -> CompileResult<usize> {
        self.index_of_from(keyword, from)
            .ok_or_else(|| self.missing_keyword(keyword))
    }

    /// Every line index starting with `keyword`, in order.
    #[must_use]
    pub fn positions(&self, keyword: &str) -> Vec<usize> {
        (0..self.lines.len())
            .filter(|&i| self.line_has(i, keyword))
            .collect()
    }

    #[must_use]
    pub fn count(&self, keyword: &str) -> usize {
        self.positions(keyword).len()
    }

    /// Text after the first token of the line at `index`.
    #[must_use]
    pub fn params_at(&self, index: usize) -> &str {
        let Some(line) = self.line(index) else {
            return "";
        };
        let head = first_token(line);
        match line.find(head) {
            Some(at) => line[at + head.len()..].trim(),
            None => "",
        }
    }

    /// Parameters of the first line starting with `keyword`.
    ///
    /// `None` if the keyword is absent; `Some("")` if it has no parameters.
    #[must_use]
    pub fn params_for(&self, keyword: &str) -> Option<&str> {
        self.index_of(keyword).map(|i| self.params_at(i))
    }

    /// Like `params_for`, but a missing keyword or empty parameters fail.
    pub fn check_params_for(&self, keyword: &str) -> CompileResult<&str> {
        let index = self.check_index_of(keyword)?;
        self.check_params_at(index, keyword)
    }

    /// Parameters at a known line; fails `MissingParameter` if empty.
    pub fn check_params_at(&self, index: usize, keyword: &str) -> CompileResult<&str> {
        let params = self.params_at(index);
        if params.is_empty() {
            return Err(CompileError::MissingParameter {
                document: self.identity(),
                keyword: keyword.to_string(),
                line: index,
            });
        }
        Ok(params)
    }

    /// Independent sub-document of lines `start..end`.
    pub fn divide(&self, start: usize, end: usize) -> CompileResult<RuleDocument> {
        if start > end || end > self.lines.len() {
            return Err(CompileError::InvalidParameter {
                document: self.identity(),
                keyword: "<range>".to_string(),
                value: format!("{}..{}", start, end),
            });
        }
        Ok(RuleDocument {
            kind: self.kind,
            name: self.name.clone(),
            lines: self.lines[start..end].to_vec(),
        })
    }

    /// Lines strictly between the first `start` keyword and the next
    /// `end` keyword after it.
    pub fn divide_between(&self, start: &str, end: &str) -> CompileResult<RuleDocument> {
        self.divide_between_from(start, end, 0).map(|(doc, _)| doc)
    }

    /// Like `divide_between`, searching from line `from`.
    ///
    /// Also returns the index of the closing `end` line so callers can
    /// walk repeated blocks.
    pub fn divide_between_from(
        &self,
        start: &str,
        end: &str,
        from: usize,
    ) -> CompileResult<(RuleDocument, usize)> {
        let open = self.check_index_of_from(start, from)?;
        let close = self.check_index_of_from(end, open + 1)?;
        Ok((self.divide(open + 1, close)?, close))
    }

    /// Classify relative presence and order of two keywords.
    #[must_use]
    pub fn compare(&self, first: &str, second: &str) -> KeywordOrder {
        match (self.index_of(first), self.index_of(second)) {
            (None, None) => KeywordOrder::Neither,
            (Some(_), None) => KeywordOrder::OnlyFirst,
            (None, Some(_)) => KeywordOrder::OnlySecond,
            (Some(a), Some(b)) if a < b => KeywordOrder::FirstBeforeSecond,
            (Some(a), Some(b)) if a > b => KeywordOrder::SecondBeforeFirst,
            _ => KeywordOrder::Same,
        }
    }

    pub(crate) fn missing_keyword(&self, keyword: &str) -> CompileError {
        CompileError::MissingKeyword {
            document: self.identity(),
            keyword: keyword.to_string(),
        }
    }
}

/// Cut `line` at the first `#` that is not inside double quotes.
fn strip_comment(line: &str) -> &str {
    let mut quoted = false;
    for (at, ch) in line.char_indices() {
        match ch {
            '"' => quoted = !quoted,
            '#' if !quoted => return &line[..at],
            _ => {}
        }
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "
        # a deal block
        Deal
          Shuffle 2   # twice
        deal-end

        player-piles hand 5
        action draw
        end-action
    ";

    fn sample() -> RuleDocument {
        RuleDocument::parse(DocumentKind::Rules, "sample", SAMPLE).unwrap()
    }

    #[test]
    fn test_normalize_strips_comments_and_case() {
        let doc = sample();
        assert_eq!(
            doc.lines(),
            &["deal", "shuffle 2", "deal-end", "player-piles hand 5", "action draw", "end-action"]
        );
    }

    #[test]
    fn test_hash_inside_quotes_is_kept() {
        let doc = RuleDocument::parse(
            DocumentKind::Rules,
            "quotes",
            "action shout # loud\nsay \"card #1\" now # note\n",
        )
        .unwrap();
        assert_eq!(doc.lines(), &["action shout", "say \"card #1\" now"]);
    }

    #[test]
    fn test_brief_keeps_case() {
        let doc = RuleDocument::parse(DocumentKind::Brief, "x", "Play Nice\n").unwrap();
        assert_eq!(doc.line(0), Some("Play Nice"));
    }

    #[test]
    fn test_empty_document_fails() {
        let err = RuleDocument::parse(DocumentKind::Deck, "empty", "# nothing\n\n").unwrap_err();
        assert!(matches!(err, CompileError::MissingKeyword { .. }));
    }

    #[test]
    fn test_index_of_matches_whole_first_token() {
        let doc = sample();
        assert_eq!(doc.index_of("deal"), Some(0));
        assert_eq!(doc.index_of("action"), Some(4));
        assert_eq!(doc.index_of("end"), None);
        assert_eq!(doc.index_of_from("deal", 1), None);
        assert_eq!(doc.count("action"), 1);
    }

    #[test]
    fn test_check_index_of_reports_keyword() {
        let err = sample().check_index_of("phase").unwrap_err();
        match err {
            CompileError::MissingKeyword { document, keyword } => {
                assert_eq!(document, "rules.sample");
                assert_eq!(keyword, "phase");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_params() {
        let doc = sample();
        assert_eq!(doc.params_for("player-piles"), Some("hand 5"));
        assert_eq!(doc.params_for("deal"), Some(""));
        assert_eq!(doc.params_for("phase"), None);
        assert!(matches!(
            doc.check_params_for("deal"),
            Err(CompileError::MissingParameter { line: 0, .. })
        ));
        assert_eq!(doc.check_params_for("shuffle").unwrap(), "2");
    }

    #[test]
    fn test_divide_between() {
        let doc = sample();
        let deal = doc.divide_between("deal", "deal-end").unwrap();
        assert_eq!(deal.lines(), &["shuffle 2"]);
        assert_eq!(deal.identity(), "rules.sample");

        let (empty, close) = doc.divide_between_from("action", "end-action", 0).unwrap();
        assert!(empty.is_empty());
        assert_eq!(close, 5);
    }

    #[test]
    fn test_divide_rejects_bad_range() {
        let doc = sample();
        assert!(doc.divide(3, 2).is_err());
        assert!(doc.divide(0, 99).is_err());
        assert_eq!(doc.divide(1, 3).unwrap().len(), 2);
    }

    #[test]
    fn test_compare() {
        let doc = sample();
        assert_eq!(doc.compare("deal", "action"), KeywordOrder::FirstBeforeSecond);
        assert_eq!(doc.compare("action", "deal"), KeywordOrder::SecondBeforeFirst);
        assert_eq!(doc.compare("deal", "phase"), KeywordOrder::OnlyFirst);
        assert_eq!(doc.compare("phase", "deal"), KeywordOrder::OnlySecond);
        assert_eq!(doc.compare("phase", "allow"), KeywordOrder::Neither);
        assert_eq!(doc.compare("deal", "deal"), KeywordOrder::Same);
    }
}
