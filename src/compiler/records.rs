//! Splitting a rules document into component records.
//!
//! A record starts at an opener line (`action draw`) and runs until the
//! next opener or the closer (`end-action`), so one block may hold many
//! records and a document may hold many blocks.

use crate::core::{CompileError, CompileResult};
use crate::document::RuleDocument;

/// One component's lines.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Record {
    /// Line index of the opener in the rules document.
    pub line: usize,
    /// Text after the opener keyword (the component name, possibly with
    /// modifiers such as `not`).
    pub header: String,
    pub body: Vec<String>,
}

pub(crate) fn split(doc: &RuleDocument, opener: &str, closer: &str) -> CompileResult<Vec<Record>> {
    let openers = doc.positions(opener);
    let mut records = Vec::with_capacity(openers.len());
    let mut closers_used = 0;

    for (i, &open) in openers.iter().enumerate() {
        let header = doc.check_params_at(open, opener)?.to_string();
        let close = doc.index_of_from(closer, open + 1);
        let next = openers.get(i + 1).copied();
        let end = match (next, close) {
            (Some(next), Some(close)) if next < close => next,
            (_, Some(close)) => {
                closers_used += 1;
                close
            }
            (_, None) => return Err(doc.missing_keyword(closer)),
        };
        let body = doc.divide(open + 1, end)?.lines().to_vec();
        records.push(Record {
            line: open,
            header,
            body,
        });
    }

    let closers = doc.count(closer);
    if closers != closers_used {
        return Err(CompileError::CountMismatch {
            document: doc.identity(),
            what: format!("`{}` lines", closer),
            expected: closers_used,
            actual: closers,
        });
    }
    Ok(records)
}

/// A record header `name` or `not name`, returning (name, negated).
pub(crate) fn negatable_header<'h>(
    doc: &RuleDocument,
    keyword: &str,
    header: &'h str,
) -> CompileResult<(&'h str, bool)> {
    let tokens: Vec<&str> = header.split_whitespace().collect();
    match tokens.as_slice() {
        [name] => Ok((*name, false)),
        ["not", name] => Ok((*name, true)),
        _ => Err(CompileError::InvalidParameter {
            document: doc.identity(),
            keyword: keyword.to_string(),
            value: header.to_string(),
        }),
    }
}

/// A record header that must be a single name.
pub(crate) fn plain_header<'h>(
    doc: &RuleDocument,
    keyword: &str,
    header: &'h str,
) -> CompileResult<&'h str> {
    match negatable_header(doc, keyword, header)? {
        (name, false) => Ok(name),
        (_, true) => Err(CompileError::InvalidParameter {
            document: doc.identity(),
            keyword: keyword.to_string(),
            value: header.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::DocumentKind;

    fn doc(text: &str) -> RuleDocument {
        RuleDocument::parse(DocumentKind::Rules, "t", text).unwrap()
    }

    #[test]
    fn test_records_share_a_block() {
        let doc = doc("
            action draw
            put-top pile.draw pile.hand
            take a card
            action pass
            end-turn
            end-action
            action play
            put pile.hand pile.discard card
            end-action
        ");
        let records = split(&doc, "action", "end-action").unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].header, "draw");
        assert_eq!(records[0].body.len(), 2);
        assert_eq!(records[1].body, vec!["end-turn"]);
        assert_eq!(records[2].header, "play");
    }

    #[test]
    fn test_unterminated_record() {
        let doc = doc("action draw\nput-top pile.draw pile.hand\n");
        assert!(matches!(
            split(&doc, "action", "end-action"),
            Err(CompileError::MissingKeyword { .. })
        ));
    }

    #[test]
    fn test_stray_closer() {
        let doc = doc("action a\nend-turn\nend-action\nend-action\n");
        assert!(matches!(
            split(&doc, "action", "end-action"),
            Err(CompileError::CountMismatch { expected: 1, actual: 2, .. })
        ));
    }

    #[test]
    fn test_missing_name() {
        let doc = doc("action\nend-turn\nend-action\n");
        assert!(matches!(
            split(&doc, "action", "end-action"),
            Err(CompileError::MissingParameter { .. })
        ));
    }

    #[test]
    fn test_headers() {
        let doc = doc("x");
        assert_eq!(negatable_header(&doc, "condition", "not empty").unwrap(), ("empty", true));
        assert_eq!(plain_header(&doc, "action", "draw").unwrap(), "draw");
        assert!(plain_header(&doc, "action", "two words").is_err());
    }
}
