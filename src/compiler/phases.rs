//! Phase bodies.
//!
//! ```text
//! phase play
//! do refill                  # start action
//! allow
//! allow play-card then announce
//! not draw-empty draw-card
//! end-allow
//! do check-win               # end action
//! end-phase
//! ```
//!
//! `do` lines before the allow block are start actions, after it end
//! actions. Without an allow block every `do` line is a start action.

use crate::components::{Performable, Phase};
use crate::core::{CompileError, CompileResult};

use super::scope::Scope;
use super::statements::parse_allowed;
use super::tokens::{expand_aliases, split_line};

fn invalid(phase: &str, reason: String) -> CompileError {
    CompileError::InvalidComponent {
        kind: "phase",
        component: phase.to_string(),
        reason,
    }
}

fn parse_do(scope: &Scope<'_>, phase: &str, line: &str) -> CompileResult<Performable> {
    let tokens = expand_aliases(scope, split_line(line));
    match tokens.as_slice() {
        [keyword, name] if keyword == "do" => scope.performable(name, phase),
        _ => Err(invalid(
            phase,
            format!("expected `do <action>`, found `{}`", line),
        )),
    }
}

pub(crate) fn compile_phase(scope: &Scope<'_>, name: &str, body: &[String]) -> CompileResult<Phase> {
    let open = body.iter().position(|line| line == "allow");
    let close = body.iter().position(|line| line == "end-allow");
    let (open, close) = match (open, close) {
        (Some(open), Some(close)) if open < close => (Some(open), close),
        (None, None) => (None, body.len()),
        (Some(_), None) => {
            return Err(CompileError::MissingKeyword {
                document: format!("{} phase `{}`", scope.document, name),
                keyword: "end-allow".to_string(),
            })
        }
        _ => return Err(invalid(name, "`end-allow` without `allow`".to_string())),
    };

    let mut phase = Phase {
        name: name.to_string(),
        start: Vec::new(),
        allowed: Vec::new(),
        end: Vec::new(),
    };
    let Some(open) = open else {
        for line in body {
            phase.start.push(parse_do(scope, name, line)?);
        }
        return Ok(phase);
    };

    for line in &body[..open] {
        phase.start.push(parse_do(scope, name, line)?);
    }
    for line in &body[open + 1..close] {
        phase.allowed.push(parse_allowed(scope, name, line)?);
    }
    for line in &body[close + 1..] {
        phase.end.push(parse_do(scope, name, line)?);
    }
    Ok(phase)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::ActionId;
    use crate::document::{DocumentKind, RuleDocument};
    use crate::zones::BoardLayout;

    fn body(text: &str) -> Vec<String> {
        text.lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect()
    }

    fn with_scope(test: impl FnOnce(&Scope<'_>)) {
        let doc = RuleDocument::parse(DocumentKind::Board, "b", "cardpile discard\n").unwrap();
        let layout = BoardLayout::compile(&doc).unwrap();
        let mut scope = Scope::new("rules.t".to_string(), &layout);
        for (i, name) in ["refill", "play", "check", "announce"].iter().enumerate() {
            scope.actions.insert(name.to_string(), ActionId::new(i as u32));
        }
        test(&scope);
    }

    #[test]
    fn test_start_allowed_end() {
        with_scope(|scope| {
            let phase = compile_phase(
                scope,
                "main",
                &body("
                    do refill
                    allow
                    allow play then announce
                    end-allow
                    do check
                "),
            )
            .unwrap();
            assert_eq!(phase.start, vec![Performable::Action(ActionId::new(0))]);
            assert_eq!(phase.allowed.len(), 1);
            assert_eq!(phase.allowed[0].responses.len(), 1);
            assert_eq!(phase.end, vec![Performable::Action(ActionId::new(2))]);
        });
    }

    #[test]
    fn test_without_allow_block() {
        with_scope(|scope| {
            let phase = compile_phase(scope, "setup", &body("do refill\ndo check")).unwrap();
            assert_eq!(phase.start.len(), 2);
            assert!(phase.allowed.is_empty());
        });
    }

    #[test]
    fn test_errors() {
        with_scope(|scope| {
            assert!(matches!(
                compile_phase(scope, "p", &body("allow\nallow play")),
                Err(CompileError::MissingKeyword { .. })
            ));
            assert!(matches!(
                compile_phase(scope, "p", &body("refill")),
                Err(CompileError::InvalidComponent { .. })
            ));
            assert!(matches!(
                compile_phase(scope, "p", &body("do nothing")),
                Err(CompileError::UnresolvedReference { .. })
            ));
        });
    }
}
