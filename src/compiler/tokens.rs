//! Line tokenization and parameter classification.
//!
//! | token                  | compiles to                      |
//! |------------------------|----------------------------------|
//! | `card`, `pile`, ...    | `ParamToken::Placeholder`        |
//! | `player.next`          | `ParamToken::Player`             |
//! | `pile.hand@next`       | `ParamToken::Pile`               |
//! | `piles.hand`           | `ParamToken::Piles`              |
//! | `top.draw`             | `ParamToken::Top`                |
//! | `bottom.draw`          | `ParamToken::Bottom`             |
//! | `cards.hand`           | `ParamToken::Contents`           |
//! | `phase.main`           | `ParamToken::Phase`              |
//! | `-3`                   | `ParamToken::Integer`            |
//! | `"some text"`          | `ParamToken::Text`               |

use crate::components::{OwnerRef, ParamToken, ParamTokens, PileSelector, PlayerRef};
use crate::core::{CompileError, CompileResult};
use crate::operations::{Operation, ParamKind};

use super::scope::Scope;

/// Split on whitespace, keeping `"quoted text"` together.
pub(crate) fn split_line(line: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    for ch in line.chars() {
        match ch {
            '"' => {
                current.push(ch);
                quoted = !quoted;
            }
            c if c.is_whitespace() && !quoted => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            c => current.push(c),
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

/// Replace alias names by their replacement tokens (one level).
pub(crate) fn expand_aliases(scope: &Scope<'_>, tokens: Vec<String>) -> Vec<String> {
    if scope.aliases.is_empty() {
        return tokens;
    }
    tokens
        .into_iter()
        .flat_map(|token| match scope.aliases.get(&token) {
            Some(replacement) => replacement.clone(),
            None => vec![token],
        })
        .collect()
}

fn invalid(scope: &Scope<'_>, expected: &str, token: &str) -> CompileError {
    CompileError::InvalidTypeReference {
        document: scope.document.clone(),
        expected: expected.to_string(),
        name: token.to_string(),
    }
}

fn pile_selector(
    scope: &Scope<'_>,
    component: &str,
    token: &str,
    rest: &str,
) -> CompileResult<PileSelector> {
    let (name, owner) = match rest.split_once('@') {
        None => (rest, OwnerRef::Current),
        Some((name, "current")) => (name, OwnerRef::Current),
        Some((name, "next")) => (name, OwnerRef::Next),
        Some((name, "previous")) => (name, OwnerRef::Previous),
        Some(_) => return Err(invalid(scope, "pile owner (current, next, previous)", token)),
    };
    let slot = scope
        .layout
        .slot(name)
        .ok_or_else(|| CompileError::UnresolvedReference {
            kind: "cardpile",
            name: name.to_string(),
            referenced_by: component.to_string(),
        })?;
    Ok(PileSelector { slot, owner })
}

/// Classify one parameter token.
pub(crate) fn classify(scope: &Scope<'_>, component: &str, token: &str) -> CompileResult<ParamToken> {
    if let Some(text) = token
        .strip_prefix('"')
        .and_then(|t| t.strip_suffix('"'))
    {
        return Ok(ParamToken::Text(text.to_string()));
    }
    if let Ok(n) = token.parse::<i64>() {
        return Ok(ParamToken::Integer(n));
    }
    if let Some(kind) = ParamKind::from_keyword(token) {
        return Ok(ParamToken::Placeholder(kind));
    }
    let Some((prefix, rest)) = token.split_once('.') else {
        return Err(invalid(scope, "parameter", token));
    };
    match prefix {
        "player" => {
            let player = match rest {
                "current" => PlayerRef::Current,
                "next" => PlayerRef::Next,
                "previous" => PlayerRef::Previous,
                "first" => PlayerRef::First,
                _ => return Err(invalid(scope, "player reference", token)),
            };
            Ok(ParamToken::Player(player))
        }
        "pile" => pile_selector(scope, component, token, rest).map(ParamToken::Pile),
        "top" => pile_selector(scope, component, token, rest).map(ParamToken::Top),
        "bottom" => pile_selector(scope, component, token, rest).map(ParamToken::Bottom),
        "cards" => pile_selector(scope, component, token, rest).map(ParamToken::Contents),
        "piles" => {
            if rest.contains('@') {
                return Err(invalid(scope, "pile declaration", token));
            }
            pile_selector(scope, component, token, rest).map(|sel| ParamToken::Piles(sel.slot))
        }
        "phase" => scope.phase(rest, component).map(ParamToken::Phase),
        _ => Err(invalid(scope, "parameter", token)),
    }
}

/// Classify tokens without a signature (condition override lists).
pub(crate) fn classify_all(
    scope: &Scope<'_>,
    component: &str,
    tokens: &[String],
) -> CompileResult<ParamTokens> {
    tokens
        .iter()
        .map(|token| classify(scope, component, token))
        .collect()
}

/// Classify the parameters of `op`, checking arity and kinds.
pub(crate) fn parse_params(
    scope: &Scope<'_>,
    component: &str,
    op: Operation,
    tokens: &[String],
) -> CompileResult<ParamTokens> {
    let signature = op.signature();
    if !signature.accepts(tokens.len()) {
        return Err(CompileError::InvalidNumberOfParameters {
            component: component.to_string(),
            operation: op.keyword().to_string(),
            expected: signature.arity(),
            actual: tokens.len(),
        });
    }
    let mut params = ParamTokens::new();
    for (i, text) in tokens.iter().enumerate() {
        let token = classify(scope, component, text)?;
        let expected = signature
            .kind_at(i)
            .ok_or_else(|| invalid(scope, "parameter", text))?;
        if !token.kind().satisfies(expected) {
            return Err(invalid(
                scope,
                &format!("{} parameter of `{}`", expected, op),
                text,
            ));
        }
        params.push(token);
    }
    Ok(params)
}
