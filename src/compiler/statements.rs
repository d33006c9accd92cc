//! Condition statements and control lines.
//!
//! Statement: `[not] <verb-or-condition> [params…] [and|or|xor]`.
//!
//! Control line (controlled actions): `allow <performable>` or
//! `[not] <condition> <true-performable> [<false-performable>]`.
//!
//! Allowed-action line (phases): the same prefixes, exactly one
//! performable, then optionally `then <response>…`.

use crate::components::{
    AllowedAction, ConditionRef, ConditionalStatement, Connective, Performable, Repeat,
    StatementTarget,
};
use crate::core::{CompileError, CompileResult};
use crate::operations::Operation;

use super::scope::Scope;
use super::tokens::{classify_all, expand_aliases, parse_params, split_line};

fn bad_statement(condition: &str, statement: &str, reason: &str) -> CompileError {
    CompileError::InvalidConditionalStatement {
        condition: condition.to_string(),
        statement: statement.to_string(),
        reason: reason.to_string(),
    }
}

/// Compile one statement line of `condition`.
pub(crate) fn parse_statement(
    scope: &Scope<'_>,
    condition: &str,
    line: &str,
) -> CompileResult<ConditionalStatement> {
    let mut tokens = expand_aliases(scope, split_line(line));
    let inverted = tokens.first().is_some_and(|t| t == "not");
    if inverted {
        tokens.remove(0);
    }
    let connective = tokens.last().and_then(|t| Connective::from_keyword(t));
    if connective.is_some() {
        tokens.pop();
    }
    let Some((head, rest)) = tokens.split_first() else {
        return Err(bad_statement(condition, line, "empty statement"));
    };

    let target = if let Some(operation) = Operation::from_keyword(head) {
        if !operation.returns_bool() {
            return Err(bad_statement(
                condition,
                line,
                &format!("`{}` does not return a boolean", operation),
            ));
        }
        StatementTarget::Operation {
            operation,
            params: parse_params(scope, condition, operation, rest)?,
        }
    } else if let Some(&id) = scope.conditions.get(head.as_str()) {
        let overrides = if rest.is_empty() {
            None
        } else {
            Some(classify_all(scope, condition, rest)?)
        };
        StatementTarget::Condition { id, overrides }
    } else {
        return Err(bad_statement(
            condition,
            line,
            &format!("`{}` is neither an operation nor a condition", head),
        ));
    };

    Ok(ConditionalStatement {
        inverted,
        target,
        connective,
    })
}

/// Compile every statement of a condition body.
pub(crate) fn parse_statements(
    scope: &Scope<'_>,
    condition: &str,
    body: &[String],
) -> CompileResult<Vec<ConditionalStatement>> {
    if body.is_empty() {
        return Err(CompileError::InvalidComponent {
            kind: "condition",
            component: condition.to_string(),
            reason: "has no statements".to_string(),
        });
    }
    let statements = body
        .iter()
        .map(|line| parse_statement(scope, condition, line))
        .collect::<CompileResult<Vec<_>>>()?;
    if let (Some(last), Some(line)) = (statements.last(), body.last()) {
        if last.connective.is_some() {
            return Err(bad_statement(condition, line, "connective without a following statement"));
        }
    }
    Ok(statements)
}

/// Split a gated line into its condition and the remaining tokens.
fn gate<'t>(
    scope: &Scope<'_>,
    component: &str,
    tokens: &'t [String],
) -> CompileResult<(Option<ConditionRef>, &'t [String])> {
    match tokens {
        [first, rest @ ..] if first == "allow" => Ok((None, rest)),
        [first, name, rest @ ..] if first == "not" => {
            let id = scope.condition(name, component)?;
            Ok((Some(ConditionRef { id, negated: true }), rest))
        }
        [name, rest @ ..] => {
            let id = scope.condition(name, component)?;
            Ok((Some(ConditionRef { id, negated: false }), rest))
        }
        [] => Err(CompileError::InvalidComponent {
            kind: "controlled-action",
            component: component.to_string(),
            reason: "empty control line".to_string(),
        }),
    }
}

fn performables(
    scope: &Scope<'_>,
    component: &str,
    names: &[String],
) -> CompileResult<Vec<Performable>> {
    names
        .iter()
        .map(|name| scope.performable(name, component))
        .collect()
}

/// Parsed control line of a controlled action.
pub(crate) struct Control {
    pub condition: Option<ConditionRef>,
    pub on_true: Performable,
    pub on_false: Option<Performable>,
}

pub(crate) fn parse_control(scope: &Scope<'_>, component: &str, line: &str) -> CompileResult<Control> {
    let tokens = expand_aliases(scope, split_line(line));
    let (condition, rest) = gate(scope, component, &tokens)?;
    let limit = if condition.is_some() { 2 } else { 1 };
    if rest.is_empty() || rest.len() > limit {
        return Err(CompileError::InvalidComponent {
            kind: "controlled-action",
            component: component.to_string(),
            reason: format!("control line `{}` must name 1 to {} actions", line, limit),
        });
    }
    let names = performables(scope, component, rest)?;
    Ok(Control {
        condition,
        on_true: names[0],
        on_false: names.get(1).copied(),
    })
}

/// `repeat` (until false) or `repeat <n>`.
pub(crate) fn parse_repeat(scope: &Scope<'_>, line: &str) -> CompileResult<Repeat> {
    let tokens = split_line(line);
    match tokens.as_slice() {
        [_] => Ok(Repeat::UntilFalse),
        [_, count] => match count.parse::<u32>() {
            Ok(n) if n >= 1 => Ok(Repeat::Times(n)),
            _ => Err(CompileError::InvalidParameter {
                document: scope.document.clone(),
                keyword: "repeat".to_string(),
                value: count.clone(),
            }),
        },
        _ => Err(CompileError::InvalidParameter {
            document: scope.document.clone(),
            keyword: "repeat".to_string(),
            value: line.to_string(),
        }),
    }
}

/// One line of a phase's `allow … end-allow` block.
pub(crate) fn parse_allowed(scope: &Scope<'_>, phase: &str, line: &str) -> CompileResult<AllowedAction> {
    let tokens = expand_aliases(scope, split_line(line));
    let (precondition, rest) = gate(scope, phase, &tokens)?;
    let (actions, responses) = match rest.iter().position(|t| t == "then") {
        Some(at) => (&rest[..at], &rest[at + 1..]),
        None => (rest, &rest[rest.len()..]),
    };
    let has_then = actions.len() < rest.len();
    if actions.len() != 1 || (has_then && responses.is_empty()) {
        return Err(CompileError::InvalidComponent {
            kind: "phase",
            component: phase.to_string(),
            reason: format!("allowed action line `{}` must name exactly one action", line),
        });
    }
    Ok(AllowedAction {
        action: scope.performable(&actions[0], phase)?,
        precondition,
        responses: performables(scope, phase, responses)?,
    })
}
