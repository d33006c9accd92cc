//! Parameter resolution: compiled tokens + supplied values → arguments.
//!
//! Constant tokens (`pile.discard`, `player.next`, `3`) resolve against
//! the play state. Placeholder tokens (`card`, `cards`, ...) take the
//! next supplied value; each dispatch starts with a fresh cursor over the
//! supplied list. An array placeholder also swallows every following
//! value that fits it.
//!
//! After resolution the arguments are shaped to the verb's signature:
//! extra arguments of a variadic signature merge into its final array.

use crate::components::{OwnerRef, ParamToken, PileSelector, PlayerRef};
use crate::core::{PlayerId, RuntimeError, RuntimeResult};
use crate::operations::{Operation, ParamKind, Value};
use crate::zones::PileId;

use super::state::PlayState;

/// Resolves parameter tokens for one dispatch.
pub struct ParamResolver<'a> {
    state: &'a PlayState,
    supplied: &'a [Value],
    cursor: usize,
    /// Named in errors.
    context: &'a str,
}

impl<'a> ParamResolver<'a> {
    pub fn new(state: &'a PlayState, supplied: &'a [Value], context: &'a str) -> Self {
        Self {
            state,
            supplied,
            cursor: 0,
            context,
        }
    }

    /// Supplied values not consumed yet.
    #[must_use]
    pub fn remaining(&self) -> &'a [Value] {
        &self.supplied[self.cursor.min(self.supplied.len())..]
    }

    fn unresolved(&self, operand: impl ToString, reason: &str) -> RuntimeError {
        RuntimeError::InvalidOperationParameter {
            operation: self.context.to_string(),
            operand: operand.to_string(),
            reason: reason.to_string(),
        }
    }

    fn owner(&self, owner: OwnerRef) -> PlayerId {
        match owner {
            OwnerRef::Current => self.state.current,
            OwnerRef::Next => self.state.next_player(),
            OwnerRef::Previous => self.state.previous_player(),
        }
    }

    fn pile(&self, selector: PileSelector) -> RuntimeResult<PileId> {
        let owner = self.owner(selector.owner);
        self.state
            .board
            .find(selector.slot, owner)
            .ok_or_else(|| self.unresolved(format!("pile slot {}", selector.slot.index()), "no such pile"))
    }

    /// Resolve a constant token from play state.
    fn constant(&self, token: &ParamToken) -> RuntimeResult<Value> {
        let board = &self.state.board;
        let value = match token {
            ParamToken::Player(player) => Value::Player(match player {
                PlayerRef::Current => self.state.current,
                PlayerRef::Next => self.state.next_player(),
                PlayerRef::Previous => self.state.previous_player(),
                PlayerRef::First => PlayerId::new(0),
            }),
            ParamToken::Pile(selector) => Value::Pile(self.pile(*selector)?),
            ParamToken::Piles(slot) => Value::Piles(board.instances(*slot)),
            ParamToken::Top(selector) => {
                let pile = board.pile(self.pile(*selector)?);
                let card = pile
                    .top()
                    .ok_or_else(|| self.unresolved(format!("top.{}", pile.name()), "pile is empty"))?;
                Value::Card(card.clone())
            }
            ParamToken::Bottom(selector) => {
                let pile = board.pile(self.pile(*selector)?);
                let card = pile.bottom().ok_or_else(|| {
                    self.unresolved(format!("bottom.{}", pile.name()), "pile is empty")
                })?;
                Value::Card(card.clone())
            }
            ParamToken::Contents(selector) => {
                Value::Cards(board.pile(self.pile(*selector)?).cards().cloned().collect())
            }
            ParamToken::Phase(phase) => Value::Phase(*phase),
            ParamToken::Integer(n) => Value::Integer(*n),
            ParamToken::Text(text) => Value::Text(text.clone()),
            ParamToken::Placeholder(kind) => {
                return Err(self.unresolved(kind, "placeholder is not a constant"))
            }
        };
        Ok(value)
    }

    /// Take the next supplied value for a placeholder at `index`.
    fn take(&mut self, kind: ParamKind, index: usize) -> RuntimeResult<Value> {
        let Some(value) = self.supplied.get(self.cursor) else {
            return Err(self.unresolved(kind, "no value supplied"));
        };
        let Some(mut value) = value.clone().coerce(kind) else {
            return Err(RuntimeError::InvalidParameterType {
                operation: self.context.to_string(),
                index,
                expected: kind.to_string(),
                actual: value.kind().to_string(),
            });
        };
        self.cursor += 1;
        if kind.is_array() {
            while let Some(next) = self.supplied.get(self.cursor) {
                if !next.fits(kind) {
                    break;
                }
                match value.clone().merge(next.clone()) {
                    Some(merged) => value = merged,
                    None => break,
                }
                self.cursor += 1;
            }
        }
        Ok(value)
    }

    /// Resolve one token.
    pub fn resolve(&mut self, token: &ParamToken, index: usize) -> RuntimeResult<Value> {
        match token {
            ParamToken::Placeholder(kind) => self.take(*kind, index),
            constant => self.constant(constant),
        }
    }

    /// Resolve tokens without a signature (condition overrides).
    pub fn resolve_all(&mut self, tokens: &[ParamToken]) -> RuntimeResult<Vec<Value>> {
        tokens
            .iter()
            .enumerate()
            .map(|(i, token)| self.resolve(token, i))
            .collect()
    }

    /// Resolve the tokens of `op` and shape them to its signature.
    pub fn arguments(&mut self, op: Operation, tokens: &[ParamToken]) -> RuntimeResult<Vec<Value>> {
        let signature = op.signature();
        if !signature.accepts(tokens.len()) {
            return Err(RuntimeError::InvalidNumberOfParameters {
                operation: op.keyword().to_string(),
                expected: signature.arity(),
                actual: tokens.len(),
            });
        }
        let mut values = self.resolve_all(tokens)?;
        let arity = signature.arity();
        if signature.variadic && values.len() > arity {
            let kind = signature.kind_at(arity - 1).unwrap_or(ParamKind::CardArray);
            let extras = values.split_off(arity);
            let mut merged = match values.pop().and_then(|v| v.coerce(kind)) {
                Some(first) => first,
                None => return Err(self.unresolved(op, "variadic parameter is not an array")),
            };
            for (offset, extra) in extras.into_iter().enumerate() {
                let actual = extra.kind();
                merged = merged.merge(extra).ok_or_else(|| RuntimeError::InvalidParameterType {
                    operation: op.keyword().to_string(),
                    index: arity + offset,
                    expected: kind.to_string(),
                    actual: actual.to_string(),
                })?;
            }
            values.push(merged);
        }
        Ok(values)
    }
}
