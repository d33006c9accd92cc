//! Operation dispatch: executing a verb against play state.
//!
//! The `OperationResolver` receives fully resolved arguments (one value
//! per declared parameter, variadic extras already merged) and applies
//! the verb. "Not possible right now" is an ordinary `false` result;
//! errors are reserved for structural problems such as a missing
//! argument or a value of the wrong kind.

use std::cmp::Ordering;

use crate::cards::{Card, CardId, Ranking};
use crate::components::PhaseId;
use crate::core::{PlayerId, PlayerStatus, RuntimeError, RuntimeResult};
use crate::interpreter::PlayState;
use crate::zones::PileId;

use super::operation::Operation;
use super::value::{Outcome, ParamKind, Value};

/// Applies operations to play state.
pub struct OperationResolver;

fn ordering(order: Ordering) -> Outcome {
    Outcome::Integer(match order {
        Ordering::Less => -1,
        Ordering::Equal => 0,
        Ordering::Greater => 1,
    })
}

/// Checked accessors over the argument list of one dispatch.
struct Args<'a> {
    op: Operation,
    values: &'a [Value],
}

impl<'a> Args<'a> {
    fn get(&self, index: usize) -> RuntimeResult<&'a Value> {
        self.values
            .get(index)
            .ok_or_else(|| RuntimeError::InvalidNumberOfParameters {
                operation: self.op.keyword().to_string(),
                expected: index + 1,
                actual: self.values.len(),
            })
    }

    fn mismatch(&self, index: usize, expected: ParamKind, actual: &Value) -> RuntimeError {
        RuntimeError::InvalidParameterType {
            operation: self.op.keyword().to_string(),
            index,
            expected: expected.to_string(),
            actual: actual.kind().to_string(),
        }
    }

    fn player(&self, index: usize) -> RuntimeResult<PlayerId> {
        match self.get(index)? {
            Value::Player(player) => Ok(*player),
            other => Err(self.mismatch(index, ParamKind::Player, other)),
        }
    }

    fn phase(&self, index: usize) -> RuntimeResult<PhaseId> {
        match self.get(index)? {
            Value::Phase(phase) => Ok(*phase),
            other => Err(self.mismatch(index, ParamKind::Phase, other)),
        }
    }

    fn integer(&self, index: usize) -> RuntimeResult<i64> {
        match self.get(index)? {
            Value::Integer(n) => Ok(*n),
            other => Err(self.mismatch(index, ParamKind::Integer, other)),
        }
    }

    fn pile(&self, index: usize) -> RuntimeResult<PileId> {
        match self.get(index)? {
            Value::Pile(pile) => Ok(*pile),
            other => Err(self.mismatch(index, ParamKind::Pile, other)),
        }
    }

    fn piles(&self, index: usize) -> RuntimeResult<Vec<PileId>> {
        match self.get(index)? {
            Value::Pile(pile) => Ok(vec![*pile]),
            Value::Piles(piles) => Ok(piles.clone()),
            other => Err(self.mismatch(index, ParamKind::PileArray, other)),
        }
    }

    fn card(&self, index: usize) -> RuntimeResult<&'a Card> {
        match self.get(index)? {
            Value::Card(card) => Ok(card),
            other => Err(self.mismatch(index, ParamKind::Card, other)),
        }
    }

    fn cards(&self, index: usize) -> RuntimeResult<Vec<&'a Card>> {
        match self.get(index)? {
            Value::Card(card) => Ok(vec![card]),
            Value::Cards(cards) => Ok(cards.iter().collect()),
            other => Err(self.mismatch(index, ParamKind::CardArray, other)),
        }
    }
}

/// True iff every card relates to the first by `same`.
fn all_match(cards: &[&Card], same: impl Fn(&Card, &Card) -> bool) -> Outcome {
    Outcome::Bool(match cards.split_first() {
        Some((first, rest)) => rest.iter().all(|card| same(first, card)),
        None => true,
    })
}

impl OperationResolver {
    /// Dispatch `op` with resolved arguments.
    ///
    /// Fails with `InvalidNumberOfParameters` if fewer values than the
    /// signature declares are supplied, and with
    /// `InvalidOperationParameter` if a pile, player or phase value is
    /// outside this game. `phases` is the number of compiled phases.
    pub fn dispatch(
        op: Operation,
        values: &[Value],
        state: &mut PlayState,
        ranking: &Ranking,
        phases: usize,
    ) -> RuntimeResult<Outcome> {
        let arity = op.signature().arity();
        if values.len() < arity {
            return Err(RuntimeError::InvalidNumberOfParameters {
                operation: op.keyword().to_string(),
                expected: arity,
                actual: values.len(),
            });
        }
        for value in values {
            let in_range = match value {
                Value::Pile(pile) => pile.index() < state.board.len(),
                Value::Piles(piles) => piles.iter().all(|p| p.index() < state.board.len()),
                Value::Player(player) => player.index() < state.player_count(),
                Value::Phase(phase) => phase.index() < phases,
                _ => true,
            };
            if !in_range {
                return Err(RuntimeError::InvalidOperationParameter {
                    operation: op.keyword().to_string(),
                    operand: value.to_string(),
                    reason: "not part of this game".to_string(),
                });
            }
        }
        let args = Args { op, values };
        log::trace!("dispatch {} with {} values", op, values.len());

        let outcome = match op {
            // === Turn and phase ===
            Operation::EndTurn => {
                state.advance_turn();
                Outcome::Bool(true)
            }
            Operation::Goto => {
                let phase = args.phase(0)?;
                let current = state.current;
                state.players[current].phase = Some(phase);
                Outcome::Bool(true)
            }
            Operation::PlayerWin | Operation::PlayerLose => {
                let player = args.player(0)?;
                state.players[player].status = if op == Operation::PlayerWin {
                    PlayerStatus::Won
                } else {
                    PlayerStatus::Lost
                };
                Outcome::Bool(true)
            }
            Operation::ReverseDirection => {
                state.direction = state.direction.reversed();
                Outcome::Bool(true)
            }

            // === Card comparison ===
            Operation::Match => all_match(&args.cards(0)?, Card::same_attributes),
            Operation::MatchFace => all_match(&args.cards(0)?, Card::same_face),
            Operation::MatchGroup => all_match(&args.cards(0)?, Card::same_group),
            Operation::MatchRank => {
                all_match(&args.cards(0)?, |a, b| ranking.compare(a, b) == Ordering::Equal)
            }
            Operation::CompareRank => ordering(ranking.compare(args.card(0)?, args.card(1)?)),
            Operation::CheckRank => Outcome::Bool(ranking.outranks(args.card(0)?, args.card(1)?)),
            Operation::SortByRank => {
                let pile = args.pile(0)?;
                state
                    .board
                    .pile_mut(pile)
                    .sort_descending_by(|a, b| ranking.compare(a, b));
                Outcome::Bool(true)
            }

            // === Pile queries ===
            Operation::CompareSizeTo => {
                let size = state.board.pile(args.pile(0)?).len() as i64;
                ordering(size.cmp(&args.integer(1)?))
            }
            Operation::CompareSizes => {
                let a = state.board.pile(args.pile(0)?).len();
                let b = state.board.pile(args.pile(1)?).len();
                ordering(a.cmp(&b))
            }
            Operation::CheckSize => {
                let size = state.board.pile(args.pile(0)?).len() as i64;
                Outcome::Bool(size == args.integer(1)?)
            }
            Operation::CheckIfEmpty => Outcome::Bool(
                args.piles(0)?
                    .into_iter()
                    .all(|pile| state.board.pile(pile).is_empty()),
            ),
            Operation::CheckIfContains => {
                let pile = args.pile(0)?;
                Outcome::Bool(state.board.pile(pile).contains(args.card(1)?.id()))
            }
            Operation::GetSize => Outcome::Integer(state.board.pile(args.pile(0)?).len() as i64),

            // === Card movement ===
            Operation::Put => {
                let (from, to) = (args.pile(0)?, args.pile(1)?);
                let card = args.card(2)?.id();
                Outcome::Bool(state.board.transfer(from, to, &[card]))
            }
            Operation::PutMultiple => {
                let (from, to) = (args.pile(0)?, args.pile(1)?);
                let cards: Vec<CardId> = args.cards(2)?.iter().map(|c| c.id()).collect();
                Outcome::Bool(state.board.transfer(from, to, &cards))
            }
            Operation::PutTop => {
                let (from, to) = (args.pile(0)?, args.pile(1)?);
                Outcome::Bool(state.board.transfer_top(from, to))
            }
            Operation::PutAll => {
                let (from, to) = (args.pile(0)?, args.pile(1)?);
                state.board.transfer_all(from, to);
                Outcome::Bool(true)
            }
            Operation::Exchange => {
                let (a, b) = (args.pile(0)?, args.pile(1)?);
                let (card_a, card_b) = (args.card(2)?.id(), args.card(3)?.id());
                Outcome::Bool(state.board.exchange(a, b, card_a, card_b))
            }
            Operation::Remove => {
                let pile = args.pile(0)?;
                let card = args.card(1)?.id();
                Outcome::Bool(state.board.remove(pile, &[card]))
            }
            Operation::RemoveAll => {
                for pile in args.piles(0)? {
                    state.board.remove_all(pile);
                }
                Outcome::Bool(true)
            }
            Operation::Shuffle => {
                for pile in args.piles(0)? {
                    let PlayState { board, rng, .. } = &mut *state;
                    board.pile_mut(pile).shuffle(rng);
                }
                Outcome::Bool(true)
            }
        };
        Ok(outcome)
    }
}
