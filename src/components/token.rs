//! Compiled parameter tokens.
//!
//! Rule files write operation parameters as tokens (`pile.discard`,
//! `top.draw@next`, `card`, `3`). The compiler classifies each into a
//! `ParamToken`; the interpreter resolves tokens into `Value`s against
//! the play state at dispatch time.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::operations::ParamKind;
use crate::zones::PileSlot;

use super::registry::PhaseId;

/// A player relative to turn order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerRef {
    Current,
    Next,
    Previous,
    /// Seat 0.
    First,
}

/// Owner of a player pile, relative to the current player.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OwnerRef {
    #[default]
    Current,
    Next,
    Previous,
}

/// A pile declaration plus the owner whose instance is meant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PileSelector {
    pub slot: PileSlot,
    pub owner: OwnerRef,
}

/// One compiled operation parameter.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParamToken {
    /// Supplied by the caller at perform time.
    Placeholder(ParamKind),
    Player(PlayerRef),
    Pile(PileSelector),
    /// Every instance of a declaration.
    Piles(PileSlot),
    Top(PileSelector),
    Bottom(PileSelector),
    /// Full contents of a pile.
    Contents(PileSelector),
    Phase(PhaseId),
    Integer(i64),
    Text(String),
}

impl ParamToken {
    /// Kind of value the token resolves to.
    #[must_use]
    pub fn kind(&self) -> ParamKind {
        match self {
            ParamToken::Placeholder(kind) => *kind,
            ParamToken::Player(_) => ParamKind::Player,
            ParamToken::Pile(_) => ParamKind::Pile,
            ParamToken::Piles(_) => ParamKind::PileArray,
            ParamToken::Top(_) | ParamToken::Bottom(_) => ParamKind::Card,
            ParamToken::Contents(_) => ParamKind::CardArray,
            ParamToken::Phase(_) => ParamKind::Phase,
            ParamToken::Integer(_) => ParamKind::Integer,
            ParamToken::Text(_) => ParamKind::Text,
        }
    }

    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        matches!(self, ParamToken::Placeholder(_))
    }

    /// The pile selector of a pile token, if any.
    #[must_use]
    pub fn pile_selector(&self) -> Option<PileSelector> {
        match self {
            ParamToken::Pile(selector) => Some(*selector),
            _ => None,
        }
    }
}

/// Parameter list of one operation invocation.
pub type ParamTokens = SmallVec<[ParamToken; 4]>;
