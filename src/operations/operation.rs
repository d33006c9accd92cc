//! The closed operation catalog.
//!
//! Each verb has a static `Signature`: ordered parameter kinds, an
//! optional variable-arity marker on the last parameter, and a return
//! kind. The table is plain data, kept apart from dispatch in
//! `resolver`, so adding a verb never touches control flow.

use serde::{Deserialize, Serialize};

use super::value::ParamKind;

/// Primitive verbs available to rule files.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operation {
    // === Turn and phase ===
    EndTurn,
    Goto,
    PlayerWin,
    PlayerLose,
    ReverseDirection,

    // === Card comparison ===
    Match,
    MatchFace,
    MatchGroup,
    MatchRank,
    CompareRank,
    CheckRank,
    SortByRank,

    // === Pile queries ===
    CompareSizeTo,
    CompareSizes,
    CheckSize,
    CheckIfEmpty,
    CheckIfContains,
    GetSize,

    // === Card movement ===
    Put,
    PutMultiple,
    PutTop,
    PutAll,
    Exchange,
    Remove,
    RemoveAll,
    Shuffle,
}

/// Return kind of an operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReturnKind {
    Boolean,
    Integer,
}

/// One declared parameter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Param {
    pub kind: ParamKind,
    /// For card parameters: index of the pile parameter the card is
    /// chosen from, used to enumerate options.
    pub source: Option<usize>,
}

/// Static parameter and return types of a verb.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Signature {
    pub params: &'static [Param],
    /// The last parameter is an array that extra arguments merge into.
    pub variadic: bool,
    pub returns: ReturnKind,
}

const fn p(kind: ParamKind) -> Param {
    Param { kind, source: None }
}

const fn from(kind: ParamKind, pile: usize) -> Param {
    Param {
        kind,
        source: Some(pile),
    }
}

macro_rules! sig {
    ([$($param:expr),*], $variadic:expr, $returns:expr) => {
        Signature {
            params: &[$($param),*],
            variadic: $variadic,
            returns: $returns,
        }
    };
}

use ParamKind::{Card, CardArray, Integer, Phase, Pile, PileArray, Player};
use ReturnKind::{Boolean, Integer as Int};

const NONE: Signature = sig!([], false, Boolean);
const GOTO: Signature = sig!([p(Phase)], false, Boolean);
const ONE_PLAYER: Signature = sig!([p(Player)], false, Boolean);
const CARDS: Signature = sig!([p(CardArray)], true, Boolean);
const RANK_ORDER: Signature = sig!([p(Card), p(Card)], false, Int);
const TWO_CARDS: Signature = sig!([p(Card), p(Card)], false, Boolean);
const ONE_PILE: Signature = sig!([p(Pile)], false, Boolean);
const PILES: Signature = sig!([p(PileArray)], true, Boolean);
const SIZE_ORDER: Signature = sig!([p(Pile), p(Integer)], false, Int);
const SIZES_ORDER: Signature = sig!([p(Pile), p(Pile)], false, Int);
const SIZE_IS: Signature = sig!([p(Pile), p(Integer)], false, Boolean);
const CONTAINS: Signature = sig!([p(Pile), from(Card, 0)], false, Boolean);
const SIZE: Signature = sig!([p(Pile)], false, Int);
const PUT: Signature = sig!([p(Pile), p(Pile), from(Card, 0)], false, Boolean);
const PUT_MULTIPLE: Signature = sig!([p(Pile), p(Pile), from(CardArray, 0)], true, Boolean);
const TWO_PILES: Signature = sig!([p(Pile), p(Pile)], false, Boolean);
const EXCHANGE: Signature =
    sig!([p(Pile), p(Pile), from(Card, 0), from(Card, 1)], false, Boolean);
const REMOVE: Signature = sig!([p(Pile), from(Card, 0)], false, Boolean);

impl Signature {
    /// Minimum number of arguments.
    #[must_use]
    pub fn arity(&self) -> usize {
        self.params.len()
    }

    /// Is `count` an acceptable number of parameter tokens?
    #[must_use]
    pub fn accepts(&self, count: usize) -> bool {
        if self.variadic {
            count >= self.params.len()
        } else {
            count == self.params.len()
        }
    }

    /// Declared parameter at position `index`. Positions past the end
    /// map to the last parameter of a variadic signature.
    #[must_use]
    pub fn param_at(&self, index: usize) -> Option<Param> {
        match self.params.get(index) {
            Some(param) => Some(*param),
            None if self.variadic => self.params.last().copied(),
            None => None,
        }
    }

    #[must_use]
    pub fn kind_at(&self, index: usize) -> Option<ParamKind> {
        self.param_at(index).map(|param| param.kind)
    }
}

impl Operation {
    pub const ALL: [Operation; 26] = [
        Operation::EndTurn,
        Operation::Goto,
        Operation::PlayerWin,
        Operation::PlayerLose,
        Operation::ReverseDirection,
        Operation::Match,
        Operation::MatchFace,
        Operation::MatchGroup,
        Operation::MatchRank,
        Operation::CompareRank,
        Operation::CheckRank,
        Operation::SortByRank,
        Operation::CompareSizeTo,
        Operation::CompareSizes,
        Operation::CheckSize,
        Operation::CheckIfEmpty,
        Operation::CheckIfContains,
        Operation::GetSize,
        Operation::Put,
        Operation::PutMultiple,
        Operation::PutTop,
        Operation::PutAll,
        Operation::Exchange,
        Operation::Remove,
        Operation::RemoveAll,
        Operation::Shuffle,
    ];

    /// Hyphenated verb used in rule files.
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Operation::EndTurn => "end-turn",
            Operation::Goto => "goto",
            Operation::PlayerWin => "player-win",
            Operation::PlayerLose => "player-lose",
            Operation::ReverseDirection => "reverse-direction",
            Operation::Match => "match",
            Operation::MatchFace => "match-face",
            Operation::MatchGroup => "match-group",
            Operation::MatchRank => "match-rank",
            Operation::CompareRank => "compare-rank",
            Operation::CheckRank => "check-rank",
            Operation::SortByRank => "sort-by-rank",
            Operation::CompareSizeTo => "compare-size-to",
            Operation::CompareSizes => "compare-sizes",
            Operation::CheckSize => "check-size",
            Operation::CheckIfEmpty => "check-if-empty",
            Operation::CheckIfContains => "check-if-contains",
            Operation::GetSize => "get-size",
            Operation::Put => "put",
            Operation::PutMultiple => "put-multiple",
            Operation::PutTop => "put-top",
            Operation::PutAll => "put-all",
            Operation::Exchange => "exchange",
            Operation::Remove => "remove",
            Operation::RemoveAll => "remove-all",
            Operation::Shuffle => "shuffle",
        }
    }

    #[must_use]
    pub fn from_keyword(word: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.keyword() == word)
    }

    #[must_use]
    pub fn signature(self) -> &'static Signature {
        match self {
            Operation::EndTurn | Operation::ReverseDirection => &NONE,
            Operation::Goto => &GOTO,
            Operation::PlayerWin | Operation::PlayerLose => &ONE_PLAYER,
            Operation::Match
            | Operation::MatchFace
            | Operation::MatchGroup
            | Operation::MatchRank => &CARDS,
            Operation::CompareRank => &RANK_ORDER,
            Operation::CheckRank => &TWO_CARDS,
            Operation::SortByRank => &ONE_PILE,
            Operation::CompareSizeTo => &SIZE_ORDER,
            Operation::CompareSizes => &SIZES_ORDER,
            Operation::CheckSize => &SIZE_IS,
            Operation::CheckIfEmpty | Operation::RemoveAll | Operation::Shuffle => &PILES,
            Operation::CheckIfContains => &CONTAINS,
            Operation::GetSize => &SIZE,
            Operation::Put => &PUT,
            Operation::PutMultiple => &PUT_MULTIPLE,
            Operation::PutTop | Operation::PutAll => &TWO_PILES,
            Operation::Exchange => &EXCHANGE,
            Operation::Remove => &REMOVE,
        }
    }

    #[must_use]
    pub fn returns_bool(self) -> bool {
        self.signature().returns == ReturnKind::Boolean
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.keyword())
    }
}
