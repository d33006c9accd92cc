//! Typed operation values.
//!
//! Every operation parameter has one of eight kinds. Callers supply
//! `Value`s for open parameters; constant parameter tokens resolve to
//! `Value`s from game state. A single card satisfies a card-array
//! parameter and a single pile a pile-array parameter.

use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::components::PhaseId;
use crate::core::PlayerId;
use crate::zones::PileId;

/// Parameter kinds of the operation type system.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParamKind {
    Player,
    Card,
    CardArray,
    Pile,
    PileArray,
    Phase,
    Text,
    Integer,
}

impl ParamKind {
    pub const ALL: [ParamKind; 8] = [
        ParamKind::Player,
        ParamKind::Card,
        ParamKind::CardArray,
        ParamKind::Pile,
        ParamKind::PileArray,
        ParamKind::Phase,
        ParamKind::Text,
        ParamKind::Integer,
    ];

    /// Placeholder keyword used in rule files.
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            ParamKind::Player => "player",
            ParamKind::Card => "card",
            ParamKind::CardArray => "cards",
            ParamKind::Pile => "pile",
            ParamKind::PileArray => "piles",
            ParamKind::Phase => "phase",
            ParamKind::Text => "string",
            ParamKind::Integer => "integer",
        }
    }

    #[must_use]
    pub fn from_keyword(word: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.keyword() == word)
    }

    #[must_use]
    pub const fn is_array(self) -> bool {
        matches!(self, ParamKind::CardArray | ParamKind::PileArray)
    }

    /// Can a value of kind `self` fill a parameter of kind `param`?
    #[must_use]
    pub fn satisfies(self, param: ParamKind) -> bool {
        self == param
            || matches!(
                (self, param),
                (ParamKind::Card, ParamKind::CardArray) | (ParamKind::Pile, ParamKind::PileArray)
            )
    }
}

impl std::fmt::Display for ParamKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.keyword())
    }
}

/// A resolved operation argument.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Value {
    Player(PlayerId),
    Card(Card),
    Cards(Vec<Card>),
    Pile(PileId),
    Piles(Vec<PileId>),
    Phase(PhaseId),
    Text(String),
    Integer(i64),
}

impl Value {
    #[must_use]
    pub fn kind(&self) -> ParamKind {
        match self {
            Value::Player(_) => ParamKind::Player,
            Value::Card(_) => ParamKind::Card,
            Value::Cards(_) => ParamKind::CardArray,
            Value::Pile(_) => ParamKind::Pile,
            Value::Piles(_) => ParamKind::PileArray,
            Value::Phase(_) => ParamKind::Phase,
            Value::Text(_) => ParamKind::Text,
            Value::Integer(_) => ParamKind::Integer,
        }
    }

    #[must_use]
    pub fn fits(&self, kind: ParamKind) -> bool {
        self.kind().satisfies(kind)
    }

    /// Convert to exactly `kind`, wrapping singles into arrays.
    #[must_use]
    pub fn coerce(self, kind: ParamKind) -> Option<Value> {
        match (self, kind) {
            (Value::Card(card), ParamKind::CardArray) => Some(Value::Cards(vec![card])),
            (Value::Pile(pile), ParamKind::PileArray) => Some(Value::Piles(vec![pile])),
            (value, kind) if value.kind() == kind => Some(value),
            _ => None,
        }
    }

    /// Append `other` to this array value. Both must fit the array kind.
    #[must_use]
    pub fn merge(self, other: Value) -> Option<Value> {
        let kind = self.kind();
        if !kind.is_array() {
            return None;
        }
        match (self, other.coerce(kind)?) {
            (Value::Cards(mut a), Value::Cards(b)) => {
                a.extend(b);
                Some(Value::Cards(a))
            }
            (Value::Piles(mut a), Value::Piles(b)) => {
                a.extend(b);
                Some(Value::Piles(a))
            }
            _ => None,
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Player(player) => write!(f, "{}", player),
            Value::Card(card) => write!(f, "{}", card),
            Value::Cards(cards) => write!(f, "{} cards", cards.len()),
            Value::Pile(pile) => write!(f, "{}", pile),
            Value::Piles(piles) => write!(f, "{} piles", piles.len()),
            Value::Phase(phase) => write!(f, "{}", phase),
            Value::Text(text) => write!(f, "\"{}\"", text),
            Value::Integer(n) => write!(f, "{}", n),
        }
    }
}

/// Result of dispatching an operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Bool(bool),
    Integer(i64),
}

impl Outcome {
    /// Did the operation take effect? Integer results always do.
    #[must_use]
    pub fn took_effect(self) -> bool {
        match self {
            Outcome::Bool(b) => b,
            Outcome::Integer(_) => true,
        }
    }

    #[must_use]
    pub fn as_bool(self) -> Option<bool> {
        match self {
            Outcome::Bool(b) => Some(b),
            Outcome::Integer(_) => None,
        }
    }

    #[must_use]
    pub fn as_integer(self) -> Option<i64> {
        match self {
            Outcome::Integer(n) => Some(n),
            Outcome::Bool(_) => None,
        }
    }
}

/// Legal values for one open parameter of an action.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OptionList {
    /// Position of the parameter in the action's parameter list.
    pub index: usize,
    pub kind: ParamKind,
    /// Empty for free-form kinds (`string`, `integer`).
    pub values: Vec<Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::CardId;
    use std::sync::Arc;

    fn card(id: u16) -> Card {
        Card::new(CardId::new(id), Arc::from("x"), None)
    }

    #[test]
    fn test_keywords_round_trip() {
        for kind in ParamKind::ALL {
            assert_eq!(ParamKind::from_keyword(kind.keyword()), Some(kind));
        }
        assert_eq!(ParamKind::from_keyword("deck"), None);
    }

    #[test]
    fn test_single_satisfies_array() {
        assert!(Value::Card(card(0)).fits(ParamKind::CardArray));
        assert!(Value::Pile(PileId::new(0)).fits(ParamKind::PileArray));
        assert!(!Value::Cards(vec![]).fits(ParamKind::Card));
        assert!(!Value::Integer(1).fits(ParamKind::Text));
    }

    #[test]
    fn test_coerce_and_merge() {
        let one = Value::Card(card(0)).coerce(ParamKind::CardArray).unwrap();
        let two = one.merge(Value::Card(card(1))).unwrap();
        let three = two.merge(Value::Cards(vec![card(2)])).unwrap();
        match three {
            Value::Cards(cards) => assert_eq!(cards.len(), 3),
            other => panic!("unexpected {:?}", other),
        }
        assert!(Value::Integer(1).merge(Value::Integer(2)).is_none());
        assert!(Value::Cards(vec![])
            .merge(Value::Pile(PileId::new(0)))
            .is_none());
    }

    #[test]
    fn test_outcome_took_effect() {
        assert!(Outcome::Integer(-1).took_effect());
        assert!(Outcome::Bool(true).took_effect());
        assert!(!Outcome::Bool(false).took_effect());
    }
}
