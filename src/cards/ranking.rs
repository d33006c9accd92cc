//! Card ranking.
//!
//! A `ranking … end-ranking` block lists tiers from highest to lowest,
//! one tier per line. Each token is a face or group name from the deck.
//! A card's rank is the pair (face tier, group tier), unranked attributes
//! scoring 0, compared lexicographically: faces decide and groups only
//! break ties.

use rustc_hash::FxHashMap;
use std::cmp::Ordering;
use std::sync::Arc;

use crate::core::{CompileError, CompileResult};
use crate::document::RuleDocument;

use super::card::Card;
use super::deck::Deck;

/// Active ranking of a game.
#[derive(Clone, Debug, Default)]
pub struct Ranking {
    faces: FxHashMap<Arc<str>, u32>,
    groups: FxHashMap<Arc<str>, u32>,
}

impl Ranking {
    /// Ranking under which every card compares equal.
    #[must_use]
    pub fn flat() -> Self {
        Self::default()
    }

    /// Compile the lines between `ranking` and `end-ranking`.
    pub fn compile(block: &RuleDocument, deck: &Deck) -> CompileResult<Self> {
        let mut ranking = Self::default();
        let tiers = block.len() as u32;
        for (i, line) in block.lines().iter().enumerate() {
            let score = tiers - i as u32;
            for token in line.split_whitespace() {
                let mut known = false;
                if let Some(face) = deck.faces().iter().find(|f| &***f == token) {
                    ranking.faces.insert(Arc::clone(face), score);
                    known = true;
                }
                if let Some(group) = deck.groups().iter().find(|g| &***g == token) {
                    ranking.groups.insert(Arc::clone(group), score);
                    known = true;
                }
                if !known {
                    return Err(CompileError::InvalidTypeReference {
                        document: block.identity(),
                        expected: format!("face or group of deck `{}`", deck.name()),
                        name: token.to_string(),
                    });
                }
            }
        }
        Ok(ranking)
    }

    #[must_use]
    pub fn is_flat(&self) -> bool {
        self.faces.is_empty() && self.groups.is_empty()
    }

    /// Ranking key of a card.
    #[must_use]
    pub fn key(&self, card: &Card) -> (u32, u32) {
        let face = self.faces.get(card.face()).copied().unwrap_or(0);
        let group = card
            .group()
            .and_then(|g| self.groups.get(g).copied())
            .unwrap_or(0);
        (face, group)
    }

    #[must_use]
    pub fn compare(&self, a: &Card, b: &Card) -> Ordering {
        self.key(a).cmp(&self.key(b))
    }

    /// `a` strictly outranks `b`.
    #[must_use]
    pub fn outranks(&self, a: &Card, b: &Card) -> bool {
        self.compare(a, b) == Ordering::Greater
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::Interner;
    use crate::document::DocumentKind;

    fn deck() -> Deck {
        let doc = RuleDocument::parse(
            DocumentKind::Deck,
            "mini",
            "size 6\nfaces ace king 2\ngroups red black\ncards all\n",
        )
        .unwrap();
        Deck::compile(&doc, &mut Interner::new()).unwrap()
    }

    fn block(text: &str) -> RuleDocument {
        RuleDocument::parse(DocumentKind::Rules, "mini", text).unwrap()
    }

    #[test]
    fn test_face_tiers() {
        let deck = deck();
        let ranking = Ranking::compile(&block("ace\nking\n2\n"), &deck).unwrap();
        let cards = deck.cards();
        // catalog: ace/red, ace/black, king/red, king/black, 2/red, 2/black
        assert!(ranking.outranks(&cards[0], &cards[2]));
        assert!(ranking.outranks(&cards[2], &cards[4]));
        assert_eq!(ranking.compare(&cards[0], &cards[1]), Ordering::Equal);
    }

    #[test]
    fn test_group_breaks_ties() {
        let deck = deck();
        let ranking = Ranking::compile(&block("ace king\nblack\nred\n"), &deck).unwrap();
        let cards = deck.cards();
        assert_eq!(ranking.key(&cards[0]), (3, 1));
        assert_eq!(ranking.key(&cards[1]), (3, 2));
        assert!(ranking.outranks(&cards[1], &cards[0]));
        assert!(ranking.outranks(&cards[0], &cards[4]));
    }

    #[test]
    fn test_unknown_name() {
        let err = Ranking::compile(&block("queen\n"), &deck()).unwrap_err();
        assert!(matches!(err, CompileError::InvalidTypeReference { ref name, .. } if name == "queen"));
    }

    #[test]
    fn test_flat() {
        let deck = deck();
        let ranking = Ranking::flat();
        assert!(ranking.is_flat());
        assert_eq!(ranking.compare(&deck.cards()[0], &deck.cards()[5]), Ordering::Equal);
    }
}
