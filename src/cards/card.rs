//! Cards.
//!
//! A card is an entry of the deck catalog: a unique id plus its face and
//! optional group (suit). Ids distinguish physical cards when a deck holds
//! several copies of the same face and group.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Position of a card in its deck catalog.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CardId(pub u16);

impl CardId {
    #[must_use]
    pub const fn new(id: u16) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// A physical card.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Card {
    id: CardId,
    face: Arc<str>,
    group: Option<Arc<str>>,
}

fn same_symbol(a: &Arc<str>, b: &Arc<str>) -> bool {
    Arc::ptr_eq(a, b) || a == b
}

impl Card {
    pub fn new(id: CardId, face: Arc<str>, group: Option<Arc<str>>) -> Self {
        Self { id, face, group }
    }

    #[must_use]
    pub fn id(&self) -> CardId {
        self.id
    }

    #[must_use]
    pub fn face(&self) -> &str {
        &self.face
    }

    #[must_use]
    pub fn group(&self) -> Option<&str> {
        self.group.as_deref()
    }

    pub(crate) fn face_symbol(&self) -> &Arc<str> {
        &self.face
    }

    pub(crate) fn group_symbol(&self) -> Option<&Arc<str>> {
        self.group.as_ref()
    }

    /// Same face as `other`.
    #[must_use]
    pub fn same_face(&self, other: &Card) -> bool {
        same_symbol(&self.face, &other.face)
    }

    /// Same group as `other` (two group-less cards match).
    #[must_use]
    pub fn same_group(&self, other: &Card) -> bool {
        match (&self.group, &other.group) {
            (Some(a), Some(b)) => same_symbol(a, b),
            (None, None) => true,
            _ => false,
        }
    }

    /// Equal in every attribute, ignoring identity.
    #[must_use]
    pub fn same_attributes(&self, other: &Card) -> bool {
        self.same_face(other) && self.same_group(other)
    }
}

impl std::fmt::Display for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.group {
            Some(group) => write!(f, "{} of {}", self.face, group),
            None => f.write_str(&self.face),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(id: u16, face: &str, group: Option<&str>) -> Card {
        Card::new(CardId::new(id), Arc::from(face), group.map(Arc::from))
    }

    #[test]
    fn test_display() {
        assert_eq!(card(0, "queen", Some("hearts")).to_string(), "queen of hearts");
        assert_eq!(card(1, "joker", None).to_string(), "joker");
    }

    #[test]
    fn test_attribute_equality_ignores_id() {
        let a = card(0, "7", Some("clubs"));
        let b = card(1, "7", Some("clubs"));
        assert_ne!(a, b);
        assert!(a.same_attributes(&b));
    }

    #[test]
    fn test_partial_matches() {
        let a = card(0, "7", Some("clubs"));
        let b = card(1, "7", Some("hearts"));
        let c = card(2, "9", Some("clubs"));
        let joker = card(3, "joker", None);

        assert!(a.same_face(&b));
        assert!(!a.same_group(&b));
        assert!(a.same_group(&c));
        assert!(!a.same_group(&joker));
        assert!(joker.same_group(&card(4, "joker", None)));
    }
}
