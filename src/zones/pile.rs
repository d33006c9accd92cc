//! Card piles and their policies.
//!
//! A pile is an ordered card sequence. Index 0 is the bottom and the
//! last index is the top. Cards are stored in an `im::Vector` so a board
//! snapshot clones in O(1).

use im::Vector;
use serde::{Deserialize, Serialize};

use crate::cards::{Card, CardId};
use crate::core::{GameRng, PlayerId};

/// Runtime pile identifier: index into the board's pile arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PileId(pub u16);

impl PileId {
    #[must_use]
    pub const fn new(id: u16) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for PileId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Pile({})", self.0)
    }
}

/// Index of a `cardpile` declaration in the board document.
///
/// A player-owned declaration yields one pile per player, all sharing
/// the slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PileSlot(pub u16);

impl PileSlot {
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Who owns the piles of a declaration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PileOwner {
    /// One pile per player.
    Player,
    /// A single shared pile.
    Common,
}

/// Which players may see a pile's cards.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Visibility {
    All,
    /// Only the owning player.
    Owner,
    /// Everyone except the owning player.
    Others,
    None,
}

/// Where added cards land.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Placement {
    Top,
    Bottom,
}

/// Which cards may be taken from a pile by card-moving operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Removal {
    Any,
    /// Only from the top, in any order for multi-card moves.
    Top,
    None,
}

// Presentation hints, carried through for the display layer.

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Orientation {
    Vertical,
    Horizontal,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tiling {
    Stacked,
    Spread,
}

/// Policy set of a pile declaration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PilePolicy {
    pub owner: PileOwner,
    pub visibility: Visibility,
    /// Only the top N cards are visible, even to permitted viewers.
    pub visible: Option<usize>,
    pub placement: Placement,
    pub orientation: Orientation,
    pub tiling: Tiling,
    pub removal: Removal,
}

impl Default for PilePolicy {
    fn default() -> Self {
        Self {
            owner: PileOwner::Common,
            visibility: Visibility::All,
            visible: None,
            placement: Placement::Top,
            orientation: Orientation::Vertical,
            tiling: Tiling::Stacked,
            removal: Removal::Any,
        }
    }
}

/// A named, owned, ordered card sequence.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CardPile {
    name: String,
    slot: PileSlot,
    owner: Option<PlayerId>,
    policy: PilePolicy,
    cards: Vector<Card>,
}

impl CardPile {
    pub fn new(
        name: impl Into<String>,
        slot: PileSlot,
        owner: Option<PlayerId>,
        policy: PilePolicy,
    ) -> Self {
        Self {
            name: name.into(),
            slot,
            owner,
            policy,
            cards: Vector::new(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn slot(&self) -> PileSlot {
        self.slot
    }

    /// Owning player, `None` for common piles.
    #[must_use]
    pub fn owner(&self) -> Option<PlayerId> {
        self.owner
    }

    #[must_use]
    pub fn policy(&self) -> &PilePolicy {
        &self.policy
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Cards bottom to top.
    pub fn cards(&self) -> impl DoubleEndedIterator<Item = &Card> + '_ {
        self.cards.iter()
    }

    #[must_use]
    pub fn top(&self) -> Option<&Card> {
        self.cards.back()
    }

    #[must_use]
    pub fn bottom(&self) -> Option<&Card> {
        self.cards.front()
    }

    #[must_use]
    pub fn position(&self, card: CardId) -> Option<usize> {
        self.cards.iter().position(|c| c.id() == card)
    }

    #[must_use]
    pub fn contains(&self, card: CardId) -> bool {
        self.position(card).is_some()
    }

    #[must_use]
    pub fn card(&self, card: CardId) -> Option<&Card> {
        self.cards.iter().find(|c| c.id() == card)
    }

    /// Add a card according to the placement policy.
    pub fn add(&mut self, card: Card) {
        match self.policy.placement {
            Placement::Top => self.cards.push_back(card),
            Placement::Bottom => self.cards.push_front(card),
        }
    }

    /// Can all of `cards` be taken right now?
    ///
    /// Every card must be present (no duplicates) and allowed by the
    /// removal policy. Under `Removal::Top` the cards must be exactly the
    /// top `cards.len()` cards.
    #[must_use]
    pub fn can_take(&self, cards: &[CardId]) -> bool {
        let mut positions = Vec::with_capacity(cards.len());
        for id in cards {
            match self.position(*id) {
                Some(at) if !positions.contains(&at) => positions.push(at),
                _ => return false,
            }
        }
        match self.policy.removal {
            Removal::Any => true,
            Removal::None => cards.is_empty(),
            Removal::Top => {
                let floor = self.cards.len() - positions.len();
                positions.iter().all(|&at| at >= floor)
            }
        }
    }

    /// Cards the removal policy allows taking one at a time.
    #[must_use]
    pub fn removable(&self) -> Vec<Card> {
        match self.policy.removal {
            Removal::Any => self.cards.iter().cloned().collect(),
            Removal::Top => self.top().cloned().into_iter().collect(),
            Removal::None => Vec::new(),
        }
    }

    /// Remove a card by id, ignoring the removal policy.
    pub fn take(&mut self, card: CardId) -> Option<Card> {
        let at = self.position(card)?;
        Some(self.cards.remove(at))
    }

    pub fn take_top(&mut self) -> Option<Card> {
        self.cards.pop_back()
    }

    /// Empty the pile, returning its cards bottom to top.
    pub fn take_all(&mut self) -> Vec<Card> {
        std::mem::take(&mut self.cards).into_iter().collect()
    }

    /// Replace the card at `card`'s position, returning the old one.
    pub(crate) fn replace(&mut self, card: CardId, with: Card) -> Option<Card> {
        let at = self.position(card)?;
        Some(self.cards.set(at, with))
    }

    /// Swap two cards of this pile in place.
    pub(crate) fn swap_cards(&mut self, a: CardId, b: CardId) -> bool {
        match (self.position(a), self.position(b)) {
            (Some(x), Some(y)) if x != y => {
                self.cards.swap(x, y);
                true
            }
            _ => false,
        }
    }

    /// Stable sort by `compare`, highest first ending at the bottom.
    ///
    /// After sorting, the top of the pile holds the lowest card and the
    /// bottom the highest, so reading bottom to top is descending.
    pub fn sort_descending_by(&mut self, compare: impl Fn(&Card, &Card) -> std::cmp::Ordering) {
        let mut cards: Vec<Card> = self.cards.iter().cloned().collect();
        // Insertion sort keeps equal cards in their original order.
        for i in 1..cards.len() {
            let mut j = i;
            while j > 0 && compare(&cards[j - 1], &cards[j]) == std::cmp::Ordering::Less {
                cards.swap(j - 1, j);
                j -= 1;
            }
        }
        self.cards = cards.into_iter().collect();
    }

    pub fn shuffle(&mut self, rng: &mut GameRng) {
        let mut cards: Vec<Card> = self.cards.iter().cloned().collect();
        rng.shuffle(&mut cards);
        self.cards = cards.into_iter().collect();
    }

    pub fn clear(&mut self) {
        self.cards.clear();
    }

    /// Number of cards `viewer` may see.
    #[must_use]
    pub fn visible_count(&self, viewer: PlayerId) -> usize {
        let permitted = match self.policy.visibility {
            Visibility::All => true,
            Visibility::Owner => self.owner == Some(viewer),
            Visibility::Others => self.owner != Some(viewer),
            Visibility::None => false,
        };
        if !permitted {
            return 0;
        }
        self.policy
            .visible
            .map_or(self.len(), |limit| limit.min(self.len()))
    }
}

impl std::fmt::Display for CardPile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.owner {
            Some(owner) => write!(f, "{} ({})", self.name, owner),
            None => f.write_str(&self.name),
        }
    }
}
