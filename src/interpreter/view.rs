//! Read-only board snapshots for a presentation layer.
//!
//! A `BoardView` shows the board the way one player sees it: every pile
//! with its size, but only the cards that player is allowed to see.

use serde::{Deserialize, Serialize};

use crate::cards::{Card, CardId};
use crate::core::PlayerId;
use crate::zones::{CardPile, PileId};

/// A visible card.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardView {
    pub id: CardId,
    pub face: String,
    pub group: Option<String>,
}

impl From<&Card> for CardView {
    fn from(card: &Card) -> Self {
        Self {
            id: card.id(),
            face: card.face().to_string(),
            group: card.group().map(str::to_string),
        }
    }
}

/// One pile as seen by a viewer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PileView {
    pub id: PileId,
    pub name: String,
    pub owner: Option<PlayerId>,
    pub size: usize,
    /// Visible cards, top first.
    pub visible: Vec<CardView>,
}

impl PileView {
    #[must_use]
    pub fn new(id: PileId, pile: &CardPile, viewer: PlayerId) -> Self {
        Self {
            id,
            name: pile.name().to_string(),
            owner: pile.owner(),
            size: pile.len(),
            visible: pile
                .cards()
                .rev()
                .take(pile.visible_count(viewer))
                .map(CardView::from)
                .collect(),
        }
    }
}

/// The whole board from one seat.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardView {
    pub viewer: PlayerId,
    pub current: PlayerId,
    pub turn: u32,
    pub piles: Vec<PileView>,
}
