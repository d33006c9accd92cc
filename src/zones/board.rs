//! Board layout compilation and the runtime game board.
//!
//! ## Board documents
//!
//! ```text
//! cardpile hand
//! owner player
//! visibility owner
//! cardpile discard
//! owner common
//! visible 1
//! board-layout
//! shape circle
//! common-piles discard
//! player-piles hand
//! ```
//!
//! `BoardLayout` is the compiled, immutable declaration. `GameBoard` is
//! the mutable arena of piles built from it for a given player count:
//! one pile per player for each player-owned declaration, one pile for
//! each common declaration.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::cards::{Card, CardId};
use crate::core::{CompileError, CompileResult, PlayerId};
use crate::document::RuleDocument;

use super::pile::{
    CardPile, Orientation, PileId, PileOwner, PilePolicy, PileSlot, Placement, Removal, Tiling,
    Visibility,
};

/// One `cardpile` declaration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PileSpec {
    pub name: String,
    pub policy: PilePolicy,
}

/// Compiled board document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoardLayout {
    name: String,
    specs: Vec<PileSpec>,
    by_name: FxHashMap<String, PileSlot>,
    /// Presentation hints from `board-layout`.
    pub shape: Option<String>,
    pub player_layout: Option<String>,
    pub dealer: Option<String>,
    common_order: Vec<PileSlot>,
    player_order: Vec<PileSlot>,
}

fn parse_word<T: Copy>(
    doc: &RuleDocument,
    keyword: &str,
    value: &str,
    words: &[(&str, T)],
) -> CompileResult<T> {
    words
        .iter()
        .find(|(word, _)| *word == value)
        .map(|(_, v)| *v)
        .ok_or_else(|| CompileError::InvalidParameter {
            document: doc.identity(),
            keyword: keyword.to_string(),
            value: value.to_string(),
        })
}

impl BoardLayout {
    /// Compile a board document.
    pub fn compile(doc: &RuleDocument) -> CompileResult<Self> {
        let openers = doc.positions("cardpile");
        if openers.is_empty() {
            return Err(doc.missing_keyword("cardpile"));
        }
        let layout_at = doc.index_of("board-layout");

        let mut layout = Self {
            name: doc.name().to_string(),
            specs: Vec::with_capacity(openers.len()),
            by_name: FxHashMap::default(),
            shape: None,
            player_layout: None,
            dealer: None,
            common_order: Vec::new(),
            player_order: Vec::new(),
        };

        for (i, &open) in openers.iter().enumerate() {
            let close = [openers.get(i + 1).copied(), layout_at.filter(|&at| at > open)]
                .into_iter()
                .flatten()
                .min()
                .unwrap_or(doc.len());
            let name = doc.check_params_at(open, "cardpile")?;
            if name.contains(['.', '@']) || name.split_whitespace().count() != 1 {
                return Err(CompileError::InvalidParameter {
                    document: doc.identity(),
                    keyword: "cardpile".to_string(),
                    value: name.to_string(),
                });
            }
            if layout.by_name.contains_key(name) {
                return Err(CompileError::DuplicateComponent {
                    kind: "cardpile",
                    name: name.to_string(),
                });
            }
            let policy = Self::compile_policy(doc, open + 1, close)?;
            let slot = PileSlot(layout.specs.len() as u16);
            layout.by_name.insert(name.to_string(), slot);
            layout.specs.push(PileSpec {
                name: name.to_string(),
                policy,
            });
        }

        if let Some(at) = layout_at {
            let end = openers
                .iter()
                .copied()
                .find(|&open| open > at)
                .unwrap_or(doc.len());
            for index in at + 1..end {
                let keyword = doc.lines()[index].split_whitespace().next().unwrap_or("");
                let value = doc.params_at(index);
                match keyword {
                    "shape" => layout.shape = Some(value.to_string()),
                    "player-layout" => layout.player_layout = Some(value.to_string()),
                    "dealer" => layout.dealer = Some(value.to_string()),
                    "common-piles" => {
                        layout.common_order = layout.resolve_list(doc, value, PileOwner::Common)?;
                    }
                    "player-piles" => {
                        layout.player_order = layout.resolve_list(doc, value, PileOwner::Player)?;
                    }
                    _ => {
                        return Err(CompileError::InvalidParameter {
                            document: doc.identity(),
                            keyword: "board-layout".to_string(),
                            value: doc.lines()[index].clone(),
                        })
                    }
                }
            }
        }

        // Piles left out of the layout lists keep declaration order after
        // the listed ones.
        for (i, spec) in layout.specs.iter().enumerate() {
            let slot = PileSlot(i as u16);
            let order = match spec.policy.owner {
                PileOwner::Common => &mut layout.common_order,
                PileOwner::Player => &mut layout.player_order,
            };
            if !order.contains(&slot) {
                order.push(slot);
            }
        }

        log::debug!(
            "compiled board `{}`: {} pile declarations",
            layout.name,
            layout.specs.len()
        );
        Ok(layout)
    }

    fn compile_policy(doc: &RuleDocument, from: usize, to: usize) -> CompileResult<PilePolicy> {
        let mut policy = PilePolicy::default();
        for index in from..to {
            let keyword = doc.lines()[index].split_whitespace().next().unwrap_or("");
            let value = doc.check_params_at(index, keyword)?;
            match keyword {
                "owner" => {
                    policy.owner = parse_word(
                        doc,
                        keyword,
                        value,
                        &[("player", PileOwner::Player), ("common", PileOwner::Common)],
                    )?;
                }
                "visibility" => {
                    policy.visibility = parse_word(
                        doc,
                        keyword,
                        value,
                        &[
                            ("all", Visibility::All),
                            ("owner", Visibility::Owner),
                            ("others", Visibility::Others),
                            ("none", Visibility::None),
                        ],
                    )?;
                }
                "visible" => {
                    let count = value.parse().map_err(|_| CompileError::InvalidParameter {
                        document: doc.identity(),
                        keyword: keyword.to_string(),
                        value: value.to_string(),
                    })?;
                    policy.visible = Some(count);
                }
                "placement" => {
                    policy.placement = parse_word(
                        doc,
                        keyword,
                        value,
                        &[("top", Placement::Top), ("bottom", Placement::Bottom)],
                    )?;
                }
                "orientation" => {
                    policy.orientation = parse_word(
                        doc,
                        keyword,
                        value,
                        &[
                            ("vertical", Orientation::Vertical),
                            ("horizontal", Orientation::Horizontal),
                        ],
                    )?;
                }
                "tiling" => {
                    policy.tiling = parse_word(
                        doc,
                        keyword,
                        value,
                        &[("stacked", Tiling::Stacked), ("spread", Tiling::Spread)],
                    )?;
                }
                "removal" => {
                    policy.removal = parse_word(
                        doc,
                        keyword,
                        value,
                        &[
                            ("any", Removal::Any),
                            ("top", Removal::Top),
                            ("none", Removal::None),
                        ],
                    )?;
                }
                _ => {
                    return Err(CompileError::InvalidParameter {
                        document: doc.identity(),
                        keyword: "cardpile".to_string(),
                        value: doc.lines()[index].clone(),
                    })
                }
            }
        }
        Ok(policy)
    }

    fn resolve_list(
        &self,
        doc: &RuleDocument,
        names: &str,
        owner: PileOwner,
    ) -> CompileResult<Vec<PileSlot>> {
        let referenced_by = format!("{} board-layout", doc.identity());
        names
            .split_whitespace()
            .map(|name| {
                let slot = self.slot(name).ok_or_else(|| CompileError::UnresolvedReference {
                    kind: "cardpile",
                    name: name.to_string(),
                    referenced_by: referenced_by.clone(),
                })?;
                if self.spec(slot).policy.owner != owner {
                    return Err(CompileError::InvalidComponent {
                        kind: "cardpile",
                        component: name.to_string(),
                        reason: "listed under the wrong owner in board-layout".to_string(),
                    });
                }
                Ok(slot)
            })
            .collect()
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn slot(&self, name: &str) -> Option<PileSlot> {
        self.by_name.get(name).copied()
    }

    #[must_use]
    pub fn spec(&self, slot: PileSlot) -> &PileSpec {
        &self.specs[slot.index()]
    }

    #[must_use]
    pub fn specs(&self) -> &[PileSpec] {
        &self.specs
    }

    /// Common piles in presentation order.
    #[must_use]
    pub fn common_piles(&self) -> &[PileSlot] {
        &self.common_order
    }

    /// Player piles in presentation order.
    #[must_use]
    pub fn player_piles(&self) -> &[PileSlot] {
        &self.player_order
    }
}

/// Mutable arena of piles for one game session.
#[derive(Clone, Debug)]
pub struct GameBoard {
    piles: Vec<CardPile>,
    index: FxHashMap<(PileSlot, Option<PlayerId>), PileId>,
    removed: Vec<Card>,
}

impl GameBoard {
    /// Instantiate every declaration of `layout` for `player_count` seats.
    pub fn new(layout: &BoardLayout, player_count: usize) -> Self {
        let mut board = Self {
            piles: Vec::new(),
            index: FxHashMap::default(),
            removed: Vec::new(),
        };
        for (i, spec) in layout.specs().iter().enumerate() {
            let slot = PileSlot(i as u16);
            match spec.policy.owner {
                PileOwner::Common => board.push(&spec.name, slot, None, spec.policy),
                PileOwner::Player => {
                    for player in PlayerId::all(player_count) {
                        board.push(&spec.name, slot, Some(player), spec.policy);
                    }
                }
            }
        }
        board
    }

    fn push(&mut self, name: &str, slot: PileSlot, owner: Option<PlayerId>, policy: PilePolicy) {
        let id = PileId::new(self.piles.len() as u16);
        self.piles.push(CardPile::new(name, slot, owner, policy));
        self.index.insert((slot, owner), id);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.piles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.piles.is_empty()
    }

    #[must_use]
    pub fn pile(&self, id: PileId) -> &CardPile {
        &self.piles[id.index()]
    }

    pub fn pile_mut(&mut self, id: PileId) -> &mut CardPile {
        &mut self.piles[id.index()]
    }

    /// Every pile with its id, in arena order.
    pub fn piles(&self) -> impl Iterator<Item = (PileId, &CardPile)> {
        self.piles
            .iter()
            .enumerate()
            .map(|(i, pile)| (PileId::new(i as u16), pile))
    }

    /// The instance of `slot` for `owner`. For common piles the owner is
    /// ignored.
    #[must_use]
    pub fn find(&self, slot: PileSlot, owner: PlayerId) -> Option<PileId> {
        self.index
            .get(&(slot, Some(owner)))
            .or_else(|| self.index.get(&(slot, None)))
            .copied()
    }

    /// Every instance of a declaration, in seat order.
    #[must_use]
    pub fn instances(&self, slot: PileSlot) -> Vec<PileId> {
        self.piles()
            .filter(|(_, pile)| pile.slot() == slot)
            .map(|(id, _)| id)
            .collect()
    }

    /// Piles owned by `player`, in declaration order.
    #[must_use]
    pub fn piles_of(&self, player: PlayerId) -> Vec<PileId> {
        self.piles()
            .filter(|(_, pile)| pile.owner() == Some(player))
            .map(|(id, _)| id)
            .collect()
    }

    /// Cards taken out of play by `remove`/`remove-all`.
    #[must_use]
    pub fn removed(&self) -> &[Card] {
        &self.removed
    }

    /// Cards on the board plus cards removed from play.
    #[must_use]
    pub fn total_cards(&self) -> usize {
        self.piles.iter().map(CardPile::len).sum::<usize>() + self.removed.len()
    }

    /// Empty every pile and the removed list.
    pub fn clear(&mut self) {
        for pile in &mut self.piles {
            pile.clear();
        }
        self.removed.clear();
    }

    /// Move `cards` from one pile to another, in order.
    ///
    /// Nothing moves unless every card is in `from` and the removal
    /// policy of `from` allows taking all of them.
    pub fn transfer(&mut self, from: PileId, to: PileId, cards: &[CardId]) -> bool {
        if cards.is_empty() || !self.pile(from).can_take(cards) {
            return false;
        }
        let moved: Vec<Card> = cards
            .iter()
            .filter_map(|&id| self.pile_mut(from).take(id))
            .collect();
        let target = self.pile_mut(to);
        for card in moved {
            target.add(card);
        }
        true
    }

    /// Move the top card. False if `from` is empty or locked.
    pub fn transfer_top(&mut self, from: PileId, to: PileId) -> bool {
        match self.pile(from).top().map(Card::id) {
            Some(top) => self.transfer(from, to, &[top]),
            None => false,
        }
    }

    /// Move the entire contents of `from`, ignoring its removal policy.
    pub fn transfer_all(&mut self, from: PileId, to: PileId) {
        if from == to {
            return;
        }
        let moved = self.pile_mut(from).take_all();
        let target = self.pile_mut(to);
        for card in moved {
            target.add(card);
        }
    }

    /// Swap `card_a` in `a` with `card_b` in `b`, each keeping the other's
    /// position.
    ///
    /// Neither pile changes unless both cards are present in their stated
    /// piles and both removal policies allow taking them.
    pub fn exchange(&mut self, a: PileId, b: PileId, card_a: CardId, card_b: CardId) -> bool {
        if !self.pile(a).can_take(&[card_a]) || !self.pile(b).can_take(&[card_b]) {
            return false;
        }
        if a == b {
            return self.pile_mut(a).swap_cards(card_a, card_b);
        }
        let (Some(first), Some(second)) = (
            self.pile(a).card(card_a).cloned(),
            self.pile(b).card(card_b).cloned(),
        ) else {
            return false;
        };
        self.pile_mut(a).replace(card_a, second);
        self.pile_mut(b).replace(card_b, first);
        true
    }

    /// Take `cards` out of play. Atomic like `transfer`.
    pub fn remove(&mut self, from: PileId, cards: &[CardId]) -> bool {
        if cards.is_empty() || !self.pile(from).can_take(cards) {
            return false;
        }
        for &id in cards {
            if let Some(card) = self.pile_mut(from).take(id) {
                self.removed.push(card);
            }
        }
        true
    }

    /// Take a pile's entire contents out of play.
    pub fn remove_all(&mut self, from: PileId) {
        let cards = self.pile_mut(from).take_all();
        self.removed.extend(cards);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::DocumentKind;
    use std::sync::Arc;

    const BOARD: &str = "
        cardpile hand
        owner player
        visibility owner
        cardpile draw
        visibility none
        removal top
        cardpile discard
        visible 1
        board-layout
        shape circle
        common-piles discard draw
        player-piles hand
    ";

    fn layout(text: &str) -> CompileResult<BoardLayout> {
        let doc = RuleDocument::parse(DocumentKind::Board, "test", text).unwrap();
        BoardLayout::compile(&doc)
    }

    fn card(id: u16) -> Card {
        Card::new(CardId::new(id), Arc::from(id.to_string().as_str()), None)
    }

    fn board() -> (BoardLayout, GameBoard) {
        let layout = layout(BOARD).unwrap();
        let board = GameBoard::new(&layout, 2);
        (layout, board)
    }

    #[test]
    fn test_compile_layout() {
        let layout = layout(BOARD).unwrap();
        assert_eq!(layout.specs().len(), 3);
        let hand = layout.slot("hand").unwrap();
        assert_eq!(layout.spec(hand).policy.owner, PileOwner::Player);
        assert_eq!(layout.spec(hand).policy.visibility, Visibility::Owner);
        let draw = layout.slot("draw").unwrap();
        assert_eq!(layout.spec(draw).policy.removal, Removal::Top);
        assert_eq!(layout.shape.as_deref(), Some("circle"));
        assert_eq!(
            layout.common_piles(),
            &[layout.slot("discard").unwrap(), draw]
        );
    }

    #[test]
    fn test_compile_rejects_bad_input() {
        assert!(matches!(
            layout("cardpile a\nowner nobody\n"),
            Err(CompileError::InvalidParameter { .. })
        ));
        assert!(matches!(
            layout("cardpile a\ncardpile a\n"),
            Err(CompileError::DuplicateComponent { .. })
        ));
        assert!(matches!(
            layout("cardpile a.b\n"),
            Err(CompileError::InvalidParameter { .. })
        ));
        assert!(matches!(
            layout("cardpile a\nboard-layout\ncommon-piles b\n"),
            Err(CompileError::UnresolvedReference { .. })
        ));
        assert!(matches!(
            layout("shape circle\n"),
            Err(CompileError::MissingKeyword { .. })
        ));
    }

    #[test]
    fn test_instances_per_player() {
        let (layout, board) = board();
        assert_eq!(board.len(), 4);
        let hand = layout.slot("hand").unwrap();
        assert_eq!(board.instances(hand).len(), 2);

        let p1 = PlayerId::new(1);
        let mine = board.find(hand, p1).unwrap();
        assert_eq!(board.pile(mine).owner(), Some(p1));
        assert_eq!(board.piles_of(p1), vec![mine]);

        let discard = layout.slot("discard").unwrap();
        assert_eq!(board.find(discard, p1), board.find(discard, PlayerId::new(0)));
    }

    #[test]
    fn test_transfer_is_atomic() {
        let (layout, mut board) = board();
        let hand = board.find(layout.slot("hand").unwrap(), PlayerId::new(0)).unwrap();
        let discard = board.find(layout.slot("discard").unwrap(), PlayerId::new(0)).unwrap();
        board.pile_mut(hand).add(card(1));
        board.pile_mut(hand).add(card(2));

        assert!(!board.transfer(hand, discard, &[CardId::new(1), CardId::new(9)]));
        assert_eq!(board.pile(hand).len(), 2);
        assert_eq!(board.pile(discard).len(), 0);

        assert!(board.transfer(hand, discard, &[CardId::new(2), CardId::new(1)]));
        assert_eq!(board.pile(discard).top().unwrap().id(), CardId::new(1));
        assert!(board.pile(hand).is_empty());
    }

    #[test]
    fn test_transfer_top_respects_removal() {
        let (layout, mut board) = board();
        let draw = board.find(layout.slot("draw").unwrap(), PlayerId::new(0)).unwrap();
        let discard = board.find(layout.slot("discard").unwrap(), PlayerId::new(0)).unwrap();
        board.pile_mut(draw).add(card(1));
        board.pile_mut(draw).add(card(2));

        assert!(!board.transfer(draw, discard, &[CardId::new(1)]));
        assert!(board.transfer_top(draw, discard));
        assert_eq!(board.pile(discard).top().unwrap().id(), CardId::new(2));
    }

    #[test]
    fn test_exchange() {
        let (layout, mut board) = board();
        let hand = layout.slot("hand").unwrap();
        let a = board.find(hand, PlayerId::new(0)).unwrap();
        let b = board.find(hand, PlayerId::new(1)).unwrap();
        for i in 0..3 {
            board.pile_mut(a).add(card(i));
            board.pile_mut(b).add(card(10 + i));
        }

        assert!(!board.exchange(a, b, CardId::new(1), CardId::new(1)));
        assert!(board.exchange(a, b, CardId::new(1), CardId::new(12)));
        let ids: Vec<u16> = board.pile(a).cards().map(|c| c.id().0).collect();
        assert_eq!(ids, vec![0, 12, 2]);
        let ids: Vec<u16> = board.pile(b).cards().map(|c| c.id().0).collect();
        assert_eq!(ids, vec![10, 11, 1]);
    }

    #[test]
    fn test_remove_and_clear() {
        let (layout, mut board) = board();
        let discard = board.find(layout.slot("discard").unwrap(), PlayerId::new(0)).unwrap();
        board.pile_mut(discard).add(card(1));
        board.pile_mut(discard).add(card(2));
        assert!(board.remove(discard, &[CardId::new(1)]));
        assert_eq!(board.removed().len(), 1);
        board.remove_all(discard);
        assert_eq!(board.removed().len(), 2);
        assert_eq!(board.total_cards(), 2);

        board.clear();
        assert_eq!(board.total_cards(), 0);
    }
}
