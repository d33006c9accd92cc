//! Resumable card distribution.
//!
//! The dealer walks the deal pairs one card at a time: first the player
//! piles, then the common piles. Each call to `deal_next` moves exactly
//! one card, so a presentation layer can animate the deal.
//!
//! Player piles are dealt in one of two disciplines:
//!
//! - **collated**: one card to each player's pile in turn, round after
//!   round, until the pile's count is reached
//! - **uncollated**: a pile's full count to one player, then the next
//!
//! An exhausted deck ends the deal at once, whatever counts remain.

use serde::{Deserialize, Serialize};

use crate::cards::Deck;
use crate::core::{GameRng, PlayerId};
use crate::zones::GameBoard;

use super::config::{DealConfig, DealPair};

/// Where the dealer is in the procedure.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DealPhase {
    PlayerPiles,
    CommonPiles,
    Done,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct Cursor {
    /// Index into the current group of pairs.
    pair: usize,
    /// Position in dealing order (player piles only).
    seat: usize,
    /// Cards dealt so far for this pair: per player when uncollated,
    /// complete rounds when collated.
    dealt: u32,
}

/// Deals a shuffled deck across the board.
#[derive(Clone, Debug)]
pub struct CardDealer {
    deck: Deck,
    config: DealConfig,
    /// Seats in dealing order.
    seats: Vec<PlayerId>,
    rng: GameRng,
    phase: DealPhase,
    cursor: Cursor,
}

impl CardDealer {
    /// Create a dealer and shuffle its deck.
    pub fn new(deck: Deck, config: DealConfig, player_count: usize, rng: GameRng) -> Self {
        let first = PlayerId::new(0);
        let mut seats = vec![first];
        let mut seat = first;
        for _ in 1..player_count {
            seat = config.direction.step(seat, player_count);
            seats.push(seat);
        }
        let mut dealer = Self {
            deck,
            config,
            seats,
            rng,
            phase: DealPhase::PlayerPiles,
            cursor: Cursor::default(),
        };
        dealer.reset();
        dealer
    }

    #[must_use]
    pub fn phase(&self) -> DealPhase {
        self.phase
    }

    #[must_use]
    pub fn is_done(&self) -> bool {
        self.phase == DealPhase::Done
    }

    #[must_use]
    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    #[must_use]
    pub fn config(&self) -> &DealConfig {
        &self.config
    }

    /// Re-shuffle the deck and rewind every cursor.
    pub fn reset(&mut self) {
        self.deck.shuffle(&mut self.rng, self.config.shuffle_passes);
        self.phase = DealPhase::PlayerPiles;
        self.cursor = Cursor::default();
        self.settle();
        log::debug!(
            "dealer reset: {} cards, {} shuffle passes",
            self.deck.size(),
            self.config.shuffle_passes
        );
    }

    fn group(&self) -> &[DealPair] {
        match self.phase {
            DealPhase::PlayerPiles => &self.config.player_piles,
            DealPhase::CommonPiles => &self.config.common_piles,
            DealPhase::Done => &[],
        }
    }

    /// Advance past satisfied pairs and finished groups.
    fn settle(&mut self) {
        loop {
            if self.phase == DealPhase::Done {
                return;
            }
            let Some(pair) = self.group().get(self.cursor.pair).copied() else {
                self.phase = match self.phase {
                    DealPhase::PlayerPiles => DealPhase::CommonPiles,
                    _ => DealPhase::Done,
                };
                self.cursor = Cursor::default();
                continue;
            };
            let per_player = self.phase == DealPhase::PlayerPiles && !self.config.collate;
            if per_player && self.cursor.seat >= self.seats.len() {
                self.cursor = Cursor {
                    pair: self.cursor.pair + 1,
                    ..Cursor::default()
                };
                continue;
            }
            if !pair.count.is_satisfied(self.cursor.dealt) {
                return;
            }
            if per_player {
                self.cursor.seat += 1;
                self.cursor.dealt = 0;
            } else {
                self.cursor = Cursor {
                    pair: self.cursor.pair + 1,
                    ..Cursor::default()
                };
            }
        }
    }

    /// Move one card to its pile.
    ///
    /// Returns a description of the move, or an empty string once the
    /// deal is done.
    pub fn deal_next(&mut self, board: &mut GameBoard) -> String {
        self.settle();
        let Some(pair) = self.group().get(self.cursor.pair).copied() else {
            return String::new();
        };
        let owner = match self.phase {
            DealPhase::PlayerPiles => self.seats.get(self.cursor.seat).copied(),
            _ => None,
        };
        let target = board.find(pair.slot, owner.unwrap_or(PlayerId::new(0)));
        let (Some(pile), Some(card)) = (target, self.deck.deal()) else {
            self.phase = DealPhase::Done;
            return String::new();
        };

        let description = match owner {
            Some(player) => format!("{} to {} of {}", card, board.pile(pile).name(), player),
            None => format!("{} to {}", card, board.pile(pile).name()),
        };
        log::trace!("deal: {}", description);
        board.pile_mut(pile).add(card);

        match self.phase {
            DealPhase::PlayerPiles if self.config.collate => {
                self.cursor.seat += 1;
                if self.cursor.seat == self.seats.len() {
                    self.cursor.seat = 0;
                    self.cursor.dealt += 1;
                }
            }
            _ => self.cursor.dealt += 1,
        }
        self.settle();
        description
    }

    /// Deal until done. Returns the number of cards moved.
    pub fn deal_all(&mut self, board: &mut GameBoard) -> usize {
        let mut dealt = 0;
        while !self.deal_next(board).is_empty() {
            dealt += 1;
        }
        dealt
    }
}
