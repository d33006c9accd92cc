//! Game outcome.

use serde::{Deserialize, Serialize};

use crate::core::{CardPlayer, PlayerId, PlayerMap, PlayerStatus};

/// Result of a completed game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameResult {
    /// Single winner.
    Winner(PlayerId),
    /// Draw (no winner).
    Draw,
    /// Several players won.
    Winners(Vec<PlayerId>),
}

impl GameResult {
    /// Check if a player won.
    #[must_use]
    pub fn is_winner(&self, player: PlayerId) -> bool {
        match self {
            GameResult::Winner(p) => *p == player,
            GameResult::Winners(ps) => ps.contains(&player),
            GameResult::Draw => false,
        }
    }

    /// Outcome from player statuses, or `None` while the game goes on.
    ///
    /// The game ends once anyone has won, or when at most one player is
    /// still playing (in a game of two or more). A last player standing
    /// wins if nobody won outright.
    #[must_use]
    pub fn from_players(players: &PlayerMap<CardPlayer>) -> Option<Self> {
        let winners: Vec<PlayerId> = players
            .iter()
            .filter(|(_, p)| p.status == PlayerStatus::Won)
            .map(|(id, _)| id)
            .collect();
        let active: Vec<PlayerId> = players
            .iter()
            .filter(|(_, p)| p.is_active())
            .map(|(id, _)| id)
            .collect();

        match winners.len() {
            1 => return Some(GameResult::Winner(winners[0])),
            n if n > 1 => return Some(GameResult::Winners(winners)),
            _ => {}
        }
        match active.as_slice() {
            [] => Some(GameResult::Draw),
            [last] if players.player_count() > 1 => Some(GameResult::Winner(*last)),
            _ => None,
        }
    }
}
