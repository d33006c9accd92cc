//! Player identification and per-player data.
//!
//! ## PlayerId
//!
//! Seat index in turn order, 0-based. Seat 0 is the first player.
//!
//! ## PlayerMap
//!
//! Per-seat storage backed by `Vec` for O(1) access by `PlayerId`.
//!
//! ## CardPlayer
//!
//! A named participant: the piles it owns, the phase it is in and
//! whether it has already won or lost.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

use crate::components::PhaseId;
use crate::zones::PileId;

/// Seat index supporting 1-255 players.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(pub u8);

impl PlayerId {
    /// Create a new player ID.
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// Get the seat index (0-based).
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Iterate over all seats of a game with `player_count` players.
    ///
    /// ```
    /// use card_referee::core::PlayerId;
    ///
    /// let seats: Vec<_> = PlayerId::all(3).collect();
    /// assert_eq!(seats, vec![PlayerId::new(0), PlayerId::new(1), PlayerId::new(2)]);
    /// ```
    pub fn all(player_count: usize) -> impl Iterator<Item = PlayerId> {
        (0..player_count.min(255) as u8).map(PlayerId)
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Seat {}", self.0)
    }
}

/// Per-seat storage with O(1) access.
///
/// ```
/// use card_referee::core::{PlayerId, PlayerMap};
///
/// let mut scores: PlayerMap<i32> = PlayerMap::new(2, |_| 0);
/// scores[PlayerId::new(1)] += 3;
/// assert_eq!(scores[PlayerId::new(1)], 3);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerMap<T> {
    data: Vec<T>,
}

impl<T> PlayerMap<T> {
    /// Create a map with values from a factory function.
    ///
    /// Callers validate the player count first; the engine rejects
    /// counts outside the game's declared range before building maps.
    pub fn new(player_count: usize, factory: impl Fn(PlayerId) -> T) -> Self {
        assert!(player_count > 0, "Must have at least 1 player");
        assert!(player_count <= 255, "At most 255 players supported");

        Self {
            data: PlayerId::all(player_count).map(factory).collect(),
        }
    }

    /// Create a map from values already in seat order.
    pub fn from_vec(data: Vec<T>) -> Self {
        assert!(!data.is_empty(), "Must have at least 1 player");
        assert!(data.len() <= 255, "At most 255 players supported");
        Self { data }
    }

    /// Number of seats.
    #[must_use]
    pub fn player_count(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn get(&self, player: PlayerId) -> &T {
        &self.data[player.index()]
    }

    pub fn get_mut(&mut self, player: PlayerId) -> &mut T {
        &mut self.data[player.index()]
    }

    /// Iterate over (PlayerId, &T) pairs in seat order.
    pub fn iter(&self) -> impl Iterator<Item = (PlayerId, &T)> {
        self.data
            .iter()
            .enumerate()
            .map(|(i, v)| (PlayerId(i as u8), v))
    }

    /// Iterate over (PlayerId, &mut T) pairs in seat order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (PlayerId, &mut T)> {
        self.data
            .iter_mut()
            .enumerate()
            .map(|(i, v)| (PlayerId(i as u8), v))
    }

    /// Iterate over all seats.
    pub fn player_ids(&self) -> impl Iterator<Item = PlayerId> {
        (0..self.data.len() as u8).map(PlayerId)
    }
}

impl<T> Index<PlayerId> for PlayerMap<T> {
    type Output = T;

    fn index(&self, player: PlayerId) -> &Self::Output {
        self.get(player)
    }
}

impl<T> IndexMut<PlayerId> for PlayerMap<T> {
    fn index_mut(&mut self, player: PlayerId) -> &mut Self::Output {
        self.get_mut(player)
    }
}

/// Direction of play around the table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// Increasing seat order.
    #[default]
    Clockwise,
    Counterclockwise,
}

impl Direction {
    #[must_use]
    pub fn from_keyword(word: &str) -> Option<Self> {
        match word {
            "clockwise" => Some(Direction::Clockwise),
            "counterclockwise" => Some(Direction::Counterclockwise),
            _ => None,
        }
    }

    #[must_use]
    pub fn reversed(self) -> Self {
        match self {
            Direction::Clockwise => Direction::Counterclockwise,
            Direction::Counterclockwise => Direction::Clockwise,
        }
    }

    /// The seat one step from `seat` in this direction.
    #[must_use]
    pub fn step(self, seat: PlayerId, player_count: usize) -> PlayerId {
        let n = player_count.max(1);
        let next = match self {
            Direction::Clockwise => (seat.index() + 1) % n,
            Direction::Counterclockwise => (seat.index() + n - 1) % n,
        };
        PlayerId(next as u8)
    }
}

/// Terminal state of a player.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerStatus {
    #[default]
    Playing,
    Won,
    Lost,
}

/// A participant in a running game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardPlayer {
    /// Display name supplied by the caller.
    pub name: String,
    /// Board piles owned by this player, in board declaration order.
    pub piles: Vec<PileId>,
    /// Phase the player is in. `None` until the game starts.
    pub phase: Option<PhaseId>,
    pub status: PlayerStatus,
}

impl CardPlayer {
    pub fn new(name: impl Into<String>, piles: Vec<PileId>) -> Self {
        Self {
            name: name.into(),
            piles,
            phase: None,
            status: PlayerStatus::Playing,
        }
    }

    /// Still taking turns (has neither won nor lost).
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == PlayerStatus::Playing
    }

    /// Return to the pre-start state. Pile ownership is kept.
    pub fn reset(&mut self) {
        self.phase = None;
        self.status = PlayerStatus::Playing;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_step_wraps() {
        let cw = Direction::Clockwise;
        assert_eq!(cw.step(PlayerId::new(2), 3), PlayerId::new(0));
        let ccw = cw.reversed();
        assert_eq!(ccw.step(PlayerId::new(0), 3), PlayerId::new(2));
        assert_eq!(Direction::from_keyword("counterclockwise"), Some(ccw));
        assert_eq!(Direction::from_keyword("sideways"), None);
    }

    #[test]
    fn test_player_id_basics() {
        let p1 = PlayerId::new(1);
        assert_eq!(p1.index(), 1);
        assert_eq!(format!("{}", p1), "Seat 1");
    }

    #[test]
    fn test_player_map_from_vec() {
        let map = PlayerMap::from_vec(vec!["ann", "bob"]);
        assert_eq!(map.player_count(), 2);
        assert_eq!(map[PlayerId::new(1)], "bob");

        let ids: Vec<_> = map.player_ids().collect();
        assert_eq!(ids, vec![PlayerId::new(0), PlayerId::new(1)]);
    }

    #[test]
    fn test_player_map_iter_mut() {
        let mut map: PlayerMap<u32> = PlayerMap::new(3, |p| p.index() as u32);
        for (_, v) in map.iter_mut() {
            *v *= 10;
        }
        let pairs: Vec<_> = map.iter().map(|(p, v)| (p.index(), *v)).collect();
        assert_eq!(pairs, vec![(0, 0), (1, 10), (2, 20)]);
    }

    #[test]
    #[should_panic(expected = "Must have at least 1 player")]
    fn test_player_map_zero_players() {
        let _: PlayerMap<i32> = PlayerMap::from_vec(Vec::new());
    }

    #[test]
    fn test_card_player_reset() {
        let mut player = CardPlayer::new("ann", vec![PileId::new(2)]);
        player.phase = Some(PhaseId::new(1));
        player.status = PlayerStatus::Won;
        assert!(!player.is_active());

        player.reset();
        assert!(player.is_active());
        assert_eq!(player.phase, None);
        assert_eq!(player.piles, vec![PileId::new(2)]);
    }

    #[test]
    fn test_player_map_serialization() {
        let map = PlayerMap::from_vec(vec![PlayerStatus::Won, PlayerStatus::Lost]);
        let json = serde_json::to_string(&map).unwrap();
        let back: PlayerMap<PlayerStatus> = serde_json::from_str(&json).unwrap();
        assert_eq!(map, back);
    }
}
