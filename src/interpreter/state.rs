//! Mutable play state.
//!
//! Everything operations may change during a game: the board, the
//! players, whose turn it is, the turn number, the direction of play and
//! the shuffle RNG.

use crate::core::{CardPlayer, Direction, GameRng, PlayerId, PlayerMap};
use crate::zones::GameBoard;

/// Mutable state of a running game.
#[derive(Clone, Debug)]
pub struct PlayState {
    pub board: GameBoard,
    pub players: PlayerMap<CardPlayer>,
    /// Seat whose turn it is.
    pub current: PlayerId,
    /// Starts at 1; increments whenever play passes the first seat.
    pub turn: u32,
    pub direction: Direction,
    /// Used by the `shuffle` operation.
    pub rng: GameRng,
}

impl PlayState {
    pub fn new(
        board: GameBoard,
        players: PlayerMap<CardPlayer>,
        direction: Direction,
        rng: GameRng,
    ) -> Self {
        Self {
            board,
            players,
            current: PlayerId::new(0),
            turn: 1,
            direction,
            rng,
        }
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.players.player_count()
    }

    #[must_use]
    pub fn current_player(&self) -> &CardPlayer {
        &self.players[self.current]
    }

    /// Players who have neither won nor lost.
    pub fn active_players(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.players
            .iter()
            .filter(|(_, player)| player.is_active())
            .map(|(id, _)| id)
    }

    /// First active seat after `from` in `direction`, or `from` itself if
    /// nobody else is active.
    #[must_use]
    pub fn neighbour(&self, from: PlayerId, direction: Direction) -> PlayerId {
        let count = self.player_count();
        let mut seat = from;
        for _ in 0..count {
            seat = direction.step(seat, count);
            if seat == from || self.players[seat].is_active() {
                return seat;
            }
        }
        from
    }

    /// The active player after the current one.
    #[must_use]
    pub fn next_player(&self) -> PlayerId {
        self.neighbour(self.current, self.direction)
    }

    /// The active player before the current one.
    #[must_use]
    pub fn previous_player(&self) -> PlayerId {
        self.neighbour(self.current, self.direction.reversed())
    }

    /// Pass the turn to the next active player.
    ///
    /// Players who have won or lost are skipped. The turn number grows by
    /// one for every step that lands on seat 0, skipped or not.
    pub fn advance_turn(&mut self) {
        if self.active_players().next().is_none() {
            return;
        }
        let count = self.player_count();
        let first = PlayerId::new(0);
        let mut seat = self.current;
        for _ in 0..count {
            seat = self.direction.step(seat, count);
            if seat == first {
                self.turn += 1;
            }
            if self.players[seat].is_active() {
                break;
            }
        }
        log::debug!("turn {}: {} to move", self.turn, seat);
        self.current = seat;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::PlayerStatus;
    use crate::document::{DocumentKind, RuleDocument};
    use crate::zones::BoardLayout;

    fn state(players: usize) -> PlayState {
        let doc = RuleDocument::parse(DocumentKind::Board, "b", "cardpile hand\nowner player\n")
            .unwrap();
        let layout = BoardLayout::compile(&doc).unwrap();
        let board = GameBoard::new(&layout, players);
        let seats = PlayerMap::new(players, |id| CardPlayer::new(format!("p{}", id.0), board.piles_of(id)));
        PlayState::new(board, seats, Direction::Clockwise, GameRng::new(0))
    }

    #[test]
    fn test_turn_counts_full_cycles() {
        let mut state = state(3);
        for _ in 0..7 {
            state.advance_turn();
        }
        assert_eq!(state.current, PlayerId::new(1));
        assert_eq!(state.turn, 1 + 7 / 3);
    }

    #[test]
    fn test_skips_finished_players() {
        let mut state = state(3);
        state.players[PlayerId::new(1)].status = PlayerStatus::Won;
        state.advance_turn();
        assert_eq!(state.current, PlayerId::new(2));
        assert_eq!(state.next_player(), PlayerId::new(0));
        assert_eq!(state.previous_player(), PlayerId::new(0));
    }

    #[test]
    fn test_counterclockwise() {
        let mut state = state(3);
        state.direction = Direction::Counterclockwise;
        state.advance_turn();
        assert_eq!(state.current, PlayerId::new(2));
        assert_eq!(state.turn, 1);
        state.advance_turn();
        state.advance_turn();
        assert_eq!(state.current, PlayerId::new(0));
        assert_eq!(state.turn, 2);
    }

    #[test]
    fn test_nobody_active() {
        let mut state = state(2);
        for (_, player) in state.players.iter_mut() {
            player.status = PlayerStatus::Lost;
        }
        state.advance_turn();
        assert_eq!(state.current, PlayerId::new(0));
        assert_eq!(state.turn, 1);
    }
}
