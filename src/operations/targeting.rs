//! Option enumeration for open parameters.
//!
//! When an action leaves a parameter to the player (a placeholder such
//! as `card`), the presentation layer asks which values are legal. Card
//! options come from the parameter's source pile, filtered by that
//! pile's removal policy; without a known source pile they come from
//! every pile the current player owns.

use crate::components::PhaseId;
use crate::interpreter::PlayState;
use crate::zones::PileId;

use super::value::{ParamKind, Value};

/// Legal values of `kind`.
///
/// Free-form kinds (`string`, `integer`) have no enumerable options and
/// yield an empty list.
#[must_use]
pub fn enumerate(
    kind: ParamKind,
    source: Option<PileId>,
    state: &PlayState,
    phase_count: usize,
) -> Vec<Value> {
    match kind {
        ParamKind::Card | ParamKind::CardArray => {
            let piles = match source {
                Some(pile) => vec![pile],
                None => state.board.piles_of(state.current),
            };
            piles
                .into_iter()
                .flat_map(|pile| state.board.pile(pile).removable())
                .map(Value::Card)
                .collect()
        }
        ParamKind::Pile | ParamKind::PileArray => {
            state.board.piles().map(|(id, _)| Value::Pile(id)).collect()
        }
        ParamKind::Player => state.active_players().map(Value::Player).collect(),
        ParamKind::Phase => (0..phase_count)
            .map(|i| Value::Phase(PhaseId::new(i as u32)))
            .collect(),
        ParamKind::Text | ParamKind::Integer => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{Card, CardId};
    use crate::core::{CardPlayer, Direction, GameRng, PlayerId, PlayerMap, PlayerStatus};
    use crate::document::{DocumentKind, RuleDocument};
    use crate::zones::{BoardLayout, GameBoard};
    use std::sync::Arc;

    fn state() -> (PlayState, PileId, PileId) {
        let doc = RuleDocument::parse(
            DocumentKind::Board,
            "b",
            "cardpile hand\nowner player\ncardpile draw\nremoval top\n",
        )
        .unwrap();
        let layout = BoardLayout::compile(&doc).unwrap();
        let mut board = GameBoard::new(&layout, 2);
        let p0 = PlayerId::new(0);
        let hand = board.find(layout.slot("hand").unwrap(), p0).unwrap();
        let draw = board.find(layout.slot("draw").unwrap(), p0).unwrap();
        for i in 0..3 {
            board
                .pile_mut(hand)
                .add(Card::new(CardId::new(i), Arc::from("h"), None));
            board
                .pile_mut(draw)
                .add(Card::new(CardId::new(10 + i), Arc::from("d"), None));
        }
        let players = PlayerMap::new(2, |id| CardPlayer::new("p", board.piles_of(id)));
        (
            PlayState::new(board, players, Direction::Clockwise, GameRng::new(0)),
            hand,
            draw,
        )
    }

    #[test]
    fn test_card_options_follow_removal() {
        let (state, hand, draw) = state();
        assert_eq!(enumerate(ParamKind::Card, Some(hand), &state, 0).len(), 3);
        let top = enumerate(ParamKind::Card, Some(draw), &state, 0);
        assert_eq!(top.len(), 1);
        assert!(matches!(&top[0], Value::Card(c) if c.id() == CardId::new(12)));
    }

    #[test]
    fn test_card_options_default_to_own_piles() {
        let (state, _, _) = state();
        assert_eq!(enumerate(ParamKind::CardArray, None, &state, 0).len(), 3);
    }

    #[test]
    fn test_other_kinds() {
        let (mut state, _, _) = state();
        assert_eq!(enumerate(ParamKind::Pile, None, &state, 0).len(), 3);
        assert_eq!(enumerate(ParamKind::Phase, None, &state, 4).len(), 4);
        assert!(enumerate(ParamKind::Integer, None, &state, 4).is_empty());

        state.players[PlayerId::new(1)].status = PlayerStatus::Lost;
        let players = enumerate(ParamKind::Player, None, &state, 0);
        assert_eq!(players, vec![Value::Player(PlayerId::new(0))]);
    }
}
