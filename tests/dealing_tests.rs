//! Dealer behaviour: declared counts, "all", exhaustion and conservation.

use std::sync::Arc;

use proptest::prelude::*;

use card_referee::cards::{Card, CardId, Deck};
use card_referee::core::{GameRng, PlayerId};
use card_referee::dealing::{CardDealer, DealConfig, DealCount, DealPair, DealPhase};
use card_referee::document::{DocumentKind, RuleDocument};
use card_referee::zones::{BoardLayout, GameBoard};

fn layout() -> BoardLayout {
    let doc = RuleDocument::parse(
        DocumentKind::Board,
        "table",
        "cardpile hand\nowner player\ncardpile draw\ncardpile discard\n",
    )
    .unwrap();
    BoardLayout::compile(&doc).unwrap()
}

fn deck(size: u16) -> Deck {
    let cards = (0..size)
        .map(|i| Card::new(CardId::new(i), Arc::from(format!("f{}", i % 13).as_str()), None))
        .collect();
    Deck::from_cards("test", cards)
}

fn deal_block(layout: &BoardLayout, text: &str) -> DealConfig {
    let block = RuleDocument::parse(DocumentKind::Rules, "game", text).unwrap();
    DealConfig::compile(&block, layout).unwrap()
}

fn size_of(board: &GameBoard, layout: &BoardLayout, name: &str, owner: PlayerId) -> usize {
    let id = board.find(layout.slot(name).unwrap(), owner).unwrap();
    board.pile(id).len()
}

#[test]
fn test_hand_five_draw_all() {
    let layout = layout();
    let config = deal_block(&layout, "player-piles hand 5\ncommon-piles draw all\n");
    let mut board = GameBoard::new(&layout, 2);
    let mut dealer = CardDealer::new(deck(52), config, 2, GameRng::new(42));

    assert_eq!(dealer.deal_all(&mut board), 52);
    assert!(dealer.is_done());
    assert_eq!(size_of(&board, &layout, "hand", PlayerId::new(0)), 5);
    assert_eq!(size_of(&board, &layout, "hand", PlayerId::new(1)), 5);
    assert_eq!(size_of(&board, &layout, "draw", PlayerId::new(0)), 42);
    assert_eq!(size_of(&board, &layout, "discard", PlayerId::new(0)), 0);
}

#[test]
fn test_exhausted_deck_stops_quietly() {
    let layout = layout();
    let config = deal_block(&layout, "player-piles hand 10\ncommon-piles discard 5\n");
    let mut board = GameBoard::new(&layout, 3);
    let mut dealer = CardDealer::new(deck(12), config, 3, GameRng::new(1));

    assert_eq!(dealer.deal_all(&mut board), 12);
    assert_eq!(dealer.phase(), DealPhase::Done);
    assert_eq!(board.total_cards(), 12);
    assert_eq!(size_of(&board, &layout, "discard", PlayerId::new(0)), 0);
}

#[test]
fn test_step_by_step_reports_moves() {
    let layout = layout();
    let config = deal_block(&layout, "shuffle 0\nplayer-piles hand 1\ncommon-piles discard 1\n");
    let mut board = GameBoard::new(&layout, 2);
    let mut dealer = CardDealer::new(deck(10), config, 2, GameRng::new(1));

    assert_eq!(dealer.phase(), DealPhase::PlayerPiles);
    let first = dealer.deal_next(&mut board);
    assert!(first.ends_with("hand of Seat 0"), "{first}");
    let second = dealer.deal_next(&mut board);
    assert!(second.ends_with("hand of Seat 1"), "{second}");
    assert_eq!(dealer.phase(), DealPhase::CommonPiles);
    let third = dealer.deal_next(&mut board);
    assert!(third.ends_with("discard"), "{third}");
    assert!(dealer.is_done());
    assert_eq!(dealer.deal_next(&mut board), "");
}

#[test]
fn test_same_seed_same_deal() {
    let layout = layout();
    let config = deal_block(&layout, "shuffle 3\nplayer-piles hand 4\n");
    let deal = |seed| {
        let mut board = GameBoard::new(&layout, 2);
        CardDealer::new(deck(20), config.clone(), 2, GameRng::new(seed)).deal_all(&mut board);
        let hand = board.find(layout.slot("hand").unwrap(), PlayerId::new(1)).unwrap();
        board.pile(hand).cards().map(Card::id).collect::<Vec<_>>()
    };
    assert_eq!(deal(5), deal(5));
}

#[test]
fn test_two_alls_rejected() {
    let layout = layout();
    let block = RuleDocument::parse(
        DocumentKind::Rules,
        "game",
        "common-piles draw all discard all\n",
    )
    .unwrap();
    assert!(DealConfig::compile(&block, &layout).is_err());
}

proptest! {
    #[test]
    fn test_dealing_conserves_cards(
        players in 1usize..6,
        deck_size in 0u16..80,
        hand in 0u32..12,
        discard in 0u32..6,
        draw_all in any::<bool>(),
        collate in any::<bool>(),
    ) {
        let layout = layout();
        let hand_slot = layout.slot("hand").unwrap();
        let draw_slot = layout.slot("draw").unwrap();
        let discard_slot = layout.slot("discard").unwrap();
        let mut common = vec![DealPair { slot: discard_slot, count: DealCount::Exactly(discard) }];
        if draw_all {
            common.push(DealPair { slot: draw_slot, count: DealCount::All });
        }
        let config = DealConfig {
            collate,
            player_piles: vec![DealPair { slot: hand_slot, count: DealCount::Exactly(hand) }],
            common_piles: common,
            ..DealConfig::default()
        };

        let mut board = GameBoard::new(&layout, players);
        let mut dealer = CardDealer::new(deck(deck_size), config, players, GameRng::new(9));
        let dealt = dealer.deal_all(&mut board);

        let declared = if draw_all {
            deck_size as usize
        } else {
            hand as usize * players + discard as usize
        };
        prop_assert_eq!(dealt, declared.min(deck_size as usize));
        prop_assert_eq!(board.total_cards(), dealt);
        prop_assert_eq!(dealer.deck().remaining(), deck_size as usize - dealt);
        for player in PlayerId::all(players) {
            let id = board.find(hand_slot, player).unwrap();
            prop_assert!(board.pile(id).len() <= hand as usize);
        }
    }
}
