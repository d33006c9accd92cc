//! The runtime interpreter.
//!
//! `Engine` is the aggregate root of a session: it owns the compiled
//! rules, the play state, the dealer and the recursion guard, and exposes
//! the calls a presentation layer drives a game with.
//!
//! ## Turn state machine
//!
//! After every action that takes effect the engine compares the current
//! player and their phase with what they were before the action:
//!
//! - unchanged: the phase's end actions run
//! - changed: the start actions of the (new) current phase run
//!
//! Start actions may themselves move play on (a phase that only deals
//! and ends the turn, say), so phase entry repeats until the position
//! settles, bounded by `EngineConfig::max_phase_chain`.
//!
//! ## Usage
//!
//! ```
//! use card_referee::core::EngineConfig;
//! use card_referee::games::crazy_eights;
//! use card_referee::interpreter::Engine;
//!
//! let rules = crazy_eights::rules().unwrap();
//! let mut engine = Engine::new(rules.into(), &["ann", "bob"], EngineConfig::new(7)).unwrap();
//! engine.start().unwrap();
//!
//! let allowed = engine.allowed_actions().unwrap();
//! assert!(!allowed.is_empty());
//! ```

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::components::{ParamToken, Performable, Phase, PhaseId};
use crate::core::{
    CardPlayer, CompileResult, EngineConfig, GameRng, PlayerId, PlayerMap, PlayerStatus,
    RuntimeError, RuntimeResult,
};
use crate::dealing::CardDealer;
use crate::document::PluginLibrary;
use crate::operations::{enumerate, OptionList, Value};
use crate::rules::{GameResult, GameRules};
use crate::zones::{GameBoard, PileId};

use super::evaluator::Evaluator;
use super::guard::RecursionGuard;
use super::params::ParamResolver;
use super::state::PlayState;
use super::view::{BoardView, PileView};

/// An allowed action of a phase, as offered by `allowed_actions`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllowedActionRef {
    pub phase: PhaseId,
    /// Position in the phase's allow block.
    pub index: usize,
    pub performable: Performable,
}

/// A running game session.
#[derive(Clone, Debug)]
pub struct Engine {
    rules: Arc<GameRules>,
    config: EngineConfig,
    state: PlayState,
    dealer: CardDealer,
    guard: RecursionGuard,
    started: bool,
}

impl Engine {
    /// Build a session for the named players.
    ///
    /// Fails `PlayerCount` if the game does not allow that many players.
    pub fn new<S: AsRef<str>>(
        rules: Arc<GameRules>,
        players: &[S],
        config: EngineConfig,
    ) -> CompileResult<Self> {
        rules.check_player_count(players.len())?;
        let board = GameBoard::new(rules.layout(), players.len());
        let seats = PlayerMap::from_vec(
            players
                .iter()
                .zip(PlayerId::all(players.len()))
                .map(|(name, id)| CardPlayer::new(name.as_ref(), board.piles_of(id)))
                .collect(),
        );
        let root = GameRng::new(config.seed);
        let dealer = CardDealer::new(
            rules.deck().clone(),
            rules.deal().clone(),
            players.len(),
            root.for_context("deck"),
        );
        let state = PlayState::new(board, seats, rules.direction(), root.for_context("piles"));
        log::debug!(
            "new {} session with {} players, seed {}",
            rules.name(),
            players.len(),
            config.seed
        );
        Ok(Self {
            rules,
            config,
            state,
            dealer,
            guard: RecursionGuard::new(),
            started: false,
        })
    }

    /// Compile `rules_name` from `library` and build a session.
    pub fn from_library<S: AsRef<str>>(
        library: &PluginLibrary,
        rules_name: &str,
        players: &[S],
        config: EngineConfig,
    ) -> CompileResult<Self> {
        Self::new(Arc::new(GameRules::compile(library, rules_name)?), players, config)
    }

    // === Accessors ===

    #[must_use]
    pub fn rules(&self) -> &GameRules {
        &self.rules
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub fn state(&self) -> &PlayState {
        &self.state
    }

    #[must_use]
    pub fn board(&self) -> &GameBoard {
        &self.state.board
    }

    #[must_use]
    pub fn dealer(&self) -> &CardDealer {
        &self.dealer
    }

    #[must_use]
    pub fn is_started(&self) -> bool {
        self.started
    }

    #[must_use]
    pub fn current_player(&self) -> PlayerId {
        self.state.current
    }

    #[must_use]
    pub fn players(&self) -> &PlayerMap<CardPlayer> {
        &self.state.players
    }

    #[must_use]
    pub fn player(&self, player: PlayerId) -> Option<&CardPlayer> {
        (player.index() < self.state.player_count()).then(|| &self.state.players[player])
    }

    #[must_use]
    pub fn turn_number(&self) -> u32 {
        self.state.turn
    }

    /// Phase `player` is in.
    #[must_use]
    pub fn phase_of(&self, player: PlayerId) -> Option<&Phase> {
        let id = self.player(player)?.phase?;
        self.rules.components().phase(id).ok()
    }

    /// Pile `name` as seen from `owner` (common piles ignore the owner).
    #[must_use]
    pub fn find_pile(&self, name: &str, owner: PlayerId) -> Option<PileId> {
        let slot = self.rules.layout().slot(name)?;
        self.state.board.find(slot, owner)
    }

    /// Name of the action behind an allowed-action reference.
    pub fn action_name(&self, action: AllowedActionRef) -> RuntimeResult<&str> {
        self.rules.components().performable_name(action.performable)
    }

    #[must_use]
    pub fn status(&self, player: PlayerId) -> Option<PlayerStatus> {
        self.player(player).map(|p| p.status)
    }

    /// `Some` once the game is over.
    #[must_use]
    pub fn game_result(&self) -> Option<GameResult> {
        GameResult::from_players(&self.state.players)
    }

    #[must_use]
    pub fn is_over(&self) -> bool {
        self.game_result().is_some()
    }

    /// How many cards of `pile` `viewer` can see.
    pub fn number_of_visible_cards(&self, pile: PileId, viewer: PlayerId) -> RuntimeResult<usize> {
        if pile.index() >= self.state.board.len() {
            return Err(RuntimeError::InvalidComponent {
                kind: "cardpile",
                name: pile.to_string(),
            });
        }
        Ok(self.state.board.pile(pile).visible_count(viewer))
    }

    /// Snapshot of the board as `viewer` sees it.
    #[must_use]
    pub fn board_view(&self, viewer: PlayerId) -> BoardView {
        BoardView {
            viewer,
            current: self.state.current,
            turn: self.state.turn,
            piles: self
                .state
                .board
                .piles()
                .map(|(id, pile)| PileView::new(id, pile, viewer))
                .collect(),
        }
    }

    // === Lifecycle ===

    /// Deal every card, put all players in the start phase and run its
    /// start actions for the first player.
    ///
    /// Starting an engine that already started resets it first.
    pub fn start(&mut self) -> RuntimeResult<()> {
        if self.started {
            self.reset();
        }
        let dealt = self.dealer.deal_all(&mut self.state.board);
        let start = self.rules.start_phase();
        for (_, player) in self.state.players.iter_mut() {
            player.phase = Some(start);
        }
        self.started = true;
        log::debug!("{} started: {} cards dealt", self.rules.name(), dealt);

        let rules = Arc::clone(&self.rules);
        let evaluator = self.evaluator(&rules);
        let result = self.enter_phase(&evaluator);
        self.guard.clear();
        result
    }

    /// Return to the state right after construction, with a fresh shuffle.
    pub fn reset(&mut self) {
        self.state.board.clear();
        self.dealer.reset();
        for (_, player) in self.state.players.iter_mut() {
            player.reset();
        }
        self.state.current = PlayerId::new(0);
        self.state.turn = 1;
        self.state.direction = self.rules.direction();
        self.guard.clear();
        self.started = false;
        log::debug!("{} reset", self.rules.name());
    }

    // === Turn interface ===

    /// Allowed actions of the current player.
    pub fn allowed_actions(&mut self) -> RuntimeResult<Vec<AllowedActionRef>> {
        self.allowed_actions_for(self.state.current)
    }

    /// Allowed actions of `player`'s current phase whose precondition
    /// holds, in declaration order. Empty once the game is over.
    ///
    /// Preconditions are evaluated against the current play state, so
    /// `player.current` still means the player whose turn it is.
    pub fn allowed_actions_for(&mut self, player: PlayerId) -> RuntimeResult<Vec<AllowedActionRef>> {
        self.guard.clear();
        let result = self.collect_allowed(player);
        self.guard.clear();
        result
    }

    fn collect_allowed(&mut self, player: PlayerId) -> RuntimeResult<Vec<AllowedActionRef>> {
        if !self.started || self.is_over() {
            return Ok(Vec::new());
        }
        let Some(phase_id) = self.player(player).and_then(|p| p.phase) else {
            return Ok(Vec::new());
        };
        let rules = Arc::clone(&self.rules);
        let evaluator = self.evaluator(&rules);
        let phase = rules.components().phase(phase_id)?;

        let mut allowed = Vec::new();
        for (index, entry) in phase.allowed.iter().enumerate() {
            let permitted = match entry.precondition {
                Some(condition) => {
                    let holds =
                        evaluator.condition_ref(condition, &[], &mut self.state, &mut self.guard);
                    self.guard.clear();
                    holds?
                }
                None => true,
            };
            if permitted {
                allowed.push(AllowedActionRef {
                    phase: phase_id,
                    index,
                    performable: entry.action,
                });
            }
        }
        Ok(allowed)
    }

    /// Legal values for each open parameter of an allowed action.
    ///
    /// A controlled action offers the options of the action its true
    /// branch leads to.
    pub fn options(&self, action: AllowedActionRef) -> RuntimeResult<Vec<OptionList>> {
        let graph = self.rules.components();
        let mut performable = action.performable;
        for _ in 0..=graph.controlled_actions().len() {
            let Performable::Controlled(id) = performable else {
                break;
            };
            performable = graph.controlled(id)?.on_true;
        }
        let Performable::Action(id) = performable else {
            return Ok(Vec::new());
        };

        let action = graph.action(id)?;
        let signature = action.operation.signature();
        if !signature.accepts(action.params.len()) {
            return Err(RuntimeError::InvalidNumberOfParameters {
                operation: action.operation.keyword().to_string(),
                expected: signature.arity(),
                actual: action.params.len(),
            });
        }

        let mut lists = Vec::new();
        for (index, token) in action.params.iter().enumerate() {
            let ParamToken::Placeholder(kind) = token else {
                continue;
            };
            let source = signature
                .param_at(index)
                .and_then(|param| param.source)
                .and_then(|at| action.params.get(at).map(|token| (at, token)))
                .filter(|(_, token)| !token.is_placeholder())
                .and_then(|(at, token)| {
                    ParamResolver::new(&self.state, &[], &action.name)
                        .resolve(token, at)
                        .ok()
                })
                .and_then(|value| match value {
                    Value::Pile(pile) => Some(pile),
                    _ => None,
                });
            lists.push(OptionList {
                index,
                kind: *kind,
                values: enumerate(*kind, source, &self.state, graph.phases().len()),
            });
        }
        Ok(lists)
    }

    /// Perform an allowed action with caller-supplied values for its open
    /// parameters.
    ///
    /// Response actions always run afterwards. Only if the action took
    /// effect does the turn state machine advance. Returns whether the
    /// action took effect.
    pub fn perform(&mut self, action: AllowedActionRef, values: &[Value]) -> RuntimeResult<bool> {
        self.guard.clear();
        let result = self.perform_checked(action, values);
        self.guard.clear();
        result
    }

    fn perform_checked(&mut self, action: AllowedActionRef, values: &[Value]) -> RuntimeResult<bool> {
        let rules = Arc::clone(&self.rules);
        let graph = rules.components();
        let position = self.position();
        let foreign = || RuntimeError::InvalidComponent {
            kind: "allowed action",
            name: format!("{} #{}", action.phase, action.index),
        };
        if position.1 != Some(action.phase) {
            return Err(foreign());
        }
        let entry = graph
            .phase(action.phase)?
            .allowed
            .get(action.index)
            .filter(|entry| entry.action == action.performable)
            .ok_or_else(foreign)?;
        if self.is_over() {
            return Ok(false);
        }

        let evaluator = self.evaluator(&rules);
        log::debug!(
            "{} performs {}",
            position.0,
            graph.performable_name(entry.action)?
        );
        let took_effect = evaluator.execute(entry.action, values, &mut self.state, &mut self.guard)?;
        self.guard.clear();
        for &response in &entry.responses {
            evaluator.execute(response, values, &mut self.state, &mut self.guard)?;
            self.guard.clear();
        }
        if took_effect {
            self.settle(&evaluator, position)?;
        }
        Ok(took_effect)
    }

    /// Evaluate a named condition with no supplied values.
    pub fn check_condition(&mut self, name: &str) -> RuntimeResult<bool> {
        let rules = Arc::clone(&self.rules);
        let id = rules
            .components()
            .conditions()
            .lookup(name)
            .ok_or_else(|| RuntimeError::InvalidComponent {
                kind: "condition",
                name: name.to_string(),
            })?;
        self.guard.clear();
        let result = self
            .evaluator(&rules)
            .condition(id, &[], &mut self.state, &mut self.guard);
        self.guard.clear();
        result
    }

    // === Bookkeeping ===

    fn evaluator<'r>(&self, rules: &'r GameRules) -> Evaluator<'r> {
        Evaluator::new(rules.components(), rules.ranking(), self.config.max_repeat)
    }

    fn position(&self) -> (PlayerId, Option<PhaseId>) {
        (self.state.current, self.state.current_player().phase)
    }

    fn run_all(&mut self, evaluator: &Evaluator<'_>, performables: &[Performable]) -> RuntimeResult<()> {
        for &performable in performables {
            if self.is_over() {
                break;
            }
            evaluator.execute(performable, &[], &mut self.state, &mut self.guard)?;
            self.guard.clear();
        }
        Ok(())
    }

    /// Post-action bookkeeping.
    fn settle(
        &mut self,
        evaluator: &Evaluator<'_>,
        before: (PlayerId, Option<PhaseId>),
    ) -> RuntimeResult<()> {
        if self.is_over() {
            return Ok(());
        }
        if self.position() == before {
            if let Some(phase) = before.1 {
                let rules = Arc::clone(&self.rules);
                let end = &rules.components().phase(phase)?.end;
                self.run_all(evaluator, end)?;
            }
        }
        if self.position() != before {
            self.enter_phase(evaluator)?;
        }
        Ok(())
    }

    /// Run start actions of the current phase until play settles.
    fn enter_phase(&mut self, evaluator: &Evaluator<'_>) -> RuntimeResult<()> {
        let rules = Arc::clone(&self.rules);
        let mut entries = 0;
        loop {
            if self.is_over() {
                return Ok(());
            }
            let position = self.position();
            let Some(phase_id) = position.1 else {
                return Ok(());
            };
            let phase = rules.components().phase(phase_id)?;
            log::debug!("{} enters phase {}", position.0, phase.name);
            self.run_all(evaluator, &phase.start)?;
            if self.position() == position {
                return Ok(());
            }
            entries += 1;
            if entries >= self.config.max_phase_chain {
                return Err(RuntimeError::PhaseTransitionLoop {
                    phase: phase.name.clone(),
                    limit: self.config.max_phase_chain,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{DocumentKind, RuleDocument};

    const DECK: &str = "size 6\nfaces a b c\ngroups x y\ncards all\n";
    const BOARD: &str = "
        cardpile hand
        owner player
        visibility owner
        cardpile draw
        visibility none
        removal top
        cardpile discard
        visible 1
    ";

    fn engine(rules: &str, players: usize) -> Engine {
        let rules = RuleDocument::parse(DocumentKind::Rules, "t", rules).unwrap();
        let deck = RuleDocument::parse(DocumentKind::Deck, "d", DECK).unwrap();
        let board = RuleDocument::parse(DocumentKind::Board, "b", BOARD).unwrap();
        let rules = GameRules::from_documents(&rules, &deck, &board, None).unwrap();
        let names: Vec<String> = (0..players).map(|i| format!("p{}", i)).collect();
        Engine::new(Arc::new(rules), &names, EngineConfig::new(1)).unwrap()
    }

    const TURNS: &str = "
        players 2 3
        deck d
        board b
        deal
        shuffle 0
        player-piles hand 1
        common-piles draw all
        deal-end
        action draw
        put-top pile.draw pile.hand
        action play
        put pile.hand pile.discard card
        action pass
        end-turn
        action win
        player-win player.current
        end-action
        condition draw-empty
        check-if-empty pile.draw
        end-condition
        phase main
        allow
        not draw-empty draw
        allow play
        allow win
        end-allow
        do pass
        end-phase
    ";

    #[test]
    fn test_start_deals() {
        let mut engine = engine(TURNS, 2);
        engine.start().unwrap();
        let hand = engine.find_pile("hand", PlayerId::new(1)).unwrap();
        let draw = engine.find_pile("draw", PlayerId::new(0)).unwrap();
        assert_eq!(engine.board().pile(hand).len(), 1);
        assert_eq!(engine.board().pile(draw).len(), 4);
        assert_eq!(engine.turn_number(), 1);
        assert_eq!(engine.phase_of(PlayerId::new(0)).unwrap().name, "main");
    }

    #[test]
    fn test_perform_runs_end_actions() {
        let mut engine = engine(TURNS, 2);
        engine.start().unwrap();
        let allowed = engine.allowed_actions().unwrap();
        assert_eq!(allowed.len(), 3);

        assert!(engine.perform(allowed[0], &[]).unwrap());
        assert_eq!(engine.current_player(), PlayerId::new(1));

        let allowed = engine.allowed_actions().unwrap();
        assert!(engine.perform(allowed[0], &[]).unwrap());
        assert_eq!(engine.current_player(), PlayerId::new(0));
        assert_eq!(engine.turn_number(), 2);
    }

    #[test]
    fn test_options_come_from_source_pile() {
        let mut engine = engine(TURNS, 2);
        engine.start().unwrap();
        let play = engine.allowed_actions().unwrap()[1];
        let options = engine.options(play).unwrap();
        assert_eq!(options.len(), 1);
        assert_eq!(options[0].index, 2);
        assert_eq!(options[0].values.len(), 1);

        let card = options[0].values[0].clone();
        assert!(engine.perform(play, &[card]).unwrap());
        let discard = engine.find_pile("discard", PlayerId::new(0)).unwrap();
        assert_eq!(engine.board().pile(discard).len(), 1);
    }

    #[test]
    fn test_failed_action_keeps_turn() {
        let mut engine = engine(TURNS, 2);
        engine.start().unwrap();
        let play = engine.allowed_actions().unwrap()[1];
        let draw = engine.find_pile("draw", PlayerId::new(0)).unwrap();
        let foreign = engine.board().pile(draw).top().unwrap().clone();
        assert!(!engine.perform(play, &[Value::Card(foreign)]).unwrap());
        assert_eq!(engine.current_player(), PlayerId::new(0));
    }

    #[test]
    fn test_perform_rejects_other_phase() {
        let mut engine = engine(TURNS, 2);
        engine.start().unwrap();
        let mut bogus = engine.allowed_actions().unwrap()[0];
        bogus.index = 7;
        assert!(matches!(
            engine.perform(bogus, &[]),
            Err(RuntimeError::InvalidComponent { .. })
        ));
    }

    #[test]
    fn test_win_ends_game() {
        let mut engine = engine(TURNS, 3);
        engine.start().unwrap();
        let win = engine.allowed_actions().unwrap()[2];
        assert!(engine.perform(win, &[]).unwrap());
        assert_eq!(engine.game_result(), Some(GameResult::Winner(PlayerId::new(0))));
        assert!(engine.allowed_actions().unwrap().is_empty());
        assert_eq!(engine.current_player(), PlayerId::new(0));
    }

    #[test]
    fn test_reset_restores() {
        let mut engine = engine(TURNS, 2);
        engine.start().unwrap();
        let draw = engine.allowed_actions().unwrap()[0];
        engine.perform(draw, &[]).unwrap();
        engine.reset();
        assert!(!engine.is_started());
        assert_eq!(engine.board().total_cards(), 0);
        assert_eq!(engine.turn_number(), 1);
        engine.start().unwrap();
        assert_eq!(engine.board().total_cards(), 6);
    }

    #[test]
    fn test_visibility() {
        let mut engine = engine(TURNS, 2);
        engine.start().unwrap();
        let hand0 = engine.find_pile("hand", PlayerId::new(0)).unwrap();
        let draw = engine.find_pile("draw", PlayerId::new(0)).unwrap();
        assert_eq!(engine.number_of_visible_cards(hand0, PlayerId::new(0)).unwrap(), 1);
        assert_eq!(engine.number_of_visible_cards(hand0, PlayerId::new(1)).unwrap(), 0);
        assert_eq!(engine.number_of_visible_cards(draw, PlayerId::new(0)).unwrap(), 0);
        assert!(engine
            .number_of_visible_cards(PileId::new(99), PlayerId::new(0))
            .is_err());

        let view = engine.board_view(PlayerId::new(1));
        let hand_views: Vec<_> = view.piles.iter().filter(|p| p.name == "hand").collect();
        assert_eq!(hand_views[0].visible.len(), 0);
        assert_eq!(hand_views[1].visible.len(), 1);
    }

    #[test]
    fn test_goto_unknown_phase_leaves_engine_usable() {
        let rules = "
            players 2
            deck d
            board b
            action jump
            goto phase
            action pass
            end-turn
            end-action
            phase main
            allow
            allow jump
            allow pass
            end-allow
            end-phase
        ";
        let mut engine = engine(rules, 2);
        engine.start().unwrap();
        let jump = engine.allowed_actions().unwrap()[0];
        assert!(matches!(
            engine.perform(jump, &[Value::Phase(PhaseId::new(99))]),
            Err(RuntimeError::InvalidOperationParameter { .. })
        ));
        assert_eq!(engine.phase_of(PlayerId::new(0)).unwrap().name, "main");
        assert_eq!(engine.allowed_actions().unwrap().len(), 2);
    }

    #[test]
    fn test_phase_chain_is_bounded() {
        let rules = "
            players 1
            deck d
            board b
            action go-a
            goto phase.b
            action go-b
            goto phase.a
            end-action
            phase a
            do go-a
            phase b
            do go-b
            end-phase
        ";
        let rules = RuleDocument::parse(DocumentKind::Rules, "t", rules).unwrap();
        let deck = RuleDocument::parse(DocumentKind::Deck, "d", DECK).unwrap();
        let board = RuleDocument::parse(DocumentKind::Board, "b", BOARD).unwrap();
        let rules = GameRules::from_documents(&rules, &deck, &board, None).unwrap();
        let config = EngineConfig::new(0).with_max_phase_chain(5);
        let mut engine = Engine::new(Arc::new(rules), &["solo"], config).unwrap();
        assert!(matches!(
            engine.start(),
            Err(RuntimeError::PhaseTransitionLoop { limit: 5, .. })
        ));
    }
}
