//! A fully compiled game: rules, board, deck and brief.
//!
//! ```text
//! name crazy eights
//! players 2 5
//! deck standard
//! board table
//! direction-of-play clockwise
//! start-phase turn
//! ```
//!
//! `deck` and `board` name documents in the `PluginLibrary`; a `brief`
//! document with the rules' own name is attached when present.

use crate::cards::{Deck, Interner, Ranking};
use crate::compiler::ComponentCompiler;
use crate::components::{ComponentGraph, PhaseId};
use crate::core::{CompileError, CompileResult, Direction};
use crate::dealing::DealConfig;
use crate::document::{DocumentKind, PluginLibrary, RuleDocument};
use crate::zones::BoardLayout;

/// Immutable compiled game definition shared by every session.
#[derive(Clone, Debug)]
pub struct GameRules {
    name: String,
    title: String,
    min_players: usize,
    max_players: usize,
    deck: Deck,
    layout: BoardLayout,
    ranking: Ranking,
    direction: Direction,
    deal: DealConfig,
    start_phase: PhaseId,
    components: ComponentGraph,
    brief: Option<String>,
}

impl GameRules {
    /// Compile the rules document `name` and everything it references.
    pub fn compile(library: &PluginLibrary, name: &str) -> CompileResult<Self> {
        let rules = library.require(DocumentKind::Rules, name, "plugin library")?;
        let referrer = rules.identity();
        let deck_name = rules.check_params_for("deck")?;
        let board_name = rules.check_params_for("board")?;
        let deck = library.require(DocumentKind::Deck, deck_name, &referrer)?;
        let board = library.require(DocumentKind::Board, board_name, &referrer)?;
        let brief = library.get(DocumentKind::Brief, rules.name());
        Self::from_documents(rules, deck, board, brief)
    }

    /// Compile from documents already in hand.
    pub fn from_documents(
        rules: &RuleDocument,
        deck: &RuleDocument,
        board: &RuleDocument,
        brief: Option<&RuleDocument>,
    ) -> CompileResult<Self> {
        let document = rules.identity();
        let invalid = |keyword: &str, value: &str| CompileError::InvalidParameter {
            document: document.clone(),
            keyword: keyword.to_string(),
            value: value.to_string(),
        };

        let mut interner = Interner::new();
        let deck = Deck::compile(deck, &mut interner)?;
        let layout = BoardLayout::compile(board)?;

        let players = rules.check_params_for("players")?;
        let counts: Vec<usize> = players
            .split_whitespace()
            .map(|n| n.parse().map_err(|_| invalid("players", players)))
            .collect::<CompileResult<_>>()?;
        let (min_players, max_players) = match counts.as_slice() {
            [n] => (*n, *n),
            [min, max] => (*min, *max),
            _ => return Err(invalid("players", players)),
        };
        if min_players == 0 || min_players > max_players || max_players > 255 {
            return Err(invalid("players", players));
        }

        let ranking = if rules.index_of("ranking").is_some() {
            Ranking::compile(&rules.divide_between("ranking", "end-ranking")?, &deck)?
        } else {
            Ranking::flat()
        };

        let direction = match rules.params_for("direction-of-play") {
            Some(word) => Direction::from_keyword(word).ok_or_else(|| invalid("direction-of-play", word))?,
            None => Direction::default(),
        };

        let deal = if rules.index_of("deal").is_some() {
            DealConfig::compile(&rules.divide_between("deal", "deal-end")?, &layout)?
        } else {
            DealConfig::default()
        };

        let components = ComponentCompiler::compile(rules, &layout)?;
        let start_phase = match rules.params_for("start-phase") {
            Some(phase) => components
                .phases()
                .lookup(phase)
                .ok_or_else(|| CompileError::UnresolvedReference {
                    kind: "phase",
                    name: phase.to_string(),
                    referenced_by: "start-phase".to_string(),
                })?,
            None if !components.phases().is_empty() => PhaseId::new(0),
            None => return Err(rules.missing_keyword("phase")),
        };

        let title = rules
            .params_for("name")
            .filter(|t| !t.is_empty())
            .unwrap_or(rules.name())
            .to_string();

        log::debug!(
            "compiled game {}: {} cards, {} piles, {}..={} players",
            document,
            deck.size(),
            layout.specs().len(),
            min_players,
            max_players
        );

        Ok(Self {
            name: rules.name().to_string(),
            title,
            min_players,
            max_players,
            deck,
            layout,
            ranking,
            direction,
            deal,
            start_phase,
            components,
            brief: brief.map(|doc| doc.lines().join("\n")),
        })
    }

    /// Document name of the rules (`crazy-eights`).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Display name from the `name` line, or the document name.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn min_players(&self) -> usize {
        self.min_players
    }

    #[must_use]
    pub fn max_players(&self) -> usize {
        self.max_players
    }

    /// Fail `PlayerCount` unless `count` is within the declared range.
    pub fn check_player_count(&self, count: usize) -> CompileResult<()> {
        if count < self.min_players || count > self.max_players {
            return Err(CompileError::PlayerCount {
                game: self.name.clone(),
                min: self.min_players,
                max: self.max_players,
                actual: count,
            });
        }
        Ok(())
    }

    #[must_use]
    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    #[must_use]
    pub fn layout(&self) -> &BoardLayout {
        &self.layout
    }

    #[must_use]
    pub fn ranking(&self) -> &Ranking {
        &self.ranking
    }

    #[must_use]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    #[must_use]
    pub fn deal(&self) -> &DealConfig {
        &self.deal
    }

    #[must_use]
    pub fn start_phase(&self) -> PhaseId {
        self.start_phase
    }

    #[must_use]
    pub fn components(&self) -> &ComponentGraph {
        &self.components
    }

    /// Free-text description, case preserved.
    #[must_use]
    pub fn brief(&self) -> Option<&str> {
        self.brief.as_deref()
    }
}
