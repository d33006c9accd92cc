//! # card-referee
//!
//! A referee for turn-based card games whose rules live in plain-text
//! plugin files rather than code.
//!
//! ## Design Principles
//!
//! 1. **Rules Are Data**: decks, boards, actions, conditions and phases are
//!    declared in rule documents and compiled at load time. Nothing about a
//!    particular game is hardcoded.
//!
//! 2. **N-Player First**: player-owned piles are instantiated per seat and
//!    every player reference is resolved against the live seat count.
//!
//! 3. **Compile Once, Fail Early**: references between components are
//!    resolved when the rules compile. A `GameRules` value is always
//!    internally consistent.
//!
//! ## Architecture
//!
//! - **Two error domains**: `CompileError` for bad rule files,
//!   `RuntimeError` for bad calls or ill-behaved rules during play.
//!
//! - **Deterministic**: one seed drives both the deal shuffle and the
//!   `shuffle` operation, so a session can be replayed.
//!
//! ## Modules
//!
//! - `core`: errors, players, RNG, engine configuration
//! - `document`: rule documents and the plugin library
//! - `cards`: cards, decks, ranking
//! - `zones`: piles, board layout, runtime board
//! - `operations`: the operation catalog and its dispatcher
//! - `components`: compiled actions, conditions and phases
//! - `compiler`: rules document → component graph
//! - `dealing`: deal configuration and the dealer
//! - `rules`: a fully compiled game and its result
//! - `interpreter`: the runtime engine
//! - `games`: bundled rule sets

pub mod cards;
pub mod compiler;
pub mod components;
pub mod core;
pub mod dealing;
pub mod document;
pub mod games;
pub mod interpreter;
pub mod operations;
pub mod rules;
pub mod zones;

// Re-export commonly used types
pub use crate::core::{
    CardPlayer, CompileError, CompileResult, Direction, EngineConfig, GameRng, PlayerId,
    PlayerMap, PlayerStatus, RuntimeError, RuntimeResult,
};

pub use crate::document::{DocumentKind, PluginLibrary, RuleDocument};

pub use crate::cards::{Card, CardId, Deck, Ranking};

pub use crate::zones::{BoardLayout, CardPile, GameBoard, PileId};

pub use crate::operations::{Operation, OptionList, ParamKind, Value};

pub use crate::components::{ComponentGraph, Performable, PhaseId};

pub use crate::dealing::{CardDealer, DealConfig};

pub use crate::rules::{GameResult, GameRules};

pub use crate::interpreter::{AllowedActionRef, BoardView, Engine};
