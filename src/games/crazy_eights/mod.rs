//! Crazy Eights.
//!
//! - 2 to 5 players, five cards each from a 52-card deck
//! - Play a card matching the top discard by face or suit; eights are wild
//! - Otherwise draw; pass once the draw pile runs out
//! - First player to empty their hand wins

use crate::core::CompileResult;
use crate::document::{DocumentKind, PluginLibrary};
use crate::rules::GameRules;

/// Name of the rules document.
pub const NAME: &str = "crazy-eights";

pub const RULES: &str = include_str!("../../../plugins/rules.crazy-eights.txt");
pub const BOARD: &str = include_str!("../../../plugins/board.crazy-eights.txt");
pub const DECK: &str = include_str!("../../../plugins/deck.standard.txt");
pub const BRIEF: &str = include_str!("../../../plugins/brief.crazy-eights.txt");

/// A library holding every Crazy Eights document.
pub fn library() -> CompileResult<PluginLibrary> {
    let mut library = PluginLibrary::new();
    library
        .add_text(DocumentKind::Rules, NAME, RULES)?
        .add_text(DocumentKind::Board, NAME, BOARD)?
        .add_text(DocumentKind::Deck, "standard", DECK)?
        .add_text(DocumentKind::Brief, NAME, BRIEF)?;
    Ok(library)
}

/// Compiled Crazy Eights rules.
pub fn rules() -> CompileResult<GameRules> {
    GameRules::compile(&library()?, NAME)
}
