//! Compiled games and their outcomes.
//!
//! `GameRules` ties a rules document to the deck, board and brief it
//! references and compiles all of them at once. Engines are built from
//! `GameRules`; the rules never change once compiled.

pub mod game;
pub mod outcome;

pub use game::GameRules;
pub use outcome::GameResult;
