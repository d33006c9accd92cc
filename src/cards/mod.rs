//! Card system: cards, decks, ranking and attribute interning.
//!
//! ## Key Types
//!
//! - `Card`: a physical card (id, face, optional group)
//! - `Deck`: immutable catalog compiled from a deck document, plus a
//!   shuffled deal cursor
//! - `Ranking`: face/group tiers used by rank comparisons
//! - `Interner`: per-compilation cache sharing one allocation per
//!   attribute name

pub mod card;
pub mod deck;
pub mod intern;
pub mod ranking;

pub use card::{Card, CardId};
pub use deck::Deck;
pub use intern::Interner;
pub use ranking::Ranking;
