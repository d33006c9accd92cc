//! Card piles and the game board.
//!
//! Piles are **game-configured**: a board document declares every pile,
//! its owner and its policies, and the engine instantiates them per seat.
//!
//! ## Key Types
//!
//! - `CardPile`: named, owned, ordered card sequence
//! - `PilePolicy`: visibility, placement and removal rules of a pile
//! - `BoardLayout`: compiled board document
//! - `GameBoard`: runtime arena of piles with atomic card moves

pub mod board;
pub mod pile;

pub use board::{BoardLayout, GameBoard, PileSpec};
pub use pile::{
    CardPile, Orientation, PileId, PileOwner, PilePolicy, PileSlot, Placement, Removal, Tiling,
    Visibility,
};
