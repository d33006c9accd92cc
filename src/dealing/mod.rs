//! Card dealing.
//!
//! ## Key Types
//!
//! - `DealConfig`: compiled `deal … deal-end` block
//! - `DealPair` / `DealCount`: one pile and how many cards it receives
//! - `CardDealer`: resumable one-card-at-a-time distribution

pub mod config;
pub mod dealer;

pub use config::{DealConfig, DealCount, DealPair, DEFAULT_SHUFFLE_PASSES};
pub use dealer::{CardDealer, DealPhase};
