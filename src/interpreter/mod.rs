//! Runtime interpreter.
//!
//! ## Key Types
//!
//! - `Engine`: a game session; deals, enumerates allowed actions and their
//!   options, performs actions and drives the phase state machine
//! - `PlayState`: everything operations mutate
//! - `Evaluator`: runs actions, controlled actions and conditions
//! - `ParamResolver`: turns parameter tokens into values
//! - `RecursionGuard`: detects condition cycles
//! - `BoardView`: what one seat can see

pub mod engine;
pub mod evaluator;
pub mod guard;
pub mod params;
pub mod state;
pub mod view;

pub use engine::{AllowedActionRef, Engine};
pub use evaluator::Evaluator;
pub use guard::RecursionGuard;
pub use params::ParamResolver;
pub use state::PlayState;
pub use view::{BoardView, CardView, PileView};
