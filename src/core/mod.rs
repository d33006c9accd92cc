//! Core types shared by every layer: errors, players, RNG, configuration.

pub mod config;
pub mod error;
pub mod player;
pub mod rng;

pub use config::EngineConfig;
pub use error::{CompileError, CompileResult, RuntimeError, RuntimeResult};
pub use player::{CardPlayer, Direction, PlayerId, PlayerMap, PlayerStatus};
pub use rng::GameRng;
