//! Engine configuration.
//!
//! Game structure (piles, phases, dealing) comes from the rule files.
//! `EngineConfig` only carries session-level knobs the rule files cannot
//! express: the shuffle seed and the safety caps on open-ended loops.

use serde::{Deserialize, Serialize};

/// Default cap for `repeat` without a count.
pub const DEFAULT_MAX_REPEAT: usize = 10_000;

/// Default cap on consecutive start-of-phase re-entries.
pub const DEFAULT_MAX_PHASE_CHAIN: usize = 64;

/// Session configuration for an `Engine`.
///
/// ```
/// use card_referee::core::EngineConfig;
///
/// let config = EngineConfig::new(42).with_max_repeat(100);
/// assert_eq!(config.seed, 42);
/// assert_eq!(config.max_repeat, 100);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Seed for every shuffle in the session.
    pub seed: u64,

    /// Upper bound on iterations of a repeat-until-false controlled action.
    pub max_repeat: usize,

    /// Upper bound on start-of-phase actions re-entering a new phase
    /// back to back.
    pub max_phase_chain: usize,
}

impl EngineConfig {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            max_repeat: DEFAULT_MAX_REPEAT,
            max_phase_chain: DEFAULT_MAX_PHASE_CHAIN,
        }
    }

    #[must_use]
    pub fn with_max_repeat(mut self, limit: usize) -> Self {
        self.max_repeat = limit;
        self
    }

    #[must_use]
    pub fn with_max_phase_chain(mut self, limit: usize) -> Self {
        self.max_phase_chain = limit;
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new(0)
    }
}
