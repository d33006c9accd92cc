//! Phases and the actions they allow.

use serde::{Deserialize, Serialize};

use super::action::{ConditionRef, Performable};
use super::registry::Named;

/// An action offered to the player while in a phase.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllowedAction {
    pub action: Performable,
    /// Offered only while this holds.
    pub precondition: Option<ConditionRef>,
    /// Run after the action whether or not it took effect.
    pub responses: Vec<Performable>,
}

/// A named game state with start, allowed and end actions.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phase {
    pub name: String,
    /// Run when a player enters the phase.
    pub start: Vec<Performable>,
    pub allowed: Vec<AllowedAction>,
    /// Run after an effective action that leaves player and phase unchanged.
    pub end: Vec<Performable>,
}

impl Named for Phase {
    fn name(&self) -> &str {
        &self.name
    }
}
