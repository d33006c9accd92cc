//! The compiled component graph.
//!
//! Frozen once the compiler returns: every cross-reference inside it is
//! a typed id already checked to exist.

use serde::{Deserialize, Serialize};

use crate::core::{RuntimeError, RuntimeResult};

use super::action::{Action, ControlledAction, Performable};
use super::condition::Condition;
use super::phase::Phase;
use super::registry::{ActionId, ConditionId, ControlledId, PhaseId, Registry};

/// `alias <name> <replacement…>`: token-level macro expanded at compile time.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alias {
    pub name: String,
    pub replacement: Vec<String>,
}

/// Immutable registries of every compiled component.
#[derive(Clone, Debug)]
pub struct ComponentGraph {
    pub(crate) actions: Registry<ActionId, Action>,
    pub(crate) conditions: Registry<ConditionId, Condition>,
    pub(crate) controlled: Registry<ControlledId, ControlledAction>,
    pub(crate) phases: Registry<PhaseId, Phase>,
    pub(crate) aliases: Vec<Alias>,
}

fn missing(kind: &'static str, id: impl std::fmt::Display) -> RuntimeError {
    RuntimeError::InvalidComponent {
        kind,
        name: id.to_string(),
    }
}

impl ComponentGraph {
    pub(crate) fn empty() -> Self {
        Self {
            actions: Registry::new("action"),
            conditions: Registry::new("condition"),
            controlled: Registry::new("controlled-action"),
            phases: Registry::new("phase"),
            aliases: Vec::new(),
        }
    }

    pub fn action(&self, id: ActionId) -> RuntimeResult<&Action> {
        self.actions.get(id).ok_or_else(|| missing("action", id))
    }

    pub fn condition(&self, id: ConditionId) -> RuntimeResult<&Condition> {
        self.conditions.get(id).ok_or_else(|| missing("condition", id))
    }

    pub fn controlled(&self, id: ControlledId) -> RuntimeResult<&ControlledAction> {
        self.controlled
            .get(id)
            .ok_or_else(|| missing("controlled-action", id))
    }

    pub fn phase(&self, id: PhaseId) -> RuntimeResult<&Phase> {
        self.phases.get(id).ok_or_else(|| missing("phase", id))
    }

    #[must_use]
    pub fn actions(&self) -> &Registry<ActionId, Action> {
        &self.actions
    }

    #[must_use]
    pub fn conditions(&self) -> &Registry<ConditionId, Condition> {
        &self.conditions
    }

    #[must_use]
    pub fn controlled_actions(&self) -> &Registry<ControlledId, ControlledAction> {
        &self.controlled
    }

    #[must_use]
    pub fn phases(&self) -> &Registry<PhaseId, Phase> {
        &self.phases
    }

    #[must_use]
    pub fn aliases(&self) -> &[Alias] {
        &self.aliases
    }

    /// Resolve a performable name: actions first, then controlled actions.
    #[must_use]
    pub fn performable(&self, name: &str) -> Option<Performable> {
        self.actions
            .lookup(name)
            .map(Performable::Action)
            .or_else(|| self.controlled.lookup(name).map(Performable::Controlled))
    }

    /// Declared name of a performable.
    pub fn performable_name(&self, performable: Performable) -> RuntimeResult<&str> {
        match performable {
            Performable::Action(id) => self.action(id).map(|a| a.name.as_str()),
            Performable::Controlled(id) => self.controlled(id).map(|c| c.name.as_str()),
        }
    }
}
