//! Actions and controlled actions.

use serde::{Deserialize, Serialize};

use crate::operations::Operation;

use super::registry::{ActionId, ConditionId, ControlledId, Named};
use super::token::ParamTokens;

/// A named operation invocation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    pub name: String,
    pub description: Option<String>,
    pub operation: Operation,
    pub params: ParamTokens,
}

impl Action {
    /// Number of parameters left to the caller.
    #[must_use]
    pub fn open_params(&self) -> usize {
        self.params.iter().filter(|t| t.is_placeholder()).count()
    }
}

impl Named for Action {
    fn name(&self) -> &str {
        &self.name
    }
}

/// Anything a phase or controlled action can run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Performable {
    Action(ActionId),
    Controlled(ControlledId),
}

/// How often a controlled action runs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Repeat {
    #[default]
    Once,
    /// At most N times, stopping at the first repetition without effect.
    Times(u32),
    /// Until a repetition has no effect.
    UntilFalse,
}

/// A reference to a condition, optionally negated at the use site.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionRef {
    pub id: ConditionId,
    pub negated: bool,
}

/// A performable gated by a condition.
///
/// Without a condition (`allow` control line) the true branch always
/// runs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlledAction {
    pub name: String,
    pub description: Option<String>,
    pub condition: Option<ConditionRef>,
    pub on_true: Performable,
    pub on_false: Option<Performable>,
    pub repeat: Repeat,
}

impl ControlledAction {
    /// Performables this action may run, true branch first.
    pub fn branches(&self) -> impl Iterator<Item = Performable> + '_ {
        std::iter::once(self.on_true).chain(self.on_false)
    }
}

impl Named for ControlledAction {
    fn name(&self) -> &str {
        &self.name
    }
}
