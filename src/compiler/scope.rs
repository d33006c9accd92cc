//! Names known to the compiler.
//!
//! Built by a pre-pass over the rules document before any component body
//! is compiled, so bodies may refer to components declared later.

use rustc_hash::FxHashMap;

use crate::components::{ActionId, ConditionId, ControlledId, Performable, PhaseId};
use crate::core::{CompileError, CompileResult};
use crate::zones::BoardLayout;

pub(crate) struct Scope<'a> {
    /// Identity of the rules document, for error messages.
    pub document: String,
    pub layout: &'a BoardLayout,
    pub aliases: FxHashMap<String, Vec<String>>,
    pub actions: FxHashMap<String, ActionId>,
    pub controlled: FxHashMap<String, ControlledId>,
    pub conditions: FxHashMap<String, ConditionId>,
    pub phases: FxHashMap<String, PhaseId>,
}

impl<'a> Scope<'a> {
    pub fn new(document: String, layout: &'a BoardLayout) -> Self {
        Self {
            document,
            layout,
            aliases: FxHashMap::default(),
            actions: FxHashMap::default(),
            controlled: FxHashMap::default(),
            conditions: FxHashMap::default(),
            phases: FxHashMap::default(),
        }
    }

    /// Look up an action or controlled action by name.
    pub fn performable(&self, name: &str, referenced_by: &str) -> CompileResult<Performable> {
        self.actions
            .get(name)
            .map(|&id| Performable::Action(id))
            .or_else(|| {
                self.controlled
                    .get(name)
                    .map(|&id| Performable::Controlled(id))
            })
            .ok_or_else(|| CompileError::UnresolvedReference {
                kind: "action",
                name: name.to_string(),
                referenced_by: referenced_by.to_string(),
            })
    }

    pub fn condition(&self, name: &str, referenced_by: &str) -> CompileResult<ConditionId> {
        self.conditions
            .get(name)
            .copied()
            .ok_or_else(|| CompileError::UnresolvedReference {
                kind: "condition",
                name: name.to_string(),
                referenced_by: referenced_by.to_string(),
            })
    }

    pub fn phase(&self, name: &str, referenced_by: &str) -> CompileResult<PhaseId> {
        self.phases
            .get(name)
            .copied()
            .ok_or_else(|| CompileError::UnresolvedReference {
                kind: "phase",
                name: name.to_string(),
                referenced_by: referenced_by.to_string(),
            })
    }
}
