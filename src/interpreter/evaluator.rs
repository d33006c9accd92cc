//! Condition evaluation and performable execution.
//!
//! Conditions evaluate statement by statement, left to right. Each
//! statement is an operation dispatch or a nested condition; the running
//! result combines with the next statement through the previous
//! statement's connective, and evaluation stops as soon as that
//! connective makes the rest irrelevant. Nested conditions go through the
//! `RecursionGuard`, so a cycle fails instead of overflowing the stack.
//!
//! Performables execute recursively: actions dispatch their operation,
//! controlled actions evaluate their condition, pick a branch and repeat.

use crate::cards::Ranking;
use crate::components::{
    ComponentGraph, ConditionId, ConditionRef, ConditionalStatement, Connective, ControlledAction,
    ControlledId, ParamToken, Performable, Repeat, StatementTarget,
};
use crate::core::{RuntimeError, RuntimeResult};
use crate::operations::{Operation, OperationResolver, Outcome, Value};

use super::guard::RecursionGuard;
use super::params::ParamResolver;
use super::state::PlayState;

/// Executes compiled components against play state.
#[derive(Clone, Copy, Debug)]
pub struct Evaluator<'g> {
    graph: &'g ComponentGraph,
    ranking: &'g Ranking,
    max_repeat: usize,
}

impl<'g> Evaluator<'g> {
    pub fn new(graph: &'g ComponentGraph, ranking: &'g Ranking, max_repeat: usize) -> Self {
        Self {
            graph,
            ranking,
            max_repeat,
        }
    }

    /// Resolve `tokens` against `supplied` and dispatch `op`.
    pub fn dispatch(
        &self,
        op: Operation,
        tokens: &[ParamToken],
        supplied: &[Value],
        state: &mut PlayState,
    ) -> RuntimeResult<Outcome> {
        let args = ParamResolver::new(state, supplied, op.keyword()).arguments(op, tokens)?;
        OperationResolver::dispatch(op, &args, state, self.ranking, self.graph.phases().len())
    }

    /// Evaluate a condition with the caller's supplied values.
    pub fn condition(
        &self,
        id: ConditionId,
        supplied: &[Value],
        state: &mut PlayState,
        guard: &mut RecursionGuard,
    ) -> RuntimeResult<bool> {
        guard.enter(id, self.graph)?;
        let result = self.chain(id, supplied, state, guard);
        guard.exit();
        result
    }

    /// Evaluate a (possibly negated) condition reference.
    pub fn condition_ref(
        &self,
        condition: ConditionRef,
        supplied: &[Value],
        state: &mut PlayState,
        guard: &mut RecursionGuard,
    ) -> RuntimeResult<bool> {
        Ok(self.condition(condition.id, supplied, state, guard)? != condition.negated)
    }

    fn chain(
        &self,
        id: ConditionId,
        supplied: &[Value],
        state: &mut PlayState,
        guard: &mut RecursionGuard,
    ) -> RuntimeResult<bool> {
        let condition = self.graph.condition(id)?;
        let mut result: Option<bool> = None;
        let mut pending = Connective::And;
        for statement in &condition.statements {
            if result.is_some_and(|acc| pending.short_circuits(acc)) {
                break;
            }
            let value = self.statement(&condition.name, statement, supplied, state, guard)?;
            result = Some(match result {
                Some(acc) => pending.combine(acc, value),
                None => value,
            });
            pending = statement.connective.unwrap_or_default();
        }
        Ok(result.unwrap_or(true) != condition.inverted)
    }

    fn statement(
        &self,
        condition: &str,
        statement: &ConditionalStatement,
        supplied: &[Value],
        state: &mut PlayState,
        guard: &mut RecursionGuard,
    ) -> RuntimeResult<bool> {
        let value = match &statement.target {
            StatementTarget::Operation { operation, params } => self
                .dispatch(*operation, params, supplied, state)?
                .took_effect(),
            StatementTarget::Condition { id, overrides: None } => {
                self.condition(*id, supplied, state, guard)?
            }
            StatementTarget::Condition {
                id,
                overrides: Some(tokens),
            } => {
                let values = ParamResolver::new(state, supplied, condition).resolve_all(tokens)?;
                self.condition(*id, &values, state, guard)?
            }
        };
        Ok(value != statement.inverted)
    }

    /// Execute an action or controlled action. Returns whether it took
    /// effect.
    pub fn execute(
        &self,
        performable: Performable,
        supplied: &[Value],
        state: &mut PlayState,
        guard: &mut RecursionGuard,
    ) -> RuntimeResult<bool> {
        match performable {
            Performable::Action(id) => {
                let action = self.graph.action(id)?;
                Ok(self
                    .dispatch(action.operation, &action.params, supplied, state)?
                    .took_effect())
            }
            Performable::Controlled(id) => self.controlled(id, supplied, state, guard),
        }
    }

    /// Run a controlled action with its repetition.
    ///
    /// Repetition stops at the first run that does not take effect. The
    /// result is true if any run took effect, so a repeated action whose
    /// final run fails still counts as performed. A single run reports
    /// only its own result.
    fn controlled(
        &self,
        id: ControlledId,
        supplied: &[Value],
        state: &mut PlayState,
        guard: &mut RecursionGuard,
    ) -> RuntimeResult<bool> {
        let action = self.graph.controlled(id)?;
        let limit = match action.repeat {
            Repeat::Once => return self.branch(action, supplied, state, guard),
            Repeat::Times(n) => n as usize,
            Repeat::UntilFalse => self.max_repeat,
        };
        let mut any = false;
        for _ in 0..limit {
            if !self.branch(action, supplied, state, guard)? {
                return Ok(any);
            }
            any = true;
        }
        if action.repeat == Repeat::UntilFalse {
            return Err(RuntimeError::RepeatLimitExceeded {
                component: action.name.clone(),
                limit,
            });
        }
        Ok(any)
    }

    fn branch(
        &self,
        action: &ControlledAction,
        supplied: &[Value],
        state: &mut PlayState,
        guard: &mut RecursionGuard,
    ) -> RuntimeResult<bool> {
        let Some(condition) = action.condition else {
            return self.execute(action.on_true, supplied, state, guard);
        };
        let holds = self.condition_ref(condition, supplied, state, guard);
        guard.clear();
        match (holds?, action.on_false) {
            (true, _) => self.execute(action.on_true, supplied, state, guard),
            (false, Some(otherwise)) => self.execute(otherwise, supplied, state, guard),
            (false, None) => Ok(false),
        }
    }
}
