//! Recursion guard for condition evaluation.
//!
//! Holds the conditions currently being evaluated, innermost last.
//! Entering a condition already on the stack is a cycle. The engine
//! clears the guard at every top-level call boundary so a failed or
//! abandoned evaluation never leaves stale entries behind.

use crate::components::{ComponentGraph, ConditionId};
use crate::core::{RuntimeError, RuntimeResult};

#[derive(Clone, Debug, Default)]
pub struct RecursionGuard {
    stack: Vec<ConditionId>,
}

impl RecursionGuard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Push `id`, failing `InfiniteConditionalRecursion` if it is already
    /// being evaluated.
    pub fn enter(&mut self, id: ConditionId, graph: &ComponentGraph) -> RuntimeResult<()> {
        if self.stack.contains(&id) {
            let name = |id: ConditionId| {
                graph
                    .condition(id)
                    .map_or_else(|_| id.to_string(), |c| c.name.clone())
            };
            let mut chain: Vec<String> = self
                .stack
                .iter()
                .skip_while(|&&entry| entry != id)
                .map(|&entry| name(entry))
                .collect();
            chain.push(name(id));
            return Err(RuntimeError::InfiniteConditionalRecursion {
                condition: name(id),
                chain,
            });
        }
        self.stack.push(id);
        Ok(())
    }

    pub fn exit(&mut self) {
        self.stack.pop();
    }

    pub fn clear(&mut self) {
        self.stack.clear();
    }

    #[must_use]
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::Condition;

    fn graph() -> ComponentGraph {
        let mut graph = ComponentGraph::empty();
        for name in ["a", "b"] {
            graph
                .conditions
                .register(Condition {
                    name: name.to_string(),
                    statements: Vec::new(),
                    inverted: false,
                })
                .unwrap();
        }
        graph
    }

    #[test]
    fn test_detects_revisit() {
        let graph = graph();
        let mut guard = RecursionGuard::new();
        let (a, b) = (ConditionId::new(0), ConditionId::new(1));
        guard.enter(a, &graph).unwrap();
        guard.enter(b, &graph).unwrap();
        let err = guard.enter(a, &graph).unwrap_err();
        match err {
            RuntimeError::InfiniteConditionalRecursion { condition, chain } => {
                assert_eq!(condition, "a");
                assert_eq!(chain, vec!["a", "b", "a"]);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_exit_and_clear() {
        let graph = graph();
        let mut guard = RecursionGuard::new();
        let a = ConditionId::new(0);
        guard.enter(a, &graph).unwrap();
        guard.exit();
        assert!(guard.is_empty());
        guard.enter(a, &graph).unwrap();
        guard.enter(ConditionId::new(1), &graph).unwrap();
        assert_eq!(guard.depth(), 2);
        guard.clear();
        assert!(guard.enter(a, &graph).is_ok());
    }
}
