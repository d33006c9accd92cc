//! Conditions: named boolean expressions.
//!
//! A condition is a left-to-right chain of statements. Each statement is
//! an operation invocation or a reference to another condition, and may
//! carry a trailing connective joining it to the next statement.
//! Evaluation stops early once the running result can no longer change
//! under the pending connective.

use serde::{Deserialize, Serialize};

use crate::operations::Operation;

use super::registry::{ConditionId, Named};
use super::token::ParamTokens;

/// Logic connective between two statements.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Connective {
    #[default]
    And,
    Or,
    Xor,
}

impl Connective {
    #[must_use]
    pub fn from_keyword(word: &str) -> Option<Self> {
        match word {
            "and" => Some(Connective::And),
            "or" => Some(Connective::Or),
            "xor" => Some(Connective::Xor),
            _ => None,
        }
    }

    /// Is the chain decided once the running result is `acc`?
    #[must_use]
    pub fn short_circuits(self, acc: bool) -> bool {
        match self {
            Connective::And => !acc,
            Connective::Or => acc,
            Connective::Xor => false,
        }
    }

    #[must_use]
    pub fn combine(self, acc: bool, next: bool) -> bool {
        match self {
            Connective::And => acc && next,
            Connective::Or => acc || next,
            Connective::Xor => acc ^ next,
        }
    }
}

/// What a statement evaluates.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatementTarget {
    Operation {
        operation: Operation,
        params: ParamTokens,
    },
    /// Another condition. With overrides, it is evaluated against the
    /// override values instead of the caller's.
    Condition {
        id: ConditionId,
        overrides: Option<ParamTokens>,
    },
}

/// One line of a condition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionalStatement {
    pub inverted: bool,
    pub target: StatementTarget,
    /// Joins this statement to the next one; `None` on the last line.
    pub connective: Option<Connective>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    pub name: String,
    pub statements: Vec<ConditionalStatement>,
    /// Declared as `condition not <name>`.
    pub inverted: bool,
}

impl Condition {
    /// Conditions referenced directly by this one's statements.
    pub fn references(&self) -> impl Iterator<Item = ConditionId> + '_ {
        self.statements.iter().filter_map(|s| match s.target {
            StatementTarget::Condition { id, .. } => Some(id),
            StatementTarget::Operation { .. } => None,
        })
    }
}

impl Named for Condition {
    fn name(&self) -> &str {
        &self.name
    }
}
