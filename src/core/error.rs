//! Error types for rule compilation and interpretation.
//!
//! Two families, both non-recoverable at the point they are raised:
//!
//! - `CompileError`: the rule files could not be turned into a fully
//!   cross-validated game. Construction aborts; there is no partially
//!   usable engine.
//! - `RuntimeError`: an in-flight interpreter call hit a structural
//!   problem (wrong arity, wrong value type, unknown operand, recursion).
//!
//! Ordinary "the move is not legal right now" outcomes are `false`
//! results, never errors.

use thiserror::Error;

/// Errors raised while compiling rule documents.
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("{document}: missing keyword `{keyword}`")]
    MissingKeyword { document: String, keyword: String },

    #[error("{document}: keyword `{keyword}` has no parameters (line {line})")]
    MissingParameter {
        document: String,
        keyword: String,
        line: usize,
    },

    #[error("{document}: `{name}` is not a valid {expected}")]
    InvalidTypeReference {
        document: String,
        expected: String,
        name: String,
    },

    #[error("{document}: invalid value `{value}` for `{keyword}`")]
    InvalidParameter {
        document: String,
        keyword: String,
        value: String,
    },

    #[error("duplicate {kind} `{name}`")]
    DuplicateComponent { kind: &'static str, name: String },

    #[error("{document}: expected {expected} {what}, found {actual}")]
    CountMismatch {
        document: String,
        what: String,
        expected: usize,
        actual: usize,
    },

    #[error("condition `{condition}`: invalid statement `{statement}`: {reason}")]
    InvalidConditionalStatement {
        condition: String,
        statement: String,
        reason: String,
    },

    #[error("{kind} `{component}`: {reason}")]
    InvalidComponent {
        kind: &'static str,
        component: String,
        reason: String,
    },

    #[error("`{referenced_by}` refers to unknown {kind} `{name}`")]
    UnresolvedReference {
        kind: &'static str,
        name: String,
        referenced_by: String,
    },

    #[error("`{component}`: `{operation}` expects {expected} parameters, found {actual}")]
    InvalidNumberOfParameters {
        component: String,
        operation: String,
        expected: usize,
        actual: usize,
    },

    #[error("{document}: more than one distribution pair deals `all`")]
    MultipleDealAll { document: String },

    #[error("game `{game}` needs {min}..={max} players, got {actual}")]
    PlayerCount {
        game: String,
        min: usize,
        max: usize,
        actual: usize,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while interpreting a compiled game.
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("`{operation}` expects {expected} parameters, got {actual}")]
    InvalidNumberOfParameters {
        operation: String,
        expected: usize,
        actual: usize,
    },

    #[error("`{operation}` parameter {index}: expected {expected}, got {actual}")]
    InvalidParameterType {
        operation: String,
        index: usize,
        expected: String,
        actual: String,
    },

    #[error("`{operation}`: cannot resolve `{operand}`: {reason}")]
    InvalidOperationParameter {
        operation: String,
        operand: String,
        reason: String,
    },

    #[error("condition `{condition}` recursively references itself (via {})", chain.join(" -> "))]
    InfiniteConditionalRecursion { condition: String, chain: Vec<String> },

    #[error("invalid {kind}: {name}")]
    InvalidComponent { kind: &'static str, name: String },

    #[error("`{component}` repeated {limit} times without stopping")]
    RepeatLimitExceeded { component: String, limit: usize },

    #[error("phase `{phase}` re-entered {limit} times in a row")]
    PhaseTransitionLoop { phase: String, limit: usize },
}

pub type CompileResult<T> = Result<T, CompileError>;

pub type RuntimeResult<T> = Result<T, RuntimeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_error_message_names_document() {
        let err = CompileError::MissingKeyword {
            document: "rules.war".to_string(),
            keyword: "deck".to_string(),
        };
        assert_eq!(err.to_string(), "rules.war: missing keyword `deck`");
    }

    #[test]
    fn test_recursion_error_lists_chain() {
        let err = RuntimeError::InfiniteConditionalRecursion {
            condition: "a".to_string(),
            chain: vec!["a".to_string(), "b".to_string(), "a".to_string()],
        };
        assert!(err.to_string().contains("a -> b -> a"));
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: CompileError = io.into();
        assert!(matches!(err, CompileError::Io(_)));
    }
}
