//! Compiled rule components.
//!
//! ## Key Types
//!
//! - `Action`: a named operation invocation
//! - `Condition`: a named boolean expression of statements
//! - `ControlledAction`: a performable gated by a condition, with
//!   optional false branch and repetition
//! - `Phase` / `AllowedAction`: per-phase start, allowed and end actions
//! - `ParamToken`: a compiled operation parameter
//! - `ComponentGraph`: frozen name → component registries

pub mod action;
pub mod condition;
pub mod graph;
pub mod phase;
pub mod registry;
pub mod token;

pub use action::{Action, ConditionRef, ControlledAction, Performable, Repeat};
pub use condition::{Condition, ConditionalStatement, Connective, StatementTarget};
pub use graph::{Alias, ComponentGraph};
pub use phase::{AllowedAction, Phase};
pub use registry::{ActionId, ComponentId, ConditionId, ControlledId, Named, PhaseId, Registry};
pub use token::{OwnerRef, ParamToken, ParamTokens, PileSelector, PlayerRef};
