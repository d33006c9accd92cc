//! Operation library: the closed verb catalog and its dispatch.
//!
//! ## Key Types
//!
//! - `Operation`: primitive verb (`put`, `check-if-empty`, ...)
//! - `Signature`: static parameter/return types of a verb
//! - `Value` / `ParamKind`: typed arguments
//! - `Outcome`: boolean or integer result
//! - `OperationResolver`: applies a verb to play state
//! - `OptionList`: legal values for an open parameter

pub mod operation;
pub mod resolver;
pub mod targeting;
pub mod value;

pub use operation::{Operation, Param, ReturnKind, Signature};
pub use resolver::OperationResolver;
pub use targeting::enumerate;
pub use value::{OptionList, Outcome, ParamKind, Value};
