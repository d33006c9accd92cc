//! Rule Document Model.
//!
//! Rule files are plain text, one directive per line. This module turns
//! raw text into `RuleDocument`s (normalized, immutable, searchable by
//! keyword) and groups them in a `PluginLibrary`.
//!
//! ## Key Types
//!
//! - `DocumentKind`: rules, board, deck or brief
//! - `RuleDocument`: normalized line sequence with keyword search,
//!   parameter extraction and sub-range slicing
//! - `KeywordOrder`: result of comparing two keywords' positions
//! - `PluginLibrary`: documents keyed by kind and name

pub mod library;
pub mod rule_document;

pub use library::PluginLibrary;
pub use rule_document::{DocumentKind, KeywordOrder, RuleDocument};
