//! Bundled games.
//!
//! Each game is a set of rule documents shipped under `plugins/` and
//! compiled into the binary, so tests and demos can run without touching
//! the filesystem.

pub mod crazy_eights;
