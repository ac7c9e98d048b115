//! Core of a mini-crossword puzzle generator: grid structure enumeration, a
//! pattern-indexed word dictionary, and a constrained backtracking fill
//! solver, assembled into a single `generate` operation.
//!
//! Wordlist ingestion, CLI drivers, and clue authoring are external
//! collaborators and out of scope for this crate (see SPEC_FULL.md §1).

pub mod block_set;
pub mod cell;
pub mod config;
pub mod dictionary;
pub mod puzzle;
pub mod slots;
pub mod solver;

pub use block_set::{BlockSetEnumerator, GridError};
pub use cell::Cell;
pub use config::GeneratorConfig;
pub use dictionary::{DictionaryError, PatternIndex};
pub use puzzle::{generate, generate_with_retry, Entries, Entry, GeneratorError, Puzzle};
pub use slots::{Direction, Slot};
pub use solver::SolverError;
