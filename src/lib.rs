//! # Sortrace
//!
//! `sortrace` turns classic sorting algorithms into **replayable action traces**:
//! ordered lists of discrete steps (compare, swap or move, pass complete, pivot
//! select, finished) that a viewer can apply one by one to animate the
//! algorithm.
//!
//! ## Engines
//!
//! - [`sorting`]: bubble, insertion, heap and quick sort over integers.
//! - [`merge`]: straight, natural and multi-way (fan-in 3) external merge,
//!   simulated over a logical order of row ids.
//! - [`words`]: word extraction plus quicksort and LSD radix sort under a
//!   Cyrillic alphabet ordering, and frequency counting.
//!
//! Engines are pure: they copy their input, never keep state between calls,
//! and return the whole trace at once.
//!
//! ## Usage
//!
//! ```rust
//! use sortrace::prelude::*;
//!
//! let values = [5, 3, 8, 1];
//! let actions = build_sort_actions(&values, SortAlgorithm::Quick);
//!
//! assert_eq!(actions.last().map(|a| a.kind), Some(SortActionKind::Finished));
//! assert_eq!(replay_sort(&values, &actions), vec![1, 3, 5, 8]);
//! ```
//!
//! Merging rows by a key column:
//!
//! ```rust
//! use sortrace::prelude::*;
//!
//! let table = parse_table("name;age\nIvan;31\nAnna;27\nOleg;45\n").unwrap().unwrap();
//! let actions = build_merge_actions(&table.records, MergeAlgorithm::Natural, 1, "age");
//!
//! assert_eq!(replay_merge(&table.records, &actions), vec![1, 0, 2]);
//! ```
//!
//! ## Consumers
//!
//! The [`replay`] module holds reducers that apply a trace to plain state, and
//! [`bench`] times the word sorters for charting.

pub mod action;
pub mod bench;
pub mod core;
pub mod delimited;
pub mod error;
pub mod merge;
pub mod record;
pub mod replay;
pub mod sorting;
pub mod words;

pub use error::{Result, TraceError};

pub mod prelude {
    pub use crate::action::{ExternalAction, ExternalActionKind, SortAction, SortActionKind};
    pub use crate::core::{compare_keys, cyrillic_cmp};
    pub use crate::delimited::{Table, parse_table};
    pub use crate::merge::{MergeAlgorithm, build_actions as build_merge_actions};
    pub use crate::record::Record;
    pub use crate::replay::{replay_merge, replay_sort};
    pub use crate::sorting::{SortAlgorithm, build_actions as build_sort_actions};
    pub use crate::words::{WordSortAlgorithm, count_frequencies, extract_words, sort_words};
}
