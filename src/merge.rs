//! External merge engine.
//!
//! Simulates the external merge family over a logical order of record ids:
//! - **Straight merge**: bottom-up, run length 1, 2, 4, ...
//! - **Natural merge**: merges the non-decreasing runs already present.
//! - **Multi-way merge**: fan-in of [`MULTIWAY_FAN_IN`], run length ×3 per pass.
//!
//! All variants share [`merge_runs`], an in-place stable merge that moves a
//! record by removing it and reinserting it further left. Every move is
//! recorded as an [`ExternalAction`] addressed by record id.

use crate::action::{ExternalAction, ExternalActionKind};
use crate::core::compare_keys;
use crate::error::{Result, TraceError};
use crate::record::{Record, truncate};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::ops::Range;
use std::str::FromStr;

/// Runs merged together by one multi-way step.
pub const MULTIWAY_FAN_IN: usize = 3;

/// Characters of a key or preview quoted in action messages.
const MESSAGE_SNIPPET: usize = 30;

/// External merge algorithm selector.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MergeAlgorithm {
    Straight,
    Natural,
    Multiway,
}

impl MergeAlgorithm {
    pub const ALL: [MergeAlgorithm; 3] = [Self::Straight, Self::Natural, Self::Multiway];

    pub fn name(self) -> &'static str {
        match self {
            Self::Straight => "straight",
            Self::Natural => "natural",
            Self::Multiway => "multiway",
        }
    }
}

impl fmt::Display for MergeAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MergeAlgorithm {
    type Err = TraceError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|algorithm| algorithm.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| TraceError::UnknownAlgorithm { family: "merge", name: s.to_string() })
    }
}

/// Builds the full action trace of `algorithm` over `records`.
///
/// Records are keyed by the cell at `key_column` (negative indices clamp to
/// 0; rows without that column have an empty key). `column_label` names the
/// key in messages; a blank label becomes `"Column N"`.
///
/// # Examples
///
/// ```
/// use sortrace::merge::{build_actions, MergeAlgorithm};
/// use sortrace::record::Record;
/// use sortrace::replay::replay_merge;
///
/// let records = Record::from_rows(vec![vec!["b"], vec!["a"], vec!["c"]]);
/// let actions = build_actions(&records, MergeAlgorithm::Straight, 0, "letter");
///
/// assert_eq!(replay_merge(&records, &actions), vec![1, 0, 2]);
/// ```
pub fn build_actions(
    records: &[Record],
    algorithm: MergeAlgorithm,
    key_column: isize,
    column_label: &str,
) -> Vec<ExternalAction> {
    if records.is_empty() {
        return vec![ExternalAction::new(ExternalActionKind::Finished, "No rows to sort")];
    }

    let key_column = key_column.max(0).unsigned_abs();
    let label = if column_label.trim().is_empty() {
        format!("Column {}", key_column + 1)
    } else {
        column_label.to_string()
    };

    let mut merger = Merger::new(records, key_column, label);
    match algorithm {
        MergeAlgorithm::Straight => merger.straight(),
        MergeAlgorithm::Natural => merger.natural(),
        MergeAlgorithm::Multiway => merger.multiway(),
    }

    log::debug!(
        "{algorithm} merge of {} rows on column {key_column} produced {} actions",
        records.len(),
        merger.actions.len()
    );
    merger.actions
}

/// Working state of one trace build.
struct Merger<'a> {
    lookup: HashMap<usize, &'a Record>,
    keys: HashMap<usize, String>,
    order: Vec<usize>,
    label: String,
    actions: Vec<ExternalAction>,
}

impl<'a> Merger<'a> {
    fn new(records: &'a [Record], key_column: usize, label: String) -> Self {
        Self {
            lookup: records.iter().map(|r| (r.id(), r)).collect(),
            keys: records
                .iter()
                .map(|r| (r.id(), r.cell(key_column).trim().to_string()))
                .collect(),
            order: records.iter().map(Record::id).collect(),
            label,
            actions: Vec::new(),
        }
    }

    fn key(&self, id: usize) -> &str {
        self.keys.get(&id).map_or("", String::as_str)
    }

    fn straight(&mut self) {
        let n = self.order.len();
        let mut run_size = 1;
        let mut pass = 1;

        while run_size < n {
            for start in (0..n).step_by(2 * run_size) {
                let mid = (start + run_size).min(n);
                let end = (start + 2 * run_size).min(n);
                self.merge_runs(start, mid, end);
            }

            log::trace!("straight pass {pass}: runs of {run_size} merged");
            self.actions.push(
                ExternalAction::pass_complete(pass, format!("Pass #{pass}: runs of length {run_size} merged"))
                    .with_run_size(run_size),
            );
            pass += 1;
            run_size *= 2;
        }

        self.finish("Straight merge finished");
    }

    fn natural(&mut self) {
        // Each pass at least halves the run count under a consistent key
        // order; mixed numeric/text keys can break that.
        let max_passes = self.order.len();
        let mut pass = 1;

        loop {
            let runs = self.detect_runs();
            if runs.len() <= 1 {
                break;
            }
            if pass > max_passes {
                log::warn!(
                    "natural merge stopped after {max_passes} passes with {} runs left; keys on '{}' are not consistently ordered",
                    runs.len(),
                    self.label
                );
                break;
            }

            for pair in runs.chunks_exact(2) {
                self.merge_runs(pair[0].start, pair[0].end, pair[1].end);
            }

            log::trace!("natural pass {pass}: {} runs", runs.len());
            self.actions.push(
                ExternalAction::pass_complete(pass, format!("Natural merge #{pass}: {} runs merged", runs.len()))
                    .with_run_count(runs.len()),
            );
            pass += 1;
        }

        self.finish("Natural merge finished");
    }

    fn multiway(&mut self) {
        let n = self.order.len();
        let mut run_size = 1;
        let mut pass = 1;

        while run_size < n {
            for start in (0..n).step_by(MULTIWAY_FAN_IN * run_size) {
                let first_end = (start + run_size).min(n);
                let second_end = (first_end + run_size).min(n);
                let third_end = (second_end + run_size).min(n);

                if first_end > start && second_end > first_end {
                    self.merge_runs(start, first_end, second_end);
                }
                if third_end > second_end {
                    self.merge_runs(start, second_end, third_end);
                }
            }

            log::trace!("multiway pass {pass}: runs of {run_size} merged");
            self.actions.push(
                ExternalAction::pass_complete(
                    pass,
                    format!("Multi-way pass #{pass}: runs of {run_size} merged x{MULTIWAY_FAN_IN}"),
                )
                .with_run_size(run_size),
            );
            pass += 1;
            run_size *= MULTIWAY_FAN_IN;
        }

        self.finish("Multi-way merge finished");
    }

    fn finish(&mut self, message: &str) {
        self.actions.push(ExternalAction::new(ExternalActionKind::Finished, message));
    }

    /// Merges `order[start..mid]` with `order[mid..end]` in place.
    ///
    /// A right-run record smaller than the current left record is removed and
    /// reinserted before it; both runs then shift one slot right. Degenerate
    /// ranges are skipped.
    fn merge_runs(&mut self, start: usize, mut mid: usize, end: usize) {
        if start >= mid || mid >= end {
            return;
        }

        let mut left = start;
        let mut right = mid;

        while left < right && right < end {
            let left_id = self.order[left];
            let right_id = self.order[right];
            let left_key = self.key(left_id);
            let right_key = self.key(right_id);

            let compare = ExternalAction::compare(
                (left_id, right_id),
                (left_key, right_key),
                format!(
                    "Comparing \"{}\" and \"{}\" ({})",
                    truncate(left_key, MESSAGE_SNIPPET),
                    truncate(right_key, MESSAGE_SNIPPET),
                    self.label
                ),
            );
            let in_place = compare_keys(left_key, right_key) != Ordering::Greater;
            self.actions.push(compare);

            if in_place {
                left += 1;
                continue;
            }

            let preview = self.lookup.get(&right_id).map(|r| r.preview()).unwrap_or_default();
            let message = format!(
                "Moving row \"{}\" towards the start of the run",
                truncate(&preview, MESSAGE_SNIPPET)
            );
            self.actions.push(ExternalAction::relocate(right_id, right, left, preview, message));

            self.order.remove(right);
            self.order.insert(left, right_id);

            left += 1;
            right += 1;
            mid += 1;
        }

        debug_assert!(mid <= end);
    }

    /// Splits the current order into maximal non-decreasing runs.
    fn detect_runs(&self) -> Vec<Range<usize>> {
        let mut runs = Vec::new();
        if self.order.is_empty() {
            return runs;
        }

        let mut start = 0;
        for i in 1..self.order.len() {
            let previous = self.key(self.order[i - 1]);
            let current = self.key(self.order[i]);
            if compare_keys(previous, current) == Ordering::Greater {
                runs.push(start..i);
                start = i;
            }
        }

        runs.push(start..self.order.len());
        runs
    }
}
