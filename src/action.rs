//! Action values emitted by the engines.
//!
//! An action is one observable step of an algorithm. Engines return them as a
//! fully built `Vec`; consumers replay that list in order.

use serde::Serialize;

/// Kind of an in-memory sort step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SortActionKind {
    Compare,
    Swap,
    PassComplete,
    PivotSelect,
    Finished,
}

/// One step of an in-memory sort over an integer sequence.
///
/// Indices are positions in the sequence at the time of the step. Values are
/// snapshots taken at that time.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SortAction {
    pub kind: SortActionKind,
    pub index_a: Option<usize>,
    pub index_b: Option<usize>,
    pub value_a: Option<i64>,
    pub value_b: Option<i64>,
    pub message: String,
    pub pass_number: Option<usize>,
}

impl SortAction {
    pub fn new(kind: SortActionKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            index_a: None,
            index_b: None,
            value_a: None,
            value_b: None,
            message: message.into(),
            pass_number: None,
        }
    }

    /// A step involving two positions and their current values.
    pub fn pair(
        kind: SortActionKind,
        (index_a, index_b): (usize, usize),
        (value_a, value_b): (i64, i64),
        message: impl Into<String>,
    ) -> Self {
        Self {
            index_a: Some(index_a),
            index_b: Some(index_b),
            value_a: Some(value_a),
            value_b: Some(value_b),
            ..Self::new(kind, message)
        }
    }

    #[must_use]
    pub fn with_index_a(mut self, index: usize) -> Self {
        self.index_a = Some(index);
        self
    }

    #[must_use]
    pub fn with_index_b(mut self, index: usize) -> Self {
        self.index_b = Some(index);
        self
    }

    #[must_use]
    pub fn with_value_a(mut self, value: i64) -> Self {
        self.value_a = Some(value);
        self
    }

    #[must_use]
    pub fn with_pass_number(mut self, pass: usize) -> Self {
        self.pass_number = Some(pass);
        self
    }
}

/// Kind of an external merge step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExternalActionKind {
    Compare,
    Move,
    PassComplete,
    Finished,
}

/// One step of a simulated external merge.
///
/// Records are addressed by their stable id (`row_id_*`), never by position:
/// positions shift as moves rearrange the logical order. `source_index` and
/// `target_index` are positions at the time of a move.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ExternalAction {
    pub kind: ExternalActionKind,
    pub row_id_a: Option<usize>,
    pub row_id_b: Option<usize>,
    pub source_index: Option<usize>,
    pub target_index: Option<usize>,
    /// Key snapshot (compare) or row preview (move).
    pub value_a: Option<String>,
    pub value_b: Option<String>,
    pub message: String,
    pub pass_number: Option<usize>,
    /// Run length merged by a straight or multi-way pass.
    pub run_size: Option<usize>,
    /// Runs detected at the start of a natural pass.
    pub run_count: Option<usize>,
}

impl ExternalAction {
    pub fn new(kind: ExternalActionKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            row_id_a: None,
            row_id_b: None,
            source_index: None,
            target_index: None,
            value_a: None,
            value_b: None,
            message: message.into(),
            pass_number: None,
            run_size: None,
            run_count: None,
        }
    }

    pub fn compare(
        (row_id_a, row_id_b): (usize, usize),
        (key_a, key_b): (&str, &str),
        message: impl Into<String>,
    ) -> Self {
        Self {
            row_id_a: Some(row_id_a),
            row_id_b: Some(row_id_b),
            value_a: Some(key_a.to_string()),
            value_b: Some(key_b.to_string()),
            ..Self::new(ExternalActionKind::Compare, message)
        }
    }

    pub fn relocate(
        row_id: usize,
        source_index: usize,
        target_index: usize,
        preview: String,
        message: impl Into<String>,
    ) -> Self {
        Self {
            row_id_a: Some(row_id),
            source_index: Some(source_index),
            target_index: Some(target_index),
            value_a: Some(preview),
            ..Self::new(ExternalActionKind::Move, message)
        }
    }

    pub fn pass_complete(pass: usize, message: impl Into<String>) -> Self {
        Self {
            pass_number: Some(pass),
            ..Self::new(ExternalActionKind::PassComplete, message)
        }
    }

    #[must_use]
    pub fn with_run_size(mut self, run_size: usize) -> Self {
        self.run_size = Some(run_size);
        self
    }

    #[must_use]
    pub fn with_run_count(mut self, run_count: usize) -> Self {
        self.run_count = Some(run_count);
        self
    }
}
