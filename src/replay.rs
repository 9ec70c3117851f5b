//! Trace consumers.
//!
//! Engines never hold presentation state. These reducers project a trace onto
//! plain state the way a viewer would: [`ArrayReplay`] for in-memory sorts,
//! [`OrderReplay`] for merges, and [`Playback`] to hand actions out one at a
//! time.

use crate::action::{ExternalAction, ExternalActionKind, SortAction, SortActionKind};
use crate::record::Record;
use std::collections::VecDeque;

/// Observable state of an in-memory sort being replayed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ArrayReplay {
    values: Vec<i64>,
    sorted: Vec<bool>,
    pivot: Option<usize>,
    comparing: Option<(usize, usize)>,
    finished: bool,
}

impl ArrayReplay {
    pub fn new(values: &[i64]) -> Self {
        Self {
            values: values.to_vec(),
            sorted: vec![false; values.len()],
            ..Self::default()
        }
    }

    pub fn values(&self) -> &[i64] {
        &self.values
    }

    pub fn is_sorted_at(&self, index: usize) -> bool {
        self.sorted.get(index).copied().unwrap_or(false)
    }

    pub fn pivot(&self) -> Option<usize> {
        self.pivot
    }

    pub fn comparing(&self) -> Option<(usize, usize)> {
        self.comparing
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn into_values(self) -> Vec<i64> {
        self.values
    }

    /// Applies one action. Indices outside the sequence are ignored.
    pub fn apply(&mut self, action: &SortAction) {
        let len = self.values.len();
        let valid = |index: Option<usize>| index.filter(|&i| i < len);

        self.comparing = None;
        match action.kind {
            SortActionKind::Compare => {
                if let (Some(a), Some(b)) = (valid(action.index_a), valid(action.index_b)) {
                    self.comparing = Some((a, b));
                }
            }
            SortActionKind::Swap => {
                if let (Some(a), Some(b)) = (valid(action.index_a), valid(action.index_b)) {
                    self.values.swap(a, b);
                }
            }
            SortActionKind::PassComplete => {
                if let Some(end) = valid(action.index_a) {
                    let start = action.index_b.map_or(end, |b| b.min(end));
                    self.sorted[start..=end].iter_mut().for_each(|s| *s = true);
                    if self.pivot.is_some_and(|p| (start..=end).contains(&p)) {
                        self.pivot = None;
                    }
                }
            }
            SortActionKind::PivotSelect => {
                self.pivot = valid(action.index_a);
            }
            SortActionKind::Finished => {
                self.sorted.iter_mut().for_each(|s| *s = true);
                self.pivot = None;
                self.finished = true;
            }
        }
    }
}

/// Replays `actions` against a copy of `values` and returns the final sequence.
pub fn replay_sort(values: &[i64], actions: &[SortAction]) -> Vec<i64> {
    let mut state = ArrayReplay::new(values);
    actions.iter().for_each(|action| state.apply(action));
    state.into_values()
}

/// Observable state of a merge being replayed: the current order of row ids.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OrderReplay {
    order: Vec<usize>,
    passes: usize,
    finished: bool,
}

impl OrderReplay {
    pub fn new(records: &[Record]) -> Self {
        Self {
            order: records.iter().map(Record::id).collect(),
            ..Self::default()
        }
    }

    pub fn order(&self) -> &[usize] {
        &self.order
    }

    pub fn passes(&self) -> usize {
        self.passes
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn into_order(self) -> Vec<usize> {
        self.order
    }

    /// Applies one action. Moves of unknown rows are ignored; targets past the
    /// end clamp to the last slot.
    pub fn apply(&mut self, action: &ExternalAction) {
        match action.kind {
            ExternalActionKind::Compare => {}
            ExternalActionKind::Move => {
                let (Some(row), Some(target)) = (action.row_id_a, action.target_index) else {
                    return;
                };
                let Some(current) = self.order.iter().position(|&id| id == row) else {
                    return;
                };
                let target = target.min(self.order.len() - 1);
                if current != target {
                    let id = self.order.remove(current);
                    self.order.insert(target, id);
                }
            }
            ExternalActionKind::PassComplete => self.passes += 1,
            ExternalActionKind::Finished => self.finished = true,
        }
    }
}

/// Replays `actions` over `records` and returns the final order of row ids.
pub fn replay_merge(records: &[Record], actions: &[ExternalAction]) -> Vec<usize> {
    let mut state = OrderReplay::new(records);
    actions.iter().for_each(|action| state.apply(action));
    state.into_order()
}

/// A materialized trace handed out one action at a time.
///
/// ```
/// use sortrace::replay::Playback;
///
/// let mut playback = Playback::new(vec!['a', 'b']);
/// assert_eq!(playback.remaining(), 2);
/// assert_eq!(playback.next_action(), Some('a'));
/// assert_eq!(playback.next_action(), Some('b'));
/// assert!(playback.is_finished());
/// ```
#[derive(Clone, Debug)]
pub struct Playback<A> {
    pending: VecDeque<A>,
    total: usize,
}

impl<A> Playback<A> {
    pub fn new(actions: Vec<A>) -> Self {
        Self { total: actions.len(), pending: actions.into() }
    }

    pub fn next_action(&mut self) -> Option<A> {
        self.pending.pop_front()
    }

    pub fn remaining(&self) -> usize {
        self.pending.len()
    }

    /// Number of actions already handed out.
    pub fn position(&self) -> usize {
        self.total - self.pending.len()
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn is_finished(&self) -> bool {
        self.pending.is_empty()
    }
}

impl<A> Iterator for Playback<A> {
    type Item = A;

    fn next(&mut self) -> Option<A> {
        self.next_action()
    }
}
