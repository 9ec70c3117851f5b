//! In-memory sort engine.
//!
//! Runs bubble, insertion, heap or quick sort over a copy of an integer
//! sequence and records every comparison, swap and settled position as a
//! [`SortAction`]. The main entry point is [`build_actions`].

use crate::action::{SortAction, SortActionKind};
use crate::error::{Result, TraceError};
use rand::Rng;
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

/// Length range of a generated sequence.
pub const RANDOM_LENGTH: RangeInclusive<usize> = 6..=10;

/// Value range of a generated sequence.
pub const RANDOM_VALUES: RangeInclusive<i64> = 5..=99;

/// In-memory sort algorithm selector.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SortAlgorithm {
    Bubble,
    Insertion,
    Heap,
    Quick,
}

impl SortAlgorithm {
    pub const ALL: [SortAlgorithm; 4] = [Self::Bubble, Self::Insertion, Self::Heap, Self::Quick];

    pub fn name(self) -> &'static str {
        match self {
            Self::Bubble => "bubble",
            Self::Insertion => "insertion",
            Self::Heap => "heap",
            Self::Quick => "quick",
        }
    }
}

impl fmt::Display for SortAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SortAlgorithm {
    type Err = TraceError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|algorithm| algorithm.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| TraceError::UnknownAlgorithm { family: "sort", name: s.to_string() })
    }
}

/// Builds the full action trace of `algorithm` sorting `values`.
///
/// The caller's slice is never modified. An empty slice yields a single
/// `Finished` action. Every trace ends with exactly one `Finished`.
///
/// # Examples
///
/// ```
/// use sortrace::action::SortActionKind;
/// use sortrace::sorting::{build_actions, SortAlgorithm};
///
/// let actions = build_actions(&[2, 1], SortAlgorithm::Bubble);
/// let kinds: Vec<_> = actions.iter().map(|a| a.kind).collect();
/// assert_eq!(
///     kinds,
///     vec![
///         SortActionKind::Compare,
///         SortActionKind::Swap,
///         SortActionKind::PassComplete,
///         SortActionKind::PassComplete,
///         SortActionKind::Finished,
///     ]
/// );
/// ```
pub fn build_actions(values: &[i64], algorithm: SortAlgorithm) -> Vec<SortAction> {
    if values.is_empty() {
        return vec![SortAction::new(SortActionKind::Finished, "Sequence is empty, nothing to sort")];
    }

    let mut array = values.to_vec();
    let actions = match algorithm {
        SortAlgorithm::Bubble => bubble(&mut array),
        SortAlgorithm::Insertion => insertion(&mut array),
        SortAlgorithm::Heap => heap(&mut array),
        SortAlgorithm::Quick => quick(&mut array),
    };

    log::debug!("{algorithm} sort of {} values produced {} actions", values.len(), actions.len());
    actions
}

/// Parses manually entered integers separated by whitespace, `,` or `;`.
///
/// ```
/// use sortrace::sorting::parse_values;
///
/// assert_eq!(parse_values("5, 3;8  1").unwrap(), vec![5, 3, 8, 1]);
/// assert!(parse_values("5 x").is_err());
/// ```
pub fn parse_values(text: &str) -> Result<Vec<i64>> {
    text.split(|c: char| c.is_whitespace() || c == ',' || c == ';')
        .filter(|token| !token.is_empty())
        .map(|token| {
            token
                .parse::<i64>()
                .map_err(|_| TraceError::InvalidValue { token: token.to_string() })
        })
        .collect()
}

/// Generates a short random sequence to sort when none is given.
///
/// ```
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
/// use sortrace::sorting::random_values;
///
/// let values = random_values(&mut StdRng::seed_from_u64(7));
/// assert!((6..=10).contains(&values.len()));
/// ```
pub fn random_values<R: Rng + ?Sized>(rng: &mut R) -> Vec<i64> {
    let length = rng.random_range(RANDOM_LENGTH);
    (0..length).map(|_| rng.random_range(RANDOM_VALUES)).collect()
}

fn compare(array: &[i64], a: usize, b: usize, message: String) -> SortAction {
    SortAction::pair(SortActionKind::Compare, (a, b), (array[a], array[b]), message)
}

/// Swaps `a` and `b`, recording the values as they were before the swap.
fn swap(array: &mut [i64], a: usize, b: usize, message: impl FnOnce(i64, i64) -> String) -> SortAction {
    let (first, second) = (array[a], array[b]);
    array.swap(a, b);
    SortAction::pair(SortActionKind::Swap, (a, b), (first, second), message(first, second))
}

fn bubble(array: &mut [i64]) -> Vec<SortAction> {
    let mut actions = Vec::new();
    let n = array.len();

    for i in 0..n {
        for j in 0..n - i - 1 {
            actions.push(compare(array, j, j + 1, format!("Comparing {} and {}", array[j], array[j + 1])));

            if array[j] <= array[j + 1] {
                continue;
            }

            actions.push(swap(array, j, j + 1, |left, right| format!("Swap: {left} <-> {right}")));
        }

        let fixed = n - i - 1;
        actions.push(
            SortAction::new(SortActionKind::PassComplete, format!("Right edge (index {fixed}) is in place"))
                .with_index_a(fixed)
                .with_pass_number(i + 1),
        );
    }

    actions.push(SortAction::new(SortActionKind::Finished, "Bubble sort finished"));
    actions
}

fn insertion(array: &mut [i64]) -> Vec<SortAction> {
    let mut actions = Vec::new();
    let n = array.len();

    for i in 1..n {
        let mut j = i;
        while j > 0 {
            let (left, right) = (j - 1, j);
            actions.push(compare(
                array,
                left,
                right,
                format!("Checking whether {} belongs left of {}", array[right], array[left]),
            ));

            if array[left] <= array[right] {
                break;
            }

            actions.push(swap(array, left, right, |first, second| {
                format!("Shifting {second} left past {first}")
            }));
            j -= 1;
        }

        actions.push(
            SortAction::new(SortActionKind::PassComplete, format!("Elements 0..={i} are in order"))
                .with_index_a(i)
                .with_index_b(0)
                .with_pass_number(i),
        );
    }

    actions.push(SortAction::new(SortActionKind::Finished, "Insertion sort finished"));
    actions
}

fn heap(array: &mut [i64]) -> Vec<SortAction> {
    let mut actions = Vec::new();
    let n = array.len();

    for root in (0..n / 2).rev() {
        sift_down(array, n, root, &mut actions);
    }

    for end in (1..n).rev() {
        actions.push(swap(array, 0, end, |max, last| {
            format!("Swapping maximum {max} with last unsorted {last}")
        }));
        actions.push(
            SortAction::new(SortActionKind::PassComplete, format!("Tail from index {end} is in place"))
                .with_index_a(end),
        );
        sift_down(array, end, 0, &mut actions);
    }

    actions.push(SortAction::new(SortActionKind::PassComplete, "Heap root is in place").with_index_a(0));
    actions.push(SortAction::new(SortActionKind::Finished, "Heap sort finished"));
    actions
}

/// Restores the max-heap property below `root` within `array[..length]`.
fn sift_down(array: &mut [i64], length: usize, mut root: usize, actions: &mut Vec<SortAction>) {
    loop {
        let mut largest = root;
        let left = 2 * root + 1;
        let right = left + 1;

        if left < length {
            actions.push(compare(
                array,
                root,
                left,
                format!("Comparing parent {} with left child {}", array[root], array[left]),
            ));
            if array[left] > array[largest] {
                largest = left;
            }
        }

        if right < length {
            actions.push(compare(
                array,
                largest,
                right,
                format!("Comparing current maximum {} with right child {}", array[largest], array[right]),
            ));
            if array[right] > array[largest] {
                largest = right;
            }
        }

        if largest == root {
            return;
        }

        actions.push(swap(array, root, largest, |parent, child| {
            format!("Lifting {child} up, swapping with {parent}")
        }));
        root = largest;
    }
}

fn quick(array: &mut [i64]) -> Vec<SortAction> {
    let mut actions = Vec::new();
    quick_sort(array, 0, array.len(), &mut actions);
    actions.push(SortAction::new(SortActionKind::Finished, "Quick sort finished"));
    actions
}

/// Sorts `array[low..high]`, left partition first.
fn quick_sort(array: &mut [i64], low: usize, high: usize, actions: &mut Vec<SortAction>) {
    match high.saturating_sub(low) {
        0 => {}
        1 => actions.push(
            SortAction::new(SortActionKind::PassComplete, format!("Element at index {low} is already in place"))
                .with_index_a(low),
        ),
        _ => {
            let pivot = partition(array, low, high - 1, actions);
            quick_sort(array, low, pivot, actions);
            quick_sort(array, pivot + 1, high, actions);
        }
    }
}

/// Lomuto partition of `array[low..=high]` around `array[high]`.
fn partition(array: &mut [i64], low: usize, high: usize, actions: &mut Vec<SortAction>) -> usize {
    let pivot_value = array[high];
    actions.push(
        SortAction::new(SortActionKind::PivotSelect, format!("Pivot = {pivot_value} (index {high})"))
            .with_index_a(high)
            .with_value_a(pivot_value),
    );

    // Next slot for an element <= pivot.
    let mut boundary = low;
    for j in low..high {
        actions.push(compare(array, j, high, format!("Comparing {} with pivot {pivot_value}", array[j])));

        if array[j] > pivot_value {
            continue;
        }

        if boundary != j {
            actions.push(swap(array, boundary, j, |_, moved| {
                format!("Moving {moved} into the left part")
            }));
        }
        boundary += 1;
    }

    if boundary != high {
        actions.push(swap(array, boundary, high, |_, pivot| {
            format!("Placing pivot {pivot} at position {boundary}")
        }));
    }

    actions.push(
        SortAction::new(SortActionKind::PassComplete, format!("Pivot ({}) is in place", array[boundary]))
            .with_index_a(boundary),
    );

    boundary
}
