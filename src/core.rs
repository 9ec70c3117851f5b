//! Key comparison shared by the engines.
//!
//! This module defines:
//! - [`compare_keys`]: numeric-or-text ordering used by every merge variant.
//! - [`cyrillic_cmp`]: alphabet-rank ordering used by the word sorters.
//! - RankedKey: internal index/rank-cache pair for radix passes.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::LazyLock;

/// Lowercase Russian alphabet in collation order (`е` and `ё` are distinct).
pub const CYRILLIC_ALPHABET: &str = "абвгдеёжзийклмнопрстуфхцчшщъыьэюя";

/// Rank offset for characters outside [`CYRILLIC_ALPHABET`].
///
/// Keeps every foreign character after the alphabet, in code point order.
pub const FALLBACK_OFFSET: u32 = 1000;

// Rank 0 is reserved for "no character at this position" in radix passes.
static ALPHABET_ORDER: LazyLock<HashMap<char, u32>> = LazyLock::new(|| {
    CYRILLIC_ALPHABET
        .chars()
        .zip(1..)
        .collect()
});

/// Item index with its per-position ranks cached up front.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct RankedKey {
    pub index: usize,
    pub ranks: Vec<u32>,
}

impl RankedKey {
    pub fn new(index: usize, word: &str) -> Self {
        Self { index, ranks: rank_key(word) }
    }

    /// Rank at `position`, or 0 past the end of the word.
    #[inline(always)]
    pub fn rank_at(&self, position: usize) -> u32 {
        self.ranks.get(position).copied().unwrap_or(0)
    }
}

/// Compares two cell values the way merge keys are ordered.
///
/// Both values are trimmed. When both parse as floating point numbers they are
/// compared numerically (`NaN` sorts first), otherwise they are compared as
/// text ignoring case. `Infinity` and `NaN` count as numbers, the short form
/// `inf` does not.
///
/// # Examples
///
/// ```
/// use sortrace::core::compare_keys;
/// use std::cmp::Ordering;
///
/// assert_eq!(compare_keys("9", "10"), Ordering::Less);
/// assert_eq!(compare_keys(" Apple", "apple "), Ordering::Equal);
/// assert_eq!(compare_keys("10", "9a"), Ordering::Less); // text, '1' < '9'
/// ```
pub fn compare_keys(left: &str, right: &str) -> Ordering {
    let left = left.trim();
    let right = right.trim();

    if let (Some(a), Some(b)) = (parse_number(left), parse_number(right)) {
        return compare_numbers(a, b);
    }

    left.chars()
        .map(fold_case)
        .cmp(right.chars().map(fold_case))
}

fn parse_number(text: &str) -> Option<f64> {
    let unsigned = text.trim_start_matches(['+', '-']);
    if unsigned.eq_ignore_ascii_case("inf") {
        return None;
    }
    text.parse().ok()
}

fn compare_numbers(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b)
        .unwrap_or_else(|| a.is_nan().cmp(&b.is_nan()).reverse())
}

// Simple (single char) uppercase mapping, like an ordinal ignore-case compare.
fn fold_case(ch: char) -> char {
    let mut upper = ch.to_uppercase();
    match (upper.next(), upper.next()) {
        (Some(single), None) => single,
        _ => ch,
    }
}

/// Simple (single char) lowercase mapping, without context rules such as the
/// Greek final sigma.
pub(crate) fn lower_invariant(ch: char) -> char {
    let mut lower = ch.to_lowercase();
    match (lower.next(), lower.next()) {
        (Some(single), None) => single,
        _ => ch,
    }
}

/// Collation rank of a single character.
///
/// Alphabet letters rank `1..=33` (case-insensitive); anything else ranks
/// `FALLBACK_OFFSET + code point` of its lowercase form.
///
/// ```
/// use sortrace::core::order_value;
///
/// assert_eq!(order_value('а'), 1);
/// assert_eq!(order_value('Ё'), 7);
/// assert_eq!(order_value('я'), 33);
/// assert_eq!(order_value('a'), 1000 + 'a' as u32);
/// ```
pub fn order_value(ch: char) -> u32 {
    let lower = lower_invariant(ch);
    match ALPHABET_ORDER.get(&lower) {
        Some(&rank) => rank,
        None => FALLBACK_OFFSET + lower as u32,
    }
}

/// Per-character ranks of `word`, see [`order_value`].
pub fn rank_key(word: &str) -> Vec<u32> {
    word.chars().map(order_value).collect()
}

/// Orders two words by alphabet rank, position by position.
///
/// When one word is a prefix of the other, the shorter word sorts first.
///
/// ```
/// use sortrace::core::cyrillic_cmp;
/// use std::cmp::Ordering;
///
/// assert_eq!(cyrillic_cmp("баба", "бабочка"), Ordering::Less);
/// assert_eq!(cyrillic_cmp("ёж", "еж"), Ordering::Greater);
/// assert_eq!(cyrillic_cmp("яблоко", "apple"), Ordering::Less);
/// ```
pub fn cyrillic_cmp(left: &str, right: &str) -> Ordering {
    let mut a = left.chars();
    let mut b = right.chars();
    loop {
        match (a.next(), b.next()) {
            (Some(x), Some(y)) => match order_value(x).cmp(&order_value(y)) {
                Ordering::Equal => continue,
                other => return other,
            },
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
        }
    }
}
