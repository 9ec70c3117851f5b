//! Word sort engine.
//!
//! Extracts normalized words from text, sorts them by [`cyrillic_cmp`] with
//! either a Lomuto quicksort or an LSD radix sort, and counts frequencies of
//! a sorted list.
//!
//! The radix sort caches each word's per-position ranks up front
//! so the distribution passes never touch the strings.

use crate::core::{RankedKey, cyrillic_cmp, lower_invariant};
use crate::error::{Result, TraceError};
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;

static WORD_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\p{L}\p{Nd}]+").expect("word pattern is a valid regex"));

/// Word sort algorithm selector.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WordSortAlgorithm {
    QuickSort,
    RadixSort,
}

impl WordSortAlgorithm {
    pub const ALL: [WordSortAlgorithm; 2] = [Self::QuickSort, Self::RadixSort];

    pub fn name(self) -> &'static str {
        match self {
            Self::QuickSort => "quick",
            Self::RadixSort => "radix",
        }
    }

    /// Human-readable series label.
    pub fn label(self) -> &'static str {
        match self {
            Self::QuickSort => "Quick sort",
            Self::RadixSort => "Radix sort",
        }
    }
}

impl fmt::Display for WordSortAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for WordSortAlgorithm {
    type Err = TraceError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_lowercase();
        match wanted.as_str() {
            "quick" | "quicksort" => Ok(Self::QuickSort),
            "radix" | "radixsort" => Ok(Self::RadixSort),
            _ => Err(TraceError::UnknownAlgorithm { family: "word sort", name: s.to_string() }),
        }
    }
}

/// A word and the number of times it occurs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct WordFrequency {
    pub word: String,
    pub count: usize,
}

/// Extracts every maximal run of letters and decimal digits from `text`,
/// normalized by [`normalize_word`].
///
/// ```
/// use sortrace::words::extract_words;
///
/// assert_eq!(extract_words("Ёж, ёлка и 2 ЕЛИ!"), vec!["ёж", "ёлка", "и", "2", "ели"]);
/// ```
pub fn extract_words(text: &str) -> Vec<String> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    WORD_PATTERN
        .find_iter(text)
        .map(|m| normalize_word(m.as_str()))
        .filter(|word| !word.is_empty())
        .collect()
}

/// NFC-composes and lowercases `word` character by character, folding
/// look-alike spellings of `ё`.
///
/// Handles a Latin `ë` and a Cyrillic `е` or `ё` followed by a combining
/// diaeresis, which legacy encodings produce.
pub fn normalize_word(word: &str) -> String {
    if word.trim().is_empty() {
        return String::new();
    }

    let normalized: String = word.nfc().map(lower_invariant).collect();
    normalized
        .replace('\u{00eb}', "ё")
        .replace("е\u{0308}", "ё")
        .replace("ё\u{0308}", "ё")
}

/// Normalizes `words`, drops blank entries and sorts the rest.
///
/// Both algorithms produce the same order, the one defined by
/// [`cyrillic_cmp`].
///
/// ```
/// use sortrace::words::{sort_words, WordSortAlgorithm};
///
/// let words = ["Яблоко", "апельсин", " ", "ёж", "еж"];
/// let sorted = sort_words(words, WordSortAlgorithm::RadixSort);
/// assert_eq!(sorted, vec!["апельсин", "еж", "ёж", "яблоко"]);
/// ```
pub fn sort_words<I, S>(words: I, algorithm: WordSortAlgorithm) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut data: Vec<String> = words
        .into_iter()
        .filter(|word| !word.as_ref().trim().is_empty())
        .map(|word| normalize_word(word.as_ref()))
        .collect();

    if data.len() <= 1 {
        return data;
    }

    match algorithm {
        WordSortAlgorithm::QuickSort => quick_sort(&mut data),
        WordSortAlgorithm::RadixSort => radix_sort(&mut data),
    }
    data
}

/// Counts runs of equal neighbours in an already sorted list.
///
/// Unsorted input is not detected; equal words that are not adjacent end up
/// in separate entries.
///
/// ```
/// use sortrace::words::count_frequencies;
///
/// let counts = count_frequencies(&["а", "а", "б"]);
/// assert_eq!(counts[0].word, "а");
/// assert_eq!(counts[0].count, 2);
/// assert_eq!(counts[1].count, 1);
/// ```
pub fn count_frequencies<S: AsRef<str>>(sorted_words: &[S]) -> Vec<WordFrequency> {
    let mut result: Vec<WordFrequency> = Vec::new();

    for word in sorted_words.iter().map(AsRef::as_ref) {
        match result.last_mut() {
            Some(current) if current.word == word => current.count += 1,
            _ => result.push(WordFrequency { word: word.to_string(), count: 1 }),
        }
    }

    result
}

/// Lomuto quicksort under [`cyrillic_cmp`].
///
/// Recurses into the smaller partition and loops over the larger one, which
/// bounds stack depth on already sorted input.
pub fn quick_sort<S: AsRef<str>>(items: &mut [S]) {
    let mut slice = items;
    while slice.len() > 1 {
        let current = slice;
        let pivot = partition(current);
        let (left, rest) = current.split_at_mut(pivot);
        let right = &mut rest[1..];
        if left.len() < right.len() {
            quick_sort(left);
            slice = right;
        } else {
            quick_sort(right);
            slice = left;
        }
    }
}

fn partition<S: AsRef<str>>(items: &mut [S]) -> usize {
    let high = items.len() - 1;
    let mut boundary = 0;

    for j in 0..high {
        if cyrillic_cmp(items[j].as_ref(), items[high].as_ref()).is_gt() {
            continue;
        }
        if boundary != j {
            items.swap(boundary, j);
        }
        boundary += 1;
    }

    if boundary != high {
        items.swap(boundary, high);
    }
    boundary
}

/// LSD radix sort by alphabet rank.
///
/// Positions are processed from the longest word's last character down to
/// the first. A word shorter than the current position contributes rank 0,
/// which sorts before every real character. Each pass is a stable counting
/// distribution, so the whole sort is stable.
pub fn radix_sort<S: AsRef<str>>(items: &mut [S]) {
    if items.len() <= 1 {
        return;
    }

    let keys: Vec<RankedKey> = items
        .iter()
        .enumerate()
        .map(|(index, word)| RankedKey::new(index, word.as_ref()))
        .collect();

    let max_length = keys.iter().map(|key| key.ranks.len()).max().unwrap_or(0);
    if max_length == 0 {
        return;
    }

    let mut source: Vec<&RankedKey> = keys.iter().collect();
    let mut destination = source.clone();
    for position in (0..max_length).rev() {
        let max_rank = source.iter().map(|key| key.rank_at(position)).max().unwrap_or(0) as usize;

        // Counts, then prefix sums as bucket start offsets.
        let mut offsets = vec![0usize; max_rank + 1];
        source.iter().for_each(|key| offsets[key.rank_at(position) as usize] += 1);
        let mut sum = 0;
        offsets.iter_mut().for_each(|offset| {
            let count = *offset;
            *offset = sum;
            sum += count;
        });

        for &key in &source {
            let bucket = key.rank_at(position) as usize;
            destination[offsets[bucket]] = key;
            offsets[bucket] += 1;
        }

        std::mem::swap(&mut source, &mut destination);
    }

    let indices = source.into_iter().map(|key| key.index).collect();
    apply_permutation(items, indices);
}

/// Reorders `data` so that `data[i]` becomes the old `data[indices[i]]`.
fn apply_permutation<T>(data: &mut [T], mut indices: Vec<usize>) {
    for i in 0..data.len() {
        let mut current = i;
        while indices[current] != i {
            let next = indices[current];
            data.swap(current, next);
            indices[current] = current;
            current = next;
        }
        indices[current] = current;
    }
}
