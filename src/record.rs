//! Row records addressed by the external merge engine.

use serde::Serialize;

/// Columns shown by [`Record::preview`] by default.
pub const PREVIEW_COLUMNS: usize = 5;
/// Character limit of [`Record::preview`] by default.
pub const PREVIEW_LENGTH: usize = 60;

/// An immutable row of cells with a stable identity.
///
/// The id is assigned once at load time (0-based, original row order) and
/// never changes, whatever position the row later takes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Record {
    id: usize,
    cells: Vec<String>,
}

impl Record {
    pub fn new(id: usize, cells: Vec<String>) -> Self {
        Self { id, cells }
    }

    /// Wraps rows in records numbered in iteration order.
    ///
    /// ```
    /// use sortrace::record::Record;
    ///
    /// let records = Record::from_rows(vec![vec!["b"], vec!["a"]]);
    /// assert_eq!(records[1].id(), 1);
    /// assert_eq!(records[1].cell(0), "a");
    /// ```
    pub fn from_rows<I, R, S>(rows: I) -> Vec<Record>
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = S>,
        S: Into<String>,
    {
        rows.into_iter()
            .enumerate()
            .map(|(id, row)| Record::new(id, row.into_iter().map(Into::into).collect()))
            .collect()
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn cells(&self) -> &[String] {
        &self.cells
    }

    /// Cell at `index`, or `""` when the row is shorter.
    pub fn cell(&self, index: usize) -> &str {
        self.cells.get(index).map_or("", String::as_str)
    }

    /// One-line summary with the default limits.
    pub fn preview(&self) -> String {
        self.preview_with(PREVIEW_COLUMNS, PREVIEW_LENGTH)
    }

    /// Joins up to `max_columns` cells with `" | "`, then cuts the result to
    /// `max_length` characters.
    pub fn preview_with(&self, max_columns: usize, max_length: usize) -> String {
        let mut joined = self
            .cells
            .iter()
            .take(max_columns)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" | ");
        if self.cells.len() > max_columns {
            joined.push_str(" | ...");
        }
        truncate(&joined, max_length)
    }
}

/// Cuts `text` to `limit` characters, marking the cut with `"..."`.
pub(crate) fn truncate(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((byte, _)) => format!("{}...", &text[..byte]),
        None => text.to_string(),
    }
}
