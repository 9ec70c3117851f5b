//! Delimiter-separated row ingestion.
//!
//! Turns `,`- or `;`-separated text into a header row plus [`Record`]s with
//! stable ids, the only shape the merge engine accepts.

use crate::error::Result;
use crate::record::Record;
use csv::{Reader, ReaderBuilder, StringRecord, Trim};
use std::io::Read;
use std::path::Path;

/// Parsed table: normalized column headers and data records.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Table {
    pub headers: Vec<String>,
    pub records: Vec<Record>,
}

impl Table {
    /// Header of `column`, or `"Column N"` past the header row.
    pub fn column_label(&self, column: usize) -> String {
        self.headers
            .get(column)
            .cloned()
            .unwrap_or_else(|| default_header(column))
    }
}

/// Picks `;` when semicolons outnumber commas, `,` when any comma is present,
/// and `;` otherwise.
///
/// ```
/// use sortrace::delimited::detect_delimiter;
///
/// assert_eq!(detect_delimiter("a,b;c,d"), ',');
/// assert_eq!(detect_delimiter("a;b;c,d"), ';');
/// assert_eq!(detect_delimiter("single"), ';');
/// ```
pub fn detect_delimiter(sample: &str) -> char {
    let commas = sample.chars().filter(|&c| c == ',').count();
    let semicolons = sample.chars().filter(|&c| c == ';').count();
    if semicolons > commas {
        ';'
    } else if commas > 0 {
        ','
    } else {
        ';'
    }
}

/// Splits one line into trimmed cells.
///
/// A cell that starts with a double quote may contain the delimiter, and
/// `""` inside it is a literal quote. An empty line has no cells.
///
/// ```
/// use sortrace::delimited::parse_line;
///
/// let cells = parse_line(r#" a ,"b, c","say ""hi""""#, ',').unwrap();
/// assert_eq!(cells, vec!["a", "b, c", r#"say "hi""#]);
/// ```
pub fn parse_line(line: &str, delimiter: char) -> Result<Vec<String>> {
    let mut records = reader(line.as_bytes(), delimiter).into_records();
    match records.next() {
        Some(record) => Ok(record?.iter().map(str::to_string).collect()),
        None => Ok(Vec::new()),
    }
}

/// Parses a whole document.
///
/// The delimiter is detected from the first non-blank line, which also
/// becomes the header row. Blank lines are skipped and rows may differ in
/// width. Returns `None` when there is no data row below the header.
///
/// ```
/// use sortrace::delimited::parse_table;
///
/// let table = parse_table("name;city\nIvan;\"Moscow; centre\"\n").unwrap().unwrap();
/// assert_eq!(table.headers, vec!["name", "city"]);
/// assert_eq!(table.records[0].cell(1), "Moscow; centre");
/// ```
pub fn parse_table(text: &str) -> Result<Option<Table>> {
    let Some(first_line) = text.lines().find(|line| !line.trim().is_empty()) else {
        return Ok(None);
    };
    let delimiter = detect_delimiter(first_line);
    log::debug!("detected delimiter {delimiter:?}");

    let mut rows = Vec::new();
    for record in reader(text.as_bytes(), delimiter).records() {
        let record = record?;
        if is_blank(&record) {
            continue;
        }
        rows.push(record.iter().map(str::to_string).collect::<Vec<String>>());
    }

    let mut rows = rows.into_iter();
    let Some(header) = rows.next() else {
        return Ok(None);
    };
    let data_rows: Vec<Vec<String>> = rows.collect();
    if data_rows.is_empty() {
        log::debug!("delimited text has a header row but no data");
        return Ok(None);
    }

    let headers = normalize_headers(header, &data_rows);
    let records = Record::from_rows(data_rows);
    log::debug!("parsed {} records with {} columns", records.len(), headers.len());
    Ok(Some(Table { headers, records }))
}

/// Reads and parses a UTF-8 file, see [`parse_table`].
pub fn read_table(path: impl AsRef<Path>) -> Result<Option<Table>> {
    let text = std::fs::read_to_string(path.as_ref())?;
    parse_table(&text)
}

// Delimiters are ASCII (`,` or `;`).
fn reader<R: Read>(input: R, delimiter: char) -> Reader<R> {
    ReaderBuilder::new()
        .delimiter(delimiter as u8)
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(input)
}

// A whitespace-only line reads as a single empty field.
fn is_blank(record: &StringRecord) -> bool {
    record.len() <= 1 && record.iter().all(str::is_empty)
}

fn default_header(column: usize) -> String {
    format!("Column {}", column + 1)
}

fn normalize_headers(header: Vec<String>, data_rows: &[Vec<String>]) -> Vec<String> {
    let header = if header.iter().all(|cell| cell.is_empty()) && header.len() <= 1 {
        let width = data_rows.iter().map(Vec::len).max().unwrap_or(0);
        vec![String::new(); width.max(1)]
    } else {
        header
    };

    header
        .into_iter()
        .enumerate()
        .map(|(column, cell)| {
            if cell.trim().is_empty() {
                default_header(column)
            } else {
                cell.trim().to_string()
            }
        })
        .collect()
}
