use std::io::Cursor;
use std::path::Path;

use anyhow::{Context, Result, bail};
use calamine::{Data, DataType, Reader, Xlsx};

use super::error::LoadError;
use super::model::{parse_timestamp, CellValue, Record, RecordTable};

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Parse an uploaded file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`  – header row followed by records of the same width
/// * `.xlsx` – first worksheet, first row is the header
///
/// The extension is checked before any byte is decoded. On success the table
/// is guaranteed to carry every column in
/// [`REQUIRED_COLUMNS`](super::model::REQUIRED_COLUMNS).
pub fn load_upload(file_name: &str, bytes: &[u8]) -> Result<RecordTable, LoadError> {
    let ext = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let table = match ext.as_str() {
        "csv" => load_csv(bytes)?,
        "xlsx" => load_xlsx(bytes)?,
        _ => return Err(LoadError::UnsupportedFormat),
    };

    let missing = table.missing_columns();
    if !missing.is_empty() {
        return Err(LoadError::MissingColumns(missing));
    }
    Ok(table)
}

/// Read `path` from disk and hand it to [`load_upload`].
pub fn load_path(path: &Path) -> Result<RecordTable, LoadError> {
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default();
    // The extension check must win over I/O errors for unsupported files.
    if !is_supported(file_name) {
        return Err(LoadError::UnsupportedFormat);
    }
    let bytes = std::fs::read(path)
        .with_context(|| format!("reading {}", path.display()))?;
    load_upload(file_name, &bytes)
}

/// Whether the file name carries an extension the loader understands.
pub fn is_supported(file_name: &str) -> bool {
    Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv") || e.eq_ignore_ascii_case("xlsx"))
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, every record as wide as the
/// header. Quoted headers may contain line breaks.
fn load_csv(bytes: &[u8]) -> Result<RecordTable> {
    if bytes.iter().all(|b| b.is_ascii_whitespace()) {
        bail!("No columns to parse from file");
    }

    let mut reader = csv::ReaderBuilder::new()
        .flexible(false)
        .from_reader(bytes);
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let row = result.with_context(|| format!("CSV row {row_no}"))?;
        rows.push(row.iter().map(raw_text).collect());
    }

    Ok(typed_table(headers, rows))
}

fn raw_text(value: &str) -> CellValue {
    if value.is_empty() {
        CellValue::Null
    } else {
        CellValue::Text(value.to_string())
    }
}

// ---------------------------------------------------------------------------
// Column typing
// ---------------------------------------------------------------------------

/// The dtype of a whole column. A column takes the narrowest type every
/// non-null cell fits; integers widen to floats, anything else falls back
/// to text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ColumnType {
    Integer,
    Float,
    Bool,
    DateTime,
    Text,
}

impl ColumnType {
    const CANDIDATES: [ColumnType; 4] = [
        ColumnType::Integer,
        ColumnType::Float,
        ColumnType::Bool,
        ColumnType::DateTime,
    ];

    pub(crate) fn infer<'a>(cells: impl IntoIterator<Item = &'a CellValue>) -> ColumnType {
        let cells: Vec<&CellValue> = cells.into_iter().collect();
        Self::CANDIDATES
            .into_iter()
            .find(|ty| cells.iter().all(|cell| ty.convert(cell).is_some()))
            .unwrap_or(ColumnType::Text)
    }

    /// `cell` as this type, or `None` when it does not fit. Text is only
    /// trimmed for parsing; a text column keeps its values verbatim.
    pub(crate) fn convert(self, cell: &CellValue) -> Option<CellValue> {
        if cell.is_null() {
            return Some(CellValue::Null);
        }
        let text = cell.as_text().map(str::trim);
        match self {
            ColumnType::Integer => match cell {
                CellValue::Integer(i) => Some(CellValue::Integer(*i)),
                _ => text?.parse::<i64>().ok().map(CellValue::Integer),
            },
            ColumnType::Float => {
                let value = match cell {
                    CellValue::Integer(i) => *i as f64,
                    CellValue::Float(f) => *f,
                    _ => text?.parse::<f64>().ok()?,
                };
                Some(if value.is_nan() { CellValue::Null } else { CellValue::Float(value) })
            }
            ColumnType::Bool => match (cell, text) {
                (CellValue::Bool(b), _) => Some(CellValue::Bool(*b)),
                (_, Some("true")) => Some(CellValue::Bool(true)),
                (_, Some("false")) => Some(CellValue::Bool(false)),
                _ => None,
            },
            ColumnType::DateTime => match cell {
                CellValue::DateTime(d) => Some(CellValue::DateTime(*d)),
                _ => parse_timestamp(text?).map(CellValue::DateTime),
            },
            ColumnType::Text => Some(match cell {
                CellValue::Text(s) => CellValue::Text(s.clone()),
                other => CellValue::Text(other.to_string()),
            }),
        }
    }
}

/// Give every column a single dtype, then key the rows by header.
fn typed_table(headers: Vec<String>, mut rows: Vec<Vec<CellValue>>) -> RecordTable {
    for col in 0..headers.len() {
        let ty = ColumnType::infer(rows.iter().filter_map(|row| row.get(col)));
        log::debug!("column {:?} typed as {ty:?}", headers[col]);
        for cell in rows.iter_mut().filter_map(|row| row.get_mut(col)) {
            if let Some(typed) = ty.convert(cell) {
                *cell = typed;
            }
        }
    }

    let records = rows
        .into_iter()
        .map(|row| Record {
            cells: headers.iter().cloned().zip(row).collect(),
        })
        .collect();
    RecordTable::new(headers, records)
}

// ---------------------------------------------------------------------------
// XLSX loader
// ---------------------------------------------------------------------------

/// Load the first worksheet of an Excel workbook. Row 0 is the header.
fn load_xlsx(bytes: &[u8]) -> Result<RecordTable> {
    let mut workbook: Xlsx<_> = calamine::open_workbook_from_rs(Cursor::new(bytes.to_vec()))
        .context("opening Excel workbook")?;

    let range = workbook
        .worksheet_range_at(0)
        .context("No worksheet found in Excel file")?
        .context("reading first worksheet")?;

    let mut rows = range.rows();
    let Some(header_row) = rows.next() else {
        bail!("No columns to parse from file");
    };
    let headers: Vec<String> = header_row.iter().map(header_text).collect();

    let rows: Vec<Vec<CellValue>> = rows
        .filter(|row| !row.iter().all(|cell| matches!(cell, Data::Empty)))
        .map(|row| row.iter().map(excel_cell).collect())
        .collect();

    Ok(typed_table(headers, rows))
}

fn header_text(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.clone(),
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}

/// Map a native Excel cell to a [`CellValue`]; column typing happens later.
fn excel_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty | Data::Error(_) => CellValue::Null,
        Data::Int(i) => CellValue::Integer(*i),
        Data::Float(f) if f.is_nan() => CellValue::Null,
        Data::Float(f) => CellValue::Float(*f),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::String(s) => raw_text(s),
        other => other
            .as_datetime()
            .map(CellValue::DateTime)
            .unwrap_or_else(|| CellValue::Text(other.to_string())),
    }
}
