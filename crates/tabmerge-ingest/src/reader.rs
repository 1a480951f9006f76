//! CSV file reading.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use tabmerge_model::{CellValue, ModelError, Row, Table, first_duplicate};

use crate::error::{IngestError, Result};

/// Maximum file size for CSV loading (500 MB default).
pub const MAX_CSV_FILE_SIZE: u64 = 500 * 1024 * 1024;

/// Header width above which a warning is logged.
const WIDE_TABLE_COLUMNS: usize = 500;

/// Check file size before loading.
pub fn check_file_size(path: &Path) -> Result<()> {
    check_file_size_with_limit(path, MAX_CSV_FILE_SIZE)
}

/// Check file size against a custom limit.
pub fn check_file_size_with_limit(path: &Path, max_size: u64) -> Result<()> {
    let metadata = std::fs::metadata(path).map_err(|e| open_error(path, e))?;

    if metadata.len() > max_size {
        return Err(IngestError::FileTooLarge {
            path: path.to_path_buf(),
            size: metadata.len(),
            max_size,
        });
    }

    Ok(())
}

/// Detect encoding and validate it's supported (UTF-8 only).
///
/// Checks for UTF-16 BOM markers which are not supported.
pub fn validate_encoding(path: &Path) -> Result<()> {
    let mut file = File::open(path).map_err(|e| open_error(path, e))?;

    let mut buffer = [0u8; 2];
    let bytes_read = file.read(&mut buffer).map_err(|e| read_error(path, e))?;

    if bytes_read == 2 {
        if buffer == [0xFF, 0xFE] {
            return Err(IngestError::UnsupportedEncoding {
                path: path.to_path_buf(),
                encoding: "UTF-16 LE",
            });
        }
        if buffer == [0xFE, 0xFF] {
            return Err(IngestError::UnsupportedEncoding {
                path: path.to_path_buf(),
                encoding: "UTF-16 BE",
            });
        }
    }

    // UTF-8 BOM is acceptable (stripped from the first header)
    Ok(())
}

/// Reads only the header row of a CSV file.
///
/// Column names are trimmed. Fails on empty files, blank column names and
/// repeated column names.
pub fn load_headers(path: &Path) -> Result<Vec<String>> {
    let mut reader = open_reader(path)?;
    read_header(&mut reader, path)
}

/// Reads a whole CSV file into a [`Table`].
///
/// Empty cells are loaded as [`CellValue::Blank`]; everything else is kept as
/// text exactly as written. Rows shorter than the header are padded with
/// blanks and extra trailing fields are ignored.
pub fn load_table(path: &Path) -> Result<Table> {
    let mut reader = open_reader(path)?;
    let columns = read_header(&mut reader, path)?;

    let mut table = Table::new(columns.clone()).map_err(|e| match e {
        ModelError::DuplicateColumn { column } => IngestError::DuplicateColumn {
            path: path.to_path_buf(),
            column,
        },
    })?;

    let mut ragged = 0usize;
    for result in reader.records() {
        let record = result.map_err(|e| IngestError::ReadFailure {
            path: path.to_path_buf(),
            source: e,
        })?;
        if record.len() != columns.len() {
            ragged += 1;
        }

        let mut row = Row::new();
        for (idx, column) in columns.iter().enumerate() {
            let value = match record.get(idx) {
                Some(raw) if !raw.is_empty() => CellValue::text(raw),
                _ => CellValue::Blank,
            };
            row.insert(column.clone(), value);
        }
        table.push_row(row);
    }

    if ragged > 0 {
        tracing::warn!(
            path = %path.display(),
            rows = ragged,
            "rows with a field count different from the header"
        );
    }
    tracing::debug!(
        path = %path.display(),
        columns = table.width(),
        rows = table.height(),
        "loaded table"
    );

    Ok(table)
}

fn open_reader(path: &Path) -> Result<csv::Reader<File>> {
    check_file_size(path)?;
    validate_encoding(path)?;

    csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(|e| IngestError::ReadFailure {
            path: path.to_path_buf(),
            source: e,
        })
}

fn read_header(reader: &mut csv::Reader<File>, path: &Path) -> Result<Vec<String>> {
    let record = reader.headers().map_err(|e| IngestError::ReadFailure {
        path: path.to_path_buf(),
        source: e,
    })?;

    if record.is_empty() {
        return Err(IngestError::EmptyCsv {
            path: path.to_path_buf(),
        });
    }

    let columns: Vec<String> = record
        .iter()
        .enumerate()
        .map(|(idx, raw)| {
            let raw = if idx == 0 {
                raw.strip_prefix('\u{feff}').unwrap_or(raw)
            } else {
                raw
            };
            raw.trim().to_string()
        })
        .collect();

    if let Some(position) = columns.iter().position(String::is_empty) {
        return Err(IngestError::EmptyColumnName {
            path: path.to_path_buf(),
            position,
        });
    }
    if let Some(column) = first_duplicate(&columns) {
        return Err(IngestError::DuplicateColumn {
            path: path.to_path_buf(),
            column: column.to_string(),
        });
    }

    if columns.len() > WIDE_TABLE_COLUMNS {
        tracing::warn!(
            path = %path.display(),
            columns = columns.len(),
            "file has more than {WIDE_TABLE_COLUMNS} columns"
        );
    }

    Ok(columns)
}

fn open_error(path: &Path, error: std::io::Error) -> IngestError {
    if error.kind() == std::io::ErrorKind::NotFound {
        IngestError::FileNotFound {
            path: path.to_path_buf(),
        }
    } else {
        read_error(path, error)
    }
}

fn read_error(path: &Path, error: std::io::Error) -> IngestError {
    IngestError::ReadFailure {
        path: path.to_path_buf(),
        source: csv::Error::from(error),
    }
}
