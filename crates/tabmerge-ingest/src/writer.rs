//! CSV file writing.

use std::io::Write;
use std::path::Path;

use tabmerge_model::Table;
use tempfile::NamedTempFile;

use crate::error::{IngestError, Result};

/// Writes `table` to `path` as CSV, replacing any existing file.
///
/// The header row follows the table's column order. Blank cells and columns a
/// row does not carry are written as empty fields. Records go to a temporary
/// file next to `path` that replaces it only once fully written, so a failed
/// save leaves any existing file untouched.
pub fn save_table(path: &Path, table: &Table) -> Result<()> {
    save_atomically(path, |file| write_records(file, table))?;

    tracing::debug!(
        path = %path.display(),
        columns = table.width(),
        rows = table.height(),
        "saved table"
    );
    Ok(())
}

fn write_records<W: Write>(out: W, table: &Table) -> csv::Result<()> {
    let mut writer = csv::WriterBuilder::new().from_writer(out);
    writer.write_record(table.columns())?;
    for row in table.rows() {
        let record = table.columns().iter().map(|column| row.get(column).to_string());
        writer.write_record(record)?;
    }
    writer.flush()?;
    Ok(())
}

fn save_atomically<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut NamedTempFile) -> csv::Result<()>,
{
    let write_failure = |source: csv::Error| IngestError::WriteFailure {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut file =
        NamedTempFile::new_in(dir).map_err(|e| write_failure(csv::Error::from(e)))?;
    write(&mut file).map_err(write_failure)?;
    file.as_file()
        .sync_all()
        .map_err(|e| write_failure(csv::Error::from(e)))?;
    file.persist(path)
        .map_err(|e| write_failure(csv::Error::from(e.error)))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabmerge_model::{CellValue, Row};
    use tempfile::TempDir;

    #[test]
    fn test_save_table_writes_header_and_blanks() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.csv");

        let mut table = Table::new(vec!["Name".to_string(), "Age".to_string()]).unwrap();
        table.push_row(Row::from_pairs([
            ("Name", CellValue::text("Ada, Countess")),
            ("Age", CellValue::Number(36.0)),
        ]));
        table.push_row(Row::from_pairs([("Name", CellValue::text("Bo"))]));

        save_table(&path, &table).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, "Name,Age\n\"Ada, Countess\",36\nBo,\n");
    }

    #[test]
    fn test_save_table_replaces_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.csv");
        std::fs::write(&path, "Old\nrow\n").unwrap();

        let table = Table::new(vec!["New".to_string()]).unwrap();
        save_table(&path, &table).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "New\n");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_save_table_missing_directory() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("out.csv");
        let table = Table::new(vec!["A".to_string()]).unwrap();
        let err = save_table(&path, &table).unwrap_err();
        assert!(matches!(err, IngestError::WriteFailure { .. }));
    }

    #[test]
    fn test_failed_write_keeps_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("target.csv");
        std::fs::write(&path, "Id\n1\n2\n").unwrap();

        let err = save_atomically(&path, |file| {
            file.write_all(b"Id\n")?;
            Err(csv::Error::from(std::io::Error::other("disk full")))
        })
        .unwrap_err();

        assert!(matches!(err, IngestError::WriteFailure { .. }));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "Id\n1\n2\n");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }
}
