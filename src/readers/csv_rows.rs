use csv::{ReaderBuilder, StringRecord, Trim};
use std::collections::HashMap;
use std::fs::File;
use std::io::ErrorKind;
use std::path::Path;

use crate::error::{FileKind, ImportError, Result};

/// Open a header-first comma-separated file. A missing file is reported
/// as `FileNotFound` with its kind rather than as a bare I/O error.
/// Only header names are trimmed; cell values are passed on as written.
pub fn open_csv(path: &Path, kind: FileKind) -> Result<csv::Reader<File>> {
    let file = File::open(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => ImportError::FileNotFound {
            kind,
            path: path.to_path_buf(),
        },
        _ => ImportError::Io(e),
    })?;

    Ok(ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::Headers)
        .from_reader(file))
}

/// A row with the wrong number of cells is a malformed record; other csv
/// errors pass through unchanged.
fn row_error(e: csv::Error) -> ImportError {
    if let csv::ErrorKind::UnequalLengths {
        pos,
        expected_len,
        len,
    } = e.kind()
    {
        let line = pos.as_ref().map(|p| p.line()).unwrap_or(0);
        return ImportError::malformed(
            line,
            "row",
            "",
            format!("expected {} cells, found {}", expected_len, len),
        );
    }
    ImportError::Csv(e)
}

/// Fail on the first expected column the header row lacks.
pub fn require_columns<S: AsRef<str>>(headers: &StringRecord, expected: &[S]) -> Result<()> {
    for column in expected {
        let column = column.as_ref();
        if !headers.iter().any(|h| h == column) {
            return Err(ImportError::malformed(1, column, "", "missing column in header"));
        }
    }
    Ok(())
}

/// Parse every data row through `parse`, keyed by header name.
/// `parse` receives the 1-based file line of the row.
pub fn parse_rows<T, F>(reader: &mut csv::Reader<File>, mut parse: F) -> Result<Vec<T>>
where
    F: FnMut(&HashMap<String, String>, u64) -> Result<T>,
{
    let headers = reader.headers()?.clone();
    let mut rows = Vec::new();
    let mut fields: HashMap<String, String> = HashMap::with_capacity(headers.len());

    for result in reader.records() {
        let record = result.map_err(row_error)?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);

        fields.clear();
        for (name, value) in headers.iter().zip(record.iter()) {
            fields.insert(name.to_string(), value.to_string());
        }

        rows.push(parse(&fields, line)?);
    }

    Ok(rows)
}
