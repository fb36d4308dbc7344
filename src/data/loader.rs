use std::fmt;
use std::path::{Path, PathBuf};

use log::info;

use super::model::{CellValue, Column, ColumnType, Table};
use crate::config::FETCH_TIMEOUT;
use crate::error::LoadError;

// ---------------------------------------------------------------------------
// Source – where a table comes from
// ---------------------------------------------------------------------------

/// Location of the source CSV. HTTP(S) URLs are fetched, anything else is
/// treated as a filesystem path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Url(String),
    Path(PathBuf),
}

impl Source {
    pub fn parse(s: &str) -> Source {
        if s.starts_with("http://") || s.starts_with("https://") {
            Source::Url(s.to_string())
        } else {
            Source::Path(PathBuf::from(s))
        }
    }

    /// Stable key identifying this source for the session table cache.
    pub fn cache_key(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Url(u) => write!(f, "{u}"),
            Source::Path(p) => write!(f, "{}", p.display()),
        }
    }
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load the source CSV into a [`Table`].
///
/// Single attempt: any I/O or parse failure comes back as a typed
/// [`LoadError`] for the caller to surface; transient network errors are
/// reported, never silently retried. Callers may cache the result keyed on
/// [`Source::cache_key`] for the duration of a session.
pub fn load(source: &Source) -> Result<Table, LoadError> {
    let text = match source {
        Source::Url(url) => fetch(url)?,
        Source::Path(path) => read_file(path)?,
    };
    let table = parse_csv(&text)?;
    info!(
        "loaded {} rows x {} columns from {source}",
        table.row_count(),
        table.columns().len()
    );
    Ok(table)
}

fn fetch(url: &str) -> Result<String, LoadError> {
    let client = reqwest::blocking::Client::builder()
        .timeout(FETCH_TIMEOUT)
        .build()?;
    let response = client.get(url).send()?.error_for_status()?;
    Ok(response.text()?)
}

fn read_file(path: &Path) -> Result<String, LoadError> {
    std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

// ---------------------------------------------------------------------------
// CSV parsing and type inference
// ---------------------------------------------------------------------------

/// Parse CSV text into a typed columnar table.
///
/// Each column's declared type is inferred from its non-empty cells: all
/// parse as `i64` → Integer, all parse as `f64` → Float, otherwise Text.
/// Empty cells become [`CellValue::Null`] regardless of column type.
fn parse_csv(text: &str) -> Result<Table, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(false)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();

    let mut raw_columns: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
    for result in reader.records() {
        let record = result?;
        for (i, cell) in record.iter().enumerate() {
            raw_columns[i].push(cell.to_string());
        }
    }

    let columns: Vec<Column> = headers
        .into_iter()
        .zip(raw_columns)
        .map(|(name, raw)| {
            let ty = infer_type(&raw);
            let values = raw.iter().map(|cell| typed_cell(cell, ty)).collect();
            Column { name, ty, values }
        })
        .collect();

    Ok(Table::new(columns)?)
}

fn infer_type(raw: &[String]) -> ColumnType {
    let mut saw_value = false;
    let mut all_int = true;
    let mut all_float = true;

    for cell in raw {
        let cell = cell.trim();
        if cell.is_empty() {
            continue;
        }
        saw_value = true;
        if cell.parse::<i64>().is_err() {
            all_int = false;
        }
        if cell.parse::<f64>().is_err() {
            all_float = false;
        }
    }

    if !saw_value {
        // All-null columns carry no numeric information.
        ColumnType::Text
    } else if all_int {
        ColumnType::Integer
    } else if all_float {
        ColumnType::Float
    } else {
        ColumnType::Text
    }
}

fn typed_cell(raw: &str, ty: ColumnType) -> CellValue {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return CellValue::Null;
    }
    match ty {
        ColumnType::Integer => trimmed
            .parse::<i64>()
            .map(CellValue::Integer)
            .unwrap_or(CellValue::Null),
        ColumnType::Float => trimmed
            .parse::<f64>()
            .map(CellValue::Float)
            .unwrap_or(CellValue::Null),
        ColumnType::Text => CellValue::Text(raw.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PipelineError;
    use std::io::Write;

    #[test]
    fn source_parse_distinguishes_urls_from_paths() {
        assert!(matches!(
            Source::parse("https://example.com/data.csv"),
            Source::Url(_)
        ));
        assert!(matches!(Source::parse("data/states.csv"), Source::Path(_)));
    }

    #[test]
    fn infers_column_types_from_content() {
        let table = parse_csv("state,pop,density\nA,5,1.5\nB,9,2.25\n").unwrap();
        assert_eq!(table.column("state").unwrap().ty, ColumnType::Text);
        assert_eq!(table.column("pop").unwrap().ty, ColumnType::Integer);
        assert_eq!(table.column("density").unwrap().ty, ColumnType::Float);
    }

    #[test]
    fn mixed_numeric_and_text_becomes_text() {
        let table = parse_csv("latitude\n10\nx\n").unwrap();
        let col = table.column("latitude").unwrap();
        assert_eq!(col.ty, ColumnType::Text);
        assert_eq!(col.values[0], CellValue::Text("10".into()));
    }

    #[test]
    fn empty_cells_become_null() {
        let table = parse_csv("state,pop\nA,5\nB,\nC,9\n").unwrap();
        let col = table.column("pop").unwrap();
        assert_eq!(col.ty, ColumnType::Integer);
        assert_eq!(col.values[1], CellValue::Null);
        assert_eq!(table.row_count(), 3);
    }

    #[test]
    fn header_only_csv_loads_as_empty_table() {
        let table = parse_csv("state,pop\n").unwrap();
        assert_eq!(table.row_count(), 0);
        assert_eq!(table.columns().len(), 2);
    }

    #[test]
    fn duplicate_header_is_a_load_error() {
        let err = parse_csv("a,a\n1,2\n").unwrap_err();
        assert!(matches!(
            err,
            LoadError::Schema(PipelineError::DuplicateColumn(_))
        ));
    }

    #[test]
    fn load_reads_csv_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("states.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "state,pop").unwrap();
        writeln!(file, "A,5").unwrap();

        let table = load(&Source::Path(path)).unwrap();
        assert_eq!(table.row_count(), 1);
        assert_eq!(
            table.cell("state", 0),
            Some(&CellValue::Text("A".into()))
        );
    }

    #[test]
    fn load_reports_missing_file() {
        let err = load(&Source::Path("no/such/file.csv".into())).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }
}
