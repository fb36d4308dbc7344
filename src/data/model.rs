use std::fmt;

use serde::Serialize;

use crate::error::PipelineError;

// ---------------------------------------------------------------------------
// CellValue – a single cell in a table column
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value mirroring common CSV dtypes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum CellValue {
    Integer(i64),
    Float(f64),
    Text(String),
    Null,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Null => Ok(()),
        }
    }
}

impl CellValue {
    /// Interpret the value as an `f64` if it is numeric.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Like [`as_f64`](Self::as_f64) but also attempts to parse text cells,
    /// so a `"12.5"` stored in a text column still yields a coordinate.
    /// Non-finite results are rejected.
    pub fn parse_f64(&self) -> Option<f64> {
        let v = match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            CellValue::Text(s) => s.trim().parse::<f64>().ok(),
            CellValue::Null => None,
        }?;
        v.is_finite().then_some(v)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }
}

// ---------------------------------------------------------------------------
// ColumnType – the declared type of a column
// ---------------------------------------------------------------------------

/// Declared column type, inferred once at load time from the column's
/// non-null cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ColumnType {
    Integer,
    Float,
    Text,
}

impl ColumnType {
    /// Whether columns of this type are candidates for the metric selector
    /// and for the clustering feature matrix.
    pub fn is_numeric(self) -> bool {
        matches!(self, ColumnType::Integer | ColumnType::Float)
    }
}

// ---------------------------------------------------------------------------
// Column – one named column of uniform declared type
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct Column {
    pub name: String,
    pub ty: ColumnType,
    pub values: Vec<CellValue>,
}

impl Column {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Table – the complete loaded dataset
// ---------------------------------------------------------------------------

/// An ordered columnar dataset. Immutable once loaded: pipeline stages that
/// add data (e.g. the `cluster` column) return a new table via
/// [`with_column`](Self::with_column) rather than mutating in place.
#[derive(Debug, Clone, Serialize)]
pub struct Table {
    columns: Vec<Column>,
}

impl Table {
    /// Build a table, checking that all columns have the same length and
    /// that no column name repeats.
    pub fn new(columns: Vec<Column>) -> Result<Self, PipelineError> {
        let expected = columns.first().map(Column::len).unwrap_or(0);
        for col in &columns {
            if col.len() != expected {
                return Err(PipelineError::NonRectangular {
                    name: col.name.clone(),
                    actual: col.len(),
                    expected,
                });
            }
        }
        for (i, col) in columns.iter().enumerate() {
            if columns[..i].iter().any(|c| c.name == col.name) {
                return Err(PipelineError::DuplicateColumn(col.name.clone()));
            }
        }
        Ok(Table { columns })
    }

    /// An empty table with no columns and no rows.
    pub fn empty() -> Self {
        Table { columns: Vec::new() }
    }

    /// Number of rows (consistent across columns by construction).
    pub fn row_count(&self) -> usize {
        self.columns.first().map(Column::len).unwrap_or(0)
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    /// Look up a column by exact name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// The cell at (`column`, `row`), if both exist.
    pub fn cell(&self, column: &str, row: usize) -> Option<&CellValue> {
        self.column(column).and_then(|c| c.values.get(row))
    }

    /// Return a new table with `column` appended. The original is untouched.
    pub fn with_column(&self, column: Column) -> Result<Self, PipelineError> {
        let mut columns = self.columns.clone();
        columns.push(column);
        Table::new(columns)
    }
}
