use serde::Serialize;

use super::model::Table;

// ---------------------------------------------------------------------------
// Column classification: numeric vs other
// ---------------------------------------------------------------------------

/// Partition of the table's columns by semantic type. Every column lands in
/// exactly one bucket; order follows the table's column order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ColumnClassification {
    /// Candidate metric columns (Integer or Float declared type).
    pub numeric: Vec<String>,
    pub other: Vec<String>,
}

/// Classify columns by their declared type. Pure and deterministic; a table
/// with no numeric columns yields an empty `numeric` bucket, which downstream
/// stages treat as "no metric available", not an error.
pub fn classify(table: &Table) -> ColumnClassification {
    let mut classification = ColumnClassification::default();
    for col in table.columns() {
        if col.ty.is_numeric() {
            classification.numeric.push(col.name.clone());
        } else {
            classification.other.push(col.name.clone());
        }
    }
    classification
}

impl ColumnClassification {
    pub fn has_numeric(&self) -> bool {
        !self.numeric.is_empty()
    }

    /// Constrain a requested metric to the numeric bucket. An unknown or
    /// non-numeric name degrades to `None` rather than failing.
    pub fn validate_metric<'a>(&self, requested: Option<&'a str>) -> Option<&'a str> {
        requested.filter(|m| self.numeric.iter().any(|c| c == m))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{CellValue, Column, ColumnType};

    fn sample_table() -> Table {
        Table::new(vec![
            Column {
                name: "state".into(),
                ty: ColumnType::Text,
                values: vec![CellValue::Text("A".into())],
            },
            Column {
                name: "pop".into(),
                ty: ColumnType::Integer,
                values: vec![CellValue::Integer(5)],
            },
            Column {
                name: "density".into(),
                ty: ColumnType::Float,
                values: vec![CellValue::Float(1.5)],
            },
        ])
        .unwrap()
    }

    #[test]
    fn every_column_lands_in_exactly_one_bucket() {
        let table = sample_table();
        let c = classify(&table);
        assert_eq!(c.numeric, vec!["pop", "density"]);
        assert_eq!(c.other, vec!["state"]);
        assert_eq!(c.numeric.len() + c.other.len(), table.columns().len());
    }

    #[test]
    fn empty_table_classifies_to_empty_buckets() {
        let c = classify(&Table::empty());
        assert!(!c.has_numeric());
        assert!(c.other.is_empty());
    }

    #[test]
    fn validate_metric_rejects_non_numeric_and_unknown() {
        let c = classify(&sample_table());
        assert_eq!(c.validate_metric(Some("pop")), Some("pop"));
        assert_eq!(c.validate_metric(Some("state")), None);
        assert_eq!(c.validate_metric(Some("missing")), None);
        assert_eq!(c.validate_metric(None), None);
    }
}
