//! Cluster annotation: z-scored k-means over the numeric sub-table.

pub mod kmeans;

use log::debug;

use crate::data::model::Table;
use crate::error::PipelineError;

/// Upper bound on the cluster count; the effective `k` is
/// `min(K_MAX, row_count)`.
pub const K_MAX: usize = 3;

/// Fixed seed so repeated runs on identical input produce identical labels.
const KMEANS_SEED: u64 = 42;

/// Per-row cluster labels in `[0, min(K_MAX, row_count))`. Empty for an
/// empty table.
pub type ClusterAssignment = Vec<u32>;

/// Assign a cluster label to every row.
///
/// With no metric selected, clustering is skipped entirely and every row
/// gets label `0`. Otherwise all numeric columns (not just the selected
/// metric) form the feature matrix: missing and non-finite values are
/// filled with `0`, each feature is standardised to zero mean and unit
/// variance, and the rows are partitioned by seeded k-means.
///
/// Label values are arbitrary group identifiers: changing the row order or
/// the numeric-column set may permute them. That is documented behavior.
pub fn annotate(
    table: &Table,
    numeric_columns: &[String],
    metric: Option<&str>,
) -> Result<ClusterAssignment, PipelineError> {
    let rows = table.row_count();
    if rows == 0 {
        return Ok(Vec::new());
    }
    if metric.is_none() {
        // Fallback policy, not a real clustering.
        return Ok(vec![0; rows]);
    }

    let matrix = feature_matrix(table, numeric_columns)?;
    let standardized = standardize(matrix);

    let k = K_MAX.min(rows);
    debug!(
        "clustering {rows} rows over {} features with k={k}",
        numeric_columns.len()
    );
    Ok(kmeans::cluster(&standardized, k, KMEANS_SEED))
}

/// Row-major matrix over the numeric columns. Missing and non-finite
/// values fill as 0, the same gate the marker builder applies, so a stray
/// `inf` cell cannot poison the z-scores.
fn feature_matrix(table: &Table, numeric_columns: &[String]) -> Result<Vec<Vec<f64>>, PipelineError> {
    let rows = table.row_count();
    let mut columns = Vec::with_capacity(numeric_columns.len());
    for name in numeric_columns {
        let col = table
            .column(name)
            .ok_or_else(|| PipelineError::MissingColumn(name.clone()))?;
        if col.len() != rows {
            return Err(PipelineError::NonRectangular {
                name: name.clone(),
                actual: col.len(),
                expected: rows,
            });
        }
        columns.push(col);
    }

    let matrix = (0..rows)
        .map(|r| {
            columns
                .iter()
                .map(|col| col.values[r].parse_f64().unwrap_or(0.0))
                .collect()
        })
        .collect();
    Ok(matrix)
}

/// Per-column z-score over the full column. A constant column has zero
/// variance and standardises to all zeros.
fn standardize(mut matrix: Vec<Vec<f64>>) -> Vec<Vec<f64>> {
    let rows = matrix.len();
    if rows == 0 {
        return matrix;
    }
    let dims = matrix[0].len();

    for j in 0..dims {
        let mean = matrix.iter().map(|row| row[j]).sum::<f64>() / rows as f64;
        let variance = matrix
            .iter()
            .map(|row| (row[j] - mean).powi(2))
            .sum::<f64>()
            / rows as f64;
        let std_dev = variance.sqrt();

        for row in &mut matrix {
            row[j] = if std_dev > 0.0 {
                (row[j] - mean) / std_dev
            } else {
                0.0
            };
        }
    }
    matrix
}
