use std::collections::HashMap;

use log::{info, warn};

use crate::cluster::{self, ClusterAssignment};
use crate::config::{CLUSTER_COLUMN, LATITUDE_COLUMN, LONGITUDE_COLUMN, PipelineConfig};
use crate::data::classify::{classify, ColumnClassification};
use crate::data::loader;
use crate::data::model::{CellValue, Column, ColumnType, Table};
use crate::error::LoadError;
use crate::geo::boundary::{load_boundaries, BoundaryDataset};
use crate::geo::overlay::{build_choropleth, build_markers};
use crate::render::{assemble, Notice, RenderPayload};

// ---------------------------------------------------------------------------
// Session table cache
// ---------------------------------------------------------------------------

/// Loaded tables keyed by source identifier. Populated on first access,
/// invalidated only by an explicit [`clear`](Self::clear). Concurrent
/// populate races are resolved by idempotent recomputation (the fetch is a
/// pure function of the source), not locking.
#[derive(Debug, Default)]
pub struct TableCache {
    entries: HashMap<String, Table>,
}

impl TableCache {
    pub fn get(&self, key: &str) -> Option<&Table> {
        self.entries.get(key)
    }

    pub fn insert(&mut self, key: String, table: Table) {
        self.entries.insert(key, table);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Pipeline – Loader → Classifier → Annotator → Overlay → Assembler
// ---------------------------------------------------------------------------

/// The full data-to-visualization pipeline. Each [`run`](Self::run) executes
/// the stages in order, from scratch: there is no incremental recomputation,
/// only the loaded table is cached across runs.
pub struct Pipeline {
    config: PipelineConfig,
    cache: TableCache,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Pipeline {
            config,
            cache: TableCache::default(),
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Drop all cached tables; the next run re-fetches from the source.
    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    /// Run the whole pipeline for one user trigger.
    ///
    /// A table load failure is fatal and comes back as `Err`; every other
    /// gap (no metric, no boundaries, bad coordinates) degrades in place and
    /// is reported through the payload's notices.
    pub fn run(&mut self, metric: Option<&str>) -> Result<RenderPayload, LoadError> {
        let table = self.load_table()?;
        let classification = classify(&table);

        let mut notices = Vec::new();
        if !classification.has_numeric() {
            notices.push(Notice::NoNumericColumns);
        }

        let metric = classification.validate_metric(metric);
        let assignment = self.annotate(&table, &classification, metric, &mut notices);
        let table = with_cluster_column(&table, &assignment);

        let boundaries = self.load_boundaries(&mut notices);
        let choropleth = build_choropleth(&table, metric, boundaries.as_ref());
        if choropleth.is_none() && boundaries.is_some() && metric.is_some() {
            // Boundaries and metric both present but the table lacks a
            // `state` column; same degraded rendering as a missing file.
            notices.push(Notice::ChoroplethUnavailable(
                "table has no 'state' column".to_string(),
            ));
        }

        if table.column(LATITUDE_COLUMN).is_none() || table.column(LONGITUDE_COLUMN).is_none() {
            notices.push(Notice::NoCoordinateColumns);
        }
        let markers = build_markers(&table, &assignment, metric);
        if markers.skipped > 0 {
            notices.push(Notice::MarkersSkipped(markers.skipped));
        }

        Ok(assemble(
            &table,
            &classification,
            choropleth,
            markers,
            boundaries.as_ref(),
            notices,
        ))
    }

    fn load_table(&mut self) -> Result<Table, LoadError> {
        let key = self.config.csv_source.cache_key();
        if let Some(table) = self.cache.get(&key) {
            info!("using cached table for {key}");
            return Ok(table.clone());
        }
        let table = loader::load(&self.config.csv_source)?;
        self.cache.insert(key, table.clone());
        Ok(table)
    }

    fn annotate(
        &self,
        table: &Table,
        classification: &ColumnClassification,
        metric: Option<&str>,
        notices: &mut Vec<Notice>,
    ) -> ClusterAssignment {
        match cluster::annotate(table, &classification.numeric, metric) {
            Ok(assignment) => assignment,
            Err(e) => {
                // Degrade to the constant-zero fallback rather than abort.
                warn!("cluster annotation failed: {e}");
                notices.push(Notice::ClusteringFellBack(e.to_string()));
                vec![0; table.row_count()]
            }
        }
    }

    fn load_boundaries(&self, notices: &mut Vec<Notice>) -> Option<BoundaryDataset> {
        match load_boundaries(&self.config.geojson_path, &self.config.region_name_key) {
            Ok(Some(boundaries)) => Some(boundaries),
            Ok(None) => {
                notices.push(Notice::ChoroplethUnavailable(format!(
                    "boundary file {} not found",
                    self.config.geojson_path.display()
                )));
                None
            }
            Err(e) => {
                // The table load is the only fatal failure; a bad boundary
                // file degrades like a missing one.
                warn!("boundary load failed: {e}");
                notices.push(Notice::ChoroplethUnavailable(e.to_string()));
                None
            }
        }
    }
}

/// Append the per-row cluster labels as a new integer column.
fn with_cluster_column(table: &Table, assignment: &ClusterAssignment) -> Table {
    let column = Column {
        name: CLUSTER_COLUMN.to_string(),
        ty: ColumnType::Integer,
        values: assignment
            .iter()
            .map(|&label| CellValue::Integer(label as i64))
            .collect(),
    };
    // Lengths match by construction; a name collision with a source column
    // called `cluster` keeps the original table rather than failing the run.
    match table.with_column(column) {
        Ok(grown) => grown,
        Err(e) => {
            warn!("could not append cluster column: {e}");
            table.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_is_explicitly_invalidated() {
        let mut cache = TableCache::default();
        cache.insert("a".into(), Table::empty());
        assert_eq!(cache.len(), 1);
        assert!(cache.get("a").is_some());
        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn cluster_column_is_appended_not_mutated() {
        let base = Table::empty();
        let grown = with_cluster_column(&base, &Vec::new());
        assert_eq!(base.columns().len(), 0);
        assert_eq!(grown.columns().len(), 1);
        assert_eq!(grown.columns()[0].name, CLUSTER_COLUMN);
    }
}
