use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use serde_json::Value as JsonValue;

use crate::color;
use crate::config::{MAP_CENTER, MAP_ZOOM, PREVIEW_ROWS};
use crate::data::classify::ColumnClassification;
use crate::data::model::Table;
use crate::geo::boundary::BoundaryDataset;
use crate::geo::overlay::{ChoroplethData, MarkerSet};

// ---------------------------------------------------------------------------
// Render payload – the boundary consumed by the UI shell
// ---------------------------------------------------------------------------

/// First rows of the table, stringified for display. Null cells render as
/// empty strings.
#[derive(Debug, Clone, Serialize)]
pub struct TablePreview {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub total_rows: usize,
}

/// Choropleth layer ready for the renderer: joined values, per-region fill
/// colors, and the original GeoJSON document passed through.
#[derive(Debug, Clone, Serialize)]
pub struct ChoroplethLayer {
    pub metric: String,
    pub values: BTreeMap<String, f64>,
    pub fills: BTreeMap<String, String>,
    pub legend: String,
    pub geojson: JsonValue,
}

/// The map: a basemap view plus zero-or-one choropleth layer and
/// zero-or-more markers.
#[derive(Debug, Clone, Serialize)]
pub struct MapView {
    pub center: (f64, f64),
    pub zoom: u8,
    pub choropleth: Option<ChoroplethLayer>,
    pub markers: Vec<crate::geo::overlay::Marker>,
    pub skipped_markers: usize,
}

/// User-visible message for a degraded (non-fatal) condition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail")]
pub enum Notice {
    /// No numeric columns: the clustering layer was skipped.
    NoNumericColumns,
    /// Boundary polygons unavailable; carries the reason (missing file or
    /// a parse failure downgraded to a warning).
    ChoroplethUnavailable(String),
    /// The table has no latitude/longitude columns.
    NoCoordinateColumns,
    /// Some rows were dropped for malformed coordinates.
    MarkersSkipped(usize),
    /// The cluster annotator failed; labels fell back to constant zero.
    ClusteringFellBack(String),
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::NoNumericColumns => {
                write!(f, "No numeric columns found in the CSV. Clustering layer skipped.")
            }
            Notice::ChoroplethUnavailable(reason) => {
                write!(f, "Choropleth layer disabled: {reason}")
            }
            Notice::NoCoordinateColumns => {
                write!(f, "No latitude/longitude columns; markers skipped.")
            }
            Notice::MarkersSkipped(n) => {
                write!(f, "{n} rows skipped for malformed coordinates.")
            }
            Notice::ClusteringFellBack(reason) => {
                write!(f, "Clustering failed ({reason}); all rows assigned cluster 0.")
            }
        }
    }
}

/// Everything the UI shell needs for one render. Always fully defined: with
/// every optional input absent this is still an empty preview plus a bare
/// basemap.
#[derive(Debug, Clone, Serialize)]
pub struct RenderPayload {
    pub preview: TablePreview,
    /// Numeric columns offered as metric choices by the UI shell.
    pub metric_options: Vec<String>,
    pub map: MapView,
    pub notices: Vec<Notice>,
}

// ---------------------------------------------------------------------------
// Assembly
// ---------------------------------------------------------------------------

/// Compose the final render payload. Pure: no I/O, no failure path.
pub fn assemble(
    table: &Table,
    classification: &ColumnClassification,
    choropleth: Option<ChoroplethData>,
    markers: MarkerSet,
    boundaries: Option<&BoundaryDataset>,
    notices: Vec<Notice>,
) -> RenderPayload {
    let choropleth_layer = match (choropleth, boundaries) {
        (Some(data), Some(bounds)) => Some(ChoroplethLayer {
            legend: data.metric.clone(),
            fills: color::fill_colors(&data.values),
            metric: data.metric,
            values: data.values,
            geojson: bounds.raw.clone(),
        }),
        _ => None,
    };

    RenderPayload {
        preview: preview(table, PREVIEW_ROWS),
        metric_options: classification.numeric.clone(),
        map: MapView {
            center: MAP_CENTER,
            zoom: MAP_ZOOM,
            choropleth: choropleth_layer,
            skipped_markers: markers.skipped,
            markers: markers.markers,
        },
        notices,
    }
}

fn preview(table: &Table, limit: usize) -> TablePreview {
    let total_rows = table.row_count();
    let shown = total_rows.min(limit);
    let rows = (0..shown)
        .map(|r| {
            table
                .columns()
                .iter()
                .map(|col| col.values[r].to_string())
                .collect()
        })
        .collect();
    TablePreview {
        columns: table.column_names().map(str::to_string).collect(),
        rows,
        total_rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::classify::classify;
    use crate::data::model::{CellValue, Column, ColumnType};

    #[test]
    fn minimal_payload_is_fully_defined() {
        let table = Table::empty();
        let payload = assemble(
            &table,
            &classify(&table),
            None,
            MarkerSet::default(),
            None,
            Vec::new(),
        );
        assert!(payload.preview.rows.is_empty());
        assert!(payload.preview.columns.is_empty());
        assert!(payload.metric_options.is_empty());
        assert!(payload.map.choropleth.is_none());
        assert!(payload.map.markers.is_empty());
        assert_eq!(payload.map.center, MAP_CENTER);
        assert!(payload.notices.is_empty());
    }

    #[test]
    fn preview_caps_at_the_configured_row_limit() {
        let values: Vec<CellValue> = (0..50).map(CellValue::Integer).collect();
        let table = Table::new(vec![Column {
            name: "pop".into(),
            ty: ColumnType::Integer,
            values,
        }])
        .unwrap();
        let payload = assemble(
            &table,
            &classify(&table),
            None,
            MarkerSet::default(),
            None,
            Vec::new(),
        );
        assert_eq!(payload.preview.rows.len(), PREVIEW_ROWS);
        assert_eq!(payload.preview.total_rows, 50);
        assert_eq!(payload.preview.rows[0], vec!["0".to_string()]);
    }

    #[test]
    fn payload_serializes_to_json() {
        let table = Table::empty();
        let payload = assemble(
            &table,
            &classify(&table),
            None,
            MarkerSet::default(),
            None,
            vec![Notice::NoNumericColumns],
        );
        let json = serde_json::to_value(&payload).unwrap();
        assert!(json.get("preview").is_some());
        assert!(json.get("map").is_some());
        assert_eq!(json["notices"][0]["kind"], "NoNumericColumns");
    }
}
