use std::collections::BTreeMap;

use log::info;
use serde::Serialize;

use super::boundary::BoundaryDataset;
use crate::cluster::ClusterAssignment;
use crate::color::MarkerColor;
use crate::config::{LATITUDE_COLUMN, LONGITUDE_COLUMN, STATE_COLUMN};
use crate::data::model::Table;

// ---------------------------------------------------------------------------
// Choropleth aggregation
// ---------------------------------------------------------------------------

/// Region name → metric value, for regions that joined. Only produced when
/// both a boundary dataset and a metric exist.
#[derive(Debug, Clone, Serialize)]
pub struct ChoroplethData {
    pub metric: String,
    pub values: BTreeMap<String, f64>,
}

/// Join the table's `state` column against the boundary regions and
/// aggregate the metric per region.
///
/// The join is an exact, case-sensitive string match. Unmatched table rows
/// are excluded; unmatched polygons are left for the renderer's default
/// fill. Rows whose metric value is missing or non-numeric are excluded at
/// row granularity. When the same state appears on several rows the last
/// one wins.
pub fn build_choropleth(
    table: &Table,
    metric: Option<&str>,
    boundaries: Option<&BoundaryDataset>,
) -> Option<ChoroplethData> {
    let metric = metric?;
    let boundaries = boundaries?;
    let state_col = table.column(STATE_COLUMN)?;
    let metric_col = table.column(metric)?;

    let mut values = BTreeMap::new();
    for (state_cell, metric_cell) in state_col.values.iter().zip(&metric_col.values) {
        if state_cell.is_null() {
            continue;
        }
        let state = state_cell.to_string();
        if !boundaries.contains_region(&state) {
            continue;
        }
        if let Some(value) = metric_cell.parse_f64() {
            values.insert(state, value);
        }
    }

    info!(
        "choropleth joined {} of {} boundary regions on '{metric}'",
        values.len(),
        boundaries.region_names.len()
    );
    Some(ChoroplethData {
        metric: metric.to_string(),
        values,
    })
}

// ---------------------------------------------------------------------------
// Point markers
// ---------------------------------------------------------------------------

/// A point annotation at a row's coordinates, colored by cluster label.
#[derive(Debug, Clone, Serialize)]
pub struct Marker {
    pub latitude: f64,
    pub longitude: f64,
    pub color: MarkerColor,
    pub popup: String,
}

/// Markers that survived the coordinate gate, plus a count of rows dropped
/// for malformed or missing coordinates.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MarkerSet {
    pub markers: Vec<Marker>,
    pub skipped: usize,
}

/// Build one marker per row whose `latitude` and `longitude` both parse as
/// finite floats. Rows failing either check are counted and skipped, never
/// reported individually and never fatal to the batch. With the coordinate
/// columns absent entirely, the result is an empty set.
pub fn build_markers(
    table: &Table,
    assignment: &ClusterAssignment,
    metric: Option<&str>,
) -> MarkerSet {
    let (Some(lat_col), Some(lon_col)) = (
        table.column(LATITUDE_COLUMN),
        table.column(LONGITUDE_COLUMN),
    ) else {
        return MarkerSet::default();
    };

    let mut set = MarkerSet::default();
    for row in 0..table.row_count() {
        let coords = lat_col.values[row]
            .parse_f64()
            .zip(lon_col.values[row].parse_f64());
        let Some((latitude, longitude)) = coords else {
            set.skipped += 1;
            continue;
        };

        let label = assignment.get(row).copied().unwrap_or(0);
        set.markers.push(Marker {
            latitude,
            longitude,
            color: MarkerColor::for_cluster(label),
            popup: popup_text(table, row, metric),
        });
    }

    if set.skipped > 0 {
        info!("skipped {} rows with unparseable coordinates", set.skipped);
    }
    set
}

/// Fixed popup template: state name and selected metric value, each falling
/// back to an empty string when absent.
fn popup_text(table: &Table, row: usize, metric: Option<&str>) -> String {
    let state = table
        .cell(STATE_COLUMN, row)
        .map(|c| c.to_string())
        .unwrap_or_default();
    let metric_label = metric.unwrap_or_default();
    let value = metric
        .and_then(|m| table.cell(m, row))
        .map(|c| c.to_string())
        .unwrap_or_default();
    format!("State: {state}<br>{metric_label}: {value}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{CellValue, Column, ColumnType};
    use std::collections::BTreeSet;

    fn boundary_with(names: &[&str]) -> BoundaryDataset {
        BoundaryDataset {
            region_names: names.iter().map(|s| s.to_string()).collect::<BTreeSet<_>>(),
            raw: serde_json::json!({"type": "FeatureCollection", "features": []}),
        }
    }

    fn geo_table() -> Table {
        Table::new(vec![
            Column {
                name: "state".into(),
                ty: ColumnType::Text,
                values: vec![
                    CellValue::Text("A".into()),
                    CellValue::Text("B".into()),
                    CellValue::Text("C".into()),
                ],
            },
            Column {
                name: "latitude".into(),
                ty: ColumnType::Text,
                values: vec![
                    CellValue::Text("10".into()),
                    CellValue::Text("x".into()),
                    CellValue::Null,
                ],
            },
            Column {
                name: "longitude".into(),
                ty: ColumnType::Integer,
                values: vec![
                    CellValue::Integer(20),
                    CellValue::Integer(30),
                    CellValue::Integer(40),
                ],
            },
            Column {
                name: "pop".into(),
                ty: ColumnType::Integer,
                values: vec![
                    CellValue::Integer(5),
                    CellValue::Integer(9),
                    CellValue::Null,
                ],
            },
        ])
        .unwrap()
    }

    #[test]
    fn choropleth_absent_without_boundaries() {
        let table = geo_table();
        assert!(build_choropleth(&table, Some("pop"), None).is_none());
    }

    #[test]
    fn choropleth_absent_without_metric() {
        let table = geo_table();
        let boundaries = boundary_with(&["A", "B"]);
        assert!(build_choropleth(&table, None, Some(&boundaries)).is_none());
    }

    #[test]
    fn choropleth_joins_exact_names_and_drops_null_metrics() {
        let table = geo_table();
        let boundaries = boundary_with(&["A", "C", "Z"]);
        let data = build_choropleth(&table, Some("pop"), Some(&boundaries)).unwrap();
        // B is not a boundary region; C's metric is null.
        assert_eq!(data.values.len(), 1);
        assert_eq!(data.values.get("A"), Some(&5.0));
    }

    #[test]
    fn markers_gate_on_finite_coordinates() {
        let table = geo_table();
        let set = build_markers(&table, &vec![0, 1, 0], Some("pop"));
        // Row 1 has latitude "x", row 2 has null latitude.
        assert_eq!(set.markers.len(), 1);
        assert_eq!(set.skipped, 2);
        assert_eq!(set.markers[0].latitude, 10.0);
        assert_eq!(set.markers[0].longitude, 20.0);
        assert_eq!(set.markers[0].color, MarkerColor::Red);
    }

    #[test]
    fn marker_popup_embeds_state_and_metric() {
        let table = geo_table();
        let set = build_markers(&table, &vec![0, 0, 0], Some("pop"));
        assert_eq!(set.markers[0].popup, "State: A<br>pop: 5");
    }

    #[test]
    fn marker_popup_degrades_to_empty_strings() {
        let table = Table::new(vec![
            Column {
                name: "latitude".into(),
                ty: ColumnType::Float,
                values: vec![CellValue::Float(1.0)],
            },
            Column {
                name: "longitude".into(),
                ty: ColumnType::Float,
                values: vec![CellValue::Float(2.0)],
            },
        ])
        .unwrap();
        let set = build_markers(&table, &vec![0], None);
        assert_eq!(set.markers[0].popup, "State: <br>: ");
    }

    #[test]
    fn missing_coordinate_columns_yield_empty_marker_set() {
        let table = Table::new(vec![Column {
            name: "pop".into(),
            ty: ColumnType::Integer,
            values: vec![CellValue::Integer(5)],
        }])
        .unwrap();
        let set = build_markers(&table, &vec![0], Some("pop"));
        assert!(set.markers.is_empty());
        assert_eq!(set.skipped, 0);
    }

    #[test]
    fn marker_colors_follow_the_cluster_lookup() {
        let table = Table::new(vec![
            Column {
                name: "latitude".into(),
                ty: ColumnType::Float,
                values: vec![CellValue::Float(1.0); 4],
            },
            Column {
                name: "longitude".into(),
                ty: ColumnType::Float,
                values: vec![CellValue::Float(2.0); 4],
            },
        ])
        .unwrap();
        let set = build_markers(&table, &vec![0, 1, 2, 7], None);
        let colors: Vec<_> = set.markers.iter().map(|m| m.color).collect();
        assert_eq!(
            colors,
            vec![
                MarkerColor::Red,
                MarkerColor::Orange,
                MarkerColor::Green,
                MarkerColor::Green
            ]
        );
    }
}
