use std::path::PathBuf;
use std::time::Duration;

use crate::data::loader::Source;

// ---------------------------------------------------------------------------
// Deploy-time constants
// ---------------------------------------------------------------------------

/// Raw CSV with per-state statistics.
pub const CSV_URL: &str =
    "https://raw.githubusercontent.com/nk-mht/fra-atlas/develop/RS_Session_265_AU_1896_B_1.csv";

/// Optional boundary-polygon file for the choropleth layer.
pub const GEOJSON_PATH: &str = "data/india_states.geojson";

/// Feature property holding the region name used for the state join.
pub const REGION_NAME_KEY: &str = "NAME";

/// Table column joined against the region-name property. Exact,
/// case-sensitive match; mismatches are silent non-joins.
pub const STATE_COLUMN: &str = "state";

pub const LATITUDE_COLUMN: &str = "latitude";
pub const LONGITUDE_COLUMN: &str = "longitude";

/// Name of the appended cluster-label column.
pub const CLUSTER_COLUMN: &str = "cluster";

/// Rows shown in the table preview.
pub const PREVIEW_ROWS: usize = 20;

/// Base-map default view.
pub const MAP_CENTER: (f64, f64) = (22.0, 78.0);
pub const MAP_ZOOM: u8 = 5;

/// Client-side bound on the blocking CSV fetch.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

// ---------------------------------------------------------------------------
// PipelineConfig
// ---------------------------------------------------------------------------

/// Where the pipeline reads its inputs from. `Default` wires up the
/// deploy-time constants above.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub csv_source: Source,
    pub geojson_path: PathBuf,
    pub region_name_key: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            csv_source: Source::parse(CSV_URL),
            geojson_path: PathBuf::from(GEOJSON_PATH),
            region_name_key: REGION_NAME_KEY.to_string(),
        }
    }
}
