use std::collections::BTreeMap;

use palette::{Hsl, IntoColor, Srgb};
use serde::Serialize;

// ---------------------------------------------------------------------------
// Marker colors: fixed cluster-label lookup
// ---------------------------------------------------------------------------

/// Display color of a point marker. The three-way mapping from cluster
/// label is a product decision, not inferred from data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerColor {
    Red,
    Orange,
    Green,
}

/// Lookup table indexed by cluster label; labels beyond the table default
/// to the last entry.
const CLUSTER_COLORS: [MarkerColor; 3] = [MarkerColor::Red, MarkerColor::Orange, MarkerColor::Green];

impl MarkerColor {
    pub fn for_cluster(label: u32) -> MarkerColor {
        let idx = (label as usize).min(CLUSTER_COLORS.len() - 1);
        CLUSTER_COLORS[idx]
    }
}

// ---------------------------------------------------------------------------
// Choropleth fill ramp
// ---------------------------------------------------------------------------

/// Generate per-region fill colors on a sequential yellow→red ramp, scaled
/// over the joined value range. With a degenerate range every region gets
/// the ramp midpoint.
pub fn fill_colors(values: &BTreeMap<String, f64>) -> BTreeMap<String, String> {
    if values.is_empty() {
        return BTreeMap::new();
    }
    let min = values.values().cloned().fold(f64::INFINITY, f64::min);
    let max = values.values().cloned().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;

    values
        .iter()
        .map(|(region, &value)| {
            let t = if range.abs() < f64::EPSILON {
                0.5
            } else {
                (value - min) / range
            };
            (region.clone(), ramp_hex(t as f32))
        })
        .collect()
}

/// Interpolate on a yellow-orange-red ramp: hue 55° → 0°, darkening as the
/// value grows.
fn ramp_hex(t: f32) -> String {
    let t = t.clamp(0.0, 1.0);
    let hue = 55.0 * (1.0 - t);
    let lightness = 0.8 - 0.4 * t;
    let hsl = Hsl::new(hue, 0.85, lightness);
    let rgb: Srgb = hsl.into_color();
    format!(
        "#{:02x}{:02x}{:02x}",
        (rgb.red * 255.0) as u8,
        (rgb.green * 255.0) as u8,
        (rgb.blue * 255.0) as u8
    )
}
