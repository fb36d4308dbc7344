//! Geographic overlays: choropleth aggregation and point markers.

pub mod boundary;
pub mod overlay;
