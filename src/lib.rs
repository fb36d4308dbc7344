//! rusty-atlas: a deterministic data-to-visualization pipeline.
//!
//! Loads a CSV of regional statistics, classifies its columns, annotates
//! rows with k-means cluster labels, joins an optional GeoJSON boundary
//! file into a choropleth aggregation, and assembles a serializable
//! [`render::RenderPayload`] (table preview + map layers + notices) for an
//! external UI shell to draw.
//!
//! The pipeline is strictly linear and re-executed in full on every
//! trigger; only the loaded table is cached across runs, keyed by its
//! source identifier.

pub mod cluster;
pub mod color;
pub mod config;
pub mod data;
pub mod error;
pub mod geo;
pub mod pipeline;
pub mod render;

pub use config::PipelineConfig;
pub use data::classify::{classify, ColumnClassification};
pub use data::loader::Source;
pub use data::model::{CellValue, Column, ColumnType, Table};
pub use error::{LoadError, PipelineError};
pub use pipeline::Pipeline;
pub use render::{Notice, RenderPayload};
