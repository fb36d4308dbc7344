/// Data layer: core types, loading, and column classification.
///
/// ```text
///  CSV (URL or path)
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  fetch + parse → Table (typed columns)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Table    │  ordered columns, immutable once loaded
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ classify  │  declared types → numeric / other buckets
///   └──────────┘
/// ```
pub mod classify;
pub mod loader;
pub mod model;
