/// Data layer: member table, loading, filtering and aggregation.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → MemberTable (Admission Year derived)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  FilterSelection → subset, cascading option lists
///   └──────────┘
///        │                         │
///        ▼                         ▼
///   ┌──────────┐             ┌──────────┐
///   │ summary   │ counts/%    │  growth   │ year-over-year on full table
///   └──────────┘             └──────────┘
/// ```
pub mod filter;
pub mod growth;
pub mod loader;
pub mod model;
pub mod summary;

pub use filter::{
    apply_filters, country_options, dimension_options, filtered_indices, region_options,
    FilterSelection,
};
pub use growth::{count_at, growth, GrowthResult, MemberPredicate};
pub use model::{Dimension, FieldValue, MemberRecord, MemberTable, SchemaError};
pub use summary::{summarize, summarize_named, Distribution, DistributionEntry};
