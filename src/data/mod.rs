/// Data layer: core types, loading, cleaning and export.
///
/// Architecture:
/// ```text
///  Bloodhound export (.xls, really space/tab-delimited text)
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse rows → WorkingSet
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  clean    │  trim → remove_duplicates → remove_gaps
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  export   │  TSV / CSV / JSON / Parquet
///   └──────────┘
/// ```

pub mod clean;
pub mod export;
pub mod loader;
pub mod model;
