/// Data layer: core types, loading, and filtering.
///
/// Architecture:
/// ```text
///  upload (.csv / .xlsx)
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse bytes → RecordTable (or LoadError)
///   └──────────┘
///        │
///        ▼
///   ┌─────────────┐
///   │ RecordTable │  header + rows of CellValue
///   └─────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  date cutoff, group counts, null drop → SecurityViews
///   └──────────┘
/// ```

pub mod error;
pub mod filter;
pub mod loader;
pub mod model;
