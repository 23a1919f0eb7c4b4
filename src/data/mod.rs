/// Data layer: KPI records, loading, and filtering.
///
/// Architecture:
/// ```text
///  combined_kpi_data.csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse + validate → Dataset (cached per path)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Dataset  │  Vec<KpiRecord>, distinct universities / provinces, years
///   └──────────┘
///        │   + Selection (universities, provinces, years, metric)
///        ▼
///   ┌──────────┐
///   │  filter   │  → FilteredView: row indices + metric
///   └──────────┘
/// ```

pub mod loader;
pub mod model;
pub mod filter;
