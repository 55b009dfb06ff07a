//! Defect analytics core for production quality dashboards.
//!
//! Ingests tabular defect records (CSV/JSON), normalizes a fixed set of
//! named columns into canonical records, and derives the aggregate views a
//! dashboard renders: per-category frequency breakdowns with top-N grouping
//! and TAT (turnaround time) KPI statistics, all filter-aware.
//!
//! The crate never renders anything and never persists anything; it turns a
//! sequence of raw rows into summaries and hands them to collaborators.

pub mod analysis;
pub mod data;
pub mod schema;
pub mod state;

pub use analysis::aggregate::{count_categories, CategorySummary, SortPolicy};
pub use analysis::kpi::{summarize_tat, KpiSummary};
pub use data::decode::{decode_file, DecodeError};
pub use data::filter::FilterCriteria;
pub use data::model::{Dataset, RawRecord, RawValue, Record, Value};
pub use data::normalize::normalize;
pub use schema::{Field, Schema};
pub use state::Session;
