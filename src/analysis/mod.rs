/// Aggregate views over normalized records: category breakdowns for the
/// frequency charts and KPI statistics for the TAT cards. Both are pure
/// functions of the record slice they are given — callers pass the active
/// subset, never ambient state.

pub mod aggregate;
pub mod kpi;
