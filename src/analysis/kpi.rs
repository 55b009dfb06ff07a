use crate::data::model::Record;

// ---------------------------------------------------------------------------
// KPI statistics over the TAT field
// ---------------------------------------------------------------------------

/// Turnaround-time summary statistics. All values are finite; absence of
/// data is `None` at the call site, never NaN or infinity here.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KpiSummary {
    pub average: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
}

/// Summarize the TAT values of a record collection. Returns `None` when no
/// finite observation exists, which consumers render as "N/A" rather than an
/// error. Values are full precision; rounding for display is the caller's
/// concern.
pub fn summarize_tat(records: &[Record]) -> Option<KpiSummary> {
    let mut values: Vec<f64> = records
        .iter()
        .filter_map(|r| r.tat)
        .filter(|v| v.is_finite())
        .collect();

    if values.is_empty() {
        return None;
    }

    values.sort_by(f64::total_cmp);
    let n = values.len();

    let average = values.iter().sum::<f64>() / n as f64;
    let median = if n % 2 == 1 {
        values[n / 2]
    } else {
        (values[n / 2 - 1] + values[n / 2]) / 2.0
    };

    Some(KpiSummary {
        average,
        median,
        min: values[0],
        max: values[n - 1],
    })
}
