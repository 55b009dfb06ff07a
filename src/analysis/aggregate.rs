use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use crate::data::model::{Record, Value};
use crate::schema::Field;

// ---------------------------------------------------------------------------
// Category counting with top-N grouping
// ---------------------------------------------------------------------------

/// How category entries are ordered before grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortPolicy {
    /// By count, largest first. Ties keep first-seen order.
    CountDesc,
    /// By count, smallest first. Ties keep first-seen order.
    CountAsc,
    /// By label, natural ordering ("Week 9" before "Week 10").
    Alpha,
    /// By the numeric value of the label. Non-numeric labels sort last.
    Ordinal,
}

/// One category entry.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryCount {
    pub label: String,
    pub count: u64,
}

/// An ordered label → count breakdown for one field, ready for a frequency
/// chart. `entries` is the final caller-visible order (the "Other" bucket,
/// when present, is always last); `raw_counts` holds the per-label counts
/// before any grouping.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategorySummary {
    pub entries: Vec<CategoryCount>,
    pub raw_counts: BTreeMap<String, u64>,
}

impl CategorySummary {
    pub fn labels(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.label.as_str()).collect()
    }

    pub fn counts(&self) -> Vec<u64> {
        self.entries.iter().map(|e| e.count).collect()
    }

    /// Sum of the post-grouping counts. Equals the input record count.
    pub fn total(&self) -> u64 {
        self.entries.iter().map(|e| e.count).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Count how often each label of `field` occurs across `records`.
///
/// Null values bucket under the label "Unknown" — which also means a genuine
/// category literally named "Unknown" lands in the same bucket. Inherited
/// behavior; do not separate the two without a product decision.
///
/// With `limit = Some(n)` and more than `n` distinct labels, the first
/// `n - 1` post-sort entries are kept and the rest fold into a single
/// `Other (k items)` entry appended at the end. No record is ever dropped:
/// the counts always sum to `records.len()`.
pub fn count_categories(
    records: &[Record],
    field: Field,
    limit: Option<usize>,
    sort: SortPolicy,
) -> CategorySummary {
    // First-seen order matters: it is the tie-break for the count sorts.
    let mut entries: Vec<CategoryCount> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for record in records {
        let label = match record.value(field) {
            Value::Null => "Unknown".to_string(),
            value => value.to_string(),
        };
        match index.get(&label) {
            Some(&i) => entries[i].count += 1,
            None => {
                index.insert(label.clone(), entries.len());
                entries.push(CategoryCount { label, count: 1 });
            }
        }
    }

    let raw_counts: BTreeMap<String, u64> = entries
        .iter()
        .map(|e| (e.label.clone(), e.count))
        .collect();

    // All slice sorts below are stable, so equal keys keep insertion order.
    match sort {
        SortPolicy::CountDesc => entries.sort_by(|a, b| b.count.cmp(&a.count)),
        SortPolicy::CountAsc => entries.sort_by(|a, b| a.count.cmp(&b.count)),
        SortPolicy::Alpha => entries.sort_by(|a, b| natural_cmp(&a.label, &b.label)),
        SortPolicy::Ordinal => entries.sort_by(|a, b| {
            ordinal_key(&a.label).total_cmp(&ordinal_key(&b.label))
        }),
    }

    if let Some(limit) = limit.filter(|&l| l >= 1) {
        if entries.len() > limit {
            let folded = entries.split_off(limit - 1);
            let folded_sum: u64 = folded.iter().map(|e| e.count).sum();
            if folded_sum > 0 {
                entries.push(CategoryCount {
                    label: format!("Other ({} items)", folded.len()),
                    count: folded_sum,
                });
            }
        }
    }

    CategorySummary {
        entries,
        raw_counts,
    }
}

fn ordinal_key(label: &str) -> f64 {
    label.trim().parse::<f64>().unwrap_or(f64::INFINITY)
}

// ---------------------------------------------------------------------------
// Natural string ordering
// ---------------------------------------------------------------------------

/// Case-insensitive comparison where digit runs compare by numeric magnitude,
/// so "Week 9" sorts before "Week 10".
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut ia = a.chars().peekable();
    let mut ib = b.chars().peekable();

    loop {
        match (ia.peek().copied(), ib.peek().copied()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(ca), Some(cb)) => {
                if ca.is_ascii_digit() && cb.is_ascii_digit() {
                    let da = take_digits(&mut ia);
                    let db = take_digits(&mut ib);
                    match cmp_digit_run(&da, &db) {
                        Ordering::Equal => continue,
                        ord => return ord,
                    }
                }
                let la = ca.to_ascii_lowercase();
                let lb = cb.to_ascii_lowercase();
                if la != lb {
                    return la.cmp(&lb);
                }
                ia.next();
                ib.next();
            }
        }
    }
}

fn take_digits(it: &mut std::iter::Peekable<std::str::Chars<'_>>) -> String {
    let mut run = String::new();
    while let Some(&c) = it.peek() {
        if !c.is_ascii_digit() {
            break;
        }
        run.push(c);
        it.next();
    }
    run
}

/// Compare two digit runs by magnitude without parsing (runs can exceed u64).
fn cmp_digit_run(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(stage: Option<&str>, week: Option<u32>) -> Record {
        Record {
            detection_stage: stage.map(str::to_string),
            week,
            ..Record::default()
        }
    }

    fn stages(names: &[Option<&str>]) -> Vec<Record> {
        names.iter().map(|n| rec(*n, None)).collect()
    }

    #[test]
    fn counts_are_conserved_under_any_limit() {
        let records = stages(&[
            Some("A"), Some("A"), Some("B"), Some("C"), Some("D"), None,
        ]);
        for limit in [None, Some(1), Some(2), Some(3), Some(10)] {
            let summary =
                count_categories(&records, Field::DetectionStage, limit, SortPolicy::CountDesc);
            assert_eq!(summary.total(), records.len() as u64, "limit {limit:?}");
        }
    }

    #[test]
    fn limit_one_folds_everything_into_other() {
        let records = stages(&[Some("A"), Some("B"), Some("C")]);
        let summary =
            count_categories(&records, Field::DetectionStage, Some(1), SortPolicy::CountDesc);
        assert_eq!(summary.entries.len(), 1);
        assert_eq!(summary.entries[0].label, "Other (3 items)");
        assert_eq!(summary.entries[0].count, 3);
    }

    #[test]
    fn other_bucket_is_appended_after_kept_slots() {
        let records = stages(&[
            Some("A"), Some("A"), Some("A"),
            Some("B"), Some("B"),
            Some("C"),
            Some("D"),
        ]);
        let summary =
            count_categories(&records, Field::DetectionStage, Some(3), SortPolicy::CountDesc);
        assert_eq!(summary.labels(), vec!["A", "B", "Other (2 items)"]);
        assert_eq!(summary.counts(), vec![3, 2, 2]);
        // raw counts stay ungrouped
        assert_eq!(summary.raw_counts["C"], 1);
        assert_eq!(summary.raw_counts["D"], 1);
    }

    #[test]
    fn nulls_and_literal_unknown_share_a_bucket() {
        let records = stages(&[Some("Unknown"), None, Some("A")]);
        let summary =
            count_categories(&records, Field::DetectionStage, None, SortPolicy::CountDesc);
        assert_eq!(summary.entries[0].label, "Unknown");
        assert_eq!(summary.entries[0].count, 2);
    }

    #[test]
    fn count_ties_keep_first_seen_order() {
        let records = stages(&[Some("B"), Some("A"), Some("C"), Some("A")]);
        let summary =
            count_categories(&records, Field::DetectionStage, None, SortPolicy::CountDesc);
        assert_eq!(summary.labels(), vec!["A", "B", "C"]);
    }

    #[test]
    fn alpha_sort_is_natural() {
        let records = stages(&[Some("Week 2"), Some("Week 10"), Some("Week 1")]);
        let summary =
            count_categories(&records, Field::DetectionStage, None, SortPolicy::Alpha);
        assert_eq!(summary.labels(), vec!["Week 1", "Week 2", "Week 10"]);
    }

    #[test]
    fn ordinal_sort_orders_week_numbers() {
        let records: Vec<Record> = [Some(10), Some(2), None, Some(1)]
            .iter()
            .map(|w| rec(None, *w))
            .collect();
        let summary = count_categories(&records, Field::Week, None, SortPolicy::Ordinal);
        // "Unknown" is not numeric and sorts last.
        assert_eq!(summary.labels(), vec!["1", "2", "10", "Unknown"]);
    }

    #[test]
    fn empty_input_yields_empty_summary() {
        let summary = count_categories(&[], Field::Assembly, Some(5), SortPolicy::CountDesc);
        assert!(summary.is_empty());
        assert_eq!(summary.total(), 0);
    }

    #[test]
    fn natural_cmp_handles_mixed_text() {
        assert_eq!(natural_cmp("a2", "A10"), Ordering::Less);
        assert_eq!(natural_cmp("b1", "a2"), Ordering::Greater);
        assert_eq!(natural_cmp("007", "7"), Ordering::Equal);
        assert_eq!(natural_cmp("x", "x1"), Ordering::Less);
    }
}
