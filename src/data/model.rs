use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::analysis::aggregate::natural_cmp;
use crate::schema::{Field, Schema};

// ---------------------------------------------------------------------------
// RawValue – a single cell as produced by the decoder
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value straight out of the tabular decoder.
/// Only exists at the input boundary; normalization collapses it to [`Value`].
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawValue::Text(s) => write!(f, "{s}"),
            RawValue::Integer(i) => write!(f, "{i}"),
            RawValue::Float(v) => write!(f, "{v}"),
            RawValue::Bool(b) => write!(f, "{b}"),
            RawValue::Null => Ok(()),
        }
    }
}

impl RawValue {
    /// The cell as trimmed text, with empty and null collapsed to `None`.
    /// First step of every field's normalization.
    pub fn as_clean_text(&self) -> Option<String> {
        match self {
            RawValue::Null => None,
            RawValue::Text(s) => {
                let t = s.trim();
                if t.is_empty() {
                    None
                } else {
                    Some(t.to_string())
                }
            }
            other => Some(other.to_string()),
        }
    }
}

/// One decoded row: trimmed source header → raw cell value.
pub type RawRecord = BTreeMap<String, RawValue>;

// ---------------------------------------------------------------------------
// Value – a canonical cell (what aggregation and export see)
// ---------------------------------------------------------------------------

/// A canonical cell value: text, a finite number, or null.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Text(String),
    Number(f64),
    Null,
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => write!(f, "{s}"),
            // Whole numbers print without a trailing ".0" so week 7 labels
            // as "7", matching the category labels filters compare against.
            Value::Number(v) if v.fract() == 0.0 && v.abs() < 1e15 => {
                write!(f, "{}", *v as i64)
            }
            Value::Number(v) => write!(f, "{v}"),
            Value::Null => Ok(()),
        }
    }
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

// ---------------------------------------------------------------------------
// Record – one normalized defect entry (one row of the source sheet)
// ---------------------------------------------------------------------------

/// A canonical record with one slot per schema field. Every string is
/// trimmed and non-empty, `tat` is finite, `week` is the extracted week
/// number. `None` everywhere a value was missing or failed coercion.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    pub week: Option<u32>,
    pub product_family: Option<String>,
    pub assembly: Option<String>,
    pub detection_stage: Option<String>,
    pub problem_observed: Option<String>,
    pub functionality: Option<String>,
    pub responsible: Option<String>,
    pub problem_analysis: Option<String>,
    pub tat: Option<f64>,
    pub submitted_by: Option<String>,
}

impl Record {
    /// The canonical value of one semantic field.
    pub fn value(&self, field: Field) -> Value {
        fn text(v: &Option<String>) -> Value {
            match v {
                Some(s) => Value::Text(s.clone()),
                None => Value::Null,
            }
        }
        match field {
            Field::Week => self
                .week
                .map(|w| Value::Number(w as f64))
                .unwrap_or(Value::Null),
            Field::Tat => self.tat.map(Value::Number).unwrap_or(Value::Null),
            Field::ProductFamily => text(&self.product_family),
            Field::Assembly => text(&self.assembly),
            Field::DetectionStage => text(&self.detection_stage),
            Field::ProblemObserved => text(&self.problem_observed),
            Field::Functionality => text(&self.functionality),
            Field::Responsible => text(&self.responsible),
            Field::ProblemAnalysis => text(&self.problem_analysis),
            Field::SubmittedBy => text(&self.submitted_by),
        }
    }

    /// Whether every field is null. Such records are dropped on normalization.
    pub fn is_blank(&self) -> bool {
        Field::ALL.iter().all(|&f| self.value(f).is_null())
    }

    /// The record as an export row keyed by source header, the shape the
    /// export and rendering collaborators consume.
    pub fn export_row(&self, schema: &Schema) -> BTreeMap<String, Value> {
        Field::ALL
            .iter()
            .map(|&f| (schema.header(f).to_string(), self.value(f)))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete normalized collection
// ---------------------------------------------------------------------------

/// The full normalized dataset plus pre-computed filter options.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    /// All normalized records, in source order.
    pub records: Vec<Record>,
    /// For each filterable field the distinct non-null labels across the
    /// full dataset, natural-sorted. Feeds the filter-options collaborator.
    pub filter_options: BTreeMap<Field, Vec<String>>,
}

impl Dataset {
    /// Build the dataset and its filter-option index from normalized records.
    pub fn from_records(records: Vec<Record>) -> Self {
        let mut filter_options = BTreeMap::new();
        for &field in &Field::FILTERABLE {
            let mut labels: Vec<String> = Vec::new();
            for rec in &records {
                let value = rec.value(field);
                if value.is_null() {
                    continue;
                }
                let label = value.to_string();
                if !labels.contains(&label) {
                    labels.push(label);
                }
            }
            labels.sort_by(|a, b| natural_cmp(a, b));
            filter_options.insert(field, labels);
        }
        Dataset {
            records,
            filter_options,
        }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Serialize records as JSON rows keyed by source header — the verbatim
/// export feed handed to document/report collaborators.
pub fn export_json(records: &[Record], schema: &Schema) -> serde_json::Result<String> {
    let rows: Vec<BTreeMap<String, Value>> =
        records.iter().map(|r| r.export_row(schema)).collect();
    serde_json::to_string_pretty(&rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(family: &str, week: u32) -> Record {
        Record {
            week: Some(week),
            product_family: Some(family.to_string()),
            ..Record::default()
        }
    }

    #[test]
    fn week_value_displays_without_decimals() {
        let r = rec("X", 7);
        assert_eq!(r.value(Field::Week).to_string(), "7");
    }

    #[test]
    fn blank_record_detected() {
        assert!(Record::default().is_blank());
        assert!(!rec("X", 1).is_blank());
    }

    #[test]
    fn export_row_is_keyed_by_source_headers() {
        let schema = Schema::default();
        let row = rec("Alpha", 3).export_row(&schema);
        assert_eq!(row.len(), Field::ALL.len());
        assert_eq!(row.get("Product Family"), Some(&Value::Text("Alpha".into())));
        assert_eq!(row.get("TAT"), Some(&Value::Null));
    }

    #[test]
    fn filter_options_are_distinct_and_natural_sorted() {
        let records = vec![rec("Line 10", 1), rec("Line 2", 2), rec("Line 2", 3)];
        let ds = Dataset::from_records(records);
        assert_eq!(
            ds.filter_options[&Field::ProductFamily],
            vec!["Line 2".to_string(), "Line 10".to_string()]
        );
    }
}
