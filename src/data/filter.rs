use log::warn;

use super::model::Record;
use crate::schema::Field;

// ---------------------------------------------------------------------------
// FilterCriteria: exact-match constraints on the filterable fields
// ---------------------------------------------------------------------------

/// The active filter constraints. `None` (or an empty string via [`set`])
/// means "no constraint on this field". A record must satisfy every active
/// constraint to stay in the filtered subset.
///
/// [`set`]: FilterCriteria::set
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterCriteria {
    pub product_family: Option<String>,
    pub assembly: Option<String>,
}

impl FilterCriteria {
    /// The constraint value for one filterable field, if active.
    pub fn constraint(&self, field: Field) -> Option<&str> {
        match field {
            Field::ProductFamily => self.product_family.as_deref(),
            Field::Assembly => self.assembly.as_deref(),
            _ => None,
        }
    }

    /// Set or clear a constraint. Empty strings clear, like an "All" option
    /// in a select box. Non-filterable fields are ignored.
    pub fn set(&mut self, field: Field, value: Option<String>) {
        let value = value.filter(|v| !v.is_empty());
        match field {
            Field::ProductFamily => self.product_family = value,
            Field::Assembly => self.assembly = value,
            other => warn!("field {other} is not filterable"),
        }
    }

    /// Whether no constraint is active.
    pub fn is_empty(&self) -> bool {
        Field::FILTERABLE
            .iter()
            .all(|&f| self.constraint(f).is_none())
    }

    /// Whether one record satisfies every active constraint. Matching is
    /// exact on the display string with null coerced to "" (so a null field
    /// never matches a non-empty constraint).
    pub fn matches(&self, record: &Record) -> bool {
        Field::FILTERABLE.iter().all(|&field| {
            match self.constraint(field) {
                Some(wanted) => record.value(field).to_string() == wanted,
                None => true,
            }
        })
    }

    /// Apply the criteria to the full collection, producing the active
    /// subset as an independent sequence in original order. Empty criteria
    /// copy everything.
    pub fn apply(&self, full: &[Record]) -> Vec<Record> {
        full.iter().filter(|r| self.matches(r)).cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(family: Option<&str>, assembly: Option<&str>) -> Record {
        Record {
            product_family: family.map(str::to_string),
            assembly: assembly.map(str::to_string),
            ..Record::default()
        }
    }

    #[test]
    fn empty_criteria_copy_everything_in_order() {
        let full = vec![rec(Some("A"), None), rec(Some("B"), Some("PSU"))];
        let active = FilterCriteria::default().apply(&full);
        assert_eq!(active, full);
    }

    #[test]
    fn exact_match_only() {
        let full = vec![
            rec(Some("X"), None),
            rec(Some("X-Ray"), None),
            rec(Some("x"), None),
        ];
        let mut criteria = FilterCriteria::default();
        criteria.set(Field::ProductFamily, Some("X".into()));
        let active = criteria.apply(&full);
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].product_family.as_deref(), Some("X"));
    }

    #[test]
    fn null_field_never_matches_a_constraint() {
        let full = vec![rec(None, None)];
        let mut criteria = FilterCriteria::default();
        criteria.set(Field::ProductFamily, Some("X".into()));
        assert!(criteria.apply(&full).is_empty());
    }

    #[test]
    fn constraints_combine_with_logical_and() {
        let full = vec![
            rec(Some("X"), Some("PSU")),
            rec(Some("X"), Some("Main Board")),
            rec(Some("Y"), Some("PSU")),
        ];
        let mut criteria = FilterCriteria::default();
        criteria.set(Field::ProductFamily, Some("X".into()));
        criteria.set(Field::Assembly, Some("PSU".into()));
        let active = criteria.apply(&full);
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].assembly.as_deref(), Some("PSU"));
    }

    #[test]
    fn empty_string_clears_a_constraint() {
        let mut criteria = FilterCriteria::default();
        criteria.set(Field::Assembly, Some("PSU".into()));
        criteria.set(Field::Assembly, Some(String::new()));
        assert!(criteria.is_empty());
    }
}
