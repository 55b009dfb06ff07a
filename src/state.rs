use log::info;

use crate::data::filter::FilterCriteria;
use crate::data::model::{Dataset, Record};
use crate::schema::{Field, Schema};

// ---------------------------------------------------------------------------
// Session state
// ---------------------------------------------------------------------------

/// One analysis session: the schema in effect, the full dataset from the
/// last successful load, and the filtered `active` subset the aggregate
/// views are computed over.
///
/// `active` is rebuilt in full on every criteria change and then swapped in,
/// so a reader never observes a partially filtered collection. Single
/// writer; no state is held between the pure operations this drives.
pub struct Session {
    pub schema: Schema,

    /// Loaded dataset (`None` until the first successful load).
    pub dataset: Option<Dataset>,

    /// The active exact-match constraints.
    pub criteria: FilterCriteria,

    /// Records passing the current criteria, in original order (cached).
    active: Vec<Record>,
}

impl Default for Session {
    fn default() -> Self {
        Session::new(Schema::default())
    }
}

impl Session {
    pub fn new(schema: Schema) -> Self {
        Session {
            schema,
            dataset: None,
            criteria: FilterCriteria::default(),
            active: Vec::new(),
        }
    }

    /// Ingest a newly normalized dataset: criteria reset, everything active.
    pub fn set_dataset(&mut self, dataset: Dataset) {
        info!("loaded dataset with {} records", dataset.len());
        self.criteria = FilterCriteria::default();
        self.active = dataset.records.clone();
        self.dataset = Some(dataset);
    }

    /// The filtered subset the views are computed over.
    pub fn active(&self) -> &[Record] {
        &self.active
    }

    /// Distinct labels available for one filterable field, natural-sorted.
    /// Always computed over the full dataset, not the active subset.
    pub fn filter_options(&self, field: Field) -> &[String] {
        self.dataset
            .as_ref()
            .and_then(|ds| ds.filter_options.get(&field))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Set or clear one constraint and rebuild the active subset.
    pub fn set_constraint(&mut self, field: Field, value: Option<String>) {
        self.criteria.set(field, value);
        self.refilter();
    }

    /// Clear every constraint.
    pub fn reset_filters(&mut self) {
        self.criteria = FilterCriteria::default();
        self.refilter();
    }

    /// Recompute `active` from scratch against the full dataset.
    pub fn refilter(&mut self) {
        if let Some(ds) = &self.dataset {
            self.active = self.criteria.apply(&ds.records);
            info!("{} of {} records match the filters", self.active.len(), ds.len());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset() -> Dataset {
        let records = vec![
            Record {
                product_family: Some("X".into()),
                tat: Some(2.0),
                ..Record::default()
            },
            Record {
                product_family: Some("Y".into()),
                tat: Some(8.0),
                ..Record::default()
            },
        ];
        Dataset::from_records(records)
    }

    #[test]
    fn set_dataset_activates_everything_and_resets_criteria() {
        let mut session = Session::default();
        session.set_constraint(Field::ProductFamily, Some("X".into()));
        session.set_dataset(dataset());
        assert_eq!(session.active().len(), 2);
        assert!(session.criteria.is_empty());
    }

    #[test]
    fn constraints_rebuild_the_active_subset() {
        let mut session = Session::default();
        session.set_dataset(dataset());
        session.set_constraint(Field::ProductFamily, Some("X".into()));
        assert_eq!(session.active().len(), 1);
        session.reset_filters();
        assert_eq!(session.active().len(), 2);
    }

    #[test]
    fn filter_options_come_from_the_full_dataset() {
        let mut session = Session::default();
        session.set_dataset(dataset());
        session.set_constraint(Field::ProductFamily, Some("X".into()));
        assert_eq!(session.filter_options(Field::ProductFamily), ["X", "Y"]);
    }
}
