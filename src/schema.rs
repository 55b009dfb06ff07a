use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::analysis::aggregate::SortPolicy;

/// Max items to show directly on bar charts before grouping into "Other".
pub const MAX_BAR_ITEMS: usize = 15;
/// Max slices for pie/doughnut charts before grouping into "Other".
pub const MAX_PIE_ITEMS: usize = 7;

// ---------------------------------------------------------------------------
// Field – the semantic columns the pipeline understands
// ---------------------------------------------------------------------------

/// A semantic field: a logical data concept independent of the exact column
/// header used in a given source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Week,
    ProductFamily,
    Assembly,
    DetectionStage,
    ProblemObserved,
    Functionality,
    Responsible,
    ProblemAnalysis,
    Tat,
    SubmittedBy,
}

impl Field {
    /// Every semantic field, in canonical column order.
    pub const ALL: [Field; 10] = [
        Field::Week,
        Field::ProductFamily,
        Field::Assembly,
        Field::DetectionStage,
        Field::ProblemObserved,
        Field::Functionality,
        Field::Responsible,
        Field::ProblemAnalysis,
        Field::Tat,
        Field::SubmittedBy,
    ];

    /// Fields exposed for exact-match constraint filtering.
    pub const FILTERABLE: [Field; 2] = [Field::ProductFamily, Field::Assembly];

    /// Stable machine-readable name (used in config files and CLI flags).
    pub fn key(self) -> &'static str {
        match self {
            Field::Week => "week",
            Field::ProductFamily => "product_family",
            Field::Assembly => "assembly",
            Field::DetectionStage => "detection_stage",
            Field::ProblemObserved => "problem_observed",
            Field::Functionality => "functionality",
            Field::Responsible => "responsible",
            Field::ProblemAnalysis => "problem_analysis",
            Field::Tat => "tat",
            Field::SubmittedBy => "submitted_by",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

// ---------------------------------------------------------------------------
// Schema – semantic field → source column header
// ---------------------------------------------------------------------------

/// The mapping from semantic fields to the exact column header strings
/// expected in the source file. Headers are matched verbatim (after trimming)
/// against decoded row keys; this is the single contract with the decoder.
///
/// Changing the schema invalidates previously normalized data — callers must
/// re-normalize from raw records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schema {
    headers: BTreeMap<Field, String>,
}

impl Default for Schema {
    /// The header names of the production quality sheet this tool was built
    /// around.
    fn default() -> Self {
        let headers = [
            (Field::Week, "Week"),
            (Field::ProductFamily, "Product Family"),
            (Field::Assembly, "Assembly"),
            (Field::DetectionStage, "Detection Stage"),
            (Field::ProblemObserved, "Problem Observed"),
            (Field::Functionality, "Functionality"),
            (Field::Responsible, "Responsible"),
            (Field::ProblemAnalysis, "Problem Analysis"),
            (Field::Tat, "TAT"),
            (Field::SubmittedBy, "Submitted By"),
        ]
        .into_iter()
        .map(|(f, h)| (f, h.to_string()))
        .collect();
        Schema { headers }
    }
}

impl Schema {
    /// The source column header for a semantic field. Falls back to the
    /// default mapping when a custom schema omits an entry.
    pub fn header(&self, field: Field) -> &str {
        self.headers
            .get(&field)
            .map(String::as_str)
            .unwrap_or_else(|| default_header(field))
    }

    /// Override the header for one field.
    pub fn set_header(&mut self, field: Field, header: impl Into<String>) {
        self.headers.insert(field, header.into());
    }

    /// Load a custom header mapping from JSON, e.g.
    /// `{"tat": "Turnaround", "product_family": "Family"}`. Omitted fields
    /// keep their default headers.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let overrides: BTreeMap<Field, String> = serde_json::from_str(json)?;
        let mut schema = Schema::default();
        for (field, header) in overrides {
            schema.set_header(field, header);
        }
        Ok(schema)
    }
}

fn default_header(field: Field) -> &'static str {
    match field {
        Field::Week => "Week",
        Field::ProductFamily => "Product Family",
        Field::Assembly => "Assembly",
        Field::DetectionStage => "Detection Stage",
        Field::ProblemObserved => "Problem Observed",
        Field::Functionality => "Functionality",
        Field::Responsible => "Responsible",
        Field::ProblemAnalysis => "Problem Analysis",
        Field::Tat => "TAT",
        Field::SubmittedBy => "Submitted By",
    }
}

// ---------------------------------------------------------------------------
// Chart configuration – which breakdowns the dashboard shows
// ---------------------------------------------------------------------------

/// One configured categorical view: which field, how many slots before the
/// "Other" bucket, and the sort policy.
#[derive(Debug, Clone, Copy)]
pub struct ChartSpec {
    pub title: &'static str,
    pub field: Field,
    pub limit: Option<usize>,
    pub sort: SortPolicy,
}

/// The fixed set of categorical views, in display order.
pub const CHARTS: [ChartSpec; 9] = [
    ChartSpec {
        title: "Weekly Defect Trend",
        field: Field::Week,
        limit: None,
        sort: SortPolicy::Ordinal,
    },
    ChartSpec {
        title: "Defects by Product Family",
        field: Field::ProductFamily,
        limit: Some(MAX_BAR_ITEMS),
        sort: SortPolicy::CountDesc,
    },
    ChartSpec {
        title: "Assembly Wise Defects",
        field: Field::Assembly,
        limit: Some(MAX_BAR_ITEMS),
        sort: SortPolicy::CountDesc,
    },
    ChartSpec {
        title: "Defects by Detection Stage",
        field: Field::DetectionStage,
        limit: None,
        sort: SortPolicy::Alpha,
    },
    ChartSpec {
        title: "Problem Observed Frequency",
        field: Field::ProblemObserved,
        limit: Some(MAX_BAR_ITEMS),
        sort: SortPolicy::CountDesc,
    },
    ChartSpec {
        title: "Issue Functionality",
        field: Field::Functionality,
        limit: Some(MAX_PIE_ITEMS),
        sort: SortPolicy::CountDesc,
    },
    ChartSpec {
        title: "Responsible Parties",
        field: Field::Responsible,
        limit: Some(MAX_PIE_ITEMS),
        sort: SortPolicy::CountDesc,
    },
    ChartSpec {
        title: "Problem Analysis (Root Cause)",
        field: Field::ProblemAnalysis,
        limit: Some(MAX_BAR_ITEMS),
        sort: SortPolicy::CountDesc,
    },
    ChartSpec {
        title: "Submissions by User",
        field: Field::SubmittedBy,
        limit: Some(MAX_BAR_ITEMS),
        sort: SortPolicy::CountDesc,
    },
];
