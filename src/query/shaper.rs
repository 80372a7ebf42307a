//! Result Shaper
//!
//! Normalizes filtered documents and aggregated rows into one chart payload:
//!
//! ```text
//! {ok, chart_type, labels, values, data: [{label, value}], ...details}
//! ```
//!
//! Filtered documents become a GradeClass histogram when the first record
//! carries GradeClass, otherwise one bar per student. Aggregated rows pass
//! through in the order the store returned them.

use serde::Serialize;
use std::collections::HashMap;

use crate::query::intent::{AggregationIntent, FilterIntent};
use crate::store::{Field, LabeledValue, ScalarKey, StudentRecord};

/// Categorical field that switches filter results to a histogram
pub const HISTOGRAM_FIELD: Field = Field::GradeClass;

/// Field labeling per-student bars
pub const RECORD_LABEL_FIELD: Field = Field::StudentId;

/// Label for missing keys
pub const UNKNOWN_LABEL: &str = "Unknown";

/// Error message when a filter matches nothing
pub const NO_MATCHING_STUDENTS: &str = "No matching students found";

/// Error message when an aggregation yields no groups
pub const NO_DATA: &str = "No data found";

/// Chart kinds understood by the frontend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ChartType {
    Bar,
}

/// Mode-specific fields of a successful payload
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ChartDetails {
    Filter {
        description: String,
        field: Field,
        count: usize,
    },
    Aggregation {
        query: String,
        metric: Field,
        grouping: Option<Field>,
    },
}

/// Uniform chart response
///
/// `labels`, `values` and `data` always have the same length, with
/// `data[i] == {label: labels[i], value: values[i]}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPayload {
    pub ok: bool,
    pub chart_type: ChartType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(flatten)]
    pub details: Option<ChartDetails>,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    pub data: Vec<LabeledValue>,
}

impl ChartPayload {
    /// Successful payload built from ordered points
    pub fn from_points(points: Vec<LabeledValue>, details: ChartDetails) -> Self {
        Self {
            ok: true,
            chart_type: ChartType::Bar,
            error: None,
            details: Some(details),
            labels: points.iter().map(|p| p.label.clone()).collect(),
            values: points.iter().map(|p| p.value).collect(),
            data: points,
        }
    }

    /// Empty-result payload (`ok: false`) carrying a message
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            chart_type: ChartType::Bar,
            error: Some(message.into()),
            details: None,
            labels: Vec::new(),
            values: Vec::new(),
            data: Vec::new(),
        }
    }

    /// Check the label/value/data pairing invariant
    pub fn is_consistent(&self) -> bool {
        self.labels.len() == self.values.len()
            && self.values.len() == self.data.len()
            && self
                .data
                .iter()
                .zip(self.labels.iter().zip(&self.values))
                .all(|(point, (label, value))| &point.label == label && point.value == *value)
    }

    /// Number of chart points
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Shape documents returned by a filter query
pub fn shape_filtered(intent: &FilterIntent, records: &[StudentRecord]) -> ChartPayload {
    let points = match records.first() {
        Some(first) if first.contains(HISTOGRAM_FIELD.as_str()) => histogram(records),
        _ => per_record(records, intent.field),
    };

    ChartPayload::from_points(
        points,
        ChartDetails::Filter {
            description: intent.description(),
            field: intent.field,
            count: records.len(),
        },
    )
}

/// Shape rows returned by an aggregation pipeline
pub fn shape_aggregated(
    query: &str,
    intent: &AggregationIntent,
    rows: Vec<LabeledValue>,
) -> ChartPayload {
    ChartPayload::from_points(
        rows,
        ChartDetails::Aggregation {
            query: query.to_string(),
            metric: intent.metric,
            grouping: intent.grouping,
        },
    )
}

/// Count records per GradeClass value, in first-encounter order.
/// Numerically equal values share a bucket labeled by its first record.
fn histogram(records: &[StudentRecord]) -> Vec<LabeledValue> {
    let mut buckets: Vec<(String, usize)> = Vec::new();
    let mut positions: HashMap<Option<ScalarKey>, usize> = HashMap::new();

    for record in records {
        let key = record.key_of(HISTOGRAM_FIELD.as_str());

        match positions.get(&key) {
            Some(&idx) => buckets[idx].1 += 1,
            None => {
                let label = record
                    .label_of(HISTOGRAM_FIELD.as_str())
                    .unwrap_or_else(|| UNKNOWN_LABEL.to_string());
                positions.insert(key, buckets.len());
                buckets.push((label, 1));
            }
        }
    }

    buckets
        .into_iter()
        .map(|(label, count)| LabeledValue::new(label, count as f64))
        .collect()
}

/// One bar per record: StudentID → raw value of the filtered field
fn per_record(records: &[StudentRecord], field: Field) -> Vec<LabeledValue> {
    records
        .iter()
        .map(|record| {
            let label = record
                .label_of(RECORD_LABEL_FIELD.as_str())
                .unwrap_or_else(|| UNKNOWN_LABEL.to_string());
            let value = record.number(field.as_str()).unwrap_or(0.0);
            LabeledValue::new(label, value)
        })
        .collect()
}
