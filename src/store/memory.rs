//! In-memory student store
//!
//! Holds the whole student collection in memory and evaluates point filters
//! and aggregation pipelines over it, the way a document store would:
//!
//! ```text
//! $group → $project → $sort → $limit
//! ```
//!
//! The collection is immutable after construction, so concurrent readers
//! need no locking.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;

use super::csv_loader::load_students_csv;
use super::error::{StoreError, StoreResult};
use super::types::{
    scalar_label, FindFilter, LabelSource, LabeledValue, ScalarKey, Stage, StudentRecord,
};
use super::StudentStore;

/// Import errors echoed to the log on load
const MAX_LOGGED_IMPORT_ERRORS: usize = 10;

/// Read-only in-memory document collection
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Vec<StudentRecord>,
}

/// Intermediate row flowing between pipeline stages
#[derive(Debug, Clone)]
struct GroupRow {
    /// Display form of the group key; `None` for null, missing or whole-collection groups
    key: Option<String>,
    label: Option<String>,
    /// `None` when no record in the group had a numeric metric
    value: Option<f64>,
}

impl MemoryStore {
    /// Create a store over the given records
    pub fn new(records: Vec<StudentRecord>) -> Self {
        Self { records }
    }

    /// Load the collection from a CSV file
    pub fn from_csv(path: &Path) -> StoreResult<Self> {
        let import = load_students_csv(path)?;
        if import.rows_failed > 0 {
            tracing::warn!(
                "Skipped {} unreadable rows in {:?}",
                import.rows_failed,
                path
            );
            for error in import.errors.iter().take(MAX_LOGGED_IMPORT_ERRORS) {
                tracing::warn!("  {}", error);
            }
        }
        tracing::info!("Loaded {} student records from {:?}", import.records.len(), path);
        Ok(Self::new(import.records))
    }

    /// Number of records held
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if the collection is empty
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Evaluate a pipeline synchronously
    pub fn run_pipeline(&self, pipeline: &[Stage]) -> StoreResult<Vec<LabeledValue>> {
        let mut rows: Option<Vec<GroupRow>> = None;

        for stage in pipeline {
            match stage {
                Stage::Group { key, average_of } => {
                    if rows.is_some() {
                        return Err(StoreError::InvalidPipeline(
                            "only one $group stage is supported".to_string(),
                        ));
                    }
                    let key_name = key.map(|k| k.as_str());
                    rows = Some(self.group_average(key_name, average_of.as_str()));
                }
                Stage::Project { label, decimals } => {
                    for row in grouped(&mut rows, "$project")? {
                        row.label = Some(match label {
                            LabelSource::GroupKeyOr(default) => {
                                row.key.clone().unwrap_or_else(|| default.clone())
                            }
                            LabelSource::Constant(text) => text.clone(),
                        });
                        row.value = row.value.map(|v| round_to(v, *decimals));
                    }
                }
                Stage::Sort { descending } => {
                    let rows = grouped(&mut rows, "$sort")?;
                    // Null values order below every number; the sort is stable.
                    if *descending {
                        rows.sort_by(|a, b| compare_values(b.value, a.value));
                    } else {
                        rows.sort_by(|a, b| compare_values(a.value, b.value));
                    }
                }
                Stage::Limit(n) => {
                    grouped(&mut rows, "$limit")?.truncate(*n);
                }
            }
        }

        let rows = rows.ok_or_else(|| {
            StoreError::InvalidPipeline("pipeline has no $group stage".to_string())
        })?;

        Ok(rows
            .into_iter()
            .filter_map(|row| {
                let value = row.value?;
                let label = row.label.or(row.key).unwrap_or_else(|| "Unknown".to_string());
                Some(LabeledValue { label, value })
            })
            .collect())
    }

    /// Average `metric` per distinct value of `key`, in first-encounter order
    fn group_average(&self, key: Option<&str>, metric: &str) -> Vec<GroupRow> {
        if self.records.is_empty() {
            return Vec::new();
        }

        // (label, sum, count) per group; the label comes from the first member
        let mut groups: Vec<(Option<String>, f64, usize)> = Vec::new();
        let mut positions: HashMap<Option<ScalarKey>, usize> = HashMap::new();

        for record in &self.records {
            let value = key.and_then(|k| record.get(k));
            let group_key = value.and_then(ScalarKey::of);
            let idx = *positions.entry(group_key).or_insert_with(|| {
                groups.push((value.and_then(scalar_label), 0.0, 0));
                groups.len() - 1
            });

            if let Some(v) = record.number(metric) {
                groups[idx].1 += v;
                groups[idx].2 += 1;
            }
        }

        groups
            .into_iter()
            .map(|(key, sum, count)| GroupRow {
                key,
                label: None,
                value: (count > 0).then(|| sum / count as f64),
            })
            .collect()
    }
}

fn grouped<'a>(
    rows: &'a mut Option<Vec<GroupRow>>,
    stage: &str,
) -> StoreResult<&'a mut Vec<GroupRow>> {
    rows.as_mut()
        .ok_or_else(|| StoreError::InvalidPipeline(format!("{} before $group", stage)))
}

fn compare_values(a: Option<f64>, b: Option<f64>) -> std::cmp::Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.partial_cmp(&b).unwrap_or(std::cmp::Ordering::Equal),
        (Some(_), None) => std::cmp::Ordering::Greater,
        (None, Some(_)) => std::cmp::Ordering::Less,
        (None, None) => std::cmp::Ordering::Equal,
    }
}

/// Round to the given number of decimals, ties to even (`$round` semantics)
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round_ties_even() / factor
}

#[async_trait]
impl StudentStore for MemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn find(&self, filter: &FindFilter, limit: usize) -> StoreResult<Vec<StudentRecord>> {
        Ok(self
            .records
            .iter()
            .filter(|record| filter.matches(record))
            .take(limit)
            .cloned()
            .collect())
    }

    async fn aggregate(&self, pipeline: &[Stage]) -> StoreResult<Vec<LabeledValue>> {
        self.run_pipeline(pipeline)
    }

    async fn count(&self) -> StoreResult<usize> {
        Ok(self.records.len())
    }
}
