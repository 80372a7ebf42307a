//! Query Executor
//!
//! Runs an interpreted chart query against the student store:
//!
//! ```text
//! Text → Interpret → Filter:      find(field op threshold, limit)          → Histogram / Bars
//!                  → Aggregation: $group → $project → $sort → $limit        → Pass-through
//! ```
//!
//! Store faults are returned as errors immediately; nothing is retried here.

use std::sync::Arc;
use std::time::Instant;

use crate::query::error::QueryResult;
use crate::query::intent::{AggregationIntent, FilterIntent, QueryIntent};
use crate::query::interpreter::QueryInterpreter;
use crate::query::shaper::{self, ChartPayload, NO_DATA, NO_MATCHING_STUDENTS, UNKNOWN_LABEL};
use crate::store::{LabelSource, Stage, StudentStore};

/// Row limit used when the request gives none
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryLimits {
    /// Default number of records fetched in filter mode
    pub filter: usize,
    /// Default number of groups returned in aggregation mode
    pub aggregation: usize,
}

impl Default for QueryLimits {
    fn default() -> Self {
        Self {
            filter: 20,
            aggregation: 10,
        }
    }
}

/// Decimal places of aggregated averages
pub const AVERAGE_DECIMALS: u32 = 2;

/// Label of the whole-collection average
pub const OVERALL_LABEL: &str = "Overall";

/// Chart query executor
pub struct QueryExecutor {
    interpreter: QueryInterpreter,
    store: Arc<dyn StudentStore>,
    limits: QueryLimits,
}

impl QueryExecutor {
    /// Create a new query executor
    pub fn new(interpreter: QueryInterpreter, store: Arc<dyn StudentStore>) -> Self {
        Self {
            interpreter,
            store,
            limits: QueryLimits::default(),
        }
    }

    /// Override the default limits
    pub fn with_limits(mut self, limits: QueryLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn interpreter(&self) -> &QueryInterpreter {
        &self.interpreter
    }

    pub fn store(&self) -> &Arc<dyn StudentStore> {
        &self.store
    }

    pub fn limits(&self) -> QueryLimits {
        self.limits
    }

    /// Interpret and run a free-text query.
    ///
    /// `limit` of `None` or `0` falls back to the mode default.
    pub async fn execute(&self, text: &str, limit: Option<usize>) -> QueryResult<ChartPayload> {
        let start = Instant::now();
        let text = text.trim();
        let intent = self.interpreter.interpret(text)?;

        tracing::debug!(query = %text, intent = %intent, "Interpreted chart query");

        let payload = match &intent {
            QueryIntent::Filter(filter) => self.run_filter(filter, limit).await?,
            QueryIntent::Aggregation(aggregation) => {
                self.run_aggregation(text, aggregation, limit).await?
            }
        };

        tracing::debug!(
            intent = %intent,
            points = payload.len(),
            ok = payload.ok,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Chart query executed"
        );

        Ok(payload)
    }

    /// Fetch matching records and shape them
    pub async fn run_filter(
        &self,
        intent: &FilterIntent,
        limit: Option<usize>,
    ) -> QueryResult<ChartPayload> {
        let limit = effective_limit(limit, self.limits.filter);
        let filter = intent.to_filter();

        let records = self.store.find(&filter, limit).await.map_err(|e| {
            tracing::error!(store = self.store.name(), filter = %filter, "find failed: {}", e);
            e
        })?;

        if records.is_empty() {
            return Ok(ChartPayload::failure(NO_MATCHING_STUDENTS));
        }

        Ok(shaper::shape_filtered(intent, &records))
    }

    /// Run the group-by average pipeline and shape the rows
    pub async fn run_aggregation(
        &self,
        text: &str,
        intent: &AggregationIntent,
        limit: Option<usize>,
    ) -> QueryResult<ChartPayload> {
        let limit = effective_limit(limit, self.limits.aggregation);
        let pipeline = build_pipeline(intent, limit);

        let rows = self.store.aggregate(&pipeline).await.map_err(|e| {
            tracing::error!(store = self.store.name(), "aggregate failed: {}", e);
            e
        })?;

        if rows.is_empty() {
            return Ok(ChartPayload::failure(NO_DATA));
        }

        Ok(shaper::shape_aggregated(text, intent, rows))
    }
}

fn effective_limit(requested: Option<usize>, default: usize) -> usize {
    requested.filter(|&n| n > 0).unwrap_or(default)
}

/// Build the aggregation pipeline for an intent.
///
/// Grouped: average per key (null keys → "Unknown"), round, sort descending,
/// limit. Ungrouped: one rounded "Overall" average; `limit` is not applied.
pub fn build_pipeline(intent: &AggregationIntent, limit: usize) -> Vec<Stage> {
    match intent.grouping {
        Some(grouping) => vec![
            Stage::Group {
                key: Some(grouping),
                average_of: intent.metric,
            },
            Stage::Project {
                label: LabelSource::GroupKeyOr(UNKNOWN_LABEL.to_string()),
                decimals: AVERAGE_DECIMALS,
            },
            Stage::Sort { descending: true },
            Stage::Limit(limit),
        ],
        None => vec![
            Stage::Group {
                key: None,
                average_of: intent.metric,
            },
            Stage::Project {
                label: LabelSource::Constant(OVERALL_LABEL.to_string()),
                decimals: AVERAGE_DECIMALS,
            },
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::error::QueryError;
    use crate::query::intent::Operator;
    use crate::store::{
        Field, FindFilter, LabeledValue, MemoryStore, StoreError, StoreResult, StudentRecord,
    };
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Store returning canned rows and recording what it was asked
    #[derive(Default)]
    struct CannedStore {
        records: Vec<StudentRecord>,
        rows: Vec<LabeledValue>,
        fail: bool,
        finds: Mutex<Vec<(FindFilter, usize)>>,
        pipelines: Mutex<Vec<Vec<Stage>>>,
    }

    #[async_trait]
    impl StudentStore for CannedStore {
        fn name(&self) -> &str {
            "canned"
        }

        async fn find(&self, filter: &FindFilter, limit: usize) -> StoreResult<Vec<StudentRecord>> {
            if self.fail {
                return Err(StoreError::Unavailable("connection refused".to_string()));
            }
            self.finds.lock().unwrap().push((*filter, limit));
            Ok(self.records.iter().take(limit).cloned().collect())
        }

        async fn aggregate(&self, pipeline: &[Stage]) -> StoreResult<Vec<LabeledValue>> {
            if self.fail {
                return Err(StoreError::Unavailable("connection refused".to_string()));
            }
            self.pipelines.lock().unwrap().push(pipeline.to_vec());
            Ok(self.rows.clone())
        }

        async fn count(&self) -> StoreResult<usize> {
            Ok(self.records.len())
        }
    }

    fn executor_over(store: Arc<CannedStore>) -> QueryExecutor {
        QueryExecutor::new(QueryInterpreter::standard().unwrap(), store)
    }

    #[tokio::test]
    async fn test_grouped_gpa_by_grade_class() {
        let store = Arc::new(CannedStore {
            rows: vec![LabeledValue::new("A", 3.5), LabeledValue::new("B", 3.1)],
            ..Default::default()
        });
        let executor = executor_over(Arc::clone(&store));

        let payload = executor.execute("average GPA by GradeClass", None).await.unwrap();

        assert!(payload.ok);
        assert_eq!(payload.labels, vec!["A", "B"]);
        assert_eq!(payload.values, vec![3.5, 3.1]);
        assert_eq!(
            payload.details,
            Some(shaper::ChartDetails::Aggregation {
                query: "average GPA by GradeClass".to_string(),
                metric: Field::Gpa,
                grouping: Some(Field::GradeClass),
            })
        );

        let pipelines = store.pipelines.lock().unwrap();
        assert_eq!(pipelines[0].last(), Some(&Stage::Limit(10)));
    }

    #[tokio::test]
    async fn test_filter_without_matches_is_not_an_error() {
        let store = Arc::new(CannedStore::default());
        let executor = executor_over(Arc::clone(&store));

        let payload = executor
            .execute("students with age more than 18", None)
            .await
            .unwrap();

        assert!(!payload.ok);
        assert_eq!(payload.error.as_deref(), Some("No matching students found"));

        let finds = store.finds.lock().unwrap();
        assert_eq!(
            finds[0],
            (
                FilterIntent::new(Field::Age, Operator::Gt, 18.0).to_filter(),
                20
            )
        );
    }

    #[tokio::test]
    async fn test_empty_query_rejected_before_store() {
        let store = Arc::new(CannedStore::default());
        let executor = executor_over(Arc::clone(&store));

        let result = executor.execute("  ", None).await;

        assert!(matches!(result, Err(QueryError::EmptyQuery)));
        assert!(store.finds.lock().unwrap().is_empty());
        assert!(store.pipelines.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_lone_field_is_overall_average() {
        let store = Arc::new(MemoryStore::new(vec![
            StudentRecord::new().field("GPA", 3.0),
            StudentRecord::new().field("GPA", 2.0),
            StudentRecord::new().field("GPA", 2.5),
        ]));
        let executor = QueryExecutor::new(QueryInterpreter::standard().unwrap(), store);

        let payload = executor.execute("gpa", None).await.unwrap();

        assert!(payload.ok);
        assert_eq!(payload.labels, vec!["Overall"]);
        assert_eq!(payload.values, vec![2.5]);
        assert_eq!(
            payload.details,
            Some(shaper::ChartDetails::Aggregation {
                query: "gpa".to_string(),
                metric: Field::Gpa,
                grouping: None,
            })
        );
    }

    #[tokio::test]
    async fn test_histogram_counts_sum_to_matches() {
        let records: Vec<_> = (0..7)
            .map(|i| {
                StudentRecord::new()
                    .field("StudentID", 1000 + i)
                    .field("Age", 15 + i % 4)
                    .field("GradeClass", (i % 3) as f64)
            })
            .collect();
        let store = Arc::new(MemoryStore::new(records));
        let executor = QueryExecutor::new(QueryInterpreter::standard().unwrap(), store);

        let payload = executor.execute("age greater than 15", None).await.unwrap();

        let count = match payload.details {
            Some(shaper::ChartDetails::Filter { count, .. }) => count,
            ref other => panic!("unexpected details: {:?}", other),
        };
        assert_eq!(payload.values.iter().sum::<f64>(), count as f64);

        let mut labels = payload.labels.clone();
        labels.dedup();
        assert_eq!(labels.len(), payload.labels.len());
        assert!(payload.labels.iter().all(|l| ["0.0", "1.0", "2.0"].contains(&l.as_str())));
    }

    #[tokio::test]
    async fn test_empty_collection_reports_no_data() {
        let executor = QueryExecutor::new(
            QueryInterpreter::standard().unwrap(),
            Arc::new(MemoryStore::default()),
        );

        let payload = executor.execute("average gpa by gender", None).await.unwrap();

        assert!(!payload.ok);
        assert_eq!(payload.error.as_deref(), Some("No data found"));
    }

    #[tokio::test]
    async fn test_store_fault_is_an_error() {
        let store = Arc::new(CannedStore {
            fail: true,
            ..Default::default()
        });
        let executor = executor_over(store);

        let result = executor.execute("average gpa by gender", None).await;
        assert!(matches!(result, Err(QueryError::Store(StoreError::Unavailable(_)))));

        let result = executor.execute("gpa less than 2", None).await;
        assert!(matches!(result, Err(QueryError::Store(_))));
    }

    #[tokio::test]
    async fn test_request_limit_overrides_default() {
        let store = Arc::new(CannedStore::default());
        let executor = executor_over(Arc::clone(&store)).with_limits(QueryLimits {
            filter: 50,
            aggregation: 5,
        });

        executor.execute("age > 16", Some(3)).await.unwrap();
        executor.execute("age > 16", Some(0)).await.unwrap();
        executor.execute("gpa by gender", None).await.unwrap();

        let finds = store.finds.lock().unwrap();
        assert_eq!(finds[0].1, 3);
        assert_eq!(finds[1].1, 50);

        let pipelines = store.pipelines.lock().unwrap();
        assert_eq!(pipelines[0].last(), Some(&Stage::Limit(5)));
    }

    #[test]
    fn test_ungrouped_pipeline_has_no_sort_or_limit() {
        let pipeline = build_pipeline(&AggregationIntent::new(None, Field::Absences), 10);
        assert_eq!(pipeline.len(), 2);
        assert_eq!(
            pipeline[1],
            Stage::Project {
                label: LabelSource::Constant("Overall".to_string()),
                decimals: 2,
            }
        );
    }
}
