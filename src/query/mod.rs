//! Chart Query Engine
//!
//! Interprets free-text analytic questions about the student dataset and
//! answers them with chart-ready payloads:
//!
//! - **Vocabulary**: Ordered alias → field resolution
//! - **Detector**: Numeric filter phrases (`age more than 18`)
//! - **Planner**: Group-by averages (`average GPA by GradeClass`)
//! - **Interpreter**: Picks the filter or aggregation path
//! - **Executor**: Runs the intent against a store
//! - **Shaper**: Builds the uniform chart payload
//!
//! # Examples
//!
//! ```text
//! students with age more than 18   → FILTER Age > 18        → GradeClass histogram
//! gpa less than 2                  → FILTER GPA < 2         → GradeClass histogram
//! average GPA by GradeClass        → AVG(GPA) GROUP BY GradeClass
//! gpa                              → AVG(GPA)               → "Overall"
//! ```
//!
//! ```rust,ignore
//! use learnify_charts::query::{QueryExecutor, QueryInterpreter};
//! use learnify_charts::store::MemoryStore;
//! use std::sync::Arc;
//!
//! let store = Arc::new(MemoryStore::from_csv("students.csv".as_ref())?);
//! let executor = QueryExecutor::new(QueryInterpreter::standard()?, store);
//!
//! let payload = executor.execute("average GPA by GradeClass", None).await?;
//! ```

mod detector;
mod error;
mod executor;
mod intent;
mod interpreter;
mod planner;
mod shaper;
mod vocabulary;

pub use detector::FilterDetector;
pub use error::{QueryError, QueryResult};
pub use executor::{build_pipeline, QueryExecutor, QueryLimits, AVERAGE_DECIMALS, OVERALL_LABEL};
pub use intent::{AggregationIntent, FilterIntent, Operator, QueryIntent, DEFAULT_METRIC};
pub use interpreter::QueryInterpreter;
pub use planner::AggregationPlanner;
pub use shaper::{
    shape_aggregated, shape_filtered, ChartDetails, ChartPayload, ChartType, NO_DATA,
    NO_MATCHING_STUDENTS,
};
pub use vocabulary::{Vocabulary, VocabularyEntry, STANDARD_ALIASES};
