//! Query Interpreter
//!
//! Turns free text into a [`QueryIntent`]: the filter path is tried first,
//! and the aggregation planner handles everything else.

use std::sync::Arc;

use crate::query::detector::FilterDetector;
use crate::query::error::{QueryError, QueryResult};
use crate::query::intent::QueryIntent;
use crate::query::planner::AggregationPlanner;
use crate::query::vocabulary::Vocabulary;

/// Free text → query intent
#[derive(Debug, Clone)]
pub struct QueryInterpreter {
    vocabulary: Arc<Vocabulary>,
    detector: FilterDetector,
    planner: AggregationPlanner,
}

impl QueryInterpreter {
    pub fn new(vocabulary: Arc<Vocabulary>) -> QueryResult<Self> {
        Ok(Self {
            detector: FilterDetector::new(Arc::clone(&vocabulary)),
            planner: AggregationPlanner::new(Arc::clone(&vocabulary))?,
            vocabulary,
        })
    }

    /// Interpreter over the standard student vocabulary
    pub fn standard() -> QueryResult<Self> {
        Self::new(Arc::new(Vocabulary::standard()?))
    }

    /// The vocabulary fields are resolved against
    pub fn vocabulary(&self) -> &Arc<Vocabulary> {
        &self.vocabulary
    }

    /// Interpret a query. Empty or whitespace-only text is rejected.
    pub fn interpret(&self, text: &str) -> QueryResult<QueryIntent> {
        let text = text.trim();
        if text.is_empty() {
            return Err(QueryError::EmptyQuery);
        }

        match self.detector.detect(text) {
            Some(filter) => Ok(QueryIntent::Filter(filter)),
            None => Ok(QueryIntent::Aggregation(self.planner.plan(text))),
        }
    }
}
