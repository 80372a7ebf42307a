//! Aggregation Planner
//!
//! Infers a group-by average from text that carries no filter phrase:
//!
//! - grouping: the words after `by`, resolved through the vocabulary
//! - metric: the first field mentioned anywhere in the text, else GPA
//!
//! Planning never fails.

use regex::Regex;
use std::sync::Arc;

use crate::query::error::QueryResult;
use crate::query::intent::{AggregationIntent, DEFAULT_METRIC};
use crate::query::vocabulary::Vocabulary;
use crate::store::Field;

/// Plans group-by average queries
#[derive(Debug, Clone)]
pub struct AggregationPlanner {
    vocabulary: Arc<Vocabulary>,
    by_phrase: Regex,
}

impl AggregationPlanner {
    pub fn new(vocabulary: Arc<Vocabulary>) -> QueryResult<Self> {
        Ok(Self {
            vocabulary,
            by_phrase: Regex::new(r"(?i)\bby\s+([a-z_ ]+)")?,
        })
    }

    /// Plan the aggregation for a query
    pub fn plan(&self, text: &str) -> AggregationIntent {
        AggregationIntent::new(self.grouping(text), self.metric(text))
    }

    /// Field named after `by`, if it resolves
    pub fn grouping(&self, text: &str) -> Option<Field> {
        let caps = self.by_phrase.captures(text)?;
        self.vocabulary.resolve(caps.get(1)?.as_str())
    }

    /// Field to average; GPA when the text names none
    pub fn metric(&self, text: &str) -> Field {
        self.vocabulary.resolve(text).unwrap_or(DEFAULT_METRIC)
    }
}
