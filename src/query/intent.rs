//! Query Intent
//!
//! What a free-text chart query asks for: either a single numeric filter or a
//! group-by average.

use serde::Serialize;
use std::fmt;

use crate::store::{Condition, Field, FindFilter};

/// Metric averaged when the text names none
pub const DEFAULT_METRIC: Field = Field::Gpa;

/// Comparison operators recognized in filter phrases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Operator {
    /// "more than", "greater than", ">"
    Gt,
    /// "less than", "<"
    Lt,
    /// "equal to", "="
    Eq,
}

impl Operator {
    /// Map a comparison phrase to an operator
    pub fn from_phrase(phrase: &str) -> Option<Self> {
        match phrase.to_lowercase().as_str() {
            "more than" | "greater than" | ">" => Some(Self::Gt),
            "less than" | "<" => Some(Self::Lt),
            "equal to" | "=" => Some(Self::Eq),
            _ => None,
        }
    }

    /// Store condition comparing against `threshold`
    pub fn condition(&self, threshold: f64) -> Condition {
        match self {
            Self::Gt => Condition::Gt(threshold),
            Self::Lt => Condition::Lt(threshold),
            Self::Eq => Condition::Eq(threshold),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gt => write!(f, ">"),
            Self::Lt => write!(f, "<"),
            Self::Eq => write!(f, "="),
        }
    }
}

/// A single numeric comparison on one field
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FilterIntent {
    pub field: Field,
    pub operator: Operator,
    pub threshold: f64,
}

impl FilterIntent {
    pub fn new(field: Field, operator: Operator, threshold: f64) -> Self {
        Self {
            field,
            operator,
            threshold,
        }
    }

    /// Store filter for this intent
    pub fn to_filter(&self) -> FindFilter {
        FindFilter::new(self.field, self.operator.condition(self.threshold))
    }

    /// Human-readable description, e.g. `Students where Age $gt 18.0`
    pub fn description(&self) -> String {
        let condition = self.operator.condition(self.threshold);
        format!(
            "Students where {} {} {:?}",
            self.field,
            condition.operator_name(),
            condition.threshold()
        )
    }
}

/// A group-by average request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AggregationIntent {
    /// Field to group by; `None` averages the whole collection
    pub grouping: Option<Field>,
    /// Field to average
    pub metric: Field,
}

impl AggregationIntent {
    pub fn new(grouping: Option<Field>, metric: Field) -> Self {
        Self { grouping, metric }
    }
}

/// Interpreted chart query
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum QueryIntent {
    Filter(FilterIntent),
    Aggregation(AggregationIntent),
}

impl fmt::Display for QueryIntent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Filter(intent) => write!(
                f,
                "FILTER {} {} {}",
                intent.field, intent.operator, intent.threshold
            ),
            Self::Aggregation(AggregationIntent {
                grouping: Some(grouping),
                metric,
            }) => write!(f, "AVG({}) GROUP BY {}", metric, grouping),
            Self::Aggregation(AggregationIntent {
                grouping: None,
                metric,
            }) => write!(f, "AVG({})", metric),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operator_phrases() {
        assert_eq!(Operator::from_phrase("more than"), Some(Operator::Gt));
        assert_eq!(Operator::from_phrase("Greater Than"), Some(Operator::Gt));
        assert_eq!(Operator::from_phrase(">"), Some(Operator::Gt));
        assert_eq!(Operator::from_phrase("less than"), Some(Operator::Lt));
        assert_eq!(Operator::from_phrase("<"), Some(Operator::Lt));
        assert_eq!(Operator::from_phrase("equal to"), Some(Operator::Eq));
        assert_eq!(Operator::from_phrase("="), Some(Operator::Eq));
        assert_eq!(Operator::from_phrase("at least"), None);
    }

    #[test]
    fn test_filter_intent_to_filter() {
        let intent = FilterIntent::new(Field::Age, Operator::Gt, 18.0);
        assert_eq!(intent.to_filter(), FindFilter::new(Field::Age, Condition::Gt(18.0)));
        assert_eq!(intent.description(), "Students where Age $gt 18.0");
    }

    #[test]
    fn test_decimal_threshold_description() {
        let intent = FilterIntent::new(Field::Gpa, Operator::Lt, 2.5);
        assert_eq!(intent.description(), "Students where GPA $lt 2.5");
    }

    #[test]
    fn test_intent_display() {
        let grouped = QueryIntent::Aggregation(AggregationIntent::new(
            Some(Field::GradeClass),
            Field::Gpa,
        ));
        assert_eq!(grouped.to_string(), "AVG(GPA) GROUP BY GradeClass");

        let overall = QueryIntent::Aggregation(AggregationIntent::new(None, Field::Gpa));
        assert_eq!(overall.to_string(), "AVG(GPA)");

        let filter = QueryIntent::Filter(FilterIntent::new(Field::Absences, Operator::Eq, 0.0));
        assert_eq!(filter.to_string(), "FILTER Absences = 0");
    }
}
