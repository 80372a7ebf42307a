//! Core data types for the student store
//!
//! This module defines the types exchanged with the store collaborator:
//! - `Field`: Canonical dataset field names
//! - `StudentRecord`: A single student document
//! - `FindFilter` and `Condition`: Point filters for `find`
//! - `Stage` and `LabelSource`: Aggregation pipeline stages
//! - `LabeledValue`: One row of aggregation output

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Canonical dataset fields of the student performance collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Field {
    #[serde(rename = "StudentID")]
    StudentId,
    Age,
    Gender,
    Ethnicity,
    ParentalEducation,
    StudyTimeWeekly,
    Absences,
    Tutoring,
    ParentalSupport,
    Extracurricular,
    Sports,
    Music,
    Volunteering,
    #[serde(rename = "GPA")]
    Gpa,
    GradeClass,
}

impl Field {
    /// All fields, in vocabulary definition order
    pub const ALL: [Field; 15] = [
        Field::StudentId,
        Field::Age,
        Field::Gender,
        Field::Ethnicity,
        Field::ParentalEducation,
        Field::StudyTimeWeekly,
        Field::Absences,
        Field::Tutoring,
        Field::ParentalSupport,
        Field::Extracurricular,
        Field::Sports,
        Field::Music,
        Field::Volunteering,
        Field::Gpa,
        Field::GradeClass,
    ];

    /// Canonical name as stored in documents
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::StudentId => "StudentID",
            Field::Age => "Age",
            Field::Gender => "Gender",
            Field::Ethnicity => "Ethnicity",
            Field::ParentalEducation => "ParentalEducation",
            Field::StudyTimeWeekly => "StudyTimeWeekly",
            Field::Absences => "Absences",
            Field::Tutoring => "Tutoring",
            Field::ParentalSupport => "ParentalSupport",
            Field::Extracurricular => "Extracurricular",
            Field::Sports => "Sports",
            Field::Music => "Music",
            Field::Volunteering => "Volunteering",
            Field::Gpa => "GPA",
            Field::GradeClass => "GradeClass",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single student document
///
/// Field names map to scalar JSON values. No schema is enforced: a record
/// may carry columns outside the vocabulary, and any field may be absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StudentRecord {
    fields: BTreeMap<String, Value>,
}

impl StudentRecord {
    /// Create an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: set a field
    pub fn field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    /// Set a field in place
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(name.into(), value.into());
    }

    /// Get a raw field value
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Check whether the field key is present
    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Numeric value of a field, if it holds a number
    pub fn number(&self, name: &str) -> Option<f64> {
        self.fields.get(name).and_then(Value::as_f64)
    }

    /// Display label of a field, if it holds a scalar
    pub fn label_of(&self, name: &str) -> Option<String> {
        self.fields.get(name).and_then(scalar_label)
    }

    /// Grouping key of a field, if it holds a scalar
    pub fn key_of(&self, name: &str) -> Option<ScalarKey> {
        self.fields.get(name).and_then(ScalarKey::of)
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if the record has no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Render a scalar as a chart label. Null and compound values have no label.
pub fn scalar_label(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Grouping identity of a scalar
///
/// Numbers compare by value, so `2` and `2.0` share a key. Null and compound
/// values have no key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ScalarKey {
    Number(u64),
    Text(String),
    Bool(bool),
}

impl ScalarKey {
    pub fn of(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => {
                let n = n.as_f64()?;
                // -0.0 and 0.0 are one group
                let n = if n == 0.0 { 0.0 } else { n };
                Some(Self::Number(n.to_bits()))
            }
            Value::String(s) => Some(Self::Text(s.clone())),
            Value::Bool(b) => Some(Self::Bool(*b)),
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        }
    }
}

/// Numeric comparison applied by `find`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Condition {
    #[serde(rename = "$gt")]
    Gt(f64),
    #[serde(rename = "$lt")]
    Lt(f64),
    #[serde(rename = "$eq")]
    Eq(f64),
}

impl Condition {
    /// Document-store operator name (`$gt`, `$lt`, `$eq`)
    pub fn operator_name(&self) -> &'static str {
        match self {
            Condition::Gt(_) => "$gt",
            Condition::Lt(_) => "$lt",
            Condition::Eq(_) => "$eq",
        }
    }

    /// Threshold compared against
    pub fn threshold(&self) -> f64 {
        match self {
            Condition::Gt(n) | Condition::Lt(n) | Condition::Eq(n) => *n,
        }
    }

    /// Check a numeric value against the condition
    pub fn matches(&self, value: f64) -> bool {
        match self {
            Condition::Gt(n) => value > *n,
            Condition::Lt(n) => value < *n,
            Condition::Eq(n) => value == *n,
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.operator_name(), self.threshold())
    }
}

/// Point filter: `{field: {$op: threshold}}`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FindFilter {
    pub field: Field,
    pub condition: Condition,
}

impl FindFilter {
    pub fn new(field: Field, condition: Condition) -> Self {
        Self { field, condition }
    }

    /// Check whether a record satisfies the filter.
    ///
    /// Only numeric values are compared; strings, booleans and missing
    /// fields never match.
    pub fn matches(&self, record: &StudentRecord) -> bool {
        record
            .number(self.field.as_str())
            .map(|v| self.condition.matches(v))
            .unwrap_or(false)
    }
}

impl fmt::Display for FindFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{{}: {{{}: {}}}}}",
            self.field,
            self.condition.operator_name(),
            self.condition.threshold()
        )
    }
}

/// Where a projected row takes its label from
#[derive(Debug, Clone, PartialEq)]
pub enum LabelSource {
    /// The group key, or the given default when the key is null or missing
    GroupKeyOr(String),
    /// A fixed label
    Constant(String),
}

/// One stage of an aggregation pipeline
#[derive(Debug, Clone, PartialEq)]
pub enum Stage {
    /// Group by `key` (or everything when `None`) and average `average_of`.
    /// Keys compare as [`ScalarKey`]s.
    Group { key: Option<Field>, average_of: Field },
    /// Attach labels and round values, ties to even
    Project { label: LabelSource, decimals: u32 },
    /// Order rows by value
    Sort { descending: bool },
    /// Keep the first N rows
    Limit(usize),
}

/// One row of aggregation output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledValue {
    pub label: String,
    pub value: f64,
}

impl LabeledValue {
    pub fn new(label: impl Into<String>, value: f64) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_field_names_serialize_canonically() {
        assert_eq!(serde_json::to_value(Field::Gpa).unwrap(), json!("GPA"));
        assert_eq!(serde_json::to_value(Field::StudentId).unwrap(), json!("StudentID"));
        assert_eq!(serde_json::to_value(Field::GradeClass).unwrap(), json!("GradeClass"));

        for field in Field::ALL {
            assert_eq!(serde_json::to_value(field).unwrap(), json!(field.as_str()));
        }
    }

    #[test]
    fn test_scalar_key_compares_numbers_by_value() {
        assert_eq!(ScalarKey::of(&json!(2)), ScalarKey::of(&json!(2.0)));
        assert_eq!(ScalarKey::of(&json!(0)), ScalarKey::of(&json!(-0.0)));
        assert_ne!(ScalarKey::of(&json!(2)), ScalarKey::of(&json!("2")));
        assert_ne!(ScalarKey::of(&json!(2)), ScalarKey::of(&json!(2.5)));
        assert_eq!(ScalarKey::of(&json!(null)), None);
    }

    #[test]
    fn test_record_accessors() {
        let record = StudentRecord::new()
            .field("StudentID", 1001)
            .field("GPA", 3.25)
            .field("Gender", "F")
            .field("Tutoring", true);

        assert_eq!(record.len(), 4);
        assert_eq!(record.number("GPA"), Some(3.25));
        assert_eq!(record.number("StudentID"), Some(1001.0));
        assert_eq!(record.number("Gender"), None);
        assert_eq!(record.label_of("StudentID"), Some("1001".to_string()));
        assert_eq!(record.label_of("Tutoring"), Some("true".to_string()));
        assert!(record.contains("Gender"));
        assert!(!record.contains("Age"));
    }

    #[test]
    fn test_float_labels_keep_fraction() {
        let record = StudentRecord::new().field("GradeClass", 2.0);
        assert_eq!(record.label_of("GradeClass"), Some("2.0".to_string()));
    }

    #[test]
    fn test_condition_serializes_as_operator_document() {
        assert_eq!(serde_json::to_value(Condition::Gt(18.0)).unwrap(), json!({"$gt": 18.0}));
        assert_eq!(serde_json::to_value(Condition::Lt(3.5)).unwrap(), json!({"$lt": 3.5}));
        assert_eq!(serde_json::to_value(Condition::Eq(2.0)).unwrap(), json!({"$eq": 2.0}));
    }

    #[test]
    fn test_find_filter_only_matches_numbers() {
        let filter = FindFilter::new(Field::Age, Condition::Gt(17.0));

        assert!(filter.matches(&StudentRecord::new().field("Age", 18)));
        assert!(!filter.matches(&StudentRecord::new().field("Age", 17)));
        assert!(!filter.matches(&StudentRecord::new().field("Age", "18")));
        assert!(!filter.matches(&StudentRecord::new()));
    }

    #[test]
    fn test_find_filter_display() {
        let filter = FindFilter::new(Field::Age, Condition::Gt(18.0));
        assert_eq!(filter.to_string(), "{Age: {$gt: 18}}");
    }
}
