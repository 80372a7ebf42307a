//! Field Vocabulary
//!
//! An ordered list of `(alias, field)` pairs. Resolution scans the list in
//! definition order and the first entry mentioned in the text wins, so the
//! order is part of the contract.
//!
//! A token only counts as mentioned when it stands on its own: `"average"`
//! does not mention `age`.

use regex::Regex;
use std::collections::HashSet;

use crate::query::error::{QueryError, QueryResult};
use crate::store::Field;

/// Aliases of the student performance dataset, in resolution order
pub const STANDARD_ALIASES: [(&str, Field); 15] = [
    ("studentid", Field::StudentId),
    ("age", Field::Age),
    ("gender", Field::Gender),
    ("ethnicity", Field::Ethnicity),
    ("parentaleducation", Field::ParentalEducation),
    ("studytimeweekly", Field::StudyTimeWeekly),
    ("absences", Field::Absences),
    ("tutoring", Field::Tutoring),
    ("parentalsupport", Field::ParentalSupport),
    ("extracurricular", Field::Extracurricular),
    ("sports", Field::Sports),
    ("music", Field::Music),
    ("volunteering", Field::Volunteering),
    ("gpa", Field::Gpa),
    ("gradeclass", Field::GradeClass),
];

/// Comparison phrases and the number that follows them
const COMPARISON_PHRASE: &str =
    r"(more than|greater than|>|less than|<|equal to|=)\s*(\d+(?:\.\d+)?)";

/// One vocabulary entry with its precompiled patterns
#[derive(Debug)]
pub struct VocabularyEntry {
    pub alias: &'static str,
    pub field: Field,
    mention: Regex,
    comparison: Regex,
}

impl VocabularyEntry {
    fn new(alias: &'static str, field: Field) -> QueryResult<Self> {
        let canonical = field.as_str().to_lowercase();
        let tokens = if canonical == alias {
            regex::escape(alias)
        } else {
            format!("{}|{}", regex::escape(alias), regex::escape(&canonical))
        };

        Ok(Self {
            alias,
            field,
            mention: Regex::new(&format!(r"(?i)\b(?:{})\b", tokens))?,
            comparison: Regex::new(&format!(r"(?i)\b(?:{}).*?{}", tokens, COMPARISON_PHRASE))?,
        })
    }

    /// Check whether the alias or canonical name occurs in the text
    pub fn is_mentioned(&self, text: &str) -> bool {
        self.mention.is_match(text)
    }

    /// Find `<token> ... <comparison> <number>`, returning the phrase and number text
    pub fn comparison<'t>(&self, text: &'t str) -> Option<(&'t str, &'t str)> {
        let caps = self.comparison.captures(text)?;
        Some((caps.get(1)?.as_str(), caps.get(2)?.as_str()))
    }
}

/// Immutable alias → field mapping
#[derive(Debug)]
pub struct Vocabulary {
    entries: Vec<VocabularyEntry>,
}

impl Vocabulary {
    /// The student performance vocabulary
    pub fn standard() -> QueryResult<Self> {
        Self::from_aliases(&STANDARD_ALIASES)
    }

    /// Build a vocabulary from ordered `(alias, field)` pairs.
    ///
    /// Aliases must be non-empty, lower-case and unique.
    pub fn from_aliases(aliases: &[(&'static str, Field)]) -> QueryResult<Self> {
        let mut seen = HashSet::new();
        let mut entries = Vec::with_capacity(aliases.len());

        for (alias, field) in aliases {
            if alias.is_empty() || alias.to_lowercase() != *alias {
                return Err(QueryError::Vocabulary(format!(
                    "alias '{}' must be non-empty lower-case text",
                    alias
                )));
            }
            if !seen.insert(*alias) {
                return Err(QueryError::Vocabulary(format!(
                    "alias '{}' is defined more than once",
                    alias
                )));
            }
            entries.push(VocabularyEntry::new(*alias, *field)?);
        }

        Ok(Self { entries })
    }

    /// Entries in resolution order
    pub fn entries(&self) -> &[VocabularyEntry] {
        &self.entries
    }

    /// Resolve the first field mentioned in the text
    pub fn resolve(&self, text: &str) -> Option<Field> {
        self.entries
            .iter()
            .find(|entry| entry.is_mentioned(text))
            .map(|entry| entry.field)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
