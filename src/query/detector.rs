//! Filter Detector
//!
//! Recognizes a single numeric comparison such as `"students with age more than 18"`.
//!
//! For each vocabulary entry in order, if the entry is mentioned, the text is
//! searched for `<token> ... <comparison> <number>`. The words between the
//! token and the comparison are unconstrained, so phrasing like
//! `"age that are more than 18"` is accepted. The first entry whose search
//! succeeds wins, and only its first comparison is used.
//!
//! The search is best-effort: with several numeric phrases in the text it may
//! pick a number unrelated to the field.

use std::sync::Arc;

use crate::query::intent::{FilterIntent, Operator};
use crate::query::vocabulary::Vocabulary;

/// Detects filter intents in free text
#[derive(Debug, Clone)]
pub struct FilterDetector {
    vocabulary: Arc<Vocabulary>,
}

impl FilterDetector {
    pub fn new(vocabulary: Arc<Vocabulary>) -> Self {
        Self { vocabulary }
    }

    /// Detect `(field, operator, threshold)` in the text
    pub fn detect(&self, text: &str) -> Option<FilterIntent> {
        let text = text.to_lowercase();

        for entry in self.vocabulary.entries() {
            if !entry.is_mentioned(&text) {
                continue;
            }

            let Some((phrase, number)) = entry.comparison(&text) else {
                continue;
            };
            let (Some(operator), Ok(threshold)) =
                (Operator::from_phrase(phrase), number.parse::<f64>())
            else {
                continue;
            };

            return Some(FilterIntent::new(entry.field, operator, threshold));
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::vocabulary::STANDARD_ALIASES;
    use crate::store::Field;

    fn detector() -> FilterDetector {
        FilterDetector::new(Arc::new(Vocabulary::standard().unwrap()))
    }

    #[test]
    fn test_greater_than_for_every_alias() {
        let detector = detector();

        for (alias, field) in STANDARD_ALIASES {
            for n in [0.0, 3.0, 18.0, 2.75, 1001.5] {
                let text = format!("{} greater than {}", alias, n);
                assert_eq!(
                    detector.detect(&text),
                    Some(FilterIntent::new(field, Operator::Gt, n)),
                    "query: {}",
                    text
                );
            }
        }
    }

    #[test]
    fn test_operator_forms() {
        let detector = detector();

        let cases = [
            ("students with age more than 18", Operator::Gt, 18.0),
            ("age > 18", Operator::Gt, 18.0),
            ("age less than 16", Operator::Lt, 16.0),
            ("age<16", Operator::Lt, 16.0),
            ("age equal to 17", Operator::Eq, 17.0),
            ("age = 17", Operator::Eq, 17.0),
        ];

        for (text, op, n) in cases {
            assert_eq!(
                detector.detect(text),
                Some(FilterIntent::new(Field::Age, op, n)),
                "query: {}",
                text
            );
        }
    }

    #[test]
    fn test_intervening_words_allowed() {
        let intent = detector().detect("students with age that are more than 18").unwrap();
        assert_eq!(intent, FilterIntent::new(Field::Age, Operator::Gt, 18.0));
    }

    #[test]
    fn test_case_insensitive() {
        let intent = detector().detect("Show GPA Less Than 2.5").unwrap();
        assert_eq!(intent, FilterIntent::new(Field::Gpa, Operator::Lt, 2.5));
    }

    #[test]
    fn test_first_field_wins() {
        // Age is defined before GPA, so its comparison is used
        let intent = detector()
            .detect("students with gpa less than 2 and age more than 17")
            .unwrap();
        assert_eq!(intent, FilterIntent::new(Field::Age, Operator::Gt, 17.0));
    }

    #[test]
    fn test_first_comparison_after_field_is_used() {
        let intent = detector().detect("absences more than 5 or less than 20").unwrap();
        assert_eq!(intent, FilterIntent::new(Field::Absences, Operator::Gt, 5.0));
    }

    #[test]
    fn test_no_filter_phrase() {
        let detector = detector();
        assert_eq!(detector.detect("average GPA by GradeClass"), None);
        assert_eq!(detector.detect("gpa"), None);
        assert_eq!(detector.detect("more than 18"), None);
        assert_eq!(detector.detect("age more than eighteen"), None);
    }

    #[test]
    fn test_comparison_before_field_is_ignored() {
        assert_eq!(detector().detect("more than 3 gpa"), None);
    }
}
