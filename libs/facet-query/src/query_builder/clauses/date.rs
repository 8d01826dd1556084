use super::super::bind::Bindings;
use super::super::predicate::{Condition, Predicate};
use crate::Granularity;

/// Inclusive timestamp bounds selected by a date facet value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateRange {
    pub start: String,
    pub end: String,
}

/// Interpret a date facet value by its length:
/// - `YYYY`: the whole year
/// - `YYYY-MM`: the month, always ending on day `31`
/// - `YYYY-MM-DD`: the day
///
/// The month end bound is not calendar-checked (`2012-02` ends at
/// `2012-02-31 23:59:59`). Existing listings rely on that over-inclusive
/// bound, so it is kept as is. Any other length yields `None`.
pub fn date_value_range(value: &str) -> Option<DateRange> {
    let (start, end) = match Granularity::from_value_len(value.len())? {
        Granularity::Year => (
            format!("{value}-01-01 00:00:00"),
            format!("{value}-12-31 23:59:59"),
        ),
        Granularity::Month => (
            format!("{value}-01 00:00:00"),
            format!("{value}-31 23:59:59"),
        ),
        Granularity::Day => (format!("{value} 00:00:00"), format!("{value} 23:59:59")),
    };
    Some(DateRange { start, end })
}

/// One OR-across-columns range per valid value, ANDed together. A date
/// facet normally carries a single value, so this is usually just that
/// value's range.
pub(super) fn build_date_clause(
    columns: &[String],
    values: &[String],
    bindings: &mut Bindings,
) -> Option<Predicate> {
    let mut parts = Vec::new();
    for value in values {
        let Some(range) = date_value_range(value) else {
            tracing::debug!(value = %value, "Skipping malformed date facet value");
            continue;
        };

        let start = bindings.bind(range.start);
        let end = bindings.bind(range.end);
        let per_column: Vec<Predicate> = columns
            .iter()
            .map(|column| {
                Condition::Between {
                    column: column.clone(),
                    start: start.clone(),
                    end: end.clone(),
                }
                .into()
            })
            .collect();
        parts.extend(Predicate::any(per_column));
    }

    Predicate::all(parts)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(start: &str, end: &str) -> Option<DateRange> {
        Some(DateRange {
            start: start.to_string(),
            end: end.to_string(),
        })
    }

    #[test]
    fn year_range() {
        assert_eq!(
            date_value_range("2012"),
            range("2012-01-01 00:00:00", "2012-12-31 23:59:59")
        );
    }

    #[test]
    fn month_range_ends_on_the_31st() {
        assert_eq!(
            date_value_range("2012-02"),
            range("2012-02-01 00:00:00", "2012-02-31 23:59:59")
        );
    }

    #[test]
    fn day_range() {
        assert_eq!(
            date_value_range("2012-02-15"),
            range("2012-02-15 00:00:00", "2012-02-15 23:59:59")
        );
    }

    #[test]
    fn other_lengths_are_rejected() {
        for value in ["12", "", "2012-1", "2012-02-1", "2012-02-150"] {
            assert_eq!(date_value_range(value), None, "{value}");
        }
    }

    #[test]
    fn malformed_values_bind_nothing() {
        let mut bindings = Bindings::new();
        let clause = build_date_clause(&["d".to_string()], &["12".to_string()], &mut bindings);
        assert_eq!(clause, None);
        assert!(bindings.is_empty());
    }

    #[test]
    fn single_column_single_value_is_a_bare_range() {
        let mut bindings = Bindings::new();
        let clause =
            build_date_clause(&["d".to_string()], &["2012-02-15".to_string()], &mut bindings)
                .unwrap();
        let Predicate::Condition(Condition::Between { column, start, end }) = clause else {
            panic!("expected a single range, got {clause:?}");
        };
        assert_eq!(column, "d");
        assert_eq!(bindings.value_of(&start), Some("2012-02-15 00:00:00"));
        assert_eq!(bindings.value_of(&end), Some("2012-02-15 23:59:59"));
    }

    #[test]
    fn several_values_are_anded() {
        let mut bindings = Bindings::new();
        let clause = build_date_clause(
            &["d".to_string()],
            &["2012".to_string(), "bad".to_string(), "2012-02".to_string()],
            &mut bindings,
        )
        .unwrap();
        let Predicate::And(parts) = clause else {
            panic!("expected AND of ranges, got {clause:?}");
        };
        assert_eq!(parts.len(), 2);
        assert_eq!(bindings.len(), 4);
    }
}
