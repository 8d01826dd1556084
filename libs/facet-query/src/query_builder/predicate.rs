//! Predicate tree.
//!
//! Queries are composed as AND/OR nodes over leaf conditions. Leaves refer
//! to user values only through [`Placeholder`]s; column names come from
//! validated configuration.

use super::bind::Placeholder;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    And(Vec<Predicate>),
    Or(Vec<Predicate>),
    Condition(Condition),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    /// Boolean-mode full-text match over the indexed columns.
    FullTextMatch {
        columns: Vec<String>,
        query: Placeholder,
    },
    /// Inclusive range test on one column.
    Between {
        column: String,
        start: Placeholder,
        end: Placeholder,
    },
    /// The bound value equals at least one of the columns.
    ValueInColumns {
        value: Placeholder,
        columns: Vec<String>,
    },
    /// Column is neither empty nor NULL.
    NotEmpty { column: String },
}

impl Predicate {
    /// AND of `children`. `None` when empty; a single child is returned as is.
    pub fn all(mut children: Vec<Predicate>) -> Option<Predicate> {
        match children.len() {
            0 => None,
            1 => children.pop(),
            _ => Some(Predicate::And(children)),
        }
    }

    /// OR of `children`. `None` when empty; a single child is returned as is.
    pub fn any(mut children: Vec<Predicate>) -> Option<Predicate> {
        match children.len() {
            0 => None,
            1 => children.pop(),
            _ => Some(Predicate::Or(children)),
        }
    }

    /// Placeholders in the order they appear when rendered.
    pub fn placeholders(&self) -> Vec<&Placeholder> {
        let mut out = Vec::new();
        self.collect_placeholders(&mut out);
        out
    }

    fn collect_placeholders<'a>(&'a self, out: &mut Vec<&'a Placeholder>) {
        match self {
            Self::And(children) | Self::Or(children) => {
                for child in children {
                    child.collect_placeholders(out);
                }
            }
            Self::Condition(Condition::FullTextMatch { query, .. }) => out.push(query),
            Self::Condition(Condition::Between { start, end, .. }) => {
                out.push(start);
                out.push(end);
            }
            Self::Condition(Condition::ValueInColumns { value, .. }) => out.push(value),
            Self::Condition(Condition::NotEmpty { .. }) => {}
        }
    }
}

impl From<Condition> for Predicate {
    fn from(condition: Condition) -> Self {
        Predicate::Condition(condition)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query_builder::Bindings;

    fn not_empty(column: &str) -> Predicate {
        Condition::NotEmpty {
            column: column.to_string(),
        }
        .into()
    }

    #[test]
    fn smart_constructors_collapse() {
        assert_eq!(Predicate::all(vec![]), None);
        assert_eq!(Predicate::any(vec![]), None);
        assert_eq!(Predicate::all(vec![not_empty("a")]), Some(not_empty("a")));
        assert_eq!(
            Predicate::any(vec![not_empty("a"), not_empty("b")]),
            Some(Predicate::Or(vec![not_empty("a"), not_empty("b")]))
        );
    }

    #[test]
    fn lists_placeholders_in_render_order() {
        let mut bindings = Bindings::new();
        let start = bindings.bind("2012-01-01 00:00:00");
        let end = bindings.bind("2012-12-31 23:59:59");
        let value = bindings.bind("books");
        let tree = Predicate::And(vec![
            Condition::Between {
                column: "published".into(),
                start: start.clone(),
                end: end.clone(),
            }
            .into(),
            Condition::ValueInColumns {
                value: value.clone(),
                columns: vec!["category".into()],
            }
            .into(),
            not_empty("status"),
        ]);
        assert_eq!(tree.placeholders(), vec![&start, &end, &value]);
    }
}
