//! SQL text rendering.
//!
//! Renders with named placeholders (`:p1`) for drivers that bind by name, or
//! with `?` markers plus an occurrence-ordered value list for drivers that
//! bind by position. A placeholder referenced twice is bound twice in the
//! positional form.

use super::bind::{Bindings, Placeholder};
use super::predicate::{Condition, Predicate};
use super::{Projection, SelectQuery};

enum Style<'a> {
    Named,
    Positional {
        bindings: &'a Bindings,
        values: Vec<String>,
    },
}

pub(super) struct SqlWriter<'a> {
    sql: String,
    style: Style<'a>,
}

impl<'a> SqlWriter<'a> {
    pub(super) fn named() -> Self {
        Self {
            sql: String::new(),
            style: Style::Named,
        }
    }

    pub(super) fn positional(bindings: &'a Bindings) -> Self {
        Self {
            sql: String::new(),
            style: Style::Positional {
                bindings,
                values: Vec::new(),
            },
        }
    }

    pub(super) fn finish(self) -> (String, Vec<String>) {
        match self.style {
            Style::Named => (self.sql, Vec::new()),
            Style::Positional { values, .. } => (self.sql, values),
        }
    }

    fn push_str(&mut self, s: &str) {
        self.sql.push_str(s);
    }

    fn push_placeholder(&mut self, placeholder: &Placeholder) {
        match &mut self.style {
            Style::Named => self.sql.push_str(&placeholder.to_string()),
            Style::Positional { bindings, values } => {
                let value = bindings.value_of(placeholder);
                debug_assert!(value.is_some(), "unbound placeholder {placeholder}");
                values.push(value.unwrap_or_default().to_string());
                self.sql.push('?');
            }
        }
    }

    pub(super) fn push_predicate(&mut self, predicate: &Predicate) {
        match predicate {
            Predicate::And(children) => self.push_group(children, " AND "),
            Predicate::Or(children) => self.push_group(children, " OR "),
            Predicate::Condition(condition) => self.push_condition(condition),
        }
    }

    fn push_group(&mut self, children: &[Predicate], separator: &str) {
        self.push_str("(");
        for (i, child) in children.iter().enumerate() {
            if i > 0 {
                self.push_str(separator);
            }
            self.push_predicate(child);
        }
        self.push_str(")");
    }

    fn push_condition(&mut self, condition: &Condition) {
        match condition {
            Condition::FullTextMatch { columns, query } => {
                self.push_str(&format!("MATCH({}) AGAINST(", columns.join(",")));
                self.push_placeholder(query);
                self.push_str(" IN BOOLEAN MODE)");
            }
            Condition::Between { column, start, end } => {
                self.push_str(&format!("{column} BETWEEN "));
                self.push_placeholder(start);
                self.push_str(" AND ");
                self.push_placeholder(end);
            }
            Condition::ValueInColumns { value, columns } => {
                self.push_placeholder(value);
                self.push_str(&format!(" IN ({})", columns.join(",")));
            }
            Condition::NotEmpty { column } => {
                self.push_str(&format!("({column} <> '' AND {column} IS NOT NULL)"));
            }
        }
    }

    pub(super) fn push_select(&mut self, query: &SelectQuery) {
        match query.projection() {
            Projection::All => self.push_str("SELECT *"),
            Projection::Count => self.push_str("SELECT COUNT(*)"),
            Projection::FacetCounts { column } => self.push_str(&format!(
                "SELECT {column} AS facet_value, COUNT(*) AS item_count"
            )),
        }
        self.push_str(&format!(" FROM {}", query.from()));

        for (i, predicate) in query.predicates().iter().enumerate() {
            self.push_str(if i == 0 { " WHERE " } else { " AND " });
            self.push_predicate(predicate);
        }

        if let Projection::FacetCounts { column } = query.projection() {
            self.push_str(&format!(
                " GROUP BY {column} ORDER BY item_count DESC, {column} ASC"
            ));
        }
        if let Some(order) = query.order_by() {
            self.push_str(&format!(
                " ORDER BY {} {}",
                order.column,
                order.direction.as_sql()
            ));
        }
        if let Some(limit) = query.limit() {
            self.push_str(&format!(" LIMIT {limit}"));
            if let Some(offset) = query.offset().filter(|o| *o > 0) {
                self.push_str(&format!(" OFFSET {offset}"));
            }
        }
    }
}

/// Render one predicate with named placeholders.
pub fn render_predicate(predicate: &Predicate) -> String {
    let mut writer = SqlWriter::named();
    writer.push_predicate(predicate);
    writer.finish().0
}
