//! SQL query builder for facet searches.
//!
//! Builds queries over the configured table from already-filtered request
//! parameters, including:
//! - Boolean full-text match on the keyword columns
//! - Facet filters (values of one facet ORed, facets ANDed)
//! - Required-column filters
//! - Sorting and pagination

mod bind;
mod clauses;
mod predicate;
mod render;

pub use bind::{Bindings, Placeholder, KEYWORDS_PLACEHOLDER};
pub use clauses::{build_facet_clause, date_value_range, DateRange};
pub use predicate::{Condition, Predicate};
pub use render::render_predicate;

use crate::params::{FacetSelection, SortDirection};
use crate::{Error, FacetConfig, Result};
use render::SqlWriter;

/// What a [`SelectQuery`] returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Projection {
    /// Every column of the matching rows.
    All,
    /// The number of matching rows.
    Count,
    /// Distinct values of `column` with their row counts.
    FacetCounts { column: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub column: String,
    pub direction: SortDirection,
}

/// A fully parameterized query: FROM target, ordered WHERE list and the
/// values bound to its placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectQuery {
    projection: Projection,
    from: String,
    predicates: Vec<Predicate>,
    order_by: Option<OrderBy>,
    limit: Option<usize>,
    offset: Option<usize>,
    bindings: Bindings,
}

impl SelectQuery {
    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    pub fn from(&self) -> &str {
        &self.from
    }

    /// Top-level WHERE entries, implicitly ANDed.
    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    pub fn order_by(&self) -> Option<&OrderBy> {
        self.order_by.as_ref()
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    pub fn offset(&self) -> Option<usize> {
        self.offset
    }

    pub fn bindings(&self) -> &Bindings {
        &self.bindings
    }

    /// The WHERE list as a single tree, `None` when nothing filters.
    pub fn where_predicate(&self) -> Option<Predicate> {
        Predicate::all(self.predicates.clone())
    }

    /// SQL text with `:name` placeholders, to be executed with
    /// [`bindings`](Self::bindings).
    pub fn to_named_sql(&self) -> String {
        let mut writer = SqlWriter::named();
        writer.push_select(self);
        writer.finish().0
    }

    /// SQL text with `?` placeholders and the values in the order they are
    /// referenced.
    pub fn to_positional_sql(&self) -> (String, Vec<String>) {
        let mut writer = SqlWriter::positional(&self.bindings);
        writer.push_select(self);
        writer.finish()
    }
}

/// Query builder for one facet search over the configured table.
#[derive(Debug, Clone)]
pub struct FacetQueryBuilder<'a> {
    config: &'a FacetConfig,
    keywords: String,
    full_text: bool,
    selections: Vec<FacetSelection>,
    sort: Option<String>,
    direction: SortDirection,
    page: usize,
}

impl<'a> FacetQueryBuilder<'a> {
    pub fn new(config: &'a FacetConfig) -> Self {
        Self {
            config,
            keywords: String::new(),
            full_text: false,
            selections: Vec::new(),
            sort: None,
            direction: SortDirection::default(),
            page: 0,
        }
    }

    /// Boolean-mode expression bound to the full-text match, as produced by
    /// [`KeywordQueryBuilder`](crate::KeywordQueryBuilder).
    pub fn with_keywords(mut self, keywords: impl Into<String>) -> Self {
        self.keywords = keywords.into();
        self
    }

    /// Also match keywords against the `full text columns`.
    pub fn with_full_text(mut self, full_text: bool) -> Self {
        self.full_text = full_text;
        self
    }

    pub fn with_selections(mut self, selections: Vec<FacetSelection>) -> Self {
        self.selections = selections;
        self
    }

    pub fn with_sort(mut self, sort: Option<&str>, direction: SortDirection) -> Self {
        self.sort = sort.map(str::to_string);
        self.direction = direction;
        self
    }

    /// Zero-based page number.
    pub fn with_page(mut self, page: usize) -> Self {
        self.page = page;
        self
    }

    /// Builds the shared WHERE list: keyword match, then one entry per facet
    /// selection that contributes, then the required columns.
    pub fn build_where(&self, bindings: &mut Bindings) -> Result<Vec<Predicate>> {
        let mut predicates = Vec::new();

        if let Some(matched) = self.keyword_predicate(bindings)? {
            predicates.push(matched);
        }

        for selection in &self.selections {
            if let Some(clause) = build_facet_clause(self.config, selection, bindings)? {
                predicates.push(clause);
            }
        }

        for column in self.config.required_columns() {
            predicates.push(
                Condition::NotEmpty {
                    column: column.clone(),
                }
                .into(),
            );
        }

        Ok(predicates)
    }

    /// A non-empty keyword expression with nothing to match against is a
    /// configuration error.
    fn keyword_predicate(&self, bindings: &mut Bindings) -> Result<Option<Predicate>> {
        let keywords = self.keywords.trim();
        if keywords.is_empty() {
            return Ok(None);
        }

        let mut columns = self.config.keyword_columns().to_vec();
        if self.full_text {
            columns.extend(self.config.full_text_columns().iter().cloned());
        }
        if columns.is_empty() {
            return Err(Error::Config(
                "keywords given but no 'keyword columns' configured".to_string(),
            ));
        }

        let query = bindings.bind_named(KEYWORDS_PLACEHOLDER, keywords);
        Ok(Some(Condition::FullTextMatch { columns, query }.into()))
    }

    fn select(&self, projection: Projection) -> Result<SelectQuery> {
        let mut bindings = Bindings::new();
        let predicates = self.build_where(&mut bindings)?;
        Ok(SelectQuery {
            projection,
            from: self.config.table().to_string(),
            predicates,
            order_by: None,
            limit: None,
            offset: None,
            bindings,
        })
    }

    /// One page of matching rows.
    pub fn build_results(&self) -> Result<SelectQuery> {
        let mut query = self.select(Projection::All)?;

        if let Some(sort) = &self.sort {
            if self.config.is_sortable(sort) {
                query.order_by = Some(OrderBy {
                    column: sort.clone(),
                    direction: self.direction,
                });
            } else {
                tracing::debug!(sort = %sort, "Ignoring sort on unconfigured column");
            }
        }

        let limit = self.config.pager_limit();
        query.limit = Some(limit);
        query.offset = Some(self.page.saturating_mul(limit));

        tracing::trace!(sql = %query.to_named_sql(), "Built result query");
        Ok(query)
    }

    /// Total number of matching rows, for the pager.
    pub fn build_count(&self) -> Result<SelectQuery> {
        let query = self.select(Projection::Count)?;
        tracing::trace!(sql = %query.to_named_sql(), "Built count query");
        Ok(query)
    }

    /// Value counts of one facet (or additional) column over the matching
    /// rows.
    pub fn build_facet_counts(&self, column: &str) -> Result<SelectQuery> {
        if !self.config.is_facet(column) && !self.config.additional_columns().contains_key(column)
        {
            return Err(Error::UnknownFacet(column.to_string()));
        }
        let query = self.select(Projection::FacetCounts {
            column: column.to_string(),
        })?;
        tracing::trace!(sql = %query.to_named_sql(), "Built facet count query");
        Ok(query)
    }
}
