//! Per-request search context.

use std::cell::OnceCell;

use crate::granularity::DateGranularities;
use crate::keywords::KeywordQueryBuilder;
use crate::params::RequestParameters;
use crate::query_builder::{FacetQueryBuilder, SelectQuery};
use crate::{FacetConfig, Result};

/// One search request against a shared, read-only configuration.
///
/// The processed keyword expression is computed on first use and kept for
/// the lifetime of the request. Nothing is cached across requests.
#[derive(Debug)]
pub struct SearchRequest<'a> {
    config: &'a FacetConfig,
    params: RequestParameters,
    keywords: OnceCell<String>,
}

impl<'a> SearchRequest<'a> {
    pub fn new(config: &'a FacetConfig, params: RequestParameters) -> Self {
        Self {
            config,
            params,
            keywords: OnceCell::new(),
        }
    }

    pub fn from_query_string(config: &'a FacetConfig, query: &str) -> Self {
        Self::new(config, RequestParameters::from_query_string(config, query))
    }

    pub fn config(&self) -> &'a FacetConfig {
        self.config
    }

    pub fn params(&self) -> &RequestParameters {
        &self.params
    }

    /// The keyword string rewritten into a boolean full-text expression.
    /// Empty when no keywords were given.
    pub fn user_keywords(&self) -> &str {
        self.keywords.get_or_init(|| {
            let raw = self.params.keywords().unwrap_or_default();
            KeywordQueryBuilder::from_config(self.config).build(&raw)
        })
    }

    pub fn granularities(&self) -> &'a DateGranularities {
        self.config.granularities()
    }

    /// A query builder loaded with everything this request selects.
    pub fn query_builder(&self) -> FacetQueryBuilder<'a> {
        FacetQueryBuilder::new(self.config)
            .with_keywords(self.user_keywords())
            .with_full_text(self.params.full_text())
            .with_selections(self.params.facet_selections())
            .with_sort(self.params.sort(), self.params.sort_direction())
            .with_page(self.params.page())
    }

    pub fn build_results(&self) -> Result<SelectQuery> {
        self.query_builder().build_results()
    }

    pub fn build_count(&self) -> Result<SelectQuery> {
        self.query_builder().build_count()
    }

    pub fn build_facet_counts(&self, column: &str) -> Result<SelectQuery> {
        self.query_builder().build_facet_counts(column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> FacetConfig {
        FacetConfig::from_yaml_str(
            "
database table: docs
facet labels:
  category: Category
keyword columns: [title]
use AND for keyword logic by default: true
automatically put wildcards on keywords entered: true
",
        )
        .unwrap()
    }

    #[test]
    fn keywords_are_processed_once() {
        let config = config();
        let request = SearchRequest::from_query_string(&config, "keys=tax+OR+law+rights");
        let first = request.user_keywords();
        assert_eq!(first, "+tax* law* +rights*");
        assert!(std::ptr::eq(first, request.user_keywords()));
    }

    #[test]
    fn missing_keywords_are_empty() {
        let config = config();
        let request = SearchRequest::from_query_string(&config, "category=books");
        assert_eq!(request.user_keywords(), "");
        let query = request.build_count().unwrap();
        assert_eq!(
            query.to_named_sql(),
            "SELECT COUNT(*) FROM docs WHERE :p1 IN (category)"
        );
    }
}
